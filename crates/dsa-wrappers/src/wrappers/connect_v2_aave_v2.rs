use ethers::contract::abigen;

abigen!(
    ConnectV2AaveV2,
    r#"[
        function name() external view returns (string)
        function deposit(address token, uint256 amt, uint256 getId, uint256 setId) external payable returns (string _eventName, bytes _eventParam)
        function withdraw(address token, uint256 amt, uint256 getId, uint256 setId) external payable returns (string _eventName, bytes _eventParam)
        function borrow(address token, uint256 amt, uint256 rateMode, uint256 getId, uint256 setId) external payable returns (string _eventName, bytes _eventParam)
        function payback(address token, uint256 amt, uint256 rateMode, uint256 getId, uint256 setId) external payable returns (string _eventName, bytes _eventParam)
        function enableCollateral(address[] tokens) external payable returns (string _eventName, bytes _eventParam)
        function swapBorrowRateMode(address token, uint256 rateMode) external payable returns (string _eventName, bytes _eventParam)
    ]"#,
    derives(serde::Serialize, serde::Deserialize)
);
