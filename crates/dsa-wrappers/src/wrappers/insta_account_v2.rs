use ethers::contract::abigen;

abigen!(
    InstaAccountV2,
    r#"[
        function version() external view returns (uint256)
        function isAuth(address user) external view returns (bool)
        function cast(string[] _targetNames, bytes[] _datas, address _origin) external payable returns (bytes32)
        event LogCast(address indexed origin, address indexed sender, uint256 value, string[] targetsNames, address[] targets, string[] eventNames, bytes[] eventParams)
    ]"#,
);
