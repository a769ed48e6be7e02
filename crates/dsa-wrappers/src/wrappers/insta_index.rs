use ethers::contract::abigen;

abigen!(
    InstaIndex,
    r#"[
        function master() external view returns (address)
        function list() external view returns (address)
        function connectors(uint256 version) external view returns (address)
        function account(uint256 version) external view returns (address)
        function versionCount() external view returns (uint256)
        function build(address _owner, uint256 _accountVersion, address _origin) external returns (address _account)
        event LogAccountCreated(address sender, address indexed owner, address indexed account, address indexed origin)
    ]"#,
);
