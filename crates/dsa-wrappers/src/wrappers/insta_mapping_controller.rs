use ethers::contract::abigen;

abigen!(
    InstaMappingController,
    r#"[
        function hasRole(address role, address account) external view returns (bool)
        function getRoleMemberCount(address role) external view returns (uint256)
        function getRoleMember(address role, uint256 index) external view returns (address)
        function grantRole(address role, address account) external
        function revokeRole(address role, address account) external
        function renounceRole(address role, address account) external
        event RoleGranted(address indexed role, address indexed account)
        event RoleRevoked(address indexed role, address indexed account, address indexed sender)
    ]"#,
);
