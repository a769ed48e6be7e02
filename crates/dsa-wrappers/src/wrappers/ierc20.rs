use ethers::contract::abigen;

abigen!(
    IERC20,
    r#"[
        function totalSupply() external view returns (uint256)
        function balanceOf(address account) external view returns (uint256)
        function transfer(address recipient, uint256 amount) external returns (bool)
        function allowance(address owner, address spender) external view returns (uint256)
        function approve(address spender, uint256 amount) external returns (bool)
        function decimals() external view returns (uint8)
        event Transfer(address indexed from, address indexed to, uint256 value)
    ]"#,
);
