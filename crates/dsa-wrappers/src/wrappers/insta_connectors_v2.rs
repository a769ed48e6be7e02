use ethers::contract::abigen;

abigen!(
    InstaConnectorsV2,
    r#"[
        function connectors(string _connectorName) external view returns (address)
        function chief(address _chief) external view returns (bool)
        function isConnectors(string[] _connectorNames) external view returns (bool isOk, address[] _connectors)
        function addConnectors(string[] _connectorNames, address[] _connectors) external
        function updateConnectors(string[] _connectorNames, address[] _connectors) external
        function removeConnectors(string[] _connectorNames) external
        event LogConnectorAdded(bytes32 indexed connectorNameHash, string connectorName, address indexed connector)
    ]"#,
);
