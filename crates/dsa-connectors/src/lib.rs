pub mod artifacts;
pub mod chain;
pub mod config;
pub mod deploy;
pub mod registry;
pub mod resolver;
pub mod scanner;
pub mod spells;
pub mod verify;

pub use artifacts::{Artifact, ArtifactStore, BuildInfo};
pub use chain::{Chain, ChainClient};
pub use config::{Environment, Explorer, NetworkConfig};
pub use deploy::{
    deploy_connector, parse_gas_price, ChainDeployer, ContractDeployer, DeployRequest,
    DeployedContract,
};
pub use registry::{deploy_and_enable_connector, enable_connector};
pub use resolver::resolve;
pub use scanner::{contract_name, scan_connectors, ConnectorDescriptor, CONNECTOR_ROOTS};
pub use spells::{CastArgs, Spell, SpellCall, SpellEncoder};
pub use verify::{VerificationRequest, Verifier};
