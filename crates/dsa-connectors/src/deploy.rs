/// This module deploys connectors. `deploy_connector` is the whole workflow
/// behind the command line: resolve the requested connector, deploy its
/// compiled artifact and ask an explorer to verify it.
use std::sync::Arc;

use async_trait::async_trait;
use ethers::{
    contract::ContractFactory,
    providers::Middleware,
    types::{Address, Bytes, H256, U256},
    utils::{parse_units, ParseUnits},
};
use eyre::{eyre, Result, WrapErr};
use tracing::{info, warn};

use crate::{
    artifacts::{Artifact, ArtifactStore},
    resolver::resolve,
    scanner::ConnectorDescriptor,
    verify::{VerificationRequest, Verifier},
};

/// Converts a gas price in gwei, e.g. `"50"` or `"1.5"`, to wei.
pub fn parse_gas_price(gwei: &str) -> Result<U256> {
    match parse_units(gwei.trim(), "gwei")
        .wrap_err_with(|| format!("invalid gas price {:?}", gwei))?
    {
        ParseUnits::U256(wei) => Ok(wei),
        ParseUnits::I256(_) => Err(eyre!("gas price can't be negative: {}", gwei)),
    }
}

/// The outcome of a successful deployment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeployedContract {
    pub address: Address,
    pub tx_hash: H256,
}

/// Something that can put a compiled contract on chain.
#[async_trait]
pub trait ContractDeployer: Send + Sync {
    async fn deploy(&self, artifact: &Artifact, gas_price: U256) -> Result<DeployedContract>;
}

/// Deploys contracts with a client, waiting for one confirmation.
pub struct ChainDeployer<M> {
    client: Arc<M>,
}

impl<M: Middleware + 'static> ChainDeployer<M> {
    pub fn new(client: Arc<M>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<M: Middleware + 'static> ContractDeployer for ChainDeployer<M> {
    async fn deploy(&self, artifact: &Artifact, gas_price: U256) -> Result<DeployedContract> {
        let factory = ContractFactory::new(
            artifact.abi.clone(),
            artifact.bytecode.clone(),
            self.client.clone(),
        );

        // Connectors don't take constructor arguments. The gas price is set
        // on a legacy transaction so that it's used as is.
        let mut deployer = factory.deploy(())?.legacy().confirmations(1usize);
        deployer.tx.set_gas_price(gas_price);

        info!(
            contract = %artifact.contract_name,
            gas_price = %gas_price,
            "sending deployment transaction"
        );
        let (contract, receipt) = deployer.send_with_receipt().await?;

        Ok(DeployedContract {
            address: contract.address(),
            tx_hash: receipt.transaction_hash,
        })
    }
}

/// The parameters of a connector deployment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeployRequest {
    pub connector: String,
    /// The gas price in wei.
    pub gas_price: U256,
}

/// Resolves, deploys and verifies a connector.
///
/// Resolution and deployment failures are returned. A verification failure
/// is logged and otherwise ignored: the deployment already happened, so the
/// deployed contract is still the result.
pub async fn deploy_connector<D: ContractDeployer + ?Sized>(
    request: &DeployRequest,
    connectors: &[ConnectorDescriptor],
    artifacts: &ArtifactStore,
    deployer: &D,
    verifier: Option<&dyn Verifier>,
) -> Result<DeployedContract> {
    let connector = resolve(&request.connector, connectors)?;
    let artifact = artifacts.connector(connector)?;

    let deployed = deployer.deploy(&artifact, request.gas_price).await?;
    info!(tx_hash = ?deployed.tx_hash, "{} Deployed: {:?}", connector.name, deployed.address);

    if let Some(verifier) = verifier {
        let request = VerificationRequest {
            address: deployed.address,
            constructor_args: Bytes::default(),
            build_info: artifacts.build_info(&artifact).ok(),
            artifact,
        };
        if let Err(err) = verifier.verify(&request).await {
            warn!(
                verifier = verifier.name(),
                "Failed to verify: {}@{:?}: {:?}", connector.name, deployed.address, err
            );
        }
    }

    Ok(deployed)
}
