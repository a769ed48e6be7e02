/// This module enables connectors in the `InstaConnectorsV2` registry. Only
/// the registry's chief can add connectors, so on a live network this is
/// done through governance and these helpers are mostly used on forks.
use std::sync::Arc;

use dsa_wrappers::wrappers::insta_connectors_v2::InstaConnectorsV2;
use ethers::{
    providers::Middleware,
    types::{Address, U256},
};
use eyre::{eyre, Result};
use tracing::info;

use crate::{
    artifacts::Artifact,
    deploy::{ChainDeployer, ContractDeployer, DeployedContract},
};

/// Adds `address` to the registry under `name` and waits for the receipt.
pub async fn enable_connector<M: Middleware + 'static>(
    registry: &InstaConnectorsV2<M>,
    name: &str,
    address: Address,
) -> Result<()> {
    let receipt = registry
        .add_connectors(vec![name.to_string()], vec![address])
        .send()
        .await?
        .await?
        .ok_or_else(|| eyre!("enabling {} was dropped from the mempool", name))?;
    if receipt.status != Some(1.into()) {
        return Err(eyre!(
            "enabling {} reverted in {:?}",
            name,
            receipt.transaction_hash
        ));
    }
    info!(%name, connector = ?address, "connector enabled");
    Ok(())
}

/// Deploys a connector with `client` and enables it in the registry at
/// `connectors_v2` with the same client.
pub async fn deploy_and_enable_connector<M: Middleware + 'static>(
    client: Arc<M>,
    connectors_v2: Address,
    name: &str,
    artifact: &Artifact,
    gas_price: Option<U256>,
) -> Result<DeployedContract> {
    let gas_price = match gas_price {
        Some(gas_price) => gas_price,
        None => client.get_gas_price().await?,
    };
    let deployed = ChainDeployer::new(client.clone())
        .deploy(artifact, gas_price)
        .await?;
    let registry = InstaConnectorsV2::new(connectors_v2, client);
    enable_connector(&registry, name, deployed.address).await?;
    Ok(deployed)
}
