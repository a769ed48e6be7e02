use dsa_connectors::{
    artifacts::{compile, ArtifactStore},
    verify::verifier_for,
    Chain, ChainDeployer, ContractDeployer, Environment, NetworkConfig, VerificationRequest,
};
use ethers::{providers::Middleware, types::Bytes};
use eyre::Result;
use tracing::warn;

const CONNECTOR: &str = "ConnectV2InstaPoolV3Avalanche";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let env = Environment::load()?;
    let network = NetworkConfig::by_name("avax", &env)?;

    compile(".")?;
    let artifacts = ArtifactStore::new("artifacts");
    let artifact = artifacts.find(CONNECTOR)?;

    let chain = Chain::connect(network.rpc_url()?).await?;
    let client = chain.client(env.signer()?).await?;
    let gas_price = chain.provider().get_gas_price().await?;
    let deployed = ChainDeployer::new(client)
        .deploy(&artifact, gas_price)
        .await?;
    println!("{} Deployed: {:?}", CONNECTOR, deployed.address);

    if let Some(explorer) = &network.explorer {
        let verifier = verifier_for(explorer, network.chain_id);
        let request = VerificationRequest {
            address: deployed.address,
            constructor_args: Bytes::default(),
            build_info: artifacts.build_info(&artifact).ok(),
            artifact,
        };
        if let Err(err) = verifier.verify(&request).await {
            warn!(
                "Failed to verify: {}@{:?}: {:?}",
                CONNECTOR, deployed.address, err
            );
        }
    }

    Ok(())
}
