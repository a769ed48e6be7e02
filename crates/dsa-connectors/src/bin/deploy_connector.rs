use std::{path::PathBuf, process};

use clap::{error::ErrorKind, Parser};
use dsa_connectors::{
    artifacts::{compile, ArtifactStore},
    deploy_connector, parse_gas_price, resolve, scan_connectors,
    verify::verifier_for,
    Chain, ChainDeployer, DeployRequest, Environment, NetworkConfig, CONNECTOR_ROOTS,
};
use eyre::Result;
use tracing::info;

/// Deploys a connector and verifies it on the network's explorer.
#[derive(Debug, Parser)]
#[command(name = "deploy-connector")]
struct Args {
    /// The contract name of the connector, e.g. ConnectV2AaveV2.
    #[arg(long)]
    connector: String,
    /// The network to deploy to.
    #[arg(long)]
    network: String,
    /// The network whose explorer verifies the deployment. Defaults to the
    /// deployment network.
    #[arg(long = "networkName")]
    network_name: Option<String>,
    /// The gas price in gwei.
    #[arg(long = "gasPrice")]
    gas_price: String,
    /// The root of the contracts project.
    #[arg(long, default_value = ".")]
    root: PathBuf,
    #[arg(long)]
    skip_compile: bool,
    #[arg(long)]
    skip_verify: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            eprint!("{}", err);
            process::exit(1);
        }
    };

    tracing_subscriber::fmt::init();
    let env = Environment::load()?;

    // Check the request before spending anything on compilation.
    let gas_price = parse_gas_price(&args.gas_price)?;
    let connectors = scan_connectors(&args.root, CONNECTOR_ROOTS)?;
    resolve(&args.connector, &connectors)?;
    let network = NetworkConfig::by_name(&args.network, &env)?;
    let explorer_network = match &args.network_name {
        Some(name) => NetworkConfig::by_name(name, &env)?,
        None => network.clone(),
    };

    if !args.skip_compile {
        compile(&args.root)?;
    }

    let chain = Chain::connect(network.rpc_url()?).await?;
    let client = chain.client(env.signer()?).await?;
    info!(network = %network.name, deployer = ?client.address(), "connected");

    let verifier = match (&explorer_network.explorer, args.skip_verify) {
        (Some(explorer), false) => Some(verifier_for(explorer, explorer_network.chain_id)),
        _ => None,
    };
    deploy_connector(
        &DeployRequest {
            connector: args.connector.clone(),
            gas_price,
        },
        &connectors,
        &ArtifactStore::new(args.root.join("artifacts")),
        &ChainDeployer::new(client),
        verifier.as_deref(),
    )
    .await?;

    println!("Done successfully");
    Ok(())
}
