//! Source verification on block explorers. Verification is cosmetic, so
//! callers treat every error from this module as non-fatal.
mod etherscan;
mod sourcify;

use std::time::Duration;

use async_trait::async_trait;
use ethers::types::{Address, Bytes};
use eyre::Result;

pub use self::{etherscan::EtherscanVerifier, sourcify::SourcifyVerifier};
use crate::{
    artifacts::{Artifact, BuildInfo},
    config::Explorer,
};

const RETRIES: usize = 10;
const RETRY_TIME: Duration = Duration::from_secs(5);

/// Everything an explorer needs to match a deployment against its source.
#[derive(Clone, Debug)]
pub struct VerificationRequest {
    pub address: Address,
    pub artifact: Artifact,
    /// The ABI-encoded constructor arguments.
    pub constructor_args: Bytes,
    pub build_info: Option<BuildInfo>,
}

#[async_trait]
pub trait Verifier: Send + Sync {
    /// A short name for logs.
    fn name(&self) -> &str;

    async fn verify(&self, request: &VerificationRequest) -> Result<()>;
}

/// Builds the verifier for a network's explorer.
pub fn verifier_for(explorer: &Explorer, chain_id: u64) -> Box<dyn Verifier> {
    match explorer {
        Explorer::Etherscan { api_url, api_key } => {
            Box::new(EtherscanVerifier::new(api_url.clone(), api_key.clone()))
        }
        Explorer::Sourcify { server_url } => {
            Box::new(SourcifyVerifier::new(server_url.clone(), chain_id))
        }
    }
}
