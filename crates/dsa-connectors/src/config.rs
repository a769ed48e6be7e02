/// This module loads the deployment configuration: secrets and API keys come
/// from the environment (optionally through a `.env` file) and the known
/// networks are derived from them.
use ethers::signers::LocalWallet;
use eyre::{eyre, Result, WrapErr};
use serde::Deserialize;

pub const DEFAULT_SOURCIFY_URL: &str = "https://sourcify.dev/server";

/// The environment variables the tooling reads.
#[derive(Clone, Default, Deserialize)]
pub struct Environment {
    pub private_key: Option<String>,
    pub alchemy_id: Option<String>,
    pub etherscan_api_key: Option<String>,
    pub polygonscan_api_key: Option<String>,
    pub arbiscan_api_key: Option<String>,
    pub snowtrace_api_key: Option<String>,
    pub sourcify_url: Option<String>,
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment")
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .field("alchemy_id", &self.alchemy_id.as_ref().map(|_| "<redacted>"))
            .field("sourcify_url", &self.sourcify_url)
            .finish_non_exhaustive()
    }
}

impl Environment {
    /// Loads the `.env` file if there is one and reads the environment.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Self>().wrap_err("failed to read the environment")
    }

    /// The deployer's wallet from `PRIVATE_KEY`.
    pub fn signer(&self) -> Result<LocalWallet> {
        self.private_key
            .as_deref()
            .ok_or_else(|| eyre!("PRIVATE_KEY is not set"))?
            .parse::<LocalWallet>()
            .wrap_err("PRIVATE_KEY is not a valid private key")
    }

    fn alchemy_url(&self, subdomain: &str) -> Option<String> {
        self.alchemy_id
            .as_ref()
            .map(|id| format!("https://{}.g.alchemy.com/v2/{}", subdomain, id))
    }
}

/// The source verification service of a network.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Explorer {
    Etherscan {
        api_url: String,
        api_key: Option<String>,
    },
    Sourcify {
        server_url: String,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetworkConfig {
    pub name: String,
    /// `None` when the RPC endpoint needs an API key that isn't configured.
    pub url: Option<String>,
    pub chain_id: u64,
    pub explorer: Option<Explorer>,
}

impl NetworkConfig {
    /// Every network the tooling can deploy to.
    pub fn all(env: &Environment) -> Vec<Self> {
        let sourcify_url = env
            .sourcify_url
            .clone()
            .unwrap_or_else(|| DEFAULT_SOURCIFY_URL.to_string());
        vec![
            Self {
                name: "mainnet".to_string(),
                url: env.alchemy_url("eth-mainnet"),
                chain_id: 1,
                explorer: Some(Explorer::Etherscan {
                    api_url: "https://api.etherscan.io/api".to_string(),
                    api_key: env.etherscan_api_key.clone(),
                }),
            },
            Self {
                name: "polygon".to_string(),
                url: env.alchemy_url("polygon-mainnet"),
                chain_id: 137,
                explorer: Some(Explorer::Etherscan {
                    api_url: "https://api.polygonscan.com/api".to_string(),
                    api_key: env.polygonscan_api_key.clone(),
                }),
            },
            Self {
                name: "arbitrum".to_string(),
                url: env.alchemy_url("arb-mainnet"),
                chain_id: 42161,
                explorer: Some(Explorer::Etherscan {
                    api_url: "https://api.arbiscan.io/api".to_string(),
                    api_key: env.arbiscan_api_key.clone(),
                }),
            },
            Self {
                name: "avax".to_string(),
                url: Some("https://api.avax.network/ext/bc/C/rpc".to_string()),
                chain_id: 43114,
                explorer: Some(Explorer::Sourcify {
                    server_url: sourcify_url,
                }),
            },
            Self {
                name: "localhost".to_string(),
                url: Some("http://127.0.0.1:8545".to_string()),
                chain_id: 31337,
                explorer: None,
            },
        ]
    }

    /// Looks up a network by name.
    pub fn by_name(name: &str, env: &Environment) -> Result<Self> {
        let networks = Self::all(env);
        let names = networks
            .iter()
            .map(|network| network.name.clone())
            .collect::<Vec<_>>();
        networks
            .into_iter()
            .find(|network| network.name == name)
            .ok_or_else(|| {
                eyre!(
                    "unknown network {}\nsupported networks are:\n{}",
                    name,
                    names.join("\n")
                )
            })
    }

    /// The RPC endpoint, failing if it can't be built from the environment.
    pub fn rpc_url(&self) -> Result<&str> {
        self.url
            .as_deref()
            .ok_or_else(|| eyre!("network {} needs ALCHEMY_ID to be set", self.name))
    }
}
