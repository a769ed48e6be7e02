// TODO: Polygon and Avalanche deployments of the DSA core should get their own
// constructors once the integration tests fork those chains.

use ethers::types::{Address, U256};
use serde::{Deserialize, Serialize};

#[macro_use]
extern crate lazy_static;

/// The sentinel that connectors interpret as "the full balance".
pub const MAX_VALUE: U256 = U256::MAX;

/// The addresses of the DSA v2 core contracts.
#[derive(Default, Debug, Eq, PartialEq, Clone, Copy, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Addresses {
    pub insta_index: Address,
    pub connectors_v2: Address,
    pub insta_list: Address,
}

impl Addresses {
    /// The core deployment on Ethereum mainnet.
    pub fn mainnet() -> Self {
        Self {
            insta_index: *INSTA_INDEX,
            connectors_v2: *CONNECTORS_V2,
            insta_list: *INSTA_LIST,
        }
    }
}

/// An ERC20 token (or the native asset) that spells and tests refer to.
///
/// `balance_slot` is the storage slot of the token's `balanceOf` mapping. Test
/// chains use it to write balances directly instead of finding a holder to
/// impersonate.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub struct Token {
    pub symbol: &'static str,
    pub address: Address,
    pub decimals: u8,
    pub balance_slot: Option<u64>,
}

impl Token {
    /// Whether this is the placeholder address connectors use for ether.
    pub fn is_eth(&self) -> bool {
        self.address == ETH.address
    }
}

lazy_static! {
    static ref INSTA_INDEX: Address = "0x2971AdFa57b20E5a416aE5a708A8655A9c74f723"
        .parse()
        .unwrap();
    static ref CONNECTORS_V2: Address = "0x97b0B3A8bDeFE8cB9563a3c610019Ad10DB8aD11"
        .parse()
        .unwrap();
    static ref INSTA_LIST: Address = "0x4c8a1BEb8a87765788946D6B19C6C6355194AbEb"
        .parse()
        .unwrap();

    // Mainnet tokens.
    pub static ref ETH: Token = Token {
        symbol: "ETH",
        address: "0xEeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE".parse().unwrap(),
        decimals: 18,
        balance_slot: None,
    };
    pub static ref WETH: Token = Token {
        symbol: "WETH",
        address: "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2".parse().unwrap(),
        decimals: 18,
        balance_slot: Some(3),
    };
    pub static ref DAI: Token = Token {
        symbol: "DAI",
        address: "0x6B175474E89094C44Da98b954EedeAC495271d0F".parse().unwrap(),
        decimals: 18,
        balance_slot: Some(2),
    };
    pub static ref USDC: Token = Token {
        symbol: "USDC",
        address: "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48".parse().unwrap(),
        decimals: 6,
        balance_slot: Some(9),
    };
    pub static ref USDT: Token = Token {
        symbol: "USDT",
        address: "0xdAC17F958D2ee523a2206206994597C13D831ec7".parse().unwrap(),
        decimals: 6,
        balance_slot: Some(2),
    };
}
