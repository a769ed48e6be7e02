use std::env;

use ethers::{signers::LocalWallet, utils::keccak256};

/// The mainnet block the integration tests fork from.
pub const FORK_BLOCK_NUMBER: u64 = 12796965;

lazy_static! {
    // A set of test accounts.
    pub static ref ALICE: LocalWallet = LocalWallet::from_bytes(&keccak256("alice")).unwrap();
    pub static ref BOB: LocalWallet = LocalWallet::from_bytes(&keccak256("bob")).unwrap();

    // The Ethereum URL the tests should connect to. If None, then the tests
    // will spawn an anvil node.
    pub static ref MAYBE_ETHEREUM_URL: Option<String> = env::var("DSA_ETHEREUM_URL").ok();

    // The Hardhat artifacts directory of the contracts project. Tests run from
    // their package directory, so the default points at the repository root.
    pub static ref ARTIFACTS_DIR: String = env::var("DSA_ARTIFACTS_DIR")
        .unwrap_or_else(|_| "../../artifacts".to_string());
}
