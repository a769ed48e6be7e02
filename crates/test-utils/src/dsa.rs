/// Helpers that set up DSA state on a forked chain: the index master, new
/// accounts and token balances.
use std::sync::Arc;

use dsa_addresses::{Addresses, Token};
use dsa_connectors::{Artifact, ArtifactStore, Spell, SpellEncoder};
use dsa_wrappers::wrappers::{
    insta_account_v2::InstaAccountV2,
    insta_index::{InstaIndex, LogAccountCreatedFilter},
};
use ethers::{
    prelude::EthLogDecode,
    providers::{Http, Middleware, Provider},
    types::{Address, TransactionReceipt, U256},
};
use eyre::{eyre, Result};
use tracing::debug;

use crate::{constants::ARTIFACTS_DIR, TestChain};

/// The version of the DSA accounts the tests build.
pub const ACCOUNT_VERSION: u64 = 2;

/// Impersonates the master of `InstaIndex` and funds it. Transactions sent
/// through the returned provider come from the master, which is the only
/// account that can enable connectors.
pub async fn master_signer(
    chain: &TestChain,
    addresses: &Addresses,
) -> Result<Arc<Provider<Http>>> {
    let index = InstaIndex::new(addresses.insta_index, Arc::new(chain.provider()));
    let master = index.master().call().await?;
    chain.impersonate(master).await?;
    chain.set_balance(master, U256::one() << 96).await?;
    debug!(?master, "impersonating the index master");
    Ok(chain.unlocked(master))
}

/// Builds a DSA v2 account owned by `owner` and returns a handle to it.
pub async fn build_dsa<M: Middleware + 'static>(
    client: Arc<M>,
    addresses: &Addresses,
    owner: Address,
) -> Result<InstaAccountV2<M>> {
    let index = InstaIndex::new(addresses.insta_index, client.clone());
    let receipt = index
        .build(owner, ACCOUNT_VERSION.into(), Address::zero())
        .send()
        .await?
        .await?
        .ok_or_else(|| eyre!("building a DSA for {:?} was dropped", owner))?;

    // The index announces the new account in its creation event.
    let account = receipt
        .logs
        .into_iter()
        .filter(|log| log.address == addresses.insta_index)
        .find_map(|log| LogAccountCreatedFilter::decode_log(&log.into()).ok())
        .ok_or_else(|| eyre!("no LogAccountCreated in {:?}", receipt.transaction_hash))?
        .account;
    debug!(?owner, ?account, "built DSA");

    Ok(InstaAccountV2::new(account, client))
}

/// Gives `to` an `amount` of `token`.
pub async fn add_liquidity<U: Into<U256>>(
    chain: &TestChain,
    token: &Token,
    to: Address,
    amount: U,
) -> Result<()> {
    chain.deal_erc20(token, to, amount).await
}

/// Loads a compiled contract from the project's artifacts.
pub fn load_artifact(name: &str) -> Result<Artifact> {
    ArtifactStore::new(ARTIFACTS_DIR.as_str()).find(name)
}

/// Encodes `spells` and casts them through `dsa`, failing if the cast reverts.
pub async fn cast_spells<M: Middleware + 'static>(
    dsa: &InstaAccountV2<M>,
    spells: &[Spell],
    origin: Address,
) -> Result<TransactionReceipt> {
    let (targets, datas) = SpellEncoder::new().encode(spells)?.into_parts();
    let receipt = dsa
        .cast(targets, datas, origin)
        .send()
        .await?
        .await?
        .ok_or_else(|| eyre!("cast on {:?} was dropped", dsa.address()))?;
    if receipt.status != Some(1.into()) {
        return Err(eyre!("cast reverted in {:?}", receipt.transaction_hash));
    }
    Ok(receipt)
}
