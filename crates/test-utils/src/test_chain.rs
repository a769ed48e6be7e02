use std::{fmt::Debug, sync::Arc, time::Duration};

use dsa_addresses::Token;
use dsa_connectors::{Chain, ChainClient, Environment, NetworkConfig};
use ethers::{
    abi::{self, Token as AbiToken},
    core::utils::Anvil,
    providers::{Http, Middleware, Provider},
    signers::{LocalWallet, Signer},
    types::{Address, H256, U256},
    utils::{keccak256, parse_ether, AnvilInstance},
};
use eyre::{eyre, Result};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::constants::{ALICE, BOB, MAYBE_ETHEREUM_URL};

/// A mainnet fork on anvil with a couple of funded accounts.
pub struct TestChain {
    chain: Chain,
    accounts: Vec<LocalWallet>,
    _maybe_anvil: Option<AnvilInstance>,
}

impl TestChain {
    /// Forks mainnet at `block_number`. If `DSA_ETHEREUM_URL` points at an
    /// anvil node, that node is reset to the fork. Otherwise an anvil node is
    /// spawned.
    pub async fn fork(block_number: u64) -> Result<Self> {
        let env = Environment::load()?;
        let fork_url = NetworkConfig::by_name("mainnet", &env)?
            .rpc_url()?
            .to_string();

        let (provider, _maybe_anvil) = if let Some(ethereum_url) = MAYBE_ETHEREUM_URL.as_ref() {
            let provider = Provider::<Http>::try_from(ethereum_url.as_str())?
                .interval(Duration::from_millis(10));
            provider
                .request::<_, Value>(
                    "anvil_reset",
                    [json!({
                        "forking": {
                            "jsonRpcUrl": fork_url,
                            "blockNumber": block_number,
                        }
                    })],
                )
                .await?;
            (provider, None)
        } else {
            let anvil = Anvil::new()
                .fork(fork_url)
                .fork_block_number(block_number)
                .spawn();
            let provider =
                Provider::<Http>::try_from(anvil.endpoint())?.interval(Duration::from_millis(10));
            (provider, Some(anvil))
        };
        let chain = Chain::from_provider(provider).await?;
        if !chain.is_anvil() {
            return Err(eyre!(
                "test chains need an anvil node, got {}",
                chain.client_version()
            ));
        }
        debug!(block_number, "forked mainnet");

        let test_chain = Self {
            chain,
            accounts: vec![ALICE.clone(), BOB.clone()],
            _maybe_anvil,
        };
        for account in &test_chain.accounts {
            test_chain
                .set_balance(account.address(), parse_ether(1_000)?)
                .await?;
        }
        Ok(test_chain)
    }

    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    pub fn provider(&self) -> Provider<Http> {
        self.chain.provider()
    }

    /// The funded test accounts.
    pub fn accounts(&self) -> &[LocalWallet] {
        &self.accounts
    }

    /// A signing client for one of the test accounts.
    pub async fn client(&self, signer: LocalWallet) -> Result<Arc<ChainClient<LocalWallet>>> {
        self.chain.client(signer).await
    }

    /// A provider that sends transactions from an impersonated account.
    pub fn unlocked(&self, address: Address) -> Arc<Provider<Http>> {
        self.chain.unlocked(address)
    }

    pub async fn impersonate(&self, address: Address) -> Result<()> {
        self.anvil("anvil_impersonateAccount", [address]).await
    }

    pub async fn stop_impersonating(&self, address: Address) -> Result<()> {
        self.anvil("anvil_stopImpersonatingAccount", [address]).await
    }

    pub async fn set_balance<U: Into<U256>>(&self, address: Address, balance: U) -> Result<()> {
        self.anvil("anvil_setBalance", (address, balance.into())).await
    }

    /// Adds ether to an address.
    pub async fn deal<U: Into<U256>>(&self, address: Address, amount: U) -> Result<()> {
        let amount: U256 = amount.into();
        let balance = self.provider().get_balance(address, None).await?;
        self.set_balance(address, balance + amount).await
    }

    /// Sets the token balance of `account` by writing the token's balance
    /// mapping. Ether goes through `deal` instead.
    pub async fn deal_erc20<U: Into<U256>>(
        &self,
        token: &Token,
        account: Address,
        amount: U,
    ) -> Result<()> {
        if token.is_eth() {
            return self.deal(account, amount).await;
        }
        let slot = token
            .balance_slot
            .ok_or_else(|| eyre!("unknown balance slot for {}", token.symbol))?;
        let amount: U256 = amount.into();
        let mut value = [0u8; 32];
        amount.to_big_endian(&mut value);
        self.anvil(
            "anvil_setStorageAt",
            (
                token.address,
                balance_storage_slot(account, slot),
                H256::from(value),
            ),
        )
        .await
    }

    pub async fn snapshot(&self) -> Result<U256> {
        let id = self.provider().request("evm_snapshot", ()).await?;
        Ok(id)
    }

    pub async fn revert<U: Into<U256>>(&self, id: U) -> Result<()> {
        let reverted = self
            .provider()
            .request::<[U256; 1], bool>("evm_revert", [id.into()])
            .await?;
        if !reverted {
            return Err(eyre!("failed to revert to snapshot"));
        }
        Ok(())
    }

    // Anvil has answered these calls with both `null` and `true` over time, so
    // the result is ignored.
    async fn anvil<P>(&self, method: &str, params: P) -> Result<()>
    where
        P: Serialize + Send + Sync + Debug,
    {
        self.provider().request::<P, Value>(method, params).await?;
        Ok(())
    }
}

/// The storage slot of `balances[account]` for a Solidity mapping stored at
/// `mapping_slot`.
pub fn balance_storage_slot(account: Address, mapping_slot: u64) -> H256 {
    H256::from(keccak256(abi::encode(&[
        AbiToken::Address(account),
        AbiToken::Uint(mapping_slot.into()),
    ])))
}
