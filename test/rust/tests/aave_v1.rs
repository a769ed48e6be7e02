use dsa_addresses::{Addresses, DAI, ETH, MAX_VALUE};
use dsa_connectors::{deploy_and_enable_connector, Spell};
use dsa_wrappers::wrappers::connect_v2_aave_v1::{
    BorrowCall, ConnectV2AaveV1Calls, DepositCall, PaybackCall, WithdrawCall,
};
use ethers::{
    providers::Middleware,
    signers::Signer,
    types::{Address, TransactionRequest, U256},
    utils::parse_ether,
};
use eyre::Result;
use test_utils::{
    constants::FORK_BLOCK_NUMBER,
    dsa::{add_liquidity, build_dsa, cast_spells, load_artifact, master_signer},
    TestChain,
};

const CONNECTOR: &str = "AAVEV1-TEST-A";

fn spell(call: ConnectV2AaveV1Calls) -> Spell {
    Spell::aave_v1(CONNECTOR, call)
}

fn eth_deposit(amt: U256) -> Spell {
    spell(ConnectV2AaveV1Calls::Deposit(DepositCall {
        token: ETH.address,
        amt,
        get_id: 0.into(),
        set_id: 0.into(),
    }))
}

fn eth_withdraw(amt: U256) -> Spell {
    spell(ConnectV2AaveV1Calls::Withdraw(WithdrawCall {
        token: ETH.address,
        amt,
        get_id: 0.into(),
        set_id: 0.into(),
    }))
}

async fn eth_balance<M: Middleware + 'static>(client: &M, address: Address) -> Result<U256> {
    Ok(client.get_balance(address, None).await?)
}

// NOTE: This needs an archive node through ALCHEMY_ID and the compiled
// contracts.
#[ignore]
#[tokio::test]
async fn test_aave_v1() -> Result<()> {
    // Set up the logger.
    let _ = tracing_subscriber::fmt::try_init();

    // Fork mainnet and enable a fresh Aave v1 connector.
    let chain = TestChain::fork(FORK_BLOCK_NUMBER).await?;
    let addresses = Addresses::mainnet();
    let master = master_signer(&chain, &addresses).await?;
    let connector = deploy_and_enable_connector(
        master,
        addresses.connectors_v2,
        CONNECTOR,
        &load_artifact("ConnectV2AaveV1")?,
        None,
    )
    .await?;
    assert!(!connector.address.is_zero());

    // Build a DSA for the first account and fund it with 10 ether.
    let client = chain.client(chain.accounts()[0].clone()).await?;
    let origin = chain.accounts()[1].address();
    let dsa = build_dsa(client.clone(), &addresses, client.address()).await?;
    client
        .send_transaction(
            TransactionRequest::new()
                .to(dsa.address())
                .value(parse_ether(10)?),
            None,
        )
        .await?
        .await?;
    assert!(eth_balance(client.as_ref(), dsa.address()).await? >= parse_ether(10)?);

    // Deposit 1 ether.
    cast_spells(&dsa, &[eth_deposit(parse_ether(1)?)], origin).await?;
    assert_eq!(
        eth_balance(client.as_ref(), dsa.address()).await?,
        parse_ether(9)?
    );

    // Borrow 100 DAI and pay back the whole debt in the same cast. The debt
    // includes the origination fee, so the DSA needs some DAI of its own.
    add_liquidity(&chain, &DAI, dsa.address(), parse_ether(1)?).await?;
    let borrow = spell(ConnectV2AaveV1Calls::Borrow(BorrowCall {
        token: DAI.address,
        amt: parse_ether(100)?,
        get_id: 0.into(),
        set_id: 0.into(),
    }));
    let payback = spell(ConnectV2AaveV1Calls::Payback(PaybackCall {
        token: DAI.address,
        amt: MAX_VALUE,
        get_id: 0.into(),
        set_id: 0.into(),
    }));
    cast_spells(&dsa, &[borrow, payback], origin).await?;
    assert!(eth_balance(client.as_ref(), dsa.address()).await? <= parse_ether(9)?);

    // Deposit all of the remaining ether.
    cast_spells(&dsa, &[eth_deposit(MAX_VALUE)], origin).await?;
    assert_eq!(
        eth_balance(client.as_ref(), dsa.address()).await?,
        U256::zero()
    );

    // Withdraw everything.
    cast_spells(&dsa, &[eth_withdraw(MAX_VALUE)], origin).await?;
    assert!(eth_balance(client.as_ref(), dsa.address()).await? >= parse_ether(10)?);

    Ok(())
}
