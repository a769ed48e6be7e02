use dsa_addresses::{Addresses, DAI, ETH, MAX_VALUE};
use dsa_connectors::{deploy_and_enable_connector, Spell};
use dsa_wrappers::wrappers::connect_v2_aave_v2::{
    BorrowCall, ConnectV2AaveV2Calls, DepositCall, PaybackCall, WithdrawCall,
};
use ethers::{
    providers::Middleware,
    signers::Signer,
    types::{TransactionRequest, U256},
    utils::parse_ether,
};
use eyre::Result;
use test_utils::{
    constants::FORK_BLOCK_NUMBER,
    dsa::{add_liquidity, build_dsa, cast_spells, load_artifact, master_signer},
    TestChain,
};

const CONNECTOR: &str = "AAVEV2-TEST-A";
const VARIABLE_RATE: u64 = 2;

fn deposit(amt: U256, get_id: u64, set_id: u64) -> Spell {
    Spell::aave_v2(
        CONNECTOR,
        ConnectV2AaveV2Calls::Deposit(DepositCall {
            token: ETH.address,
            amt,
            get_id: get_id.into(),
            set_id: set_id.into(),
        }),
    )
}

fn withdraw(amt: U256, get_id: u64, set_id: u64) -> Spell {
    Spell::aave_v2(
        CONNECTOR,
        ConnectV2AaveV2Calls::Withdraw(WithdrawCall {
            token: ETH.address,
            amt,
            get_id: get_id.into(),
            set_id: set_id.into(),
        }),
    )
}

fn borrow_dai(amt: U256, get_id: u64, set_id: u64) -> Spell {
    Spell::aave_v2(
        CONNECTOR,
        ConnectV2AaveV2Calls::Borrow(BorrowCall {
            token: DAI.address,
            amt,
            rate_mode: VARIABLE_RATE.into(),
            get_id: get_id.into(),
            set_id: set_id.into(),
        }),
    )
}

fn payback_dai(amt: U256, get_id: u64, set_id: u64) -> Spell {
    Spell::aave_v2(
        CONNECTOR,
        ConnectV2AaveV2Calls::Payback(PaybackCall {
            token: DAI.address,
            amt,
            rate_mode: VARIABLE_RATE.into(),
            get_id: get_id.into(),
            set_id: set_id.into(),
        }),
    )
}

// NOTE: This needs an archive node through ALCHEMY_ID and the compiled
// contracts.
#[ignore]
#[tokio::test]
async fn test_aave_v2() -> Result<()> {
    // Set up the logger.
    let _ = tracing_subscriber::fmt::try_init();

    // Fork mainnet and enable a fresh Aave v2 connector.
    let chain = TestChain::fork(FORK_BLOCK_NUMBER).await?;
    let addresses = Addresses::mainnet();
    let master = master_signer(&chain, &addresses).await?;
    let connector = deploy_and_enable_connector(
        master,
        addresses.connectors_v2,
        CONNECTOR,
        &load_artifact("ConnectV2AaveV2")?,
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
    let balance = chain.provider().get_balance(dsa.address(), None).await?;
    assert!(balance >= parse_ether(10)?);

    // Deposit 1 ether.
    cast_spells(&dsa, &[deposit(parse_ether(1)?, 0, 0)], origin).await?;
    let balance = chain.provider().get_balance(dsa.address(), None).await?;
    assert_eq!(balance, parse_ether(9)?);

    // Borrow DAI and pay all of it back through a set id.
    let amt = parse_ether(100)?;
    let set_id = 83478237;
    cast_spells(
        &dsa,
        &[borrow_dai(amt, 0, set_id), payback_dai(amt, set_id, 0)],
        origin,
    )
    .await?;
    let balance = chain.provider().get_balance(dsa.address(), None).await?;
    assert!(balance <= parse_ether(9)?);

    // Borrow DAI, pay half of it back and then pay back the rest. The extra
    // DAI covers the interest.
    add_liquidity(&chain, &DAI, dsa.address(), parse_ether(1)?).await?;
    cast_spells(
        &dsa,
        &[borrow_dai(amt, 0, 0), payback_dai(amt / 2, 0, 0)],
        origin,
    )
    .await?;
    cast_spells(&dsa, &[payback_dai(MAX_VALUE, 0, 0)], origin).await?;
    let balance = chain.provider().get_balance(dsa.address(), None).await?;
    assert!(balance <= parse_ether(9)?);

    // Deposit all of the remaining ether.
    cast_spells(&dsa, &[deposit(MAX_VALUE, 0, 0)], origin).await?;
    let balance = chain.provider().get_balance(dsa.address(), None).await?;
    assert_eq!(balance, U256::zero());

    // Withdraw everything.
    cast_spells(&dsa, &[withdraw(MAX_VALUE, 0, 0)], origin).await?;
    let balance = chain.provider().get_balance(dsa.address(), None).await?;
    assert!(balance >= parse_ether(10)?);

    // Deposit and withdraw in one cast through a set id.
    let set_id = 834782373;
    cast_spells(
        &dsa,
        &[
            deposit(parse_ether(1)?, 0, set_id),
            withdraw(parse_ether(1)?, set_id, 0),
        ],
        origin,
    )
    .await?;
    let balance = chain.provider().get_balance(dsa.address(), None).await?;
    assert!(balance >= parse_ether(10)?);

    Ok(())
}
