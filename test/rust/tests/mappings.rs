use dsa_addresses::Addresses;
use dsa_connectors::{ChainDeployer, ContractDeployer};
use dsa_wrappers::wrappers::insta_mapping_controller::{
    InstaMappingController, RoleGrantedFilter, RoleRevokedFilter,
};
use ethers::{
    contract::{ContractCall, ContractError},
    prelude::EthLogDecode,
    providers::Middleware,
    types::{Address, TransactionReceipt, U256},
};
use eyre::{eyre, Result};
use test_utils::{
    constants::FORK_BLOCK_NUMBER,
    dsa::{load_artifact, master_signer},
    TestChain,
};

// The mapping controller is keyed by addresses. The tests use the index
// address as the role.
const TEST_ROLE: &str = "0x2971AdFa57b20E5a416aE5a708A8655A9c74f723";

fn revert_reason<M: Middleware>(err: &ContractError<M>) -> String {
    err.decode_revert::<String>().unwrap_or_default()
}

fn decode_event<E: EthLogDecode>(receipt: &TransactionReceipt) -> Option<E> {
    receipt
        .logs
        .iter()
        .find_map(|log| E::decode_log(&log.clone().into()).ok())
}

async fn expect_revert<M: Middleware + 'static>(
    call: ContractCall<M, ()>,
    reason: &str,
) -> Result<()> {
    match call.send().await {
        Ok(_) => Err(eyre!("expected a revert with {:?}", reason)),
        Err(err) => {
            assert_eq!(revert_reason(&err), reason);
            Ok(())
        }
    }
}

// NOTE: This needs an archive node through ALCHEMY_ID and the compiled
// contracts.
#[ignore]
#[tokio::test]
async fn test_mapping_controller_roles() -> Result<()> {
    // Set up the logger.
    let _ = tracing_subscriber::fmt::try_init();

    // Fork mainnet and deploy a mapping controller.
    let chain = TestChain::fork(FORK_BLOCK_NUMBER).await?;
    let addresses = Addresses::mainnet();
    let master = master_signer(&chain, &addresses).await?;
    let master_address = master
        .default_sender()
        .ok_or_else(|| eyre!("master provider has no sender"))?;
    let account = chain.client(chain.accounts()[0].clone()).await?;
    let role: Address = TEST_ROLE.parse()?;

    let gas_price = chain.provider().get_gas_price().await?;
    let deployed = ChainDeployer::new(account.clone())
        .deploy(&load_artifact("InstaMappingController")?, gas_price)
        .await?;
    let as_master = InstaMappingController::new(deployed.address, master.clone());
    let as_account = InstaMappingController::new(deployed.address, account.clone());
    let snapshot = chain.snapshot().await?;

    // Only the master can grant and revoke roles.
    expect_revert(
        as_account.grant_role(role, account.address()),
        "MappingController: sender must be master",
    )
    .await?;
    expect_revert(
        as_account.revoke_role(role, account.address()),
        "MappingController: sender must be master",
    )
    .await?;
    assert!(!as_master.has_role(role, account.address()).call().await?);

    // Granting a role emits `RoleGranted`.
    let receipt = as_master
        .grant_role(role, account.address())
        .send()
        .await?
        .await?
        .ok_or_else(|| eyre!("grant was dropped"))?;
    let granted = decode_event::<RoleGrantedFilter>(&receipt)
        .ok_or_else(|| eyre!("no RoleGranted event"))?;
    assert_eq!((granted.role, granted.account), (role, account.address()));
    assert!(as_master.has_role(role, account.address()).call().await?);

    // Revoking a role emits `RoleRevoked` with the master as the sender.
    let receipt = as_master
        .revoke_role(role, account.address())
        .send()
        .await?
        .await?
        .ok_or_else(|| eyre!("revoke was dropped"))?;
    let revoked = decode_event::<RoleRevokedFilter>(&receipt)
        .ok_or_else(|| eyre!("no RoleRevoked event"))?;
    assert_eq!(
        (revoked.role, revoked.account, revoked.sender),
        (role, account.address(), master_address)
    );
    assert!(!as_master.has_role(role, account.address()).call().await?);
    chain.revert(snapshot).await?;
    let snapshot = chain.snapshot().await?;

    // Roles can only be renounced by their holder.
    as_master
        .grant_role(role, account.address())
        .send()
        .await?
        .await?;
    expect_revert(
        as_master.renounce_role(role, account.address()),
        "MappingController: can only renounce roles for self",
    )
    .await?;
    let receipt = as_account
        .renounce_role(role, account.address())
        .send()
        .await?
        .await?
        .ok_or_else(|| eyre!("renounce was dropped"))?;
    let revoked = decode_event::<RoleRevokedFilter>(&receipt)
        .ok_or_else(|| eyre!("no RoleRevoked event"))?;
    assert_eq!(revoked.sender, account.address());
    assert!(!as_master.has_role(role, account.address()).call().await?);
    chain.revert(snapshot).await?;
    let snapshot = chain.snapshot().await?;

    // Member counts follow grants and revocations.
    assert_eq!(as_master.get_role_member_count(role).call().await?, U256::from(0));
    as_master
        .grant_role(role, account.address())
        .send()
        .await?
        .await?;
    assert_eq!(as_master.get_role_member_count(role).call().await?, U256::from(1));
    as_master.grant_role(role, master_address).send().await?.await?;
    assert_eq!(as_master.get_role_member_count(role).call().await?, U256::from(2));
    as_master
        .revoke_role(role, master_address)
        .send()
        .await?
        .await?;
    assert_eq!(as_master.get_role_member_count(role).call().await?, U256::from(1));
    chain.revert(snapshot).await?;

    // Members are indexed in the order they were granted.
    let out_of_bounds = "EnumerableSet: index out of bounds";
    let err = as_master
        .get_role_member(role, 0.into())
        .call()
        .await
        .err()
        .ok_or_else(|| eyre!("expected an empty role"))?;
    assert_eq!(revert_reason(&err), out_of_bounds);
    as_master
        .grant_role(role, account.address())
        .send()
        .await?
        .await?;
    assert_eq!(
        as_master.get_role_member(role, 0.into()).call().await?,
        account.address()
    );
    as_master.grant_role(role, master_address).send().await?.await?;
    assert_eq!(
        as_master.get_role_member(role, 1.into()).call().await?,
        master_address
    );
    as_master
        .revoke_role(role, master_address)
        .send()
        .await?
        .await?;
    let err = as_master
        .get_role_member(role, 1.into())
        .call()
        .await
        .err()
        .ok_or_else(|| eyre!("expected a single member"))?;
    assert_eq!(revert_reason(&err), out_of_bounds);

    chain.stop_impersonating(master_address).await?;
    Ok(())
}
