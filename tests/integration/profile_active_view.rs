use anyhow::Result;

use crate::IntegrationHarness;

#[test]
fn disabling_account_hides_profile_from_active_view() -> Result<()> {
    let harness = IntegrationHarness::new();
    let service = harness.service();

    let account = service.accounts.create_account("ansel")?;
    assert_eq!(service.profiles.all_profiles().len(), 1);
    assert_eq!(service.profiles.active_profiles().len(), 1);

    let before = service.profiles.for_owner(account.id).expect("provisioned");
    service.accounts.set_enabled(account.id, false)?;
    assert!(service.profiles.active_profiles().is_empty());
    assert_eq!(service.profiles.all_profiles().len(), 1);
    assert!(!service.profiles.is_active(&before));

    // The profile itself was not touched.
    assert_eq!(service.profiles.for_owner(account.id), Some(before));

    service.accounts.set_enabled(account.id, true)?;
    assert_eq!(service.profiles.active_profiles().len(), 1);
    Ok(())
}

#[test]
fn active_view_filters_per_account() -> Result<()> {
    let harness = IntegrationHarness::new();
    let service = harness.service();
    let names = ["alpha", "bravo", "charlie", "delta"];
    let accounts = names
        .iter()
        .map(|name| service.accounts.create_account(name))
        .collect::<imager_profile::Result<Vec<_>>>()?;

    service.accounts.set_enabled(accounts[1].id, false)?;
    service.accounts.set_enabled(accounts[3].id, false)?;

    let mut active: Vec<_> = service
        .profiles
        .active_profiles()
        .iter()
        .map(|profile| profile.owner())
        .collect();
    active.sort();
    let mut expected = vec![accounts[0].id, accounts[2].id];
    expected.sort();
    assert_eq!(active, expected);
    Ok(())
}
