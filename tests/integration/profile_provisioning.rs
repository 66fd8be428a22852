use anyhow::Result;
use imager_profile::config::StorageSettings;
use imager_profile::orchestration::EventLog;
use imager_profile::profiles::default_profile_fields;
use imager_profile::{
    AccountEvent, AccountEvents, AccountListener, AccountRegistry, ImagerService,
    PhotographyStyle, ProfileDefaults, ProfileError, ProfileStore, ProvisioningListener,
    SocialStatus, WorkspacePaths,
};
use std::fs;
use std::sync::Arc;

use crate::support::{block_profile_writes, block_table_writes, BlockAccountWrites};
use crate::IntegrationHarness;

#[test]
fn created_account_has_exactly_one_default_profile() -> Result<()> {
    let harness = IntegrationHarness::new();
    let service = harness.service();

    let account = service.accounts.create_account("ansel")?;
    let profiles = service.profiles.all_profiles();
    assert_eq!(profiles.len(), 1);

    let profile = &profiles[0];
    assert_eq!(profile.owner(), account.id);
    assert!(service.profiles.is_active(profile));
    assert_eq!(profile.age, 18);
    assert_eq!(profile.camera_type, "Kodak");
    assert_eq!(profile.photography_style, PhotographyStyle::Portrait);
    assert_eq!(profile.social_status, SocialStatus::Peasant);
    assert!(profile.location.is_empty());
    assert!(profile.job.is_empty());
    assert!(profile.url.is_empty());
    Ok(())
}

#[test]
fn redelivered_creation_event_is_a_no_op() -> Result<()> {
    let harness = IntegrationHarness::new();
    let service = harness.service();
    let account = service.accounts.create_account("dorothea")?;

    let listener = ProvisioningListener::new(service.profiles.clone());
    listener.on_account_event(&AccountEvent::Created(account.clone()))?;
    assert_eq!(service.profiles.all_profiles().len(), 1);

    // A direct create still reports the duplicate.
    assert!(matches!(
        service.profiles.create(account.id),
        Err(ProfileError::DuplicateProfile { .. })
    ));
    Ok(())
}

#[test]
fn storage_failure_aborts_account_creation() -> Result<()> {
    let harness = IntegrationHarness::new();
    let service = harness.service();
    block_profile_writes(&service);

    let err = service.accounts.create_account("vivian").unwrap_err();
    assert!(matches!(err, ProfileError::StorageUnavailable { .. }));
    assert!(service.accounts.find_by_username("vivian").is_none());
    assert!(service.accounts.list().is_empty());
    assert!(service.profiles.all_profiles().is_empty());
    Ok(())
}

#[test]
fn failed_rollback_still_hides_the_account() -> Result<()> {
    let harness = IntegrationHarness::new();
    let paths = WorkspacePaths::new(harness.workspace_path());
    let storage = StorageSettings::default();
    let accounts_table = paths.data_dir.join(&storage.accounts_file);
    let profiles_table = paths.data_dir.join(&storage.profiles_file);

    let events = Arc::new(AccountEvents::new());
    let accounts = Arc::new(AccountRegistry::open(&accounts_table, Arc::clone(&events))?);
    let profiles = Arc::new(ProfileStore::open(
        &profiles_table,
        accounts.clone(),
        default_profile_fields(&ProfileDefaults::default())?,
        EventLog::new(paths.data_dir.join(&storage.events_file)),
    )?);
    events.subscribe(Arc::new(BlockAccountWrites {
        accounts_table: accounts_table.clone(),
    }));
    events.subscribe(Arc::new(ProvisioningListener::new(Arc::clone(&profiles))));
    let profile_blocker = block_table_writes(&profiles_table);

    let err = accounts.create_account("vivian").unwrap_err();
    assert!(matches!(err, ProfileError::StorageUnavailable { .. }));
    assert!(
        err.to_string().contains("profiles.json.tmp"),
        "expected the provisioning error, got: {err}"
    );
    assert!(accounts.find_by_username("vivian").is_none());
    assert!(accounts.list().is_empty());
    assert!(profiles.all_profiles().is_empty());

    // The row left on disk is provisioned once storage is back.
    fs::remove_dir(&profile_blocker)?;
    fs::remove_dir(accounts_table.with_extension("json.tmp"))?;
    let reopened = ImagerService::open(harness.workspace_path())?;
    let account = reopened
        .accounts
        .find_by_username("vivian")
        .expect("unrolled account row is still on disk");
    assert!(reopened.profiles.for_owner(account.id).is_some());
    Ok(())
}

#[test]
fn deleting_account_cascades_to_profile() -> Result<()> {
    let harness = IntegrationHarness::new();
    let service = harness.service();
    let keep = service.accounts.create_account("keep")?;
    let gone = service.accounts.create_account("gone")?;

    service.accounts.delete_account(gone.id)?;
    let profiles = service.profiles.all_profiles();
    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0].owner(), keep.id);
    Ok(())
}

#[test]
fn shutdown_detaches_provisioning() -> Result<()> {
    let harness = IntegrationHarness::new();
    let mut service = harness.service();
    assert!(service.is_provisioning());
    assert!(service.shutdown());
    assert!(!service.shutdown());

    let account = service.accounts.create_account("late")?;
    assert!(service.profiles.for_owner(account.id).is_none());

    // Backfill repairs accounts created while provisioning was detached.
    let created = service.profiles.backfill(&service.accounts.list())?;
    assert_eq!(created, 1);
    assert!(service.profiles.for_owner(account.id).is_some());
    Ok(())
}

#[test]
fn state_survives_reopen() -> Result<()> {
    let harness = IntegrationHarness::new();
    let account = {
        let service = harness.service();
        service.accounts.create_account("imogen")?
    };
    let reopened = ImagerService::open(harness.workspace_path())?;
    let profile = reopened
        .profiles
        .for_owner(account.id)
        .expect("profile should persist across restarts");
    assert!(reopened.profiles.is_active(&profile));

    let events = reopened.profiles.event_log().load_events()?;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].owner, account.id);
    Ok(())
}
