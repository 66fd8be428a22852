use anyhow::Result;
use imager_profile::profiles::ProfileFieldChange;
use imager_profile::{PhotographyStyle, ProfileError, ProfileUpdate, SocialStatus};

use crate::IntegrationHarness;

#[test]
fn field_changes_update_profile_and_summary() -> Result<()> {
    let harness = IntegrationHarness::new();
    let service = harness.service();
    let account = service.accounts.create_account("dorothea")?;
    let profile = service.profiles.for_owner(account.id).expect("provisioned");

    let changes = [
        "location=Hoboken",
        "camera=Graflex",
        "job=Documentarian",
        "style=mono",
        "status=Knight",
        "url=https://imager.example/dorothea",
    ]
    .iter()
    .map(|raw| ProfileFieldChange::parse(raw))
    .collect::<imager_profile::Result<Vec<_>>>()?;
    let update = ProfileUpdate::from_field_changes(&changes)?;
    let updated = service.profiles.update(profile.id, &update)?;

    assert_eq!(updated.photography_style, PhotographyStyle::Monochrome);
    assert_eq!(updated.social_status, SocialStatus::Knight);
    assert_eq!(updated.owner(), account.id);
    assert_eq!(
        service.profiles.describe(&updated),
        "(Username: dorothea, Location: Hoboken, Age: 18, Camera Type: Graflex, \
         Job: Documentarian, Social Status: KNIGHT, Style: MONO, \
         URL: https://imager.example/dorothea)"
    );
    Ok(())
}

#[test]
fn out_of_set_style_is_rejected_without_change() -> Result<()> {
    let harness = IntegrationHarness::new();
    let service = harness.service();
    let account = service.accounts.create_account("ansel")?;
    let profile = service.profiles.for_owner(account.id).expect("provisioned");

    let update = ProfileUpdate {
        location: Some("Yosemite".into()),
        photography_style: Some("Panoramic".into()),
        ..ProfileUpdate::default()
    };
    let err = service.profiles.update(profile.id, &update).unwrap_err();
    assert!(matches!(err, ProfileError::InvalidEnumValue { .. }));

    let stored = service.profiles.get(profile.id).expect("still stored");
    assert_eq!(stored.photography_style, PhotographyStyle::Portrait);
    assert!(stored.location.is_empty());
    Ok(())
}

#[test]
fn profile_is_gone_after_account_deletion() -> Result<()> {
    let harness = IntegrationHarness::new();
    let service = harness.service();
    let account = service.accounts.create_account("ansel")?;
    let profile = service.profiles.for_owner(account.id).expect("provisioned");
    service.accounts.delete_account(account.id)?;

    let update = ProfileUpdate {
        job: Some("Ranger".into()),
        ..ProfileUpdate::default()
    };
    assert!(matches!(
        service.profiles.update(profile.id, &update),
        Err(ProfileError::ProfileNotFound(_))
    ));
    assert!(matches!(
        service.profiles.create(account.id),
        Err(ProfileError::UnknownOwner(_))
    ));
    Ok(())
}
