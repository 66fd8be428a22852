use crate::config::ProfileDefaults;
use crate::error::Result;

use super::model::ProfileFields;
use super::update::{validate_age, validate_text, validate_url};

/// Resolves the configured defaults into concrete, validated attribute values.
pub fn default_profile_fields(defaults: &ProfileDefaults) -> Result<ProfileFields> {
    validate_text("location", &defaults.location)?;
    validate_text("camera type", &defaults.camera_type)?;
    validate_text("job", &defaults.job)?;
    validate_url(&defaults.url)?;
    validate_age(defaults.age)?;
    Ok(ProfileFields {
        location: defaults.location.clone(),
        age: defaults.age,
        camera_type: defaults.camera_type.clone(),
        job: defaults.job.clone(),
        url: defaults.url.clone(),
        photography_style: defaults.photography_style()?,
        social_status: defaults.social_status()?,
    })
}
