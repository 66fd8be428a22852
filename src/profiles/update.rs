//! Partial attribute updates and field validation.
//!
//! Enumerated values travel as raw text so they are checked at write time.
//! There is no owner field.

use crate::error::{ProfileError, Result};

use super::model::{PhotographyStyle, Profile, SocialStatus};

pub const MAX_TEXT_LENGTH: usize = 255;
pub const MAX_URL_LENGTH: usize = 200;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileUpdate {
    pub location: Option<String>,
    pub age: Option<i32>,
    pub camera_type: Option<String>,
    pub job: Option<String>,
    pub url: Option<String>,
    pub photography_style: Option<String>,
    pub social_status: Option<String>,
}

/// A single `field=value` change as typed by a caller.
#[derive(Debug, Clone)]
pub struct ProfileFieldChange {
    pub field: String,
    pub value: String,
}

impl ProfileFieldChange {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Parses `field=value`.
    pub fn parse(raw: &str) -> Result<Self> {
        let (field, value) = raw.split_once('=').ok_or_else(|| {
            ProfileError::InvalidFieldValue {
                field: "change",
                reason: format!("expected field=value, got '{raw}'"),
            }
        })?;
        Ok(Self::new(field.trim(), value.trim()))
    }
}

impl ProfileUpdate {
    pub fn from_field_changes(changes: &[ProfileFieldChange]) -> Result<Self> {
        let mut update = Self::default();
        for change in changes {
            let value = change.value.clone();
            match change.field.trim().to_ascii_lowercase().as_str() {
                "location" => update.location = Some(value),
                "age" => {
                    let age = value.trim().parse::<i32>().map_err(|_| {
                        ProfileError::InvalidFieldValue {
                            field: "age",
                            reason: format!("'{value}' is not a whole number"),
                        }
                    })?;
                    update.age = Some(age);
                }
                "camera" | "camera_type" => update.camera_type = Some(value),
                "job" => update.job = Some(value),
                "url" | "external_url" => update.url = Some(value),
                "style" | "photography_style" => update.photography_style = Some(value),
                "status" | "social_status" => update.social_status = Some(value),
                other => {
                    return Err(ProfileError::InvalidFieldValue {
                        field: "change",
                        reason: format!("unknown profile field '{other}'"),
                    })
                }
            }
        }
        Ok(update)
    }

    /// Validates every field, then applies them all. On error the profile
    /// is left untouched.
    pub fn apply(&self, profile: &mut Profile) -> Result<Vec<&'static str>> {
        let style = self
            .photography_style
            .as_deref()
            .map(str::parse::<PhotographyStyle>)
            .transpose()?;
        let status = self
            .social_status
            .as_deref()
            .map(str::parse::<SocialStatus>)
            .transpose()?;
        if let Some(location) = &self.location {
            validate_text("location", location)?;
        }
        if let Some(camera_type) = &self.camera_type {
            validate_text("camera type", camera_type)?;
        }
        if let Some(job) = &self.job {
            validate_text("job", job)?;
        }
        if let Some(url) = &self.url {
            validate_url(url)?;
        }
        if let Some(age) = self.age {
            validate_age(age)?;
        }

        let mut changed = Vec::new();
        if let Some(location) = &self.location {
            profile.location = location.clone();
            changed.push("location");
        }
        if let Some(age) = self.age {
            profile.age = age;
            changed.push("age");
        }
        if let Some(camera_type) = &self.camera_type {
            profile.camera_type = camera_type.clone();
            changed.push("camera_type");
        }
        if let Some(job) = &self.job {
            profile.job = job.clone();
            changed.push("job");
        }
        if let Some(url) = &self.url {
            profile.url = url.clone();
            changed.push("url");
        }
        if let Some(style) = style {
            profile.photography_style = style;
            changed.push("photography_style");
        }
        if let Some(status) = status {
            profile.social_status = status;
            changed.push("social_status");
        }
        Ok(changed)
    }
}

pub(crate) fn validate_text(field: &'static str, value: &str) -> Result<()> {
    let len = value.chars().count();
    if len > MAX_TEXT_LENGTH {
        return Err(ProfileError::InvalidFieldValue {
            field,
            reason: format!("{len} characters exceeds the limit of {MAX_TEXT_LENGTH}"),
        });
    }
    Ok(())
}

pub(crate) fn validate_age(age: i32) -> Result<()> {
    if age < 0 {
        return Err(ProfileError::InvalidFieldValue {
            field: "age",
            reason: format!("{age} is negative"),
        });
    }
    Ok(())
}

/// Empty is allowed; otherwise an http(s) URL with a host.
pub(crate) fn validate_url(url: &str) -> Result<()> {
    if url.is_empty() {
        return Ok(());
    }
    let invalid = |reason: String| ProfileError::InvalidFieldValue { field: "url", reason };
    let len = url.chars().count();
    if len > MAX_URL_LENGTH {
        return Err(invalid(format!(
            "{len} characters exceeds the limit of {MAX_URL_LENGTH}"
        )));
    }
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .ok_or_else(|| invalid(format!("'{url}' must start with http:// or https://")))?;
    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    if host.is_empty() || host.chars().any(char::is_whitespace) {
        return Err(invalid(format!("'{url}' has no valid host")));
    }
    Ok(())
}
