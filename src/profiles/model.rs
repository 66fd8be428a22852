//! Data structures backing Imager profiles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::accounts::AccountDirectory;
use crate::error::ProfileError;

/// Photography style a user prefers. Persisted as its short code.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum PhotographyStyle {
    #[serde(rename = "MONO")]
    Monochrome,
    #[serde(rename = "MACRO")]
    Macro,
    #[serde(rename = "MICRO")]
    Micro,
    #[default]
    #[serde(rename = "PORTRAIT")]
    Portrait,
    #[serde(rename = "LANDSCAPE")]
    Landscape,
}

impl PhotographyStyle {
    pub const ALL: [PhotographyStyle; 5] = [
        Self::Monochrome,
        Self::Macro,
        Self::Micro,
        Self::Portrait,
        Self::Landscape,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Self::Monochrome => "MONO",
            Self::Macro => "MACRO",
            Self::Micro => "MICRO",
            Self::Portrait => "PORTRAIT",
            Self::Landscape => "LANDSCAPE",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Monochrome => "Monochrome",
            Self::Macro => "Macro",
            Self::Micro => "Micro",
            Self::Portrait => "Portrait",
            Self::Landscape => "Landscape",
        }
    }
}

impl FromStr for PhotographyStyle {
    type Err = ProfileError;

    /// Accepts either the stored code or the display label, ignoring case.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let needle = raw.trim();
        Self::ALL
            .into_iter()
            .find(|style| {
                style.code().eq_ignore_ascii_case(needle)
                    || style.label().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| ProfileError::InvalidEnumValue {
                field: "photography style",
                value: raw.to_string(),
            })
    }
}

impl fmt::Display for PhotographyStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Social standing shown on a profile. Persisted as its short code.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum SocialStatus {
    #[default]
    #[serde(rename = "PEASANT")]
    Peasant,
    #[serde(rename = "BANDIT")]
    Bandit,
    #[serde(rename = "YEOMAN")]
    Yeoman,
    #[serde(rename = "MANATARMS")]
    ManAtArms,
    #[serde(rename = "KNIGHT")]
    Knight,
    #[serde(rename = "ROYALTY")]
    Royalty,
    #[serde(rename = "WIZARD")]
    Wizard,
}

impl SocialStatus {
    pub const ALL: [SocialStatus; 7] = [
        Self::Peasant,
        Self::Bandit,
        Self::Yeoman,
        Self::ManAtArms,
        Self::Knight,
        Self::Royalty,
        Self::Wizard,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Self::Peasant => "PEASANT",
            Self::Bandit => "BANDIT",
            Self::Yeoman => "YEOMAN",
            Self::ManAtArms => "MANATARMS",
            Self::Knight => "KNIGHT",
            Self::Royalty => "ROYALTY",
            Self::Wizard => "WIZARD",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Peasant => "Peasant",
            Self::Bandit => "Bandit",
            Self::Yeoman => "Yeoman",
            Self::ManAtArms => "Man-at-arms",
            Self::Knight => "Knight",
            Self::Royalty => "Royalty",
            Self::Wizard => "Wizard",
        }
    }
}

impl FromStr for SocialStatus {
    type Err = ProfileError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let needle = raw.trim();
        Self::ALL
            .into_iter()
            .find(|status| {
                status.code().eq_ignore_ascii_case(needle)
                    || status.label().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| ProfileError::InvalidEnumValue {
                field: "social status",
                value: raw.to_string(),
            })
    }
}

impl fmt::Display for SocialStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Supplementary attributes attached to exactly one account.
///
/// `owner` is private so it cannot be reassigned once the profile exists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub id: Uuid,
    owner: Uuid,
    pub location: String,
    pub age: i32,
    pub camera_type: String,
    pub job: String,
    pub url: String,
    pub photography_style: PhotographyStyle,
    pub social_status: SocialStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub(crate) fn new(owner: Uuid, fields: ProfileFields) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner,
            location: fields.location,
            age: fields.age,
            camera_type: fields.camera_type,
            job: fields.job,
            url: fields.url,
            photography_style: fields.photography_style,
            social_status: fields.social_status,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn owner(&self) -> Uuid {
        self.owner
    }

    /// Whether the owning account is currently enabled. A missing owner
    /// counts as not enabled.
    pub fn is_active(&self, accounts: &dyn AccountDirectory) -> bool {
        accounts
            .get(self.owner)
            .map(|account| account.enabled)
            .unwrap_or(false)
    }
}

/// Attribute values used when constructing a profile.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileFields {
    pub location: String,
    pub age: i32,
    pub camera_type: String,
    pub job: String,
    pub url: String,
    pub photography_style: PhotographyStyle,
    pub social_status: SocialStatus,
}
