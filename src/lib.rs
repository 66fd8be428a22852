pub mod accounts;
pub mod config;
pub mod error;
pub mod orchestration;
pub mod profiles;
pub mod service;

// Re-export commonly used types for convenience.
pub use accounts::{Account, AccountDirectory, AccountRegistry};
pub use config::{ImagerConfig, ProfileDefaults, WorkspacePaths};
pub use error::{ProfileError, Result};
pub use orchestration::{AccountEvent, AccountEvents, AccountListener, ProvisioningListener};
pub use profiles::{PhotographyStyle, Profile, ProfileStore, ProfileUpdate, SocialStatus};
pub use service::ImagerService;
