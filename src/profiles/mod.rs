//! Imager profiles: the supplementary attributes attached to each account.
//!
//! Every account owns at most one profile. Profiles are created by the
//! provisioning listener when the account is created, changed through
//! [`ProfileStore::update`], and removed when their account is deleted.

pub mod defaults;
pub mod model;
pub mod render;
pub mod storage;
pub mod store;
pub mod update;

pub use defaults::default_profile_fields;
pub use model::{PhotographyStyle, Profile, ProfileFields, SocialStatus};
pub use render::describe_profile;
pub use store::ProfileStore;
pub use update::{ProfileFieldChange, ProfileUpdate};
