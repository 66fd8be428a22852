//! Error kinds surfaced by the profile store, provisioning, and configuration.

use thiserror::Error;
use uuid::Uuid;

pub type Result<T> = std::result::Result<T, ProfileError>;

#[derive(Debug, Error)]
pub enum ProfileError {
    /// The owner already has a profile.
    #[error("account {owner} already has a profile")]
    DuplicateProfile { owner: Uuid },

    /// The referenced account does not exist.
    #[error("account {0} does not exist")]
    UnknownOwner(Uuid),

    #[error("profile {0} not found")]
    ProfileNotFound(Uuid),

    /// An enumerated field was given a value outside its fixed set.
    #[error("'{value}' is not a valid {field}")]
    InvalidEnumValue { field: &'static str, value: String },

    #[error("invalid {field}: {reason}")]
    InvalidFieldValue { field: &'static str, reason: String },

    #[error("invalid account: {0}")]
    InvalidAccount(String),

    #[error("configuration error: {0}")]
    Config(String),

    /// The persistence layer could not complete the operation.
    #[error("storage unavailable: {context}")]
    StorageUnavailable {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ProfileError {
    pub fn storage(
        context: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::StorageUnavailable {
            context: context.into(),
            source: source.into(),
        }
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateProfile { .. })
    }
}

/// Attaches a context message to I/O and serde failures, mapping them onto
/// [`ProfileError::StorageUnavailable`].
pub(crate) trait StorageContext<T> {
    fn storage_context<F, C>(self, context: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E> StorageContext<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn storage_context<F, C>(self, context: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|err| ProfileError::storage(context(), err))
    }
}
