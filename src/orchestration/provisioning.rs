//! Automatic profile provisioning for new accounts.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::profiles::ProfileStore;

use super::{AccountEvent, AccountListener};

/// Gives every created account its profile and removes the profile when the
/// account is deleted. Holds no state of its own.
pub struct ProvisioningListener {
    store: Arc<ProfileStore>,
}

impl ProvisioningListener {
    pub fn new(store: Arc<ProfileStore>) -> Self {
        Self { store }
    }
}

impl AccountListener for ProvisioningListener {
    fn name(&self) -> &'static str {
        "profile-provisioning"
    }

    fn on_account_event(&self, event: &AccountEvent) -> Result<()> {
        match event {
            AccountEvent::Created(account) => match self.store.create(account.id) {
                Ok(profile) => {
                    info!(account = %account.id, profile = %profile.id, "profile provisioned");
                    Ok(())
                }
                Err(err) if err.is_duplicate() => {
                    debug!(account = %account.id, "profile already provisioned");
                    Ok(())
                }
                Err(err) => {
                    warn!(account = %account.id, error = %err, "profile provisioning failed");
                    Err(err)
                }
            },
            AccountEvent::Deleted(account) => {
                if let Some(profile) = self.store.delete_for_owner(account.id)? {
                    info!(account = %account.id, profile = %profile.id, "profile removed with account");
                }
                Ok(())
            }
        }
    }
}
