//! Startup and shutdown wiring for the profile subsystem.

use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::accounts::AccountRegistry;
use crate::config::{self, workspace_root, ImagerConfig, WorkspacePaths};
use crate::error::Result;
use crate::orchestration::{AccountEvents, EventLog, ProvisioningListener, SubscriptionId};
use crate::profiles::{default_profile_fields, ProfileStore};

/// Owns the account registry, the profile store, and the provisioning
/// subscription that links them.
pub struct ImagerService {
    pub config: ImagerConfig,
    pub paths: WorkspacePaths,
    pub accounts: Arc<AccountRegistry>,
    pub profiles: Arc<ProfileStore>,
    events: Arc<AccountEvents>,
    provisioning: Option<SubscriptionId>,
}

impl ImagerService {
    /// Opens the workspace under `root` and registers provisioning.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let paths = WorkspacePaths::new(root);
        paths.ensure()?;
        let config = config::load_or_default(&paths.config_file())?;
        let defaults = default_profile_fields(&config.profile_defaults)?;

        let events = Arc::new(AccountEvents::new());
        let accounts = Arc::new(AccountRegistry::open(
            paths.data_dir.join(&config.storage.accounts_file),
            Arc::clone(&events),
        )?);
        let profiles = Arc::new(ProfileStore::open(
            paths.data_dir.join(&config.storage.profiles_file),
            accounts.clone(),
            defaults,
            EventLog::new(paths.data_dir.join(&config.storage.events_file)),
        )?);
        // Accounts persisted without a profile (an interrupted rollback) get one now.
        profiles.backfill(&accounts.list())?;
        let provisioning =
            events.subscribe(Arc::new(ProvisioningListener::new(Arc::clone(&profiles))));
        info!(root = ?paths.root, "imager profile service started");

        Ok(Self {
            config,
            paths,
            accounts,
            profiles,
            events,
            provisioning: Some(provisioning),
        })
    }

    /// Opens the workspace resolved from `IMAGER_HOME` or the OS data dir.
    pub fn open_default() -> Result<Self> {
        Self::open(workspace_root()?)
    }

    pub fn is_provisioning(&self) -> bool {
        self.provisioning.is_some()
    }

    /// Detaches provisioning. Returns false if it was already detached.
    pub fn shutdown(&mut self) -> bool {
        match self.provisioning.take() {
            Some(id) => {
                let removed = self.events.unsubscribe(id);
                info!("imager profile service stopped");
                removed
            }
            None => false,
        }
    }
}

impl Drop for ImagerService {
    fn drop(&mut self) {
        self.shutdown();
    }
}
