//! The account side of the system: identities that profiles attach to.
//!
//! Profiles only ever read accounts through [`AccountDirectory`]. The
//! file-backed [`AccountRegistry`] owns account records and announces their
//! lifecycle on the shared [`AccountEvents`] stream.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{ProfileError, Result};
use crate::orchestration::{AccountEvent, AccountEvents};
use crate::profiles::storage::{read_table, write_table};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            enabled: true,
            created_at: Utc::now(),
        }
    }
}

/// Read access to current account state.
pub trait AccountDirectory: Send + Sync {
    /// Looks up an account; `None` when it does not exist (or was deleted).
    fn get(&self, id: Uuid) -> Option<Account>;
}

/// Persistent account records backed by a JSON file.
pub struct AccountRegistry {
    path: PathBuf,
    events: Arc<AccountEvents>,
    accounts: RwLock<Vec<Account>>,
}

impl AccountRegistry {
    pub fn open(path: impl Into<PathBuf>, events: Arc<AccountEvents>) -> Result<Self> {
        let path = path.into();
        let accounts: Vec<Account> = read_table(&path)?.unwrap_or_default();
        Ok(Self {
            path,
            events,
            accounts: RwLock::new(accounts),
        })
    }

    pub fn list(&self) -> Vec<Account> {
        self.read().clone()
    }

    pub fn find_by_username(&self, username: &str) -> Option<Account> {
        self.read()
            .iter()
            .find(|account| account.username == username)
            .cloned()
    }

    /// Stores a new account and announces it to every subscriber before
    /// returning. If a subscriber fails, the account is removed again and the
    /// subscriber's error is returned.
    ///
    /// The write lock is released before subscribers run, so a concurrent
    /// reader may briefly see the account before its profile exists. The
    /// caller of `create_account` always observes the fully provisioned state.
    pub fn create_account(&self, username: &str) -> Result<Account> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ProfileError::InvalidAccount("username is empty".into()));
        }
        let account = Account::new(username);
        {
            let mut accounts = self.write();
            if accounts.iter().any(|existing| existing.username == username) {
                return Err(ProfileError::InvalidAccount(format!(
                    "username '{username}' is taken"
                )));
            }
            accounts.push(account.clone());
            if let Err(err) = write_table(&self.path, &*accounts) {
                accounts.pop();
                return Err(err);
            }
        }
        info!(account = %account.id, username = %account.username, "account created");

        if let Err(err) = self.events.dispatch(&AccountEvent::Created(account.clone())) {
            warn!(account = %account.id, error = %err, "account creation rolled back");
            self.discard(account.id);
            return Err(err);
        }
        Ok(account)
    }

    pub fn set_enabled(&self, id: Uuid, enabled: bool) -> Result<Account> {
        let mut accounts = self.write();
        let account = accounts
            .iter_mut()
            .find(|account| account.id == id)
            .ok_or(ProfileError::UnknownOwner(id))?;
        let previous = account.enabled;
        account.enabled = enabled;
        let updated = account.clone();
        if let Err(err) = write_table(&self.path, &*accounts) {
            if let Some(account) = accounts.iter_mut().find(|account| account.id == id) {
                account.enabled = previous;
            }
            return Err(err);
        }
        info!(account = %id, enabled, "account status changed");
        Ok(updated)
    }

    /// Removes the account and announces the deletion so dependent records
    /// can cascade.
    pub fn delete_account(&self, id: Uuid) -> Result<Account> {
        let account = self.remove(id)?;
        info!(account = %id, "account deleted");
        self.events.dispatch(&AccountEvent::Deleted(account.clone()))?;
        Ok(account)
    }

    /// Drops the account from memory even if the table write fails, so a
    /// rolled-back account is never visible. The stale row left on disk is
    /// provisioned when the service next opens.
    fn discard(&self, id: Uuid) {
        let mut accounts = self.write();
        accounts.retain(|account| account.id != id);
        if let Err(err) = write_table(&self.path, &*accounts) {
            warn!(account = %id, error = %err, "failed to persist account rollback");
        }
    }

    fn remove(&self, id: Uuid) -> Result<Account> {
        let mut accounts = self.write();
        let index = accounts
            .iter()
            .position(|account| account.id == id)
            .ok_or(ProfileError::UnknownOwner(id))?;
        let account = accounts.remove(index);
        if let Err(err) = write_table(&self.path, &*accounts) {
            accounts.insert(index, account);
            return Err(err);
        }
        Ok(account)
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Account>> {
        self.accounts.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Account>> {
        self.accounts.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl AccountDirectory for AccountRegistry {
    fn get(&self, id: Uuid) -> Option<Account> {
        self.read().iter().find(|account| account.id == id).cloned()
    }
}
