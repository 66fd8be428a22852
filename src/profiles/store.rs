use rayon::prelude::*;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::accounts::{Account, AccountDirectory};
use crate::error::{ProfileError, Result};
use crate::orchestration::{EventLog, ProfileEvent, ProfileEventType};

use super::model::{Profile, ProfileFields};
use super::render::describe_profile;
use super::storage::write_table;
use super::update::ProfileUpdate;

/// Owns every profile and enforces one profile per account.
///
/// The table lives in memory behind a mutex and is written through to a JSON
/// file on every mutation. A failed write restores the previous in-memory
/// state before the error is returned.
pub struct ProfileStore {
    path: PathBuf,
    accounts: Arc<dyn AccountDirectory>,
    defaults: ProfileFields,
    log: EventLog,
    table: Mutex<Vec<Profile>>,
}

impl ProfileStore {
    pub fn open(
        path: impl Into<PathBuf>,
        accounts: Arc<dyn AccountDirectory>,
        defaults: ProfileFields,
        log: EventLog,
    ) -> Result<Self> {
        let path = path.into();
        let profiles: Vec<Profile> = super::storage::read_table(&path)?.unwrap_or_default();
        debug!(count = profiles.len(), path = ?path, "profile table loaded");
        Ok(Self {
            path,
            accounts,
            defaults,
            log,
            table: Mutex::new(profiles),
        })
    }

    /// Creates the owner's profile with default attribute values.
    pub fn create(&self, owner: Uuid) -> Result<Profile> {
        if self.accounts.get(owner).is_none() {
            return Err(ProfileError::UnknownOwner(owner));
        }
        let mut table = self.lock();
        // The owner may have been deleted while we waited for the lock.
        if self.accounts.get(owner).is_none() {
            return Err(ProfileError::UnknownOwner(owner));
        }
        if table.iter().any(|profile| profile.owner() == owner) {
            return Err(ProfileError::DuplicateProfile { owner });
        }
        let profile = Profile::new(owner, self.defaults.clone());
        table.push(profile.clone());
        let hash = match write_table(&self.path, &*table) {
            Ok(outcome) => outcome.hash,
            Err(err) => {
                table.pop();
                return Err(err);
            }
        };
        drop(table);

        let mut event = ProfileEvent::new(ProfileEventType::ProfileCreated, profile.id, owner);
        event.hash_after = Some(hash);
        self.record(&event);
        Ok(profile)
    }

    pub fn all_profiles(&self) -> Vec<Profile> {
        self.lock().clone()
    }

    /// Profiles whose owner is enabled right now. Re-evaluated on every call.
    pub fn active_profiles(&self) -> Vec<Profile> {
        self.all_profiles()
            .into_iter()
            .filter(|profile| profile.is_active(self.accounts.as_ref()))
            .collect()
    }

    pub fn is_active(&self, profile: &Profile) -> bool {
        profile.is_active(self.accounts.as_ref())
    }

    pub fn get(&self, profile_id: Uuid) -> Option<Profile> {
        self.lock()
            .iter()
            .find(|profile| profile.id == profile_id)
            .cloned()
    }

    pub fn for_owner(&self, owner: Uuid) -> Option<Profile> {
        self.lock()
            .iter()
            .find(|profile| profile.owner() == owner)
            .cloned()
    }

    /// Applies a partial update. Nothing changes unless every field is valid
    /// and the write succeeds.
    pub fn update(&self, profile_id: Uuid, update: &ProfileUpdate) -> Result<Profile> {
        let mut table = self.lock();
        let index = table
            .iter()
            .position(|profile| profile.id == profile_id)
            .ok_or(ProfileError::ProfileNotFound(profile_id))?;
        let owner = table[index].owner();
        if self.accounts.get(owner).is_none() {
            return Err(ProfileError::UnknownOwner(owner));
        }

        let mut candidate = table[index].clone();
        let changed = update.apply(&mut candidate)?;
        if changed.is_empty() {
            return Ok(candidate);
        }
        candidate.updated_at = chrono::Utc::now();
        let previous = std::mem::replace(&mut table[index], candidate.clone());
        let hash = match write_table(&self.path, &*table) {
            Ok(outcome) => outcome.hash,
            Err(err) => {
                table[index] = previous;
                return Err(err);
            }
        };
        drop(table);

        let mut event = ProfileEvent::new(ProfileEventType::ProfileUpdated, profile_id, owner);
        event.changed_fields = changed.iter().map(|field| field.to_string()).collect();
        event.hash_after = Some(hash);
        self.record(&event);
        Ok(candidate)
    }

    /// Removes the owner's profile, if any.
    pub fn delete_for_owner(&self, owner: Uuid) -> Result<Option<Profile>> {
        let mut table = self.lock();
        let Some(index) = table.iter().position(|profile| profile.owner() == owner) else {
            return Ok(None);
        };
        let profile = table.remove(index);
        let hash = match write_table(&self.path, &*table) {
            Ok(outcome) => outcome.hash,
            Err(err) => {
                table.insert(index, profile);
                return Err(err);
            }
        };
        drop(table);

        let mut event = ProfileEvent::new(ProfileEventType::ProfileDeleted, profile.id, owner);
        event.hash_after = Some(hash);
        self.record(&event);
        Ok(Some(profile))
    }

    /// Drops profiles whose owning account no longer exists.
    pub fn prune_orphans(&self) -> Result<usize> {
        let orphans: Vec<Uuid> = self
            .all_profiles()
            .iter()
            .map(Profile::owner)
            .filter(|owner| self.accounts.get(*owner).is_none())
            .collect();
        let mut removed = 0;
        for owner in orphans {
            if self.delete_for_owner(owner)?.is_some() {
                removed += 1;
            }
        }
        if removed > 0 {
            info!(removed, "orphan profiles pruned");
        }
        Ok(removed)
    }

    /// Provisions profiles for existing accounts that do not have one yet.
    /// Returns how many were created.
    pub fn backfill(&self, accounts: &[Account]) -> Result<usize> {
        let created: usize = accounts
            .par_iter()
            .map(|account| match self.create(account.id) {
                Ok(_) => Ok(1),
                Err(err) if err.is_duplicate() => Ok(0),
                Err(err) => Err(err),
            })
            .collect::<Result<Vec<usize>>>()?
            .into_iter()
            .sum();
        info!(created, scanned = accounts.len(), "profile backfill finished");
        Ok(created)
    }

    /// One-line text form of a profile, naming its owner.
    pub fn describe(&self, profile: &Profile) -> String {
        let username = self
            .accounts
            .get(profile.owner())
            .map(|account| account.username)
            .unwrap_or_else(|| "<unknown>".to_string());
        describe_profile(profile, &username)
    }

    pub fn event_log(&self) -> &EventLog {
        &self.log
    }

    fn record(&self, event: &ProfileEvent) {
        if let Err(err) = self.log.append_event(event) {
            warn!(profile = %event.profile_id, error = %err, "failed to log profile event");
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Profile>> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
