pub mod provisioning;

pub use provisioning::ProvisioningListener;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};
use uuid::Uuid;

use crate::accounts::Account;
use crate::error::{Result, StorageContext};

/// Account lifecycle notifications, fired after the account change is durable.
#[derive(Debug, Clone, PartialEq)]
pub enum AccountEvent {
    Created(Account),
    Deleted(Account),
}

/// Subscriber to the account event stream.
///
/// Handlers run synchronously on the thread that changed the account. An
/// error aborts the triggering account operation.
pub trait AccountListener: Send + Sync {
    fn name(&self) -> &'static str;

    fn on_account_event(&self, event: &AccountEvent) -> Result<()>;
}

/// Handle returned by [`AccountEvents::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

/// Explicit registry of account event subscribers.
#[derive(Default)]
pub struct AccountEvents {
    listeners: RwLock<Vec<(SubscriptionId, Arc<dyn AccountListener>)>>,
}

impl AccountEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: Arc<dyn AccountListener>) -> SubscriptionId {
        let id = SubscriptionId(Uuid::new_v4());
        tracing::debug!(listener = listener.name(), "account listener subscribed");
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, listener));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.write().unwrap_or_else(PoisonError::into_inner);
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    /// Delivers the event to each subscriber in registration order, stopping
    /// at the first failure.
    pub fn dispatch(&self, event: &AccountEvent) -> Result<()> {
        let listeners: Vec<Arc<dyn AccountListener>> = self
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            listener.on_account_event(event)?;
        }
        Ok(())
    }
}

/// Type of profile events that can be logged.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProfileEventType {
    ProfileCreated,
    ProfileUpdated,
    ProfileDeleted,
}

/// Profile mutation record stored as JSONL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileEvent {
    pub event_id: Uuid,
    pub event_type: ProfileEventType,
    pub profile_id: Uuid,
    pub owner: Uuid,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub changed_fields: Vec<String>,
    pub hash_after: Option<String>,
}

impl ProfileEvent {
    pub fn new(event_type: ProfileEventType, profile_id: Uuid, owner: Uuid) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            event_type,
            profile_id,
            owner,
            timestamp: Utc::now(),
            changed_fields: Vec::new(),
            hash_after: None,
        }
    }
}

/// Append-only log of profile mutations.
#[derive(Debug, Clone)]
pub struct EventLog {
    events_path: PathBuf,
}

impl EventLog {
    pub fn new(events_path: impl Into<PathBuf>) -> Self {
        Self {
            events_path: events_path.into(),
        }
    }

    pub fn append_event(&self, event: &ProfileEvent) -> Result<()> {
        if let Some(parent) = self.events_path.parent() {
            fs::create_dir_all(parent)
                .storage_context(|| format!("failed creating directory {:?}", parent))?;
        }
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.events_path)
            .storage_context(|| format!("failed opening event log {:?}", self.events_path))?;
        let line = serde_json::to_string(event)
            .storage_context(|| "failed serializing profile event")?;
        file.write_all(line.as_bytes())
            .and_then(|_| file.write_all(b"\n"))
            .storage_context(|| format!("failed appending to {:?}", self.events_path))?;
        Ok(())
    }

    pub fn load_events(&self) -> Result<Vec<ProfileEvent>> {
        if !self.events_path.exists() {
            return Ok(Vec::new());
        }
        let data = fs::read_to_string(&self.events_path)
            .storage_context(|| format!("failed reading event log {:?}", self.events_path))?;
        let mut events = Vec::new();
        for line in data.lines().filter(|l| !l.trim().is_empty()) {
            let event: ProfileEvent = serde_json::from_str(line)
                .storage_context(|| format!("corrupt event in {:?}", self.events_path))?;
            events.push(event);
        }
        Ok(events)
    }

    pub fn load_events_since(&self, cutoff: DateTime<Utc>) -> Result<Vec<ProfileEvent>> {
        Ok(self
            .load_events()?
            .into_iter()
            .filter(|event| event.timestamp >= cutoff)
            .collect())
    }
}
