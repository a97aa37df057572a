//! Persistence boundary for tracker state.
//!
//! Storage is an external collaborator addressed by four logical keys:
//! the campaign collection, the audit log, the last-sync timestamp, and the
//! favorited identities. Favorites belong to the presentation layer; the
//! pipeline only carries them through unchanged.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use offerwatch_common::{AuditLogEntry, CampaignRecord, OfferWatchError};

use crate::store::StoreSnapshot;

const CAMPAIGNS_KEY: &str = "campaigns";
const LOG_KEY: &str = "audit_log";
const LAST_SYNC_KEY: &str = "last_sync";
const FAVORITES_KEY: &str = "favorites";

pub trait StateStore: Send + Sync {
    fn load(&self) -> Result<StoreSnapshot, OfferWatchError>;
    fn save(&self, snapshot: &StoreSnapshot) -> Result<(), OfferWatchError>;
}

/// One JSON file per logical key under a state directory.
pub struct FileStateStore {
    dir: PathBuf,
}

impl FileStateStore {
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, OfferWatchError> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)
            .map_err(|e| OfferWatchError::State(format!("Cannot create state dir: {e}")))?;
        Ok(Self { dir })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Read one key, treating a missing file as the default and a corrupt
    /// file as the default with a warning. State loss is recoverable — the
    /// next run repopulates — so corruption never aborts startup.
    fn read_key<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        let path = self.key_path(key);
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(_) => return T::default(),
        };
        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "Corrupt state file, starting key empty");
                T::default()
            }
        }
    }

    fn write_key<T: Serialize>(&self, key: &str, value: &T) -> Result<(), OfferWatchError> {
        let raw = serde_json::to_string(value)
            .map_err(|e| OfferWatchError::State(format!("Cannot serialize {key}: {e}")))?;
        std::fs::write(self.key_path(key), raw)
            .map_err(|e| OfferWatchError::State(format!("Cannot write {key}: {e}")))
    }
}

impl StateStore for FileStateStore {
    fn load(&self) -> Result<StoreSnapshot, OfferWatchError> {
        let campaigns: Vec<CampaignRecord> = self.read_key(CAMPAIGNS_KEY);
        let log: Vec<AuditLogEntry> = self.read_key(LOG_KEY);
        let last_sync: Option<DateTime<Utc>> = self.read_key(LAST_SYNC_KEY);

        info!(
            campaigns = campaigns.len(),
            log_entries = log.len(),
            "Loaded tracker state"
        );

        Ok(StoreSnapshot {
            campaigns,
            log,
            last_sync,
        })
    }

    fn save(&self, snapshot: &StoreSnapshot) -> Result<(), OfferWatchError> {
        self.write_key(CAMPAIGNS_KEY, &snapshot.campaigns)?;
        self.write_key(LOG_KEY, &snapshot.log)?;
        self.write_key(LAST_SYNC_KEY, &snapshot.last_sync)?;

        // Presentation-owned key: create empty if absent, never modify.
        let favorites_path = self.key_path(FAVORITES_KEY);
        if !favorites_path.exists() {
            self.write_key(FAVORITES_KEY, &Vec::<Uuid>::new())?;
        }

        info!(
            campaigns = snapshot.campaigns.len(),
            log_entries = snapshot.log.len(),
            "Saved tracker state"
        );
        Ok(())
    }
}

/// In-memory store for tests.
#[derive(Default)]
pub struct MemoryStateStore {
    snapshot: std::sync::Mutex<StoreSnapshot>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStateStore {
    fn load(&self) -> Result<StoreSnapshot, OfferWatchError> {
        Ok(self.snapshot.lock().expect("state mutex poisoned").clone())
    }

    fn save(&self, snapshot: &StoreSnapshot) -> Result<(), OfferWatchError> {
        *self.snapshot.lock().expect("state mutex poisoned") = snapshot.clone();
        Ok(())
    }
}
