//! In-memory campaign collection and audit log.
//!
//! Both lists are newest-first and capped; eviction drops the oldest entries
//! off the back. `insert_deduped` and `append_log` are the only mutation
//! paths — nothing else touches the collections.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use offerwatch_common::{category_label, AuditLogEntry, CampaignRecord};

pub const MAX_CAMPAIGNS: usize = 500;
pub const MAX_LOG_ENTRIES: usize = 100;

#[derive(Debug, Default)]
pub struct MergeStore {
    campaigns: Vec<CampaignRecord>,
    log: Vec<AuditLogEntry>,
    last_sync: Option<DateTime<Utc>>,
}

/// Serializable snapshot of the store, shaped like the persisted keys.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StoreSnapshot {
    pub campaigns: Vec<CampaignRecord>,
    pub log: Vec<AuditLogEntry>,
    pub last_sync: Option<DateTime<Utc>>,
}

impl StoreSnapshot {
    /// Per-category breakdown for the end-of-run summary, in first-seen
    /// order. Unrecognized category keys roll up under the general label.
    pub fn category_summary(&self) -> String {
        let mut counts: Vec<(&'static str, usize)> = Vec::new();
        for record in &self.campaigns {
            let label = category_label(&record.category);
            match counts.iter_mut().find(|(l, _)| *l == label) {
                Some((_, n)) => *n += 1,
                None => counts.push((label, 1)),
            }
        }

        let mut out = String::from("Campaigns by category:\n");
        if counts.is_empty() {
            out.push_str("  (none)\n");
        }
        for (label, n) in counts {
            out.push_str(&format!("  {label}: {n}\n"));
        }
        out
    }
}

impl MergeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        Self {
            campaigns: snapshot.campaigns,
            log: snapshot.log,
            last_sync: snapshot.last_sync,
        }
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            campaigns: self.campaigns.clone(),
            log: self.log.clone(),
            last_sync: self.last_sync,
        }
    }

    /// Insert records whose `(competitor, name)` identity is not already
    /// present. Survivors are prepended (most recent first) and the
    /// collection is truncated to [`MAX_CAMPAIGNS`]. Existing records are
    /// never overwritten or refreshed — a duplicate is silently dropped.
    ///
    /// Returns how many records survived the identity filter.
    pub fn insert_deduped(&mut self, records: Vec<CampaignRecord>) -> usize {
        let existing: HashSet<String> = self.campaigns.iter().map(|c| c.identity()).collect();

        let mut fresh: Vec<CampaignRecord> = Vec::new();
        let mut batch_seen: HashSet<String> = HashSet::new();
        for record in records {
            let identity = record.identity();
            if !existing.contains(&identity) && batch_seen.insert(identity) {
                fresh.push(record);
            }
        }

        let inserted = fresh.len();
        fresh.append(&mut self.campaigns);
        self.campaigns = fresh;
        self.campaigns.truncate(MAX_CAMPAIGNS);
        inserted
    }

    /// Prepend an audit entry (newest first) and truncate to
    /// [`MAX_LOG_ENTRIES`].
    pub fn append_log(&mut self, entry: AuditLogEntry) {
        self.log.insert(0, entry);
        self.log.truncate(MAX_LOG_ENTRIES);
    }

    pub fn mark_synced(&mut self, at: DateTime<Utc>) {
        self.last_sync = Some(at);
    }

    pub fn campaigns(&self) -> &[CampaignRecord] {
        &self.campaigns
    }

    pub fn log(&self) -> &[AuditLogEntry] {
        &self.log
    }

    pub fn last_sync(&self) -> Option<DateTime<Utc>> {
        self.last_sync
    }
}
