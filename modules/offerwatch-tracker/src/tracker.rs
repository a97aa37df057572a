//! Run orchestration: per-brand acquisition loop, run-state guard, cooldown.
//!
//! One `CampaignTracker` is constructed per process and owns all run-scoped
//! state. A run walks the configured brands strictly in order; each brand is
//! an independent unit of work whose failure is recorded in the audit log
//! and never aborts the remaining brands.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use offerwatch_common::{AuditLogEntry, CampaignRecord, Config, OfferWatchError};

use crate::brands::{brand_configs, BrandConfig};
use crate::extractor::{CampaignExtractor, GeminiExtractor};
use crate::fetch::{default_routes, PageFetcher, ProxyRouter};
use crate::normalize::normalize;
use crate::store::{MergeStore, StoreSnapshot};

// ---------------------------------------------------------------------------
// Run outcome & stats
// ---------------------------------------------------------------------------

/// Why a run request did not execute. Not an error: re-entrant triggers are
/// deliberate no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    RunInProgress,
    Cooldown { remaining_secs: u64 },
}

#[derive(Debug)]
pub enum RunOutcome {
    Completed(SyncStats),
    Skipped(SkipReason),
}

/// Stats from one full sync run.
#[derive(Debug, Default)]
pub struct SyncStats {
    pub brands_attempted: u32,
    pub brands_succeeded: u32,
    pub brands_failed: u32,
    /// Records shaped from extraction output, pre-dedup.
    pub campaigns_found: u32,
    /// Records that survived the identity filter.
    pub campaigns_inserted: u32,
}

impl std::fmt::Display for SyncStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\n=== Sync Run Complete ===")?;
        writeln!(f, "Brands attempted:   {}", self.brands_attempted)?;
        writeln!(f, "Brands succeeded:   {}", self.brands_succeeded)?;
        writeln!(f, "Brands failed:      {}", self.brands_failed)?;
        writeln!(f, "Campaigns found:    {}", self.campaigns_found)?;
        writeln!(f, "Campaigns inserted: {}", self.campaigns_inserted)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Cooldown timer
// ---------------------------------------------------------------------------

/// Shared countdown decremented once per second by a background task.
/// Runs are rejected while the counter is positive. Arming cancels any
/// previous ticker; the ticker exits itself when the counter reaches zero.
struct CooldownTimer {
    remaining: Arc<AtomicU64>,
    ticker: Mutex<Option<tokio::task::JoinHandle<()>>>,
}

impl CooldownTimer {
    fn new() -> Self {
        Self {
            remaining: Arc::new(AtomicU64::new(0)),
            ticker: Mutex::new(None),
        }
    }

    fn remaining(&self) -> u64 {
        self.remaining.load(Ordering::SeqCst)
    }

    fn arm(&self, secs: u64) {
        if secs == 0 {
            return;
        }
        self.remaining.store(secs, Ordering::SeqCst);

        let mut guard = self.ticker.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(old) = guard.take() {
            old.abort();
        }

        let remaining = Arc::clone(&self.remaining);
        *guard = Some(tokio::spawn(async move {
            let mut tick = tokio::time::interval(Duration::from_secs(1));
            // The first tick completes immediately; skip it.
            tick.tick().await;
            loop {
                tick.tick().await;
                let now = remaining.load(Ordering::SeqCst);
                if now == 0 {
                    break;
                }
                remaining.store(now - 1, Ordering::SeqCst);
                if now == 1 {
                    break;
                }
            }
        }));
    }
}

// ---------------------------------------------------------------------------
// CampaignTracker
// ---------------------------------------------------------------------------

struct BrandOutcome {
    found: usize,
    inserted: usize,
}

pub struct CampaignTracker {
    brands: Vec<BrandConfig>,
    fetcher: Arc<dyn PageFetcher>,
    extractor: Arc<dyn CampaignExtractor>,
    store: Mutex<MergeStore>,
    running: AtomicBool,
    cooldown: CooldownTimer,
    cooldown_secs: u64,
}

impl CampaignTracker {
    pub fn new(
        brands: Vec<BrandConfig>,
        fetcher: Arc<dyn PageFetcher>,
        extractor: Arc<dyn CampaignExtractor>,
        cooldown_secs: u64,
    ) -> Self {
        Self {
            brands,
            fetcher,
            extractor,
            store: Mutex::new(MergeStore::new()),
            running: AtomicBool::new(false),
            cooldown: CooldownTimer::new(),
            cooldown_secs,
        }
    }

    /// Wire the production collaborators: proxy-routed fetch and Gemini
    /// extraction. The config's presence of an API key is the run
    /// precondition — `Config::load` already failed without one.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            brand_configs(),
            Arc::new(ProxyRouter::new(default_routes())),
            Arc::new(GeminiExtractor::new(
                &config.gemini_api_key,
                &config.gemini_model,
            )),
            config.cooldown_secs,
        )
    }

    /// Replace store contents from persisted state.
    pub fn restore(&self, snapshot: StoreSnapshot) {
        *self.store.lock().unwrap_or_else(|e| e.into_inner()) = MergeStore::from_snapshot(snapshot);
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        self.store.lock().unwrap_or_else(|e| e.into_inner()).snapshot()
    }

    /// Run one full sync across all configured brands.
    ///
    /// No-ops (with a reason) while a run is active or the cooldown is
    /// positive. Per-brand failures are audit entries, not errors; nothing
    /// a brand does can make this return `Err`.
    pub async fn run(&self) -> RunOutcome {
        let cooldown = self.cooldown.remaining();
        if cooldown > 0 {
            info!(remaining_secs = cooldown, "Sync rejected: cooldown active");
            return RunOutcome::Skipped(SkipReason::Cooldown {
                remaining_secs: cooldown,
            });
        }
        if self.running.swap(true, Ordering::SeqCst) {
            info!("Sync rejected: run already in progress");
            return RunOutcome::Skipped(SkipReason::RunInProgress);
        }

        let stats = self.run_inner().await;
        self.running.store(false, Ordering::SeqCst);
        self.cooldown.arm(self.cooldown_secs);

        RunOutcome::Completed(stats)
    }

    async fn run_inner(&self) -> SyncStats {
        let mut stats = SyncStats::default();

        for brand in &self.brands {
            stats.brands_attempted += 1;
            info!(brand = brand.name, url = brand.url, "Syncing brand");

            match self.sync_brand(brand).await {
                Ok(outcome) => {
                    stats.brands_succeeded += 1;
                    stats.campaigns_found += outcome.found as u32;
                    stats.campaigns_inserted += outcome.inserted as u32;
                    info!(
                        brand = brand.name,
                        found = outcome.found,
                        inserted = outcome.inserted,
                        "Brand synced"
                    );
                }
                Err(e) => {
                    stats.brands_failed += 1;
                    warn!(brand = brand.name, error = %e, "Brand sync failed");
                    self.store
                        .lock()
                        .unwrap_or_else(|e| e.into_inner())
                        .append_log(AuditLogEntry::failed(brand.name, &e.to_string()));
                }
            }
        }

        // One stamp per run, after every brand has been attempted.
        self.store
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .mark_synced(Utc::now());

        stats
    }

    async fn sync_brand(&self, brand: &BrandConfig) -> Result<BrandOutcome, OfferWatchError> {
        let page = self.fetcher.fetch(brand.url).await?;
        let stream = normalize(&page.content);
        let prompt = (brand.prompt)(&stream, brand.url);

        let extracted = self.extractor.extract(&prompt).await?;

        let now = Utc::now();
        let records: Vec<CampaignRecord> = extracted
            .into_iter()
            .map(|c| CampaignRecord {
                id: Uuid::new_v4(),
                name: c.name,
                info: c.info,
                category: c.category,
                // The brand's configured URL is authoritative, whatever the
                // extraction claims.
                url: brand.url.to_string(),
                discovery_date: now,
                last_seen_date: now,
                is_active: true,
                competitor: brand.name.to_string(),
                is_grounded: true,
                reliability_score: 100,
                is_banner: c.is_banner,
            })
            .collect();

        let found = records.len();
        let mut store = self.store.lock().unwrap_or_else(|e| e.into_inner());
        let inserted = store.insert_deduped(records);
        store.append_log(AuditLogEntry::success(brand.name, found, &page.route));

        Ok(BrandOutcome { found, inserted })
    }
}
