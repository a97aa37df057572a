use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use offerwatch_common::Config;
use offerwatch_tracker::state::{FileStateStore, StateStore};
use offerwatch_tracker::tracker::{CampaignTracker, RunOutcome};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("offerwatch=info".parse()?))
        .init();

    info!("OfferWatch starting...");

    // Load config — a missing API key is the one error a trigger surfaces.
    let config = Config::load()?;
    info!(model = config.gemini_model.as_str(), "Configuration loaded");

    let state = FileStateStore::new(&config.state_dir)?;
    let tracker = CampaignTracker::from_config(&config);

    // Restore persisted collection and audit log before syncing.
    let snapshot = state.load()?;
    info!(
        campaigns = snapshot.campaigns.len(),
        log_entries = snapshot.log.len(),
        "State restored"
    );
    tracker.restore(snapshot);

    match tracker.run().await {
        RunOutcome::Completed(stats) => {
            let snapshot = tracker.snapshot();
            state.save(&snapshot)?;
            info!("State persisted");
            println!("{stats}");
            print!("{}", snapshot.category_summary());
        }
        RunOutcome::Skipped(reason) => {
            info!(?reason, "Sync skipped");
        }
    }

    Ok(())
}
