use std::env;

use crate::error::OfferWatchError;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Credential for the extraction service. The run cannot start without it.
    pub gemini_api_key: String,

    /// Extraction model identifier.
    pub gemini_model: String,

    /// Seconds new runs stay rejected after a completed run.
    pub cooldown_secs: u64,

    /// Directory the state store persists its JSON files into.
    pub state_dir: String,
}

const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
const DEFAULT_COOLDOWN_SECS: u64 = 60;

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A missing GEMINI_API_KEY is a precondition failure: it aborts before
    /// any brand is attempted and is the only error a run caller ever sees.
    pub fn load() -> Result<Self, OfferWatchError> {
        let gemini_api_key = env::var("GEMINI_API_KEY")
            .map_err(|_| OfferWatchError::Config("GEMINI_API_KEY environment variable is required".into()))?;

        let cooldown_secs = match env::var("OFFERWATCH_COOLDOWN_SECS") {
            Ok(raw) => raw.parse().map_err(|_| {
                OfferWatchError::Config("OFFERWATCH_COOLDOWN_SECS must be a number".into())
            })?,
            Err(_) => DEFAULT_COOLDOWN_SECS,
        };

        Ok(Self {
            gemini_api_key,
            gemini_model: env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            cooldown_secs,
            state_dir: env::var("OFFERWATCH_STATE_DIR").unwrap_or_else(|_| "data".to_string()),
        })
    }
}
