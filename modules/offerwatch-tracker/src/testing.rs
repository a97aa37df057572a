//! Test mocks for the tracker pipeline.
//!
//! Two mocks matching the two trait boundaries:
//! - MockFetcher (PageFetcher) — HashMap-based URL → canned page
//! - MockExtractor (CampaignExtractor) — prompt-substring → canned campaigns
//!
//! Unregistered URLs fail with RetrievalExhausted; unmatched prompts return
//! an empty array, and `.malformed_on()` simulates schema-violating output.

use std::collections::HashMap;

use async_trait::async_trait;

use offerwatch_common::OfferWatchError;

use crate::extractor::{CampaignExtractor, ExtractedCampaign};
use crate::fetch::{FetchedPage, PageFetcher};

// ---------------------------------------------------------------------------
// MockFetcher
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MockFetcher {
    pages: HashMap<String, FetchedPage>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a page for a URL, naming the route that "succeeded".
    pub fn on_page(mut self, url: &str, content: &str, route: &str) -> Self {
        self.pages.insert(
            url.to_string(),
            FetchedPage {
                content: content.to_string(),
                route: route.to_string(),
            },
        );
        self
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, OfferWatchError> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| OfferWatchError::RetrievalExhausted {
                url: url.to_string(),
            })
    }
}

// ---------------------------------------------------------------------------
// MockExtractor
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MockExtractor {
    /// Matched by substring of the prompt, first match wins.
    responses: Vec<(String, Vec<ExtractedCampaign>)>,
    malformed: Vec<String>,
}

impl MockExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_prompt(mut self, substring: &str, campaigns: Vec<ExtractedCampaign>) -> Self {
        self.responses.push((substring.to_string(), campaigns));
        self
    }

    /// Prompts containing `substring` yield schema-violating output.
    pub fn malformed_on(mut self, substring: &str) -> Self {
        self.malformed.push(substring.to_string());
        self
    }
}

#[async_trait]
impl CampaignExtractor for MockExtractor {
    async fn extract(&self, prompt: &str) -> Result<Vec<ExtractedCampaign>, OfferWatchError> {
        if self.malformed.iter().any(|s| prompt.contains(s.as_str())) {
            return Err(OfferWatchError::ExtractionMalformed(
                "expected a JSON array".to_string(),
            ));
        }
        for (substring, campaigns) in &self.responses {
            if prompt.contains(substring.as_str()) {
                return Ok(campaigns.clone());
            }
        }
        Ok(Vec::new())
    }
}

/// Shorthand for building extraction output in tests.
pub fn extracted(name: &str, info: &str, category: &str, is_banner: bool) -> ExtractedCampaign {
    ExtractedCampaign {
        name: name.to_string(),
        info: info.to_string(),
        category: category.to_string(),
        is_banner,
    }
}
