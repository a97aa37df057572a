//! Model-backed campaign extraction.
//!
//! The extraction service is the sole source of semantic judgment: it reads
//! the normalized page stream and answers with a JSON array of candidate
//! campaigns. This module owns the strict schema that array must satisfy and
//! the adapter that calls Gemini.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use gemini_client::GeminiClient;
use offerwatch_common::OfferWatchError;

/// One candidate campaign as returned by the model. `name`, `info` and
/// `category` are required; anything missing fails the whole response.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractedCampaign {
    pub name: String,
    pub info: String,
    pub category: String,
    #[serde(default, rename = "isBanner")]
    pub is_banner: bool,
}

#[async_trait]
pub trait CampaignExtractor: Send + Sync {
    /// Run the brand's extraction prompt and return the candidate campaigns.
    async fn extract(&self, prompt: &str) -> Result<Vec<ExtractedCampaign>, OfferWatchError>;
}

/// Parse the model's response text into the strict campaign schema.
///
/// Any non-array output or element missing a required field is rejected as a
/// whole; there is no partial salvage of a malformed response.
pub fn parse_campaigns(text: &str) -> Result<Vec<ExtractedCampaign>, OfferWatchError> {
    serde_json::from_str::<Vec<ExtractedCampaign>>(text)
        .map_err(|e| OfferWatchError::ExtractionMalformed(e.to_string()))
}

pub struct GeminiExtractor {
    client: GeminiClient,
}

impl GeminiExtractor {
    pub fn new(api_key: &str, model: &str) -> Self {
        Self {
            client: GeminiClient::new(api_key, model),
        }
    }

    pub fn with_client(client: GeminiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CampaignExtractor for GeminiExtractor {
    async fn extract(&self, prompt: &str) -> Result<Vec<ExtractedCampaign>, OfferWatchError> {
        let text = self
            .client
            .generate_json(prompt)
            .await
            .map_err(|e| OfferWatchError::ExtractionMalformed(e.to_string()))?;

        debug!(
            model = self.client.model(),
            response_chars = text.len(),
            "Extraction response received"
        );

        let campaigns = parse_campaigns(&text)?;
        if campaigns.is_empty() {
            warn!("Extraction returned an empty campaign array");
        }
        Ok(campaigns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_full_array() {
        let text = r#"[
            {"name": "Spring Sale", "info": "20% off", "category": "seasonal", "isBanner": true},
            {"name": "Members Rate", "info": "Extra 5%", "category": "rewards"}
        ]"#;

        let campaigns = parse_campaigns(text).unwrap();

        assert_eq!(campaigns.len(), 2);
        assert!(campaigns[0].is_banner);
        assert!(!campaigns[1].is_banner, "isBanner defaults to false");
    }

    #[test]
    fn non_json_is_malformed() {
        let err = parse_campaigns("I could not find any campaigns.").unwrap_err();
        assert!(matches!(err, OfferWatchError::ExtractionMalformed(_)));
    }

    #[test]
    fn missing_required_field_is_malformed() {
        let text = r#"[{"name": "Nameless", "category": "general"}]"#;
        let err = parse_campaigns(text).unwrap_err();
        assert!(matches!(err, OfferWatchError::ExtractionMalformed(_)));
    }

    #[test]
    fn object_instead_of_array_is_malformed() {
        let text = r#"{"name": "Solo", "info": "x", "category": "general"}"#;
        assert!(parse_campaigns(text).is_err());
    }
}
