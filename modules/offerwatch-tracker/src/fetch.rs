//! Multi-route page retrieval with ordered fallback.
//!
//! Competitor marketing pages sit behind geo/CORS restrictions, so every
//! fetch goes through one of several public relay endpoints. Routes are
//! tried in fixed priority order and the first validated response wins.

use std::time::Duration;

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Deserialize;
use tracing::{info, warn};

use offerwatch_common::OfferWatchError;

/// How a route wraps the fetched page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// JSON envelope with the page in a `contents` field.
    JsonEnvelope,
    /// The response body is the page itself.
    RawBody,
}

/// One retrieval route: a relay prefix the target URL is appended to.
#[derive(Debug, Clone)]
pub struct ProxyRoute {
    pub name: &'static str,
    pub url_prefix: String,
    pub shape: ResponseShape,
    /// Whether the target URL must be percent-encoded before appending.
    pub encode_target: bool,
}

/// Default route list, in priority order.
pub fn default_routes() -> Vec<ProxyRoute> {
    vec![
        ProxyRoute {
            name: "AllOrigins",
            url_prefix: "https://api.allorigins.win/get?url=".to_string(),
            shape: ResponseShape::JsonEnvelope,
            encode_target: true,
        },
        ProxyRoute {
            name: "CorsProxyIO",
            url_prefix: "https://corsproxy.io/?".to_string(),
            shape: ResponseShape::RawBody,
            encode_target: false,
        },
        ProxyRoute {
            name: "CodeTabs",
            url_prefix: "https://api.codetabs.com/v1/proxy?quest=".to_string(),
            shape: ResponseShape::RawBody,
            encode_target: false,
        },
    ]
}

/// A raw-body response shorter than this is an error stub, not a page.
const MIN_RAW_BODY_CHARS: usize = 200;

/// Result of a successful fetch: the page plus the route that produced it.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub content: String,
    pub route: String,
}

#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, OfferWatchError>;
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    contents: String,
}

/// Fetcher that walks the route list in order, one attempt per route,
/// returning the first response that validates.
pub struct ProxyRouter {
    routes: Vec<ProxyRoute>,
    client: reqwest::Client,
}

impl ProxyRouter {
    pub fn new(routes: Vec<ProxyRoute>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self { routes, client }
    }

    fn route_url(route: &ProxyRoute, target: &str) -> String {
        if route.encode_target {
            format!(
                "{}{}",
                route.url_prefix,
                utf8_percent_encode(target, NON_ALPHANUMERIC)
            )
        } else {
            format!("{}{}", route.url_prefix, target)
        }
    }

    /// Fetch through one route. `None` means move on to the next route.
    async fn attempt(&self, route: &ProxyRoute, target: &str) -> Option<String> {
        let url = Self::route_url(route, target);

        let resp = match self.client.get(&url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(route = route.name, target, error = %e, "Route request failed");
                return None;
            }
        };

        if !resp.status().is_success() {
            warn!(route = route.name, target, status = %resp.status(), "Route returned error status");
            return None;
        }

        match route.shape {
            ResponseShape::JsonEnvelope => match resp.json::<Envelope>().await {
                Ok(envelope) if !envelope.contents.is_empty() => Some(envelope.contents),
                Ok(_) => {
                    warn!(route = route.name, target, "Envelope had empty contents");
                    None
                }
                Err(e) => {
                    warn!(route = route.name, target, error = %e, "Envelope did not parse");
                    None
                }
            },
            ResponseShape::RawBody => match resp.text().await {
                // Character count, not byte length: CJK pages would let a
                // short multibyte error stub through a byte threshold.
                Ok(text) if text.chars().count() > MIN_RAW_BODY_CHARS => Some(text),
                Ok(text) => {
                    warn!(
                        route = route.name,
                        target,
                        chars = text.chars().count(),
                        "Body too short, treating as stub page"
                    );
                    None
                }
                Err(e) => {
                    warn!(route = route.name, target, error = %e, "Failed to read body");
                    None
                }
            },
        }
    }
}

#[async_trait]
impl PageFetcher for ProxyRouter {
    async fn fetch(&self, target: &str) -> Result<FetchedPage, OfferWatchError> {
        url::Url::parse(target)
            .map_err(|e| OfferWatchError::Config(format!("Invalid target URL {target}: {e}")))?;

        for route in &self.routes {
            if let Some(content) = self.attempt(route, target).await {
                info!(
                    route = route.name,
                    target,
                    chars = content.len(),
                    "Fetched page"
                );
                return Ok(FetchedPage {
                    content,
                    route: route.name.to_string(),
                });
            }
        }

        Err(OfferWatchError::RetrievalExhausted {
            url: target.to_string(),
        })
    }
}
