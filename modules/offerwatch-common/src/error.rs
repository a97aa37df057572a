use thiserror::Error;

#[derive(Error, Debug)]
pub enum OfferWatchError {
    /// Every configured retrieval route failed for a brand's source URL.
    #[error("All retrieval routes failed for {url}")]
    RetrievalExhausted { url: String },

    /// The extraction service returned output that does not parse into the
    /// expected campaign schema.
    #[error("Malformed extraction output: {0}")]
    ExtractionMalformed(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("State store error: {0}")]
    State(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
