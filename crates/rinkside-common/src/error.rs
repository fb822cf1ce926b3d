//! Error types for rinkside
//!
//! One taxonomy for the whole pipeline. The list-fetch path treats
//! `Resolution`, `Transport` and `Decode` as fatal for the run; the
//! enrichment path recovers from them per record.

use thiserror::Error;

/// Result type alias for rinkside operations
pub type Result<T> = std::result::Result<T, IngestError>;

/// Main error type for the retrieval/normalization pipeline
#[derive(Error, Debug)]
pub enum IngestError {
    /// DNS-over-HTTPS fallback could not find an IPv4 address
    #[error("DNS resolution failed for '{0}': no A record")]
    Resolution(String),

    /// Both transport strategies were exhausted
    #[error("all transport strategies failed; primary: {primary}; fallback: {fallback}")]
    Transport { primary: String, fallback: String },

    /// Payload matched neither bare JSON nor callback-wrapped JSON
    #[error("undecodable upstream payload: {0}")]
    Decode(String),

    /// Single HTTP request failed (feeds into Transport once both paths fail)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream answered outside the 2xx range
    #[error("upstream returned {status}: {body_excerpt}")]
    UpstreamStatus { status: u16, body_excerpt: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl IngestError {
    /// Build a configuration error from any message
    pub fn config(msg: impl Into<String>) -> Self {
        IngestError::Config(msg.into())
    }
}
