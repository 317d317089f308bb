//! Error types for the AI matcher transport.

use thiserror::Error;

/// Errors from the AI fallback call.
///
/// Every variant is non-fatal to an enrichment run: callers degrade to
/// deterministic-only results when the AI step fails.
#[derive(Error, Debug)]
pub enum AiError {
    /// Connection or protocol failure before a response arrived.
    #[error("transport error: {0}")]
    Transport(String),

    /// The request exceeded the configured timeout.
    #[error("AI request timed out")]
    Timeout,

    /// The service answered with a non-200 status.
    #[error("unexpected status from AI service: {0}")]
    Status(u16),

    /// The response body could not be decoded.
    #[error("malformed AI response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for AiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AiError::Timeout
        } else if err.is_decode() {
            AiError::Malformed(err.to_string())
        } else {
            AiError::Transport(err.to_string())
        }
    }
}
