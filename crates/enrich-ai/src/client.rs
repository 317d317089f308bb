//! AI matcher clients.

use std::time::Duration;

use tracing::debug;

use crate::error::AiError;
use crate::wire::{AiMatchRequest, AiMatchResponse};

/// Default timeout for the batch call. The AI step is the dominant
/// latency cost of an enrichment run and must stay bounded.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Trait for AI batch matchers.
///
/// Abstracts over the HTTP client so orchestration code can be tested
/// without a running AI service.
#[async_trait::async_trait]
pub trait AiMatcher: Send + Sync {
    /// Submit one batch of uncertain lines and return the candidates.
    async fn match_lines(&self, request: &AiMatchRequest) -> Result<AiMatchResponse, AiError>;
}

/// HTTP client for the AI matching endpoint.
pub struct HttpAiMatcher {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpAiMatcher {
    /// Create a client for the given endpoint with the default timeout.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, AiError> {
        Self::with_timeout(endpoint, DEFAULT_TIMEOUT)
    }

    /// Create a client with an explicit request timeout.
    pub fn with_timeout(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, AiError> {
        let client = reqwest::Client::builder()
            .user_agent("enrich/0.1.0")
            .timeout(timeout)
            .build()
            .map_err(|e| AiError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait::async_trait]
impl AiMatcher for HttpAiMatcher {
    async fn match_lines(&self, request: &AiMatchRequest) -> Result<AiMatchResponse, AiError> {
        debug!(
            invoice = %request.parsed_invoice_id,
            lines = request.lines.len(),
            "posting AI match batch"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await?;

        // Only 200 counts as success; anything else means no AI
        // contribution for this run.
        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(AiError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| AiError::Malformed(e.to_string()))
    }
}

/// Matcher that never contributes anything.
///
/// Used when a deployment runs without an AI service configured; the
/// empty response leaves every deterministic result standing.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledAiMatcher;

#[async_trait::async_trait]
impl AiMatcher for DisabledAiMatcher {
    async fn match_lines(&self, _request: &AiMatchRequest) -> Result<AiMatchResponse, AiError> {
        Ok(AiMatchResponse::default())
    }
}
