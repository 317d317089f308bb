//! Configuration structures for the enrichment pipeline.

use serde::{Deserialize, Serialize};

use crate::error::EnrichError;

/// Main configuration for the enrichment pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichConfig {
    /// Matching thresholds.
    pub matching: MatchingConfig,

    /// AI fallback service settings.
    pub ai: AiConfig,
}

/// Confidence thresholds for the deterministic cascade and AI policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Deterministic matches at or above this confidence are final and
    /// excluded from AI re-evaluation.
    pub accept_threshold: f64,

    /// Minimum fuzzy score to accept a fuzzy candidate.
    pub fuzzy_floor: f64,

    /// Confidence assigned to normalized exact-name matches.
    pub exact_confidence: f64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            accept_threshold: 0.80,
            fuzzy_floor: 0.75,
            exact_confidence: 0.95,
        }
    }
}

/// AI fallback service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Batch matching endpoint URL.
    pub endpoint: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8090/ai/match".to_string(),
            timeout_secs: 15,
        }
    }
}

impl EnrichConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }

    /// Reject thresholds outside [0, 1].
    pub fn validate(&self) -> Result<(), EnrichError> {
        for (name, value) in [
            ("matching.accept_threshold", self.matching.accept_threshold),
            ("matching.fuzzy_floor", self.matching.fuzzy_floor),
            ("matching.exact_confidence", self.matching.exact_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(EnrichError::Config(format!(
                    "{name} must be in [0, 1], got {value}"
                )));
            }
        }
        Ok(())
    }
}
