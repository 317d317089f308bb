//! Deterministic matcher cascade.
//!
//! Four ordered strategies, first-match-wins: SKU extraction, vendor
//! mapping, normalized exact name, fuzzy name. Each strategy runs only
//! when every earlier one produced nothing, and a strategy's lookup
//! failure degrades to "no match from this strategy".

pub mod exact;
pub mod fuzzy;
pub mod sku;
pub mod vendor;

pub use exact::ExactNameStrategy;
pub use fuzzy::FuzzyStrategy;
pub use sku::SkuStrategy;
pub use vendor::VendorMappingStrategy;

use tracing::warn;

use crate::error::RepositoryError;
use crate::models::{EnrichConfig, EnrichmentResult, MatchType, ParsedLine};
use crate::repo::EnrichRepository;

/// A single candidate produced by one strategy.
#[derive(Debug, Clone)]
pub struct MatchCandidate {
    pub product_id: String,
    pub match_type: MatchType,
    pub confidence: f64,
}

/// Trait for one deterministic matching strategy.
#[async_trait::async_trait]
pub trait MatchStrategy: Send + Sync {
    /// Strategy name, for logging.
    fn name(&self) -> &'static str;

    /// Produce at most one candidate for the line.
    async fn resolve(
        &self,
        repo: &dyn EnrichRepository,
        line: &ParsedLine,
    ) -> Result<Option<MatchCandidate>, RepositoryError>;
}

/// Ordered cascade of deterministic strategies.
pub struct MatcherCascade {
    strategies: Vec<Box<dyn MatchStrategy>>,
}

impl MatcherCascade {
    /// Standard cascade: SKU, vendor mapping, normalized exact, fuzzy.
    pub fn new(config: &EnrichConfig) -> Self {
        Self {
            strategies: vec![
                Box::new(SkuStrategy),
                Box::new(VendorMappingStrategy),
                Box::new(ExactNameStrategy::new(config.matching.exact_confidence)),
                Box::new(FuzzyStrategy::new(config.matching.fuzzy_floor)),
            ],
        }
    }

    /// Cascade with an explicit strategy list, mainly for tests.
    pub fn with_strategies(strategies: Vec<Box<dyn MatchStrategy>>) -> Self {
        Self { strategies }
    }

    /// Resolve one line. Match fields only; no metadata attached yet.
    pub async fn resolve(
        &self,
        repo: &dyn EnrichRepository,
        line: &ParsedLine,
    ) -> EnrichmentResult {
        for strategy in &self.strategies {
            match strategy.resolve(repo, line).await {
                Ok(Some(candidate)) => {
                    return EnrichmentResult::matched(
                        line.id.clone(),
                        candidate.product_id,
                        candidate.match_type,
                        candidate.confidence,
                    );
                }
                Ok(None) => {}
                Err(err) => {
                    // Tolerant degrade: a failing lookup never aborts
                    // the cascade, the next strategy gets its turn.
                    warn!(
                        line = %line.id,
                        strategy = strategy.name(),
                        error = %err,
                        "strategy lookup failed, trying next"
                    );
                }
            }
        }

        EnrichmentResult::unmatched(line.id.clone())
    }
}
