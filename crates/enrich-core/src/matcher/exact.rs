//! Normalized exact-name strategy.

use super::{MatchCandidate, MatchStrategy};
use crate::error::RepositoryError;
use crate::models::{MatchType, ParsedLine};
use crate::normalize::normalize;
use crate::repo::EnrichRepository;

/// Strategy 3: normalize the parsed description and look for an exact
/// product-name match.
pub struct ExactNameStrategy {
    confidence: f64,
}

impl ExactNameStrategy {
    pub fn new(confidence: f64) -> Self {
        Self { confidence }
    }
}

#[async_trait::async_trait]
impl MatchStrategy for ExactNameStrategy {
    fn name(&self) -> &'static str {
        "exact"
    }

    async fn resolve(
        &self,
        repo: &dyn EnrichRepository,
        line: &ParsedLine,
    ) -> Result<Option<MatchCandidate>, RepositoryError> {
        let normalized = normalize(&line.parsed_description);
        if normalized.is_empty() {
            return Ok(None);
        }

        Ok(repo
            .find_product_by_normalized_name(&normalized)
            .await?
            .map(|product| MatchCandidate {
                product_id: product.id,
                match_type: MatchType::Exact,
                confidence: self.confidence,
            }))
    }
}
