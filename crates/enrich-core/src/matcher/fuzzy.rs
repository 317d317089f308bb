//! Fuzzy name strategy.

use super::{MatchCandidate, MatchStrategy};
use crate::error::RepositoryError;
use crate::models::{MatchType, ParsedLine};
use crate::repo::EnrichRepository;

/// Strategy 4: approximate matching on the original parsed
/// description. Accepts only candidates at or above the floor.
pub struct FuzzyStrategy {
    floor: f64,
}

impl FuzzyStrategy {
    pub fn new(floor: f64) -> Self {
        Self { floor }
    }
}

#[async_trait::async_trait]
impl MatchStrategy for FuzzyStrategy {
    fn name(&self) -> &'static str {
        "fuzzy"
    }

    async fn resolve(
        &self,
        repo: &dyn EnrichRepository,
        line: &ParsedLine,
    ) -> Result<Option<MatchCandidate>, RepositoryError> {
        if line.parsed_description.trim().is_empty() {
            return Ok(None);
        }

        let Some((product, score)) = repo.fuzzy_match_product(&line.parsed_description).await?
        else {
            return Ok(None);
        };

        if score < self.floor {
            return Ok(None);
        }

        Ok(Some(MatchCandidate {
            product_id: product.id,
            match_type: MatchType::Fuzzy,
            confidence: score,
        }))
    }
}
