//! SKU extraction strategy.

use super::{MatchCandidate, MatchStrategy};
use crate::error::RepositoryError;
use crate::models::{MatchType, ParsedLine};
use crate::repo::EnrichRepository;

/// Strategy 1: extract a SKU-like token from the raw text and look it
/// up directly. A hit is certain (confidence 1.0).
pub struct SkuStrategy;

#[async_trait::async_trait]
impl MatchStrategy for SkuStrategy {
    fn name(&self) -> &'static str {
        "sku"
    }

    async fn resolve(
        &self,
        repo: &dyn EnrichRepository,
        line: &ParsedLine,
    ) -> Result<Option<MatchCandidate>, RepositoryError> {
        let Some(sku) = repo.extract_sku(&line.raw_text) else {
            return Ok(None);
        };

        Ok(repo.find_product_by_sku(&sku).await?.map(|product| MatchCandidate {
            product_id: product.id,
            match_type: MatchType::Sku,
            confidence: 1.0,
        }))
    }
}
