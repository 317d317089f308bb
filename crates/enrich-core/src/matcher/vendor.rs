//! Vendor mapping strategy.

use super::{MatchCandidate, MatchStrategy};
use crate::error::RepositoryError;
use crate::models::{MatchType, ParsedLine};
use crate::repo::EnrichRepository;

/// Strategy 2: a previously confirmed per-vendor text-to-product
/// mapping. Confidence is whatever the mapping recorded when it was
/// established.
pub struct VendorMappingStrategy;

#[async_trait::async_trait]
impl MatchStrategy for VendorMappingStrategy {
    fn name(&self) -> &'static str {
        "vendor_map"
    }

    async fn resolve(
        &self,
        repo: &dyn EnrichRepository,
        line: &ParsedLine,
    ) -> Result<Option<MatchCandidate>, RepositoryError> {
        if line.vendor_id.is_empty() {
            return Ok(None);
        }

        Ok(repo
            .find_vendor_mapping(&line.vendor_id, &line.raw_text)
            .await?
            .map(|mapping| MatchCandidate {
                product_id: mapping.product_id,
                match_type: MatchType::VendorMap,
                confidence: mapping.confidence,
            }))
    }
}
