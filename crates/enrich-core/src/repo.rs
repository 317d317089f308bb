//! Repository interface consumed by the enrichment pipeline.

use crate::error::RepositoryError;
use crate::models::{
    EnrichmentResult, EnrichmentStatus, ParsedLine, Product, ProductMeta, VendorMapping,
};

/// Minimum token length for the SKU extraction heuristic.
const MIN_SKU_LEN: usize = 5;

/// Lookup and persistence operations the pipeline needs.
///
/// Implementations back onto whatever store holds products, vendor
/// mappings, and enrichment state. `save_enrichment` must be an
/// upsert keyed by line id: re-enrichment replaces, never appends.
#[async_trait::async_trait]
pub trait EnrichRepository: Send + Sync {
    /// All parsed lines of an invoice, in line order. An unknown
    /// invoice yields an empty list.
    async fn get_parsed_lines(&self, invoice_id: &str)
        -> Result<Vec<ParsedLine>, RepositoryError>;

    /// Pull a SKU-like token out of raw line text.
    ///
    /// Default heuristic: the first uppercased whitespace token of
    /// length >= 5 that contains a dash or a digit.
    fn extract_sku(&self, raw_text: &str) -> Option<String> {
        raw_text
            .to_uppercase()
            .split_whitespace()
            .find(|tok| {
                tok.len() >= MIN_SKU_LEN
                    && (tok.contains('-') || tok.chars().any(|c| c.is_ascii_digit()))
            })
            .map(|tok| tok.to_string())
    }

    async fn find_product_by_sku(&self, sku: &str) -> Result<Option<Product>, RepositoryError>;

    /// Prior vendor-specific text-to-product mapping for this raw text.
    async fn find_vendor_mapping(
        &self,
        vendor_id: &str,
        raw_text: &str,
    ) -> Result<Option<VendorMapping>, RepositoryError>;

    /// Exact product lookup by normalized name key.
    async fn find_product_by_normalized_name(
        &self,
        normalized: &str,
    ) -> Result<Option<Product>, RepositoryError>;

    /// Best approximate candidate for a parsed description, with its
    /// similarity score in [0, 1]. The similarity algorithm is an
    /// implementation concern of the repository.
    async fn fuzzy_match_product(
        &self,
        description: &str,
    ) -> Result<Option<(Product, f64)>, RepositoryError>;

    /// Classification metadata for a product.
    async fn get_product_meta(
        &self,
        product_id: &str,
    ) -> Result<Option<ProductMeta>, RepositoryError>;

    /// Upsert the enrichment record for a line.
    async fn save_enrichment(
        &self,
        invoice_id: &str,
        line_id: &str,
        result: &EnrichmentResult,
    ) -> Result<(), RepositoryError>;

    /// Upsert only the status/confidence of a line's record, used to
    /// mark lines queued for the AI batch.
    async fn save_enrichment_status(
        &self,
        invoice_id: &str,
        line_id: &str,
        status: EnrichmentStatus,
        confidence: f64,
    ) -> Result<(), RepositoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubRepo;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extract_sku_finds_dashed_token() {
        let repo = StubRepo::default();
        assert_eq!(
            repo.extract_sku("ARN-30C-001 Arnica Montana"),
            Some("ARN-30C-001".to_string())
        );
    }

    #[test]
    fn test_extract_sku_uppercases() {
        let repo = StubRepo::default();
        assert_eq!(repo.extract_sku("arn-30c-001"), Some("ARN-30C-001".to_string()));
    }

    #[test]
    fn test_extract_sku_ignores_short_and_plain_tokens() {
        let repo = StubRepo::default();
        // All tokens are either short or digit-and-dash free.
        assert_eq!(repo.extract_sku("some random text"), None);
        assert_eq!(repo.extract_sku("AB-1 x"), None);
    }

    #[test]
    fn test_extract_sku_accepts_numeric_token() {
        let repo = StubRepo::default();
        assert_eq!(repo.extract_sku("item 903012 pack"), Some("903012".to_string()));
    }
}
