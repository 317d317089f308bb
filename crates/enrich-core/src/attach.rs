//! Metadata attachment.

use crate::error::RepositoryError;
use crate::models::EnrichmentResult;
use crate::repo::EnrichRepository;

/// Fill tax/classification fields from product metadata.
///
/// Only unset fields are filled, so HSN/GST values the AI merge step
/// already wrote stay authoritative. A product with no metadata row
/// leaves the result untouched.
pub async fn attach_metadata(
    repo: &dyn EnrichRepository,
    result: &mut EnrichmentResult,
    product_id: &str,
) -> Result<(), RepositoryError> {
    let Some(meta) = repo.get_product_meta(product_id).await? else {
        return Ok(());
    };

    if result.hsn_code.is_none() {
        result.hsn_code = meta.hsn_code;
    }
    if result.gst_rate.is_none() {
        result.gst_rate = meta.gst_rate;
    }
    if result.category_id.is_none() {
        result.category_id = meta.category_id;
    }
    if result.subcategory_id.is_none() {
        result.subcategory_id = meta.subcategory_id;
    }
    if result.form_id.is_none() {
        result.form_id = meta.form_id;
    }
    if result.potency_id.is_none() {
        result.potency_id = meta.potency_id;
    }
    if result.unit_id.is_none() {
        result.unit_id = meta.unit_id;
    }

    Ok(())
}
