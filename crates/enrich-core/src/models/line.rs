//! Input models: parsed lines, products, and vendor mappings.

use serde::{Deserialize, Serialize};

/// One free-text line of a vendor purchase invoice, as produced by the
/// invoice-parsing subsystem. Immutable input to the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedLine {
    /// Line identifier (persistence key for enrichment results).
    pub id: String,

    /// Parent parsed invoice.
    pub invoice_id: String,

    /// Vendor the invoice came from. May be empty when unknown.
    #[serde(default)]
    pub vendor_id: String,

    /// Raw line text as printed on the invoice.
    pub raw_text: String,

    /// Cleaned-up description from the parser.
    #[serde(default)]
    pub parsed_description: String,
}

/// Canonical product identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub sku: String,
    pub name: String,
}

/// Tax and classification metadata for a product.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hsn_code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gst_rate: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub potency_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_id: Option<String>,
}

impl ProductMeta {
    /// Whether any classification field is set.
    pub fn is_empty(&self) -> bool {
        self.hsn_code.is_none()
            && self.gst_rate.is_none()
            && self.category_id.is_none()
            && self.subcategory_id.is_none()
            && self.form_id.is_none()
            && self.potency_id.is_none()
            && self.unit_id.is_none()
    }
}

/// A previously confirmed association between a vendor's invoice
/// wording and a product, carrying its own confidence. Read-only here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorMapping {
    pub product_id: String,
    pub confidence: f64,
}
