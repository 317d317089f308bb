//! Data models for invoice-line enrichment.

pub mod config;
pub mod enrichment;
pub mod line;

pub use config::{AiConfig, EnrichConfig, MatchingConfig};
pub use enrichment::{
    EnrichmentResult, EnrichmentRun, EnrichmentStatus, LineFailure, MatchType,
};
pub use line::{ParsedLine, Product, ProductMeta, VendorMapping};
