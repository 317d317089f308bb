//! Invoice line enrichment.
//!
//! Takes parsed invoice lines and resolves each one to a catalog
//! product. A deterministic matcher cascade runs first (SKU, vendor
//! mapping, exact normalized name, fuzzy name); lines it cannot
//! settle confidently are batched into a single AI fallback call.
//! Results are persisted per line so a run can be repeated safely.

pub mod attach;
pub mod dispatch;
pub mod error;
pub mod matcher;
pub mod memory;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod repo;

#[cfg(test)]
mod testing;

pub use attach::attach_metadata;
pub use dispatch::AiFallbackDispatcher;
pub use error::{EnrichError, RepositoryError, Result};
pub use matcher::{MatchCandidate, MatchStrategy, MatcherCascade};
pub use memory::{MemoryDataset, MemoryRepository, SavedEnrichment};
pub use models::{
    AiConfig, EnrichConfig, EnrichmentResult, EnrichmentRun, EnrichmentStatus, LineFailure,
    MatchType, MatchingConfig, ParsedLine, Product, ProductMeta, VendorMapping,
};
pub use normalize::normalize;
pub use pipeline::Enricher;
pub use repo::EnrichRepository;

pub use enrich_ai::{AiError, AiMatcher, DisabledAiMatcher, HttpAiMatcher};
