//! Error types for the enrich-core library.

use thiserror::Error;

/// Main error type for an enrichment run.
///
/// Only invoice-level failures surface here. Per-line persistence
/// failures are collected on the run result, and AI failures degrade
/// silently to deterministic-only output.
#[derive(Error, Debug)]
pub enum EnrichError {
    /// The invoice id has no parsed lines.
    #[error("invoice not found: {0}")]
    InvoiceNotFound(String),

    /// Repository failure that is fatal to the whole run.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors from the backing repository.
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// A lookup failed.
    #[error("query failed: {0}")]
    Query(String),

    /// A write failed.
    #[error("write failed: {0}")]
    Write(String),
}

/// Result type for the enrich-core library.
pub type Result<T> = std::result::Result<T, EnrichError>;
