//! AI fallback matcher transport for invoice-line enrichment.
//!
//! This crate owns the batch wire contract with the external AI
//! matching service and the HTTP client that speaks it. The policy of
//! *which* lines are sent and how responses merge into deterministic
//! results lives in `enrich-core`; this layer only moves bytes.

pub mod client;
pub mod error;
pub mod wire;

pub use client::{AiMatcher, DisabledAiMatcher, HttpAiMatcher};
pub use error::AiError;
pub use wire::{AiMatchRequest, AiMatchResponse, AiRequestLine, AiResponseLine};
