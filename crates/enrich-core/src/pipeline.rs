//! Enrichment orchestrator.
//!
//! Two-phase design: a fully sequential deterministic pass over every
//! line, then one batched AI call for the uncertain remainder. The AI
//! call is the dominant latency cost; batching amortizes it across
//! the whole invoice.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use enrich_ai::AiMatcher;

use crate::attach::attach_metadata;
use crate::dispatch::AiFallbackDispatcher;
use crate::error::{EnrichError, Result};
use crate::matcher::MatcherCascade;
use crate::models::{
    EnrichConfig, EnrichmentResult, EnrichmentRun, EnrichmentStatus, LineFailure, ParsedLine,
};
use crate::repo::EnrichRepository;

/// Drives the per-invoice enrichment pipeline.
pub struct Enricher {
    repo: Arc<dyn EnrichRepository>,
    ai: Arc<dyn AiMatcher>,
    cascade: MatcherCascade,
    config: EnrichConfig,
}

impl Enricher {
    pub fn new(
        repo: Arc<dyn EnrichRepository>,
        ai: Arc<dyn AiMatcher>,
        config: EnrichConfig,
    ) -> Self {
        let cascade = MatcherCascade::new(&config);
        Self {
            repo,
            ai,
            cascade,
            config,
        }
    }

    /// Enrich every line of one invoice.
    ///
    /// Blocks for up to the AI timeout plus repository latency. A
    /// degraded (AI-less) run is still a successful run; only an
    /// unknown invoice or a failing line load is fatal.
    pub async fn enrich(
        &self,
        invoice_id: &str,
        shop_id: &str,
        force_ai: bool,
    ) -> Result<EnrichmentRun> {
        let lines = self.repo.get_parsed_lines(invoice_id).await?;
        if lines.is_empty() {
            return Err(EnrichError::InvoiceNotFound(invoice_id.to_string()));
        }

        info!(
            invoice = %invoice_id,
            lines = lines.len(),
            force_ai,
            "starting enrichment run"
        );

        let mut results: HashMap<String, EnrichmentResult> = HashMap::new();
        let mut ai_candidates: Vec<ParsedLine> = Vec::new();
        let mut line_failures: Vec<LineFailure> = Vec::new();

        // Phase 1: deterministic cascade, sequential and in order.
        for line in &lines {
            let mut result = self.cascade.resolve(self.repo.as_ref(), line).await;

            if result.is_matched() && !force_ai {
                if let Some(product_id) = result.matched_product_id.clone() {
                    if let Err(err) =
                        attach_metadata(self.repo.as_ref(), &mut result, &product_id).await
                    {
                        warn!(line = %line.id, error = %err, "metadata lookup failed");
                    }
                }
                self.persist(invoice_id, &result, &mut line_failures).await;
            }

            // AI eligibility: forced, unmatched, or confidence below
            // the acceptance threshold. Exactly 0.80 stays final.
            let needs_ai = force_ai
                || !result.is_matched()
                || result.match_confidence < self.config.matching.accept_threshold;
            if needs_ai {
                // Best-effort marker; a failed status write is not a
                // line failure.
                if let Err(err) = self
                    .repo
                    .save_enrichment_status(
                        invoice_id,
                        &line.id,
                        EnrichmentStatus::AiPending,
                        result.match_confidence,
                    )
                    .await
                {
                    debug!(line = %line.id, error = %err, "ai_pending status write failed");
                }
                ai_candidates.push(line.clone());
            }

            results.insert(line.id.clone(), result);
        }

        // Phase 2: one batched AI call, then persist merged lines.
        let dispatcher =
            AiFallbackDispatcher::new(self.ai.as_ref(), self.config.matching.accept_threshold);
        let merged = dispatcher
            .dispatch(shop_id, invoice_id, &ai_candidates, force_ai, &mut results)
            .await;

        for line_id in &merged {
            let Some(result) = results.get_mut(line_id) else {
                continue;
            };
            if let Some(product_id) = result.matched_product_id.clone() {
                if let Err(err) = attach_metadata(self.repo.as_ref(), result, &product_id).await {
                    warn!(line = %line_id, error = %err, "metadata lookup failed");
                }
            }
            let result = result.clone();
            self.persist(invoice_id, &result, &mut line_failures).await;
        }

        let ordered = lines
            .iter()
            .filter_map(|line| results.remove(&line.id))
            .collect();

        Ok(EnrichmentRun {
            invoice_id: invoice_id.to_string(),
            results: ordered,
            computed_at: Utc::now(),
            line_failures,
        })
    }

    /// Per-line upsert. A failed write is recorded and the run
    /// continues; the failure is attributable to that line only.
    async fn persist(
        &self,
        invoice_id: &str,
        result: &EnrichmentResult,
        line_failures: &mut Vec<LineFailure>,
    ) {
        if let Err(err) = self
            .repo
            .save_enrichment(invoice_id, &result.line_id, result)
            .await
        {
            warn!(line = %result.line_id, error = %err, "enrichment save failed");
            line_failures.push(LineFailure {
                line_id: result.line_id.clone(),
                error: err.to_string(),
            });
        }
    }
}
