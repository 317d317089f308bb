//! Shared stubs for unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use enrich_ai::{AiError, AiMatchRequest, AiMatchResponse, AiMatcher};

use crate::error::RepositoryError;
use crate::models::{
    EnrichmentResult, EnrichmentStatus, ParsedLine, Product, ProductMeta, VendorMapping,
};
use crate::repo::EnrichRepository;

/// Build a parsed line whose description equals its raw text.
pub(crate) fn line(id: &str, invoice_id: &str, vendor_id: &str, text: &str) -> ParsedLine {
    ParsedLine {
        id: id.to_string(),
        invoice_id: invoice_id.to_string(),
        vendor_id: vendor_id.to_string(),
        raw_text: text.to_string(),
        parsed_description: text.to_string(),
    }
}

#[derive(Default)]
struct StubRepoState {
    lines: HashMap<String, Vec<ParsedLine>>,
    products_by_sku: HashMap<String, Product>,
    vendor_mappings: HashMap<String, VendorMapping>,
    exact_products: Vec<Product>,
    fuzzy: Option<(Product, f64)>,
    meta: HashMap<String, ProductMeta>,
    fail_sku_lookup: bool,
    fail_saves_for: HashSet<String>,
    saved: HashMap<String, EnrichmentResult>,
    save_counts: HashMap<String, usize>,
    status_counts: HashMap<String, usize>,
    statuses: HashMap<String, EnrichmentStatus>,
}

/// Configurable in-test repository. Clones share state, so a handle
/// kept outside the `Enricher` observes its writes.
#[derive(Clone, Default)]
pub(crate) struct StubRepo {
    state: Arc<Mutex<StubRepoState>>,
}

impl StubRepo {
    pub fn with_lines(self, invoice_id: &str, lines: Vec<ParsedLine>) -> Self {
        self.state
            .lock()
            .unwrap()
            .lines
            .insert(invoice_id.to_string(), lines);
        self
    }

    pub fn with_product_sku(self, sku: &str, product: Product) -> Self {
        self.state
            .lock()
            .unwrap()
            .products_by_sku
            .insert(sku.to_string(), product);
        self
    }

    pub fn with_vendor_mapping(self, vendor_id: &str, mapping: VendorMapping) -> Self {
        self.state
            .lock()
            .unwrap()
            .vendor_mappings
            .insert(vendor_id.to_string(), mapping);
        self
    }

    pub fn with_exact_product(self, product: Product) -> Self {
        self.state.lock().unwrap().exact_products.push(product);
        self
    }

    pub fn with_fuzzy(self, product: Product, score: f64) -> Self {
        self.state.lock().unwrap().fuzzy = Some((product, score));
        self
    }

    pub fn with_meta(self, product_id: &str, meta: ProductMeta) -> Self {
        self.state
            .lock()
            .unwrap()
            .meta
            .insert(product_id.to_string(), meta);
        self
    }

    pub fn with_sku_failure(self) -> Self {
        self.state.lock().unwrap().fail_sku_lookup = true;
        self
    }

    pub fn with_save_failure(self, line_id: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .fail_saves_for
            .insert(line_id.to_string());
        self
    }

    pub fn saved_records(&self) -> HashMap<String, EnrichmentResult> {
        self.state.lock().unwrap().saved.clone()
    }

    pub fn saved_count(&self, line_id: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .save_counts
            .get(line_id)
            .copied()
            .unwrap_or(0)
    }

    pub fn status_count(&self, line_id: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .status_counts
            .get(line_id)
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait::async_trait]
impl EnrichRepository for StubRepo {
    async fn get_parsed_lines(
        &self,
        invoice_id: &str,
    ) -> Result<Vec<ParsedLine>, RepositoryError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .lines
            .get(invoice_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn find_product_by_sku(&self, sku: &str) -> Result<Option<Product>, RepositoryError> {
        let state = self.state.lock().unwrap();
        if state.fail_sku_lookup {
            return Err(RepositoryError::Query("sku lookup unavailable".to_string()));
        }
        Ok(state.products_by_sku.get(sku).cloned())
    }

    async fn find_vendor_mapping(
        &self,
        vendor_id: &str,
        _raw_text: &str,
    ) -> Result<Option<VendorMapping>, RepositoryError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .vendor_mappings
            .get(vendor_id)
            .cloned())
    }

    async fn find_product_by_normalized_name(
        &self,
        normalized: &str,
    ) -> Result<Option<Product>, RepositoryError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .exact_products
            .iter()
            .find(|p| crate::normalize::normalize(&p.name) == normalized)
            .cloned())
    }

    async fn fuzzy_match_product(
        &self,
        _description: &str,
    ) -> Result<Option<(Product, f64)>, RepositoryError> {
        Ok(self.state.lock().unwrap().fuzzy.clone())
    }

    async fn get_product_meta(
        &self,
        product_id: &str,
    ) -> Result<Option<ProductMeta>, RepositoryError> {
        Ok(self.state.lock().unwrap().meta.get(product_id).cloned())
    }

    async fn save_enrichment(
        &self,
        _invoice_id: &str,
        line_id: &str,
        result: &EnrichmentResult,
    ) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_saves_for.contains(line_id) {
            return Err(RepositoryError::Write("disk full".to_string()));
        }
        *state.save_counts.entry(line_id.to_string()).or_insert(0) += 1;
        state.saved.insert(line_id.to_string(), result.clone());
        state
            .statuses
            .insert(line_id.to_string(), EnrichmentStatus::Done);
        Ok(())
    }

    async fn save_enrichment_status(
        &self,
        _invoice_id: &str,
        line_id: &str,
        status: EnrichmentStatus,
        _confidence: f64,
    ) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().unwrap();
        *state.status_counts.entry(line_id.to_string()).or_insert(0) += 1;
        state.statuses.insert(line_id.to_string(), status);
        Ok(())
    }
}

#[derive(Default)]
struct StubAiState {
    response: Option<AiMatchResponse>,
    error: Option<AiError>,
    requests: Vec<AiMatchRequest>,
}

/// Scripted AI matcher. Clones share state, so tests can inspect the
/// batch the pipeline sent.
#[derive(Clone, Default)]
pub(crate) struct StubAiMatcher {
    state: Arc<Mutex<StubAiState>>,
}

impl StubAiMatcher {
    pub fn with_response(response: AiMatchResponse) -> Self {
        let matcher = Self::default();
        matcher.state.lock().unwrap().response = Some(response);
        matcher
    }

    pub fn with_error(error: AiError) -> Self {
        let matcher = Self::default();
        matcher.state.lock().unwrap().error = Some(error);
        matcher
    }

    /// Equivalent to a response that names no lines.
    pub fn disabled() -> Self {
        Self::with_response(AiMatchResponse::default())
    }

    pub fn call_count(&self) -> usize {
        self.state.lock().unwrap().requests.len()
    }

    pub fn requests(&self) -> Vec<AiMatchRequest> {
        self.state.lock().unwrap().requests.clone()
    }
}

fn clone_error(error: &AiError) -> AiError {
    match error {
        AiError::Transport(msg) => AiError::Transport(msg.clone()),
        AiError::Timeout => AiError::Timeout,
        AiError::Status(code) => AiError::Status(*code),
        AiError::Malformed(msg) => AiError::Malformed(msg.clone()),
    }
}

#[async_trait::async_trait]
impl AiMatcher for StubAiMatcher {
    async fn match_lines(&self, request: &AiMatchRequest) -> Result<AiMatchResponse, AiError> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(request.clone());
        if let Some(error) = &state.error {
            return Err(clone_error(error));
        }
        Ok(state.response.clone().unwrap_or_default())
    }
}
