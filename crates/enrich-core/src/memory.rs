//! In-memory reference repository.
//!
//! Backs the CLI and integration-style tests with a dataset loaded
//! from JSON instead of a relational store. Fuzzy lookup is
//! Jaro-Winkler over normalized product names; a production
//! repository would use its own similarity machinery.

use std::collections::HashMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::RepositoryError;
use crate::models::{
    EnrichmentResult, EnrichmentStatus, ParsedLine, Product, ProductMeta, VendorMapping,
};
use crate::normalize::normalize;
use crate::repo::EnrichRepository;

/// One catalog product with its classification metadata inline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductEntry {
    pub id: String,
    pub sku: String,
    pub name: String,

    #[serde(flatten)]
    pub meta: ProductMeta,
}

/// One confirmed vendor text-to-product association.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingEntry {
    pub vendor_id: String,
    /// Vendor's SKU token as it appears on their invoices.
    pub vendor_sku: String,
    pub product_id: String,
    pub confidence: f64,
}

/// Serde shape of a full dataset file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryDataset {
    #[serde(default)]
    pub products: Vec<ProductEntry>,

    #[serde(default)]
    pub vendor_mappings: Vec<MappingEntry>,

    #[serde(default)]
    pub lines: Vec<ParsedLine>,
}

/// A saved enrichment record, observable for tests and CLI output.
#[derive(Debug, Clone)]
pub struct SavedEnrichment {
    pub invoice_id: String,
    pub status: EnrichmentStatus,
    pub result: Option<EnrichmentResult>,
}

/// Repository over an in-memory dataset.
pub struct MemoryRepository {
    products: Vec<Product>,
    products_by_sku: HashMap<String, Product>,
    products_by_normalized: HashMap<String, Product>,
    meta: HashMap<String, ProductMeta>,
    mappings: HashMap<(String, String), VendorMapping>,
    lines_by_invoice: HashMap<String, Vec<ParsedLine>>,
    saved: Mutex<HashMap<String, SavedEnrichment>>,
}

impl MemoryRepository {
    pub fn from_dataset(dataset: MemoryDataset) -> Self {
        let mut products = Vec::new();
        let mut products_by_sku = HashMap::new();
        let mut products_by_normalized = HashMap::new();
        let mut meta = HashMap::new();

        for entry in dataset.products {
            let product = Product {
                id: entry.id.clone(),
                sku: entry.sku.clone(),
                name: entry.name.clone(),
            };
            products_by_sku.insert(entry.sku.to_uppercase(), product.clone());
            products_by_normalized.insert(normalize(&entry.name), product.clone());
            if !entry.meta.is_empty() {
                meta.insert(entry.id, entry.meta);
            }
            products.push(product);
        }

        let mappings = dataset
            .vendor_mappings
            .into_iter()
            .map(|entry| {
                (
                    (entry.vendor_id, entry.vendor_sku.to_uppercase()),
                    VendorMapping {
                        product_id: entry.product_id,
                        confidence: entry.confidence,
                    },
                )
            })
            .collect();

        let mut lines_by_invoice: HashMap<String, Vec<ParsedLine>> = HashMap::new();
        for line in dataset.lines {
            lines_by_invoice
                .entry(line.invoice_id.clone())
                .or_default()
                .push(line);
        }

        Self {
            products,
            products_by_sku,
            products_by_normalized,
            meta,
            mappings,
            lines_by_invoice,
            saved: Mutex::new(HashMap::new()),
        }
    }

    /// Parse a dataset from JSON text.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::from_dataset(serde_json::from_str(json)?))
    }

    /// Invoice ids present in the dataset, sorted.
    pub fn invoice_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.lines_by_invoice.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Snapshot of everything saved so far, keyed by line id.
    pub fn saved(&self) -> HashMap<String, SavedEnrichment> {
        self.saved
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait::async_trait]
impl EnrichRepository for MemoryRepository {
    async fn get_parsed_lines(
        &self,
        invoice_id: &str,
    ) -> Result<Vec<ParsedLine>, RepositoryError> {
        Ok(self
            .lines_by_invoice
            .get(invoice_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn find_product_by_sku(&self, sku: &str) -> Result<Option<Product>, RepositoryError> {
        Ok(self.products_by_sku.get(&sku.to_uppercase()).cloned())
    }

    async fn find_vendor_mapping(
        &self,
        vendor_id: &str,
        raw_text: &str,
    ) -> Result<Option<VendorMapping>, RepositoryError> {
        // Mappings are keyed by the vendor's own SKU token, extracted
        // from the raw text the same way the SKU strategy does.
        let Some(vendor_sku) = self.extract_sku(raw_text) else {
            return Ok(None);
        };
        Ok(self
            .mappings
            .get(&(vendor_id.to_string(), vendor_sku))
            .cloned())
    }

    async fn find_product_by_normalized_name(
        &self,
        normalized: &str,
    ) -> Result<Option<Product>, RepositoryError> {
        Ok(self.products_by_normalized.get(normalized).cloned())
    }

    async fn fuzzy_match_product(
        &self,
        description: &str,
    ) -> Result<Option<(Product, f64)>, RepositoryError> {
        let needle = normalize(description);
        if needle.is_empty() {
            return Ok(None);
        }

        let best = self
            .products
            .iter()
            .map(|product| {
                let score = strsim::jaro_winkler(&needle, &normalize(&product.name));
                (product, score)
            })
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

        match best {
            Some((product, score)) => {
                debug!(product = %product.id, score, "fuzzy candidate");
                Ok(Some((product.clone(), score)))
            }
            None => Ok(None),
        }
    }

    async fn get_product_meta(
        &self,
        product_id: &str,
    ) -> Result<Option<ProductMeta>, RepositoryError> {
        Ok(self.meta.get(product_id).cloned())
    }

    async fn save_enrichment(
        &self,
        invoice_id: &str,
        line_id: &str,
        result: &EnrichmentResult,
    ) -> Result<(), RepositoryError> {
        let mut saved = self
            .saved
            .lock()
            .map_err(|_| RepositoryError::Write("saved lock poisoned".to_string()))?;
        saved.insert(
            line_id.to_string(),
            SavedEnrichment {
                invoice_id: invoice_id.to_string(),
                status: EnrichmentStatus::Done,
                result: Some(result.clone()),
            },
        );
        Ok(())
    }

    async fn save_enrichment_status(
        &self,
        invoice_id: &str,
        line_id: &str,
        status: EnrichmentStatus,
        _confidence: f64,
    ) -> Result<(), RepositoryError> {
        let mut saved = self
            .saved
            .lock()
            .map_err(|_| RepositoryError::Write("saved lock poisoned".to_string()))?;
        saved
            .entry(line_id.to_string())
            .and_modify(|record| record.status = status)
            .or_insert(SavedEnrichment {
                invoice_id: invoice_id.to_string(),
                status,
                result: None,
            });
        Ok(())
    }
}
