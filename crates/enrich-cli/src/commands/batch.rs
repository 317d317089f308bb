//! Batch command - enrich every invoice in a dataset file.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, warn};

use enrich_core::models::EnrichmentRun;
use enrich_core::Enricher;

use super::run::{build_matcher, load_config, load_repository};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Dataset file (JSON with products, vendor mappings and lines)
    #[arg(required = true)]
    dataset: PathBuf,

    /// Shop id sent with the AI batch requests
    #[arg(short, long, default_value = "default")]
    shop_id: String,

    /// Re-evaluate every line with AI, ignoring deterministic matches
    #[arg(long)]
    force_ai: bool,

    /// Skip the AI fallback entirely
    #[arg(long)]
    no_ai: bool,

    /// Override the AI endpoint from the config file
    #[arg(long)]
    ai_url: Option<String>,

    /// Directory for per-invoice JSON results
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    config.validate()?;

    let repo = load_repository(&args.dataset)?;
    let invoice_ids = repo.invoice_ids();
    if invoice_ids.is_empty() {
        anyhow::bail!("Dataset contains no invoice lines: {}", args.dataset.display());
    }

    println!(
        "{} Found {} invoices to enrich",
        style("ℹ").blue(),
        invoice_ids.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let ai = build_matcher(&config, args.no_ai, args.ai_url.as_deref())?;
    let enricher = Enricher::new(Arc::new(repo), ai, config);

    let pb = ProgressBar::new(invoice_ids.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} invoices")
            .unwrap()
            .progress_chars("=>-"),
    );

    let mut runs: Vec<EnrichmentRun> = Vec::new();
    let mut failed: Vec<(String, String)> = Vec::new();

    for invoice_id in &invoice_ids {
        match enricher.enrich(invoice_id, &args.shop_id, args.force_ai).await {
            Ok(run) => {
                if let Some(ref output_dir) = args.output_dir {
                    let path = output_dir.join(format!("{invoice_id}.json"));
                    fs::write(&path, serde_json::to_string_pretty(&run)?)?;
                }
                runs.push(run);
            }
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to enrich {}: {}", invoice_id, error_msg);
                    failed.push((invoice_id.clone(), error_msg));
                } else {
                    error!("Failed to enrich {}: {}", invoice_id, error_msg);
                    anyhow::bail!("Enrichment failed: {}", error_msg);
                }
            }
        }

        pb.inc(1);
    }

    pb.finish_with_message("Complete");

    let total_lines: usize = runs.iter().map(|r| r.results.len()).sum();
    let matched: usize = runs
        .iter()
        .map(|r| r.results.iter().filter(|l| l.is_matched()).count())
        .sum();

    println!();
    println!(
        "{} Enriched {} invoices ({} lines, {} matched) in {:.1}s",
        style("✓").green(),
        runs.len(),
        total_lines,
        matched,
        start.elapsed().as_secs_f64()
    );

    if !failed.is_empty() {
        println!("{} {} invoices failed:", style("✗").red(), failed.len());
        for (invoice_id, error) in &failed {
            println!("  - {}: {}", invoice_id, error);
        }
    }

    Ok(())
}
