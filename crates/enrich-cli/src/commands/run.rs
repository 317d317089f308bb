//! Run command - enrich a single invoice from a dataset file.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use tracing::{debug, info};

use enrich_ai::{AiMatcher, DisabledAiMatcher, HttpAiMatcher};
use enrich_core::models::{EnrichConfig, EnrichmentRun, MatchType};
use enrich_core::{Enricher, MemoryRepository};

/// Arguments for the run command.
#[derive(Args)]
pub struct RunArgs {
    /// Invoice id to enrich
    #[arg(required = true)]
    invoice_id: String,

    /// Dataset file (JSON with products, vendor mappings and lines)
    #[arg(short, long)]
    dataset: PathBuf,

    /// Shop id sent with the AI batch request
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

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Plain text summary
    Text,
}

pub async fn run(args: RunArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    config.validate()?;

    let repo = load_repository(&args.dataset)?;
    let ai = build_matcher(&config, args.no_ai, args.ai_url.as_deref())?;

    info!(invoice = %args.invoice_id, "enriching invoice");

    let enricher = Enricher::new(Arc::new(repo), ai, config);
    let run = enricher
        .enrich(&args.invoice_id, &args.shop_id, args.force_ai)
        .await?;

    let output = format_run(&run, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if !run.line_failures.is_empty() {
        eprintln!("{}", style("Save failures:").yellow());
        for failure in &run.line_failures {
            eprintln!("  - {}: {}", failure.line_id, failure.error);
        }
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

pub fn load_config(config_path: Option<&str>) -> anyhow::Result<EnrichConfig> {
    match config_path {
        Some(path) => Ok(EnrichConfig::from_file(std::path::Path::new(path))?),
        None => Ok(EnrichConfig::default()),
    }
}

pub fn load_repository(dataset: &PathBuf) -> anyhow::Result<MemoryRepository> {
    if !dataset.exists() {
        anyhow::bail!("Dataset file not found: {}", dataset.display());
    }
    let content = fs::read_to_string(dataset)?;
    MemoryRepository::from_json(&content)
        .map_err(|e| anyhow::anyhow!("Invalid dataset {}: {}", dataset.display(), e))
}

pub fn build_matcher(
    config: &EnrichConfig,
    no_ai: bool,
    ai_url: Option<&str>,
) -> anyhow::Result<Arc<dyn AiMatcher>> {
    if no_ai {
        return Ok(Arc::new(DisabledAiMatcher));
    }

    let endpoint = ai_url.unwrap_or(&config.ai.endpoint);
    let matcher =
        HttpAiMatcher::with_timeout(endpoint, Duration::from_secs(config.ai.timeout_secs))?;
    Ok(Arc::new(matcher))
}

pub fn format_run(run: &EnrichmentRun, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(run)?),
        OutputFormat::Text => Ok(format_text(run)),
    }
}

fn format_text(run: &EnrichmentRun) -> String {
    let mut output = String::new();

    output.push_str(&format!("Invoice: {}\n", run.invoice_id));
    output.push_str(&format!(
        "Computed: {}\n\n",
        run.computed_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    let matched = run.results.iter().filter(|r| r.is_matched()).count();
    output.push_str(&format!(
        "Lines: {} total, {} matched, {} unmatched\n\n",
        run.results.len(),
        matched,
        run.results.len() - matched
    ));

    for result in &run.results {
        let marker = if result.is_matched() { "✓" } else { "✗" };
        output.push_str(&format!(
            "  {} {}  {:<10} {:.2}",
            marker,
            result.line_id,
            result.match_type.as_str(),
            result.match_confidence
        ));
        if let Some(product_id) = &result.matched_product_id {
            output.push_str(&format!("  -> {}", product_id));
        }
        if result.match_type == MatchType::Ai {
            if let Some(reason) = &result.reason {
                output.push_str(&format!("  ({})", reason));
            }
        }
        output.push('\n');
    }

    output
}
