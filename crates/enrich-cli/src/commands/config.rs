//! Config command - manage configuration.

use std::fs;
use std::path::PathBuf;

use clap::{Args, Subcommand};
use console::style;

use enrich_core::models::EnrichConfig;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Initialize a new configuration file
    Init(InitArgs),

    /// Get a specific configuration value
    Get {
        /// Configuration key (e.g., "matching.accept_threshold")
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// New value
        value: String,
    },

    /// Show configuration file path
    Path,
}

#[derive(Args)]
struct InitArgs {
    /// Output path for configuration file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Overwrite existing file
    #[arg(long)]
    force: bool,
}

pub async fn run(args: ConfigArgs) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(),
        ConfigCommand::Init(init_args) => init_config(init_args),
        ConfigCommand::Get { key } => get_config(&key),
        ConfigCommand::Set { key, value } => set_config(&key, &value),
        ConfigCommand::Path => show_path(),
    }
}

fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("enrich")
        .join("config.json")
}

fn show_config() -> anyhow::Result<()> {
    let config_path = default_config_path();

    let config = if config_path.exists() {
        EnrichConfig::from_file(&config_path)?
    } else {
        println!(
            "{} No config file found, showing defaults.",
            style("ℹ").blue()
        );
        EnrichConfig::default()
    };

    println!("{}", serde_json::to_string_pretty(&config)?);

    Ok(())
}

fn init_config(args: InitArgs) -> anyhow::Result<()> {
    let output_path = args.output.unwrap_or_else(default_config_path);

    if output_path.exists() && !args.force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            output_path.display()
        );
    }

    // Create parent directory if needed
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let config = EnrichConfig::default();
    config.save(&output_path)?;

    println!(
        "{} Created configuration file at {}",
        style("✓").green(),
        output_path.display()
    );

    Ok(())
}

/// Every settable key, flat. The config surface is two small known
/// sections, so keys are matched explicitly instead of walking JSON.
const KNOWN_KEYS: &[&str] = &[
    "matching.accept_threshold",
    "matching.fuzzy_floor",
    "matching.exact_confidence",
    "ai.endpoint",
    "ai.timeout_secs",
];

fn read_key(config: &EnrichConfig, key: &str) -> anyhow::Result<String> {
    let value = match key {
        "matching" => serde_json::to_string_pretty(&config.matching)?,
        "ai" => serde_json::to_string_pretty(&config.ai)?,
        "matching.accept_threshold" => config.matching.accept_threshold.to_string(),
        "matching.fuzzy_floor" => config.matching.fuzzy_floor.to_string(),
        "matching.exact_confidence" => config.matching.exact_confidence.to_string(),
        "ai.endpoint" => config.ai.endpoint.clone(),
        "ai.timeout_secs" => config.ai.timeout_secs.to_string(),
        _ => anyhow::bail!(
            "Unknown configuration key: {} (known keys: {})",
            key,
            KNOWN_KEYS.join(", ")
        ),
    };
    Ok(value)
}

fn write_key(config: &mut EnrichConfig, key: &str, value: &str) -> anyhow::Result<()> {
    let threshold = || -> anyhow::Result<f64> {
        value
            .parse()
            .map_err(|_| anyhow::anyhow!("Expected a number for {}, got {:?}", key, value))
    };

    match key {
        "matching.accept_threshold" => config.matching.accept_threshold = threshold()?,
        "matching.fuzzy_floor" => config.matching.fuzzy_floor = threshold()?,
        "matching.exact_confidence" => config.matching.exact_confidence = threshold()?,
        "ai.endpoint" => config.ai.endpoint = value.to_string(),
        "ai.timeout_secs" => {
            config.ai.timeout_secs = value
                .parse()
                .map_err(|_| anyhow::anyhow!("Expected seconds for {}, got {:?}", key, value))?
        }
        _ => anyhow::bail!(
            "Unknown configuration key: {} (known keys: {})",
            key,
            KNOWN_KEYS.join(", ")
        ),
    }

    // Threshold edits have to stay in [0, 1].
    config.validate()?;
    Ok(())
}

fn get_config(key: &str) -> anyhow::Result<()> {
    let config_path = default_config_path();

    let config = if config_path.exists() {
        EnrichConfig::from_file(&config_path)?
    } else {
        EnrichConfig::default()
    };

    println!("{}", read_key(&config, key)?);

    Ok(())
}

fn set_config(key: &str, value: &str) -> anyhow::Result<()> {
    let config_path = default_config_path();

    let mut config = if config_path.exists() {
        EnrichConfig::from_file(&config_path)?
    } else {
        // Create parent directory if needed
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        EnrichConfig::default()
    };

    write_key(&mut config, key, value)?;
    config.save(&config_path)?;

    println!("{} Set {} = {}", style("✓").green(), key, value);

    Ok(())
}

fn show_path() -> anyhow::Result<()> {
    let config_path = default_config_path();

    println!("Configuration file: {}", config_path.display());

    if config_path.exists() {
        println!("Status: {}", style("exists").green());
    } else {
        println!("Status: {}", style("not created").yellow());
        println!();
        println!("Run 'enrich config init' to create a configuration file.");
    }

    Ok(())
}
