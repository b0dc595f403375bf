//! Lead Scoring Core - CLI Entry Point

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};

use lead_scoring_core::constants::{APP_NAME, APP_VERSION};
use lead_scoring_core::logic::features::ColumnLayout;
use lead_scoring_core::logic::model::load_columns;
use lead_scoring_core::{ArtifactStore, FeatureEncoder, InferenceEngine, RawLead, ScoringConfig, ScoringError};

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_INVALID_INPUT: i32 = 1;
const EXIT_IO: i32 = 2;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score one lead and print the prediction as JSON
    Predict {
        /// Path to a JSON object describing the lead (`-` reads stdin)
        lead: String,
    },
    /// Print the encoded feature vector for one lead
    Encode {
        /// Path to a JSON object describing the lead (`-` reads stdin)
        lead: String,
    },
    /// Print model metadata
    Info,
}

#[derive(Parser, Debug)]
#[command(name = "lead-score")]
#[command(about = "Bank-marketing lead scoring", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Artifact directory (overrides LEAD_SCORING_MODEL_DIR)
    #[arg(short, long, global = true)]
    model_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// CLI-level failure, mapped to an exit code
enum CliError {
    Invalid(String),
    Io(String),
}

impl CliError {
    fn exit_code(&self) -> i32 {
        match self {
            CliError::Invalid(_) => EXIT_INVALID_INPUT,
            CliError::Io(_) => EXIT_IO,
        }
    }

    fn message(&self) -> &str {
        match self {
            CliError::Invalid(m) | CliError::Io(m) => m,
        }
    }
}

impl From<ScoringError> for CliError {
    fn from(e: ScoringError) -> Self {
        if e.is_invalid_input() {
            CliError::Invalid(e.to_string())
        } else {
            CliError::Io(e.to_string())
        }
    }
}

fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    log::debug!("{} v{}", APP_NAME, APP_VERSION);

    let mut config = ScoringConfig::from_env();
    if let Some(dir) = cli.model_dir {
        config = config.with_model_dir(dir);
    }

    let outcome = match cli.command {
        Commands::Predict { lead } => run_predict(&config, &lead),
        Commands::Encode { lead } => run_encode(&config, &lead),
        Commands::Info => run_info(&config),
    };

    match outcome {
        Ok(output) => {
            println!("{}", output);
            std::process::exit(EXIT_SUCCESS);
        }
        Err(e) => {
            eprintln!("Error: {}", e.message());
            std::process::exit(e.exit_code());
        }
    }
}

fn build_engine(config: &ScoringConfig) -> InferenceEngine {
    let store = Arc::new(ArtifactStore::load(config));
    InferenceEngine::with_config(store, config)
}

fn run_predict(config: &ScoringConfig, source: &str) -> Result<String, CliError> {
    let lead = read_lead(source)?;
    let engine = build_engine(config);

    let result = engine.predict(&lead)?;
    to_pretty_json(&result)
}

fn run_encode(config: &ScoringConfig, source: &str) -> Result<String, CliError> {
    let lead = read_lead(source)?;

    // Only the column list is needed to encode
    let columns = load_columns(&config.columns_path())?;
    let layout = Arc::new(ColumnLayout::new(columns)?);

    let vector = FeatureEncoder::new().encode(&lead, &layout);
    to_pretty_json(&vector.to_log_entry())
}

fn run_info(config: &ScoringConfig) -> Result<String, CliError> {
    to_pretty_json(&build_engine(config).metadata())
}

fn read_lead(source: &str) -> Result<RawLead, CliError> {
    let content = if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| CliError::Io(format!("Failed to read stdin: {}", e)))?;
        buf
    } else {
        std::fs::read_to_string(Path::new(source))
            .map_err(|e| CliError::Io(format!("Failed to read {}: {}", source, e)))?
    };

    let value: serde_json::Value = serde_json::from_str(&content)
        .map_err(|e| CliError::Io(format!("Invalid JSON in {}: {}", source, e)))?;

    Ok(RawLead::from_json(value)?)
}

fn to_pretty_json<T: serde::Serialize>(value: &T) -> Result<String, CliError> {
    serde_json::to_string_pretty(value).map_err(|e| CliError::Io(format!("Serialize error: {}", e)))
}
