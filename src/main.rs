use clap::Parser;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};

use score_revisions::config::{self, Overrides};
use score_revisions::input;
use score_revisions::scoring::FeatureCache;
use score_revisions::service::{create_client, ModelInfo, RemoteScoreProcessor, ServiceError};
use score_revisions::{logging, output};

const EXIT_SUCCESS: i32 = 0;
const EXIT_DATA: i32 = 1;
const EXIT_NETWORK: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Parser, Debug)]
#[command(name = "score-revisions")]
#[command(about = "Score revisions by overall article quality", long_about = None)]
#[command(version)]
struct Cli {
    /// Model file naming the scoring model and wiki (JSON)
    model_file: PathBuf,

    /// Base URL of the scoring service
    #[arg(long)]
    host: Option<String>,

    /// JSON object of cached feature values to use when scoring
    #[arg(long)]
    cache: Option<String>,

    /// Log resolved settings and a summary of the run
    #[arg(long)]
    verbose: bool,

    /// Print debug logging
    #[arg(long)]
    debug: bool,

    /// Path to config file (defaults to ~/.config/score-revisions/config.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Revisions per scoring request
    #[arg(long)]
    batch_size: Option<usize>,

    /// Input column holding the revision id (default: page_latest)
    #[arg(long)]
    rev_id_column: Option<String>,

    /// User agent sent to the scoring service
    #[arg(long)]
    user_agent: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    let start_time = Instant::now();

    if let Err(e) = logging::init_logging(cli.debug) {
        eprintln!("Logging error: {:#}", e);
        std::process::exit(EXIT_CONFIG);
    }

    // Load settings
    let file_config = match config::load_config(cli.config.clone()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let overrides = Overrides {
        host: cli.host.clone(),
        user_agent: cli.user_agent.clone(),
        batch_size: cli.batch_size,
        rev_id_column: cli.rev_id_column.clone(),
    };

    let settings = match config::resolve_settings(file_config, overrides) {
        Ok(s) => s,
        Err(errors) => {
            eprintln!("Config errors:");
            for error in errors {
                eprintln!("  - {}", error);
            }
            std::process::exit(EXIT_CONFIG);
        }
    };

    if cli.verbose {
        info!(
            host = %settings.service.host,
            batch_size = settings.service.batch_size,
            timeout = ?settings.service.timeout,
            retries = settings.service.retries,
            rev_id_column = %settings.rev_id_column,
            "Resolved settings"
        );
    }

    // The model must load before anything is read or written
    let model = match ModelInfo::load(&cli.model_file) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Model error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };
    debug!(model = %model.name, context = %model.context, "Loaded model");

    let cache = match FeatureCache::parse(cli.cache.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Cache error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let client = match create_client(&settings.service) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to create HTTP client: {:#}", e);
            std::process::exit(EXIT_NETWORK);
        }
    };

    let processor = RemoteScoreProcessor::new(client, settings.service.clone(), model);

    let rev_ids = match input::rev_ids(io::stdin().lock(), &settings.rev_id_column) {
        Ok(ids) => ids,
        Err(e) => {
            eprintln!("Input error: {}", e);
            std::process::exit(EXIT_DATA);
        }
    };

    let out = BufWriter::new(io::stdout().lock());
    let progress = io::stderr();

    match output::run(Box::new(rev_ids), &processor, &cache, out, progress).await {
        Ok(summary) => {
            if cli.verbose {
                info!(
                    scored = summary.scored,
                    errors = summary.errors,
                    unrecognized = summary.unrecognized,
                    elapsed = ?start_time.elapsed(),
                    "Finished scoring {} revisions",
                    summary.total()
                );
            }
        }
        Err(e) => {
            eprintln!("Error: {:?}", e);
            std::process::exit(exit_code_for(&e));
        }
    }

    std::process::exit(EXIT_SUCCESS);
}

/// Network and service failures get their own exit code. Anything else that
/// stops a run (bad input, unknown quality class) is a data error.
fn exit_code_for(error: &anyhow::Error) -> i32 {
    if error
        .chain()
        .any(|c| c.is::<ServiceError>() || c.is::<reqwest::Error>())
    {
        EXIT_NETWORK
    } else {
        EXIT_DATA
    }
}
