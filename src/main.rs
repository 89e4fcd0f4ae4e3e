//! NewsProbe - news article authenticity checker
//!
//! A CLI tool that analyzes pasted news articles, keeps every verdict in a
//! local history and lets the user record whether the verdict was right.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (config, classifier unavailable, etc.)

mod classifier;
mod cli;
mod config;
mod history;
mod models;
mod report;
mod samples;
mod storage;

use anyhow::{Context, Result};
use cli::{Args, Command, OutputFormat};
use config::Config;
use futures::future::join_all;
use history::HistoryStore;
use indicatif::{ProgressBar, ProgressStyle};
use models::{AnalysisRecord, Feedback, RecordId};
use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;
use storage::{FileStore, KeyValueStore, MemoryStore};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Load configuration first so `[general] verbose` can set the log level
    let (mut config, source) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    init_logging(&args, &config);

    info!("NewsProbe v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    source.log();

    match run(args, config).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .newsprobe.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(config::CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            config::CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", config::CONFIG_FILE_NAME))?;

    println!(
        "✅ Created {} with default settings.",
        config::CONFIG_FILE_NAME
    );
    println!("   Edit it to change the data directory, classifier backend and latency.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args, config: &Config) {
    let level = args.log_level(config.general.verbose);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Dispatch the selected subcommand. Returns the exit code.
async fn run(args: Args, config: Config) -> Result<i32> {
    let Some(command) = args.command.clone() else {
        return Ok(1);
    };

    if let Command::Samples = command {
        print!("{}", report::render_samples(&samples::SAMPLES));
        return Ok(0);
    }

    let store = open_store(&config, args.ephemeral)?;

    let exit_code = match command {
        Command::Analyze {
            texts,
            file,
            sample,
            format,
        } => {
            let inputs = collect_inputs(texts, file, sample)?;
            handle_analyze(&store, inputs, format, args.quiet).await
        }
        Command::History { limit, format } => handle_history(&store, limit, format).await?,
        Command::Feedback { id, verdict } => handle_feedback(&store, id, verdict).await,
        Command::Samples => 0,
    };

    if store.is_dirty().await {
        if let Err(e) = store.flush().await {
            warn!("{}", e);
            eprintln!("⚠️  History could not be saved: {}", e);
        }
    }

    Ok(exit_code)
}

/// Where the configuration came from, reported once logging is up.
enum ConfigSource {
    Explicit(PathBuf),
    DefaultFile,
    Builtin,
    Fallback(anyhow::Error),
}

impl ConfigSource {
    fn log(&self) {
        match self {
            ConfigSource::Explicit(path) => info!("Loaded config from: {}", path.display()),
            ConfigSource::DefaultFile => {
                info!("Loaded default config from {}", config::CONFIG_FILE_NAME)
            }
            ConfigSource::Builtin => debug!("No config file found, using defaults"),
            ConfigSource::Fallback(e) => warn!("Failed to load config: {:#}", e),
        }
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<(Config, ConfigSource)> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        let config = Config::load(config_path)?;
        return Ok((config, ConfigSource::Explicit(config_path.clone())));
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok((config, ConfigSource::DefaultFile)),
        Ok(None) => Ok((Config::default(), ConfigSource::Builtin)),
        Err(e) => Ok((Config::default(), ConfigSource::Fallback(e))),
    }
}

/// Open the history store described by the configuration.
fn open_store(config: &Config, ephemeral: bool) -> Result<HistoryStore> {
    let classifier = classifier::from_config(&config.classifier)?;

    let storage: Box<dyn KeyValueStore> = if ephemeral {
        info!("Ephemeral session: history will not be saved");
        Box::new(MemoryStore::new())
    } else {
        let store = FileStore::new(config.history.data_dir());
        debug!("History directory: {}", store.root().display());
        Box::new(store)
    };

    Ok(
        HistoryStore::open(storage, config.history.key.clone(), classifier)
            .with_max_records(config.history.max_records),
    )
}

/// Gather article texts from arguments, a file, a sample or stdin.
fn collect_inputs(
    texts: Vec<String>,
    file: Option<PathBuf>,
    sample: Option<usize>,
) -> Result<Vec<String>> {
    let mut inputs = texts;

    if let Some(path) = file {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read article file: {}", path.display()))?;
        inputs.push(content);
    }

    if let Some(number) = sample {
        let article = samples::get(number)
            .with_context(|| format!("No sample article number {}", number))?;
        inputs.push(article.content.to_string());
    }

    if inputs.is_empty() {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read article from stdin")?;
        inputs.push(content);
    }

    Ok(inputs)
}

/// Analyze every non-blank input concurrently and print the results.
async fn handle_analyze(
    store: &HistoryStore,
    inputs: Vec<String>,
    format: OutputFormat,
    quiet: bool,
) -> i32 {
    let (articles, blank): (Vec<String>, Vec<String>) =
        inputs.into_iter().partition(|t| !t.trim().is_empty());

    if !blank.is_empty() {
        eprintln!(
            "⚠️  Skipping {} empty article(s). Paste some text to analyze.",
            blank.len()
        );
    }
    if articles.is_empty() {
        return 0;
    }

    let spinner = if quiet || format == OutputFormat::Json {
        ProgressBar::hidden()
    } else {
        analyzing_spinner(articles.len())
    };

    let results = join_all(articles.iter().map(|text| store.classify(text))).await;
    spinner.finish_and_clear();

    let mut records: Vec<AnalysisRecord> = Vec::new();
    let mut failures = 0;
    for result in results {
        match result {
            Ok(Some(record)) => records.push(record),
            Ok(None) => {}
            Err(e) => {
                failures += 1;
                error!("{}", e);
                eprintln!("❌ {}", e);
            }
        }
    }

    match format {
        OutputFormat::Json => match report::generate_json_report(&records) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("❌ Failed to encode results: {}", e);
                return 1;
            }
        },
        OutputFormat::Text => {
            for record in &records {
                println!("\n{}", report::render_result_card(record));
            }
            if !records.is_empty() {
                println!(
                    "💬 Was this right? Run `newsprobe feedback <ID> correct|incorrect`."
                );
            }
        }
    }

    if failures > 0 {
        1
    } else {
        0
    }
}

fn analyzing_spinner(count: usize) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    if count == 1 {
        pb.set_message("Analyzing article...");
    } else {
        pb.set_message(format!("Analyzing {} articles...", count));
    }
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Print the stored history, newest first.
async fn handle_history(
    store: &HistoryStore,
    limit: Option<usize>,
    format: OutputFormat,
) -> Result<i32> {
    let mut records = store.list().await;
    let summary = store.summary().await;
    debug!("History holds {} analyses", store.len().await);
    if let Some(limit) = limit {
        records.truncate(limit);
    }

    match format {
        OutputFormat::Json => {
            #[derive(serde::Serialize)]
            struct HistoryPayload<'a> {
                records: &'a [AnalysisRecord],
                summary: &'a models::HistorySummary,
            }
            let json = report::generate_json_report(&HistoryPayload {
                records: &records,
                summary: &summary,
            })?;
            println!("{}", json);
        }
        OutputFormat::Text => print!("{}", report::render_history(&records, &summary)),
    }

    Ok(0)
}

/// Attach user feedback to a stored analysis.
async fn handle_feedback(store: &HistoryStore, id: RecordId, verdict: Feedback) -> i32 {
    if store.annotate(id, verdict).await {
        println!("✅ Thanks! Analysis {} marked as {}.", id, verdict);
        if let Some(record) = store.get(id).await {
            println!(
                "   {} {} ({}%): \"{}\"",
                record.prediction.emoji(),
                record.prediction.headline(),
                record.confidence,
                record.preview(60)
            );
        }
    } else {
        println!("ℹ️  No analysis with ID {}. Nothing changed.", id);
    }
    0
}
