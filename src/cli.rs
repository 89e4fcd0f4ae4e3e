//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::config::ClassifierBackend;
use crate::models::{Feedback, RecordId};
use crate::samples::SAMPLES;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// NewsProbe - check news articles for authenticity and keep a history
///
/// Paste an article, get a verdict with a confidence score, and record
/// whether you agreed with it. Every analysis is kept locally.
///
/// Examples:
///   newsprobe analyze "Scientists at MIT have developed..."
///   newsprobe analyze --file article.txt
///   newsprobe analyze --sample 2
///   newsprobe history --limit 10
///   newsprobe feedback 1731000000000 correct
///   newsprobe --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Path to configuration file
    ///
    /// If not specified, looks for .newsprobe.toml in the current directory
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Directory holding the analysis history
    #[arg(long, value_name = "DIR", env = "NEWSPROBE_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Keep history in memory only; nothing is read from or written to disk
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// Keep at most this many analyses, dropping the oldest
    #[arg(long, value_name = "COUNT", global = true)]
    pub max_records: Option<usize>,

    /// Classifier backend
    #[arg(long, value_name = "BACKEND", global = true)]
    pub backend: Option<ClassifierBackend>,

    /// Artificial latency of the random backend in milliseconds
    #[arg(long, value_name = "MS", global = true)]
    pub delay_ms: Option<u64>,

    /// Endpoint of the remote classifier
    #[arg(long, value_name = "URL", env = "NEWSPROBE_CLASSIFIER_URL", global = true)]
    pub url: Option<String>,

    /// Seed for the random backend (reproducible verdicts)
    #[arg(long, value_name = "SEED", global = true)]
    pub seed: Option<u64>,

    /// Generate a default .newsprobe.toml configuration file
    #[arg(long)]
    pub init_config: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Analyze one or more articles and record the results
    ///
    /// With no TEXT, --file or --sample the article is read from stdin.
    Analyze {
        /// Article text; several values are analyzed concurrently
        #[arg(value_name = "TEXT")]
        texts: Vec<String>,

        /// Read the article from a file
        #[arg(short, long, value_name = "FILE")]
        file: Option<PathBuf>,

        /// Analyze a built-in sample article (see `samples`)
        #[arg(short, long, value_name = "N")]
        sample: Option<usize>,

        /// Output format
        #[arg(long, default_value = "text", value_name = "FORMAT")]
        format: OutputFormat,
    },

    /// Show past analyses, newest first
    History {
        /// Show only the N most recent analyses
        #[arg(short, long, value_name = "N")]
        limit: Option<usize>,

        /// Output format
        #[arg(long, default_value = "text", value_name = "FORMAT")]
        format: OutputFormat,
    },

    /// Record whether a past verdict was right
    Feedback {
        /// Analysis ID as printed by `analyze` or `history`
        id: RecordId,

        /// Your judgement of the verdict
        #[arg(value_enum)]
        verdict: Feedback,
    },

    /// List the built-in sample articles
    Samples,
}

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text (default)
    #[default]
    Text,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if self.command.is_none() {
            return Err("No command given. Run with --help for usage.".to_string());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref url) = self.url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("Classifier URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if self.max_records == Some(0) {
            return Err("Max records must be at least 1".to_string());
        }

        match self.command {
            Some(Command::Analyze {
                sample: Some(n), ..
            }) if n == 0 || n > SAMPLES.len() => {
                return Err(format!(
                    "Sample number must be between 1 and {}",
                    SAMPLES.len()
                ));
            }
            Some(Command::Analyze {
                file: Some(ref path),
                ..
            }) if !path.is_file() => {
                return Err(format!("Article file does not exist: {}", path.display()));
            }
            Some(Command::History { limit: Some(0), .. }) => {
                return Err("Limit must be at least 1".to_string());
            }
            _ => {}
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    ///
    /// `verbose_by_default` comes from `[general] verbose` in the config
    /// file; `--quiet` still wins over it.
    pub fn log_level(&self, verbose_by_default: bool) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose || verbose_by_default {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        let mut full = vec!["newsprobe"];
        full.extend_from_slice(argv);
        Args::try_parse_from(full).unwrap()
    }

    #[test]
    fn test_parse_analyze() {
        let args = parse(&["analyze", "first article", "second article", "--format", "json"]);
        match args.command {
            Some(Command::Analyze { texts, format, .. }) => {
                assert_eq!(texts, vec!["first article", "second article"]);
                assert_eq!(format, OutputFormat::Json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_feedback() {
        let args = parse(&["feedback", "1731000000000", "incorrect"]);
        match args.command {
            Some(Command::Feedback { id, verdict }) => {
                assert_eq!(id, RecordId(1_731_000_000_000));
                assert_eq!(verdict, Feedback::Incorrect);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_feedback_rejects_bad_values() {
        assert!(Args::try_parse_from(["newsprobe", "feedback", "abc", "correct"]).is_err());
        assert!(Args::try_parse_from(["newsprobe", "feedback", "1", "maybe"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = parse(&["history", "--data-dir", "/tmp/x", "--backend", "remote"]);
        assert_eq!(args.data_dir, Some(PathBuf::from("/tmp/x")));
        assert_eq!(args.backend, Some(ClassifierBackend::Remote));
    }

    #[test]
    fn test_ephemeral_flag() {
        assert!(!parse(&["history"]).ephemeral);
        assert!(parse(&["analyze", "text", "--ephemeral"]).ephemeral);
    }

    #[test]
    fn test_validation_requires_command() {
        let args = parse(&[]);
        assert!(args.validate().is_err());

        let args = parse(&["--init-config"]);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let args = parse(&["--verbose", "--quiet", "samples"]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_sample_range() {
        assert!(parse(&["analyze", "--sample", "1"]).validate().is_ok());
        assert!(parse(&["analyze", "--sample", "0"]).validate().is_err());
        assert!(parse(&["analyze", "--sample", "4"]).validate().is_err());
    }

    #[test]
    fn test_validation_url_and_limits() {
        assert!(parse(&["--url", "ftp://x", "samples"]).validate().is_err());
        assert!(parse(&["--max-records", "0", "samples"]).validate().is_err());
        assert!(parse(&["history", "--limit", "0"]).validate().is_err());
        assert!(parse(&["analyze", "--file", "/definitely/not/here.txt"])
            .validate()
            .is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = parse(&["samples"]);
        assert_eq!(args.log_level(false), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(false), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(false), tracing::Level::ERROR);
    }

    #[test]
    fn test_log_level_follows_config_verbose() {
        let args = parse(&["samples"]);
        assert_eq!(args.log_level(true), tracing::Level::DEBUG);

        let args = parse(&["--quiet", "samples"]);
        assert_eq!(args.log_level(true), tracing::Level::ERROR);
    }
}
