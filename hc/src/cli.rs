//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

use crate::digest::DigestAlgorithm;

/// Hashcrack - distributed brute-force hash cracking
#[derive(Parser)]
#[command(
    name = "hc",
    about = "Distributed brute-force hash cracking: manager, workers and client",
    version = env!("CARGO_PKG_VERSION"),
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the manager HTTP service
    Manager {
        /// Listen address (overrides manager.bind)
        #[arg(short, long)]
        bind: Option<String>,

        /// Comma-separated worker base URLs (overrides WORKER_URLS)
        #[arg(short, long)]
        workers: Option<String>,
    },

    /// Run a worker HTTP service
    Worker {
        /// Listen address (overrides worker.bind)
        #[arg(short, long)]
        bind: Option<String>,

        /// Manager base URL (overrides MANAGER_URL)
        #[arg(short, long)]
        manager_url: Option<String>,
    },

    /// Run the manager with in-process workers
    Standalone {
        /// Listen address (overrides manager.bind)
        #[arg(short, long)]
        bind: Option<String>,

        /// Number of in-process workers
        #[arg(short, long, default_value = "4")]
        workers: usize,
    },

    /// Submit a hash to a running manager
    Crack {
        /// Hex-encoded target digest
        hash: String,

        /// Longest candidate length to try
        #[arg(short = 'm', long)]
        max_length: usize,

        /// Poll until the request finishes
        #[arg(short, long)]
        wait: bool,

        /// Manager base URL
        #[arg(long, default_value = "http://localhost:8080")]
        manager_url: String,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Show the status of a request
    Status {
        /// Request ID returned by `crack`
        id: String,

        /// Manager base URL
        #[arg(long, default_value = "http://localhost:8080")]
        manager_url: String,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Print the hex digest of a word
    Digest {
        /// Word to hash
        word: String,

        /// Hash function (md5, sha256)
        #[arg(short, long, default_value = "md5")]
        algorithm: DigestAlgorithm,
    },
}

/// Output format for status commands
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        debug!(%s, "OutputFormat::from_str: called");
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}. Use: text, json", s)),
        }
    }
}
