//! Hashcrack - distributed brute-force hash cracking
//!
//! CLI entry point for the manager, worker and client roles.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result};
use tracing::{debug, info};

use hashcrack::cli::{Cli, Command, OutputFormat};
use hashcrack::config::{Config, split_urls};
use hashcrack::coordinator::{Coordinator, RequestStatus};
use hashcrack::digest::DigestAlgorithm;
use hashcrack::models::StatusResponse;
use hashcrack::search::Worker;
use hashcrack::server::{self, manager_router, worker_router};
use hashcrack::transport::http::DEFAULT_TIMEOUT;
use hashcrack::transport::{HttpDispatcher, HttpResultSink, LocalDispatcher, ManagerClient, channel_sink};

const POLL_INTERVAL: Duration = Duration::from_secs(1);

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Determine log level with priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .try_init()
        .map_err(|e| eyre::eyre!("Failed to install subscriber: {}", e))?;

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());

    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let mut config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    config.apply_env_overrides();

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Command::Manager { bind, workers } => cmd_manager(config, bind, workers).await,
        Command::Worker { bind, manager_url } => cmd_worker(config, bind, manager_url).await,
        Command::Standalone { bind, workers } => cmd_standalone(config, bind, workers).await,
        Command::Crack {
            hash,
            max_length,
            wait,
            manager_url,
            format,
        } => cmd_crack(&manager_url, &hash, max_length, wait, format).await,
        Command::Status {
            id,
            manager_url,
            format,
        } => cmd_status(&manager_url, &id, format).await,
        Command::Digest { word, algorithm } => cmd_digest(&word, algorithm),
    }
}

/// Run the manager against HTTP workers
async fn cmd_manager(mut config: Config, bind: Option<String>, workers: Option<String>) -> Result<()> {
    debug!(?bind, ?workers, "cmd_manager: called");
    if let Some(bind) = bind {
        config.manager.bind = bind;
    }
    if let Some(workers) = workers {
        config.manager.worker_urls = split_urls(&workers);
    }
    config.validate()?;

    let dispatcher = HttpDispatcher::new(config.manager.worker_urls.clone(), config.manager.dispatch_timeout())
        .context("Failed to build worker dispatcher")?;
    let coordinator = Coordinator::new(config.manager.coordinator.clone(), Arc::new(dispatcher))?;

    info!(
        bind = %config.manager.bind,
        workers = ?config.manager.worker_urls,
        timeout_ms = config.manager.coordinator.timeout_ms,
        "Starting manager"
    );
    server::serve(&config.manager.bind, manager_router(coordinator)).await
}

/// Run a worker that pushes results to the manager
async fn cmd_worker(mut config: Config, bind: Option<String>, manager_url: Option<String>) -> Result<()> {
    debug!(?bind, ?manager_url, "cmd_worker: called");
    if let Some(bind) = bind {
        config.worker.bind = bind;
    }
    if let Some(manager_url) = manager_url {
        config.worker.manager_url = manager_url;
    }
    config.validate()?;

    let sink = HttpResultSink::new(config.worker.manager_url.clone(), config.worker.push_timeout())
        .context("Failed to build manager client")?;
    let worker = Worker::new(Arc::new(sink), config.worker.digest);

    info!(
        bind = %config.worker.bind,
        manager = %config.worker.manager_url,
        digest = %config.worker.digest,
        "Starting worker"
    );
    server::serve(&config.worker.bind, worker_router(worker)).await
}

/// Run the manager with in-process workers
async fn cmd_standalone(mut config: Config, bind: Option<String>, workers: usize) -> Result<()> {
    debug!(?bind, workers, "cmd_standalone: called");
    if let Some(bind) = bind {
        config.manager.bind = bind;
    }
    config.validate()?;
    if workers == 0 {
        return Err(eyre::eyre!("--workers must be at least 1"));
    }

    let (sink, rx) = channel_sink(config.manager.coordinator.result_buffer);
    let dispatcher = LocalDispatcher::new(workers, config.worker.digest, Arc::new(sink));
    let coordinator = Coordinator::new(config.manager.coordinator.clone(), Arc::new(dispatcher))?;
    let pump = coordinator.spawn_result_pump(rx);

    info!(bind = %config.manager.bind, workers, digest = %config.worker.digest, "Starting standalone manager");
    let served = server::serve(&config.manager.bind, manager_router(coordinator)).await;
    pump.abort();
    served
}

/// Submit a hash and optionally wait for the outcome
async fn cmd_crack(manager_url: &str, hash: &str, max_length: usize, wait: bool, format: OutputFormat) -> Result<()> {
    debug!(%manager_url, %hash, max_length, wait, "cmd_crack: called");
    let client = ManagerClient::new(manager_url, DEFAULT_TIMEOUT)?;
    let request_id = client.crack(hash, max_length).await.context("Failed to submit hash")?;

    if !wait {
        match format {
            OutputFormat::Json => println!("{}", serde_json::json!({ "requestId": request_id })),
            OutputFormat::Text => println!("{}", request_id),
        }
        return Ok(());
    }

    if format == OutputFormat::Text {
        println!("Request {} submitted, waiting...", request_id.cyan());
    }
    let status = client.wait(&request_id, POLL_INTERVAL).await?;
    print_status(&request_id, &status, format)
}

/// Print a request's current status
async fn cmd_status(manager_url: &str, request_id: &str, format: OutputFormat) -> Result<()> {
    debug!(%manager_url, %request_id, "cmd_status: called");
    let client = ManagerClient::new(manager_url, DEFAULT_TIMEOUT)?;
    let status = client.status(request_id).await.context("Failed to fetch status")?;
    print_status(request_id, &status, format)
}

fn cmd_digest(word: &str, algorithm: DigestAlgorithm) -> Result<()> {
    debug!(%word, %algorithm, "cmd_digest: called");
    println!("{}", algorithm.hex_digest(word));
    Ok(())
}

fn print_status(request_id: &str, status: &StatusResponse, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(status)?);
        }
        OutputFormat::Text => {
            let label = match status.status {
                RequestStatus::Ready => status.status.to_string().green(),
                RequestStatus::InProgress => status.status.to_string().yellow(),
                RequestStatus::Error => status.status.to_string().red(),
            };
            println!("{}: {}", request_id, label);
            if let Some(words) = &status.data {
                if words.is_empty() {
                    println!("  (no matches)");
                }
                for word in words {
                    println!("  {}", word.bold());
                }
            }
        }
    }
    Ok(())
}
