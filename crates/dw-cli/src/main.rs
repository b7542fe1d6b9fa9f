//! CLI entry point for docwatch.
//!
//! docwatch keeps a `docs/` tree of markdown files in step with a source
//! tree, asking a local completion service to describe each source file.
//!
//! # Usage
//!
//! ```bash
//! docwatch [OPTIONS] <COMMAND>
//!
//! # Document everything, then keep docs current until Ctrl-C
//! docwatch service ./my-project
//!
//! # One-shot pass over a directory
//! docwatch directory ./my-project
//!
//! # Print documentation for a single file
//! docwatch file ./my-project/src/util.rs
//!
//! # Launch the local model server
//! docwatch start
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

use std::io::Write;
use std::process::{Command, Stdio};
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use color_eyre::eyre::{WrapErr, eyre};
use dw_client::CompletionClient;
use dw_core::Config;
use dw_engine::DirectorySummary;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// CLI ARGUMENT TYPES
// =============================================================================

/// Generates and maintains markdown documentation for source files.
#[derive(Debug, Parser)]
#[command(name = "docwatch", version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    command: Commands,

    /// JSON configuration file. Missing keys keep their defaults.
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<Utf8PathBuf>,

    /// Base URL of the completion service.
    #[arg(long, global = true, env = "DOCWATCH_ENDPOINT", value_name = "URL")]
    endpoint: Option<String>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
enum Commands {
    /// Document a tree, then watch it and keep the docs current.
    Service {
        /// Root of the source tree.
        root: Utf8PathBuf,
    },

    /// Document every eligible file under a directory once.
    Directory {
        /// Root of the source tree.
        root: Utf8PathBuf,
    },

    /// Print documentation for a single file to stdout.
    File {
        /// Source file to document.
        path: Utf8PathBuf,
    },

    /// Launch the configured local model server in the background.
    Start,
}

// =============================================================================
// INITIALIZATION FUNCTIONS
// =============================================================================

/// Initializes the tracing subscriber for logging.
///
/// Respects the `RUST_LOG` environment variable if set. Otherwise, uses
/// `debug` level if `--verbose` is set, or `info` level by default.
/// Logs go to stderr so `file` output on stdout stays clean.
fn init_tracing(verbose: bool, no_color: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "info" };
        EnvFilter::new(format!(
            "{level},hyper=warn,mio=warn,notify=warn,reqwest=warn"
        ))
    });

    let use_ansi = !no_color && std::env::var("NO_COLOR").is_err();

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(use_ansi)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

/// Builds a [`Config`] from the config file (if any) and CLI overrides.
fn build_config(cli: &Cli) -> color_eyre::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .wrap_err_with(|| format!("Failed to load configuration from {path}"))?,
        None => Config::default(),
    };

    if let Some(endpoint) = &cli.endpoint {
        config.completion.endpoint.clone_from(endpoint);
    }

    config.validate().wrap_err("Invalid configuration")?;
    Ok(config)
}

fn build_client(config: &Config) -> color_eyre::Result<CompletionClient> {
    CompletionClient::new(&config.completion).wrap_err("Failed to create completion client")
}

/// Cancels `token` on Ctrl-C, or SIGTERM on Unix.
fn spawn_shutdown_listener(token: CancellationToken) -> color_eyre::Result<()> {
    #[cfg(unix)]
    let mut sigterm = {
        use tokio::signal::unix::{SignalKind, signal};
        signal(SignalKind::terminate())?
    };

    tokio::spawn(async move {
        #[cfg(unix)]
        {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => info!("Received Ctrl-C, shutting down"),
                _ = sigterm.recv() => info!("Received SIGTERM, shutting down"),
            }
        }

        #[cfg(not(unix))]
        {
            let _ = tokio::signal::ctrl_c().await;
            info!("Received Ctrl-C, shutting down");
        }

        token.cancel();
    });

    Ok(())
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

/// Runs the watch service until Ctrl-C or SIGTERM.
async fn run_service(config: &Config, root: &Utf8Path) -> color_eyre::Result<()> {
    let client = Arc::new(build_client(config)?);
    let shutdown = CancellationToken::new();
    spawn_shutdown_listener(shutdown.clone())?;

    info!(root = %root, endpoint = %config.completion.endpoint, "Starting service");
    let stats = dw_engine::watch(root, config, client, shutdown).await?;
    info!(stats = %stats, "Service stopped");

    Ok(())
}

/// Documents every eligible file under `root` once.
///
/// # Errors
///
/// Returns an error if the tree cannot be scanned or any file failed.
async fn run_directory(config: &Config, root: &Utf8Path) -> color_eyre::Result<()> {
    let client = build_client(config)?;
    let summary = dw_engine::document_directory(root, &config.scan, &client).await?;

    print_directory_summary(&summary);

    if summary.is_success() {
        Ok(())
    } else {
        Err(eyre!(
            "{} of {} files could not be documented",
            summary.failures.len(),
            summary.attempted()
        ))
    }
}

/// Prints documentation for one file to stdout.
async fn run_file(config: &Config, path: &Utf8Path) -> color_eyre::Result<()> {
    let client = build_client(config)?;
    let text = dw_engine::document_file(&client, path).await?;

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{text}")?;
    Ok(())
}

/// Launches the local model server detached and prints its PID.
fn run_start(config: &Config) -> color_eyre::Result<()> {
    let mut command = server_command(config);
    let child = command
        .spawn()
        .wrap_err_with(|| format!("Failed to launch {}", config.server.executable))?;

    info!(executable = %config.server.executable, threads = config.server.threads, "Model server launched");

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{}", child.id())?;
    Ok(())
}

/// Builds the detached server launch command.
fn server_command(config: &Config) -> Command {
    let mut command = Command::new(&config.server.executable);
    command
        .arg("-t")
        .arg(config.server.threads.to_string())
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    // Own process group, so Ctrl-C in this terminal does not reach the server
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        command.process_group(0);
    }

    command
}

// =============================================================================
// OUTPUT HELPERS
// =============================================================================

/// Prints the outcome of a directory pass.
fn print_directory_summary(summary: &DirectorySummary) {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    let _ = writeln!(handle);
    let _ = writeln!(handle, "Documentation Summary");
    let _ = writeln!(handle, "=====================");
    let _ = writeln!(handle);
    let _ = writeln!(handle, "Files attempted: {}", summary.attempted());
    let _ = writeln!(handle, "  Written:       {}", summary.written.len());
    let _ = writeln!(handle, "  Failed:        {}", summary.failures.len());

    if !summary.failures.is_empty() {
        let _ = writeln!(handle);
        let _ = writeln!(handle, "Failures ({}):", summary.failures.len());
        for (path, error) in &summary.failures {
            let _ = writeln!(handle, "  {path} - {error}");
        }
    }

    if !summary.scan_errors.is_empty() {
        let _ = writeln!(handle);
        let _ = writeln!(handle, "Skipped during scan ({}):", summary.scan_errors.len());
        for error in &summary.scan_errors {
            let _ = writeln!(handle, "  {error}");
        }
    }
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Application entry point.
#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    // 1. Install color-eyre FIRST (before any potential panics)
    color_eyre::install()?;

    // 2. Parse CLI arguments
    let cli = Cli::parse();

    // 3. Initialize tracing (handles --no-color for log output)
    init_tracing(cli.verbose, cli.no_color);

    // 4. Load configuration before starting any component
    let config = build_config(&cli)?;

    // 5. Route to appropriate command
    match &cli.command {
        Commands::Service { root } => run_service(&config, root).await,
        Commands::Directory { root } => run_directory(&config, root).await,
        Commands::File { path } => run_file(&config, path).await,
        Commands::Start => run_start(&config),
    }
}
