//! vaultxp - skill levels for a notes vault
//!
//! CLI entry point with global panic handler.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use vaultxp::cli::refresh::{RefreshCommand, RefreshOptions};
use vaultxp::cli::settings::{SettingsCommand, SettingsOptions};
use vaultxp::cli::stats::{StatsCommand, StatsOptions};
use vaultxp::cli::watch::{WatchCommand, WatchOptions};
use vaultxp::config::{vaultxp_home, Config};
use vaultxp::error::exit_codes;

// =============================================================================
// CLI Definition
// =============================================================================

/// vaultxp - skill levels for a notes vault
#[derive(Parser)]
#[command(name = "vaultxp")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Vault directory (defaults to the enclosing vault or the current directory)
    #[arg(long, global = true)]
    vault: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the skill grid
    Stats {
        /// Run a cycle before showing
        #[arg(long, short)]
        refresh: bool,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
        /// Show descriptions and xp under the grid
        #[arg(long, short)]
        detailed: bool,
    },

    /// Recompute every skill once and save the result
    Refresh {
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Recompute on the update interval and accept settings on stdin
    Watch {
        /// Show descriptions and xp under the grid
        #[arg(long, short)]
        detailed: bool,
        /// Suppress the startup banner and exit summary
        #[arg(long, short)]
        quiet: bool,
    },

    /// Show or change settings
    Settings {
        /// Show skill names under the grid cells
        #[arg(long, value_name = "BOOL")]
        show_names: Option<bool>,
        /// Minutes between updates; invalid values reset to the default
        #[arg(long, value_name = "MINUTES", allow_hyphen_values = true)]
        interval: Option<String>,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },
}

// =============================================================================
// Main Entry Point
// =============================================================================

fn main() -> ExitCode {
    // Set up panic handler
    setup_panic_handler();

    // Run the CLI
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("vaultxp error: {}", e);
            ExitCode::from(exit_codes::ERROR as u8)
        }
    }
}

/// Set up the global panic handler.
///
/// On panic, logs to ~/.vaultxp/crash.log and exits with code 3.
fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|info| {
        // Log to stderr
        eprintln!("vaultxp panic: {}", info);

        // Try to log to crash file
        if let Some(home) = vaultxp_home() {
            let _ = std::fs::create_dir_all(&home);
            let crash_log = home.join("crash.log");
            if let Ok(mut file) = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&crash_log)
            {
                let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
                let _ = writeln!(file, "[{}] {}", timestamp, info);
            }
        }

        std::process::exit(exit_codes::CRASH);
    }));
}

/// Install the stderr log subscriber. `RUST_LOG` wins over the config filter.
fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log.filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Run the CLI and return the exit code.
fn run() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let cwd = std::env::current_dir()?;

    let config = Config::load_with_vault(&cwd, cli.vault.as_deref());
    init_logging(&config);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let code = match cli.command {
        Commands::Stats {
            refresh,
            json,
            quiet,
            detailed,
        } => {
            let options = StatsOptions {
                json,
                quiet,
                detailed,
                refresh,
            };
            runtime.block_on(run_stats(config, &cwd, options))
        }
        Commands::Refresh { json, quiet } => {
            runtime.block_on(run_refresh(config, &cwd, RefreshOptions { json, quiet }))
        }
        Commands::Watch { detailed, quiet } => {
            runtime.block_on(run_watch(config, &cwd, WatchOptions { detailed, quiet }))
        }
        Commands::Settings {
            show_names,
            interval,
            json,
            quiet,
        } => run_settings(
            config,
            &cwd,
            SettingsOptions {
                show_names,
                interval,
                json,
                quiet,
            },
        ),
    };

    // The stdin reader may still be parked in a blocking read.
    runtime.shutdown_timeout(Duration::from_millis(100));
    Ok(code)
}

fn success_to_exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::from(exit_codes::SUCCESS as u8)
    } else {
        ExitCode::from(exit_codes::ERROR as u8)
    }
}

fn print_formatted(formatted: &str) {
    if !formatted.is_empty() {
        println!("{}", formatted);
    }
}

async fn run_stats(config: Config, cwd: &Path, options: StatsOptions) -> ExitCode {
    let cmd = StatsCommand::new(config, cwd);
    let output = cmd.run(&options).await;
    print_formatted(&cmd.format_output(&output, &options));
    success_to_exit_code(output.success)
}

async fn run_refresh(config: Config, cwd: &Path, options: RefreshOptions) -> ExitCode {
    let cmd = RefreshCommand::new(config, cwd);
    let output = cmd.run(&options).await;
    print_formatted(&cmd.format_output(&output, &options));
    success_to_exit_code(output.success)
}

async fn run_watch(config: Config, cwd: &Path, options: WatchOptions) -> ExitCode {
    let cmd = WatchCommand::new(config, cwd);
    let output = cmd.run(&options).await;
    let formatted = cmd.format_output(&output, &options);
    if !formatted.is_empty() {
        eprintln!("{}", formatted);
    }
    success_to_exit_code(output.success)
}

fn run_settings(config: Config, cwd: &Path, options: SettingsOptions) -> ExitCode {
    let cmd = SettingsCommand::new(config, cwd);
    let output = cmd.run(&options);
    print_formatted(&cmd.format_output(&output, &options));
    success_to_exit_code(output.success)
}

// =============================================================================
// Tests
// =============================================================================
