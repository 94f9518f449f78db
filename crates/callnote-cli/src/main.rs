mod commands;
mod error;
mod server;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

use crate::commands::{completions, logs, process, serve, Context};
use crate::error::{exit_code_for, report_error};
use callnote_config as config;
use callnote_store::{paths, FailureLog};

#[derive(Debug, Parser)]
#[command(name = "callnote", version, about = "callnote CLI")]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Failure log location (defaults to the data directory)
    #[arg(long, global = true)]
    log_path: Option<PathBuf>,
    #[arg(long, global = true)]
    json: bool,
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the webhook HTTP server
    Serve(serve::ServeArgs),
    /// Process a single call summary event
    Process(process::ProcessArgs),
    /// Print the validation failure log
    Logs,
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    init_logging(verbose, matches!(cli.command, Command::Serve(_)));
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, verbose);
            exit_code_for(&err)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        config: config_path,
        log_path,
        json,
        verbose,
        command,
    } = cli;

    match command {
        Command::Completions(args) => completions::emit(args),
        command => {
            let app_config = config::load(config_path.clone()).with_context(|| "load config")?;
            if verbose {
                match config::resolve_config_path(config_path) {
                    Ok(path) => {
                        if path.exists() {
                            debug!(path = %path.display(), "config resolved");
                        } else {
                            debug!(path = %path.display(), "config missing, using defaults");
                        }
                    }
                    Err(err) => {
                        debug!(error = %err, "config unavailable");
                    }
                }
            }

            let log_path = paths::resolve_failure_log_path(
                log_path.or_else(|| app_config.log.path.clone()),
            )
            .with_context(|| "resolve failure log path")?;
            if verbose {
                debug!(path = %log_path.display(), "failure log path resolved");
            }
            let failure_log = FailureLog::new(log_path);

            let ctx = Context {
                config: &app_config,
                failure_log: &failure_log,
                json,
            };

            match command {
                Command::Serve(args) => serve::serve(&ctx, args),
                Command::Process(args) => process::process(&ctx, args),
                Command::Logs => logs::show_logs(&ctx),
                Command::Completions(_) => {
                    unreachable!("completions command handled before config load")
                }
            }
        }
    }
}

fn init_logging(verbose: bool, serving: bool) {
    use tracing_subscriber::{fmt, EnvFilter};
    let default_level = if verbose {
        "debug"
    } else if serving {
        "info"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let builder = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    let _ = if serving {
        builder.try_init()
    } else {
        builder.without_time().try_init()
    };
}
