//! promptlift - prompt enhancer for ChatGPT and Gemini
//!
//! Main entry point for the promptlift CLI.

mod cli;
mod clipboard;
mod cmd_key;
mod cmd_prompt;
mod context;

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, Subscriber};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use promptlift_config::ConfigLoader;
use promptlift_relay::ControlError;

use cli::{Cli, Commands};
use cmd_key::handle_key_command;
use cmd_prompt::{prompt_copy, prompt_enhance, prompt_import, prompt_insert, prompt_polish};
use context::load_config;

/// Target of the final error report. The user already sees it on stderr,
/// so it is written to the log file only.
const EXIT_TARGET: &str = "promptlift::exit";

/// Console layer: everything except the final error report.
fn console_layer<S, W>(writer: W) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + 'static,
{
    fmt::layer()
        .with_writer(writer)
        .with_target(false)
        .with_filter(filter_fn(|meta| meta.target() != EXIT_TARGET))
}

/// Initialize tracing with stderr and file output.
///
/// Log files are written to ~/.promptlift/logs/ with daily rotation.
fn init_tracing() -> anyhow::Result<()> {
    let log_dir = ConfigLoader::app_dir().join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("promptlift")
        .filename_suffix("log")
        .max_log_files(30)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Flushes the file writer on exit.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer(std::io::stderr))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let tab = cli.tab.as_deref();

    match cli.command {
        Commands::Key { action } => handle_key_command(action, &config),
        Commands::Import => prompt_import(&config, tab).await,
        Commands::Enhance { text } => prompt_enhance(&config, tab, text).await,
        Commands::Polish { dry_run, copy } => prompt_polish(&config, tab, dry_run, copy).await,
        Commands::Insert { text } => prompt_insert(&config, tab, &text).await,
        Commands::Copy { text } => prompt_copy(&config, &text),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_tracing() {
        eprintln!("Failed to set up logging: {e}");
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(target: EXIT_TARGET, "{:#}", e);
            match e.downcast_ref::<ControlError>() {
                Some(control) => eprintln!("{}", control.user_message()),
                None => eprintln!("Error: {:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}
