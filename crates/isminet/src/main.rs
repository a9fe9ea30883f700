mod cli;
mod commands;
mod error;
mod output;

use std::io;

use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use isminet_config::LoggingSettings;

use crate::cli::{Cli, GlobalOpts};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    // The env file may carry ISMINET_* logging options too.
    isminet_config::load_env(cli.global.env_file.as_deref())?;
    let logging = LoggingSettings::load()?;
    let _guard = init_tracing(&cli.global, &logging)?;

    commands::dispatch(cli, &logging).await
}

/// Install the global subscriber.
///
/// `RUST_LOG` wins, then `-v`/`-q`, then `ISMINET_LOG_LEVEL`. Development
/// mode logs human-readable lines to stderr; otherwise JSON lines. With
/// `ISMINET_LOG_TO_FILE` a copy goes to `<log_dir>/dev.log` or `prod.log`;
/// the returned guard flushes it on drop.
fn init_tracing(
    global: &GlobalOpts,
    logging: &LoggingSettings,
) -> Result<Option<WorkerGuard>, CliError> {
    let level = match (global.quiet, global.verbose) {
        (true, _) => "error",
        (false, 0) => logging.log_level.as_str(),
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console = if logging.dev_mode {
        fmt::layer()
            .pretty()
            .with_writer(io::stderr)
            .with_target(false)
            .boxed()
    } else {
        fmt::layer()
            .json()
            .with_writer(io::stderr)
            .with_current_span(false)
            .boxed()
    };

    let (file, guard) = if logging.log_to_file {
        std::fs::create_dir_all(&logging.log_dir)?;
        let appender = tracing_appender::rolling::never(&logging.log_dir, logging.log_file_name());
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let layer = fmt::layer()
            .json()
            .with_writer(writer)
            .with_ansi(false)
            .with_thread_ids(true);
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .init();

    Ok(guard)
}
