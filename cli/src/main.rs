//! `today` binary.

use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use today::{Cli, TodayConfig, bootstrap, execute};
use today_core::environment::SystemClock;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match TodayConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.log_level);

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: TodayConfig) -> anyhow::Result<()> {
    let app = bootstrap(config, Arc::new(SystemClock)).await?;
    let text = execute(&app, cli.command).await?;
    print!("{text}");
    Ok(())
}

/// Diagnostics go to stderr, `RUST_LOG` overriding the configured level.
fn init_tracing(level: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}
