mod cli;
mod commands;
mod preview;

use std::process::ExitCode;

use restyle_config::{LogLevel, RestyleConfig};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use cli::Command;

/// Install the global subscriber. `directive` wins over the config level.
fn init_logging(directive: Option<&str>, level: LogLevel) {
    let fallback = format!("restyle={}", level.as_filter());
    let directive = directive.unwrap_or(&fallback);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                directive
                    .parse()
                    .unwrap_or_else(|_| LevelFilter::INFO.into()),
            ),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = cli::parse();

    let loaded = restyle_config::load_config_from(args.config.as_deref());
    let level = loaded
        .as_ref()
        .map(|config| config.logging.level)
        .unwrap_or_default();
    init_logging(args.log_level.as_deref(), level);

    tracing::debug!("restyle v{} starting", env!("CARGO_PKG_VERSION"));

    let config = loaded.unwrap_or_else(|e| {
        tracing::warn!("Config load failed, using defaults: {e}");
        RestyleConfig::default()
    });

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to start async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = match args.command {
        Command::Browse { url } => {
            preview::run(&url, &config, args.store.as_deref(), runtime).map(|()| ExitCode::SUCCESS)
        }
        command => commands::dispatch(command, &config, args.store.as_deref(), &runtime),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
