//! Non-interactive subcommands.

mod css;
mod themes;

use std::io::{Read, Write};
use std::path::Path;
use std::process::ExitCode;

use restyle_common::RestyleError;
use restyle_config::{seed_defaults, FileStore, RestyleConfig};

use crate::cli::Command;

pub use css::{check, match_url, transform};
pub use themes::run as run_themes;

/// Run a subcommand other than `browse`.
pub fn dispatch(
    command: Command,
    config: &RestyleConfig,
    store_override: Option<&Path>,
    runtime: &tokio::runtime::Runtime,
) -> Result<ExitCode, RestyleError> {
    let mut out = std::io::stdout().lock();
    match command {
        Command::Transform { file } => transform(&read_input(file.as_deref())?, &mut out),
        Command::Check { file } => check(&read_input(file.as_deref())?, &mut out),
        Command::Match { url, pattern } => match_url(&url, &pattern, &mut out),
        Command::Themes { action } => {
            let store = open_store(config, store_override)?;
            runtime.block_on(async {
                seed_defaults(&store).await?;
                run_themes(action, &store, &mut out).await
            })
        }
        Command::Browse { .. } => Err(RestyleError::Other(
            "browse runs the preview window, not a command".into(),
        )),
    }
}

/// Open the configured theme store, or the one at `store_override`.
pub fn open_store(
    config: &RestyleConfig,
    store_override: Option<&Path>,
) -> Result<FileStore, RestyleError> {
    let path = match store_override {
        Some(path) => path.to_path_buf(),
        None => config.store.resolve_path()?,
    };
    tracing::debug!(path = %path.display(), "opening theme store");
    Ok(FileStore::open(path)?)
}

/// Contents of `file`, or all of stdin.
pub fn read_input(file: Option<&Path>) -> Result<String, RestyleError> {
    match file {
        Some(path) => std::fs::read_to_string(path).map_err(|e| {
            RestyleError::Other(format!("failed to read {}: {e}", path.display()))
        }),
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .map_err(|e| RestyleError::Other(format!("failed to read stdin: {e}")))?;
            Ok(input)
        }
    }
}

pub(crate) fn write_out(out: &mut dyn Write, text: &str) -> Result<(), RestyleError> {
    writeln!(out, "{text}").map_err(|e| RestyleError::Other(format!("failed to write output: {e}")))
}
