use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Restyle: apply your own CSS themes to the sites you visit.
#[derive(Parser, Debug)]
#[command(name = "restyle", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Theme store path override.
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Log directive override (e.g. `restyle=debug`).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the stylesheet a theme source turns into.
    Transform {
        /// Theme source file (stdin if omitted).
        file: Option<PathBuf>,
    },
    /// Report syntax problems in a theme source.
    Check {
        /// Theme source file (stdin if omitted).
        file: Option<PathBuf>,
    },
    /// Test whether a target pattern matches a page URL.
    Match { url: String, pattern: String },
    /// Manage stored themes.
    Themes {
        #[command(subcommand)]
        action: ThemesCommand,
    },
    /// Open a page in a preview window with the current theme applied.
    Browse { url: String },
}

#[derive(Subcommand, Debug)]
pub enum ThemesCommand {
    /// List themes, marking the selected one.
    List,
    /// Add a theme.
    Add {
        name: String,
        /// Target pattern (empty matches every site).
        #[arg(long, default_value = "")]
        url: String,
        /// Theme source file (stdin if omitted).
        #[arg(long)]
        css: Option<PathBuf>,
        #[arg(long)]
        description: Option<String>,
        /// Also make it the selected theme.
        #[arg(long)]
        select: bool,
    },
    /// Delete a theme. The last theme cannot be removed.
    Remove { id: String },
    /// Select the theme to apply.
    Select { id: String },
    /// Turn theming on.
    Enable,
    /// Turn theming off.
    Disable,
    /// Import themes from a bundle, a JSON array, or a single theme.
    Import { file: PathBuf },
    /// Export every theme as a bundle.
    Export {
        /// Output file (stdout if omitted).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

pub fn parse() -> Args {
    Args::parse()
}
