//! # scholar CLI
//!
//! Command-line interface for the scholar personal-site generator.

mod manifest;
mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "scholar")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "scholar.yml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Defaults to `build`
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new site
    Init {
        /// Target directory (defaults to current directory)
        path: Option<PathBuf>,
    },

    /// Build the whole site: blog, pages, CV and static assets
    Build {
        /// Use cached GitHub data only
        #[arg(long)]
        offline: bool,
    },

    /// Build static pages only
    Pages,

    /// Build blog posts and the blog index, then refresh the home page
    Blog,

    /// Build the CV page
    Cv {
        /// Use cached GitHub data only
        #[arg(long)]
        offline: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if cli.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::INFO.into()
            }),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command.unwrap_or(Commands::Build { offline: false }) {
        Commands::Init { path } => commands::init_project(path.as_deref()),
        Commands::Build { offline } => commands::build_site(&cli.config, offline),
        Commands::Pages => commands::pages_command(&cli.config),
        Commands::Blog => commands::blog_command(&cli.config),
        Commands::Cv { offline } => commands::cv_command(&cli.config, offline),
    }
}
