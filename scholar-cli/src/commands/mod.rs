//! CLI command implementations.

pub mod blog;
pub mod build;
pub mod cv;
pub mod init;
pub mod pages;

pub use blog::blog_command;
pub use build::build_site;
pub use cv::cv_command;
pub use init::init_project;
pub use pages::pages_command;

use anyhow::{Context, Result};
use scholar_core::Config;
use std::fs;
use std::path::Path;

/// Load the config named on the command line, or the default layout beside it
pub(crate) fn load_config(config_path: &Path) -> Result<Config> {
    tracing::debug!("Loading config from {:?}", config_path);
    Config::load_or_default(config_path).context("Failed to load configuration")
}

/// Write rendered HTML to `rel_path` under the output directory
pub(crate) fn write_output(config: &Config, rel_path: &str, html: &str) -> Result<()> {
    let target = config.output_dir().join(rel_path);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).with_context(|| format!("Failed to create {:?}", parent))?;
    }
    fs::write(&target, html).with_context(|| format!("Failed to write {:?}", target))?;
    tracing::info!("  → {}", config.display_path(&target));
    Ok(())
}
