//! Build command implementation.

use super::blog::build_blog;
use super::cv::build_cv;
use super::load_config;
use super::pages::build_pages;
use anyhow::{Context, Result};
use scholar_core::Config;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Build everything: blog first so the home page can list the latest posts
pub fn build_site(config_path: &Path, offline: bool) -> Result<()> {
    let config = load_config(config_path)?;
    tracing::info!("Building site: {}", config.site.title);

    let output_dir = config.output_dir();
    fs::create_dir_all(&output_dir).context("Failed to create output directory")?;

    let posts = build_blog(&config)?;
    let pages = build_pages(&config, &posts)?;
    tracing::info!("Rendered {} pages", pages);

    if config.cv_source_path().exists() {
        build_cv(&config, offline)?;
    } else {
        tracing::warn!(
            "No CV data at {}; skipping CV",
            config.display_path(&config.cv_source_path())
        );
    }

    copy_static(&config)?;

    tracing::info!("Build complete: {}", config.display_path(&output_dir));
    Ok(())
}

/// Copy the static directory verbatim into the output
fn copy_static(config: &Config) -> Result<()> {
    let static_dir = config.static_dir();
    if !static_dir.is_dir() {
        tracing::debug!("No static directory at {:?}", static_dir);
        return Ok(());
    }

    let copied = copy_dir(&static_dir, &config.output_dir())?;
    tracing::info!(
        "Copied {} static files from {}",
        copied,
        config.display_path(&static_dir)
    );
    Ok(())
}

fn copy_dir(src: &Path, dest: &Path) -> Result<usize> {
    let mut copied = 0;
    for entry in WalkDir::new(src)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let relative = entry.path().strip_prefix(src).unwrap_or(entry.path());
        let target = dest.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(entry.path(), &target)
            .with_context(|| format!("Failed to copy {:?} to {:?}", entry.path(), target))?;
        copied += 1;
    }
    Ok(copied)
}
