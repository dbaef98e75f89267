//! CV rendering with GitHub repository info.

use super::{load_config, write_output};
use anyhow::{Context, Result};
use askama::Template;
use scholar_core::cv::{collect_repo_info, load_cv_data};
use scholar_core::github::RepoInfo;
use scholar_core::{Config, CvDocument, GithubClient, GithubInfoProvider};
use scholar_render::{CvTemplate, Layout};
use serde_yaml::Value;
use std::collections::HashMap;
use std::path::Path;

/// `scholar cv`
pub fn cv_command(config_path: &Path, offline: bool) -> Result<()> {
    let config = load_config(config_path)?;
    build_cv(&config, offline)
}

/// Render the CV page from the records file
pub fn build_cv(config: &Config, offline: bool) -> Result<()> {
    tracing::info!("Building CV...");

    let source = config.cv_source_path();
    tracing::info!("Reading: {}", config.display_path(&source));
    let data = load_cv_data(&source).context("Failed to load CV data")?;

    let repos = repo_info(config, &data, offline);
    let doc = CvDocument::build(config, &data, &repos);

    let template = CvTemplate {
        layout: Layout::new(config, "CV", "", "cv"),
        heading: doc.heading.clone(),
        pronouns: doc.pronouns.clone(),
        toc: doc.toc().cloned().collect(),
        sections: doc.sections,
    };
    let html = template.render().context("Failed to render CV template")?;

    let rel_path = config.cv.output.to_string_lossy().to_string();
    write_output(config, &rel_path, &html)?;
    tracing::info!("Built CV with {} sections", template.sections.len());
    Ok(())
}

/// GitHub info for the CV's software entries; never fails the build
fn repo_info(config: &Config, data: &Value, offline: bool) -> HashMap<String, RepoInfo> {
    if !config.github.enabled {
        return HashMap::new();
    }

    let cache_path = config.github_cache_path();
    let cache_hours = config.github.cache_hours;

    let mut provider = if offline {
        GithubInfoProvider::<GithubClient>::offline(cache_path, cache_hours)
    } else {
        match GithubClient::from_config(&config.github) {
            Ok(client) => GithubInfoProvider::new(client, cache_path, cache_hours),
            Err(e) => {
                tracing::warn!("GitHub client unavailable, using cache only: {}", e);
                GithubInfoProvider::offline(cache_path, cache_hours)
            }
        }
    };

    let repos = collect_repo_info(&mut provider, data);
    if let Err(e) = provider.save() {
        tracing::warn!("Could not save GitHub cache: {}", e);
    }
    repos
}
