//! Static page rendering.

use super::{load_config, write_output};
use crate::manifest;
use anyhow::{Context, Result};
use askama::Template;
use scholar_core::models::PageSection;
use scholar_core::{Config, Page, PageBuilder, PostSummary, TemplateKind};
use scholar_render::{
    BookTemplate, CourseTemplate, IndexTemplate, Layout, PageTemplate, PostEntry,
};
use std::path::Path;

/// `scholar pages`: static pages, with latest posts from the last blog build
pub fn pages_command(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    let posts = manifest::latest_posts(&config);
    build_pages(&config, &posts)?;
    Ok(())
}

/// Render every content page; returns how many were written
pub fn build_pages(config: &Config, posts: &[PostSummary]) -> Result<usize> {
    tracing::info!("Building static pages...");
    let pages = PageBuilder::new(config).build();

    for page in &pages {
        let html = render_page(config, page, posts)?;
        write_output(config, &page.output_rel_path(), &html)?;
    }

    Ok(pages.len())
}

/// Re-render only the home page with the latest posts
pub fn update_index(config: &Config, posts: &[PostSummary]) -> Result<()> {
    if posts.is_empty() {
        return Ok(());
    }

    let index_path = config.content_dir().join("index.md");
    if !index_path.exists() {
        tracing::debug!("No {:?}; skipping home page update", index_path);
        return Ok(());
    }

    let page = PageBuilder::new(config)
        .parse_page(&index_path, PageSection::Root)
        .context("Failed to parse home page")?;
    let html = render_page(config, &page, posts)?;
    write_output(config, &page.output_rel_path(), &html)?;
    tracing::info!("Updated {} with latest posts", page.output_rel_path());
    Ok(())
}

/// Render a page with the template its frontmatter selects
pub fn render_page(config: &Config, page: &Page, posts: &[PostSummary]) -> Result<String> {
    let fm = &page.frontmatter;
    let layout = Layout::new(config, &page.title, page.base_path(), &page.active_key());

    let html = match page.template {
        TemplateKind::Page => PageTemplate {
            layout,
            title: page.title.clone(),
            subtitle: fm.subtitle.clone(),
            content: page.content_html.clone(),
        }
        .render(),
        TemplateKind::Index => IndexTemplate {
            latest_posts: posts
                .iter()
                .take(config.blog.latest_posts)
                .map(|p| PostEntry::from_summary(p, page.base_path()))
                .collect(),
            layout,
            title: page.title.clone(),
            tagline: fm.tagline.clone(),
            photo: fm.photo.clone(),
            content: page.content_html.clone(),
        }
        .render(),
        TemplateKind::Book => BookTemplate {
            layout,
            title: page.title.clone(),
            subtitle: fm.subtitle.clone(),
            cover: fm.cover.clone(),
            publisher: fm.publisher.clone(),
            year: fm.year.clone(),
            links: fm.links.clone(),
            content: page.content_html.clone(),
        }
        .render(),
        TemplateKind::Course => CourseTemplate {
            layout,
            title: page.title.clone(),
            code: fm.code.clone(),
            term: fm.term.clone(),
            schedule: fm.schedule.clone(),
            location: fm.location.clone(),
            syllabus: fm.syllabus.clone(),
            content: page.content_html.clone(),
        }
        .render(),
    };

    html.with_context(|| {
        format!(
            "Failed to render {} template for {}",
            page.template.as_str(),
            page.slug
        )
    })
}
