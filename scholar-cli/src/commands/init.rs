//! Init command implementation.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

const DEFAULT_CONFIG: &str = include_str!("../../../scholar.yml.example");

/// Initialize a new site
pub fn init_project(path: Option<&Path>) -> Result<()> {
    let root = path.unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(root).with_context(|| format!("Failed to create {:?}", root))?;

    write_config(root)?;
    scaffold_content(root)?;

    println!("✓ scholar initialized in {:?}", root);
    println!("  - Edit scholar.yml to customize site metadata");
    println!("  - Write pages in content/, posts in content/posts/, CV data in records/cv.md");
    Ok(())
}

fn write_config(root: &Path) -> Result<()> {
    let config_path = root.join("scholar.yml");
    if config_path.exists() {
        println!("scholar.yml already exists at {:?}", config_path);
        return Ok(());
    }

    fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {:?}", config_path))?;
    println!("Created {:?}", config_path);
    Ok(())
}

fn scaffold_content(root: &Path) -> Result<()> {
    let content = root.join("content");
    let dirs = [
        content.clone(),
        content.join("books"),
        content.join("teaching"),
        content.join("posts"),
        root.join("records"),
        root.join("static"),
    ];
    for dir in &dirs {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;
    }

    let starters = [
        (content.join("index.md"), SAMPLE_INDEX),
        (root.join("records/cv.md"), SAMPLE_CV),
        (root.join("static/footer.html"), SAMPLE_FOOTER),
        (root.join("static/styles.css"), SAMPLE_STYLES),
    ];
    for (path, body) in starters {
        if path.exists() {
            continue;
        }
        fs::write(&path, body).with_context(|| format!("Failed to write {:?}", path))?;
        println!("Created {:?}", path);
    }

    Ok(())
}

const SAMPLE_INDEX: &str = r#"---
template: index
title: John McLevey
tagline: Sociologist and computational social scientist
---

Welcome! Edit `content/index.md` to change this page, then run:

```bash
scholar build
```
"#;

const SAMPLE_CV: &str = r#"---
email: you@example.com
address:
  - Department of Sociology
  - University of Waterloo
areas:
  - Social Networks
  - Computational Social Science
articles:
  - authors: McLevey, J.
    year: 2024
    title: An Example Article
    journal: Example Journal
    volume: 1
    issue: 2
    pages: 1-20
software:
  - package: example
    description: An example package
    license: MIT
    development: Active
---
"#;

const SAMPLE_FOOTER: &str = r#"<p>© John McLevey</p>
"#;

const SAMPLE_STYLES: &str = r#":root { --fg: #222; --bg: #fff; --accent: #0b5394; }
[data-theme="dark"] { --fg: #ddd; --bg: #111; --accent: #6fa8dc; }
body { color: var(--fg); background: var(--bg); font-family: system-ui, sans-serif; max-width: 60rem; margin: 0 auto; padding: 1rem; }
nav a { margin-right: 1rem; color: var(--accent); text-decoration: none; }
nav a.active { font-weight: bold; }
.code-output { background: rgba(127, 127, 127, 0.1); padding: 0.5rem; }
.cv-layout { display: grid; grid-template-columns: 14rem 1fr; gap: 2rem; }
.cv-toc { position: sticky; top: 1rem; align-self: start; }
.lightbox { display: none; position: fixed; inset: 0; background: rgba(0, 0, 0, 0.85); }
.lightbox.open { display: flex; align-items: center; justify-content: center; }
.lightbox img { max-width: 90vw; max-height: 90vh; }
"#;
