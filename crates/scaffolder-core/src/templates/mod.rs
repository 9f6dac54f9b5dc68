//! Template bundles, the entry catalog, rendering and copying
//!
//! This module provides:
//! - The static catalog of template entries and their predicates
//! - Tera rendering over a closed set of variables
//! - Bundle loading from the binary, remote URLs or local directories
//! - Rendering a project into a target directory
//! - Version compatibility checking

pub mod catalog;
pub mod copier;
pub mod fetcher;
pub mod manifest;
pub mod render;
pub mod version;

use crate::product::ProductConfig;
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;

pub use catalog::{Catalog, Predicate, TemplateEntry, Var, STARTER};
pub use copier::{plan_project, render_project, RenderedFile};
pub use fetcher::{TemplateBundle, TemplateFetcher, TemplateSource};
pub use manifest::TemplateManifest;
pub use render::{render, Value, Variables, SYNTAX_VERSION};
pub use version::{check_compatibility, CompatibilityWarning};

/// Build `<bundle>.zip` from `<template_dir>/<bundle>/` for publishing
pub async fn build_zip<C: ProductConfig>(config: &C, template_dir: &Option<PathBuf>) -> Result<()> {
    let dir = template_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("templates"));

    if !dir.exists() {
        anyhow::bail!("Template directory not found: {}", dir.display());
    }

    let bundle_name = config.bundle_name();
    println!(
        "{}",
        format!("Building {} template bundle...", config.display_name())
            .cyan()
            .bold()
    );
    println!();
    print!("  {} {}...", "->".blue(), bundle_name);

    let zip_bytes = match TemplateFetcher::build_local_zip(&dir, bundle_name) {
        Ok(bytes) => bytes,
        Err(e) => {
            println!(" {}", "failed".red());
            return Err(e);
        }
    };

    // Refuse to publish a bundle the catalog cannot be rendered from
    let bundle = TemplateFetcher::extract_zip(&zip_bytes, bundle_name)?;
    let missing: Vec<&str> = config
        .catalog()
        .entries
        .iter()
        .filter(|e| bundle.file(e.source).is_none() && bundle.files_under(e.source).is_empty())
        .map(|e| e.source)
        .collect();
    if !missing.is_empty() {
        println!(" {}", "failed".red());
        anyhow::bail!("Bundle is missing templates: {}", missing.join(", "));
    }

    let zip_path = dir.join(format!("{}.zip", bundle_name));
    tokio::fs::write(&zip_path, &zip_bytes)
        .await
        .with_context(|| format!("Failed to write {}", zip_path.display()))?;
    println!(" {} ({} bytes)", "done".green(), zip_bytes.len());

    println!();
    println!(
        "{} {}",
        "Built".green().bold(),
        zip_path.display()
    );

    Ok(())
}
