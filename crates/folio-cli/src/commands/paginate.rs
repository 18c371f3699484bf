//! Paginate command handler

use std::path::Path;

use anyhow::{Context, Result};

use folio_core::{Config, Paginator};

use crate::output::Output;

/// Split a text file into pages and print them
pub fn run(
    file: &Path,
    page_size: Option<usize>,
    full: bool,
    config: &Config,
    output: &Output,
) -> Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read text file: {:?}", file))?;

    let paginator = Paginator::new(page_size.unwrap_or(config.page_size), &config.end_signs)?;
    let pages = paginator.pages(&text);
    tracing::debug!(pages = pages.len(), page_size = paginator.page_size(), "Paginated file");

    output.print_pages(&pages, full);
    Ok(())
}
