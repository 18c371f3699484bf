//! Printing pages and status lines for the CLI
//!
//! Every command prints through [`Output`] so `--json` and `--quiet` behave
//! the same everywhere. Quiet output is meant for shell pipelines: a page
//! count or bare page text, never decoration.

use folio_core::{Page, PageView};
use serde_json::json;

/// Width of the one-line page preview
const PREVIEW_WIDTH: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
    /// Bare values only
    Quiet,
}

impl OutputFormat {
    /// Pick the format for `--json`/`--quiet`; quiet wins when both are set
    pub fn select(json: bool, quiet: bool) -> Self {
        match (json, quiet) {
            (_, true) => OutputFormat::Quiet,
            (true, false) => OutputFormat::Json,
            (false, false) => OutputFormat::Human,
        }
    }
}

pub struct Output {
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print the pages of a paginated text
    ///
    /// Human output shows a one-line preview per page unless `full` is set.
    pub fn print_pages(&self, pages: &[Page], full: bool) {
        match self.format {
            OutputFormat::Human if pages.is_empty() => println!("No pages."),
            OutputFormat::Human => {
                for page in pages {
                    if full {
                        println!("── Page {} ──\n{}\n", page.number, page.text);
                    } else {
                        println!(
                            "{:>5} | {:>4} chars | {}",
                            page.number,
                            page.text.chars().count(),
                            preview(&page.text, PREVIEW_WIDTH)
                        );
                    }
                }
                println!("\n{} page(s)", pages.len());
            }
            OutputFormat::Json => {
                let listing: Vec<_> = pages
                    .iter()
                    .map(|page| {
                        json!({
                            "page": page.number,
                            "text": page.text,
                            "start": page.span.start,
                            "end": page.span.end
                        })
                    })
                    .collect();
                println!("{}", json!(listing));
            }
            OutputFormat::Quiet => println!("{}", pages.len()),
        }
    }

    /// Print a single page of a user's book
    pub fn print_page(&self, view: &PageView) {
        match self.format {
            OutputFormat::Human => println!("{}\n\n« {} »", view.text, view.position_label()),
            OutputFormat::Json => println!(
                "{}",
                json!({"page": view.page, "total": view.total, "text": view.text})
            ),
            OutputFormat::Quiet => println!("{}", view.text),
        }
    }

    /// Report a completed change; silent in quiet mode
    pub fn done(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => println!("{}", json!({"ok": true, "message": message})),
            OutputFormat::Quiet => {}
        }
    }
}

/// First line of `text`, cut to `width` characters with a trailing ellipsis
fn preview(text: &str, width: usize) -> String {
    let line = text.trim_start().lines().next().unwrap_or_default();
    if line.chars().count() <= width {
        return line.to_string();
    }
    let mut cut: String = line.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
