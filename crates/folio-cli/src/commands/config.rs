//! `folio config` handlers

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde_json::json;

use folio_core::Config;

use crate::output::{Output, OutputFormat};

/// Print the effective configuration after file and env layering
pub fn show(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let config = crate::load_config(config_path)?;
    let file = target_file(config_path);

    match output.format {
        OutputFormat::Json => println!(
            "{}",
            json!({
                "file": file,
                "books_dir": config.books_dir,
                "book_file": config.book_file,
                "page_size": config.page_size,
                "end_signs": config.end_signs,
                "session_ttl_secs": config.session_ttl_secs,
                "book_ttl_secs": config.book_ttl_secs
            })
        ),
        OutputFormat::Quiet => println!("{}", config.books_dir.display()),
        OutputFormat::Human => {
            let rows = [
                ("books_dir", config.books_dir.display().to_string()),
                ("book_file", config.book_file.clone()),
                ("page_size", config.page_size.to_string()),
                ("end_signs", config.end_signs.clone()),
                ("session_ttl_secs", ttl_label(config.session_ttl_secs)),
                ("book_ttl_secs", ttl_label(config.book_ttl_secs)),
            ];
            println!("# {}", file.display());
            for (key, value) in rows {
                println!("{:<17} {}", key, value);
            }
        }
    }

    Ok(())
}

/// Change one key and write the file back
pub fn set(
    key: String,
    value: String,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    let mut config = crate::load_config(config_path)?;
    config.set_value(&key, &value)?;

    let file = target_file(config_path);
    config
        .save_to_path(&file)
        .with_context(|| format!("Failed to write {:?}", file))?;

    output.done(&format!("{} = {} (saved to {})", key, value, file.display()));
    Ok(())
}

/// `--config` when given, the default location otherwise
fn target_file(config_path: Option<&PathBuf>) -> PathBuf {
    config_path.cloned().unwrap_or_else(Config::config_file_path)
}

fn ttl_label(ttl: Option<u64>) -> String {
    match ttl {
        Some(secs) => format!("{}s", secs),
        None => "never expires".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ttl_label() {
        assert_eq!(ttl_label(Some(3600)), "3600s");
        assert_eq!(ttl_label(None), "never expires");
    }

    #[test]
    fn test_target_file_prefers_flag() {
        let path = PathBuf::from("/tmp/folio-test.toml");
        assert_eq!(target_file(Some(&path)), path);
    }
}
