//! Book command handlers

use std::path::Path;

use anyhow::{bail, Context, Result};

use folio_core::{Reader, UserId};

use crate::output::Output;

/// Store a text file as the user's book source
pub async fn import(reader: &Reader, user: UserId, file: &Path, output: &Output) -> Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read text file: {:?}", file))?;

    let path = reader.books().import_source(user, &text).await?;
    if !reader.ensure_book(user).await? {
        bail!("Imported source vanished from {:?}", path);
    }
    let total = reader.get_total_pages(user).await?;

    output.done(&format!(
        "Imported {} page(s) for user {} into {}",
        total,
        user,
        path.display()
    ));
    Ok(())
}

/// Print one page of the user's book
pub async fn show(reader: &Reader, user: UserId, page: u32, output: &Output) -> Result<()> {
    if !reader.ensure_book(user).await? {
        bail!(
            "No book for user {}. Expected a text file at {:?}; add one with `folio import`.",
            user,
            reader.books().source_path(user)
        );
    }

    let view = if page == 1 {
        reader.beginning(user).await?
    } else {
        reader.open_bookmark(user, page).await?
    };

    match view {
        Some(view) => {
            output.print_page(&view);
            Ok(())
        }
        None => bail!(
            "Page {} not found; the book has {} page(s).",
            page,
            reader.get_total_pages(user).await?
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use folio_core::{Config, MemoryCache};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn reader(temp_dir: &TempDir) -> Reader {
        let config = Config {
            books_dir: temp_dir.path().join("book"),
            page_size: 20,
            ..Config::default()
        };
        Reader::from_config(Arc::new(MemoryCache::new()), &config).unwrap()
    }

    #[tokio::test]
    async fn test_import_then_show() {
        let temp_dir = TempDir::new().unwrap();
        let reader = reader(&temp_dir);
        let output = Output::new(OutputFormat::Quiet);
        let file = temp_dir.path().join("novel.txt");
        std::fs::write(&file, "First things first. Then the rest, at length.").unwrap();

        import(&reader, UserId(5), &file, &output).await.unwrap();
        assert!(reader.get_total_pages(UserId(5)).await.unwrap() >= 2);

        show(&reader, UserId(5), 2, &output).await.unwrap();
        assert_eq!(reader.get_session(UserId(5)).await.unwrap().page, 2);
    }

    #[tokio::test]
    async fn test_show_without_book_fails() {
        let temp_dir = TempDir::new().unwrap();
        let reader = reader(&temp_dir);
        let output = Output::new(OutputFormat::Quiet);

        let err = show(&reader, UserId(1), 1, &output).await.unwrap_err();
        assert!(err.to_string().contains("No book for user 1"));
    }

    #[tokio::test]
    async fn test_show_out_of_range_page_fails() {
        let temp_dir = TempDir::new().unwrap();
        let reader = reader(&temp_dir);
        let output = Output::new(OutputFormat::Quiet);
        reader
            .books()
            .import_source(UserId(1), "Tiny.")
            .await
            .unwrap();

        let err = show(&reader, UserId(1), 9, &output).await.unwrap_err();
        assert!(err.to_string().contains("Page 9 not found"));
    }

    #[tokio::test]
    async fn test_import_missing_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let reader = reader(&temp_dir);
        let output = Output::new(OutputFormat::Quiet);

        let missing = temp_dir.path().join("missing.txt");
        assert!(import(&reader, UserId(1), &missing, &output).await.is_err());
    }
}
