//! Source text files
//!
//! Every user has one plain-text source at a fixed location:
//!
//! ```text
//! <books_dir>/<user_id>/<book_file>
//! ```
//!
//! A missing file means the book is simply not there yet. Writes go through
//! a temp file and a rename so a reader never sees a half-written source.

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::config::Config;
use crate::error::{ReaderError, ReaderResult};
use crate::models::UserId;

/// Locates user source files on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLayout {
    books_dir: PathBuf,
    book_file: String,
}

impl SourceLayout {
    pub fn new(books_dir: impl Into<PathBuf>, book_file: impl Into<String>) -> Self {
        Self {
            books_dir: books_dir.into(),
            book_file: book_file.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.books_dir, &config.book_file)
    }

    /// Directory holding a user's files
    pub fn user_dir(&self, user: UserId) -> PathBuf {
        self.books_dir.join(user.to_string())
    }

    /// Path of a user's source text
    pub fn source_path(&self, user: UserId) -> PathBuf {
        self.user_dir(user).join(&self.book_file)
    }

    /// Read a user's source text
    ///
    /// Returns `None` if the file doesn't exist.
    pub async fn read(&self, user: UserId) -> ReaderResult<Option<String>> {
        let path = self.source_path(user);

        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(ReaderError::ReadSource { path, source }),
        };

        String::from_utf8(bytes)
            .map(Some)
            .map_err(|_| ReaderError::MalformedSource { path })
    }

    /// Replace a user's source text
    pub async fn write(&self, user: UserId, text: &str) -> ReaderResult<PathBuf> {
        let path = self.source_path(user);
        atomic_write(&path, text.as_bytes())
            .await
            .map_err(|source| ReaderError::WriteSource {
                path: path.clone(),
                source,
            })?;
        Ok(path)
    }

    /// Remove a user's source text, if any
    pub async fn remove(&self, user: UserId) -> ReaderResult<bool> {
        let path = self.source_path(user);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(ReaderError::WriteSource { path, source }),
        }
    }
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
async fn atomic_write(path: &Path, data: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let temp_path = path.with_extension("tmp");

    let mut file = fs::File::create(&temp_path).await?;
    file.write_all(data).await?;
    file.sync_all().await?;
    drop(file);

    fs::rename(&temp_path, path).await
}
