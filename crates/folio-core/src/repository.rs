//! Book repository
//!
//! Owns the `book_<user_id>` cache keys. A book is paginated from the user's
//! source text the first time it is asked for and served from the cache
//! after that, until it expires or is invalidated.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::cache::CacheStore;
use crate::config::Config;
use crate::error::ReaderResult;
use crate::locks::KeyedLocks;
use crate::models::{Book, UserId};
use crate::paginate::Paginator;
use crate::source::SourceLayout;

/// Cache key of a user's paginated book
pub fn book_key(user: UserId) -> String {
    format!("book_{}", user)
}

/// Builds, caches and serves paginated books
pub struct BookRepository {
    cache: Arc<dyn CacheStore>,
    paginator: Paginator,
    layout: SourceLayout,
    ttl: Option<Duration>,
    locks: KeyedLocks<UserId>,
}

impl BookRepository {
    pub fn new(cache: Arc<dyn CacheStore>, paginator: Paginator, layout: SourceLayout) -> Self {
        Self {
            cache,
            paginator,
            layout,
            ttl: None,
            locks: KeyedLocks::new(),
        }
    }

    /// Create a repository from configuration
    pub fn from_config(cache: Arc<dyn CacheStore>, config: &Config) -> ReaderResult<Self> {
        let paginator = Paginator::new(config.page_size, &config.end_signs)?;
        Ok(Self::new(cache, paginator, SourceLayout::from_config(config)).with_ttl(config.book_ttl()))
    }

    /// Expire cached books after `ttl`
    pub fn with_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn layout(&self) -> &SourceLayout {
        &self.layout
    }

    /// Path of a user's source text
    pub fn source_path(&self, user: UserId) -> PathBuf {
        self.layout.source_path(user)
    }

    /// Make sure the user's book is paginated and cached
    ///
    /// Returns `false` when the user has no source text.
    pub async fn ensure_book(&self, user: UserId) -> ReaderResult<bool> {
        Ok(self.load_book(user).await?.is_some())
    }

    /// Get the user's book, paginating it from source on a cache miss
    ///
    /// Returns `None` when the user has no source text. Nothing is written to
    /// the cache unless pagination succeeds.
    pub async fn load_book(&self, user: UserId) -> ReaderResult<Option<Book>> {
        let key = book_key(user);
        let _guard = self.locks.lock(&user).await;

        if let Some(book) = self.cache.get_as::<Book>(&key).await? {
            return Ok(Some(book));
        }

        debug!(%user, "Book not cached, reading source");
        let Some(text) = self.layout.read(user).await? else {
            debug!(%user, path = ?self.layout.source_path(user), "No source text");
            return Ok(None);
        };

        let book = Book::from_pages(self.paginator.pages(&text));
        self.cache.set_as(&key, &book, self.ttl).await?;
        info!(
            %user,
            pages = book.total_pages(),
            page_size = self.paginator.page_size(),
            "Paginated book"
        );

        Ok(Some(book))
    }

    /// Get the cached book without building it
    pub async fn cached_book(&self, user: UserId) -> ReaderResult<Option<Book>> {
        Ok(self.cache.get_as::<Book>(&book_key(user)).await?)
    }

    /// Text of one page of the cached book
    pub async fn get_book_page(&self, user: UserId, page: u32) -> ReaderResult<Option<String>> {
        Ok(self
            .cached_book(user)
            .await?
            .and_then(|book| book.page(page).map(str::to_string)))
    }

    /// Page count of the cached book, 0 when there is none
    pub async fn get_total_pages(&self, user: UserId) -> ReaderResult<u32> {
        Ok(self
            .cached_book(user)
            .await?
            .map_or(0, |book| book.total_pages()))
    }

    /// Drop the cached book so the next access re-paginates
    pub async fn invalidate(&self, user: UserId) -> ReaderResult<()> {
        let _guard = self.locks.lock(&user).await;
        self.cache.delete(&book_key(user)).await?;
        debug!(%user, "Invalidated cached book");
        Ok(())
    }

    /// Replace the user's source text and drop the stale cached book
    pub async fn import_source(&self, user: UserId, text: &str) -> ReaderResult<PathBuf> {
        let _guard = self.locks.lock(&user).await;
        let path = self.layout.write(user, text).await?;
        self.cache.delete(&book_key(user)).await?;
        info!(%user, path = ?path, chars = text.chars().count(), "Imported source text");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::paginate::DEFAULT_END_SIGNS;
    use serde_json::json;
    use tempfile::TempDir;

    const TEXT: &str = "Hello world. This is a test. Bye.";

    struct Fixture {
        _temp_dir: TempDir,
        cache: Arc<MemoryCache>,
        repo: BookRepository,
    }

    fn fixture() -> Fixture {
        let temp_dir = TempDir::new().unwrap();
        let cache = Arc::new(MemoryCache::new());
        let repo = BookRepository::new(
            cache.clone(),
            Paginator::new(15, DEFAULT_END_SIGNS).unwrap(),
            SourceLayout::new(temp_dir.path(), "book.txt"),
        );
        Fixture {
            _temp_dir: temp_dir,
            cache,
            repo,
        }
    }

    #[test]
    fn test_book_key_format() {
        assert_eq!(book_key(UserId(42)), "book_42");
    }

    #[tokio::test]
    async fn test_missing_source_is_not_ready() {
        let f = fixture();

        assert!(!f.repo.ensure_book(UserId(1)).await.unwrap());
        // Nothing written on the not-found path
        assert!(f.cache.is_empty().await);
        assert_eq!(f.repo.get_total_pages(UserId(1)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_ensure_book_paginates_and_caches() {
        let f = fixture();
        f.repo.import_source(UserId(1), TEXT).await.unwrap();

        assert!(f.repo.ensure_book(UserId(1)).await.unwrap());

        let raw = f.cache.get("book_1").await.unwrap().unwrap();
        assert_eq!(raw["1"], json!("Hello world."));
        assert_eq!(
            f.repo.get_book_page(UserId(1), 1).await.unwrap().as_deref(),
            Some("Hello world.")
        );
        assert!(f.repo.get_total_pages(UserId(1)).await.unwrap() >= 2);
    }

    #[tokio::test]
    async fn test_cached_book_is_not_rebuilt() {
        let f = fixture();
        f.repo.import_source(UserId(1), TEXT).await.unwrap();
        f.repo.ensure_book(UserId(1)).await.unwrap();

        // Removing the source behind the cache's back changes nothing
        f.repo.layout().remove(UserId(1)).await.unwrap();
        assert!(f.repo.ensure_book(UserId(1)).await.unwrap());
        assert!(f.repo.get_book_page(UserId(1), 1).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_out_of_range_page_is_none() {
        let f = fixture();
        f.repo.import_source(UserId(1), TEXT).await.unwrap();
        f.repo.ensure_book(UserId(1)).await.unwrap();

        assert!(f.repo.get_book_page(UserId(1), 0).await.unwrap().is_none());
        assert!(f.repo.get_book_page(UserId(1), 999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_import_invalidates_stale_book() {
        let f = fixture();
        f.repo.import_source(UserId(1), TEXT).await.unwrap();
        f.repo.ensure_book(UserId(1)).await.unwrap();

        f.repo.import_source(UserId(1), "Brand new.").await.unwrap();
        assert!(f.repo.cached_book(UserId(1)).await.unwrap().is_none());

        f.repo.ensure_book(UserId(1)).await.unwrap();
        assert_eq!(f.repo.get_total_pages(UserId(1)).await.unwrap(), 1);
        assert_eq!(
            f.repo.get_book_page(UserId(1), 1).await.unwrap().as_deref(),
            Some("Brand new.")
        );
    }

    #[tokio::test]
    async fn test_books_are_per_user() {
        let f = fixture();
        f.repo.import_source(UserId(1), TEXT).await.unwrap();

        assert!(f.repo.ensure_book(UserId(1)).await.unwrap());
        assert!(!f.repo.ensure_book(UserId(2)).await.unwrap());
    }

    #[tokio::test]
    async fn test_invalidate() {
        let f = fixture();
        f.repo.import_source(UserId(1), TEXT).await.unwrap();
        f.repo.ensure_book(UserId(1)).await.unwrap();

        f.repo.invalidate(UserId(1)).await.unwrap();
        assert!(!f.cache.exists("book_1").await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_book_ttl() {
        let f = fixture();
        let repo = BookRepository::new(
            f.cache.clone(),
            Paginator::default(),
            f.repo.layout().clone(),
        )
        .with_ttl(Some(Duration::from_secs(30)));
        repo.import_source(UserId(1), TEXT).await.unwrap();
        repo.ensure_book(UserId(1)).await.unwrap();

        tokio::time::advance(Duration::from_secs(31)).await;
        assert!(repo.cached_book(UserId(1)).await.unwrap().is_none());
        // Rebuilt on demand from the source
        assert!(repo.ensure_book(UserId(1)).await.unwrap());
    }

    #[tokio::test]
    async fn test_from_config_rejects_zero_page_size() {
        let config = Config {
            page_size: 0,
            ..Config::default()
        };
        let cache: Arc<dyn CacheStore> = Arc::new(MemoryCache::new());
        assert!(BookRepository::from_config(cache, &config).is_err());
    }
}
