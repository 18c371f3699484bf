//! Reader facade
//!
//! The entry point for whatever sits in front of the core (a bot, a CLI).
//! Combines the [`BookRepository`] and the [`SessionManager`] into the
//! operations a reading flow needs and hands back [`PageView`]s ready to be
//! rendered.
//!
//! ## Usage
//!
//! ```ignore
//! let cache: Arc<dyn CacheStore> = Arc::new(MemoryCache::new());
//! let reader = Reader::from_config(cache, &Config::load()?)?;
//!
//! if let Some(view) = reader.beginning(user).await? {
//!     render(&view.text, &view.position_label());
//! }
//! ```

use std::sync::Arc;

use crate::cache::CacheStore;
use crate::config::Config;
use crate::error::ReaderResult;
use crate::models::{Book, BookmarkEntry, Direction, PageView, UserId, UserSession};
use crate::repository::BookRepository;
use crate::session::SessionManager;

/// Paged reading over cached books and sessions
pub struct Reader {
    books: BookRepository,
    sessions: SessionManager,
}

impl Reader {
    pub fn new(books: BookRepository, sessions: SessionManager) -> Self {
        Self { books, sessions }
    }

    /// Build a reader whose repository and sessions share one cache
    pub fn from_config(cache: Arc<dyn CacheStore>, config: &Config) -> ReaderResult<Self> {
        let books = BookRepository::from_config(Arc::clone(&cache), config)?;
        let sessions = SessionManager::from_config(cache, config);
        Ok(Self::new(books, sessions))
    }

    pub fn books(&self) -> &BookRepository {
        &self.books
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    // ==================== Book Operations ====================

    pub async fn ensure_book(&self, user: UserId) -> ReaderResult<bool> {
        self.books.ensure_book(user).await
    }

    pub async fn get_book_page(&self, user: UserId, page: u32) -> ReaderResult<Option<String>> {
        self.books.get_book_page(user, page).await
    }

    pub async fn get_total_pages(&self, user: UserId) -> ReaderResult<u32> {
        self.books.get_total_pages(user).await
    }

    // ==================== Session Operations ====================

    pub async fn get_session(&self, user: UserId) -> ReaderResult<UserSession> {
        self.sessions.get_session(user).await
    }

    pub async fn set_page(&self, user: UserId, page: u32) -> ReaderResult<()> {
        self.sessions.set_page(user, page).await
    }

    /// Turn a page, bounded by the user's book
    ///
    /// Returns `None` without touching the session when there is no book or
    /// the turn would leave it.
    pub async fn step(&self, user: UserId, direction: Direction) -> ReaderResult<Option<u32>> {
        let Some(book) = self.books.load_book(user).await? else {
            return Ok(None);
        };
        self.sessions
            .step(user, direction, book.total_pages())
            .await
    }

    pub async fn add_bookmark(&self, user: UserId, page: u32) -> ReaderResult<bool> {
        self.sessions.add_bookmark(user, page).await
    }

    pub async fn remove_bookmark(&self, user: UserId, page: u32) -> ReaderResult<bool> {
        self.sessions.remove_bookmark(user, page).await
    }

    // ==================== Reading Flows ====================

    /// First contact: make sure the user has a session
    pub async fn start(&self, user: UserId) -> ReaderResult<UserSession> {
        self.sessions.get_session(user).await
    }

    /// Open the book at page 1
    ///
    /// Returns `None` when the user has no book.
    pub async fn beginning(&self, user: UserId) -> ReaderResult<Option<PageView>> {
        let Some(book) = self.books.load_book(user).await? else {
            return Ok(None);
        };
        self.sessions.set_page(user, 1).await?;
        Ok(view(&book, 1))
    }

    /// Show the page the user stopped on
    ///
    /// Returns `None` when there is no book or the stored page is not in it.
    pub async fn resume(&self, user: UserId) -> ReaderResult<Option<PageView>> {
        let Some(book) = self.books.load_book(user).await? else {
            return Ok(None);
        };
        let session = self.sessions.get_session(user).await?;
        Ok(view(&book, session.page))
    }

    /// Turn a page and show where the user landed
    ///
    /// Returns `None` at either end of the book.
    pub async fn turn(&self, user: UserId, direction: Direction) -> ReaderResult<Option<PageView>> {
        let Some(book) = self.books.load_book(user).await? else {
            return Ok(None);
        };
        let moved = self
            .sessions
            .step(user, direction, book.total_pages())
            .await?;
        Ok(moved.and_then(|page| view(&book, page)))
    }

    /// Jump to a bookmarked page if it exists in the book
    pub async fn open_bookmark(&self, user: UserId, page: u32) -> ReaderResult<Option<PageView>> {
        let Some(book) = self.books.load_book(user).await? else {
            return Ok(None);
        };
        let Some(found) = view(&book, page) else {
            return Ok(None);
        };
        self.sessions.set_page(user, page).await?;
        Ok(Some(found))
    }

    /// Bookmark the page the user is on, returning that page
    pub async fn bookmark_current(&self, user: UserId) -> ReaderResult<u32> {
        self.sessions.bookmark_current(user).await
    }

    /// Bookmarks with the text of their pages, skipping pages not in the book
    pub async fn bookmarks(&self, user: UserId) -> ReaderResult<Vec<BookmarkEntry>> {
        let pages = self.sessions.get_bookmarks(user).await?;
        let Some(book) = self.books.load_book(user).await? else {
            return Ok(Vec::new());
        };
        Ok(pages
            .into_iter()
            .filter_map(|page| {
                book.page(page).map(|text| BookmarkEntry {
                    page,
                    text: text.to_string(),
                })
            })
            .collect())
    }
}

fn view(book: &Book, page: u32) -> Option<PageView> {
    book.page(page).map(|text| PageView {
        page,
        total: book.total_pages(),
        text: text.to_string(),
    })
}
