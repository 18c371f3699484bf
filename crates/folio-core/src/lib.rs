//! folio core library
//!
//! This crate provides the reading core of folio: it turns a large plain-text
//! document into numbered pages and keeps per-user reading state (current
//! page, bookmarks) in a key-value cache with expiry.
//!
//! # Architecture
//!
//! - **Cache**: async key-value store with per-key TTL, the only shared state
//! - **Paginator**: pure function splitting text at sentence-like boundaries
//! - **Book repository**: paginates a user's source text once and caches it
//! - **Session manager**: current page and bookmarks, updated under a
//!   per-user lock
//!
//! # Quick Start
//!
//! ```text
//! let cache: Arc<dyn CacheStore> = Arc::new(MemoryCache::new());
//! let reader = Reader::from_config(cache, &Config::load()?)?;
//!
//! reader.books().import_source(user, &text).await?;
//! let view = reader.beginning(user).await?;
//! reader.add_bookmark(user, 3).await?;
//! ```
//!
//! # Modules
//!
//! - `reader`: Facade combining books and sessions (main entry point)
//! - `cache`: Cache contract and the in-memory backend
//! - `paginate`: Text pagination
//! - `repository`: Paginated book cache
//! - `session`: Reading sessions and bookmarks
//! - `source`: Per-user source text files
//! - `models`: Data structures for books, sessions and page views
//! - `config`: Application configuration

pub mod cache;
pub mod config;
pub mod error;
pub mod locks;
pub mod models;
pub mod paginate;
pub mod reader;
pub mod repository;
pub mod session;
pub mod source;

pub use cache::{CacheError, CacheStore, MemoryCache};
pub use config::Config;
pub use error::{ReaderError, ReaderResult};
pub use models::{Book, BookmarkEntry, Direction, PageView, UserId, UserSession};
pub use paginate::{Page, Paginator};
pub use reader::Reader;
pub use repository::BookRepository;
pub use session::SessionManager;
pub use source::SourceLayout;
