//! Reading sessions
//!
//! Owns the `user_data_<user_id>` cache keys. A session is created with
//! `page = 1` and no bookmarks the first time a user is seen.
//!
//! Every mutation is a read-then-write of the whole session value. Those
//! sequences run under a per-user lock, so two concurrent edits for the same
//! user both land, while different users never wait on each other.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::cache::CacheStore;
use crate::config::Config;
use crate::error::ReaderResult;
use crate::locks::KeyedLocks;
use crate::models::{Direction, UserId, UserSession};

/// Cache key of a user's session
pub fn session_key(user: UserId) -> String {
    format!("user_data_{}", user)
}

/// Per-user reading state on top of a [`CacheStore`]
pub struct SessionManager {
    cache: Arc<dyn CacheStore>,
    ttl: Option<Duration>,
    locks: KeyedLocks<UserId>,
}

impl SessionManager {
    pub fn new(cache: Arc<dyn CacheStore>) -> Self {
        Self {
            cache,
            ttl: None,
            locks: KeyedLocks::new(),
        }
    }

    pub fn from_config(cache: Arc<dyn CacheStore>, config: &Config) -> Self {
        Self::new(cache).with_ttl(config.session_ttl())
    }

    /// Expire sessions `ttl` after their last write
    pub fn with_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.ttl = ttl;
        self
    }

    async fn load(&self, user: UserId) -> ReaderResult<Option<UserSession>> {
        Ok(self.cache.get_as(&session_key(user)).await?)
    }

    async fn save(&self, user: UserId, session: &UserSession) -> ReaderResult<()> {
        Ok(self
            .cache
            .set_as(&session_key(user), session, self.ttl)
            .await?)
    }

    /// Run `f` on the user's session and persist the result
    ///
    /// Holds the user's lock across the read and the write. An unchanged
    /// stored session is not written back, so its expiry is left alone.
    async fn update<R>(
        &self,
        user: UserId,
        f: impl FnOnce(&mut UserSession) -> R + Send,
    ) -> ReaderResult<R> {
        let _guard = self.locks.lock(&user).await;
        let stored = self.load(user).await?;
        let mut session = stored.clone().unwrap_or_default();
        let result = f(&mut session);
        if stored.as_ref() != Some(&session) {
            self.save(user, &session).await?;
        }
        Ok(result)
    }

    /// Get the user's session, creating and persisting the default
    pub async fn get_session(&self, user: UserId) -> ReaderResult<UserSession> {
        let _guard = self.locks.lock(&user).await;
        if let Some(session) = self.load(user).await? {
            return Ok(session);
        }

        let session = UserSession::default();
        self.save(user, &session).await?;
        debug!(%user, "Created session");
        Ok(session)
    }

    /// Move to `page`
    ///
    /// Not checked against the book; that is the caller's job. Page 0 is
    /// stored as 1.
    pub async fn set_page(&self, user: UserId, page: u32) -> ReaderResult<()> {
        self.update(user, |session| session.page = page.max(1))
            .await
    }

    /// Turn one page in `direction`, staying within `1..=last_page`
    ///
    /// Returns the new page, or `None` if the turn would leave the book and
    /// the session stayed where it was.
    pub async fn step(
        &self,
        user: UserId,
        direction: Direction,
        last_page: u32,
    ) -> ReaderResult<Option<u32>> {
        self.update(user, |session| {
            let next = direction.apply(session.page, last_page)?;
            session.page = next;
            Some(next)
        })
        .await
    }

    /// Bookmark `page`, returning `false` if it was already bookmarked
    pub async fn add_bookmark(&self, user: UserId, page: u32) -> ReaderResult<bool> {
        let added = self
            .update(user, |session| session.bookmarks.insert(page))
            .await?;
        debug!(%user, page, added, "Add bookmark");
        Ok(added)
    }

    /// Bookmark the page the session is on, returning that page
    pub async fn bookmark_current(&self, user: UserId) -> ReaderResult<u32> {
        let (page, added) = self
            .update(user, |session| {
                (session.page, session.bookmarks.insert(session.page))
            })
            .await?;
        debug!(%user, page, added, "Bookmark current page");
        Ok(page)
    }

    /// Remove the bookmark on `page`, returning `false` if there was none
    pub async fn remove_bookmark(&self, user: UserId, page: u32) -> ReaderResult<bool> {
        let removed = self
            .update(user, |session| session.bookmarks.remove(&page))
            .await?;
        debug!(%user, page, removed, "Remove bookmark");
        Ok(removed)
    }

    /// Bookmarked pages in ascending order
    pub async fn get_bookmarks(&self, user: UserId) -> ReaderResult<Vec<u32>> {
        Ok(self
            .get_session(user)
            .await?
            .bookmarks
            .into_iter()
            .collect())
    }

    /// Drop every bookmark, returning how many there were
    pub async fn clear_bookmarks(&self, user: UserId) -> ReaderResult<usize> {
        self.update(user, |session| std::mem::take(&mut session.bookmarks).len())
            .await
    }

    /// Forget the user's session entirely
    pub async fn reset(&self, user: UserId) -> ReaderResult<()> {
        let _guard = self.locks.lock(&user).await;
        self.cache.delete(&session_key(user)).await?;
        Ok(())
    }
}
