//! Port for caching whole rendered pages.
//!
//! Entries expire after the time-to-live supplied when they are stored.
//! Nothing invalidates an entry early except [`PageCache::clear`], so cached
//! pages may be stale for up to one TTL after the data changes.
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use super::define_port_error;

/// Key under which the index listing is cached, whatever its query string.
pub const INDEX_PAGE_CACHE_KEY: &str = "index_page";

/// How long the index listing stays cached.
pub const INDEX_PAGE_TTL: Duration = Duration::from_secs(20);

define_port_error! {
    /// Errors surfaced by page cache adapters.
    pub enum PageCacheError {
        /// Cache backend is unavailable or timing out.
        Backend { message: String } => "page cache backend failure: {message}",
    }
}

/// Cache key for a rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageCacheKey(String);

/// Validation errors returned when constructing [`PageCacheKey`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageCacheKeyValidationError {
    #[error("page cache key must not be empty")]
    Empty,
    #[error("page cache key must not contain whitespace")]
    ContainsWhitespace,
}

impl PageCacheKey {
    /// Validate and construct a key.
    pub fn new(value: impl Into<String>) -> Result<Self, PageCacheKeyValidationError> {
        let raw = value.into();
        if raw.is_empty() {
            return Err(PageCacheKeyValidationError::Empty);
        }
        if raw.chars().any(char::is_whitespace) {
            return Err(PageCacheKeyValidationError::ContainsWhitespace);
        }
        Ok(Self(raw))
    }

    /// The fixed key of the index listing.
    pub fn index_page() -> Self {
        Self(INDEX_PAGE_CACHE_KEY.to_owned())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for PageCacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A rendered response body with its content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedPage {
    pub content_type: String,
    pub body: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageCache: Send + Sync {
    /// Read a live entry.
    async fn get(&self, key: &PageCacheKey) -> Result<Option<CachedPage>, PageCacheError>;

    /// Store `page` under `key` for `ttl`, replacing any previous entry.
    async fn put(
        &self,
        key: &PageCacheKey,
        page: CachedPage,
        ttl: Duration,
    ) -> Result<(), PageCacheError>;

    /// Drop every entry.
    async fn clear(&self) -> Result<(), PageCacheError>;
}

/// Cache that never stores anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPageCache;

#[async_trait]
impl PageCache for NoopPageCache {
    async fn get(&self, _key: &PageCacheKey) -> Result<Option<CachedPage>, PageCacheError> {
        Ok(None)
    }

    async fn put(
        &self,
        _key: &PageCacheKey,
        _page: CachedPage,
        _ttl: Duration,
    ) -> Result<(), PageCacheError> {
        Ok(())
    }

    async fn clear(&self) -> Result<(), PageCacheError> {
        Ok(())
    }
}
