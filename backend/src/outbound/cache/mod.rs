//! In-process page cache backed by `moka`.
//!
//! Each entry carries its own time-to-live, taken from the `put` call and
//! restarted whenever the key is overwritten.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;

use crate::domain::ports::{CachedPage, PageCache, PageCacheError, PageCacheKey};

/// Upper bound on cached pages. Only the index is cached today.
const PAGE_CACHE_CAPACITY: u64 = 64;

#[derive(Clone)]
struct TimedPage {
    page: CachedPage,
    ttl: Duration,
}

struct PageExpiry;

impl Expiry<PageCacheKey, TimedPage> for PageExpiry {
    fn expire_after_create(
        &self,
        _key: &PageCacheKey,
        value: &TimedPage,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &PageCacheKey,
        value: &TimedPage,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Page cache held in process memory. Clones share storage, so one instance
/// serves every worker.
#[derive(Clone)]
pub struct MokaPageCache {
    entries: Cache<PageCacheKey, TimedPage>,
}

impl MokaPageCache {
    pub fn new() -> Self {
        Self {
            entries: Cache::builder()
                .max_capacity(PAGE_CACHE_CAPACITY)
                .expire_after(PageExpiry)
                .build(),
        }
    }
}

impl Default for MokaPageCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageCache for MokaPageCache {
    async fn get(&self, key: &PageCacheKey) -> Result<Option<CachedPage>, PageCacheError> {
        Ok(self.entries.get(key).await.map(|timed| timed.page))
    }

    async fn put(
        &self,
        key: &PageCacheKey,
        page: CachedPage,
        ttl: Duration,
    ) -> Result<(), PageCacheError> {
        self.entries
            .insert(key.clone(), TimedPage { page, ttl })
            .await;
        Ok(())
    }

    async fn clear(&self) -> Result<(), PageCacheError> {
        self.entries.invalidate_all();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::INDEX_PAGE_TTL;
    use rstest::rstest;

    fn page(body: &str) -> CachedPage {
        CachedPage {
            content_type: "text/html; charset=utf-8".to_owned(),
            body: body.to_owned(),
        }
    }

    async fn body(cache: &MokaPageCache, key: &PageCacheKey) -> Option<String> {
        cache.get(key).await.expect("get").map(|page| page.body)
    }

    #[rstest]
    #[tokio::test]
    async fn entry_expires_after_its_ttl() {
        let cache = MokaPageCache::new();
        let key = PageCacheKey::index_page();
        cache
            .put(&key, page("first"), Duration::from_millis(100))
            .await
            .expect("put");
        assert_eq!(body(&cache, &key).await.as_deref(), Some("first"));

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(body(&cache, &key).await.is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn put_replaces_and_clear_drops() {
        let cache = MokaPageCache::new();
        let key = PageCacheKey::index_page();
        cache.put(&key, page("a"), INDEX_PAGE_TTL).await.expect("put");
        cache.put(&key, page("b"), INDEX_PAGE_TTL).await.expect("put");
        assert_eq!(body(&cache, &key).await.as_deref(), Some("b"));

        cache.clear().await.expect("clear");
        assert!(body(&cache, &key).await.is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn clones_share_entries() {
        let cache = MokaPageCache::new();
        let other = cache.clone();
        let key = PageCacheKey::index_page();
        cache.put(&key, page("shared"), INDEX_PAGE_TTL).await.expect("put");
        assert_eq!(body(&other, &key).await.as_deref(), Some("shared"));
    }
}
