use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::features::categories::models::Category;
use crate::features::links::models::LinkWithCategory;

struct CacheEntry<T> {
    value: T,
    stored_at: Instant,
}

/// Single-slot cache whose value expires after `ttl`
pub struct TtlCache<T> {
    slot: RwLock<Option<CacheEntry<T>>>,
    ttl: Duration,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            slot: RwLock::new(None),
            ttl,
        }
    }

    /// Cached value, if present and not expired
    pub async fn get(&self) -> Option<T> {
        let slot = self.slot.read().await;
        slot.as_ref()
            .filter(|entry| entry.stored_at.elapsed() < self.ttl)
            .map(|entry| entry.value.clone())
    }

    pub async fn set(&self, value: T) {
        let mut slot = self.slot.write().await;
        *slot = Some(CacheEntry {
            value,
            stored_at: Instant::now(),
        });
    }

    pub async fn invalidate(&self) {
        let mut slot = self.slot.write().await;
        *slot = None;
    }
}

/// Read cache for the public catalog: active links (with category) and categories.
///
/// Mutations of links, categories, tags and votes invalidate it. Click counts
/// may lag by up to one TTL.
pub struct CatalogCache {
    pub links: TtlCache<Vec<LinkWithCategory>>,
    pub categories: TtlCache<Vec<Category>>,
}

impl CatalogCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            links: TtlCache::new(ttl),
            categories: TtlCache::new(ttl),
        }
    }

    pub async fn invalidate_links(&self) {
        self.links.invalidate().await;
    }

    /// Categories are embedded in link rows, so both slots go
    pub async fn invalidate_all(&self) {
        self.links.invalidate().await;
        self.categories.invalidate().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_after_set() {
        let cache = TtlCache::new(Duration::from_secs(60));
        assert!(cache.get().await.is_none());

        cache.set(vec![1, 2, 3]).await;
        assert_eq!(cache.get().await, Some(vec![1, 2, 3]));
    }

    #[tokio::test]
    async fn test_zero_ttl_never_hits() {
        let cache = TtlCache::new(Duration::ZERO);
        cache.set("value".to_string()).await;
        assert!(cache.get().await.is_none());
    }

    #[tokio::test]
    async fn test_invalidate_all_clears_both_slots() {
        let cache = CatalogCache::new(Duration::from_secs(60));
        cache.links.set(Vec::new()).await;
        cache.categories.set(Vec::new()).await;

        cache.invalidate_all().await;
        assert!(cache.links.get().await.is_none());
        assert!(cache.categories.get().await.is_none());
    }
}
