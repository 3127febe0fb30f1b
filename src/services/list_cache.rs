use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::models::PrItem;

/// Short-lived cache for owner-scoped PR listings, keyed by the exact
/// filter signature. Owned by the application state rather than a process
/// global; writes must call `clear` before returning so a reader never
/// observes its own write as stale.
pub struct ListCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, (Instant, Vec<PrItem>)>>,
}

impl ListCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub async fn get(&self, key: &str) -> Option<Vec<PrItem>> {
        let entries = self.entries.read().await;
        let (stored_at, prs) = entries.get(key)?;
        if stored_at.elapsed() < self.ttl {
            Some(prs.clone())
        } else {
            None
        }
    }

    pub async fn put(&self, key: String, prs: Vec<PrItem>) {
        let mut entries = self.entries.write().await;
        entries.insert(key, (Instant::now(), prs));
    }

    /// Drop every entry. Called by all PR write paths; coarse, but write
    /// volume is low and it removes any chance of a stale filter slice.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, PrStatus, Priority};

    fn sample_pr(id: i32) -> PrItem {
        PrItem {
            id,
            title: format!("PR {id}"),
            category: Category::Project,
            project: Some("Core".to_string()),
            service: None,
            author: "A".to_string(),
            description: None,
            status: PrStatus::Initial,
            priority: Priority::Medium,
            links: vec![],
            scheduled_date: None,
            scheduled_time: None,
            email_reminder: false,
            calendar_event: false,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[tokio::test]
    async fn hit_within_ttl_miss_after_clear() {
        let cache = ListCache::new(Duration::from_secs(60));
        cache.put("k".to_string(), vec![sample_pr(1)]).await;

        assert_eq!(cache.get("k").await.unwrap().len(), 1);
        assert!(cache.get("other").await.is_none());

        cache.clear().await;
        assert!(cache.get("k").await.is_none());
    }

    #[tokio::test]
    async fn expired_entry_reads_as_miss() {
        let cache = ListCache::new(Duration::from_millis(0));
        cache.put("k".to_string(), vec![sample_pr(1)]).await;

        assert!(cache.get("k").await.is_none());
    }
}
