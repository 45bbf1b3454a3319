// src/api/cache.rs
//! In-memory lookup cache for Notion API calls.
//!
//! Entries live for a fixed TTL and the least recently used entry is
//! evicted once a cache is full. Only successful lookups are cached.

use super::{NotionRepository, SearchQuery};
use crate::config::CacheSettings;
use crate::error::AppError;
use crate::model::{Database, NotionObject, Page, User};
use crate::types::NotionId;
use lru::LruCache;
use parking_lot::Mutex;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

// ---------------------------------------------------------------------------
// TTL cache
// ---------------------------------------------------------------------------

struct CacheEntry<V> {
    value: V,
    cached_at: Instant,
}

/// Bounded LRU cache whose entries expire after a TTL.
///
/// A cache built from disabled [`CacheSettings`] stores nothing.
pub struct TtlCache<K, V> {
    entries: Option<Mutex<LruCache<K, CacheEntry<V>>>>,
    ttl: Duration,
}

impl<K: Hash + Eq, V: Clone> TtlCache<K, V> {
    pub fn new(settings: CacheSettings) -> Self {
        let entries = if settings.is_enabled() {
            NonZeroUsize::new(settings.capacity).map(|cap| Mutex::new(LruCache::new(cap)))
        } else {
            None
        };
        Self {
            entries,
            ttl: settings.ttl,
        }
    }

    /// Returns a live entry; expired entries are dropped on the way.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut entries = self.entries.as_ref()?.lock();
        match entries.get(key) {
            Some(entry) if entry.cached_at.elapsed() <= self.ttl => {
                return Some(entry.value.clone())
            }
            Some(_) => {}
            None => return None,
        }
        entries.pop(key);
        None
    }

    pub fn insert(&self, key: K, value: V) {
        if let Some(entries) = &self.entries {
            entries.lock().put(
                key,
                CacheEntry {
                    value,
                    cached_at: Instant::now(),
                },
            );
        }
    }

    pub fn clear(&self) {
        if let Some(entries) = &self.entries {
            entries.lock().clear();
        }
    }

    /// Number of stored entries, expired ones included until they are read.
    pub fn len(&self) -> usize {
        self.entries.as_ref().map_or(0, |entries| entries.lock().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---------------------------------------------------------------------------
// Cached Notion client
// ---------------------------------------------------------------------------

/// A [`NotionRepository`] decorator that remembers pages, databases, users
/// and search results for a short while.
///
/// `current_user` and `list_users` always go to the wrapped repository.
pub struct CachedNotionClient {
    inner: Arc<dyn NotionRepository>,
    settings: CacheSettings,
    pages: TtlCache<NotionId, Page>,
    databases: TtlCache<NotionId, Database>,
    users: TtlCache<NotionId, User>,
    searches: TtlCache<SearchQuery, Vec<NotionObject>>,
}

impl CachedNotionClient {
    pub fn new(inner: Arc<dyn NotionRepository>, settings: CacheSettings) -> Self {
        Self {
            inner,
            settings,
            pages: TtlCache::new(settings),
            databases: TtlCache::new(settings),
            users: TtlCache::new(settings),
            searches: TtlCache::new(settings),
        }
    }

    pub fn settings(&self) -> CacheSettings {
        self.settings
    }

    /// Drops every cached entry.
    pub fn clear(&self) {
        self.pages.clear();
        self.databases.clear();
        self.users.clear();
        self.searches.clear();
    }
}

/// Serves `key` from `cache`, or fetches it and remembers a success.
async fn cached_lookup<K, V, Fut>(
    cache: &TtlCache<K, V>,
    key: K,
    label: &str,
    fetch: Fut,
) -> Result<V, AppError>
where
    K: Hash + Eq + std::fmt::Debug,
    V: Clone,
    Fut: std::future::Future<Output = Result<V, AppError>>,
{
    if let Some(hit) = cache.get(&key) {
        log::debug!("Cache hit: {} {:?}", label, key);
        return Ok(hit);
    }

    log::debug!("Cache miss: {} {:?}", label, key);
    let value = fetch.await?;
    cache.insert(key, value.clone());
    Ok(value)
}

#[async_trait::async_trait]
impl NotionRepository for CachedNotionClient {
    async fn retrieve_page(&self, id: &NotionId) -> Result<Page, AppError> {
        cached_lookup(&self.pages, id.clone(), "page", self.inner.retrieve_page(id)).await
    }

    async fn retrieve_database(&self, id: &NotionId) -> Result<Database, AppError> {
        cached_lookup(
            &self.databases,
            id.clone(),
            "database",
            self.inner.retrieve_database(id),
        )
        .await
    }

    async fn retrieve_user(&self, id: &NotionId) -> Result<User, AppError> {
        cached_lookup(&self.users, id.clone(), "user", self.inner.retrieve_user(id)).await
    }

    async fn current_user(&self) -> Result<User, AppError> {
        self.inner.current_user().await
    }

    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        self.inner.list_users().await
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<NotionObject>, AppError> {
        cached_lookup(
            &self.searches,
            query.clone(),
            "search",
            self.inner.search(query),
        )
        .await
    }
}
