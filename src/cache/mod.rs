//! Process-wide query cache.
//!
//! Entries are JSON projections of backend entities, keyed by entity type +
//! id + variant parameters (locale and the like). The backend stays
//! authoritative; anything here is replaceable at any time. Any component may
//! read or write any key.

use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, RwLock},
};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Recipe,
    RecipeList,
    Collection,
    CollectionList,
    DiscoveryFeed,
}

/// Composite cache key: entity type + id + variant parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub entity: EntityKind,
    pub id: String,
    pub variant: Option<String>,
}

impl QueryKey {
    pub fn new(entity: EntityKind, id: impl Into<String>) -> Self {
        Self {
            entity,
            id: id.into(),
            variant: None,
        }
    }

    pub fn with_variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = Some(variant.into());
        self
    }

    pub fn recipe(recipe_id: impl Into<String>) -> Self {
        Self::new(EntityKind::Recipe, recipe_id)
    }

    /// The user's own recipe library list.
    pub fn my_recipes() -> Self {
        Self::new(EntityKind::RecipeList, "mine")
    }

    pub fn collection(collection_id: impl Into<String>) -> Self {
        Self::new(EntityKind::Collection, collection_id)
    }

    pub fn collection_list() -> Self {
        Self::new(EntityKind::CollectionList, "all")
    }

    pub fn discovery_feed(locale: impl Into<String>) -> Self {
        Self::new(EntityKind::DiscoveryFeed, "home").with_variant(locale)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.variant {
            Some(variant) => write!(f, "{:?}:{}:{}", self.entity, self.id, variant),
            None => write!(f, "{:?}:{}", self.entity, self.id),
        }
    }
}

#[derive(Default)]
struct CacheInner {
    entries: HashMap<QueryKey, Value>,
    refetches: HashMap<QueryKey, CancellationToken>,
}

#[derive(Clone, Default)]
pub struct QueryCache {
    inner: Arc<RwLock<CacheInner>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Typed read. A cached value that no longer decodes as `T` reads as a
    /// miss rather than an error; the next fetch replaces it.
    pub fn get<T: DeserializeOwned>(&self, key: &QueryKey) -> Option<T> {
        let inner = self.inner.read().unwrap();
        let value = inner.entries.get(key)?;
        serde_json::from_value(value.clone()).ok()
    }

    pub fn get_raw(&self, key: &QueryKey) -> Option<Value> {
        self.inner.read().unwrap().entries.get(key).cloned()
    }

    pub fn put<T: Serialize>(&self, key: QueryKey, value: &T) {
        match serde_json::to_value(value) {
            Ok(value) => {
                self.inner.write().unwrap().entries.insert(key, value);
            }
            Err(err) => {
                log::error!("Failed to serialize cache entry {key}: {err}");
            }
        }
    }

    pub fn put_raw(&self, key: QueryKey, value: Value) {
        self.inner.write().unwrap().entries.insert(key, value);
    }

    pub fn remove(&self, key: &QueryKey) {
        self.inner.write().unwrap().entries.remove(key);
    }

    /// Applies `patch` to every cached entry of the given entity kind. Used
    /// to keep list caches consistent with a freshly written detail entry.
    pub fn patch_entries(&self, entity: EntityKind, patch: impl Fn(&QueryKey, &mut Value)) {
        let mut inner = self.inner.write().unwrap();
        for (key, value) in inner.entries.iter_mut() {
            if key.entity == entity {
                patch(key, value);
            }
        }
    }

    /// Drops every cached entry of the given entity kind, forcing refetches.
    pub fn invalidate_entity(&self, entity: EntityKind) {
        self.inner
            .write()
            .unwrap()
            .entries
            .retain(|key, _| key.entity != entity);
    }

    pub fn clear(&self) {
        let mut inner = self.inner.write().unwrap();
        inner.entries.clear();
        for token in inner.refetches.values() {
            token.cancel();
        }
        inner.refetches.clear();
    }

    /// Registers a refetch for `key`, returning the token the fetch task
    /// should watch. A previous outstanding refetch for the same key is
    /// cancelled.
    pub fn refetch_token(&self, key: QueryKey) -> CancellationToken {
        let token = CancellationToken::new();
        let mut inner = self.inner.write().unwrap();
        if let Some(previous) = inner.refetches.insert(key, token.clone()) {
            previous.cancel();
        }
        token
    }

    /// Cancels the outstanding refetch for `key`, if any. Best-effort: a
    /// response already received still lands.
    pub fn cancel_refetch(&self, key: &QueryKey) {
        if let Some(token) = self.inner.write().unwrap().refetches.remove(key) {
            token.cancel();
        }
    }

    /// Snapshots the current values of `keys` for a later rollback.
    pub fn begin(&self, keys: &[QueryKey]) -> CacheTxn {
        self.begin_scope(keys, &[])
    }

    /// Snapshots `keys` plus every current entry of the given entity kinds.
    /// Writes that fan out across all cached list variants must take their
    /// snapshot at this granularity so a rollback restores every entry the
    /// apply touched.
    pub fn begin_scope(&self, keys: &[QueryKey], kinds: &[EntityKind]) -> CacheTxn {
        let inner = self.inner.read().unwrap();
        let mut snapshot: HashMap<QueryKey, Option<Value>> = keys
            .iter()
            .map(|key| (key.clone(), inner.entries.get(key).cloned()))
            .collect();
        for (key, value) in &inner.entries {
            if kinds.contains(&key.entity) {
                snapshot
                    .entry(key.clone())
                    .or_insert_with(|| Some(value.clone()));
            }
        }
        CacheTxn {
            cache: self.clone(),
            snapshot,
        }
    }
}

/// Snapshot of a set of cache keys taken before an optimistic write.
///
/// `rollback` restores the exact snapshot, including restoring absence for
/// keys that were empty. Dropping the transaction keeps whatever is in the
/// cache (the commit path).
pub struct CacheTxn {
    cache: QueryCache,
    snapshot: HashMap<QueryKey, Option<Value>>,
}

impl CacheTxn {
    pub fn rollback(self) {
        let mut inner = self.cache.inner.write().unwrap();
        for (key, value) in self.snapshot {
            match value {
                Some(value) => {
                    inner.entries.insert(key, value);
                }
                None => {
                    inner.entries.remove(&key);
                }
            }
        }
    }

    /// Keeps the current cache contents for the affected keys.
    pub fn commit(self) {}
}
