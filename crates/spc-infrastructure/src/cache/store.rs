//! Cache store
//!
//! Concurrent map from fingerprint to cached container. Each key owns a
//! `OnceCell`, so concurrent first requests for the same fingerprint wait on
//! one build instead of racing:
//!
//! ```text
//! get_or_build(fp) ──► slots[fp] (DashMap, shard lock held only to fetch the slot)
//!                          └── OnceCell::get_or_try_init(build)  ← runs once per successful key
//! ```
//!
//! A failed build leaves the cell empty, so the next request for that
//! fingerprint builds again. Entries are never removed.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;
use once_cell::sync::OnceCell;
use spc_domain::error::Result;
use spc_domain::ports::Container;
use spc_domain::value_objects::{DebugSnapshot, Fingerprint};

/// Cached container plus the snapshot recorded when it was built
#[derive(Clone)]
pub struct CacheEntry {
    container: Arc<dyn Container>,
    snapshot: DebugSnapshot,
}

impl CacheEntry {
    /// Create an entry
    pub fn new(container: Arc<dyn Container>, snapshot: DebugSnapshot) -> Self {
        Self {
            container,
            snapshot,
        }
    }

    /// Cached container
    pub fn container(&self) -> &Arc<dyn Container> {
        &self.container
    }

    /// Snapshot recorded at build time
    pub fn snapshot(&self) -> &DebugSnapshot {
        &self.snapshot
    }
}

impl std::fmt::Debug for CacheEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheEntry")
            .field("container", &self.container.id())
            .field("snapshot", &self.snapshot)
            .finish()
    }
}

/// Result of [`ContainerStore::get_or_build`]
#[derive(Debug, Clone)]
pub struct StoreOutcome {
    /// The cached entry for the fingerprint
    pub entry: CacheEntry,
    /// Number of populated entries before this call inserted one;
    /// `None` when the entry already existed or another caller built it
    pub inserted_after: Option<usize>,
}

/// Fingerprint → container map with build-once semantics
#[derive(Default)]
pub struct ContainerStore {
    slots: DashMap<Fingerprint, Arc<OnceCell<CacheEntry>>>,
    populated: AtomicUsize,
}

impl ContainerStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached entry for a fingerprint
    pub fn get(&self, fingerprint: Fingerprint) -> Option<CacheEntry> {
        self.slots
            .get(&fingerprint)
            .and_then(|slot| slot.value().get().cloned())
    }

    /// Return the cached entry, building and inserting it on first request
    ///
    /// Concurrent callers presenting the same fingerprint block until the
    /// single build finishes and all receive the same entry.
    pub fn get_or_build<F>(&self, fingerprint: Fingerprint, build: F) -> Result<StoreOutcome>
    where
        F: FnOnce() -> Result<CacheEntry>,
    {
        if let Some(entry) = self.get(fingerprint) {
            return Ok(StoreOutcome {
                entry,
                inserted_after: None,
            });
        }

        let slot = Arc::clone(
            self.slots
                .entry(fingerprint)
                .or_insert_with(|| Arc::new(OnceCell::new()))
                .value(),
        );

        let mut built = false;
        let entry = slot
            .get_or_try_init(|| {
                let entry = build()?;
                built = true;
                Ok::<CacheEntry, spc_domain::Error>(entry)
            })?
            .clone();

        let inserted_after = built.then(|| self.populated.fetch_add(1, Ordering::SeqCst));
        Ok(StoreOutcome {
            entry,
            inserted_after,
        })
    }

    /// Number of cached containers
    ///
    /// The counter is bumped after a build's cell is filled, so while builds
    /// for other keys are finishing this can briefly lag behind
    /// [`entries`](Self::entries). Each insert still observes a distinct
    /// previous count, which is what the diagnostics signals are keyed on.
    pub fn len(&self) -> usize {
        self.populated.load(Ordering::SeqCst)
    }

    /// Whether no container has been cached yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All cached entries, ordered by fingerprint
    pub fn entries(&self) -> Vec<(Fingerprint, CacheEntry)> {
        let mut entries: Vec<(Fingerprint, CacheEntry)> = self
            .slots
            .iter()
            .filter_map(|slot| slot.value().get().map(|entry| (*slot.key(), entry.clone())))
            .collect();
        entries.sort_by_key(|(fingerprint, _)| *fingerprint);
        entries
    }

    /// Snapshots of all cached containers
    pub fn snapshots(&self) -> Vec<DebugSnapshot> {
        self.entries()
            .into_iter()
            .map(|(_, entry)| entry.snapshot)
            .collect()
    }

    /// All cached containers
    pub fn containers(&self) -> Vec<Arc<dyn Container>> {
        self.entries()
            .into_iter()
            .map(|(_, entry)| entry.container)
            .collect()
    }
}
