//! Blocked-request statistics store.
//!
//! Keeps the cumulative blocked counter in memory and writes it behind
//! with a debounce: every increment replaces the pending write, and the
//! write that finally runs always persists the latest cached value.
//! Storage failures are logged and never reach the caller.
//!
//! Writes and resets are serialized on one lock, and every write carries
//! the reset generation it was scheduled under, so a save that was already
//! running when `reset` arrived cannot bring the old total back.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::services::storage::{KeyValueStore, PAGE_STATISTIC_KEY};
use crate::types::errors::StorageError;
use crate::types::stats::BlockedStats;

/// Default debounce window before the counter is persisted.
pub const DEFAULT_SAVE_DELAY: Duration = Duration::from_millis(1000);

type StatsCache = Arc<Mutex<Option<BlockedStats>>>;

fn duration_ms(delay: Duration) -> u64 {
    u64::try_from(delay.as_millis()).unwrap_or(u64::MAX)
}

/// Trait defining the statistics store interface.
pub trait StatsStoreTrait {
    fn get(&self) -> BlockedStats;
    fn add_blocked(&self, count: u64) -> BlockedStats;
    fn reset(&self);
    fn flush(&self);
    fn has_pending_write(&self) -> bool;
}

/// Serializes storage writes with resets and counts resets.
#[derive(Default)]
struct WriteGate {
    lock: Mutex<()>,
    generation: AtomicU64,
}

impl WriteGate {
    fn enter(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}

/// Counter store with a lazily loaded cache and a single pending write.
pub struct StatsStore {
    storage: Arc<dyn KeyValueStore>,
    cache: StatsCache,
    gate: Arc<WriteGate>,
    pending: Mutex<Option<JoinHandle<()>>>,
    save_delay_ms: AtomicU64,
}

impl StatsStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self::with_save_delay(storage, DEFAULT_SAVE_DELAY)
    }

    pub fn with_save_delay(storage: Arc<dyn KeyValueStore>, save_delay: Duration) -> Self {
        Self {
            storage,
            cache: Arc::new(Mutex::new(None)),
            gate: Arc::new(WriteGate::default()),
            pending: Mutex::new(None),
            save_delay_ms: AtomicU64::new(duration_ms(save_delay)),
        }
    }

    pub fn save_delay(&self) -> Duration {
        Duration::from_millis(self.save_delay_ms.load(Ordering::SeqCst))
    }

    /// Changes the debounce window. A write already scheduled keeps its
    /// original deadline.
    pub fn set_save_delay(&self, delay: Duration) {
        self.save_delay_ms.store(duration_ms(delay), Ordering::SeqCst);
        log::debug!("Page statistic save delay set to {:?}", delay);
    }

    fn lock_cache(cache: &Mutex<Option<BlockedStats>>) -> MutexGuard<'_, Option<BlockedStats>> {
        cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_pending(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn load(storage: &dyn KeyValueStore) -> Result<BlockedStats, StorageError> {
        match storage.get(PAGE_STATISTIC_KEY)? {
            Some(json) if !json.is_empty() => serde_json::from_str(&json)
                .map_err(|e| StorageError::SerializationError(e.to_string())),
            _ => Ok(BlockedStats::default()),
        }
    }

    /// Cached value, loading from storage on first access.
    fn cached_or_load(&self, cache: &mut Option<BlockedStats>) -> BlockedStats {
        if let Some(stats) = *cache {
            return stats;
        }
        let stats = Self::load(self.storage.as_ref()).unwrap_or_else(|e| {
            log::error!("Error retrieving page statistic from storage, cause {}", e);
            BlockedStats::default()
        });
        *cache = Some(stats);
        stats
    }

    /// Writes whatever the cache holds right now, unless a reset happened
    /// since the write was scheduled under `generation`.
    fn write_through(
        storage: &dyn KeyValueStore,
        cache: &Mutex<Option<BlockedStats>>,
        gate: &WriteGate,
        generation: u64,
    ) {
        let _write = gate.enter();
        if gate.generation() != generation {
            log::debug!("Dropping page statistic save scheduled before a reset");
            return;
        }
        let Some(stats) = *Self::lock_cache(cache) else {
            return;
        };
        let result = serde_json::to_string(&stats)
            .map_err(|e| StorageError::SerializationError(e.to_string()))
            .and_then(|json| storage.set(PAGE_STATISTIC_KEY, &json));
        match result {
            Ok(()) => log::debug!("Persisted page statistic: {}", stats.total_blocked),
            Err(e) => log::error!("Error saving page statistic, cause {}", e),
        }
    }

    fn cancel_pending(&self) {
        if let Some(handle) = self.lock_pending().take() {
            handle.abort();
        }
    }

    /// Replaces any pending write with a new one due after the save delay.
    fn schedule_save(&self) {
        let mut pending = self.lock_pending();
        if let Some(handle) = pending.take() {
            handle.abort();
        }

        let generation = self.gate.generation();
        match Handle::try_current() {
            Ok(runtime) => {
                let storage = Arc::clone(&self.storage);
                let cache = Arc::clone(&self.cache);
                let gate = Arc::clone(&self.gate);
                let delay = self.save_delay();
                *pending = Some(runtime.spawn(async move {
                    tokio::time::sleep(delay).await;
                    Self::write_through(storage.as_ref(), &cache, &gate, generation);
                }));
                log::debug!("Scheduled page statistic save in {:?}", delay);
            }
            Err(_) => {
                // No event loop to defer onto.
                Self::write_through(self.storage.as_ref(), &self.cache, &self.gate, generation);
            }
        }
    }
}

impl StatsStoreTrait for StatsStore {
    /// Returns the cached stats, loading them on first access.
    ///
    /// A missing or malformed record yields zero and is logged.
    fn get(&self) -> BlockedStats {
        let mut cache = Self::lock_cache(&self.cache);
        self.cached_or_load(&mut cache)
    }

    /// Adds `count` to the counter and schedules a debounced save.
    ///
    /// The new value is visible to readers immediately.
    fn add_blocked(&self, count: u64) -> BlockedStats {
        let updated = {
            let mut cache = Self::lock_cache(&self.cache);
            let mut stats = self.cached_or_load(&mut cache);
            stats.total_blocked = stats.total_blocked.saturating_add(count);
            *cache = Some(stats);
            stats
        };
        self.schedule_save();
        updated
    }

    /// Drops the persisted record and the cache. The next `get` reloads zero.
    ///
    /// Waits for a save that is already writing, then invalidates every
    /// save scheduled before this call.
    fn reset(&self) {
        self.cancel_pending();
        let _write = self.gate.enter();
        self.gate.generation.fetch_add(1, Ordering::SeqCst);
        if let Err(e) = self.storage.remove(PAGE_STATISTIC_KEY) {
            log::error!("Error removing page statistic, cause {}", e);
        }
        *Self::lock_cache(&self.cache) = None;
        log::info!("Page statistic reset");
    }

    /// Commits the pending write now instead of waiting for the timer.
    fn flush(&self) {
        let had_pending = self
            .lock_pending()
            .take()
            .map(|handle| {
                let running = !handle.is_finished();
                handle.abort();
                running
            })
            .unwrap_or(false);
        if had_pending {
            let generation = self.gate.generation();
            Self::write_through(self.storage.as_ref(), &self.cache, &self.gate, generation);
        }
    }

    fn has_pending_write(&self) -> bool {
        self.lock_pending()
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }
}
