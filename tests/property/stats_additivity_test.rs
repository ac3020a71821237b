//! Property-based tests for the blocked counter.
//!
//! The counter equals the sum of every increment since the last reset, both
//! in memory and once the debounced write has landed.

use std::sync::Arc;

use abu_popup::services::stats_store::{StatsStore, StatsStoreTrait};
use abu_popup::services::storage::{KeyValueStore, MemoryStorage, PAGE_STATISTIC_KEY};
use abu_popup::types::stats::BlockedStats;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn counter_is_sum_of_increments(deltas in proptest::collection::vec(0u64..1_000_000, 0..40)) {
        let storage = Arc::new(MemoryStorage::new());
        let store = StatsStore::new(storage.clone());

        let mut expected = 0u64;
        for delta in &deltas {
            expected += delta;
            prop_assert_eq!(store.add_blocked(*delta).total_blocked, expected);
        }
        prop_assert_eq!(store.get().total_blocked, expected);

        store.flush();
        if !deltas.is_empty() {
            let raw = storage.get(PAGE_STATISTIC_KEY).unwrap().unwrap();
            let persisted: BlockedStats = serde_json::from_str(&raw).unwrap();
            prop_assert_eq!(persisted.total_blocked, expected);
        }
    }

    #[test]
    fn reset_starts_a_new_sum(
        before in proptest::collection::vec(0u64..10_000, 1..10),
        after in proptest::collection::vec(0u64..10_000, 0..10),
    ) {
        let storage = Arc::new(MemoryStorage::new());
        let store = StatsStore::new(storage);

        for delta in &before {
            store.add_blocked(*delta);
        }
        store.reset();
        prop_assert_eq!(store.get().total_blocked, 0);

        for delta in &after {
            store.add_blocked(*delta);
        }
        prop_assert_eq!(store.get().total_blocked, after.iter().sum::<u64>());
    }

    /// A fresh store over the same storage reads back what was written.
    #[test]
    fn reload_sees_last_total(deltas in proptest::collection::vec(1u64..5_000, 1..20)) {
        let storage = Arc::new(MemoryStorage::new());
        {
            let store = StatsStore::new(storage.clone());
            for delta in &deltas {
                store.add_blocked(*delta);
            }
            store.flush();
        }
        let reopened = StatsStore::new(storage);
        prop_assert_eq!(reopened.get().total_blocked, deltas.iter().sum::<u64>());
    }
}
