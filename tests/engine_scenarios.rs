// ==============================================
// END-TO-END ENGINE SCENARIOS (integration)
// ==============================================
//
// Scripted operation sequences with exact expected states, exercising each
// engine the way a caller sees it, plus the behavioural contrasts between
// policies (scan resistance, admission gating, hot-set protection).

use evictkit::policy::arc::ArcEngine;
use evictkit::policy::lfu::LfuEngine;
use evictkit::policy::lru::LruEngine;
use evictkit::policy::lru_k::LruKEngine;
use evictkit::traits::{EngineCore, MutableEngine};

mod lru_script {
    use super::*;

    #[test]
    fn three_slot_walkthrough() {
        let mut cache = LruEngine::new(3);

        // 1. Fill: residents {1,2,3}, victim order [1,2,3].
        cache.insert(1, "a");
        cache.insert(2, "b");
        cache.insert(3, "c");
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.peek_victim(), Some((&1, &"a")));

        // 2. get(1) returns "a" and refreshes it: order [2,3,1].
        assert_eq!(cache.get(&1), Some(&"a"));
        assert_eq!(cache.peek_victim(), Some((&2, &"b")));

        // 3. put(4) evicts 2: residents {3,1,4}.
        cache.insert(4, "d");
        assert!(!cache.contains(&2));
        assert!(cache.contains(&3));
        assert!(cache.contains(&1));
        assert!(cache.contains(&4));

        // 4. get(2) misses.
        assert_eq!(cache.get(&2), None);

        // 5. put(1, "A") overwrites and refreshes: order [3,4,1].
        cache.insert(1, "A");
        assert_eq!(cache.pop_victim(), Some((3, "c")));
        assert_eq!(cache.pop_victim(), Some((4, "d")));
        assert_eq!(cache.pop_victim(), Some((1, "A")));
        assert_eq!(cache.pop_victim(), None);
    }

    #[test]
    fn refreshed_key_outlives_an_insert_burst() {
        let capacity = 5;
        let mut cache = LruEngine::new(capacity);
        for key in 0..capacity as u64 {
            cache.insert(key, key);
        }

        cache.get(&0);
        // A burst of capacity-1 new keys evicts every pre-existing key
        // except the refreshed one.
        for key in 100..100 + (capacity as u64 - 1) {
            cache.insert(key, key);
        }
        assert!(cache.contains(&0));
        for key in 1..capacity as u64 {
            assert!(!cache.contains(&key), "key {key} should have been evicted");
        }
    }
}

mod arc_script {
    use super::*;

    #[test]
    fn ghost_hit_walkthrough() {
        let mut cache = ArcEngine::new(2, 2);

        // 1. Fill T1.
        cache.insert(1, "a");
        cache.insert(2, "b");
        assert_eq!(cache.recency_len(), 2);
        assert_eq!(cache.frequency_len(), 0);
        assert_eq!(cache.recency_ghost_len(), 0);

        // 2. Overflow: 1 is evicted into B1.
        cache.insert(3, "c");
        assert_eq!(cache.recency_len(), 2);
        assert!(!cache.contains(&1));
        assert_eq!(cache.recency_ghost_len(), 1);

        // 3. Re-put of 1 is a B1 hit: T1 grows to 3 and now holds 1, 2, 3.
        cache.insert(1, "a");
        assert_eq!(cache.recency_capacity(), 3);
        assert_eq!(cache.recency_ghost_len(), 0);
        assert_eq!(cache.recency_len(), 3);
        for key in [1, 2, 3] {
            assert!(cache.contains(&key));
        }

        // 4. The second hit on 1 crosses the threshold and installs it in
        //    T2 as well.
        assert_eq!(cache.get(&1), Some(&"a"));
        assert_eq!(cache.frequency_len(), 0);
        assert_eq!(cache.get(&1), Some(&"a"));
        assert_eq!(cache.frequency_len(), 1);

        // 5. Later hits are still served from T1 (probed first), leaving
        //    both copies resident.
        assert_eq!(cache.get(&1), Some(&"a"));
        assert_eq!(cache.recency_len(), 3);
        assert_eq!(cache.frequency_len(), 1);
        cache.debug_validate_invariants();
    }

    #[test]
    fn hot_set_reaches_full_hit_rate_after_warmup() {
        let mut cache = ArcEngine::new(8, 2);
        let hot: Vec<u64> = (0..4).collect();

        for &key in &hot {
            cache.insert(key, key);
        }
        // Warm-up pass promotes the hot set.
        for _ in 0..2 {
            for &key in &hot {
                cache.get(&key);
            }
        }
        // Steady state: every access hits.
        for _ in 0..10 {
            for &key in &hot {
                assert_eq!(cache.get(&key), Some(&key));
            }
        }
    }

    #[test]
    fn scan_does_not_flush_the_hot_set() {
        let mut arc = ArcEngine::new(8, 2);
        let mut lru = LruEngine::new(8);
        let hot: Vec<u64> = (0..4).collect();

        for &key in &hot {
            arc.insert(key, key);
            lru.insert(key, key);
        }
        for _ in 0..2 {
            for &key in &hot {
                arc.get(&key);
                lru.get(&key);
            }
        }

        // A scan far larger than the cache, touched once each.
        for key in 1000..1200u64 {
            arc.insert(key, key);
            lru.insert(key, key);
        }

        // Plain LRU lost the entire hot set to the scan.
        let lru_hits = hot.iter().filter(|key| lru.get(key).is_some()).count();
        assert_eq!(lru_hits, 0);

        // ARC still serves the hot set out of the frequency partition.
        let arc_hits = hot.iter().filter(|key| arc.get(key).is_some()).count();
        assert_eq!(arc_hits, hot.len());
        arc.debug_validate_invariants();
    }
}

mod lru_k_script {
    use super::*;

    #[test]
    fn promotion_walkthrough() {
        let mut cache = LruKEngine::new(2, 4, 2);

        // 1. First sighting goes to history only.
        cache.insert(1, "a");
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.get(&1), None);

        // 2. The next put crosses the threshold: resident and retrievable.
        cache.insert(1, "a");
        assert_eq!(cache.get(&1), Some(&"a"));
        assert_eq!(cache.len(), 1);
        cache.debug_validate_invariants();
    }

    #[test]
    fn one_shot_scan_never_pollutes_the_main_cache() {
        let mut cache = LruKEngine::new(4, 64, 2);
        cache.insert(1, 1);
        cache.insert(1, 1); // promoted

        for key in 100..200u64 {
            cache.insert(key, key);
        }
        assert_eq!(cache.len(), 1);
        assert!(cache.contains(&1));
    }
}

mod lfu_script {
    use super::*;

    #[test]
    fn hot_key_protected_from_new_arrivals() {
        let capacity = 4;
        let mut cache = LfuEngine::new(capacity);
        for key in 0..capacity as u64 {
            cache.insert(key, key);
        }
        for _ in 0..3 {
            cache.get(&0);
        }

        cache.insert(99, 99);
        assert!(cache.contains(&0), "the hot key must never be the victim");
        assert_eq!(cache.len(), capacity);
        // Exactly one of the unhit keys was evicted.
        let survivors = (1..capacity as u64)
            .filter(|key| cache.contains(key))
            .count();
        assert_eq!(survivors, capacity - 2);
    }

    #[test]
    fn aging_walkthrough() {
        let mut cache = LfuEngine::with_max_avg_freq(2, 4);
        cache.insert(1, "hot");
        cache.insert(2, "cold");

        // Total reaches 10 on the eighth hit; average 5 exceeds the bound
        // and aging subtracts max_avg_freq / 2 = 2 from every frequency.
        for _ in 0..8 {
            cache.get(&1);
        }
        assert_eq!(cache.frequency(&1), Some(7)); // 9 - 2
        assert_eq!(cache.frequency(&2), Some(1)); // floored at 1
        assert_eq!(cache.average_frequency(), 4); // recomputed: (7 + 1) / 2
        cache.debug_validate_invariants();
    }

    #[test]
    fn remove_then_reinsert_starts_cold() {
        let mut cache = LfuEngine::new(4);
        cache.insert(1, "a");
        cache.get(&1);
        cache.get(&1);
        assert_eq!(cache.frequency(&1), Some(3));

        assert_eq!(cache.remove(&1), Some("a"));
        cache.insert(1, "a");
        assert_eq!(cache.frequency(&1), Some(1));
    }
}

mod sharded_script {
    use evictkit::ds::ShardSelector;
    use evictkit::sharded::Sharded;

    #[test]
    fn size_stays_under_the_rounded_bound() {
        let (capacity, shards) = (10, 4);
        let cache = Sharded::lru::<u64, u64>(capacity, shards);
        for key in 0..10_000u64 {
            cache.put(key, key);
        }
        let bound = shards * capacity.div_ceil(shards);
        assert!(cache.len() <= bound);
    }

    #[test]
    fn distinct_shards_are_independent() {
        let shards = 4;
        // The wrapper selects shards with seed 0.
        let selector = ShardSelector::new(shards, 0);
        let cache = Sharded::lru::<u64, u64>(8, shards);

        let pinned = 0u64;
        let pinned_shard = selector.shard_for(&pinned);
        cache.put(pinned, 42);

        // Flood every other shard; the pinned key's shard never evicts it.
        let mut flooded = 0;
        let mut key = 1u64;
        while flooded < 1000 {
            if selector.shard_for(&key) != pinned_shard {
                cache.put(key, key);
                flooded += 1;
            }
            key += 1;
        }
        assert_eq!(cache.get(&pinned), Some(42));
    }
}
