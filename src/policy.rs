//! Reference cache evaluator
//!
//! Generated traces are meant for external cache simulators. This module holds
//! just enough of one to check a trace: a [`CachePolicy`] trait, an exact LRU
//! and a miss-ratio curve over several capacities.

use crate::error::{Error, Result};
use crate::ItemId;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Counters reported after replaying a trace
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PolicyStats {
    pub capacity: usize,
    pub accesses: u64,
    pub misses: u64,
    /// Access count at which the cache last had a free slot
    pub cache_fills: u64,
}

impl PolicyStats {
    /// Share of accesses that hit, cold misses included
    pub fn hit_rate(&self) -> f64 {
        if self.accesses == 0 {
            return 0.0;
        }
        1.0 - self.misses as f64 / self.accesses as f64
    }

    /// Hit rate after the cache first filled up
    ///
    /// The `capacity` compulsory misses and the fill phase are excluded.
    pub fn warm_hit_rate(&self) -> Result<f64> {
        let warm_accesses = self.accesses.saturating_sub(self.cache_fills);
        if warm_accesses == 0 {
            return Err(Error::numeric("cache never filled, no warm accesses"));
        }
        let warm_misses = self.misses.saturating_sub(self.capacity as u64);
        Ok(1.0 - warm_misses as f64 / warm_accesses as f64)
    }
}

impl fmt::Display for PolicyStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "capacity {}: {} accesses, {} misses, hit rate {:.4}",
            self.capacity,
            self.accesses,
            self.misses,
            self.hit_rate()
        )
    }
}

/// A replacement policy that can replay a trace
pub trait CachePolicy {
    /// Access one item; returns true on a hit
    fn access(&mut self, item: ItemId) -> bool;

    /// Counters so far
    fn stats(&self) -> PolicyStats;

    /// Replay a whole trace and report the counters
    fn run(&mut self, trace: &[ItemId]) -> PolicyStats {
        for &item in trace {
            self.access(item);
        }
        self.stats()
    }
}

/// Exact least-recently-used cache
///
/// Recency is a logical clock: every access stamps the item, and the entry
/// with the smallest stamp is evicted.
#[derive(Debug, Clone)]
pub struct Lru {
    capacity: usize,

    /// item -> stamp of its last access
    stamps: HashMap<ItemId, u64>,

    /// stamp -> item, oldest first
    order: BTreeMap<u64, ItemId>,

    clock: u64,
    stats: PolicyStats,
}

impl Lru {
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::config("LRU capacity must be at least 1"));
        }
        Ok(Self {
            capacity,
            stamps: HashMap::with_capacity(capacity + 1),
            order: BTreeMap::new(),
            clock: 0,
            stats: PolicyStats {
                capacity,
                ..Default::default()
            },
        })
    }

    /// Number of cached items
    pub fn len(&self) -> usize {
        self.stamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stamps.is_empty()
    }

    pub fn contains(&self, item: ItemId) -> bool {
        self.stamps.contains_key(&item)
    }
}

impl CachePolicy for Lru {
    fn access(&mut self, item: ItemId) -> bool {
        self.stats.accesses += 1;
        if self.stamps.len() < self.capacity {
            self.stats.cache_fills = self.stats.accesses;
        }

        self.clock += 1;
        let hit = match self.stamps.insert(item, self.clock) {
            Some(old) => {
                self.order.remove(&old);
                true
            }
            None => {
                self.stats.misses += 1;
                false
            }
        };
        self.order.insert(self.clock, item);

        if self.stamps.len() > self.capacity {
            if let Some((_, victim)) = self.order.pop_first() {
                self.stamps.remove(&victim);
            }
        }
        hit
    }

    fn stats(&self) -> PolicyStats {
        self.stats
    }
}

/// One point of a miss-ratio curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MrcPoint {
    pub capacity: usize,
    pub hit_rate: f64,
}

/// LRU hit rate at every capacity, replayed in parallel
pub fn miss_ratio_curve(trace: &[ItemId], capacities: &[usize]) -> Result<Vec<MrcPoint>> {
    capacities
        .par_iter()
        .map(|&capacity| {
            let stats = Lru::new(capacity)?.run(trace);
            Ok(MrcPoint {
                capacity,
                hit_rate: stats.hit_rate(),
            })
        })
        .collect()
}

/// `points` capacities spread evenly over `1..=max_capacity`
pub fn capacity_points(max_capacity: usize, points: usize) -> Vec<usize> {
    if max_capacity == 0 || points == 0 {
        return Vec::new();
    }
    let mut capacities: Vec<usize> = (1..=points)
        .map(|i| ((max_capacity * i) / points).max(1))
        .collect();
    capacities.dedup();
    capacities
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lru_evicts_least_recent() {
        let mut lru = Lru::new(2).unwrap();
        assert!(!lru.access(1));
        assert!(!lru.access(2));
        assert!(lru.access(1));
        // 2 is least recent now
        assert!(!lru.access(3));
        assert!(!lru.contains(2));
        assert!(lru.contains(1));
        assert!(lru.contains(3));
        assert_eq!(lru.len(), 2);
    }

    #[test]
    fn test_lru_stats() {
        let mut lru = Lru::new(2).unwrap();
        let stats = lru.run(&[1, 2, 1, 3, 1, 2]);

        assert_eq!(stats.accesses, 6);
        assert_eq!(stats.misses, 4);
        assert_eq!(stats.cache_fills, 2);
        assert!((stats.hit_rate() - 2.0 / 6.0).abs() < 1e-12);
        // (4 - 2) misses over 6 - 2 warm accesses
        assert!((stats.warm_hit_rate().unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_lru_zero_capacity() {
        assert!(Lru::new(0).unwrap_err().is_configuration());
    }

    #[test]
    fn test_warm_hit_rate_needs_full_cache() {
        let mut lru = Lru::new(10).unwrap();
        let stats = lru.run(&[1, 2, 3]);
        assert!(stats.warm_hit_rate().is_err());
    }

    #[test]
    fn test_miss_ratio_curve_monotonic() {
        let trace: Vec<ItemId> = (0..2000).map(|i| (i * 7919 % 97) as ItemId % 50).collect();
        let curve = miss_ratio_curve(&trace, &[1, 5, 10, 25, 50]).unwrap();

        assert_eq!(curve.len(), 5);
        for pair in curve.windows(2) {
            // LRU is a stack algorithm: more capacity never hurts
            assert!(pair[1].hit_rate >= pair[0].hit_rate);
        }
        // Everything fits at capacity 50
        assert!((curve[4].hit_rate - (1.0 - 50.0 / 2000.0)).abs() < 1e-12);
    }

    #[test]
    fn test_capacity_points() {
        assert_eq!(capacity_points(100, 4), vec![25, 50, 75, 100]);
        assert_eq!(capacity_points(3, 10), vec![1, 2, 3]);
        assert!(capacity_points(0, 4).is_empty());
    }
}
