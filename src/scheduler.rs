//! Renewal scheduler
//!
//! Turns per-item "time to next reference" samples into a globally ordered
//! sequence of item ids. Every live item has exactly one pending
//! [`ScheduleEntry`] in a min-heap keyed by due time; the item with the earliest
//! due time is the next one referenced.
//!
//! # Algorithm
//!
//! 1. **Warm-up**: draw IRD samples until `M` items are live. Each finite gap
//!    `t` schedules `(t, id)` with ids allocated from 0 upwards. First-reference
//!    samples are discarded during warm-up.
//! 2. **Renewal**: for a finite gap `t`, the heap minimum `(t0, item)` is
//!    emitted and replaced by `(t0 + t, item)`. The item's next due time moves
//!    relative to its own last due time, not to the global step count. For a
//!    first-reference sample a brand-new id is emitted and never scheduled.
//!
//! # Ordering
//!
//! Entries order by due time (`f64::total_cmp`) and then by item id ascending,
//! so equal due times resolve deterministically to the lower id.

use crate::distribution::{Ird, IrdSampler};
use crate::error::{Error, Result};
use crate::ItemId;
use rand::RngCore;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// Warm-up draws allowed per requested live item before giving up
const WARMUP_ATTEMPTS_PER_ITEM: u64 = 1000;

/// Pending reference of one item
///
/// Entries are immutable values: a renewal replaces the entry with a new one
/// rather than mutating it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduleEntry {
    due: f64,
    item: ItemId,
}

impl ScheduleEntry {
    pub fn new(due: f64, item: ItemId) -> Self {
        Self { due, item }
    }

    /// Virtual time of the next reference
    pub fn due(&self) -> f64 {
        self.due
    }

    pub fn item(&self) -> ItemId {
        self.item
    }

    /// The same item scheduled `gap` after its current due time
    #[inline]
    pub fn renewed(&self, gap: f64) -> Self {
        Self {
            due: self.due + gap,
            item: self.item,
        }
    }
}

impl Eq for ScheduleEntry {}

impl Ord for ScheduleEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.due
            .total_cmp(&other.due)
            .then_with(|| self.item.cmp(&other.item))
    }
}

impl PartialOrd for ScheduleEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// One item emitted by the scheduler
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Emitted {
    pub item: ItemId,

    /// Due time the item was popped at; `None` for a freshly minted item
    pub due: Option<f64>,
}

/// Heap-based renewal process over a bounded set of live items
#[derive(Debug)]
pub struct RenewalScheduler {
    heap: BinaryHeap<Reverse<ScheduleEntry>>,

    /// Next id to allocate
    next_item: ItemId,

    /// Live items to hold after warm-up
    capacity: u64,
}

impl RenewalScheduler {
    /// Scheduler that will hold `items` live entries
    pub fn new(items: u64) -> Result<Self> {
        if items == 0 {
            return Err(Error::config("scheduler needs at least one live item"));
        }
        Ok(Self {
            heap: BinaryHeap::with_capacity(items as usize),
            next_item: 0,
            capacity: items,
        })
    }

    /// Fill the heap with `capacity` live items
    ///
    /// Fails when the model keeps returning first references, which would
    /// otherwise spin forever.
    pub fn warm_up(&mut self, ird: &dyn IrdSampler, rng: &mut dyn RngCore) -> Result<()> {
        let max_attempts = self
            .capacity
            .saturating_mul(WARMUP_ATTEMPTS_PER_ITEM)
            .saturating_add(WARMUP_ATTEMPTS_PER_ITEM);
        let mut attempts = 0u64;
        let mut discarded = 0u64;

        while (self.heap.len() as u64) < self.capacity {
            if attempts >= max_attempts {
                return Err(Error::config(format!(
                    "IRD model '{}' produced only {} finite gaps in {} draws",
                    ird.name(),
                    self.heap.len(),
                    attempts
                )));
            }
            attempts += 1;

            match ird.sample(rng) {
                Ird::Gap(t) => {
                    let item = self.mint();
                    self.heap.push(Reverse(ScheduleEntry::new(t, item)));
                }
                Ird::FirstReference => discarded += 1,
            }
        }

        tracing::debug!(
            live = self.heap.len(),
            discarded,
            model = ird.name(),
            "scheduler warm-up complete"
        );
        Ok(())
    }

    /// Apply one IRD sample and return the emitted item
    pub fn renew(&mut self, sample: Ird) -> Result<Emitted> {
        match sample {
            Ird::FirstReference => Ok(Emitted {
                item: self.mint(),
                due: None,
            }),
            Ird::Gap(gap) => {
                debug_assert!(gap >= 0.0, "negative gap {}", gap);
                let mut top = self
                    .heap
                    .peek_mut()
                    .ok_or_else(|| Error::config("scheduler renewed before warm-up"))?;
                let entry = top.0;
                *top = Reverse(entry.renewed(gap));
                Ok(Emitted {
                    item: entry.item(),
                    due: Some(entry.due()),
                })
            }
        }
    }

    /// Allocate a never-used item id
    #[inline]
    pub fn mint(&mut self) -> ItemId {
        let item = self.next_item;
        self.next_item += 1;
        item
    }

    /// Number of live (scheduled) items
    pub fn live(&self) -> usize {
        self.heap.len()
    }

    /// Next id that [`RenewalScheduler::mint`] will return
    pub fn next_item(&self) -> ItemId {
        self.next_item
    }

    /// Earliest pending entry
    pub fn peek(&self) -> Option<ScheduleEntry> {
        self.heap.peek().map(|Reverse(entry)| *entry)
    }

    /// Ids of all live items, unordered
    pub fn live_items(&self) -> Vec<ItemId> {
        self.heap.iter().map(|Reverse(entry)| entry.item()).collect()
    }
}
