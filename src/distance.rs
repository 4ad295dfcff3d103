//! Inter-reference distances and trace id helpers
//!
//! The distance of an access is the number of steps since the previous access
//! to the same item: back-to-back repeats have distance 1, and the first access
//! to an item has no finite distance at all ([`Distance::First`]).

use crate::ItemId;
use serde::Serialize;
use std::collections::HashMap;

/// Distance of one access to the previous access of the same item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Distance {
    Gap(u64),
    First,
}

impl Distance {
    pub fn gap(&self) -> Option<u64> {
        match *self {
            Distance::Gap(d) => Some(d),
            Distance::First => None,
        }
    }
}

/// Distance of every access in `trace`, in trace order
pub fn compute_distances(trace: &[ItemId]) -> Vec<Distance> {
    let mut last_seen: HashMap<ItemId, usize> = HashMap::new();

    trace
        .iter()
        .enumerate()
        .map(|(t, &item)| match last_seen.insert(item, t) {
            Some(prev) => Distance::Gap((t - prev) as u64),
            None => Distance::First,
        })
        .collect()
}

/// Renumber items to `0..distinct`, preserving the order of the original ids
///
/// Sparse id spaces (block addresses, hashed keys) become dense, so the
/// result can index per-item tables directly.
pub fn squash(trace: &[ItemId]) -> Vec<ItemId> {
    let mut ids: Vec<ItemId> = trace.to_vec();
    ids.sort_unstable();
    ids.dedup();

    let dense: HashMap<ItemId, ItemId> = ids
        .into_iter()
        .enumerate()
        .map(|(i, id)| (id, i as ItemId))
        .collect();

    trace.iter().map(|id| dense[id]).collect()
}

/// Expand `(length, start)` extents into one access per covered item
///
/// Block-level traces record a request as a run of consecutive addresses;
/// `(3, 10)` becomes `10, 11, 12`.
pub fn unroll(extents: &[(u64, ItemId)]) -> Vec<ItemId> {
    let total: u64 = extents.iter().map(|&(len, _)| len).sum();
    let mut out = Vec::with_capacity(total as usize);
    for &(len, start) in extents {
        out.extend(start..start + len);
    }
    out
}
