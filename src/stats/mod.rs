//! Trace statistics
//!
//! Summaries computed over a finished trace: reuse-distance percentiles
//! ([`IrdSummary`]) and basic shape ([`TraceSummary`]). Both serialize to JSON
//! for the command-line reports.

pub mod histogram;

use crate::distance::{compute_distances, Distance};
use crate::error::{Error, Result};
use crate::ItemId;
use histogram::DistanceHistogram;
use serde::Serialize;
use std::collections::HashMap;

/// Percentiles and moments of the finite inter-reference distances
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IrdSummary {
    /// Finite distances recorded
    pub samples: u64,
    /// First references (no finite distance)
    pub first_references: u64,
    pub mean: f64,
    pub stddev: f64,
    pub min: u64,
    pub max: u64,
    pub p50: u64,
    pub p90: u64,
    pub p99: u64,
}

impl IrdSummary {
    /// Summarize precomputed distances
    ///
    /// Fails with a degenerate-input error when no access repeats.
    pub fn from_distances(distances: &[Distance]) -> Result<Self> {
        let mut hist = DistanceHistogram::new()?;
        let mut first_references = 0u64;
        for d in distances {
            match d {
                Distance::Gap(g) => hist.record(*g),
                Distance::First => first_references += 1,
            }
        }

        let missing = || Error::degenerate("no finite inter-reference distances");
        Ok(Self {
            samples: hist.len(),
            first_references,
            mean: hist.mean().ok_or_else(missing)?,
            stddev: hist.stddev().ok_or_else(missing)?,
            min: hist.min().ok_or_else(missing)?,
            max: hist.max().ok_or_else(missing)?,
            p50: hist.percentile(50.0).ok_or_else(missing)?,
            p90: hist.percentile(90.0).ok_or_else(missing)?,
            p99: hist.percentile(99.0).ok_or_else(missing)?,
        })
    }
}

/// Shape of a trace
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceSummary {
    pub length: usize,
    pub distinct_items: usize,
    /// Items accessed exactly once
    pub singletons: usize,
    pub max_item: Option<ItemId>,
    /// Share of accesses that went to the most popular item
    pub top_item_share: f64,
    /// Absent when no access repeats
    pub ird: Option<IrdSummary>,
}

impl TraceSummary {
    pub fn from_trace(trace: &[ItemId]) -> Result<Self> {
        let mut counts: HashMap<ItemId, u64> = HashMap::new();
        for &item in trace {
            *counts.entry(item).or_insert(0) += 1;
        }

        let top = counts.values().copied().max().unwrap_or(0);
        let top_item_share = if trace.is_empty() {
            0.0
        } else {
            top as f64 / trace.len() as f64
        };

        let ird = match IrdSummary::from_distances(&compute_distances(trace)) {
            Ok(summary) => Some(summary),
            Err(Error::DegenerateInput(_)) => None,
            Err(e) => return Err(e),
        };

        Ok(Self {
            length: trace.len(),
            distinct_items: counts.len(),
            singletons: counts.values().filter(|&&c| c == 1).count(),
            max_item: trace.iter().copied().max(),
            top_item_share,
            ird,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ird_summary() {
        let distances = compute_distances(&[1, 2, 1, 2, 1, 3]);
        let summary = IrdSummary::from_distances(&distances).unwrap();

        assert_eq!(summary.samples, 3);
        assert_eq!(summary.first_references, 3);
        assert_eq!(summary.min, 2);
        assert_eq!(summary.max, 2);
        assert!((summary.mean - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_ird_summary_all_first() {
        let distances = compute_distances(&[1, 2, 3]);
        let err = IrdSummary::from_distances(&distances).unwrap_err();
        assert!(err.is_degenerate_input());
    }

    #[test]
    fn test_trace_summary() {
        let summary = TraceSummary::from_trace(&[5, 5, 5, 1, 9]).unwrap();
        assert_eq!(summary.length, 5);
        assert_eq!(summary.distinct_items, 3);
        assert_eq!(summary.singletons, 2);
        assert_eq!(summary.max_item, Some(9));
        assert!((summary.top_item_share - 0.6).abs() < 1e-9);
        assert!(summary.ird.is_some());
    }

    #[test]
    fn test_trace_summary_empty() {
        let summary = TraceSummary::from_trace(&[]).unwrap();
        assert_eq!(summary.length, 0);
        assert_eq!(summary.max_item, None);
        assert!(summary.ird.is_none());
    }
}
