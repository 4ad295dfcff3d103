//! Distance histogram using HdrHistogram
//!
//! This module provides a wrapper around the HdrHistogram library for tracking
//! inter-reference distances with bounded relative error.
//!
//! # Features
//!
//! - **Wide range**: auto-resizing, so distances from 1 to the trace length fit
//! - **Low overhead**: constant-time recording and percentile queries
//! - **Mergeable**: histograms from several traces combine into one
//!
//! # Example
//!
//! ```
//! use tracegen::stats::histogram::DistanceHistogram;
//!
//! let mut hist = DistanceHistogram::new().unwrap();
//! hist.record(1);
//! hist.record(10);
//! hist.record(100);
//!
//! assert_eq!(hist.len(), 3);
//! assert_eq!(hist.max(), Some(100));
//! ```

use crate::error::{Error, Result};
use hdrhistogram::Histogram;

/// Significant digits kept by the histogram (0.1% relative error)
const SIGNIFICANT_DIGITS: u8 = 3;

/// Inter-reference distance histogram
///
/// Distances are bucketed with 3 significant digits, so a reported
/// percentile is within 0.1% of the exact value. Buckets grow as larger
/// distances arrive.
#[derive(Debug, Clone)]
pub struct DistanceHistogram {
    histogram: Histogram<u64>,
}

impl DistanceHistogram {
    /// Create an empty auto-resizing histogram
    pub fn new() -> Result<Self> {
        let histogram = Histogram::new(SIGNIFICANT_DIGITS)
            .map_err(|e| Error::numeric(format!("failed to create histogram: {}", e)))?;
        Ok(Self { histogram })
    }

    /// Record one distance
    #[inline]
    pub fn record(&mut self, distance: u64) {
        // Auto-resize only fails past u64 range limits
        let _ = self.histogram.record(distance);
    }

    /// Distance at `percentile` (0.0 - 100.0), or None when nothing was
    /// recorded
    pub fn percentile(&self, percentile: f64) -> Option<u64> {
        if self.is_empty() {
            return None;
        }
        Some(self.histogram.value_at_percentile(percentile))
    }

    pub fn min(&self) -> Option<u64> {
        if self.is_empty() {
            return None;
        }
        Some(self.histogram.min())
    }

    pub fn max(&self) -> Option<u64> {
        if self.is_empty() {
            return None;
        }
        Some(self.histogram.max())
    }

    /// Mean distance, or None if the histogram is empty
    pub fn mean(&self) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        Some(self.histogram.mean())
    }

    /// Standard deviation, or None if the histogram is empty
    pub fn stddev(&self) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        Some(self.histogram.stdev())
    }

    /// Number of recorded distances
    pub fn len(&self) -> u64 {
        self.histogram.len()
    }

    pub fn is_empty(&self) -> bool {
        self.histogram.len() == 0
    }

    /// Fold the distances of `other` into this histogram
    pub fn merge(&mut self, other: &DistanceHistogram) -> Result<()> {
        self.histogram
            .add(&other.histogram)
            .map_err(|e| Error::numeric(format!("failed to merge histograms: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_histogram() {
        let hist = DistanceHistogram::new().unwrap();
        assert!(hist.is_empty());
        assert_eq!(hist.len(), 0);
        assert_eq!(hist.percentile(50.0), None);
        assert_eq!(hist.mean(), None);
    }

    #[test]
    fn test_percentile() {
        let mut hist = DistanceHistogram::new().unwrap();
        for d in 1..=100 {
            hist.record(d);
        }

        let p50 = hist.percentile(50.0).unwrap();
        let p99 = hist.percentile(99.0).unwrap();
        assert!((49..=51).contains(&p50), "p50 {}", p50);
        assert!((98..=100).contains(&p99), "p99 {}", p99);
    }

    #[test]
    fn test_min_max_mean() {
        let mut hist = DistanceHistogram::new().unwrap();
        hist.record(2);
        hist.record(4);
        hist.record(6);

        assert_eq!(hist.min(), Some(2));
        assert_eq!(hist.max(), Some(6));
        assert!((hist.mean().unwrap() - 4.0).abs() < 0.01);
        assert!(hist.stddev().unwrap() > 0.0);
    }

    #[test]
    fn test_large_distances() {
        let mut hist = DistanceHistogram::new().unwrap();
        hist.record(1);
        hist.record(50_000_000);

        let max = hist.max().unwrap();
        // 0.1% relative error
        assert!(max >= 49_950_000 && max <= 50_050_000, "max {}", max);
    }

    #[test]
    fn test_merge() {
        let mut a = DistanceHistogram::new().unwrap();
        a.record(10);

        let mut b = DistanceHistogram::new().unwrap();
        b.record(20);
        b.record(30);

        a.merge(&b).unwrap();
        assert_eq!(a.len(), 3);
        assert_eq!(a.max(), Some(30));
    }
}
