//! Weighted interval mixture
//!
//! The span `[0, span)` is cut into `k` equal-width buckets and each bucket gets
//! one weight. A sample picks a bucket by weighted discrete choice and then
//! draws uniformly inside it.
//!
//! The bucket width is `span / k` with integer floor division, so when `k` does
//! not divide `span` the last `span % k` units are never produced. This matches
//! the reference generator and is kept as-is; construction logs a warning when
//! it happens.

use super::{bin_probability, normalized_cdf, search_cdf, Ird, IrdSampler};
use crate::error::{Error, Result};
use rand::{Rng, RngCore};

/// Weighted mixture of uniform buckets
#[derive(Debug, Clone)]
pub struct IntervalMixture {
    /// Cumulative bucket weights (last entry is 1.0)
    cdf: Vec<f64>,

    /// Bucket width after floor division
    width: u64,

    /// Requested span
    span: u64,
}

impl IntervalMixture {
    /// Create a mixture of `weights.len()` buckets over `[0, span)`
    ///
    /// Fails when the weights are empty, contain a negative or non-finite
    /// entry, sum to zero, or when `span` is smaller than the bucket count.
    pub fn new(weights: &[f64], span: u64) -> Result<Self> {
        let cdf = normalized_cdf(weights, "interval weights")?;
        let k = cdf.len() as u64;

        let width = span / k;
        if width == 0 {
            return Err(Error::config(format!(
                "span {} is too small for {} interval buckets",
                span, k
            )));
        }

        let uncovered = span % k;
        if uncovered != 0 {
            tracing::warn!(
                total = span,
                buckets = k,
                uncovered,
                "bucket width {} leaves the top {} units of the span uncovered",
                width,
                uncovered
            );
        }

        Ok(Self { cdf, width, span })
    }

    /// Number of buckets
    pub fn buckets(&self) -> usize {
        self.cdf.len()
    }

    /// Width of every bucket
    pub fn width(&self) -> u64 {
        self.width
    }

    /// Span the mixture was built for
    pub fn span(&self) -> u64 {
        self.span
    }

    /// Cumulative bucket weights
    pub fn cdf(&self) -> &[f64] {
        &self.cdf
    }

    /// Normalized weight of bucket `i`
    pub fn probability(&self, i: usize) -> f64 {
        bin_probability(&self.cdf, i)
    }

    /// Half-open bounds `[lo, hi)` of bucket `i`
    pub fn bucket_bounds(&self, i: usize) -> (f64, f64) {
        let lo = i as u64 * self.width;
        (lo as f64, (lo + self.width) as f64)
    }

    /// Expected value of a sample
    pub fn mean(&self) -> f64 {
        (0..self.buckets())
            .map(|i| {
                let (lo, hi) = self.bucket_bounds(i);
                self.probability(i) * (lo + hi) / 2.0
            })
            .sum()
    }

    /// Draw a real value from the mixture
    #[inline]
    pub fn sample_value(&self, rng: &mut dyn RngCore) -> f64 {
        let u: f64 = rng.gen();
        let bucket = search_cdf(&self.cdf, u);
        let (lo, _) = self.bucket_bounds(bucket);
        lo + rng.gen::<f64>() * self.width as f64
    }
}

impl IrdSampler for IntervalMixture {
    fn sample(&self, rng: &mut dyn RngCore) -> Ird {
        Ird::Gap(self.sample_value(rng))
    }

    fn name(&self) -> &'static str {
        "intervals"
    }
}
