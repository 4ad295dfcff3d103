//! Resampling from observed data
//!
//! [`Resampler`] replays IRD samples taken from a real trace (finite distances
//! plus first-reference markers), and [`EmpiricalIrm`] draws item ids by inverse
//! transform over an observed frequency CDF.

use super::{normalized_cdf, search_cdf, Ird, IrdSampler, IrmSampler};
use crate::error::{Error, Result};
use crate::ItemId;
use rand::{Rng, RngCore};

/// Uniform choice among observed IRD samples
#[derive(Debug, Clone)]
pub struct Resampler {
    samples: Vec<Ird>,
    first_references: usize,
}

impl Resampler {
    pub fn new(samples: Vec<Ird>) -> Result<Self> {
        if samples.is_empty() {
            return Err(Error::degenerate("no IRD samples to resample from"));
        }
        if let Some(bad) = samples
            .iter()
            .filter_map(Ird::gap)
            .find(|g| !g.is_finite() || *g < 0.0)
        {
            return Err(Error::config(format!(
                "IRD samples must be finite and non-negative, got {}",
                bad
            )));
        }

        let first_references = samples.iter().filter(|s| s.is_first_reference()).count();
        Ok(Self {
            samples,
            first_references,
        })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl IrdSampler for Resampler {
    #[inline]
    fn sample(&self, rng: &mut dyn RngCore) -> Ird {
        self.samples[rng.gen_range(0..self.samples.len())]
    }

    fn first_reference_probability(&self) -> f64 {
        self.first_references as f64 / self.samples.len() as f64
    }

    fn name(&self) -> &'static str {
        "resample"
    }
}

/// Inverse-transform sampling over a frequency CDF
///
/// Index `i` of the CDF is returned as item id `i`.
#[derive(Debug, Clone)]
pub struct EmpiricalIrm {
    cdf: Vec<f64>,
}

impl EmpiricalIrm {
    /// Build from per-item access counts
    pub fn from_counts(counts: &[u64]) -> Result<Self> {
        let weights: Vec<f64> = counts.iter().map(|&c| c as f64).collect();
        Ok(Self {
            cdf: normalized_cdf(&weights, "item counts")?,
        })
    }

    /// Build from a cumulative distribution
    ///
    /// The CDF must be non-decreasing, start at or above zero and end above
    /// zero. It is normalized by its last entry.
    pub fn from_cdf(cdf: &[f64]) -> Result<Self> {
        let mut prev = 0.0;
        let mut weights = Vec::with_capacity(cdf.len());
        for (i, &c) in cdf.iter().enumerate() {
            if !c.is_finite() || c < prev {
                return Err(Error::config(format!(
                    "frequency cdf must be finite and non-decreasing (entry {} = {})",
                    i, c
                )));
            }
            weights.push(c - prev);
            prev = c;
        }
        Ok(Self {
            cdf: normalized_cdf(&weights, "frequency cdf")?,
        })
    }

    /// Number of distinct items
    pub fn items(&self) -> u64 {
        self.cdf.len() as u64
    }

    pub fn cdf(&self) -> &[f64] {
        &self.cdf
    }
}

impl IrmSampler for EmpiricalIrm {
    #[inline]
    fn sample(&mut self, rng: &mut dyn RngCore) -> ItemId {
        search_cdf(&self.cdf, rng.gen()) as ItemId
    }

    fn name(&self) -> &'static str {
        "empirical"
    }
}
