//! Sampling primitives for trace generation
//!
//! A trace generator combines two kinds of model:
//!
//! - **IRD** (inter-reference distance) samplers produce the virtual-time gap
//!   until an item is referenced again, or [`Ird::FirstReference`] when the
//!   access should go to a brand-new item that is never seen again.
//! - **IRM** (independent reference model) samplers produce an item id directly
//!   from a fixed popularity law, ignoring locality.
//!
//! # Samplers
//!
//! | Kind | Type | Notes |
//! |------|------|-------|
//! | IRD | [`interval::IntervalMixture`] | weighted buckets over `[0, span)` |
//! | IRD | [`empirical::EmpiricalPdf`] | inverse-CDF over `k` bins, mean rescaled |
//! | IRD | [`resample::Resampler`] | uniform choice among observed samples |
//! | IRD | [`hyperexp::HyperExponential`] | mixture of exponential classes |
//! | IRM | [`zipf::ZipfDistribution`] | rank buckets `∝ rank^-a` |
//! | IRM | [`pareto::ParetoDistribution`] | inverse-CDF, affine rescale |
//! | IRM | [`gaussian::GaussianDistribution`] | `N(mean, std)` clamped |
//! | IRM | [`uniform::UniformDistribution`] | `Uniform(low, high)` |
//! | IRM | [`hot_cold::HotColdDistribution`] | two uniform regions |
//! | IRM | [`sequential::SequentialDistribution`] | `0, 1, ..., M-1, 0, ...` |
//! | IRM | [`resample::EmpiricalIrm`] | inverse-CDF over observed frequencies |
//!
//! # Randomness
//!
//! No sampler owns an RNG. Every call receives the generator's random source,
//! so a whole generation run is reproducible from a single seed.
//!
//! # Example
//!
//! ```
//! use rand::SeedableRng;
//! use rand_xoshiro::Xoshiro256PlusPlus;
//! use tracegen::distribution::{IrdSampler, interval::IntervalMixture};
//!
//! let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
//! let ird = IntervalMixture::new(&[0.8, 0.0001, 0.1999], 100).unwrap();
//! let gap = ird.sample(&mut rng).gap().unwrap();
//! assert!(gap >= 0.0 && gap < 99.0);
//! ```

use crate::error::{Error, Result};
use crate::ItemId;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

pub mod empirical;
pub mod gaussian;
pub mod hot_cold;
pub mod hyperexp;
pub mod interval;
pub mod pareto;
pub mod resample;
pub mod sequential;
pub mod uniform;
pub mod zipf;

/// One draw from an IRD model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Ird {
    /// Virtual-time gap until the next reference of the same item
    Gap(f64),
    /// Access a brand-new item that is referenced only once
    FirstReference,
}

impl Ird {
    /// The gap, if this is a finite sample
    pub fn gap(&self) -> Option<f64> {
        match *self {
            Ird::Gap(t) => Some(t),
            Ird::FirstReference => None,
        }
    }

    pub fn is_first_reference(&self) -> bool {
        matches!(self, Ird::FirstReference)
    }
}

/// Reference-locality model
///
/// Implementations must be pure with respect to `rng`: the same RNG state
/// must yield the same sample.
pub trait IrdSampler: Send {
    /// Draw the next inter-reference gap
    fn sample(&self, rng: &mut dyn RngCore) -> Ird;

    /// Probability that [`IrdSampler::sample`] returns [`Ird::FirstReference`]
    ///
    /// A model that only ever yields first references cannot warm up a
    /// scheduler, so generators reject it at construction.
    fn first_reference_probability(&self) -> f64 {
        0.0
    }

    /// Short name used in logs
    fn name(&self) -> &'static str;
}

/// Popularity model
pub trait IrmSampler: Send {
    /// Draw the next item id
    fn sample(&mut self, rng: &mut dyn RngCore) -> ItemId;

    /// Short name used in logs
    fn name(&self) -> &'static str;
}

impl<T: IrdSampler + ?Sized> IrdSampler for Box<T> {
    fn sample(&self, rng: &mut dyn RngCore) -> Ird {
        (**self).sample(rng)
    }

    fn first_reference_probability(&self) -> f64 {
        (**self).first_reference_probability()
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

impl<T: IrmSampler + ?Sized> IrmSampler for Box<T> {
    fn sample(&mut self, rng: &mut dyn RngCore) -> ItemId {
        (**self).sample(rng)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Build a normalized CDF from raw weights
///
/// Rejects empty vectors, negative or non-finite weights and a zero sum. The
/// last entry is pinned to exactly 1.0.
pub fn normalized_cdf(weights: &[f64], what: &str) -> Result<Vec<f64>> {
    if weights.is_empty() {
        return Err(Error::config(format!("{} must not be empty", what)));
    }
    if let Some((i, w)) = weights
        .iter()
        .enumerate()
        .find(|(_, w)| !w.is_finite() || **w < 0.0)
    {
        return Err(Error::config(format!(
            "{} entry {} must be finite and non-negative, got {}",
            what, i, w
        )));
    }

    let sum: f64 = weights.iter().sum();
    if !(sum > 0.0) || !sum.is_finite() {
        return Err(Error::config(format!("{} must have a positive sum, got {}", what, sum)));
    }

    let mut cdf = Vec::with_capacity(weights.len());
    let mut cumulative = 0.0;
    for w in weights {
        cumulative += w / sum;
        cdf.push(cumulative);
    }
    if let Some(last) = cdf.last_mut() {
        *last = 1.0;
    }
    Ok(cdf)
}

/// Find the first CDF index whose cumulative value is `>= u`
///
/// Ties resolve to the first qualifying bin. The result is clamped to the last
/// bin so rounding in the CDF can never index past the end.
pub fn search_cdf(cdf: &[f64], u: f64) -> usize {
    let idx = match cdf.binary_search_by(|&cdf_val| {
        if cdf_val < u {
            Ordering::Less
        } else {
            Ordering::Greater
        }
    }) {
        Ok(i) => i,
        Err(i) => i,
    };
    idx.min(cdf.len().saturating_sub(1))
}

/// Probability mass of bin `i` recovered from a CDF
pub fn bin_probability(cdf: &[f64], i: usize) -> f64 {
    match i {
        0 => cdf[0],
        _ => cdf[i] - cdf[i - 1],
    }
}

/// Reject NaN, infinite and negative scalar parameters
pub(crate) fn require_non_negative(value: f64, what: &str) -> Result<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::config(format!(
            "{} must be finite and non-negative, got {}",
            what, value
        )));
    }
    Ok(value)
}

/// Reject NaN, infinite and non-positive scalar parameters
pub(crate) fn require_positive(value: f64, what: &str) -> Result<f64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(Error::config(format!("{} must be finite and positive, got {}", what, value)));
    }
    Ok(value)
}

/// Reject an empty item space
pub(crate) fn require_items(items: u64) -> Result<u64> {
    if items == 0 {
        return Err(Error::config("item space must contain at least one item"));
    }
    Ok(items)
}

/// Map a real coordinate onto an item id in `[0, items)`
#[inline]
pub(crate) fn clamp_item(value: f64, items: u64) -> ItemId {
    if !(value > 0.0) {
        return 0;
    }
    (value as u64).min(items - 1)
}
