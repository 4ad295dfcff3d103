//! Pareto popularity law
//!
//! Draws `x = xm / u^(1/a)` by inverse transform (via `rand_distr::Pareto`) and
//! maps it onto the item space with an affine rescale:
//!
//! ```text
//! item = (x - xm) / (q99 - xm) * M,    q99 = xm / 0.01^(1/a)
//! ```
//!
//! so the distribution's minimum lands on item 0 and its 99th percentile on
//! item `M`. The remaining 1% tail is clamped to the last item.
//!
//! # Characteristics
//!
//! - Larger `a`: lighter tail, accesses concentrate on low item ids
//! - Smaller `a`: heavier tail, popularity spreads across the space
//! - `xm` only sets the scale of the raw law and cancels out of the rescale,
//!   but must still be positive

use super::{clamp_item, require_items, require_positive, IrmSampler};
use crate::error::{Error, Result};
use crate::ItemId;
use rand::RngCore;
use rand_distr::{Distribution, Pareto};

/// Pareto distribution rescaled onto `[0, M)`
#[derive(Debug, Clone)]
pub struct ParetoDistribution {
    /// Shape
    a: f64,

    /// Scale (minimum of the raw law)
    xm: f64,

    /// 99th percentile of the raw law
    q99: f64,

    law: Pareto<f64>,

    items: u64,
}

impl ParetoDistribution {
    pub fn new(a: f64, xm: f64, items: u64) -> Result<Self> {
        let a = require_positive(a, "pareto shape a")?;
        let xm = require_positive(xm, "pareto scale xm")?;
        let items = require_items(items)?;

        let law = Pareto::new(xm, a)
            .map_err(|e| Error::config(format!("invalid pareto parameters: {}", e)))?;
        let q99 = xm / 0.01f64.powf(1.0 / a);
        if !(q99 - xm > 0.0) || !q99.is_finite() {
            return Err(Error::numeric(format!(
                "pareto rescale span is degenerate for a={}, xm={}",
                a, xm
            )));
        }

        Ok(Self {
            a,
            xm,
            q99,
            law,
            items,
        })
    }

    pub fn shape(&self) -> f64 {
        self.a
    }

    pub fn scale(&self) -> f64 {
        self.xm
    }

    /// Affine map from a raw Pareto value to an item coordinate
    #[inline]
    pub fn rescale(&self, x: f64) -> f64 {
        (x - self.xm) / (self.q99 - self.xm) * self.items as f64
    }
}

impl IrmSampler for ParetoDistribution {
    #[inline]
    fn sample(&mut self, rng: &mut dyn RngCore) -> ItemId {
        let x = self.law.sample(rng);
        clamp_item(self.rescale(x), self.items)
    }

    fn name(&self) -> &'static str {
        "pareto"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[test]
    fn test_pareto_distribution_basic() {
        let mut dist = ParetoDistribution::new(2.5, 1.0, 1000).unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);

        for _ in 0..100 {
            assert!(dist.sample(&mut rng) < 1000);
        }
    }

    #[test]
    fn test_pareto_rescale_endpoints() {
        let dist = ParetoDistribution::new(2.0, 3.0, 100).unwrap();
        assert_eq!(dist.rescale(3.0), 0.0);
        // q99 = 3 * 100^(1/2) = 30
        assert!((dist.rescale(30.0) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_pareto_distribution_skewed_low() {
        let mut dist = ParetoDistribution::new(1.5, 1.0, 1000).unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let mut low_count = 0;
        let mut at_cap = 0;

        for _ in 0..10000 {
            let item = dist.sample(&mut rng);
            if item < 200 {
                low_count += 1;
            }
            if item == 999 {
                at_cap += 1;
            }
        }

        // First 20% of items take far more than a uniform share
        assert!(low_count > 5000, "first 20% got {} of 10000", low_count);
        // About 1% of the mass is clamped onto the last item
        assert!(at_cap > 50 && at_cap < 200, "clamped draws: {}", at_cap);
    }

    #[test]
    fn test_pareto_invalid_parameters() {
        assert!(ParetoDistribution::new(0.0, 1.0, 10).unwrap_err().is_configuration());
        assert!(ParetoDistribution::new(2.5, 0.0, 10).is_err());
        assert!(ParetoDistribution::new(f64::NAN, 1.0, 10).is_err());
        assert!(ParetoDistribution::new(2.5, 1.0, 0).is_err());
    }
}
