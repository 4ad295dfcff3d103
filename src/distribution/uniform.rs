//! Uniform popularity law
//!
//! Every item in `[low, high)` is equally likely. The default range is the
//! whole item space `[0, M)`.
//!
//! # Example
//!
//! ```
//! use rand::SeedableRng;
//! use rand_xoshiro::Xoshiro256PlusPlus;
//! use tracegen::distribution::{IrmSampler, uniform::UniformDistribution};
//!
//! let mut rng = Xoshiro256PlusPlus::seed_from_u64(9);
//! let mut dist = UniformDistribution::new(1024).unwrap();
//!
//! for _ in 0..10 {
//!     assert!(dist.sample(&mut rng) < 1024);
//! }
//! ```

use super::{require_items, IrmSampler};
use crate::error::{Error, Result};
use crate::ItemId;
use rand::{Rng, RngCore};

/// Uniform distribution over a range of item ids
#[derive(Debug, Clone)]
pub struct UniformDistribution {
    low: u64,
    high: u64,
}

impl UniformDistribution {
    /// Uniform over the whole item space
    pub fn new(items: u64) -> Result<Self> {
        Self::with_bounds(0, items, items)
    }

    /// Uniform over `[low, high)`, which must lie inside `[0, items]`
    pub fn with_bounds(low: u64, high: u64, items: u64) -> Result<Self> {
        let items = require_items(items)?;
        if low >= high || high > items {
            return Err(Error::config(format!(
                "uniform bounds [{}, {}) must be non-empty and inside [0, {}]",
                low, high, items
            )));
        }
        Ok(Self { low, high })
    }

    pub fn bounds(&self) -> (u64, u64) {
        (self.low, self.high)
    }
}

impl IrmSampler for UniformDistribution {
    #[inline(always)]
    fn sample(&mut self, rng: &mut dyn RngCore) -> ItemId {
        rng.gen_range(self.low..self.high)
    }

    fn name(&self) -> &'static str {
        "uniform"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[test]
    fn test_uniform_range() {
        let mut dist = UniformDistribution::new(100).unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);

        for _ in 0..1000 {
            assert!(dist.sample(&mut rng) < 100);
        }
    }

    #[test]
    fn test_uniform_single_item() {
        let mut dist = UniformDistribution::new(1).unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);
        assert_eq!(dist.sample(&mut rng), 0);
    }

    #[test]
    fn test_uniform_bounds() {
        let mut dist = UniformDistribution::with_bounds(20, 30, 100).unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(4);
        for _ in 0..500 {
            let item = dist.sample(&mut rng);
            assert!((20..30).contains(&item));
        }
        assert!(UniformDistribution::with_bounds(30, 30, 100).is_err());
        assert!(UniformDistribution::with_bounds(0, 101, 100).is_err());
        assert!(UniformDistribution::new(0).is_err());
    }

    #[test]
    fn test_uniform_distribution_coverage() {
        let mut dist = UniformDistribution::new(10).unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let mut seen = [false; 10];

        for _ in 0..1000 {
            seen[dist.sample(&mut rng) as usize] = true;
        }

        assert!(seen.iter().all(|&s| s), "all items should be drawn");
    }
}
