//! Hot/cold popularity law
//!
//! The first `f * M` items form the hot set. With probability `r` an access goes
//! to a uniformly chosen hot item, otherwise to a uniformly chosen cold item.
//! `r = 0.8, f = 0.2` is the classic 80/20 split.

use super::{require_items, IrmSampler};
use crate::error::{Error, Result};
use crate::ItemId;
use rand::{Rng, RngCore};

#[derive(Debug, Clone)]
pub struct HotColdDistribution {
    /// Share of accesses that hit the hot set
    r: f64,

    /// First cold item (size of the hot set)
    boundary: u64,

    items: u64,
}

impl HotColdDistribution {
    pub fn new(r: f64, f: f64, items: u64) -> Result<Self> {
        let items = require_items(items)?;
        if !r.is_finite() || !(0.0..=1.0).contains(&r) {
            return Err(Error::config(format!("hot access share r must be in [0, 1], got {}", r)));
        }
        if !f.is_finite() || !(0.0..1.0).contains(&f) {
            return Err(Error::config(format!("hot set fraction f must be in [0, 1), got {}", f)));
        }

        let boundary = (f * items as f64) as u64;
        if boundary == 0 || boundary >= items {
            return Err(Error::config(format!(
                "hot set of {} items out of {} leaves one side empty",
                boundary, items
            )));
        }

        Ok(Self { r, boundary, items })
    }

    /// Number of hot items
    pub fn hot_items(&self) -> u64 {
        self.boundary
    }
}

impl IrmSampler for HotColdDistribution {
    #[inline]
    fn sample(&mut self, rng: &mut dyn RngCore) -> ItemId {
        if rng.gen::<f64>() < self.r {
            rng.gen_range(0..self.boundary)
        } else {
            rng.gen_range(self.boundary..self.items)
        }
    }

    fn name(&self) -> &'static str {
        "hot_cold"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[test]
    fn test_hot_cold_split() {
        let mut dist = HotColdDistribution::new(0.8, 0.2, 1000).unwrap();
        assert_eq!(dist.hot_items(), 200);

        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let n = 20_000;
        let hot = (0..n).filter(|_| dist.sample(&mut rng) < 200).count();
        let share = hot as f64 / n as f64;
        assert!((share - 0.8).abs() < 0.02, "hot share {}", share);
    }

    #[test]
    fn test_hot_cold_invalid() {
        assert!(HotColdDistribution::new(1.5, 0.2, 100).is_err());
        assert!(HotColdDistribution::new(0.8, 0.0, 100).is_err());
        assert!(HotColdDistribution::new(0.8, 0.001, 100).is_err());
        assert!(HotColdDistribution::new(0.8, 0.2, 0).is_err());
    }
}
