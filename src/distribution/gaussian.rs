//! Gaussian (normal) popularity law
//!
//! Accesses cluster around a center item with a configurable spread.
//!
//! # Parameters
//!
//! - **mean**: center item (in item-id units)
//! - **std**: standard deviation in item-id units (0 pins every access to the
//!   center)
//!
//! Samples are rounded to the nearest item and clamped into `[0, M-1]`, so
//! mass falling outside the item space piles up on the first and last item.
//!
//! # Example
//!
//! ```
//! use rand::SeedableRng;
//! use rand_xoshiro::Xoshiro256PlusPlus;
//! use tracegen::distribution::{IrmSampler, gaussian::GaussianDistribution};
//!
//! let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);
//! let mut dist = GaussianDistribution::new(50.0, 16.0, 100).unwrap();
//! assert!(dist.sample(&mut rng) < 100);
//! ```

use super::{clamp_item, require_items, require_non_negative, IrmSampler};
use crate::error::{Error, Result};
use crate::ItemId;
use rand::RngCore;
use rand_distr::{Distribution, Normal};

/// Normal distribution clamped to the item space
#[derive(Debug, Clone)]
pub struct GaussianDistribution {
    /// Center item
    mean: f64,

    /// Spread in items
    std: f64,

    normal: Normal<f64>,

    items: u64,
}

impl GaussianDistribution {
    pub fn new(mean: f64, std: f64, items: u64) -> Result<Self> {
        let mean = require_non_negative(mean, "normal mean")?;
        let std = require_non_negative(std, "normal std")?;
        let items = require_items(items)?;

        let normal = Normal::new(mean, std)
            .map_err(|e| Error::config(format!("invalid normal parameters: {}", e)))?;

        Ok(Self {
            mean,
            std,
            normal,
            items,
        })
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn std(&self) -> f64 {
        self.std
    }
}

impl IrmSampler for GaussianDistribution {
    #[inline]
    fn sample(&mut self, rng: &mut dyn RngCore) -> ItemId {
        let value = self.normal.sample(rng);
        clamp_item(value.round(), self.items)
    }

    fn name(&self) -> &'static str {
        "normal"
    }
}
