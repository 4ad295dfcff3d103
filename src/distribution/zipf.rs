//! Zipf popularity law
//!
//! A small number of items receive the majority of accesses.
//!
//! # Characteristics
//!
//! - Power law: P(rank) ∝ rank^-a
//! - Small a (0.5): closer to uniform
//! - Large a (2.0): strongly skewed (hot/cold items)
//! - Default a (1.2) over 20 buckets
//!
//! # Bucketing
//!
//! The item space is cut into `buckets` equal-width rank buckets (see
//! [`IntervalMixture`]); bucket `i` gets weight `(i + 1)^-a` and items inside a
//! bucket are equally likely. With `buckets == items` this is the exact Zipf
//! law over item ids.
//!
//! # Example
//!
//! ```
//! use rand::SeedableRng;
//! use rand_xoshiro::Xoshiro256PlusPlus;
//! use tracegen::distribution::{IrmSampler, zipf::ZipfDistribution};
//!
//! let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
//! let mut dist = ZipfDistribution::new(1.2, 20, 1000).unwrap();
//! let item = dist.sample(&mut rng);
//! assert!(item < 1000);
//! ```

use super::interval::IntervalMixture;
use super::{clamp_item, require_items, require_non_negative, IrmSampler};
use crate::error::Result;
use crate::ItemId;
use rand::RngCore;

/// Zipf distribution over rank buckets
#[derive(Debug, Clone)]
pub struct ZipfDistribution {
    /// Exponent
    a: f64,

    /// Rank buckets over the item space
    mixture: IntervalMixture,

    /// Item space size
    items: u64,
}

impl ZipfDistribution {
    /// Create a Zipf law with exponent `a` over `buckets` rank buckets
    pub fn new(a: f64, buckets: usize, items: u64) -> Result<Self> {
        let a = require_non_negative(a, "zipf exponent")?;
        let items = require_items(items)?;

        let weights: Vec<f64> = (1..=buckets).map(|rank| (rank as f64).powf(-a)).collect();
        let mixture = IntervalMixture::new(&weights, items)?;

        Ok(Self { a, mixture, items })
    }

    pub fn exponent(&self) -> f64 {
        self.a
    }

    /// Normalized weight of rank bucket `i`
    pub fn bucket_probability(&self, i: usize) -> f64 {
        self.mixture.probability(i)
    }

    pub fn mixture(&self) -> &IntervalMixture {
        &self.mixture
    }
}

impl IrmSampler for ZipfDistribution {
    #[inline]
    fn sample(&mut self, rng: &mut dyn RngCore) -> ItemId {
        clamp_item(self.mixture.sample_value(rng), self.items)
    }

    fn name(&self) -> &'static str {
        "zipf"
    }
}
