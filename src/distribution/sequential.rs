//! Sequential item generation
//!
//! Generates item ids in order starting from 0 and incrementing by 1. When the
//! end of the item space is reached, wraps back to the beginning. Useful as a
//! scan-like IRM component.

use super::{require_items, IrmSampler};
use crate::error::Result;
use crate::ItemId;
use rand::RngCore;

/// Sequential item generator
///
/// Generates item ids in sequential order: 0, 1, 2, 3, ...
/// Wraps around to 0 after the last item.
#[derive(Debug)]
pub struct SequentialDistribution {
    /// Next item to emit
    current: ItemId,

    items: u64,
}

impl SequentialDistribution {
    pub fn new(items: u64) -> Result<Self> {
        Ok(Self {
            current: 0,
            items: require_items(items)?,
        })
    }
}

impl IrmSampler for SequentialDistribution {
    fn sample(&mut self, _rng: &mut dyn RngCore) -> ItemId {
        let item = self.current;

        self.current += 1;
        if self.current >= self.items {
            self.current = 0;
        }

        item
    }

    fn name(&self) -> &'static str {
        "sequential"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[test]
    fn test_sequential_basic() {
        let mut dist = SequentialDistribution::new(100).unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);

        assert_eq!(dist.sample(&mut rng), 0);
        assert_eq!(dist.sample(&mut rng), 1);
        assert_eq!(dist.sample(&mut rng), 2);
        assert_eq!(dist.sample(&mut rng), 3);
    }

    #[test]
    fn test_sequential_wraparound() {
        let mut dist = SequentialDistribution::new(3).unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);

        assert_eq!(dist.sample(&mut rng), 0);
        assert_eq!(dist.sample(&mut rng), 1);
        assert_eq!(dist.sample(&mut rng), 2);
        assert_eq!(dist.sample(&mut rng), 0); // Wrapped
        assert_eq!(dist.sample(&mut rng), 1);
    }

    #[test]
    fn test_sequential_empty_space() {
        assert!(SequentialDistribution::new(0).is_err());
    }
}
