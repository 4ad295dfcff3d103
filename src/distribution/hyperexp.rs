//! Hyper-exponential IRD
//!
//! A mixture of exponential classes. Each sample picks a class, then draws an
//! exponential gap with that class's rate, truncated to whole steps. Class `i`
//! is picked with probability proportional to the rate at the mirrored position
//! `k - 1 - i`, so with rates `[0.2, 0.8]` the slow class is chosen 80% of the
//! time and a small hot set of fast items coexists with a large cold set.

use super::{normalized_cdf, search_cdf, Ird, IrdSampler};
use crate::error::{Error, Result};
use rand::{Rng, RngCore};
use rand_distr::{Distribution, Exp};

#[derive(Debug, Clone)]
pub struct HyperExponential {
    classes: Vec<Exp<f64>>,
    rates: Vec<f64>,
    cdf: Vec<f64>,
}

impl HyperExponential {
    pub fn new(rates: &[f64]) -> Result<Self> {
        let mut classes = Vec::with_capacity(rates.len());
        for &rate in rates {
            super::require_positive(rate, "exponential rate")?;
            let exp = Exp::new(rate)
                .map_err(|e| Error::config(format!("invalid exponential rate {}: {}", rate, e)))?;
            classes.push(exp);
        }

        let mirrored: Vec<f64> = rates.iter().rev().copied().collect();
        let cdf = normalized_cdf(&mirrored, "exponential rates")?;

        Ok(Self {
            classes,
            rates: rates.to_vec(),
            cdf,
        })
    }

    pub fn rates(&self) -> &[f64] {
        &self.rates
    }

    /// Expected (untruncated) gap
    pub fn mean(&self) -> f64 {
        self.rates
            .iter()
            .enumerate()
            .map(|(i, rate)| super::bin_probability(&self.cdf, i) / rate)
            .sum()
    }
}

impl IrdSampler for HyperExponential {
    fn sample(&self, rng: &mut dyn RngCore) -> Ird {
        let class = search_cdf(&self.cdf, rng.gen());
        let gap = self.classes[class].sample(rng);
        Ird::Gap(gap.floor())
    }

    fn name(&self) -> &'static str {
        "hyper_exponential"
    }
}
