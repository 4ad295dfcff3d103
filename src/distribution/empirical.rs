//! Empirical PDF sampling
//!
//! An [`EmpiricalPdf`] holds probabilities over `k` bins and samples gaps by
//! inverse transform: draw `u` in `[0, 1)`, take the first bin whose cumulative
//! probability is `>= u`, then draw uniformly inside that bin.
//!
//! Bins carry no units of their own. Bin `i` covers `[i*T, (i+1)*T)` where the
//! width `T` is solved once so that the expected sample equals a target mean:
//!
//! ```text
//! E[sample] = T * Σ p_i * (i + 0.5) = target_mean
//! ```
//!
//! Spike PDFs (a few dominant bins over an `eps` floor) and the named presets
//! `b`..`f` are built on top of the same type.

use super::{bin_probability, normalized_cdf, search_cdf, Ird, IrdSampler};
use crate::error::{checked_ratio, Error, Result};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Inverse-CDF sampler over a rescaled empirical PDF
#[derive(Debug, Clone)]
pub struct EmpiricalPdf {
    /// Cumulative bin probabilities (last entry is 1.0)
    cdf: Vec<f64>,

    /// Width of one bin after mean rescaling
    bin_width: f64,

    /// Probability of emitting a first reference instead of a gap
    first_reference: f64,
}

impl EmpiricalPdf {
    /// Build from raw bin weights, rescaled so the sampled mean is `target_mean`
    pub fn new(pdf: &[f64], target_mean: f64) -> Result<Self> {
        let cdf = normalized_cdf(pdf, "pdf")?;
        super::require_positive(target_mean, "target mean")?;

        let weighted_midpoints: f64 = (0..cdf.len())
            .map(|i| bin_probability(&cdf, i) * (i as f64 + 0.5))
            .sum();
        let bin_width = checked_ratio(target_mean, weighted_midpoints, "pdf bin width")?;

        tracing::debug!(bins = cdf.len(), bin_width, target_mean, "built empirical pdf");

        Ok(Self {
            cdf,
            bin_width,
            first_reference: 0.0,
        })
    }

    /// Spike PDF: every bin gets `eps`, the spike bins share `1 - eps`
    ///
    /// This is the `fgen(k, indices, eps)` shape used to sweep IRD mixtures.
    pub fn spikes(k: usize, spikes: &[usize], eps: f64, target_mean: f64) -> Result<Self> {
        Self::new(&spike_weights(k, spikes, eps)?, target_mean)
    }

    /// Add singleton mass: with probability `p` a sample is a first reference
    pub fn with_first_reference(mut self, p: f64) -> Result<Self> {
        if !p.is_finite() || !(0.0..1.0).contains(&p) {
            return Err(Error::config(format!(
                "first-reference probability must be in [0, 1), got {}",
                p
            )));
        }
        self.first_reference = p;
        Ok(self)
    }

    /// Number of bins
    pub fn bins(&self) -> usize {
        self.cdf.len()
    }

    /// Rescaled bin width `T`
    pub fn bin_width(&self) -> f64 {
        self.bin_width
    }

    /// Cumulative bin probabilities
    pub fn cdf(&self) -> &[f64] {
        &self.cdf
    }

    /// Bin selected by the uniform draw `u`
    pub fn bin_for(&self, u: f64) -> usize {
        search_cdf(&self.cdf, u)
    }

    /// Half-open bounds `[start, end)` of bin `i`
    pub fn bin_bounds(&self, i: usize) -> (f64, f64) {
        (i as f64 * self.bin_width, (i + 1) as f64 * self.bin_width)
    }

    /// Expected value of a finite sample
    pub fn mean(&self) -> f64 {
        (0..self.bins())
            .map(|i| bin_probability(&self.cdf, i) * (i as f64 + 0.5) * self.bin_width)
            .sum()
    }
}

impl IrdSampler for EmpiricalPdf {
    fn sample(&self, rng: &mut dyn RngCore) -> Ird {
        if self.first_reference > 0.0 && rng.gen::<f64>() < self.first_reference {
            return Ird::FirstReference;
        }

        let u: f64 = rng.gen();
        let (start, end) = self.bin_bounds(self.bin_for(u));
        Ird::Gap(start + rng.gen::<f64>() * (end - start))
    }

    fn first_reference_probability(&self) -> f64 {
        self.first_reference
    }

    fn name(&self) -> &'static str {
        "pdf"
    }
}

/// Raw weights for a spike PDF
pub fn spike_weights(k: usize, spikes: &[usize], eps: f64) -> Result<Vec<f64>> {
    if k == 0 {
        return Err(Error::config("spike pdf needs at least one bin"));
    }
    if spikes.is_empty() {
        return Err(Error::config("spike pdf needs at least one spike index"));
    }
    if let Some(&bad) = spikes.iter().find(|&&s| s >= k) {
        return Err(Error::config(format!(
            "spike index {} out of range for {} bins",
            bad, k
        )));
    }
    if !eps.is_finite() || !(0.0..1.0).contains(&eps) {
        return Err(Error::config(format!("spike epsilon must be in [0, 1), got {}", eps)));
    }

    let mut weights = vec![eps; k];
    let height = (1.0 - eps) / spikes.len() as f64;
    for &s in spikes {
        weights[s] = height;
    }
    Ok(weights)
}

/// Named IRD shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IrdPreset {
    B,
    C,
    D,
    E,
    F,
}

impl IrdPreset {
    /// `(bins, epsilon, spike indices)`
    pub fn params(&self) -> (usize, f64, &'static [usize]) {
        match self {
            IrdPreset::B => (20, 0.005, &[0, 3]),
            IrdPreset::C => (20, 0.005, &[2, 9]),
            IrdPreset::D => (5, 0.01, &[0, 4]),
            IrdPreset::E => (20, 0.005, &[1]),
            IrdPreset::F => (20, 0.01, &[2]),
        }
    }

    /// Build the preset with mean gap `target_mean`
    pub fn build(&self, target_mean: f64) -> Result<EmpiricalPdf> {
        let (k, eps, spikes) = self.params();
        EmpiricalPdf::spikes(k, spikes, eps, target_mean)
    }
}

impl Default for IrdPreset {
    fn default() -> Self {
        Self::B
    }
}

impl FromStr for IrdPreset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "b" => Ok(Self::B),
            "c" => Ok(Self::C),
            "d" => Ok(Self::D),
            "e" => Ok(Self::E),
            "f" => Ok(Self::F),
            other => Err(Error::config(format!("unknown IRD preset: {}", other))),
        }
    }
}

impl fmt::Display for IrdPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IrdPreset::B => "b",
            IrdPreset::C => "c",
            IrdPreset::D => "d",
            IrdPreset::E => "e",
            IrdPreset::F => "f",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[test]
    fn test_pdf_mean_rescaled() {
        let pdf = EmpiricalPdf::new(&[0.5, 0.0, 0.0, 0.5], 100.0).unwrap();
        assert!((pdf.mean() - 100.0).abs() < 1e-9);
        // Σ p_i (i + 0.5) = 0.5 * 0.5 + 0.5 * 3.5 = 2.0
        assert!((pdf.bin_width() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_pdf_sampled_mean() {
        let pdf = EmpiricalPdf::spikes(20, &[0, 3], 0.005, 100.0).unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let n = 50_000;
        let total: f64 = (0..n).map(|_| pdf.sample(&mut rng).gap().unwrap()).sum();
        let mean = total / n as f64;
        assert!((mean - 100.0).abs() < 3.0, "sampled mean {}", mean);
    }

    #[test]
    fn test_pdf_bin_for_bounds() {
        let pdf = EmpiricalPdf::new(&[0.2, 0.3, 0.0, 0.5], 10.0).unwrap();
        let cdf = pdf.cdf().to_vec();
        for step in 0..1000 {
            let u = step as f64 / 1000.0;
            let i = pdf.bin_for(u);
            let lower = if i == 0 { 0.0 } else { cdf[i - 1] };
            assert!(lower <= u && u <= cdf[i]);
        }
        // Zero-mass bin shares its cumulative value with bin 1; ties pick bin 1
        assert_eq!(pdf.bin_for(0.5), 1);
    }

    #[test]
    fn test_pdf_samples_inside_bins() {
        let pdf = EmpiricalPdf::new(&[0.0, 1.0, 0.0], 15.0).unwrap();
        let (start, end) = pdf.bin_bounds(1);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(5);
        for _ in 0..500 {
            let gap = pdf.sample(&mut rng).gap().unwrap();
            assert!(gap >= start && gap < end);
        }
    }

    #[test]
    fn test_pdf_first_reference_mass() {
        let pdf = EmpiricalPdf::new(&[1.0], 10.0)
            .unwrap()
            .with_first_reference(0.25)
            .unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(11);
        let n = 20_000;
        let firsts = (0..n)
            .filter(|_| pdf.sample(&mut rng).is_first_reference())
            .count();
        let rate = firsts as f64 / n as f64;
        assert!((rate - 0.25).abs() < 0.02, "first-reference rate {}", rate);
        assert_eq!(pdf.first_reference_probability(), 0.25);
    }

    #[test]
    fn test_pdf_rejects_bad_input() {
        assert!(EmpiricalPdf::new(&[], 10.0).unwrap_err().is_configuration());
        assert!(EmpiricalPdf::new(&[1.0], 0.0).is_err());
        assert!(EmpiricalPdf::new(&[1.0], f64::NAN).is_err());
        assert!(EmpiricalPdf::new(&[1.0], 1.0)
            .unwrap()
            .with_first_reference(1.0)
            .is_err());
    }

    #[test]
    fn test_spike_weights() {
        let w = spike_weights(5, &[1, 3], 0.1).unwrap();
        assert_eq!(w, vec![0.1, 0.45, 0.1, 0.45, 0.1]);
        assert!(spike_weights(5, &[5], 0.1).is_err());
        assert!(spike_weights(5, &[], 0.1).is_err());
        assert!(spike_weights(0, &[0], 0.1).is_err());
    }

    #[test]
    fn test_presets() {
        for name in ["b", "c", "d", "e", "f"] {
            let preset: IrdPreset = name.parse().unwrap();
            assert_eq!(preset.to_string(), name);
            let pdf = preset.build(100.0).unwrap();
            assert!((pdf.mean() - 100.0).abs() < 1e-6);
        }
        assert!("z".parse::<IrdPreset>().is_err());
    }
}
