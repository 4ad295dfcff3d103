//! Configuration module
//!
//! Handles CLI argument parsing, TOML configuration files, and validation.
//!
//! A configuration file mirrors [`GeneratorConfig`], with an optional
//! `[output]` table:
//!
//! ```toml
//! items = 100
//! length = 10000
//! p_irm = 0.0
//! seed = 42
//!
//! [ird]
//! type = "intervals"
//! weights = [0.8, 0.0001, 0.1999]
//!
//! [irm]
//! type = "zipf"
//! a = 1.2
//! buckets = 20
//! ```

pub mod cli;
pub mod cli_convert;
pub mod toml;
pub mod validator;

use crate::distribution::empirical::{EmpiricalPdf, IrdPreset};
use crate::distribution::gaussian::GaussianDistribution;
use crate::distribution::hot_cold::HotColdDistribution;
use crate::distribution::hyperexp::HyperExponential;
use crate::distribution::interval::IntervalMixture;
use crate::distribution::pareto::ParetoDistribution;
use crate::distribution::resample::EmpiricalIrm;
use crate::distribution::sequential::SequentialDistribution;
use crate::distribution::uniform::UniformDistribution;
use crate::distribution::zipf::ZipfDistribution;
use crate::distribution::{IrdSampler, IrmSampler};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Complete run configuration as read from a file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(flatten)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Trace generator parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Footprint size M (live items held by the scheduler)
    #[serde(default = "default_items")]
    pub items: u64,
    /// Trace length n
    #[serde(default = "default_length")]
    pub length: usize,
    /// Probability that an access is drawn from the IRM model
    #[serde(default)]
    pub p_irm: f64,
    /// RNG seed
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Reference-locality model
    #[serde(default)]
    pub ird: IrdConfig,
    /// Popularity model
    #[serde(default)]
    pub irm: IrmConfig,
}

fn default_items() -> u64 {
    100
}

fn default_length() -> usize {
    10_000
}

fn default_seed() -> u64 {
    42
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            items: default_items(),
            length: default_length(),
            p_irm: 0.0,
            seed: default_seed(),
            ird: IrdConfig::default(),
            irm: IrmConfig::default(),
        }
    }
}

/// IRD model configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IrdConfig {
    /// Weighted equal-width buckets over `[0, M)`
    Intervals { weights: Vec<f64> },
    /// Spike PDF: `bins` bins with an `eps` floor and a few dominant bins
    Spikes {
        bins: usize,
        spikes: Vec<usize>,
        #[serde(default = "default_eps")]
        eps: f64,
    },
    /// Named spike PDF (`b` to `f`)
    Preset { name: IrdPreset },
    /// Explicit PDF over equal-width bins
    Pdf {
        weights: Vec<f64>,
        /// Mean gap; defaults to M
        mean: Option<f64>,
        /// Share of samples that are first references
        #[serde(default)]
        first_reference: f64,
    },
    /// Exponential classes with the given rates
    HyperExponential { rates: Vec<f64> },
}

fn default_eps() -> f64 {
    1e-6
}

impl Default for IrdConfig {
    fn default() -> Self {
        Self::Preset {
            name: IrdPreset::default(),
        }
    }
}

impl IrdConfig {
    /// Build the sampler for a footprint of `items`
    ///
    /// Bin-based models are scaled so their mean gap equals `items`. Scaling
    /// every gap by the same factor leaves the generated order unchanged.
    pub fn build(&self, items: u64) -> Result<Box<dyn IrdSampler>> {
        let mean = items as f64;
        let sampler: Box<dyn IrdSampler> = match self {
            IrdConfig::Intervals { weights } => Box::new(IntervalMixture::new(weights, items)?),
            IrdConfig::Spikes { bins, spikes, eps } => {
                Box::new(EmpiricalPdf::spikes(*bins, spikes, *eps, mean)?)
            }
            IrdConfig::Preset { name } => Box::new(name.build(mean)?),
            IrdConfig::Pdf {
                weights,
                mean: target,
                first_reference,
            } => Box::new(
                EmpiricalPdf::new(weights, target.unwrap_or(mean))?
                    .with_first_reference(*first_reference)?,
            ),
            IrdConfig::HyperExponential { rates } => Box::new(HyperExponential::new(rates)?),
        };
        Ok(sampler)
    }
}

impl fmt::Display for IrdConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IrdConfig::Intervals { weights } => write!(f, "intervals {:?}", weights),
            IrdConfig::Spikes { bins, spikes, eps } => {
                write!(f, "spikes k={} eps={} at {:?}", bins, eps, spikes)
            }
            IrdConfig::Preset { name } => write!(f, "preset {}", name),
            IrdConfig::Pdf {
                weights,
                first_reference,
                ..
            } => write!(f, "pdf over {} bins (first reference {})", weights.len(), first_reference),
            IrdConfig::HyperExponential { rates } => write!(f, "hyper-exponential {:?}", rates),
        }
    }
}

/// IRM model configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IrmConfig {
    Zipf { a: f64, buckets: usize },
    Pareto { xm: f64, a: f64 },
    Normal { mean: f64, std: f64 },
    Uniform { low: Option<u64>, high: Option<u64> },
    HotCold { r: f64, f: f64 },
    Sequential,
    /// Per-item access counts; item `i` is drawn with weight `counts[i]`
    Empirical { counts: Vec<u64> },
}

impl Default for IrmConfig {
    fn default() -> Self {
        Self::Zipf { a: 1.2, buckets: 20 }
    }
}

impl IrmConfig {
    /// Build the sampler over `[0, items)`
    pub fn build(&self, items: u64) -> Result<Box<dyn IrmSampler>> {
        let sampler: Box<dyn IrmSampler> = match self {
            IrmConfig::Zipf { a, buckets } => Box::new(ZipfDistribution::new(*a, *buckets, items)?),
            IrmConfig::Pareto { xm, a } => Box::new(ParetoDistribution::new(*a, *xm, items)?),
            IrmConfig::Normal { mean, std } => {
                Box::new(GaussianDistribution::new(*mean, *std, items)?)
            }
            IrmConfig::Uniform { low, high } => Box::new(UniformDistribution::with_bounds(
                low.unwrap_or(0),
                high.unwrap_or(items),
                items,
            )?),
            IrmConfig::HotCold { r, f } => Box::new(HotColdDistribution::new(*r, *f, items)?),
            IrmConfig::Sequential => Box::new(SequentialDistribution::new(items)?),
            IrmConfig::Empirical { counts } => Box::new(EmpiricalIrm::from_counts(counts)?),
        };
        Ok(sampler)
    }
}

impl fmt::Display for IrmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IrmConfig::Zipf { a, buckets } => write!(f, "zipf a={} buckets={}", a, buckets),
            IrmConfig::Pareto { xm, a } => write!(f, "pareto xm={} a={}", xm, a),
            IrmConfig::Normal { mean, std } => write!(f, "normal mean={} std={}", mean, std),
            IrmConfig::Uniform { low, high } => match (low, high) {
                (None, None) => write!(f, "uniform"),
                _ => write!(
                    f,
                    "uniform [{}, {})",
                    low.unwrap_or(0),
                    high.map(|h| h.to_string()).unwrap_or_else(|| "M".to_string())
                ),
            },
            IrmConfig::HotCold { r, f: frac } => write!(f, "hot/cold r={} f={}", r, frac),
            IrmConfig::Sequential => write!(f, "sequential"),
            IrmConfig::Empirical { counts } => write!(f, "empirical over {} items", counts.len()),
        }
    }
}

/// Where results go
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Trace file, one item id per line (stdout when unset)
    pub trace: Option<PathBuf>,
    /// JSON summary file
    pub json: Option<PathBuf>,
    /// Number of LRU capacities for the miss-ratio curve
    pub mrc_points: Option<usize>,
    /// Per-step diagnostics as JSON
    pub steps: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_cli_defaults() {
        let config = GeneratorConfig::default();
        assert_eq!(config.p_irm, 0.0);
        assert_eq!(config.seed, 42);
        assert_eq!(config.ird, IrdConfig::Preset { name: IrdPreset::B });
        assert_eq!(config.irm, IrmConfig::Zipf { a: 1.2, buckets: 20 });
    }

    #[test]
    fn test_build_every_irm() {
        let configs = vec![
            IrmConfig::Zipf { a: 1.2, buckets: 20 },
            IrmConfig::Pareto { xm: 1.0, a: 1.5 },
            IrmConfig::Normal { mean: 50.0, std: 10.0 },
            IrmConfig::Uniform { low: None, high: None },
            IrmConfig::HotCold { r: 0.8, f: 0.2 },
            IrmConfig::Sequential,
            IrmConfig::Empirical { counts: vec![5, 1, 0, 3] },
        ];
        for config in configs {
            let sampler = config.build(100);
            assert!(sampler.is_ok(), "{} failed to build", config);
        }
    }

    #[test]
    fn test_build_every_ird() {
        let configs = vec![
            IrdConfig::Intervals { weights: vec![0.8, 0.0001, 0.1999] },
            IrdConfig::Spikes { bins: 10, spikes: vec![1, 5], eps: 0.001 },
            IrdConfig::Preset { name: IrdPreset::D },
            IrdConfig::Pdf { weights: vec![1.0, 2.0], mean: Some(10.0), first_reference: 0.1 },
            IrdConfig::HyperExponential { rates: vec![0.1, 0.01] },
        ];
        for config in configs {
            let sampler = config.build(100).unwrap();
            assert!(sampler.first_reference_probability() < 1.0);
        }
    }

    #[test]
    fn test_build_reports_bad_parameters() {
        assert!(IrdConfig::Intervals { weights: vec![] }.build(100).is_err());
        assert!(IrmConfig::Zipf { a: 1.2, buckets: 200 }.build(100).is_err());
        assert!(IrmConfig::Uniform { low: Some(5), high: Some(5) }.build(100).is_err());
    }
}
