//! Trace generation
//!
//! [`TraceGenerator`] mixes a reference-locality model (IRD, driven through the
//! [`RenewalScheduler`]) with a popularity model (IRM). At every step, with
//! probability `p_irm` the next access is drawn straight from the IRM model and
//! leaves the scheduler untouched; otherwise an IRD sample renews the item at
//! the head of the schedule (or mints a new item for a first reference).
//!
//! # Determinism
//!
//! The generator owns its RNG (`Xoshiro256PlusPlus`). Two generators built
//! from the same models and seed produce identical traces, and nothing outside
//! the generator touches its random stream.
//!
//! # Example
//!
//! ```
//! use tracegen::distribution::{interval::IntervalMixture, uniform::UniformDistribution};
//! use tracegen::generator::TraceGenerator;
//!
//! let ird = IntervalMixture::new(&[0.8, 0.0001, 0.1999], 100).unwrap();
//! let irm = UniformDistribution::new(100).unwrap();
//! let mut gen = TraceGenerator::new(100, 0.0, Box::new(ird), Box::new(irm), 42).unwrap();
//!
//! let trace = gen.generate(10_000).unwrap();
//! assert_eq!(trace.len(), 10_000);
//! ```

use crate::config::GeneratorConfig;
use crate::distribution::{Ird, IrdSampler, IrmSampler};
use crate::error::{Error, Result};
use crate::scheduler::RenewalScheduler;
use crate::ItemId;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;
use serde::Serialize;
use std::fmt;

/// Mixture of an IRD and an IRM model over `M` live items
pub struct TraceGenerator {
    /// Live items held by the scheduler
    items: u64,

    /// Per-step probability of an IRM draw
    p_irm: f64,

    ird: Box<dyn IrdSampler>,

    irm: Box<dyn IrmSampler>,

    rng: Xoshiro256PlusPlus,
}

impl fmt::Debug for TraceGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TraceGenerator")
            .field("items", &self.items)
            .field("p_irm", &self.p_irm)
            .field("ird", &self.ird.name())
            .field("irm", &self.irm.name())
            .finish_non_exhaustive()
    }
}

/// Diagnostic record of one generated access
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VerboseStep {
    /// Emitted item id
    pub item: ItemId,

    /// Drawn from the IRM model
    pub is_irm: bool,

    /// Raw IRD sample for IRD steps
    pub gap: Option<Ird>,

    /// Due time of the renewed item minus the step index
    pub drift: Option<f64>,
}

/// Trace with per-step diagnostics
#[derive(Debug, Clone, Default, Serialize)]
pub struct VerboseTrace {
    pub steps: Vec<VerboseStep>,
}

impl VerboseTrace {
    /// The plain trace
    pub fn items(&self) -> Vec<ItemId> {
        self.steps.iter().map(|s| s.item).collect()
    }

    /// Share of steps drawn from the IRM model
    pub fn irm_share(&self) -> f64 {
        if self.steps.is_empty() {
            return 0.0;
        }
        self.steps.iter().filter(|s| s.is_irm).count() as f64 / self.steps.len() as f64
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl TraceGenerator {
    /// Create a generator seeded with `seed`
    pub fn new(
        items: u64,
        p_irm: f64,
        ird: Box<dyn IrdSampler>,
        irm: Box<dyn IrmSampler>,
        seed: u64,
    ) -> Result<Self> {
        Self::with_rng(items, p_irm, ird, irm, Xoshiro256PlusPlus::seed_from_u64(seed))
    }

    /// Create a generator drawing from an injected RNG
    pub fn with_rng(
        items: u64,
        p_irm: f64,
        ird: Box<dyn IrdSampler>,
        irm: Box<dyn IrmSampler>,
        rng: Xoshiro256PlusPlus,
    ) -> Result<Self> {
        if items == 0 {
            return Err(Error::config("items (M) must be at least 1"));
        }
        if !p_irm.is_finite() || !(0.0..=1.0).contains(&p_irm) {
            return Err(Error::config(format!("p_irm must be in [0, 1], got {}", p_irm)));
        }
        let p_first = ird.first_reference_probability();
        if !p_first.is_finite() || !(0.0..1.0).contains(&p_first) {
            return Err(Error::config(format!(
                "IRD model '{}' has first-reference probability {}, needs finite gaps",
                ird.name(),
                p_first
            )));
        }

        tracing::debug!(
            items,
            p_irm,
            ird = ird.name(),
            irm = irm.name(),
            "trace generator ready"
        );

        Ok(Self {
            items,
            p_irm,
            ird,
            irm,
            rng,
        })
    }

    /// Build models and generator from a validated configuration
    pub fn from_config(config: &GeneratorConfig) -> Result<Self> {
        let (ird, irm) = crate::config::validator::build_models(config)?;
        Self::new(config.items, config.p_irm, ird, irm, config.seed)
    }

    pub fn items(&self) -> u64 {
        self.items
    }

    pub fn p_irm(&self) -> f64 {
        self.p_irm
    }

    /// Generate a trace of exactly `n` accesses
    pub fn generate(&mut self, n: usize) -> Result<Vec<ItemId>> {
        let mut trace = Vec::with_capacity(n);
        self.run(n, |step| trace.push(step.item))?;
        Ok(trace)
    }

    /// Generate a trace of exactly `n` accesses with per-step diagnostics
    pub fn generate_verbose(&mut self, n: usize) -> Result<VerboseTrace> {
        let mut steps = Vec::with_capacity(n);
        self.run(n, |step| steps.push(step))?;
        Ok(VerboseTrace { steps })
    }

    fn run<F: FnMut(VerboseStep)>(&mut self, n: usize, mut emit: F) -> Result<()> {
        let mut scheduler = RenewalScheduler::new(self.items)?;
        scheduler.warm_up(self.ird.as_ref(), &mut self.rng)?;

        let mut irm_steps = 0usize;
        for step in 0..n {
            if self.rng.gen::<f64>() < self.p_irm {
                irm_steps += 1;
                emit(VerboseStep {
                    item: self.irm.sample(&mut self.rng),
                    is_irm: true,
                    gap: None,
                    drift: None,
                });
                continue;
            }

            let gap = self.ird.sample(&mut self.rng);
            let emitted = scheduler.renew(gap)?;
            emit(VerboseStep {
                item: emitted.item,
                is_irm: false,
                gap: Some(gap),
                drift: emitted.due.map(|due| due - step as f64),
            });
        }

        tracing::info!(
            length = n,
            irm_steps,
            minted = scheduler.next_item(),
            "generated trace"
        );
        Ok(())
    }
}

/// Generate one trace per seed in parallel
///
/// Every seed gets its own models and generator, so runs share no state and
/// each result equals a sequential run with that seed. Results come back in
/// seed order.
pub fn generate_batch(config: &GeneratorConfig, seeds: &[u64], n: usize) -> Result<Vec<Vec<ItemId>>> {
    seeds
        .par_iter()
        .map(|&seed| {
            let (ird, irm) = crate::config::validator::build_models(config)?;
            TraceGenerator::new(config.items, config.p_irm, ird, irm, seed)?.generate(n)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{IrdConfig, IrmConfig};
    use crate::distribution::interval::IntervalMixture;
    use crate::distribution::uniform::UniformDistribution;
    use crate::distribution::zipf::ZipfDistribution;
    use std::collections::HashSet;

    fn interval_generator(p_irm: f64, seed: u64) -> TraceGenerator {
        let ird = IntervalMixture::new(&[0.8, 0.0001, 0.1999], 100).unwrap();
        let irm = UniformDistribution::new(100).unwrap();
        TraceGenerator::new(100, p_irm, Box::new(ird), Box::new(irm), seed).unwrap()
    }

    #[test]
    fn test_three_class_mixture_scenario() {
        let mut gen = interval_generator(0.0, 42);
        let trace = gen.generate(10_000).unwrap();

        assert_eq!(trace.len(), 10_000);
        assert!(trace.iter().all(|&item| item < 100));
    }

    #[test]
    fn test_length_is_exact() {
        for (n, p_irm) in [(0, 0.0), (1, 0.5), (777, 0.3), (5000, 1.0)] {
            let mut gen = interval_generator(p_irm, 7);
            assert_eq!(gen.generate(n).unwrap().len(), n);
        }
    }

    #[test]
    fn test_same_seed_same_trace() {
        let a = interval_generator(0.3, 99).generate(2000).unwrap();
        let b = interval_generator(0.3, 99).generate(2000).unwrap();
        let c = interval_generator(0.3, 100).generate(2000).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_pure_ird_only_emits_scheduled_or_minted() {
        let ird = crate::distribution::empirical::EmpiricalPdf::new(&[0.6, 0.4], 50.0)
            .unwrap()
            .with_first_reference(0.1)
            .unwrap();
        let irm = UniformDistribution::new(1_000_000).unwrap();
        let mut gen = TraceGenerator::new(50, 0.0, Box::new(ird), Box::new(irm), 3).unwrap();

        let verbose = gen.generate_verbose(5000).unwrap();
        assert!(verbose.steps.iter().all(|s| !s.is_irm));

        // Ids are warm-up items (0..50) or minted in order after them
        let mut next_minted = 50;
        for step in &verbose.steps {
            match step.gap {
                Some(Ird::FirstReference) => {
                    assert_eq!(step.item, next_minted);
                    next_minted += 1;
                }
                Some(Ird::Gap(_)) => assert!(step.item < 50),
                None => panic!("IRD step without a gap"),
            }
        }
        assert!(next_minted > 50);
    }

    #[test]
    fn test_pure_irm_matches_bucket_probabilities() {
        let ird = IntervalMixture::new(&[1.0], 100).unwrap();
        let irm = ZipfDistribution::new(1.0, 4, 100).unwrap();
        let probabilities: Vec<f64> = (0..4).map(|i| irm.bucket_probability(i)).collect();
        let mut gen = TraceGenerator::new(100, 1.0, Box::new(ird), Box::new(irm), 11).unwrap();

        let n = 40_000;
        let verbose = gen.generate_verbose(n).unwrap();
        assert!(verbose.steps.iter().all(|s| s.is_irm && s.gap.is_none()));

        let mut observed = [0f64; 4];
        for step in &verbose.steps {
            observed[(step.item / 25) as usize] += 1.0;
        }

        // Chi-square with 3 degrees of freedom; 16.27 is the 0.001 critical value
        let chi2: f64 = observed
            .iter()
            .zip(&probabilities)
            .map(|(o, p)| {
                let expected = p * n as f64;
                (o - expected).powi(2) / expected
            })
            .sum();
        assert!(chi2 < 16.27, "chi-square {} too large", chi2);
    }

    #[test]
    fn test_mixture_irm_share() {
        let mut gen = interval_generator(0.25, 5);
        let verbose = gen.generate_verbose(20_000).unwrap();
        assert!((verbose.irm_share() - 0.25).abs() < 0.02);
        assert_eq!(verbose.items().len(), 20_000);
    }

    #[test]
    fn test_verbose_matches_plain_trace() {
        let plain = interval_generator(0.4, 21).generate(3000).unwrap();
        let verbose = interval_generator(0.4, 21).generate_verbose(3000).unwrap();
        assert_eq!(plain, verbose.items());
    }

    #[test]
    fn test_invalid_p_irm_rejected() {
        for p_irm in [-0.1, 1.5, f64::NAN] {
            let ird = IntervalMixture::new(&[1.0], 10).unwrap();
            let irm = UniformDistribution::new(10).unwrap();
            let result = TraceGenerator::new(10, p_irm, Box::new(ird), Box::new(irm), 0);
            assert!(result.err().unwrap().is_configuration());
        }
    }

    #[test]
    fn test_singleton_only_ird_rejected() {
        let ird = crate::distribution::resample::Resampler::new(vec![Ird::FirstReference]).unwrap();
        let irm = UniformDistribution::new(10).unwrap();
        assert!(TraceGenerator::new(10, 0.0, Box::new(ird), Box::new(irm), 0).is_err());
    }

    #[test]
    fn test_from_config_and_batch() {
        let config = GeneratorConfig {
            items: 100,
            length: 1000,
            p_irm: 0.2,
            seed: 42,
            ird: IrdConfig::Intervals {
                weights: vec![0.8, 0.0001, 0.1999],
            },
            irm: IrmConfig::Zipf { a: 1.2, buckets: 20 },
        };

        let single = TraceGenerator::from_config(&config).unwrap().generate(1000).unwrap();
        let batch = generate_batch(&config, &[42, 43, 44], 1000).unwrap();

        assert_eq!(batch.len(), 3);
        assert_eq!(batch[0], single);
        assert_ne!(batch[1], batch[2]);

        let distinct: HashSet<_> = batch[1].iter().collect();
        assert!(distinct.len() > 10);
    }

    #[test]
    fn test_debug_names_models() {
        let gen = interval_generator(0.3, 1);
        let text = format!("{:?}", gen);
        assert!(text.starts_with("TraceGenerator"));
        assert!(text.contains("items: 100"));
        assert!(text.contains("p_irm: 0.3"));
        assert!(text.contains(gen.ird.name()));
        assert!(text.contains(gen.irm.name()));
    }

    #[test]
    fn test_empty_weights_fail_before_sampling() {
        let config = GeneratorConfig {
            ird: IrdConfig::Intervals { weights: vec![] },
            ..GeneratorConfig::default()
        };
        let err = TraceGenerator::from_config(&config).err().unwrap();
        assert!(err.is_configuration());
    }
}
