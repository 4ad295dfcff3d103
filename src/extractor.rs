//! Model extraction from real traces
//!
//! [`EmpiricalExtractor`] derives the parameters a [`TraceGenerator`] needs to
//! re-synthesize a trace: per-item access counts (IRM), finite
//! inter-reference distances plus first-reference markers (IRD), and the
//! singleton share.
//!
//! Counts and distances are computed on first use and cached for the lifetime
//! of the extractor. A different trace needs a new extractor.
//!
//! # Example
//!
//! ```
//! use tracegen::extractor::EmpiricalExtractor;
//!
//! let ex = EmpiricalExtractor::new(vec![3, 1, 3, 3, 2, 1]).unwrap();
//! assert_eq!(ex.item_counts().items, vec![1, 2, 3]);
//! assert_eq!(ex.item_counts().counts, vec![2, 1, 3]);
//! assert!((ex.singleton_fraction().unwrap() - 1.0 / 3.0).abs() < 1e-12);
//! ```

use crate::distance::{compute_distances, Distance};
use crate::distribution::empirical::EmpiricalPdf;
use crate::distribution::resample::{EmpiricalIrm, Resampler};
use crate::distribution::Ird;
use crate::error::{checked_ratio, Error, Result};
use crate::generator::TraceGenerator;
use crate::stats::IrdSummary;
use crate::ItemId;
use serde::Serialize;
use std::cell::OnceCell;
use std::collections::HashMap;

/// Minimum access count (exclusive) for an item to count as active
pub const ACTIVE_MIN_COUNT: u64 = 3;

/// Distinct items of a trace in ascending id order with their access counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemCounts {
    pub items: Vec<ItemId>,
    pub counts: Vec<u64>,
}

impl ItemCounts {
    fn from_trace(trace: &[ItemId]) -> Self {
        let mut sorted = trace.to_vec();
        sorted.sort_unstable();

        let mut items: Vec<ItemId> = Vec::new();
        let mut counts: Vec<u64> = Vec::new();
        for item in sorted {
            match items.last() {
                Some(&last) if last == item => {
                    if let Some(c) = counts.last_mut() {
                        *c += 1;
                    }
                }
                _ => {
                    items.push(item);
                    counts.push(1);
                }
            }
        }
        Self { items, counts }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of items accessed exactly once
    pub fn singletons(&self) -> usize {
        self.counts.iter().filter(|&&c| c == 1).count()
    }
}

/// Equal-width histogram of finite distances over `[1, max]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IrdHistogram {
    /// Width of one bin in accesses
    pub bin_width: f64,
    pub counts: Vec<u64>,
    /// Mean finite distance
    pub mean: f64,
    /// Share of IRD samples that are first references
    pub first_reference: f64,
}

impl IrdHistogram {
    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    /// Bin counts normalized to probabilities
    pub fn pdf(&self) -> Vec<f64> {
        let total: u64 = self.counts.iter().sum();
        self.counts
            .iter()
            .map(|&c| c as f64 / total.max(1) as f64)
            .collect()
    }

    /// Sampler reproducing this histogram, scaled to the observed mean
    pub fn to_pdf(&self) -> Result<EmpiricalPdf> {
        EmpiricalPdf::new(&self.pdf(), self.mean)?.with_first_reference(self.first_reference)
    }
}

/// Items of one frequency class and the distances observed for them
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyClass {
    pub items: Vec<ItemId>,
    pub min_count: u64,
    pub max_count: u64,
    pub distances: Vec<u64>,
}

/// Non-singleton items split into equally populated frequency classes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyPartition {
    /// Classes from least to most frequently accessed
    pub classes: Vec<FrequencyClass>,
    /// First-reference markers to append when resampling
    pub singleton_markers: usize,
}

impl FrequencyPartition {
    /// Distances of every class in order, followed by the singleton markers
    pub fn concatenated(&self) -> Vec<Ird> {
        self.classes
            .iter()
            .flat_map(|class| class.distances.iter().map(|&d| Ird::Gap(d as f64)))
            .chain(std::iter::repeat(Ird::FirstReference).take(self.singleton_markers))
            .collect()
    }
}

/// Serializable summary of everything extracted from a trace
#[derive(Debug, Clone, Serialize)]
pub struct ExtractedModel {
    pub length: usize,
    pub distinct_items: usize,
    pub active_items: usize,
    pub singleton_fraction: f64,
    pub singleton_access_rate: f64,
    pub ird: IrdSummary,
    pub histogram: IrdHistogram,
}

/// Lazily computed statistics over one input trace
#[derive(Debug)]
pub struct EmpiricalExtractor {
    trace: Vec<ItemId>,
    counts: OnceCell<ItemCounts>,
    distances: OnceCell<Vec<Distance>>,
}

impl EmpiricalExtractor {
    /// Wrap a trace; fails on an empty trace
    pub fn new(trace: Vec<ItemId>) -> Result<Self> {
        if trace.is_empty() {
            return Err(Error::degenerate("cannot extract a model from an empty trace"));
        }
        Ok(Self {
            trace,
            counts: OnceCell::new(),
            distances: OnceCell::new(),
        })
    }

    pub fn trace(&self) -> &[ItemId] {
        &self.trace
    }

    pub fn len(&self) -> usize {
        self.trace.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trace.is_empty()
    }

    /// Distinct items and their access counts
    pub fn item_counts(&self) -> &ItemCounts {
        self.counts.get_or_init(|| ItemCounts::from_trace(&self.trace))
    }

    /// Cumulative share of accesses over the items in ascending id order
    pub fn frequency_cdf(&self) -> Vec<f64> {
        let total = self.trace.len() as f64;
        let mut cumulative = 0u64;
        self.item_counts()
            .counts
            .iter()
            .map(|&c| {
                cumulative += c;
                cumulative as f64 / total
            })
            .collect()
    }

    /// Share of distinct items that were accessed exactly once
    pub fn singleton_fraction(&self) -> Result<f64> {
        let counts = self.item_counts();
        checked_ratio(counts.singletons() as f64, counts.len() as f64, "singleton fraction")
    }

    /// Singleton items per access, the first-reference mass used for resampling
    pub fn singleton_access_rate(&self) -> Result<f64> {
        checked_ratio(
            self.item_counts().singletons() as f64,
            self.trace.len() as f64,
            "singleton access rate",
        )
    }

    /// Inter-reference distance of every access
    pub fn distances(&self) -> &[Distance] {
        self.distances.get_or_init(|| compute_distances(&self.trace))
    }

    /// Finite distances in trace order
    pub fn finite_distances(&self) -> Vec<u64> {
        self.distances().iter().filter_map(Distance::gap).collect()
    }

    /// Number of first-reference markers to add to `finite` finite samples
    ///
    /// Truncated toward zero, so a trace needs enough repeats before it
    /// contributes a marker at all.
    fn marker_count(&self, finite: usize) -> Result<usize> {
        Ok((self.singleton_access_rate()? * finite as f64).floor() as usize)
    }

    /// Finite distances followed by first-reference markers
    ///
    /// The marker count is the singleton access rate times the number of
    /// finite distances, so resampling emits new items at the observed rate.
    pub fn ird_samples(&self) -> Result<Vec<Ird>> {
        let finite = self.finite_distances();
        let markers = self.marker_count(finite.len())?;

        let mut samples: Vec<Ird> = finite.into_iter().map(|d| Ird::Gap(d as f64)).collect();
        samples.extend(std::iter::repeat(Ird::FirstReference).take(markers));
        Ok(samples)
    }

    /// Histogram of finite distances with `bins` equal-width bins over `[1, max]`
    pub fn ird_histogram(&self, bins: usize) -> Result<IrdHistogram> {
        if bins == 0 {
            return Err(Error::config("histogram needs at least one bin"));
        }

        let finite = self.finite_distances();
        let max = match finite.iter().max() {
            Some(&max) => max,
            None => {
                return Err(Error::degenerate(
                    "trace has no repeated accesses, so no finite distances",
                ))
            }
        };

        let bin_width = max as f64 / bins as f64;
        let mut counts = vec![0u64; bins];
        for &d in &finite {
            let bin = ((d - 1) as f64 / bin_width) as usize;
            counts[bin.min(bins - 1)] += 1;
        }

        let sum: u64 = finite.iter().sum();
        let mean = checked_ratio(sum as f64, finite.len() as f64, "mean distance")?;
        let markers = self.marker_count(finite.len())?;
        let first_reference =
            checked_ratio(markers as f64, (finite.len() + markers) as f64, "first reference share")?;

        tracing::debug!(bins, bin_width, mean, first_reference, "built IRD histogram");

        Ok(IrdHistogram {
            bin_width,
            counts,
            mean,
            first_reference,
        })
    }

    /// Split non-singleton items into `k` frequency classes of equal size
    ///
    /// Items are ordered by access count (then id); class `i` takes items
    /// `[i*n/k, (i+1)*n/k)` of that order. Each class collects the finite
    /// distances of its items.
    pub fn frequency_partition(&self, k: usize) -> Result<FrequencyPartition> {
        if k == 0 {
            return Err(Error::config("frequency partition needs at least one class"));
        }

        let counts = self.item_counts();
        let mut repeated: Vec<(u64, ItemId)> = counts
            .items
            .iter()
            .zip(&counts.counts)
            .filter(|(_, &c)| c > 1)
            .map(|(&item, &c)| (c, item))
            .collect();
        if repeated.len() < k {
            return Err(Error::degenerate(format!(
                "{} repeated items cannot fill {} frequency classes",
                repeated.len(),
                k
            )));
        }
        repeated.sort_unstable();

        let n = repeated.len();
        let mut class_of: HashMap<ItemId, usize> = HashMap::with_capacity(n);
        let mut classes: Vec<FrequencyClass> = (0..k)
            .map(|i| {
                let members = &repeated[i * n / k..(i + 1) * n / k];
                for &(_, item) in members {
                    class_of.insert(item, i);
                }
                FrequencyClass {
                    items: members.iter().map(|&(_, item)| item).collect(),
                    min_count: members.first().map(|&(c, _)| c).unwrap_or(0),
                    max_count: members.last().map(|&(c, _)| c).unwrap_or(0),
                    distances: Vec::new(),
                }
            })
            .collect();

        for (item, distance) in self.trace.iter().zip(self.distances()) {
            if let (Some(&class), Distance::Gap(d)) = (class_of.get(item), distance) {
                classes[class].distances.push(*d);
            }
        }

        let finite: usize = classes.iter().map(|c| c.distances.len()).sum();
        Ok(FrequencyPartition {
            classes,
            singleton_markers: self.marker_count(finite)?,
        })
    }

    /// Percentiles of the finite distances
    pub fn ird_summary(&self) -> Result<IrdSummary> {
        IrdSummary::from_distances(self.distances())
    }

    /// Number of items accessed more than `min_count` times
    pub fn active_items(&self, min_count: u64) -> usize {
        self.item_counts()
            .counts
            .iter()
            .filter(|&&c| c > min_count)
            .count()
    }

    /// IRM sampler over the observed frequencies
    ///
    /// Items come back as dense ranks `0..distinct` in ascending id order.
    pub fn irm_sampler(&self) -> Result<EmpiricalIrm> {
        EmpiricalIrm::from_counts(&self.item_counts().counts)
    }

    /// IRD sampler replaying the observed distances and markers
    pub fn ird_sampler(&self) -> Result<Resampler> {
        Resampler::new(self.ird_samples()?)
    }

    /// Generator that re-synthesizes this trace
    ///
    /// The footprint is the number of active items (more than
    /// [`ACTIVE_MIN_COUNT`] accesses).
    pub fn reconstruct(&self, p_irm: f64, seed: u64) -> Result<TraceGenerator> {
        let items = self.active_items(ACTIVE_MIN_COUNT) as u64;
        if items == 0 {
            return Err(Error::degenerate(format!(
                "no item has more than {} accesses",
                ACTIVE_MIN_COUNT
            )));
        }

        let ird = self.ird_sampler()?;
        let irm = self.irm_sampler()?;
        tracing::info!(
            items,
            ird_samples = ird.len(),
            irm_items = irm.items(),
            p_irm,
            "reconstructing trace model"
        );
        TraceGenerator::new(items, p_irm, Box::new(ird), Box::new(irm), seed)
    }

    /// Everything above in one serializable value
    pub fn model(&self, bins: usize) -> Result<ExtractedModel> {
        let model = ExtractedModel {
            length: self.trace.len(),
            distinct_items: self.item_counts().len(),
            active_items: self.active_items(ACTIVE_MIN_COUNT),
            singleton_fraction: self.singleton_fraction()?,
            singleton_access_rate: self.singleton_access_rate()?,
            ird: self.ird_summary()?,
            histogram: self.ird_histogram(bins)?,
        };
        tracing::info!(
            length = model.length,
            distinct = model.distinct_items,
            active = model.active_items,
            singleton_fraction = model.singleton_fraction,
            "extracted trace model"
        );
        Ok(model)
    }
}
