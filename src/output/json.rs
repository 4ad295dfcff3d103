//! JSON output formatting
//!
//! Reports written by the binary:
//! - [`GenerateReport`]: configuration, per-run trace summary and optional
//!   LRU miss-ratio curve
//! - [`ExtractReport`]: the extracted model and, optionally, a comparison
//!   of the input trace against its re-synthesized copy

use crate::config::GeneratorConfig;
use crate::extractor::{ExtractedModel, FrequencyClass, FrequencyPartition};
use crate::policy::MrcPoint;
use crate::stats::TraceSummary;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// One generated trace
#[derive(Debug, Clone, Serialize)]
pub struct JsonRun {
    pub seed: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<PathBuf>,
    pub summary: TraceSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mrc: Option<Vec<MrcPoint>>,
}

/// Output of `tracegen generate`
#[derive(Debug, Clone, Serialize)]
pub struct GenerateReport {
    pub generated_at: DateTime<Utc>,
    pub version: String,
    pub config: GeneratorConfig,
    pub runs: Vec<JsonRun>,
}

impl GenerateReport {
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            generated_at: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            config: config.clone(),
            runs: Vec::new(),
        }
    }
}

/// Hit rates of the input trace and its reconstruction at one capacity
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct JsonComparison {
    pub capacity: usize,
    pub original: f64,
    pub reconstructed: f64,
}

impl JsonComparison {
    /// Pair up two curves computed over the same capacities
    pub fn from_curves(original: &[MrcPoint], reconstructed: &[MrcPoint]) -> Vec<Self> {
        original
            .iter()
            .zip(reconstructed)
            .map(|(o, r)| Self {
                capacity: o.capacity,
                original: o.hit_rate,
                reconstructed: r.hit_rate,
            })
            .collect()
    }
}

/// Frequency class without its raw distances
#[derive(Debug, Clone, Serialize)]
pub struct JsonFrequencyClass {
    pub items: usize,
    pub min_count: u64,
    pub max_count: u64,
    pub samples: usize,
}

impl From<&FrequencyClass> for JsonFrequencyClass {
    fn from(class: &FrequencyClass) -> Self {
        Self {
            items: class.items.len(),
            min_count: class.min_count,
            max_count: class.max_count,
            samples: class.distances.len(),
        }
    }
}

/// Output of `tracegen extract`
#[derive(Debug, Clone, Serialize)]
pub struct ExtractReport {
    pub generated_at: DateTime<Utc>,
    pub version: String,
    pub input: PathBuf,
    pub squashed: bool,
    pub model: ExtractedModel,
    pub classes: Vec<JsonFrequencyClass>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<Vec<JsonComparison>>,
}

impl ExtractReport {
    pub fn new(input: &Path, squashed: bool, model: ExtractedModel, partition: &FrequencyPartition) -> Self {
        Self {
            generated_at: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            input: input.to_path_buf(),
            squashed,
            model,
            classes: partition.classes.iter().map(JsonFrequencyClass::from).collect(),
            comparison: None,
        }
    }
}

/// Write JSON output to file
pub fn write_json_output<T: Serialize>(output_path: &Path, value: &T, pretty: bool) -> Result<()> {
    let file = File::create(output_path)
        .with_context(|| format!("Failed to create JSON file: {}", output_path.display()))?;
    let writer = BufWriter::new(file);

    if pretty {
        serde_json::to_writer_pretty(writer, value)?;
    } else {
        serde_json::to_writer(writer, value)?;
    }

    Ok(())
}
