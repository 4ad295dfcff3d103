//! tracegen - synthetic cache trace generation and model extraction
//!
//! tracegen produces item-access traces for cache replacement evaluators and
//! derives, from a real trace, the parameters that reproduce its pattern.
//!
//! # Architecture
//!
//! - **Distributions**: IRD (reference locality) and IRM (popularity) samplers
//! - **Renewal scheduler**: min-heap of next-due times, one entry per live item
//! - **Generator**: mixes both models with probability `p_irm`
//! - **Extractor**: counts, frequency CDF, singleton stats and IRD histograms
//! - **Reference LRU**: hit rates and miss-ratio curves to check a trace

pub mod config;
pub mod distance;
pub mod distribution;
pub mod error;
pub mod extractor;
pub mod generator;
pub mod output;
pub mod policy;
pub mod scheduler;
pub mod stats;

// Re-export commonly used types
pub use config::GeneratorConfig;
pub use error::{Error, Result};
pub use extractor::EmpiricalExtractor;
pub use generator::TraceGenerator;

/// Identifier of one cached item
pub type ItemId = u64;
