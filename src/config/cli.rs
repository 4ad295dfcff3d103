//! CLI argument parsing using clap

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// tracegen - synthetic cache trace generator and model extractor
#[derive(Parser, Debug)]
#[command(name = "tracegen")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Trace-level logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a synthetic trace
    Generate(GenerateArgs),
    /// Extract IRD/IRM statistics from a trace file
    Extract(ExtractArgs),
}

#[derive(Args, Debug, Default, Clone)]
pub struct GenerateArgs {
    /// TOML configuration file (command-line values take precedence)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Footprint size (number of unique addresses)
    #[arg(short = 'm', long = "addresses")]
    pub items: Option<u64>,

    /// Length of trace (in addresses)
    #[arg(short = 'n', long)]
    pub length: Option<usize>,

    /// Probability that an access is IRM (0.0-1.0)
    #[arg(short = 'p', long)]
    pub p_irm: Option<f64>,

    /// IRD distribution: b to f, fgen:k:eps:i,j,..., intervals:w1,w2,...
    /// or hyperexp:r1,r2,...
    #[arg(short = 'f', long)]
    pub ird: Option<String>,

    /// IRM distribution: zipf:a,n, pareto:xm,a, normal:mu,sigma, uniform,
    /// hotcold:r,f or sequential
    #[arg(short = 'g', long)]
    pub irm: Option<String>,

    /// RNG seed
    #[arg(short = 's', long)]
    pub seed: Option<u64>,

    /// Write the trace to a file instead of stdout
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Write a JSON summary
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Compute an LRU miss-ratio curve with N capacities
    #[arg(long, value_name = "N")]
    pub mrc: Option<usize>,

    /// Write per-step diagnostics (source, IRD sample, drift) as JSON
    #[arg(long)]
    pub steps: Option<PathBuf>,

    /// Generate this many traces in parallel with seeds seed, seed+1, ...
    #[arg(long, default_value = "1")]
    pub runs: usize,
}

#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    /// Trace file, one item id per line
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Number of IRD histogram bins
    #[arg(long, default_value = "20")]
    pub bins: usize,

    /// Number of frequency classes for the partitioned IRD
    #[arg(long, default_value = "4")]
    pub classes: usize,

    /// Compact item ids to 0..distinct before extraction
    #[arg(long)]
    pub squash: bool,

    /// Re-synthesize the trace and compare LRU miss-ratio curves at N capacities
    #[arg(long, value_name = "N")]
    pub compare: Option<usize>,

    /// IRM share used when re-synthesizing
    #[arg(long, default_value = "0.0")]
    pub p_irm: f64,

    /// RNG seed used when re-synthesizing
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Write the extracted model as JSON
    #[arg(long)]
    pub json: Option<PathBuf>,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate CLI arguments
    pub fn validate(&self) -> anyhow::Result<()> {
        match &self.command {
            Command::Generate(args) => args.validate(),
            Command::Extract(args) => args.validate(),
        }
    }
}

impl GenerateArgs {
    pub fn validate(&self) -> anyhow::Result<()> {
        if let Some(p) = self.p_irm {
            if !(0.0..=1.0).contains(&p) {
                anyhow::bail!("p_irm must be between 0.0 and 1.0");
            }
        }
        if self.items == Some(0) {
            anyhow::bail!("addresses must be at least 1");
        }
        if self.runs == 0 {
            anyhow::bail!("runs must be at least 1");
        }
        if self.mrc == Some(0) {
            anyhow::bail!("mrc needs at least one capacity");
        }
        if self.runs > 1 && self.steps.is_some() {
            anyhow::bail!("--steps only works with a single run");
        }
        Ok(())
    }
}

impl ExtractArgs {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.bins == 0 {
            anyhow::bail!("bins must be at least 1");
        }
        if self.classes == 0 {
            anyhow::bail!("classes must be at least 1");
        }
        if !(0.0..=1.0).contains(&self.p_irm) {
            anyhow::bail!("p_irm must be between 0.0 and 1.0");
        }
        if self.compare == Some(0) {
            anyhow::bail!("compare needs at least one capacity");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_generate_flags() {
        let cli = Cli::try_parse_from([
            "tracegen", "generate", "-m", "100", "-n", "10000", "-p", "0.25", "-f", "c", "-g",
            "pareto:1,1.5", "-s", "7",
        ])
        .unwrap();

        match cli.command {
            Command::Generate(args) => {
                assert_eq!(args.items, Some(100));
                assert_eq!(args.length, Some(10_000));
                assert_eq!(args.p_irm, Some(0.25));
                assert_eq!(args.ird.as_deref(), Some("c"));
                assert_eq!(args.irm.as_deref(), Some("pareto:1,1.5"));
                assert_eq!(args.seed, Some(7));
                assert_eq!(args.runs, 1);
                assert!(args.validate().is_ok());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_extract_flags() {
        let cli = Cli::try_parse_from(["tracegen", "-v", "extract", "trace.txt", "--bins", "50"])
            .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Command::Extract(args) => {
                assert_eq!(args.input, PathBuf::from("trace.txt"));
                assert_eq!(args.bins, 50);
                assert_eq!(args.classes, 4);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_validate_generate_args() {
        let args = GenerateArgs {
            p_irm: Some(1.5),
            runs: 1,
            ..Default::default()
        };
        assert!(args.validate().is_err());

        let args = GenerateArgs {
            runs: 0,
            ..Default::default()
        };
        assert!(args.validate().is_err());
    }
}
