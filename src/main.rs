//! tracegen CLI entry point

use anyhow::{Context, Result};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracegen::config::cli::{Cli, Command, ExtractArgs, GenerateArgs};
use tracegen::config::toml::load_config;
use tracegen::config::Config;
use tracegen::distance::squash;
use tracegen::extractor::EmpiricalExtractor;
use tracegen::generator::{generate_batch, TraceGenerator};
use tracegen::output::json::{write_json_output, ExtractReport, GenerateReport, JsonComparison, JsonRun};
use tracegen::output::text;
use tracegen::policy::{capacity_points, miss_ratio_curve};
use tracegen::stats::TraceSummary;
use tracegen::ItemId;
use tracing::Level;

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    cli.validate()?;
    init_logging(&cli);

    // stdout may carry the trace itself
    eprintln!("tracegen v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("Synthetic cache trace generator");
    eprintln!();

    match cli.command {
        Command::Generate(ref args) => run_generate(args),
        Command::Extract(ref args) => run_extract(args),
    }
}

fn init_logging(cli: &Cli) {
    let level = if cli.debug {
        Level::TRACE
    } else if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Human-readable reports go to stdout unless the trace does
fn report_writer(trace_on_stdout: bool) -> Box<dyn Write> {
    if trace_on_stdout {
        Box::new(io::stderr())
    } else {
        Box::new(io::stdout())
    }
}

fn run_generate(args: &GenerateArgs) -> Result<()> {
    let config = load_config(args).context("Failed to build configuration")?;

    let runs = args.runs;
    if runs > 1 && config.output.trace.is_none() {
        anyhow::bail!("--runs > 1 needs an output file (-o)");
    }

    print_configuration(&config, runs);

    let gen_config = &config.generator;
    let mut report = GenerateReport::new(gen_config);
    let mut out = report_writer(config.output.trace.is_none());

    let seeds: Vec<u64> = (0..runs as u64).map(|i| gen_config.seed.wrapping_add(i)).collect();
    let traces = if runs == 1 {
        let mut generator =
            TraceGenerator::from_config(gen_config).context("Configuration validation failed")?;
        let trace = match config.output.steps {
            Some(ref path) => {
                let verbose = generator.generate_verbose(gen_config.length)?;
                write_json_output(path, &verbose, false)
                    .with_context(|| format!("Failed to write steps: {}", path.display()))?;
                tracing::info!(path = %path.display(), irm_share = verbose.irm_share(), "wrote per-step diagnostics");
                verbose.items()
            }
            None => generator.generate(gen_config.length)?,
        };
        vec![trace]
    } else {
        generate_batch(gen_config, &seeds, gen_config.length).context("Batch generation failed")?
    };

    for (&seed, trace) in seeds.iter().zip(&traces) {
        let path = trace_path(config.output.trace.as_deref(), seed, runs);
        text::write_trace(path.as_deref(), trace)?;

        let summary = TraceSummary::from_trace(trace)?;
        text::print_trace_summary(&mut out, seed, &summary)?;

        let mrc = match config.output.mrc_points {
            Some(points) => {
                let capacities = capacity_points(summary.distinct_items, points);
                let curve = miss_ratio_curve(trace, &capacities)?;
                text::print_mrc(&mut out, &curve)?;
                Some(curve)
            }
            None => None,
        };

        report.runs.push(JsonRun {
            seed,
            trace: path,
            summary,
            mrc,
        });
    }

    if let Some(ref path) = config.output.json {
        write_json_output(path, &report, true)?;
        writeln!(out, "JSON report written to {}", path.display())?;
    }

    Ok(())
}

/// `base` for a single run, `base.<seed>` per run otherwise
fn trace_path(base: Option<&Path>, seed: u64, runs: usize) -> Option<PathBuf> {
    let base = base?;
    if runs == 1 {
        return Some(base.to_path_buf());
    }
    let mut name = base.as_os_str().to_os_string();
    name.push(format!(".{}", seed));
    Some(PathBuf::from(name))
}

fn run_extract(args: &ExtractArgs) -> Result<()> {
    let mut trace: Vec<ItemId> = text::read_trace(&args.input)?;
    tracing::info!(path = %args.input.display(), length = trace.len(), "read trace");
    if args.squash {
        trace = squash(&trace);
    }

    let extractor = EmpiricalExtractor::new(trace)
        .with_context(|| format!("Cannot extract a model from {}", args.input.display()))?;
    let model = extractor.model(args.bins)?;
    let partition = extractor.frequency_partition(class_count(&extractor, args.classes))?;

    let mut out = io::stdout();
    text::print_model(&mut out, &model, &partition)?;

    let mut report = ExtractReport::new(&args.input, args.squash, model, &partition);

    if let Some(points) = args.compare {
        let mut generator = extractor.reconstruct(args.p_irm, args.seed)?;
        let synthetic = generator.generate(extractor.len())?;

        let capacities = capacity_points(generator.items() as usize, points);
        let original = miss_ratio_curve(extractor.trace(), &capacities)?;
        let reconstructed = miss_ratio_curve(&synthetic, &capacities)?;
        text::print_comparison(&mut out, &original, &reconstructed)?;
        report.comparison = Some(JsonComparison::from_curves(&original, &reconstructed));
    }

    if let Some(ref path) = args.json {
        write_json_output(path, &report, true)?;
        writeln!(out, "JSON report written to {}", path.display())?;
    }

    Ok(())
}

/// `requested` frequency classes, capped at the number of repeated items
fn class_count(extractor: &EmpiricalExtractor, requested: usize) -> usize {
    let counts = extractor.item_counts();
    let repeated = counts.len() - counts.singletons();
    if repeated < requested {
        tracing::warn!(requested, repeated, "fewer repeated items than frequency classes");
    }
    requested.min(repeated).max(1)
}

fn print_configuration(config: &Config, runs: usize) {
    let gen = &config.generator;
    eprintln!("Configuration:");
    eprintln!("  Items:  {}", gen.items);
    eprintln!("  Length: {}", gen.length);
    eprintln!("  p_irm:  {}", gen.p_irm);
    eprintln!("  IRD:    {}", gen.ird);
    eprintln!("  IRM:    {}", gen.irm);
    if runs > 1 {
        eprintln!("  Seeds:  {}..{}", gen.seed, gen.seed.wrapping_add(runs as u64 - 1));
    } else {
        eprintln!("  Seed:   {}", gen.seed);
    }
    match config.output.trace {
        Some(ref path) => eprintln!("  Output: {}", path.display()),
        None => eprintln!("  Output: stdout"),
    }
    eprintln!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_path_per_seed() {
        let base = Path::new("out/trace.txt");
        assert_eq!(trace_path(Some(base), 7, 1), Some(PathBuf::from("out/trace.txt")));
        assert_eq!(trace_path(Some(base), 7, 3), Some(PathBuf::from("out/trace.txt.7")));
        assert_eq!(trace_path(None, 7, 3), None);
    }

    #[test]
    fn test_class_count_capped_by_repeated_items() {
        let extractor = EmpiricalExtractor::new(vec![1, 2, 1, 2, 3, 1, 2]).unwrap();
        assert!(extractor.model(20).is_ok());

        let classes = class_count(&extractor, 4);
        assert_eq!(classes, 2);
        let partition = extractor.frequency_partition(classes).unwrap();
        assert_eq!(partition.classes.len(), 2);

        assert_eq!(class_count(&extractor, 1), 1);
    }
}
