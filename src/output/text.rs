//! Human-readable text output
//!
//! Traces are plain text, one decimal item id per line. Summaries go to a
//! caller-supplied writer so the binary can keep stdout free for the trace.

use crate::extractor::{ExtractedModel, FrequencyPartition};
use crate::policy::MrcPoint;
use crate::stats::TraceSummary;
use crate::ItemId;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

const RULE: &str = "═══════════════════════════════════════════════════════════";

/// Write one id per line to `path`, or stdout when `path` is None
pub fn write_trace(path: Option<&Path>, trace: &[ItemId]) -> Result<()> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create trace file: {}", path.display()))?;
            write_ids(BufWriter::new(file), trace)
                .with_context(|| format!("Failed to write trace file: {}", path.display()))
        }
        None => {
            let stdout = io::stdout();
            write_ids(BufWriter::new(stdout.lock()), trace).context("Failed to write trace to stdout")
        }
    }
}

fn write_ids<W: Write>(mut out: W, trace: &[ItemId]) -> io::Result<()> {
    for item in trace {
        writeln!(out, "{}", item)?;
    }
    out.flush()
}

/// Read a trace written by [`write_trace`]
///
/// Blank lines and lines starting with `#` are skipped.
pub fn read_trace(path: &Path) -> Result<Vec<ItemId>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open trace file: {}", path.display()))?;
    parse_trace(BufReader::new(file))
        .with_context(|| format!("Failed to read trace file: {}", path.display()))
}

fn parse_trace<R: BufRead>(reader: R) -> Result<Vec<ItemId>> {
    let mut trace = Vec::new();
    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let item = line
            .parse::<ItemId>()
            .with_context(|| format!("line {}: invalid item id '{}'", lineno + 1, line))?;
        trace.push(item);
    }
    Ok(trace)
}

/// Print the summary of one generated trace
pub fn print_trace_summary<W: Write>(out: &mut W, seed: u64, summary: &TraceSummary) -> io::Result<()> {
    writeln!(out, "{}", RULE)?;
    writeln!(out, "                    TRACE (seed {})", seed)?;
    writeln!(out, "{}", RULE)?;
    writeln!(out)?;
    writeln!(out, "Accesses:       {}", format_number(summary.length as u64))?;
    writeln!(out, "Distinct items: {}", format_number(summary.distinct_items as u64))?;
    writeln!(out, "Singletons:     {}", format_number(summary.singletons as u64))?;
    if let Some(max) = summary.max_item {
        writeln!(out, "Largest id:     {}", max)?;
    }
    writeln!(out, "Top item share: {:.2}%", summary.top_item_share * 100.0)?;

    if let Some(ref ird) = summary.ird {
        writeln!(out)?;
        writeln!(out, "Inter-reference distance:")?;
        writeln!(out, "  Samples: {} (+{} first references)", format_number(ird.samples), format_number(ird.first_references))?;
        writeln!(out, "  Mean:    {:.2}", ird.mean)?;
        writeln!(out, "  Stddev:  {:.2}", ird.stddev)?;
        writeln!(out, "  Min:     {}", ird.min)?;
        writeln!(out, "  p50:     {}", ird.p50)?;
        writeln!(out, "  p90:     {}", ird.p90)?;
        writeln!(out, "  p99:     {}", ird.p99)?;
        writeln!(out, "  Max:     {}", ird.max)?;
    }
    writeln!(out)
}

/// Print an LRU miss-ratio curve as a two-column table
pub fn print_mrc<W: Write>(out: &mut W, curve: &[MrcPoint]) -> io::Result<()> {
    writeln!(out, "LRU hit rate:")?;
    writeln!(out, "  {:>10}  {:>8}", "capacity", "hit rate")?;
    for point in curve {
        writeln!(out, "  {:>10}  {:>7.2}%", point.capacity, point.hit_rate * 100.0)?;
    }
    writeln!(out)
}

/// Print the model extracted from a trace
pub fn print_model<W: Write>(out: &mut W, model: &ExtractedModel, partition: &FrequencyPartition) -> io::Result<()> {
    writeln!(out, "{}", RULE)?;
    writeln!(out, "                    EXTRACTED MODEL")?;
    writeln!(out, "{}", RULE)?;
    writeln!(out)?;
    writeln!(out, "Accesses:        {}", format_number(model.length as u64))?;
    writeln!(out, "Distinct items:  {}", format_number(model.distinct_items as u64))?;
    writeln!(out, "Active items:    {}", format_number(model.active_items as u64))?;
    writeln!(out, "Singletons:      {:.2}% of items, {:.4} per access", model.singleton_fraction * 100.0, model.singleton_access_rate)?;
    writeln!(out)?;

    let ird = &model.ird;
    writeln!(out, "Inter-reference distance:")?;
    writeln!(out, "  Mean: {:.2}  p50: {}  p90: {}  p99: {}  max: {}", ird.mean, ird.p50, ird.p90, ird.p99, ird.max)?;
    writeln!(out)?;

    let hist = &model.histogram;
    writeln!(out, "IRD histogram ({} bins of {:.1}):", hist.bins(), hist.bin_width)?;
    for (i, p) in hist.pdf().iter().enumerate() {
        let lo = 1.0 + i as f64 * hist.bin_width;
        writeln!(out, "  [{:>10.0}, {:>10.0})  {:>6.2}%  {}", lo, lo + hist.bin_width, p * 100.0, bar(*p))?;
    }
    writeln!(out)?;

    writeln!(out, "Frequency classes:")?;
    for (i, class) in partition.classes.iter().enumerate() {
        writeln!(
            out,
            "  {}: {} items, {}..{} accesses, {} distances",
            i,
            format_number(class.items.len() as u64),
            class.min_count,
            class.max_count,
            format_number(class.distances.len() as u64)
        )?;
    }
    writeln!(out, "  singleton markers: {}", partition.singleton_markers)?;
    writeln!(out)
}

/// Print original vs reconstructed hit rates
pub fn print_comparison<W: Write>(out: &mut W, original: &[MrcPoint], reconstructed: &[MrcPoint]) -> io::Result<()> {
    writeln!(out, "LRU hit rate, original vs reconstructed:")?;
    writeln!(out, "  {:>10}  {:>9}  {:>9}  {:>7}", "capacity", "original", "synthetic", "delta")?;
    for (o, r) in original.iter().zip(reconstructed) {
        writeln!(
            out,
            "  {:>10}  {:>8.2}%  {:>8.2}%  {:>+6.2}%",
            o.capacity,
            o.hit_rate * 100.0,
            r.hit_rate * 100.0,
            (r.hit_rate - o.hit_rate) * 100.0
        )?;
    }
    writeln!(out, "{}", RULE)
}

fn bar(p: f64) -> String {
    "#".repeat((p * 50.0).round() as usize)
}

/// Format a number with thousands separators
fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();

    for (count, c) in s.chars().rev().enumerate() {
        if count > 0 && count % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    result.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::NamedTempFile;

    #[test]
    fn test_trace_file_round_trip() {
        let file = NamedTempFile::new().unwrap();
        let trace = vec![3, 1, 4, 1, 5, 9, 2, 6];
        write_trace(Some(file.path()), &trace).unwrap();

        let contents = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(contents, "3\n1\n4\n1\n5\n9\n2\n6\n");
        assert_eq!(read_trace(file.path()).unwrap(), trace);
    }

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let input = "# block trace\n10\n\n  20 \n# end\n10\n";
        assert_eq!(parse_trace(Cursor::new(input)).unwrap(), vec![10, 20, 10]);
    }

    #[test]
    fn test_parse_reports_bad_line() {
        let err = parse_trace(Cursor::new("1\n2\nabc\n")).unwrap_err();
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn test_read_missing_file() {
        assert!(read_trace(Path::new("/nonexistent/trace.txt")).is_err());
    }

    #[test]
    fn test_print_trace_summary() {
        let summary = TraceSummary::from_trace(&[7, 7, 8]).unwrap();
        let mut out = Vec::new();
        print_trace_summary(&mut out, 42, &summary).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("TRACE (seed 42)"));
        assert!(text.contains("Distinct items: 2"));
        assert!(text.contains("Inter-reference distance"));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
    }
}
