//! Conversion of command-line model strings into configuration values

use super::{IrdConfig, IrmConfig};
use crate::distribution::empirical::IrdPreset;
use anyhow::{Context, Result};

/// Parse an IRD model string
///
/// Accepted forms:
/// - `b` to `f`: named presets
/// - `fgen:k:eps:i,j,...`: spike PDF over `k` bins
/// - `intervals:w1,w2,...`: interval mixture weights
/// - `hyperexp:r1,r2,...`: exponential class rates
pub fn parse_ird(s: &str) -> Result<IrdConfig> {
    let s = s.trim();
    if let Ok(name) = s.parse::<IrdPreset>() {
        return Ok(IrdConfig::Preset { name });
    }

    let args: Vec<&str> = s.split(':').collect();
    match args[0] {
        "fgen" => {
            if args.len() != 4 {
                anyhow::bail!("fgen requires 3 arguments: fgen:k:epsilon:spikes");
            }
            let bins: usize = args[1]
                .parse()
                .with_context(|| format!("Invalid bin count in fgen: {}", args[1]))?;
            let eps: f64 = args[2]
                .parse()
                .with_context(|| format!("Invalid epsilon in fgen: {}", args[2]))?;
            let spikes = parse_list::<usize>(args[3], "spike index")?;
            Ok(IrdConfig::Spikes { bins, spikes, eps })
        }
        "intervals" => {
            let weights = parse_list::<f64>(single_arg(&args, s)?, "interval weight")?;
            Ok(IrdConfig::Intervals { weights })
        }
        "hyperexp" => {
            let rates = parse_list::<f64>(single_arg(&args, s)?, "rate")?;
            Ok(IrdConfig::HyperExponential { rates })
        }
        _ => anyhow::bail!("Invalid IRD string: {}", s),
    }
}

/// Parse an IRM model string
///
/// Accepted forms: `zipf:a,n`, `pareto:xm,a`, `normal:mu,sigma`, `uniform`,
/// `uniform:low,high`, `hotcold:r,f`, `sequential`.
pub fn parse_irm(s: &str) -> Result<IrmConfig> {
    let s = s.trim();
    let (kind, params) = match s.split_once(':') {
        Some((kind, params)) => (kind, Some(params)),
        None => (s, None),
    };

    match (kind, params) {
        ("uniform", None) => Ok(IrmConfig::Uniform {
            low: None,
            high: None,
        }),
        ("sequential", None) => Ok(IrmConfig::Sequential),
        ("zipf", Some(p)) => {
            let [a, n] = two_args::<f64>(p, "zipf")?;
            if n.fract() != 0.0 || n < 1.0 {
                anyhow::bail!("Zipf bucket count must be a positive integer, got {}", n);
            }
            Ok(IrmConfig::Zipf {
                a,
                buckets: n as usize,
            })
        }
        ("pareto", Some(p)) => {
            let [xm, a] = two_args::<f64>(p, "pareto")?;
            Ok(IrmConfig::Pareto { xm, a })
        }
        ("normal", Some(p)) => {
            let [mean, std] = two_args::<f64>(p, "normal")?;
            Ok(IrmConfig::Normal { mean, std })
        }
        ("uniform", Some(p)) => {
            let [low, high] = two_args::<u64>(p, "uniform")?;
            Ok(IrmConfig::Uniform {
                low: Some(low),
                high: Some(high),
            })
        }
        ("hotcold", Some(p)) => {
            let [r, f] = two_args::<f64>(p, "hotcold")?;
            Ok(IrmConfig::HotCold { r, f })
        }
        _ => anyhow::bail!("Invalid IRM string: {}", s),
    }
}

fn single_arg<'a>(args: &[&'a str], s: &str) -> Result<&'a str> {
    match args {
        [_, value] => Ok(*value),
        _ => anyhow::bail!("Expected exactly one ':' in {}", s),
    }
}

fn parse_list<T>(s: &str, what: &str) -> Result<Vec<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    s.split(',')
        .map(|v| {
            v.trim()
                .parse::<T>()
                .with_context(|| format!("Invalid {}: {}", what, v))
        })
        .collect()
}

fn two_args<T>(s: &str, kind: &str) -> Result<[T; 2]>
where
    T: std::str::FromStr + Copy,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let values = parse_list::<T>(s, kind)?;
    match values.as_slice() {
        [a, b] => Ok([*a, *b]),
        _ => anyhow::bail!("{} requires 2 arguments, got {}", kind, values.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ird_presets() {
        for (s, preset) in [("b", IrdPreset::B), ("d", IrdPreset::D), ("f", IrdPreset::F)] {
            assert_eq!(parse_ird(s).unwrap(), IrdConfig::Preset { name: preset });
        }
    }

    #[test]
    fn test_parse_ird_fgen() {
        let config = parse_ird("fgen:10000:0.00001:3,5,10,20").unwrap();
        assert_eq!(
            config,
            IrdConfig::Spikes {
                bins: 10000,
                spikes: vec![3, 5, 10, 20],
                eps: 0.00001,
            }
        );
        assert!(parse_ird("fgen:10:0.1").is_err());
        assert!(parse_ird("fgen:ten:0.1:1").is_err());
    }

    #[test]
    fn test_parse_ird_intervals() {
        let config = parse_ird("intervals:0.8,0.0001,0.1999").unwrap();
        assert_eq!(
            config,
            IrdConfig::Intervals {
                weights: vec![0.8, 0.0001, 0.1999]
            }
        );
        assert_eq!(
            parse_ird("hyperexp:0.5,0.05").unwrap(),
            IrdConfig::HyperExponential {
                rates: vec![0.5, 0.05]
            }
        );
        assert!(parse_ird("g").is_err());
    }

    #[test]
    fn test_parse_irm() {
        assert_eq!(
            parse_irm("zipf:1.2,20").unwrap(),
            IrmConfig::Zipf { a: 1.2, buckets: 20 }
        );
        assert_eq!(
            parse_irm("pareto:1,1.5").unwrap(),
            IrmConfig::Pareto { xm: 1.0, a: 1.5 }
        );
        assert_eq!(
            parse_irm("normal:50,10").unwrap(),
            IrmConfig::Normal { mean: 50.0, std: 10.0 }
        );
        assert_eq!(
            parse_irm("uniform").unwrap(),
            IrmConfig::Uniform { low: None, high: None }
        );
        assert_eq!(
            parse_irm("uniform:10,20").unwrap(),
            IrmConfig::Uniform {
                low: Some(10),
                high: Some(20)
            }
        );
        assert_eq!(parse_irm("hotcold:0.8,0.2").unwrap(), IrmConfig::HotCold { r: 0.8, f: 0.2 });
        assert_eq!(parse_irm("sequential").unwrap(), IrmConfig::Sequential);
    }

    #[test]
    fn test_parse_irm_errors() {
        assert!(parse_irm("zipf:1.2").is_err());
        assert!(parse_irm("zipf:1.2,2.5").is_err());
        assert!(parse_irm("pareto:1,2,3").is_err());
        assert!(parse_irm("lognormal:1,2").is_err());
        assert!(parse_irm("zipf").is_err());
    }
}
