//! TOML configuration file parsing

use super::*;
use crate::config::cli::GenerateArgs;
use crate::config::cli_convert::{parse_ird, parse_irm};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Parse TOML configuration file
pub fn parse_toml_file(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_toml_string(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse TOML configuration from string
pub fn parse_toml_string(contents: &str) -> Result<Config> {
    let config: Config = ::toml::from_str(contents)
        .context("Failed to parse TOML configuration")?;

    Ok(config)
}

/// Serialize a configuration back to TOML
pub fn to_toml_string(config: &Config) -> Result<String> {
    ::toml::to_string(config).context("Failed to serialize configuration")
}

/// Merge CLI arguments with TOML configuration (CLI takes precedence)
pub fn merge_cli_with_config(args: &GenerateArgs, mut config: Config) -> Result<Config> {
    // Override generator settings
    if let Some(items) = args.items {
        config.generator.items = items;
    }
    if let Some(length) = args.length {
        config.generator.length = length;
    }
    if let Some(p_irm) = args.p_irm {
        config.generator.p_irm = p_irm;
    }
    if let Some(seed) = args.seed {
        config.generator.seed = seed;
    }

    // Override models
    if let Some(ref ird) = args.ird {
        config.generator.ird = parse_ird(ird)?;
    }
    if let Some(ref irm) = args.irm {
        config.generator.irm = parse_irm(irm)?;
    }

    // Override output settings
    if let Some(ref path) = args.output {
        config.output.trace = Some(path.clone());
    }
    if let Some(ref path) = args.json {
        config.output.json = Some(path.clone());
    }
    if let Some(points) = args.mrc {
        config.output.mrc_points = Some(points);
    }
    if let Some(ref path) = args.steps {
        config.output.steps = Some(path.clone());
    }

    Ok(config)
}

/// Load the configuration file if one was given, then apply CLI overrides
pub fn load_config(args: &GenerateArgs) -> Result<Config> {
    let base = match args.config {
        Some(ref path) => parse_toml_file(path)?,
        None => Config::default(),
    };
    merge_cli_with_config(args, base)
}
