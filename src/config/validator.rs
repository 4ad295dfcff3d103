//! Configuration validation
//!
//! Builds the samplers a configuration describes, so a bad file or command
//! line fails without drawing a single random number.

use super::*;
use crate::error::Error;

/// Validate complete generator configuration
pub fn validate_config(config: &GeneratorConfig) -> Result<()> {
    build_models(config).map(|_| ())
}

/// Validate a configuration and build its IRD and IRM samplers
///
/// Parameter checks live in the sampler constructors; only checks that
/// span several fields are made here.
pub fn build_models(config: &GeneratorConfig) -> Result<(Box<dyn IrdSampler>, Box<dyn IrmSampler>)> {
    if config.items == 0 {
        return Err(Error::config("items (M) must be at least 1"));
    }
    validate_p_irm(config.p_irm)?;
    let ird = validate_ird(&config.ird, config.items)?;
    let irm = validate_irm(&config.irm, config.items)?;
    Ok((ird, irm))
}

/// `p_irm` must be a probability
pub fn validate_p_irm(p_irm: f64) -> Result<()> {
    if !p_irm.is_finite() || !(0.0..=1.0).contains(&p_irm) {
        return Err(Error::config(format!("p_irm must be between 0.0 and 1.0, got {}", p_irm)));
    }
    Ok(())
}

/// Validate IRD parameters by building the sampler
pub fn validate_ird(ird: &IrdConfig, items: u64) -> Result<Box<dyn IrdSampler>> {
    ird.build(items)
}

/// Validate IRM parameters by building the sampler
pub fn validate_irm(irm: &IrmConfig, items: u64) -> Result<Box<dyn IrmSampler>> {
    if let IrmConfig::Empirical { counts } = irm {
        if counts.len() as u64 > items {
            return Err(Error::config(format!(
                "empirical counts cover {} items, more than the footprint of {}",
                counts.len(),
                items
            )));
        }
    }
    irm.build(items)
}
