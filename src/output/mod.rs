//! Trace files and reports

pub mod json;
pub mod text;
