use std::path::PathBuf;

use thiserror::Error;

/// Failures specific to argument/option handling, as opposed to I/O or
/// decode errors that `anyhow` carries verbatim from their source crates.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("output path {0:?} has no recognised extension (expected .stl or .obj)")]
    UnrecognisedOutputExtension(PathBuf),

    #[error("no output requested: pass an output path, --normal-map, or --shade-path")]
    NothingToWrite,

    #[error("--gamma must be positive, got {0}")]
    NonPositiveGamma(f64),
}
