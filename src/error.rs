//! Errors aborting a run.  All of them are terminal.

use std::{io, path::PathBuf};
use thiserror::Error;

/// Domain constraint violated by a parameter set.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ValidationError {
    #[error("sigma must be > 0 (got {0})")]
    SigmaNotPositive(f64),
    #[error("amplitude must be >= 0 (got {0})")]
    NegativeAmplitude(f64),
}

#[derive(Debug, Error)]
pub enum Error {
    /// Wrong number of command line arguments.
    #[error("usage: {program} <input.txt>")]
    Usage { program: String },
    #[error("could not open input file '{}': {source}", path.display())]
    Input { path: PathBuf, source: io::Error },
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("could not write output file '{}': {source}", path.display())]
    Output { path: PathBuf, source: io::Error },
    #[error("read error: {0}")]
    Read(#[from] io::Error),
    /// A line of an output file that is not of the form "x y".
    #[error("line {line}: cannot parse {content:?} as a sample")]
    Parse { line: usize, content: String },
}

impl Error {
    pub(crate) fn output(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Output { path: path.into(), source }
    }
}
