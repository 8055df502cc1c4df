//! Error types for diffsim-rs.
//!
//! Every fallible operation in the crate returns [`Result`]. The three
//! categories that matter to callers of the numerical core are:
//!
//! - [`DiffsimError::LengthMismatch`]: two vectors that must agree in length
//!   do not. Always surfaced immediately.
//! - [`DiffsimError::StabilityFailure`]: the explicit integrator diverged.
//!   The parameter search records and skips these; single runs surface them.
//! - [`DiffsimError::EmptyInput`]: a zero-length vector reached the core.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiffsimError {
    #[error("length mismatch in {context}: expected {expected}, got {actual}")]
    LengthMismatch {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error(
        "simulation unstable at step {step} (position {position}, C = {value}) \
         with dt = {dt} s, dx = {dx} m, r = {drift}, cv_factor = {cv_factor}"
    )]
    StabilityFailure {
        step: usize,
        position: usize,
        value: f64,
        dt: f64,
        dx: f64,
        drift: f64,
        cv_factor: f64,
    },

    #[error("empty input: {0}")]
    EmptyInput(&'static str),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("worker pool error: {0}")]
    ThreadPool(String),

    #[error("missing data: {0}")]
    MissingData(String),

    #[error("parse error in {path} line {line}: {message}")]
    Parse {
        path: String,
        line: usize,
        message: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl DiffsimError {
    /// Shorthand for a [`DiffsimError::LengthMismatch`].
    pub fn length_mismatch(context: &'static str, expected: usize, actual: usize) -> Self {
        Self::LengthMismatch {
            context,
            expected,
            actual,
        }
    }

    /// True for numerical divergence reported by the solver.
    pub fn is_stability_failure(&self) -> bool {
        matches!(self, Self::StabilityFailure { .. })
    }
}

pub type Result<T> = std::result::Result<T, DiffsimError>;
