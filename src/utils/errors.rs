use std::io;
use thiserror::Error;

use crate::systems::IntegrationError;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("State shape mismatch: expected {expected} values, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("{0} requested before calc_trim() converged")]
    NotYetComputed(&'static str),

    #[error("Trim search did not converge after {iterations} iterations (residual {residual:.3e})")]
    TrimDivergence { residual: f64, iterations: u64 },

    #[error("No derivative evaluated at t = {time} (last evaluation: {evaluated:?})")]
    StaleDerivative { time: f64, evaluated: Option<f64> },

    #[error("Unsupported solver type: {0}")]
    UnsupportedSolverType(i64),

    #[error("Called out of sequence: {0}")]
    OutOfSequence(&'static str),

    #[error("Time series must be strictly increasing: last t = {last}, attempted t = {attempted}")]
    NonMonotonicRecord { last: f64, attempted: f64 },

    #[error("Integration error: {0}")]
    Integration(#[from] IntegrationError),

    #[error("Config error: {0}")]
    InvalidConfig(String),

    #[error("Optimizer error: {0}")]
    Optimizer(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// argmin reports through anyhow, which is not a std error
impl From<argmin::core::Error> for SimError {
    fn from(err: argmin::core::Error) -> Self {
        SimError::Optimizer(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
