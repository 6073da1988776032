//! Embedded Runge-Kutta solvers with adaptive step-size control.
//!
//! The solver only sees flat vectors; the system being integrated supplies the
//! derivative and receives every accepted step through [`OdeSystem::output`].

mod solver;
mod tableau;

pub use solver::{AdaptiveSolver, Stats, StepController};
pub use tableau::ButcherTableau;

use nalgebra::DVector;
use serde::{Deserialize, Serialize};
use std::ops::ControlFlow;
use thiserror::Error;

use crate::utils::Result;

/// Position of an output callback within an integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFlag {
    /// The initial condition, before the first step.
    Init,
    /// An accepted step.
    Step,
    /// Integration finished; carries the final accepted point again.
    Done,
}

/// System of ordinary differential equations dy/dt = f(t, y), with an accepted-step hook.
pub trait OdeSystem {
    /// Evaluate the right-hand side. May be called at rejected or intermediate stages.
    fn derivative(&mut self, t: f64, y: &DVector<f64>) -> Result<DVector<f64>>;

    /// Called at the start, after every accepted step and at the end.
    /// Returning `Break` stops the integration after the current step.
    fn output(&mut self, t: f64, y: &DVector<f64>, flag: OutputFlag) -> Result<ControlFlow<()>>;
}

/// Mixed error tolerance: a component passes when `|err| <= abs_tol + rel_tol * |y|`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerances {
    pub rel_tol: f64,
    pub abs_tol: f64,
}

impl Tolerances {
    pub fn new(rel_tol: f64, abs_tol: f64) -> Self {
        Self { rel_tol, abs_tol }
    }
}

impl Default for Tolerances {
    fn default() -> Self {
        Self::new(1e-3, 1e-6)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum IntegrationError {
    #[error("Step size {h:e} at t = {t} is below the minimum step")]
    StepSizeTooSmall { t: f64, h: f64 },
    #[error("Solver produced a non-finite state at t = {t}")]
    NonFiniteState { t: f64 },
    #[error("Exceeded {max_steps} steps at t = {t}")]
    MaxStepsExceeded { max_steps: u64, t: f64 },
    #[error("Invalid integration span [{t0}, {tf}]")]
    InvalidSpan { t0: f64, tf: f64 },
    #[error("Invalid tolerances: {0}")]
    InvalidTolerance(String),
}
