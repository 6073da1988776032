mod config;
mod problem;
mod trimmer;

pub use config::{LateralBounds, LongitudinalBounds, TrimCondition, TrimMode, TrimSolverConfig};
pub use problem::{TrimParameters, TrimProblem};
pub use trimmer::{TrimResult, Trimmer};
