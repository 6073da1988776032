//! Time-domain simulation of a rigid-body aircraft: trim to an equilibrium, then advance
//! the state with forward Euler or an adaptive Runge-Kutta solver and record the series.

pub mod components;
pub mod resources;
pub mod state;
pub mod systems;
pub mod utils;

pub use components::{AircraftConfig, AircraftSource, AircraftType};
pub use resources::{SimulationConfig, SolverKind};
pub use state::{ControlVector, StateLayout, TimeSeriesRecord, VehicleState};
pub use systems::{run, simulate, SimulationOutput};
pub use utils::{Result, SimError};
