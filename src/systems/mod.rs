pub mod control;
pub mod driver;
pub mod dynamics;
pub mod integration;
pub mod trim;

pub use control::{Controller, FeedbackController, FeedbackGains, StaticController};
pub use driver::{advance, run, simulate, SimulationOutput};
pub use dynamics::{DynamicsModel, DynamicsOutput, RigidBodyDynamics};
pub use integration::{
    AdaptiveSolver, IntegrationError, IntegrationSupervisor, OdeSystem, OutputFlag, Stats,
    Tolerances,
};
pub use trim::{TrimCondition, TrimMode, TrimResult, TrimSolverConfig, Trimmer};
