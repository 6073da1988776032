pub mod ode;
mod supervisor;

pub use ode::{
    AdaptiveSolver, ButcherTableau, IntegrationError, OdeSystem, OutputFlag, Stats, Tolerances,
};
pub use supervisor::IntegrationSupervisor;
