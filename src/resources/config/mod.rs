pub mod environment;
pub mod simulation;

pub use environment::{AtmosphereType, EnvironmentConfig, WindModelConfig};
pub use simulation::{
    AdaptiveConfig, AdaptiveKind, ControllerConfig, InitialCondition, InputRecording,
    SimulationConfig, SolverKind, TrimSettings,
};
