pub mod config;
mod environment;

pub use config::{
    AdaptiveConfig, AdaptiveKind, AtmosphereType, ControllerConfig, EnvironmentConfig,
    InitialCondition, InputRecording, SimulationConfig, SolverKind, TrimSettings,
    WindModelConfig,
};
pub use environment::EnvironmentResource;
