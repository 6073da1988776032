use flysim::{
    resources::{ControllerConfig, SimulationConfig},
    state::{ControlVector, VehicleState},
    systems::{advance, dynamics::DynamicsModel, IntegrationSupervisor, Stats},
};
use std::io::Write;
use tempfile::NamedTempFile;

/// Supervisor with `initial` bound and a static controller holding `controls`.
pub fn ready_supervisor<M: DynamicsModel + 'static>(
    model: M,
    config: &SimulationConfig,
    initial: VehicleState,
    controls: ControlVector,
) -> IntegrationSupervisor {
    let mut supervisor = IntegrationSupervisor::new(Box::new(model), config);
    supervisor
        .initialize_sim_state(initial)
        .expect("initial state matches the model layout");
    supervisor
        .initialize_controller(&ControllerConfig::Static, controls)
        .expect("controller binds after the state");
    supervisor
}

/// Runs `model` from rest (in its own layout) to `config.tf`.
pub fn run_from_rest<M: DynamicsModel + 'static>(
    model: M,
    config: &SimulationConfig,
) -> (IntegrationSupervisor, Option<Stats>) {
    let initial = VehicleState::new(model.layout());
    let mut supervisor = ready_supervisor(model, config, initial, ControlVector::default());
    let stats = advance(&mut supervisor, config).expect("run completes");
    (supervisor, stats)
}

/// Writes `contents` to a temporary `.yaml` file kept alive by the returned handle.
pub fn write_temp_yaml(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".yaml")
        .tempfile()
        .expect("temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file.flush().expect("flush temp file");
    file
}
