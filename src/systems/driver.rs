//! Runs a configured simulation: optional trim, then one pass of the selected time advance.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

use crate::components::AircraftConfig;
use crate::resources::{
    AdaptiveConfig, AdaptiveKind, EnvironmentResource, SimulationConfig, SolverKind,
};
use crate::state::TimeSeriesRecord;
use crate::systems::dynamics::{DynamicsModel, RigidBodyDynamics};
use crate::systems::integration::{AdaptiveSolver, IntegrationSupervisor, Stats, Tolerances};
use crate::systems::trim::{TrimResult, Trimmer};
use crate::utils::Result;

/// Everything a run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutput {
    pub record: TimeSeriesRecord,
    pub trim: Option<TrimResult>,
    /// Fixed steps taken, or accepted adaptive steps.
    pub steps: u64,
    /// Adaptive solver diagnostics; `None` for fixed-step runs.
    pub stats: Option<Stats>,
    /// Wall-clock seconds, trim included.
    pub elapsed: f64,
}

impl SimulationOutput {
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}

/// Loads the configured aircraft and runs.
pub fn simulate(config: &SimulationConfig) -> Result<SimulationOutput> {
    let aircraft = AircraftConfig::new(config.aircraft.clone())?;
    run(config, aircraft)
}

/// Builds the rigid-body model for `aircraft`, trims if enabled, and advances to `tf`.
///
/// The config is validated and the solver type resolved before anything else, so a
/// bad value fails without trimming or recording.
pub fn run(config: &SimulationConfig, aircraft: AircraftConfig) -> Result<SimulationOutput> {
    let start = Instant::now();
    config.validate()?;
    config.solver_kind()?;

    let environment = EnvironmentResource::new(&config.environment);
    let model = RigidBodyDynamics::new(aircraft, environment, config.initial.attitude_repr)?;

    let mut initial = config.initial.to_state(model.layout());
    let mut controls = config.initial.controls;
    let trim = if config.trim.enabled {
        let mut trimmer = Trimmer::with_reference(
            &model,
            config.trim.condition,
            config.trim.solver,
            initial.clone(),
        );
        trimmer.calc_trim()?;
        let result = trimmer.into_result()?;
        initial = result.state.clone();
        controls = result.controls;
        Some(result)
    } else {
        None
    };

    let mut supervisor = IntegrationSupervisor::new(Box::new(model), config);
    supervisor.initialize_sim_state(initial)?;
    supervisor.initialize_controller(&config.controller, controls)?;
    let stats = advance(&mut supervisor, config)?;

    Ok(SimulationOutput {
        steps: supervisor.steps(),
        record: supervisor.into_record(),
        trim,
        stats,
        elapsed: start.elapsed().as_secs_f64(),
    })
}

/// Runs an initialized supervisor from `t0` to `tf` with the configured solver.
///
/// `config` must be the one the supervisor was built from. Returns the adaptive
/// solver statistics, or `None` for the fixed-step path.
pub fn advance(
    supervisor: &mut IntegrationSupervisor,
    config: &SimulationConfig,
) -> Result<Option<Stats>> {
    config.validate()?;
    let kind = config.solver_kind()?;
    supervisor.begin_run(config)?;

    info!(
        "Starting {:?} run over [{}, {}]",
        kind, config.t0, config.tf
    );
    let start = Instant::now();

    let outcome = match kind {
        SolverKind::FixedStep => advance_fixed(supervisor, config).map(|_| None),
        SolverKind::Adaptive(AdaptiveKind::DormandPrince45) => {
            let solver = AdaptiveSolver::dormand_prince45(tolerances(&config.adaptive));
            advance_adaptive(solver, supervisor, config).map(Some)
        }
        SolverKind::Adaptive(AdaptiveKind::BogackiShampine23) => {
            let solver = AdaptiveSolver::bogacki_shampine23(tolerances(&config.adaptive));
            advance_adaptive(solver, supervisor, config).map(Some)
        }
    };
    supervisor.finish();
    let stats = outcome?;

    info!(
        "Run finished at t = {:.4} after {} steps in {:.3?}",
        supervisor.time(),
        supervisor.steps(),
        start.elapsed()
    );
    if let Some(stats) = &stats {
        debug!(
            "Solver stats: {} evaluations, {} accepted, {} rejected",
            stats.fn_evals, stats.accepted_steps, stats.rejected_steps
        );
    }
    Ok(stats)
}

fn advance_fixed(supervisor: &mut IntegrationSupervisor, config: &SimulationConfig) -> Result<()> {
    supervisor.reserve(config.fixed_step_count() + 1);

    let mut t = config.t0;
    while config.tf - t > config.epsilon {
        supervisor.sim_step(t)?;
        supervisor.integrate_fe()?;
        t += config.dt;
    }

    // Final point, evaluated for its control
    supervisor.sim_step(t)?;
    supervisor.record_sample()
}

fn advance_adaptive<const S: usize>(
    mut solver: AdaptiveSolver<S>,
    supervisor: &mut IntegrationSupervisor,
    config: &SimulationConfig,
) -> Result<Stats> {
    let adaptive = &config.adaptive;
    solver.initial_step = adaptive.initial_step;
    solver.max_steps = adaptive.max_steps;
    solver.set_step_limits(
        adaptive.min_step,
        adaptive.max_step.unwrap_or(f64::INFINITY),
    );

    let y0 = supervisor.state()?.flatten();
    solver.integrate(supervisor, config.t0, y0, config.tf)?;
    Ok(solver.stats)
}

fn tolerances(adaptive: &AdaptiveConfig) -> Tolerances {
    Tolerances::new(adaptive.rel_tol, adaptive.abs_tol)
}
