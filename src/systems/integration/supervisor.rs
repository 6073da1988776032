use nalgebra::DVector;
use std::ops::ControlFlow;
use tracing::{debug, warn};

use super::ode::{OdeSystem, OutputFlag};
use crate::resources::{ControllerConfig, InputRecording, SimulationConfig};
use crate::state::{ControlVector, TimeSeriesRecord, VehicleState};
use crate::systems::control::{Controller, FeedbackController, StaticController};
use crate::systems::dynamics::{DynamicsModel, DynamicsOutput};
use crate::utils::{Result, SimError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Created,
    StateReady,
    Ready,
    Running,
    Finished,
}

/// Evaluation cached by `sim_step` for the following `integrate_fe`.
#[derive(Debug, Clone)]
struct StepCache {
    time: f64,
    control: ControlVector,
    output: DynamicsOutput,
}

/// Owns the state, model, controller and recorded series of one run.
///
/// Lifecycle: `initialize_sim_state`, then `initialize_controller` (or
/// `bind_controller`), then either fixed steps (`sim_step` + `integrate_fe`) or an
/// adaptive solver driving the [`OdeSystem`] impl.
pub struct IntegrationSupervisor {
    model: Box<dyn DynamicsModel>,
    controller: Option<Box<dyn Controller>>,
    state: Option<VehicleState>,
    time: f64,
    dt: f64,
    record_states: bool,
    record_inputs: bool,
    input_recording: InputRecording,
    record: TimeSeriesRecord,
    cache: Option<StepCache>,
    phase: Phase,
    steps: u64,
    side_channel_warned: bool,
}

impl IntegrationSupervisor {
    pub fn new(model: Box<dyn DynamicsModel>, config: &SimulationConfig) -> Self {
        Self {
            model,
            controller: None,
            state: None,
            time: config.t0,
            dt: config.dt,
            record_states: config.record_states,
            record_inputs: config.record_inputs,
            input_recording: config.adaptive.input_recording,
            record: TimeSeriesRecord::default(),
            cache: None,
            phase: Phase::Created,
            steps: 0,
            side_channel_warned: false,
        }
    }

    /// Pre-size both series for `samples` entries.
    pub fn reserve(&mut self, samples: usize) {
        if self.record.states.is_empty() && self.record.inputs.is_empty() {
            self.record = TimeSeriesRecord::with_capacity(samples);
        }
    }

    pub fn initialize_sim_state(&mut self, initial: VehicleState) -> Result<()> {
        if self.phase != Phase::Created {
            return Err(SimError::OutOfSequence("simulation state already initialized"));
        }
        let layout = self.model.layout();
        if initial.layout() != layout {
            return Err(SimError::ShapeMismatch {
                expected: layout.dimension(),
                actual: initial.layout().dimension(),
            });
        }
        debug!("Initial state at t = {}: {:?}", self.time, initial);
        self.state = Some(initial);
        self.phase = Phase::StateReady;
        Ok(())
    }

    /// Binds the configured controller around `reference` controls (the trim or
    /// initial controls). Feedback laws take the current state as their reference.
    pub fn initialize_controller(
        &mut self,
        config: &ControllerConfig,
        reference: ControlVector,
    ) -> Result<()> {
        let controller: Box<dyn Controller> = match config {
            ControllerConfig::Static => Box::new(StaticController::new(reference)),
            ControllerConfig::Feedback { gains } => {
                let reference_state = self.state()?.clone();
                Box::new(FeedbackController::new(reference_state, reference, *gains))
            }
        };
        self.bind_controller(controller)
    }

    pub fn bind_controller(&mut self, controller: Box<dyn Controller>) -> Result<()> {
        match self.phase {
            Phase::StateReady => {
                self.controller = Some(controller);
                self.phase = Phase::Ready;
                Ok(())
            }
            Phase::Created => Err(SimError::OutOfSequence(
                "controller bound before the simulation state",
            )),
            _ => Err(SimError::OutOfSequence("controller already bound")),
        }
    }

    /// Marks the start of the single run this supervisor is allowed. `config` must
    /// agree with the one the supervisor was built from.
    pub fn begin_run(&mut self, config: &SimulationConfig) -> Result<()> {
        match self.phase {
            Phase::Ready => {
                self.check_config(config)?;
                self.phase = Phase::Running;
                Ok(())
            }
            Phase::Running | Phase::Finished => {
                Err(SimError::OutOfSequence("supervisor has already run"))
            }
            _ => Err(SimError::OutOfSequence("supervisor is not initialized")),
        }
    }

    fn check_config(&self, config: &SimulationConfig) -> Result<()> {
        let matches = config.t0 == self.time
            && config.dt == self.dt
            && config.record_states == self.record_states
            && config.record_inputs == self.record_inputs
            && config.adaptive.input_recording == self.input_recording;
        if matches {
            Ok(())
        } else {
            Err(SimError::InvalidConfig(
                "run config differs from the one the supervisor was built with".to_string(),
            ))
        }
    }

    pub fn finish(&mut self) {
        self.phase = Phase::Finished;
        self.cache = None;
    }

    /// Evaluates controller and model at the current state and caches the result.
    pub fn sim_step(&mut self, t: f64) -> Result<&DynamicsOutput> {
        self.ensure_steppable()?;
        let (control, output) = {
            let state = self.state()?;
            let controller = self.controller()?;
            let control = controller.compute(state, t);
            let output = self.model.evaluate(state, &control, t)?;
            (control, output)
        };
        let cache = self.cache.insert(StepCache {
            time: t,
            control,
            output,
        });
        Ok(&cache.output)
    }

    /// Forward Euler step `x + dt * x_dot` from the derivative cached at the current time.
    ///
    /// Records the evaluated pair `(t_n, x_n)`, `(t_n, u_n)` before advancing.
    pub fn integrate_fe(&mut self) -> Result<()> {
        self.ensure_steppable()?;
        let cache = match self.cache.take() {
            Some(cache) if cache.time == self.time => cache,
            stale => {
                return Err(SimError::StaleDerivative {
                    time: self.time,
                    evaluated: stale.map(|c| c.time),
                })
            }
        };

        let state = self.state()?;
        let next = state.advanced(&cache.output.derivative, self.dt)?;
        let flattened = state.flatten();
        self.record_pair(cache.time, &flattened, cache.control)?;

        self.state = Some(next);
        self.time = cache.time + self.dt;
        self.steps += 1;
        Ok(())
    }

    /// Records the current state with the control from a fresh `sim_step`.
    pub fn record_sample(&mut self) -> Result<()> {
        let control = match &self.cache {
            Some(cache) if cache.time == self.time => cache.control,
            stale => {
                return Err(SimError::StaleDerivative {
                    time: self.time,
                    evaluated: stale.as_ref().map(|c| c.time),
                })
            }
        };
        let flattened = self.state()?.flatten();
        self.record_pair(self.time, &flattened, control)
    }

    /// Derivative for a solver-proposed `(t, y)`. The authoritative state is untouched.
    pub fn ode_eval(&mut self, t: f64, y: &DVector<f64>) -> Result<DVector<f64>> {
        self.ensure_steppable()?;
        let state = VehicleState::unflatten(&self.model.layout(), y.as_slice())?;
        let control = self.controller()?.compute(&state, t);
        let output = self.model.evaluate(&state, &control, t)?;

        if self.record_inputs && self.input_recording == InputRecording::Evaluations {
            if !self.side_channel_warned {
                warn!(
                    "Recording inputs from derivative evaluations: the input series includes \
                     rejected and intermediate stages and will not align with the states"
                );
                self.side_channel_warned = true;
            }
            self.record.inputs.push_if_newer(t, control);
        }

        Ok(output.derivative.flatten())
    }

    /// Accepted-step callback. Records `(t, y)` and commits it as the current state.
    pub fn ode_output_fcn(
        &mut self,
        t: f64,
        y: &DVector<f64>,
        flag: OutputFlag,
    ) -> Result<ControlFlow<()>> {
        self.ensure_steppable()?;
        let state = VehicleState::unflatten(&self.model.layout(), y.as_slice())?;

        if matches!(flag, OutputFlag::Init | OutputFlag::Step) {
            if self.record_states {
                self.record.states.push(t, y.as_slice().to_vec())?;
            }
            if self.record_inputs && self.input_recording == InputRecording::AcceptedSteps {
                let control = self.controller()?.compute(&state, t);
                self.record.inputs.push(t, control)?;
            }
            if flag == OutputFlag::Step {
                self.steps += 1;
            }
        }

        self.state = Some(state);
        self.time = t;
        Ok(ControlFlow::Continue(()))
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn state(&self) -> Result<&VehicleState> {
        self.state
            .as_ref()
            .ok_or(SimError::OutOfSequence("simulation state not initialized"))
    }

    /// Completed fixed steps or accepted adaptive steps.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn record(&self) -> &TimeSeriesRecord {
        &self.record
    }

    pub fn into_record(self) -> TimeSeriesRecord {
        self.record
    }

    pub fn model(&self) -> &dyn DynamicsModel {
        self.model.as_ref()
    }

    fn controller(&self) -> Result<&dyn Controller> {
        self.controller
            .as_deref()
            .ok_or(SimError::OutOfSequence("controller not initialized"))
    }

    fn ensure_steppable(&self) -> Result<()> {
        match self.phase {
            Phase::Ready | Phase::Running => Ok(()),
            Phase::Finished => Err(SimError::OutOfSequence("supervisor run already finished")),
            _ => Err(SimError::OutOfSequence("supervisor is not initialized")),
        }
    }

    fn record_pair(&mut self, t: f64, state: &DVector<f64>, control: ControlVector) -> Result<()> {
        if self.record_states {
            self.record.states.push(t, state.as_slice().to_vec())?;
        }
        if self.record_inputs {
            self.record.inputs.push(t, control)?;
        }
        Ok(())
    }
}

impl OdeSystem for IntegrationSupervisor {
    fn derivative(&mut self, t: f64, y: &DVector<f64>) -> Result<DVector<f64>> {
        self.ode_eval(t, y)
    }

    fn output(&mut self, t: f64, y: &DVector<f64>, flag: OutputFlag) -> Result<ControlFlow<()>> {
        self.ode_output_fcn(t, y, flag)
    }
}
