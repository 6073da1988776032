use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use super::environment::EnvironmentConfig;
use crate::components::AircraftSource;
use crate::state::{Attitude, AttitudeRepr, ControlVector, StateLayout, VehicleState};
use crate::systems::control::FeedbackGains;
use crate::systems::trim::{TrimCondition, TrimSolverConfig};
use crate::utils::{Result, SimError};

/// Read-only description of one simulation run.
///
/// `solver_type` stays an integer as written in the file: 0 fixed-step forward Euler,
/// 1 Dormand-Prince 5(4), 2 Bogacki-Shampine 3(2).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub solver_type: i64,
    pub t0: f64,
    pub tf: f64,
    /// Fixed step size (s)
    pub dt: f64,
    /// Loop guard: stepping continues while `tf - t > epsilon`.
    pub epsilon: f64,
    pub record_states: bool,
    pub record_inputs: bool,
    pub adaptive: AdaptiveConfig,
    pub aircraft: AircraftSource,
    pub environment: EnvironmentConfig,
    pub initial: InitialCondition,
    pub trim: TrimSettings,
    pub controller: ControllerConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            solver_type: 0,
            t0: 0.0,
            tf: 10.0,
            dt: 0.01,
            epsilon: 1e-9,
            record_states: true,
            record_inputs: true,
            adaptive: AdaptiveConfig::default(),
            aircraft: AircraftSource::default(),
            environment: EnvironmentConfig::default(),
            initial: InitialCondition::default(),
            trim: TrimSettings::default(),
            controller: ControllerConfig::default(),
        }
    }
}

impl SimulationConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading simulation config from {}", path.display());
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_yaml::to_writer(file, self)?;
        Ok(())
    }

    /// Checks time span, step and tolerance settings. The solver type is checked
    /// when the run starts.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(SimError::InvalidConfig(msg));

        if !(self.t0.is_finite() && self.tf.is_finite() && self.tf > self.t0) {
            return invalid(format!(
                "time span must satisfy t0 < tf, got [{}, {}]",
                self.t0, self.tf
            ));
        }
        if !(self.dt > 0.0 && self.dt.is_finite()) {
            return invalid(format!("dt must be positive, got {}", self.dt));
        }
        if !(self.epsilon > 0.0 && self.epsilon < self.dt) {
            return invalid(format!(
                "epsilon must lie in (0, dt), got {}",
                self.epsilon
            ));
        }

        let adaptive = &self.adaptive;
        if !(adaptive.abs_tol > 0.0 && adaptive.rel_tol >= 0.0) {
            return invalid("abs_tol must be positive and rel_tol non-negative".to_string());
        }
        if !(adaptive.min_step > 0.0) {
            return invalid(format!(
                "min_step must be positive, got {}",
                adaptive.min_step
            ));
        }
        if let Some(max_step) = adaptive.max_step {
            if !(max_step >= adaptive.min_step) {
                return invalid(format!(
                    "max_step {} is below min_step {}",
                    max_step, adaptive.min_step
                ));
            }
        }
        if let Some(initial_step) = adaptive.initial_step {
            if !(initial_step > 0.0) {
                return invalid(format!(
                    "initial_step must be positive, got {}",
                    initial_step
                ));
            }
        }

        if self.trim.enabled {
            self.trim.solver.validate()?;
            if !(self.trim.condition.airspeed() > 0.0) {
                return invalid("trim airspeed must be positive".to_string());
            }
        }
        Ok(())
    }

    pub fn solver_kind(&self) -> Result<SolverKind> {
        SolverKind::try_from(self.solver_type)
    }

    /// Number of fixed steps the loop guard admits; zero when `dt` is not a positive step.
    pub fn fixed_step_count(&self) -> usize {
        if !(self.dt > 0.0 && self.dt.is_finite()) {
            return 0;
        }
        let mut t = self.t0;
        let mut steps = 0;
        while self.tf - t > self.epsilon {
            t += self.dt;
            steps += 1;
        }
        steps
    }
}

/// Time-advance strategy, decided once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolverKind {
    FixedStep,
    Adaptive(AdaptiveKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdaptiveKind {
    /// Dormand-Prince 5(4)
    DormandPrince45,
    /// Bogacki-Shampine 3(2)
    BogackiShampine23,
}

impl TryFrom<i64> for SolverKind {
    type Error = SimError;

    fn try_from(value: i64) -> Result<Self> {
        match value {
            0 => Ok(SolverKind::FixedStep),
            1 => Ok(SolverKind::Adaptive(AdaptiveKind::DormandPrince45)),
            2 => Ok(SolverKind::Adaptive(AdaptiveKind::BogackiShampine23)),
            other => Err(SimError::UnsupportedSolverType(other)),
        }
    }
}

/// How control inputs are recorded when an adaptive solver drives the run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputRecording {
    /// Evaluate the controller at each accepted step so both series share a time base.
    #[default]
    AcceptedSteps,
    /// Record from every derivative evaluation with a newer time than the last entry.
    /// Includes points from rejected steps, so the series will not align with the states.
    Evaluations,
    /// No input series in adaptive runs.
    Off,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdaptiveConfig {
    pub rel_tol: f64,
    pub abs_tol: f64,
    /// Estimated from the initial derivative when unset.
    pub initial_step: Option<f64>,
    pub min_step: f64,
    pub max_step: Option<f64>,
    pub max_steps: u64,
    pub input_recording: InputRecording,
}

impl Default for AdaptiveConfig {
    fn default() -> Self {
        Self {
            rel_tol: 1e-3,
            abs_tol: 1e-6,
            initial_step: None,
            min_step: 1e-12,
            max_step: None,
            max_steps: 1_000_000,
            input_recording: InputRecording::default(),
        }
    }
}

/// Initial condition used when trim is disabled. With trim enabled only the
/// position and heading are taken from here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitialCondition {
    pub attitude_repr: AttitudeRepr,
    /// NED position (m).
    pub position: Vector3<f64>,
    /// Body-frame velocity `[u, v, w]` (m/s).
    pub velocity: Vector3<f64>,
    /// `[roll, pitch, yaw]` (rad).
    pub euler_angles: Vector3<f64>,
    /// Body rates `[p, q, r]` (rad/s).
    pub angular_rate: Vector3<f64>,
    pub controls: ControlVector,
    /// Engine thrust fraction; defaults to the throttle setting.
    pub engine_fraction: Option<f64>,
}

impl Default for InitialCondition {
    fn default() -> Self {
        Self {
            attitude_repr: AttitudeRepr::default(),
            position: Vector3::new(0.0, 0.0, -1000.0),
            velocity: Vector3::new(60.0, 0.0, 0.0),
            euler_angles: Vector3::zeros(),
            angular_rate: Vector3::zeros(),
            controls: ControlVector::new(0.0, 0.0, 0.5, 0.0),
            engine_fraction: None,
        }
    }
}

impl InitialCondition {
    pub fn to_state(&self, layout: StateLayout) -> VehicleState {
        let e = &self.euler_angles;
        let fraction = self.engine_fraction.unwrap_or(self.controls.throttle);
        VehicleState {
            attitude: Attitude::from_euler_angles(layout.attitude, e.x, e.y, e.z),
            angular_rate: self.angular_rate,
            position: self.position,
            velocity: self.velocity,
            aux: vec![fraction; layout.aux_len],
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrimSettings {
    pub enabled: bool,
    pub condition: TrimCondition,
    pub solver: TrimSolverConfig,
}

/// Controller bound for the run; both hold the initial (or trim) controls as reference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControllerConfig {
    #[default]
    Static,
    Feedback {
        #[serde(default)]
        gains: FeedbackGains,
    },
}
