use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::utils::{Result, SimError};

/// Target steady flight condition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrimCondition {
    /// Straight and level flight at specific airspeed (m/s).
    StraightAndLevel { airspeed: f64 },
    /// Steady climb (positive `gamma`, rad) or descent.
    SteadyClimb { airspeed: f64, gamma: f64 },
}

impl TrimCondition {
    pub fn airspeed(&self) -> f64 {
        match *self {
            TrimCondition::StraightAndLevel { airspeed } => airspeed,
            TrimCondition::SteadyClimb { airspeed, .. } => airspeed,
        }
    }

    /// Flight path angle (rad).
    pub fn gamma(&self) -> f64 {
        match *self {
            TrimCondition::StraightAndLevel { .. } => 0.0,
            TrimCondition::SteadyClimb { gamma, .. } => gamma,
        }
    }
}

impl Default for TrimCondition {
    fn default() -> Self {
        TrimCondition::StraightAndLevel { airspeed: 60.0 }
    }
}

/// Which free variables the search adjusts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrimMode {
    /// Pitch attitude, elevator and throttle; wings level, aileron and rudder zero.
    #[default]
    Longitudinal,
    /// Adds roll attitude, aileron and rudder.
    Full,
}

impl TrimMode {
    pub fn parameter_count(self) -> usize {
        match self {
            TrimMode::Longitudinal => 3,
            TrimMode::Full => 6,
        }
    }
}

/// Configuration for the trim solver
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrimSolverConfig {
    /// Total optimizer iteration budget across all stages.
    pub max_iterations: u64,
    /// Largest acceptable absolute linear/angular acceleration at the trim point.
    pub tolerance: f64,
    /// Whether to use gradient refinement
    pub use_gradient_refinement: bool,
    pub mode: TrimMode,
    /// Bounds for longitudinal control surfaces and states
    pub longitudinal_bounds: LongitudinalBounds,
    /// Bounds for lateral control surfaces and states
    pub lateral_bounds: LateralBounds,
}

impl Default for TrimSolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 2000,
            tolerance: 1e-3,
            use_gradient_refinement: true,
            mode: TrimMode::default(),
            longitudinal_bounds: LongitudinalBounds::default(),
            lateral_bounds: LateralBounds::default(),
        }
    }
}

impl TrimSolverConfig {
    /// Rejects non-positive tolerances and bound ranges that are not finite with `min <= max`.
    pub fn validate(&self) -> Result<()> {
        if !(self.tolerance > 0.0) {
            return Err(SimError::InvalidConfig(
                "trim tolerance must be positive".to_string(),
            ));
        }
        let long = &self.longitudinal_bounds;
        let lat = &self.lateral_bounds;
        let ranges = [
            ("longitudinal_bounds.elevator_range", long.elevator_range),
            ("longitudinal_bounds.throttle_range", long.throttle_range),
            ("longitudinal_bounds.alpha_range", long.alpha_range),
            ("longitudinal_bounds.theta_range", long.theta_range),
            ("lateral_bounds.aileron_range", lat.aileron_range),
            ("lateral_bounds.rudder_range", lat.rudder_range),
            ("lateral_bounds.phi_range", lat.phi_range),
        ];
        for (name, (min, max)) in ranges {
            if !(min.is_finite() && max.is_finite() && min <= max) {
                return Err(SimError::InvalidConfig(format!(
                    "{} must be finite with min <= max, got [{}, {}]",
                    name, min, max
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LongitudinalBounds {
    pub elevator_range: (f64, f64),
    pub throttle_range: (f64, f64),
    pub alpha_range: (f64, f64),
    pub theta_range: (f64, f64),
}

impl Default for LongitudinalBounds {
    fn default() -> Self {
        Self {
            elevator_range: (-1.0, 1.0),
            throttle_range: (0.0, 1.0),
            alpha_range: (-20.0 * PI / 180.0, 20.0 * PI / 180.0),
            theta_range: (-1.0, 1.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LateralBounds {
    pub aileron_range: (f64, f64),
    pub rudder_range: (f64, f64),
    pub phi_range: (f64, f64),
}

impl Default for LateralBounds {
    fn default() -> Self {
        Self {
            aileron_range: (-1.0, 1.0),
            rudder_range: (-1.0, 1.0),
            phi_range: (-80.0 * PI / 180.0, 80.0 * PI / 180.0),
        }
    }
}
