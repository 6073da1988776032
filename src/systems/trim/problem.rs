use argmin::core::{CostFunction, Error as ArgminError, Gradient};
use nalgebra::Vector3;

use super::{TrimCondition, TrimMode, TrimSolverConfig};
use crate::state::{Attitude, ControlVector, VehicleState};
use crate::systems::dynamics::DynamicsModel;
use crate::utils::Result;

/// Free variables of the trim search, clamped to their bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrimParameters {
    pub theta: f64,
    pub phi: f64,
    pub controls: ControlVector,
}

/// Equilibrium search over attitude and controls for one flight condition.
///
/// The parameter vector is `[theta, elevator, throttle]` in longitudinal mode and
/// `[theta, elevator, throttle, phi, aileron, rudder]` in full mode. Airspeed, flight path
/// angle and sideslip (zero) are held fixed, as are the position and heading of `reference`.
#[derive(Clone, Copy)]
pub struct TrimProblem<'a> {
    model: &'a dyn DynamicsModel,
    condition: TrimCondition,
    settings: &'a TrimSolverConfig,
    reference: &'a VehicleState,
}

impl<'a> TrimProblem<'a> {
    pub fn new(
        model: &'a dyn DynamicsModel,
        condition: TrimCondition,
        settings: &'a TrimSolverConfig,
        reference: &'a VehicleState,
    ) -> Self {
        Self {
            model,
            condition,
            settings,
            reference,
        }
    }

    pub fn initial_guess(&self) -> Vec<f64> {
        let theta = self.condition.gamma() + 0.05;
        match self.settings.mode {
            TrimMode::Longitudinal => vec![theta, 0.0, 0.3],
            TrimMode::Full => vec![theta, 0.0, 0.3, 0.0, 0.0, 0.0],
        }
    }

    pub fn decode(&self, param: &[f64]) -> TrimParameters {
        let long = &self.settings.longitudinal_bounds;
        let lat = &self.settings.lateral_bounds;
        let clamp = |value: f64, range: (f64, f64)| value.clamp(range.0, range.1);

        let (phi, aileron, rudder) = match self.settings.mode {
            TrimMode::Longitudinal => (0.0, 0.0, 0.0),
            TrimMode::Full => (
                clamp(param[3], lat.phi_range),
                clamp(param[4], lat.aileron_range),
                clamp(param[5], lat.rudder_range),
            ),
        };

        TrimParameters {
            theta: clamp(param[0], long.theta_range),
            phi,
            controls: ControlVector {
                aileron,
                elevator: clamp(param[1], long.elevator_range),
                throttle: clamp(param[2], long.throttle_range),
                rudder,
            },
        }
    }

    /// The candidate trim state for `params`. Engines sit at their commanded thrust fraction.
    pub fn build_state(&self, params: &TrimParameters) -> VehicleState {
        let (_, _, yaw) = self.reference.attitude.euler_angles();
        let airspeed = self.condition.airspeed();
        let alpha = params.theta - self.condition.gamma();
        let layout = self.model.layout();

        VehicleState {
            attitude: Attitude::from_euler_angles(layout.attitude, params.phi, params.theta, yaw),
            angular_rate: Vector3::zeros(),
            position: self.reference.position,
            velocity: Vector3::new(airspeed * alpha.cos(), 0.0, airspeed * alpha.sin()),
            aux: vec![params.controls.throttle; layout.aux_len],
        }
    }

    /// `[u̇, v̇, ẇ, ṗ, q̇, ṙ]` at the candidate point.
    pub fn residual(&self, state: &VehicleState, controls: &ControlVector) -> Result<[f64; 6]> {
        let output = self.model.evaluate(state, controls, 0.0)?;
        let v = output.derivative.velocity;
        let w = output.derivative.angular_rate;
        Ok([v.x, v.y, v.z, w.x, w.y, w.z])
    }

    fn constraint_penalty(value: f64, range: (f64, f64), weight: f64) -> f64 {
        let (min, max) = range;
        let below_min = if value < min { (min - value).powi(2) } else { 0.0 };
        let above_max = if value > max { (value - max).powi(2) } else { 0.0 };
        weight * (below_min + above_max)
    }

    fn penalty(&self, param: &[f64]) -> f64 {
        let long = &self.settings.longitudinal_bounds;
        let alpha = param[0] - self.condition.gamma();
        let mut penalty = Self::constraint_penalty(param[0], long.theta_range, 150.0)
            + Self::constraint_penalty(param[1], long.elevator_range, 100.0)
            + Self::constraint_penalty(param[2], long.throttle_range, 100.0)
            + Self::constraint_penalty(alpha, long.alpha_range, 200.0);
        if self.settings.mode == TrimMode::Full {
            let lat = &self.settings.lateral_bounds;
            penalty += Self::constraint_penalty(param[3], lat.phi_range, 150.0)
                + Self::constraint_penalty(param[4], lat.aileron_range, 100.0)
                + Self::constraint_penalty(param[5], lat.rudder_range, 100.0);
        }
        penalty
    }
}

impl CostFunction for TrimProblem<'_> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, param: &Self::Param) -> std::result::Result<Self::Output, ArgminError> {
        let expected = self.settings.mode.parameter_count();
        if param.len() != expected {
            return Err(ArgminError::msg(format!(
                "trim parameter vector must have length {expected}, got {}",
                param.len()
            )));
        }

        let params = self.decode(param);
        let state = self.build_state(&params);
        let residual = self
            .residual(&state, &params.controls)
            .map_err(|e| ArgminError::msg(e.to_string()))?;

        let residual_cost: f64 = residual.iter().map(|r| r * r).sum();
        Ok(residual_cost + self.penalty(param))
    }
}

impl Gradient for TrimProblem<'_> {
    type Param = Vec<f64>;
    type Gradient = Vec<f64>;

    /// Central finite differences.
    fn gradient(&self, param: &Self::Param) -> std::result::Result<Self::Gradient, ArgminError> {
        let eps = 1e-7;
        let mut grad = vec![0.0; param.len()];
        for i in 0..param.len() {
            let mut param_plus = param.clone();
            let mut param_minus = param.clone();
            param_plus[i] += eps;
            param_minus[i] -= eps;

            let f_plus = self.cost(&param_plus)?;
            let f_minus = self.cost(&param_minus)?;
            if f_plus.is_finite() && f_minus.is_finite() {
                grad[i] = (f_plus - f_minus) / (2.0 * eps);
            }
        }
        Ok(grad)
    }
}
