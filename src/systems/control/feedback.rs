use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use super::Controller;
use crate::state::{ControlLimits, ControlVector, VehicleState};

/// Proportional/derivative gains around a reference flight condition.
///
/// Signs follow the control conventions of the aircraft's coefficient set: with the
/// defaults a positive elevator pitches the nose down and a positive aileron rolls right.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackGains {
    pub pitch_kp: f64,
    pub pitch_kd: f64,
    pub roll_kp: f64,
    pub roll_kd: f64,
    pub airspeed_kp: f64,
    pub heading_kp: f64,
    pub yaw_damper: f64,
}

impl Default for FeedbackGains {
    fn default() -> Self {
        Self {
            pitch_kp: 2.0,
            pitch_kd: 0.5,
            roll_kp: -1.5,
            roll_kd: -0.3,
            airspeed_kp: -0.05,
            heading_kp: -0.5,
            yaw_damper: 0.2,
        }
    }
}

/// Holds the reference controls and corrects deviations from a reference state.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackController {
    reference_state: VehicleState,
    reference_controls: ControlVector,
    gains: FeedbackGains,
    limits: ControlLimits,
}

impl FeedbackController {
    pub fn new(
        reference_state: VehicleState,
        reference_controls: ControlVector,
        gains: FeedbackGains,
    ) -> Self {
        Self {
            reference_state,
            reference_controls,
            gains,
            limits: ControlLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: ControlLimits) -> Self {
        self.limits = limits;
        self
    }
}

fn wrap_angle(angle: f64) -> f64 {
    (angle + PI).rem_euclid(2.0 * PI) - PI
}

impl Controller for FeedbackController {
    fn compute(&self, state: &VehicleState, _t: f64) -> ControlVector {
        let (roll, pitch, yaw) = state.attitude.euler_angles();
        let (roll_ref, pitch_ref, yaw_ref) = self.reference_state.attitude.euler_angles();
        let gains = &self.gains;
        let rates = &state.angular_rate;

        let pitch_error = pitch - pitch_ref;
        let roll_error = wrap_angle(roll - roll_ref);
        let heading_error = wrap_angle(yaw - yaw_ref);
        let airspeed_error = state.airspeed() - self.reference_state.airspeed();

        let base = &self.reference_controls;
        ControlVector {
            aileron: base.aileron
                + gains.roll_kp * (roll_error + gains.heading_kp * heading_error)
                + gains.roll_kd * rates.x,
            elevator: base.elevator + gains.pitch_kp * pitch_error + gains.pitch_kd * rates.y,
            throttle: base.throttle + gains.airspeed_kp * airspeed_error,
            rudder: base.rudder + gains.yaw_damper * rates.z,
        }
        .clamped(&self.limits)
    }
}
