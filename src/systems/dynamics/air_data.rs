use nalgebra::Vector3;

use crate::state::VehicleState;
use crate::utils::constants::MIN_AIRSPEED;

/// Air-relative flow quantities at the vehicle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AirData {
    pub true_airspeed: f64,
    pub alpha: f64,
    pub beta: f64,
    pub density: f64,
    pub dynamic_pressure: f64,
    /// Body-frame velocity relative to the air mass.
    pub relative_velocity: Vector3<f64>,
}

impl AirData {
    /// `wind` is the NED wind vector at the vehicle position.
    pub fn calculate(state: &VehicleState, wind: Vector3<f64>, density: f64) -> Self {
        let wind_body = state.attitude.rotation().inverse() * wind;
        let relative_velocity = state.velocity - wind_body;
        let airspeed = relative_velocity.norm();

        let (alpha, beta) = if airspeed > MIN_AIRSPEED {
            (
                relative_velocity.z.atan2(relative_velocity.x),
                (relative_velocity.y / airspeed).asin(),
            )
        } else {
            (0.0, 0.0)
        };

        Self {
            true_airspeed: airspeed,
            alpha,
            beta,
            density,
            dynamic_pressure: 0.5 * density * airspeed * airspeed,
            relative_velocity,
        }
    }
}
