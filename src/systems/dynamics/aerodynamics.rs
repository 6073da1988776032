use nalgebra::Vector3;

use super::AirData;
use crate::components::{AircraftAeroCoefficients, AircraftGeometry};
use crate::state::ControlVector;
use crate::utils::constants::{
    ALPHA_LIMITS_DEG, BETA_LIMIT_DEG, MIN_AIRSPEED, MIN_DYNAMIC_PRESSURE, PITCH_YAW_RATE_LIMIT_DEG,
    ROLL_RATE_LIMIT_DEG,
};

/// Body-frame aerodynamic force and moment from the polynomial coefficient build-up.
///
/// Angles and rates are clamped to the range the coefficients are fitted over. Lift
/// and drag act in stability axes and are rotated into the body frame through alpha.
pub fn calculate_aerodynamic_forces_moments(
    coeffs: &AircraftAeroCoefficients,
    geometry: &AircraftGeometry,
    air_data: &AirData,
    angular_rate: &Vector3<f64>,
    controls: &ControlVector,
) -> (Vector3<f64>, Vector3<f64>) {
    if air_data.dynamic_pressure < MIN_DYNAMIC_PRESSURE || air_data.true_airspeed < MIN_AIRSPEED
    {
        return (Vector3::zeros(), Vector3::zeros());
    }

    let alpha = air_data
        .alpha
        .clamp(ALPHA_LIMITS_DEG.0.to_radians(), ALPHA_LIMITS_DEG.1.to_radians());
    let beta = air_data
        .beta
        .clamp(-BETA_LIMIT_DEG.to_radians(), BETA_LIMIT_DEG.to_radians());
    let roll_limit = ROLL_RATE_LIMIT_DEG.to_radians();
    let pitch_yaw_limit = PITCH_YAW_RATE_LIMIT_DEG.to_radians();
    let p = angular_rate.x.clamp(-roll_limit, roll_limit);
    let q = angular_rate.y.clamp(-pitch_yaw_limit, pitch_yaw_limit);
    let r = angular_rate.z.clamp(-pitch_yaw_limit, pitch_yaw_limit);

    // Non-dimensional rates
    let airspeed = air_data.true_airspeed;
    let p_hat = (geometry.wing_span * p) / (2.0 * airspeed);
    let q_hat = (geometry.mac * q) / (2.0 * airspeed);
    let r_hat = (geometry.wing_span * r) / (2.0 * airspeed);

    let elevator = controls.elevator;
    let aileron = controls.aileron;
    let rudder = controls.rudder;

    let drag = &coeffs.drag;
    let c_d = drag.c_d_0
        + drag.c_d_alpha * alpha
        + drag.c_d_alpha_q * alpha * q_hat
        + drag.c_d_alpha_deltae * alpha * elevator
        + drag.c_d_alpha2 * alpha.powi(2)
        + drag.c_d_alpha2_q * q_hat * alpha.powi(2)
        + drag.c_d_alpha2_deltae * elevator * alpha.powi(2)
        + drag.c_d_alpha3 * alpha.powi(3)
        + drag.c_d_alpha3_q * q_hat * alpha.powi(3)
        + drag.c_d_alpha4 * alpha.powi(4);

    let side = &coeffs.side_force;
    let c_y = side.c_y_beta * beta
        + side.c_y_p * p_hat
        + side.c_y_r * r_hat
        + side.c_y_deltaa * aileron
        + side.c_y_deltar * rudder;

    let lift = &coeffs.lift;
    let c_l = lift.c_l_0
        + lift.c_l_alpha * alpha
        + lift.c_l_q * q_hat
        + lift.c_l_deltae * elevator
        + lift.c_l_alpha_q * alpha * q_hat
        + lift.c_l_alpha2 * alpha.powi(2)
        + lift.c_l_alpha3 * alpha.powi(3)
        + lift.c_l_alpha4 * alpha.powi(4);

    let roll = &coeffs.roll;
    let c_l_roll = roll.c_l_beta * beta
        + roll.c_l_p * p_hat
        + roll.c_l_r * r_hat
        + roll.c_l_deltaa * aileron
        + roll.c_l_deltar * rudder;

    let pitch = &coeffs.pitch;
    let c_m = pitch.c_m_0
        + pitch.c_m_alpha * alpha
        + pitch.c_m_q * q_hat
        + pitch.c_m_deltae * elevator
        + pitch.c_m_alpha_q * alpha * q_hat
        + pitch.c_m_alpha2_q * q_hat * alpha.powi(2)
        + pitch.c_m_alpha2_deltae * elevator * alpha.powi(2)
        + pitch.c_m_alpha3_q * q_hat * alpha.powi(3)
        + pitch.c_m_alpha3_deltae * elevator * alpha.powi(3)
        + pitch.c_m_alpha4 * alpha.powi(4);

    let yaw = &coeffs.yaw;
    let c_n = yaw.c_n_beta * beta
        + yaw.c_n_p * p_hat
        + yaw.c_n_r * r_hat
        + yaw.c_n_deltaa * aileron
        + yaw.c_n_deltar * rudder
        + yaw.c_n_beta2 * beta.powi(2)
        + yaw.c_n_beta3 * beta.powi(3);

    let qs = air_data.dynamic_pressure * geometry.wing_area;
    let (sin_alpha, cos_alpha) = air_data.alpha.sin_cos();
    let drag_force = qs * c_d;
    let lift_force = qs * c_l;

    let forces = Vector3::new(
        -drag_force * cos_alpha + lift_force * sin_alpha,
        qs * c_y,
        -drag_force * sin_alpha - lift_force * cos_alpha,
    );

    let moments = Vector3::new(
        qs * geometry.wing_span * c_l_roll,
        qs * geometry.mac * c_m,
        qs * geometry.wing_span * c_n,
    );

    (forces, moments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{StateLayout, VehicleState};
    use approx::assert_relative_eq;

    fn air_data_at(u: f64, w: f64) -> AirData {
        let mut state = VehicleState::new(StateLayout::default());
        state.velocity = Vector3::new(u, 0.0, w);
        AirData::calculate(&state, Vector3::zeros(), 1.225)
    }

    #[test]
    fn test_zero_alpha_lift_and_drag() {
        let coeffs = AircraftAeroCoefficients::cessna_172();
        let geometry = AircraftGeometry::cessna_172();
        let air = air_data_at(50.0, 0.0);
        let (forces, moments) = calculate_aerodynamic_forces_moments(
            &coeffs,
            &geometry,
            &air,
            &Vector3::zeros(),
            &ControlVector::default(),
        );
        let qs = air.dynamic_pressure * geometry.wing_area;
        assert_relative_eq!(forces.x, -qs * coeffs.drag.c_d_0, epsilon = 1e-9);
        assert_relative_eq!(forces.z, -qs * coeffs.lift.c_l_0, epsilon = 1e-9);
        assert_relative_eq!(forces.y, 0.0);
        assert_relative_eq!(
            moments.y,
            qs * geometry.mac * coeffs.pitch.c_m_0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_pitch_stiffness_restores() {
        let coeffs = AircraftAeroCoefficients::cessna_172();
        let geometry = AircraftGeometry::cessna_172();
        let low = air_data_at(50.0, 0.0);
        let high = air_data_at(50.0, 5.0);
        let controls = ControlVector::default();
        let (_, m_low) =
            calculate_aerodynamic_forces_moments(&coeffs, &geometry, &low, &Vector3::zeros(), &controls);
        let (_, m_high) =
            calculate_aerodynamic_forces_moments(&coeffs, &geometry, &high, &Vector3::zeros(), &controls);
        assert!(m_high.y < m_low.y);
    }

    #[test]
    fn test_no_loads_without_airflow() {
        let air = air_data_at(0.0, 0.0);
        let (forces, moments) = calculate_aerodynamic_forces_moments(
            &AircraftAeroCoefficients::twin_otter(),
            &AircraftGeometry::twin_otter(),
            &air,
            &Vector3::new(0.1, 0.1, 0.1),
            &ControlVector::new(0.1, 0.1, 0.5, 0.1),
        );
        assert_eq!(forces, Vector3::zeros());
        assert_eq!(moments, Vector3::zeros());
    }
}
