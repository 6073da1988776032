use nalgebra::{UnitQuaternion, Vector3};

use crate::components::PowerplantConfig;
use crate::utils::constants::{SEA_LEVEL_DENSITY, SPEED_OF_SOUND_SEA_LEVEL};

/// Thrust magnitude (N) for an engine at `thrust_fraction` of its available range.
///
/// Available thrust lapses with the square root of the density ratio and linearly with
/// Mach number.
pub fn calculate_engine_thrust(
    config: &PowerplantConfig,
    thrust_fraction: f64,
    air_density: f64,
    airspeed: f64,
) -> f64 {
    let rho_ratio = (air_density / SEA_LEVEL_DENSITY).max(0.01);
    let rho_factor = rho_ratio.sqrt();

    let mach = (airspeed / SPEED_OF_SOUND_SEA_LEVEL).max(0.0);
    let ram_factor = (1.0 - 0.1 * mach).max(0.0);

    let max_available = (config.max_thrust * rho_factor * ram_factor).max(0.0);
    let min_available = (config.min_thrust * rho_factor).max(0.0);
    let effective_max = max_available.max(min_available);

    let fraction = thrust_fraction.clamp(0.0, 1.0);
    (min_available + (effective_max - min_available) * fraction).max(0.0)
}

/// Body-frame force and moment about the CG for an engine producing `thrust`.
pub fn engine_loads(config: &PowerplantConfig, thrust: f64) -> (Vector3<f64>, Vector3<f64>) {
    let orientation = UnitQuaternion::from_euler_angles(
        config.orientation.x,
        config.orientation.y,
        config.orientation.z,
    );
    let force = orientation * Vector3::new(thrust, 0.0, 0.0);
    let moment = config.position.cross(&force);
    (force, moment)
}

/// First-order spool response of the thrust fraction towards the throttle command.
pub fn spool_rate(config: &PowerplantConfig, thrust_fraction: f64, throttle: f64) -> f64 {
    let target = throttle.clamp(0.0, 1.0);
    let time_constant = if target > thrust_fraction {
        config.spool_up_time
    } else {
        config.spool_down_time
    };
    (target - thrust_fraction) / time_constant
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn engine() -> PowerplantConfig {
        PowerplantConfig {
            name: "Test".to_string(),
            max_thrust: 1000.0,
            min_thrust: 100.0,
            spool_up_time: 2.0,
            spool_down_time: 1.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_static_sea_level_thrust() {
        let config = engine();
        assert_relative_eq!(
            calculate_engine_thrust(&config, 0.0, SEA_LEVEL_DENSITY, 0.0),
            100.0
        );
        assert_relative_eq!(
            calculate_engine_thrust(&config, 1.0, SEA_LEVEL_DENSITY, 0.0),
            1000.0
        );
        assert_relative_eq!(
            calculate_engine_thrust(&config, 0.5, SEA_LEVEL_DENSITY, 0.0),
            550.0
        );
    }

    #[test]
    fn test_thrust_lapses_with_density() {
        let config = engine();
        let high = calculate_engine_thrust(&config, 1.0, SEA_LEVEL_DENSITY / 4.0, 0.0);
        assert_relative_eq!(high, 500.0, epsilon = 1e-9);
    }

    #[test]
    fn test_offset_engine_yaws() {
        let mut config = engine();
        config.position = Vector3::new(0.0, 2.0, 0.0);
        let (force, moment) = engine_loads(&config, 100.0);
        assert_relative_eq!(force.x, 100.0);
        // Right engine thrusting forward yaws the nose left
        assert_relative_eq!(moment.z, -200.0);
    }

    #[test]
    fn test_spool_uses_direction_time_constant() {
        let config = engine();
        assert_relative_eq!(spool_rate(&config, 0.0, 1.0), 0.5);
        assert_relative_eq!(spool_rate(&config, 1.0, 0.0), -1.0);
        assert_relative_eq!(spool_rate(&config, 0.3, 0.3), 0.0);
    }
}
