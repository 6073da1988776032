use nalgebra::{Matrix3, Vector3};
use tracing::debug;

use super::{
    calculate_aerodynamic_forces_moments, calculate_engine_thrust, engine_loads, spool_rate,
    AirData, DynamicsModel, DynamicsOutput,
};
use crate::components::AircraftConfig;
use crate::resources::EnvironmentResource;
use crate::state::{AttitudeRepr, ControlVector, StateLayout, VehicleState};
use crate::utils::constants::GRAVITY;
use crate::utils::{Result, SimError};

/// Six degree-of-freedom rigid aircraft: aerodynamics, engines with spool lag, and
/// flat-earth gravity.
///
/// One auxiliary state per engine holds its thrust fraction.
#[derive(Debug)]
pub struct RigidBodyDynamics {
    aircraft: AircraftConfig,
    environment: EnvironmentResource,
    layout: StateLayout,
    inertia: Matrix3<f64>,
    inertia_inv: Matrix3<f64>,
}

impl RigidBodyDynamics {
    pub fn new(
        aircraft: AircraftConfig,
        environment: EnvironmentResource,
        attitude: AttitudeRepr,
    ) -> Result<Self> {
        aircraft.validate()?;
        let inertia = aircraft.mass.inertia();
        let inertia_inv = inertia.try_inverse().ok_or_else(|| {
            SimError::InvalidConfig(format!(
                "inertia tensor of '{}' is not invertible",
                aircraft.name
            ))
        })?;
        let layout = StateLayout::new(attitude, aircraft.propulsion.len());
        debug!(
            "Rigid body model for {} with {} states",
            aircraft.name,
            layout.dimension()
        );

        Ok(Self {
            aircraft,
            environment,
            layout,
            inertia,
            inertia_inv,
        })
    }

    pub fn aircraft(&self) -> &AircraftConfig {
        &self.aircraft
    }

    pub fn environment(&self) -> &EnvironmentResource {
        &self.environment
    }

    pub fn air_data(&self, state: &VehicleState) -> AirData {
        let wind = self.environment.get_wind(&state.position);
        let density = self.environment.get_density(&state.position);
        AirData::calculate(state, wind, density)
    }
}

impl DynamicsModel for RigidBodyDynamics {
    fn layout(&self) -> StateLayout {
        self.layout
    }

    fn evaluate(
        &self,
        state: &VehicleState,
        control: &ControlVector,
        _t: f64,
    ) -> Result<DynamicsOutput> {
        if state.layout() != self.layout {
            return Err(SimError::ShapeMismatch {
                expected: self.layout.dimension(),
                actual: state.layout().dimension(),
            });
        }

        let air_data = self.air_data(state);
        let omega = state.angular_rate;

        let (mut forces, mut torques) = calculate_aerodynamic_forces_moments(
            &self.aircraft.aero_coef,
            &self.aircraft.geometry,
            &air_data,
            &omega,
            control,
        );

        let mut aux_rate = Vec::with_capacity(self.layout.aux_len);
        for (engine, &fraction) in self.aircraft.propulsion.engines.iter().zip(&state.aux) {
            let thrust = calculate_engine_thrust(
                engine,
                fraction,
                air_data.density,
                air_data.true_airspeed,
            );
            let (force, moment) = engine_loads(engine, thrust);
            forces += force;
            torques += moment;
            aux_rate.push(spool_rate(engine, fraction, control.throttle));
        }

        let rotation = state.attitude.rotation();
        let mass = self.aircraft.mass.mass;
        forces += rotation.inverse() * Vector3::new(0.0, 0.0, mass * GRAVITY);

        let velocity_rate = forces / mass - omega.cross(&state.velocity);
        let angular_acceleration =
            self.inertia_inv * (torques - omega.cross(&(self.inertia * omega)));

        let derivative = VehicleState {
            attitude: state.attitude.rate(&omega),
            angular_rate: angular_acceleration,
            position: rotation * state.velocity,
            velocity: velocity_rate,
            aux: aux_rate,
        };

        Ok(DynamicsOutput {
            forces,
            torques,
            derivative,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::MassModel;
    use crate::state::Attitude;
    use approx::assert_relative_eq;

    fn model(repr: AttitudeRepr) -> RigidBodyDynamics {
        RigidBodyDynamics::new(AircraftConfig::cessna_172(), EnvironmentResource::calm(), repr)
            .unwrap()
    }

    #[test]
    fn test_layout_has_one_aux_per_engine() {
        let twin = RigidBodyDynamics::new(
            AircraftConfig::twin_otter(),
            EnvironmentResource::calm(),
            AttitudeRepr::Quaternion,
        )
        .unwrap();
        assert_eq!(twin.layout(), StateLayout::new(AttitudeRepr::Quaternion, 2));
        assert_eq!(twin.layout().dimension(), 15);
    }

    #[test]
    fn test_at_rest_falls_with_gravity() {
        let model = model(AttitudeRepr::Euler);
        let state = VehicleState::new(model.layout());
        let output = model
            .evaluate(&state, &ControlVector::default(), 0.0)
            .unwrap();
        assert_relative_eq!(output.derivative.velocity.z, GRAVITY, epsilon = 1e-12);
        assert_relative_eq!(output.derivative.velocity.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(output.derivative.angular_rate.norm(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(output.derivative.position.norm(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_position_rate_follows_heading() {
        let model = model(AttitudeRepr::Quaternion);
        let mut state = VehicleState::new(model.layout());
        state.attitude = Attitude::from_euler_angles(
            AttitudeRepr::Quaternion,
            0.0,
            0.0,
            std::f64::consts::FRAC_PI_2,
        );
        state.velocity = Vector3::new(50.0, 0.0, 0.0);
        let output = model
            .evaluate(&state, &ControlVector::default(), 0.0)
            .unwrap();
        // Heading east
        assert_relative_eq!(output.derivative.position.y, 50.0, epsilon = 1e-9);
        assert_relative_eq!(output.derivative.position.x, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_engine_spools_towards_throttle() {
        let model = model(AttitudeRepr::Euler);
        let state = VehicleState::new(model.layout());
        let output = model
            .evaluate(&state, &ControlVector::new(0.0, 0.0, 1.0, 0.0), 0.0)
            .unwrap();
        // Cessna engine spools up with a 1 s time constant
        assert_relative_eq!(output.derivative.aux[0], 1.0);
    }

    #[test]
    fn test_wrong_layout_rejected() {
        let model = model(AttitudeRepr::Quaternion);
        let state = VehicleState::new(StateLayout::new(AttitudeRepr::Euler, 1));
        let result = model.evaluate(&state, &ControlVector::default(), 0.0);
        assert!(matches!(
            result,
            Err(SimError::ShapeMismatch {
                expected: 14,
                actual: 13
            })
        ));
    }

    #[test]
    fn test_singular_inertia_rejected() {
        let mut aircraft = AircraftConfig::cessna_172();
        aircraft.mass = MassModel::new(1000.0, 0.0, 0.0, 0.0, 0.0);
        let result =
            RigidBodyDynamics::new(aircraft, EnvironmentResource::calm(), AttitudeRepr::Euler);
        assert!(matches!(result, Err(SimError::InvalidConfig(_))));
    }
}
