use flysim::{
    components::{
        AircraftAeroCoefficients, AircraftConfig, AircraftGeometry, DragCoefficients,
        LiftCoefficients, MassModel, PitchCoefficients, PowerplantConfig, PropulsionConfig,
        RollCoefficients, SideForceCoefficients, YawCoefficients,
    },
    resources::{SimulationConfig, TrimSettings},
    state::{ControlVector, StateLayout, VehicleState},
    systems::{
        dynamics::{DynamicsModel, DynamicsOutput},
        trim::{TrimCondition, TrimSolverConfig},
    },
    Result,
};
use nalgebra::Vector3;

pub const GRAVITY: f64 = 9.81;

/// Returns the same derivative for every state, control and time.
#[derive(Debug, Clone)]
pub struct ConstantDerivative {
    pub derivative: VehicleState,
}

impl ConstantDerivative {
    /// Vertical velocity derivative of `-g`, everything else at rest.
    pub fn free_fall(layout: StateLayout) -> Self {
        let mut derivative = VehicleState::zeros(layout);
        derivative.velocity.z = -GRAVITY;
        Self { derivative }
    }
}

impl DynamicsModel for ConstantDerivative {
    fn layout(&self) -> StateLayout {
        self.derivative.layout()
    }

    fn evaluate(
        &self,
        _state: &VehicleState,
        _control: &ControlVector,
        _t: f64,
    ) -> Result<DynamicsOutput> {
        Ok(DynamicsOutput {
            forces: Vector3::zeros(),
            torques: Vector3::zeros(),
            derivative: self.derivative.clone(),
        })
    }
}

/// Light single-engine aircraft with a linear lift curve and a stable pitch break.
pub fn trainer_aircraft() -> AircraftConfig {
    AircraftConfig {
        name: "Trainer".to_string(),
        mass: MassModel::new(1000.0, 1200.0, 1500.0, 2500.0, 0.0),
        geometry: AircraftGeometry::new(16.0, 10.0, 1.6),
        aero_coef: AircraftAeroCoefficients {
            drag: DragCoefficients {
                c_d_0: 0.02,
                c_d_alpha2: 0.1,
                ..Default::default()
            },
            lift: LiftCoefficients {
                c_l_0: 0.2,
                c_l_alpha: 5.0,
                ..Default::default()
            },
            side_force: SideForceCoefficients {
                c_y_beta: -0.5,
                ..Default::default()
            },
            roll: RollCoefficients {
                c_l_p: -0.5,
                c_l_deltaa: 0.1,
                ..Default::default()
            },
            pitch: PitchCoefficients {
                c_m_alpha: -1.0,
                c_m_q: -10.0,
                c_m_deltae: -1.0,
                ..Default::default()
            },
            yaw: YawCoefficients {
                c_n_beta: 0.1,
                c_n_r: -0.1,
                c_n_deltar: -0.05,
                ..Default::default()
            },
        },
        propulsion: PropulsionConfig::single_engine(PowerplantConfig {
            name: "Trainer engine".to_string(),
            max_thrust: 5000.0,
            min_thrust: 0.0,
            spool_up_time: 1.0,
            spool_down_time: 1.0,
            ..Default::default()
        }),
    }
}

/// The free fall example: `t0 = 0`, `tf = 10`, `dt = 1`.
pub fn free_fall_config() -> SimulationConfig {
    SimulationConfig {
        solver_type: 0,
        t0: 0.0,
        tf: 10.0,
        dt: 1.0,
        ..Default::default()
    }
}

/// Level flight at 60 m/s, trimmed before the run.
pub fn trimmed_level_config(solver_type: i64, tf: f64) -> SimulationConfig {
    SimulationConfig {
        solver_type,
        tf,
        dt: 0.01,
        trim: TrimSettings {
            enabled: true,
            condition: TrimCondition::StraightAndLevel { airspeed: 60.0 },
            solver: TrimSolverConfig::default(),
        },
        ..Default::default()
    }
}
