mod aerodynamics;
mod air_data;
mod propulsion;
mod rigid_body;

pub use aerodynamics::calculate_aerodynamic_forces_moments;
pub use air_data::AirData;
pub use propulsion::{calculate_engine_thrust, engine_loads, spool_rate};
pub use rigid_body::RigidBodyDynamics;

use nalgebra::Vector3;

use crate::state::{ControlVector, StateLayout, VehicleState};
use crate::utils::Result;

/// Net loads and state derivative produced by one model evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicsOutput {
    /// Net body-frame force (N).
    pub forces: Vector3<f64>,
    /// Net body-frame moment about the CG (N·m).
    pub torques: Vector3<f64>,
    /// Time derivative of the state, in the state's own layout.
    pub derivative: VehicleState,
}

/// A vehicle model that can be driven through its flattened state.
///
/// Implementations are queried, never mutated, by the supervisor and the trimmer.
pub trait DynamicsModel: Send + Sync {
    /// The layout every state passed to [`evaluate`](Self::evaluate) must use.
    fn layout(&self) -> StateLayout;

    fn evaluate(
        &self,
        state: &VehicleState,
        control: &ControlVector,
        t: f64,
    ) -> Result<DynamicsOutput>;
}

impl<M: DynamicsModel + ?Sized> DynamicsModel for Box<M> {
    fn layout(&self) -> StateLayout {
        (**self).layout()
    }

    fn evaluate(
        &self,
        state: &VehicleState,
        control: &ControlVector,
        t: f64,
    ) -> Result<DynamicsOutput> {
        (**self).evaluate(state, control, t)
    }
}
