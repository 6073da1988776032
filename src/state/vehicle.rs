use nalgebra::{DVector, Quaternion, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::utils::{Result, SimError};

/// How the attitude block of a [`VehicleState`] is parameterised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttitudeRepr {
    /// Quaternion `[w, i, j, k]`, body to NED.
    #[default]
    Quaternion,
    /// Euler angles `[roll, pitch, yaw]` (rad), ZYX sequence.
    Euler,
}

impl AttitudeRepr {
    pub const fn len(self) -> usize {
        match self {
            AttitudeRepr::Quaternion => 4,
            AttitudeRepr::Euler => 3,
        }
    }
}

/// Fixed ordering of the flattened state vector:
/// `attitude | angular rate | position | velocity | auxiliary`.
///
/// A layout is chosen by the dynamics model and never changes during a run, so
/// solvers can rely on stable indexing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateLayout {
    pub attitude: AttitudeRepr,
    /// Number of auxiliary integrator states (e.g. engine spool states).
    pub aux_len: usize,
}

impl StateLayout {
    pub const fn new(attitude: AttitudeRepr, aux_len: usize) -> Self {
        Self { attitude, aux_len }
    }

    /// Total length of the flattened vector.
    pub const fn dimension(&self) -> usize {
        self.attitude.len() + 9 + self.aux_len
    }

    pub const fn angular_rate_offset(&self) -> usize {
        self.attitude.len()
    }

    pub const fn position_offset(&self) -> usize {
        self.attitude.len() + 3
    }

    pub const fn velocity_offset(&self) -> usize {
        self.attitude.len() + 6
    }

    pub const fn aux_offset(&self) -> usize {
        self.attitude.len() + 9
    }
}

impl Default for StateLayout {
    fn default() -> Self {
        Self::new(AttitudeRepr::Quaternion, 0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Attitude {
    /// Stored un-normalised so flatten/unflatten stays exact.
    Quaternion(Quaternion<f64>),
    Euler(Vector3<f64>),
}

impl Attitude {
    pub fn from_euler_angles(repr: AttitudeRepr, roll: f64, pitch: f64, yaw: f64) -> Self {
        match repr {
            AttitudeRepr::Quaternion => Attitude::Quaternion(
                UnitQuaternion::from_euler_angles(roll, pitch, yaw).into_inner(),
            ),
            AttitudeRepr::Euler => Attitude::Euler(Vector3::new(roll, pitch, yaw)),
        }
    }

    pub fn identity(repr: AttitudeRepr) -> Self {
        Self::from_euler_angles(repr, 0.0, 0.0, 0.0)
    }

    /// All-zero attitude block, used for derivatives.
    pub fn zeros(repr: AttitudeRepr) -> Self {
        match repr {
            AttitudeRepr::Quaternion => Attitude::Quaternion(Quaternion::new(0.0, 0.0, 0.0, 0.0)),
            AttitudeRepr::Euler => Attitude::Euler(Vector3::zeros()),
        }
    }

    pub fn repr(&self) -> AttitudeRepr {
        match self {
            Attitude::Quaternion(_) => AttitudeRepr::Quaternion,
            Attitude::Euler(_) => AttitudeRepr::Euler,
        }
    }

    /// Body-to-NED rotation. The quaternion is normalised here and only here.
    pub fn rotation(&self) -> UnitQuaternion<f64> {
        match self {
            Attitude::Quaternion(q) => UnitQuaternion::from_quaternion(*q),
            Attitude::Euler(e) => UnitQuaternion::from_euler_angles(e.x, e.y, e.z),
        }
    }

    /// `(roll, pitch, yaw)` in radians.
    pub fn euler_angles(&self) -> (f64, f64, f64) {
        match self {
            Attitude::Quaternion(_) => self.rotation().euler_angles(),
            Attitude::Euler(e) => (e.x, e.y, e.z),
        }
    }

    /// Attitude kinematics for body rates `omega`.
    pub fn rate(&self, omega: &Vector3<f64>) -> Attitude {
        match self {
            Attitude::Quaternion(q) => Attitude::Quaternion(*q * Quaternion::from_imag(*omega) * 0.5),
            Attitude::Euler(e) => {
                let (sin_phi, cos_phi) = e.x.sin_cos();
                let (p, q, r) = (omega.x, omega.y, omega.z);
                // Singular at pitch = ±90°
                let cos_theta = e.y.cos();
                let phi_dot = p + (q * sin_phi + r * cos_phi) * e.y.tan();
                let theta_dot = q * cos_phi - r * sin_phi;
                let psi_dot = (q * sin_phi + r * cos_phi) / cos_theta;
                Attitude::Euler(Vector3::new(phi_dot, theta_dot, psi_dot))
            }
        }
    }

    fn components(&self) -> Vec<f64> {
        match self {
            Attitude::Quaternion(q) => vec![q.w, q.i, q.j, q.k],
            Attitude::Euler(e) => vec![e.x, e.y, e.z],
        }
    }

    fn from_components(repr: AttitudeRepr, values: &[f64]) -> Self {
        match repr {
            AttitudeRepr::Quaternion => {
                Attitude::Quaternion(Quaternion::new(values[0], values[1], values[2], values[3]))
            }
            AttitudeRepr::Euler => Attitude::Euler(Vector3::new(values[0], values[1], values[2])),
        }
    }
}

/// Dynamical state of the vehicle.
///
/// The same type carries state derivatives: a derivative is a `VehicleState` whose
/// fields hold rates, laid out identically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleState {
    pub attitude: Attitude,
    /// Body rates `[p, q, r]` (rad/s).
    pub angular_rate: Vector3<f64>,
    /// NED position (m).
    pub position: Vector3<f64>,
    /// Body-frame velocity `[u, v, w]` (m/s).
    pub velocity: Vector3<f64>,
    pub aux: Vec<f64>,
}

impl VehicleState {
    /// Level, motionless state at the origin.
    pub fn new(layout: StateLayout) -> Self {
        Self {
            attitude: Attitude::identity(layout.attitude),
            angular_rate: Vector3::zeros(),
            position: Vector3::zeros(),
            velocity: Vector3::zeros(),
            aux: vec![0.0; layout.aux_len],
        }
    }

    /// All-zero vector in `layout`, the additive identity for derivatives.
    pub fn zeros(layout: StateLayout) -> Self {
        Self {
            attitude: Attitude::zeros(layout.attitude),
            ..Self::new(layout)
        }
    }

    pub fn layout(&self) -> StateLayout {
        StateLayout::new(self.attitude.repr(), self.aux.len())
    }

    pub fn flatten(&self) -> DVector<f64> {
        let layout = self.layout();
        let mut values = Vec::with_capacity(layout.dimension());
        values.extend(self.attitude.components());
        values.extend(self.angular_rate.iter());
        values.extend(self.position.iter());
        values.extend(self.velocity.iter());
        values.extend(self.aux.iter());
        DVector::from_vec(values)
    }

    pub fn unflatten(layout: &StateLayout, values: &[f64]) -> Result<Self> {
        let expected = layout.dimension();
        if values.len() != expected {
            return Err(SimError::ShapeMismatch {
                expected,
                actual: values.len(),
            });
        }

        let vec3 = |offset: usize| {
            Vector3::new(values[offset], values[offset + 1], values[offset + 2])
        };

        Ok(Self {
            attitude: Attitude::from_components(layout.attitude, &values[..layout.attitude.len()]),
            angular_rate: vec3(layout.angular_rate_offset()),
            position: vec3(layout.position_offset()),
            velocity: vec3(layout.velocity_offset()),
            aux: values[layout.aux_offset()..].to_vec(),
        })
    }

    /// `self + dt * derivative`, element-wise over the flattened form.
    pub fn advanced(&self, derivative: &VehicleState, dt: f64) -> Result<Self> {
        let layout = self.layout();
        if derivative.layout() != layout {
            return Err(SimError::ShapeMismatch {
                expected: layout.dimension(),
                actual: derivative.layout().dimension(),
            });
        }
        let next = self.flatten() + derivative.flatten() * dt;
        Self::unflatten(&layout, next.as_slice())
    }

    /// Velocity resolved in the NED frame.
    pub fn inertial_velocity(&self) -> Vector3<f64> {
        self.attitude.rotation() * self.velocity
    }

    pub fn airspeed(&self) -> f64 {
        self.velocity.norm()
    }
}
