use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

/// Mass and inertia properties, body axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MassModel {
    /// Total mass (kg).
    pub mass: f64,
    pub ixx: f64,
    pub iyy: f64,
    pub izz: f64,
    /// Product of inertia between the x and z axes (kg·m²).
    pub ixz: f64,
}

impl MassModel {
    pub fn new(mass: f64, ixx: f64, iyy: f64, izz: f64, ixz: f64) -> Self {
        Self {
            mass,
            ixx,
            iyy,
            izz,
            ixz,
        }
    }

    pub fn inertia(&self) -> Matrix3<f64> {
        Matrix3::from_columns(&[
            Vector3::new(self.ixx, 0.0, -self.ixz),
            Vector3::new(0.0, self.iyy, 0.0),
            Vector3::new(-self.ixz, 0.0, self.izz),
        ])
    }

    pub fn twin_otter() -> Self {
        Self::new(4874.8, 28366.4, 32852.8, 52097.3, 1384.3)
    }

    pub fn cessna_172() -> Self {
        Self::new(1043.3, 1285.3, 1824.9, 2666.9, 0.0)
    }
}
