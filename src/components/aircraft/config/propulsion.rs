use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// One engine. Thrust interpolates between `min_thrust` and `max_thrust` with the
/// engine's thrust fraction, which lags the throttle command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerplantConfig {
    pub name: String,
    /// Sea-level static thrust at full fraction (N).
    pub max_thrust: f64,
    /// Idle thrust at zero fraction (N).
    pub min_thrust: f64,
    /// Thrust point relative to the CG, body axes (m).
    pub position: Vector3<f64>,
    /// Thrust line as roll/pitch/yaw offsets from body x (rad).
    pub orientation: Vector3<f64>,
    /// Lag time constant while the fraction rises (s).
    pub spool_up_time: f64,
    /// Lag time constant while the fraction falls (s).
    pub spool_down_time: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropulsionConfig {
    pub engines: Vec<PowerplantConfig>,
}

impl Default for PowerplantConfig {
    fn default() -> Self {
        Self {
            name: "Generic Engine".to_string(),
            max_thrust: 20000.0,
            min_thrust: 1000.0,
            position: Vector3::zeros(),
            orientation: Vector3::zeros(),
            spool_up_time: 3.0,
            spool_down_time: 2.0,
        }
    }
}

impl PropulsionConfig {
    pub fn single_engine(engine: PowerplantConfig) -> Self {
        Self {
            engines: vec![engine],
        }
    }

    /// Two copies of `engine` mirrored about the x-z plane.
    pub fn twin_engine(
        engine: PowerplantConfig,
        y_offset: f64,
        x_offset: f64,
        z_offset: f64,
    ) -> Self {
        let left = PowerplantConfig {
            position: Vector3::new(x_offset, -y_offset, z_offset),
            name: format!("{} (left)", engine.name),
            ..engine.clone()
        };
        let right = PowerplantConfig {
            position: Vector3::new(x_offset, y_offset, z_offset),
            name: format!("{} (right)", engine.name),
            ..engine
        };
        Self {
            engines: vec![left, right],
        }
    }

    pub fn twin_otter() -> Self {
        let base_engine = PowerplantConfig {
            name: "PT6A-27".to_string(),
            max_thrust: 12000.0,
            min_thrust: 600.0,
            spool_up_time: 2.5,
            spool_down_time: 1.8,
            ..Default::default()
        };
        Self::twin_engine(base_engine, 5.0, -0.5, 0.3)
    }

    pub fn cessna_172() -> Self {
        Self::single_engine(PowerplantConfig {
            name: "Lycoming O-320".to_string(),
            max_thrust: 3000.0,
            min_thrust: 0.0,
            spool_up_time: 1.0,
            spool_down_time: 1.0,
            ..Default::default()
        })
    }

    pub fn len(&self) -> usize {
        self.engines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }
}
