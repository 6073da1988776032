use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    pub wind: WindModelConfig,
    pub atmosphere: AtmosphereType,
}

/// Wind field models, parameterised as in `aerso::wind_models`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindModelConfig {
    Constant {
        velocity: Vector3<f64>,
    },
    Logarithmic {
        d: f64,
        z0: f64,
        u_star: f64,
        bearing: f64,
    },
    PowerLaw {
        u_r: f64,
        z_r: f64,
        bearing: f64,
        alpha: f64,
    },
}

impl Default for WindModelConfig {
    fn default() -> Self {
        WindModelConfig::Constant {
            velocity: Vector3::zeros(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AtmosphereType {
    /// Sea level density everywhere.
    Constant,
    /// ISA troposphere.
    #[default]
    Standard,
}
