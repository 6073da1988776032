use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{AircraftAeroCoefficients, AircraftGeometry, MassModel, PropulsionConfig};
use crate::utils::{Result, SimError};

/// The full aircraft configuration, including mass, geometry, propulsion and aerodynamic coefficients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AircraftConfig {
    /// Name of the aircraft, defaults to type name.
    pub name: String,
    /// Mass model of the aircraft, including weight and inertia properties.
    pub mass: MassModel,
    /// The geometric reference properties of the aircraft.
    pub geometry: AircraftGeometry,
    /// Aerodynamic coefficients for calculating forces and moments on the aircraft.
    #[serde(default)]
    pub aero_coef: AircraftAeroCoefficients,
    #[serde(default)]
    pub propulsion: PropulsionConfig,
}

impl Default for AircraftConfig {
    /// The `TwinOtter` configuration is chosen as the default for convenience.
    fn default() -> Self {
        Self::twin_otter()
    }
}

impl AircraftConfig {
    /// Creates a new aircraft configuration from a given source.
    pub fn new(source: AircraftSource) -> Result<Self> {
        match source {
            AircraftSource::Programmed(aircraft_type) => Ok(Self::from_programmed(aircraft_type)),
            AircraftSource::File(path) => Self::from_file(path),
        }
    }

    fn from_programmed(aircraft_type: AircraftType) -> Self {
        match aircraft_type {
            AircraftType::TwinOtter => Self {
                name: "TwinOtter".to_string(),
                mass: MassModel::twin_otter(),
                geometry: AircraftGeometry::twin_otter(),
                aero_coef: AircraftAeroCoefficients::twin_otter(),
                propulsion: PropulsionConfig::twin_otter(),
            },
            AircraftType::Cessna172 => Self {
                name: "Cessna172".to_string(),
                mass: MassModel::cessna_172(),
                geometry: AircraftGeometry::cessna_172(),
                aero_coef: AircraftAeroCoefficients::cessna_172(),
                propulsion: PropulsionConfig::cessna_172(),
            },
        }
    }

    /// Creates an aircraft configuration by reading a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading aircraft config from {}", path.display());
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects physically meaningless mass or geometry.
    pub fn validate(&self) -> Result<()> {
        if !(self.mass.mass > 0.0) {
            return Err(SimError::InvalidConfig(format!(
                "aircraft mass must be positive, got {}",
                self.mass.mass
            )));
        }
        let geometry = &self.geometry;
        if !(geometry.wing_area > 0.0 && geometry.wing_span > 0.0 && geometry.mac > 0.0) {
            return Err(SimError::InvalidConfig(
                "wing area, span and chord must be positive".to_string(),
            ));
        }
        for engine in &self.propulsion.engines {
            if engine.min_thrust > engine.max_thrust {
                return Err(SimError::InvalidConfig(format!(
                    "engine '{}' has min thrust above max thrust",
                    engine.name
                )));
            }
            if !(engine.spool_up_time > 0.0 && engine.spool_down_time > 0.0) {
                return Err(SimError::InvalidConfig(format!(
                    "engine '{}' spool time constants must be positive",
                    engine.name
                )));
            }
        }
        Ok(())
    }

    pub fn twin_otter() -> Self {
        Self::from_programmed(AircraftType::TwinOtter)
    }

    pub fn cessna_172() -> Self {
        Self::from_programmed(AircraftType::Cessna172)
    }
}

/// Source for aircraft configuration.
/// Can either be a hardcoded configuration (`Programmed`) or loaded from a file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AircraftSource {
    Programmed(AircraftType),
    File(PathBuf),
}

impl Default for AircraftSource {
    fn default() -> Self {
        AircraftSource::Programmed(AircraftType::TwinOtter)
    }
}

/// Enumeration of built-in aircraft types.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum AircraftType {
    TwinOtter,
    Cessna172,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        assert!(AircraftConfig::twin_otter().validate().is_ok());
        assert!(AircraftConfig::cessna_172().validate().is_ok());
        assert_eq!(AircraftConfig::twin_otter().propulsion.len(), 2);
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = AircraftConfig::cessna_172();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let loaded = AircraftConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_coefficients_default_to_zero() {
        let yaml = r#"
name: Glider
mass: { mass: 300.0, ixx: 500.0, iyy: 600.0, izz: 1000.0, ixz: 0.0 }
geometry: { wing_area: 12.0, wing_span: 15.0, mac: 0.8 }
aero_coef:
  lift: { c_l_alpha: 5.5 }
"#;
        let config = AircraftConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.aero_coef.lift.c_l_alpha, 5.5);
        assert_eq!(config.aero_coef.drag.c_d_0, 0.0);
        assert!(config.propulsion.is_empty());
    }

    #[test]
    fn test_negative_mass_rejected() {
        let mut config = AircraftConfig::twin_otter();
        config.mass.mass = -1.0;
        assert!(matches!(
            config.validate(),
            Err(SimError::InvalidConfig(_))
        ));
    }
}
