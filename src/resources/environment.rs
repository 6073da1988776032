use aerso::density_models::{ConstantDensity, StandardDensity};
use aerso::wind_models::{ConstantWind, LogWind, PowerWind};
use aerso::{DensityModel, WindModel};
use nalgebra::Vector3;

use super::config::environment::{AtmosphereType, EnvironmentConfig, WindModelConfig};

/// Density and wind lookup, positions in NED (z down).
pub struct EnvironmentResource {
    wind_model: Box<dyn WindModel<f64> + Send + Sync>,
    density_model: Box<dyn DensityModel<f64> + Send + Sync>,
}

impl EnvironmentResource {
    pub fn new(config: &EnvironmentConfig) -> Self {
        let wind_model = match &config.wind {
            WindModelConfig::Constant { velocity } => {
                Box::new(ConstantWind::new(*velocity)) as Box<dyn WindModel<f64> + Send + Sync>
            }
            WindModelConfig::Logarithmic {
                d,
                z0,
                u_star,
                bearing,
            } => Box::new(LogWind::new(*d, *z0, *u_star, *bearing))
                as Box<dyn WindModel<f64> + Send + Sync>,
            WindModelConfig::PowerLaw {
                u_r,
                z_r,
                bearing,
                alpha,
            } => Box::new(PowerWind::new_with_alpha(*u_r, *z_r, *bearing, *alpha))
                as Box<dyn WindModel<f64> + Send + Sync>,
        };

        let density_model = match config.atmosphere {
            AtmosphereType::Constant => {
                Box::new(ConstantDensity) as Box<dyn DensityModel<f64> + Send + Sync>
            }
            AtmosphereType::Standard => {
                Box::new(StandardDensity) as Box<dyn DensityModel<f64> + Send + Sync>
            }
        };

        Self {
            wind_model,
            density_model,
        }
    }

    /// Still air, constant sea level density.
    pub fn calm() -> Self {
        Self::new(&EnvironmentConfig {
            wind: WindModelConfig::default(),
            atmosphere: AtmosphereType::Constant,
        })
    }

    pub fn get_wind(&self, position: &Vector3<f64>) -> Vector3<f64> {
        self.wind_model.get_wind(position)
    }

    pub fn get_density(&self, position: &Vector3<f64>) -> f64 {
        self.density_model.get_density(position)
    }
}

impl std::fmt::Debug for EnvironmentResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvironmentResource").finish_non_exhaustive()
    }
}
