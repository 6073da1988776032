mod aero_coef;
mod aircraft;
mod geometry;
mod mass;
mod propulsion;

pub use aero_coef::{
    AircraftAeroCoefficients, DragCoefficients, LiftCoefficients, PitchCoefficients,
    RollCoefficients, SideForceCoefficients, YawCoefficients,
};
pub use aircraft::{AircraftConfig, AircraftSource, AircraftType};
pub use geometry::AircraftGeometry;
pub use mass::MassModel;
pub use propulsion::{PowerplantConfig, PropulsionConfig};
