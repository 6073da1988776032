mod controls;
mod record;
mod vehicle;

pub use controls::{ControlLimits, ControlVector};
pub use record::{TimeSeries, TimeSeriesRecord};
pub use vehicle::{Attitude, AttitudeRepr, StateLayout, VehicleState};
