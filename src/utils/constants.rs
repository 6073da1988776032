pub const GRAVITY: f64 = 9.80665; // m/s^2
pub const SEA_LEVEL_DENSITY: f64 = 1.225; // kg/m^3
pub const SPEED_OF_SOUND_SEA_LEVEL: f64 = 340.3; // m/s

// Aerodynamic model validity envelope
pub const ALPHA_LIMITS_DEG: (f64, f64) = (-10.0, 40.0);
pub const BETA_LIMIT_DEG: f64 = 20.0;
pub const ROLL_RATE_LIMIT_DEG: f64 = 100.0;
pub const PITCH_YAW_RATE_LIMIT_DEG: f64 = 50.0;

// Below this dynamic pressure the aerodynamic build-up is skipped
pub const MIN_DYNAMIC_PRESSURE: f64 = 1e-6;
pub const MIN_AIRSPEED: f64 = 0.1;
