use serde::{Deserialize, Serialize};

use crate::utils::{Result, SimError};

/// Ordered control commands `[aileron, elevator, throttle, rudder]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ControlVector {
    pub aileron: f64,  // [-1, 1]
    pub elevator: f64, // [-1, 1]
    pub throttle: f64, // [0, 1]
    pub rudder: f64,   // [-1, 1]
}

impl ControlVector {
    pub const LEN: usize = 4;

    pub fn new(aileron: f64, elevator: f64, throttle: f64, rudder: f64) -> Self {
        Self {
            aileron,
            elevator,
            throttle,
            rudder,
        }
    }

    pub fn to_array(&self) -> [f64; 4] {
        [self.aileron, self.elevator, self.throttle, self.rudder]
    }

    pub fn from_slice(values: &[f64]) -> Result<Self> {
        match values {
            [aileron, elevator, throttle, rudder] => {
                Ok(Self::new(*aileron, *elevator, *throttle, *rudder))
            }
            _ => Err(SimError::ShapeMismatch {
                expected: Self::LEN,
                actual: values.len(),
            }),
        }
    }

    pub fn clamped(&self, limits: &ControlLimits) -> Self {
        Self {
            aileron: self.aileron.clamp(limits.aileron.0, limits.aileron.1),
            elevator: self.elevator.clamp(limits.elevator.0, limits.elevator.1),
            throttle: self.throttle.clamp(limits.throttle.0, limits.throttle.1),
            rudder: self.rudder.clamp(limits.rudder.0, limits.rudder.1),
        }
    }
}

/// Deflection and throttle ranges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlLimits {
    pub aileron: (f64, f64),
    pub elevator: (f64, f64),
    pub throttle: (f64, f64),
    pub rudder: (f64, f64),
}

impl Default for ControlLimits {
    fn default() -> Self {
        Self {
            aileron: (-1.0, 1.0),
            elevator: (-1.0, 1.0),
            throttle: (0.0, 1.0),
            rudder: (-1.0, 1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_conversion() {
        let controls = ControlVector::new(0.1, -0.2, 0.6, 0.0);
        assert_eq!(ControlVector::from_slice(&controls.to_array()).unwrap(), controls);
        assert!(matches!(
            ControlVector::from_slice(&[0.0; 3]),
            Err(SimError::ShapeMismatch {
                expected: 4,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_clamped_to_limits() {
        let controls = ControlVector::new(-3.0, 0.5, 1.4, 2.0).clamped(&ControlLimits::default());
        assert_eq!(controls, ControlVector::new(-1.0, 0.5, 1.0, 1.0));
    }
}
