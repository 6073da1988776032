use serde::{Deserialize, Serialize};

/// Reference geometry used to dimensionalise aerodynamic coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AircraftGeometry {
    /// Reference wing area S (m²).
    pub wing_area: f64,
    /// Span b, scales the lateral moments (m).
    pub wing_span: f64,
    /// Mean aerodynamic chord c̄, scales the pitching moment (m).
    pub mac: f64,
}

impl AircraftGeometry {
    pub fn new(wing_area: f64, wing_span: f64, mac: f64) -> Self {
        Self {
            wing_area,
            wing_span,
            mac,
        }
    }

    pub fn twin_otter() -> Self {
        Self::new(39.0, 19.8, 1.98)
    }

    pub fn cessna_172() -> Self {
        Self::new(16.2, 11.0, 1.49)
    }
}
