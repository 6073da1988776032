use serde::{Deserialize, Serialize};

/// Polynomial aerodynamic coefficient set, one block per force/moment axis.
#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AircraftAeroCoefficients {
    pub drag: DragCoefficients,
    pub lift: LiftCoefficients,
    pub side_force: SideForceCoefficients,
    pub roll: RollCoefficients,
    pub pitch: PitchCoefficients,
    pub yaw: YawCoefficients,
}

/// Drag polynomial in α, with q and δe cross terms.
#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragCoefficients {
    /// Zero-α drag.
    pub c_d_0: f64,
    pub c_d_alpha: f64,
    pub c_d_alpha_q: f64,
    pub c_d_alpha_deltae: f64,
    pub c_d_alpha2: f64,
    pub c_d_alpha2_q: f64,
    pub c_d_alpha2_deltae: f64,
    pub c_d_alpha3: f64,
    pub c_d_alpha3_q: f64,
    pub c_d_alpha4: f64,
}

/// Lift polynomial in α.
#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiftCoefficients {
    /// Zero-α lift.
    pub c_l_0: f64,
    /// Lift curve slope (per rad).
    pub c_l_alpha: f64,
    pub c_l_q: f64,
    pub c_l_deltae: f64,
    pub c_l_alpha_q: f64,
    pub c_l_alpha2: f64,
    pub c_l_alpha3: f64,
    pub c_l_alpha4: f64,
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SideForceCoefficients {
    pub c_y_beta: f64,
    pub c_y_p: f64,
    pub c_y_r: f64,
    pub c_y_deltaa: f64,
    pub c_y_deltar: f64,
}

/// Rolling moment coefficients (Cl).
#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RollCoefficients {
    pub c_l_beta: f64,
    pub c_l_p: f64,
    pub c_l_r: f64,
    pub c_l_deltaa: f64,
    pub c_l_deltar: f64,
}

/// Pitching moment coefficients (Cm).
#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PitchCoefficients {
    /// Pitching moment at zero angle of attack.
    pub c_m_0: f64,
    /// Static stability derivative, negative for a stable airframe.
    pub c_m_alpha: f64,
    /// Pitch damping.
    pub c_m_q: f64,
    /// Elevator effectiveness.
    pub c_m_deltae: f64,
    pub c_m_alpha_q: f64,
    pub c_m_alpha2_q: f64,
    pub c_m_alpha2_deltae: f64,
    pub c_m_alpha3_q: f64,
    pub c_m_alpha3_deltae: f64,
    pub c_m_alpha4: f64,
}

/// Yawing moment coefficients (Cn).
#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct YawCoefficients {
    pub c_n_beta: f64,
    pub c_n_p: f64,
    pub c_n_r: f64,
    pub c_n_deltaa: f64,
    pub c_n_deltar: f64,
    pub c_n_beta2: f64,
    pub c_n_beta3: f64,
}

impl AircraftAeroCoefficients {
    pub fn twin_otter() -> Self {
        Self {
            drag: DragCoefficients {
                c_d_0: 0.108,
                c_d_alpha: 0.138,
                c_d_alpha_q: -54.05,
                c_d_alpha_deltae: 0.111,
                c_d_alpha2: 2.988,
                c_d_alpha2_q: -302.1,
                c_d_alpha2_deltae: 0.156,
                c_d_alpha3: -7.743,
                c_d_alpha3_q: -218.8,
                c_d_alpha4: 11.77,
            },
            lift: LiftCoefficients {
                c_l_0: 0.215,
                c_l_alpha: 4.370,
                c_l_q: 25.05,
                c_l_deltae: 0.291,
                c_l_alpha_q: 52.78,
                c_l_alpha2: 16.62,
                c_l_alpha3: -87.67,
                c_l_alpha4: 90.41,
            },
            side_force: SideForceCoefficients {
                c_y_beta: -0.885,
                c_y_p: -0.090,
                c_y_r: 1.697,
                c_y_deltaa: -0.051,
                c_y_deltar: -0.193,
            },
            roll: RollCoefficients {
                c_l_beta: -0.112,
                c_l_p: -0.413,
                c_l_r: 0.191,
                c_l_deltaa: 0.206,
                c_l_deltar: 0.116,
            },
            pitch: PitchCoefficients {
                c_m_0: 0.057,
                c_m_alpha: -1.419,
                c_m_q: -27.95,
                c_m_deltae: 1.626,
                c_m_alpha_q: 100.7,
                c_m_alpha2_q: -759.2,
                c_m_alpha2_deltae: 7.664,
                c_m_alpha3_q: 1103.0,
                c_m_alpha3_deltae: -8.121,
                c_m_alpha4: 2.468,
            },
            yaw: YawCoefficients {
                c_n_beta: 0.088,
                c_n_p: -0.043,
                c_n_r: -0.426,
                c_n_deltaa: 0.023,
                c_n_deltar: -0.087,
                c_n_beta2: 0.337,
                c_n_beta3: -0.766,
            },
        }
    }

    /// Linear-only set, easy to trim.
    pub fn cessna_172() -> Self {
        Self {
            drag: DragCoefficients {
                c_d_0: 0.03,
                c_d_alpha2: 0.3,
                ..Default::default()
            },
            lift: LiftCoefficients {
                c_l_0: 0.3,
                c_l_alpha: 4.0,
                c_l_q: 3.9,
                c_l_deltae: 0.43,
                ..Default::default()
            },
            side_force: SideForceCoefficients {
                c_y_beta: -0.5,
                ..Default::default()
            },
            roll: RollCoefficients {
                c_l_beta: -0.1,
                c_l_p: -0.5,
                c_l_deltaa: 0.2,
                ..Default::default()
            },
            pitch: PitchCoefficients {
                c_m_0: 0.04,
                c_m_alpha: -0.9,
                c_m_q: -12.0,
                c_m_deltae: -1.2,
                ..Default::default()
            },
            yaw: YawCoefficients {
                c_n_beta: 0.1,
                c_n_r: -0.15,
                c_n_deltar: -0.07,
                ..Default::default()
            },
        }
    }
}
