/// Coefficients of an embedded explicit Runge-Kutta pair.
///
/// `b` advances the solution; `b2` is the embedded lower order estimate. When the
/// last row of `a` equals `b` the final stage is the first stage of the next step.
pub struct ButcherTableau<const STAGES: usize> {
    pub a: [[f64; STAGES]; STAGES],
    pub b: [f64; STAGES],
    pub b2: [f64; STAGES],
    pub c: [f64; STAGES],
    /// Order of the propagated solution.
    pub order: u32,
    /// Order of the embedded solution.
    pub error_order: u32,
    pub fsal: bool,
}

impl ButcherTableau<7> {
    // usage is ButcherTableau::<7>::DORMANDPRINCE45
    pub const DORMANDPRINCE45: Self = Self {
        a: [
            [0., 0., 0., 0., 0., 0., 0.],
            [1. / 5., 0., 0., 0., 0., 0., 0.],
            [3. / 40., 9. / 40., 0., 0., 0., 0., 0.],
            [44. / 45., -56. / 15., 32. / 9., 0., 0., 0., 0.],
            [
                19372. / 6561.,
                -25360. / 2187.,
                64448. / 6561.,
                -212. / 729.,
                0.,
                0.,
                0.,
            ],
            [
                9017. / 3168.,
                -355. / 33.,
                46732. / 5247.,
                49. / 176.,
                -5103. / 18656.,
                0.,
                0.,
            ],
            [
                35. / 384.,
                0.,
                500. / 1113.,
                125. / 192.,
                -2187. / 6784.,
                11. / 84.,
                0.,
            ],
        ],
        b: [
            35. / 384.,
            0.,
            500. / 1113.,
            125. / 192.,
            -2187. / 6784.,
            11. / 84.,
            0.,
        ],
        b2: [
            5179. / 57600.,
            0.,
            7571. / 16695.,
            393. / 640.,
            -92097. / 339200.,
            187. / 2100.,
            1. / 40.,
        ],
        c: [0., 1. / 5., 3. / 10., 4. / 5., 8. / 9., 1.0, 1.0],
        order: 5,
        error_order: 4,
        fsal: true,
    };
}

impl ButcherTableau<4> {
    // usage is ButcherTableau::<4>::BOGACKISHAMPINE23
    pub const BOGACKISHAMPINE23: Self = Self {
        a: [
            [0., 0., 0., 0.],
            [1. / 2., 0., 0., 0.],
            [0., 3. / 4., 0., 0.],
            [2. / 9., 1. / 3., 4. / 9., 0.],
        ],
        b: [2. / 9., 1. / 3., 4. / 9., 0.],
        b2: [7. / 24., 1. / 4., 1. / 3., 1. / 8.],
        c: [0., 1. / 2., 3. / 4., 1.0],
        order: 3,
        error_order: 2,
        fsal: true,
    };
}
