mod feedback;

pub use feedback::{FeedbackController, FeedbackGains};

use crate::state::{ControlVector, VehicleState};

/// Produces the control commands applied at `(state, t)`.
pub trait Controller {
    fn compute(&self, state: &VehicleState, t: f64) -> ControlVector;
}

impl<C: Controller + ?Sized> Controller for Box<C> {
    fn compute(&self, state: &VehicleState, t: f64) -> ControlVector {
        (**self).compute(state, t)
    }
}

/// Holds one control vector for the whole run, typically the trim controls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticController {
    controls: ControlVector,
}

impl StaticController {
    pub fn new(controls: ControlVector) -> Self {
        Self { controls }
    }
}

impl Controller for StaticController {
    fn compute(&self, _state: &VehicleState, _t: f64) -> ControlVector {
        self.controls
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::StateLayout;

    #[test]
    fn test_static_controller_ignores_state_and_time() {
        let controls = ControlVector::new(0.0, -0.05, 0.4, 0.0);
        let controller = StaticController::new(controls);
        let mut state = VehicleState::new(StateLayout::default());
        assert_eq!(controller.compute(&state, 0.0), controls);
        state.angular_rate.y = 1.0;
        assert_eq!(controller.compute(&state, 25.0), controls);
    }
}
