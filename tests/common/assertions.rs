use flysim::{
    state::{ControlVector, TimeSeriesRecord, VehicleState},
    systems::dynamics::DynamicsModel,
};

#[track_caller]
pub fn assert_strictly_increasing(times: &[f64]) {
    for pair in times.windows(2) {
        assert!(
            pair[1] > pair[0],
            "Time series not strictly increasing: {} followed by {}",
            pair[0],
            pair[1]
        );
    }
}

/// Both series monotonic, every state sample of length `dimension` and finite.
#[track_caller]
pub fn assert_record_valid(record: &TimeSeriesRecord, dimension: usize) {
    assert_strictly_increasing(record.states.times());
    assert_strictly_increasing(record.inputs.times());
    for (t, values) in record.states.iter() {
        assert_eq!(values.len(), dimension, "State sample at t = {} has wrong length", t);
        assert!(
            values.iter().all(|v| v.is_finite()),
            "State sample at t = {} is not finite",
            t
        );
    }
}

#[track_caller]
pub fn assert_state_finite(state: &VehicleState) {
    assert!(
        state.flatten().iter().all(|v| v.is_finite()),
        "State contains non-finite values: {:?}",
        state
    );
}

/// Translational and rotational accelerations below `tolerance` at `(state, controls)`.
#[track_caller]
pub fn assert_trimmed(
    model: &dyn DynamicsModel,
    state: &VehicleState,
    controls: &ControlVector,
    tolerance: f64,
) {
    let output = model
        .evaluate(state, controls, 0.0)
        .expect("model evaluates at the trim point");
    let derivative = output.derivative;
    assert!(
        derivative.velocity.amax() < tolerance,
        "Residual linear acceleration {:?}",
        derivative.velocity
    );
    assert!(
        derivative.angular_rate.amax() < tolerance,
        "Residual angular acceleration {:?}",
        derivative.angular_rate
    );
}
