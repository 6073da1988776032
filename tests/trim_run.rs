mod common;

use approx::assert_relative_eq;
use flysim::{
    resources::{ControllerConfig, EnvironmentResource},
    run,
    state::AttitudeRepr,
    systems::{
        dynamics::RigidBodyDynamics,
        trim::{TrimCondition, TrimSolverConfig, Trimmer},
        FeedbackGains,
    },
    SimError,
};

use common::*;

#[test]
fn test_trim_seeds_the_run() {
    let config = trimmed_level_config(0, 1.0);
    let output = run(&config, trainer_aircraft()).unwrap();
    let trim = output.trim.as_ref().expect("trim enabled");

    assert!(trim.residual < config.trim.solver.tolerance);
    let record = &output.record;
    assert_eq!(
        record.states.values()[0],
        trim.state.flatten().as_slice().to_vec()
    );
    // Static controller holds the trim controls throughout
    assert!(record.inputs.values().iter().all(|u| *u == trim.controls));
    assert_eq!(output.steps, 100);
}

#[test]
fn test_trim_result_is_an_equilibrium() {
    let config = trimmed_level_config(0, 0.5);
    let output = run(&config, trainer_aircraft()).unwrap();
    let trim = output.trim.expect("trim enabled");

    let model = RigidBodyDynamics::new(
        trainer_aircraft(),
        EnvironmentResource::new(&config.environment),
        config.initial.attitude_repr,
    )
    .unwrap();
    assert_trimmed(&model, &trim.state, &trim.controls, config.trim.solver.tolerance);
}

#[test]
fn test_trim_keeps_initial_position_and_heading() {
    let mut config = trimmed_level_config(0, 0.5);
    config.initial.position.z = -500.0;
    config.initial.euler_angles.z = 0.5;
    let output = run(&config, trainer_aircraft()).unwrap();
    let state = output.trim.expect("trim enabled").state;

    assert_relative_eq!(state.position.z, -500.0);
    let (_, _, yaw) = state.attitude.euler_angles();
    assert_relative_eq!(yaw, 0.5, epsilon = 1e-9);
}

#[test]
fn test_divergent_trim_stops_the_run() {
    let mut config = trimmed_level_config(0, 1.0);
    config.trim.solver = TrimSolverConfig {
        max_iterations: 1,
        use_gradient_refinement: false,
        ..Default::default()
    };
    assert!(matches!(
        run(&config, trainer_aircraft()),
        Err(SimError::TrimDivergence { .. })
    ));
}

#[test]
fn test_feedback_controller_holds_climb() {
    let gamma = 0.05;
    let mut config = trimmed_level_config(1, 5.0);
    config.trim.condition = TrimCondition::SteadyClimb {
        airspeed: 60.0,
        gamma,
    };
    config.controller = ControllerConfig::Feedback {
        gains: FeedbackGains::default(),
    };
    let output = run(&config, trainer_aircraft()).unwrap();
    let trim = output.trim.as_ref().expect("trim enabled");

    let record = &output.record;
    let layout = trim.state.layout();
    assert_record_valid(record, layout.dimension());
    let down = layout.position_offset() + 2;
    let climb = -(record.states.values().last().unwrap()[down] - record.states.values()[0][down]);
    // 5 s at 60 m/s along a 0.05 rad path
    assert_relative_eq!(climb, 5.0 * 60.0 * gamma.sin(), epsilon = 2.0);
}

#[test]
fn test_trim_with_euler_attitude() {
    let model = RigidBodyDynamics::new(
        trainer_aircraft(),
        EnvironmentResource::calm(),
        AttitudeRepr::Euler,
    )
    .unwrap();
    let settings = TrimSolverConfig::default();
    let mut trimmer = Trimmer::new(
        &model,
        TrimCondition::StraightAndLevel { airspeed: 50.0 },
        settings,
    );
    trimmer.calc_trim().unwrap();

    let state = trimmer.get_trim_state().unwrap();
    let controls = trimmer.get_trim_controls().unwrap();
    assert_eq!(state.attitude.repr(), AttitudeRepr::Euler);
    assert_trimmed(&model, state, &controls, settings.tolerance);
    // Slower flight needs more lift coefficient, hence more pitch
    let (_, theta, _) = state.attitude.euler_angles();
    assert!(theta > 0.0156);
}

#[test]
fn test_reversed_bounds_rejected_before_search() {
    let model = RigidBodyDynamics::new(
        trainer_aircraft(),
        EnvironmentResource::calm(),
        AttitudeRepr::Quaternion,
    )
    .unwrap();
    let mut settings = TrimSolverConfig::default();
    settings.longitudinal_bounds.throttle_range = (1.0, 0.0);
    let mut trimmer = Trimmer::new(&model, TrimCondition::default(), settings);

    assert!(matches!(
        trimmer.calc_trim(),
        Err(SimError::InvalidConfig(_))
    ));
    assert!(matches!(
        trimmer.get_trim_state(),
        Err(SimError::NotYetComputed(_))
    ));
}
