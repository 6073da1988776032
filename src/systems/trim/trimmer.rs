use argmin::core::{CostFunction, Executor, State};
use argmin::solver::{linesearch::MoreThuenteLineSearch, neldermead::NelderMead, quasinewton::LBFGS};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use super::{TrimCondition, TrimProblem, TrimSolverConfig};
use crate::state::{ControlVector, VehicleState};
use crate::systems::dynamics::DynamicsModel;
use crate::utils::{Result, SimError};

// Nelder-Mead iterations per restart
const DIRECT_SEARCH_ITERS: u64 = 200;
const MAX_STALLED_RESTARTS: usize = 3;

/// A converged equilibrium and its diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrimResult {
    pub state: VehicleState,
    pub controls: ControlVector,
    pub cost: f64,
    pub iterations: u64,
    /// Infinity norm of `[u̇, v̇, ẇ, ṗ, q̇, ṙ]` at the trim point.
    pub residual: f64,
}

/// Finds a state and control vector with zero linear and angular acceleration.
pub struct Trimmer<'a> {
    model: &'a dyn DynamicsModel,
    condition: TrimCondition,
    settings: TrimSolverConfig,
    reference: VehicleState,
    result: Option<TrimResult>,
}

impl<'a> Trimmer<'a> {
    /// Trims at the origin heading north.
    pub fn new(
        model: &'a dyn DynamicsModel,
        condition: TrimCondition,
        settings: TrimSolverConfig,
    ) -> Self {
        let reference = VehicleState::new(model.layout());
        Self::with_reference(model, condition, settings, reference)
    }

    /// Trims at the position and heading of `reference`.
    pub fn with_reference(
        model: &'a dyn DynamicsModel,
        condition: TrimCondition,
        settings: TrimSolverConfig,
        reference: VehicleState,
    ) -> Self {
        Self {
            model,
            condition,
            settings,
            reference,
            result: None,
        }
    }

    pub fn calc_trim(&mut self) -> Result<()> {
        self.result = None;
        self.settings.validate()?;
        let problem = TrimProblem::new(self.model, self.condition, &self.settings, &self.reference);
        let tolerance = self.settings.tolerance;
        let target_cost = (0.01 * tolerance).powi(2);
        let budget = self.settings.max_iterations;

        info!(
            "Trimming for {:?} ({:?} mode)",
            self.condition, self.settings.mode
        );

        let mut best_param = problem.initial_guess();
        let mut best_cost = problem.cost(&best_param)?;
        let mut iterations = 0;
        let mut stalled = 0;

        while iterations < budget && best_cost > target_cost && stalled < MAX_STALLED_RESTARTS {
            let max_iters = DIRECT_SEARCH_ITERS.min(budget - iterations);
            let solver = NelderMead::new(initial_simplex(&best_param))
                .with_sd_tolerance(1e-14)?
                .with_alpha(1.0)?
                .with_gamma(2.0)?
                .with_rho(0.5)?
                .with_sigma(0.5)?;

            let result = Executor::new(problem, solver)
                .configure(|state| state.max_iters(max_iters).target_cost(target_cost))
                .run()?;

            iterations += result.state.get_iter().max(1);
            let cost = result.state.get_best_cost();
            debug!(
                "Direct search stage finished at iteration {} with cost {:.3e}",
                iterations, cost
            );

            if let Some(param) = result.state.best_param {
                if cost < best_cost {
                    if cost > 0.5 * best_cost {
                        stalled += 1;
                    } else {
                        stalled = 0;
                    }
                    best_cost = cost;
                    best_param = param;
                } else {
                    stalled += 1;
                }
            } else {
                stalled += 1;
            }
        }

        if self.settings.use_gradient_refinement && best_cost > target_cost && iterations < budget
        {
            let linesearch = MoreThuenteLineSearch::new().with_c(1e-4, 0.9)?;
            let solver = LBFGS::new(linesearch, 7);
            let max_iters = budget - iterations;

            let result = Executor::new(problem, solver)
                .configure(|state| {
                    state
                        .param(best_param.clone())
                        .max_iters(max_iters)
                        .target_cost(target_cost)
                })
                .run();

            match result {
                Ok(result) => {
                    iterations += result.state.get_iter();
                    let cost = result.state.get_best_cost();
                    debug!("Gradient refinement finished with cost {:.3e}", cost);
                    if let Some(param) = result.state.best_param {
                        if cost < best_cost {
                            best_cost = cost;
                            best_param = param;
                        }
                    }
                }
                // The line search can fail near a flat minimum, keep the direct search result
                Err(err) => debug!("Gradient refinement stopped early: {}", err),
            }
        }

        let params = problem.decode(&best_param);
        let state = problem.build_state(&params);
        let residual = problem
            .residual(&state, &params.controls)?
            .iter()
            .fold(0.0_f64, |acc, r| acc.max(r.abs()));

        if !(residual < tolerance) {
            error!(
                "Trim failed to converge: residual {:.3e} after {} iterations",
                residual, iterations
            );
            return Err(SimError::TrimDivergence {
                residual,
                iterations,
            });
        }

        info!(
            "Trim converged after {} iterations: theta {:.2}°, elevator {:.4}, throttle {:.4}, residual {:.2e}",
            iterations,
            params.theta.to_degrees(),
            params.controls.elevator,
            params.controls.throttle,
            residual
        );

        self.result = Some(TrimResult {
            state,
            controls: params.controls,
            cost: best_cost,
            iterations,
            residual,
        });
        Ok(())
    }

    pub fn get_trim_state(&self) -> Result<&VehicleState> {
        self.result
            .as_ref()
            .map(|result| &result.state)
            .ok_or(SimError::NotYetComputed("trim state"))
    }

    pub fn get_trim_controls(&self) -> Result<ControlVector> {
        self.result
            .as_ref()
            .map(|result| result.controls)
            .ok_or(SimError::NotYetComputed("trim controls"))
    }

    pub fn result(&self) -> Option<&TrimResult> {
        self.result.as_ref()
    }

    pub fn into_result(self) -> Result<TrimResult> {
        self.result.ok_or(SimError::NotYetComputed("trim result"))
    }
}

fn initial_simplex(init_param: &[f64]) -> Vec<Vec<f64>> {
    let n = init_param.len();
    let mut simplex = Vec::with_capacity(n + 1);
    simplex.push(init_param.to_vec());
    for i in 0..n {
        let mut vertex = init_param.to_vec();
        vertex[i] += (0.1 * vertex[i].abs()).max(0.02);
        simplex.push(vertex);
    }
    simplex
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{
        AircraftAeroCoefficients, AircraftConfig, AircraftGeometry, DragCoefficients,
        LiftCoefficients, MassModel, PitchCoefficients, PowerplantConfig, PropulsionConfig,
        RollCoefficients, SideForceCoefficients, YawCoefficients,
    };
    use crate::resources::EnvironmentResource;
    use crate::state::AttitudeRepr;
    use crate::systems::dynamics::RigidBodyDynamics;
    use crate::systems::trim::TrimMode;
    use approx::assert_relative_eq;

    fn trainer() -> RigidBodyDynamics {
        let aircraft = AircraftConfig {
            name: "Trainer".to_string(),
            mass: MassModel::new(1000.0, 1200.0, 1500.0, 2500.0, 0.0),
            geometry: AircraftGeometry::new(16.0, 10.0, 1.6),
            aero_coef: AircraftAeroCoefficients {
                drag: DragCoefficients {
                    c_d_0: 0.02,
                    c_d_alpha2: 0.1,
                    ..Default::default()
                },
                lift: LiftCoefficients {
                    c_l_0: 0.2,
                    c_l_alpha: 5.0,
                    ..Default::default()
                },
                side_force: SideForceCoefficients {
                    c_y_beta: -0.5,
                    ..Default::default()
                },
                roll: RollCoefficients {
                    c_l_p: -0.5,
                    c_l_deltaa: 0.1,
                    ..Default::default()
                },
                pitch: PitchCoefficients {
                    c_m_alpha: -1.0,
                    c_m_q: -10.0,
                    c_m_deltae: -1.0,
                    ..Default::default()
                },
                yaw: YawCoefficients {
                    c_n_beta: 0.1,
                    c_n_r: -0.1,
                    c_n_deltar: -0.05,
                    ..Default::default()
                },
            },
            propulsion: PropulsionConfig::single_engine(PowerplantConfig {
                name: "Test".to_string(),
                max_thrust: 5000.0,
                min_thrust: 0.0,
                spool_up_time: 1.0,
                spool_down_time: 1.0,
                ..Default::default()
            }),
        };
        RigidBodyDynamics::new(aircraft, EnvironmentResource::calm(), AttitudeRepr::Euler)
            .unwrap()
    }

    fn assert_equilibrium(model: &RigidBodyDynamics, trimmer: &Trimmer, tolerance: f64) {
        let state = trimmer.get_trim_state().unwrap();
        let controls = trimmer.get_trim_controls().unwrap();
        let output = model.evaluate(state, &controls, 0.0).unwrap();
        assert!(output.derivative.velocity.amax() < tolerance);
        assert!(output.derivative.angular_rate.amax() < tolerance);
    }

    #[test]
    fn test_accessors_before_trim() {
        let model = trainer();
        let trimmer = Trimmer::new(
            &model,
            TrimCondition::StraightAndLevel { airspeed: 60.0 },
            TrimSolverConfig::default(),
        );
        assert!(matches!(
            trimmer.get_trim_state(),
            Err(SimError::NotYetComputed(_))
        ));
        assert!(matches!(
            trimmer.get_trim_controls(),
            Err(SimError::NotYetComputed(_))
        ));
        assert!(trimmer.result().is_none());
    }

    #[test]
    fn test_straight_and_level_trim() {
        let model = trainer();
        let settings = TrimSolverConfig::default();
        let mut trimmer = Trimmer::new(
            &model,
            TrimCondition::StraightAndLevel { airspeed: 60.0 },
            settings,
        );
        trimmer.calc_trim().unwrap();
        assert_equilibrium(&model, &trimmer, settings.tolerance);

        let controls = trimmer.get_trim_controls().unwrap();
        let (_, theta, _) = trimmer.get_trim_state().unwrap().attitude.euler_angles();
        // Lift balance needs CL ≈ 0.278, so alpha ≈ 0.0156
        assert_relative_eq!(theta, 0.0156, epsilon = 2e-3);
        assert_relative_eq!(controls.elevator, -theta, epsilon = 2e-3);
        assert_relative_eq!(controls.throttle, 0.141, epsilon = 1e-2);
        assert_eq!(controls.aileron, 0.0);
        assert_eq!(trimmer.get_trim_state().unwrap().aux, vec![controls.throttle]);
    }

    #[test]
    fn test_steady_climb_holds_flight_path() {
        let model = trainer();
        let gamma = 0.05;
        let mut trimmer = Trimmer::new(
            &model,
            TrimCondition::SteadyClimb {
                airspeed: 60.0,
                gamma,
            },
            TrimSolverConfig::default(),
        );
        trimmer.calc_trim().unwrap();
        assert_equilibrium(&model, &trimmer, 1e-3);

        let state = trimmer.get_trim_state().unwrap();
        let inertial = state.inertial_velocity();
        assert_relative_eq!(-inertial.z / inertial.norm(), gamma.sin(), epsilon = 1e-9);
        // Climbing takes more thrust than level flight
        assert!(trimmer.get_trim_controls().unwrap().throttle > 0.2);
    }

    #[test]
    fn test_full_mode_stays_wings_level() {
        let model = trainer();
        let settings = TrimSolverConfig {
            mode: TrimMode::Full,
            ..Default::default()
        };
        let mut trimmer = Trimmer::new(
            &model,
            TrimCondition::StraightAndLevel { airspeed: 60.0 },
            settings,
        );
        trimmer.calc_trim().unwrap();
        assert_equilibrium(&model, &trimmer, settings.tolerance);
        let (phi, _, _) = trimmer.get_trim_state().unwrap().attitude.euler_angles();
        assert!(phi.abs() < 1e-2);
    }

    #[test]
    fn test_exhausted_budget_diverges() {
        let model = trainer();
        let settings = TrimSolverConfig {
            max_iterations: 1,
            use_gradient_refinement: false,
            ..Default::default()
        };
        let mut trimmer = Trimmer::new(
            &model,
            TrimCondition::StraightAndLevel { airspeed: 60.0 },
            settings,
        );
        let result = trimmer.calc_trim();
        match result {
            Err(SimError::TrimDivergence {
                residual,
                iterations,
            }) => {
                assert!(residual >= settings.tolerance);
                assert!(iterations <= 1);
            }
            other => panic!("expected TrimDivergence, got {other:?}"),
        }
        assert!(matches!(
            trimmer.get_trim_state(),
            Err(SimError::NotYetComputed(_))
        ));
    }
}
