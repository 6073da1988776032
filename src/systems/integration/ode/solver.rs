use nalgebra::DVector;
use serde::{Deserialize, Serialize};
use std::ops::ControlFlow;
use tracing::debug;

use super::{ButcherTableau, IntegrationError, OdeSystem, OutputFlag, Tolerances};
use crate::utils::Result;

/// Integration statistics for diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    /// Total number of derivative evaluations
    pub fn_evals: u64,
    pub accepted_steps: u64,
    pub rejected_steps: u64,
}

/// Step-size controller using an I-controller
///
/// h_new = safety * h * error^(-1/(q+1)), q being the order of the error estimate.
#[derive(Debug, Clone, Copy)]
pub struct StepController {
    /// Safety factor (0.8-0.9 typical)
    pub safety: f64,
    /// Maximum growth factor per step
    pub max_factor: f64,
    /// Minimum reduction factor per step
    pub min_factor: f64,
    exponent: f64,
}

impl StepController {
    pub fn for_error_order(error_order: u32) -> Self {
        Self {
            safety: 0.9,
            max_factor: 5.0,
            min_factor: 0.2,
            exponent: 1.0 / (error_order as f64 + 1.0),
        }
    }

    /// Compute the step size adjustment factor
    pub fn compute_factor(&self, error: f64) -> f64 {
        if error == 0.0 {
            return self.max_factor;
        }
        let factor = self.safety * error.powf(-self.exponent);
        factor.clamp(self.min_factor, self.max_factor)
    }
}

/// Adaptive embedded Runge-Kutta integrator over dynamically sized state vectors.
pub struct AdaptiveSolver<const S: usize> {
    tableau: &'static ButcherTableau<S>,
    tol: Tolerances,
    controller: StepController,
    /// First step size; estimated from the initial derivative when `None`.
    pub initial_step: Option<f64>,
    /// Minimum step size
    pub h_min: f64,
    /// Maximum step size
    pub h_max: f64,
    /// Maximum number of attempted steps before error
    pub max_steps: u64,
    pub stats: Stats,
}

impl AdaptiveSolver<7> {
    /// Dormand-Prince 5(4).
    pub fn dormand_prince45(tol: Tolerances) -> Self {
        Self::new(&ButcherTableau::<7>::DORMANDPRINCE45, tol)
    }
}

impl AdaptiveSolver<4> {
    /// Bogacki-Shampine 3(2).
    pub fn bogacki_shampine23(tol: Tolerances) -> Self {
        Self::new(&ButcherTableau::<4>::BOGACKISHAMPINE23, tol)
    }
}

impl<const S: usize> AdaptiveSolver<S> {
    pub fn new(tableau: &'static ButcherTableau<S>, tol: Tolerances) -> Self {
        Self {
            tableau,
            tol,
            controller: StepController::for_error_order(tableau.error_order),
            initial_step: None,
            h_min: 1e-12,
            h_max: f64::INFINITY,
            max_steps: 1_000_000,
            stats: Stats::default(),
        }
    }

    /// Set minimum and maximum step sizes
    pub fn set_step_limits(&mut self, h_min: f64, h_max: f64) {
        self.h_min = h_min;
        self.h_max = h_max;
    }

    /// Integrate `system` from `(t0, y0)` to `tf`, reporting each accepted step.
    ///
    /// Returns the last accepted point, which is `tf` unless the system asked to stop.
    pub fn integrate<O: OdeSystem + ?Sized>(
        &mut self,
        system: &mut O,
        t0: f64,
        y0: DVector<f64>,
        tf: f64,
    ) -> Result<(f64, DVector<f64>)> {
        self.validate_inputs(t0, &y0, tf)?;

        let mut t = t0;
        let mut y = y0;
        if system.output(t, &y, OutputFlag::Init)?.is_break() {
            return Ok((t, y));
        }

        let mut f0 = self.eval(system, t, &y)?;
        let mut h = match self.initial_step {
            Some(h) => h,
            None => self.estimate_initial_step(system, t, &y, &f0)?,
        }
        .clamp(self.h_min, self.h_max);
        debug!("Adaptive integration over [{}, {}], first step {:.3e}", t0, tf, h);

        let mut k: Vec<DVector<f64>> = Vec::with_capacity(S);
        let mut attempts = 0u64;

        while tf - t > self.h_min {
            attempts += 1;
            if attempts > self.max_steps {
                return Err(IntegrationError::MaxStepsExceeded {
                    max_steps: self.max_steps,
                    t,
                }
                .into());
            }

            // Don't overshoot the endpoint
            let last = t + h >= tf - self.h_min;
            if last {
                h = tf - t;
            }

            self.compute_stages(system, t, &y, &f0, h, &mut k)?;
            let (y_new, error) = self.combine(&y, h, &k);

            if error <= 1.0 {
                let t_new = if last { tf } else { t + h };
                if y_new.iter().any(|v| !v.is_finite()) {
                    return Err(IntegrationError::NonFiniteState { t: t_new }.into());
                }
                f0 = if self.tableau.fsal {
                    k[S - 1].clone()
                } else {
                    self.eval(system, t_new, &y_new)?
                };
                t = t_new;
                y = y_new;
                self.stats.accepted_steps += 1;

                if system.output(t, &y, OutputFlag::Step)?.is_break() {
                    break;
                }
                h = (h * self.controller.compute_factor(error)).clamp(self.h_min, self.h_max);
            } else {
                self.stats.rejected_steps += 1;
                if h <= self.h_min {
                    return Err(IntegrationError::StepSizeTooSmall { t, h }.into());
                }
                let factor = self.controller.compute_factor(error).min(1.0);
                h = (h * factor).clamp(self.h_min, self.h_max);
            }
        }

        // Result of the final callback is irrelevant, integration is over
        let _ = system.output(t, &y, OutputFlag::Done)?;
        debug!("Adaptive integration finished: {:?}", self.stats);
        Ok((t, y))
    }

    fn eval<O: OdeSystem + ?Sized>(
        &mut self,
        system: &mut O,
        t: f64,
        y: &DVector<f64>,
    ) -> Result<DVector<f64>> {
        self.stats.fn_evals += 1;
        system.derivative(t, y)
    }

    fn compute_stages<O: OdeSystem + ?Sized>(
        &mut self,
        system: &mut O,
        t: f64,
        y: &DVector<f64>,
        f0: &DVector<f64>,
        h: f64,
        k: &mut Vec<DVector<f64>>,
    ) -> Result<()> {
        k.clear();
        k.push(f0.clone());
        for i in 1..S {
            let mut y_stage = y.clone();
            for (j, k_j) in k.iter().enumerate().take(i) {
                let a_ij = self.tableau.a[i][j];
                if a_ij != 0.0 {
                    y_stage.axpy(h * a_ij, k_j, 1.0);
                }
            }
            let k_i = self.eval(system, t + self.tableau.c[i] * h, &y_stage)?;
            k.push(k_i);
        }
        Ok(())
    }

    /// Propagated solution and the scaled infinity-norm error estimate.
    fn combine(&self, y: &DVector<f64>, h: f64, k: &[DVector<f64>]) -> (DVector<f64>, f64) {
        let mut y_new = y.clone();
        let mut err = DVector::zeros(y.len());
        for (i, k_i) in k.iter().enumerate() {
            let b = self.tableau.b[i];
            let e = b - self.tableau.b2[i];
            if b != 0.0 {
                y_new.axpy(h * b, k_i, 1.0);
            }
            if e != 0.0 {
                err.axpy(h * e, k_i, 1.0);
            }
        }

        let error = err
            .iter()
            .zip(y.iter().zip(y_new.iter()))
            .map(|(e, (y0, y1))| {
                let scale = self.tol.abs_tol + self.tol.rel_tol * y0.abs().max(y1.abs());
                e.abs() / scale
            })
            .fold(0.0_f64, f64::max);

        // NaN error means the step blew up, force a rejection
        let error = if error.is_nan() { f64::INFINITY } else { error };
        (y_new, error)
    }

    /// Starting step from the scaled size of the state and its first two derivatives.
    fn estimate_initial_step<O: OdeSystem + ?Sized>(
        &mut self,
        system: &mut O,
        t0: f64,
        y0: &DVector<f64>,
        f0: &DVector<f64>,
    ) -> Result<f64> {
        let scale = y0.map(|v| self.tol.abs_tol + self.tol.rel_tol * v.abs());
        let rms = |v: &DVector<f64>| -> f64 {
            if v.is_empty() {
                return 0.0;
            }
            (v.component_div(&scale).norm_squared() / v.len() as f64).sqrt()
        };

        let d0 = rms(y0);
        let d1 = rms(f0);
        let h0 = if d0 < 1e-5 || d1 < 1e-5 {
            1e-6
        } else {
            0.01 * d0 / d1
        };

        let y1 = y0 + f0 * h0;
        let f1 = self.eval(system, t0 + h0, &y1)?;
        let d2 = rms(&(f1 - f0)) / h0;

        let order = self.tableau.order as f64;
        let h1 = if d1.max(d2) <= 1e-15 {
            (h0 * 1e-3).max(1e-6)
        } else {
            (0.01 / d1.max(d2)).powf(1.0 / order)
        };
        Ok((100.0 * h0).min(h1))
    }

    fn validate_inputs(&self, t0: f64, y0: &DVector<f64>, tf: f64) -> Result<()> {
        if !t0.is_finite() || !tf.is_finite() || tf <= t0 {
            return Err(IntegrationError::InvalidSpan { t0, tf }.into());
        }
        if y0.iter().any(|v| !v.is_finite()) {
            return Err(IntegrationError::NonFiniteState { t: t0 }.into());
        }
        if !(self.tol.abs_tol > 0.0) || !(self.tol.rel_tol >= 0.0) {
            return Err(IntegrationError::InvalidTolerance(format!(
                "abs_tol must be positive and rel_tol non-negative, got {} and {}",
                self.tol.abs_tol, self.tol.rel_tol
            ))
            .into());
        }
        Ok(())
    }
}
