// src/logic.rs
// This module runs the numerical integration of the pendulum equation of motion, the "RK45" trace the
// closed-form and series solutions are compared against.
// PendulumSolver holds the physical constants and tolerances and exposes deriv, dy/dt = [ω, -(g/L) sin θ]
// from math.rs, to the ivp crate's adaptive RK45 (Dormand-Prince 5(4)) through its IVP trait.
// Assumptions: integration starts at t = 0 from (θ0, 0); the solver samples its dense output at the
// requested times, so the returned series lines up one-to-one with the grid.
// Any solver failure or non-finite sample becomes a NumericalError; nothing is retried.

use crate::error::{PendulumError, Result};
use crate::math::equation;
use crate::model::{PhysicalConstants, State, TimeGrid, TimeSeries};
use ivp::prelude::*;
use serde::Deserialize;
use tracing::{debug, warn};

/// Integrator tolerances.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct IntegratorOptions {
    pub rtol: f64,
    pub atol: f64,
}

impl Default for IntegratorOptions {
    fn default() -> Self {
        Self {
            rtol: 1e-3,
            atol: 1e-6,
        }
    }
}

impl IntegratorOptions {
    fn validate(&self) -> Result<()> {
        if !self.rtol.is_finite() || self.rtol <= 0.0 {
            return Err(PendulumError::invalid("rtol", self.rtol));
        }
        if !self.atol.is_finite() || self.atol <= 0.0 {
            return Err(PendulumError::invalid("atol", self.atol));
        }
        Ok(())
    }
}

/// Requested times must be finite, non-negative and non-decreasing.
fn check_times(times: &[f64]) -> Result<()> {
    let mut last = 0.0; // Previous requested time.
    for &t in times {
        if !t.is_finite() || t < last {
            return Err(PendulumError::invalid("t_eval", t));
        }
        last = t;
    }
    Ok(())
}

/// Integrator bound to one set of physical constants.
pub struct PendulumSolver {
    pub constants: PhysicalConstants,
    pub options: IntegratorOptions,
}

impl PendulumSolver {
    pub fn new(constants: PhysicalConstants, options: IntegratorOptions) -> Self {
        Self { constants, options }
    }

    /// dy/dt for y = [θ, ω].
    pub fn deriv(&self, t: f64, y: State) -> Result<State> {
        equation(&self.constants, t, y)
    }

    /// Angles at the given times, released from (θ0, 0) at t = 0.
    pub fn solve_at(&self, times: &[f64]) -> Result<TimeSeries> {
        self.options.validate()?;
        check_times(times)?;

        let theta0 = self.constants.initial_angle();
        let t_end = times.last().copied().unwrap_or(0.0);
        if t_end == 0.0 {
            // Nothing to integrate: every sample sits on the release point.
            return Ok(TimeSeries::new(times.to_vec(), vec![theta0; times.len()]));
        }

        let y0 = [theta0, 0.0];
        let options = Options::builder()
            .method(Method::DOPRI5)
            .rtol(self.options.rtol)
            .atol(self.options.atol)
            .t_eval(times.to_vec())
            .build();

        let sol = solve_ivp(self, 0.0, t_end, &y0, options).map_err(|err| {
            warn!(error = ?err, "RK45 integration failed");
            PendulumError::numerical("RK45 integration up to t", t_end)
        })?;
        debug!(
            status = ?sol.status,
            nfev = sol.nfev,
            accepted = sol.naccpt,
            rejected = sol.nrejct,
            "integration finished"
        );

        if sol.y.len() != times.len() {
            return Err(PendulumError::numerical("RK45 sample count", sol.y.len() as f64));
        }
        let angles = sol
            .y
            .iter()
            .zip(times)
            .map(|(y, &t)| {
                if y[0].is_finite() && y[1].is_finite() {
                    Ok(y[0])
                } else {
                    Err(PendulumError::numerical("RK45 state at t", t))
                }
            })
            .collect::<Result<Vec<f64>>>()?;
        Ok(TimeSeries::new(times.to_vec(), angles))
    }

    /// Angles on every sample of `grid`.
    pub fn solve(&self, grid: &TimeGrid) -> Result<TimeSeries> {
        self.solve_at(&grid.samples())
    }
}

impl IVP for PendulumSolver {
    fn ode(&self, t: f64, y: &[f64], dydt: &mut [f64]) {
        // The callback cannot return an error; a failed evaluation poisons the state with NaN,
        // which solve_at reports as a NumericalError.
        let d = self
            .deriv(t, State::new(y[0], y[1]))
            .unwrap_or(State::new(f64::NAN, f64::NAN));
        dydt[0] = d.angle;
        dydt[1] = d.angular_velocity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solutions::exact_angle;
    use approx::assert_abs_diff_eq;

    fn tight() -> IntegratorOptions {
        IntegratorOptions {
            rtol: 1e-10,
            atol: 1e-12,
        }
    }

    #[test]
    fn deriv_is_the_equation_of_motion() {
        let solver = PendulumSolver::new(PhysicalConstants::new(1.0, 10.0, 2.0).unwrap(), tight());
        let mut dydt = [0.0; 2];
        solver.ode(0.0, &[std::f64::consts::FRAC_PI_2, 0.3], &mut dydt);
        assert_eq!(dydt[0], 0.3);
        assert_abs_diff_eq!(dydt[1], -5.0, epsilon = 1e-15);

        solver.ode(0.0, &[f64::NAN, 0.0], &mut dydt);
        assert!(dydt[1].is_nan());
    }

    #[test]
    fn samples_at_zero_are_the_release_angle() {
        let solver = PendulumSolver::new(PhysicalConstants::new(1.0, 10.0, 1.0).unwrap(), tight());
        let series = solver.solve_at(&[0.0, 0.0]).unwrap();
        assert_eq!(series.angles, vec![1.0, 1.0]);
        assert!(solver.solve_at(&[]).unwrap().is_empty());
    }

    #[test]
    fn large_angle_tracks_exact_solution() {
        let consts = PhysicalConstants::from_degrees(150.0, 10.0, 1.0).unwrap();
        let solver = PendulumSolver::new(consts, tight());
        let grid = TimeGrid::new(0.0, 10.0, 0.025).unwrap();
        let series = solver.solve(&grid).unwrap();
        assert_eq!(series.len(), 400);
        for (t, angle) in series.iter() {
            assert_abs_diff_eq!(angle, exact_angle(&consts, t).unwrap(), epsilon = 1e-5);
        }
    }

    #[test]
    fn default_tolerances_stay_on_the_trajectory() {
        // Loose RK45 tolerances drift by a visible but bounded amount over ten seconds.
        let consts = PhysicalConstants::from_degrees(150.0, 10.0, 1.0).unwrap();
        let solver = PendulumSolver::new(consts, IntegratorOptions::default());
        let series = solver.solve(&TimeGrid::new(0.0, 10.0, 0.025).unwrap()).unwrap();
        assert_eq!(series.len(), 400);
        assert_eq!(series.angles[0], consts.initial_angle());
        for (t, angle) in series.iter() {
            assert!(angle.is_finite());
            assert_abs_diff_eq!(angle, exact_angle(&consts, t).unwrap(), epsilon = 0.5);
        }
    }

    #[test]
    fn rejects_unordered_times() {
        let solver = PendulumSolver::new(PhysicalConstants::new(1.0, 10.0, 1.0).unwrap(), tight());
        assert!(matches!(
            solver.solve_at(&[0.0, 2.0, 1.0]),
            Err(PendulumError::InvalidArgument { name: "t_eval", .. })
        ));
        assert!(solver.solve_at(&[-1.0]).is_err());
        assert!(solver.solve_at(&[f64::NAN]).is_err());
    }

    #[test]
    fn rejects_bad_tolerances() {
        let consts = PhysicalConstants::new(1.0, 10.0, 1.0).unwrap();
        let opts = IntegratorOptions { rtol: 0.0, atol: 1e-6 };
        assert!(matches!(
            PendulumSolver::new(consts, opts).solve_at(&[1.0]),
            Err(PendulumError::InvalidArgument { name: "rtol", .. })
        ));
    }
}
