// src/comparison.rs
// Runs the four methods on one time grid and measures how far each strays from the exact solution.

use crate::error::Result;
use crate::logic::{IntegratorOptions, PendulumSolver};
use crate::model::{PhysicalConstants, TimeGrid, TimeSeries};
use crate::solutions::{exact_angle, exact_period, fourier_angle, linear_angle, series};
use serde::Serialize;

/// Largest absolute gap from the exact series, per method (radians).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Deviations {
    pub rk45: f64,
    pub linear: f64,
    pub fourier: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub constants: PhysicalConstants,
    /// Exact period 4K / sqrt(g/L).
    pub period: f64,
    pub rk45: TimeSeries,
    pub linear: TimeSeries,
    pub exact: TimeSeries,
    pub fourier: TimeSeries,
    pub deviations: Deviations,
}

impl Comparison {
    /// All methods must succeed; a single failure discards the whole comparison.
    pub fn run(
        constants: &PhysicalConstants,
        grid: &TimeGrid,
        options: &IntegratorOptions,
    ) -> Result<Self> {
        let times = grid.samples();
        let exact = series(constants, &times, exact_angle)?;
        let fourier = series(constants, &times, fourier_angle)?;
        let linear = series(constants, &times, linear_angle)?;
        let rk45 = PendulumSolver::new(*constants, *options).solve_at(&times)?;

        let deviations = Deviations {
            rk45: rk45.max_abs_deviation(&exact),
            linear: linear.max_abs_deviation(&exact),
            fourier: fourier.max_abs_deviation(&exact),
        };

        Ok(Self {
            constants: *constants,
            period: exact_period(constants)?,
            rk45,
            linear,
            exact,
            fourier,
            deviations,
        })
    }

    pub fn times(&self) -> &[f64] {
        &self.exact.times
    }

    /// Series in plotting order with their legend labels.
    pub fn labelled(&self) -> [(&'static str, &TimeSeries); 4] {
        [
            ("RK45", &self.rk45),
            ("linear", &self.linear),
            ("exact solution", &self.exact),
            ("fourier", &self.fourier),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn large_angle_run() {
        let consts = PhysicalConstants::from_degrees(150.0, 10.0, 1.0).unwrap();
        let grid = TimeGrid::new(0.0, 10.0, 0.025).unwrap();
        let opts = IntegratorOptions {
            rtol: 1e-10,
            atol: 1e-12,
        };
        let cmp = Comparison::run(&consts, &grid, &opts).unwrap();

        assert_eq!(cmp.times().len(), 400);
        for (_, s) in cmp.labelled() {
            assert_eq!(s.times, cmp.exact.times);
        }
        assert_abs_diff_eq!(cmp.period, 3.5014, epsilon = 1e-4);
        assert!(cmp.deviations.rk45 < 1e-5);
        assert!(cmp.deviations.fourier < 0.05 * consts.initial_angle());
        // At 150 degrees the small-angle prediction is badly out of phase.
        assert!(cmp.deviations.linear > 1.0);
    }
}
