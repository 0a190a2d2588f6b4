// src/math.rs
// This module holds the two leaf computations of the simulator: the arithmetic-geometric mean used for
// the large-angle frequency, and the equation of motion handed to the integrator in logic.rs.
// The gravity term uses sin(θ), not θ, so the model stays valid far from the small-angle regime.
// Both are pure functions of their arguments; physical constants arrive by reference, never as globals.

use crate::error::{finite, PendulumError, Result};
use crate::model::{PhysicalConstants, State};

/// Absolute gap |a - b| at which the AGM iteration stops.
pub const AGM_TOLERANCE: f64 = 1e-10;

/// Hard cap on AGM iterations. Convergence is quadratic, so positive finite inputs
/// settle long before this; hitting it means the inputs were degenerate.
const AGM_MAX_ITER: usize = 64;

/// Arithmetic-geometric mean of two positive reals.
/// Replaces (a, b) by ((a + b)/2, sqrt(ab)) until |a - b| <= 1e-10 and returns the converged `a`.
pub fn agm(a: f64, b: f64) -> Result<f64> {
    if !a.is_finite() || a <= 0.0 {
        return Err(PendulumError::invalid("a", a));
    }
    if !b.is_finite() || b <= 0.0 {
        return Err(PendulumError::invalid("b", b));
    }
    let (mut a, mut b) = (a, b); // Working pair.
    for _ in 0..AGM_MAX_ITER {
        if (a - b).abs() <= AGM_TOLERANCE {
            return Ok(a); // Also covers a == b on entry.
        }
        (a, b) = ((a + b) / 2.0, (a * b).sqrt());
    }
    Err(PendulumError::numerical("agm", a - b))
}

/// Angular acceleration -(g/L) sin θ.
pub fn acceleration(consts: &PhysicalConstants, angle: f64) -> Result<f64> {
    let alpha = -(consts.gravity() / consts.length()) * angle.sin(); // Restoring torque per unit inertia.
    finite("acceleration", alpha)
}

/// Right-hand side of dθ/dt = ω, dω/dt = -(g/L) sin θ.
/// `_t` is unused (autonomous system) but kept so the signature matches what the integrator calls.
pub fn equation(consts: &PhysicalConstants, _t: f64, state: State) -> Result<State> {
    let alpha = acceleration(consts, state.angle)?;
    let omega = finite("angular velocity", state.angular_velocity)?;
    Ok(State::new(omega, alpha)) // (dθ/dt, dω/dt).
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn agm_of_equal_inputs_is_the_input() {
        for &a in &[0.1, 1.0, 7.25, 10.0] {
            assert_eq!(agm(a, a).unwrap(), a);
        }
    }

    #[test]
    fn agm_known_values() {
        // Gauss's constant: 1 / agm(1, sqrt 2).
        assert_relative_eq!(1.0 / agm(1.0, 2f64.sqrt()).unwrap(), 0.834_626_841_674_073, epsilon = 1e-10);
        assert_relative_eq!(agm(24.0, 6.0).unwrap(), 13.458_171_481_725_6, epsilon = 1e-9);
    }

    #[test]
    fn agm_is_symmetric_and_bounded() {
        let grid = [0.1, 0.37, 1.0, 2.5, 6.0, 10.0];
        for &a in &grid {
            for &b in &grid {
                let ab = agm(a, b).unwrap();
                let ba = agm(b, a).unwrap();
                assert_abs_diff_eq!(ab, ba, epsilon = 1e-10);
                assert!(ab >= a.min(b) - 1e-10 && ab <= a.max(b) + 1e-10);
            }
        }
    }

    #[test]
    fn agm_rejects_non_positive_inputs() {
        assert_eq!(
            agm(-1.0, 2.0),
            Err(PendulumError::InvalidArgument { name: "a", value: -1.0 })
        );
        assert!(matches!(agm(1.0, 0.0), Err(PendulumError::InvalidArgument { name: "b", .. })));
        assert!(agm(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn equation_of_motion() {
        let consts = PhysicalConstants::new_unchecked(1.0, 10.0, 2.0);
        let d = equation(&consts, 0.0, State::new(std::f64::consts::FRAC_PI_2, 0.3)).unwrap();
        assert_eq!(d.angle, 0.3);
        assert_relative_eq!(d.angular_velocity, -5.0);

        assert_eq!(acceleration(&consts, 0.0).unwrap(), 0.0);
        assert!(matches!(
            equation(&consts, 0.0, State::new(f64::NAN, 0.0)),
            Err(PendulumError::NumericalError { .. })
        ));
    }
}
