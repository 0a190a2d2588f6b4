// src/special.rs
// Complete elliptic integral of the first kind and the Jacobi elliptic functions.
// The exact engine only needs these through the `EllipticFunctions` trait, so a different numerics
// backend can be dropped in without touching the solution code. `AgmElliptic` is the built-in one:
// K(m) from the AGM, sn/cn/dn from the descending Landen transformation.

use crate::error::{PendulumError, Result};
use std::f64::consts::{FRAC_PI_2, PI};

/// Relative gap at which the K(m) AGM stops.
const K_TOLERANCE: f64 = 1e-15;
const K_MAX_ITER: usize = 40;

/// Landen halvings. sqrt(1 - m) near 1e-8 still settles in about ten.
const LANDEN_MAX_ITER: usize = 24;

/// Below this parameter sn/cn/dn use a first-order expansion in m.
const SMALL_M: f64 = 1e-9;

/// Jacobi elliptic triple plus the amplitude φ with sn = sin φ.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JacobiElliptic {
    pub sn: f64,
    pub cn: f64,
    pub dn: f64,
    pub amplitude: f64,
}

/// Special functions required by the closed-form solution. Parameter convention m = k².
pub trait EllipticFunctions {
    /// K(m) for m in [0, 1).
    fn complete_k(&self, m: f64) -> Result<f64>;

    /// sn, cn, dn and amplitude of u for m in [0, 1].
    fn jacobi(&self, u: f64, m: f64) -> Result<JacobiElliptic>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AgmElliptic;

impl EllipticFunctions for AgmElliptic {
    fn complete_k(&self, m: f64) -> Result<f64> {
        if !m.is_finite() || !(0.0..1.0).contains(&m) {
            return Err(PendulumError::domain("complete elliptic integral K(m)", m));
        }
        if m == 0.0 {
            return Ok(FRAC_PI_2);
        }

        // K(m) = π / (2 AGM(1, sqrt(1 - m)))
        let mut a = 1.0;
        let mut b = (1.0 - m).sqrt();
        for _ in 0..K_MAX_ITER {
            let a_next = 0.5 * (a + b);
            let b_next = (a * b).sqrt();
            if (a_next - b_next).abs() < K_TOLERANCE * a_next {
                return Ok(PI / (2.0 * a_next));
            }
            a = a_next;
            b = b_next;
        }
        Ok(PI / (2.0 * a))
    }

    fn jacobi(&self, u: f64, m: f64) -> Result<JacobiElliptic> {
        if !m.is_finite() || !(0.0..=1.0).contains(&m) {
            return Err(PendulumError::domain("Jacobi elliptic parameter", m));
        }
        if !u.is_finite() {
            return Err(PendulumError::numerical("Jacobi elliptic argument", u));
        }

        if m < SMALL_M {
            let (s, c) = u.sin_cos();
            let ai = 0.25 * m * (u - s * c);
            return Ok(JacobiElliptic {
                sn: s - ai * c,
                cn: c + ai * s,
                dn: 1.0 - 0.5 * m * s * s,
                amplitude: u - ai,
            });
        }

        if m == 1.0 {
            // Degenerate limit: sn = tanh, cn = dn = sech, amplitude = gd(u).
            let sech = 1.0 / u.cosh();
            return Ok(JacobiElliptic {
                sn: u.tanh(),
                cn: sech,
                dn: sech,
                amplitude: u.sinh().atan(),
            });
        }

        landen(u, m)
    }
}

/// Descending Landen transformation: run the AGM of (1, sqrt(1-m)) keeping the c_i = (a_i - b_i)/2,
/// scale u into the limit circle, then walk the amplitude back down.
fn landen(u: f64, m: f64) -> Result<JacobiElliptic> {
    let mut a = [0.0; LANDEN_MAX_ITER + 1];
    let mut c = [0.0; LANDEN_MAX_ITER + 1];
    a[0] = 1.0;
    c[0] = m.sqrt();
    let mut b = (1.0 - m).sqrt();
    let mut twon = 1.0;
    let mut i = 0;

    while (c[i] / a[i]).abs() > f64::EPSILON && i < LANDEN_MAX_ITER {
        let ai = a[i];
        i += 1;
        c[i] = 0.5 * (ai - b);
        a[i] = 0.5 * (ai + b);
        b = (ai * b).sqrt();
        twon *= 2.0;
    }

    let mut phi = twon * a[i] * u;
    let mut prev = phi;
    while i > 0 {
        prev = phi;
        phi = 0.5 * ((c[i] * phi.sin() / a[i]).asin() + phi);
        i -= 1;
    }

    let (sn, cn) = phi.sin_cos();
    let dn = cn / (phi - prev).cos();
    if !dn.is_finite() {
        return Err(PendulumError::numerical("Jacobi dn", dn));
    }
    Ok(JacobiElliptic {
        sn,
        cn,
        dn,
        amplitude: phi,
    })
}
