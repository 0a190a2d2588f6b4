// src/solutions.rs
// Closed-form and series solutions of the large-angle pendulum, plus the small-angle baseline.
// Every function here maps one time to one angle; whole series are built by `series`, which applies the
// scalar formula sample by sample. Samples never depend on each other.

use crate::error::{finite, PendulumError, Result};
use crate::math::agm;
use crate::model::{PhysicalConstants, TimeSeries};
use crate::special::{AgmElliptic, EllipticFunctions};
use std::f64::consts::PI;

/// Coefficients and exponents of the truncated nome expansion q(ε).
const NOME_SERIES: [(f64, i32); 6] = [
    (1.0, 1),
    (2.0, 5),
    (15.0, 9),
    (150.0, 13),
    (1707.0, 17),
    (20910.0, 21),
];

/// Odd harmonics kept in the Fourier approximation.
const HARMONICS: [u32; 2] = [1, 3];

fn check_angle(consts: &PhysicalConstants, what: &'static str) -> Result<f64> {
    let theta0 = consts.initial_angle();
    if !theta0.is_finite() || theta0 <= 0.0 || theta0 >= PI {
        return Err(PendulumError::domain(what, theta0));
    }
    Ok(theta0)
}

/// Angle at time `t` from θ(t) = 2 asin(sin(θ0/2) sn(K - sqrt(g/L) t, m)), m = sin²(θ0/2).
pub fn exact_angle_with<E: EllipticFunctions>(
    special: &E,
    consts: &PhysicalConstants,
    t: f64,
) -> Result<f64> {
    let theta0 = check_angle(consts, "elliptic parameter for initial angle")?;
    let m = consts.elliptic_parameter();
    let k = special.complete_k(m)?;
    let u = k - consts.natural_frequency() * t;
    let jacobi = special.jacobi(u, m)?; // cn, dn and the amplitude are not needed here.
    let angle = 2.0 * ((theta0 / 2.0).sin() * jacobi.sn).asin();
    finite("exact solution", angle)
}

/// [`exact_angle_with`] on the built-in special functions.
pub fn exact_angle(consts: &PhysicalConstants, t: f64) -> Result<f64> {
    exact_angle_with(&AgmElliptic, consts, t)
}

/// Full period 4K/sqrt(g/L) of the exact solution.
pub fn exact_period(consts: &PhysicalConstants) -> Result<f64> {
    check_angle(consts, "elliptic parameter for initial angle")?;
    let k = AgmElliptic.complete_k(consts.elliptic_parameter())?;
    Ok(4.0 * k / consts.natural_frequency())
}

/// Nome approximation q = ε + 2ε⁵ + 15ε⁹ + 150ε¹³ + 1707ε¹⁷ + 20910ε²¹,
/// with ε = (1 - sqrt(cos(θ0/2))) / (2 + 2 sqrt(cos(θ0/2))).
pub fn nome(consts: &PhysicalConstants) -> Result<f64> {
    let theta0 = consts.initial_angle();
    let half_cos = (theta0 / 2.0).cos();
    if !half_cos.is_finite() || half_cos < 0.0 {
        return Err(PendulumError::domain("nome for initial angle", theta0));
    }
    let root = half_cos.sqrt();
    let eps = (1.0 - root) / (2.0 + 2.0 * root);
    let q = NOME_SERIES
        .iter()
        .map(|&(coeff, power)| coeff * eps.powi(power))
        .sum();
    finite("nome", q)
}

/// Two-harmonic Fourier approximation
/// θ(t) ≈ 8 Σ_{n=1,3} (-1)^(n div 2) q^(n/2) cos(n x t) / (n (1 + q^n)),
/// with x = AGM(1, cos(θ0/2)) / sqrt(L/g).
pub fn fourier_angle(consts: &PhysicalConstants, t: f64) -> Result<f64> {
    let theta0 = check_angle(consts, "Fourier series for initial angle")?;
    let q = nome(consts)?;
    let x = agm(1.0, (theta0 / 2.0).cos())? / (consts.length() / consts.gravity()).sqrt();

    let mut sum = 0.0;
    for &n in &HARMONICS {
        let sign = if (n / 2) % 2 == 0 { 1.0 } else { -1.0 };
        let n = f64::from(n);
        sum += sign * q.powf(n / 2.0) * (n * x * t).cos() / (n * (1.0 + q.powf(n)));
    }
    finite("Fourier series", 8.0 * sum)
}

/// Small-angle prediction θ0 cos(sqrt(g/L) t).
pub fn linear_angle(consts: &PhysicalConstants, t: f64) -> Result<f64> {
    finite(
        "linear solution",
        consts.initial_angle() * (consts.natural_frequency() * t).cos(),
    )
}

/// Applies `method` to each time in order. The first failure aborts the whole series.
pub fn series<F>(consts: &PhysicalConstants, times: &[f64], method: F) -> Result<TimeSeries>
where
    F: Fn(&PhysicalConstants, f64) -> Result<f64>,
{
    let angles = times
        .iter()
        .map(|&t| method(consts, t))
        .collect::<Result<Vec<f64>>>()?;
    Ok(TimeSeries::new(times.to_vec(), angles))
}
