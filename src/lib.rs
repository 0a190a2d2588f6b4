// src/lib.rs
//! Large-angle pendulum: closed-form (Jacobi elliptic), Fourier-series and numerically integrated
//! solutions, compared against the small-angle approximation.

pub mod comparison;
pub mod config;
pub mod error;
pub mod logic;
pub mod math;
pub mod model;
pub mod plot;
pub mod solutions;
pub mod special;
pub mod ui;

pub use comparison::{Comparison, Deviations};
pub use error::{PendulumError, Result};
pub use logic::{IntegratorOptions, PendulumSolver};
pub use math::{acceleration, agm, equation};
pub use model::{PhysicalConstants, State, TimeGrid, TimeSeries};
pub use solutions::{exact_angle, exact_angle_with, exact_period, fourier_angle, linear_angle, nome, series};
pub use special::{AgmElliptic, EllipticFunctions, JacobiElliptic};
