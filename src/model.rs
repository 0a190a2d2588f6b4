// src/model.rs
// Value types passed between the caller and the solution engines.
// PhysicalConstants is built once per run and only ever borrowed; State lives for a single
// right-hand-side evaluation; TimeSeries is what every method hands back.

use crate::error::{PendulumError, Result};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Release conditions of the pendulum: angle from vertical (radians, zero initial velocity),
/// gravitational acceleration and arm length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicalConstants {
    initial_angle: f64,
    gravity: f64,
    length: f64,
}

impl PhysicalConstants {
    /// Validates `0 < initial_angle < π` and finite positive `gravity`, `length`.
    pub fn new(initial_angle: f64, gravity: f64, length: f64) -> Result<Self> {
        if !initial_angle.is_finite() || initial_angle <= 0.0 || initial_angle >= PI {
            return Err(PendulumError::invalid("initial_angle", initial_angle));
        }
        if !gravity.is_finite() || gravity <= 0.0 {
            return Err(PendulumError::invalid("gravity", gravity));
        }
        if !length.is_finite() || length <= 0.0 {
            return Err(PendulumError::invalid("length", length));
        }
        Ok(Self::new_unchecked(initial_angle, gravity, length))
    }

    /// Same as [`PhysicalConstants::new`] with the angle given in degrees.
    pub fn from_degrees(initial_angle_deg: f64, gravity: f64, length: f64) -> Result<Self> {
        Self::new(initial_angle_deg.to_radians(), gravity, length)
    }

    /// Skips validation. The engines still reject angles outside their own domain.
    pub fn new_unchecked(initial_angle: f64, gravity: f64, length: f64) -> Self {
        Self {
            initial_angle,
            gravity,
            length,
        }
    }

    pub fn initial_angle(&self) -> f64 {
        self.initial_angle
    }

    pub fn gravity(&self) -> f64 {
        self.gravity
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    /// sqrt(g/L), the small-angle angular frequency.
    pub fn natural_frequency(&self) -> f64 {
        (self.gravity / self.length).sqrt()
    }

    /// m = sin(θ0/2)^2.
    pub fn elliptic_parameter(&self) -> f64 {
        let k = (self.initial_angle / 2.0).sin();
        k * k
    }
}

/// (θ, ω) pair exchanged with the integrator.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct State {
    pub angle: f64,
    pub angular_velocity: f64,
}

impl State {
    pub fn new(angle: f64, angular_velocity: f64) -> Self {
        Self {
            angle,
            angular_velocity,
        }
    }
}

/// Ordered (time, angle) samples produced by one method.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TimeSeries {
    pub times: Vec<f64>,
    pub angles: Vec<f64>,
}

impl TimeSeries {
    pub fn new(times: Vec<f64>, angles: Vec<f64>) -> Self {
        debug_assert_eq!(times.len(), angles.len());
        Self { times, angles }
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.times.iter().copied().zip(self.angles.iter().copied())
    }

    /// Largest |self - other| over aligned samples.
    pub fn max_abs_deviation(&self, other: &TimeSeries) -> f64 {
        self.angles
            .iter()
            .zip(other.angles.iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max)
    }
}

/// Upper bound on grid samples; every method allocates one series of this length.
pub const MAX_SAMPLES: usize = 1_000_000;

/// Half-open uniform grid `start, start + step, ...` below `stop`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeGrid {
    start: f64,
    stop: f64,
    step: f64,
}

impl TimeGrid {
    pub fn new(start: f64, stop: f64, step: f64) -> Result<Self> {
        if !start.is_finite() || start < 0.0 {
            return Err(PendulumError::invalid("start", start));
        }
        if !step.is_finite() || step <= 0.0 {
            return Err(PendulumError::invalid("step", step));
        }
        if !stop.is_finite() || stop <= start {
            return Err(PendulumError::invalid("stop", stop));
        }
        let count = ((stop - start) / step).ceil();
        if !count.is_finite() || count > MAX_SAMPLES as f64 {
            return Err(PendulumError::invalid("step", step));
        }
        Ok(Self { start, stop, step })
    }

    pub fn stop(&self) -> f64 {
        self.stop
    }

    pub fn len(&self) -> usize {
        let mut n = ((self.stop - self.start) / self.step).ceil() as usize;
        // Division can round up by one ulp and admit `stop` itself.
        while n > 0 && self.start + (n - 1) as f64 * self.step >= self.stop {
            n -= 1;
        }
        n
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sample i is start + i*step, so rounding does not accumulate along the grid.
    pub fn samples(&self) -> Vec<f64> {
        (0..self.len())
            .map(|i| self.start + i as f64 * self.step)
            .collect()
    }
}
