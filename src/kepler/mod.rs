//! Kepler's equation and anomaly conversions
//!
//! All functions here take and return radians except [`normalize_degrees`],
//! which reduces catalog-style degree angles before they cross into radians.

use crate::constants::{
    KEPLER_HIGH_ECCENTRICITY, KEPLER_MAX_ITERATIONS, KEPLER_TOLERANCE, TAU,
};
use std::f64::consts::PI;

/// Result of solving Kepler's equation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeplerSolution {
    /// Eccentric anomaly E (radians)
    pub eccentric_anomaly: f64,
    /// Newton-Raphson steps taken
    pub iterations: u32,
    /// Whether the last step was below the tolerance
    pub converged: bool,
}

/// Reduce an angle in degrees into `[0, 360)`.
///
/// Uses a Euclidean remainder so negative inputs from long backward spans land
/// in range rather than keeping their sign.
pub fn normalize_degrees(angle: f64) -> f64 {
    let reduced = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if reduced >= 360.0 {
        0.0
    } else {
        reduced
    }
}

/// Reduce an angle in radians into `[0, 2π)`
pub fn normalize_radians(angle: f64) -> f64 {
    let reduced = angle.rem_euclid(TAU);
    if reduced >= TAU {
        0.0
    } else {
        reduced
    }
}

/// Solve Kepler's equation `M = E − e·sin(E)` for the eccentric anomaly.
///
/// Newton-Raphson iteration starting from `E₀ = M` (or `E₀ = π` for
/// eccentricities of 0.8 and above, where starting from `M` can diverge).
/// Stops once a step is smaller than 1e-8 rad or after 30 steps. When the cap
/// is hit the last iterate is returned with `converged == false`.
///
/// # Arguments
///
/// * `mean_anomaly` - Mean anomaly M (radians)
/// * `e` - Eccentricity in `[0, 1)`
pub fn solve_kepler(mean_anomaly: f64, e: f64) -> KeplerSolution {
    let m = mean_anomaly;
    let mut ea = if e < KEPLER_HIGH_ECCENTRICITY { m } else { PI };

    for iteration in 1..=KEPLER_MAX_ITERATIONS {
        let delta = (ea - e * ea.sin() - m) / (1.0 - e * ea.cos());
        ea -= delta;

        if delta.abs() < KEPLER_TOLERANCE {
            return KeplerSolution {
                eccentric_anomaly: ea,
                iterations: iteration,
                converged: true,
            };
        }
    }

    log::debug!(
        "Kepler solver hit {} iterations without converging (M = {}, e = {})",
        KEPLER_MAX_ITERATIONS,
        mean_anomaly,
        e
    );

    KeplerSolution {
        eccentric_anomaly: ea,
        iterations: KEPLER_MAX_ITERATIONS,
        converged: false,
    }
}

/// True anomaly ν from the eccentric anomaly
///
/// `ν = 2·atan2(√(1+e)·sin(E/2), √(1−e)·cos(E/2))`, which stays well defined
/// at `E = π` where the half-angle tangent form blows up.
pub fn true_anomaly(eccentric_anomaly: f64, e: f64) -> f64 {
    let half = eccentric_anomaly / 2.0;
    2.0 * ((1.0 + e).sqrt() * half.sin()).atan2((1.0 - e).sqrt() * half.cos())
}

/// Heliocentric distance `r = a·(1 − e·cos E)`
pub fn orbital_radius(a: f64, e: f64, eccentric_anomaly: f64) -> f64 {
    a * (1.0 - e * eccentric_anomaly.cos())
}

/// Residual of Kepler's equation, `M − (E − e·sin E)`
pub fn kepler_residual(mean_anomaly: f64, e: f64, eccentric_anomaly: f64) -> f64 {
    mean_anomaly - (eccentric_anomaly - e * eccentric_anomaly.sin())
}
