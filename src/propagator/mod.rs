//! # Orbital Propagator
//!
//! Pure functions mapping (orbital elements, Julian date) to a heliocentric
//! ecliptic position. Nothing here holds state between calls, so positions for
//! different bodies can be computed in any order or in parallel.
//!
//! ## Algorithm
//!
//! 1. Mean motion `n = k / a^1.5` (k: Gaussian constant in deg/day)
//! 2. `M(t) = M₀ + n·(t − epoch)`, reduced into `[0°, 360°)`
//! 3. Kepler's equation solved for the eccentric anomaly E
//! 4. True anomaly ν and radius `r = a(1 − e·cos E)`
//! 5. Orbital-plane position `(r·cos ν, r·sin ν, 0)`
//! 6. Rotation into the ecliptic frame by `Rz(Ω)·Rx(i)·Rz(ω)`
//! 7. Scaling from AU to scene units
//!
//! Degrees are converted to radians once, in [`orbit_state`]; everything below
//! that point works in radians.
//!
//! ## Examples
//!
//! ```rust
//! use orrery::elements::OrbitalElements;
//! use orrery::propagator::propagate;
//!
//! let circular = OrbitalElements::new(2.0, 0.0, 0.0, 0.0, 0.0, 0.0, 2451545.0).unwrap();
//! let position = propagate(&circular, 2451545.0, 10.0);
//! assert!((position.x - 20.0).abs() < 1e-9);
//! assert!(position.y.abs() < 1e-9);
//! ```

use crate::constants::{DEG2RAD, TAU};
use crate::elements::OrbitalElements;
use crate::kepler::{normalize_degrees, orbital_radius, solve_kepler, true_anomaly};
use crate::{OrreryError, Result};
use nalgebra::{Matrix3, Vector3};

/// Intermediate quantities of one propagation, useful for diagnostics and tests
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitState {
    /// Mean anomaly at the target date (degrees, `[0, 360)`)
    pub mean_anomaly: f64,
    /// Eccentric anomaly (radians)
    pub eccentric_anomaly: f64,
    /// True anomaly (radians)
    pub true_anomaly: f64,
    /// Heliocentric distance (AU)
    pub radius: f64,
    /// Position in the heliocentric ecliptic frame (AU)
    pub position: Vector3<f64>,
    /// Kepler solver iterations
    pub iterations: u32,
    /// Whether the Kepler solver converged within its iteration cap
    pub converged: bool,
}

/// Mean anomaly at `julian_date`, in degrees reduced into `[0, 360)`
pub fn mean_anomaly_at(elements: &OrbitalElements, julian_date: f64) -> f64 {
    let elapsed_days = julian_date - elements.epoch();
    normalize_degrees(elements.ma() + elements.mean_motion() * elapsed_days)
}

/// Rotation from the perifocal frame (x toward periapsis) to the ecliptic frame
///
/// Equal to `Rz(Ω)·Rx(i)·Rz(ω)` with `ω = ϖ − Ω`.
pub fn perifocal_to_ecliptic(elements: &OrbitalElements) -> Matrix3<f64> {
    let (sin_o, cos_o) = (elements.om() * DEG2RAD).sin_cos();
    let (sin_i, cos_i) = (elements.i() * DEG2RAD).sin_cos();
    let (sin_w, cos_w) = (elements.argument_of_periapsis() * DEG2RAD).sin_cos();

    Matrix3::new(
        cos_o * cos_w - sin_o * sin_w * cos_i,
        -cos_o * sin_w - sin_o * cos_w * cos_i,
        sin_o * sin_i,
        sin_o * cos_w + cos_o * sin_w * cos_i,
        -sin_o * sin_w + cos_o * cos_w * cos_i,
        -cos_o * sin_i,
        sin_w * sin_i,
        cos_w * sin_i,
        cos_i,
    )
}

/// Full propagation state of a body at `julian_date`, in AU
pub fn orbit_state(elements: &OrbitalElements, julian_date: f64) -> OrbitState {
    let e = elements.e();
    let mean_anomaly = mean_anomaly_at(elements, julian_date);

    let solution = solve_kepler(mean_anomaly * DEG2RAD, e);
    let ea = solution.eccentric_anomaly;
    let nu = true_anomaly(ea, e);
    let radius = orbital_radius(elements.a(), e, ea);

    let perifocal = Vector3::new(radius * nu.cos(), radius * nu.sin(), 0.0);
    let position = perifocal_to_ecliptic(elements) * perifocal;

    OrbitState {
        mean_anomaly,
        eccentric_anomaly: ea,
        true_anomaly: nu,
        radius,
        position,
        iterations: solution.iterations,
        converged: solution.converged,
    }
}

/// Position of a body at `julian_date` in scene units
///
/// # Arguments
///
/// * `elements` - The body's orbital elements
/// * `julian_date` - Target instant as a Julian date
/// * `spatial_scale` - Scene units per AU
pub fn propagate(elements: &OrbitalElements, julian_date: f64, spatial_scale: f64) -> Vector3<f64> {
    orbit_state(elements, julian_date).position * spatial_scale
}

/// Orbital period in years, for display
pub fn compute_period_years(elements: &OrbitalElements) -> f64 {
    elements.period_years()
}

/// Sample `samples` points around the full ellipse in scene units
///
/// Points are evenly spaced in eccentric anomaly starting at periapsis, which
/// places more of them near the ends of the major axis where curvature is
/// highest.
pub fn sample_orbit(
    elements: &OrbitalElements,
    samples: usize,
    spatial_scale: f64,
) -> Vec<Vector3<f64>> {
    let a = elements.a();
    let e = elements.e();
    let b = a * (1.0 - e * e).sqrt();
    let rotation = perifocal_to_ecliptic(elements) * spatial_scale;

    (0..samples)
        .map(|k| {
            let ea = TAU * k as f64 / samples as f64;
            let perifocal = Vector3::new(a * (ea.cos() - e), b * ea.sin(), 0.0);
            rotation * perifocal
        })
        .collect()
}

/// Propagator bound to one spatial scale
///
/// The scale is shared with the host's non-orbital scene geometry, so it is
/// carried as configuration rather than baked into the propagation math.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Propagator {
    spatial_scale: f64,
}

impl Propagator {
    /// Create a propagator for a positive, finite scale (scene units per AU)
    pub fn new(spatial_scale: f64) -> Result<Self> {
        if !spatial_scale.is_finite() || spatial_scale <= 0.0 {
            return Err(OrreryError::Config(format!(
                "spatial scale must be positive and finite, got {}",
                spatial_scale
            )));
        }
        Ok(Self { spatial_scale })
    }

    /// Scene units per AU
    pub fn spatial_scale(&self) -> f64 {
        self.spatial_scale
    }

    /// Position of a body at `julian_date` in scene units
    pub fn position(&self, elements: &OrbitalElements, julian_date: f64) -> Vector3<f64> {
        propagate(elements, julian_date, self.spatial_scale)
    }

    /// Orbit outline in scene units
    pub fn orbit_path(&self, elements: &OrbitalElements, samples: usize) -> Vec<Vector3<f64>> {
        sample_orbit(elements, samples, self.spatial_scale)
    }
}
