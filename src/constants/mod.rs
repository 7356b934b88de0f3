//! Constants module for orbit propagation and simulated time

use std::f64::consts::PI;

// Time constants
/// Milliseconds in a day, as a float for Julian date arithmetic
pub const DAY_MS_F64: f64 = 86_400_000.0;
/// J2000.0 epoch as Julian date (2000-01-01T12:00:00)
pub const J2000: f64 = 2_451_545.0;
/// Julian date of the Unix epoch (1970-01-01T00:00:00 UTC)
pub const UNIX_EPOCH_JD: f64 = 2_440_587.5;
/// Unix milliseconds of the J2000.0 instant
pub const J2000_UNIX_MS: i64 = 946_728_000_000;

// Simulated date range
/// Unix milliseconds of 1900-01-01T00:00:00 UTC, the earliest simulated date
pub const MIN_DATE_MS: i64 = -2_208_988_800_000;
/// Unix milliseconds of 2100-12-31T00:00:00 UTC, the latest simulated date
pub const MAX_DATE_MS: i64 = 4_133_894_400_000;

// Gravitation
/// Gaussian gravitational constant in radians per day
pub const GAUSSIAN_K: f64 = 0.017_202_098_95;
/// Gaussian gravitational constant in degrees per day.
///
/// Mean motion of a massless body on a 1 AU orbit; the matching period is
/// about 365.2569 days.
pub const GAUSSIAN_K_DEG: f64 = GAUSSIAN_K * RAD2DEG;

// Angles
/// Degrees to radians conversion factor
pub const DEG2RAD: f64 = PI / 180.0;
/// Radians to degrees conversion factor
pub const RAD2DEG: f64 = 180.0 / PI;
/// Tau (2*PI) for full circle
pub const TAU: f64 = 2.0 * PI;

// Kepler solver
/// Newton-Raphson stopping tolerance on the eccentric anomaly step (radians)
pub const KEPLER_TOLERANCE: f64 = 1e-8;
/// Newton-Raphson iteration cap
pub const KEPLER_MAX_ITERATIONS: u32 = 30;
/// Eccentricity above which the solver starts from E = π instead of E = M
pub const KEPLER_HIGH_ECCENTRICITY: f64 = 0.8;

// Scene
/// Scene units per astronomical unit used when no configuration overrides it
pub const DEFAULT_SPATIAL_SCALE: f64 = 10.0;
