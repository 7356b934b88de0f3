//! Orrery: Keplerian orbit propagation and simulated-time control
//!
//! This crate provides the numeric core of a solar system visualization:
//! converting a body's classical orbital elements plus an arbitrary instant
//! into a heliocentric ecliptic position, and advancing a simulated clock
//! under play/pause, variable rate, reversal and date-range wraparound.
//!
//! Rendering is left to the host. Each frame the host calls
//! [`Orrery::tick`], then copies [`Orrery::positions`] into its own scene.

use thiserror::Error;

pub mod bodies;
pub mod clock;
pub mod config;
pub mod constants;
pub mod elements;
pub mod kepler;
pub mod orrery;
pub mod propagator;
pub mod time;

// Re-export commonly used types
pub use bodies::{Body, BodyCategory, CelestialBody};
pub use clock::{Direction, DisplayStrings, PlayState, SharedClock, SimulatedClock, TickOutcome};
pub use config::{OrreryConfig, StartInstant};
pub use elements::OrbitalElements;
pub use kepler::KeplerSolution;
pub use orrery::Orrery;
pub use propagator::{compute_period_years, propagate, OrbitState, Propagator};

/// Main error type for the orrery library
#[derive(Debug, Error)]
pub enum OrreryError {
    #[error("Malformed orbital elements: {field} = {value} ({reason})")]
    MalformedElements {
        /// Name of the offending element
        field: &'static str,
        /// The rejected value
        value: f64,
        /// Which constraint it violated
        reason: &'static str,
    },

    #[error("Invalid rate exponent: {0}")]
    InvalidRate(f64),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Body not found: {0}")]
    UnknownBody(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for orrery operations
pub type Result<T> = std::result::Result<T, OrreryError>;
