//! Tick driver tying the clock to the propagator
//!
//! An [`Orrery`] owns the simulated clock, the body list and the latest
//! position of every body. Each host frame calls [`Orrery::tick`]; when the
//! clock moves, every non-central body is propagated to the new Julian date.
//! Explicit jumps refresh positions immediately, even while paused.
//!
//! Positions are held in scene units and indexed like [`Orrery::bodies`].

use crate::bodies::{default_bodies, CelestialBody};
use crate::clock::{SimulatedClock, TickOutcome};
use crate::config::OrreryConfig;
use crate::propagator::Propagator;
use crate::{OrreryError, Result};
use chrono::{DateTime, Utc};
use nalgebra::Vector3;

/// Simulated clock plus the bodies it drives
#[derive(Debug, Clone)]
pub struct Orrery {
    clock: SimulatedClock,
    propagator: Propagator,
    bodies: Vec<CelestialBody>,
    positions: Vec<Vector3<f64>>,
}

impl Orrery {
    /// Orrery with the built-in Sun, planets and Pluto
    pub fn new(config: &OrreryConfig) -> Result<Self> {
        Self::with_bodies(config, default_bodies())
    }

    /// Orrery over a caller-supplied body list
    pub fn with_bodies(config: &OrreryConfig, bodies: Vec<CelestialBody>) -> Result<Self> {
        let clock = SimulatedClock::from_config(config)?;
        let propagator = Propagator::new(config.spatial_scale)?;

        log::info!(
            "Orrery with {} bodies at {}",
            bodies.len(),
            clock.current_display_strings().calendar_date
        );

        let mut orrery = Self {
            clock,
            propagator,
            positions: vec![Vector3::zeros(); bodies.len()],
            bodies,
        };
        orrery.refresh_positions();
        Ok(orrery)
    }

    /// Advance the clock one frame and refresh positions if it moved
    pub fn tick(&mut self, host_running: bool) -> TickOutcome {
        let outcome = self.clock.tick(host_running);
        if outcome.advanced {
            self.refresh_positions();
        }
        outcome
    }

    /// Propagate every non-central body to the clock's current Julian date
    pub fn refresh_positions(&mut self) {
        let julian_date = self.clock.julian_date();
        let scale = self.propagator.spatial_scale();
        for (body, position) in self.bodies.iter().zip(self.positions.iter_mut()) {
            *position = body.position_at(julian_date, scale);
        }
    }

    /// Jump to J2000 and refresh positions
    pub fn jump_to_epoch(&mut self) {
        self.clock.jump_to_epoch();
        self.refresh_positions();
    }

    /// Jump to the present and refresh positions
    pub fn jump_to_now(&mut self) {
        self.clock.jump_to_now();
        self.refresh_positions();
    }

    /// Jump to an arbitrary instant and refresh positions
    pub fn jump_to(&mut self, instant: DateTime<Utc>) {
        self.clock.jump_to(instant);
        self.refresh_positions();
    }

    /// Add a body and compute its current position
    pub fn add_body(&mut self, body: CelestialBody) {
        let position = body.position_at(self.clock.julian_date(), self.propagator.spatial_scale());
        self.bodies.push(body);
        self.positions.push(position);
    }

    pub fn bodies(&self) -> &[CelestialBody] {
        &self.bodies
    }

    /// Bodies paired with their latest positions
    pub fn positions(&self) -> impl Iterator<Item = (&CelestialBody, &Vector3<f64>)> {
        self.bodies.iter().zip(self.positions.iter())
    }

    /// The named body (case-insensitive)
    pub fn body(&self, name: &str) -> Result<&CelestialBody> {
        self.index_of(name).map(|index| &self.bodies[index])
    }

    /// Latest position of the named body (case-insensitive)
    pub fn position_of(&self, name: &str) -> Result<Vector3<f64>> {
        self.index_of(name).map(|index| self.positions[index])
    }

    /// Orbit outline of the named body; empty for the central body
    pub fn orbit_path(&self, name: &str, samples: usize) -> Result<Vec<Vector3<f64>>> {
        let index = self.index_of(name)?;
        Ok(self.bodies[index]
            .elements()
            .map(|elements| self.propagator.orbit_path(elements, samples))
            .unwrap_or_default())
    }

    fn index_of(&self, name: &str) -> Result<usize> {
        self.bodies
            .iter()
            .position(|body| body.name.eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| OrreryError::UnknownBody(name.to_string()))
    }

    pub fn clock(&self) -> &SimulatedClock {
        &self.clock
    }

    /// Mutable clock access for speed, direction and play/pause controls
    pub fn clock_mut(&mut self) -> &mut SimulatedClock {
        &mut self.clock
    }

    pub fn propagator(&self) -> &Propagator {
        &self.propagator
    }
}
