//! Simulated clock
//!
//! [`SimulatedClock`] owns the simulated "current instant" and advances it once
//! per host frame. While playing, each tick moves the instant by
//! `time_scale` simulated days in the current direction. Leaving the
//! configured date range teleports the instant to the opposite bound rather
//! than clamping, so playback never stalls at an edge.
//!
//! The instant is stepped in whole milliseconds, which makes a forward tick
//! followed by a backward tick at the same rate land exactly where it started.
//!
//! Every mutation goes through a method on the clock. Hosts that drive the
//! clock from more than one thread wrap it in a [`SharedClock`], which funnels
//! ticks and user actions through one lock.

use crate::config::OrreryConfig;
use crate::constants::DAY_MS_F64;
use crate::time::{
    format_calendar_date, format_julian_date, j2000_instant, julian_date, max_date, min_date,
    truncate_to_millis,
};
use crate::{OrreryError, Result};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// Default lower bound of the rate exponent (0.01×)
pub const DEFAULT_MIN_RATE_EXPONENT: f64 = -2.0;
/// Default upper bound of the rate exponent (100×)
pub const DEFAULT_MAX_RATE_EXPONENT: f64 = 2.0;

/// Whether ticks advance the clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayState {
    Playing,
    Paused,
}

/// Direction of simulated time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    /// +1 for forward, -1 for backward
    pub fn sign(&self) -> i64 {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }

    /// The opposite direction
    pub fn reversed(&self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

/// Result of one clock tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutcome {
    /// Simulated instant after the tick
    pub instant: DateTime<Utc>,
    /// Julian date of `instant`
    pub julian_date: f64,
    /// Whether the tick moved the clock
    pub advanced: bool,
    /// Whether the tick left the date range and teleported to the other bound
    pub wrapped: bool,
}

/// Strings for the date and speed panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayStrings {
    /// `YYYY-MM-DD`
    pub calendar_date: String,
    /// `JD: 2451545.00`
    pub julian_date: String,
    /// `1.00x`
    pub speed: String,
}

/// Simulated time state machine
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedClock {
    current: DateTime<Utc>,
    min_date: DateTime<Utc>,
    max_date: DateTime<Utc>,
    state: PlayState,
    direction: Direction,
    rate_exponent: f64,
    time_scale: f64,
    min_rate_exponent: f64,
    max_rate_exponent: f64,
}

impl SimulatedClock {
    /// Clock at J2000, playing forward at 1× between 1900-01-01 and 2100-12-31
    pub fn new() -> Self {
        Self {
            current: j2000_instant(),
            min_date: min_date(),
            max_date: max_date(),
            state: PlayState::Playing,
            direction: Direction::Forward,
            rate_exponent: 0.0,
            time_scale: 1.0,
            min_rate_exponent: DEFAULT_MIN_RATE_EXPONENT,
            max_rate_exponent: DEFAULT_MAX_RATE_EXPONENT,
        }
    }

    /// Clock at J2000 with a custom date range
    pub fn with_bounds(min_date: DateTime<Utc>, max_date: DateTime<Utc>) -> Result<Self> {
        if min_date >= max_date {
            return Err(OrreryError::Config(format!(
                "date range is empty: {} is not before {}",
                min_date, max_date
            )));
        }
        Ok(Self {
            min_date: truncate_to_millis(min_date),
            max_date: truncate_to_millis(max_date),
            ..Self::new()
        })
    }

    /// Build a clock from configuration
    pub fn from_config(config: &OrreryConfig) -> Result<Self> {
        config.validate()?;
        let (min_date, max_date) = config.clock_bounds()?;

        let mut clock = Self::with_bounds(min_date, max_date)?;
        clock.min_rate_exponent = config.min_rate_exponent;
        clock.max_rate_exponent = config.max_rate_exponent;
        clock.current = truncate_to_millis(config.start.resolve()?);
        clock.set_rate(config.rate_exponent)?;
        if !config.playing {
            clock.state = PlayState::Paused;
        }
        if config.reversed {
            clock.direction = Direction::Backward;
        }
        Ok(clock)
    }

    /// Advance the clock by one frame.
    ///
    /// Nothing moves unless the clock is playing and `host_running` is true.
    /// Otherwise the instant moves by `time_scale` days in the current
    /// direction; overshooting either bound teleports to the other one.
    pub fn tick(&mut self, host_running: bool) -> TickOutcome {
        if !host_running || self.state == PlayState::Paused {
            return self.outcome(false, false);
        }

        let step = self.direction.sign() * self.step_millis();
        let next = self
            .current
            .timestamp_millis()
            .checked_add(step)
            .and_then(DateTime::<Utc>::from_timestamp_millis);

        let (next, wrapped) = match next {
            Some(instant) if instant < self.min_date => (self.max_date, true),
            Some(instant) if instant > self.max_date => (self.min_date, true),
            Some(instant) => (instant, false),
            None => match self.direction {
                Direction::Forward => (self.min_date, true),
                Direction::Backward => (self.max_date, true),
            },
        };

        if wrapped {
            log::debug!(
                "Simulated date left [{}, {}], wrapped to {}",
                format_calendar_date(&self.min_date),
                format_calendar_date(&self.max_date),
                format_calendar_date(&next)
            );
        }

        self.current = next;
        self.outcome(true, wrapped)
    }

    /// Milliseconds moved per tick, `trunc(time_scale · 86_400_000)`
    pub fn step_millis(&self) -> i64 {
        (self.time_scale * DAY_MS_F64).trunc() as i64
    }

    fn outcome(&self, advanced: bool, wrapped: bool) -> TickOutcome {
        TickOutcome {
            instant: self.current,
            julian_date: julian_date(&self.current),
            advanced,
            wrapped,
        }
    }

    /// Set the instant to J2000 (2000-01-01T12:00:00 UTC)
    pub fn jump_to_epoch(&mut self) {
        log::info!("Jumping to J2000");
        self.jump_to(j2000_instant());
    }

    /// Set the instant to the real-world current time
    pub fn jump_to_now(&mut self) {
        log::info!("Jumping to the present");
        self.jump_to(Utc::now());
    }

    /// Set the instant directly, truncated to whole milliseconds.
    ///
    /// Instants outside the date range are accepted as-is; the next tick
    /// wraps them back in.
    pub fn jump_to(&mut self, instant: DateTime<Utc>) {
        let instant = truncate_to_millis(instant);
        if instant < self.min_date || instant > self.max_date {
            log::warn!(
                "Simulated date {} is outside [{}, {}]",
                format_calendar_date(&instant),
                format_calendar_date(&self.min_date),
                format_calendar_date(&self.max_date)
            );
        }
        self.current = instant;
    }

    /// Set `time_scale = 10^exponent`, with the exponent clamped to the
    /// configured slider range. Returns the new time scale.
    pub fn set_rate(&mut self, exponent: f64) -> Result<f64> {
        if !exponent.is_finite() {
            return Err(OrreryError::InvalidRate(exponent));
        }
        self.rate_exponent = exponent.clamp(self.min_rate_exponent, self.max_rate_exponent);
        self.time_scale = 10f64.powf(self.rate_exponent);
        log::info!("Simulation speed set to {}", self.speed_display());
        Ok(self.time_scale)
    }

    /// Set the time scale back to 1× (exponent 0)
    pub fn reset_rate_to_one(&mut self) {
        self.rate_exponent = 0.0;
        self.time_scale = 1.0;
        log::info!("Simulation speed reset to 1.00x");
    }

    /// Reverse the direction of simulated time
    pub fn toggle_direction(&mut self) -> Direction {
        self.direction = self.direction.reversed();
        log::info!("Simulated time now runs {:?}", self.direction);
        self.direction
    }

    /// Flip between playing and paused
    pub fn toggle_play_pause(&mut self) -> PlayState {
        self.state = match self.state {
            PlayState::Playing => PlayState::Paused,
            PlayState::Paused => PlayState::Playing,
        };
        log::info!("Clock {:?}", self.state);
        self.state
    }

    /// Current simulated instant
    pub fn current_instant(&self) -> DateTime<Utc> {
        self.current
    }

    /// Julian date of the current simulated instant
    pub fn julian_date(&self) -> f64 {
        julian_date(&self.current)
    }

    pub fn state(&self) -> PlayState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlayState::Playing
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn rate_exponent(&self) -> f64 {
        self.rate_exponent
    }

    /// Simulated days per tick
    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Earliest and latest instants of the date range
    pub fn bounds(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.min_date, self.max_date)
    }

    /// Speed label, e.g. `"1.00x"`
    pub fn speed_display(&self) -> String {
        format!("{:.2}x", self.time_scale)
    }

    /// Date, Julian date and speed strings for the UI
    pub fn current_display_strings(&self) -> DisplayStrings {
        DisplayStrings {
            calendar_date: format_calendar_date(&self.current),
            julian_date: format_julian_date(self.julian_date()),
            speed: self.speed_display(),
        }
    }
}

impl Default for SimulatedClock {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SimulatedClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let strings = self.current_display_strings();
        write!(
            f,
            "{} ({}) {} {:?} {:?}",
            strings.calendar_date, strings.julian_date, strings.speed, self.direction, self.state
        )
    }
}

/// Clock handle that serializes ticks and user actions across threads
#[derive(Debug, Clone, Default)]
pub struct SharedClock {
    inner: Arc<Mutex<SimulatedClock>>,
}

impl SharedClock {
    pub fn new(clock: SimulatedClock) -> Self {
        Self {
            inner: Arc::new(Mutex::new(clock)),
        }
    }

    /// Advance the shared clock by one frame
    pub fn tick(&self, host_running: bool) -> TickOutcome {
        self.inner.lock().tick(host_running)
    }

    /// Run one action with exclusive access to the clock
    pub fn with<R>(&self, action: impl FnOnce(&mut SimulatedClock) -> R) -> R {
        action(&mut self.inner.lock())
    }

    /// Copy of the clock's current state
    pub fn snapshot(&self) -> SimulatedClock {
        self.inner.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StartInstant;
    use crate::time::utc_midnight;
    use approx::assert_relative_eq;
    use chrono::Duration;
    use rstest::rstest;

    #[test]
    fn test_initial_state() {
        let clock = SimulatedClock::new();
        assert_eq!(clock.current_instant(), j2000_instant());
        assert_eq!(clock.julian_date(), 2451545.0);
        assert!(clock.is_playing());
        assert_eq!(clock.direction(), Direction::Forward);
        assert_eq!(clock.time_scale(), 1.0);
        assert_eq!(clock.rate_exponent(), 0.0);
        assert_eq!(
            clock.bounds(),
            (utc_midnight(1900, 1, 1).unwrap(), utc_midnight(2100, 12, 31).unwrap())
        );
    }

    #[test]
    fn test_tick_advances_one_day() {
        let mut clock = SimulatedClock::new();
        let outcome = clock.tick(true);
        assert!(outcome.advanced);
        assert!(!outcome.wrapped);
        assert_eq!(outcome.instant, j2000_instant() + Duration::days(1));
        assert_eq!(outcome.julian_date, 2451546.0);
    }

    #[test]
    fn test_paused_and_host_stopped_do_not_advance() {
        let mut clock = SimulatedClock::new();
        assert_eq!(clock.toggle_play_pause(), PlayState::Paused);
        let outcome = clock.tick(true);
        assert!(!outcome.advanced);
        assert_eq!(outcome.instant, j2000_instant());

        assert_eq!(clock.toggle_play_pause(), PlayState::Playing);
        let outcome = clock.tick(false);
        assert!(!outcome.advanced);
        assert_eq!(clock.current_instant(), j2000_instant());
    }

    #[test]
    fn test_actions_keep_play_state() {
        let mut clock = SimulatedClock::new();
        clock.toggle_play_pause();
        clock.set_rate(1.0).unwrap();
        clock.toggle_direction();
        clock.jump_to_epoch();
        clock.reset_rate_to_one();
        assert_eq!(clock.state(), PlayState::Paused);

        clock.toggle_play_pause();
        clock.jump_to_now();
        assert_eq!(clock.state(), PlayState::Playing);
    }

    #[test]
    fn test_wraps_forward_to_min_date() {
        let mut clock = SimulatedClock::new();
        clock.set_rate(2.0).unwrap();
        clock.jump_to(max_date() - Duration::milliseconds(1));

        let outcome = clock.tick(true);
        assert!(outcome.wrapped);
        assert_eq!(outcome.instant, min_date());
        assert_eq!(clock.current_instant(), min_date());
    }

    #[test]
    fn test_wraps_backward_to_max_date() {
        let mut clock = SimulatedClock::new();
        clock.toggle_direction();
        clock.jump_to(min_date() + Duration::hours(1));

        let outcome = clock.tick(true);
        assert!(outcome.wrapped);
        assert_eq!(outcome.instant, max_date());
    }

    #[test]
    fn test_landing_on_bound_does_not_wrap() {
        let mut clock = SimulatedClock::new();
        clock.jump_to(max_date() - Duration::days(1));
        let outcome = clock.tick(true);
        assert!(!outcome.wrapped);
        assert_eq!(outcome.instant, max_date());

        let outcome = clock.tick(true);
        assert!(outcome.wrapped);
        assert_eq!(outcome.instant, min_date());
    }

    #[rstest]
    #[case(-2.0)]
    #[case(-0.37)]
    #[case(0.0)]
    #[case(0.5)]
    #[case(2.0)]
    fn test_forward_then_backward_is_exact(#[case] exponent: f64) {
        let mut clock = SimulatedClock::new();
        clock.set_rate(exponent).unwrap();
        clock.jump_to(utc_midnight(1987, 6, 5).unwrap() + Duration::milliseconds(123));
        let before = clock.current_instant();

        clock.tick(true);
        assert_ne!(clock.current_instant(), before);
        clock.toggle_direction();
        clock.tick(true);
        assert_eq!(clock.current_instant(), before);
    }

    #[rstest]
    #[case(-2.0, 0.01)]
    #[case(0.0, 1.0)]
    #[case(1.0, 10.0)]
    #[case(2.0, 100.0)]
    fn test_rate_is_logarithmic(#[case] exponent: f64, #[case] expected: f64) {
        let mut clock = SimulatedClock::new();
        let scale = clock.set_rate(exponent).unwrap();
        assert_relative_eq!(scale, expected, max_relative = 1e-12);
        assert_eq!(clock.time_scale(), scale);
        assert_eq!(clock.rate_exponent(), exponent);
    }

    #[test]
    fn test_rate_clamped_and_validated() {
        let mut clock = SimulatedClock::new();
        assert_relative_eq!(clock.set_rate(5.0).unwrap(), 100.0, max_relative = 1e-12);
        assert_eq!(clock.rate_exponent(), 2.0);
        assert_relative_eq!(clock.set_rate(-9.0).unwrap(), 0.01, max_relative = 1e-12);

        assert!(matches!(
            clock.set_rate(f64::NAN),
            Err(OrreryError::InvalidRate(_))
        ));
        assert_relative_eq!(clock.time_scale(), 0.01, max_relative = 1e-12);

        clock.reset_rate_to_one();
        assert_eq!(clock.time_scale(), 1.0);
        assert_eq!(clock.rate_exponent(), 0.0);
    }

    #[test]
    fn test_step_millis() {
        let mut clock = SimulatedClock::new();
        assert_eq!(clock.step_millis(), 86_400_000);
        clock.set_rate(-2.0).unwrap();
        assert_eq!(clock.step_millis(), 864_000);
        clock.set_rate(2.0).unwrap();
        assert_eq!(clock.step_millis(), 8_640_000_000);
    }

    #[test]
    fn test_jump_outside_range_is_accepted() {
        let mut clock = SimulatedClock::new();
        let far_future = utc_midnight(2150, 1, 1).unwrap();
        clock.jump_to(far_future);
        assert_eq!(clock.current_instant(), far_future);

        let outcome = clock.tick(true);
        assert!(outcome.wrapped);
        assert_eq!(outcome.instant, min_date());
    }

    #[test]
    fn test_jump_to_now() {
        let mut clock = SimulatedClock::new();
        let before = truncate_to_millis(Utc::now());
        clock.jump_to_now();
        let after = Utc::now();
        assert!(clock.current_instant() >= before && clock.current_instant() <= after);

        clock.jump_to_epoch();
        assert_eq!(clock.current_instant(), j2000_instant());
    }

    #[test]
    fn test_jump_to_now_then_back_is_exact() {
        let mut clock = SimulatedClock::new();
        clock.jump_to_now();
        let before = clock.current_instant();
        assert_eq!(before.timestamp_subsec_nanos() % 1_000_000, 0);

        clock.tick(true);
        clock.toggle_direction();
        clock.tick(true);
        assert_eq!(clock.current_instant(), before);
    }

    #[test]
    fn test_sub_millisecond_start_is_truncated() {
        let config = OrreryConfig {
            start: StartInstant::At("2024-01-01T00:00:00.000500Z".to_string()),
            ..OrreryConfig::default()
        };
        let mut clock = SimulatedClock::from_config(&config).unwrap();
        let start = utc_midnight(2024, 1, 1).unwrap();
        assert_eq!(clock.current_instant(), start);

        clock.jump_to(start + Duration::nanoseconds(750_000));
        assert_eq!(clock.current_instant(), start);

        clock.tick(true);
        clock.toggle_direction();
        clock.tick(true);
        assert_eq!(clock.current_instant(), start);
    }

    #[test]
    fn test_display_strings() {
        let mut clock = SimulatedClock::new();
        assert_eq!(
            clock.current_display_strings(),
            DisplayStrings {
                calendar_date: "2000-01-01".to_string(),
                julian_date: "JD: 2451545.00".to_string(),
                speed: "1.00x".to_string(),
            }
        );

        clock.set_rate(-2.0).unwrap();
        assert_eq!(clock.speed_display(), "0.01x");
        assert!(clock.to_string().starts_with("2000-01-01 (JD: 2451545.00) 0.01x"));
    }

    #[test]
    fn test_with_bounds_validation() {
        let a = utc_midnight(2000, 1, 1).unwrap();
        let b = utc_midnight(2001, 1, 1).unwrap();
        assert!(SimulatedClock::with_bounds(b, a).is_err());
        assert!(SimulatedClock::with_bounds(a, a).is_err());
        assert_eq!(SimulatedClock::with_bounds(a, b).unwrap().bounds(), (a, b));
    }

    #[test]
    fn test_shared_clock_serializes_ticks() {
        let shared = SharedClock::new(SimulatedClock::new());
        std::thread::scope(|scope| {
            for _ in 0..4 {
                let clock = shared.clone();
                scope.spawn(move || {
                    for _ in 0..25 {
                        clock.tick(true);
                    }
                });
            }
        });

        let snapshot = shared.snapshot();
        assert_eq!(snapshot.current_instant(), j2000_instant() + Duration::days(100));

        let direction = shared.with(|clock| clock.toggle_direction());
        assert_eq!(direction, Direction::Backward);
        assert_eq!(shared.snapshot().direction(), Direction::Backward);
    }
}
