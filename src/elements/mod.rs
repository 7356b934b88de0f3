//! # Orbital Elements Module
//!
//! Classical heliocentric orbital elements in the convention used by small-body
//! catalogs: angles in degrees, semi-major axis in AU, epoch as a Julian date.
//!
//! | field   | meaning                          | unit    |
//! |---------|----------------------------------|---------|
//! | `a`     | semi-major axis                  | AU      |
//! | `e`     | eccentricity, `0 <= e < 1`       | -       |
//! | `i`     | inclination                      | degrees |
//! | `om`    | longitude of ascending node (Ω)  | degrees |
//! | `varpi` | longitude of periapsis (ϖ)       | degrees |
//! | `ma`    | mean anomaly at epoch (M₀)       | degrees |
//! | `epoch` | reference instant                | JD      |
//!
//! An `OrbitalElements` value can only be obtained through
//! [`OrbitalElements::new`] (deserialization goes through it too), so every
//! value the propagator sees describes a bound ellipse with finite fields.
//! The argument of periapsis `ω = ϖ − Ω` is derived on demand.
//!
//! ## Examples
//!
//! ```rust
//! use orrery::elements::OrbitalElements;
//!
//! let earth = OrbitalElements::new(1.0, 0.0167, 0.0, -11.26, 102.9, 100.46, 2451545.0).unwrap();
//! assert!((earth.argument_of_periapsis() - 114.16).abs() < 1e-9);
//! assert!(OrbitalElements::new(1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 2451545.0).is_err());
//! ```

use crate::constants::GAUSSIAN_K_DEG;
use crate::{OrreryError, Result};
use serde::{Deserialize, Serialize};

/// Immutable set of classical orbital elements
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawElements")]
pub struct OrbitalElements {
    a: f64,
    e: f64,
    i: f64,
    om: f64,
    varpi: f64,
    ma: f64,
    epoch: f64,
}

/// Unchecked field bag used for deserialization
#[derive(Debug, Clone, Copy, Deserialize)]
struct RawElements {
    a: f64,
    e: f64,
    i: f64,
    om: f64,
    varpi: f64,
    ma: f64,
    epoch: f64,
}

impl TryFrom<RawElements> for OrbitalElements {
    type Error = OrreryError;

    fn try_from(raw: RawElements) -> Result<Self> {
        OrbitalElements::new(raw.a, raw.e, raw.i, raw.om, raw.varpi, raw.ma, raw.epoch)
    }
}

impl OrbitalElements {
    /// Create a validated element set
    ///
    /// # Arguments
    ///
    /// * `a` - Semi-major axis (AU), must be positive
    /// * `e` - Eccentricity, must lie in `[0, 1)`
    /// * `i` - Inclination (degrees)
    /// * `om` - Longitude of the ascending node (degrees)
    /// * `varpi` - Longitude of periapsis (degrees)
    /// * `ma` - Mean anomaly at epoch (degrees)
    /// * `epoch` - Julian date the mean anomaly refers to
    ///
    /// # Errors
    ///
    /// Returns [`OrreryError::MalformedElements`] naming the first field that is
    /// non-finite or out of range.
    pub fn new(a: f64, e: f64, i: f64, om: f64, varpi: f64, ma: f64, epoch: f64) -> Result<Self> {
        let fields = [
            ("a", a),
            ("e", e),
            ("i", i),
            ("om", om),
            ("varpi", varpi),
            ("ma", ma),
            ("epoch", epoch),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(OrreryError::MalformedElements {
                    field,
                    value,
                    reason: "value must be finite",
                });
            }
        }
        if a <= 0.0 {
            return Err(OrreryError::MalformedElements {
                field: "a",
                value: a,
                reason: "semi-major axis must be positive",
            });
        }
        if !(0.0..1.0).contains(&e) {
            return Err(OrreryError::MalformedElements {
                field: "e",
                value: e,
                reason: "eccentricity must lie in [0, 1)",
            });
        }

        Ok(Self {
            a,
            e,
            i,
            om,
            varpi,
            ma,
            epoch,
        })
    }

    /// Semi-major axis (AU)
    pub fn a(&self) -> f64 {
        self.a
    }

    /// Eccentricity
    pub fn e(&self) -> f64 {
        self.e
    }

    /// Inclination (degrees)
    pub fn i(&self) -> f64 {
        self.i
    }

    /// Longitude of the ascending node (degrees)
    pub fn om(&self) -> f64 {
        self.om
    }

    /// Longitude of periapsis (degrees)
    pub fn varpi(&self) -> f64 {
        self.varpi
    }

    /// Mean anomaly at epoch (degrees)
    pub fn ma(&self) -> f64 {
        self.ma
    }

    /// Epoch (Julian date)
    pub fn epoch(&self) -> f64 {
        self.epoch
    }

    /// Argument of periapsis ω = ϖ − Ω (degrees)
    pub fn argument_of_periapsis(&self) -> f64 {
        self.varpi - self.om
    }

    /// Mean motion in degrees per day
    pub fn mean_motion(&self) -> f64 {
        GAUSSIAN_K_DEG / self.a.powf(1.5)
    }

    /// Orbital period in years from Kepler's third law, `P = a^1.5`
    ///
    /// Used for display only; propagation runs on [`mean_motion`](Self::mean_motion).
    pub fn period_years(&self) -> f64 {
        self.a.powf(1.5)
    }

    /// Orbital period in days as implied by the mean motion
    pub fn period_days(&self) -> f64 {
        360.0 / self.mean_motion()
    }

    /// Perihelion distance q = a(1 − e) in AU
    pub fn perihelion_distance(&self) -> f64 {
        self.a * (1.0 - self.e)
    }

    /// Aphelion distance Q = a(1 + e) in AU
    pub fn aphelion_distance(&self) -> f64 {
        self.a * (1.0 + self.e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn earth() -> OrbitalElements {
        OrbitalElements::new(1.0, 0.0167, 0.0, -11.26, 102.9, 100.46, 2451545.0).unwrap()
    }

    #[test]
    fn test_accessors() {
        let el = earth();
        assert_eq!(el.a(), 1.0);
        assert_eq!(el.e(), 0.0167);
        assert_eq!(el.i(), 0.0);
        assert_eq!(el.om(), -11.26);
        assert_eq!(el.varpi(), 102.9);
        assert_eq!(el.ma(), 100.46);
        assert_eq!(el.epoch(), 2451545.0);
        assert_relative_eq!(el.argument_of_periapsis(), 114.16, epsilon = 1e-12);
    }

    #[test]
    fn test_derived_quantities() {
        let el = earth();
        assert_relative_eq!(el.period_years(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(el.period_days(), 365.2569, epsilon = 1e-3);
        assert_relative_eq!(el.mean_motion(), 0.985_607_67, epsilon = 1e-8);
        assert_relative_eq!(el.perihelion_distance(), 0.9833, epsilon = 1e-12);
        assert_relative_eq!(el.aphelion_distance(), 1.0167, epsilon = 1e-12);

        let jupiter = OrbitalElements::new(5.2, 0.048, 1.3, 100.5, 14.7, 20.0, 2451545.0).unwrap();
        assert_relative_eq!(jupiter.period_years(), 11.858, epsilon = 1e-3);
    }

    #[rstest]
    #[case(0.0, 0.1, "a")]
    #[case(-1.0, 0.1, "a")]
    #[case(1.0, 1.0, "e")]
    #[case(1.0, 1.5, "e")]
    #[case(1.0, -0.01, "e")]
    #[case(f64::NAN, 0.1, "a")]
    #[case(1.0, f64::INFINITY, "e")]
    fn test_rejects_malformed(#[case] a: f64, #[case] e: f64, #[case] expected: &str) {
        match OrbitalElements::new(a, e, 0.0, 0.0, 0.0, 0.0, 2451545.0) {
            Err(OrreryError::MalformedElements { field, .. }) => assert_eq!(field, expected),
            other => panic!("expected MalformedElements, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_non_finite_angles() {
        let result = OrbitalElements::new(1.0, 0.1, 0.0, 0.0, f64::NAN, 0.0, 2451545.0);
        assert!(matches!(
            result,
            Err(OrreryError::MalformedElements { field: "varpi", .. })
        ));
    }

    #[test]
    fn test_serde_validates() {
        let json = r#"{"a":1.0,"e":0.0167,"i":0.0,"om":-11.26,"varpi":102.9,"ma":100.46,"epoch":2451545.0}"#;
        let el: OrbitalElements = serde_json::from_str(json).unwrap();
        assert_eq!(el, earth());

        let round_trip = serde_json::to_string(&el).unwrap();
        assert_eq!(serde_json::from_str::<OrbitalElements>(&round_trip).unwrap(), el);

        let bad = r#"{"a":1.0,"e":1.2,"i":0.0,"om":0.0,"varpi":0.0,"ma":0.0,"epoch":2451545.0}"#;
        assert!(serde_json::from_str::<OrbitalElements>(bad).is_err());
    }
}
