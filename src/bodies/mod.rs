//! Solar system bodies
//!
//! The built-in catalog carries J2000 mean elements for the planets and Pluto
//! (JPL "Keplerian Elements for Approximate Positions of the Major Planets").
//! The table lists mean longitude L; the mean anomaly at epoch is stored as
//! `M₀ = L − ϖ` so every entry uses the same element convention as
//! [`OrbitalElements`].
//!
//! The Sun is the central body. It has no elements and always sits at the
//! frame origin; nothing ever propagates it.

use crate::constants::J2000;
use crate::elements::OrbitalElements;
use crate::propagator::{compute_period_years, propagate};
use crate::{OrreryError, Result};
use lazy_static::lazy_static;
use nalgebra::Vector3;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Enum representing the built-in solar system bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Body {
    Sun,
    Mercury,
    Venus,
    Earth,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
}

/// Broad classification shown alongside a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyCategory {
    Star,
    Planet,
    DwarfPlanet,
    SmallBody,
}

// (body, a [AU], e, i [deg], L [deg], varpi [deg], Omega [deg]) at J2000
#[rustfmt::skip]
const PLANET_TABLE: [(Body, f64, f64, f64, f64, f64, f64); 9] = [
    (Body::Mercury, 0.387_099_27, 0.205_635_93, 7.004_979_02, 252.250_323_50, 77.457_796_28, 48.330_765_93),
    (Body::Venus, 0.723_335_66, 0.006_776_72, 3.394_676_05, 181.979_099_50, 131.602_467_18, 76.679_842_55),
    (Body::Earth, 1.000_002_61, 0.016_711_23, -0.000_015_31, 100.464_571_66, 102.937_681_93, 0.0),
    (Body::Mars, 1.523_710_34, 0.093_394_10, 1.849_691_42, -4.553_432_05, -23.943_629_59, 49.559_538_91),
    (Body::Jupiter, 5.202_887_00, 0.048_386_24, 1.304_396_95, 34.396_440_51, 14.728_479_83, 100.473_909_09),
    (Body::Saturn, 9.536_675_94, 0.053_861_79, 2.485_991_87, 49.954_244_23, 92.598_878_31, 113.662_424_48),
    (Body::Uranus, 19.189_164_64, 0.047_257_44, 0.772_637_83, 313.238_104_51, 170.954_276_30, 74.016_925_03),
    (Body::Neptune, 30.069_922_76, 0.008_590_48, 1.770_043_47, -55.120_029_69, 44.964_762_27, 131.784_225_74),
    (Body::Pluto, 39.482_116_75, 0.248_827_30, 17.140_012_06, 238.929_038_33, 224.068_916_29, 110.303_936_84),
];

lazy_static! {
    /// J2000 elements of every orbiting built-in body
    static ref PLANET_ELEMENTS: HashMap<Body, OrbitalElements> = {
        let mut m = HashMap::new();
        for &(body, a, e, i, mean_longitude, varpi, om) in PLANET_TABLE.iter() {
            match OrbitalElements::new(a, e, i, om, varpi, mean_longitude - varpi, J2000) {
                Ok(elements) => {
                    m.insert(body, elements);
                }
                Err(err) => {
                    log::warn!("Dropping {} from the planet catalog: {}", body, err);
                    debug_assert!(false, "invalid catalog entry for {body}: {err}");
                }
            }
        }
        m
    };
}

impl Body {
    /// All built-in bodies, Sun first
    pub const ALL: [Body; 10] = [
        Body::Sun,
        Body::Mercury,
        Body::Venus,
        Body::Earth,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
        Body::Uranus,
        Body::Neptune,
        Body::Pluto,
    ];

    /// Get the body's name as a string
    pub fn name(&self) -> &'static str {
        match self {
            Body::Sun => "Sun",
            Body::Mercury => "Mercury",
            Body::Venus => "Venus",
            Body::Earth => "Earth",
            Body::Mars => "Mars",
            Body::Jupiter => "Jupiter",
            Body::Saturn => "Saturn",
            Body::Uranus => "Uranus",
            Body::Neptune => "Neptune",
            Body::Pluto => "Pluto",
        }
    }

    pub fn category(&self) -> BodyCategory {
        match self {
            Body::Sun => BodyCategory::Star,
            Body::Pluto => BodyCategory::DwarfPlanet,
            _ => BodyCategory::Planet,
        }
    }

    /// J2000 orbital elements; `None` for the Sun
    pub fn elements(&self) -> Option<OrbitalElements> {
        PLANET_ELEMENTS.get(self).copied()
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Body {
    type Err = OrreryError;

    fn from_str(name: &str) -> Result<Self> {
        Body::ALL
            .iter()
            .copied()
            .find(|body| body.name().eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| OrreryError::UnknownBody(name.to_string()))
    }
}

/// A body as the orrery tracks it
#[derive(Debug, Clone, PartialEq)]
pub struct CelestialBody {
    /// Name of the body
    pub name: String,
    pub category: BodyCategory,
    /// Finer classification such as `"NEO"`
    pub subclass: Option<String>,
    elements: Option<OrbitalElements>,
    period_years: Option<f64>,
}

impl CelestialBody {
    /// The fixed body at the frame origin
    pub fn central(name: &str) -> Self {
        Self {
            name: name.to_string(),
            category: BodyCategory::Star,
            subclass: None,
            elements: None,
            period_years: None,
        }
    }

    /// A body on a Keplerian orbit around the central body
    pub fn orbiting(name: &str, elements: OrbitalElements, category: BodyCategory) -> Self {
        Self {
            name: name.to_string(),
            category,
            subclass: None,
            elements: Some(elements),
            period_years: Some(compute_period_years(&elements)),
        }
    }

    /// Build from the built-in catalog
    pub fn from_body(body: Body) -> Self {
        match body.elements() {
            Some(elements) => Self::orbiting(body.name(), elements, body.category()),
            None => Self::central(body.name()),
        }
    }

    pub fn with_subclass(mut self, subclass: &str) -> Self {
        self.subclass = Some(subclass.to_string());
        self
    }

    /// Whether this is the fixed central body
    pub fn is_central(&self) -> bool {
        self.elements.is_none()
    }

    pub fn elements(&self) -> Option<&OrbitalElements> {
        self.elements.as_ref()
    }

    /// Orbital period in years, computed once at construction
    pub fn period_years(&self) -> Option<f64> {
        self.period_years
    }

    /// Position at `julian_date` in scene units; the central body stays at the origin
    pub fn position_at(&self, julian_date: f64, spatial_scale: f64) -> Vector3<f64> {
        match &self.elements {
            Some(elements) => propagate(elements, julian_date, spatial_scale),
            None => Vector3::zeros(),
        }
    }

    /// Short description of the body and its orbit
    pub fn summary(&self) -> String {
        let mut text = format!("This is {}!", self.name);
        if let (Some(elements), Some(period)) = (&self.elements, self.period_years) {
            text.push_str(&format!(
                "\n   Semi-major axis = {:.2} AU\n   Perihelion = {:.2} AU\n   Eccentricity = {:.2}\n   Period = {:.2} yr",
                elements.a(),
                elements.perihelion_distance(),
                elements.e(),
                period
            ));
        }
        text
    }
}

/// The built-in catalog as orrery bodies, Sun first
pub fn default_bodies() -> Vec<CelestialBody> {
    Body::ALL.iter().map(|&body| CelestialBody::from_body(body)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[test]
    fn test_catalog_complete() {
        for body in Body::ALL {
            match body {
                Body::Sun => assert!(body.elements().is_none()),
                _ => assert!(body.elements().is_some(), "{} has no elements", body),
            }
        }
        assert_eq!(default_bodies().len(), Body::ALL.len());
        assert!(default_bodies()[0].is_central());
    }

    #[test]
    fn test_every_catalog_row_validates() {
        for &(body, a, e, i, mean_longitude, varpi, om) in PLANET_TABLE.iter() {
            if let Err(err) = OrbitalElements::new(a, e, i, om, varpi, mean_longitude - varpi, J2000)
            {
                panic!("{body}: {err}");
            }
        }
        assert_eq!(PLANET_ELEMENTS.len(), PLANET_TABLE.len());
    }

    #[rstest]
    #[case(Body::Mercury, 0.2408)]
    #[case(Body::Earth, 1.0000)]
    #[case(Body::Jupiter, 11.8677)]
    #[case(Body::Neptune, 164.8916)]
    fn test_catalog_periods(#[case] body: Body, #[case] years: f64) {
        let celestial = CelestialBody::from_body(body);
        assert_relative_eq!(celestial.period_years().unwrap(), years, epsilon = 1e-4);
    }

    #[test]
    fn test_mean_anomaly_from_mean_longitude() {
        let earth = Body::Earth.elements().unwrap();
        assert_relative_eq!(earth.ma(), 100.464_571_66 - 102.937_681_93, epsilon = 1e-9);
        assert_eq!(earth.epoch(), J2000);
    }

    #[test]
    fn test_earth_near_one_au() {
        let earth = CelestialBody::from_body(Body::Earth);
        let position = earth.position_at(J2000, 1.0);
        // Perihelion is in early January
        assert!(position.norm() > 0.983 && position.norm() < 0.984);
        assert!(position.z.abs() < 1e-6);
    }

    #[test]
    fn test_sun_stays_at_origin() {
        let sun = CelestialBody::from_body(Body::Sun);
        assert_eq!(sun.category, BodyCategory::Star);
        assert_eq!(sun.position_at(J2000 + 1234.5, 10.0), Vector3::zeros());
        assert_eq!(sun.summary(), "This is Sun!");
    }

    #[test]
    fn test_body_from_str() {
        assert_eq!("mars".parse::<Body>().unwrap(), Body::Mars);
        assert_eq!(" Pluto ".parse::<Body>().unwrap(), Body::Pluto);
        assert!(matches!(
            "Vulcan".parse::<Body>(),
            Err(OrreryError::UnknownBody(_))
        ));
    }

    #[test]
    fn test_summary() {
        let elements =
            OrbitalElements::new(2.5, 0.2, 10.0, 80.0, 120.0, 33.0, J2000).unwrap();
        let body = CelestialBody::orbiting("Ceres-ish", elements, BodyCategory::SmallBody)
            .with_subclass("NEO");
        assert_eq!(body.subclass.as_deref(), Some("NEO"));
        assert_eq!(
            body.summary(),
            "This is Ceres-ish!\n   Semi-major axis = 2.50 AU\n   Perihelion = 2.00 AU\n   Eccentricity = 0.20\n   Period = 3.95 yr"
        );
    }
}
