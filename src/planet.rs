//! # Planets and ephemeris bodies
//!
//! [`Planet`] is the closed set of bodies the public operations accept. Each
//! planet carries the constants the photometry and visibility rules need, and
//! resolves to a [`Body`], the key understood by the ephemeris layer.
//!
//! | Planet  | Body (NAIF id)      | min. elongation | H     |
//! |---------|---------------------|-----------------|-------|
//! | Mercury | Mercury (199)       | 10°             | -0.6  |
//! | Venus   | Venus (299)         | 5°              | -4.4  |
//! | Mars    | Mars barycenter (4) | 5°              | -1.6  |
//! | Jupiter | barycenter (5)      | 5°              | -2.7  |
//! | Saturn  | barycenter (6)      | 5°              | -0.5  |
//! | Uranus  | barycenter (7)      | 10°             | 5.3   |
//! | Neptune | barycenter (8)      | 10°             | 7.8   |
//! | Pluto   | barycenter (9)      | 15°             | 13.6  |
use std::{fmt, str::FromStr};

use itertools::Itertools;
use serde::Serialize;

use crate::{celestial_errors::CelestialError, constants::Degree};

/// Minimum elongation applied to bodies without a dedicated threshold.
pub const DEFAULT_MIN_ELONGATION: Degree = 10.0;

/// Absolute magnitude applied to bodies without a dedicated constant.
pub const DEFAULT_ABSOLUTE_MAGNITUDE: f64 = 0.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Planet {
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
}

impl Planet {
    pub const ALL: [Planet; 8] = [
        Planet::Mercury,
        Planet::Venus,
        Planet::Mars,
        Planet::Jupiter,
        Planet::Saturn,
        Planet::Uranus,
        Planet::Neptune,
        Planet::Pluto,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Planet::Mercury => "Mercury",
            Planet::Venus => "Venus",
            Planet::Mars => "Mars",
            Planet::Jupiter => "Jupiter",
            Planet::Saturn => "Saturn",
            Planet::Uranus => "Uranus",
            Planet::Neptune => "Neptune",
            Planet::Pluto => "Pluto",
        }
    }

    /// Ephemeris body used for this planet.
    pub fn body(&self) -> Body {
        match self {
            Planet::Mercury => Body::Mercury,
            Planet::Venus => Body::Venus,
            Planet::Mars => Body::MarsBarycenter,
            Planet::Jupiter => Body::JupiterBarycenter,
            Planet::Saturn => Body::SaturnBarycenter,
            Planet::Uranus => Body::UranusBarycenter,
            Planet::Neptune => Body::NeptuneBarycenter,
            Planet::Pluto => Body::PlutoBarycenter,
        }
    }

    /// Smallest solar elongation at which the planet is considered observable.
    pub fn min_elongation(&self) -> Degree {
        match self {
            Planet::Mercury => 10.0,
            Planet::Venus => 5.0,
            Planet::Mars => 5.0,
            Planet::Jupiter => 5.0,
            Planet::Saturn => 5.0,
            Planet::Uranus => 10.0,
            Planet::Neptune => 10.0,
            Planet::Pluto => 15.0,
        }
    }

    /// Absolute magnitude used by the distance-only magnitude estimate.
    pub fn absolute_magnitude(&self) -> f64 {
        match self {
            Planet::Mercury => -0.6,
            Planet::Venus => -4.4,
            Planet::Mars => -1.6,
            Planet::Jupiter => -2.7,
            Planet::Saturn => -0.5,
            Planet::Uranus => 5.3,
            Planet::Neptune => 7.8,
            Planet::Pluto => 13.6,
        }
    }

    /// Comma separated list of accepted names.
    pub fn valid_names() -> String {
        Planet::ALL.iter().map(Planet::name).join(", ")
    }
}

impl FromStr for Planet {
    type Err = CelestialError;

    /// Case-insensitive lookup on the planet name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Planet::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CelestialError::UnknownPlanet {
                name: s.to_string(),
                valid: Planet::valid_names(),
            })
    }
}

impl fmt::Display for Planet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Bodies the ephemeris layer can be asked about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Body {
    Sun,
    Mercury,
    Venus,
    Earth,
    Moon,
    EarthMoonBarycenter,
    MarsBarycenter,
    JupiterBarycenter,
    SaturnBarycenter,
    UranusBarycenter,
    NeptuneBarycenter,
    PlutoBarycenter,
}

impl Body {
    pub fn naif_id(&self) -> i32 {
        match self {
            Body::Sun => 10,
            Body::Mercury => 199,
            Body::Venus => 299,
            Body::Earth => 399,
            Body::Moon => 301,
            Body::EarthMoonBarycenter => 3,
            Body::MarsBarycenter => 4,
            Body::JupiterBarycenter => 5,
            Body::SaturnBarycenter => 6,
            Body::UranusBarycenter => 7,
            Body::NeptuneBarycenter => 8,
            Body::PlutoBarycenter => 9,
        }
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Body::Sun => "Sun",
            Body::Mercury => "Mercury",
            Body::Venus => "Venus",
            Body::Earth => "Earth",
            Body::Moon => "Moon",
            Body::EarthMoonBarycenter => "Earth-Moon barycenter",
            Body::MarsBarycenter => "Mars barycenter",
            Body::JupiterBarycenter => "Jupiter barycenter",
            Body::SaturnBarycenter => "Saturn barycenter",
            Body::UranusBarycenter => "Uranus barycenter",
            Body::NeptuneBarycenter => "Neptune barycenter",
            Body::PlutoBarycenter => "Pluto barycenter",
        };
        write!(f, "{name} ({})", self.naif_id())
    }
}

#[cfg(test)]
mod test_planet {
    use super::*;

    #[test]
    fn test_parse_planet() {
        assert_eq!("Mars".parse::<Planet>().unwrap(), Planet::Mars);
        assert_eq!("  jupiter ".parse::<Planet>().unwrap(), Planet::Jupiter);
        assert_eq!("PLUTO".parse::<Planet>().unwrap(), Planet::Pluto);
    }

    #[test]
    fn test_unknown_planet_lists_all_names() {
        let err = "NotAPlanet".parse::<Planet>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unknown planet 'NotAPlanet'. Valid planets: Mercury, Venus, Mars, Jupiter, Saturn, Uranus, Neptune, Pluto"
        );
    }

    #[test]
    fn test_planet_constants() {
        for planet in Planet::ALL {
            assert!(planet.min_elongation() >= 5.0);
            assert_eq!(planet.name().parse::<Planet>().unwrap(), planet);
        }
        assert_eq!(Planet::Mercury.body().naif_id(), 199);
        assert_eq!(Planet::Venus.body().naif_id(), 299);
        assert_eq!(Planet::Saturn.body().naif_id(), 6);
        assert_eq!(Planet::Venus.absolute_magnitude(), -4.4);
        assert_eq!(Planet::Pluto.min_elongation(), 15.0);
    }

    #[test]
    fn test_body_display() {
        assert_eq!(Body::MarsBarycenter.to_string(), "Mars barycenter (4)");
        assert_eq!(Body::Sun.to_string(), "Sun (10)");
    }
}
