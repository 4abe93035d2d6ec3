#![allow(dead_code)]

use std::{collections::HashMap, sync::Arc};

use approx::assert_abs_diff_eq;
use celestial::{
    celestial::Celestial,
    celestial_errors::CelestialError,
    config::CelestialConfig,
    constants::AU,
    jpl_ephem::{EphemState, Ephemeris},
    models::PlanetPositionData,
    planet::Body,
};
use hifitime::Epoch;
use nalgebra::Vector3;

pub const PARIS: (f64, f64) = (48.8566, 2.3522);
pub const SANTIAGO: (f64, f64) = (-33.4489, -70.6693);

/// Context on the analytical ephemeris: no kernel, no network.
pub fn standish_celestial() -> Celestial {
    Celestial::new(
        CelestialConfig::default()
            .with_ephemeris("standish")
            .with_auto_download(false),
    )
}

/// Bodies frozen at fixed barycentric positions (in AU), zero velocity.
///
/// Bodies left out are reported as not covered.
#[derive(Debug, Clone, Default)]
pub struct FrozenEphemeris {
    positions: HashMap<Body, Vector3<f64>>,
}

impl FrozenEphemeris {
    pub fn with(mut self, body: Body, position_au: Vector3<f64>) -> Self {
        self.positions.insert(body, position_au * AU);
        self
    }

    pub fn into_celestial(self) -> Celestial {
        Celestial::with_ephemeris(
            CelestialConfig::default().with_auto_download(false),
            Arc::new(self),
        )
    }
}

impl Ephemeris for FrozenEphemeris {
    fn name(&self) -> String {
        "frozen".into()
    }

    fn barycentric_state(&self, body: Body, _epoch: &Epoch) -> Result<EphemState, CelestialError> {
        self.positions
            .get(&body)
            .map(|position| EphemState {
                position: *position,
                velocity: Vector3::zeros(),
            })
            .ok_or_else(|| CelestialError::BodyNotCovered {
                body: body.to_string(),
                dataset: self.name(),
            })
    }
}

/// Geometric fields of two position results agree to their reported precision.
pub fn assert_same_sky(a: &PlanetPositionData, b: &PlanetPositionData) {
    assert_abs_diff_eq!(a.altitude, b.altitude, epsilon = 0.011);
    assert_abs_diff_eq!(a.azimuth, b.azimuth, epsilon = 0.011);
    assert_abs_diff_eq!(a.distance_au, b.distance_au, epsilon = 2e-6);
    assert_eq!(a.right_ascension, b.right_ascension);
    assert_eq!(a.declination, b.declination);
    assert_eq!(a.elongation, b.elongation);
}

/// Parse `HH:MM:SS.s` / `±DD:MM:SS.s` into decimal units.
pub fn sexagesimal(value: &str) -> f64 {
    let (sign, digits) = match value.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, value.trim_start_matches('+')),
    };
    let parts: Vec<f64> = digits.split(':').map(|p| p.parse().unwrap()).collect();
    sign * (parts[0] + parts[1] / 60.0 + parts[2] / 3600.0)
}
