//! # Observer geometry
//!
//! Apparent positions of a body as seen from a ground site, and the derived
//! quantities reported by the position query: altitude/azimuth, right
//! ascension/declination, distance and solar elongation.
//!
//! ## Pipeline
//!
//! ```text
//! epoch (UTC) ──► EarthOrientation (GAST, N·P)
//!             └─► observer BCRS state = Earth + site
//!                     │
//!                     ▼
//!   light-time iteration on the body's barycentric position   → astrometric
//!                     │
//!                     ▼
//!   relativistic aberration with the observer's velocity      → apparent (GCRS axes)
//!                     │
//!       ┌─────────────┼──────────────────┐
//!       ▼             ▼                  ▼
//!   RA / Dec     true of date ─► Earth-fixed ─► east/north/up → alt / az, hour angle
//! ```
//!
//! Gravitational light deflection and atmospheric refraction are not applied:
//! both stay far below the 0.01° resolution of the reported angles for planets
//! away from the solar limb. Refraction at the horizon is accounted for by the
//! event search through its horizon altitude instead.
use hifitime::{Epoch, Unit};
use nalgebra::Vector3;

use crate::{
    celestial_errors::CelestialError,
    constants::{Degree, LIGHT_TIME_ITERATIONS, VLIGHT},
    env_state::CelestialEnv,
    jpl_ephem::{EphemState, Ephemeris},
    observers::{observer_position::EarthOrientation, ObserverLocation},
    planet::Body,
    ref_system::{angle_between, cartesian_to_radec, wrap_pi},
};

/// A body seen from an observer at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sighting {
    /// Observer → body at emission time, km, GCRS axes.
    pub astrometric: Vector3<f64>,
    /// `astrometric` corrected for aberration, km, GCRS axes.
    pub apparent: Vector3<f64>,
    /// Barycentric position of the body at emission time, km.
    pub body_position: Vector3<f64>,
    /// One-way light time, seconds.
    pub light_time: f64,
}

/// Topocentric horizontal coordinates, degrees.
///
/// Azimuth is measured from north through east, in `[0, 360)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Horizontal {
    pub altitude: Degree,
    pub azimuth: Degree,
}

/// Observer state at one epoch: Earth orientation and barycentric position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverSnapshot {
    pub epoch: Epoch,
    pub orientation: EarthOrientation,
    pub observer: EphemState,
}

/// Everything needed to look at the sky from one site.
#[derive(Debug, Clone, Copy)]
pub struct Observatory<'a> {
    pub ephemeris: &'a dyn Ephemeris,
    pub env: &'a CelestialEnv,
    pub site: &'a ObserverLocation,
}

impl<'a> Observatory<'a> {
    pub fn new(
        ephemeris: &'a dyn Ephemeris,
        env: &'a CelestialEnv,
        site: &'a ObserverLocation,
    ) -> Self {
        Observatory {
            ephemeris,
            env,
            site,
        }
    }

    /// Orientation and observer state at `epoch`.
    pub fn snapshot(&self, epoch: Epoch) -> Result<ObserverSnapshot, CelestialError> {
        let orientation = EarthOrientation::at(&epoch, self.env);
        let observer = self
            .site
            .barycentric_state(self.ephemeris, &epoch, &orientation)?;
        Ok(ObserverSnapshot {
            epoch,
            orientation,
            observer,
        })
    }

    /// Astrometric and apparent position of `body` from this site.
    pub fn observe(
        &self,
        snapshot: &ObserverSnapshot,
        body: Body,
    ) -> Result<Sighting, CelestialError> {
        let (astrometric, body_position, light_time) = light_time_correction(
            self.ephemeris,
            body,
            &snapshot.observer.position,
            &snapshot.epoch,
        )?;
        let apparent = add_aberration(&astrometric, &snapshot.observer.velocity, light_time);
        Ok(Sighting {
            astrometric,
            apparent,
            body_position,
            light_time,
        })
    }

    /// Horizontal coordinates of an apparent GCRS direction.
    pub fn horizontal(&self, snapshot: &ObserverSnapshot, apparent: &Vector3<f64>) -> Horizontal {
        let fixed = snapshot.orientation.celestial_to_fixed() * apparent;
        let (east, north, up) = self.site.enu_basis();

        let norm = fixed.norm();
        if norm == 0.0 {
            return Horizontal {
                altitude: 0.0,
                azimuth: 0.0,
            };
        }
        let altitude = (fixed.dot(&up) / norm).clamp(-1.0, 1.0).asin().to_degrees();
        let azimuth = fixed
            .dot(&east)
            .atan2(fixed.dot(&north))
            .to_degrees()
            .rem_euclid(360.0);
        Horizontal { altitude, azimuth }
    }

    /// Local hour angle of an apparent GCRS direction, degrees in `(-180, 180]`.
    ///
    /// Negative east of the meridian, zero at upper transit.
    pub fn hour_angle(&self, snapshot: &ObserverSnapshot, apparent: &Vector3<f64>) -> Degree {
        let fixed = snapshot.orientation.celestial_to_fixed() * apparent;
        let body_longitude = fixed.y.atan2(fixed.x);
        wrap_pi(self.site.longitude.to_radians() - body_longitude).to_degrees()
    }

    /// Apparent altitude of `body` at `epoch`, degrees.
    pub fn altitude(&self, body: Body, epoch: Epoch) -> Result<Degree, CelestialError> {
        let snapshot = self.snapshot(epoch)?;
        let sighting = self.observe(&snapshot, body)?;
        Ok(self.horizontal(&snapshot, &sighting.apparent).altitude)
    }

    /// Apparent local hour angle of `body` at `epoch`, degrees.
    pub fn body_hour_angle(&self, body: Body, epoch: Epoch) -> Result<Degree, CelestialError> {
        let snapshot = self.snapshot(epoch)?;
        let sighting = self.observe(&snapshot, body)?;
        Ok(self.hour_angle(&snapshot, &sighting.apparent))
    }
}

/// Iterate the light-time equation `τ = |x_body(t - τ) - x_obs(t)| / c`.
///
/// Returns the observer → body vector, the body's barycentric position at
/// emission and the light time in seconds.
pub fn light_time_correction(
    ephemeris: &dyn Ephemeris,
    body: Body,
    observer_position: &Vector3<f64>,
    epoch: &Epoch,
) -> Result<(Vector3<f64>, Vector3<f64>, f64), CelestialError> {
    let mut body_position = ephemeris.barycentric_state(body, epoch)?.position;
    let mut relative = body_position - observer_position;
    let mut light_time = relative.norm() / VLIGHT;

    for _ in 0..LIGHT_TIME_ITERATIONS {
        let emission = *epoch - Unit::Second * light_time;
        body_position = ephemeris.barycentric_state(body, &emission)?.position;
        relative = body_position - observer_position;
        light_time = relative.norm() / VLIGHT;
    }
    Ok((relative, body_position, light_time))
}

/// Apparent position of `body` seen from the geocenter, km, GCRS axes.
pub fn geocentric_apparent(
    ephemeris: &dyn Ephemeris,
    body: Body,
    epoch: &Epoch,
) -> Result<Vector3<f64>, CelestialError> {
    let earth = ephemeris.barycentric_state(Body::Earth, epoch)?;
    let (astrometric, _, light_time) =
        light_time_correction(ephemeris, body, &earth.position, epoch)?;
    Ok(add_aberration(&astrometric, &earth.velocity, light_time))
}

/// Apply aberration with the relativistic velocity-addition formula.
///
/// `position` is the astrometric vector (km), `velocity` the observer's
/// barycentric velocity (km/s) and `light_time` the light time (s).
pub fn add_aberration(
    position: &Vector3<f64>,
    velocity: &Vector3<f64>,
    light_time: f64,
) -> Vector3<f64> {
    let p1mag = light_time * VLIGHT;
    let vemag = velocity.norm();
    if p1mag == 0.0 || vemag == 0.0 {
        return *position;
    }

    let beta = vemag / VLIGHT;
    let cosd = position.dot(velocity) / (p1mag * vemag);
    let gammai = (1.0 - beta * beta).sqrt();
    let p = beta * cosd;
    let q = (1.0 + p / (1.0 + gammai)) * light_time;
    let r = 1.0 + p;

    (gammai * position + q * velocity) / r
}

/// Right ascension (hours, `[0, 24)`) and declination (degrees) of a vector.
pub fn equatorial(apparent: &Vector3<f64>) -> (f64, Degree) {
    let (alpha, delta, _) = cartesian_to_radec(*apparent);
    (alpha.to_degrees() / 15.0, delta.to_degrees())
}

/// Angular separation between two directions, degrees.
pub fn separation(a: &Vector3<f64>, b: &Vector3<f64>) -> Degree {
    angle_between(a, b).to_degrees()
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Azimuth rounded to 2 decimals, kept inside `[0, 360)`.
pub fn round_azimuth(azimuth: Degree) -> Degree {
    let rounded = round_to(azimuth, 2);
    if rounded >= 360.0 {
        rounded - 360.0
    } else {
        rounded
    }
}

/// Split a non-negative quantity into whole units, whole sixtieths and tenths
/// of the second sixtieth, rounding to the nearest tenth.
fn sexagesimal(value: f64, modulus: Option<u64>) -> (u64, u64, f64) {
    let mut tenths = (value * 36_000.0).round() as u64;
    if let Some(modulus) = modulus {
        tenths %= modulus * 36_000;
    }
    let units = tenths / 36_000;
    let minutes = (tenths % 36_000) / 600;
    let seconds = (tenths % 600) as f64 / 10.0;
    (units, minutes, seconds)
}

/// Format right ascension hours as `HH:MM:SS.s`.
pub fn format_ra(ra_hours: f64) -> String {
    let (h, m, s) = sexagesimal(ra_hours.rem_euclid(24.0), Some(24));
    format!("{h:02}:{m:02}:{s:04.1}")
}

/// Format declination degrees as `±DD:MM:SS.s`.
pub fn format_dec(dec_deg: Degree) -> String {
    let sign = if dec_deg >= 0.0 { '+' } else { '-' };
    let (d, m, s) = sexagesimal(dec_deg.abs(), None);
    format!("{sign}{d:02}:{m:02}:{s:04.1}")
}
