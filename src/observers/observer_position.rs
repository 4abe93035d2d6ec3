//! Geocentric and barycentric states of an observing site.
//!
//! The Earth-fixed site vector is carried to the GCRS by undoing Earth
//! rotation (GAST, IAU 1982 + equation of the equinoxes), then nutation
//! (IAU 1980) and precession (IAU 1976). Polar motion and the frame bias are
//! neglected. Adding the Earth's barycentric state from the ephemeris gives
//! the site in the BCRS, which is the origin used for light-time and
//! aberration.
use hifitime::Epoch;
use nalgebra::{Matrix3, Vector3};

use crate::{
    celestial_errors::CelestialError,
    constants::SECONDS_PER_DAY,
    earth_orientation::{celestial_to_true_of_date, earth_rotation_matrix, gast},
    env_state::CelestialEnv,
    jpl_ephem::{EphemState, Ephemeris},
    planet::Body,
};

use super::ObserverLocation;

/// Earth orientation at one instant.
///
/// Holds the rotation matrices shared by every vector transformed at that
/// epoch, so an event search evaluating many directions at the same time only
/// builds them once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EarthOrientation {
    /// GCRS → true equator and equinox of date.
    pub celestial_to_tod: Matrix3<f64>,
    /// True equator of date → Earth-fixed.
    pub tod_to_fixed: Matrix3<f64>,
    /// Greenwich apparent sidereal time, radians.
    pub gast: f64,
}

impl EarthOrientation {
    pub fn at(epoch: &Epoch, env: &CelestialEnv) -> Self {
        let mjd_tt = epoch.to_mjd_tt_days();
        let gast = gast(env.mjd_ut1(epoch), mjd_tt);
        EarthOrientation {
            celestial_to_tod: celestial_to_true_of_date(mjd_tt),
            tod_to_fixed: earth_rotation_matrix(gast),
            gast,
        }
    }

    /// GCRS → Earth-fixed.
    pub fn celestial_to_fixed(&self) -> Matrix3<f64> {
        self.tod_to_fixed * self.celestial_to_tod
    }
}

impl ObserverLocation {
    /// Geocentric position (km) and velocity (km/s) of the site in GCRS axes.
    ///
    /// The velocity only accounts for Earth rotation (`ω × r`), which is what
    /// diurnal aberration needs.
    pub fn geocentric_state(&self, orientation: &EarthOrientation) -> (Vector3<f64>, Vector3<f64>) {
        let fixed_to_celestial = orientation.celestial_to_fixed().transpose();

        let dx = fixed_to_celestial * self.body_fixed_coord();
        let dv = fixed_to_celestial * self.body_fixed_velocity() / SECONDS_PER_DAY;
        (dx, dv)
    }

    /// Barycentric state of the site: Earth's barycentric state plus the
    /// geocentric offset.
    ///
    /// Errors
    /// ----------
    /// * Whatever the ephemeris returns for [`Body::Earth`] (coverage, I/O).
    pub fn barycentric_state(
        &self,
        ephemeris: &dyn Ephemeris,
        epoch: &Epoch,
        orientation: &EarthOrientation,
    ) -> Result<EphemState, CelestialError> {
        let earth = ephemeris.barycentric_state(Body::Earth, epoch)?;
        let (dx, dv) = self.geocentric_state(orientation);
        Ok(EphemState {
            position: earth.position + dx,
            velocity: earth.velocity + dv,
        })
    }
}
