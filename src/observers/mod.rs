//! # Observer sites
//!
//! An [`ObserverLocation`] is a point on the reference ellipsoid given by its
//! geodetic latitude, longitude and height. On construction the site is
//! reduced to geocentric parallax constants `(ρ·cosφ', ρ·sinφ')` and to a
//! precomputed Earth-fixed position and rotation velocity, the same way ground
//! stations are handled in classical orbit determination codes.
//!
//! ## Frames & conventions
//!
//! ```text
//! Earth-fixed --R3(GAST)ᵀ--> true equator of date --(N·P)ᵀ--> GCRS --(+ Earth)--> BCRS
//! ```
//!
//! - Longitudes: **degrees**, east positive.
//! - Geodetic latitude: **degrees**, north positive.
//! - Height above the ellipsoid: **meters**.
//! - Positions: **km**; velocities: **km/s** once rotated out of the Earth-fixed frame.
//!
//! Out-of-range latitudes and longitudes are accepted: the trigonometry stays
//! finite for any finite input, only NaN is rejected.
//!
//! ## See also
//! * [`observer_position`] – geocentric and barycentric states of a site at an epoch.
//! * [`crate::earth_orientation`] – GAST, nutation and precession matrices.
use nalgebra::Vector3;
use ordered_float::NotNan;

use crate::{
    celestial_errors::CelestialError,
    constants::{Degree, Meter, DPI, EARTH_MAJOR_AXIS, EARTH_MINOR_AXIS, EARTH_RADIUS_KM, SIDEREAL_RATE},
};

pub mod observer_position;

/// A ground-based observing site.
///
/// Stores the geodetic inputs alongside the geocentric parallax constants and
/// the Earth-fixed state they imply.
///
/// Units
/// -----
/// * `latitude`, `longitude`: degrees.
/// * `height_m`: meters.
/// * `rho_cos_phi`, `rho_sin_phi`: Earth equatorial radii.
/// * `fixed_position`: km, Earth-fixed frame.
/// * `fixed_velocity`: km/day, Earth-fixed frame (`ω × r`).
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct ObserverLocation {
    /// Geodetic latitude in **degrees**.
    pub latitude: NotNan<f64>,

    /// Longitude in **degrees** east of Greenwich.
    pub longitude: NotNan<f64>,

    /// Height above the reference ellipsoid in **meters**.
    pub height_m: NotNan<f64>,

    /// ρ·cosφ' (geocentric latitude φ'), in Earth radii.
    pub rho_cos_phi: NotNan<f64>,

    /// ρ·sinφ' (geocentric latitude φ'), in Earth radii.
    pub rho_sin_phi: NotNan<f64>,

    fixed_position: Vector3<NotNan<f64>>,

    fixed_velocity: Vector3<NotNan<f64>>,
}

impl ObserverLocation {
    /// Build a site from geodetic coordinates.
    ///
    /// Arguments
    /// -----------------
    /// * `latitude`: geodetic latitude in **degrees**.
    /// * `longitude`: longitude in **degrees** (east positive).
    /// * `height_m`: height above the ellipsoid in **meters**.
    ///
    /// Errors
    /// ----------
    /// * [`CelestialError::MalformedInput`] if any coordinate is NaN.
    pub fn new(
        latitude: Degree,
        longitude: Degree,
        height_m: Meter,
    ) -> Result<ObserverLocation, CelestialError> {
        let (rho_cos_phi, rho_sin_phi) = geodetic_to_parallax(latitude, height_m);

        // Earth rotation vector, rad/day, along the body-fixed z axis
        let omega: Vector3<NotNan<f64>> = Vector3::new(
            NotNan::new(0.0)?,
            NotNan::new(0.0)?,
            NotNan::new(DPI * SIDEREAL_RATE)?,
        );

        let lon_radians = longitude.to_radians();
        let fixed_position: Vector3<NotNan<f64>> = Vector3::new(
            NotNan::new(EARTH_RADIUS_KM * rho_cos_phi * lon_radians.cos())?,
            NotNan::new(EARTH_RADIUS_KM * rho_cos_phi * lon_radians.sin())?,
            NotNan::new(EARTH_RADIUS_KM * rho_sin_phi)?,
        );

        let fixed_velocity = omega.cross(&fixed_position);

        Ok(ObserverLocation {
            latitude: NotNan::new(latitude)?,
            longitude: NotNan::new(longitude)?,
            height_m: NotNan::new(height_m)?,
            rho_cos_phi: NotNan::new(rho_cos_phi)?,
            rho_sin_phi: NotNan::new(rho_sin_phi)?,
            fixed_position,
            fixed_velocity,
        })
    }

    /// Site at sea level.
    pub fn at_sea_level(latitude: Degree, longitude: Degree) -> Result<Self, CelestialError> {
        ObserverLocation::new(latitude, longitude, 0.0)
    }

    /// Earth-fixed position of the site in **km**.
    pub fn body_fixed_coord(&self) -> Vector3<f64> {
        self.fixed_position.map(|x| x.into_inner())
    }

    /// Earth-fixed velocity of the site due to Earth rotation, in **km/day**.
    pub fn body_fixed_velocity(&self) -> Vector3<f64> {
        self.fixed_velocity.map(|x| x.into_inner())
    }

    /// Local east / north / up unit vectors expressed in the Earth-fixed frame.
    ///
    /// Built on the geodetic latitude, so "up" is the ellipsoid normal.
    pub fn enu_basis(&self) -> (Vector3<f64>, Vector3<f64>, Vector3<f64>) {
        let (sin_lat, cos_lat) = self.latitude.to_radians().sin_cos();
        let (sin_lon, cos_lon) = self.longitude.to_radians().sin_cos();

        let east = Vector3::new(-sin_lon, cos_lon, 0.0);
        let north = Vector3::new(-sin_lat * cos_lon, -sin_lat * sin_lon, cos_lat);
        let up = Vector3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat);
        (east, north, up)
    }
}

/// Convert geodetic latitude (radians) and height (meters) into normalized
/// geocentric parallax coordinates `(ρ·cosφ', ρ·sinφ')`.
///
/// ```text
/// u        = atan2(sinφ · b/a, cosφ)
/// ρ·sinφ'  = (b/a)·sin(u) + (h/a)·sinφ
/// ρ·cosφ'  = cos(u)       + (h/a)·cosφ
/// ```
///
/// where `a` and `b` are the Earth's semi-major and semi-minor axes.
pub fn lat_alt_to_parallax(lat: f64, height: Meter) -> (f64, f64) {
    let axis_ratio = EARTH_MINOR_AXIS / EARTH_MAJOR_AXIS;

    // parametric latitude
    let u = (lat.sin() * axis_ratio).atan2(lat.cos());

    let rho_sin_phi = axis_ratio * u.sin() + (height / EARTH_MAJOR_AXIS) * lat.sin();
    let rho_cos_phi = u.cos() + (height / EARTH_MAJOR_AXIS) * lat.cos();

    (rho_cos_phi, rho_sin_phi)
}

/// Degree-input wrapper around [`lat_alt_to_parallax`].
pub fn geodetic_to_parallax(lat: Degree, height: Meter) -> (f64, f64) {
    lat_alt_to_parallax(lat.to_radians(), height)
}
