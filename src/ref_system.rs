//! # Reference systems
//!
//! Frame bookkeeping for the three equatorial/ecliptic systems used by the
//! engine, with [`rotpn`] producing the passive rotation between any two of
//! them. The J2000 mean equator is the hub: every conversion goes source →
//! J2000 equatorial → target.
//!
//! Also hosts the small vector helpers shared by geometry and photometry
//! (spherical coordinates, angular separation).
use nalgebra::{Matrix3, Rotation3, Vector3};

use crate::{
    constants::{Radian, DPI, MJD, T2000},
    earth_orientation::{nutation_matrix, obleq, precession_matrix},
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RefEpoch {
    J2000,
    Epoch(MJD),
}

impl RefEpoch {
    pub fn date(&self) -> MJD {
        match *self {
            RefEpoch::J2000 => T2000,
            RefEpoch::Epoch(d) => d,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RefSystem {
    /// Mean equator and equinox at the epoch (precession only).
    Equm(RefEpoch),
    /// True equator and equinox at the epoch (precession and nutation).
    Equt(RefEpoch),
    /// Mean ecliptic and equinox at the epoch.
    Eclm(RefEpoch),
}

impl RefSystem {
    pub fn epoch(&self) -> RefEpoch {
        match *self {
            RefSystem::Equm(e) | RefSystem::Equt(e) | RefSystem::Eclm(e) => e,
        }
    }

    /// Passive rotation from this system to the J2000 mean equator.
    fn to_equm_j2000(self) -> Matrix3<f64> {
        let date = self.epoch().date();
        let prec_to_j2000 = match self.epoch() {
            RefEpoch::J2000 => Matrix3::identity(),
            RefEpoch::Epoch(_) => precession_matrix(date).transpose(),
        };
        match self {
            RefSystem::Equm(_) => prec_to_j2000,
            RefSystem::Equt(_) => prec_to_j2000 * nutation_matrix(date).transpose(),
            RefSystem::Eclm(_) => prec_to_j2000 * rotmt(obleq(date), 0),
        }
    }
}

/// Rotation matrix between two reference systems: `x₂ = rotpn(s1, s2) · x₁`.
///
/// # See also
/// * [`precession_matrix`] – IAU 1976 precession
/// * [`nutation_matrix`] – IAU 1980 nutation
/// * [`obleq`] – mean obliquity used for the ecliptic systems
pub fn rotpn(ref_sys1: &RefSystem, ref_sys2: &RefSystem) -> Matrix3<f64> {
    if ref_sys1 == ref_sys2 {
        return Matrix3::identity();
    }
    ref_sys2.to_equm_j2000().transpose() * ref_sys1.to_equm_j2000()
}

/// Active rotation matrix of angle `alpha` around the axis `k` (0 = X, 1 = Y, 2 = Z).
///
/// A passive (frame) rotation of angle `θ` is `rotmt(-θ, k)`.
pub fn rotmt(alpha: f64, k: usize) -> Matrix3<f64> {
    let axis = match k {
        0 => Vector3::x_axis(),
        1 => Vector3::y_axis(),
        2 => Vector3::z_axis(),
        _ => panic!("**** ROTMT: invalid axis index {k} (must be 0,1,2) ****"),
    };

    Rotation3::from_axis_angle(&axis, alpha).into()
}

/// Convert a Cartesian vector into `(longitude, latitude, norm)`.
///
/// In an equatorial frame this is `(α, δ, ρ)`; in an ecliptic frame `(λ, β, ρ)`.
/// The longitude is in `[0, 2π)`; a zero vector yields `(0, 0, 0)`.
pub fn cartesian_to_radec(cartesian_position: Vector3<f64>) -> (Radian, Radian, f64) {
    let pos_norm = cartesian_position.norm();
    if pos_norm == 0. {
        return (0.0, 0.0, pos_norm);
    }

    let delta = (cartesian_position.z / pos_norm).clamp(-1.0, 1.0).asin();
    let alpha = cartesian_position
        .y
        .atan2(cartesian_position.x)
        .rem_euclid(DPI);
    (alpha, delta, pos_norm)
}

/// Angle between two vectors in radians, in `[0, π]`.
///
/// Uses `atan2(|a×b|, a·b)`, accurate at both small and large separations.
pub fn angle_between(a: &Vector3<f64>, b: &Vector3<f64>) -> Radian {
    a.cross(b).norm().atan2(a.dot(b))
}

/// Wrap an angle into `(-π, π]`.
pub fn wrap_pi(angle: Radian) -> Radian {
    let wrapped = angle.rem_euclid(DPI);
    if wrapped > std::f64::consts::PI {
        wrapped - DPI
    } else {
        wrapped
    }
}
