//! # Photometry and visibility
//!
//! Apparent magnitude, phase angle, illuminated fraction and the visibility
//! classification reported with every position.
//!
//! Magnitudes follow Mallama & Hilton (2018), *Computing apparent planetary
//! magnitudes for The Astronomical Almanac*. Saturn includes the ring term and
//! Uranus its sub-latitude term, both driven by [`SubLatitudes`]. Each curve
//! is only trusted inside the phase-angle range it was fitted on; outside it,
//! and for Pluto which has no curve, [`planetary_magnitude`] reports
//! [`Unavailable`] and callers fall back to [`fallback_magnitude`].
use std::fmt;

use nalgebra::Vector3;
use serde::Serialize;

use crate::{
    celestial_errors::{BestEffort, Unavailable},
    constants::{AstronomicalUnit, Degree},
    geometry::round_to,
    planet::{Planet, DEFAULT_MIN_ELONGATION},
};

/// Ordered visibility states, evaluated top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Visibility {
    BelowHorizon,
    LostInSunlight,
    Visible,
}

impl Visibility {
    /// Classify from the reported altitude and elongation.
    ///
    /// `planet = None` applies the default 10° elongation threshold.
    pub fn classify(altitude: Degree, elongation: Degree, planet: Option<Planet>) -> Visibility {
        if altitude < 0.0 {
            return Visibility::BelowHorizon;
        }
        let min_elongation = planet.map_or(DEFAULT_MIN_ELONGATION, |p| p.min_elongation());
        if elongation < min_elongation {
            return Visibility::LostInSunlight;
        }
        Visibility::Visible
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Visibility::BelowHorizon => "BELOW_HORIZON",
            Visibility::LostInSunlight => "LOST_IN_SUNLIGHT",
            Visibility::Visible => "VISIBLE",
        };
        f.write_str(s)
    }
}

/// Sun–body–observer angle in degrees.
///
/// `to_observer` points from the body to the observer, `to_sun` from the body
/// to the Sun.
pub fn phase_angle(to_observer: &Vector3<f64>, to_sun: &Vector3<f64>) -> BestEffort<Degree> {
    let norms = to_observer.norm() * to_sun.norm();
    if !norms.is_finite() || norms == 0.0 {
        return Err(Unavailable::new(
            "phase angle",
            "degenerate body-observer or body-sun vector",
        ));
    }
    let cos_phase = (to_observer.dot(to_sun) / norms).clamp(-1.0, 1.0);
    Ok(cos_phase.acos().to_degrees())
}

/// Coarse phase angle from the solar elongation.
pub fn phase_angle_from_elongation(elongation: Degree) -> Degree {
    180.0 - elongation
}

/// Illuminated fraction of the disk in percent, 1 decimal.
pub fn illumination(phase_angle: Degree) -> f64 {
    round_to((1.0 + phase_angle.to_radians().cos()) / 2.0 * 100.0, 1)
}

/// Uranus flattening, for the planetocentric → planetographic conversion.
const URANUS_FLATTENING: f64 = 0.0229;

/// Largest ring tilt covered by the Saturn ring fit.
const SATURN_RING_TILT_LIMIT: Degree = 27.0;

/// ICRF right ascension and declination of the north pole, IAU 2015 (J2000).
fn north_pole(planet: Planet) -> Option<(Degree, Degree)> {
    match planet {
        Planet::Saturn => Some((40.589, 83.537)),
        Planet::Uranus => Some((257.311, -15.175)),
        _ => None,
    }
}

/// Planetocentric latitudes of the observer and of the Sun over a planet's
/// equator, degrees. For Saturn the equator is also the ring plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubLatitudes {
    pub observer: Degree,
    pub sun: Degree,
}

impl SubLatitudes {
    /// Sub-observer and sub-solar latitudes from the body → observer and
    /// body → Sun vectors, ICRF axes.
    ///
    /// `None` for planets without a modelled pole or for degenerate vectors.
    pub fn new(
        planet: Planet,
        to_observer: &Vector3<f64>,
        to_sun: &Vector3<f64>,
    ) -> Option<SubLatitudes> {
        let (ra, dec) = north_pole(planet)?;
        let (ra, dec) = (ra.to_radians(), dec.to_radians());
        let pole = Vector3::new(dec.cos() * ra.cos(), dec.cos() * ra.sin(), dec.sin());

        let latitude = |v: &Vector3<f64>| {
            let norm = v.norm();
            (norm.is_finite() && norm > 0.0)
                .then(|| (pole.dot(v) / norm).clamp(-1.0, 1.0).asin().to_degrees())
        };
        Some(SubLatitudes {
            observer: latitude(to_observer)?,
            sun: latitude(to_sun)?,
        })
    }

    /// Effective ring opening: the geometric mean of the two latitudes.
    ///
    /// `None` when the observer and the Sun are on opposite sides of the plane
    /// and only the unlit face of the rings is seen.
    pub fn ring_tilt(&self) -> Option<Degree> {
        let product = self.observer * self.sun;
        (product >= 0.0).then(|| product.sqrt())
    }

    /// Mean of the absolute planetographic latitudes, for Uranus.
    fn mean_planetographic(&self, flattening: f64) -> Degree {
        let graphic = |lat: Degree| {
            (lat.abs().to_radians().tan() / (1.0 - flattening).powi(2))
                .atan()
                .to_degrees()
        };
        (graphic(self.observer) + graphic(self.sun)) / 2.0
    }
}

/// Apparent visual magnitude from the Mallama & Hilton phase curves.
///
/// Arguments
/// -----------------
/// * `r`: Sun–planet distance in AU.
/// * `delta`: observer–planet distance in AU.
/// * `phase`: phase angle in degrees.
/// * `sub_latitudes`: observer and Sun latitudes over the planet's equator.
///   Saturn without them, or seen from the unlit side of its rings, uses the
///   globe-only curve; Uranus takes them as zero.
pub fn planetary_magnitude(
    planet: Planet,
    r: AstronomicalUnit,
    delta: AstronomicalUnit,
    phase: Degree,
    sub_latitudes: Option<SubLatitudes>,
) -> BestEffort<f64> {
    if !(r > 0.0 && delta > 0.0) {
        return Err(Unavailable::new("magnitude", "non-positive distance"));
    }
    if !(0.0..=180.0).contains(&phase) {
        return Err(Unavailable::new("magnitude", format!("phase angle {phase}")));
    }

    let out_of_range = || {
        Err(Unavailable::new(
            "magnitude",
            format!("phase angle {phase:.1}° outside the {planet} phase curve"),
        ))
    };

    let a = phase;
    let curve = match planet {
        Planet::Mercury => {
            -0.613
                + a * (6.3280e-02
                    + a * (-1.6336e-03
                        + a * (3.3644e-05
                            + a * (-3.4265e-07 + a * (1.6893e-09 + a * -3.0334e-12)))))
        }
        Planet::Venus if a < 163.7 => {
            -4.384 + a * (-1.044e-03 + a * (3.687e-04 + a * (-2.814e-06 + a * 8.938e-09)))
        }
        Planet::Venus if a <= 179.0 => 236.05828 + a * (-2.81914 + a * 8.39034e-03),
        Planet::Mars if a <= 50.0 => -1.601 + a * (0.02267 - a * 0.0001302),
        Planet::Mars if a <= 120.0 => -0.367 + a * (-0.02573 + a * 0.0003445),
        Planet::Jupiter if a <= 12.0 => -9.395 + a * (-3.7e-04 + a * 6.16e-04),
        Planet::Jupiter if a <= 130.0 => {
            let x = a / 180.0;
            let poly =
                1.0 + x * (-1.507 + x * (-0.363 + x * (-0.062 + x * (2.809 + x * -1.876))));
            -9.428 - 2.5 * poly.log10()
        }
        Planet::Saturn if a <= 6.5 => {
            match sub_latitudes.and_then(|lat| lat.ring_tilt()) {
                Some(tilt) if tilt <= SATURN_RING_TILT_LIMIT => {
                    let sin_tilt = tilt.to_radians().sin();
                    -8.914 - 1.825 * sin_tilt + 0.026 * a
                        - 0.378 * sin_tilt * (-2.25 * a).exp()
                }
                _ => -8.95 + a * (-3.7e-04 + a * 6.16e-04),
            }
        }
        Planet::Uranus if a <= 3.1 => {
            let latitude =
                sub_latitudes.map_or(0.0, |lat| lat.mean_planetographic(URANUS_FLATTENING));
            -7.110 - 8.4e-04 * latitude + a * (6.587e-03 + a * 1.045e-04)
        }
        Planet::Neptune if a <= 1.9 => -7.00 + a * (7.944e-03 + a * 9.617e-05),
        Planet::Pluto => {
            return Err(Unavailable::new("magnitude", "no phase curve for Pluto"));
        }
        _ => return out_of_range(),
    };

    let magnitude = curve + 5.0 * (r * delta).log10();
    if magnitude.is_finite() {
        Ok(magnitude)
    } else {
        out_of_range()
    }
}

/// Distance-only estimate `H + 5·log10(Δ·r)`, 1 decimal.
///
/// Returns `h` unchanged when either distance is not positive.
pub fn fallback_magnitude(h: f64, delta: AstronomicalUnit, r: AstronomicalUnit) -> f64 {
    if delta > 0.0 && r > 0.0 {
        round_to(h + 5.0 * (delta * r).log10(), 1)
    } else {
        h
    }
}

#[cfg(test)]
mod photometry_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_visibility_rules() {
        use Visibility::*;
        assert_eq!(Visibility::classify(-5.0, 90.0, Some(Planet::Mars)), BelowHorizon);
        assert_eq!(Visibility::classify(10.0, 3.0, Some(Planet::Mercury)), LostInSunlight);
        assert_eq!(Visibility::classify(20.0, 9.0, Some(Planet::Mercury)), LostInSunlight);
        assert_eq!(Visibility::classify(20.0, 11.0, Some(Planet::Mercury)), Visible);
        assert_eq!(Visibility::classify(20.0, 10.0, Some(Planet::Mercury)), Visible);
        assert_eq!(Visibility::classify(20.0, 6.0, Some(Planet::Venus)), Visible);
        assert_eq!(Visibility::classify(20.0, 9.9, None), LostInSunlight);
        // below the horizon wins over elongation
        assert_eq!(Visibility::classify(-0.01, 1.0, Some(Planet::Venus)), BelowHorizon);
        assert_eq!(Visibility::classify(0.0, 50.0, Some(Planet::Pluto)), Visible);
    }

    #[test]
    fn test_visibility_serialization() {
        assert_eq!(
            serde_json::to_string(&Visibility::LostInSunlight).unwrap(),
            "\"LOST_IN_SUNLIGHT\""
        );
        assert_eq!(Visibility::BelowHorizon.to_string(), "BELOW_HORIZON");
    }

    #[test]
    fn test_phase_angle() {
        let to_obs = Vector3::new(1.0, 0.0, 0.0);
        assert_relative_eq!(
            phase_angle(&to_obs, &Vector3::new(0.0, 3.0, 0.0)).unwrap(),
            90.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(phase_angle(&to_obs, &to_obs).unwrap(), 0.0);
        assert_relative_eq!(phase_angle(&to_obs, &(-to_obs)).unwrap(), 180.0);
        assert!(phase_angle(&Vector3::zeros(), &to_obs).is_err());
        assert!(phase_angle(&Vector3::new(f64::INFINITY, 0.0, 0.0), &to_obs).is_err());
        assert_eq!(phase_angle_from_elongation(40.0), 140.0);
    }

    #[test]
    fn test_illumination() {
        assert_eq!(illumination(0.0), 100.0);
        assert_eq!(illumination(180.0), 0.0);
        assert_eq!(illumination(90.0), 50.0);
        assert_eq!(illumination(60.0), 75.0);
    }

    #[test]
    fn test_planetary_magnitude_reference_values() {
        // Venus at quadrature-like geometry
        let venus = planetary_magnitude(Planet::Venus, 0.72, 1.0, 90.0, None).unwrap();
        assert_relative_eq!(venus, -3.670, epsilon = 0.002);

        // Jupiter at opposition, r = 4.95, Δ = 3.96
        let jupiter = planetary_magnitude(Planet::Jupiter, 4.95, 3.96, 0.0, None).unwrap();
        assert_relative_eq!(jupiter, -2.93, epsilon = 0.02);

        let mars = planetary_magnitude(Planet::Mars, 1.52, 0.52, 5.0, None).unwrap();
        assert_relative_eq!(mars, -2.002, epsilon = 0.002);
    }

    #[test]
    fn test_planetary_magnitude_unavailable() {
        assert!(planetary_magnitude(Planet::Pluto, 33.0, 32.0, 1.0, None).is_err());
        assert!(planetary_magnitude(Planet::Saturn, 9.5, 9.0, 7.0, None).is_err());
        assert!(planetary_magnitude(Planet::Neptune, 30.0, 29.0, 2.5, None).is_err());
        assert!(planetary_magnitude(Planet::Mars, 0.0, 1.0, 10.0, None).is_err());
        assert!(planetary_magnitude(Planet::Mercury, 0.4, 1.0, f64::NAN, None).is_err());
    }

    #[test]
    fn test_saturn_ring_term() {
        let open = SubLatitudes {
            observer: -26.0,
            sun: -26.0,
        };
        // opposition of 2003-12-31, rings near their widest: about -0.5
        let wide = planetary_magnitude(Planet::Saturn, 9.03, 8.05, 0.2, Some(open)).unwrap();
        assert_relative_eq!(wide, -0.507, epsilon = 0.002);

        // edge-on rings reduce to -8.914 + 0.026·α
        let edge_on = SubLatitudes {
            observer: 0.0,
            sun: 3.0,
        };
        let m = planetary_magnitude(Planet::Saturn, 10.0, 9.0, 2.0, Some(edge_on)).unwrap();
        assert_relative_eq!(m, -8.914 + 0.052 + 5.0 * 90f64.log10(), epsilon = 1e-9);

        // the rings make Saturn brighter than the bare globe
        let globe = planetary_magnitude(Planet::Saturn, 9.03, 8.05, 0.2, None).unwrap();
        assert!(wide < globe - 0.5);

        // unlit face of the rings: globe only
        let unlit = SubLatitudes {
            observer: 5.0,
            sun: -2.0,
        };
        assert_eq!(unlit.ring_tilt(), None);
        assert_eq!(
            planetary_magnitude(Planet::Saturn, 9.03, 8.05, 0.2, Some(unlit)).unwrap(),
            globe
        );
    }

    #[test]
    fn test_uranus_sub_latitude_term() {
        let flat = planetary_magnitude(Planet::Uranus, 19.6, 18.7, 1.0, None).unwrap();
        let polar = SubLatitudes {
            observer: -60.0,
            sun: 60.0,
        };
        let tilted = planetary_magnitude(Planet::Uranus, 19.6, 18.7, 1.0, Some(polar)).unwrap();
        // planetographic 61.1°, 8.4e-4 mag per degree
        assert_relative_eq!(flat - tilted, 8.4e-4 * 61.14, epsilon = 1e-4);
    }

    #[test]
    fn test_sub_latitudes() {
        let (ra, dec) = (40.589f64.to_radians(), 83.537f64.to_radians());
        let pole = Vector3::new(dec.cos() * ra.cos(), dec.cos() * ra.sin(), dec.sin());
        let equatorial = pole.cross(&Vector3::x()).normalize();

        let lat = SubLatitudes::new(Planet::Saturn, &(pole * 3.0), &equatorial).unwrap();
        assert_relative_eq!(lat.observer, 90.0, epsilon = 1e-9);
        assert_relative_eq!(lat.sun, 0.0, epsilon = 1e-9);
        assert_eq!(lat.ring_tilt(), Some(0.0));

        assert!(SubLatitudes::new(Planet::Jupiter, &pole, &pole).is_none());
        assert!(SubLatitudes::new(Planet::Saturn, &Vector3::zeros(), &pole).is_none());
    }

    #[test]
    fn test_fallback_magnitude() {
        assert_eq!(fallback_magnitude(-2.7, 1.0, 1.0), -2.7);
        assert_eq!(fallback_magnitude(-2.7, 4.2, 5.2), 4.0);
        assert_eq!(fallback_magnitude(13.6, 0.0, 33.0), 13.6);
        assert_eq!(fallback_magnitude(-1.6, 1.5, -1.0), -1.6);
    }
}
