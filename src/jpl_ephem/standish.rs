//! Analytical planetary ephemeris from JPL's approximate Keplerian elements.
//!
//! Mean elements and their secular rates (E. M. Standish, *Keplerian Elements
//! for Approximate Positions of the Major Planets*, Table 1, valid 1800–2050)
//! give heliocentric positions accurate to a few arcminutes for the inner
//! planets, which is enough for rise/set times and visibility classification
//! without downloading a kernel.
//!
//! The table is heliocentric, so the Sun is placed at the barycenter. Earth is
//! approximated by the Earth–Moon barycenter and the Moon is not covered.
//! Velocities come from a central finite difference of the positions.
use hifitime::Epoch;
use nalgebra::Vector3;
use roots::{find_root_newton_raphson, SimpleConvergency};

use crate::{
    celestial_errors::CelestialError,
    constants::{AU, DPI, RADEG, SECONDS_PER_DAY, T2000},
    earth_orientation::obleq,
    planet::Body,
    ref_system::rotmt,
};

use super::{EphemState, Ephemeris};

/// Elements at J2000 and rates per Julian century:
/// `[a (AU), e, I (deg), L (deg), ϖ (deg), Ω (deg)]`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct MeanElements {
    at_j2000: [f64; 6],
    per_century: [f64; 6],
}

const MERCURY: MeanElements = MeanElements {
    at_j2000: [0.38709927, 0.20563593, 7.00497902, 252.25032350, 77.45779628, 48.33076593],
    per_century: [0.00000037, 0.00001906, -0.00594749, 149472.67411175, 0.16047689, -0.12534081],
};
const VENUS: MeanElements = MeanElements {
    at_j2000: [0.72333566, 0.00677672, 3.39467605, 181.97909950, 131.60246718, 76.67984255],
    per_century: [0.00000390, -0.00004107, -0.00078890, 58517.81538729, 0.00268329, -0.27769418],
};
const EM_BARY: MeanElements = MeanElements {
    at_j2000: [1.00000261, 0.01671123, -0.00001531, 100.46457166, 102.93768193, 0.0],
    per_century: [0.00000562, -0.00004392, -0.01294668, 35999.37244981, 0.32327364, 0.0],
};
const MARS: MeanElements = MeanElements {
    at_j2000: [1.52371034, 0.09339410, 1.84969142, -4.55343205, -23.94362959, 49.55953891],
    per_century: [0.00001847, 0.00007882, -0.00813131, 19140.30268499, 0.44441088, -0.29257343],
};
const JUPITER: MeanElements = MeanElements {
    at_j2000: [5.20288700, 0.04838624, 1.30439695, 34.39644051, 14.72847983, 100.47390909],
    per_century: [-0.00011607, -0.00013253, -0.00183714, 3034.74612775, 0.21252668, 0.20469106],
};
const SATURN: MeanElements = MeanElements {
    at_j2000: [9.53667594, 0.05386179, 2.48599187, 49.95424423, 92.59887831, 113.66242448],
    per_century: [-0.00125060, -0.00050991, 0.00193609, 1222.49362201, -0.41897216, -0.28867794],
};
const URANUS: MeanElements = MeanElements {
    at_j2000: [19.18916464, 0.04725744, 0.77263783, 313.23810451, 170.95427630, 74.01692503],
    per_century: [-0.00196176, -0.00004397, -0.00242939, 428.48202785, 0.40805281, 0.04240589],
};
const NEPTUNE: MeanElements = MeanElements {
    at_j2000: [30.06992276, 0.00859048, 1.77004347, -55.12002969, 44.96476227, 131.78422574],
    per_century: [0.00026291, 0.00005105, 0.00035372, 218.45945325, -0.32241464, -0.00508664],
};
const PLUTO: MeanElements = MeanElements {
    at_j2000: [39.48211675, 0.24882730, 17.14001206, 238.92903833, 224.06891629, 110.30393684],
    per_century: [-0.00031596, 0.00005170, 0.00004818, 145.20780515, -0.04062942, -0.01183482],
};

/// Half step of the finite difference used for velocities, in seconds.
const VELOCITY_HALF_STEP: f64 = 600.0;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StandishEphemeris;

fn solve_kepler(mean_anomaly: f64, ecc: f64) -> Result<f64, CelestialError> {
    let f = |ea: f64| ea - ecc * ea.sin() - mean_anomaly;
    let df = |ea: f64| 1.0 - ecc * ea.cos();

    let mut tol = SimpleConvergency {
        eps: 1e-13,
        max_iter: 30,
    };
    let x0 = if ecc > 0.8 { std::f64::consts::PI } else { mean_anomaly };
    Ok(find_root_newton_raphson(x0, &f, &df, &mut tol)?)
}

impl MeanElements {
    /// Heliocentric position in the J2000 ecliptic frame (AU).
    fn heliocentric_ecliptic(&self, centuries: f64) -> Result<Vector3<f64>, CelestialError> {
        let el: Vec<f64> = self
            .at_j2000
            .iter()
            .zip(self.per_century.iter())
            .map(|(x0, rate)| x0 + rate * centuries)
            .collect();
        let (a, e) = (el[0], el[1]);
        let (incl, mean_lon, lon_peri, node) =
            (el[2] * RADEG, el[3] * RADEG, el[4] * RADEG, el[5] * RADEG);

        let arg_peri = lon_peri - node;
        let mean_anomaly = (mean_lon - lon_peri + std::f64::consts::PI).rem_euclid(DPI)
            - std::f64::consts::PI;
        let ecc_anomaly = solve_kepler(mean_anomaly, e)?;

        // position in the orbital plane, x towards perihelion
        let orbital = Vector3::new(
            a * (ecc_anomaly.cos() - e),
            a * (1.0 - e * e).sqrt() * ecc_anomaly.sin(),
            0.0,
        );

        Ok(rotmt(node, 2) * rotmt(incl, 0) * rotmt(arg_peri, 2) * orbital)
    }
}

impl StandishEphemeris {
    fn elements(body: Body) -> Result<Option<MeanElements>, CelestialError> {
        match body {
            Body::Sun => Ok(None),
            Body::Mercury => Ok(Some(MERCURY)),
            Body::Venus => Ok(Some(VENUS)),
            Body::Earth | Body::EarthMoonBarycenter => Ok(Some(EM_BARY)),
            Body::MarsBarycenter => Ok(Some(MARS)),
            Body::JupiterBarycenter => Ok(Some(JUPITER)),
            Body::SaturnBarycenter => Ok(Some(SATURN)),
            Body::UranusBarycenter => Ok(Some(URANUS)),
            Body::NeptuneBarycenter => Ok(Some(NEPTUNE)),
            Body::PlutoBarycenter => Ok(Some(PLUTO)),
            Body::Moon => Err(CelestialError::BodyNotCovered {
                body: body.to_string(),
                dataset: "standish".into(),
            }),
        }
    }

    /// Position in ICRF-aligned J2000 equatorial axes (km).
    fn position(body: Body, et_seconds: f64) -> Result<Vector3<f64>, CelestialError> {
        let Some(elements) = StandishEphemeris::elements(body)? else {
            return Ok(Vector3::zeros());
        };
        let centuries = et_seconds / SECONDS_PER_DAY / 36525.0;
        let ecliptic = elements.heliocentric_ecliptic(centuries)?;
        let to_equatorial = rotmt(obleq(T2000), 0);
        Ok(to_equatorial * ecliptic * AU)
    }
}

impl Ephemeris for StandishEphemeris {
    fn name(&self) -> String {
        "standish".to_string()
    }

    fn barycentric_state(&self, body: Body, epoch: &Epoch) -> Result<EphemState, CelestialError> {
        let et = epoch.to_et_seconds();
        let position = StandishEphemeris::position(body, et)?;
        let before = StandishEphemeris::position(body, et - VELOCITY_HALF_STEP)?;
        let after = StandishEphemeris::position(body, et + VELOCITY_HALF_STEP)?;
        Ok(EphemState {
            position,
            velocity: (after - before) / (2.0 * VELOCITY_HALF_STEP),
        })
    }
}

#[cfg(test)]
mod test_standish {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_solve_kepler() {
        let ea = solve_kepler(1.5, 0.2056).unwrap();
        assert_relative_eq!(ea - 0.2056 * ea.sin(), 1.5, epsilon = 1e-12);
        assert_relative_eq!(solve_kepler(1.0, 0.0).unwrap(), 1.0, epsilon = 1e-14);
    }

    #[test]
    fn test_emb_distance_and_speed() {
        let epoch = Epoch::from_gregorian_utc_at_noon(2024, 3, 20);
        let state = StandishEphemeris
            .barycentric_state(Body::EarthMoonBarycenter, &epoch)
            .unwrap();
        let r_au = state.position.norm() / AU;
        assert!((0.98..1.02).contains(&r_au), "r = {r_au}");
        // mean orbital speed ~29.8 km/s
        assert_relative_eq!(state.velocity.norm(), 29.8, epsilon = 0.6);
    }

    #[test]
    fn test_sun_at_origin_and_moon_not_covered() {
        let epoch = Epoch::from_gregorian_utc_at_noon(2024, 1, 1);
        let sun = StandishEphemeris.barycentric_state(Body::Sun, &epoch).unwrap();
        assert_eq!(sun.position, Vector3::zeros());
        assert!(matches!(
            StandishEphemeris.barycentric_state(Body::Moon, &epoch),
            Err(CelestialError::BodyNotCovered { .. })
        ));
    }

    #[test]
    fn test_jupiter_near_ecliptic() {
        let epoch = Epoch::from_gregorian_utc_at_noon(2024, 6, 1);
        let state = StandishEphemeris
            .barycentric_state(Body::JupiterBarycenter, &epoch)
            .unwrap();
        let to_ecliptic = rotmt(-obleq(T2000), 0);
        let ecl = to_ecliptic * state.position;
        let lat = (ecl.z / ecl.norm()).asin() / RADEG;
        assert!(lat.abs() < 1.5, "ecliptic latitude {lat}");
        let r_au = ecl.norm() / AU;
        assert!((4.9..5.5).contains(&r_au));
    }
}
