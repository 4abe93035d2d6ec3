//! # Earth orientation (IAU 1976 precession, IAU 1980 nutation)
//!
//! Classical equinox-based Earth orientation used to move vectors between the
//! J2000 mean equator (taken as GCRS, frame bias of 23 mas neglected), the
//! true equator and equinox of date, and the rotating Earth.
//!
//! ```text
//! GCRS/J2000 --P(t)--> mean of date --N(t)--> true of date --R3(GAST)--> Earth-fixed
//! ```
//!
//! All matrices returned here are **passive**: `x_target = M · x_source`.
use nalgebra::Matrix3;

use crate::{
    constants::{ArcSec, Radian, DPI, MJD, RADEG, RADSEC, T2000},
    ref_system::rotmt,
    time::gmst,
};

/// Mean obliquity of the ecliptic (IAU 1976), in radians.
///
/// `tjm` is a Modified Julian Date in TT. The cubic polynomial in Julian
/// centuries since J2000 is evaluated with Horner's scheme.
pub fn obleq(tjm: MJD) -> Radian {
    let ob0 = ((23.0 * 3600.0 + 26.0 * 60.0) + 21.448) * RADSEC;
    let ob1 = -46.815 * RADSEC;
    let ob2 = -0.0006 * RADSEC;
    let ob3 = 0.00181 * RADSEC;

    let t = (tjm - T2000) / 36525.0;

    ((ob3 * t + ob2) * t + ob1) * t + ob0
}

/// Nutation in longitude and obliquity `(Δψ, Δε)` in arcseconds, IAU 1980 (Wahr) series.
///
/// The five fundamental arguments (Moon and Sun mean anomalies, Moon argument
/// of latitude, elongation, node) are cubic polynomials in Julian centuries
/// of TT; the series is expanded with trigonometric addition formulas so only
/// five `sin`/`cos` pairs are evaluated.
pub fn nutn80(tjm: MJD) -> (ArcSec, ArcSec) {
    // Compute the fundamental lunar and solar arguments (in radians)
    let t1 = (tjm - T2000) / 36525.0;
    let t = t1;
    let t2 = t * t;
    let t3 = t2 * t;

    let dl = (485866.733 + 1717915922.633 * t1 + 31.310 * t2 + 0.064 * t3) * RADSEC;
    let dp = (1287099.804 + 129596581.224 * t1 - 0.577 * t2 - 0.012 * t3) * RADSEC;
    let df = (335778.877 + 1739527263.137 * t1 - 13.257 * t2 + 0.011 * t3) * RADSEC;
    let dd = (1072261.307 + 1602961601.328 * t1 - 6.891 * t2 + 0.019 * t3) * RADSEC;
    let dn = (450160.280 - 6962890.539 * t1 + 7.455 * t2 + 0.008 * t3) * RADSEC;

    let l = dl % DPI;
    let p = dp % DPI;
    let x = df % DPI * 2.0;
    let d = dd % DPI;
    let n = dn % DPI;

    // Precompute cosine and sine of fundamental arguments
    let sin_cos = |x: f64| -> (f64, f64) { (x.cos(), x.sin()) };

    let (cl, sl) = sin_cos(l);
    let (cp, sp) = sin_cos(p);
    let (cx, sx) = sin_cos(x);
    let (cd, sd) = sin_cos(d);
    let (cn, sn) = sin_cos(n);

    // Construct compound trigonometric terms used in the series expansion
    let cp2 = 2.0 * cp * cp - 1.0;

    let sp2 = 2.0 * sp * cp;
    let cd2 = 2.0 * cd * cd - 1.0;
    let sd2 = 2.0 * sd * cd;
    let cn2 = 2.0 * cn * cn - 1.0;
    let sn2 = 2.0 * sn * cn;
    let cl2 = 2.0 * cl * cl - 1.0;
    let sl2 = 2.0 * sl * cl;

    let ca = cx * cd2 + sx * sd2;
    let sa = sx * cd2 - cx * sd2;
    let cb = ca * cn - sa * sn;
    let sb = sa * cn + ca * sn;
    let cc = cb * cn - sb * sn;
    let sc = sb * cn + cb * sn;

    let cv = cx * cd2 - sx * sd2;
    let sv = sx * cd2 + cx * sd2;
    let ce = cv * cn - sv * sn;
    let se = sv * cn + cv * sn;
    let cf = ce * cn - se * sn;
    let sf = se * cn + ce * sn;

    let cg = cl * cd2 + sl * sd2;
    let sg = sl * cd2 - cl * sd2;
    let ch = cx * cn2 - sx * sn2;
    let sh = sx * cn2 + cx * sn2;
    let cj = ch * cl - sh * sl;
    let sj = sh * cl + ch * sl;

    let ck = cj * cl - sj * sl;
    let sk = sj * cl + cj * sl;
    let cm = cx * cl2 + sx * sl2;
    let sm = sx * cl2 - cx * sl2;
    let cq = cl * cd + sl * sd;
    let sq = sl * cd - cl * sd;

    let cr = 2.0 * cq * cq - 1.0;
    let sr = 2.0 * sq * cq;
    let cs = cx * cn - sx * sn;
    let ss = sx * cn + cx * sn;
    let ct = cs * cl - ss * sl;
    let st = ss * cl + cs * sl;

    let cu = cf * cl + sf * sl;
    let su = sf * cl - cf * sl;
    let cw = cp * cg - sp * sg;
    let sw = sp * cg + cp * sg;

    // Series expansion for nutation in longitude (Δψ), in 0.0001 arcseconds
    let mut dpsi =
        -(171996.0 + 174.2 * t) * sn + (2062.0 + 0.2 * t) * sn2 + 46.0 * (sm * cn + cm * sn)
            - 11.0 * sm
            - 3.0 * (sm * cn2 + cm * sn2)
            - 3.0 * (sq * cp - cq * sp)
            - 2.0 * (sb * cp2 - cb * sp2)
            + (sn * cm - cn * sm)
            - (13187.0 + 1.6 * t) * sc
            + (1426.0 - 3.4 * t) * sp
            - (517.0 - 1.2 * t) * (sc * cp + cc * sp)
            + (217.0 - 0.5 * t) * (sc * cp - cc * sp)
            + (129.0 + 0.1 * t) * sb
            + 48.0 * sr
            - 22.0 * sa
            + (17.0 - 0.1 * t) * sp2
            - 15.0 * (sp * cn + cp * sn)
            - (16.0 - 0.1 * t) * (sc * cp2 + cc * sp2)
            - 12.0 * (sn * cp - cn * sp);

    dpsi += -6.0 * (sn * cr - cn * sr) - 5.0 * (sb * cp - cb * sp)
        + 4.0 * (sr * cn + cr * sn)
        + 4.0 * (sb * cp + cb * sp)
        - 4.0 * sq
        + (sr * cp + cr * sp)
        + (sn * ca - cn * sa)
        - (sp * ca - cp * sa)
        + (sp * cn2 + cp * sn2)
        + (sn * cq - cn * sq)
        - (sp * ca + cp * sa)
        - (2274.0 + 0.2 * t) * sh
        + (712.0 + 0.1 * t) * sl
        - (386.0 + 0.4 * t) * ss
        - 301.0 * sj
        - 158.0 * sg
        + 123.0 * (sh * cl - ch * sl)
        + 63.0 * sd2
        + (63.0 + 0.1 * t) * (sl * cn + cl * sn)
        - (58.0 + 0.1 * t) * (sn * cl - cn * sl)
        - 59.0 * su
        - 51.0 * st
        - 38.0 * sf
        + 29.0 * sl2;

    dpsi += 29.0 * (sc * cl + cc * sl) - 31.0 * sk
        + 26.0 * sx
        + 21.0 * (ss * cl - cs * sl)
        + 16.0 * (sn * cg - cn * sg)
        - 13.0 * (sn * cg + cn * sg)
        - 10.0 * (se * cl - ce * sl)
        - 7.0 * (sg * cp + cg * sp)
        + 7.0 * (sh * cp + ch * sp)
        - 7.0 * (sh * cp - ch * sp)
        - 8.0 * (sf * cl + cf * sl)
        + 6.0 * (sl * cd2 + cl * sd2)
        + 6.0 * (sc * cl2 + cc * sl2)
        - 6.0 * (sn * cd2 + cn * sd2)
        - 7.0 * se
        + 6.0 * (sb * cl + cb * sl)
        - 5.0 * (sn * cd2 - cn * sd2)
        + 5.0 * (sl * cp - cl * sp)
        - 5.0 * (ss * cl2 + cs * sl2)
        - 4.0 * (sp * cd2 - cp * sd2);

    dpsi += 4.0 * (sl * cx - cl * sx) - 4.0 * sd - 3.0 * (sl * cp + cl * sp)
        + 3.0 * (sl * cx + cl * sx)
        - 3.0 * (sj * cp - cj * sp)
        - 3.0 * (su * cp - cu * sp)
        - 2.0 * (sn * cl2 - cn * sl2)
        - 3.0 * (sk * cl + ck * sl)
        - 3.0 * (sf * cp - cf * sp)
        + 2.0 * (sj * cp + cj * sp)
        - 2.0 * (sb * cl - cb * sl);

    dpsi += 2.0 * (sn * cl2 + cn * sl2) - 2.0 * (sl * cn2 + cl * sn2)
        + 2.0 * (sl * cl2 + cl * sl2)
        + 2.0 * (sh * cd + ch * sd)
        + (sn2 * cl - cn2 * sl)
        - (sg * cd2 - cg * sd2)
        + (sf * cl2 - cf * sl2)
        - 2.0 * (su * cd2 + cu * sd2)
        - (sr * cd2 - cr * sd2)
        + (sw * ch + cw * sh)
        - (sl * ce + cl * se)
        - (sf * cr - cf * sr)
        + (su * ca + cu * sa)
        + (sg * cp - cg * sp)
        + (sb * cl2 + cb * sl2)
        - (sf * cl2 + cf * sl2)
        - (st * ca - ct * sa)
        + (sc * cx + cc * sx)
        + (sj * cr + cj * sr)
        - (sg * cx + cg * sx);

    dpsi += (sp * cs + cp * ss) + (sn * cw - cn * sw)
        - (sn * cx - cn * sx)
        - (sh * cd - ch * sd)
        - (sp * cd2 + cp * sd2)
        - (sl * cv - cl * sv)
        - (ss * cp - cs * sp)
        - (sw * cn + cw * sn)
        - (sl * ca - cl * sa)
        + (sl2 * cd2 + cl2 * sd2)
        - (sf * cd2 + cf * sd2)
        + (sp * cd + cp * sd);

    // Series expansion for nutation in obliquity (Δε), in 0.0001 arcseconds
    let mut deps = (92025.0 + 8.9 * t) * cn - (895.0 - 0.5 * t) * cn2 - 24.0 * (cm * cn - sm * sn)
        + (cm * cn2 - sm * sn2)
        + (cb * cp2 + sb * sp2)
        + (5736.0 - 3.1 * t) * cc
        + (54.0 - 0.1 * t) * cp
        + (224.0 - 0.6 * t) * (cc * cp - sc * sp)
        - (95.0 - 0.3 * t) * (cc * cp + sc * sp)
        - 70.0 * cb
        + cr
        + 9.0 * (cp * cn - sp * sn)
        + 7.0 * (cc * cp2 - sc * sp2)
        + 6.0 * (cn * cp + sn * sp)
        + 3.0 * (cn * cr + sn * sr)
        + 3.0 * (cb * cp + sb * sp)
        - 2.0 * (cr * cn - sr * sn)
        - 2.0 * (cb * cp - sb * sp);

    deps += (977.0 - 0.5 * t) * ch - 7.0 * cl + 200.0 * cs + (129.0 - 0.1 * t) * cj
        - cg
        - 53.0 * (ch * cl + sh * sl)
        - 2.0 * cd2
        - 33.0 * (cl * cn - sl * sn)
        + 32.0 * (cn * cl + sn * sl)
        + 26.0 * cu
        + 27.0 * ct
        + 16.0 * cf
        - cl2
        - 12.0 * (cc * cl - sc * sl)
        + 13.0 * ck
        - cx
        - 10.0 * (cs * cl + ss * sl)
        - 8.0 * (cn * cg + sn * sg)
        + 7.0 * (cn * cg - sn * sg)
        + 5.0 * (ce * cl + se * sl)
        - 3.0 * (ch * cp - sh * sp)
        + 3.0 * (ch * cp + sh * sp)
        + 3.0 * (cf * cl - sf * sl)
        - 3.0 * (cc * cl2 - sc * sl2)
        + 3.0 * (cn * cd2 - sn * sd2)
        + 3.0 * ce
        - 3.0 * (cb * cl - sb * sl)
        + 3.0 * (cn * cd2 + sn * sd2)
        + 3.0 * (cs * cl2 - ss * sl2)
        + (cj * cp + sj * sp)
        + (cu * cp + su * sp)
        + (cn * cl2 + sn * sl2)
        + (ck * cl - sk * sl)
        + (cf * cp + sf * sp)
        - (cj * cp - sj * sp)
        + (cb * cl + sb * sl)
        - (cn * cl2 - sn * sl2)
        + (cl * cn2 - sl * sn2)
        - (ch * cd - sh * sd)
        - (cn2 * cl + sn2 * sl)
        - (cf * cl2 + sf * sl2)
        + (cu * cd2 - su * sd2)
        - (cw * ch - sw * sh)
        + (cl * ce - sl * se)
        + (cf * cr + sf * sr)
        - (cb * cl2 - sb * sl2);

    // Convert results from 0.0001 arcseconds to arcseconds
    dpsi *= 1e-4;
    deps *= 1e-4;

    (dpsi, deps)
}

/// Nutation matrix `N(t)`: mean equator and equinox of date → true equator and equinox of date.
///
/// `N = R1(−ε−Δε) · R3(−Δψ) · R1(ε)` with the mean obliquity from [`obleq`]
/// and the angles from [`nutn80`].
pub fn nutation_matrix(tjm: MJD) -> Matrix3<f64> {
    let epsm = obleq(tjm);
    let (dpsi, deps) = nutn80(tjm);
    let epst = epsm + deps * RADSEC;

    rotmt(epst, 0) * rotmt(dpsi * RADSEC, 2) * rotmt(-epsm, 0)
}

/// Equation of the equinoxes `Δψ·cos ε` in radians.
///
/// Difference between apparent and mean sidereal time. `tjm` is MJD in TT.
pub fn equequ(tjm: MJD) -> Radian {
    let oblm = obleq(tjm);
    let (dpsi, _deps) = nutn80(tjm);
    RADSEC * dpsi * oblm.cos()
}

/// Precession matrix `P(t)` (IAU 1976): J2000 mean equator → mean equator and equinox of date.
///
/// Built from the three Lieske angles
///
/// ```text
/// ζ(T) = (0.6406161 + 0.0000839·T + 0.0000050·T²) · T  [deg]
/// θ(T) = (0.5567530 - 0.0001185·T - 0.0000116·T²) · T  [deg]
/// z(T) = (0.6406161 + 0.0003041·T + 0.0000051·T²) · T  [deg]
/// ```
///
/// as `P = R3(−z) · R2(θ) · R3(−ζ)`.
pub fn precession_matrix(tjm: MJD) -> Matrix3<f64> {
    let t = (tjm - T2000) / 36525.0;

    let zeta = ((0.0000050 * t + 0.0000839) * t + 0.6406161) * t * RADEG;
    let z = ((0.0000051 * t + 0.0003041) * t + 0.6406161) * t * RADEG;
    let theta = ((-0.0000116 * t - 0.0001185) * t + 0.5567530) * t * RADEG;

    rotmt(z, 2) * rotmt(-theta, 1) * rotmt(zeta, 2)
}

/// Combined rotation GCRS → true equator and equinox of date, `N(t)·P(t)`.
pub fn celestial_to_true_of_date(tjm: MJD) -> Matrix3<f64> {
    nutation_matrix(tjm) * precession_matrix(tjm)
}

/// Greenwich apparent sidereal time in radians, in `[0, 2π)`.
///
/// Arguments
/// -----------------
/// * `mjd_ut1`: Modified Julian Date in UT1 (drives Earth rotation).
/// * `mjd_tt`: Modified Julian Date in TT (drives nutation).
pub fn gast(mjd_ut1: MJD, mjd_tt: MJD) -> Radian {
    (gmst(mjd_ut1) + equequ(mjd_tt)).rem_euclid(DPI)
}

/// Rotation true equator of date → Earth-fixed (terrestrial) frame, `R3(GAST)`.
pub fn earth_rotation_matrix(gast: Radian) -> Matrix3<f64> {
    rotmt(-gast, 2)
}

#[cfg(test)]
mod test_earth_orientation {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    #[test]
    fn test_obliquity() {
        let obl = obleq(T2000);
        assert_eq!(obl, 0.40909280422232897)
    }

    #[test]
    fn test_nutn80() {
        let (dpsi, deps) = nutn80(T2000);
        assert_eq!(dpsi, -13.923385169502602);
        assert_eq!(deps, -5.773808263765919);
    }

    #[test]
    fn test_nutation_matrix() {
        let nut = nutation_matrix(T2000);
        let expected = Matrix3::new(
            0.9999999977217079,
            6.19323109890795e-5,
            2.6850942970991024e-5,
            -6.193306258211379e-5,
            0.9999999976903892,
            2.799138089948361e-5,
            -2.6849209338068913e-5,
            -2.7993043796858963e-5,
            0.9999999992477547,
        );
        assert_relative_eq!(nut, expected, epsilon = 1e-12);

        // N[1][0] = Δψ·cos ε
        let (dpsi, _) = nutn80(T2000);
        assert_relative_eq!(
            nut[(1, 0)],
            dpsi * RADSEC * obleq(T2000).cos(),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_precession_is_identity_at_j2000() {
        assert_relative_eq!(precession_matrix(T2000), Matrix3::identity(), epsilon = 1e-15);
    }

    #[test]
    fn test_precession_moves_the_pole_by_theta() {
        // half a century after J2000
        let tjm = T2000 + 0.5 * 36525.0;
        let p = precession_matrix(tjm);
        assert_relative_eq!(p * p.transpose(), Matrix3::identity(), epsilon = 1e-14);

        let t: f64 = 0.5;
        let theta = ((-0.0000116 * t - 0.0001185) * t + 0.5567530) * t * RADEG;
        let pole = p * Vector3::z();
        assert_relative_eq!(pole.z, theta.cos(), epsilon = 1e-12);
    }

    #[test]
    fn test_equequ_at_j2000() {
        let eqeq = equequ(T2000);
        let expected = RADSEC * (-13.923385169502602) * (obleq(T2000).cos());
        assert_relative_eq!(eqeq, expected, epsilon = 1e-12);
        assert!((eqeq / RADSEC).abs() < 30.0);
    }

    #[test]
    fn test_gast_stays_close_to_gmst() {
        let tjm = 60384.25;
        let diff = gast(tjm, tjm) - gmst(tjm);
        assert!(diff.abs() < 1e-4);
        assert!((0.0..DPI).contains(&gast(tjm, tjm)));
    }

    #[test]
    fn test_earth_rotation_matrix() {
        // a vector on the equinox direction lands at Greenwich longitude -GAST
        let r = earth_rotation_matrix(std::f64::consts::FRAC_PI_2);
        let fixed = r * Vector3::x();
        assert_relative_eq!(fixed, Vector3::new(0.0, -1.0, 0.0), epsilon = 1e-15);
    }
}
