//! IAU constellation lookup.
//!
//! The boundaries are the Delporte (1930) lines as tabulated by Roman (1987),
//! *Identification of a Constellation from a Position*, PASP 99, 695. They run
//! along meridians and parallels of the B1875.0 mean equator, so a direction
//! is precessed to that frame and the table is scanned top to bottom: the
//! first band whose lower declination lies below the point and whose right
//! ascension range contains it names the constellation.
//!
//! The final band covers the whole southern cap, so any finite direction
//! resolves; [`Unavailable`] is reserved for degenerate input.
use nalgebra::Vector3;

use crate::{
    celestial_errors::{BestEffort, Unavailable},
    constants::{Degree, Hours, MJD},
    ref_system::{cartesian_to_radec, rotpn, RefEpoch, RefSystem},
};

/// B1875.0 (JD 2405889.258550475) as an MJD.
pub const B1875: MJD = 5_888.758_550_475;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Constellation {
    /// IAU three-letter abbreviation.
    pub abbreviation: &'static str,
}

/// One row of the boundary table, B1875.0 coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Band {
    ra_low: Hours,
    ra_high: Hours,
    dec_low: Degree,
    abbreviation: &'static str,
}

const fn b(ra_low: Hours, ra_high: Hours, dec_low: Degree, abbreviation: &'static str) -> Band {
    Band {
        ra_low,
        ra_high,
        dec_low,
        abbreviation,
    }
}

/// Sorted by decreasing lower declination.
const BOUNDARIES: &[Band] = &[
    b(0.0000, 24.0000, 88.0000, "UMi"),
    b(8.0000, 14.5000, 86.5000, "UMi"),
    b(21.0000, 23.0000, 86.1667, "UMi"),
    b(18.0000, 21.0000, 86.0000, "UMi"),
    b(0.0000, 8.0000, 85.0000, "Cep"),
    b(9.1667, 10.6667, 82.0000, "Cam"),
    b(0.0000, 5.0000, 80.0000, "Cep"),
    b(10.6667, 14.5000, 80.0000, "Cam"),
    b(17.5000, 18.0000, 80.0000, "UMi"),
    b(20.1667, 21.0000, 80.0000, "Dra"),
    b(0.0000, 3.5083, 77.0000, "Cep"),
    b(11.5000, 13.5833, 77.0000, "Cam"),
    b(16.5333, 17.5000, 75.0000, "UMi"),
    b(20.1667, 20.6667, 75.0000, "Cep"),
    b(7.9667, 9.1667, 73.5000, "Cam"),
    b(9.1667, 11.3333, 73.5000, "Dra"),
    b(13.0000, 16.5333, 70.0000, "UMi"),
    b(3.1000, 3.4167, 68.0000, "Cas"),
    b(20.4167, 20.6667, 67.0000, "Dra"),
    b(11.3333, 12.0000, 66.5000, "Dra"),
    b(0.0000, 0.3333, 66.0000, "Cep"),
    b(14.0000, 15.6667, 66.0000, "UMi"),
    b(23.5833, 24.0000, 66.0000, "Cep"),
    b(12.0000, 13.5000, 64.0000, "Dra"),
    b(13.5000, 14.4167, 63.0000, "Dra"),
    b(23.1667, 23.5833, 63.0000, "Cep"),
    b(6.1000, 7.0000, 62.0000, "Cam"),
    b(20.0000, 20.4167, 61.5000, "Dra"),
    b(20.5367, 20.6000, 60.9167, "Cep"),
    b(7.0000, 7.9667, 60.0000, "Cam"),
    b(7.9667, 8.4167, 60.0000, "UMa"),
    b(19.7667, 20.0000, 59.5000, "Dra"),
    b(20.0000, 20.5367, 59.5000, "Cep"),
    b(22.8667, 23.1667, 59.0833, "Cep"),
    b(0.0000, 2.4333, 58.5000, "Cas"),
    b(19.4167, 19.7667, 58.0000, "Dra"),
    b(1.7000, 1.9083, 57.5000, "Cas"),
    b(2.4333, 3.1000, 57.0000, "Cas"),
    b(3.1000, 3.1667, 57.0000, "Cam"),
    b(22.3167, 22.8667, 56.2500, "Cep"),
    b(5.0000, 6.1000, 56.0000, "Cam"),
    b(14.0333, 14.4167, 55.5000, "UMa"),
    b(14.4167, 19.4167, 55.5000, "Dra"),
    b(3.1667, 3.3333, 55.0000, "Cam"),
    b(22.1333, 22.3167, 55.0000, "Cep"),
    b(20.6000, 21.9667, 54.8333, "Cep"),
    b(0.0000, 1.7000, 54.0000, "Cas"),
    b(6.1000, 6.5000, 54.0000, "Lyn"),
    b(12.0833, 13.5000, 53.0000, "UMa"),
    b(15.2500, 15.7500, 53.0000, "Dra"),
    b(21.9667, 22.1333, 52.7500, "Cep"),
    b(3.3333, 5.0000, 52.5000, "Cam"),
    b(22.8667, 23.3333, 52.5000, "Cas"),
    b(15.7500, 17.0000, 51.5000, "Dra"),
    b(2.0417, 2.5167, 50.5000, "Per"),
    b(17.0000, 18.2333, 50.5000, "Dra"),
    b(0.0000, 1.3667, 50.0000, "Cas"),
    b(1.3667, 1.6667, 50.0000, "Per"),
    b(6.5000, 6.8000, 50.0000, "Lyn"),
    b(23.3333, 24.0000, 50.0000, "Cas"),
    b(13.5000, 14.0333, 48.5000, "UMa"),
    b(0.0000, 1.1167, 48.0000, "Cas"),
    b(23.5833, 24.0000, 48.0000, "Cas"),
    b(18.1750, 18.2333, 47.5000, "Her"),
    b(18.2333, 19.0833, 47.5000, "Dra"),
    b(19.0833, 19.1667, 47.5000, "Cyg"),
    b(1.6667, 2.0417, 47.0000, "Per"),
    b(8.4167, 9.1667, 47.0000, "UMa"),
    b(0.1667, 0.8667, 46.0000, "Cas"),
    b(12.0000, 12.0833, 45.0000, "UMa"),
    b(6.8000, 7.3667, 44.5000, "Lyn"),
    b(21.9083, 21.9667, 44.0000, "Cyg"),
    b(21.8750, 21.9083, 43.7500, "Cyg"),
    b(19.1667, 19.4000, 43.5000, "Cyg"),
    b(9.1667, 10.1667, 42.0000, "UMa"),
    b(10.1667, 10.7833, 40.0000, "UMa"),
    b(15.4333, 15.7500, 40.0000, "Boo"),
    b(15.7500, 16.3333, 40.0000, "Her"),
    b(9.2500, 9.5833, 39.7500, "Lyn"),
    b(0.0000, 2.5167, 36.7500, "And"),
    b(2.5167, 2.5667, 36.7500, "Per"),
    b(19.3583, 19.4000, 36.5000, "Lyr"),
    b(4.5000, 4.6917, 36.0000, "Per"),
    b(21.7333, 21.8750, 36.0000, "Cyg"),
    b(21.8750, 22.0000, 36.0000, "Lac"),
    b(6.5333, 7.3667, 35.5000, "Aur"),
    b(7.3667, 7.7500, 35.5000, "Lyn"),
    b(0.0000, 2.0000, 35.0000, "And"),
    b(22.0000, 22.8167, 35.0000, "Lac"),
    b(22.8167, 22.8667, 34.5000, "Lac"),
    b(22.8667, 23.5000, 34.5000, "And"),
    b(2.5667, 2.7167, 34.0000, "Per"),
    b(10.7833, 11.0000, 34.0000, "UMa"),
    b(12.0000, 12.3333, 34.0000, "CVn"),
    b(7.7500, 9.2500, 33.5000, "Lyn"),
    b(9.2500, 9.8833, 33.5000, "LMi"),
    b(0.7167, 1.4083, 33.0000, "And"),
    b(15.1833, 15.4333, 33.0000, "Boo"),
    b(23.5000, 23.7500, 32.0833, "And"),
    b(12.3333, 13.2500, 32.0000, "CVn"),
    b(23.7500, 24.0000, 31.3333, "And"),
    b(13.9583, 14.0333, 30.7500, "CVn"),
    b(2.4167, 2.7167, 30.6667, "Tri"),
    b(2.7167, 4.5000, 30.6667, "Per"),
    b(4.5000, 4.7500, 30.0000, "Aur"),
    b(18.1750, 19.3583, 30.0000, "Lyr"),
    b(11.0000, 12.0000, 29.0000, "UMa"),
    b(19.6667, 20.9167, 29.0000, "Cyg"),
    b(4.7500, 5.8833, 28.5000, "Aur"),
    b(9.8833, 10.5000, 28.5000, "LMi"),
    b(13.2500, 13.9583, 28.5000, "CVn"),
    b(0.0000, 0.0667, 28.0000, "And"),
    b(1.4083, 1.6667, 28.0000, "Tri"),
    b(5.8833, 6.5333, 28.0000, "Aur"),
    b(7.8833, 8.0000, 28.0000, "Gem"),
    b(20.9167, 21.7333, 28.0000, "Cyg"),
    b(19.2583, 19.6667, 27.5000, "Cyg"),
    b(1.9167, 2.4167, 27.2500, "Tri"),
    b(16.1667, 16.3333, 27.0000, "CrB"),
    b(15.0833, 15.1833, 26.0000, "Boo"),
    b(15.1833, 16.1667, 26.0000, "CrB"),
    b(18.3667, 18.8667, 26.0000, "Lyr"),
    b(10.7500, 11.0000, 25.5000, "LMi"),
    b(18.8667, 19.2583, 25.5000, "Lyr"),
    b(1.6667, 1.9167, 25.0000, "Tri"),
    b(0.7167, 0.8500, 23.7500, "Psc"),
    b(10.5000, 10.7500, 23.5000, "LMi"),
    b(21.2500, 21.4167, 23.5000, "Vul"),
    b(5.7000, 5.8833, 22.8333, "Tau"),
    b(0.0667, 0.1417, 22.0000, "And"),
    b(15.9167, 16.0333, 22.0000, "Ser"),
    b(5.8833, 6.2167, 21.5000, "Gem"),
    b(19.8333, 20.2500, 21.2500, "Vul"),
    b(18.8667, 19.2500, 21.0833, "Vul"),
    b(0.1417, 0.8500, 21.0000, "And"),
    b(20.2500, 20.5667, 20.5000, "Vul"),
    b(7.8083, 7.8833, 20.0000, "Gem"),
    b(20.5667, 21.2500, 19.5000, "Vul"),
    b(19.2500, 19.8333, 19.1667, "Vul"),
    b(3.2833, 3.3667, 19.0000, "Ari"),
    b(18.8667, 19.0000, 18.5000, "Sge"),
    b(5.7000, 5.7667, 18.0000, "Ori"),
    b(6.2167, 6.3083, 17.5000, "Gem"),
    b(19.0000, 19.8333, 16.1667, "Sge"),
    b(4.9667, 5.3333, 16.0000, "Tau"),
    b(15.9167, 16.0833, 16.0000, "Her"),
    b(19.8333, 20.2500, 15.7500, "Sge"),
    b(4.6167, 4.9667, 15.5000, "Tau"),
    b(5.3333, 5.6000, 15.5000, "Tau"),
    b(12.8333, 13.5000, 15.0000, "Com"),
    b(17.2500, 18.2500, 14.3333, "Her"),
    b(11.8667, 12.8333, 14.0000, "Com"),
    b(7.5000, 7.8083, 13.5000, "Gem"),
    b(16.7500, 17.2500, 12.8333, "Her"),
    b(0.0000, 0.1417, 12.5000, "Peg"),
    b(5.6000, 5.7667, 12.5000, "Tau"),
    b(7.0000, 7.5000, 12.5000, "Gem"),
    b(21.1167, 21.3333, 12.5000, "Peg"),
    b(6.3083, 6.9333, 12.0000, "Gem"),
    b(18.2500, 18.8667, 12.0000, "Her"),
    b(20.8750, 21.0500, 11.8333, "Del"),
    b(21.0500, 21.1167, 11.8333, "Peg"),
    b(11.5167, 11.8667, 11.0000, "Leo"),
    b(6.2417, 6.3083, 10.0000, "Ori"),
    b(6.9333, 7.0000, 10.0000, "Gem"),
    b(7.8083, 7.9250, 10.0000, "Cnc"),
    b(23.8333, 24.0000, 10.0000, "Peg"),
    b(1.6667, 3.2833, 9.9167, "Ari"),
    b(20.2167, 20.3917, 8.5000, "Del"),
    b(13.5000, 15.0833, 8.0000, "Boo"),
    b(22.7500, 23.8333, 7.5000, "Peg"),
    b(7.9250, 9.2500, 7.0000, "Cnc"),
    b(9.2500, 10.7500, 7.0000, "Leo"),
    b(18.2500, 18.6622, 6.2500, "Oph"),
    b(18.6622, 18.8667, 6.2500, "Aql"),
    b(20.8333, 20.8750, 6.0000, "Del"),
    b(7.0000, 7.0167, 5.5000, "CMi"),
    b(18.2500, 18.4250, 4.5000, "Ser"),
    b(16.0833, 16.7500, 4.0000, "Her"),
    b(18.2500, 18.4250, 3.0000, "Oph"),
    b(21.4667, 21.6667, 2.7500, "Peg"),
    b(0.0000, 2.0000, 2.0000, "Psc"),
    b(18.5833, 18.8667, 2.0000, "Ser"),
    b(20.3000, 20.8333, 2.0000, "Del"),
    b(20.8333, 21.3333, 2.0000, "Equ"),
    b(21.3333, 21.4667, 2.0000, "Peg"),
    b(22.0000, 22.7500, 2.0000, "Peg"),
    b(21.6667, 22.0000, 1.7500, "Peg"),
    b(7.0167, 7.2000, 1.5000, "CMi"),
    b(3.5833, 4.6167, 0.0000, "Tau"),
    b(4.6167, 4.6667, 0.0000, "Ori"),
    b(7.2000, 8.0833, 0.0000, "CMi"),
    b(14.6667, 15.0833, 0.0000, "Vir"),
    b(17.8333, 18.2500, 0.0000, "Oph"),
    b(2.6500, 3.2833, -1.7500, "Cet"),
    b(3.2833, 3.5833, -1.7500, "Tau"),
    b(15.0833, 16.2667, -3.2500, "Ser"),
    b(4.6667, 5.0833, -4.0000, "Ori"),
    b(5.8333, 6.2417, -4.0000, "Ori"),
    b(17.8333, 17.9667, -4.0000, "Ser"),
    b(18.2500, 18.5833, -4.0000, "Ser"),
    b(18.5833, 18.8667, -4.0000, "Aql"),
    b(22.7500, 23.8333, -4.0000, "Psc"),
    b(10.7500, 11.5167, -6.0000, "Leo"),
    b(11.5167, 11.8333, -6.0000, "Vir"),
    b(0.0000, 0.3333, -7.0000, "Psc"),
    b(23.8333, 24.0000, -7.0000, "Psc"),
    b(14.2500, 14.6667, -8.0000, "Vir"),
    b(15.9167, 16.2667, -8.0000, "Oph"),
    b(20.0000, 20.5333, -9.0000, "Aql"),
    b(21.3333, 21.8667, -9.0000, "Aqr"),
    b(17.1667, 17.9667, -10.0000, "Oph"),
    b(5.8333, 8.0833, -11.0000, "Mon"),
    b(4.9167, 5.0833, -11.0000, "Eri"),
    b(5.0833, 5.8333, -11.0000, "Ori"),
    b(8.0833, 8.3667, -11.0000, "Hya"),
    b(9.5833, 10.7500, -11.0000, "Sex"),
    b(11.8333, 12.8333, -11.0000, "Vir"),
    b(17.5833, 17.6667, -11.6667, "Oph"),
    b(18.8667, 20.0000, -12.0333, "Aql"),
    b(4.8333, 4.9167, -14.5000, "Eri"),
    b(20.5333, 21.3333, -15.0000, "Aqr"),
    b(17.1667, 18.2500, -16.0000, "Ser"),
    b(18.2500, 18.8667, -16.0000, "Sct"),
    b(8.3667, 8.5833, -17.0000, "Hya"),
    b(16.2667, 16.3750, -18.2500, "Oph"),
    b(8.5833, 9.0833, -19.0000, "Hya"),
    b(10.7500, 10.8333, -19.0000, "Crt"),
    b(15.6667, 15.9167, -20.0000, "Lib"),
    b(12.5833, 12.8333, -22.0000, "Crv"),
    b(12.8333, 14.2500, -22.0000, "Vir"),
    b(9.0833, 9.7500, -24.0000, "Hya"),
    b(1.6667, 2.6500, -24.3833, "Cet"),
    b(2.6500, 3.7500, -24.3833, "Eri"),
    b(10.8333, 11.8333, -24.5000, "Crt"),
    b(11.8333, 12.5833, -24.5000, "Crv"),
    b(14.2500, 14.9167, -24.5000, "Lib"),
    b(16.2667, 16.7500, -24.5833, "Oph"),
    b(0.0000, 1.6667, -25.5000, "Cet"),
    b(21.3333, 21.8667, -25.5000, "Cap"),
    b(21.8667, 23.8333, -25.5000, "Aqr"),
    b(23.8333, 24.0000, -25.5000, "Cet"),
    b(9.7500, 10.2500, -26.5000, "Hya"),
    b(4.7000, 4.8333, -27.2500, "Eri"),
    b(4.8333, 6.1167, -27.2500, "Lep"),
    b(20.0000, 21.3333, -28.0000, "Cap"),
    b(10.2500, 10.5833, -29.1667, "Hya"),
    b(12.5833, 14.9167, -29.5000, "Hya"),
    b(14.9167, 15.6667, -29.5000, "Lib"),
    b(15.6667, 16.0000, -29.5000, "Sco"),
    b(4.5833, 4.7000, -30.0000, "Eri"),
    b(16.7500, 17.6000, -30.0000, "Oph"),
    b(17.6000, 17.8333, -30.0000, "Sgr"),
    b(10.5833, 10.8333, -31.1667, "Hya"),
    b(6.1167, 7.3667, -33.0000, "CMa"),
    b(12.2500, 12.5833, -33.0000, "Hya"),
    b(10.8333, 12.2500, -35.0000, "Hya"),
    b(3.5000, 3.7500, -36.0000, "For"),
    b(8.3667, 9.3667, -36.7500, "Pyx"),
    b(4.2667, 4.5833, -37.0000, "Eri"),
    b(17.8333, 19.1667, -37.0000, "Sgr"),
    b(21.3333, 23.0000, -37.0000, "PsA"),
    b(23.0000, 23.3333, -37.0000, "Scl"),
    b(3.0000, 3.5000, -39.5833, "For"),
    b(9.3667, 11.0000, -39.7500, "Ant"),
    b(0.0000, 1.6667, -40.0000, "Scl"),
    b(1.6667, 3.0000, -40.0000, "For"),
    b(3.8667, 4.2667, -40.0000, "Eri"),
    b(23.3333, 24.0000, -40.0000, "Scl"),
    b(14.1667, 14.9167, -42.0000, "Cen"),
    b(15.6667, 16.0000, -42.0000, "Lup"),
    b(16.0000, 16.4208, -42.0000, "Sco"),
    b(4.8333, 5.0000, -43.0000, "Cae"),
    b(5.0000, 6.5833, -43.0000, "Col"),
    b(8.0000, 8.3667, -43.0000, "Pup"),
    b(3.4167, 3.8667, -44.0000, "Eri"),
    b(16.4208, 17.8333, -45.5000, "Sco"),
    b(17.8333, 19.1667, -45.5000, "CrA"),
    b(19.1667, 20.3333, -45.5000, "Sgr"),
    b(20.3333, 21.3333, -45.5000, "Mic"),
    b(3.0000, 3.4167, -46.0000, "Eri"),
    b(4.5000, 4.8333, -46.5000, "Cae"),
    b(15.3333, 15.6667, -48.0000, "Lup"),
    b(0.0000, 2.3333, -48.1667, "Phe"),
    b(2.6667, 3.0000, -49.0000, "Eri"),
    b(4.0833, 4.2667, -49.0000, "Hor"),
    b(4.2667, 4.5000, -49.0000, "Cae"),
    b(21.3333, 22.0000, -50.0000, "Gru"),
    b(6.0000, 8.0000, -50.7500, "Pup"),
    b(8.0000, 8.1667, -50.7500, "Vel"),
    b(2.4167, 2.6667, -51.0000, "Eri"),
    b(3.8333, 4.0833, -51.0000, "Hor"),
    b(0.0000, 1.8333, -51.5000, "Phe"),
    b(6.0000, 6.1667, -52.5000, "Car"),
    b(8.1667, 8.4500, -53.0000, "Vel"),
    b(3.5000, 3.8333, -53.1667, "Hor"),
    b(3.8333, 4.0000, -53.1667, "Dor"),
    b(0.0000, 1.5833, -53.5000, "Phe"),
    b(2.1667, 2.4167, -54.0000, "Eri"),
    b(4.5000, 5.0000, -54.0000, "Pic"),
    b(15.0500, 15.3333, -54.0000, "Lup"),
    b(8.4500, 8.8333, -54.5000, "Vel"),
    b(6.1667, 6.5000, -55.0000, "Car"),
    b(11.8333, 12.8333, -55.0000, "Cen"),
    b(14.1667, 15.0500, -55.0000, "Lup"),
    b(15.0500, 15.3333, -55.0000, "Nor"),
    b(4.0000, 4.3333, -56.5000, "Dor"),
    b(8.8333, 11.0000, -56.5000, "Vel"),
    b(11.0000, 11.2500, -56.5000, "Cen"),
    b(17.5000, 18.0000, -57.0000, "Ara"),
    b(18.0000, 20.3333, -57.0000, "Tel"),
    b(22.0000, 23.3333, -57.0000, "Gru"),
    b(3.2000, 3.5000, -57.5000, "Hor"),
    b(5.0000, 5.5000, -57.5000, "Pic"),
    b(6.5000, 6.8333, -58.0000, "Car"),
    b(0.0000, 1.3333, -58.5000, "Phe"),
    b(1.3333, 2.1667, -58.5000, "Eri"),
    b(23.3333, 24.0000, -58.5000, "Phe"),
    b(4.3333, 4.5833, -59.0000, "Dor"),
    b(15.3333, 16.4208, -60.0000, "Nor"),
    b(20.3333, 21.3333, -60.0000, "Ind"),
    b(5.5000, 6.0000, -61.0000, "Pic"),
    b(15.1667, 15.3333, -61.0000, "Cir"),
    b(16.4208, 16.5833, -61.0000, "Ara"),
    b(14.9167, 15.1667, -63.5833, "Cir"),
    b(16.5833, 16.7500, -63.5833, "Ara"),
    b(6.0000, 6.8333, -64.0000, "Pic"),
    b(6.8333, 9.0333, -64.0000, "Car"),
    b(11.2500, 11.8333, -64.0000, "Cen"),
    b(11.8333, 12.8333, -64.0000, "Cru"),
    b(12.8333, 14.5333, -64.0000, "Cen"),
    b(13.5000, 13.6667, -65.0000, "Cir"),
    b(16.7500, 16.8333, -65.0000, "Ara"),
    b(2.1667, 3.2000, -67.5000, "Hor"),
    b(3.2000, 4.5833, -67.5000, "Ret"),
    b(14.7500, 14.9167, -67.5000, "Cir"),
    b(16.8333, 17.5000, -67.5000, "Ara"),
    b(17.5000, 18.0000, -67.5000, "Pav"),
    b(22.0000, 23.3333, -67.5000, "Tuc"),
    b(4.5833, 6.5833, -70.0000, "Dor"),
    b(13.6667, 14.7500, -70.0000, "Cir"),
    b(14.7500, 17.0000, -70.0000, "TrA"),
    b(0.0000, 1.3333, -75.0000, "Tuc"),
    b(3.5000, 4.5833, -75.0000, "Hyi"),
    b(6.5833, 9.0333, -75.0000, "Vol"),
    b(9.0333, 11.2500, -75.0000, "Car"),
    b(11.2500, 13.6667, -75.0000, "Mus"),
    b(18.0000, 21.3333, -75.0000, "Pav"),
    b(21.3333, 23.3333, -75.0000, "Ind"),
    b(23.3333, 24.0000, -75.0000, "Tuc"),
    b(0.7500, 1.3333, -76.0000, "Tuc"),
    b(0.0000, 3.5000, -82.5000, "Hyi"),
    b(7.6667, 13.6667, -82.5000, "Cha"),
    b(13.6667, 18.0000, -82.5000, "Aps"),
    b(3.5000, 7.6667, -85.0000, "Men"),
    b(0.0000, 24.0000, -90.0000, "Oct"),
];

/// Constellation containing the B1875.0 equatorial point `(α, δ)`.
pub fn constellation_from_b1875(ra: Hours, dec: Degree) -> BestEffort<Constellation> {
    if !(ra.is_finite() && dec.is_finite()) {
        return Err(Unavailable::new("constellation", "non-finite coordinates"));
    }
    let ra = ra.rem_euclid(24.0);

    BOUNDARIES
        .iter()
        .find(|band| dec >= band.dec_low && band.ra_low <= ra && ra < band.ra_high)
        .map(|band| Constellation {
            abbreviation: band.abbreviation,
        })
        .ok_or_else(|| {
            Unavailable::new(
                "constellation",
                format!("no boundary band contains α = {ra:.4} h, δ = {dec:.4}°"),
            )
        })
}

/// Constellation of a direction given in GCRS (J2000 equatorial) axes.
pub fn constellation_at(direction: &Vector3<f64>) -> BestEffort<Constellation> {
    let norm = direction.norm();
    if !norm.is_finite() || norm == 0.0 {
        return Err(Unavailable::new("constellation", "degenerate direction"));
    }
    let to_b1875 = rotpn(
        &RefSystem::Equm(RefEpoch::J2000),
        &RefSystem::Equm(RefEpoch::Epoch(B1875)),
    );
    let (ra, dec, _) = cartesian_to_radec(to_b1875 * direction);
    constellation_from_b1875(ra.to_degrees() / 15.0, dec.to_degrees())
}

#[cfg(test)]
mod constellation_test {
    use super::*;

    /// Unit vector of a J2000 catalogue position.
    fn star(ra_hours: f64, dec_deg: f64) -> Vector3<f64> {
        let (ra, dec) = ((ra_hours * 15.0).to_radians(), dec_deg.to_radians());
        Vector3::new(dec.cos() * ra.cos(), dec.cos() * ra.sin(), dec.sin())
    }

    fn abbr(ra_hours: f64, dec_deg: f64) -> &'static str {
        constellation_at(&star(ra_hours, dec_deg))
            .unwrap()
            .abbreviation
    }

    #[test]
    fn test_table_is_well_formed() {
        assert!(BOUNDARIES
            .windows(2)
            .all(|pair| pair[0].dec_low >= pair[1].dec_low));
        for band in BOUNDARIES {
            assert!(0.0 <= band.ra_low && band.ra_low < band.ra_high && band.ra_high <= 24.0);
            assert_eq!(band.abbreviation.len(), 3);
        }
        let cap = BOUNDARIES[BOUNDARIES.len() - 1];
        assert_eq!((cap.ra_low, cap.ra_high, cap.dec_low), (0.0, 24.0, -90.0));

        let mut names: Vec<&str> = BOUNDARIES.iter().map(|band| band.abbreviation).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 88);
    }

    #[test]
    fn test_cetus_stars_near_the_zodiac() {
        // γ Cet, δ Cet and Mira sit a few degrees south of the Aries line
        assert_eq!(abbr(2.7217, 3.236), "Cet");
        assert_eq!(abbr(2.6580, 0.329), "Cet");
        assert_eq!(abbr(2.3220, -2.978), "Cet");
        // Hamal and Botein, just north of it
        assert_eq!(abbr(2.1195, 23.462), "Ari");
        assert_eq!(abbr(3.1940, 19.727), "Ari");
        // Alrescha, the knot of Pisces
        assert_eq!(abbr(2.0340, 2.764), "Psc");
    }

    #[test]
    fn test_named_stars() {
        let cases = [
            ("Polaris", 2.5303, 89.264, "UMi"),
            ("Sirius", 6.7525, -16.716, "CMa"),
            ("Aldebaran", 4.5987, 16.509, "Tau"),
            ("Regulus", 10.1395, 11.967, "Leo"),
            ("Spica", 13.4199, -11.161, "Vir"),
            ("Antares", 16.4901, -26.432, "Sco"),
            ("Arcturus", 14.2610, 19.182, "Boo"),
            ("Vega", 18.6156, 38.784, "Lyr"),
            ("Deneb", 20.6905, 45.280, "Cyg"),
            ("Kitalpha", 21.2637, 5.248, "Equ"),
            ("xi Ser", 17.6270, -15.399, "Ser"),
            ("nu Oph", 17.9840, -9.774, "Oph"),
            ("Canopus", 6.3992, -52.696, "Car"),
            ("Acrux", 12.4433, -63.099, "Cru"),
            ("sigma Oct", 21.1460, -88.956, "Oct"),
        ];
        for (name, ra, dec, expected) in cases {
            assert_eq!(abbr(ra, dec), expected, "{name}");
        }
    }

    #[test]
    fn test_b1875_lookup() {
        let at = |ra, dec| constellation_from_b1875(ra, dec).unwrap().abbreviation;
        assert_eq!(at(0.0, 89.0), "UMi");
        assert_eq!(at(12.0, -89.0), "Oct");
        // band edges: lower declination inclusive, upper right ascension exclusive
        assert_eq!(at(1.6667, 9.9167), "Ari");
        assert_eq!(at(3.2833, 9.9167), "Tau");
        assert_eq!(at(-0.5, 80.0), at(23.5, 80.0));
    }

    #[test]
    fn test_degenerate_input() {
        assert!(constellation_at(&Vector3::zeros()).is_err());
        assert!(constellation_at(&Vector3::new(f64::NAN, 0.0, 1.0)).is_err());
        assert!(constellation_from_b1875(f64::INFINITY, 0.0).is_err());
    }
}
