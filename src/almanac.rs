//! # Almanac: seasons and lunar phases
//!
//! Both searches track apparent geocentric ecliptic longitudes of date:
//!
//! * a season starts when the Sun's longitude reaches 0°, 90°, 180° or 270°;
//! * a principal lunar phase occurs when the Moon − Sun longitude difference
//!   reaches 0° (new), 90° (first quarter), 180° (full) or 270° (last quarter).
//!
//! Each target angle is found as the upward zero crossing of the longitude
//! offset wrapped to `(−180°, 180°]`, with the same grid + Brent machinery as
//! the daily event search. Lunar phases need a dataset covering the Moon.
use std::fmt;

use hifitime::{Epoch, Unit};
use serde::Serialize;
use tracing::debug;

use crate::{
    celestial_errors::CelestialError,
    constants::{Degree, Hours, RADSEC},
    earth_orientation::nutn80,
    events::{find_crossings, Crossing, SearchWindow},
    geometry::geocentric_apparent,
    jpl_ephem::Ephemeris,
    planet::Body,
    ref_system::{cartesian_to_radec, rotpn, wrap_pi, RefEpoch, RefSystem},
    time::{civil_fields, CivilDate},
};

/// Grid step of the season search: the Sun moves about 1° per day.
const SEASON_STEP_DAYS: f64 = 1.0;

/// Grid step of the lunar phase search: the elongation moves about 12° per day.
const PHASE_STEP_DAYS: f64 = 0.25;

/// Mean duration of a lunar quarter used to size the search window, days.
const DAYS_PER_QUARTER: f64 = 7.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SeasonPhenomenon {
    Equinox,
    Solstice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Season {
    MarchEquinox,
    JuneSolstice,
    SeptemberEquinox,
    DecemberSolstice,
}

impl Season {
    pub const ALL: [Season; 4] = [
        Season::MarchEquinox,
        Season::JuneSolstice,
        Season::SeptemberEquinox,
        Season::DecemberSolstice,
    ];

    /// Apparent solar longitude at which the season starts.
    pub fn solar_longitude(&self) -> Degree {
        match self {
            Season::MarchEquinox => 0.0,
            Season::JuneSolstice => 90.0,
            Season::SeptemberEquinox => 180.0,
            Season::DecemberSolstice => 270.0,
        }
    }

    pub fn phenomenon(&self) -> SeasonPhenomenon {
        match self {
            Season::MarchEquinox | Season::SeptemberEquinox => SeasonPhenomenon::Equinox,
            Season::JuneSolstice | Season::DecemberSolstice => SeasonPhenomenon::Solstice,
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Season::MarchEquinox => "March Equinox",
            Season::JuneSolstice => "June Solstice",
            Season::SeptemberEquinox => "September Equinox",
            Season::DecemberSolstice => "December Solstice",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MoonPhase {
    #[serde(rename = "New Moon")]
    NewMoon,
    #[serde(rename = "First Quarter")]
    FirstQuarter,
    #[serde(rename = "Full Moon")]
    FullMoon,
    #[serde(rename = "Last Quarter")]
    LastQuarter,
}

impl MoonPhase {
    pub const ALL: [MoonPhase; 4] = [
        MoonPhase::NewMoon,
        MoonPhase::FirstQuarter,
        MoonPhase::FullMoon,
        MoonPhase::LastQuarter,
    ];

    /// Moon − Sun ecliptic longitude difference at this phase.
    pub fn elongation(&self) -> Degree {
        match self {
            MoonPhase::NewMoon => 0.0,
            MoonPhase::FirstQuarter => 90.0,
            MoonPhase::FullMoon => 180.0,
            MoonPhase::LastQuarter => 270.0,
        }
    }
}

impl fmt::Display for MoonPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MoonPhase::NewMoon => "New Moon",
            MoonPhase::FirstQuarter => "First Quarter",
            MoonPhase::FullMoon => "Full Moon",
            MoonPhase::LastQuarter => "Last Quarter",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeasonEvent {
    pub phenom: SeasonPhenomenon,
    #[serde(skip)]
    pub season: Season,
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoonPhaseData {
    pub phase: MoonPhase,
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub time: String,
}

/// Apparent geocentric ecliptic longitude of date of `body`, degrees.
///
/// Uses the mean ecliptic of date plus the nutation in longitude.
fn apparent_ecliptic_longitude(
    ephemeris: &dyn Ephemeris,
    body: Body,
    epoch: &Epoch,
) -> Result<Degree, CelestialError> {
    let mjd_tt = epoch.to_mjd_tt_days();
    let apparent = geocentric_apparent(ephemeris, body, epoch)?;
    let to_ecliptic = rotpn(
        &RefSystem::Equm(RefEpoch::J2000),
        &RefSystem::Eclm(RefEpoch::Epoch(mjd_tt)),
    );
    let (lon, _, _) = cartesian_to_radec(to_ecliptic * apparent);
    let (dpsi, _) = nutn80(mjd_tt);
    Ok((lon + dpsi * RADSEC).to_degrees())
}

/// Offset of `angle` from `target`, wrapped to `(−180°, 180°]`.
fn offset_from(angle: Degree, target: Degree) -> Degree {
    wrap_pi((angle - target).to_radians()).to_degrees()
}

/// Equinoxes and solstices of `year` in chronological order.
///
/// Dates and times are UTC shifted by `tz + (dst ? 1 : 0)` hours when `tz` is
/// given.
pub fn earth_seasons(
    ephemeris: &dyn Ephemeris,
    year: i32,
    tz: Option<Hours>,
    dst: bool,
) -> Result<Vec<SeasonEvent>, CelestialError> {
    let offset = crate::time::display_offset(tz, dst)?;
    let start = Epoch::maybe_from_gregorian_utc(year, 1, 1, 0, 0, 0, 0)
        .map_err(|e| CelestialError::MalformedInput(format!("year {year}: {e}")))?;
    let end = Epoch::maybe_from_gregorian_utc(year + 1, 1, 1, 0, 0, 0, 0)
        .map_err(|e| CelestialError::MalformedInput(format!("year {year}: {e}")))?;
    let window = SearchWindow::new(start, end, SEASON_STEP_DAYS * 86_400.0);

    let mut found: Vec<(Epoch, Season)> = Vec::new();
    for season in Season::ALL {
        let target = season.solar_longitude();
        let crossings = find_crossings(&window, Crossing::Rising, |epoch| {
            Ok(offset_from(
                apparent_ecliptic_longitude(ephemeris, Body::Sun, &epoch)?,
                target,
            ))
        })?;
        found.extend(crossings.into_iter().map(|epoch| (epoch, season)));
    }
    found.sort_by(|a, b| a.0.cmp(&b.0));
    debug!("Found {} season events in {year}", found.len());

    Ok(found
        .into_iter()
        .map(|(epoch, season)| {
            let (date, time) = civil_fields(epoch, offset);
            SeasonEvent {
                phenom: season.phenomenon(),
                season,
                year: date.year,
                month: date.month,
                day: date.day,
                time,
            }
        })
        .collect())
}

/// The next `num_phases` principal lunar phases from `date` 00:00 UTC.
///
/// Errors
/// ----------
/// * [`CelestialError::MalformedInput`] unless `1 ≤ num_phases ≤ 99`.
/// * The ephemeris error when the dataset does not cover the Moon.
pub fn moon_phases(
    ephemeris: &dyn Ephemeris,
    date: &CivilDate,
    num_phases: usize,
) -> Result<Vec<MoonPhaseData>, CelestialError> {
    if !(1..=99).contains(&num_phases) {
        return Err(CelestialError::MalformedInput(format!(
            "number of phases must be between 1 and 99, got {num_phases}"
        )));
    }

    let start = date.midnight();
    let days = (num_phases as f64 * DAYS_PER_QUARTER).floor() + 2.0;
    let window = SearchWindow::new(start, start + Unit::Day * days, PHASE_STEP_DAYS * 86_400.0);

    let elongation = |epoch: Epoch| -> Result<Degree, CelestialError> {
        let moon = apparent_ecliptic_longitude(ephemeris, Body::Moon, &epoch)?;
        let sun = apparent_ecliptic_longitude(ephemeris, Body::Sun, &epoch)?;
        Ok(moon - sun)
    };

    let mut found: Vec<(Epoch, MoonPhase)> = Vec::new();
    for phase in MoonPhase::ALL {
        let target = phase.elongation();
        let crossings = find_crossings(&window, Crossing::Rising, |epoch| {
            Ok(offset_from(elongation(epoch)?, target))
        })?;
        found.extend(crossings.into_iter().map(|epoch| (epoch, phase)));
    }
    found.sort_by(|a, b| a.0.cmp(&b.0));

    Ok(found
        .into_iter()
        .take(num_phases)
        .map(|(epoch, phase)| {
            let (date, time) = civil_fields(epoch, None);
            MoonPhaseData {
                phase,
                year: date.year,
                month: date.month,
                day: date.day,
                time,
            }
        })
        .collect())
}

#[cfg(test)]
mod almanac_test {
    use super::*;
    use crate::{
        constants::{AU, DPI, SECONDS_PER_DAY, T2000},
        earth_orientation::obleq,
        jpl_ephem::{standish::StandishEphemeris, EphemState},
        ref_system::rotmt,
    };
    use nalgebra::Vector3;

    /// Sun at the origin, Earth and Moon on circular orbits in the J2000 ecliptic.
    #[derive(Debug)]
    struct CircularMoon;

    const YEAR_DAYS: f64 = 365.256_363;
    const MONTH_DAYS: f64 = 27.321_661;
    const MOON_DISTANCE_KM: f64 = 384_400.0;

    fn circular(radius: f64, period_days: f64, phase0: f64, days: f64) -> (Vector3<f64>, Vector3<f64>) {
        let n = DPI / period_days;
        let angle = phase0 + n * days;
        let ecl_pos = Vector3::new(angle.cos(), angle.sin(), 0.0) * radius;
        let ecl_vel = Vector3::new(-angle.sin(), angle.cos(), 0.0) * radius * n / SECONDS_PER_DAY;
        let to_eq = rotmt(obleq(T2000), 0);
        (to_eq * ecl_pos, to_eq * ecl_vel)
    }

    impl Ephemeris for CircularMoon {
        fn name(&self) -> String {
            "circular".into()
        }

        fn barycentric_state(&self, body: Body, epoch: &Epoch) -> Result<EphemState, CelestialError> {
            let days = epoch.to_et_seconds() / SECONDS_PER_DAY;
            let (earth_pos, earth_vel) = circular(AU, YEAR_DAYS, 0.0, days);
            let (position, velocity) = match body {
                Body::Sun => (Vector3::zeros(), Vector3::zeros()),
                Body::Earth => (earth_pos, earth_vel),
                Body::Moon => {
                    let (p, v) = circular(MOON_DISTANCE_KM, MONTH_DAYS, 1.0, days);
                    (earth_pos + p, earth_vel + v)
                }
                _ => {
                    return Err(CelestialError::BodyNotCovered {
                        body: body.to_string(),
                        dataset: self.name(),
                    })
                }
            };
            Ok(EphemState { position, velocity })
        }
    }

    #[test]
    fn test_offset_from() {
        assert_eq!(offset_from(10.0, 0.0), 10.0);
        assert!((offset_from(350.0, 0.0) + 10.0).abs() < 1e-9);
        assert!((offset_from(100.0, 270.0) - (-170.0)).abs() < 1e-9);
    }

    #[test]
    fn test_seasons_2024() {
        let events = earth_seasons(&StandishEphemeris, 2024, None, false).unwrap();
        let summary: Vec<_> = events
            .iter()
            .map(|e| (e.season, e.month, e.day))
            .collect();
        assert_eq!(
            summary,
            [
                (Season::MarchEquinox, 3, 20),
                (Season::JuneSolstice, 6, 20),
                (Season::SeptemberEquinox, 9, 22),
                (Season::DecemberSolstice, 12, 21),
            ]
        );
        assert_eq!(events[0].phenom, SeasonPhenomenon::Equinox);
        assert_eq!(events[1].phenom, SeasonPhenomenon::Solstice);
        // March equinox 2024 is at 03:06 UTC
        assert!(events[0].time.starts_with("03:"), "{}", events[0].time);
    }

    #[test]
    fn test_seasons_with_offset() {
        // the June solstice 2024 at 20:51 UTC is on June 21 at UTC+5
        let events = earth_seasons(&StandishEphemeris, 2024, Some(4.0), true).unwrap();
        assert_eq!((events[1].month, events[1].day), (6, 21));
    }

    #[test]
    fn test_moon_phases_cycle() {
        let date = CivilDate::parse("2024-01-01").unwrap();
        let phases = moon_phases(&CircularMoon, &date, 8).unwrap();
        assert_eq!(phases.len(), 8);

        // phases follow each other in order
        for pair in phases.windows(2) {
            let current = MoonPhase::ALL.iter().position(|p| *p == pair[0].phase).unwrap();
            assert_eq!(pair[1].phase, MoonPhase::ALL[(current + 1) % 4]);
        }

        // eight quarters span about two synodic months
        let epoch = |p: &MoonPhaseData| {
            let (h, m) = p.time.split_once(':').unwrap();
            Epoch::from_gregorian_utc(p.year, p.month, p.day, h.parse().unwrap(), m.parse().unwrap(), 0, 0)
        };
        let span = (epoch(&phases[7]) - epoch(&phases[0])).to_unit(Unit::Day);
        let synodic = 1.0 / (1.0 / MONTH_DAYS - 1.0 / YEAR_DAYS);
        assert!((span - 7.0 * synodic / 4.0).abs() < 0.05, "span {span}");
    }

    #[test]
    fn test_moon_phases_bounds() {
        let date = CivilDate::parse("2024-01-01").unwrap();
        assert!(matches!(
            moon_phases(&CircularMoon, &date, 0),
            Err(CelestialError::MalformedInput(_))
        ));
        assert!(matches!(
            moon_phases(&CircularMoon, &date, 100),
            Err(CelestialError::MalformedInput(_))
        ));
        // the analytical ephemeris has no Moon
        assert!(matches!(
            moon_phases(&StandishEphemeris, &date, 4),
            Err(CelestialError::BodyNotCovered { .. })
        ));
    }
}
