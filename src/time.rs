//! # Civil time handling
//!
//! Parsing of the `YYYY-M-D` / `HH:MM` strings accepted by the public
//! operations, conversion of civil tuples into [`hifitime::Epoch`], UTC offset
//! handling and the clock formatting used for event times.
//!
//! Everything downstream of the facade works on UTC epochs. Offsets are
//! applied on the way in (local → UTC for position queries) and on the way
//! out (UTC → local for event clock strings), never in between.
use hifitime::{Epoch, Unit};
use nom::{
    bytes::complete::{tag, take_while_m_n},
    character::complete::{char, digit1},
    combinator::{eof, map_res, opt, recognize},
    IResult, Parser,
};

use crate::{
    celestial_errors::CelestialError,
    constants::{Hours, DPI, MJD, SIDEREAL_RATE, T2000},
};

/// A calendar date as given by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CivilDate {
    pub year: i32,
    pub month: u8,
    pub day: u8,
}

/// A wall-clock time (minutes resolution).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTime {
    pub hour: u8,
    pub minute: u8,
}

fn one_or_two_digits(input: &str) -> IResult<&str, u8> {
    map_res(take_while_m_n(1, 2, |c: char| c.is_ascii_digit()), str::parse::<u8>).parse(input)
}

fn signed_year(input: &str) -> IResult<&str, i32> {
    map_res(recognize((opt(char('-')), digit1)), str::parse::<i32>).parse(input)
}

fn date_parser(input: &str) -> IResult<&str, (i32, u8, u8)> {
    let (input, (year, _, month, _, day, _)) = (
        signed_year,
        tag("-"),
        one_or_two_digits,
        tag("-"),
        one_or_two_digits,
        eof,
    )
        .parse(input)?;
    Ok((input, (year, month, day)))
}

fn clock_parser(input: &str) -> IResult<&str, (u8, u8)> {
    let (input, (hour, _, minute, _)) =
        (one_or_two_digits, tag(":"), one_or_two_digits, eof).parse(input)?;
    Ok((input, (hour, minute)))
}

impl CivilDate {
    /// Parse a `YYYY-M-D` date; month and day may be unpadded.
    pub fn parse(input: &str) -> Result<Self, CelestialError> {
        let (_, (year, month, day)) = date_parser(input.trim()).map_err(|_| {
            CelestialError::MalformedInput(format!("date '{input}' is not in YYYY-MM-DD format"))
        })?;

        Epoch::maybe_from_gregorian_utc(year, month, day, 0, 0, 0, 0).map_err(|e| {
            CelestialError::MalformedInput(format!("date '{input}' is not a valid day: {e}"))
        })?;

        Ok(CivilDate { year, month, day })
    }

    /// UTC epoch at the given clock time of this date.
    pub fn at(&self, time: ClockTime) -> Epoch {
        Epoch::from_gregorian_utc(
            self.year,
            self.month,
            self.day,
            time.hour,
            time.minute,
            0,
            0,
        )
    }

    pub fn midnight(&self) -> Epoch {
        Epoch::from_gregorian_utc_at_midnight(self.year, self.month, self.day)
    }

    pub fn noon(&self) -> Epoch {
        Epoch::from_gregorian_utc_at_noon(self.year, self.month, self.day)
    }

    /// The UTC calendar day `[date 00:00, date+1 00:00)`.
    pub fn utc_window(&self) -> (Epoch, Epoch) {
        let start = self.midnight();
        (start, start + Unit::Day * 1)
    }
}

impl ClockTime {
    /// Parse an `HH:MM` clock time (24-hour, hour may be unpadded).
    pub fn parse(input: &str) -> Result<Self, CelestialError> {
        let malformed =
            || CelestialError::MalformedInput(format!("time '{input}' is not in HH:MM format"));

        let (_, (hour, minute)) = clock_parser(input.trim()).map_err(|_| malformed())?;
        if hour > 23 || minute > 59 {
            return Err(malformed());
        }
        Ok(ClockTime { hour, minute })
    }
}

/// Largest accepted distance of a clock offset from UTC, hours.
pub const MAX_UTC_OFFSET: Hours = 24.0;

/// Reject offsets that are not finite or lie beyond [`MAX_UTC_OFFSET`].
pub fn check_offset(tz_offset: Option<Hours>) -> Result<Option<Hours>, CelestialError> {
    match tz_offset {
        Some(offset) if !(offset.is_finite() && offset.abs() <= MAX_UTC_OFFSET) => {
            Err(CelestialError::MalformedInput(format!(
                "timezone offset {offset} h is outside ±{MAX_UTC_OFFSET} h"
            )))
        }
        _ => Ok(tz_offset),
    }
}

/// Convert a local civil instant to UTC by removing the offset.
pub fn local_to_utc(local: Epoch, tz_offset: Option<Hours>) -> Result<Epoch, CelestialError> {
    Ok(match check_offset(tz_offset)? {
        Some(offset) => local - Unit::Hour * offset,
        None => local,
    })
}

/// Total display offset for event times: `tz + 1` when daylight saving applies.
pub fn display_offset(
    tz_offset: Option<Hours>,
    dst: bool,
) -> Result<Option<Hours>, CelestialError> {
    Ok(check_offset(tz_offset)?.map(|offset| offset + if dst { 1.0 } else { 0.0 }))
}

/// Shift a UTC instant by `offset` hours, for display only.
pub fn utc_to_local(utc: Epoch, offset: Option<Hours>) -> Epoch {
    match offset {
        Some(offset) => utc + Unit::Hour * offset,
        None => utc,
    }
}

/// Format a UTC instant as `HH:MM` after shifting it by `offset` hours.
///
/// Seconds are truncated, not rounded.
pub fn format_clock(utc: Epoch, offset: Option<Hours>) -> String {
    let (_, _, _, hour, minute, _, _) = utc_to_local(utc, offset).to_gregorian_utc();
    format!("{hour:02}:{minute:02}")
}

/// Calendar date and `HH:MM` clock of a UTC instant shifted by `offset` hours.
pub fn civil_fields(utc: Epoch, offset: Option<Hours>) -> (CivilDate, String) {
    let (year, month, day, hour, minute, _, _) = utc_to_local(utc, offset).to_gregorian_utc();
    (
        CivilDate { year, month, day },
        format!("{hour:02}:{minute:02}"),
    )
}

/// Compute the Greenwich Mean Sidereal Time (GMST) in radians
/// for a given Modified Julian Date (UT1 time scale).
///
/// This function implements the IAU 1982 polynomial formula
/// for the mean sidereal time at 0h UT1, plus the fractional-day
/// correction term due to Earth's rotation rate.
///
/// # Arguments
/// * `tjm` - Modified Julian Date (MJD, UT1 time scale)
///
/// # Returns
/// * GMST angle in radians, normalized to the interval [0, 2π).
///
/// # References
/// * IAU 1982, IERS Conventions 1996/2000.
/// * Explanatory Supplement to the Astronomical Almanac (1992).
pub fn gmst(tjm: MJD) -> f64 {
    // Polynomial coefficients for GMST at 0h UT1 (in seconds)
    const C0: f64 = 24110.54841;
    const C1: f64 = 8640184.812866;
    const C2: f64 = 9.3104e-2;
    const C3: f64 = -6.2e-6;

    let itjm = tjm.floor();
    let t = (itjm - T2000) / 36525.0;

    let mut gmst0 = ((C3 * t + C2) * t + C1) * t + C0;
    gmst0 *= DPI / 86400.0;

    // fraction of the UT1 day, run at the sidereal rate
    let h = (tjm - itjm) * DPI;
    (gmst0 + h * SIDEREAL_RATE).rem_euclid(DPI)
}

#[cfg(test)]
mod time_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            CivilDate::parse("2024-1-5").unwrap(),
            CivilDate {
                year: 2024,
                month: 1,
                day: 5
            }
        );
        assert_eq!(
            CivilDate::parse("2024-03-15").unwrap(),
            CivilDate {
                year: 2024,
                month: 3,
                day: 15
            }
        );
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        for bad in ["2024-13-01", "2024/01/01", "2024-02-30", "tomorrow", "2024-1-", ""] {
            assert!(
                matches!(CivilDate::parse(bad), Err(CelestialError::MalformedInput(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_time() {
        assert_eq!(
            ClockTime::parse("22:00").unwrap(),
            ClockTime {
                hour: 22,
                minute: 0
            }
        );
        assert_eq!(
            ClockTime::parse("7:05").unwrap(),
            ClockTime { hour: 7, minute: 5 }
        );
        for bad in ["25:00", "12:60", "1200", "12:00:00", "noon"] {
            assert!(ClockTime::parse(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_local_to_utc() {
        let date = CivilDate::parse("2024-03-15").unwrap();
        let local = date.at(ClockTime::parse("22:00").unwrap());
        let utc = local_to_utc(local, Some(-5.0)).unwrap();
        assert_eq!(utc, Epoch::from_gregorian_utc(2024, 3, 16, 3, 0, 0, 0));
        assert_eq!(local_to_utc(local, None).unwrap(), local);
        assert_eq!(
            local_to_utc(local, Some(-24.0)).unwrap(),
            Epoch::from_gregorian_utc(2024, 3, 16, 22, 0, 0, 0)
        );
    }

    #[test]
    fn test_offset_bounds() {
        let local = Epoch::from_gregorian_utc(2024, 3, 15, 22, 0, 0, 0);
        for bad in [f64::NAN, f64::INFINITY, -f64::INFINITY, 1e18, -1e300, 24.5] {
            assert!(
                matches!(
                    local_to_utc(local, Some(bad)),
                    Err(CelestialError::MalformedInput(_))
                ),
                "{bad}"
            );
            assert!(display_offset(Some(bad), false).is_err(), "{bad}");
        }
        assert_eq!(check_offset(Some(14.0)).unwrap(), Some(14.0));
        assert_eq!(check_offset(None).unwrap(), None);
    }

    #[test]
    fn test_format_clock() {
        let t = Epoch::from_gregorian_utc(2024, 3, 15, 23, 41, 59, 900_000_000);
        assert_eq!(format_clock(t, None), "23:41");
        assert_eq!(format_clock(t, Some(-5.0)), "18:41");
        // shifting past midnight wraps the clock string
        assert_eq!(format_clock(t, Some(1.0)), "00:41");
        assert_eq!(format_clock(t, Some(5.5)), "05:11");
    }

    #[test]
    fn test_civil_fields_cross_midnight() {
        let t = Epoch::from_gregorian_utc(2024, 12, 31, 22, 15, 0, 0);
        let (date, clock) = civil_fields(t, Some(3.0));
        assert_eq!(
            date,
            CivilDate {
                year: 2025,
                month: 1,
                day: 1
            }
        );
        assert_eq!(clock, "01:15");
    }

    #[test]
    fn test_display_offset() {
        assert_eq!(display_offset(Some(-5.0), true).unwrap(), Some(-4.0));
        assert_eq!(display_offset(Some(-5.0), false).unwrap(), Some(-5.0));
        assert_eq!(display_offset(None, true).unwrap(), None);
    }

    #[test]
    fn test_utc_window() {
        let date = CivilDate::parse("2024-12-31").unwrap();
        let (start, end) = date.utc_window();
        assert_eq!(start, Epoch::from_gregorian_utc_at_midnight(2024, 12, 31));
        assert_eq!(end, Epoch::from_gregorian_utc_at_midnight(2025, 1, 1));
    }

    #[test]
    fn test_gmst() {
        let tut = 57028.478514610404;
        assert_relative_eq!(gmst(tut), 4.851925725092499, epsilon = 1e-9);

        assert_relative_eq!(gmst(T2000), 4.894961212789145, epsilon = 1e-9);
    }
}
