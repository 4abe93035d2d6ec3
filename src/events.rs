//! # Daily event search
//!
//! Rise, set and upper-transit instants of a body over one UTC calendar day.
//!
//! ## Method
//!
//! Each event kind is the zero crossing of a scalar function of time, in a
//! given direction:
//!
//! | Event         | Function                                  | Crossing |
//! |---------------|-------------------------------------------|----------|
//! | Rise          | apparent altitude − horizon               | − → +    |
//! | Set           | apparent altitude − horizon               | + → −    |
//! | Upper transit | local hour angle, wrapped to (−180°, 180°] | − → +    |
//!
//! The horizon sits at [`RISE_SET_HORIZON_DEG`] to account for standard
//! refraction. The window is sampled every [`EVENT_SEARCH_STEP_MINUTES`] and
//! each bracketing pair is refined with Brent's method. A body that stays
//! above or below the horizon all day simply produces no rise or set.
//!
//! The three searches are independent: a failure in one is logged and the
//! others still contribute.
use std::fmt;

use hifitime::{Epoch, Unit};
use roots::{find_root_brent, SimpleConvergency};
use serde::Serialize;
use tracing::debug;

use crate::{
    celestial_errors::CelestialError,
    constants::{Hours, EVENT_SEARCH_STEP_MINUTES, RISE_SET_HORIZON_DEG},
    geometry::Observatory,
    planet::Body,
    time::format_clock,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Phenomenon {
    Rise,
    Set,
    #[serde(rename = "Upper Transit")]
    UpperTransit,
}

impl fmt::Display for Phenomenon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phenomenon::Rise => "Rise",
            Phenomenon::Set => "Set",
            Phenomenon::UpperTransit => "Upper Transit",
        };
        f.write_str(s)
    }
}

/// An event as reported to callers: phenomenon and `HH:MM` clock time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventOccurrence {
    pub phen: Phenomenon,
    pub time: String,
}

/// An event instant before formatting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoundEvent {
    pub phen: Phenomenon,
    pub epoch: Epoch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crossing {
    /// From negative to non-negative.
    Rising,
    /// From non-negative to negative.
    Falling,
}

impl Crossing {
    fn brackets(&self, before: f64, after: f64) -> bool {
        match self {
            Crossing::Rising => before < 0.0 && after >= 0.0,
            Crossing::Falling => before >= 0.0 && after < 0.0,
        }
    }
}

/// A half-open time interval `[start, end)` scanned on a regular grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchWindow {
    pub start: Epoch,
    pub end: Epoch,
    pub step_seconds: f64,
}

impl SearchWindow {
    pub fn new(start: Epoch, end: Epoch, step_seconds: f64) -> Self {
        SearchWindow {
            start,
            end,
            step_seconds,
        }
    }

    /// Window of a UTC day sampled at the event search step.
    pub fn daily(start: Epoch, end: Epoch) -> Self {
        SearchWindow::new(start, end, EVENT_SEARCH_STEP_MINUTES * 60.0)
    }

    fn span_seconds(&self) -> f64 {
        (self.end - self.start).to_seconds()
    }

    fn epoch_at(&self, offset_seconds: f64) -> Epoch {
        self.start + Unit::Second * offset_seconds
    }

    /// Sample offsets in seconds, including the window end.
    fn grid(&self) -> Vec<f64> {
        let span = self.span_seconds();
        if !(span > 0.0 && self.step_seconds > 0.0) {
            return Vec::new();
        }
        let n = (span / self.step_seconds).ceil() as usize;
        (0..=n)
            .map(|i| (i as f64 * self.step_seconds).min(span))
            .collect()
    }
}

/// Instants in `window` where `f` crosses zero in `direction`.
///
/// `f` is sampled on the window grid; every bracketing pair is refined with
/// Brent's method to well below a second. Roots falling exactly on the window
/// end are excluded.
///
/// Errors
/// ----------
/// * The first error returned by `f`.
/// * [`CelestialError::RootFindingError`] if Brent's method does not converge.
pub fn find_crossings<F>(
    window: &SearchWindow,
    direction: Crossing,
    mut f: F,
) -> Result<Vec<Epoch>, CelestialError>
where
    F: FnMut(Epoch) -> Result<f64, CelestialError>,
{
    let grid = window.grid();
    let samples = grid
        .iter()
        .map(|&t| f(window.epoch_at(t)))
        .collect::<Result<Vec<_>, _>>()?;

    let span = window.span_seconds();
    let mut found = Vec::new();

    for (i, pair) in samples.windows(2).enumerate() {
        if !direction.brackets(pair[0], pair[1]) {
            continue;
        }

        let mut failure = None;
        let mut tol = SimpleConvergency {
            eps: 1e-4,
            max_iter: 100,
        };
        let root = find_root_brent(
            grid[i],
            grid[i + 1],
            |t: f64| match f(window.epoch_at(t)) {
                Ok(value) => value,
                Err(err) => {
                    if failure.is_none() {
                        failure = Some(err);
                    }
                    0.0
                }
            },
            &mut tol,
        );
        if let Some(err) = failure {
            return Err(err);
        }
        let root = root?;

        if root < span {
            found.push(window.epoch_at(root));
        }
    }
    Ok(found)
}

fn rise_set(
    observatory: &Observatory,
    body: Body,
    window: &SearchWindow,
    direction: Crossing,
) -> Result<Vec<Epoch>, CelestialError> {
    find_crossings(window, direction, |epoch| {
        Ok(observatory.altitude(body, epoch)? - RISE_SET_HORIZON_DEG)
    })
}

fn upper_transits(
    observatory: &Observatory,
    body: Body,
    window: &SearchWindow,
) -> Result<Vec<Epoch>, CelestialError> {
    find_crossings(window, Crossing::Rising, |epoch| {
        observatory.body_hour_angle(body, epoch)
    })
}

/// Rise, set and upper-transit instants of `body` in `window`.
///
/// Results come in discovery order: all rises, then sets, then transits.
pub fn find_events(
    observatory: &Observatory,
    body: Body,
    window: &SearchWindow,
) -> Vec<FoundEvent> {
    let searches: [(Phenomenon, Result<Vec<Epoch>, CelestialError>); 3] = [
        (
            Phenomenon::Rise,
            rise_set(observatory, body, window, Crossing::Rising),
        ),
        (
            Phenomenon::Set,
            rise_set(observatory, body, window, Crossing::Falling),
        ),
        (
            Phenomenon::UpperTransit,
            upper_transits(observatory, body, window),
        ),
    ];

    let mut events = Vec::new();
    for (phen, result) in searches {
        match result {
            Ok(epochs) => {
                events.extend(epochs.into_iter().map(|epoch| FoundEvent { phen, epoch }))
            }
            Err(err) => debug!("No {phen} found for {body}: {err}"),
        }
    }
    events
}

/// Format event instants as `HH:MM` after shifting by `offset` hours, then
/// order them by the formatted string.
///
/// The sort is stable and lexicographic on the clock strings, so an event
/// pushed past midnight by the offset sorts before the others of the day.
pub fn format_events(events: &[FoundEvent], offset: Option<Hours>) -> Vec<EventOccurrence> {
    let mut formatted: Vec<EventOccurrence> = events
        .iter()
        .map(|event| EventOccurrence {
            phen: event.phen,
            time: format_clock(event.epoch, offset),
        })
        .collect();
    formatted.sort_by(|a, b| a.time.cmp(&b.time));
    formatted
}

#[cfg(test)]
mod events_test {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn day() -> SearchWindow {
        SearchWindow::daily(
            Epoch::from_gregorian_utc_at_midnight(2024, 3, 15),
            Epoch::from_gregorian_utc_at_midnight(2024, 3, 16),
        )
    }

    /// Seconds since the window start.
    fn offset(epoch: Epoch) -> f64 {
        (epoch - day().start).to_seconds()
    }

    #[test]
    fn test_grid_covers_window() {
        let grid = day().grid();
        assert_eq!(grid.len(), 145);
        assert_eq!(grid[0], 0.0);
        assert_eq!(*grid.last().unwrap(), 86_400.0);
    }

    #[test]
    fn test_sine_crossings() {
        // period 12 h, zero at 0 h (rising), 6 h (falling), 12 h, 18 h
        let w = day();
        let f = |e: Epoch| -> Result<f64, CelestialError> {
            Ok((offset(e) / 43_200.0 * std::f64::consts::TAU).sin() - 0.5)
        };
        let rising = find_crossings(&w, Crossing::Rising, f).unwrap();
        let falling = find_crossings(&w, Crossing::Falling, f).unwrap();

        // sin = 0.5 at 1 h and 5 h of each 12 h cycle
        assert_eq!(rising.len(), 2);
        assert_eq!(falling.len(), 2);
        assert_abs_diff_eq!(offset(rising[0]), 3_600.0, epsilon = 2.0);
        assert_abs_diff_eq!(offset(falling[0]), 18_000.0, epsilon = 2.0);
        assert_abs_diff_eq!(offset(rising[1]), 46_800.0, epsilon = 2.0);
    }

    #[test]
    fn test_no_crossing_when_always_positive() {
        let found = find_crossings(&day(), Crossing::Rising, |_| Ok(10.0)).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_root_on_grid_point_counted_once() {
        let w = day();
        let found = find_crossings(&w, Crossing::Rising, |e| Ok(offset(e) - 600.0)).unwrap();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_wrapped_angle_only_counts_upward_zero() {
        // an hour angle running through a full turn: one upward zero, one wrap jump
        let w = day();
        let f = |e: Epoch| -> Result<f64, CelestialError> {
            let ha = (offset(e) / 86_400.0 * 360.0 - 90.0 + 180.0).rem_euclid(360.0) - 180.0;
            Ok(ha)
        };
        let found = find_crossings(&w, Crossing::Rising, f).unwrap();
        assert_eq!(found.len(), 1);
        assert_abs_diff_eq!(offset(found[0]), 21_600.0, epsilon = 1.0);
    }

    #[test]
    fn test_errors_propagate() {
        let err = find_crossings(&day(), Crossing::Rising, |_| {
            Err(CelestialError::EventSearchFailed("boom".into()))
        })
        .unwrap_err();
        assert_eq!(err, CelestialError::EventSearchFailed("boom".into()));
    }

    #[test]
    fn test_format_events_sorted_by_clock_string() {
        let start = day().start;
        let events = [
            FoundEvent {
                phen: Phenomenon::Rise,
                epoch: start + Unit::Hour * 23.5,
            },
            FoundEvent {
                phen: Phenomenon::Set,
                epoch: start + Unit::Hour * 10.0,
            },
            FoundEvent {
                phen: Phenomenon::UpperTransit,
                epoch: start + Unit::Hour * 4.75,
            },
        ];

        let utc = format_events(&events, None);
        let times: Vec<_> = utc.iter().map(|e| e.time.as_str()).collect();
        assert_eq!(times, ["04:45", "10:00", "23:30"]);
        assert_eq!(utc[0].phen, Phenomenon::UpperTransit);

        // +2 h moves the rise past midnight, it then sorts first
        let shifted = format_events(&events, Some(2.0));
        assert_eq!(shifted[0].phen, Phenomenon::Rise);
        assert_eq!(shifted[0].time, "01:30");
    }

    #[test]
    fn test_phenomenon_labels() {
        assert_eq!(Phenomenon::UpperTransit.to_string(), "Upper Transit");
        assert_eq!(
            serde_json::to_string(&EventOccurrence {
                phen: Phenomenon::UpperTransit,
                time: "12:00".into()
            })
            .unwrap(),
            r#"{"phen":"Upper Transit","time":"12:00"}"#
        );
    }
}
