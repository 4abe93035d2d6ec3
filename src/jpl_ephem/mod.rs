//! # Ephemeris access
//!
//! The [`Ephemeris`] trait is the seam between geometry and data: given a
//! [`Body`] and an epoch it returns the barycentric state in ICRF-aligned
//! axes. [`JPLEphem`] is the implementation selected by the configured source
//! string:
//!
//! | Source              | Backend                                   |
//! |---------------------|-------------------------------------------|
//! | `naif:DE440s`       | NAIF kernel from the cache (or downloaded) |
//! | `naif:/path/x.bsp`  | NAIF kernel at an explicit path            |
//! | `standish`          | analytical mean elements, no file          |
use std::fmt;

use hifitime::Epoch;
use nalgebra::Vector3;

use crate::{celestial_errors::CelestialError, config::CelestialConfig, planet::Body};

use download_jpl_file::{EphemFilePath, EphemFileSource};
use naif::naif_data::NaifData;
use standish::StandishEphemeris;

pub mod download_jpl_file;
pub mod naif;
pub mod standish;

/// Barycentric state: position in km, velocity in km/s.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EphemState {
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
}

/// Source of barycentric body states.
pub trait Ephemeris: fmt::Debug + Send + Sync {
    /// Dataset label used in logs and errors.
    fn name(&self) -> String;

    /// State of `body` relative to the solar system barycenter at `epoch` (TDB).
    fn barycentric_state(&self, body: Body, epoch: &Epoch) -> Result<EphemState, CelestialError>;
}

#[derive(Debug, Clone)]
pub enum JPLEphem {
    NaifFile(NaifData),
    Standish(StandishEphemeris),
}

impl JPLEphem {
    /// Open the dataset described by `file_source`, downloading it if the
    /// configuration allows.
    pub fn new(
        file_source: &EphemFileSource,
        config: &CelestialConfig,
    ) -> Result<Self, CelestialError> {
        match file_source {
            EphemFileSource::Standish => Ok(JPLEphem::Standish(StandishEphemeris)),
            EphemFileSource::Naif(_) | EphemFileSource::NaifPath(_) => {
                let file_path = EphemFilePath::get_ephemeris_file(file_source, config)?;
                Ok(JPLEphem::NaifFile(NaifData::read_naif_file(
                    file_path.path(),
                )?))
            }
        }
    }
}

impl Ephemeris for JPLEphem {
    fn name(&self) -> String {
        match self {
            JPLEphem::NaifFile(naif_data) => naif_data.name().to_string(),
            JPLEphem::Standish(standish) => standish.name(),
        }
    }

    fn barycentric_state(&self, body: Body, epoch: &Epoch) -> Result<EphemState, CelestialError> {
        match self {
            JPLEphem::NaifFile(naif_data) => {
                let (position, velocity) = naif_data
                    .barycentric_state(body.naif_id(), epoch.to_et_seconds())
                    .map_err(|err| match err {
                        CelestialError::BodyNotCovered { dataset, .. } => {
                            CelestialError::BodyNotCovered {
                                body: body.to_string(),
                                dataset,
                            }
                        }
                        CelestialError::EpochOutOfRange { .. } => {
                            CelestialError::EpochOutOfRange {
                                body: body.to_string(),
                                epoch: epoch.to_string(),
                            }
                        }
                        other => other,
                    })?;
                Ok(EphemState { position, velocity })
            }
            JPLEphem::Standish(standish) => standish.barycentric_state(body, epoch),
        }
    }
}
