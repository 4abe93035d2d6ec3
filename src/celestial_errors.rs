use thiserror::Error;

/// Errors surfaced to callers of the planet computation engine.
///
/// Structural failures (unknown planet, malformed date strings, missing
/// dataset) end the request. Enrichment failures never reach this type, they
/// are carried by [`Unavailable`] and replaced by a fallback value.
#[derive(Error, Debug)]
pub enum CelestialError {
    #[error("Unknown planet '{name}'. Valid planets: {valid}")]
    UnknownPlanet { name: String, valid: String },

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Ephemeris unavailable: {0}")]
    EphemerisUnavailable(String),

    #[error("Invalid ephemeris source: {0}")]
    InvalidEphemerisSource(String),

    #[error("Invalid NAIF ephemeris version: {0}")]
    InvalidNaifVersion(String),

    #[error("Body {body} is not covered by the {dataset} ephemeris")]
    BodyNotCovered { body: String, dataset: String },

    #[error("Epoch {epoch} is outside the ephemeris coverage for body {body}")]
    EpochOutOfRange { body: String, epoch: String },

    #[error("Invalid SPK data type: {0}")]
    InvalidSpkDataType(i32),

    #[error("Error during the nom parsing: {0}")]
    NomParsingError(String),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[cfg(feature = "jpl-download")]
    #[error("HTTP reqwest error: {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("Base dir creation error for JPL ephemeris file: {0}")]
    UnableToCreateBaseDir(String),

    #[error("UTF-8 Path error: {0}")]
    Utf8PathError(String),

    #[error("ROOTS finding error: {0}")]
    RootFindingError(#[from] roots::SearchError),

    #[error("Event search failed: {0}")]
    EventSearchFailed(String),
}

impl From<ordered_float::FloatIsNan> for CelestialError {
    fn from(_: ordered_float::FloatIsNan) -> Self {
        CelestialError::MalformedInput("coordinate value is NaN".to_string())
    }
}

impl PartialEq for CelestialError {
    fn eq(&self, other: &Self) -> bool {
        use CelestialError::*;
        match (self, other) {
            (
                UnknownPlanet {
                    name: a,
                    valid: va,
                },
                UnknownPlanet {
                    name: b,
                    valid: vb,
                },
            ) => a == b && va == vb,
            (MalformedInput(a), MalformedInput(b)) => a == b,
            (EphemerisUnavailable(a), EphemerisUnavailable(b)) => a == b,
            (InvalidEphemerisSource(a), InvalidEphemerisSource(b)) => a == b,
            (InvalidNaifVersion(a), InvalidNaifVersion(b)) => a == b,
            (
                BodyNotCovered {
                    body: a,
                    dataset: da,
                },
                BodyNotCovered {
                    body: b,
                    dataset: db,
                },
            ) => a == b && da == db,
            (EpochOutOfRange { body: a, epoch: ea }, EpochOutOfRange { body: b, epoch: eb }) => {
                a == b && ea == eb
            }
            (InvalidSpkDataType(a), InvalidSpkDataType(b)) => a == b,
            (NomParsingError(a), NomParsingError(b)) => a == b,

            // io and http errors carry no comparable payload
            (IoError(_), IoError(_)) => true,
            #[cfg(feature = "jpl-download")]
            (ReqwestError(_), ReqwestError(_)) => true,

            (UnableToCreateBaseDir(a), UnableToCreateBaseDir(b)) => a == b,
            (Utf8PathError(a), Utf8PathError(b)) => a == b,
            (RootFindingError(a), RootFindingError(b)) => a == b,
            (EventSearchFailed(a), EventSearchFailed(b)) => a == b,

            _ => false,
        }
    }
}

/// Marker returned by best-effort computations (magnitude, phase angle,
/// constellation) when no value can be produced.
///
/// Callers consume it explicitly and substitute the documented fallback.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{what} unavailable: {reason}")]
pub struct Unavailable {
    pub what: &'static str,
    pub reason: String,
}

impl Unavailable {
    pub fn new(what: &'static str, reason: impl Into<String>) -> Self {
        Unavailable {
            what,
            reason: reason.into(),
        }
    }
}

/// Result of a best-effort enrichment.
pub type BestEffort<T> = Result<T, Unavailable>;
