//! # Constants and type definitions
//!
//! Physical constants, unit conversion factors and the small set of type
//! aliases shared by the ephemeris, geometry and photometry modules.
//!
//! ## Overview
//!
//! - Astronomical and geophysical constants
//! - Unit conversions (degrees ↔ radians, days ↔ seconds, AU ↔ km)
//! - Core type aliases used across the crate
//! - Horizon and search-grid settings used by the event finders

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Number of seconds in a Julian day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Astronomical Unit in kilometers (IAU 2012)
pub const AU: f64 = 149_597_870.7;

/// MJD epoch of J2000.0 (2000-01-01 12:00:00 TT)
pub const T2000: f64 = 51544.5;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Arcseconds → radians
pub const RADSEC: f64 = std::f64::consts::PI / 648000.0;

/// Earth equatorial radius in meters (GRS1980/WGS84)
pub const EARTH_MAJOR_AXIS: f64 = 6_378_137.0;

/// Earth polar radius in meters (GRS1980/WGS84)
pub const EARTH_MINOR_AXIS: f64 = 6_356_752.3;

/// Earth equatorial radius in kilometers
pub const EARTH_RADIUS_KM: f64 = EARTH_MAJOR_AXIS / 1000.;

/// Ratio of sidereal day to solar day
pub const SIDEREAL_RATE: f64 = 1.00273790934;

/// Speed of light in km/s
pub const VLIGHT: f64 = 2.99792458e5;

/// Mean obliquity of the ecliptic at J2000 (IAU 1976), in degrees
pub const OBLIQUITY_J2000_DEG: f64 = 23.439_291_111_111_11;

// -------------------------------------------------------------------------------------------------
// Observation settings
// -------------------------------------------------------------------------------------------------

/// Altitude of the horizon used for rise/set crossings: standard refraction
/// of 34 arcminutes for a point-like body.
pub const RISE_SET_HORIZON_DEG: f64 = -0.5667;

/// Sampling step of the daily event search, in minutes
pub const EVENT_SEARCH_STEP_MINUTES: f64 = 10.0;

/// Number of light-time iterations for apparent positions
pub const LIGHT_TIME_ITERATIONS: usize = 3;

/// Sentinel used when the constellation cannot be resolved
pub const CONSTELLATION_UNAVAILABLE: &str = "N/A";

/// API version tag attached to serialized responses
pub const API_VERSION: &str = "1.0";

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in arcseconds
pub type ArcSec = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in kilometers
pub type Kilometer = f64;
/// Distance in meters
pub type Meter = f64;
/// Distance in astronomical units
pub type AstronomicalUnit = f64;
/// Signed offset from UTC in hours
pub type Hours = f64;

/// Modified Julian Date (days)
pub type MJD = f64;
