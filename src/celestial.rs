//! # Celestial: the planet computation context
//!
//! [`Celestial`] is the façade the public operations hang off. It wires
//! together:
//!
//! 1. **Configuration** ([`CelestialConfig`]): ephemeris source, kernel cache,
//!    download policy and UT1 handling.
//! 2. **Environment state** ([`CelestialEnv`]): the optional UT1 provider.
//! 3. **Ephemeris access**: a lazily opened, process-lifetime dataset behind
//!    [`OnceCell`], loaded on the first query and shared afterwards.
//!
//! The context is built once and passed by reference. Queries never mutate
//! it beyond the one-time ephemeris fill, so a shared `&Celestial` can serve
//! concurrent callers.
//!
//! ## Failure policy
//!
//! Unknown planets, malformed date/time strings and a missing dataset end the
//! query with a [`CelestialError`]. Magnitude, phase angle and constellation
//! are best-effort: a failure is logged at debug level and replaced by its
//! fallback (distance-only magnitude, `180° − elongation`, `"N/A"`).
//!
//! ## Typical usage
//!
//! ```rust, no_run
//! use celestial::{celestial::Celestial, config::CelestialConfig};
//!
//! let celestial = Celestial::new(CelestialConfig::from_env());
//!
//! let position = celestial
//!     .get_planet_position("Jupiter", "2024-3-15", "21:30", 48.85, 2.35, Some(1.0))
//!     .unwrap();
//! println!("{}", serde_json::to_string_pretty(&position).unwrap());
//!
//! let events = celestial
//!     .get_planet_events("Mars", "2024-3-15", 48.85, 2.35, Some(1.0), false)
//!     .unwrap();
//! for event in &events.data().events {
//!     println!("{} {}", event.time, event.phen);
//! }
//! ```
use std::sync::Arc;

use hifitime::Epoch;
use nalgebra::Vector3;
use once_cell::sync::OnceCell;
use tracing::{debug, info};

use crate::{
    almanac::{earth_seasons, moon_phases},
    celestial_errors::{BestEffort, CelestialError},
    config::CelestialConfig,
    constants::{Degree, Hours, AU, CONSTELLATION_UNAVAILABLE},
    constellation::constellation_at,
    env_state::CelestialEnv,
    events::{find_events, format_events, SearchWindow},
    geometry::{
        equatorial, format_dec, format_ra, round_azimuth, round_to, separation, Observatory,
        Sighting,
    },
    jpl_ephem::{download_jpl_file::EphemFileSource, Ephemeris, JPLEphem},
    models::{
        Feature, MoonPhasesResponse, PlanetEventsData, PlanetEventsResponse, PlanetPositionData,
        PlanetPositionResponse, SeasonsResponse,
    },
    observers::ObserverLocation,
    photometry::{
        fallback_magnitude, illumination, phase_angle, phase_angle_from_elongation,
        planetary_magnitude, SubLatitudes, Visibility,
    },
    planet::{Body, Planet},
    time::{display_offset, local_to_utc, CivilDate, ClockTime},
};

#[derive(Debug, Clone)]
pub struct Celestial {
    config: CelestialConfig,
    env_state: CelestialEnv,
    ephemeris: OnceCell<Arc<dyn Ephemeris>>,
}

impl Celestial {
    /// Build a context from `config`. No file is opened until the first query.
    pub fn new(config: CelestialConfig) -> Self {
        Celestial {
            env_state: CelestialEnv::new(config.use_jpl_ut1),
            config,
            ephemeris: OnceCell::new(),
        }
    }

    /// Build a context around an already loaded ephemeris.
    pub fn with_ephemeris(config: CelestialConfig, ephemeris: Arc<dyn Ephemeris>) -> Self {
        Celestial {
            env_state: CelestialEnv::new(config.use_jpl_ut1),
            config,
            ephemeris: OnceCell::with_value(ephemeris),
        }
    }

    pub fn config(&self) -> &CelestialConfig {
        &self.config
    }

    pub fn env_state(&self) -> &CelestialEnv {
        &self.env_state
    }

    /// The ephemeris dataset, opened on first call and cached afterwards.
    ///
    /// Errors
    /// ----------
    /// * [`CelestialError::InvalidEphemerisSource`] for an unparsable source string.
    /// * [`CelestialError::EphemerisUnavailable`] when the dataset cannot be
    ///   found, downloaded or read.
    pub fn get_jpl_ephem(&self) -> Result<&Arc<dyn Ephemeris>, CelestialError> {
        self.ephemeris.get_or_try_init(|| {
            let source = EphemFileSource::try_from(self.config.ephemeris.as_str())?;
            let ephem = JPLEphem::new(&source, &self.config).map_err(|err| match err {
                err @ CelestialError::EphemerisUnavailable(_) => err,
                other => CelestialError::EphemerisUnavailable(format!(
                    "cannot load '{}': {other}",
                    self.config.ephemeris
                )),
            })?;
            info!("Loaded {} ephemeris", ephem.name());
            Ok(Arc::new(ephem) as Arc<dyn Ephemeris>)
        })
    }

    /// Position and observing conditions of `planet` seen from a sea-level site.
    ///
    /// Arguments
    /// -----------------
    /// * `planet`: planet name, case-insensitive.
    /// * `date`: `YYYY-M-D`, local when `tz` is given, UTC otherwise.
    /// * `time`: `HH:MM`, same convention as `date`.
    /// * `latitude`, `longitude`: geodetic degrees, east positive.
    /// * `tz`: signed offset of the local clock from UTC, hours.
    pub fn get_planet_position(
        &self,
        planet: &str,
        date: &str,
        time: &str,
        latitude: Degree,
        longitude: Degree,
        tz: Option<Hours>,
    ) -> Result<PlanetPositionResponse, CelestialError> {
        let site = ObserverLocation::at_sea_level(latitude, longitude)?;
        let data = self.planet_position_at(planet, date, time, &site, tz)?;
        Ok(Feature::new(latitude, longitude, data))
    }

    /// [`Celestial::get_planet_position`] for an arbitrary site, height included.
    pub fn planet_position_at(
        &self,
        planet: &str,
        date: &str,
        time: &str,
        site: &ObserverLocation,
        tz: Option<Hours>,
    ) -> Result<PlanetPositionData, CelestialError> {
        let planet: Planet = planet.parse()?;
        let civil_date = CivilDate::parse(date)?;
        let clock = ClockTime::parse(time)?;
        let utc = local_to_utc(civil_date.at(clock), tz)?;

        let ephemeris = self.get_jpl_ephem()?;
        let observatory = Observatory::new(ephemeris.as_ref(), &self.env_state, site);
        let snapshot = observatory.snapshot(utc)?;
        let sighting = observatory.observe(&snapshot, planet.body())?;
        let sun = observatory.observe(&snapshot, Body::Sun)?;

        let horizontal = observatory.horizontal(&snapshot, &sighting.apparent);
        let altitude = round_to(horizontal.altitude, 2);
        let azimuth = round_azimuth(horizontal.azimuth);

        let distance_km = sighting.apparent.norm();
        let distance_au = round_to(distance_km / AU, 6);
        let (ra_hours, dec_deg) = equatorial(&sighting.apparent);
        let elongation = round_to(separation(&sun.apparent, &sighting.apparent), 1);

        let to_sun = sun_from_body(ephemeris.as_ref(), planet.body(), &utc)?;
        let phase = phase_angle(&-sighting.astrometric, &to_sun).unwrap_or_else(|unavailable| {
            debug!("{planet}: {unavailable}, using 180° - elongation");
            phase_angle_from_elongation(elongation)
        });

        let sun_distance_au = to_sun.norm() / AU;
        let magnitude = precise_magnitude(planet, &sighting, &to_sun, phase)
            .unwrap_or_else(|unavailable| {
                debug!("{planet}: {unavailable}, using the distance-only estimate");
                fallback_magnitude(planet.absolute_magnitude(), distance_au, sun_distance_au)
            });

        Ok(PlanetPositionData {
            planet,
            date: date.to_string(),
            time: time.to_string(),
            altitude,
            azimuth,
            distance_au,
            distance_km: round_to(distance_km, 0),
            illumination: illumination(phase),
            magnitude,
            constellation: constellation_label(planet, &sighting.apparent),
            right_ascension: format_ra(ra_hours),
            declination: format_dec(dec_deg),
            elongation,
            visibility: Visibility::classify(altitude, elongation, Some(planet)),
        })
    }

    /// Rise, set and upper-transit times of `planet` on the UTC day `date`.
    ///
    /// Times are shifted by `tz + (dst ? 1 : 0)` hours when `tz` is given and
    /// sorted by their `HH:MM` string. Magnitude and constellation are taken
    /// at 12:00 UTC.
    pub fn get_planet_events(
        &self,
        planet: &str,
        date: &str,
        latitude: Degree,
        longitude: Degree,
        tz: Option<Hours>,
        dst: bool,
    ) -> Result<PlanetEventsResponse, CelestialError> {
        let site = ObserverLocation::at_sea_level(latitude, longitude)?;
        let data = self.planet_events_at(planet, date, &site, tz, dst)?;
        Ok(Feature::new(latitude, longitude, data))
    }

    /// [`Celestial::get_planet_events`] for an arbitrary site, height included.
    pub fn planet_events_at(
        &self,
        planet: &str,
        date: &str,
        site: &ObserverLocation,
        tz: Option<Hours>,
        dst: bool,
    ) -> Result<PlanetEventsData, CelestialError> {
        let planet: Planet = planet.parse()?;
        let civil_date = CivilDate::parse(date)?;
        let offset = display_offset(tz, dst)?;

        let ephemeris = self.get_jpl_ephem()?;
        let observatory = Observatory::new(ephemeris.as_ref(), &self.env_state, site);

        let (start, end) = civil_date.utc_window();
        let found = find_events(&observatory, planet.body(), &SearchWindow::daily(start, end));
        let events = format_events(&found, offset);

        let noon = civil_date.noon();
        let snapshot = observatory.snapshot(noon)?;
        let sighting = observatory.observe(&snapshot, planet.body())?;
        let to_sun = sun_from_body(ephemeris.as_ref(), planet.body(), &noon)?;

        let magnitude = phase_angle(&-sighting.astrometric, &to_sun)
            .and_then(|phase| precise_magnitude(planet, &sighting, &to_sun, phase))
            .unwrap_or_else(|unavailable| {
                debug!("{planet}: {unavailable}, using the absolute magnitude");
                planet.absolute_magnitude()
            });

        Ok(PlanetEventsData {
            planet,
            date: date.to_string(),
            events,
            constellation: constellation_label(planet, &sighting.apparent),
            magnitude,
        })
    }

    /// Equinoxes and solstices of `year`.
    pub fn get_earth_seasons(
        &self,
        year: i32,
        tz: Option<Hours>,
        dst: bool,
    ) -> Result<SeasonsResponse, CelestialError> {
        let ephemeris = self.get_jpl_ephem()?;
        let data = earth_seasons(ephemeris.as_ref(), year, tz, dst)?;
        Ok(SeasonsResponse::new(year, tz, dst, data))
    }

    /// The next `num_phases` principal lunar phases from `date` 00:00 UTC.
    pub fn get_moon_phases(
        &self,
        date: &str,
        num_phases: usize,
    ) -> Result<MoonPhasesResponse, CelestialError> {
        let civil_date = CivilDate::parse(date)?;
        let ephemeris = self.get_jpl_ephem()?;
        let phasedata = moon_phases(ephemeris.as_ref(), &civil_date, num_phases)?;
        Ok(MoonPhasesResponse {
            apiversion: crate::constants::API_VERSION.to_string(),
            year: civil_date.year,
            month: civil_date.month,
            day: civil_date.day,
            numphases: phasedata.len(),
            phasedata,
        })
    }
}

/// Body → Sun vector from geometric barycentric positions at `epoch`, km.
fn sun_from_body(
    ephemeris: &dyn Ephemeris,
    body: Body,
    epoch: &Epoch,
) -> Result<Vector3<f64>, CelestialError> {
    let sun = ephemeris.barycentric_state(Body::Sun, epoch)?.position;
    let planet = ephemeris.barycentric_state(body, epoch)?.position;
    Ok(sun - planet)
}

/// Phase-curve magnitude from the astrometric geometry, 1 decimal.
fn precise_magnitude(
    planet: Planet,
    sighting: &Sighting,
    to_sun: &Vector3<f64>,
    phase: Degree,
) -> BestEffort<f64> {
    let to_observer = -sighting.astrometric;
    let sub_latitudes = SubLatitudes::new(planet, &to_observer, to_sun);
    let (r, delta) = (to_sun.norm() / AU, to_observer.norm() / AU);
    planetary_magnitude(planet, r, delta, phase, sub_latitudes).map(|m| round_to(m, 1))
}

fn constellation_label(planet: Planet, apparent: &Vector3<f64>) -> String {
    match constellation_at(apparent) {
        Ok(constellation) => constellation.abbreviation.to_string(),
        Err(unavailable) => {
            debug!("{planet}: {unavailable}");
            CONSTELLATION_UNAVAILABLE.to_string()
        }
    }
}
