//! # Engine environment state
//!
//! [`CelestialEnv`] carries the Earth-rotation data the geometry needs beyond
//! the ephemeris itself: an optional [`hifitime::ut1::Ut1Provider`] built from
//! JPL's `latest_eop2.long` Earth orientation series.
//!
//! When the provider is disabled in the configuration, or when its download
//! fails, UT1 is approximated by UTC. The difference stays below 0.9 s by
//! construction of the leap-second scheme, about 0.004° of Earth rotation,
//! which is far below the 0.01° rounding of reported altitudes.
//!
//! ```text
//! CelestialEnv
//! └── ut1_provider (Option<hifitime::Ut1Provider>)
//! ```
use hifitime::{ut1::Ut1Provider, Epoch};
use tracing::{info, warn};

use crate::constants::MJD;

#[derive(Debug, Clone, Default)]
pub struct CelestialEnv {
    pub ut1_provider: Option<Ut1Provider>,
}

impl CelestialEnv {
    /// Create the environment, downloading the JPL EOP series when `use_jpl_ut1` is set.
    pub fn new(use_jpl_ut1: bool) -> Self {
        let ut1_provider = if use_jpl_ut1 {
            CelestialEnv::initialize_ut1_provider()
        } else {
            None
        };
        CelestialEnv { ut1_provider }
    }

    fn initialize_ut1_provider() -> Option<Ut1Provider> {
        match Ut1Provider::download_from_jpl("latest_eop2.long") {
            Ok(provider) => {
                info!("Loaded JPL UT1 provider from latest_eop2.long");
                Some(provider)
            }
            Err(err) => {
                warn!("UT1 download failed, using UTC as UT1: {err}");
                None
            }
        }
    }

    /// Modified Julian Date of `epoch` in the UT1 scale.
    ///
    /// With a provider the offset comes from the EOP series (same conversion
    /// path as hifitime's `to_ut1`), otherwise UTC is returned.
    pub fn mjd_ut1(&self, epoch: &Epoch) -> MJD {
        match &self.ut1_provider {
            Some(provider) => epoch.to_ut1(provider).to_mjd_tai_days(),
            None => epoch.to_mjd_utc_days(),
        }
    }
}
