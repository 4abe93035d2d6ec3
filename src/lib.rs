pub mod almanac;
pub mod celestial;
pub mod celestial_errors;
pub mod config;
pub mod constants;
pub mod constellation;
pub mod earth_orientation;
pub mod env_state;
pub mod events;
pub mod geometry;
pub mod jpl_ephem;
pub mod models;
pub mod observers;
pub mod photometry;
pub mod planet;
mod ref_system;
pub mod time;

#[cfg(test)]
pub(crate) mod unit_test_global {
    use std::sync::LazyLock;

    use crate::{celestial::Celestial, config::CelestialConfig};

    pub(crate) static CELESTIAL_STANDISH_TEST: LazyLock<Celestial> = LazyLock::new(|| {
        Celestial::new(
            CelestialConfig::default()
                .with_ephemeris("standish")
                .with_auto_download(false),
        )
    });
}
