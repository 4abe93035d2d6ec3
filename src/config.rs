//! # Engine configuration
//!
//! [`CelestialConfig`] gathers the few knobs the engine exposes: which
//! ephemeris source to load, where kernels are cached, whether missing kernels
//! may be downloaded, and whether UT1 comes from the JPL Earth orientation
//! series or is approximated by UTC.
//!
//! Values come from [`Default`], the `with_*` builders, or the environment via
//! [`CelestialConfig::from_env`]:
//!
//! | Variable                  | Field           | Default       |
//! |---------------------------|-----------------|---------------|
//! | `CELESTIAL_EPHEMERIS`     | `ephemeris`     | `naif:DE440s` |
//! | `CELESTIAL_DATA_DIR`      | `data_dir`      | user cache    |
//! | `CELESTIAL_AUTO_DOWNLOAD` | `auto_download` | `true`        |
//! | `CELESTIAL_JPL_UT1`       | `use_jpl_ut1`   | `false`       |

use camino::Utf8PathBuf;

/// Default ephemeris source descriptor.
pub const DEFAULT_EPHEMERIS: &str = "naif:DE440s";

#[derive(Debug, Clone, PartialEq)]
pub struct CelestialConfig {
    /// Ephemeris source descriptor (e.g. `"naif:DE440s"`, `"naif:/data/de421.bsp"`, `"standish"`).
    pub ephemeris: String,
    /// Directory holding cached kernels. `None` selects the user cache directory.
    pub data_dir: Option<Utf8PathBuf>,
    /// Fetch a missing kernel from NAIF when the `jpl-download` feature is enabled.
    pub auto_download: bool,
    /// Download the JPL EOP series to convert UTC into UT1.
    pub use_jpl_ut1: bool,
}

impl Default for CelestialConfig {
    fn default() -> Self {
        CelestialConfig {
            ephemeris: DEFAULT_EPHEMERIS.to_string(),
            data_dir: None,
            auto_download: true,
            use_jpl_ut1: false,
        }
    }
}

impl CelestialConfig {
    /// Build a configuration from `CELESTIAL_*` environment variables,
    /// falling back to defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let default = CelestialConfig::default();
        CelestialConfig {
            ephemeris: lookup("CELESTIAL_EPHEMERIS")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(default.ephemeris),
            data_dir: lookup("CELESTIAL_DATA_DIR")
                .filter(|s| !s.trim().is_empty())
                .map(Utf8PathBuf::from)
                .or(default.data_dir),
            auto_download: lookup("CELESTIAL_AUTO_DOWNLOAD")
                .and_then(|s| parse_flag(&s))
                .unwrap_or(default.auto_download),
            use_jpl_ut1: lookup("CELESTIAL_JPL_UT1")
                .and_then(|s| parse_flag(&s))
                .unwrap_or(default.use_jpl_ut1),
        }
    }

    pub fn with_ephemeris(mut self, source: impl Into<String>) -> Self {
        self.ephemeris = source.into();
        self
    }

    pub fn with_data_dir(mut self, dir: impl Into<Utf8PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    pub fn with_auto_download(mut self, auto_download: bool) -> Self {
        self.auto_download = auto_download;
        self
    }

    pub fn with_jpl_ut1(mut self, use_jpl_ut1: bool) -> Self {
        self.use_jpl_ut1 = use_jpl_ut1;
        self
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
