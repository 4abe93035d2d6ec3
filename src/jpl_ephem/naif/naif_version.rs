//! Published JPL planetary kernels and their NAIF file names.
//!
//! ```rust
//! use celestial::jpl_ephem::naif::naif_version::NaifVersion;
//!
//! let v: NaifVersion = "DE440s".parse().unwrap();
//! assert_eq!(v.get_filename(), "de440s.bsp");
//! ```
use std::{fmt, str::FromStr};

use crate::celestial_errors::CelestialError;

const NAIF_PLANETS_URL: &str = "https://naif.jpl.nasa.gov/pub/naif/generic_kernels/spk/planets";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NaifVersion {
    DE421,
    DE430,
    DE432,
    DE435,
    DE438,
    DE440,
    DE440s,
    DE442,
}

impl NaifVersion {
    /// Canonical BSP filename, e.g. `"de440s.bsp"`.
    pub fn get_filename(&self) -> &'static str {
        match self {
            NaifVersion::DE421 => "de421.bsp",
            NaifVersion::DE430 => "de430.bsp",
            NaifVersion::DE432 => "de432s.bsp",
            NaifVersion::DE435 => "de435.bsp",
            NaifVersion::DE438 => "de438.bsp",
            NaifVersion::DE440 => "de440.bsp",
            NaifVersion::DE440s => "de440s.bsp",
            NaifVersion::DE442 => "de442.bsp",
        }
    }

    /// Download location on the NAIF generic kernels server.
    pub fn url(&self) -> String {
        format!("{NAIF_PLANETS_URL}/{}", self.get_filename())
    }
}

impl FromStr for NaifVersion {
    type Err = CelestialError;

    /// Parse `"DE440"`, `"de440s"` or a bare filename such as `"de421.bsp"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        let token = token.strip_suffix(".bsp").unwrap_or(token);
        match token.to_ascii_uppercase().as_str() {
            "DE421" => Ok(NaifVersion::DE421),
            "DE430" => Ok(NaifVersion::DE430),
            "DE432" | "DE432S" => Ok(NaifVersion::DE432),
            "DE435" => Ok(NaifVersion::DE435),
            "DE438" => Ok(NaifVersion::DE438),
            "DE440" => Ok(NaifVersion::DE440),
            "DE440S" => Ok(NaifVersion::DE440s),
            "DE442" => Ok(NaifVersion::DE442),
            _ => Err(CelestialError::InvalidNaifVersion(s.to_string())),
        }
    }
}

impl fmt::Display for NaifVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.get_filename().trim_end_matches(".bsp");
        write!(f, "{}", name.to_ascii_uppercase().replace('S', "s"))
    }
}
