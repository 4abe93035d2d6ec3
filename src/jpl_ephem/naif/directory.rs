//! Type 2 segment directory: the four doubles closing every segment.
//!
//! ```text
//! INIT    start epoch of the first record (ET seconds)
//! INTLEN  time span of each record (seconds)
//! RSIZE   record size in double precision words
//! N       number of records
//! ```
use nom::{number::complete::le_f64, IResult, Parser};

use crate::celestial_errors::CelestialError;

#[derive(Debug, PartialEq, Clone)]
pub struct DirectoryData {
    pub init: f64,
    pub intlen: f64,
    pub rsize: usize,
    pub n_records: usize,
}

impl DirectoryData {
    fn parse_words(input: &[u8]) -> IResult<&[u8], (f64, f64, f64, f64)> {
        (le_f64, le_f64, le_f64, le_f64).parse(input)
    }

    /// Decode the 32 bytes located at DAF address `final_addr - 3`.
    pub fn parse(input: &[u8]) -> Result<Self, CelestialError> {
        let (_, (init, intlen, rsize, n_records)) = DirectoryData::parse_words(input)
            .map_err(|e| CelestialError::NomParsingError(format!("segment directory: {e}")))?;

        if intlen <= 0.0 || rsize < 5.0 || n_records < 1.0 {
            return Err(CelestialError::EphemerisUnavailable(format!(
                "invalid segment directory (intlen={intlen}, rsize={rsize}, n={n_records})"
            )));
        }

        Ok(DirectoryData {
            init,
            intlen,
            rsize: rsize as usize,
            n_records: n_records as usize,
        })
    }

    /// Byte offset of the directory for a segment ending at `final_addr`.
    pub fn byte_offset(final_addr: usize) -> usize {
        (final_addr - 4) * 8
    }

    /// Index of the record covering `et_seconds`, clamped to the last record.
    pub fn record_index(&self, et_seconds: f64) -> usize {
        let idx = ((et_seconds - self.init) / self.intlen).floor();
        if idx <= 0.0 {
            0
        } else {
            (idx as usize).min(self.n_records - 1)
        }
    }

    /// Chebyshev coefficients per axis: `(RSIZE - 2) / 3`.
    pub fn n_coeffs(&self) -> usize {
        (self.rsize - 2) / 3
    }
}

#[cfg(test)]
mod test_directory {
    use super::*;

    fn directory_bytes(words: [f64; 4]) -> Vec<u8> {
        words.iter().flat_map(|w| w.to_le_bytes()).collect()
    }

    #[test]
    fn test_parse_directory() {
        let dir =
            DirectoryData::parse(&directory_bytes([-14200747200.0, 1382400.0, 41.0, 25112.0]))
                .unwrap();
        assert_eq!(
            dir,
            DirectoryData {
                init: -14200747200.0,
                intlen: 1382400.0,
                rsize: 41,
                n_records: 25112
            }
        );
        assert_eq!(dir.n_coeffs(), 13);
    }

    #[test]
    fn test_record_index() {
        let dir = DirectoryData {
            init: 0.0,
            intlen: 100.0,
            rsize: 11,
            n_records: 4,
        };
        assert_eq!(dir.record_index(-5.0), 0);
        assert_eq!(dir.record_index(150.0), 1);
        // the end of coverage belongs to the last record
        assert_eq!(dir.record_index(400.0), 3);
    }

    #[test]
    fn test_reject_degenerate_directory() {
        assert!(DirectoryData::parse(&directory_bytes([0.0, 0.0, 41.0, 10.0])).is_err());
        assert!(DirectoryData::parse(&[0u8; 8]).is_err());
    }
}
