//! DAF file record (the first 1024 bytes of an SPK kernel).
//!
//! Only the fields needed to walk the summary records are kept: the summary
//! layout (`nd`, `ni`), the forward pointer to the first summary record and
//! the binary format tag. Kernels written in `BIG-IEEE` are rejected since
//! every reader of this module decodes little-endian words.
use nom::{bytes::complete::take, number::complete::le_i32, IResult, Parser};

use crate::celestial_errors::CelestialError;

/// Size in bytes of one DAF record.
pub const DAF_RECORD_BYTES: usize = 1024;

#[derive(Debug, PartialEq, Clone)]
pub struct DAFHeader {
    /// Format identifier, `"DAF/SPK"` for planetary kernels.
    pub idword: String,
    pub internal_filename: String,
    /// Double precision components per summary.
    pub nd: i32,
    /// Integer components per summary.
    pub ni: i32,
    /// Record number (1-based) of the first summary record.
    pub fward: i32,
    /// Record number (1-based) of the last summary record.
    pub bward: i32,
    /// First free DAF address.
    pub free: i32,
    /// Binary format tag (`LTL-IEEE` / `BIG-IEEE`).
    pub locfmt: String,
}

fn trimmed(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim_matches(|c: char| c.is_whitespace() || c == '\0')
        .to_string()
}

impl DAFHeader {
    fn parse_fields(input: &[u8]) -> IResult<&[u8], Self> {
        let (input, (idword, nd, ni, ifname, fward, bward, free, locfmt)) = (
            take(8usize),
            le_i32,
            le_i32,
            take(60usize),
            le_i32,
            le_i32,
            le_i32,
            take(8usize),
        )
            .parse(input)?;

        Ok((
            input,
            DAFHeader {
                idword: trimmed(idword),
                internal_filename: trimmed(ifname),
                nd,
                ni,
                fward,
                bward,
                free,
                locfmt: trimmed(locfmt),
            },
        ))
    }

    /// Decode and validate the file record.
    pub fn parse(input: &[u8]) -> Result<Self, CelestialError> {
        let (_, header) = DAFHeader::parse_fields(input)
            .map_err(|e| CelestialError::NomParsingError(format!("DAF file record: {e}")))?;

        if !header.idword.starts_with("DAF/SPK") {
            return Err(CelestialError::EphemerisUnavailable(format!(
                "not an SPK kernel (id word '{}')",
                header.idword
            )));
        }
        if header.locfmt == "BIG-IEEE" {
            return Err(CelestialError::EphemerisUnavailable(
                "big-endian SPK kernels are not supported".into(),
            ));
        }
        if header.fward < 2 || header.nd < 2 || header.ni < 6 {
            return Err(CelestialError::EphemerisUnavailable(format!(
                "inconsistent DAF layout (fward={}, nd={}, ni={})",
                header.fward, header.nd, header.ni
            )));
        }
        Ok(header)
    }

    /// Summary size in double precision words: `ND + ceil(NI / 2)`.
    pub fn summary_words(&self) -> usize {
        self.nd as usize + (self.ni as usize).div_ceil(2)
    }
}

#[cfg(test)]
pub(crate) mod test_daf_header {
    use super::*;

    pub(crate) fn file_record(fward: i32, locfmt: &str) -> Vec<u8> {
        let mut buf = Vec::with_capacity(DAF_RECORD_BYTES);
        buf.extend_from_slice(b"DAF/SPK ");
        buf.extend_from_slice(&2i32.to_le_bytes());
        buf.extend_from_slice(&6i32.to_le_bytes());
        buf.extend_from_slice(format!("{:<60}", "TEST KERNEL").as_bytes());
        buf.extend_from_slice(&fward.to_le_bytes());
        buf.extend_from_slice(&fward.to_le_bytes());
        buf.extend_from_slice(&1000i32.to_le_bytes());
        buf.extend_from_slice(format!("{locfmt:<8}").as_bytes());
        buf.resize(DAF_RECORD_BYTES, 0);
        buf
    }

    #[test]
    fn test_parse_file_record() {
        let header = DAFHeader::parse(&file_record(2, "LTL-IEEE")).unwrap();
        assert_eq!(
            header,
            DAFHeader {
                idword: "DAF/SPK".into(),
                internal_filename: "TEST KERNEL".into(),
                nd: 2,
                ni: 6,
                fward: 2,
                bward: 2,
                free: 1000,
                locfmt: "LTL-IEEE".into(),
            }
        );
        assert_eq!(header.summary_words(), 5);
    }

    #[test]
    fn test_reject_big_endian_and_garbage() {
        assert!(matches!(
            DAFHeader::parse(&file_record(2, "BIG-IEEE")),
            Err(CelestialError::EphemerisUnavailable(_))
        ));
        assert!(matches!(
            DAFHeader::parse(&[0u8; 16]),
            Err(CelestialError::NomParsingError(_))
        ));

        let mut not_spk = file_record(2, "LTL-IEEE");
        not_spk[..8].copy_from_slice(b"DAF/PCK ");
        assert!(DAFHeader::parse(&not_spk).is_err());
    }
}
