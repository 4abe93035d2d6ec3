//! Segment descriptors stored in DAF summary records.
//!
//! A summary record is one 1024-byte DAF record laid out as three control
//! words (next record, previous record, number of summaries) followed by the
//! packed summaries. For SPK files each summary is `ND = 2` doubles (coverage
//! in ET seconds) and `NI = 6` integers.
use nom::{
    number::complete::{le_f64, le_i32},
    IResult, Parser,
};

use crate::celestial_errors::CelestialError;

use super::daf_header::DAF_RECORD_BYTES;

/// SPK segment types understood by the reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpkDataType {
    /// Type 2: Chebyshev coefficients for position, fixed record length.
    ChebyshevPositionOnly,
}

impl TryFrom<i32> for SpkDataType {
    type Error = CelestialError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(SpkDataType::ChebyshevPositionOnly),
            other => Err(CelestialError::InvalidSpkDataType(other)),
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Summary {
    /// Coverage start, ET seconds past J2000.
    pub start_epoch: f64,
    /// Coverage end, ET seconds past J2000.
    pub end_epoch: f64,
    pub target: i32,
    pub center: i32,
    pub frame_id: i32,
    pub data_type: i32,
    /// First DAF address of the segment (1-based, in words).
    pub initial_addr: i32,
    /// Last DAF address of the segment.
    pub final_addr: i32,
}

impl Summary {
    pub fn parse(input: &[u8]) -> IResult<&[u8], Self> {
        let (input, (start_epoch, end_epoch)) = (le_f64, le_f64).parse(input)?;
        let (input, (target, center, frame_id, data_type, initial_addr, final_addr)) =
            (le_i32, le_i32, le_i32, le_i32, le_i32, le_i32).parse(input)?;
        Ok((
            input,
            Summary {
                start_epoch,
                end_epoch,
                target,
                center,
                frame_id,
                data_type,
                initial_addr,
                final_addr,
            },
        ))
    }

    pub fn covers(&self, et_seconds: f64) -> bool {
        (self.start_epoch..=self.end_epoch).contains(&et_seconds)
    }
}

/// Content of one summary record.
#[derive(Debug, PartialEq, Clone)]
pub struct SummaryRecord {
    /// Record number of the next summary record, 0 at the end of the chain.
    pub next: usize,
    pub summaries: Vec<Summary>,
}

impl SummaryRecord {
    /// Decode a 1024-byte summary record whose summaries are `summary_words` long.
    pub fn parse(record: &[u8], summary_words: usize) -> Result<Self, CelestialError> {
        let nom_err = |e: nom::Err<nom::error::Error<&[u8]>>| {
            CelestialError::NomParsingError(format!("DAF summary record: {e}"))
        };

        let (_, (next, _prev, nsum)) = (le_f64, le_f64, le_f64).parse(record).map_err(nom_err)?;

        let stride = summary_words * 8;
        let nsum = nsum as usize;
        if 24 + nsum * stride > DAF_RECORD_BYTES.min(record.len()) {
            return Err(CelestialError::EphemerisUnavailable(format!(
                "summary record announces {nsum} summaries, more than fit in one record"
            )));
        }

        let summaries = (0..nsum)
            .map(|i| {
                let start = 24 + i * stride;
                Summary::parse(&record[start..start + stride])
                    .map(|(_, summary)| summary)
                    .map_err(nom_err)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(SummaryRecord {
            next: next as usize,
            summaries,
        })
    }
}

#[cfg(test)]
pub(crate) mod test_summary {
    use super::*;

    pub(crate) fn summary_bytes(summary: &Summary) -> Vec<u8> {
        let mut buf = Vec::with_capacity(40);
        buf.extend_from_slice(&summary.start_epoch.to_le_bytes());
        buf.extend_from_slice(&summary.end_epoch.to_le_bytes());
        for v in [
            summary.target,
            summary.center,
            summary.frame_id,
            summary.data_type,
            summary.initial_addr,
            summary.final_addr,
        ] {
            buf.extend_from_slice(&v.to_le_bytes());
        }
        buf
    }

    fn emb_summary() -> Summary {
        Summary {
            start_epoch: -14200747200.0,
            end_epoch: 20514081600.0,
            target: 3,
            center: 0,
            frame_id: 1,
            data_type: 2,
            initial_addr: 3021513,
            final_addr: 4051108,
        }
    }

    #[test]
    fn test_summary_parse() {
        let bytes = summary_bytes(&emb_summary());
        let (rest, summary) = Summary::parse(&bytes).unwrap();
        assert!(rest.is_empty());
        assert_eq!(summary, emb_summary());
        assert!(summary.covers(0.0));
        assert!(!summary.covers(2.1e10));
    }

    #[test]
    fn test_summary_record_parse() {
        let mut record = Vec::new();
        record.extend_from_slice(&0f64.to_le_bytes());
        record.extend_from_slice(&0f64.to_le_bytes());
        record.extend_from_slice(&2f64.to_le_bytes());
        record.extend_from_slice(&summary_bytes(&emb_summary()));
        let mut sun = emb_summary();
        sun.target = 10;
        record.extend_from_slice(&summary_bytes(&sun));
        record.resize(DAF_RECORD_BYTES, 0);

        let parsed = SummaryRecord::parse(&record, 5).unwrap();
        assert_eq!(parsed.next, 0);
        assert_eq!(parsed.summaries, vec![emb_summary(), sun]);
    }

    #[test]
    fn test_spk_data_type() {
        assert_eq!(
            SpkDataType::try_from(2).unwrap(),
            SpkDataType::ChebyshevPositionOnly
        );
        assert_eq!(
            SpkDataType::try_from(13).unwrap_err(),
            CelestialError::InvalidSpkDataType(13)
        );
    }
}
