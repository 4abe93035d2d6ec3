//! In-memory SPK kernel.
//!
//! [`NaifData::read_naif_file`] walks the linked list of summary records,
//! decodes every type 2 segment and keeps its records in memory. States are
//! then obtained by chaining segments from the target up to the solar system
//! barycenter (`399 → 3 → 0`, `199 → 1 → 0`, ...).
use std::{
    collections::HashMap,
    fs::File,
    io::{BufReader, Read, Seek, SeekFrom},
};

use camino::Utf8Path;
use nalgebra::Vector3;
use tracing::{debug, info};

use crate::celestial_errors::CelestialError;

use super::{
    daf_header::{DAFHeader, DAF_RECORD_BYTES},
    directory::DirectoryData,
    ephemeris_record::EphemerisRecord,
    summary_record::{SpkDataType, Summary, SummaryRecord},
};

/// NAIF id of the solar system barycenter.
const SSB_ID: i32 = 0;

/// Guard against malformed kernels whose segment chain loops.
const MAX_CHAIN_DEPTH: usize = 8;

#[derive(Debug, Clone)]
pub struct Segment {
    pub summary: Summary,
    pub directory: DirectoryData,
    pub records: Vec<EphemerisRecord>,
}

impl Segment {
    fn state(&self, et_seconds: f64) -> (Vector3<f64>, Vector3<f64>) {
        let idx = self.directory.record_index(et_seconds);
        // record_index is clamped to the record count read from the directory
        self.records[idx].interpolate(et_seconds)
    }
}

#[derive(Debug, Clone)]
pub struct NaifData {
    pub(crate) daf_header: DAFHeader,
    /// target id -> segments for that target, in file order.
    pub(crate) segments: HashMap<i32, Vec<Segment>>,
}

fn read_at(
    file: &mut BufReader<File>,
    offset: usize,
    len: usize,
) -> Result<Vec<u8>, CelestialError> {
    let mut buf = vec![0u8; len];
    file.seek(SeekFrom::Start(offset as u64))?;
    file.read_exact(&mut buf)?;
    Ok(buf)
}

impl NaifData {
    /// Load a binary SPK kernel.
    ///
    /// Segments of unsupported types are skipped with a debug log; the load
    /// fails only when the file itself is unreadable or malformed.
    pub fn read_naif_file(path: &Utf8Path) -> Result<Self, CelestialError> {
        let file = File::open(path).map_err(|e| {
            CelestialError::EphemerisUnavailable(format!("cannot open kernel {path}: {e}"))
        })?;
        let mut file = BufReader::new(file);

        let daf_header = DAFHeader::parse(&read_at(&mut file, 0, DAF_RECORD_BYTES)?)?;
        let summary_words = daf_header.summary_words();

        let mut segments: HashMap<i32, Vec<Segment>> = HashMap::new();
        let mut next_record = daf_header.fward as usize;
        let mut visited = 0usize;

        while next_record != 0 {
            visited += 1;
            if visited > 10_000 {
                return Err(CelestialError::EphemerisUnavailable(
                    "summary record chain does not terminate".into(),
                ));
            }

            let record = read_at(
                &mut file,
                (next_record - 1) * DAF_RECORD_BYTES,
                DAF_RECORD_BYTES,
            )?;
            let summary_record = SummaryRecord::parse(&record, summary_words)?;

            for summary in summary_record.summaries {
                if let Err(e) = SpkDataType::try_from(summary.data_type) {
                    debug!(
                        "skipping segment {} -> {}: {e}",
                        summary.target, summary.center
                    );
                    continue;
                }
                let segment = NaifData::read_segment(&mut file, summary)?;
                segments
                    .entry(segment.summary.target)
                    .or_default()
                    .push(segment);
            }
            next_record = summary_record.next;
        }

        info!(
            "Loaded SPK kernel {path} ({}, {} targets)",
            daf_header.internal_filename,
            segments.len()
        );

        Ok(NaifData {
            daf_header,
            segments,
        })
    }

    fn read_segment(
        file: &mut BufReader<File>,
        summary: Summary,
    ) -> Result<Segment, CelestialError> {
        let final_addr = summary.final_addr as usize;
        let initial_addr = summary.initial_addr as usize;
        if initial_addr < 1 || final_addr < initial_addr + 4 {
            return Err(CelestialError::EphemerisUnavailable(format!(
                "segment {} -> {} has invalid addresses",
                summary.target, summary.center
            )));
        }

        let directory =
            DirectoryData::parse(&read_at(file, DirectoryData::byte_offset(final_addr), 32)?)?;

        let record_bytes = directory.rsize * 8;
        let ncoeff = directory.n_coeffs();
        let block = read_at(
            file,
            (initial_addr - 1) * 8,
            directory.n_records * record_bytes,
        )?;

        let records = block
            .chunks_exact(record_bytes)
            .map(|chunk| EphemerisRecord::parse(chunk, ncoeff))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Segment {
            summary,
            directory,
            records,
        })
    }

    /// Segment of `target` covering `et_seconds`.
    fn find_segment(&self, target: i32, et_seconds: f64) -> Result<&Segment, CelestialError> {
        let candidates = self.segments.get(&target).ok_or_else(|| {
            CelestialError::BodyNotCovered {
                body: target.to_string(),
                dataset: self.daf_header.internal_filename.clone(),
            }
        })?;

        // later segments take precedence, as in SPK search order
        candidates
            .iter()
            .rev()
            .find(|segment| segment.summary.covers(et_seconds))
            .ok_or_else(|| CelestialError::EpochOutOfRange {
                body: target.to_string(),
                epoch: format!("{et_seconds} s past J2000 TDB"),
            })
    }

    /// Barycentric state of the NAIF body `target` (km, km/s, ICRF axes).
    pub fn barycentric_state(
        &self,
        target: i32,
        et_seconds: f64,
    ) -> Result<(Vector3<f64>, Vector3<f64>), CelestialError> {
        let mut position = Vector3::zeros();
        let mut velocity = Vector3::zeros();
        let mut body = target;

        for _ in 0..MAX_CHAIN_DEPTH {
            if body == SSB_ID {
                return Ok((position, velocity));
            }
            let segment = self.find_segment(body, et_seconds)?;
            let (p, v) = segment.state(et_seconds);
            position += p;
            velocity += v;
            body = segment.summary.center;
        }

        Err(CelestialError::EphemerisUnavailable(format!(
            "segment chain for body {target} does not reach the barycenter"
        )))
    }

    /// Kernel name as stored in the DAF file record.
    pub fn name(&self) -> &str {
        &self.daf_header.internal_filename
    }
}
