//! Reader for binary NAIF SPK kernels (DAF container, type 2 segments).
//!
//! ```text
//! file record ──fward──▶ summary record ──next──▶ summary record ...
//!                           │ summaries (target, center, addresses)
//!                           ▼
//!                        segment: records ... | directory (INIT, INTLEN, RSIZE, N)
//! ```
pub mod daf_header;
pub mod directory;
pub mod ephemeris_record;
pub mod naif_data;
pub mod naif_version;
pub mod summary_record;
