#![forbid(unsafe_code)]

//! Genealogical record model + GEDCOM parser (headless).
//!
//! Design goals:
//! - deterministic outputs: every map keeps file order, so derived lists are stable
//! - total lookups: unknown references are skipped, never panicked on
//! - no I/O: callers hand in text (or bytes) and get owned records back

pub mod config;
pub mod error;
pub mod gedcom;
pub mod geom;
pub mod model;
pub mod records;

pub use config::EgoConfig;
pub use error::{Error, Result};
pub use gedcom::{parse_gedcom, parse_gedcom_bytes};
pub use model::{
    Family, Individual, PersonDetail, PersonSummary, RecordSet, Surroundings, UNKNOWN_DATE,
    UNKNOWN_DEATH, UNKNOWN_NAME,
};
pub use records::{person_detail, resolve_surroundings};
