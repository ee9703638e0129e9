//! Data access: where record sets, person details and surroundings come from.

use crate::error::SourceError;
use egonet_core::{PersonDetail, RecordSet, Surroundings};
use std::future::Future;
use std::path::Path;

/// An uploaded record file: its display name and raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl RecordFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, bytes })
    }
}

/// Supplies parsed records and per-person lookups.
///
/// Every call is a future so a remote backend fits behind the same seam; the navigator never
/// looks past the returned value or [`SourceError`].
pub trait DataSource {
    fn parse_record_file(
        &self,
        file: &RecordFile,
    ) -> impl Future<Output = Result<RecordSet, SourceError>>;

    fn person_detail(
        &self,
        person_id: &str,
        records: &RecordSet,
    ) -> impl Future<Output = Result<PersonDetail, SourceError>>;

    fn surroundings(
        &self,
        person_id: &str,
        records: &RecordSet,
    ) -> impl Future<Output = Result<Surroundings, SourceError>>;
}

/// In-process source backed by `egonet-core`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalSource;

impl DataSource for LocalSource {
    async fn parse_record_file(&self, file: &RecordFile) -> Result<RecordSet, SourceError> {
        let records = egonet_core::parse_gedcom_bytes(&file.bytes)?;
        tracing::info!(
            file = %file.name,
            individuals = records.individuals.len(),
            families = records.families.len(),
            "parsed record file"
        );
        Ok(records)
    }

    async fn person_detail(
        &self,
        person_id: &str,
        records: &RecordSet,
    ) -> Result<PersonDetail, SourceError> {
        Ok(egonet_core::person_detail(person_id, records)?)
    }

    async fn surroundings(
        &self,
        person_id: &str,
        records: &RecordSet,
    ) -> Result<Surroundings, SourceError> {
        Ok(egonet_core::resolve_surroundings(person_id, records)?)
    }
}
