//! Flat CSV mirror of the signup records.
//!
//! Rewrites the whole file on every call with the records it is given
//! (most-recent-first, per the caller); it never appends. Fields are
//! escaped by the CSV writer.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::ports::{EmailMirror, MirrorError};
use crate::domain::EmailRecord;

/// CSV-file implementation of the `EmailMirror` port.
#[derive(Debug, Clone)]
pub struct CsvFileMirror {
    path: PathBuf,
}

impl CsvFileMirror {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

fn render(records: &[EmailRecord]) -> Result<Vec<u8>, MirrorError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(["timestamp", "ip", "email"])
        .map_err(|err| MirrorError::write(err.to_string()))?;
    for record in records {
        writer
            .write_record([&record.timestamp, &record.ip, &record.email])
            .map_err(|err| MirrorError::write(err.to_string()))?;
    }
    writer
        .into_inner()
        .map_err(|err| MirrorError::write(err.to_string()))
}

#[async_trait]
impl EmailMirror for CsvFileMirror {
    async fn rewrite(&self, records: &[EmailRecord]) -> Result<(), MirrorError> {
        let body = render(records)?;
        tokio::fs::write(&self.path, body)
            .await
            .map_err(|err| MirrorError::write(err.to_string()))
    }
}
