//! Saves the approved document to disk.

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use tracing::info;

use crate::errors::AgentError;

const DOCUMENT_EXTENSION: &str = "docx";

/// `<display-name>_Resume_<ISO-date>.docx`, matching what the service
/// produces for the hosted flow.
pub fn document_filename(display_name: &str, date: NaiveDate) -> String {
    format!(
        "{}_Resume_{}.{}",
        display_name,
        date.format("%Y-%m-%d"),
        DOCUMENT_EXTENSION
    )
}

/// Writes the document into `output_dir` and returns the full path.
pub fn save_document(
    bytes: &[u8],
    display_name: &str,
    output_dir: &Path,
) -> Result<PathBuf, AgentError> {
    let filename = document_filename(display_name, Utc::now().date_naive());
    let path = output_dir.join(filename);

    std::fs::write(&path, bytes)?;
    info!("Saved resume to {}", path.display());

    Ok(path)
}
