use super::notes::{extract_pr_references, PrInfo};
use super::ExtractError;
use serde::{Deserialize, Serialize};
use std::io::{Cursor, Read};
use tracing::debug;
use zip::ZipArchive;

/// Upper bound on the notes text read from a single entry
pub const MAX_NOTES_BYTES: u64 = 16 * 1024 * 1024;

/// PR references recovered from a workflow run's release-notes artifact
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactData {
    /// PR numbers joined with ", "
    pub prs: String,
    pub pr_details: Vec<PrInfo>,
}

impl ArtifactData {
    pub fn from_references(pr_details: Vec<PrInfo>) -> Self {
        let prs = pr_details
            .iter()
            .map(|pr| pr.number.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        Self { prs, pr_details }
    }
}

/// Read the notes file out of a zipped artifact and parse its PR lines.
///
/// The producing pipeline uploads a single file per artifact, so the first
/// file entry is used whatever its name. The declared entry size is not
/// trusted; at most [`MAX_NOTES_BYTES`] are read.
pub fn extract_from_archive(bytes: &[u8]) -> Result<ArtifactData, ExtractError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        if entry.is_dir() {
            continue;
        }

        let mut raw = Vec::new();
        entry.by_ref().take(MAX_NOTES_BYTES).read_to_end(&mut raw)?;
        let text = String::from_utf8_lossy(&raw);
        debug!(entry = entry.name(), bytes = raw.len(), "Read release notes entry");

        return Ok(ArtifactData::from_references(extract_pr_references(&text)));
    }

    Err(ExtractError::ArchiveEmpty)
}
