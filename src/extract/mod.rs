//! Text extraction for CI output.
//!
//! Upload logs and release-notes files are produced by an external pipeline,
//! so every extractor here skips what it does not recognise instead of
//! failing. Only the archive extractor has error cases, and those concern
//! the zip container rather than its text.

pub mod archive;
pub mod notes;
pub mod release;

pub use archive::{extract_from_archive, ArtifactData};
pub use notes::{extract_pr_references, PrInfo};
pub use release::{extract_release_info, Platform, ReleaseInfo};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("artifact archive contains no file entries")]
    ArchiveEmpty,

    #[error("artifact archive could not be read: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("artifact entry could not be read: {0}")]
    Io(#[from] std::io::Error),
}
