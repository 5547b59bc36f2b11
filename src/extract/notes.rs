use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// A pull request listed in a release-notes file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrInfo {
    pub number: String,
    pub title: String,
}

static NOTE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-\s+(.*?)\s+\(#\[(\d+)\]\)$").expect("note line pattern is valid")
});

/// Parse `- <title> (#[<number>])` lines out of release notes.
///
/// Each line is matched on its own; anything else on the line after the
/// marker, a missing dash, or a non-numeric marker drops that line only.
pub fn extract_pr_references(note_text: &str) -> Vec<PrInfo> {
    note_text
        .lines()
        .filter_map(|line| NOTE_LINE.captures(line))
        .map(|captures| PrInfo {
            number: captures[2].to_string(),
            title: captures[1].trim().to_string(),
        })
        .collect()
}
