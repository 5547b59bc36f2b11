use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Mobile artifact kind announced by the upload step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    #[serde(rename = "IPA")]
    Ipa,
    #[serde(rename = "APK")]
    Apk,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Ipa => "IPA",
            Platform::Apk => "APK",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A release created by a successful upload, as reported in a job log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseInfo {
    pub platform: Platform,
    pub version: String,
    pub build_number: String,
}

// Version is anything up to the "(<build>)" marker on the same line.
static UPLOAD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)Uploaded (IPA|APK) successfully and created release ([^\s(][^(\n]*?)\s*\((\d+)\)",
    )
    .expect("upload pattern is valid")
});

/// Scan raw job log text for upload-success lines.
///
/// Matches are returned in the order they appear, IPA and APK interleaved.
/// Text without any upload phrase yields an empty list.
pub fn extract_release_info(log_text: &str) -> Vec<ReleaseInfo> {
    UPLOAD_PATTERN
        .captures_iter(log_text)
        .filter_map(|captures| {
            let platform = if captures[1].eq_ignore_ascii_case("ipa") {
                Platform::Ipa
            } else {
                Platform::Apk
            };
            let version = captures[2].trim();
            if version.is_empty() {
                return None;
            }
            Some(ReleaseInfo {
                platform,
                version: version.to_string(),
                build_number: captures[3].to_string(),
            })
        })
        .collect()
}
