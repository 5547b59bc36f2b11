//! Property-based checks for the log and release-notes extractors

use proptest::prelude::*;
use team_pulse::extract::{extract_pr_references, extract_release_info, Platform};

proptest! {
    #[test]
    fn extractors_never_panic(text in ".*") {
        let _ = extract_release_info(&text);
        let _ = extract_pr_references(&text);
    }

    #[test]
    fn well_formed_notes_lines_are_all_found(
        entries in prop::collection::vec(("[A-Za-z][A-Za-z :]{0,30}[A-Za-z]", 1u32..100_000), 0..10),
        crlf in any::<bool>(),
    ) {
        let newline = if crlf { "\r\n" } else { "\n" };
        let text: String = entries
            .iter()
            .map(|(title, number)| format!("- {title} (#[{number}]){newline}"))
            .collect();

        let found = extract_pr_references(&text);

        prop_assert_eq!(found.len(), entries.len());
        for (pr, (title, number)) in found.iter().zip(&entries) {
            prop_assert_eq!(&pr.title, title);
            prop_assert_eq!(&pr.number, &number.to_string());
        }
    }

    #[test]
    fn upload_lines_yield_one_record_each(
        version in "[0-9]{1,2}\\.[0-9]{1,2}\\.[0-9]{1,3}(-rc[0-9])?",
        build in 1u32..1_000_000,
        ipa in any::<bool>(),
        noise in "[a-z ]{0,40}",
    ) {
        let platform = if ipa { "IPA" } else { "apk" };
        let log = format!("{noise}\nUploaded {platform} successfully and created release {version} ({build})\n{noise}");

        let releases = extract_release_info(&log);

        prop_assert_eq!(releases.len(), 1);
        prop_assert_eq!(releases[0].platform, if ipa { Platform::Ipa } else { Platform::Apk });
        prop_assert_eq!(&releases[0].version, &version);
        prop_assert_eq!(&releases[0].build_number, &build.to_string());
    }

    #[test]
    fn text_without_upload_phrase_yields_nothing(text in "[a-z0-9 ().\\n]{0,200}") {
        prop_assert!(extract_release_info(&text).is_empty());
    }
}
