//! Pre-release (release candidate) handling for upstream version strings.

use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::rpm::{compare_numeric, compare_versions};

/// Trailing pre-release marker: optional separator, keyword, optional digits.
/// The lazy prefix makes the marker the last run of the string.
static UPSTREAM_RC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(.*?)[-_.~]?(rc|pre|beta|alpha|dev)([0-9]*)$")
        .expect("upstream pre-release pattern is valid")
});

/// A version string with its trailing pre-release marker isolated.
///
/// When `rc_label` is empty the split found no marker: `base_version` is
/// the input unchanged and `rc_number` is empty too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseCandidateSplit {
    pub base_version: String,
    /// Lower-cased keyword: `rc`, `pre`, `beta`, `alpha`, `dev` or empty.
    pub rc_label: String,
    /// Digits following the keyword, possibly empty.
    pub rc_number: String,
}

impl ReleaseCandidateSplit {
    /// Whether a pre-release marker was found.
    pub fn is_pre_release(&self) -> bool {
        !self.rc_label.is_empty()
    }
}

/// Isolate a trailing pre-release marker from `version`.
///
/// `"1.0.0.rc1"` splits into `("1.0.0", "rc", "1")`; a version without a
/// recognised keyword comes back as `(version, "", "")`.
pub fn split_release_candidate(version: &str) -> ReleaseCandidateSplit {
    match UPSTREAM_RC.captures(version) {
        Some(caps) => ReleaseCandidateSplit {
            base_version: caps[1].to_string(),
            rc_label: caps[2].to_ascii_lowercase(),
            rc_number: caps[3].to_string(),
        },
        None => ReleaseCandidateSplit {
            base_version: version.to_string(),
            rc_label: String::new(),
            rc_number: String::new(),
        },
    }
}

/// Compare two upstream version strings, aware of pre-release markers.
///
/// Base versions decide first. With equal bases, a final release beats
/// any of its own pre-releases; two pre-releases compare by keyword in
/// plain alphabetical order (so `rc > pre > dev > beta > alpha`), then by
/// number, where having a number beats having none.
pub fn compare_upstream_versions(v1: &str, v2: &str) -> Ordering {
    let left = split_release_candidate(v1);
    let right = split_release_candidate(v2);

    match compare_versions(&left.base_version, &right.base_version) {
        Ordering::Equal => {}
        decided => return decided,
    }

    match (left.is_pre_release(), right.is_pre_release()) {
        (true, true) => left
            .rc_label
            .cmp(&right.rc_label)
            .then_with(|| compare_rc_numbers(&left.rc_number, &right.rc_number)),
        (false, true) => Ordering::Greater,
        (true, false) => Ordering::Less,
        (false, false) => Ordering::Equal,
    }
}

fn compare_rc_numbers(a: &str, b: &str) -> Ordering {
    match (a.is_empty(), b.is_empty()) {
        (false, false) => compare_numeric(a, b),
        (false, true) => Ordering::Greater,
        (true, false) => Ordering::Less,
        (true, true) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(v: &str) -> (String, String, String) {
        let s = split_release_candidate(v);
        (s.base_version, s.rc_label, s.rc_number)
    }

    fn owned(a: &str, b: &str, c: &str) -> (String, String, String) {
        (a.to_string(), b.to_string(), c.to_string())
    }

    #[test]
    fn split_finds_trailing_marker() {
        assert_eq!(split("1.0.0.rc1"), owned("1.0.0", "rc", "1"));
        assert_eq!(split("2.4-beta"), owned("2.4", "beta", ""));
        assert_eq!(split("3.0~alpha12"), owned("3.0", "alpha", "12"));
        assert_eq!(split("1.1pre2"), owned("1.1", "pre", "2"));
        assert_eq!(split("0.9_dev"), owned("0.9", "dev", ""));
    }

    #[test]
    fn split_normalises_label_case() {
        assert_eq!(split("5.0RC3"), owned("5.0", "rc", "3"));
    }

    #[test]
    fn split_without_marker_returns_input() {
        assert_eq!(split("1.0.0"), owned("1.0.0", "", ""));
        assert_eq!(
            split("1.8.23-20100128-r1100"),
            owned("1.8.23-20100128-r1100", "", "")
        );
        assert_eq!(split(""), owned("", "", ""));
    }

    #[test]
    fn split_requires_marker_at_the_end() {
        assert_eq!(split("1.0rc1.post"), owned("1.0rc1.post", "", ""));
        assert_eq!(split("1.0-devel"), owned("1.0-devel", "", ""));
    }

    #[test]
    fn base_difference_dominates() {
        assert_eq!(compare_upstream_versions("1.1rc1", "1.0"), Ordering::Greater);
        assert_eq!(compare_upstream_versions("1.0", "1.1alpha"), Ordering::Less);
    }

    #[test]
    fn release_beats_its_candidates() {
        assert_eq!(compare_upstream_versions("1.0", "1.0rc1"), Ordering::Greater);
        assert_eq!(compare_upstream_versions("1.0.beta2", "1.0"), Ordering::Less);
    }

    #[test]
    fn labels_compare_alphabetically() {
        assert_eq!(compare_upstream_versions("2.0rc1", "2.0pre1"), Ordering::Greater);
        assert_eq!(compare_upstream_versions("2.0beta1", "2.0pre1"), Ordering::Less);
        assert_eq!(compare_upstream_versions("2.0beta1", "2.0alpha1"), Ordering::Greater);
        assert_eq!(compare_upstream_versions("2.0dev", "2.0beta"), Ordering::Greater);
        assert_eq!(compare_upstream_versions("2.0RC1", "2.0rc1"), Ordering::Equal);
    }

    #[test]
    fn rc_numbers_compare_numerically() {
        assert_eq!(compare_upstream_versions("1.0rc10", "1.0rc9"), Ordering::Greater);
        assert_eq!(compare_upstream_versions("1.0rc01", "1.0rc1"), Ordering::Equal);
        assert_eq!(compare_upstream_versions("1.0rc1", "1.0rc"), Ordering::Greater);
        assert_eq!(compare_upstream_versions("1.0rc", "1.0-rc"), Ordering::Equal);
    }

    #[test]
    fn no_markers_equal_bases_are_equal() {
        assert_eq!(compare_upstream_versions("1.0", "1-0"), Ordering::Equal);
    }
}
