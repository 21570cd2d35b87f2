use std::cmp::Ordering;

use relmon_core::{
    compare_upstream_to_repo, compare_upstream_versions, compare_versions, ordering_to_i8,
    split_release_candidate,
};

const SAMPLES: &[&str] = &[
    "",
    "1",
    "01",
    "1.0",
    "1.0.a",
    "1.1",
    "1.10",
    "1.9",
    "2.0.rc1",
    "2.0.pre1",
    "2.0.beta1",
    "2.0.alpha1",
    "1.8.23-20100128-r1100",
    "v1.2.0",
    "abc",
    "1.0~rc2",
];

// ---- compare_versions ----

#[test]
fn compare_versions_is_reflexive() {
    for v in SAMPLES {
        assert_eq!(compare_versions(v, v), Ordering::Equal, "{v:?}");
    }
}

#[test]
fn compare_versions_is_antisymmetric() {
    for a in SAMPLES {
        for b in SAMPLES {
            assert_eq!(
                compare_versions(a, b),
                compare_versions(b, a).reverse(),
                "{a:?} vs {b:?}"
            );
        }
    }
}

#[test]
fn numeric_subfield_beats_text() {
    assert_eq!(ordering_to_i8(compare_versions("1.0.a", "1.0")), 1);
    assert_eq!(ordering_to_i8(compare_versions("1.0.a", "1.1")), -1);
}

#[test]
fn labels_order_alphabetically() {
    assert_eq!(ordering_to_i8(compare_versions("2.0.rc1", "2.0.pre1")), 1);
    assert_eq!(ordering_to_i8(compare_versions("2.0.beta1", "2.0.pre1")), -1);
    assert_eq!(ordering_to_i8(compare_versions("2.0.beta1", "2.0.alpha1")), 1);
}

#[test]
fn leading_zeros_are_ignored() {
    assert_eq!(compare_versions("1.01", "1.1"), Ordering::Equal);
    assert_eq!(compare_versions("1.010", "1.9"), Ordering::Greater);
}

#[test]
fn empty_is_older_than_any_subfield() {
    assert_eq!(compare_versions("", "0"), Ordering::Less);
    assert_eq!(compare_versions("a", ""), Ordering::Greater);
}

#[test]
fn separators_are_skipped() {
    assert_eq!(compare_versions("1-2_3", "1.2.3"), Ordering::Equal);
}

// ---- split_release_candidate ----

#[test]
fn split_finds_trailing_marker() {
    let split = split_release_candidate("1.0.0.rc1");
    assert_eq!(
        (split.base_version.as_str(), split.rc_label.as_str(), split.rc_number.as_str()),
        ("1.0.0", "rc", "1")
    );
}

#[test]
fn split_without_marker_is_unchanged() {
    for v in ["1.0.0", "1.8.23-20100128-r1100"] {
        let split = split_release_candidate(v);
        assert_eq!(split.base_version, v);
        assert_eq!(split.rc_label, "");
        assert_eq!(split.rc_number, "");
        assert!(!split.is_pre_release());
    }
}

// ---- compare_upstream_versions ----

#[test]
fn release_supersedes_its_candidates() {
    assert_eq!(compare_upstream_versions("1.0", "1.0rc3"), Ordering::Greater);
    assert_eq!(compare_upstream_versions("1.0-beta", "1.0"), Ordering::Less);
}

#[test]
fn base_version_dominates_pre_release() {
    assert_eq!(compare_upstream_versions("1.1rc1", "1.0"), Ordering::Greater);
}

#[test]
fn candidate_numbers_compare_numerically() {
    assert_eq!(compare_upstream_versions("1.0rc10", "1.0rc9"), Ordering::Greater);
    assert_eq!(compare_upstream_versions("1.0rc1", "1.0rc"), Ordering::Greater);
    assert_eq!(compare_upstream_versions("1.0.rc", "1.0rc"), Ordering::Equal);
}

// ---- compare_upstream_to_repo ----

#[test]
fn upstream_against_packaged() {
    assert_eq!(ordering_to_i8(compare_upstream_to_repo("1", "2", "1")), -1);
    assert_eq!(ordering_to_i8(compare_upstream_to_repo("1.0.a", "1.0", "1")), 1);
    assert_eq!(ordering_to_i8(compare_upstream_to_repo("1.1", "1.1", "2")), 0);
}

#[test]
fn leading_v_is_stripped() {
    assert_eq!(compare_upstream_to_repo("v1.2.0", "1.2.0", "1"), Ordering::Equal);
}

#[test]
fn packaged_candidate_in_release_field() {
    assert_eq!(
        compare_upstream_to_repo("1.0", "1.0", "0.1.rc2.fc40"),
        Ordering::Greater
    );
    assert_eq!(
        compare_upstream_to_repo("1.0rc2", "1.0", "0.1.rc2.fc40"),
        Ordering::Equal
    );
}
