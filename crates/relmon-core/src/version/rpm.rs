//! RPM-style label comparison.
//!
//! A version string is scanned into alternating runs of ASCII letters and
//! ASCII digits; every other character only separates runs. The two run
//! sequences are walked in lockstep and the first differing run decides.

use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'a> {
    Number(&'a str),
    Text(&'a str),
}

/// Split `version` into its letter and digit runs, in scan order.
fn segments(version: &str) -> Vec<Segment<'_>> {
    let bytes = version.as_bytes();
    let mut out = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let start = i;
        if bytes[i].is_ascii_digit() {
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            out.push(Segment::Number(&version[start..i]));
        } else if bytes[i].is_ascii_alphabetic() {
            while i < bytes.len() && bytes[i].is_ascii_alphabetic() {
                i += 1;
            }
            out.push(Segment::Text(&version[start..i]));
        } else {
            i += 1;
        }
    }

    out
}

/// Compare two digit runs by value without parsing, so arbitrarily long
/// runs cannot overflow. Leading zeros are insignificant.
pub(crate) fn compare_numeric(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn compare_segment(a: Segment<'_>, b: Segment<'_>) -> Ordering {
    match (a, b) {
        (Segment::Number(x), Segment::Number(y)) => compare_numeric(x, y),
        (Segment::Text(x), Segment::Text(y)) => x.as_bytes().cmp(y.as_bytes()),
        // A numeric run always beats a textual one.
        (Segment::Number(_), Segment::Text(_)) => Ordering::Greater,
        (Segment::Text(_), Segment::Number(_)) => Ordering::Less,
    }
}

/// Compare two version strings using RPM label-comparison rules.
///
/// - identical strings are equal without tokenizing
/// - numeric runs compare by integer value, textual runs bytewise
/// - a numeric run is newer than a textual run at the same position
/// - when one side runs out of runs first, it is the older one
pub fn compare_versions(v1: &str, v2: &str) -> Ordering {
    if v1 == v2 {
        return Ordering::Equal;
    }

    let left = segments(v1);
    let right = segments(v2);

    for (a, b) in left.iter().zip(right.iter()) {
        match compare_segment(*a, *b) {
            Ordering::Equal => continue,
            decided => return decided,
        }
    }

    left.len().cmp(&right.len())
}
