//! Version comparison.
//!
//! Three layers, leaves first:
//! - [`compare_versions`]: RPM-style label comparison of two arbitrary strings.
//! - [`split_release_candidate`] / [`compare_upstream_versions`]: pre-release
//!   aware comparison of two upstream version strings.
//! - [`compare_upstream_to_repo`]: an upstream version against a packaged
//!   version + release pair.
//!
//! Every comparison returns a [`std::cmp::Ordering`] read from the point of
//! view of the first argument (`Greater` means "first is newer"). None of
//! these functions can fail: malformed input degrades to plain tokenization.

pub mod rc;
pub mod repo;
pub mod rpm;

use std::cmp::Ordering;

pub use rc::{compare_upstream_versions, split_release_candidate, ReleaseCandidateSplit};
pub use repo::compare_upstream_to_repo;
pub use rpm::compare_versions;

/// Numeric form of a comparison result: -1, 0 or 1.
pub fn ordering_to_i8(ordering: Ordering) -> i8 {
    match ordering {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    }
}
