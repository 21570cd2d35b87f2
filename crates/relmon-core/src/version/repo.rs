//! Upstream version against the packaged version + release.

use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;

use super::rc::compare_upstream_versions;

/// Packaging convention for pre-releases in the release field:
/// `0.<n>.<keyword><digits>`, e.g. `0.1.rc2.fc40`.
static REPO_RELEASE_RC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^0\.[0-9]+\.(rc|pre|beta|alpha|dev)([0-9]*)")
        .expect("release field pre-release pattern is valid")
});

/// Rebuild the comparable packaged version: `repo_version` followed by any
/// pre-release marker embedded in `repo_release`, with no separator.
pub fn repo_comparable_version(repo_version: &str, repo_release: &str) -> String {
    match REPO_RELEASE_RC.captures(repo_release) {
        Some(caps) => format!("{}{}{}", repo_version, &caps[1], &caps[2]),
        None => repo_version.to_string(),
    }
}

/// Compare an upstream version with what is currently packaged.
///
/// A single leading `v` on the upstream version (common on git tags) is
/// ignored. A release field without the pre-release convention does not
/// influence the result.
pub fn compare_upstream_to_repo(
    upstream_version: &str,
    repo_version: &str,
    repo_release: &str,
) -> Ordering {
    let repo = repo_comparable_version(repo_version, repo_release);
    let upstream = upstream_version
        .strip_prefix('v')
        .unwrap_or(upstream_version);
    compare_upstream_versions(upstream, &repo)
}
