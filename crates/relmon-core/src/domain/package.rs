//! Downstream package identity.

use serde::{Deserialize, Serialize};

/// One downstream package under evaluation.
///
/// Built per target from the event mapping; version and release are filled
/// in once the metadata validator has answered. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PackageTarget {
    pub name: String,
    pub current_version: String,
    pub current_release: String,
    pub distro: String,
}

impl PackageTarget {
    pub fn new(name: impl Into<String>, distro: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            distro: distro.into(),
            ..Self::default()
        }
    }

    /// Record the currently packaged version and release.
    pub fn with_metadata(mut self, version: impl Into<String>, release: impl Into<String>) -> Self {
        self.current_version = version.into();
        self.current_release = release.into();
        self
    }

    /// `version-release`, as shown to packagers.
    pub fn evr(&self) -> String {
        format!("{}-{}", self.current_version, self.current_release)
    }
}
