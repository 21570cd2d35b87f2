//! Inbound events.
//!
//! The event source decides the kind once, at the boundary, and hands the
//! core an already-typed [`Event`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::RelmonError;

/// A project-to-package mapping for one downstream distribution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DistroMapping {
    pub distro: String,
    pub package_name: String,
}

/// A new upstream release was detected for a project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateEvent {
    pub project_name: String,

    /// Latest upstream version.
    pub new_version: String,

    pub project_homepage: String,

    pub project_id: u64,

    pub distro_mappings: Vec<DistroMapping>,

    /// Every upstream version found in this check, newest first.
    #[serde(default)]
    pub upstream_versions: Vec<String>,

    /// Upstream versions considered stable, newest first.
    #[serde(default)]
    pub stable_versions: Vec<String>,
}

impl UpdateEvent {
    /// Mappings whose distribution matches `distro` (ASCII case-insensitive).
    pub fn mappings_for<'a>(&'a self, distro: &'a str) -> impl Iterator<Item = &'a DistroMapping> {
        self.distro_mappings
            .iter()
            .filter(move |m| m.distro.eq_ignore_ascii_case(distro))
    }
}

/// Build-system task states.
///
/// Serialized upper case; parsed case-insensitively, accepting `CANCELLED`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum BuildState {
    Free,
    Open,
    Closed,
    Canceled,
    Assigned,
    Failed,
}

impl BuildState {
    /// Human phrase for terminal states; `None` while the build is running.
    pub fn completion_phrase(self) -> Option<&'static str> {
        match self {
            BuildState::Closed => Some("completed"),
            BuildState::Failed => Some("failed"),
            BuildState::Canceled => Some("was canceled"),
            BuildState::Free | BuildState::Open | BuildState::Assigned => None,
        }
    }
}

impl fmt::Display for BuildState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BuildState::Free => "FREE",
            BuildState::Open => "OPEN",
            BuildState::Closed => "CLOSED",
            BuildState::Canceled => "CANCELED",
            BuildState::Assigned => "ASSIGNED",
            BuildState::Failed => "FAILED",
        };
        f.write_str(s)
    }
}

impl FromStr for BuildState {
    type Err = RelmonError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FREE" => Ok(BuildState::Free),
            "OPEN" => Ok(BuildState::Open),
            "CLOSED" => Ok(BuildState::Closed),
            "CANCELED" | "CANCELLED" => Ok(BuildState::Canceled),
            "ASSIGNED" => Ok(BuildState::Assigned),
            "FAILED" => Ok(BuildState::Failed),
            other => Err(RelmonError::InvalidEvent(format!(
                "unknown build state: {other}"
            ))),
        }
    }
}

impl TryFrom<String> for BuildState {
    type Error = RelmonError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

/// A build-system task changed state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BuildCompletedEvent {
    pub build_id: u64,
    pub state: BuildState,
    pub package_name: String,
    pub version: String,
    /// Build targets, if the build system reported them.
    #[serde(default)]
    pub targets: Vec<String>,
}

/// Typed inbound event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Event {
    Update(UpdateEvent),
    BuildCompleted(BuildCompletedEvent),
}
