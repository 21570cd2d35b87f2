//! What the update workflow decided for each target.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Why an update was not turned into a ticket.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum DropReason {
    /// The event maps to no package in the configured distribution.
    NoDistroMapping,
    /// Monitoring settings could not be read.
    DistGitError,
    /// The package owner disabled monitoring.
    MonitoringDisabled,
    /// Retirement status could not be read.
    PdcError,
    Retired,
    /// Packaged version/release could not be read.
    MdapiError,
    /// Stable-only monitoring, but no stable version in the event.
    NotStable,
    NotNewer,
    /// Filing or updating the ticket failed.
    TicketError,
}

impl DropReason {
    /// Stable code used in logs and reports.
    pub fn code(self) -> &'static str {
        match self {
            DropReason::NoDistroMapping => "no-distro-mapping",
            DropReason::DistGitError => "dist-git-error",
            DropReason::MonitoringDisabled => "monitoring-disabled",
            DropReason::PdcError => "pdc-error",
            DropReason::Retired => "retired",
            DropReason::MdapiError => "mdapi-error",
            DropReason::NotStable => "not-stable",
            DropReason::NotNewer => "not-newer",
            DropReason::TicketError => "ticket-error",
        }
    }
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Structured "update dropped" signal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DropSignal {
    pub reason: DropReason,
    pub project_name: String,
    /// Absent when the drop concerns the whole event.
    pub package_name: Option<String>,
    pub message: String,
    pub trace: Option<String>,
}

/// Result of the scratch-build stage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BuildReport {
    /// Set whenever the builder got far enough to submit a build.
    pub build_id: Option<u64>,
    pub succeeded: bool,
    pub error: Option<String>,
    /// Whether `build_id -> ticket_id` made it into the correlation cache.
    pub correlated: bool,
    pub patch_error: Option<String>,
}

/// A ticket was filed or updated for a target.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TicketReport {
    pub package_name: String,
    pub ticket_id: u64,
    pub upstream_version: String,
    /// `None` when no scratch build was requested.
    pub build: Option<BuildReport>,
}

/// Terminal state of one target.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TargetOutcome {
    Dropped(DropSignal),
    Ticketed(TicketReport),
}

impl TargetOutcome {
    pub fn drop_reason(&self) -> Option<DropReason> {
        match self {
            TargetOutcome::Dropped(signal) => Some(signal.reason),
            TargetOutcome::Ticketed(_) => None,
        }
    }

    pub fn ticket(&self) -> Option<&TicketReport> {
        match self {
            TargetOutcome::Dropped(_) => None,
            TargetOutcome::Ticketed(report) => Some(report),
        }
    }
}

/// Per-event summary: one outcome per target.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventReport {
    pub project_name: String,
    pub upstream_version: String,
    pub outcomes: Vec<TargetOutcome>,
}

impl EventReport {
    pub fn new(project_name: impl Into<String>, upstream_version: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            upstream_version: upstream_version.into(),
            outcomes: Vec::new(),
        }
    }

    pub fn tickets(&self) -> impl Iterator<Item = &TicketReport> {
        self.outcomes.iter().filter_map(TargetOutcome::ticket)
    }

    pub fn drops(&self) -> impl Iterator<Item = &DropSignal> {
        self.outcomes.iter().filter_map(|o| match o {
            TargetOutcome::Dropped(signal) => Some(signal),
            TargetOutcome::Ticketed(_) => None,
        })
    }
}
