//! Collaborator contracts.
//!
//! The workflow talks to the outside world through four capabilities:
//! - [`Validator`]: answers one question about a package (monitoring
//!   settings, retirement status, packaged metadata)
//! - [`Builder`]: prepares the new version and submits a scratch build
//! - [`Notifier`]: files, updates and comments on tickets
//! - [`Patcher`]: attaches a patch to a ticket
//!
//! Each trait has a single method. Implementations own their transport,
//! retries and timeouts; the workflow treats every call as opaque.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::error::CollaboratorResult;
use crate::domain::package::PackageTarget;

/// Identifier of a ticket in the issue tracker.
pub type TicketId = u64;

/// Package owner preferences read from dist-git.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MonitoringSettings {
    pub monitoring: bool,
    pub scratch_build: bool,
    pub stable_only: bool,
    pub all_versions: bool,
}

/// Retirement status of a package.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RetirementStatus {
    pub retired: bool,
    pub active_branches: u32,
}

/// Currently packaged version and release.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PackageMetadata {
    /// Advisory only; the workflow recomputes newness itself.
    pub newer: bool,
    pub version: String,
    pub release: String,
}

/// Answers one question about a package.
#[async_trait]
pub trait Validator: Send + Sync {
    type Output: Send;

    async fn validate(&self, package: &PackageTarget) -> CollaboratorResult<Self::Output>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    pub ticket_id: TicketId,
    pub upstream_version: String,
}

/// A submitted scratch build and the patch that produced it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BuildOutput {
    pub build_id: u64,
    pub patch: String,
    pub patch_filename: String,
    /// Informational note for the packager, e.g. identical sources.
    #[serde(default)]
    pub message: Option<String>,
}

/// Prepares a package for a new upstream version and starts a build.
///
/// On failure after submission, the error carries the build id so the
/// completion event can still be correlated.
#[async_trait]
pub trait Builder: Send + Sync {
    async fn build(
        &self,
        package: &PackageTarget,
        opts: &BuildOptions,
    ) -> CollaboratorResult<BuildOutput>;
}

/// Where a notification goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyOptions {
    /// Comment on this ticket.
    pub ticket_id: Option<TicketId>,
    /// Find an open ticket with this title, or file a new one.
    pub search_title: Option<String>,
}

impl NotifyOptions {
    /// File a new ticket, or update one already open under `title`.
    pub fn file_or_update(title: impl Into<String>) -> Self {
        Self {
            ticket_id: None,
            search_title: Some(title.into()),
        }
    }

    /// Comment on an existing ticket.
    pub fn comment(ticket_id: TicketId) -> Self {
        Self {
            ticket_id: Some(ticket_id),
            search_title: None,
        }
    }
}

/// Talks to the issue tracker.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Returns the ticket touched, or `None` when no ticket resulted.
    async fn notify(
        &self,
        package: &PackageTarget,
        message: &str,
        opts: &NotifyOptions,
    ) -> CollaboratorResult<Option<TicketId>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchOptions {
    pub ticket_id: TicketId,
    pub filename: String,
}

/// Attaches patches to tickets.
#[async_trait]
pub trait Patcher: Send + Sync {
    async fn submit_patch(
        &self,
        package: &PackageTarget,
        patch: &str,
        opts: &PatchOptions,
    ) -> CollaboratorResult<TicketId>;
}

/// The full set of collaborators a workflow needs.
#[derive(Clone)]
pub struct Collaborators {
    pub monitoring: Arc<dyn Validator<Output = MonitoringSettings>>,
    pub retirement: Arc<dyn Validator<Output = RetirementStatus>>,
    pub metadata: Arc<dyn Validator<Output = PackageMetadata>>,
    pub builder: Arc<dyn Builder>,
    pub notifier: Arc<dyn Notifier>,
    pub patcher: Arc<dyn Patcher>,
}
