//! Scripted collaborators.
//!
//! Canned-answer implementations of the collaborator traits, used by the
//! test suites and by the CLI when replaying recorded fixtures. Every fake
//! counts or records its calls so callers can assert on what was asked.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use crate::collaborators::{
    BuildOptions, BuildOutput, Builder, Collaborators, MonitoringSettings, Notifier,
    NotifyOptions, PackageMetadata, PatchOptions, Patcher, RetirementStatus, TicketId, Validator,
};
use crate::domain::error::{CollaboratorError, CollaboratorResult};
use crate::domain::package::PackageTarget;

// ---------------------------------------------------------------------------
// StaticValidator
// ---------------------------------------------------------------------------

/// Validator that returns the same answer for every package.
#[derive(Debug)]
pub struct StaticValidator<T> {
    answer: CollaboratorResult<T>,
    calls: AtomicUsize,
}

impl<T> StaticValidator<T> {
    pub fn new(answer: CollaboratorResult<T>) -> Self {
        Self {
            answer,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn ok(value: T) -> Self {
        Self::new(Ok(value))
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self::new(Err(CollaboratorError::new(message)))
    }

    /// Number of `validate` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<T> Validator for StaticValidator<T>
where
    T: Clone + Send + Sync,
{
    type Output = T;

    async fn validate(&self, _package: &PackageTarget) -> CollaboratorResult<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer.clone()
    }
}

// ---------------------------------------------------------------------------
// ScriptedBuilder
// ---------------------------------------------------------------------------

/// Builder that returns a fixed outcome and records the packages built.
#[derive(Debug)]
pub struct ScriptedBuilder {
    outcome: CollaboratorResult<BuildOutput>,
    built: Mutex<Vec<(String, BuildOptions)>>,
}

impl ScriptedBuilder {
    pub fn new(outcome: CollaboratorResult<BuildOutput>) -> Self {
        Self {
            outcome,
            built: Mutex::new(Vec::new()),
        }
    }

    pub fn succeeding(output: BuildOutput) -> Self {
        Self::new(Ok(output))
    }

    pub fn failing(error: CollaboratorError) -> Self {
        Self::new(Err(error))
    }

    /// `(package name, options)` for every build requested.
    pub fn builds(&self) -> Vec<(String, BuildOptions)> {
        self.built
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl Builder for ScriptedBuilder {
    async fn build(
        &self,
        package: &PackageTarget,
        opts: &BuildOptions,
    ) -> CollaboratorResult<BuildOutput> {
        self.built
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((package.name.clone(), opts.clone()));
        self.outcome.clone()
    }
}

// ---------------------------------------------------------------------------
// RecordingNotifier
// ---------------------------------------------------------------------------

/// One notification as seen by [`RecordingNotifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentNotification {
    pub package_name: String,
    pub message: String,
    pub opts: NotifyOptions,
}

/// Notifier that records every message.
///
/// New tickets get increasing ids starting from `first_ticket_id`;
/// comments return the ticket they were posted to.
#[derive(Debug)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<SentNotification>>,
    next_ticket_id: AtomicU64,
    failure: Option<CollaboratorError>,
    fail_new_tickets_only: bool,
    withhold_ticket_ids: bool,
}

impl RecordingNotifier {
    pub fn new(first_ticket_id: TicketId) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            next_ticket_id: AtomicU64::new(first_ticket_id),
            failure: None,
            fail_new_tickets_only: false,
            withhold_ticket_ids: false,
        }
    }

    /// Every call fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(CollaboratorError::new(message)),
            ..Self::new(1)
        }
    }

    /// Filing new tickets fails with `message`; comments still succeed.
    pub fn failing_new_tickets(message: impl Into<String>) -> Self {
        Self {
            fail_new_tickets_only: true,
            ..Self::failing(message)
        }
    }

    /// Accepts every message but never reports a ticket id.
    pub fn withholding_ticket_ids() -> Self {
        Self {
            withhold_ticket_ids: true,
            ..Self::new(1)
        }
    }

    pub fn sent(&self) -> Vec<SentNotification> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for RecordingNotifier {
    fn default() -> Self {
        Self::new(1)
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(
        &self,
        package: &PackageTarget,
        message: &str,
        opts: &NotifyOptions,
    ) -> CollaboratorResult<Option<TicketId>> {
        if let Some(err) = &self.failure {
            if !self.fail_new_tickets_only || opts.ticket_id.is_none() {
                return Err(err.clone());
            }
        }

        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(SentNotification {
                package_name: package.name.clone(),
                message: message.to_string(),
                opts: opts.clone(),
            });

        if self.withhold_ticket_ids {
            return Ok(None);
        }

        let ticket_id = match opts.ticket_id {
            Some(id) => id,
            None => self.next_ticket_id.fetch_add(1, Ordering::SeqCst),
        };
        Ok(Some(ticket_id))
    }
}

// ---------------------------------------------------------------------------
// RecordingPatcher
// ---------------------------------------------------------------------------

/// Patcher that records submitted patches.
#[derive(Debug, Default)]
pub struct RecordingPatcher {
    patches: Mutex<Vec<(String, String, PatchOptions)>>,
    failure: Option<CollaboratorError>,
}

impl RecordingPatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            patches: Mutex::new(Vec::new()),
            failure: Some(CollaboratorError::new(message)),
        }
    }

    /// `(package name, patch, options)` for every accepted patch.
    pub fn patches(&self) -> Vec<(String, String, PatchOptions)> {
        self.patches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl Patcher for RecordingPatcher {
    async fn submit_patch(
        &self,
        package: &PackageTarget,
        patch: &str,
        opts: &PatchOptions,
    ) -> CollaboratorResult<TicketId> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        self.patches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((package.name.clone(), patch.to_string(), opts.clone()));
        Ok(opts.ticket_id)
    }
}

// ---------------------------------------------------------------------------
// Scripted collaborator set
// ---------------------------------------------------------------------------

/// Typed handles to a full set of scripted collaborators.
///
/// Keeps concrete `Arc`s around so tests can inspect calls after the
/// workflow (which only sees trait objects) has run.
#[derive(Clone)]
pub struct ScriptedCollaborators {
    pub monitoring: Arc<StaticValidator<MonitoringSettings>>,
    pub retirement: Arc<StaticValidator<RetirementStatus>>,
    pub metadata: Arc<StaticValidator<PackageMetadata>>,
    pub builder: Arc<ScriptedBuilder>,
    pub notifier: Arc<RecordingNotifier>,
    pub patcher: Arc<RecordingPatcher>,
}

impl ScriptedCollaborators {
    /// Monitoring on (no scratch build), not retired, packaged at
    /// `version`-`release`, builds succeed with id 1000.
    pub fn packaged(version: &str, release: &str) -> Self {
        Self {
            monitoring: Arc::new(StaticValidator::ok(MonitoringSettings {
                monitoring: true,
                ..MonitoringSettings::default()
            })),
            retirement: Arc::new(StaticValidator::ok(RetirementStatus {
                retired: false,
                active_branches: 1,
            })),
            metadata: Arc::new(StaticValidator::ok(PackageMetadata {
                newer: false,
                version: version.to_string(),
                release: release.to_string(),
            })),
            builder: Arc::new(ScriptedBuilder::succeeding(BuildOutput {
                build_id: 1000,
                patch: "--- a/pkg.spec\n+++ b/pkg.spec\n".to_string(),
                patch_filename: "0001-Update.patch".to_string(),
                message: None,
            })),
            notifier: Arc::new(RecordingNotifier::default()),
            patcher: Arc::new(RecordingPatcher::new()),
        }
    }

    pub fn with_monitoring(mut self, validator: StaticValidator<MonitoringSettings>) -> Self {
        self.monitoring = Arc::new(validator);
        self
    }

    pub fn with_retirement(mut self, validator: StaticValidator<RetirementStatus>) -> Self {
        self.retirement = Arc::new(validator);
        self
    }

    pub fn with_metadata(mut self, validator: StaticValidator<PackageMetadata>) -> Self {
        self.metadata = Arc::new(validator);
        self
    }

    pub fn with_builder(mut self, builder: ScriptedBuilder) -> Self {
        self.builder = Arc::new(builder);
        self
    }

    pub fn with_notifier(mut self, notifier: RecordingNotifier) -> Self {
        self.notifier = Arc::new(notifier);
        self
    }

    pub fn with_patcher(mut self, patcher: RecordingPatcher) -> Self {
        self.patcher = Arc::new(patcher);
        self
    }

    /// Trait-object view for the workflow.
    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            monitoring: self.monitoring.clone(),
            retirement: self.retirement.clone(),
            metadata: self.metadata.clone(),
            builder: self.builder.clone(),
            notifier: self.notifier.clone(),
            patcher: self.patcher.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_validator_counts_calls() {
        let validator = StaticValidator::ok(RetirementStatus::default());
        let pkg = PackageTarget::new("a", "Fedora");
        validator.validate(&pkg).await.unwrap();
        validator.validate(&pkg).await.unwrap();
        assert_eq!(validator.calls(), 2);
    }

    #[tokio::test]
    async fn notifier_assigns_ids_and_reuses_for_comments() {
        let notifier = RecordingNotifier::new(10);
        let pkg = PackageTarget::new("a", "Fedora");

        let first = notifier
            .notify(&pkg, "new", &NotifyOptions::file_or_update("a-1 is available"))
            .await
            .unwrap();
        let comment = notifier
            .notify(&pkg, "note", &NotifyOptions::comment(10))
            .await
            .unwrap();

        assert_eq!(first, Some(10));
        assert_eq!(comment, Some(10));
        assert_eq!(notifier.sent().len(), 2);
    }

    #[tokio::test]
    async fn notifier_failing_new_tickets_still_comments() {
        let notifier = RecordingNotifier::failing_new_tickets("tracker down");
        let pkg = PackageTarget::new("a", "Fedora");

        assert!(notifier
            .notify(&pkg, "new", &NotifyOptions::file_or_update("t"))
            .await
            .is_err());
        assert!(notifier
            .notify(&pkg, "note", &NotifyOptions::comment(3))
            .await
            .is_ok());
    }
}
