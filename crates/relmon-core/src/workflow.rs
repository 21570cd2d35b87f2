//! Update-decision workflow.
//!
//! For one update event, every mapped target runs through:
//!
//! ```text
//! RECEIVED -> VALIDATING -> COMPARING -> TICKETING -> TICKETED -> [BUILDING] -> DONE
//! ```
//!
//! Any step may end the target early with a [`DropSignal`]. Targets are
//! independent: a failure for one never stops the others, and no
//! collaborator error escapes [`UpdateWorkflow::handle_update`].

use std::cmp::Ordering;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, instrument, Instrument};

use relmon_state::CorrelationCache;

use crate::build_completion::{handle_build_completion, CompletionOutcome};
use crate::collaborators::{
    BuildOptions, BuildOutput, Collaborators, MonitoringSettings, NotifyOptions, PatchOptions,
    TicketId,
};
use crate::config::RelmonConfig;
use crate::domain::error::{CollaboratorError, Result};
use crate::domain::event::{BuildCompletedEvent, DistroMapping, Event, UpdateEvent};
use crate::domain::outcome::{
    BuildReport, DropReason, DropSignal, EventReport, TargetOutcome, TicketReport,
};
use crate::domain::package::PackageTarget;
use crate::obs::{
    emit_build_finished, emit_build_started, emit_collaborator_warning, emit_event_received,
    emit_ticket_filed, emit_update_dropped, event_span,
};
use crate::templates;
use crate::version::{compare_upstream_to_repo, compare_upstream_versions, split_release_candidate};

/// Result of [`UpdateWorkflow::process`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProcessOutcome {
    Update(EventReport),
    BuildCompleted(CompletionOutcome),
}

/// Drives update events through validation, comparison, ticketing and
/// scratch builds.
///
/// The cache handle is injected and may be shared with other workers.
pub struct UpdateWorkflow {
    config: RelmonConfig,
    collaborators: Collaborators,
    cache: Arc<dyn CorrelationCache>,
}

impl UpdateWorkflow {
    pub fn new(
        config: RelmonConfig,
        collaborators: Collaborators,
        cache: Arc<dyn CorrelationCache>,
    ) -> Self {
        Self {
            config,
            collaborators,
            cache,
        }
    }

    pub fn config(&self) -> &RelmonConfig {
        &self.config
    }

    /// Dispatch a typed event.
    pub async fn process(&self, event: &Event) -> Result<ProcessOutcome> {
        match event {
            Event::Update(update) => Ok(ProcessOutcome::Update(self.handle_update(update).await)),
            Event::BuildCompleted(done) => Ok(ProcessOutcome::BuildCompleted(
                self.handle_build_completion(done).await?,
            )),
        }
    }

    /// Post the status of a finished build to its correlated ticket.
    pub async fn handle_build_completion(
        &self,
        event: &BuildCompletedEvent,
    ) -> Result<CompletionOutcome> {
        handle_build_completion(
            self.cache.as_ref(),
            self.collaborators.notifier.as_ref(),
            &self.config,
            event,
        )
        .await
    }

    /// Decide, per mapped target, whether the new release warrants a ticket.
    pub async fn handle_update(&self, event: &UpdateEvent) -> EventReport {
        self.run_update(event)
            .instrument(event_span(&event.project_name, event.project_id))
            .await
    }

    async fn run_update(&self, event: &UpdateEvent) -> EventReport {
        let mut report = EventReport::new(&event.project_name, &event.new_version);

        let mappings: Vec<&DistroMapping> = event.mappings_for(&self.config.distro).collect();
        emit_event_received(&event.project_name, &event.new_version, mappings.len());

        if mappings.is_empty() {
            let message = format!(
                "no {} mapping for project {}",
                self.config.distro, event.project_name
            );
            report
                .outcomes
                .push(self.dropped(event, None, DropReason::NoDistroMapping, message, None));
            return report;
        }

        for mapping in mappings {
            let outcome = self.process_target(event, mapping).await;
            report.outcomes.push(outcome);
        }

        report
    }

    #[instrument(skip(self, event, mapping), fields(package = %mapping.package_name))]
    async fn process_target(&self, event: &UpdateEvent, mapping: &DistroMapping) -> TargetOutcome {
        let package = PackageTarget::new(&mapping.package_name, &self.config.distro);
        let name = Some(package.name.as_str());

        // VALIDATING
        let settings = match self.collaborators.monitoring.validate(&package).await {
            Ok(settings) => settings,
            Err(e) => return self.dropped_on_error(event, name, DropReason::DistGitError, e),
        };
        if !settings.monitoring {
            let message = format!("monitoring is disabled for {}", package.name);
            return self.dropped(event, name, DropReason::MonitoringDisabled, message, None);
        }

        let retirement = match self.collaborators.retirement.validate(&package).await {
            Ok(status) => status,
            Err(e) => return self.dropped_on_error(event, name, DropReason::PdcError, e),
        };
        if retirement.retired {
            let message = format!("{} is retired", package.name);
            return self.dropped(event, name, DropReason::Retired, message, None);
        }

        let metadata = match self.collaborators.metadata.validate(&package).await {
            Ok(metadata) => metadata,
            Err(e) => return self.dropped_on_error(event, name, DropReason::MdapiError, e),
        };
        let package = package.with_metadata(metadata.version, metadata.release);
        let name = Some(package.name.as_str());

        // COMPARING
        let Some(upstream) = considered_version(event, &settings) else {
            let message = format!(
                "{} is a pre-release and only stable releases are monitored",
                event.new_version
            );
            return self.dropped(event, name, DropReason::NotStable, message, None);
        };

        let ordering = compare_upstream_to_repo(
            &upstream,
            &package.current_version,
            &package.current_release,
        );
        debug!(
            upstream = %upstream,
            packaged = %package.evr(),
            ordering = ?ordering,
            "Compared upstream with packaged version"
        );
        if ordering != Ordering::Greater {
            let message = format!(
                "upstream {} is not newer than packaged {}",
                upstream,
                package.evr()
            );
            return self.dropped(event, name, DropReason::NotNewer, message, None);
        }

        // TICKETING
        let releases = releases_retrieved(event, &settings, &package, &upstream);
        let description =
            templates::ticket_description(&self.config, event, &package, &upstream, &releases);
        let opts = NotifyOptions::file_or_update(templates::ticket_title(&package.name, &upstream));

        let ticket_id = match self
            .collaborators
            .notifier
            .notify(&package, &description, &opts)
            .await
        {
            Ok(Some(id)) => id,
            Ok(None) => {
                let message = format!("no ticket was filed for {}", package.name);
                return self.dropped(event, name, DropReason::TicketError, message, None);
            }
            Err(e) => return self.dropped_on_error(event, name, DropReason::TicketError, e),
        };
        emit_ticket_filed(&package.name, &upstream, ticket_id);

        // TICKETED
        let build = if settings.scratch_build {
            Some(self.scratch_build(&package, &upstream, ticket_id).await)
        } else {
            None
        };

        TargetOutcome::Ticketed(TicketReport {
            package_name: package.name.clone(),
            ticket_id,
            upstream_version: upstream,
            build,
        })
    }

    /// BUILDING -> BUILD-OK | BUILD-FAILED
    async fn scratch_build(
        &self,
        package: &PackageTarget,
        upstream: &str,
        ticket_id: TicketId,
    ) -> BuildReport {
        emit_build_started(&package.name, ticket_id);
        let opts = BuildOptions {
            ticket_id,
            upstream_version: upstream.to_string(),
        };

        match self.collaborators.builder.build(package, &opts).await {
            Ok(output) => self.build_succeeded(package, ticket_id, output).await,
            Err(e) => self.build_failed(package, upstream, ticket_id, e).await,
        }
    }

    async fn build_succeeded(
        &self,
        package: &PackageTarget,
        ticket_id: TicketId,
        output: BuildOutput,
    ) -> BuildReport {
        let correlated = self.correlate(package, output.build_id, ticket_id).await;

        if let Some(message) = output.message.as_deref().filter(|m| !m.trim().is_empty()) {
            if let Err(e) = self
                .collaborators
                .notifier
                .notify(package, message, &NotifyOptions::comment(ticket_id))
                .await
            {
                emit_collaborator_warning("build-message", &package.name, &e);
            }
        }

        let mut patch_error = None;
        if !output.patch.is_empty() {
            let opts = PatchOptions {
                ticket_id,
                filename: output.patch_filename.clone(),
            };
            if let Err(e) = self
                .collaborators
                .patcher
                .submit_patch(package, &output.patch, &opts)
                .await
            {
                emit_collaborator_warning("patch", &package.name, &e);
                patch_error = Some(e.message);
            }
        }

        emit_build_finished(&package.name, Some(output.build_id), true);
        BuildReport {
            build_id: Some(output.build_id),
            succeeded: true,
            error: None,
            correlated,
            patch_error,
        }
    }

    async fn build_failed(
        &self,
        package: &PackageTarget,
        upstream: &str,
        ticket_id: TicketId,
        error: CollaboratorError,
    ) -> BuildReport {
        // A build that failed after submission still finishes later, and
        // its completion must find the ticket.
        let correlated = match error.build_id {
            Some(build_id) => self.correlate(package, build_id, ticket_id).await,
            None => false,
        };

        let comment = templates::build_failure_comment(&self.config, package, upstream, &error);
        if let Err(e) = self
            .collaborators
            .notifier
            .notify(package, &comment, &NotifyOptions::comment(ticket_id))
            .await
        {
            emit_collaborator_warning("build-failure-comment", &package.name, &e);
        }

        emit_build_finished(&package.name, error.build_id, false);
        BuildReport {
            build_id: error.build_id,
            succeeded: false,
            error: Some(error.message),
            correlated,
            patch_error: None,
        }
    }

    /// Record `build_id -> ticket_id`; returns whether it was stored.
    async fn correlate(&self, package: &PackageTarget, build_id: u64, ticket_id: TicketId) -> bool {
        match self
            .cache
            .insert(&build_id.to_string(), &ticket_id.to_string())
            .await
        {
            Ok(_) => {
                info!(build_id = build_id, ticket_id = ticket_id, "Build correlated with ticket");
                true
            }
            Err(e) => {
                emit_collaborator_warning("correlation-cache", &package.name, &e);
                false
            }
        }
    }

    fn dropped(
        &self,
        event: &UpdateEvent,
        package: Option<&str>,
        reason: DropReason,
        message: String,
        trace: Option<String>,
    ) -> TargetOutcome {
        emit_update_dropped(&event.project_name, package, reason, &message);
        TargetOutcome::Dropped(DropSignal {
            reason,
            project_name: event.project_name.clone(),
            package_name: package.map(str::to_string),
            message,
            trace,
        })
    }

    fn dropped_on_error(
        &self,
        event: &UpdateEvent,
        package: Option<&str>,
        reason: DropReason,
        error: CollaboratorError,
    ) -> TargetOutcome {
        self.dropped(event, package, reason, error.message, error.trace)
    }
}

/// The upstream version a target is evaluated against.
///
/// Stable-only monitoring prefers the newest stable version from the
/// event; with none listed, a pre-release `new_version` yields `None`.
fn considered_version(event: &UpdateEvent, settings: &MonitoringSettings) -> Option<String> {
    if !settings.stable_only {
        return Some(event.new_version.clone());
    }
    if let Some(stable) = event.stable_versions.first() {
        return Some(stable.clone());
    }
    if split_release_candidate(&event.new_version).is_pre_release() {
        None
    } else {
        Some(event.new_version.clone())
    }
}

/// Versions listed as "retrieved" in the ticket description.
///
/// Stable-only monitoring never lists pre-releases.
fn releases_retrieved(
    event: &UpdateEvent,
    settings: &MonitoringSettings,
    package: &PackageTarget,
    upstream: &str,
) -> Vec<String> {
    if !settings.all_versions {
        return vec![upstream.to_string()];
    }

    let mut newer: Vec<String> = event
        .upstream_versions
        .iter()
        .filter(|v| !settings.stable_only || !split_release_candidate(v).is_pre_release())
        .filter(|v| {
            compare_upstream_to_repo(v, &package.current_version, &package.current_release)
                == Ordering::Greater
        })
        .cloned()
        .collect();
    if newer.is_empty() {
        newer.push(upstream.to_string());
    }
    newer.sort_by(|a, b| compare_upstream_versions(b, a));
    newer.dedup();
    newer
}
