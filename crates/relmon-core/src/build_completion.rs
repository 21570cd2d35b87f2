//! Build-completion handling.
//!
//! Independent of the update workflow: when the build system reports a
//! state change, look the build up in the correlation cache and, when it is
//! one of ours and finished, tell the ticket that asked for it.

use serde::Serialize;
use tracing::debug;

use relmon_state::CorrelationCache;

use crate::collaborators::{Notifier, NotifyOptions, TicketId};
use crate::config::RelmonConfig;
use crate::domain::error::{RelmonError, Result};
use crate::domain::event::BuildCompletedEvent;
use crate::domain::package::PackageTarget;
use crate::obs::{emit_build_completion_posted, emit_collaborator_warning};
use crate::templates::build_completion_message;

/// What happened to a build-completion event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CompletionOutcome {
    /// The build is not in the correlation cache.
    NotTracked,
    /// The build has not reached a terminal state.
    InProgress,
    /// The status line was posted to the ticket.
    Posted { ticket_id: TicketId, message: String },
    /// Posting failed; the failure was logged.
    NotifyFailed { ticket_id: TicketId, error: String },
}

/// Post a one-line status to the ticket correlated with `event.build_id`.
///
/// Cache failures and corrupt cache entries are returned as errors;
/// notifier failures are reported in the outcome.
pub async fn handle_build_completion(
    cache: &dyn CorrelationCache,
    notifier: &dyn Notifier,
    config: &RelmonConfig,
    event: &BuildCompletedEvent,
) -> Result<CompletionOutcome> {
    let Some(value) = cache.retrieve(&event.build_id.to_string()).await? else {
        debug!(build_id = event.build_id, "Build not tracked, ignoring");
        return Ok(CompletionOutcome::NotTracked);
    };

    let Some(phrase) = event.state.completion_phrase() else {
        debug!(build_id = event.build_id, state = %event.state, "Build still in progress");
        return Ok(CompletionOutcome::InProgress);
    };

    let ticket_id: TicketId = value
        .trim()
        .parse()
        .map_err(|_| RelmonError::InvalidCorrelation {
            build_id: event.build_id,
            value: value.clone(),
        })?;

    let message = build_completion_message(config, event, phrase);
    let package = PackageTarget::new(&event.package_name, &config.distro);

    match notifier
        .notify(&package, &message, &NotifyOptions::comment(ticket_id))
        .await
    {
        Ok(_) => {
            emit_build_completion_posted(event.build_id, ticket_id, phrase);
            Ok(CompletionOutcome::Posted { ticket_id, message })
        }
        Err(e) => {
            emit_collaborator_warning("build-completion", &event.package_name, &e);
            Ok(CompletionOutcome::NotifyFailed {
                ticket_id,
                error: e.message,
            })
        }
    }
}
