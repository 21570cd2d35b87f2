//! Structured observability hooks for relmon decisions.
//!
//! This module provides:
//! - Event-scoped tracing spans via `EventSpan` RAII guard
//! - Emission functions for the key workflow transitions: event received,
//!   update dropped, ticket filed, build started/finished, completion posted
//!
//! Filter with `RUST_LOG`; JSON output is selected at tracing init.

use tracing::info;

use crate::domain::outcome::DropReason;

/// RAII guard that enters an event-scoped tracing span.
///
/// # Example
///
/// ```ignore
/// let _span = EventSpan::enter("flatpak", 6377);
/// // every log line now carries project = "flatpak", project_id = 6377
/// ```
pub struct EventSpan {
    _span: tracing::span::EnteredSpan,
}

impl EventSpan {
    pub fn enter(project: &str, project_id: u64) -> Self {
        Self {
            _span: event_span(project, project_id).entered(),
        }
    }
}

/// Event-scoped span for async code, where an entered guard must not be
/// held across `.await`.
pub fn event_span(project: &str, project_id: u64) -> tracing::Span {
    tracing::info_span!("relmon.event", project = %project, project_id = project_id)
}

/// Emit event: an update event arrived with `targets` matching mappings.
pub fn emit_event_received(project: &str, version: &str, targets: usize) {
    info!(event = "update.received", project = %project, version = %version, targets = targets);
}

/// Emit event: an update was dropped for a target (or the whole event).
pub fn emit_update_dropped(project: &str, package: Option<&str>, reason: DropReason, message: &str) {
    info!(
        event = "update.dropped",
        project = %project,
        package = package.unwrap_or("-"),
        reason = %reason,
        message = %message,
    );
}

/// Emit event: a ticket was filed or updated.
pub fn emit_ticket_filed(package: &str, version: &str, ticket_id: u64) {
    info!(event = "ticket.filed", package = %package, version = %version, ticket_id = ticket_id);
}

pub fn emit_build_started(package: &str, ticket_id: u64) {
    info!(event = "build.started", package = %package, ticket_id = ticket_id);
}

pub fn emit_build_finished(package: &str, build_id: Option<u64>, success: bool) {
    info!(
        event = "build.finished",
        package = %package,
        build_id = ?build_id,
        success = success,
    );
}

pub fn emit_build_completion_posted(build_id: u64, ticket_id: u64, state: &str) {
    info!(
        event = "build.completion_posted",
        build_id = build_id,
        ticket_id = ticket_id,
        state = %state,
    );
}

/// Emit event: a collaborator failed in a non-fatal step (warning level).
pub fn emit_collaborator_warning(step: &str, package: &str, error: &dyn std::fmt::Display) {
    tracing::warn!(event = "collaborator.warning", step = %step, package = %package, error = %error);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_span_create() {
        let _span = EventSpan::enter("flatpak", 6377);
        emit_update_dropped("flatpak", None, DropReason::NoDistroMapping, "no mapping");
    }
}
