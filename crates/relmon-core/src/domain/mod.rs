//! Domain models for relmon.
//!
//! Canonical definitions for the core entities:
//! - `UpdateEvent` / `BuildCompletedEvent`: typed inbound events
//! - `PackageTarget`: one downstream package being evaluated
//! - `TargetOutcome` / `EventReport`: what the workflow decided
//! - `RelmonError` / `CollaboratorError`: error taxonomy

pub mod error;
pub mod event;
pub mod outcome;
pub mod package;

pub use error::{CollaboratorError, CollaboratorResult, RelmonError, Result};
pub use event::{BuildCompletedEvent, BuildState, DistroMapping, Event, UpdateEvent};
pub use outcome::{BuildReport, DropReason, DropSignal, EventReport, TargetOutcome, TicketReport};
pub use package::PackageTarget;
