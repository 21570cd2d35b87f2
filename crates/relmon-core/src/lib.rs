//! relmon Core Library
//!
//! Version comparison and update decisions for a downstream distribution
//! tracking upstream releases:
//! - `version`: RPM-style, pre-release aware and packaged-version comparison
//! - `workflow`: per-target validation, comparison, ticketing and scratch builds
//! - `build_completion`: relays finished builds to the ticket that asked for them

pub mod build_completion;
pub mod collaborators;
pub mod config;
pub mod domain;
pub mod fakes;
pub mod obs;
pub mod series;
pub mod telemetry;
pub mod templates;
pub mod version;
pub mod workflow;

pub use build_completion::{handle_build_completion, CompletionOutcome};

pub use collaborators::{
    BuildOptions, BuildOutput, Builder, Collaborators, MonitoringSettings, Notifier,
    NotifyOptions, PackageMetadata, PatchOptions, Patcher, RetirementStatus, TicketId, Validator,
};

pub use config::RelmonConfig;

pub use domain::{
    BuildCompletedEvent, BuildReport, BuildState, CollaboratorError, CollaboratorResult,
    DistroMapping, DropReason, DropSignal, Event, EventReport, PackageTarget, RelmonError, Result,
    TargetOutcome, TicketReport, UpdateEvent,
};

pub use relmon_state::{
    CorrelationCache, MemoryCorrelationCache, SurrealCorrelationCache, SurrealHandle,
};

pub use series::format_series;

pub use version::{
    compare_upstream_to_repo, compare_upstream_versions, compare_versions, ordering_to_i8,
    split_release_candidate, ReleaseCandidateSplit,
};

pub use workflow::{ProcessOutcome, UpdateWorkflow};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
