//! Ticket and comment text.

use crate::config::RelmonConfig;
use crate::domain::error::CollaboratorError;
use crate::domain::event::{BuildCompletedEvent, UpdateEvent};
use crate::domain::package::PackageTarget;
use crate::series::format_series;

/// Title used to find or file the ticket for a new version.
pub fn ticket_title(package_name: &str, version: &str) -> String {
    format!("{package_name}-{version} is available")
}

/// Body of a new-version ticket.
pub fn ticket_description(
    config: &RelmonConfig,
    event: &UpdateEvent,
    package: &PackageTarget,
    latest: &str,
    releases: &[String],
) -> String {
    let retrieved = if releases.is_empty() {
        latest.to_string()
    } else {
        releases.join(", ")
    };

    format!(
        "Releases retrieved: {retrieved}\n\
         Upstream release that is considered latest: {latest}\n\
         Current version/release in {branch}: {evr}\n\
         URL: {homepage}\n\
         \n\
         Please consult the package updates policy before you issue an update \
         to a stable branch.\n\
         \n\
         More information about the service that created this ticket can be \
         found at: {explanation}\n\
         \n\
         Please keep in mind that with any upstream change, there may also be \
         packaging changes that need to be made. Specifically, please remember \
         that it is your responsibility to review the new version to ensure \
         that the licensing is still correct and that no non-free or legally \
         problematic items have been added upstream.\n\
         \n\
         Based on the information from release monitoring: {project}",
        branch = config.branch,
        evr = package.evr(),
        homepage = event.project_homepage,
        explanation = config.explanation_url,
        project = config.project_link(event.project_id),
    )
}

/// Comment posted when the scratch build could not be created.
pub fn build_failure_comment(
    config: &RelmonConfig,
    package: &PackageTarget,
    version: &str,
    error: &CollaboratorError,
) -> String {
    let mut text = format!(
        "Failed to create a scratch build for {}-{}.\n\nError: {}\n",
        package.name, version, error.message
    );

    for (label, section) in [
        ("stdout", &error.stdout),
        ("stderr", &error.stderr),
        ("traceback", &error.trace),
    ] {
        if let Some(body) = section.as_deref().filter(|b| !b.trim().is_empty()) {
            text.push_str(&format!("\n{label}:\n```\n{}\n```\n", body.trim_end()));
        }
    }

    text.push_str(&format!(
        "\nIf you think this failure is caused by a problem in the release \
         monitoring service itself, please report it at {}",
        config.tool_issue_tracker_url
    ));
    text
}

/// One-line status for a finished build.
pub fn build_completion_message(
    config: &RelmonConfig,
    event: &BuildCompletedEvent,
    phrase: &str,
) -> String {
    let targets = if event.targets.is_empty() {
        String::new()
    } else {
        format!(" for {}", format_series(&event.targets, config.series_limit))
    };

    format!(
        "Scratch build of {}-{}{} {}: {}",
        event.package_name,
        event.version,
        targets,
        phrase,
        config.build_link(event.build_id)
    )
}
