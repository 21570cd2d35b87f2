//! relmon - upstream release monitoring for a downstream distribution
//!
//! ## Commands
//!
//! - `compare`: RPM-style comparison of two version strings
//! - `compare-upstream`: pre-release aware comparison of two upstream versions
//! - `compare-repo`: an upstream version against a packaged version + release
//! - `split-rc`: show how a version splits into base and pre-release marker
//! - `process`: run events through the workflow against recorded collaborator answers
//! - `build-completed`: relay a finished build to its correlated ticket

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use relmon_core::fakes::{
    RecordingNotifier, RecordingPatcher, ScriptedBuilder, ScriptedCollaborators, StaticValidator,
};
use relmon_core::{
    compare_upstream_to_repo, compare_upstream_versions, compare_versions, ordering_to_i8,
    split_release_candidate, telemetry, BuildCompletedEvent, BuildOutput, BuildState,
    CollaboratorError, CollaboratorResult, CorrelationCache, Event, MonitoringSettings, PackageMetadata, RelmonConfig,
    RetirementStatus, UpdateWorkflow,
};
use relmon_state::{SurrealCorrelationCache, SurrealHandle};

#[derive(Parser)]
#[command(name = "relmon")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Upstream release monitoring for downstream packages", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    /// Path to a TOML configuration file
    #[arg(short, long, global = true, env = "RELMON_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two version strings label by label (-1, 0 or 1)
    Compare { v1: String, v2: String },

    /// Compare two upstream versions, honouring pre-release markers
    CompareUpstream { v1: String, v2: String },

    /// Compare an upstream version with a packaged version and release
    CompareRepo {
        upstream: String,
        version: String,
        release: String,
    },

    /// Split a version into base, pre-release label and number
    SplitRc { version: String },

    /// Process events (one or a JSON array) against recorded collaborator answers
    Process {
        /// Event file (JSON, tagged with "kind")
        #[arg(short, long)]
        event: PathBuf,

        /// Collaborator fixture file (JSON)
        #[arg(short, long)]
        fixtures: PathBuf,
    },

    /// Relay a finished build to the ticket that requested it
    BuildCompleted {
        /// Build identifier
        #[arg(long)]
        build_id: u64,

        /// Final build state (CLOSED, FAILED, CANCELED, ...)
        #[arg(long)]
        state: BuildState,

        /// Package name
        #[arg(long)]
        name: String,

        /// Package version
        #[arg(long)]
        version: String,

        /// Build targets (repeatable)
        #[arg(long = "target")]
        targets: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref(), cli.verbose, cli.json)?;
    telemetry::init_from_config(&config).context("Failed to initialise logging")?;

    match cli.command {
        Commands::Compare { v1, v2 } => {
            println!("{}", cmd_compare(&v1, &v2));
            Ok(())
        }
        Commands::CompareUpstream { v1, v2 } => {
            println!("{}", cmd_compare_upstream(&v1, &v2));
            Ok(())
        }
        Commands::CompareRepo {
            upstream,
            version,
            release,
        } => {
            println!("{}", cmd_compare_repo(&upstream, &version, &release));
            Ok(())
        }
        Commands::SplitRc { version } => {
            let split = split_release_candidate(&version);
            println!("{}", serde_json::to_string_pretty(&split)?);
            Ok(())
        }
        Commands::Process { event, fixtures } => {
            let cache = open_cache().await?;
            let output = cmd_process(config, cache, &event, &fixtures).await?;
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
        Commands::BuildCompleted {
            build_id,
            state,
            name,
            version,
            targets,
        } => {
            let cache = open_cache().await?;
            let event = BuildCompletedEvent {
                build_id,
                state,
                package_name: name,
                version,
                targets,
            };
            let output = cmd_build_completed(&config, cache, &event).await?;
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
    }
}

/// Config file (or defaults), then `RELMON_*` overrides, then flags.
fn load_config(path: Option<&Path>, verbose: bool, json: bool) -> Result<RelmonConfig> {
    let mut config = match path {
        Some(path) => RelmonConfig::from_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => RelmonConfig::default(),
    }
    .apply_env();

    if verbose {
        config.log_level = "debug".to_string();
    }
    config.log_json |= json;
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

async fn open_cache() -> Result<Arc<dyn CorrelationCache>> {
    let handle = SurrealHandle::setup_from_env()
        .await
        .context("Failed to connect to correlation cache")?;
    Ok(Arc::new(SurrealCorrelationCache::new(Arc::new(handle))))
}

// ========== Comparison commands ==========

fn cmd_compare(v1: &str, v2: &str) -> i8 {
    ordering_to_i8(compare_versions(v1, v2))
}

fn cmd_compare_upstream(v1: &str, v2: &str) -> i8 {
    ordering_to_i8(compare_upstream_versions(v1, v2))
}

fn cmd_compare_repo(upstream: &str, version: &str, release: &str) -> i8 {
    ordering_to_i8(compare_upstream_to_repo(upstream, version, release))
}

// ========== Event processing ==========

/// A recorded collaborator answer: either a value or a failure.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Fixture<T> {
    Failure {
        error: String,
        #[serde(default)]
        trace: Option<String>,
        #[serde(default)]
        build_id: Option<u64>,
    },
    Value(T),
}

impl<T> Fixture<T> {
    fn into_result(self) -> CollaboratorResult<T> {
        match self {
            Fixture::Value(value) => Ok(value),
            Fixture::Failure {
                error,
                trace,
                build_id,
            } => {
                let mut err = CollaboratorError::new(error);
                err.trace = trace;
                err.build_id = build_id;
                Err(err)
            }
        }
    }
}

/// Collaborator answers replayed by `relmon process`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Fixtures {
    #[serde(default)]
    monitoring: Option<Fixture<MonitoringSettings>>,
    #[serde(default)]
    retirement: Option<Fixture<RetirementStatus>>,
    metadata: Fixture<PackageMetadata>,
    #[serde(default)]
    build: Option<Fixture<BuildOutput>>,
    #[serde(default)]
    first_ticket_id: Option<u64>,
    #[serde(default)]
    notifier_error: Option<String>,
    #[serde(default)]
    patcher_error: Option<String>,
}

impl Fixtures {
    fn into_collaborators(self) -> ScriptedCollaborators {
        let mut fakes = ScriptedCollaborators::packaged("", "")
            .with_metadata(StaticValidator::new(self.metadata.into_result()));
        if let Some(monitoring) = self.monitoring {
            fakes = fakes.with_monitoring(StaticValidator::new(monitoring.into_result()));
        }
        if let Some(retirement) = self.retirement {
            fakes = fakes.with_retirement(StaticValidator::new(retirement.into_result()));
        }
        if let Some(build) = self.build {
            fakes = fakes.with_builder(ScriptedBuilder::new(build.into_result()));
        }
        let notifier = match self.notifier_error {
            Some(message) => RecordingNotifier::failing(message),
            None => RecordingNotifier::new(self.first_ticket_id.unwrap_or(1)),
        };
        let patcher = match self.patcher_error {
            Some(message) => RecordingPatcher::failing(message),
            None => RecordingPatcher::new(),
        };
        fakes.with_notifier(notifier).with_patcher(patcher)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EventFile {
    Many(Vec<Event>),
    One(Box<Event>),
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

async fn cmd_process(
    config: RelmonConfig,
    cache: Arc<dyn CorrelationCache>,
    event_path: &Path,
    fixtures_path: &Path,
) -> Result<Value> {
    let events = match read_json::<EventFile>(event_path)? {
        EventFile::Many(events) => events,
        EventFile::One(event) => vec![*event],
    };
    let fakes = read_json::<Fixtures>(fixtures_path)?.into_collaborators();
    let workflow = UpdateWorkflow::new(config, fakes.collaborators(), cache);

    let mut outcomes = Vec::with_capacity(events.len());
    for event in &events {
        let outcome = workflow
            .process(event)
            .await
            .context("Failed to process event")?;
        outcomes.push(outcome);
    }
    info!(events = events.len(), "Processed events");

    let notifications: Vec<Value> = fakes
        .notifier
        .sent()
        .into_iter()
        .map(|sent| {
            json!({
                "package": sent.package_name,
                "ticket_id": sent.opts.ticket_id,
                "search_title": sent.opts.search_title,
                "message": sent.message,
            })
        })
        .collect();
    let patches: Vec<Value> = fakes
        .patcher
        .patches()
        .into_iter()
        .map(|(package, _, opts)| {
            json!({
                "package": package,
                "ticket_id": opts.ticket_id,
                "filename": opts.filename,
            })
        })
        .collect();

    Ok(json!({
        "outcomes": outcomes,
        "notifications": notifications,
        "patches": patches,
    }))
}

// ========== Build completion ==========

/// Looks the build up in the shared cache. Nothing is sent to a real
/// tracker; the message that would be posted is printed instead.
async fn cmd_build_completed(
    config: &RelmonConfig,
    cache: Arc<dyn CorrelationCache>,
    event: &BuildCompletedEvent,
) -> Result<Value> {
    let notifier = RecordingNotifier::default();
    let outcome =
        relmon_core::handle_build_completion(cache.as_ref(), &notifier, config, event)
            .await
            .with_context(|| format!("Failed to handle completion of build {}", event.build_id))?;
    Ok(serde_json::to_value(outcome)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use relmon_core::MemoryCorrelationCache;

    fn write(dir: &tempfile::TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, body).unwrap();
        path
    }

    const FLATPAK_UPDATE: &str = r#"{
        "kind": "update",
        "project_name": "flatpak",
        "new_version": "1.0.4",
        "project_homepage": "https://flatpak.org",
        "project_id": 6377,
        "distro_mappings": [{"distro": "Fedora", "package_name": "flatpak"}]
    }"#;

    #[test]
    fn test_compare_commands() {
        assert_eq!(cmd_compare("1.0.a", "1.0"), 1);
        assert_eq!(cmd_compare_upstream("1.0rc1", "1.0"), -1);
        assert_eq!(cmd_compare_repo("v1.2.0", "1.2.0", "1"), 0);
    }

    #[test]
    fn test_load_config_flags_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "relmon.toml", "branch = \"f41\"\n");

        let config = load_config(Some(&path), true, true).unwrap();
        assert_eq!(config.branch, "f41");
        assert_eq!(config.log_level, "debug");
        assert!(config.log_json);
    }

    #[test]
    fn test_fixture_failure_shape() {
        let fixture: Fixture<MonitoringSettings> =
            serde_json::from_str(r#"{"error": "dist-git down", "trace": "tb"}"#).unwrap();
        let err = fixture.into_result().unwrap_err();
        assert_eq!(err.message, "dist-git down");
        assert_eq!(err.trace.as_deref(), Some("tb"));

        let fixture: Fixture<MonitoringSettings> =
            serde_json::from_str(r#"{"monitoring": true}"#).unwrap();
        assert!(fixture.into_result().unwrap().monitoring);
    }

    #[tokio::test]
    async fn test_process_files_ticket_and_correlates_build() {
        let dir = tempfile::tempdir().unwrap();
        let events = format!(
            r#"[{FLATPAK_UPDATE},
                {{"kind": "build_completed", "build_id": 4242, "state": "CLOSED",
                  "package_name": "flatpak", "version": "1.0.4"}}]"#
        );
        let event_path = write(&dir, "events.json", &events);
        let fixtures_path = write(
            &dir,
            "fixtures.json",
            r#"{
                "monitoring": {"monitoring": true, "scratch_build": true},
                "metadata": {"version": "0.16.0", "release": "1"},
                "build": {"build_id": 4242, "patch": "diff", "patch_filename": "0001.patch"},
                "first_ticket_id": 17
            }"#,
        );

        let cache: Arc<dyn CorrelationCache> = Arc::new(MemoryCorrelationCache::new());
        let output = cmd_process(RelmonConfig::default(), cache, &event_path, &fixtures_path)
            .await
            .unwrap();

        assert_eq!(output["outcomes"][0]["event"], "update");
        assert_eq!(output["outcomes"][0]["outcomes"][0]["outcome"], "ticketed");
        assert_eq!(output["outcomes"][0]["outcomes"][0]["ticket_id"], 17);
        assert_eq!(output["outcomes"][1]["outcome"], "posted");
        assert_eq!(output["patches"][0]["filename"], "0001.patch");

        let notifications = output["notifications"].as_array().unwrap();
        assert_eq!(notifications.len(), 2);
        let last = notifications[1]["message"].as_str().unwrap();
        assert!(last.contains("completed"));
        assert!(last.contains("taskID=4242"));
    }

    #[tokio::test]
    async fn test_process_reports_validator_failure() {
        let dir = tempfile::tempdir().unwrap();
        let event_path = write(&dir, "event.json", FLATPAK_UPDATE);
        let fixtures_path = write(
            &dir,
            "fixtures.json",
            r#"{"metadata": {"error": "mdapi unreachable"}}"#,
        );

        let cache: Arc<dyn CorrelationCache> = Arc::new(MemoryCorrelationCache::new());
        let output = cmd_process(RelmonConfig::default(), cache, &event_path, &fixtures_path)
            .await
            .unwrap();

        let outcome = &output["outcomes"][0]["outcomes"][0];
        assert_eq!(outcome["outcome"], "dropped");
        assert_eq!(outcome["reason"], "mdapi-error");
        assert_eq!(outcome["message"], "mdapi unreachable");
    }

    #[tokio::test]
    async fn test_build_completed_untracked() {
        let cache: Arc<dyn CorrelationCache> = Arc::new(MemoryCorrelationCache::new());
        let event = BuildCompletedEvent {
            build_id: 1,
            state: BuildState::Closed,
            package_name: "flatpak".to_string(),
            version: "1.0.4".to_string(),
            targets: vec![],
        };

        let output = cmd_build_completed(&RelmonConfig::default(), cache, &event)
            .await
            .unwrap();
        assert_eq!(output["outcome"], "not_tracked");
    }
}
