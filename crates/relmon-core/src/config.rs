//! Runtime configuration.
//!
//! Loaded from a TOML file, then optionally overridden from `RELMON_*`
//! environment variables. Every field has a default, so an empty file is a
//! valid configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::error::{RelmonError, Result};

/// Placeholder substituted with the build identifier in `build_web_url`.
pub const BUILD_ID_PLACEHOLDER: &str = "{build_id}";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RelmonConfig {
    /// Downstream distribution whose mappings are evaluated.
    pub distro: String,

    /// Branch whose packaged version is compared against upstream.
    pub branch: String,

    /// Base URL of the release-monitoring service (project links).
    pub anitya_url: String,

    /// Page explaining what this service does, linked from tickets.
    pub explanation_url: String,

    /// Where packagers should report problems with relmon itself.
    pub tool_issue_tracker_url: String,

    /// Web page of a build; must contain `{build_id}`.
    pub build_web_url: String,

    /// Maximum number of build targets listed before summarising.
    pub series_limit: usize,

    pub log_level: String,

    pub log_json: bool,
}

impl Default for RelmonConfig {
    fn default() -> Self {
        Self {
            distro: "Fedora".to_string(),
            branch: "rawhide".to_string(),
            anitya_url: "https://release-monitoring.org".to_string(),
            explanation_url: "https://fedoraproject.org/wiki/Upstream_release_monitoring"
                .to_string(),
            tool_issue_tracker_url: "https://github.com/relmon/relmon/issues".to_string(),
            build_web_url: "https://koji.fedoraproject.org/koji/taskinfo?taskID={build_id}"
                .to_string(),
            series_limit: 3,
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

impl RelmonConfig {
    /// Parse a TOML document and validate it.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(input).map_err(|e| RelmonError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// Apply overrides from the process environment.
    ///
    /// Reads:
    /// - RELMON_DISTRO
    /// - RELMON_BRANCH
    /// - RELMON_LOG_LEVEL
    /// - RELMON_LOG_JSON ("true"/"1" enables JSON logs)
    pub fn apply_env(self) -> Self {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(distro) = lookup("RELMON_DISTRO") {
            self.distro = distro;
        }
        if let Some(branch) = lookup("RELMON_BRANCH") {
            self.branch = branch;
        }
        if let Some(level) = lookup("RELMON_LOG_LEVEL") {
            self.log_level = level;
        }
        if let Some(json) = lookup("RELMON_LOG_JSON") {
            self.log_json = matches!(json.to_lowercase().as_str(), "true" | "1");
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.distro.trim().is_empty() {
            return Err(RelmonError::Config("distro must not be empty".to_string()));
        }
        if self.series_limit == 0 {
            return Err(RelmonError::Config(
                "series_limit must be at least 1".to_string(),
            ));
        }
        if !self.build_web_url.contains(BUILD_ID_PLACEHOLDER) {
            return Err(RelmonError::Config(format!(
                "build_web_url must contain {BUILD_ID_PLACEHOLDER}"
            )));
        }
        Ok(())
    }

    /// Web page of the given build.
    pub fn build_link(&self, build_id: u64) -> String {
        self.build_web_url
            .replace(BUILD_ID_PLACEHOLDER, &build_id.to_string())
    }

    /// Release-monitoring page of a project.
    pub fn project_link(&self, project_id: u64) -> String {
        format!(
            "{}/project/{}/",
            self.anitya_url.trim_end_matches('/'),
            project_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_empty_document_is_default() {
        let config = RelmonConfig::from_toml_str("").unwrap();
        assert_eq!(config, RelmonConfig::default());
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let config = RelmonConfig::from_toml_str(
            r#"
            distro = "CentOS"
            series_limit = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.distro, "CentOS");
        assert_eq!(config.series_limit, 5);
        assert_eq!(config.branch, "rawhide");
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = RelmonConfig::from_toml_str("series_limit = 0").unwrap_err();
        assert!(err.to_string().contains("series_limit"));

        let err = RelmonConfig::from_toml_str(r#"build_web_url = "https://b/""#).unwrap_err();
        assert!(err.to_string().contains("build_web_url"));

        let err = RelmonConfig::from_toml_str("distro = 3").unwrap_err();
        assert!(matches!(err, RelmonError::Config(_)));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "branch = \"f41\"").unwrap();
        let config = RelmonConfig::from_path(file.path()).unwrap();
        assert_eq!(config.branch, "f41");
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("RELMON_DISTRO", "Fedora EPEL"),
            ("RELMON_LOG_JSON", "1"),
        ]
        .into_iter()
        .collect();
        let config = RelmonConfig::default()
            .apply_overrides(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.distro, "Fedora EPEL");
        assert!(config.log_json);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_links() {
        let config = RelmonConfig::default();
        assert_eq!(
            config.build_link(123),
            "https://koji.fedoraproject.org/koji/taskinfo?taskID=123"
        );
        assert_eq!(
            config.project_link(6377),
            "https://release-monitoring.org/project/6377/"
        );
    }
}
