//! Runtime settings

use crate::error::{EstimateError, EstimateResult};
use crate::session::SessionConfig;
use serde::Deserialize;
use std::path::Path;

const ENV_PREFIX: &str = "ESM";
const DEFAULT_CONFIG_FILE: &str = "space-metric.toml";

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

/// Settings shared by the function and the CLI
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// CloudWatch namespace the metric is written to
    #[serde(default = "default_namespace")]
    pub namespace: String,

    #[serde(default = "default_metric_name")]
    pub metric_name: String,

    /// Name of the single dimension carrying the cluster name
    #[serde(default = "default_dimension_name")]
    pub dimension_name: String,

    /// Named credentials profile for local runs
    #[serde(default)]
    pub profile: Option<String>,

    #[serde(default)]
    pub region: Option<String>,

    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_namespace() -> String {
    "AWS/ECS".to_string()
}

fn default_metric_name() -> String {
    "SchedulableContainers".to_string()
}

fn default_dimension_name() -> String {
    "ClusterName".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            metric_name: default_metric_name(),
            dimension_name: default_dimension_name(),
            profile: None,
            region: None,
            log_format: LogFormat::default(),
        }
    }
}

impl Settings {
    /// Load from `ESM_CONFIG_FILE` (or `space-metric.toml`) and `ESM_*` variables
    pub fn load() -> EstimateResult<Self> {
        let path = std::env::var("ESM_CONFIG_FILE").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load_from(Path::new(&path))
    }

    /// Load from the given file (if present) overlaid by `ESM_*` variables
    pub fn load_from(path: &Path) -> EstimateResult<Self> {
        let config = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()
            .map_err(|e| EstimateError::InvalidConfig(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| EstimateError::InvalidConfig(e.to_string()))
    }

    /// Resolve which AWS session the run should use
    pub fn session(&self) -> EstimateResult<SessionConfig> {
        SessionConfig::resolve(self.profile.clone(), self.region.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.namespace, "AWS/ECS");
        assert_eq!(settings.metric_name, "SchedulableContainers");
        assert_eq!(settings.dimension_name, "ClusterName");
        assert_eq!(settings.log_format, LogFormat::Json);
        assert_eq!(settings.session().unwrap(), SessionConfig::Ambient);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "namespace = \"Custom/ECS\"\nprofile = \"dev\"\nregion = \"eu-west-1\"\nlog_format = \"pretty\""
        )
        .unwrap();

        let settings = Settings::load_from(file.path()).unwrap();
        assert_eq!(settings.namespace, "Custom/ECS");
        assert_eq!(settings.metric_name, "SchedulableContainers");
        assert_eq!(settings.log_format, LogFormat::Pretty);
        assert_eq!(
            settings.session().unwrap(),
            SessionConfig::Explicit {
                profile: "dev".to_string(),
                region: "eu-west-1".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(settings.dimension_name, "ClusterName");
    }
}
