//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::core::Project;
use crate::entities::context::{DEFAULT_MAJOR_AQL, DEFAULT_MINOR_AQL};
use crate::sampling::level::InspectionLevel;

/// TSP configuration with layered hierarchy
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Inspector name printed on plan documents
    pub author: Option<String>,

    /// Default output format
    pub default_format: Option<String>,

    /// Default inspection level
    pub default_level: Option<InspectionLevel>,

    /// Default AQL for major defects
    pub major_aql: Option<f64>,

    /// Default AQL for minor defects
    pub minor_aql: Option<f64>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let project_path = Project::discover()
            .ok()
            .map(|project| project.tsp_dir().join("config.yaml"));
        let mut config =
            Self::load_files(Self::global_config_path().as_deref(), project_path.as_deref());
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Merge the global then project config files (project wins)
    pub fn load_files(global: Option<&Path>, project: Option<&Path>) -> Self {
        let mut config = Config::default();
        for path in [global, project].into_iter().flatten() {
            if let Some(layer) = Self::read_file(path) {
                config.merge(layer);
            }
        }
        config
    }

    fn read_file(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read config file");
                return None;
            }
        };
        // Freshly initialized files are all comments
        let blank = contents.lines().all(|line| {
            let line = line.trim();
            line.is_empty() || line.starts_with('#')
        });
        if blank {
            return Some(Config::default());
        }
        match serde_yml::from_str::<Config>(&contents) {
            Ok(config) => {
                debug!(path = %path.display(), "loaded config layer");
                Some(config)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring invalid config file");
                None
            }
        }
    }

    /// Apply `TSP_*` environment overrides
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(author) = lookup("TSP_AUTHOR") {
            self.author = Some(author);
        }
        if let Some(level) = lookup("TSP_LEVEL") {
            match level.parse() {
                Ok(level) => self.default_level = Some(level),
                Err(e) => warn!(error = %e, "ignoring TSP_LEVEL"),
            }
        }
        if let Some(aql) = lookup("TSP_MAJOR_AQL") {
            match aql.trim().parse::<f64>() {
                Ok(aql) if aql.is_finite() => self.major_aql = Some(aql),
                _ => warn!(value = %aql, "ignoring TSP_MAJOR_AQL"),
            }
        }
        if let Some(aql) = lookup("TSP_MINOR_AQL") {
            match aql.trim().parse::<f64>() {
                Ok(aql) if aql.is_finite() => self.minor_aql = Some(aql),
                _ => warn!(value = %aql, "ignoring TSP_MINOR_AQL"),
            }
        }
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "tsp")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.author.is_some() {
            self.author = other.author;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
        if other.default_level.is_some() {
            self.default_level = other.default_level;
        }
        if other.major_aql.is_some() {
            self.major_aql = other.major_aql;
        }
        if other.minor_aql.is_some() {
            self.minor_aql = other.minor_aql;
        }
    }

    pub fn level(&self) -> InspectionLevel {
        self.default_level.unwrap_or_default()
    }

    pub fn major_aql(&self) -> f64 {
        self.major_aql.unwrap_or(DEFAULT_MAJOR_AQL)
    }

    pub fn minor_aql(&self) -> f64 {
        self.minor_aql.unwrap_or(DEFAULT_MINOR_AQL)
    }

    /// Get the author name, falling back to git config or username
    pub fn author(&self) -> String {
        if let Some(ref author) = self.author {
            return author.clone();
        }

        if let Ok(output) = std::process::Command::new("git")
            .args(["config", "user.name"])
            .output()
        {
            if output.status.success() {
                let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !name.is_empty() {
                    return name;
                }
            }
        }

        std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .unwrap_or_else(|_| "unknown".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.level(), InspectionLevel::II);
        assert_eq!(config.major_aql(), 2.5);
        assert_eq!(config.minor_aql(), 4.0);
    }

    #[test]
    fn test_project_overrides_global() {
        let tmp = tempdir().unwrap();
        let global = tmp.path().join("global.yaml");
        let project = tmp.path().join("project.yaml");
        std::fs::write(&global, "default_level: I\nmajor_aql: 1.0\nauthor: qa\n").unwrap();
        std::fs::write(&project, "default_level: III\n").unwrap();

        let config = Config::load_files(Some(&global), Some(&project));
        assert_eq!(config.level(), InspectionLevel::III);
        assert_eq!(config.major_aql(), 1.0);
        assert_eq!(config.author.as_deref(), Some("qa"));
    }

    #[test]
    fn test_invalid_file_is_skipped() {
        let tmp = tempdir().unwrap();
        let project = tmp.path().join("project.yaml");
        std::fs::write(&project, "default_level: [not, a, level]\n").unwrap();

        let config = Config::load_files(None, Some(&project));
        assert!(config.default_level.is_none());
    }

    #[test]
    fn test_comment_only_file_is_empty_layer() {
        let tmp = tempdir().unwrap();
        let project = tmp.path().join("project.yaml");
        std::fs::write(&project, "# nothing yet\n# default_level: II\n\n").unwrap();

        let config = Config::load_files(None, Some(&project));
        assert!(config.default_level.is_none());
        assert!(config.author.is_none());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("TSP_LEVEL", "iii"),
            ("TSP_MAJOR_AQL", "0.65"),
            ("TSP_MINOR_AQL", "lots"),
        ]
        .into_iter()
        .collect();

        let mut config = Config {
            minor_aql: Some(1.5),
            ..Default::default()
        };
        config.apply_env(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.level(), InspectionLevel::III);
        assert_eq!(config.major_aql(), 0.65);
        assert_eq!(config.minor_aql(), 1.5);
    }
}
