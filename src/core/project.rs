//! Project discovery and structure

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Directory that marks a project root
pub const PROJECT_DIR: &str = ".tsp";

/// Represents a TSP project
#[derive(Debug)]
pub struct Project {
    /// Root directory of the project (parent of .tsp/)
    root: PathBuf,
}

impl Project {
    /// Find project root by walking up from the current directory
    pub fn discover() -> Result<Self, ProjectError> {
        let current = std::env::current_dir()
            .map_err(|e| ProjectError::IoError(e.to_string()))?;
        Self::discover_from(&current)
    }

    /// Find project root by walking up from the given directory
    pub fn discover_from(start: &Path) -> Result<Self, ProjectError> {
        let mut current = start
            .canonicalize()
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        loop {
            if current.join(PROJECT_DIR).is_dir() {
                return Ok(Self { root: current });
            }

            if !current.pop() {
                return Err(ProjectError::NotFound {
                    searched_from: start.to_path_buf(),
                });
            }
        }
    }

    /// Create a new project structure at the given path
    pub fn init(path: &Path) -> Result<Self, ProjectError> {
        let root = path
            .canonicalize()
            .unwrap_or_else(|_| path.to_path_buf());

        if root.join(PROJECT_DIR).exists() {
            return Err(ProjectError::AlreadyExists(root));
        }

        Self::write_structure(&root)?;
        Ok(Self { root })
    }

    /// Initialize even if .tsp/ exists, resetting the project config
    pub fn init_force(path: &Path) -> Result<Self, ProjectError> {
        let root = path
            .canonicalize()
            .unwrap_or_else(|_| path.to_path_buf());

        Self::write_structure(&root)?;
        Ok(Self { root })
    }

    fn write_structure(root: &Path) -> Result<(), ProjectError> {
        let tsp_dir = root.join(PROJECT_DIR);
        std::fs::create_dir_all(&tsp_dir).map_err(|e| ProjectError::IoError(e.to_string()))?;
        std::fs::create_dir_all(root.join("inspections"))
            .map_err(|e| ProjectError::IoError(e.to_string()))?;
        std::fs::write(tsp_dir.join("config.yaml"), Self::default_config())
            .map_err(|e| ProjectError::IoError(e.to_string()))?;
        Ok(())
    }

    fn default_config() -> &'static str {
        r#"# TSP Project Configuration

# Default inspection level (I, II, III)
# default_level: II

# Default AQL for major and minor defects
# (supported: 0.65, 1.0, 1.5, 2.5, 4.0, 6.5)
# major_aql: 2.5
# minor_aql: 4.0

# Default output format (auto, yaml, json, tsv, csv, md)
# default_format: auto
"#
    }

    /// Get the project root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the .tsp configuration directory
    pub fn tsp_dir(&self) -> PathBuf {
        self.root.join(PROJECT_DIR)
    }

    /// Directory for inspection context files
    pub fn inspections_dir(&self) -> PathBuf {
        self.root.join("inspections")
    }
}

/// Errors that can occur during project operations
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("not a TSP project (searched from {searched_from:?}). Run 'tsp init' to create one.")]
    NotFound { searched_from: PathBuf },

    #[error("TSP project already exists at {0:?}")]
    AlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    IoError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_project_init_creates_structure() {
        let tmp = tempdir().unwrap();
        let project = Project::init(tmp.path()).unwrap();

        assert!(project.tsp_dir().is_dir());
        assert!(project.tsp_dir().join("config.yaml").exists());
        assert!(project.inspections_dir().is_dir());
    }

    #[test]
    fn test_project_init_fails_if_exists() {
        let tmp = tempdir().unwrap();
        Project::init(tmp.path()).unwrap();

        let err = Project::init(tmp.path()).unwrap_err();
        assert!(matches!(err, ProjectError::AlreadyExists(_)));
        assert!(Project::init_force(tmp.path()).is_ok());
    }

    #[test]
    fn test_project_discover_finds_tsp_dir() {
        let tmp = tempdir().unwrap();
        Project::init(tmp.path()).unwrap();

        let subdir = tmp.path().join("some/nested/dir");
        std::fs::create_dir_all(&subdir).unwrap();

        let project = Project::discover_from(&subdir).unwrap();
        assert_eq!(
            project.root().canonicalize().unwrap(),
            tmp.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn test_project_discover_fails_without_tsp_dir() {
        let tmp = tempdir().unwrap();
        let err = Project::discover_from(tmp.path()).unwrap_err();
        assert!(matches!(err, ProjectError::NotFound { .. }));
    }
}
