//! Path resolution for the event log, index state and config

use std::path::{Path, PathBuf};

/// Resolves standard paths for a project's capture data
#[derive(Debug, Clone)]
pub struct Paths {
    pub home_claude: PathBuf,
    pub project: PathBuf,
}

impl Paths {
    /// Create a resolver for the current working directory
    pub fn new() -> std::io::Result<Self> {
        let home = dirs::home_dir().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "home directory not found")
        })?;
        let project = std::env::current_dir()?;
        Ok(Self::with_root(home.join(".claude"), project))
    }

    /// Create a resolver rooted at an explicit host directory and project
    pub fn with_root(home_claude: impl Into<PathBuf>, project: impl Into<PathBuf>) -> Self {
        Self {
            home_claude: home_claude.into(),
            project: project.into(),
        }
    }

    /// Host settings file where hooks are registered
    pub fn settings_file(&self) -> PathBuf {
        self.home_claude.join("settings.json")
    }

    /// Project-scoped directory, also where the host keeps session transcripts
    pub fn project_dir(&self) -> PathBuf {
        let hash = project_hash(&self.project);
        self.home_claude.join("projects").join(hash)
    }

    pub fn cairn_dir(&self) -> PathBuf {
        self.project_dir().join("cairn")
    }

    /// Append-only event log, the durable source of truth
    pub fn events_log(&self) -> PathBuf {
        self.cairn_dir().join("events.jsonl")
    }

    /// Serialized index state, a cache derived from the log
    pub fn index_state(&self) -> PathBuf {
        self.cairn_dir().join("index_state.json")
    }

    pub fn config_file(&self) -> PathBuf {
        self.cairn_dir().join("cairn.json")
    }
}

fn project_hash(project: &Path) -> String {
    project.to_string_lossy().replace(['/', '.'], "-")
}
