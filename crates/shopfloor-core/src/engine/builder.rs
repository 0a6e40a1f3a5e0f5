//! Builder for creating and configuring Engine instances.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use tokio::task;

use super::Engine;
use crate::{
    db::{CompletionPolicy, Database},
    error::{EngineError, Result},
    personnel::{OpenRoster, PersonnelDirectory},
};

/// Builder for creating and configuring Engine instances.
#[derive(Clone)]
pub struct EngineBuilder {
    database_path: Option<PathBuf>,
    policy: CompletionPolicy,
    directory: Option<Arc<dyn PersonnelDirectory>>,
}

impl EngineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            database_path: None,
            policy: CompletionPolicy::default(),
            directory: None,
        }
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/shopfloor/shopfloor.db` or
    /// `~/.local/share/shopfloor/shopfloor.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Sets how stage completion treats open required tasks.
    pub fn with_completion_policy(mut self, policy: CompletionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the personnel directory used to validate assignments.
    ///
    /// Defaults to [`OpenRoster`], which accepts every assignment.
    pub fn with_directory(mut self, directory: Arc<dyn PersonnelDirectory>) -> Self {
        self.directory = Some(directory);
        self
    }

    /// Builds the configured engine instance.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::FileSystem` if the database path is invalid
    /// Returns `EngineError::Database` if database initialization fails
    pub async fn build(self) -> Result<Engine> {
        let db_path = if let Some(path) = self.database_path {
            path
        } else {
            Self::default_database_path()?
        };

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| EngineError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let db_path_clone = db_path.clone();
        task::spawn_blocking(move || {
            let _db = Database::new(&db_path_clone)?;
            Ok::<(), EngineError>(())
        })
        .await
        .map_err(|e| EngineError::Configuration {
            message: format!("Task join error: {e}"),
        })??;

        let directory = self.directory.unwrap_or_else(|| Arc::new(OpenRoster));

        Ok(Engine::new(db_path, self.policy, directory))
    }

    /// Returns the default database path following XDG Base Directory
    /// specification.
    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("shopfloor")
            .place_data_file("shopfloor.db")
            .map_err(|e| EngineError::XdgDirectory(e.to_string()))
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
