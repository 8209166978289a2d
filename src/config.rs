use crate::persistence::{FileStorage, KeyValueStore, MemoryStorage, PersistenceResult};
use crate::store::STORAGE_KEY;
use std::path::PathBuf;
use std::str::FromStr;

pub const ENV_STORAGE: &str = "SPRINT_PLANNER_STORAGE";
pub const ENV_DATA: &str = "SPRINT_PLANNER_DATA";
pub const ENV_KEY: &str = "SPRINT_PLANNER_KEY";

const DEFAULT_DATA_DIR: &str = ".sprint-planner";
const DEFAULT_SQLITE_FILE: &str = "sprint-planner.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    /// Directory holding one JSON file per key.
    File(PathBuf),
    /// SQLite database file.
    Sqlite(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Memory,
    File,
    Sqlite,
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(BackendKind::Memory),
            "file" => Ok(BackendKind::File),
            "sqlite" => Ok(BackendKind::Sqlite),
            other => Err(format!(
                "unknown storage backend '{other}' (expected memory, file or sqlite)"
            )),
        }
    }
}

impl BackendKind {
    pub fn with_path(self, path: Option<PathBuf>) -> StorageBackend {
        match self {
            BackendKind::Memory => StorageBackend::Memory,
            BackendKind::File => {
                StorageBackend::File(path.unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)))
            }
            BackendKind::Sqlite => StorageBackend::Sqlite(path.unwrap_or_else(|| {
                PathBuf::from(DEFAULT_DATA_DIR).join(DEFAULT_SQLITE_FILE)
            })),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerConfig {
    pub backend: StorageBackend,
    pub storage_key: String,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File(PathBuf::from(DEFAULT_DATA_DIR)),
            storage_key: STORAGE_KEY.to_string(),
        }
    }
}

impl PlannerConfig {
    /// Read `SPRINT_PLANNER_STORAGE`, `SPRINT_PLANNER_DATA` and
    /// `SPRINT_PLANNER_KEY` from the process environment.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let kind = lookup(ENV_STORAGE)
            .filter(|k| !k.trim().is_empty())
            .map(|k| k.parse::<BackendKind>())
            .transpose()?;
        let path = lookup(ENV_DATA)
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);
        Ok(Self::resolve(kind, path, lookup(ENV_KEY)))
    }

    /// Build a config from already-parsed settings.
    ///
    /// A path without a backend kind selects the file backend; a blank key
    /// keeps the default.
    pub fn resolve(kind: Option<BackendKind>, path: Option<PathBuf>, key: Option<String>) -> Self {
        let mut config = Self::default();
        match (kind, path) {
            (Some(kind), path) => config.backend = kind.with_path(path),
            (None, Some(path)) => config.backend = StorageBackend::File(path),
            (None, None) => {}
        }
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            config.storage_key = key;
        }
        config
    }

    pub fn open_storage(&self) -> PersistenceResult<Box<dyn KeyValueStore + Send + Sync>> {
        match &self.backend {
            StorageBackend::Memory => Ok(Box::new(MemoryStorage::new())),
            StorageBackend::File(dir) => Ok(Box::new(FileStorage::new(dir)?)),
            #[cfg(feature = "sqlite")]
            StorageBackend::Sqlite(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)?;
                }
                Ok(Box::new(crate::persistence::SqliteStorage::new(path)?))
            }
            #[cfg(not(feature = "sqlite"))]
            StorageBackend::Sqlite(path) => Err(crate::persistence::PersistenceError::InvalidData(format!(
                "cannot open {}: built without the `sqlite` feature",
                path.display()
            ))),
        }
    }
}
