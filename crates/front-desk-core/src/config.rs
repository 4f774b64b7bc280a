//! Front desk runtime configuration.
//!
//! Resolved once at process startup and handed to
//! [`HospitalService::from_config`](crate::service::HospitalService::from_config).
//! Nothing in the core reads environment variables; entry points do that and
//! build a [`DeskConfig`].

use std::path::{Path, PathBuf};

/// Environment variable entry points read the database path from.
pub const DB_PATH_ENV: &str = "FRONT_DESK_DB";

/// Database file used when nothing else is configured.
pub const DEFAULT_DB_FILE: &str = "front_desk.db";

/// Where records live.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    /// Hash maps, gone when the process exits
    InMemory,
    /// SQLite file at the given path
    Sqlite(PathBuf),
}

/// Configuration resolved at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeskConfig {
    backend: StoreBackend,
    seed_doctors: bool,
}

impl DeskConfig {
    pub fn new(backend: StoreBackend) -> Self {
        Self {
            backend,
            seed_doctors: true,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(StoreBackend::InMemory)
    }

    pub fn sqlite(path: impl Into<PathBuf>) -> Self {
        Self::new(StoreBackend::Sqlite(path.into()))
    }

    /// Resolve the SQLite path: explicit override, then the given environment
    /// value, then [`DEFAULT_DB_FILE`].
    pub fn resolve_sqlite(override_path: Option<PathBuf>, env_value: Option<String>) -> Self {
        let path = override_path
            .or_else(|| {
                env_value
                    .filter(|v| !v.trim().is_empty())
                    .map(PathBuf::from)
            })
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE));
        Self::sqlite(path)
    }

    /// Skip inserting the seed roster into an empty store.
    pub fn without_seed_doctors(mut self) -> Self {
        self.seed_doctors = false;
        self
    }

    pub fn backend(&self) -> &StoreBackend {
        &self.backend
    }

    /// Path of the SQLite file, if that is the backend.
    pub fn db_path(&self) -> Option<&Path> {
        match &self.backend {
            StoreBackend::Sqlite(path) => Some(path),
            StoreBackend::InMemory => None,
        }
    }

    pub fn seed_doctors(&self) -> bool {
        self.seed_doctors
    }
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self::in_memory()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_prefers_override() {
        let config = DeskConfig::resolve_sqlite(
            Some(PathBuf::from("/tmp/a.db")),
            Some("/tmp/b.db".into()),
        );
        assert_eq!(config.db_path(), Some(Path::new("/tmp/a.db")));
    }

    #[test]
    fn test_resolve_falls_back_to_env_then_default() {
        let config = DeskConfig::resolve_sqlite(None, Some("/tmp/b.db".into()));
        assert_eq!(config.db_path(), Some(Path::new("/tmp/b.db")));

        let config = DeskConfig::resolve_sqlite(None, Some("  ".into()));
        assert_eq!(config.db_path(), Some(Path::new(DEFAULT_DB_FILE)));

        let config = DeskConfig::resolve_sqlite(None, None);
        assert_eq!(config.db_path(), Some(Path::new(DEFAULT_DB_FILE)));
    }

    #[test]
    fn test_defaults() {
        let config = DeskConfig::default();
        assert_eq!(config.backend(), &StoreBackend::InMemory);
        assert!(config.seed_doctors());
        assert!(!config.without_seed_doctors().seed_doctors());
    }
}
