//! Loader settings
//!
//! Where schema documents are searched for and which version to load.
//! Settings come from defaults, a TOML file, or the environment:
//!
//! - `METACONFIG_PATH`: search directories, separated like `PATH`
//! - `METACONFIG_VERSION`: schema version, e.g. `6.1`

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::configuration::MetaConfiguration;
use crate::error::{MetaError, MetaResult};
use crate::source::{DirectorySource, LATEST_VERSION};

/// Environment variable holding the search path
pub const PATH_ENV: &str = "METACONFIG_PATH";
/// Environment variable holding the schema version
pub const VERSION_ENV: &str = "METACONFIG_VERSION";

/// Search path and version for loading a meta configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LoaderSettings {
    /// Directories searched in order
    pub search_path: Vec<PathBuf>,
    /// Schema version to load
    pub version: f64,
}

impl Default for LoaderSettings {
    fn default() -> Self {
        Self {
            search_path: vec![PathBuf::from(".")],
            version: LATEST_VERSION,
        }
    }
}

impl LoaderSettings {
    pub fn builder() -> LoaderSettingsBuilder {
        LoaderSettingsBuilder::new()
    }

    /// Settings from environment variables; unset or unparsable values keep defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            search_path: std::env::var_os(PATH_ENV)
                .map(|paths| std::env::split_paths(&paths).collect::<Vec<_>>())
                .filter(|paths| !paths.is_empty())
                .unwrap_or(defaults.search_path),
            version: std::env::var(VERSION_ENV)
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.version),
        }
    }

    /// Settings from a TOML file
    ///
    /// ```toml
    /// search-path = ["/opt/ospl/etc/config"]
    /// version = 6.1
    /// ```
    pub fn from_file(path: impl AsRef<Path>) -> MetaResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            MetaError::Config(format!(
                "Failed to read settings file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> MetaResult<Self> {
        let settings: Self = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> MetaResult<()> {
        if !self.version.is_finite() || self.version <= 0.0 {
            return Err(MetaError::Config(format!(
                "Invalid schema version: {}",
                self.version
            )));
        }
        if self.search_path.is_empty() {
            return Err(MetaError::Config("Search path is empty".to_string()));
        }
        Ok(())
    }

    /// Directory source over the configured search path
    pub fn source(&self) -> DirectorySource {
        DirectorySource::new(self.search_path.iter().cloned())
    }

    /// Load the configured version from the configured search path
    pub fn load(&self) -> MetaResult<MetaConfiguration> {
        self.validate()?;
        MetaConfiguration::load(self.version, &self.source())
    }
}

/// Builder for [`LoaderSettings`]
#[derive(Debug, Clone)]
pub struct LoaderSettingsBuilder {
    search_path: Vec<PathBuf>,
    version: f64,
}

impl Default for LoaderSettingsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LoaderSettingsBuilder {
    pub fn new() -> Self {
        Self {
            search_path: Vec::new(),
            version: LATEST_VERSION,
        }
    }

    pub fn search_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.search_path.push(dir.into());
        self
    }

    pub fn version(mut self, version: f64) -> Self {
        self.version = version;
        self
    }

    /// Finish; an empty search path falls back to the current directory
    pub fn build(self) -> LoaderSettings {
        let search_path = if self.search_path.is_empty() {
            LoaderSettings::default().search_path
        } else {
            self.search_path
        };
        LoaderSettings {
            search_path,
            version: self.version,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = LoaderSettings::default();
        assert_eq!(settings.version, LATEST_VERSION);
        assert_eq!(settings.search_path, vec![PathBuf::from(".")]);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let settings = LoaderSettings::builder()
            .search_dir("/a")
            .search_dir("/b")
            .version(5.1)
            .build();
        assert_eq!(settings.search_path, vec![PathBuf::from("/a"), PathBuf::from("/b")]);
        assert_eq!(settings.version, 5.1);
        assert_eq!(settings.source().search_path().len(), 2);
    }

    #[test]
    fn test_from_toml() {
        let settings = LoaderSettings::from_toml(
            r#"
            search-path = ["/opt/ospl/etc"]
            version = 6.0
            "#,
        )
        .unwrap();
        assert_eq!(settings.search_path, vec![PathBuf::from("/opt/ospl/etc")]);
        assert_eq!(settings.version, 6.0);

        let partial = LoaderSettings::from_toml("version = 5.1").unwrap();
        assert_eq!(partial.search_path, LoaderSettings::default().search_path);
    }

    #[test]
    fn test_invalid_settings() {
        assert!(LoaderSettings::from_toml("version = 0.0").is_err());
        assert!(LoaderSettings::from_toml("search-path = []").is_err());
        let err = LoaderSettings::from_toml("version = \"six\"").unwrap_err();
        assert!(matches!(err, MetaError::Config(_)));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metaconfig.toml");
        std::fs::write(&path, "version = 6.1\nsearch-path = [\"schemas\"]\n").unwrap();
        let settings = LoaderSettings::from_file(&path).unwrap();
        assert_eq!(settings.search_path, vec![PathBuf::from("schemas")]);

        assert!(LoaderSettings::from_file(dir.path().join("missing.toml")).is_err());
    }
}
