//! Schema document sources
//!
//! A source answers one question: given a resource name such as
//! `splice_metaconfig_6.1.xml`, return its text or report that it is absent.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::MetaResult;

/// Canonical version used when no version is requested
pub const LATEST_VERSION: f64 = 6.1;

/// Resource name of the schema document for `version`
///
/// Integral versions keep one fractional digit, so `6.0` resolves to
/// `splice_metaconfig_6.0.xml`.
pub fn resource_name(version: f64) -> String {
    if version.is_finite() && version.fract() == 0.0 {
        format!("splice_metaconfig_{:.1}.xml", version)
    } else {
        format!("splice_metaconfig_{}.xml", version)
    }
}

/// Provider of schema document text
#[cfg_attr(test, mockall::automock)]
pub trait SchemaSource {
    /// Read a resource; `Ok(None)` when it does not exist
    fn read(&self, resource: &str) -> MetaResult<Option<String>>;
}

/// Searches an ordered list of directories; the first hit wins
#[derive(Debug, Clone, Default)]
pub struct DirectorySource {
    search_path: Vec<PathBuf>,
}

impl DirectorySource {
    pub fn new<I, P>(search_path: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            search_path: search_path.into_iter().map(Into::into).collect(),
        }
    }

    /// Append a directory to the search path
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.search_path.push(dir.into());
        self
    }

    pub fn search_path(&self) -> &[PathBuf] {
        &self.search_path
    }

    /// Full path of the first directory containing `resource`
    pub fn locate(&self, resource: &str) -> Option<PathBuf> {
        self.search_path
            .iter()
            .map(|dir| dir.join(resource))
            .find(|candidate| candidate.is_file())
    }
}

impl SchemaSource for DirectorySource {
    fn read(&self, resource: &str) -> MetaResult<Option<String>> {
        match self.locate(resource) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "Reading schema document");
                Ok(Some(std::fs::read_to_string(&path)?))
            }
            None => {
                tracing::debug!(
                    resource,
                    dirs = self.search_path.len(),
                    "Schema document not found on search path"
                );
                Ok(None)
            }
        }
    }
}

/// In-memory resources
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    resources: HashMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resource(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(name, text);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.resources.insert(name.into(), text.into());
    }

    /// Register `text` under the resource name of `version`
    pub fn with_version(self, version: f64, text: impl Into<String>) -> Self {
        self.with_resource(resource_name(version), text)
    }
}

impl SchemaSource for MemorySource {
    fn read(&self, resource: &str) -> MetaResult<Option<String>> {
        Ok(self.resources.get(resource).cloned())
    }
}
