//! Autoload tables stored as JSON
//!
//! A table is the data form of a generated autoload map:
//!
//! ```json
//! {
//!   "base_dir": "/project/vendor",
//!   "classmap": { "Composer\\InstalledVersions": "composer/InstalledVersions.php" },
//!   "psr-4": { "Faker\\": "fzaninotto/faker/src/Faker" },
//!   "fallback_dirs": ["src"],
//!   "config": { "extension": "php" }
//! }
//! ```

use crate::{AutoloadConfig, AutoloadError, Registry, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One directory or an ordered list of them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DirList {
    One(PathBuf),
    Many(Vec<PathBuf>),
}

impl DirList {
    /// Directories in the order they were listed
    pub fn as_slice(&self) -> &[PathBuf] {
        match self {
            DirList::One(dir) => std::slice::from_ref(dir),
            DirList::Many(dirs) => dirs,
        }
    }
}

impl From<Vec<PathBuf>> for DirList {
    fn from(dirs: Vec<PathBuf>) -> Self {
        DirList::Many(dirs)
    }
}

/// Serializable autoload table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoloadTable {
    /// Directory relative paths are resolved against
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_dir: Option<PathBuf>,

    /// Exact symbol -> file entries
    #[serde(default, rename = "classmap", skip_serializing_if = "BTreeMap::is_empty")]
    pub class_map: BTreeMap<String, PathBuf>,

    /// Namespace prefix -> directories
    #[serde(default, rename = "psr-4", skip_serializing_if = "BTreeMap::is_empty")]
    pub prefixes: BTreeMap<String, DirList>,

    /// Directories searched when no prefix matches
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fallback_dirs: Vec<PathBuf>,

    #[serde(default)]
    pub config: AutoloadConfig,
}

impl AutoloadTable {
    /// Load a table from a JSON file.
    ///
    /// Without an explicit `base_dir`, paths are relative to the file's directory.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| AutoloadError::Io {
            path: path.to_path_buf(),
            error: e,
        })?;

        let mut table = Self::from_json_str(&content).map_err(|e| AutoloadError::InvalidTable {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        if table.base_dir.is_none() {
            table.base_dir = path.parent().map(Path::to_path_buf);
        }

        debug!(
            "Loaded autoload table {:?}: {} classes, {} prefixes",
            path,
            table.class_map.len(),
            table.prefixes.len()
        );
        Ok(table)
    }

    /// Parse a table from a JSON string
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Serialize the table to pretty JSON
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Save the table to a JSON file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.to_json_string()?;
        fs::write(path, content).map_err(|e| AutoloadError::Io {
            path: path.to_path_buf(),
            error: e,
        })
    }

    /// Build a registry holding every entry of this table
    pub fn build_registry(&self) -> Registry {
        let mut registry = Registry::with_config(self.config.clone());

        for (symbol, path) in &self.class_map {
            registry.register_exact(symbol.as_str(), self.absolute(path));
        }

        for (prefix, dirs) in &self.prefixes {
            for dir in dirs.as_slice() {
                registry.register_prefix(prefix.as_str(), self.absolute(dir));
            }
        }

        for dir in &self.fallback_dirs {
            registry.register_fallback(self.absolute(dir));
        }

        debug!(
            "Built registry: {} exact, {} prefixes, {} fallback dirs",
            registry.len_exact(),
            registry.len_prefixes(),
            registry.fallback_dirs().len()
        );
        registry
    }

    fn absolute(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}
