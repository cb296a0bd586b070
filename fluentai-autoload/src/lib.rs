//! FluentAi Autoload Registry
//!
//! This crate maps fully-qualified symbol names to source files, including:
//! - Exact class-map entries (symbol -> file)
//! - Namespace prefix entries (prefix -> ordered base directories)
//! - Longest-prefix resolution with pluggable existence checks
//! - Autoload tables loaded from JSON

pub mod error;
pub mod fs;
pub mod loader;
pub mod registry;
pub mod table;

pub use error::{AutoloadError, Result};
pub use fs::{FileSystem, MemoryFileSystem, OsFileSystem};
pub use loader::ClassLoader;
pub use registry::{PrefixEntry, Registry};
pub use table::{AutoloadTable, DirList};

use serde::{Deserialize, Serialize};

/// Autoload configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoloadConfig {
    /// File extension appended to prefix-derived paths (without the dot)
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Separator between namespace segments in symbol names
    #[serde(default = "default_namespace_separator")]
    pub namespace_separator: char,

    /// Only consult the class map; never probe prefix or fallback directories
    #[serde(default)]
    pub classmap_authoritative: bool,
}

fn default_extension() -> String {
    "php".to_string()
}

fn default_namespace_separator() -> char {
    '\\'
}

impl Default for AutoloadConfig {
    fn default() -> Self {
        Self {
            extension: default_extension(),
            namespace_separator: default_namespace_separator(),
            classmap_authoritative: false,
        }
    }
}
