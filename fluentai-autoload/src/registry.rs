//! Symbol to file resolution

use crate::{AutoloadConfig, FileSystem};
use rustc_hash::FxHashMap;
use std::path::{Component, MAIN_SEPARATOR_STR, Path, PathBuf};
use tracing::{debug, trace, warn};

/// A namespace prefix and the directories it maps to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixEntry {
    /// The literal prefix, matched byte for byte
    pub prefix: String,

    /// Length of `prefix` in bytes
    pub length: usize,

    /// Candidate base directories, tried in registration order
    pub directories: Vec<PathBuf>,
}

/// Holds the class map and prefix tables and answers resolution queries.
///
/// Resolution order:
/// 1. exact class-map entry, returned without touching the filesystem
/// 2. the longest registered prefix the symbol starts with, probing each of
///    its directories in order
/// 3. fallback directories, only when no prefix matched at all
///
/// Built once, then shared read-only (see [`crate::ClassLoader`]).
#[derive(Debug, Clone, Default)]
pub struct Registry {
    config: AutoloadConfig,

    class_map: FxHashMap<String, PathBuf>,

    prefixes: FxHashMap<String, PrefixEntry>,

    /// First character -> prefixes starting with it, longest first
    prefix_index: FxHashMap<char, Vec<String>>,

    fallback_dirs: Vec<PathBuf>,
}

impl Registry {
    /// Create an empty registry with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry with the given configuration
    pub fn with_config(config: AutoloadConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Map `symbol` directly to `path`, replacing any earlier mapping
    pub fn register_exact(&mut self, symbol: impl Into<String>, path: impl Into<PathBuf>) {
        let symbol = symbol.into();
        let path = path.into();
        trace!("Registered exact {} -> {:?}", symbol, path);
        self.class_map.insert(symbol, path);
    }

    /// Append `directory` to the candidates for `prefix`
    pub fn register_prefix(&mut self, prefix: impl Into<String>, directory: impl Into<PathBuf>) {
        let prefix = prefix.into();
        let directory = directory.into();
        trace!("Registered prefix {} -> {:?}", prefix, directory);

        if let Some(entry) = self.prefixes.get_mut(&prefix) {
            entry.length = prefix.len();
            entry.directories.push(directory);
            return;
        }

        if let Some(first) = prefix.chars().next() {
            let bucket = self.prefix_index.entry(first).or_default();
            bucket.push(prefix.clone());
            // Stable, so equal lengths keep registration order
            bucket.sort_by(|a, b| b.len().cmp(&a.len()));
        }

        self.prefixes.insert(
            prefix.clone(),
            PrefixEntry {
                length: prefix.len(),
                prefix,
                directories: vec![directory],
            },
        );
    }

    /// Add a directory searched with the full symbol path when no prefix matches
    pub fn register_fallback(&mut self, directory: impl Into<PathBuf>) {
        self.fallback_dirs.push(directory.into());
    }

    /// Resolve `symbol` to a file, using `fs` to confirm prefix candidates
    pub fn resolve<F: FileSystem + ?Sized>(&self, symbol: &str, fs: &F) -> Option<PathBuf> {
        if let Some(path) = self.exact_entry(symbol) {
            debug!("Class map hit for {}: {:?}", symbol, path);
            return Some(path.clone());
        }

        let found = self.search_candidates(symbol).into_iter().find(|candidate| {
            let exists = fs.exists(candidate);
            trace!("Probed {:?} for {}: {}", candidate, symbol, exists);
            exists
        });

        match &found {
            Some(path) => debug!("Resolved {} to {:?}", symbol, path),
            None => trace!("No file for {}", symbol),
        }
        found
    }

    /// Every path `resolve` would consider for `symbol`, in probe order
    pub fn candidates(&self, symbol: &str) -> Vec<PathBuf> {
        match self.exact_entry(symbol) {
            Some(path) => vec![path.clone()],
            None => self.search_candidates(symbol),
        }
    }

    /// Find the longest registered prefix that `symbol` starts with
    pub fn matching_prefix(&self, symbol: &str) -> Option<&PrefixEntry> {
        let bucket = symbol
            .chars()
            .next()
            .and_then(|first| self.prefix_index.get(&first));

        if let Some(bucket) = bucket {
            for prefix in bucket {
                if symbol.starts_with(prefix.as_str()) {
                    return self.prefixes.get(prefix);
                }
            }
        }

        // The empty prefix matches everything, and is always the shortest
        self.prefixes.get("")
    }

    /// Get the entry registered for exactly `prefix`
    pub fn prefix(&self, prefix: &str) -> Option<&PrefixEntry> {
        self.prefixes.get(prefix)
    }

    /// Get the exact class map
    pub fn class_map(&self) -> &FxHashMap<String, PathBuf> {
        &self.class_map
    }

    /// Get the fallback directories
    pub fn fallback_dirs(&self) -> &[PathBuf] {
        &self.fallback_dirs
    }

    /// Get the configuration
    pub fn config(&self) -> &AutoloadConfig {
        &self.config
    }

    /// Number of exact entries
    pub fn len_exact(&self) -> usize {
        self.class_map.len()
    }

    /// Number of distinct prefixes
    pub fn len_prefixes(&self) -> usize {
        self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.class_map.is_empty() && self.prefixes.is_empty() && self.fallback_dirs.is_empty()
    }

    fn strip_leading_separator<'a>(&self, symbol: &'a str) -> &'a str {
        symbol
            .strip_prefix(self.config.namespace_separator)
            .unwrap_or(symbol)
    }

    /// Class-map entry for `symbol` as given, then without its leading separator
    fn exact_entry(&self, symbol: &str) -> Option<&PathBuf> {
        self.class_map
            .get(symbol)
            .or_else(|| self.class_map.get(self.strip_leading_separator(symbol)))
    }

    /// Prefix or fallback candidates, ignoring the class map
    fn search_candidates(&self, symbol: &str) -> Vec<PathBuf> {
        if self.config.classmap_authoritative {
            return Vec::new();
        }

        let stripped = self.strip_leading_separator(symbol);
        let as_given = self.matching_prefix(symbol);
        let without_separator = if stripped.len() < symbol.len() {
            self.matching_prefix(stripped)
        } else {
            None
        };

        // Longest match across both spellings; the symbol as given wins ties
        let matched = match (as_given, without_separator) {
            (Some(given), Some(bare)) if bare.length > given.length => Some((stripped, bare)),
            (Some(given), _) => Some((symbol, given)),
            (None, Some(bare)) => Some((stripped, bare)),
            (None, None) => None,
        };

        let (remainder, directories) = match matched {
            Some((name, entry)) => (
                name.strip_prefix(entry.prefix.as_str()).unwrap_or(name),
                entry.directories.as_slice(),
            ),
            None => (stripped, self.fallback_dirs.as_slice()),
        };

        match self.relative_path(remainder) {
            Some(relative) => directories.iter().map(|dir| dir.join(&relative)).collect(),
            None => Vec::new(),
        }
    }

    /// Turn the part of a symbol after its prefix into a relative file path
    fn relative_path(&self, remainder: &str) -> Option<PathBuf> {
        let separator = self.config.namespace_separator;
        let remainder = remainder.trim_start_matches(separator);
        if remainder.is_empty() {
            return None;
        }

        let mut relative = remainder.replace(separator, MAIN_SEPARATOR_STR);
        if !self.config.extension.is_empty() {
            relative.push('.');
            relative.push_str(&self.config.extension);
        }

        let relative = PathBuf::from(relative);
        if !is_plain_relative(&relative) {
            warn!("Rejected symbol path escaping its directory: {:?}", relative);
            return None;
        }
        Some(relative)
    }
}

/// Only normal components, so joining stays under the base directory
fn is_plain_relative(path: &Path) -> bool {
    path.components()
        .all(|component| matches!(component, Component::Normal(_)))
}
