//! File existence checks used during resolution

use rustc_hash::FxHashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Answers whether a candidate file exists.
///
/// Implementations must be side-effect free from the resolver's point of
/// view and safe to share between threads.
pub trait FileSystem: Send + Sync {
    /// Check whether a file exists at `path`
    fn exists(&self, path: &Path) -> bool;
}

impl<T: FileSystem + ?Sized> FileSystem for &T {
    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }
}

impl<T: FileSystem + ?Sized> FileSystem for Arc<T> {
    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }
}

/// Checks the real filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}

/// In-memory set of known files
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSystem {
    files: FxHashSet<PathBuf>,
}

impl MemoryFileSystem {
    /// Create an empty in-memory filesystem
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an in-memory filesystem containing the given files
    pub fn with_files<I, P>(files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            files: files.into_iter().map(Into::into).collect(),
        }
    }

    /// Add a file
    pub fn insert(&mut self, path: impl Into<PathBuf>) {
        self.files.insert(path.into());
    }

    /// Check if a file is known
    pub fn contains(&self, path: &Path) -> bool {
        self.files.contains(path)
    }

    /// Number of known files
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether no files are known
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl FileSystem for MemoryFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.contains(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_filesystem() {
        let mut fs = MemoryFileSystem::with_files(["/a/B.php"]);
        assert!(fs.exists(Path::new("/a/B.php")));
        assert!(!fs.exists(Path::new("/a/C.php")));

        fs.insert("/a/C.php");
        assert!(fs.exists(Path::new("/a/C.php")));
        assert_eq!(fs.len(), 2);
    }

    #[test]
    fn test_os_filesystem_ignores_directories() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("Thing.php");
        std::fs::write(&file, "<?php").unwrap();

        let fs = OsFileSystem;
        assert!(fs.exists(&file));
        assert!(!fs.exists(temp_dir.path()));
        assert!(!fs.exists(&temp_dir.path().join("Missing.php")));
    }

    #[test]
    fn test_shared_handles_delegate() {
        let fs = Arc::new(MemoryFileSystem::with_files(["/x.php"]));
        let by_ref = &fs;
        assert!(by_ref.exists(Path::new("/x.php")));
        assert!(FileSystem::exists(&fs, Path::new("/x.php")));
    }
}
