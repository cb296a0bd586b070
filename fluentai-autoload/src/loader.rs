//! Shared lookup handle

use crate::{AutoloadError, AutoloadTable, FileSystem, OsFileSystem, Registry, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::warn;

/// A frozen registry paired with the filesystem used to confirm candidates.
///
/// Cloning is cheap and shares the same registry, so one loader can be
/// handed to many threads.
pub struct ClassLoader<F: FileSystem = OsFileSystem> {
    registry: Arc<Registry>,
    fs: Arc<F>,
}

impl<F: FileSystem> Clone for ClassLoader<F> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            fs: Arc::clone(&self.fs),
        }
    }
}

impl ClassLoader<OsFileSystem> {
    /// Load a JSON autoload table and check candidates on disk
    pub fn from_table_file(path: &Path) -> Result<Self> {
        let table = AutoloadTable::from_file(path)?;
        Ok(Self::new(table.build_registry(), OsFileSystem))
    }
}

impl<F: FileSystem> ClassLoader<F> {
    /// Freeze `registry` and pair it with `fs`
    pub fn new(registry: Registry, fs: F) -> Self {
        Self {
            registry: Arc::new(registry),
            fs: Arc::new(fs),
        }
    }

    /// Find the file defining `symbol`
    pub fn find_file(&self, symbol: &str) -> Option<PathBuf> {
        self.registry.resolve(symbol, self.fs.as_ref())
    }

    /// Like [`find_file`](Self::find_file), but reports a miss as an error
    pub fn find_file_or_err(&self, symbol: &str) -> Result<PathBuf> {
        self.find_file(symbol).ok_or_else(|| {
            warn!("Unresolved symbol: {}", symbol);
            AutoloadError::SymbolNotFound {
                symbol: symbol.to_string(),
            }
        })
    }

    /// Get the frozen registry
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Get the filesystem used for existence checks
    pub fn filesystem(&self) -> &F {
        &self.fs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryFileSystem;
    use std::thread;

    fn faker_loader() -> (ClassLoader<MemoryFileSystem>, PathBuf) {
        let mut registry = Registry::new();
        registry.register_prefix("Faker\\", "/faker");
        let generator = Path::new("/faker").join("Generator.php");
        let fs = MemoryFileSystem::with_files([generator.clone()]);
        (ClassLoader::new(registry, fs), generator)
    }

    #[test]
    fn test_find_file() {
        let (loader, generator) = faker_loader();
        assert_eq!(loader.find_file("Faker\\Generator"), Some(generator));
        assert_eq!(loader.find_file("Faker\\Nope"), None);
    }

    #[test]
    fn test_find_file_or_err() {
        let (loader, generator) = faker_loader();
        assert_eq!(loader.find_file_or_err("Faker\\Generator").unwrap(), generator);

        let err = loader.find_file_or_err("Missing\\Class").unwrap_err();
        assert!(matches!(
            err,
            AutoloadError::SymbolNotFound { ref symbol } if symbol == "Missing\\Class"
        ));
        assert_eq!(err.to_string(), "Symbol not found: Missing\\Class");
    }

    #[test]
    fn test_clone_shares_registry() {
        let (loader, _) = faker_loader();
        let other = loader.clone();
        assert!(Arc::ptr_eq(loader.registry(), other.registry()));
    }

    #[test]
    fn test_concurrent_readers() {
        let (loader, generator) = faker_loader();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let loader = loader.clone();
                thread::spawn(move || loader.find_file("Faker\\Generator"))
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), Some(generator.clone()));
        }
    }
}
