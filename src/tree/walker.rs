//! Filesystem walker enumerating the regular files of a tree

use crate::error::ScanError;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// A regular file found by the walker
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub path: PathBuf,
    pub size: u64,
}

/// Filesystem walker configuration
#[derive(Debug, Clone, Default)]
pub struct WalkerConfig {
    /// File or directory names to skip entirely (exact name match)
    pub ignore_patterns: Vec<String>,
    /// Specific paths to skip, e.g. a layout file stored inside the tree
    pub exclude_paths: Vec<PathBuf>,
}

/// Filesystem walker
///
/// Symbolic links are neither followed nor reported.
pub struct Walker {
    root: PathBuf,
    config: WalkerConfig,
}

impl Walker {
    /// Create a walker with custom configuration
    pub fn with_config(root: PathBuf, config: WalkerConfig) -> Self {
        Self { root, config }
    }

    /// Lazily enumerate regular files under the root
    ///
    /// Entries within a directory are visited in file-name order so progress
    /// output is reproducible; callers must not rely on it for correctness.
    pub fn files(&self) -> impl Iterator<Item = Result<FileEntry, ScanError>> + '_ {
        let excluded: Vec<PathBuf> = self
            .config
            .exclude_paths
            .iter()
            .map(|p| dunce::canonicalize(p).unwrap_or_else(|_| p.clone()))
            .collect();

        WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| !self.should_ignore(entry, &excluded))
            .filter_map(move |entry| {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        let path = e
                            .path()
                            .map(Path::to_path_buf)
                            .unwrap_or_else(|| self.root.clone());
                        let source = e.into_io_error().unwrap_or_else(|| {
                            std::io::Error::new(
                                std::io::ErrorKind::Other,
                                "filesystem loop detected",
                            )
                        });
                        return Some(Err(ScanError::io(path, source)));
                    }
                };

                let file_type = entry.file_type();
                if file_type.is_symlink() {
                    tracing::debug!(path = %entry.path().display(), "Skipping symbolic link");
                    return None;
                }
                if !file_type.is_file() {
                    // Directories are implied by file paths; special files are not content
                    return None;
                }

                Some(
                    entry
                        .metadata()
                        .map(|metadata| FileEntry {
                            path: entry.path().to_path_buf(),
                            size: metadata.len(),
                        })
                        .map_err(|e| {
                            let source = e.into_io_error().unwrap_or_else(|| {
                                std::io::Error::new(
                                    std::io::ErrorKind::Other,
                                    "failed to read metadata",
                                )
                            });
                            ScanError::io(entry.path(), source)
                        }),
                )
            })
    }

    /// Check if an entry should be skipped, pruning directories
    fn should_ignore(&self, entry: &DirEntry, excluded: &[PathBuf]) -> bool {
        // Never prune the root itself
        if entry.depth() == 0 {
            return false;
        }

        let name = entry.file_name().to_string_lossy();
        if self
            .config
            .ignore_patterns
            .iter()
            .any(|pattern| pattern.as_str() == name)
        {
            return true;
        }

        // Canonicalize only candidates whose name matches an excluded path
        if entry.file_type().is_file()
            && excluded
                .iter()
                .any(|p| p.file_name() == Some(entry.file_name()))
        {
            let canonical =
                dunce::canonicalize(entry.path()).unwrap_or_else(|_| entry.path().to_path_buf());
            if excluded.iter().any(|p| p == &canonical) {
                return true;
            }
        }

        false
    }
}
