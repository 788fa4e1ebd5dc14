//! Conversion between platform paths and root-relative component lists

use crate::error::ScanError;
use crate::types::RelativePath;
use std::path::{Component, Path, PathBuf};

impl RelativePath {
    /// Relative path of `path` below `root`, split into components
    ///
    /// `path` must live under `root`. Components must be valid UTF-8 since the
    /// persisted layout stores them as strings.
    pub fn from_root(root: &Path, path: &Path) -> Result<RelativePath, ScanError> {
        let relative = path.strip_prefix(root).map_err(|_| {
            ScanError::io(
                path,
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("path is not under {}", root.display()),
                ),
            )
        })?;

        let mut components = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(name) => {
                    let name = name
                        .to_str()
                        .ok_or_else(|| ScanError::NonUtf8Path(path.to_path_buf()))?;
                    components.push(name.to_string());
                }
                Component::CurDir => {}
                _ => {
                    return Err(ScanError::io(
                        path,
                        std::io::Error::new(
                            std::io::ErrorKind::InvalidInput,
                            "unexpected path component",
                        ),
                    ))
                }
            }
        }

        Ok(RelativePath::from_components(components))
    }

    /// Resolve against `root` into a platform path
    pub fn to_path(&self, root: &Path) -> PathBuf {
        let mut path = root.to_path_buf();
        for component in self.components() {
            path.push(component);
        }
        path
    }
}

/// Why a recorded component cannot be used as a path segment, if it can't
///
/// Rejects anything that could escape the root or be reinterpreted by the
/// platform: empty names, `.`, `..`, separators and NUL.
pub fn invalid_component_reason(component: &str) -> Option<&'static str> {
    if component.is_empty() {
        Some("empty path component")
    } else if component == "." || component == ".." {
        Some("relative path component")
    } else if component.contains('/') || (cfg!(windows) && component.contains('\\')) {
        Some("path separator inside component")
    } else if component.contains('\0') {
        Some("NUL inside component")
    } else {
        None
    }
}
