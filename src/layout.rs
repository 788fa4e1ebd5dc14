//! Persisted layout: the record/replay artifact
//!
//! On disk the layout is a JSON object mapping fingerprint hex strings to
//! lists of path components:
//!
//! ```json
//! {
//!   "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824": ["a", "x.txt"]
//! }
//! ```
//!
//! Keys are written in sorted order. Loading validates every entry so replay
//! never has to defend against a hostile or corrupted file.

use crate::error::MirrorError;
use crate::tree::path::invalid_component_reason;
use crate::tree::FingerprintMap;
use crate::types::{Fingerprint, RelativePath};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Wire form of a layout
pub type PersistedLayout = BTreeMap<String, Vec<String>>;

/// Convert a scanned map to its wire form
pub fn to_persisted(map: &FingerprintMap) -> PersistedLayout {
    map.iter()
        .map(|(fp, path)| (fp.to_hex(), path.components().to_vec()))
        .collect()
}

/// Validate a wire-form layout and convert it back to a map
///
/// `source` is only used for error messages.
pub fn from_persisted(layout: PersistedLayout, source: &Path) -> Result<FingerprintMap, MirrorError> {
    let mut map = FingerprintMap::new();
    let mut seen_paths = BTreeSet::new();

    for (key, components) in layout {
        let fingerprint: Fingerprint = key
            .parse()
            .map_err(|e| MirrorError::format(source, format!("{}", e)))?;

        if components.is_empty() {
            return Err(MirrorError::format(
                source,
                format!("entry {} has an empty path", key),
            ));
        }
        for component in &components {
            if let Some(reason) = invalid_component_reason(component) {
                return Err(MirrorError::format(
                    source,
                    format!("entry {}: {} in {:?}", key, reason, components),
                ));
            }
        }

        let path = RelativePath::from_components(components);
        if !seen_paths.insert(path.clone()) {
            return Err(MirrorError::format(
                source,
                format!("path '{}' is recorded for more than one fingerprint", path),
            ));
        }
        map.insert(fingerprint, path).map_err(|e| {
            // Keys are unique after parsing unless two spellings (e.g. case) collide
            MirrorError::format(source, e.to_string())
        })?;
    }

    // A path cannot be both a file and the directory of another file. In
    // sorted order a descendant immediately follows its ancestor.
    let mut previous: Option<&RelativePath> = None;
    for path in &seen_paths {
        if let Some(prev) = previous {
            if path.starts_with(prev) {
                return Err(MirrorError::format(
                    source,
                    format!("path '{}' is recorded inside file '{}'", path, prev),
                ));
            }
        }
        previous = Some(path);
    }

    Ok(map)
}

/// Serialize a map as pretty-printed JSON
pub fn to_json(map: &FingerprintMap) -> Result<String, MirrorError> {
    serde_json::to_string_pretty(&to_persisted(map))
        .map_err(|e| MirrorError::Config(format!("Failed to serialize layout: {}", e)))
}

/// Parse a layout document
pub fn from_json(json: &str, source: &Path) -> Result<FingerprintMap, MirrorError> {
    let layout: PersistedLayout =
        serde_json::from_str(json).map_err(|e| MirrorError::format(source, e.to_string()))?;
    from_persisted(layout, source)
}

/// Read and validate a layout file
pub fn load_layout(path: &Path) -> Result<FingerprintMap, MirrorError> {
    let json = fs::read_to_string(path)
        .map_err(|e| MirrorError::format(path, format!("cannot read file: {}", e)))?;
    let map = from_json(&json, path)?;
    debug!(path = %path.display(), entries = map.len(), "Loaded layout");
    Ok(map)
}

/// Write a layout atomically
///
/// Content goes to a temporary file next to `path`, is synced, then renamed
/// over `path`. On failure the temporary file is removed and `path` is left
/// untouched.
pub fn write_layout_atomic(map: &FingerprintMap, path: &Path) -> Result<(), MirrorError> {
    let json = to_json(map)?;

    let file_name = path
        .file_name()
        .ok_or_else(|| {
            MirrorError::io(
                path,
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "layout path has no file name"),
            )
        })?
        .to_string_lossy()
        .into_owned();
    let temp_path = path.with_file_name(format!(".{}.{}.tmp", file_name, std::process::id()));

    let result = (|| -> Result<(), MirrorError> {
        let mut temp_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .map_err(|e| MirrorError::io(&temp_path, e))?;
        temp_file
            .write_all(json.as_bytes())
            .and_then(|_| temp_file.write_all(b"\n"))
            .map_err(|e| MirrorError::io(&temp_path, e))?;
        temp_file
            .sync_all()
            .map_err(|e| MirrorError::io(&temp_path, e))?;
        fs::rename(&temp_path, path).map_err(|e| MirrorError::io(path, e))
    })();

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}
