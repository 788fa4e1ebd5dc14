//! Directory scan producing a fingerprint → relative path map

use crate::error::ScanError;
use crate::progress::{MirrorEvent, MirrorObserver};
use crate::tree::hasher::compute_file_fingerprint;
use crate::tree::walker::{Walker, WalkerConfig};
use crate::types::{Fingerprint, RelativePath};
use std::collections::btree_map::{self, BTreeMap, Entry};
use std::path::Path;
use tracing::debug;

/// Mapping from fingerprint to the single relative path holding that content
///
/// Keys are unique: inserting a fingerprint twice is a `DuplicateFingerprint`
/// error, never an overwrite.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FingerprintMap {
    entries: BTreeMap<Fingerprint, RelativePath>,
}

impl FingerprintMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fingerprint, rejecting collisions
    pub fn insert(&mut self, fingerprint: Fingerprint, path: RelativePath) -> Result<(), ScanError> {
        match self.entries.entry(fingerprint) {
            Entry::Occupied(existing) => Err(ScanError::DuplicateFingerprint {
                fingerprint,
                original: existing.get().clone(),
                new: path,
            }),
            Entry::Vacant(slot) => {
                slot.insert(path);
                Ok(())
            }
        }
    }

    pub fn get(&self, fingerprint: &Fingerprint) -> Option<&RelativePath> {
        self.entries.get(fingerprint)
    }

    pub fn contains(&self, fingerprint: &Fingerprint) -> bool {
        self.entries.contains_key(fingerprint)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in fingerprint order
    pub fn iter(&self) -> btree_map::Iter<'_, Fingerprint, RelativePath> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a FingerprintMap {
    type Item = (&'a Fingerprint, &'a RelativePath);
    type IntoIter = btree_map::Iter<'a, Fingerprint, RelativePath>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Fingerprint every regular file under `root`
///
/// Aborts on the first I/O failure or fingerprint collision. `observer`
/// receives a `FileFingerprinted` event per file when given.
pub fn scan_directory_tree(
    root: &Path,
    config: WalkerConfig,
    observer: Option<&dyn MirrorObserver>,
) -> Result<FingerprintMap, ScanError> {
    let walker = Walker::with_config(root.to_path_buf(), config);
    let mut map = FingerprintMap::new();

    for entry in walker.files() {
        let entry = entry?;
        let relative = RelativePath::from_root(root, &entry.path)?;
        debug!(path = %relative, size = entry.size, "Processing file");

        let fingerprint = compute_file_fingerprint(&entry.path)?;
        debug!(path = %relative, fingerprint = %fingerprint, "Digest computed");

        if let Some(observer) = observer {
            observer.on_event(&MirrorEvent::FileFingerprinted {
                path: relative.clone(),
                fingerprint,
            });
        }
        map.insert(fingerprint, relative)?;
    }

    Ok(map)
}
