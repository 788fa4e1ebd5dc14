//! Fingerprint engine
//!
//! Walks a directory tree, fingerprints each regular file from a sampled
//! window of its content, and maps each fingerprint to the file's path
//! relative to the tree root.

pub mod hasher;
pub mod path;
pub mod scan;
pub mod walker;

pub use hasher::{compute_file_fingerprint, sample_window, SAMPLE_SIZE};
pub use scan::{scan_directory_tree, FingerprintMap};
pub use walker::{Walker, WalkerConfig};
