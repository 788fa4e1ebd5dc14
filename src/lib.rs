//! Layout Mirror: content-addressed directory layout record and replay
//!
//! Records which content lives at which relative path in a source tree, then
//! rearranges another copy of that content so identical files share the same
//! relative paths. Content identity is a SHA-256 fingerprint over a sampled
//! window of each file.

pub mod cli;
pub mod config;
pub mod error;
pub mod layout;
pub mod logging;
pub mod mirror;
pub mod progress;
pub mod tree;
pub mod types;

pub use error::{MirrorError, ScanError};
pub use mirror::{record, replay, MirrorOptions, RecordSummary, ReplaySummary};
pub use types::{Fingerprint, RelativePath};
