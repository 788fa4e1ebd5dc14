//! Layout mirror: record a tree's layout, replay it onto another tree
//!
//! `record` fingerprints a source tree and persists the fingerprint → path
//! map. `replay` loads that map, fingerprints a target tree, and renames
//! target files so content shared with the source ends up at the same
//! relative paths. Replay only relocates; it never deletes a file.

pub mod execute;
pub mod plan;

pub use execute::{execute_plan, ExecuteOptions};
pub use plan::{plan_moves, MovePlan, MoveStep, PathEntry, Relocation, StepKind};

use crate::config::MirrorConfig;
use crate::error::MirrorError;
use crate::layout::{load_layout, write_layout_atomic};
use crate::progress::{MirrorEvent, MirrorObserver};
use crate::tree::scan_directory_tree;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Per-invocation switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MirrorOptions {
    /// Report every fingerprinted file to the observer
    pub verbose: bool,
    /// Compute and report everything, but change nothing on disk
    pub dry_run: bool,
}

/// Outcome of `record`
#[derive(Debug, Clone, Serialize)]
pub struct RecordSummary {
    pub files: usize,
    pub output: PathBuf,
    pub dry_run: bool,
    #[serde(rename = "elapsed_ms", serialize_with = "serialize_millis")]
    pub elapsed: Duration,
}

/// Outcome of `replay`
#[derive(Debug, Clone, Serialize)]
pub struct ReplaySummary {
    /// Files relocated (or, in dry-run, to be relocated)
    pub moves: Vec<Relocation>,
    /// Renames through the staging directory needed to break cycles
    pub staged: usize,
    /// Recorded files already in place
    pub in_place: usize,
    /// Recorded fingerprints absent from the target
    pub missing: Vec<PathEntry>,
    /// Target files the layout does not mention; left untouched
    pub extra: Vec<PathEntry>,
    pub dry_run: bool,
    #[serde(rename = "elapsed_ms", serialize_with = "serialize_millis")]
    pub elapsed: Duration,
}

fn serialize_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}

/// Fingerprint `source_dir` and write its layout to `output`
///
/// Nothing is written unless the whole scan succeeds. In dry-run the scan
/// runs but `output` is not created.
pub fn record(
    source_dir: &Path,
    output: &Path,
    config: &MirrorConfig,
    options: MirrorOptions,
    observer: &dyn MirrorObserver,
) -> Result<RecordSummary, MirrorError> {
    let start = Instant::now();
    info!(source = %source_dir.display(), output = %output.display(), "Recording layout");

    let mut walker_config = config.scan.walker_config();
    walker_config.exclude_paths.push(output.to_path_buf());
    let map = scan_directory_tree(
        source_dir,
        walker_config,
        options.verbose.then_some(observer),
    )?;

    if !options.dry_run {
        write_layout_atomic(&map, output)?;
    }

    let summary = RecordSummary {
        files: map.len(),
        output: output.to_path_buf(),
        dry_run: options.dry_run,
        elapsed: start.elapsed(),
    };
    info!(
        files = summary.files,
        elapsed_ms = summary.elapsed.as_millis() as u64,
        "Recorded layout"
    );
    Ok(summary)
}

/// Rearrange `target_dir` to match the layout recorded in `input`
///
/// Both fingerprint maps are complete before any move is decided. Missing
/// content is reported, not fatal. Collisions, malformed layouts, I/O
/// failures and unresolvable destinations abort.
pub fn replay(
    target_dir: &Path,
    input: &Path,
    config: &MirrorConfig,
    options: MirrorOptions,
    observer: &dyn MirrorObserver,
) -> Result<ReplaySummary, MirrorError> {
    let start = Instant::now();
    info!(target = %target_dir.display(), layout = %input.display(), "Replaying layout");

    let source = load_layout(input)?;

    let mut walker_config = config.scan.walker_config();
    walker_config.exclude_paths.push(input.to_path_buf());
    let target = scan_directory_tree(
        target_dir,
        walker_config,
        options.verbose.then_some(observer),
    )?;

    let plan = plan_moves(&source, &target, &config.replay.staging_dir)?;

    for entry in &plan.missing {
        warn!(path = %entry.path, fingerprint = %entry.fingerprint.short(), "Missing on target");
        observer.on_event(&MirrorEvent::MissingOnTarget {
            fingerprint: entry.fingerprint,
            path: entry.path.clone(),
        });
    }
    for entry in &plan.extra {
        info!(path = %entry.path, "Not in recorded layout, leaving in place");
        observer.on_event(&MirrorEvent::ExtraOnTarget {
            fingerprint: entry.fingerprint,
            path: entry.path.clone(),
        });
    }

    let execute_options = ExecuteOptions {
        dry_run: options.dry_run,
        prune_empty_dirs: config.replay.prune_empty_dirs,
    };
    execute_plan(
        target_dir,
        &plan,
        &config.replay.staging_dir,
        execute_options,
        observer,
    )?;

    let staged = plan.staged_count();
    let summary = ReplaySummary {
        moves: plan.relocations,
        staged,
        in_place: plan.in_place.len(),
        missing: plan.missing,
        extra: plan.extra,
        dry_run: options.dry_run,
        elapsed: start.elapsed(),
    };
    info!(
        moved = summary.moves.len(),
        staged = summary.staged,
        in_place = summary.in_place,
        missing = summary.missing.len(),
        extra = summary.extra.len(),
        elapsed_ms = summary.elapsed.as_millis() as u64,
        "Replay complete"
    );
    Ok(summary)
}
