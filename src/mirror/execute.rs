//! Applying a move plan to the target tree

use crate::error::MirrorError;
use crate::mirror::plan::{MovePlan, MoveStep, StepKind};
use crate::progress::{MirrorEvent, MirrorObserver};
use crate::types::RelativePath;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// How a plan is applied
#[derive(Debug, Clone, Copy, Default)]
pub struct ExecuteOptions {
    /// Report steps without touching the filesystem
    pub dry_run: bool,
    /// Remove directories emptied by the moves
    pub prune_empty_dirs: bool,
}

/// Perform every step of `plan` under `root`, in order
///
/// Every destination is checked against the tree before the first rename,
/// including in dry-run. Each completed rename is logged and reported before
/// the next begins, so a failure part-way leaves a record of what already
/// moved. A destination that exists is never overwritten; a directory in the
/// way holding nothing but directories is removed.
pub fn execute_plan(
    root: &Path,
    plan: &MovePlan,
    staging_dir: &str,
    options: ExecuteOptions,
    observer: &dyn MirrorObserver,
) -> Result<(), MirrorError> {
    check_destinations(root, plan)?;

    for step in &plan.steps {
        if !options.dry_run {
            apply_step(root, step)?;
        }
        info!(
            from = %step.from,
            to = %step.to,
            fingerprint = %step.fingerprint.short(),
            kind = ?step.kind,
            dry_run = options.dry_run,
            "Moved file"
        );
        observer.on_event(&MirrorEvent::Moved {
            fingerprint: step.fingerprint,
            from: step.from.clone(),
            to: step.to.clone(),
            staged: step.kind == StepKind::Stage,
            dry_run: options.dry_run,
        });
    }

    if options.dry_run {
        return Ok(());
    }

    if plan.steps.iter().any(|s| s.kind != StepKind::Move) {
        remove_dir_if_empty(root, &RelativePath::from_components([staging_dir]))?;
    }

    if options.prune_empty_dirs {
        prune_vacated_dirs(root, plan)?;
    }

    Ok(())
}

fn apply_step(root: &Path, step: &MoveStep) -> Result<(), MirrorError> {
    let from = step.from.to_path(root);
    let to = step.to.to_path(root);

    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).map_err(|e| MirrorError::io(parent, e))?;
    }

    match fs::symlink_metadata(&to) {
        Ok(metadata) if metadata.is_dir() => {
            let dirs = directory_tree(&to)?
                .ok_or_else(|| conflict(step, "destination is a non-empty directory"))?;
            debug!(path = %step.to, "Removing empty directories in the way");
            // Deepest first
            for dir in dirs.iter().rev() {
                fs::remove_dir(dir).map_err(|e| MirrorError::io(dir, e))?;
            }
        }
        Ok(_) => return Err(conflict(step, "destination already exists")),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(MirrorError::io(&to, e)),
    }

    fs::rename(&from, &to).map_err(|e| MirrorError::io(&from, e))
}

/// Reject any step whose destination cannot be reached without following a
/// symlink or displacing something that is not moving
///
/// Sees what the scan skipped (symlinks, ignored names, the layout file,
/// special files), so such conflicts surface before anything is renamed.
fn check_destinations(root: &Path, plan: &MovePlan) -> Result<(), MirrorError> {
    let vacated: BTreeSet<&RelativePath> = plan.steps.iter().map(|s| &s.from).collect();

    for step in &plan.steps {
        for ancestor in step.to.ancestors() {
            let path = ancestor.to_path(root);
            match fs::symlink_metadata(&path) {
                Ok(metadata) if metadata.file_type().is_symlink() => {
                    return Err(conflict(
                        step,
                        format!("'{}' is a symbolic link", ancestor),
                    ))
                }
                Ok(metadata) if metadata.is_dir() => {}
                // Leaves before this step; nothing can exist below it
                Ok(metadata) if metadata.is_file() && vacated.contains(&ancestor) => break,
                Ok(_) => {
                    return Err(conflict(
                        step,
                        format!("'{}' is not a directory", ancestor),
                    ))
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => break,
                Err(e) => return Err(MirrorError::io(path, e)),
            }
        }

        let to = step.to.to_path(root);
        match fs::symlink_metadata(&to) {
            Ok(metadata) if metadata.file_type().is_symlink() => {
                return Err(conflict(step, "destination is a symbolic link"))
            }
            Ok(metadata) if metadata.is_dir() => check_clearable(root, step, &to, &vacated)?,
            Ok(metadata) if metadata.is_file() && vacated.contains(&step.to) => {}
            Ok(_) => return Err(conflict(step, "destination already exists")),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(MirrorError::io(&to, e)),
        }
    }
    Ok(())
}

/// A directory at a destination may only hold directories and files that
/// move away before the step runs
fn check_clearable(
    root: &Path,
    step: &MoveStep,
    dir: &Path,
    vacated: &BTreeSet<&RelativePath>,
) -> Result<(), MirrorError> {
    for entry in WalkDir::new(dir).follow_links(false).min_depth(1) {
        let entry = entry.map_err(|e| walk_error(dir, e))?;
        let file_type = entry.file_type();
        if file_type.is_dir() {
            continue;
        }
        let relative = RelativePath::from_root(root, entry.path())?;
        if !(file_type.is_file() && vacated.contains(&relative)) {
            return Err(conflict(
                step,
                format!("destination is a directory holding '{}'", relative),
            ));
        }
    }
    Ok(())
}

/// Every directory of the tree at `dir`, parents before children, or `None`
/// if it holds anything other than directories
fn directory_tree(dir: &Path) -> Result<Option<Vec<PathBuf>>, MirrorError> {
    let mut dirs = Vec::new();
    for entry in WalkDir::new(dir).follow_links(false) {
        let entry = entry.map_err(|e| walk_error(dir, e))?;
        if !entry.file_type().is_dir() {
            return Ok(None);
        }
        dirs.push(entry.into_path());
    }
    Ok(Some(dirs))
}

fn walk_error(dir: &Path, e: walkdir::Error) -> MirrorError {
    let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| dir.to_path_buf());
    let source = e
        .into_io_error()
        .unwrap_or_else(|| std::io::Error::new(std::io::ErrorKind::Other, "filesystem loop detected"));
    MirrorError::io(path, source)
}

fn conflict(step: &MoveStep, reason: impl Into<String>) -> MirrorError {
    MirrorError::MoveConflict {
        from: step.from.clone(),
        to: step.to.clone(),
        reason: reason.into(),
    }
}

/// Remove `path` if it is an empty directory; anything else is left alone
fn remove_dir_if_empty(root: &Path, path: &RelativePath) -> Result<bool, MirrorError> {
    let dir = path.to_path(root);
    match fs::symlink_metadata(&dir) {
        Ok(metadata) if metadata.is_dir() => {}
        Ok(_) => return Ok(false),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(MirrorError::io(&dir, e)),
    }
    let is_empty = fs::read_dir(&dir)
        .map_err(|e| MirrorError::io(&dir, e))?
        .next()
        .is_none();
    if !is_empty {
        return Ok(false);
    }
    fs::remove_dir(&dir).map_err(|e| MirrorError::io(&dir, e))?;
    debug!(path = %path, "Removed empty directory");
    Ok(true)
}

/// Remove directories that held moved files and are now empty, deepest first
fn prune_vacated_dirs(root: &Path, plan: &MovePlan) -> Result<(), MirrorError> {
    let vacated: BTreeSet<RelativePath> = plan
        .relocations
        .iter()
        .flat_map(|r| r.from.ancestors())
        .collect();

    let mut by_depth: Vec<&RelativePath> = vacated.iter().collect();
    by_depth.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    for dir in by_depth {
        remove_dir_if_empty(root, dir)?;
    }
    Ok(())
}
