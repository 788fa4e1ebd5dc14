//! Reconciliation planning: which files move where, and in what order
//!
//! Two paths are *related* when one equals or contains the other; related
//! paths cannot both hold a regular file. A pending move is blocked while any
//! file still waiting to move sits at a path related to its destination.
//! When every remaining move is blocked the moves form cycles, and the first
//! one is parked in the staging directory, which releases whatever waited on
//! its old location.

use crate::error::MirrorError;
use crate::tree::FingerprintMap;
use crate::types::{Fingerprint, RelativePath};
use serde::Serialize;
use std::collections::BTreeSet;
use std::ops::Bound;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// Direct rename to the recorded path
    Move,
    /// Rename into the staging directory to break a cycle
    Stage,
    /// Rename out of the staging directory to the recorded path
    Unstage,
}

/// One rename, relative to the target root
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveStep {
    pub fingerprint: Fingerprint,
    pub from: RelativePath,
    pub to: RelativePath,
    pub kind: StepKind,
}

/// A file that ends up somewhere else, from its original location
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Relocation {
    pub fingerprint: Fingerprint,
    pub from: RelativePath,
    pub to: RelativePath,
}

/// A fingerprint and the path it refers to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathEntry {
    pub fingerprint: Fingerprint,
    pub path: RelativePath,
}

/// Everything replay needs to know before touching the filesystem
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MovePlan {
    /// Renames in execution order
    pub steps: Vec<MoveStep>,
    /// Net effect of `steps`, in fingerprint order
    pub relocations: Vec<Relocation>,
    /// Recorded files already at their recorded path
    pub in_place: Vec<PathEntry>,
    /// Recorded fingerprints with no file in the target tree
    pub missing: Vec<PathEntry>,
    /// Target files whose fingerprint is not in the recorded layout
    pub extra: Vec<PathEntry>,
}

impl MovePlan {
    pub fn staged_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| s.kind == StepKind::Stage)
            .count()
    }
}

#[derive(Debug)]
struct PendingMove {
    fingerprint: Fingerprint,
    from: RelativePath,
    to: RelativePath,
    done: bool,
}

/// Compare a recorded layout with a scanned target and order the renames
///
/// `staging_dir` is a single directory name below the target root. Fails with
/// `MoveConflict` when a destination is held by a file that is not moving, or
/// when a recorded path lies inside the staging directory.
pub fn plan_moves(
    source: &FingerprintMap,
    target: &FingerprintMap,
    staging_dir: &str,
) -> Result<MovePlan, MirrorError> {
    let staging = RelativePath::from_components([staging_dir]);
    let mut plan = MovePlan::default();
    let mut pending = Vec::new();

    for (fingerprint, recorded) in source {
        if recorded.starts_with(&staging) {
            return Err(MirrorError::MoveConflict {
                from: target.get(fingerprint).cloned().unwrap_or_else(|| recorded.clone()),
                to: recorded.clone(),
                reason: format!("recorded path lies inside the staging directory '{}'", staging),
            });
        }

        match target.get(fingerprint) {
            None => plan.missing.push(PathEntry {
                fingerprint: *fingerprint,
                path: recorded.clone(),
            }),
            Some(current) if current == recorded => plan.in_place.push(PathEntry {
                fingerprint: *fingerprint,
                path: recorded.clone(),
            }),
            Some(current) => {
                plan.relocations.push(Relocation {
                    fingerprint: *fingerprint,
                    from: current.clone(),
                    to: recorded.clone(),
                });
                pending.push(PendingMove {
                    fingerprint: *fingerprint,
                    from: current.clone(),
                    to: recorded.clone(),
                    done: false,
                });
            }
        }
    }

    for (fingerprint, path) in target {
        if !source.contains(fingerprint) {
            plan.extra.push(PathEntry {
                fingerprint: *fingerprint,
                path: path.clone(),
            });
        }
    }

    // Files that stay put can never be displaced
    let stationary: BTreeSet<RelativePath> = plan
        .in_place
        .iter()
        .chain(plan.extra.iter())
        .map(|e| e.path.clone())
        .collect();
    for m in &pending {
        if let Some(occupant) = find_related(&stationary, &m.to) {
            return Err(MirrorError::MoveConflict {
                from: m.from.clone(),
                to: m.to.clone(),
                reason: format!("destination collides with '{}', which is not being moved", occupant),
            });
        }
    }

    plan.steps = order_moves(pending, &staging)?;
    if plan.staged_count() > 0 && stationary.contains(&staging) {
        return Err(staging_occupied(&staging));
    }
    Ok(plan)
}

fn staging_occupied(staging: &RelativePath) -> MirrorError {
    MirrorError::MoveConflict {
        from: staging.clone(),
        to: staging.clone(),
        reason: "a file occupies the staging directory path; remove it or choose another staging_dir"
            .to_string(),
    }
}

/// True for paths strictly inside the staging directory
fn is_parked(path: &RelativePath, staging: &RelativePath) -> bool {
    path.len() > staging.len() && path.starts_with(staging)
}

fn order_moves(
    mut pending: Vec<PendingMove>,
    staging: &RelativePath,
) -> Result<Vec<MoveStep>, MirrorError> {
    let mut occupied: BTreeSet<RelativePath> = pending.iter().map(|m| m.from.clone()).collect();
    let mut remaining = pending.len();
    let mut steps = Vec::with_capacity(pending.len());

    while remaining > 0 {
        let mut progressed = false;

        for m in pending.iter_mut().filter(|m| !m.done) {
            if find_related(&occupied, &m.to).is_some() {
                continue;
            }
            occupied.remove(&m.from);
            let kind = if is_parked(&m.from, staging) {
                StepKind::Unstage
            } else {
                StepKind::Move
            };
            steps.push(MoveStep {
                fingerprint: m.fingerprint,
                from: m.from.clone(),
                to: m.to.clone(),
                kind,
            });
            m.done = true;
            remaining -= 1;
            progressed = true;
        }

        if progressed {
            continue;
        }

        // Everything left is blocked: park the first move not already parked.
        // Parked files never block anything, so one always exists here.
        if occupied.contains(staging) {
            return Err(staging_occupied(staging));
        }
        let m = pending
            .iter_mut()
            .find(|m| !m.done && !is_parked(&m.from, staging))
            .ok_or_else(|| MirrorError::MoveConflict {
                from: staging.clone(),
                to: staging.clone(),
                reason: "unable to order moves out of the staging directory".to_string(),
            })?;
        let parked = staging.join(m.fingerprint.to_hex());
        occupied.remove(&m.from);
        occupied.insert(parked.clone());
        steps.push(MoveStep {
            fingerprint: m.fingerprint,
            from: m.from.clone(),
            to: parked.clone(),
            kind: StepKind::Stage,
        });
        m.from = parked;
    }

    Ok(steps)
}

/// Some member of `set` related to `path`, if any
fn find_related<'a>(set: &'a BTreeSet<RelativePath>, path: &RelativePath) -> Option<&'a RelativePath> {
    if let Some(found) = set.get(path) {
        return Some(found);
    }
    for ancestor in path.ancestors() {
        if let Some(found) = set.get(&ancestor) {
            return Some(found);
        }
    }
    // Descendants sort immediately after their ancestor
    set.range((Bound::Excluded(path), Bound::Unbounded))
        .next()
        .filter(|candidate| candidate.starts_with(path))
}
