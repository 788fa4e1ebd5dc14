//! Progress events for scans and replays.
//!
//! Observers are purely informational. Nothing in record or replay depends on
//! whether an observer is attached or what it does with an event.

use crate::types::{Fingerprint, RelativePath};
use serde::Serialize;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MirrorEvent {
    /// A file was fingerprinted during a scan
    FileFingerprinted {
        path: RelativePath,
        fingerprint: Fingerprint,
    },
    /// A recorded fingerprint has no file in the target tree
    MissingOnTarget {
        fingerprint: Fingerprint,
        path: RelativePath,
    },
    /// A target file is unknown to the recorded layout and stays put
    ExtraOnTarget {
        fingerprint: Fingerprint,
        path: RelativePath,
    },
    /// A file was (or, in dry-run, would be) renamed
    Moved {
        fingerprint: Fingerprint,
        from: RelativePath,
        to: RelativePath,
        staged: bool,
        dry_run: bool,
    },
}

/// Receiver for progress events
pub trait MirrorObserver {
    fn on_event(&self, event: &MirrorEvent);
}

/// Observer that drops every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl MirrorObserver for NoopObserver {
    fn on_event(&self, _event: &MirrorEvent) {}
}

impl<F> MirrorObserver for F
where
    F: Fn(&MirrorEvent),
{
    fn on_event(&self, event: &MirrorEvent) {
        self(event)
    }
}

/// Observer that keeps every event, mostly for tests
#[derive(Debug, Default)]
pub struct CollectingObserver {
    events: Mutex<Vec<MirrorEvent>>,
}

impl CollectingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<MirrorEvent> {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl MirrorObserver for CollectingObserver {
    fn on_event(&self, event: &MirrorEvent) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event.clone());
    }
}
