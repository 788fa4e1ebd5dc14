//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::{MirrorError, ScanError};

/// Map domain errors to the message printed before a non-zero exit.
pub fn map_error(e: &MirrorError) -> String {
    match e {
        MirrorError::Scan(ScanError::DuplicateFingerprint { .. }) => format!(
            "Error: {}\nEvery file in a tree must have distinct content; remove or alter one of them.",
            e
        ),
        MirrorError::MoveConflict { .. } => format!(
            "Error: {}\nNo file was overwritten. Moves completed before this point were reported above.",
            e
        ),
        _ => format!("Error: {}", e),
    }
}
