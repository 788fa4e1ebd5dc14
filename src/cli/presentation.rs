//! Presentation: summaries and progress lines for the terminal.

use crate::cli::parse::OutputFormat;
use crate::error::MirrorError;
use crate::mirror::{RecordSummary, ReplaySummary};
use crate::progress::{MirrorEvent, MirrorObserver};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use std::time::Duration;

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, MirrorError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| MirrorError::Config(format!("Failed to serialize summary: {}", e)))
}

fn format_elapsed(elapsed: Duration) -> String {
    format!("{:.2}s", elapsed.as_secs_f64())
}

fn headline(text: &str, dry_run: bool, color: bool) -> String {
    let text = if dry_run {
        format!("{} (dry run, nothing changed)", text)
    } else {
        text.to_string()
    };
    if color {
        text.bold().to_string()
    } else {
        text
    }
}

pub fn format_record_summary(
    summary: &RecordSummary,
    format: OutputFormat,
    color: bool,
) -> Result<String, MirrorError> {
    if format == OutputFormat::Json {
        return to_json(summary);
    }
    let verb = if summary.dry_run { "Would record" } else { "Recorded" };
    Ok(format!(
        "{}\n  Files: {}\n  Layout: {}\n  Elapsed: {}",
        headline("Record complete", summary.dry_run, color),
        summary.files,
        format!("{} {}", verb, summary.output.display()),
        format_elapsed(summary.elapsed)
    ))
}

pub fn format_replay_summary(
    summary: &ReplaySummary,
    format: OutputFormat,
    color: bool,
) -> Result<String, MirrorError> {
    if format == OutputFormat::Json {
        return to_json(summary);
    }

    let mut s = format!(
        "{}\n  Moved: {}\n  Staged: {}\n  Already in place: {}\n  Missing on target: {}\n  Not in layout: {}\n  Elapsed: {}",
        headline("Replay complete", summary.dry_run, color),
        summary.moves.len(),
        summary.staged,
        summary.in_place,
        summary.missing.len(),
        summary.extra.len(),
        format_elapsed(summary.elapsed)
    );

    if !summary.moves.is_empty() {
        let mut table = Table::new();
        table.load_preset(UTF8_BORDERS_ONLY);
        table.set_header(vec!["From", "To", "Fingerprint"]);
        for m in &summary.moves {
            table.add_row(vec![m.from.to_string(), m.to.to_string(), m.fingerprint.short()]);
        }
        s.push_str(&format!("\n\nMoves:\n{}", table));
    }

    if !summary.missing.is_empty() {
        let title = format!("Missing on target ({}):", summary.missing.len());
        let title = if color { title.yellow().to_string() } else { title };
        s.push_str(&format!("\n\n{}", title));
        for entry in &summary.missing {
            s.push_str(&format!("\n  - {} ({})", entry.path, entry.fingerprint.short()));
        }
    }

    if !summary.extra.is_empty() {
        s.push_str(&format!("\n\nNot in layout, left in place ({}):", summary.extra.len()));
        for entry in &summary.extra {
            s.push_str(&format!("\n  - {}", entry.path));
        }
    }

    Ok(s)
}

/// Prints progress to stderr as work happens
///
/// Completed moves are always printed so an interrupted replay can be
/// followed by hand; per-file digests only arrive when verbose is on.
pub struct TerminalObserver;

impl MirrorObserver for TerminalObserver {
    fn on_event(&self, event: &MirrorEvent) {
        if let Some(line) = format_event(event) {
            eprintln!("{}", line);
        }
    }
}

pub fn format_event(event: &MirrorEvent) -> Option<String> {
    match event {
        MirrorEvent::FileFingerprinted { path, fingerprint } => {
            Some(format!("Processing {}\n  Digest is: {}", path, fingerprint))
        }
        MirrorEvent::Moved {
            from,
            to,
            staged,
            dry_run,
            ..
        } => {
            let verb = match (dry_run, staged) {
                (true, true) => "Would stage",
                (true, false) => "Would move",
                (false, true) => "Staged",
                (false, false) => "Moved",
            };
            Some(format!("{} {} -> {}", verb, from, to))
        }
        MirrorEvent::MissingOnTarget { .. } | MirrorEvent::ExtraOnTarget { .. } => None,
    }
}
