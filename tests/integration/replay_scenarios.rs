//! Replay scenarios against real directory trees
//!
//! Each test records a source tree, replays it onto a differently arranged
//! copy, and checks the resulting tree file by file.

use super::test_utils::{read_tree, tree_of, write_tree};
use layout_mirror::config::{MirrorConfig, DEFAULT_STAGING_DIR};
use layout_mirror::progress::{CollectingObserver, MirrorEvent, NoopObserver};
use layout_mirror::{record, replay, MirrorError, MirrorOptions, ReplaySummary};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct Fixture {
    source: TempDir,
    target: TempDir,
    _layout_dir: TempDir,
    layout: PathBuf,
}

impl Fixture {
    fn new(source: &[(&str, &str)], target: &[(&str, &str)]) -> Self {
        let source_dir = TempDir::new().unwrap();
        let target_dir = TempDir::new().unwrap();
        let layout_dir = TempDir::new().unwrap();
        write_tree(source_dir.path(), source);
        write_tree(target_dir.path(), target);
        let layout = layout_dir.path().join("layout.json");
        record(
            source_dir.path(),
            &layout,
            &MirrorConfig::default(),
            MirrorOptions::default(),
            &NoopObserver,
        )
        .unwrap();
        Self {
            source: source_dir,
            target: target_dir,
            _layout_dir: layout_dir,
            layout,
        }
    }

    fn target(&self) -> &Path {
        self.target.path()
    }

    fn replay(&self) -> Result<ReplaySummary, MirrorError> {
        self.replay_with(&MirrorConfig::default(), MirrorOptions::default())
    }

    fn replay_with(
        &self,
        config: &MirrorConfig,
        options: MirrorOptions,
    ) -> Result<ReplaySummary, MirrorError> {
        replay(self.target(), &self.layout, config, options, &NoopObserver)
    }
}

#[test]
fn test_flat_target_is_nested_like_source() {
    let fixture = Fixture::new(
        &[("a/x.txt", "hello"), ("b/y.txt", "world")],
        &[("y.txt", "world"), ("x.txt", "hello")],
    );

    let summary = fixture.replay().unwrap();

    assert_eq!(summary.moves.len(), 2);
    assert_eq!(summary.staged, 0);
    assert!(summary.missing.is_empty());
    assert!(summary.extra.is_empty());
    assert_eq!(read_tree(fixture.target()), read_tree(fixture.source.path()));
}

#[test]
fn test_second_replay_moves_nothing() {
    let fixture = Fixture::new(
        &[("a/x.txt", "hello"), ("b/c/y.txt", "world"), ("z", "zeta")],
        &[("x.txt", "hello"), ("deep/er/y.txt", "world"), ("z", "zeta")],
    );

    let first = fixture.replay().unwrap();
    assert_eq!(first.moves.len(), 2);
    assert_eq!(first.in_place, 1);

    let second = fixture.replay().unwrap();
    assert!(second.moves.is_empty());
    assert_eq!(second.in_place, 3);
    assert_eq!(read_tree(fixture.target()), read_tree(fixture.source.path()));
}

#[test]
fn test_extra_and_missing_are_reported_separately() {
    let fixture = Fixture::new(
        &[("keep/a.txt", "shared"), ("gone.txt", "only in source")],
        &[("a.txt", "shared"), ("notes.txt", "only in target")],
    );
    let observer = CollectingObserver::new();

    let summary = replay(
        fixture.target(),
        &fixture.layout,
        &MirrorConfig::default(),
        MirrorOptions::default(),
        &observer,
    )
    .unwrap();

    assert_eq!(summary.missing.len(), 1);
    assert_eq!(summary.missing[0].path.to_string(), "gone.txt");
    assert_eq!(summary.extra.len(), 1);
    assert_eq!(summary.extra[0].path.to_string(), "notes.txt");
    assert_eq!(
        read_tree(fixture.target()),
        tree_of(&[("keep/a.txt", "shared"), ("notes.txt", "only in target")])
    );

    let events = observer.events();
    assert!(events
        .iter()
        .any(|e| matches!(e, MirrorEvent::MissingOnTarget { .. })));
    assert!(events
        .iter()
        .any(|e| matches!(e, MirrorEvent::ExtraOnTarget { .. })));
}

#[test]
fn test_swap_completes_without_data_loss() {
    let fixture = Fixture::new(
        &[("p1", "content B"), ("p2", "content A")],
        &[("p1", "content A"), ("p2", "content B")],
    );

    let summary = fixture.replay().unwrap();

    assert_eq!(summary.moves.len(), 2);
    assert_eq!(summary.staged, 1);
    assert_eq!(
        read_tree(fixture.target()),
        tree_of(&[("p1", "content B"), ("p2", "content A")])
    );
    // Staging directory is cleaned up
    assert_eq!(fs::read_dir(fixture.target()).unwrap().count(), 2);
}

#[test]
fn test_three_way_rotation() {
    let fixture = Fixture::new(
        &[("d/one", "3"), ("d/two", "1"), ("d/three", "2")],
        &[("d/one", "1"), ("d/two", "2"), ("d/three", "3")],
    );

    let summary = fixture.replay().unwrap();

    assert_eq!(summary.moves.len(), 3);
    assert_eq!(
        read_tree(fixture.target()),
        tree_of(&[("d/one", "3"), ("d/two", "1"), ("d/three", "2")])
    );
}

#[test]
fn test_file_replaced_by_directory_of_same_name() {
    // `data` is a file on the target but a directory in the source
    let fixture = Fixture::new(
        &[("data/inner", "file content"), ("moved", "dir content")],
        &[("data", "dir content"), ("elsewhere/inner", "file content")],
    );

    fixture.replay().unwrap();

    assert_eq!(read_tree(fixture.target()), read_tree(fixture.source.path()));
}

#[test]
fn test_dry_run_replay_changes_nothing() {
    let fixture = Fixture::new(
        &[("a/x.txt", "hello"), ("p1", "B"), ("p2", "A")],
        &[("x.txt", "hello"), ("p1", "A"), ("p2", "B")],
    );
    let before = read_tree(fixture.target());

    let summary = fixture
        .replay_with(
            &MirrorConfig::default(),
            MirrorOptions {
                dry_run: true,
                verbose: false,
            },
        )
        .unwrap();

    assert!(summary.dry_run);
    assert_eq!(summary.moves.len(), 3);
    assert_eq!(read_tree(fixture.target()), before);
    assert!(!fixture.target().join("a").exists());
}

#[test]
fn test_unmatched_file_at_destination_is_not_overwritten() {
    let fixture = Fixture::new(
        &[("slot.txt", "recorded")],
        &[("other.txt", "recorded"), ("slot.txt", "unrelated")],
    );

    let err = fixture.replay().unwrap_err();

    assert!(matches!(err, MirrorError::MoveConflict { .. }));
    assert_eq!(
        read_tree(fixture.target()),
        tree_of(&[("other.txt", "recorded"), ("slot.txt", "unrelated")])
    );
}

#[test]
fn test_duplicate_content_on_target_aborts_before_moving() {
    let fixture = Fixture::new(
        &[("a/x", "same")],
        &[("x1", "same"), ("x2", "same")],
    );

    let err = fixture.replay().unwrap_err();

    assert!(matches!(err, MirrorError::Scan(_)));
    assert_eq!(
        read_tree(fixture.target()),
        tree_of(&[("x1", "same"), ("x2", "same")])
    );
}

#[test]
fn test_prune_empty_dirs_removes_vacated_directories() {
    let fixture = Fixture::new(
        &[("flat.txt", "content")],
        &[("deep/nested/flat.txt", "content")],
    );
    let mut config = MirrorConfig::default();
    config.replay.prune_empty_dirs = true;

    fixture
        .replay_with(&config, MirrorOptions::default())
        .unwrap();

    assert!(!fixture.target().join("deep").exists());
    assert_eq!(read_tree(fixture.target()), tree_of(&[("flat.txt", "content")]));
}

#[test]
fn test_vacated_directories_are_kept_by_default() {
    let fixture = Fixture::new(
        &[("flat.txt", "content")],
        &[("deep/flat.txt", "content")],
    );

    fixture.replay().unwrap();

    assert!(fixture.target().join("deep").is_dir());
}

#[test]
fn test_missing_layout_file_is_a_format_error() {
    let target = TempDir::new().unwrap();
    let err = replay(
        target.path(),
        &target.path().join("absent.json"),
        &MirrorConfig::default(),
        MirrorOptions::default(),
        &NoopObserver,
    )
    .unwrap_err();
    assert!(matches!(err, MirrorError::Format { .. }));
}

#[test]
fn test_layout_file_inside_target_is_not_scanned() {
    let fixture = Fixture::new(
        &[("a/x.txt", "hello"), ("b/y.txt", "world")],
        &[("x.txt", "hello"), ("y.txt", "world")],
    );
    let inside = fixture.target().join("layout.json");
    fs::copy(&fixture.layout, &inside).unwrap();

    let summary = replay(
        fixture.target(),
        &inside,
        &MirrorConfig::default(),
        MirrorOptions::default(),
        &NoopObserver,
    )
    .unwrap();

    assert!(summary.extra.is_empty());
    assert_eq!(summary.moves.len(), 2);
    assert!(inside.exists());
    let mut expected = read_tree(fixture.source.path());
    expected.insert("layout.json".to_string(), fs::read_to_string(&inside).unwrap());
    assert_eq!(read_tree(fixture.target()), expected);
}

#[test]
fn test_file_at_staging_path_refuses_swap() {
    let fixture = Fixture::new(
        &[("p1", "content B"), ("p2", "content A")],
        &[
            ("p1", "content A"),
            ("p2", "content B"),
            (DEFAULT_STAGING_DIR, "stray"),
        ],
    );

    let err = fixture.replay().unwrap_err();

    assert!(matches!(err, MirrorError::MoveConflict { .. }));
    assert_eq!(
        read_tree(fixture.target()),
        tree_of(&[
            ("p1", "content A"),
            ("p2", "content B"),
            (DEFAULT_STAGING_DIR, "stray"),
        ])
    );
}

#[test]
fn test_directory_of_empty_directories_gives_way() {
    let fixture = Fixture::new(&[("slot", "content")], &[("file", "content")]);
    fs::create_dir_all(fixture.target().join("slot").join("empty")).unwrap();

    fixture.replay().unwrap();

    assert_eq!(read_tree(fixture.target()), tree_of(&[("slot", "content")]));
}

#[cfg(unix)]
#[test]
fn test_symlinked_directory_on_destination_path_is_refused() {
    let fixture = Fixture::new(&[("a/x", "1"), ("b/y", "2")], &[("a/x", "1"), ("y", "2")]);
    std::os::unix::fs::symlink(fixture.target().join("a"), fixture.target().join("b")).unwrap();

    let err = fixture.replay().unwrap_err();

    assert!(matches!(err, MirrorError::MoveConflict { .. }));
    assert!(!fixture.target().join("a").join("y").exists());
    assert!(fixture.target().join("y").exists());

    // Once the link is gone the layout replays and stays put
    fs::remove_file(fixture.target().join("b")).unwrap();
    assert_eq!(fixture.replay().unwrap().moves.len(), 1);
    assert!(fixture.replay().unwrap().moves.is_empty());
    assert_eq!(read_tree(fixture.target()), read_tree(fixture.source.path()));
}
