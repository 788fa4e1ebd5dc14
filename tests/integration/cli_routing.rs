//! CLI routing: parsed commands through to summaries

use super::test_utils::{read_tree, tree_of, with_env_vars, write_tree};
use clap::Parser;
use layout_mirror::cli::{map_error, Cli, RunContext};
use layout_mirror::config::MirrorConfig;
use layout_mirror::progress::NoopObserver;
use std::fs;
use tempfile::TempDir;

fn run(args: &[&str]) -> Result<String, String> {
    let cli = Cli::try_parse_from(args).unwrap();
    let context = RunContext::new(MirrorConfig::default(), &cli);
    context
        .execute_with_observer(&cli.command, &NoopObserver)
        .map_err(|e| map_error(&e))
}

#[test]
fn test_record_and_replay_through_cli() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    let layout_dir = TempDir::new().unwrap();
    write_tree(source.path(), &[("a/x.txt", "hello"), ("b/y.txt", "world")]);
    write_tree(target.path(), &[("x.txt", "hello"), ("y.txt", "world")]);
    let layout = layout_dir.path().join("layout.json");

    let output = run(&[
        "layout-mirror",
        "record",
        source.path().to_str().unwrap(),
        layout.to_str().unwrap(),
    ])
    .unwrap();
    assert!(output.contains("Record complete"));
    assert!(output.contains("Files: 2"));

    let output = run(&[
        "layout-mirror",
        "replay",
        target.path().to_str().unwrap(),
        layout.to_str().unwrap(),
    ])
    .unwrap();
    assert!(output.contains("Replay complete"));
    assert!(output.contains("Moved: 2"));
    assert_eq!(
        read_tree(target.path()),
        tree_of(&[("a/x.txt", "hello"), ("b/y.txt", "world")])
    );
}

#[test]
fn test_json_summary_is_machine_readable() {
    let source = TempDir::new().unwrap();
    let layout_dir = TempDir::new().unwrap();
    write_tree(source.path(), &[("one", "1"), ("two", "2")]);
    let layout = layout_dir.path().join("layout.json");

    let output = run(&[
        "layout-mirror",
        "--format",
        "json",
        "record",
        source.path().to_str().unwrap(),
        layout.to_str().unwrap(),
    ])
    .unwrap();

    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["files"], 2);
    assert_eq!(value["dry_run"], false);
    assert!(value["elapsed_ms"].is_u64());
}

#[test]
fn test_dry_run_flag_after_subcommand() {
    let source = TempDir::new().unwrap();
    let layout_dir = TempDir::new().unwrap();
    write_tree(source.path(), &[("one", "1")]);
    let layout = layout_dir.path().join("layout.json");

    let output = run(&[
        "layout-mirror",
        "record",
        "-n",
        source.path().to_str().unwrap(),
        layout.to_str().unwrap(),
    ])
    .unwrap();
    assert!(output.contains("dry run"));
    assert!(!layout.exists());
}

#[test]
fn test_collision_error_message() {
    let source = TempDir::new().unwrap();
    let layout_dir = TempDir::new().unwrap();
    write_tree(source.path(), &[("one", "same"), ("two", "same")]);
    let layout = layout_dir.path().join("layout.json");

    let message = run(&[
        "layout-mirror",
        "record",
        source.path().to_str().unwrap(),
        layout.to_str().unwrap(),
    ])
    .unwrap_err();
    assert!(message.starts_with("Error: "));
    assert!(message.contains("one"));
    assert!(message.contains("two"));
    assert!(!layout.exists());
}

#[test]
fn test_load_config_rejects_invalid_staging_dir() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("mirror.toml");
    fs::write(&config_file, "[replay]\nstaging_dir = \"a/b\"\n").unwrap();

    let err = with_env_vars(&[], || RunContext::load_config(Some(&config_file))).unwrap_err();
    assert!(map_error(&err).contains("staging_dir"));
}
