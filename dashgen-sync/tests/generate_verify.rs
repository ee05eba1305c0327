use std::fs;
use std::path::Path;

use dashgen_core::{DirTree, GenConfig, Mode};
use dashgen_sync::{pipeline, GenOptions, MismatchKind, RunOutcome, SyncError, WriteResult};
use filetime::{set_file_mtime, FileTime};
use tempfile::TempDir;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn touch(root: &Path, rel: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    fs::write(path, "{}").expect("write dashboard");
}

/// A dashboards directory plus options writing next to it.
fn setup() -> (TempDir, DirTree, GenOptions) {
    let workspace = TempDir::new().expect("workspace");
    let root = workspace.path().join("dev-dashboards");
    touch(&root, "a.json");
    touch(&root, "b.json");
    touch(&root, "jsonnetfile.json");
    touch(&root, "panel-tests/graph.json");

    let config = GenConfig {
        root: root.clone(),
        output: workspace.path().join("gen.libsonnet"),
        ..GenConfig::default()
    };
    let tree = config.dir_tree();
    let options = GenOptions::from_config(&config);
    (workspace, tree, options)
}

#[test]
fn verify_after_generate_succeeds_without_writing() {
    init_logging();
    let (_ws, tree, options) = setup();

    pipeline::run(&tree, &options, Mode::Create).expect("generate");
    let old = FileTime::from_unix_time(1_600_000_000, 0);
    set_file_mtime(&options.output, old).expect("age output");

    let outcome = pipeline::run(&tree, &options, Mode::Verify).expect("verify");
    assert_eq!(outcome, RunOutcome::Verified { files: 1 });

    let mtime = FileTime::from_last_modification_time(&fs::metadata(&options.output).unwrap());
    assert_eq!(mtime, old, "verify must not touch the committed file");
}

#[test]
fn regenerate_with_unchanged_tree_preserves_mtime() {
    init_logging();
    let (_ws, tree, options) = setup();

    pipeline::run(&tree, &options, Mode::Create).expect("first");
    let old = FileTime::from_unix_time(1_600_000_000, 0);
    set_file_mtime(&options.output, old).expect("age output");

    let outcome = pipeline::run(&tree, &options, Mode::Create).expect("second");
    let RunOutcome::Written(results) = outcome else {
        panic!("expected write results");
    };
    assert!(matches!(results[0], WriteResult::Unchanged { .. }));
    let mtime = FileTime::from_last_modification_time(&fs::metadata(&options.output).unwrap());
    assert_eq!(mtime, old);
}

#[test]
fn one_byte_edit_is_reported_with_its_path() {
    init_logging();
    let (_ws, tree, options) = setup();
    pipeline::run(&tree, &options, Mode::Create).expect("generate");

    let mut bytes = fs::read(&options.output).expect("read");
    let pos = bytes.iter().position(|b| *b == b'a').expect("an 'a' byte");
    bytes[pos] = b'A';
    fs::write(&options.output, &bytes).expect("mutate");

    let err = pipeline::run(&tree, &options, Mode::Verify).expect_err("mismatch");
    let report = match err {
        SyncError::Mismatch(report) => report,
        other => panic!("expected mismatch, got {other:?}"),
    };
    assert_eq!(report.mismatches.len(), 1);
    assert_eq!(report.mismatches[0].path, options.output);
    assert!(matches!(report.mismatches[0].kind, MismatchKind::Changed { .. }));
    assert_eq!(fs::read(&options.output).unwrap(), bytes, "verify must not repair");
}

#[test]
fn new_dashboard_makes_committed_manifest_stale() {
    init_logging();
    let (ws, tree, options) = setup();
    pipeline::run(&tree, &options, Mode::Create).expect("generate");

    touch(&ws.path().join("dev-dashboards"), "zz-new.json");
    let err = pipeline::run(&tree, &options, Mode::Verify).expect_err("stale");
    let text = err.to_string();
    assert!(
        text.lines()
            .any(|l| l.starts_with('+') && l.contains(r#""zz-new": import "zz-new.json","#)),
        "diff should add the new dashboard:\n{text}"
    );
}

#[test]
fn generated_manifest_lists_tree_in_name_order() {
    init_logging();
    let (_ws, tree, options) = setup();
    pipeline::run(&tree, &options, Mode::Create).expect("generate");

    let text = fs::read_to_string(&options.output).expect("read");
    let imports: Vec<&str> = text.lines().filter(|l| l.contains("import")).map(str::trim).collect();
    assert_eq!(
        imports,
        vec![
            r#""a": import "a.json","#,
            r#""b": import "b.json","#,
            r#""graph": import "panel-tests/graph.json","#,
        ]
    );
}

#[test]
fn missing_tree_root_is_a_read_error_and_writes_nothing() {
    init_logging();
    let workspace = TempDir::new().expect("workspace");
    let config = GenConfig {
        root: workspace.path().join("absent"),
        output: workspace.path().join("gen.libsonnet"),
        ..GenConfig::default()
    };

    let err = pipeline::run(&config.dir_tree(), &GenOptions::from_config(&config), Mode::Create)
        .expect_err("read error");
    assert!(matches!(err, SyncError::Read(_)), "{err:?}");
    assert!(!config.output.exists());
}
