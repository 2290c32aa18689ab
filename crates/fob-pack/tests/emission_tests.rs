//! Tests for concurrent emission.
//!
//! These tests verify that:
//! 1. Output order is deterministic regardless of completion order
//! 2. The worker bound is respected
//! 3. Timeouts, failures, panics and fail-fast cancellation are reported per target

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use fob_pack::{
    BuildError, CompileError, EmitErrorKind, ErrorKind, Format, PackOptions, TargetLabel, build,
};
use helpers::{StubCompiler, library_project, list_files};

fn all_formats(root: &std::path::Path) -> PackOptions {
    PackOptions::new("src/index.js")
        .root(root)
        .name("MyLib")
        .formats([Format::Global, Format::CommonJs, Format::Module])
}

fn failures(err: &BuildError) -> Vec<(TargetLabel, bool)> {
    match err {
        BuildError::Emission { failures } => failures
            .iter()
            .map(|f| (f.target.clone(), f.is_cancelled()))
            .collect(),
        other => panic!("expected emission failure, got {other:?}"),
    }
}

#[tokio::test]
async fn completion_order_does_not_change_manifest_order() {
    let project = library_project();
    // Module finishes last, global first
    let stub = StubCompiler::new()
        .delay(Format::Module, Duration::from_millis(120))
        .delay(Format::CommonJs, Duration::from_millis(60));

    let report = build(all_formats(project.path()), Arc::new(stub))
        .await
        .unwrap();

    let formats: Vec<_> = report.manifest.artifacts.iter().map(|a| a.format).collect();
    assert_eq!(formats, [Format::Module, Format::CommonJs, Format::Global]);
}

#[tokio::test]
async fn worker_bound_is_respected() {
    let project = library_project();
    let stub = Arc::new(StubCompiler::new().delay_all(Duration::from_millis(40)));

    let options = PackOptions::new_named([("index", "src/index.js"), ("utils", "src/utils.js")])
        .root(project.path())
        .name("MyLib")
        .formats(Format::ALL)
        .max_parallel(2);
    let report = build(options, stub.clone()).await.unwrap();

    assert_eq!(report.artifacts.len(), 6);
    assert_eq!(stub.calls(), 6);
    assert!(stub.max_in_flight() <= 2, "saw {}", stub.max_in_flight());
}

#[tokio::test]
async fn unbounded_worker_count_is_accepted() {
    let project = library_project();
    let stub = Arc::new(StubCompiler::new());

    let report = build(all_formats(project.path()).max_parallel(usize::MAX), stub.clone())
        .await
        .unwrap();

    assert_eq!(report.artifacts.len(), 3);
    assert_eq!(stub.calls(), 3);
}

#[tokio::test]
async fn single_worker_runs_sequentially() {
    let project = library_project();
    let stub = Arc::new(StubCompiler::new().delay_all(Duration::from_millis(10)));

    build(all_formats(project.path()).max_parallel(1), stub.clone())
        .await
        .unwrap();

    assert_eq!(stub.max_in_flight(), 1);
}

#[tokio::test]
async fn hung_compiler_times_out() {
    let project = library_project();
    let stub = StubCompiler::new().hang_on(Format::Global);

    let err = build(
        all_formats(project.path()).timeout(Duration::from_millis(200)),
        Arc::new(stub),
    )
    .await
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Compile);
    let primary = err.primary_failure().unwrap();
    assert_eq!(primary.target, TargetLabel::new("mylib", Format::Global));
    assert!(matches!(
        primary.kind,
        EmitErrorKind::Compile(CompileError::Timeout { after }) if after == Duration::from_millis(200)
    ));

    // Siblings still completed, but no manifest was written
    let files = list_files(&project.path().join("dist"));
    assert_eq!(files, ["mylib.cjs.js", "mylib.es.js"]);
}

#[tokio::test]
async fn one_failure_lets_siblings_finish() {
    let project = library_project();
    let stub = Arc::new(StubCompiler::new().fail_on(Format::CommonJs));

    let err = build(all_formats(project.path()), stub.clone())
        .await
        .unwrap_err();

    assert_eq!(
        failures(&err),
        [(TargetLabel::new("mylib", Format::CommonJs), false)]
    );
    assert!(err.to_string().starts_with("mylib:commonjs"));
    assert_eq!(stub.calls(), 3);
    assert!(!project.path().join("dist/manifest.json").exists());
}

#[tokio::test]
async fn fail_fast_cancels_queued_targets() {
    let project = library_project();
    let stub = Arc::new(StubCompiler::new().fail_all());

    let err = build(
        all_formats(project.path()).max_parallel(1).fail_fast(true),
        stub.clone(),
    )
    .await
    .unwrap_err();

    let failures = failures(&err);
    assert_eq!(stub.calls(), 1);
    assert_eq!(failures.len(), 3);
    assert!(!failures[0].1, "real failure is listed first");
    assert!(failures[1].1 && failures[2].1, "remaining targets are cancelled");
    assert!(matches!(
        err.primary_failure().unwrap().kind,
        EmitErrorKind::Compile(CompileError::Failed { .. })
    ));
}

#[tokio::test]
async fn without_fail_fast_every_target_runs() {
    let project = library_project();
    let stub = Arc::new(StubCompiler::new().fail_all());

    let err = build(all_formats(project.path()).max_parallel(1), stub.clone())
        .await
        .unwrap_err();

    assert_eq!(stub.calls(), 3);
    let failures = failures(&err);
    let labels: Vec<_> = failures.iter().map(|(l, _)| l.to_string()).collect();
    assert_eq!(labels, ["mylib:module", "mylib:commonjs", "mylib:global"]);
    assert!(failures.iter().all(|(_, cancelled)| !cancelled));
}

#[tokio::test]
async fn panicking_compiler_is_reported_not_swallowed() {
    let project = library_project();
    let stub = StubCompiler::new().panic_on(Format::Module);

    let err = build(all_formats(project.path()), Arc::new(stub))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InternalConsistency);
    let primary = err.primary_failure().unwrap();
    assert_eq!(primary.target, TargetLabel::new("mylib", Format::Module));
    assert!(matches!(primary.kind, EmitErrorKind::Internal(_)));
}

#[tokio::test]
async fn write_failure_is_io_error() {
    let project = library_project();
    // A directory in the way of an output file
    std::fs::create_dir_all(project.path().join("dist/mylib.es.js")).unwrap();

    let err = build(all_formats(project.path()), Arc::new(StubCompiler::new()))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Io);
    let primary = err.primary_failure().unwrap();
    assert_eq!(primary.target, TargetLabel::new("mylib", Format::Module));
    assert!(matches!(primary.kind, EmitErrorKind::Io { .. }));
}
