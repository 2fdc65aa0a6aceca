mod common;
use crate::common::{
    init_tracing, real_fs, wait_until, with_timeout, ConfigFileBuilder, SourceTree, TestResult,
};

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;

use stylepipe::errors::StylepipeError;
use stylepipe::tasks::{build, run_task, sass};
use stylepipe::types::TaskName;

#[tokio::test]
async fn sass_task_writes_the_bundle() -> TestResult {
    init_tracing();
    let tree = SourceTree::new();
    tree.write_source("a.scss", ".x { color: red; }\n");

    let report = sass(Arc::new(tree.config()), real_fs()).await?;
    assert_eq!(report.compiled, 1);
    assert!(tree.read_output("bundle.min.css").contains(".x{color:red}"));
    Ok(())
}

#[tokio::test]
async fn build_matches_sass_output() -> TestResult {
    init_tracing();
    let tree = SourceTree::new();
    tree.write_source("a.scss", ".x { .y { color: red; } }\n");
    let cfg = Arc::new(tree.config());

    sass(Arc::clone(&cfg), real_fs()).await?;
    let from_sass = tree.read_output("bundle.min.css");
    build(cfg, real_fs()).await?;
    assert_eq!(tree.read_output("bundle.min.css"), from_sass);
    Ok(())
}

#[tokio::test]
async fn single_shot_tasks_fail_fast_on_compile_errors() -> TestResult {
    init_tracing();
    let tree = SourceTree::new();
    tree.write_source("a.scss", ".x { color: \n");
    let cfg = Arc::new(tree.config());

    for task in [TaskName::Sass, TaskName::Build] {
        let err = run_task(task, Arc::clone(&cfg), real_fs()).await.unwrap_err();
        assert!(matches!(err, StylepipeError::CompileError { .. }), "{task}: {err:?}");
    }
    assert!(!tree.output_exists("bundle.min.css"));
    Ok(())
}

#[tokio::test]
async fn missing_source_dir_fails_the_build_task() -> TestResult {
    init_tracing();
    let tree = SourceTree::new();
    let cfg = Arc::new(
        ConfigFileBuilder::new()
            .source_dir("does-not-exist")
            .build_at(tree.root()),
    );

    let err = run_task(TaskName::Build, cfg, real_fs()).await.unwrap_err();
    assert!(matches!(err, StylepipeError::IoError(_)));
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn default_keeps_watching_after_a_failed_initial_build() -> TestResult {
    init_tracing();
    let tree = SourceTree::new();
    tree.write_source("a.scss", ".x { color: \n");
    let cfg = Arc::new(tree.config());

    let task = tokio::spawn(run_task(TaskName::Default, cfg, real_fs()));

    // Initial build fails, then the watcher comes up instead of the task
    // returning the compile error.
    sleep(Duration::from_millis(500)).await;
    assert!(!task.is_finished(), "default task exited after a failed build");
    assert!(!tree.output_exists("bundle.min.css"));

    tree.write_source("a.scss", ".x { color: red; }\n");
    with_timeout(wait_until(|| {
        tree.output_exists("bundle.min.css")
            && tree.read_output("bundle.min.css").contains(".x{color:red}")
    }))
    .await;
    assert!(!task.is_finished());

    task.abort();
    assert!(task.await.unwrap_err().is_cancelled());
    Ok(())
}
