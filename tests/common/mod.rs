#![allow(dead_code)]

use std::sync::Arc;

use stylepipe::fs::{FileSystem, RealFileSystem};

pub use stylepipe_test_utils::builders::{ConfigFileBuilder, SourceTree};
pub use stylepipe_test_utils::log_capture::capture_logs;
pub use stylepipe_test_utils::{init_tracing, wait_until, with_timeout};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub fn real_fs() -> Arc<dyn FileSystem> {
    Arc::new(RealFileSystem)
}
