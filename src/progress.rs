// src/progress.rs
use crate::format::FormattedRun;

/// Per-run progress reporting for a notification pass.
/// The CLI prints it; tests record it.
pub trait Progress {
    /// Called once new runs are known, before the first one is posted.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// A run was posted (or would have been, in dry-run mode).
    fn item_done(&mut self, _run: &FormattedRun) {}

    /// A run could not be formatted or posted and was skipped.
    fn item_failed(&mut self, _run_id: &str, _error: &str) {}

    /// Called at the end of a pass that did not abort.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}
