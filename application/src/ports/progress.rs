//! Progress notification port
//!
//! Reports long-running collaborator calls (analysis, proposal generation,
//! field extraction) to the presentation layer.

/// Callback for progress updates around collaborator calls
pub trait ProgressNotifier: Send + Sync {
    /// Called before a collaborator request is sent
    fn on_task_start(&self, label: &str);

    /// Called when the request finished; `fallback` is true when its typed
    /// fallback was used instead of the response
    fn on_task_complete(&self, label: &str, fallback: bool);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_task_start(&self, _label: &str) {}
    fn on_task_complete(&self, _label: &str, _fallback: bool) {}
}
