/// Harness processing stage, used for progress reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HarnessStage {
    Loading,
    Sweeping,
    Caching,
    Rendering,
    Cleanup,
}

impl std::fmt::Display for HarnessStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Loading => write!(f, "Loading source video"),
            Self::Sweeping => write!(f, "Running magnification sweep"),
            Self::Caching => write!(f, "Caching frames"),
            Self::Rendering => write!(f, "Rendering grid animation"),
            Self::Cleanup => write!(f, "Cleaning up caches"),
        }
    }
}

/// Progress reporting for the harness.
///
/// Implementors can use this to drive progress bars or any other UI
/// feedback. All methods have default no-op implementations.
pub trait ProgressReporter {
    /// A new harness stage has started. `total_items` is the number of
    /// work items in this stage (e.g., sweep point count), if known.
    fn begin_stage(&self, _stage: HarnessStage, _total_items: Option<usize>) {}

    /// One work item within the current stage has completed.
    fn advance(&self, _items_done: usize) {}

    /// The current stage is finished.
    fn finish_stage(&self) {}
}

/// No-op progress reporter, used when `run_harness` delegates.
pub(super) struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}
