/// A cancellation signal consulted by the solver between worklist iterations.
///
/// The host analysis framework's real progress monitor is an external collaborator; this trait is
/// the narrow slice of it the solver needs.
pub trait ProgressMonitor {
    fn is_cancelled(&self) -> bool;
}

/// A [`ProgressMonitor`] that never cancels, for callers with no progress-monitoring
/// infrastructure of their own.
#[derive(Copy, Clone, Default, Debug)]
pub struct NeverCancel;

impl ProgressMonitor for NeverCancel {
    fn is_cancelled(&self) -> bool {
        false
    }
}
