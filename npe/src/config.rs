/// Configuration for [`crate::NullPointerAnalysis`].
///
/// A small, explicit struct rather than a grab-bag of booleans threaded through every call.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Whether π-node / branch-guard refinement is applied. Disabling this only loses precision
    /// (fewer edges get pruned); it is never unsound to disable, which makes it useful for
    /// differential testing against a guard-insensitive baseline.
    guard_refinement: bool,
    /// An optional cap on worklist iterations, used only as a debug assertion. The lattice's
    /// height-3 bound together with the method's finite value-number and block counts already
    /// guarantees termination; this cap exists purely to fail loudly in tests if that invariant
    /// is ever violated by a future change to the transfer functions.
    max_iterations: Option<usize>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            guard_refinement: true,
            max_iterations: None,
        }
    }
}

impl SolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn guard_refinement_enabled(&self) -> bool {
        self.guard_refinement
    }

    pub fn set_guard_refinement(&mut self, enabled: bool) -> &mut Self {
        self.guard_refinement = enabled;
        self
    }

    #[inline]
    pub fn max_iterations(&self) -> Option<usize> {
        self.max_iterations
    }

    pub fn set_max_iterations(&mut self, cap: Option<usize>) -> &mut Self {
        self.max_iterations = cap;
        self
    }
}
