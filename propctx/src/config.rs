/// Configuration for [`crate::PropNameContextSelector`].
#[derive(Debug, Clone, Copy)]
pub struct ContextSelectorConfig {
    /// The 0-indexed positional parameter slot treated as a candidate dynamic-property-name key.
    distinguishing_index: usize,
}

impl ContextSelectorConfig {
    pub fn new(distinguishing_index: usize) -> Self {
        Self { distinguishing_index }
    }

    #[inline]
    pub fn distinguishing_index(&self) -> usize {
        self.distinguishing_index
    }
}
