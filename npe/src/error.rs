use flowcheck_ir::BlockId;

/// Errors produced by [`crate::NullPointerAnalysis`].
#[derive(Debug, thiserror::Error)]
pub enum NullAnalysisError {
    /// The progress monitor signalled cancellation; the analysis did not reach a fixpoint and no
    /// pruned CFG is available.
    #[error("null-dereference analysis was cancelled")]
    Cancelled,

    /// An accessor (`pruned_cfg`, `state`, `number_of_deleted_edges`) was called before `run`.
    #[error("null-dereference analysis has not been run yet")]
    NotRun,

    /// A block id was passed that is not a member of the analysis's control-flow graph.
    #[error("block {0:?} is not a member of this control-flow graph")]
    UnknownBlock(BlockId),

    /// The edge-pruning visitor was dispatched on an instruction that is not a
    /// potentially-excepting instruction at all; this indicates an inconsistency between
    /// [`flowcheck_ir::Block::relevant_pei`] and the pruner's own dispatch and should never be
    /// observable through the crate's public API.
    #[error("pruning visitor reached a non-PEI instruction")]
    NotAPotentiallyExceptingInstruction,
}
