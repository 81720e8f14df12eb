use cranelift_entity::SecondaryMap;
use flowcheck_ir::{
    BlockId, CfgEdge, ControlFlowGraph, EdgeKind, ExceptionSet, Instruction, MethodIr, MethodState,
    ValueNumber,
};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::{lattice::NullState, state::BlockState, state::IgnoredExceptions};

/// Runs the edge-pruning visitor over every block, returning the set of edges to delete.
pub(crate) fn prune<IR, G>(
    ir: &IR,
    cfg: &G,
    in_states: &SecondaryMap<BlockId, BlockState>,
    ignored: &IgnoredExceptions,
    method_state: &dyn MethodState,
) -> FxHashSet<CfgEdge>
where
    IR: MethodIr,
    G: ControlFlowGraph,
{
    let mut deleted = FxHashSet::default();
    for block_id in cfg.blocks() {
        let block = ir.block(block_id);
        let Some(pei) = block.relevant_pei() else {
            continue;
        };
        visit(cfg, block_id, pei, &in_states[block_id], ignored, method_state, &mut deleted);
    }
    deleted
}

fn visit<G: ControlFlowGraph>(
    cfg: &G,
    block_id: BlockId,
    pei: &Instruction,
    in_state: &BlockState,
    ignored: &IgnoredExceptions,
    method_state: &dyn MethodState,
    deleted: &mut FxHashSet<CfgEdge>,
) {
    match pei {
        Instruction::New { declared_exceptions, .. }
        | Instruction::InvokeStatic { declared_exceptions, .. } => {
            // No receiver to test for nullness: the only question is whether any declared
            // exception survives subtracting the ignored set.
            if declared_exceptions.subtracting(ignored.as_set()).is_empty() {
                delete_exceptional(cfg, block_id, pei, deleted);
            }
        }
        Instruction::GetField { object, declared_exceptions, .. }
        | Instruction::PutField { object, declared_exceptions, .. }
        | Instruction::MonitorEnter { object, declared_exceptions }
        | Instruction::MonitorExit { object, declared_exceptions } => {
            visit_reference_pei(cfg, block_id, pei, *object, declared_exceptions, ignored, true, in_state, deleted);
        }
        Instruction::ArrayLength { array, declared_exceptions, .. }
        | Instruction::ArrayLoad { array, declared_exceptions, .. }
        | Instruction::ArrayStore { array, declared_exceptions, .. } => {
            visit_reference_pei(cfg, block_id, pei, *array, declared_exceptions, ignored, true, in_state, deleted);
        }
        Instruction::Throw { exception, declared_exceptions } => {
            visit_reference_pei(cfg, block_id, pei, *exception, declared_exceptions, ignored, true, in_state, deleted);
        }
        Instruction::InvokeInstance { receiver, declared_exceptions, call_site, .. } => {
            // The invoke subtlety: a non-null receiver never rules out the callee itself
            // dereferencing null, so pruning requires a negative answer from the method-summary
            // oracle, not just the remaining declared exception set.
            let callee_may_throw = method_state.throws_exception(*call_site);
            visit_reference_pei(
                cfg,
                block_id,
                pei,
                *receiver,
                declared_exceptions,
                ignored,
                !callee_may_throw,
                in_state,
                deleted,
            );
        }
        other => {
            debug_assert!(
                false,
                "relevant_pei returned a non-PEI instruction: {other:?}"
            );
        }
    }
}

/// Shared logic for every PEI with a single reference operand whose nullness can license pruning:
/// instance field/array access, monitor enter/exit, throw, and instance invoke.
///
/// `oracle_permits` is `true` unless this is an invoke whose callee the method-summary oracle
/// reports may itself throw, in which case pruning never proceeds even if the receiver's state
/// would otherwise justify it.
fn visit_reference_pei<G: ControlFlowGraph>(
    cfg: &G,
    block_id: BlockId,
    pei: &Instruction,
    reference: ValueNumber,
    declared_exceptions: &ExceptionSet,
    ignored: &IgnoredExceptions,
    oracle_permits: bool,
    in_state: &BlockState,
    deleted: &mut FxHashSet<CfgEdge>,
) {
    if !oracle_permits {
        return;
    }
    let remaining = declared_exceptions.subtracting(ignored.as_set());
    if !remaining.is_exactly_null_pointer_exception() {
        // May throw some non-NPE exception; conservatively delete nothing.
        return;
    }
    match in_state.get(reference) {
        NullState::NeverNull => delete_exceptional(cfg, block_id, pei, deleted),
        NullState::AlwaysNull => delete_normal(cfg, block_id, pei, deleted),
        NullState::Unknown | NullState::MaybeNull => {}
    }
}

fn delete_exceptional<G: ControlFlowGraph>(
    cfg: &G,
    block_id: BlockId,
    justifying: &Instruction,
    deleted: &mut FxHashSet<CfgEdge>,
) {
    for successor in cfg.exceptional_successors(block_id) {
        let edge = CfgEdge::new(block_id, successor, EdgeKind::Exceptional);
        log::debug!(
            target: "flowcheck-npe",
            "deleting {block_id:?} -> {successor:?} (exceptional), justified by {justifying:?}"
        );
        deleted.insert(edge);
    }
}

fn delete_normal<G: ControlFlowGraph>(
    cfg: &G,
    block_id: BlockId,
    justifying: &Instruction,
    deleted: &mut FxHashSet<CfgEdge>,
) {
    for successor in cfg.normal_successors(block_id) {
        let edge = CfgEdge::new(block_id, successor, EdgeKind::Normal);
        log::debug!(
            target: "flowcheck-npe",
            "deleting {block_id:?} -> {successor:?} (normal), justified by {justifying:?}"
        );
        deleted.insert(edge);
    }
}

/// A view over a [`ControlFlowGraph`] with a fixed set of edges removed. The underlying graph is
/// never mutated; this type is the filter layered over it.
pub struct PrunedCfg<'g, G> {
    inner: &'g G,
    deleted: FxHashSet<CfgEdge>,
}

impl<'g, G: ControlFlowGraph> PrunedCfg<'g, G> {
    pub(crate) fn new(inner: &'g G, deleted: FxHashSet<CfgEdge>) -> Self {
        Self { inner, deleted }
    }

    pub fn number_of_deleted_edges(&self) -> usize {
        self.deleted.len()
    }

    pub fn is_deleted(&self, edge: &CfgEdge) -> bool {
        self.deleted.contains(edge)
    }
}

impl<'g, G: ControlFlowGraph> ControlFlowGraph for PrunedCfg<'g, G> {
    fn blocks(&self) -> SmallVec<[BlockId; 16]> {
        self.inner.blocks()
    }

    fn entry(&self) -> BlockId {
        self.inner.entry()
    }

    fn contains_block(&self, block: BlockId) -> bool {
        self.inner.contains_block(block)
    }

    fn normal_successors(&self, block: BlockId) -> SmallVec<[BlockId; 4]> {
        self.inner
            .normal_successors(block)
            .into_iter()
            .filter(|&to| !self.deleted.contains(&CfgEdge::new(block, to, EdgeKind::Normal)))
            .collect()
    }

    fn exceptional_successors(&self, block: BlockId) -> SmallVec<[BlockId; 4]> {
        self.inner
            .exceptional_successors(block)
            .into_iter()
            .filter(|&to| !self.deleted.contains(&CfgEdge::new(block, to, EdgeKind::Exceptional)))
            .collect()
    }
}
