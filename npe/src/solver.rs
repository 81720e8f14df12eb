use std::collections::VecDeque;

use cranelift_entity::{EntityRef, SecondaryMap};
use flowcheck_ir::{CfgEdge, ControlFlowGraph, EdgeKind, Instruction, MethodIr, ValueNumber};
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::{SmallVec, smallvec};

use crate::{
    config::SolverConfig, error::NullAnalysisError, lattice::NullState, progress::ProgressMonitor,
    state::{BlockState, ParameterState}, transfer,
};

/// A refinement of a single SSA value, valid only along one specific outgoing edge (produced by a
/// [`Instruction::NullCheckBranch`] terminator, consumed by [`Instruction::Pi`] nodes at the head
/// of the successor blocks and by the predecessor-join step of [`compute_in_state`]).
pub(crate) type EdgeRefinements = SmallVec<[(ValueNumber, NullState); 2]>;

/// The fixpoint the solver converges to: a block-indexed IN state, a block-indexed OUT state, and
/// the per-edge refinements produced by conditional null-check branches.
pub(crate) struct SolveResult {
    pub in_states: SecondaryMap<flowcheck_ir::BlockId, BlockState>,
    pub out_states: SecondaryMap<flowcheck_ir::BlockId, BlockState>,
    pub edge_refinements: FxHashMap<CfgEdge, EdgeRefinements>,
    pub iterations: usize,
    pub blocks_visited: usize,
}

/// Runs the forward, meet-over-paths fixpoint described in
pub(crate) fn solve<IR, G>(
    ir: &IR,
    cfg: &G,
    params: &ParameterState,
    config: &SolverConfig,
    progress: &dyn ProgressMonitor,
) -> Result<SolveResult, NullAnalysisError>
where
    IR: MethodIr,
    G: ControlFlowGraph,
{
    let max = ir.max_value_number();
    let mut in_states: SecondaryMap<flowcheck_ir::BlockId, BlockState> = SecondaryMap::new();
    let mut out_states: SecondaryMap<flowcheck_ir::BlockId, BlockState> = SecondaryMap::new();
    let mut edge_refinements: FxHashMap<CfgEdge, EdgeRefinements> = FxHashMap::default();

    let entry = cfg.entry();
    let mut worklist: VecDeque<flowcheck_ir::BlockId> = VecDeque::new();
    let mut queued: FxHashSet<flowcheck_ir::BlockId> = FxHashSet::default();
    let mut visited: FxHashSet<flowcheck_ir::BlockId> = FxHashSet::default();
    worklist.push_back(entry);
    queued.insert(entry);

    let mut iterations = 0usize;
    log::debug!(target: "flowcheck-npe", "starting fixpoint solve, entry = {entry:?}");

    while let Some(block_id) = worklist.pop_front() {
        queued.remove(&block_id);
        if progress.is_cancelled() {
            log::debug!(target: "flowcheck-npe", "solve cancelled after {iterations} iterations");
            return Err(NullAnalysisError::Cancelled);
        }
        iterations += 1;
        if let Some(cap) = config.max_iterations() {
            debug_assert!(
                iterations <= cap,
                "solver exceeded configured iteration cap; lattice termination invariant violated"
            );
        }

        let first_visit = visited.insert(block_id);

        let new_in = compute_in_state(ir, cfg, block_id, &out_states, &edge_refinements, params, max);
        let in_changed = first_visit || !new_in.eq_up_to(&in_states[block_id], max);
        in_states[block_id] = new_in.clone();

        if !in_changed {
            continue;
        }

        log::trace!(target: "flowcheck-npe", "{block_id:?} IN changed, recomputing OUT");

        let (new_out, refinements) =
            compute_out_and_refinements(ir, block_id, &new_in, max, config);
        let out_changed = first_visit || !new_out.eq_up_to(&out_states[block_id], max);
        out_states[block_id] = new_out;

        for (edge, refinement) in refinements {
            edge_refinements.insert(edge, refinement);
        }

        if out_changed {
            for edge in cfg.out_edges(block_id) {
                if !queued.contains(&edge.to) {
                    worklist.push_back(edge.to);
                    queued.insert(edge.to);
                }
            }
        }
    }

    log::debug!(target: "flowcheck-npe", "fixpoint reached after {iterations} worklist iterations");

    Ok(SolveResult {
        in_states,
        out_states,
        edge_refinements,
        iterations,
        blocks_visited: visited.len(),
    })
}

/// The per-value contribution a constant (as reported by the host symbol table) makes to every
/// state in the method, regardless of block.
fn constant_baseline<IR: MethodIr>(ir: &IR, max: ValueNumber) -> BlockState {
    let mut state = BlockState::new();
    let symbols = ir.symbol_table();
    for i in 0..=max.index() {
        let v = ValueNumber::new(i);
        if symbols.is_null_constant(v) {
            state.set(v, NullState::AlwaysNull);
        } else if symbols.is_non_null_constant(v) {
            state.set(v, NullState::NeverNull);
        }
    }
    state
}

/// Applies any refinement recorded for `edge` to a clone of `state`.
fn apply_refinement(
    mut state: BlockState,
    edge: &CfgEdge,
    edge_refinements: &FxHashMap<CfgEdge, EdgeRefinements>,
) -> BlockState {
    if let Some(refinements) = edge_refinements.get(edge) {
        for &(value, refined) in refinements {
            state.set(value, refined);
        }
    }
    state
}

/// Computes block `block_id`'s IN state: the pointwise join of its predecessors' (refined)
/// OUT states, with φ- and π-nodes resolved precisely rather than by the naive pointwise join.
fn compute_in_state<IR, G>(
    ir: &IR,
    cfg: &G,
    block_id: flowcheck_ir::BlockId,
    out_states: &SecondaryMap<flowcheck_ir::BlockId, BlockState>,
    edge_refinements: &FxHashMap<CfgEdge, EdgeRefinements>,
    params: &ParameterState,
    max: ValueNumber,
) -> BlockState
where
    IR: MethodIr,
    G: ControlFlowGraph,
{
    let preds = cfg.predecessors(block_id);
    let mut merged = constant_baseline(ir, max);

    for edge in &preds {
        let effective = apply_refinement(out_states[edge.from].clone(), edge, edge_refinements);
        for i in 0..=max.index() {
            let v = ValueNumber::new(i);
            merged.join_into(v, effective.get(v));
        }
    }

    // The entry block retains at least its caller-supplied parameter state regardless of whether
    // it also has predecessor edges (e.g. a loop header with a back-edge to the entry block,
    // which the `ControlFlowGraph` contract does not forbid).
    if block_id == cfg.entry() {
        for i in 0..ir.num_parameters() {
            let v = ir.parameter_value(i);
            merged.join_into(v, params.get(v));
        }
    }

    // φ- and π-nodes read different source values per predecessor edge, which the uniform
    // pointwise join above cannot express; resolve them precisely, overwriting whatever the join
    // happened to leave at their defined value number (ordinarily ⊥, since a value a φ/π node
    // defines does not yet exist in any predecessor's state).
    let block = ir.block(block_id);
    for instr in &block.instructions {
        match instr {
            Instruction::Phi { def, incoming } => {
                let mut acc = NullState::bottom();
                for (pred_block, source) in incoming {
                    if let Some(edge) = preds.iter().find(|edge| edge.from == *pred_block) {
                        let effective =
                            apply_refinement(out_states[edge.from].clone(), edge, edge_refinements);
                        acc = acc.join(effective.get(*source));
                    }
                }
                merged.set(*def, acc);
            }
            Instruction::Pi { def, source, guard } => {
                let mut acc = NullState::bottom();
                for edge in &preds {
                    let effective =
                        apply_refinement(out_states[edge.from].clone(), edge, edge_refinements);
                    let contribution = if edge.from == guard.guarded_edge_from {
                        if guard.refines_to_null {
                            NullState::AlwaysNull
                        } else {
                            NullState::NeverNull
                        }
                    } else {
                        effective.get(*source)
                    };
                    acc = acc.join(contribution);
                }
                merged.set(*def, acc);
            }
            _ => {}
        }
    }

    merged
}

/// Runs the non-merge transfer functions across `block_id`'s instructions starting from `in_state`,
/// producing the block's OUT state and any edge refinements its terminator contributes.
fn compute_out_and_refinements<IR: MethodIr>(
    ir: &IR,
    block_id: flowcheck_ir::BlockId,
    in_state: &BlockState,
    _max: ValueNumber,
    config: &SolverConfig,
) -> (BlockState, SmallVec<[(CfgEdge, EdgeRefinements); 2]>) {
    let mut state = in_state.clone();
    let mut refinements = SmallVec::new();

    for instr in &ir.block(block_id).instructions {
        if let Instruction::Phi { .. } | Instruction::Pi { .. } = instr {
            // Already resolved while computing the IN state.
            continue;
        }
        transfer::apply(&mut state, instr);

        if let Instruction::NullCheckBranch {
            value,
            null_successor,
            non_null_successor,
        } = instr
        {
            if config.guard_refinement_enabled() {
                refinements.push((
                    CfgEdge::new(block_id, *null_successor, EdgeKind::Normal),
                    smallvec![(*value, NullState::AlwaysNull)],
                ));
                refinements.push((
                    CfgEdge::new(block_id, *non_null_successor, EdgeKind::Normal),
                    smallvec![(*value, NullState::NeverNull)],
                ));
            }
        }
    }

    (state, refinements)
}
