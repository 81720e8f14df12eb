//! Intraprocedural null-dereference CFG pruning: a forward, worklist dataflow solver over a
//! four-point null-state lattice, plus an edge-pruning visitor that deletes CFG edges no concrete
//! execution can traverse.
//!
//! The analysis never mutates its input [`flowcheck_ir::ControlFlowGraph`]; [`pruner::PrunedCfg`]
//! is a filtering view over it.

mod config;
mod error;
mod lattice;
mod progress;
mod pruner;
mod solver;
mod state;
mod transfer;

use std::fmt;

use flowcheck_ir::{BlockId, ControlFlowGraph, MethodIr, MethodState};
use rustc_hash::FxHashSet;

pub use self::{
    config::SolverConfig,
    error::NullAnalysisError,
    lattice::NullState,
    progress::{NeverCancel, ProgressMonitor},
    pruner::PrunedCfg,
    state::{IgnoredExceptions, ParameterState},
};

/// Intraprocedural null-dereference analysis over a single method.
///
/// Borrows its `IR` and `ControlFlowGraph` for the analysis's whole lifetime: the pruned CFG
/// returned by [`NullPointerAnalysis::pruned_cfg`] is a view over the same borrowed graph, not an
/// owned copy.
pub struct NullPointerAnalysis<'g, IR, G> {
    ir: &'g IR,
    cfg: &'g G,
    params: ParameterState,
    ignored: IgnoredExceptions,
    config: SolverConfig,
    outcome: Option<Outcome<'g, G>>,
}

struct Outcome<'g, G> {
    in_states: cranelift_entity::SecondaryMap<BlockId, state::BlockState>,
    pruned: PrunedCfg<'g, G>,
    iterations: usize,
    blocks_visited: usize,
}

/// Observability counters for a completed analysis run, separate from the required
/// [`NullPointerAnalysis::number_of_deleted_edges`] accessor.
#[derive(Copy, Clone, Debug, Default)]
pub struct AnalysisStats {
    pub blocks_visited: usize,
    pub worklist_iterations: usize,
    pub normal_edges_deleted: usize,
    pub exceptional_edges_deleted: usize,
}

impl fmt::Display for AnalysisStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} blocks visited, {} iterations, {} normal / {} exceptional edges deleted",
            self.blocks_visited,
            self.worklist_iterations,
            self.normal_edges_deleted,
            self.exceptional_edges_deleted
        )
    }
}

impl<'g, IR, G> NullPointerAnalysis<'g, IR, G>
where
    IR: MethodIr,
    G: ControlFlowGraph,
{
    pub fn new(ir: &'g IR, cfg: &'g G) -> Self {
        Self {
            ir,
            cfg,
            params: ParameterState::new(),
            ignored: IgnoredExceptions::new(),
            config: SolverConfig::default(),
            outcome: None,
        }
    }

    pub fn with_parameters(mut self, params: ParameterState) -> Self {
        self.params = params;
        self
    }

    pub fn with_ignored_exceptions(mut self, ignored: IgnoredExceptions) -> Self {
        self.ignored = ignored;
        self
    }

    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Runs the solver and the edge-pruning visitor. If the IR is empty, short-circuits: the
    /// pruned CFG equals the input CFG and every block's state is freshly initial.
    pub fn run(
        &mut self,
        method_state: &dyn MethodState,
        progress: &dyn ProgressMonitor,
    ) -> Result<(), NullAnalysisError> {
        if self.ir.is_empty() {
            log::debug!(target: "flowcheck-npe", "empty IR, skipping solver");
            let mut in_states = cranelift_entity::SecondaryMap::new();
            let mut entry_state = state::BlockState::new();
            for i in 0..self.ir.num_parameters() {
                let v = self.ir.parameter_value(i);
                entry_state.join_into(v, self.params.get(v));
            }
            in_states[self.cfg.entry()] = entry_state;
            self.outcome = Some(Outcome {
                in_states,
                pruned: PrunedCfg::new(self.cfg, FxHashSet::default()),
                iterations: 0,
                blocks_visited: 0,
            });
            return Ok(());
        }

        let result = solver::solve(self.ir, self.cfg, &self.params, &self.config, progress)?;
        let deleted = pruner::prune(self.ir, self.cfg, &result.in_states, &self.ignored, method_state);

        log::debug!(
            target: "flowcheck-npe",
            "analysis complete: {} blocks visited, {} edges deleted",
            result.blocks_visited,
            deleted.len()
        );

        self.outcome = Some(Outcome {
            in_states: result.in_states,
            pruned: PrunedCfg::new(self.cfg, deleted),
            iterations: result.iterations,
            blocks_visited: result.blocks_visited,
        });
        Ok(())
    }

    pub fn pruned_cfg(&self) -> Result<&PrunedCfg<'g, G>, NullAnalysisError> {
        self.outcome.as_ref().map(|o| &o.pruned).ok_or(NullAnalysisError::NotRun)
    }

    pub fn number_of_deleted_edges(&self) -> Result<usize, NullAnalysisError> {
        self.outcome
            .as_ref()
            .map(|o| o.pruned.number_of_deleted_edges())
            .ok_or(NullAnalysisError::NotRun)
    }

    /// The IN state of `block`, computed by the most recent [`NullPointerAnalysis::run`].
    pub fn state(&self, block: BlockId) -> Result<NullStateView<'_>, NullAnalysisError> {
        let outcome = self.outcome.as_ref().ok_or(NullAnalysisError::NotRun)?;
        if !self.cfg.contains_block(block) {
            return Err(NullAnalysisError::UnknownBlock(block));
        }
        Ok(NullStateView {
            state: &outcome.in_states[block],
        })
    }

    pub fn stats(&self) -> Result<AnalysisStats, NullAnalysisError> {
        let outcome = self.outcome.as_ref().ok_or(NullAnalysisError::NotRun)?;
        let mut normal_edges_deleted = 0;
        let mut exceptional_edges_deleted = 0;
        for block in self.cfg.blocks() {
            for successor in self.cfg.normal_successors(block) {
                let edge = flowcheck_ir::CfgEdge::new(block, successor, flowcheck_ir::EdgeKind::Normal);
                if outcome.pruned.is_deleted(&edge) {
                    normal_edges_deleted += 1;
                }
            }
            for successor in self.cfg.exceptional_successors(block) {
                let edge =
                    flowcheck_ir::CfgEdge::new(block, successor, flowcheck_ir::EdgeKind::Exceptional);
                if outcome.pruned.is_deleted(&edge) {
                    exceptional_edges_deleted += 1;
                }
            }
        }
        Ok(AnalysisStats {
            blocks_visited: outcome.blocks_visited,
            worklist_iterations: outcome.iterations,
            normal_edges_deleted,
            exceptional_edges_deleted,
        })
    }
}

/// A read-only view of a single block's null-dereference state, keyed by SSA value number.
pub struct NullStateView<'a> {
    state: &'a state::BlockState,
}

impl<'a> NullStateView<'a> {
    pub fn get(&self, value: flowcheck_ir::ValueNumber) -> NullState {
        self.state.get(value)
    }
}
