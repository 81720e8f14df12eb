use smallvec::SmallVec;

use crate::value::BlockId;

/// Whether a control-flow edge represents normal fall-through/branching, or an abnormal
/// (exceptional) transfer out of a potentially-excepting instruction.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum EdgeKind {
    Normal,
    Exceptional,
}

/// A single directed edge in a control-flow graph.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct CfgEdge {
    pub from: BlockId,
    pub to: BlockId,
    pub kind: EdgeKind,
}

impl CfgEdge {
    pub fn new(from: BlockId, to: BlockId, kind: EdgeKind) -> Self {
        Self { from, to, kind }
    }
}

/// The control-flow graph of a single method, as supplied by the host analysis framework.
///
/// This crate never mutates a `ControlFlowGraph`; the null-dereference pruner instead computes a
/// "negative graph" of edges to delete and layers it over the original graph (see
/// `flowcheck_npe::pruner::PrunedCfg`).
pub trait ControlFlowGraph {
    /// All blocks in the graph, including any that are unreachable from the entry.
    fn blocks(&self) -> SmallVec<[BlockId; 16]>;

    /// The graph's single entry block.
    fn entry(&self) -> BlockId;

    /// Whether `block` is a member of this graph.
    fn contains_block(&self, block: BlockId) -> bool;

    /// The normal-control-flow successors of `block`.
    fn normal_successors(&self, block: BlockId) -> SmallVec<[BlockId; 4]>;

    /// The exceptional successors of `block`, i.e. the handlers reachable if `block`'s relevant
    /// PEI (see [`crate::block::Block::relevant_pei`]) raises an exception.
    fn exceptional_successors(&self, block: BlockId) -> SmallVec<[BlockId; 4]>;

    /// The incoming edges of `block`, of either kind. The dataflow solver needs both: normal
    /// predecessors contribute via fall-through/branching, and exceptional predecessors (blocks
    /// whose relevant PEI may transfer control to a handler) contribute via the handler edge. A
    /// default implementation is provided in terms of [`ControlFlowGraph::blocks`] and
    /// [`ControlFlowGraph::out_edges`] for implementations that do not maintain a reverse
    /// adjacency index.
    fn predecessors(&self, block: BlockId) -> SmallVec<[CfgEdge; 8]> {
        self.blocks()
            .into_iter()
            .flat_map(|candidate| self.out_edges(candidate))
            .filter(|edge| edge.to == block)
            .collect()
    }

    /// All edges (normal and exceptional) out of `block`.
    fn out_edges(&self, block: BlockId) -> SmallVec<[CfgEdge; 8]> {
        let mut edges = SmallVec::new();
        edges.extend(
            self.normal_successors(block)
                .into_iter()
                .map(|to| CfgEdge::new(block, to, EdgeKind::Normal)),
        );
        edges.extend(
            self.exceptional_successors(block)
                .into_iter()
                .map(|to| CfgEdge::new(block, to, EdgeKind::Exceptional)),
        );
        edges
    }
}
