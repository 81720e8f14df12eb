//! Small hand-built `MethodIr` / `ControlFlowGraph` implementations for exercising the solver and
//! pruner without a real SSA IR construction pipeline, which is an external collaborator.

use cranelift_entity::EntityRef;
use flowcheck_ir::{
    Block, BlockId, CallSiteRef, ControlFlowGraph, MethodIr, NoConstants, SymbolTable,
    ValueNumber,
};
use smallvec::SmallVec;

pub struct TestMethod {
    pub blocks: Vec<Block>,
    pub max_value: ValueNumber,
    pub num_params: usize,
}

impl MethodIr for TestMethod {
    fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    fn max_value_number(&self) -> ValueNumber {
        self.max_value
    }

    fn num_parameters(&self) -> usize {
        self.num_params
    }

    fn blocks(&self) -> SmallVec<[BlockId; 16]> {
        self.blocks.iter().map(|b| b.id).collect()
    }

    fn block(&self, id: BlockId) -> &Block {
        self.blocks
            .iter()
            .find(|b| b.id == id)
            .unwrap_or_else(|| panic!("no such block: {id:?}"))
    }

    fn symbol_table(&self) -> &dyn SymbolTable {
        &NoConstants
    }

    fn call_site_args(&self, _site: CallSiteRef) -> SmallVec<[ValueNumber; 4]> {
        SmallVec::new()
    }
}

pub struct TestCfg {
    pub entry: BlockId,
    pub normal: Vec<(BlockId, BlockId)>,
    pub exceptional: Vec<(BlockId, BlockId)>,
    pub all_blocks: Vec<BlockId>,
}

impl ControlFlowGraph for TestCfg {
    fn blocks(&self) -> SmallVec<[BlockId; 16]> {
        self.all_blocks.iter().copied().collect()
    }

    fn entry(&self) -> BlockId {
        self.entry
    }

    fn contains_block(&self, block: BlockId) -> bool {
        self.all_blocks.contains(&block)
    }

    fn normal_successors(&self, block: BlockId) -> SmallVec<[BlockId; 4]> {
        self.normal.iter().filter(|(from, _)| *from == block).map(|(_, to)| *to).collect()
    }

    fn exceptional_successors(&self, block: BlockId) -> SmallVec<[BlockId; 4]> {
        self.exceptional.iter().filter(|(from, _)| *from == block).map(|(_, to)| *to).collect()
    }
}

pub fn block_id(n: u32) -> BlockId {
    BlockId::new(n as usize)
}

pub fn value(n: u32) -> ValueNumber {
    ValueNumber::new(n as usize)
}
