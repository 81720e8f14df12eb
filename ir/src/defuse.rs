use smallvec::SmallVec;

use crate::value::{BlockId, ValueNumber};

/// Identifies the position of an instruction within a method: the block that contains it, and
/// its index within that block's instruction list.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct InstrLoc {
    pub block: BlockId,
    pub index: usize,
}

impl InstrLoc {
    pub fn new(block: BlockId, index: usize) -> Self {
        Self { block, index }
    }
}

/// The def-use relation for a method's SSA values, as supplied by the host analysis framework.
///
/// Core A does not need this directly (block-local transfer functions only ever look at operands
/// already in hand), but Core B's dependency tracer walks def chains backward from a
/// call-site argument, and the property-use classifier walks the use list of a single
/// parameter value forward.
pub trait DefUse {
    /// The instruction that defines `value`, or `None` if `value` is a parameter or constant with
    /// no defining instruction in this method's body.
    fn defining_instruction(&self, value: ValueNumber) -> Option<InstrLoc>;

    /// Every instruction that uses `value` as an operand.
    fn uses(&self, value: ValueNumber) -> SmallVec<[InstrLoc; 8]>;
}
