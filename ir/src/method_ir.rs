use cranelift_entity::EntityRef;
use smallvec::SmallVec;

use crate::{
    block::Block,
    instr::CallSiteRef,
    symbols::SymbolTable,
    value::{BlockId, ValueNumber},
};

/// The SSA IR of a single method, as supplied by the host analysis framework.
///
/// Parameter value numbers are 1-indexed: the method's `index`-th user-visible positional
/// argument (0-indexed) is bound to SSA value number `index + 1`.
/// [`MethodIr::parameter_value`] has a default implementation reflecting this convention; override
/// it only if the host IR numbers parameters differently.
pub trait MethodIr {
    /// A method with no body (e.g. abstract, native, or a stub) is "empty"; both analysis cores
    /// short-circuit on it rather than running the solver/classifier over zero blocks.
    fn is_empty(&self) -> bool;

    /// The largest SSA value number used anywhere in the method, i.e. the size of the dense
    /// per-value state map minus one.
    fn max_value_number(&self) -> ValueNumber;

    /// The number of user-visible positional parameters.
    fn num_parameters(&self) -> usize;

    /// The SSA value number bound to the `index`-th positional parameter (0-indexed).
    fn parameter_value(&self, index: usize) -> ValueNumber {
        ValueNumber::new(index + 1)
    }

    /// Every block in the method, including unreachable ones.
    fn blocks(&self) -> SmallVec<[BlockId; 16]>;

    /// Look up a block by id. Panics if `id` is not a block of this method; callers are expected
    /// to only pass ids obtained from [`MethodIr::blocks`] or a [`crate::cfg::ControlFlowGraph`]
    /// known to describe the same method.
    fn block(&self, id: BlockId) -> &Block;

    /// The host's symbol table, used to classify constants as definitely-null or definitely
    /// non-null at state-seeding time.
    fn symbol_table(&self) -> &dyn SymbolTable;

    /// The SSA values passed as arguments at `site`, in positional order. Returns an empty list
    /// if `site` is not a call site in this method (callers treat this the same as "no
    /// dependents found" rather than as an error, per).
    fn call_site_args(&self, site: CallSiteRef) -> SmallVec<[ValueNumber; 4]>;
}
