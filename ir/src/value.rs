use cranelift_entity::entity_impl;

/// A dense, non-negative integer identifying a value produced somewhere in a method's SSA form.
///
/// Parameters occupy the low value numbers (see `MethodIr::parameter_value`); the symbol table
/// reports the maximum value number in use via `MethodIr::max_value_number`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValueNumber(u32);
entity_impl!(ValueNumber, "val");

/// Identifies a basic block within a method's control-flow graph.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(u32);
entity_impl!(BlockId, "block");
