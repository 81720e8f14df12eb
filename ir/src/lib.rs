//! Shared SSA IR, control-flow, and def-use contracts consumed by the null-dereference pruner
//! (`flowcheck-npe`) and the property-name context selector (`flowcheck-propctx`).
//!
//! Everything in this crate is a trait or a small value type describing the *shape* of
//! information the two analysis cores need from their host analysis framework. SSA IR
//! construction, the real symbol table, and the real class hierarchy are all external
//! collaborators; this crate only specifies the boundary.

mod block;
mod cfg;
mod class_hierarchy;
mod defuse;
mod instr;
mod method_ir;
mod method_state;
mod symbols;
mod value;

pub use self::{
    block::{Block, is_pei},
    cfg::{CfgEdge, ControlFlowGraph, EdgeKind},
    class_hierarchy::ClassHierarchy,
    defuse::{DefUse, InstrLoc},
    instr::{CallSiteRef, ExceptionSet, ExceptionType, Instruction, MethodRef, PiGuard},
    method_ir::MethodIr,
    method_state::{AssumeThrows, MethodState},
    symbols::{NoConstants, SymbolTable},
    value::{BlockId, ValueNumber},
};
