use flowcheck_ir::Instruction;

use crate::{lattice::NullState, state::BlockState};

/// Applies the transfer function of a single non-merge instruction to `state`.
///
/// φ- and π-nodes are *not* handled here: their defined value depends on which predecessor edge
/// control arrived from, so the solver resolves them directly while computing a block's IN state,
/// before the rest of the block's instructions (including this function) ever run.
pub fn apply(state: &mut BlockState, instr: &Instruction) {
    match instr {
        Instruction::New { def, .. } => state.set_never_null(*def),
        Instruction::GetField { def, .. } => state.set(*def, NullState::MaybeNull),
        Instruction::PutField { .. } => {}
        // An array's length is an integer, not a reference; it is trivially "never null", and in
        // any case irrelevant to this lattice.
        Instruction::ArrayLength { def, .. } => state.set_never_null(*def),
        Instruction::ArrayLoad { def, .. } => state.set(*def, NullState::MaybeNull),
        Instruction::ArrayStore { .. } => {}
        Instruction::InvokeStatic { def, .. } | Instruction::InvokeInstance { def, .. } => {
            // Conservative: a real implementation could consult method summaries for non-null
            // return guarantees, but those summaries are an external collaborator out of scope
            // here.
            if let Some(def) = def {
                state.set(*def, NullState::MaybeNull);
            }
        }
        Instruction::MonitorEnter { .. }
        | Instruction::MonitorExit { .. }
        | Instruction::Throw { .. } => {}
        Instruction::CheckCast { def, source } => state.assign(*def, *source),
        Instruction::Phi { .. } | Instruction::Pi { .. } => {
            // Resolved by the solver before this function is ever reached for these kinds.
        }
        Instruction::NullCheckBranch { .. } => {
            // A terminator with no defined value; its effect is purely on the outgoing edges,
            // computed by the solver alongside this block's out-state.
        }
        Instruction::Get { def, .. } | Instruction::ReflectiveGet { def, .. } => {
            state.set(*def, NullState::MaybeNull);
        }
        Instruction::ReflectivePut { .. } => {}
        Instruction::IsDefinedIn { def, .. } => state.set(*def, NullState::MaybeNull),
        Instruction::Other => {}
    }
}
