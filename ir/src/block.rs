use crate::{instr::Instruction, value::BlockId};

/// A basic block: an ordered instruction sequence with a single entry and, aside from the
/// instruction-level control transfers described in [`crate::cfg::ControlFlowGraph`], a single
/// exit.
#[derive(Clone, Debug)]
pub struct Block {
    pub id: BlockId,
    pub instructions: Vec<Instruction>,
}

impl Block {
    pub fn new(id: BlockId) -> Self {
        Self {
            id,
            instructions: Vec::new(),
        }
    }

    /// The instruction responsible for this block's exceptional successors, i.e. the last
    /// instruction in the block that is potentially-excepting (a PEI). Blocks may contain at
    /// most one relevant PEI; if a block somehow contains several PEI-shaped instructions, the
    /// last one determines the block's exceptional edges, matching how a real compiler would
    /// split such a block so that only the final instruction can transfer control abnormally.
    pub fn relevant_pei(&self) -> Option<&Instruction> {
        self.instructions.iter().rev().find(|instr| is_pei(instr))
    }
}

/// Whether `instr` is a potentially-excepting instruction (PEI) at all, independent of whether
/// any of its declared exceptions survive subtraction of the ignored-exception set.
pub fn is_pei(instr: &Instruction) -> bool {
    matches!(
        instr,
        Instruction::New { .. }
            | Instruction::GetField { .. }
            | Instruction::PutField { .. }
            | Instruction::ArrayLength { .. }
            | Instruction::ArrayLoad { .. }
            | Instruction::ArrayStore { .. }
            | Instruction::InvokeStatic { .. }
            | Instruction::InvokeInstance { .. }
            | Instruction::MonitorEnter { .. }
            | Instruction::MonitorExit { .. }
            | Instruction::Throw { .. }
    )
}
