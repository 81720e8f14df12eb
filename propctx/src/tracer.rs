use std::collections::VecDeque;

use flowcheck_ir::{CallSiteRef, DefUse, Instruction, MethodIr, ValueNumber};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

/// Backward def-use tracer: which of `site`'s argument positions carry a value transitively
/// derived (through `get`/reflective-get chains) from the caller's own `n`-th positional
/// parameter.
///
/// Uses an explicit worklist rather than recursion, matching convention with
/// [`flowcheck_npe`](https://docs.rs/flowcheck-npe)'s solver: SSA def chains are acyclic, so each
/// value is enqueued at most once and the traversal is guaranteed to terminate.
pub fn dependent_call_argument_indices<IR>(caller: &IR, site: CallSiteRef, n: usize) -> SmallVec<[usize; 4]>
where
    IR: MethodIr + DefUse,
{
    if caller.num_parameters() <= n {
        return SmallVec::new();
    }
    let target = caller.parameter_value(n);
    let args = caller.call_site_args(site);

    let mut dependents = SmallVec::new();
    for (i, &seed) in args.iter().enumerate() {
        if reaches(caller, seed, target) {
            dependents.push(i);
        }
    }
    dependents
}

fn reaches<IR: MethodIr + DefUse>(caller: &IR, seed: ValueNumber, target: ValueNumber) -> bool {
    let mut seen: FxHashSet<ValueNumber> = FxHashSet::default();
    let mut worklist: VecDeque<ValueNumber> = VecDeque::new();
    seen.insert(seed);
    worklist.push_back(seed);

    while let Some(value) = worklist.pop_front() {
        if value == target {
            return true;
        }
        if let Some(loc) = caller.defining_instruction(value) {
            let instr = &caller.block(loc.block).instructions[loc.index];
            if let Some(reference) = reference_operand(instr) {
                if seen.insert(reference) {
                    worklist.push_back(reference);
                }
            }
        }
    }
    false
}

/// The reference operand a `get`/reflective-get reads through, the only instruction kinds the
/// tracer follows backward through.
fn reference_operand(instr: &Instruction) -> Option<ValueNumber> {
    match instr {
        Instruction::Get { object, .. } => Some(*object),
        Instruction::ReflectiveGet { object, .. } => Some(*object),
        _ => None,
    }
}
