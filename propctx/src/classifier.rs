use flowcheck_ir::{DefUse, Instruction, MethodIr, MethodRef};

use crate::cache::{Frequency, FrequencyCache};

/// Classifies `callee`'s distinguishing parameter (the `n`-th positional argument, 0-indexed) as
/// `NEVER`/`SOMETIMES`/`ALWAYS` used as a dynamic-property-access key.
///
/// `n` must name an existing positional parameter of `callee`; methods with too few parameters
/// conservatively classify as `Never` rather than erroring.
pub fn classify<IR>(callee: &IR, callee_ref: &MethodRef, n: usize, cache: &FrequencyCache) -> Frequency
where
    IR: MethodIr + DefUse,
{
    if callee.num_parameters() <= n {
        log::trace!(target: "flowcheck-propctx", "{callee_ref:?} has too few parameters for N={n}, classifying Never");
        return Frequency::Never;
    }

    if let Some(cached) = cache.get(callee_ref) {
        log::trace!(target: "flowcheck-propctx", "cache hit for {callee_ref:?}: {cached}");
        return cached;
    }

    let target = callee.parameter_value(n);
    let mut used_as_property_name = false;
    let mut used_as_something_else = false;

    for use_loc in callee.uses(target) {
        let instr = &callee.block(use_loc.block).instructions[use_loc.index];
        let is_property_name_use = match instr {
            Instruction::ReflectiveGet { key, .. } | Instruction::ReflectivePut { key, .. } => {
                *key == target
            }
            Instruction::IsDefinedIn { key, .. } => *key == target,
            _ => false,
        };
        if is_property_name_use {
            used_as_property_name = true;
        } else {
            used_as_something_else = true;
        }
    }

    let frequency = match (used_as_property_name, used_as_something_else) {
        (true, true) => Frequency::Sometimes,
        (true, false) => Frequency::Always,
        (false, _) => Frequency::Never,
    };
    log::trace!(target: "flowcheck-propctx", "classified {callee_ref:?} as {frequency}");
    cache.insert(callee_ref.clone(), frequency);
    frequency
}
