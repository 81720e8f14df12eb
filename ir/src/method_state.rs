use crate::instr::CallSiteRef;

/// The method-summary oracle: external knowledge of whether an invoked method may itself throw
/// some exception, consumed by the edge-pruning visitor's invoke handling.
///
/// A non-null receiver never rules out an invoke raising `NullPointerException`, because the
/// callee may dereference a null field or parameter internally. Only a negative answer from this
/// oracle licenses pruning an invoke's exceptional successors.
pub trait MethodState {
    /// Whether the method invoked at `call_site` may throw any exception at all.
    fn throws_exception(&self, call_site: CallSiteRef) -> bool;
}

/// A [`MethodState`] that conservatively reports every invocation may throw, the sensible default
/// when no real oracle is supplied.
#[derive(Copy, Clone, Default, Debug)]
pub struct AssumeThrows;

impl MethodState for AssumeThrows {
    fn throws_exception(&self, _call_site: CallSiteRef) -> bool {
        true
    }
}
