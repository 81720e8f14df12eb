use flowcheck_ir::MethodRef;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

/// The result of classifying a callee's distinguishing parameter.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Frequency {
    Never,
    Sometimes,
    Always,
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Frequency::Never => "never",
            Frequency::Sometimes => "sometimes",
            Frequency::Always => "always",
        })
    }
}

/// Process-lifetime, write-once classification cache keyed by callee method reference.
///
/// Backed by a [`parking_lot::RwLock`] rather than a bare `RefCell`: call-graph construction in a
/// whole-program analysis is frequently sharded across worker threads, and since entries are
/// write-once, the lock sees negligible contention relative to the correctness cost of choosing a
/// non-thread-safe default.
#[derive(Default)]
pub struct FrequencyCache {
    entries: RwLock<FxHashMap<MethodRef, Frequency>>,
}

impl FrequencyCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, callee: &MethodRef) -> Option<Frequency> {
        self.entries.read().get(callee).copied()
    }

    /// Records `frequency` for `callee` if no entry exists yet. Two threads racing to classify the
    /// same callee will compute the same deterministic answer, so the loser's write is simply
    /// discarded rather than overwriting the winner's.
    pub fn insert(&self, callee: MethodRef, frequency: Frequency) {
        self.entries.write().entry(callee).or_insert(frequency);
    }
}
