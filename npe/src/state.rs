use cranelift_entity::{EntityRef, SecondaryMap};
use flowcheck_ir::{ExceptionSet, ExceptionType, ValueNumber};
use rustc_hash::FxHashMap;

use crate::lattice::NullState;

/// A total map from SSA value numbers to [`NullState`].
///
/// Backed by a [`SecondaryMap`], which defaults missing entries to `NullState::Unknown` (⊥) —
/// exactly the lattice's bottom element — so every value number in `[0, max]` reads as bottom
/// until something joins or assigns it otherwise.
#[derive(Clone, Debug, Default)]
pub struct BlockState {
    values: SecondaryMap<ValueNumber, NullState>,
}

impl BlockState {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, value: ValueNumber) -> NullState {
        self.values[value]
    }

    #[inline]
    pub fn set(&mut self, value: ValueNumber, state: NullState) {
        self.values[value] = state;
    }

    pub fn set_never_null(&mut self, value: ValueNumber) {
        self.set(value, NullState::NeverNull);
    }

    pub fn set_always_null(&mut self, value: ValueNumber) {
        self.set(value, NullState::AlwaysNull);
    }

    /// Copies `src`'s state onto `dst`, as `check-cast` does.
    pub fn assign(&mut self, dst: ValueNumber, src: ValueNumber) {
        let state = self.get(src);
        self.set(dst, state);
    }

    /// Joins `value`'s current state with `with`, returning whether the state actually changed
    /// (used by the solver to decide whether to re-enqueue successors).
    pub fn join_into(&mut self, value: ValueNumber, with: NullState) -> bool {
        let joined = self.get(value).join(with);
        let changed = joined != self.get(value);
        self.set(value, joined);
        changed
    }

    #[inline]
    pub fn eq_up_to(&self, other: &BlockState, max: ValueNumber) -> bool {
        (0..=max.index()).all(|i| {
            let v = ValueNumber::new(i);
            self.get(v) == other.get(v)
        })
    }
}

/// An optional per-parameter initial lattice element, supplied by the caller.
///
/// A parameter with no entry is seeded to `MaybeNull` (⊤), since the solver has no information to
/// assume anything stronger about a caller-supplied argument.
#[derive(Clone, Debug, Default)]
pub struct ParameterState {
    seeded: FxHashMap<ValueNumber, NullState>,
}

impl ParameterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, param_value: ValueNumber, state: NullState) -> &mut Self {
        self.seeded.insert(param_value, state);
        self
    }

    pub fn get(&self, param_value: ValueNumber) -> NullState {
        self.seeded.get(&param_value).copied().unwrap_or(NullState::MaybeNull)
    }
}

/// The set of exception types to subtract from every instruction's declared exceptions before
/// deciding prunability.
#[derive(Clone, Debug, Default)]
pub struct IgnoredExceptions(ExceptionSet);

impl IgnoredExceptions {
    pub fn new() -> Self {
        Self(ExceptionSet::empty())
    }

    pub fn insert(&mut self, ty: ExceptionType) -> &mut Self {
        if !self.0.contains(&ty) {
            self.0 = ExceptionSet::from_iter(self.0.iter().cloned().chain(std::iter::once(ty)));
        }
        self
    }

    pub fn as_set(&self) -> &ExceptionSet {
        &self.0
    }
}
