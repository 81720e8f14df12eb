use std::fmt;

/// The four-point null-state lattice.
///
/// ```text
///        MaybeNull (⊤)
///        /        \
/// NeverNull      AlwaysNull
///        \        /
///        Unknown (⊥)
/// ```
///
/// `Unknown` is the initial state of every SSA value before any fact has been derived about it
/// ("unreachable-so-far" along the path currently being solved). `MaybeNull` is the conflict
/// state: the value is null on some paths and non-null on others, so no further refinement is
/// possible. The lattice has height 3, which together with the finite number of SSA values and
/// blocks in a method guarantees the solver in [`crate::solver`] terminates.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Hash)]
pub enum NullState {
    #[default]
    Unknown,
    NeverNull,
    AlwaysNull,
    MaybeNull,
}

impl NullState {
    #[inline]
    pub const fn bottom() -> Self {
        NullState::Unknown
    }

    #[inline]
    pub const fn top() -> Self {
        NullState::MaybeNull
    }

    #[inline]
    pub const fn is_never_null(self) -> bool {
        matches!(self, NullState::NeverNull)
    }

    #[inline]
    pub const fn is_always_null(self) -> bool {
        matches!(self, NullState::AlwaysNull)
    }

    /// Least upper bound. `NeverNull ⊔ AlwaysNull = MaybeNull`; `Unknown` is the identity; all
    /// other combinations are either equal or already bounded by one side.
    pub const fn join(self, other: Self) -> Self {
        use NullState::*;
        match (self, other) {
            (Unknown, x) | (x, Unknown) => x,
            (MaybeNull, _) | (_, MaybeNull) => MaybeNull,
            (NeverNull, NeverNull) => NeverNull,
            (AlwaysNull, AlwaysNull) => AlwaysNull,
            (NeverNull, AlwaysNull) | (AlwaysNull, NeverNull) => MaybeNull,
        }
    }

    /// Greatest lower bound, dual to [`NullState::join`]. Used only for branch-sensitive
    /// refinement at π-nodes: the guarded value is met with the refinement implied by
    /// the branch taken, which can only narrow it (or, for a path that cannot actually occur,
    /// collapse it to `Unknown`).
    pub const fn meet(self, other: Self) -> Self {
        use NullState::*;
        match (self, other) {
            (MaybeNull, x) | (x, MaybeNull) => x,
            (Unknown, _) | (_, Unknown) => Unknown,
            (NeverNull, NeverNull) => NeverNull,
            (AlwaysNull, AlwaysNull) => AlwaysNull,
            (NeverNull, AlwaysNull) | (AlwaysNull, NeverNull) => Unknown,
        }
    }
}

impl fmt::Display for NullState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NullState::Unknown => "unknown",
            NullState::NeverNull => "never-null",
            NullState::AlwaysNull => "always-null",
            NullState::MaybeNull => "maybe-null",
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn join_is_commutative_and_has_unknown_as_identity() {
        let states = [
            NullState::Unknown,
            NullState::NeverNull,
            NullState::AlwaysNull,
            NullState::MaybeNull,
        ];
        for &a in &states {
            assert_eq!(a.join(NullState::Unknown), a);
            for &b in &states {
                assert_eq!(a.join(b), b.join(a));
            }
        }
    }

    #[test]
    fn join_of_never_and_always_is_maybe() {
        assert_eq!(NullState::NeverNull.join(NullState::AlwaysNull), NullState::MaybeNull);
    }

    #[test]
    fn join_is_monotonic_and_idempotent() {
        let states = [
            NullState::Unknown,
            NullState::NeverNull,
            NullState::AlwaysNull,
            NullState::MaybeNull,
        ];
        for &a in &states {
            assert_eq!(a.join(a), a);
            for &b in &states {
                let joined = a.join(b);
                assert_eq!(joined.join(a), joined, "join must be monotonic in its left argument");
                assert_eq!(joined.join(b), joined, "join must be monotonic in its right argument");
            }
        }
    }

    #[test]
    fn meet_is_dual_to_join() {
        assert_eq!(NullState::NeverNull.meet(NullState::AlwaysNull), NullState::Unknown);
        assert_eq!(NullState::NeverNull.meet(NullState::MaybeNull), NullState::NeverNull);
        assert_eq!(NullState::Unknown.meet(NullState::MaybeNull), NullState::Unknown);
    }
}
