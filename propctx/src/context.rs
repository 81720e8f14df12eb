use std::fmt;

/// A call-graph context, possibly decorated with property-name sensitivity.
///
/// `PropNameContext` and `MarkerForInContext` share the same shape (a base context plus an
/// instance key) but differ in what they expose to the pointer-analysis engine:
/// `single_instance_filter` only returns a key for `PropName`. Modeling this as one enum with a
/// variant-level behavior difference, rather than a base class with an unchecked downcast, was an
/// explicit open-question resolution.
#[derive(Clone, Debug)]
pub enum Context<B, V> {
    /// A context with no property-name sensitivity applied, as produced by the delegate selector.
    Base(B),
    /// Pins the distinguishing parameter to a single instance key; the pointer-analysis engine
    /// consumes this as a parameter type refinement.
    PropName { base: Box<Context<B, V>>, key: V },
    /// Propagates property-name sensitivity through an intermediary callee without constraining
    /// its own parameter set.
    MarkerFor { base: Box<Context<B, V>>, instance_key: V },
}

impl<B, V> Context<B, V> {
    /// The single-instance parameter filter this context pins, if any. Only `PropName` exposes
    /// one; `MarkerFor` carries the same kind of key but deliberately withholds it so that an
    /// intermediary callee's own parameters are not spuriously constrained.
    pub fn single_instance_filter(&self) -> Option<&V> {
        match self {
            Context::PropName { key, .. } => Some(key),
            Context::Base(_) | Context::MarkerFor { .. } => None,
        }
    }

    /// Whether this context (at any depth) carries property-name sensitivity.
    pub fn is_propname_marked(&self) -> bool {
        matches!(self, Context::PropName { .. } | Context::MarkerFor { .. })
    }

    /// The instance key carried by either a `PropName` or `MarkerFor` variant, used internally by
    /// the context constructor to propagate a marker through an intermediary callee. Unlike
    /// [`Context::single_instance_filter`], this also reads `MarkerFor`'s key, since a
    /// `MarkerFor` context is itself evidence the marking already propagated through an earlier
    /// call.
    pub(crate) fn propagated_instance_key(&self) -> Option<&V> {
        match self {
            Context::PropName { key, .. } => Some(key),
            Context::MarkerFor { instance_key, .. } => Some(instance_key),
            Context::Base(_) => None,
        }
    }

    /// The innermost base context this one was built on top of.
    pub fn base(&self) -> &B {
        match self {
            Context::Base(base) => base,
            Context::PropName { base, .. } | Context::MarkerFor { base, .. } => base.base(),
        }
    }
}

impl<B: fmt::Display, V: fmt::Display> fmt::Display for Context<B, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Context::Base(base) => write!(f, "{base}"),
            Context::PropName { base, key } => write!(f, "{base} -> PropName(key={key})"),
            Context::MarkerFor { base, instance_key } => {
                write!(f, "{base} -> MarkerFor(key={instance_key})")
            }
        }
    }
}
