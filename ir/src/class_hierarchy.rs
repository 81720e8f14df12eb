/// Resolves language-specific synthetic types needed by Core B.
///
/// Generic over `V`, the pointer-analysis "abstract value" / instance-key type used by the
/// embedding call-graph builder, since this crate has no opinion on how that type is represented.
pub trait ClassHierarchy<V> {
    /// The abstract value representing the dynamic-object language's `undefined` singleton,
    /// substituted when a call site's argument at the distinguishing index is statically known to
    /// be absent.
    fn undefined_value(&self) -> V;
}
