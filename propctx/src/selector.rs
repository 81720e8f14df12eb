use flowcheck_ir::{CallSiteRef, ClassHierarchy, DefUse, MethodIr, MethodRef};
use smallvec::SmallVec;

use crate::{
    cache::{Frequency, FrequencyCache},
    classifier, config::ContextSelectorConfig, context::Context, tracer,
};

/// A call-graph builder's existing context selector, decorated by [`PropNameContextSelector`]
/// rather than replaced by it.
///
/// Associated types rather than extra type parameters on every call site, since a single concrete
/// selector is fixed for the lifetime of one call-graph construction.
pub trait BaseContextSelector {
    type Caller;
    type Value;
    type Context;

    /// A `None` slot means the pointer-analysis engine has not (yet) resolved that positional
    /// argument to a concrete abstract value, distinct from the slot not existing at all (a call
    /// site with fewer arguments than the slot index).
    fn get_calling_context(
        &self,
        caller: &Self::Caller,
        site: CallSiteRef,
        callee: &MethodRef,
        receiver_abstract_values: &[Option<Self::Value>],
    ) -> Self::Context;

    fn get_relevant_parameters(&self, caller: &Self::Caller, site: CallSiteRef) -> SmallVec<[usize; 4]>;
}

/// Decorates a [`BaseContextSelector`] with property-name context sensitivity.
pub struct PropNameContextSelector<Base, H> {
    base: Base,
    hierarchy: H,
    cache: FrequencyCache,
    config: ContextSelectorConfig,
}

impl<Base, H> PropNameContextSelector<Base, H>
where
    Base: BaseContextSelector,
{
    pub fn new(base: Base, hierarchy: H, config: ContextSelectorConfig) -> Self {
        Self {
            base,
            hierarchy,
            cache: FrequencyCache::new(),
            config,
        }
    }
}

impl<Base, H> PropNameContextSelector<Base, H>
where
    Base: BaseContextSelector,
    Base::Caller: MethodIr + DefUse,
    Base::Value: Clone,
    H: ClassHierarchy<Base::Value>,
{
    /// `caller_context` is the context the caller itself is currently analyzed under; it drives
    /// step 3's "caller is itself `PROPNAME`-marked" check. `callee_ref`/`callee_ir` identify the
    /// invoked method for classification.
    pub fn get_calling_context(
        &self,
        caller: &Base::Caller,
        caller_context: &Context<Base::Context, Base::Value>,
        site: CallSiteRef,
        callee_ref: &MethodRef,
        callee_ir: &Base::Caller,
        receiver_abstract_values: &[Option<Base::Value>],
    ) -> Context<Base::Context, Base::Value> {
        let base_ctx = Context::Base(self.base.get_calling_context(
            caller,
            site,
            callee_ref,
            receiver_abstract_values,
        ));
        let n = self.config.distinguishing_index();

        if receiver_abstract_values.len() > n {
            let frequency = classifier::classify(callee_ir, callee_ref, n, &self.cache);
            if matches!(frequency, Frequency::Always | Frequency::Sometimes) {
                let key = receiver_abstract_values[n]
                    .clone()
                    .unwrap_or_else(|| self.hierarchy.undefined_value());
                log::trace!(
                    target: "flowcheck-propctx",
                    "cloning PropName context for {callee_ref:?} (N={n}, frequency={frequency})"
                );
                return Context::PropName { base: Box::new(base_ctx), key };
            }
        } else if caller_context.is_propname_marked() {
            let dependents = tracer::dependent_call_argument_indices(caller, site, n);
            if !dependents.is_empty() {
                if let Some(instance_key) = caller_context.propagated_instance_key() {
                    log::trace!(
                        target: "flowcheck-propctx",
                        "cloning MarkerFor context for {callee_ref:?}, {} dependent argument(s)",
                        dependents.len()
                    );
                    return Context::MarkerFor {
                        base: Box::new(base_ctx),
                        instance_key: instance_key.clone(),
                    };
                }
            }
        }

        base_ctx
    }

    pub fn get_relevant_parameters(
        &self,
        caller: &Base::Caller,
        site: CallSiteRef,
    ) -> SmallVec<[usize; 4]> {
        let mut relevant = self.base.get_relevant_parameters(caller, site);
        let n = self.config.distinguishing_index();
        if caller.call_site_args(site).len() > n && !relevant.contains(&n) {
            relevant.push(n);
        }
        relevant
    }
}
