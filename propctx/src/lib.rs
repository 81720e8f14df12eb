//! Property-name context selection: decorates a call-graph builder's existing context selector
//! with object-sensitivity over a callee's distinguishing positional parameter, for languages
//! where a dynamically-computed property name can meaningfully identify "which" callee behavior
//! an invocation exercises.
//!
//! [`PropNameContextSelector`] never replaces the base selector; it wraps one and only adds
//! sensitivity when the property-use classifier ([`classifier::classify`]) says doing so is
//! warranted.

mod cache;
mod classifier;
mod config;
mod context;
mod selector;
mod tracer;

pub use self::{
    cache::{Frequency, FrequencyCache},
    config::ContextSelectorConfig,
    context::Context,
    selector::{BaseContextSelector, PropNameContextSelector},
};

pub use self::classifier::classify;
pub use self::tracer::dependent_call_argument_indices;
