mod common;

use std::fmt;

use common::{TestMethod, block_id, value};
use flowcheck_ir::{CallSiteRef, ClassHierarchy, ExceptionSet, Instruction, MethodRef};
use flowcheck_propctx::{
    BaseContextSelector, Context, ContextSelectorConfig, Frequency, FrequencyCache,
    PropNameContextSelector, classify,
};
use pretty_assertions::assert_eq;
use smallvec::SmallVec;

fn method_with(instructions: Vec<Instruction>, num_params: usize, max_value: u32) -> TestMethod {
    let mut block = flowcheck_ir::Block::new(block_id(0));
    block.instructions = instructions;
    TestMethod {
        blocks: vec![block],
        max_value: value(max_value),
        num_params,
        call_sites: Vec::new(),
    }
}

/// S5 — `function f(o,k){ return o[k]; }` classifies ALWAYS for N=1.
#[test]
fn classify_always_when_only_used_as_property_name() {
    let f = method_with(
        vec![Instruction::ReflectiveGet { def: value(3), object: value(1), key: value(2) }],
        2,
        3,
    );
    let cache = FrequencyCache::new();
    let result = classify(&f, &MethodRef::new("f"), 1, &cache);
    assert_eq!(result, Frequency::Always);
}

/// S5 — `function g(o,k){ log(k); return o[k]; }` classifies SOMETIMES for N=1.
#[test]
fn classify_sometimes_when_also_used_elsewhere() {
    let mut args = SmallVec::new();
    args.push(value(2));
    let g = method_with(
        vec![
            Instruction::InvokeStatic {
                def: None,
                callee: MethodRef::new("log"),
                call_site: CallSiteRef(0),
                args,
                declared_exceptions: ExceptionSet::empty(),
            },
            Instruction::ReflectiveGet { def: value(3), object: value(1), key: value(2) },
        ],
        2,
        3,
    );
    let cache = FrequencyCache::new();
    let result = classify(&g, &MethodRef::new("g"), 1, &cache);
    assert_eq!(result, Frequency::Sometimes);
}

/// S5 — `function h(o,k){ return o.k; }` classifies NEVER: `k` is never used at all (the `.k`
/// access is a statically-named property read, not driven by the value of `k`).
#[test]
fn classify_never_when_not_used_as_property_name() {
    let h = method_with(vec![Instruction::Get { def: value(3), object: value(1) }], 2, 3);
    let cache = FrequencyCache::new();
    let result = classify(&h, &MethodRef::new("h"), 1, &cache);
    assert_eq!(result, Frequency::Never);
}

#[test]
fn classify_never_with_too_few_parameters() {
    let tiny = method_with(vec![], 1, 1);
    let cache = FrequencyCache::new();
    assert_eq!(classify(&tiny, &MethodRef::new("tiny"), 1, &cache), Frequency::Never);
}

#[test]
fn classification_is_cached() {
    let f = method_with(
        vec![Instruction::ReflectiveGet { def: value(3), object: value(1), key: value(2) }],
        2,
        3,
    );
    let cache = FrequencyCache::new();
    let callee_ref = MethodRef::new("f");
    assert_eq!(classify(&f, &callee_ref, 1, &cache), Frequency::Always);
    assert_eq!(cache.get(&callee_ref), Some(Frequency::Always));

    // Even a method whose body would classify differently reuses the cached answer.
    let never = method_with(vec![], 3, 0);
    assert_eq!(classify(&never, &callee_ref, 1, &cache), Frequency::Always);
}

#[derive(Clone, Debug, PartialEq)]
enum AbstractValue {
    Str(&'static str),
    Undefined,
}

impl fmt::Display for AbstractValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbstractValue::Str(s) => write!(f, "\"{s}\""),
            AbstractValue::Undefined => write!(f, "undefined"),
        }
    }
}

struct UnitBase;

impl BaseContextSelector for UnitBase {
    type Caller = TestMethod;
    type Value = AbstractValue;
    type Context = ();

    fn get_calling_context(
        &self,
        _caller: &TestMethod,
        _site: CallSiteRef,
        _callee: &MethodRef,
        _receiver_abstract_values: &[Option<AbstractValue>],
    ) {
    }

    fn get_relevant_parameters(&self, _caller: &TestMethod, _site: CallSiteRef) -> SmallVec<[usize; 4]> {
        SmallVec::new()
    }
}

struct Hierarchy;

impl ClassHierarchy<AbstractValue> for Hierarchy {
    fn undefined_value(&self) -> AbstractValue {
        AbstractValue::Undefined
    }
}

fn always_classified_callee() -> (TestMethod, MethodRef) {
    let f = method_with(
        vec![Instruction::ReflectiveGet { def: value(3), object: value(1), key: value(2) }],
        2,
        3,
    );
    (f, MethodRef::new("f"))
}

/// S6 — a resolved abstract value at the distinguishing slot is carried verbatim into the new
/// `PropNameContext`.
#[test]
fn context_carries_resolved_abstract_value() {
    let selector = PropNameContextSelector::new(UnitBase, Hierarchy, ContextSelectorConfig::new(1));
    let (callee, callee_ref) = always_classified_callee();
    let caller = method_with(vec![], 0, 0);
    let caller_context: Context<(), AbstractValue> = Context::Base(());

    let receiver_values = vec![Some(AbstractValue::Str("obj")), Some(AbstractValue::Str("name"))];
    let ctx = selector.get_calling_context(
        &caller,
        &caller_context,
        CallSiteRef(0),
        &callee_ref,
        &callee,
        &receiver_values,
    );

    match ctx {
        Context::PropName { key, .. } => assert_eq!(key, AbstractValue::Str("name")),
        other => panic!("expected PropName, got {other:?}"),
    }
}

/// S6 — an unresolved (`None`) slot at the distinguishing index substitutes the language's
/// `undefined` singleton rather than leaving the context unrefined.
#[test]
fn context_substitutes_undefined_for_unresolved_slot() {
    let selector = PropNameContextSelector::new(UnitBase, Hierarchy, ContextSelectorConfig::new(1));
    let (callee, callee_ref) = always_classified_callee();
    let caller = method_with(vec![], 0, 0);
    let caller_context: Context<(), AbstractValue> = Context::Base(());

    let receiver_values = vec![Some(AbstractValue::Str("obj")), None];
    let ctx = selector.get_calling_context(
        &caller,
        &caller_context,
        CallSiteRef(0),
        &callee_ref,
        &callee,
        &receiver_values,
    );

    match ctx {
        Context::PropName { key, .. } => assert_eq!(key, AbstractValue::Undefined),
        other => panic!("expected PropName, got {other:?}"),
    }
}

/// A callee with too few receiver abstract values to reach the distinguishing slot, and a caller
/// not itself marked, falls back to the unrefined base context.
#[test]
fn context_falls_back_to_base_when_slot_absent_and_caller_unmarked() {
    let selector = PropNameContextSelector::new(UnitBase, Hierarchy, ContextSelectorConfig::new(1));
    let (callee, callee_ref) = always_classified_callee();
    let caller = method_with(vec![], 0, 0);
    let caller_context: Context<(), AbstractValue> = Context::Base(());

    let receiver_values = vec![Some(AbstractValue::Str("obj"))];
    let ctx = selector.get_calling_context(
        &caller,
        &caller_context,
        CallSiteRef(0),
        &callee_ref,
        &callee,
        &receiver_values,
    );

    assert!(matches!(ctx, Context::Base(())));
}
