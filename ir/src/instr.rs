use std::fmt;
use std::rc::Rc;

use smallvec::SmallVec;

use crate::value::{BlockId, ValueNumber};

/// Identifies an exception type by name.
///
/// The host symbol table is the authority on type identity; this crate only needs enough of it
/// to recognize the well-known `NullPointerException` type and to perform set subtraction against
/// caller-supplied "ignored exception" sets.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ExceptionType(Rc<str>);

impl ExceptionType {
    pub fn new(name: impl Into<Rc<str>>) -> Self {
        Self(name.into())
    }

    /// The synthetic exception type raised by dereferencing a null reference.
    pub fn null_pointer_exception() -> Self {
        Self::new("NullPointerException")
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ExceptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ExceptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The set of exception types an instruction is declared to potentially raise.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExceptionSet(SmallVec<[ExceptionType; 2]>);

impl ExceptionSet {
    pub fn empty() -> Self {
        Self(SmallVec::new())
    }

    pub fn just(ty: ExceptionType) -> Self {
        let mut set = SmallVec::new();
        set.push(ty);
        Self(set)
    }

    pub fn from_iter(iter: impl IntoIterator<Item = ExceptionType>) -> Self {
        let mut set = SmallVec::new();
        for ty in iter {
            if !set.contains(&ty) {
                set.push(ty);
            }
        }
        Self(set)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, ty: &ExceptionType) -> bool {
        self.0.contains(ty)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExceptionType> {
        self.0.iter()
    }

    /// The set minus `ignored`.
    pub fn subtracting(&self, ignored: &ExceptionSet) -> ExceptionSet {
        ExceptionSet::from_iter(self.0.iter().filter(|ty| !ignored.contains(ty)).cloned())
    }

    /// Whether this set is exactly `{NullPointerException}`.
    pub fn is_exactly_null_pointer_exception(&self) -> bool {
        self.0.len() == 1 && self.0[0] == ExceptionType::null_pointer_exception()
    }
}

/// Identity of a method, used as a call-graph node and as a key into the Core B frequency cache.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct MethodRef(Rc<str>);

impl MethodRef {
    pub fn new(signature: impl Into<Rc<str>>) -> Self {
        Self(signature.into())
    }

    pub fn signature(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for MethodRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for MethodRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of an invocation site, distinct from the instruction that encodes it so that Core B
/// can refer to call sites without depending on `Instruction`'s shape.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct CallSiteRef(pub u32);

/// A guarded refinement produced by a `v == null` / `v != null` branch, consumed by a π-node at
/// the head of one of the branch's successor blocks.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct PiGuard {
    /// The predecessor block from which this refinement applies. On edges from any other
    /// predecessor, the π-node simply inherits the source value's state unrefined.
    pub guarded_edge_from: BlockId,
    /// Whether, along `guarded_edge_from -> this block`, the guarded value is known to be
    /// null or known to be non-null.
    pub refines_to_null: bool,
}

/// A single SSA instruction.
///
/// This is a tagged sum over every instruction kind the two analysis cores need to reason about;
/// it is not a general-purpose bytecode. Kinds irrelevant to both cores (arithmetic, returns,
/// unconditional jumps, local variable reads of non-reference values, ...) are represented by
/// [`Instruction::Other`] so that callers can still enumerate a method body without the crate
/// needing to model operations neither core inspects.
#[derive(Clone, Debug)]
pub enum Instruction {
    /// Allocates a new, definitely non-null object. Still a PEI: allocation can fail with a
    /// linkage or out-of-memory error, which is why it carries a declared exception set even
    /// though it has no reference operand to test for nullness.
    New {
        def: ValueNumber,
        declared_exceptions: ExceptionSet,
    },
    /// Reads an instance field: `def = object.field`.
    GetField {
        def: ValueNumber,
        object: ValueNumber,
        declared_exceptions: ExceptionSet,
    },
    /// Writes an instance field: `object.field = value`.
    PutField {
        object: ValueNumber,
        value: ValueNumber,
        declared_exceptions: ExceptionSet,
    },
    /// Reads an array's length.
    ArrayLength {
        def: ValueNumber,
        array: ValueNumber,
        declared_exceptions: ExceptionSet,
    },
    /// Reads an array element: `def = array[index]`.
    ArrayLoad {
        def: ValueNumber,
        array: ValueNumber,
        index: ValueNumber,
        declared_exceptions: ExceptionSet,
    },
    /// Writes an array element: `array[index] = value`.
    ArrayStore {
        array: ValueNumber,
        index: ValueNumber,
        value: ValueNumber,
        declared_exceptions: ExceptionSet,
    },
    /// A static invocation (or object construction handled as invocation): no receiver to test
    /// for nullness.
    InvokeStatic {
        def: Option<ValueNumber>,
        callee: MethodRef,
        call_site: CallSiteRef,
        args: SmallVec<[ValueNumber; 4]>,
        declared_exceptions: ExceptionSet,
    },
    /// An instance invocation: `def = receiver.callee(args)`.
    InvokeInstance {
        def: Option<ValueNumber>,
        receiver: ValueNumber,
        callee: MethodRef,
        call_site: CallSiteRef,
        args: SmallVec<[ValueNumber; 4]>,
        declared_exceptions: ExceptionSet,
    },
    /// Enters a monitor (`synchronized (object) { .. }`).
    MonitorEnter {
        object: ValueNumber,
        declared_exceptions: ExceptionSet,
    },
    /// Exits a monitor.
    MonitorExit {
        object: ValueNumber,
        declared_exceptions: ExceptionSet,
    },
    /// Raises `exception`. Throwing a null reference raises `NullPointerException`, which is why
    /// this carries a declared-exceptions set like any other PEI rather than being hardcoded.
    Throw {
        exception: ValueNumber,
        declared_exceptions: ExceptionSet,
    },
    /// `def = (T) source`, inheriting the source's null-state.
    CheckCast { def: ValueNumber, source: ValueNumber },
    /// An SSA φ-node: `def = phi(incoming...)`.
    Phi {
        def: ValueNumber,
        incoming: SmallVec<[(BlockId, ValueNumber); 4]>,
    },
    /// An SSA π-node: `def` is a refined copy of `source`, valid because control reached this
    /// block via a specific guarded edge.
    Pi {
        def: ValueNumber,
        source: ValueNumber,
        guard: PiGuard,
    },
    /// Terminates a block by comparing `value` to the null literal.
    NullCheckBranch {
        value: ValueNumber,
        /// Successor taken when `value == null`.
        null_successor: BlockId,
        /// Successor taken when `value != null`.
        non_null_successor: BlockId,
    },
    /// Reads a statically-named property: `def = object.name`. Distinct from [`ReflectiveGet`]
    /// because it does not use a computed key and is therefore irrelevant to Core B's classifier.
    ///
    /// [`ReflectiveGet`]: Instruction::ReflectiveGet
    Get { def: ValueNumber, object: ValueNumber },
    /// Reads a dynamically-computed property: `def = object[key]`.
    ReflectiveGet {
        def: ValueNumber,
        object: ValueNumber,
        key: ValueNumber,
    },
    /// Writes a dynamically-computed property: `object[key] = value`.
    ReflectivePut {
        object: ValueNumber,
        key: ValueNumber,
        value: ValueNumber,
    },
    /// Tests whether `key` names an existing property of `object`: `def = key in object`.
    IsDefinedIn {
        def: ValueNumber,
        object: ValueNumber,
        key: ValueNumber,
    },
    /// Any instruction kind neither core needs to inspect individually (arithmetic, returns,
    /// unconditional branches, constant materialization of non-reference types, ...).
    Other,
}

impl Instruction {
    /// The value this instruction defines, if any.
    pub fn defined_value(&self) -> Option<ValueNumber> {
        match self {
            Instruction::New { def, .. }
            | Instruction::GetField { def, .. }
            | Instruction::ArrayLength { def, .. }
            | Instruction::ArrayLoad { def, .. }
            | Instruction::CheckCast { def, .. }
            | Instruction::Phi { def, .. }
            | Instruction::Pi { def, .. }
            | Instruction::Get { def, .. }
            | Instruction::ReflectiveGet { def, .. }
            | Instruction::IsDefinedIn { def, .. } => Some(*def),
            Instruction::InvokeStatic { def, .. } | Instruction::InvokeInstance { def, .. } => {
                *def
            }
            _ => None,
        }
    }
}
