use crate::interpreter::value::{
    core::{Kind, KindSet},
    unit::Unit,
};

#[derive(Debug, Clone, PartialEq)]
/// Represents all errors that can occur during evaluation and execution.
pub enum RuntimeError {
    /// A builtin received a value of a kind it does not accept.
    TypeError {
        /// Name or symbol of the builtin.
        function: String,
        /// One-based argument position.
        position: usize,
        /// Kinds accepted at that position.
        expected: KindSet,
        /// Kind that was supplied.
        found:    Kind,
    },
    /// Two quantities with incompatible physical units were combined.
    UnitMismatch {
        /// Operation that was attempted.
        operation: &'static str,
        /// Unit of the left operand.
        left:      Unit,
        /// Unit of the right operand.
        right:     Unit,
    },
    /// A vector or string index outside the valid range.
    IndexOutOfBounds {
        /// Largest valid index.
        max:   usize,
        /// Index that was requested.
        found: usize,
    },
    /// An argument, local or global slot that does not exist in the frame.
    InvalidSlot {
        /// What kind of slot was addressed.
        kind:  &'static str,
        /// The slot index.
        index: usize,
    },
    /// A call to a function that has been deleted since the tree was built.
    DeletedFunction {
        /// Registry index of the function.
        id: usize,
    },
    /// A reference to a global variable that has been deleted.
    DeletedVariable {
        /// Registry index of the variable.
        slot: usize,
    },
    /// A late-bound call naming no builtin or custom function.
    UnknownFunction {
        /// The name that was looked up.
        name: String,
    },
    /// A registry lookup for a variable that does not exist.
    UnknownVariable {
        /// The name that was looked up.
        name: String,
    },
    /// A function or closure called with the wrong number of arguments.
    ArgumentCountMismatch {
        /// Name of the callee.
        name:     String,
        /// Number of parameters it declares.
        expected: usize,
        /// Number of arguments supplied.
        found:    usize,
    },
    /// Division or modulo by exact zero.
    DivisionByZero,
    /// A single loop exceeded the configured iteration cap.
    InfiniteLoop {
        /// The cap that was hit.
        limit: usize,
    },
    /// `break` or `continue` escaped a function body.
    IllegalLoopControl,
    /// An `else` executed without a preceding `if`.
    DanglingElse,
    /// Storage for a vector could not be reserved.
    AllocationFailed {
        /// Number of cells requested.
        cells: usize,
    },
    /// The differentiator met a construct it cannot differentiate.
    NotDifferentiable {
        /// Description of the construct.
        what: String,
    },
    /// An argument was invalid or out of range.
    InvalidArgument {
        /// Details about why the argument is invalid.
        details: String,
    },
    /// Matrix operands with incompatible shapes.
    ShapeMismatch {
        /// Details about the shapes involved.
        details: String,
    },
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TypeError { function,
                              position,
                              expected,
                              found, } => write!(f,
                                                 "Type error: '{function}' expects {expected} for argument {position}, but found {found}."),
            Self::UnitMismatch { operation, left, right } => write!(f,
                                                                    "Unit mismatch: cannot {operation} [{left}] and [{right}]."),
            Self::IndexOutOfBounds { max, found } => write!(f,
                                                            "Index out of bounds. Maximum is {max}, but found {found} instead."),
            Self::InvalidSlot { kind, index } => write!(f, "Invalid {kind} slot {index}."),
            Self::DeletedFunction { id } => {
                write!(f, "Function #{id} has been deleted.")
            },
            Self::DeletedVariable { slot } => {
                write!(f, "Variable #{slot} has been deleted.")
            },
            Self::UnknownFunction { name } => write!(f, "Unknown function '{name}'."),
            Self::UnknownVariable { name } => write!(f, "Unknown variable '{name}'."),
            Self::ArgumentCountMismatch { name, expected, found } => write!(f,
                                                                            "'{name}' expects {expected} argument(s), but got {found}."),
            Self::DivisionByZero => write!(f, "Division by zero."),
            Self::InfiniteLoop { limit } => write!(f,
                                                   "infinite loop detected (more than {limit} iterations)."),
            Self::IllegalLoopControl => {
                write!(f, "'break' or 'continue' escaped its function body.")
            },
            Self::DanglingElse => write!(f, "'else' without a preceding 'if'."),
            Self::AllocationFailed { cells } => {
                write!(f, "Could not allocate a vector of {cells} cells.")
            },
            Self::NotDifferentiable { what } => write!(f, "Cannot differentiate {what}."),
            Self::InvalidArgument { details } => write!(f, "Invalid argument: {details}."),
            Self::ShapeMismatch { details } => write!(f, "Shape mismatch: {details}."),
        }
    }
}

impl std::error::Error for RuntimeError {}
