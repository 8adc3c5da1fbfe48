#[derive(Debug, Clone, PartialEq, Eq)]
/// Represents all errors that can occur while turning text into a tree.
///
/// Every variant carries the byte offset in the input where the problem was
/// detected.
pub enum ParseError {
    /// A token the tree builder does not know how to start a section with.
    UnexpectedToken {
        /// The offending text.
        token:    String,
        /// Byte offset of the token.
        position: usize,
    },
    /// A bracket group was never closed, or was closed by the wrong bracket.
    BracketMismatch {
        /// Byte offset of the opening bracket.
        position: usize,
    },
    /// There was nothing to parse.
    EmptyExpression {
        /// Byte offset of the empty text.
        position: usize,
    },
    /// A binary operator stands at the start or the end of an expression.
    MissingOperand {
        /// Byte offset of the operator.
        position: usize,
    },
    /// An operator run that does not reduce to a single operator.
    InvalidOperator {
        /// The operator run as written.
        operator: String,
        /// Byte offset of the run.
        position: usize,
    },
    /// A numeric literal with digits outside its base.
    InvalidNumber {
        /// The literal as written.
        text:     String,
        /// Byte offset of the literal.
        position: usize,
    },
    /// An identifier that names nothing in scope.
    UnknownName {
        /// The identifier.
        name:     String,
        /// Byte offset of the identifier.
        position: usize,
    },
    /// An identifier inside a unit group that is not a known unit.
    UnknownUnit {
        /// The identifier.
        name:     String,
        /// Byte offset of the identifier.
        position: usize,
    },
    /// A call whose callee is neither a builtin, a custom function nor a
    /// callable value.
    UnknownFunction {
        /// The callee name.
        name:     String,
        /// Byte offset of the call.
        position: usize,
    },
    /// A call with the wrong number of arguments.
    ArityMismatch {
        /// The callee name.
        name:     String,
        /// Description of the accepted argument counts.
        expected: String,
        /// Number of arguments supplied.
        found:    usize,
        /// Byte offset of the call.
        position: usize,
    },
    /// An anonymous function or definition with a broken parameter list.
    MalformedParameters {
        /// Byte offset of the parameter list.
        position: usize,
    },
    /// The `_<base>` suffix of a square group did not produce a usable base.
    InvalidBase {
        /// Why the base was rejected.
        details:  String,
        /// Byte offset of the base expression.
        position: usize,
    },
    /// The `_<base>` suffix refers to function arguments or locals.
    BaseReferencesFrame {
        /// Byte offset of the base expression.
        position: usize,
    },
    /// `break` outside of a loop body.
    IllegalBreak {
        /// Byte offset of the keyword.
        position: usize,
    },
    /// `continue` outside of a loop body.
    IllegalContinue {
        /// Byte offset of the keyword.
        position: usize,
    },
    /// `else` that does not directly follow an `if`.
    DanglingElse {
        /// Byte offset of the keyword.
        position: usize,
    },
    /// A statement following `return` in the same block.
    StatementAfterReturn {
        /// Byte offset of the statement.
        position: usize,
    },
    /// A keyword, builtin or constant used where a new name is required.
    ReservedName {
        /// The rejected name.
        name:     String,
        /// Byte offset of the name.
        position: usize,
    },
    /// A definition line whose left-hand side is neither `name` nor
    /// `name(params)`.
    InvalidDefinition {
        /// Byte offset of the left-hand side.
        position: usize,
    },
}

impl ParseError {
    /// Byte offset in the input where the error was detected.
    #[must_use]
    pub const fn position(&self) -> usize {
        match self {
            Self::UnexpectedToken { position, .. }
            | Self::BracketMismatch { position }
            | Self::EmptyExpression { position }
            | Self::MissingOperand { position }
            | Self::InvalidOperator { position, .. }
            | Self::InvalidNumber { position, .. }
            | Self::UnknownName { position, .. }
            | Self::UnknownUnit { position, .. }
            | Self::UnknownFunction { position, .. }
            | Self::ArityMismatch { position, .. }
            | Self::MalformedParameters { position }
            | Self::InvalidBase { position, .. }
            | Self::BaseReferencesFrame { position }
            | Self::IllegalBreak { position }
            | Self::IllegalContinue { position }
            | Self::DanglingElse { position }
            | Self::StatementAfterReturn { position }
            | Self::ReservedName { position, .. }
            | Self::InvalidDefinition { position } => *position,
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedToken { token, position } => {
                write!(f, "Error at {position}: Unexpected token '{token}'.")
            },
            Self::BracketMismatch { position } => {
                write!(f, "Error at {position}: Mismatched brackets.")
            },
            Self::EmptyExpression { position } => {
                write!(f, "Error at {position}: Expected an expression.")
            },
            Self::MissingOperand { position } => {
                write!(f, "Error at {position}: Operator is missing an operand.")
            },
            Self::InvalidOperator { operator, position } => {
                write!(f, "Error at {position}: Invalid operator '{operator}'.")
            },
            Self::InvalidNumber { text, position } => {
                write!(f, "Error at {position}: Invalid number '{text}'.")
            },
            Self::UnknownName { name, position } => {
                write!(f, "Error at {position}: Unknown name '{name}'.")
            },
            Self::UnknownUnit { name, position } => {
                write!(f, "Error at {position}: Unknown unit '{name}'.")
            },
            Self::UnknownFunction { name, position } => {
                write!(f, "Error at {position}: Unknown function '{name}'.")
            },
            Self::ArityMismatch { name,
                                  expected,
                                  found,
                                  position, } => write!(f,
                                                        "Error at {position}: '{name}' expects {expected} argument(s), but got {found}."),
            Self::MalformedParameters { position } => {
                write!(f, "Error at {position}: Malformed parameter list.")
            },
            Self::InvalidBase { details, position } => {
                write!(f, "Error at {position}: Invalid base: {details}.")
            },
            Self::BaseReferencesFrame { position } => write!(f,
                                                             "Error at {position}: A base may not refer to arguments or local variables."),
            Self::IllegalBreak { position } => {
                write!(f, "Error at {position}: 'break' outside of a loop.")
            },
            Self::IllegalContinue { position } => {
                write!(f, "Error at {position}: 'continue' outside of a loop.")
            },
            Self::DanglingElse { position } => {
                write!(f, "Error at {position}: 'else' without a preceding 'if'.")
            },
            Self::StatementAfterReturn { position } => {
                write!(f, "Error at {position}: Statement after 'return'.")
            },
            Self::ReservedName { name, position } => {
                write!(f, "Error at {position}: '{name}' is a reserved name.")
            },
            Self::InvalidDefinition { position } => {
                write!(f, "Error at {position}: Invalid definition.")
            },
        }
    }
}

impl std::error::Error for ParseError {}
