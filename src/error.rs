/// Parsing errors.
///
/// Defines all error types that can occur while sectionizing and building a
/// tree from text, including the static checks on code blocks. Every parse
/// error carries the byte offset where it was detected.
pub mod parse_error;
/// Runtime errors.
///
/// Contains all error types that can be raised during evaluation and execution:
/// type and unit mismatches, stale registry references, runaway loops and
/// failed allocations.
pub mod runtime_error;

pub use parse_error::ParseError;
pub use runtime_error::RuntimeError;

/// Any error produced by the interpreter's entry points.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The text could not be turned into a tree.
    Parse(ParseError),
    /// The tree could not be evaluated.
    Runtime(RuntimeError),
}

impl From<ParseError> for Error {
    fn from(error: ParseError) -> Self {
        Self::Parse(error)
    }
}

impl From<RuntimeError> for Error {
    fn from(error: RuntimeError) -> Self {
        Self::Runtime(error)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(e) => e.fmt(f),
            Self::Runtime(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(e) => Some(e),
            Self::Runtime(e) => Some(e),
        }
    }
}
