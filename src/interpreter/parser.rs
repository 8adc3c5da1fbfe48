/// Core expression parsing.
///
/// Cuts text into sections, converts them into nodes and folds the flat list
/// by implicit multiplication and operator precedence.
pub mod core;

/// Section conversion.
///
/// Builds the node for each kind of section: names, calls, groups, vectors,
/// strings and anonymous functions.
pub mod section;

/// Numeric literal parsing in an arbitrary base.
pub mod number;

/// Code block parsing.
///
/// Parses statement lists with conditionals, loops, assignments and returns
/// into [`CodeBlock`](crate::ast::CodeBlock)s.
pub mod block;

/// Small text helpers shared by the parser.
pub mod utils;
