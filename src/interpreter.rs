/// The builtin table.
///
/// Declares every builtin operator and function together with its name,
/// written form, arity and the value kinds it accepts at each argument
/// position. The tree builder checks arity against it and the evaluator
/// checks kinds.
pub mod builtin;
/// Limits and precision settings.
pub mod config;
/// The `Interpreter` environment and its public entry points.
///
/// Owns the function and variable registries, the unit table, the
/// configuration and the output sink, and ties parsing, evaluation,
/// differentiation and rendering together.
pub mod core;
/// Symbolic differentiation of expression trees.
pub mod derivative;
/// The evaluator module executes trees and code blocks.
///
/// The evaluator walks a tree against a call frame, dispatches builtins
/// through the builtin table, calls custom functions and closures, and runs
/// code blocks with conditionals, loops and early returns.
///
/// # Responsibilities
/// - Evaluates tree nodes, borrowing stored values where it can.
/// - Applies builtins after checking the kind of every argument.
/// - Reports runtime errors such as division by zero or unit mismatches.
pub mod evaluator;
/// The lexer module tokenizes source text for the sectionizer.
///
/// The lexer reads raw text and produces tokens for numbers in the current
/// base, identifiers, strings, operators and brackets.
pub mod lexer;
/// The parser module builds expression trees and code blocks from text.
///
/// The parser cuts text into sections, resolves every name against the
/// current scope and the interpreter's registries, and folds the result by
/// precedence into a [`Tree`](crate::ast::Tree).
///
/// # Responsibilities
/// - Converts sections into tree nodes: literals, slots, calls, vectors and
///   anonymous functions.
/// - Checks builtin and custom function arity while building.
/// - Parses statement blocks and rejects misplaced `else`, `break`,
///   `continue` and `return`.
pub mod parser;
/// Custom function and global variable storage.
pub mod registry;
/// Rendering of trees and code blocks back into source text.
pub mod render;
/// Splits expression text into sections: operands, calls, bracket groups
/// and operator runs.
pub mod sectionizer;
/// The value module defines the runtime data types for evaluation.
///
/// This module declares unit-aware complex numbers, vectors, bignums,
/// strings and closures, the physical unit algebra and the unit name table.
///
/// # Responsibilities
/// - Defines the `Value` enum and all supported value variants.
/// - Implements unit-checked arithmetic on numbers and bignums.
/// - Provides the ordering and truthiness readings used by comparisons and
///   conditions.
pub mod value;

pub use self::core::Interpreter;
