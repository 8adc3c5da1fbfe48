//! # abacus
//!
//! abacus is an embeddable calculator language written in Rust.
//! It parses text into expression trees once and evaluates them many times,
//! with support for complex numbers, physical units, vectors, arbitrary
//! precision, custom functions, closures, control flow and symbolic
//! derivatives.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use crate::interpreter::{Interpreter, config::Config};

/// Defines the structure of parsed code.
///
/// This module declares the `Tree` enum for expressions and the `CodeBlock`
/// and `Action` types for statement lists. Trees are built by the parser
/// and walked by the evaluator, the differentiator and the renderer.
///
/// # Responsibilities
/// - Defines expression nodes with resolved frame and registry slots.
/// - Defines statements and the local scope information of blocks.
/// - Defines stored custom functions.
pub mod ast;
/// Provides unified error types for parsing and evaluation.
///
/// This module defines all errors that can be raised while building trees
/// or evaluating them. Parse errors carry the byte offset where they were
/// detected.
///
/// # Responsibilities
/// - Defines error enums for all failure modes (parser, evaluator).
/// - Wraps both in one `Error` returned by the interpreter's entry points.
/// - Supports integration with standard error handling traits and reporting
///   utilities.
pub mod error;
/// Orchestrates parsing, evaluation and the supporting registries.
///
/// This module ties together lexing, sectionizing, tree building,
/// evaluation, value representations, differentiation and rendering to
/// provide a complete runtime. It exposes the public API through
/// [`Interpreter`].
///
/// # Responsibilities
/// - Coordinates all core components.
/// - Provides entry points for parsing and evaluating text.
/// - Manages custom functions, global variables and units.
pub mod interpreter;
/// General utilities for safe numeric conversion and helpers.
///
/// This module provides conversion routines used throughout the parser and
/// evaluator, converting between integer and floating-point types without
/// silent data loss.
pub mod util;

/// Runs a script and prints its values to standard output.
///
/// Every line that produces a value prints it, unless `pipe_mode` is set,
/// in which case only the last value is printed.
///
/// # Errors
/// Returns the first parse or runtime error; lines before it have already
/// run.
///
/// # Examples
/// ```
/// use abacus::{interpreter::config::Config, run_script};
///
/// let source = "f(x) = x^2 + 1\nf(3)";
/// assert!(run_script(source, Config::default(), true).is_ok());
///
/// // 'y' is not defined
/// assert!(run_script("y + 1", Config::default(), false).is_err());
/// ```
pub fn run_script(source: &str, config: Config, pipe_mode: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut interpreter = Interpreter::new().with_config(config);

    if pipe_mode {
        if let Some(value) = interpreter.execute_script(source)? {
            println!("{}", interpreter.format_value(&value));
        }
    } else {
        interpreter.execute_script_with(source, |env, value| println!("{}", env.format_value(&value)))?;
    }

    Ok(())
}
