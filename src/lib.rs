//! # mumble
//!
//! mumble is an interpreter for a small dynamically-typed procedural
//! language derived from the MUMPS/M family. It parses column-significant
//! source — tag lines at column zero, dot-indented blocks, whitespace as the
//! statement separator, commands matched by abbreviation — and executes it
//! against an in-memory store of sparse, ordered, string-keyed trees,
//! producing a linear text output and a list of diagnostics.

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

/// Defines the structure of parsed code.
///
/// This module declares the [`ast::Program`] tree the parser builds and the
/// evaluator walks: a flat command sequence, a tag table, per-command
/// argument forms, and precedence-free expressions. Nodes carry their source
/// positions for error reporting.
///
/// # Responsibilities
/// - Defines command and expression types for all language constructs.
/// - Keeps tag bodies addressable by index so fall-through works.
/// - Attaches 0-indexed line and column to every node.
pub mod ast;
/// Provides unified error types for parsing and evaluation.
///
/// This module defines all errors that can be raised while tokenizing,
/// parsing, or executing code, and the flat [`error::Diagnostic`] record
/// they are reported as. Every error carries the 0-indexed position of the
/// offending token.
///
/// # Responsibilities
/// - Defines error enums for all failure modes (lexer, parser, evaluator).
/// - Converts them into position-tagged diagnostics.
/// - Supports integration with standard error handling traits.
pub mod error;
/// Orchestrates the entire process of code execution.
///
/// This module ties together the lexer, parser, evaluator, and value
/// representations to provide a complete runtime. The pipeline is
/// error-accumulating: lexical and parse problems are collected while work
/// continues, and a runtime problem ends execution with the partial output
/// preserved.
///
/// # Responsibilities
/// - Coordinates all core components: lexer, parser, evaluator, values.
/// - Provides the [`Context`] entry point for evaluating source text.
/// - Manages the flow of data and errors between phases.
pub mod interpreter;
/// General utilities for numeric coercion.
///
/// This module provides the longest-prefix string-to-number rule and the
/// canonical number-to-string rendering that the whole language leans on.
///
/// # Responsibilities
/// - Converts between strings and doubles without panicking on any input.
/// - Decides which keys collate numerically.
pub mod util;

pub use error::Diagnostic;
pub use interpreter::evaluator::core::{Context, Evaluation};
pub use interpreter::value::core::{MValue, Scalar};

/// Evaluates a source text in a fresh context.
///
/// This is the one-call entry point: it tokenizes, parses, and executes the
/// program, returning the accumulated output and every diagnostic found
/// along the way. It never panics, whatever the input. Use a [`Context`]
/// directly to register host functions or to seed `$RANDOM`.
///
/// # Examples
/// ```
/// use mumble::evaluate;
///
/// let result = evaluate(" w \"total: \",3+4*3");
/// assert!(result.errors.is_empty());
/// assert_eq!(result.output, "total: 21");
///
/// // A runtime error keeps the output produced before it.
/// let result = evaluate(" w \"a\" w 1/0");
/// assert_eq!(result.output, "a");
/// assert_eq!(result.errors.len(), 1);
/// ```
#[must_use]
pub fn evaluate(source: &str) -> Evaluation {
    let mut context = Context::new();
    context.evaluate(source)
}
