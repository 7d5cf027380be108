/// Parsing errors.
///
/// Defines all error types that can occur while tokenizing source lines and
/// assembling them into a program tree: unexpected tokens, unknown command or
/// builtin names, arity violations, and indentation mistakes. Parsing keeps
/// going after each of them, resuming at the next line.
pub mod parse_error;
/// Runtime errors.
///
/// Contains all error types that can be raised during execution: unknown
/// tags, invalid builtin arguments, overlapping merges, division by zero, and
/// the defensive guards on recursion and reference chains. A runtime error
/// ends execution; the output produced so far is kept.
pub mod runtime_error;

pub use parse_error::ParseError;
pub use runtime_error::RuntimeError;

/// One reported problem, with its 0-indexed source position.
///
/// Diagnostics are what the evaluator hands back to callers: both parse-time
/// and run-time errors are flattened into this record, in the order they were
/// discovered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 0-indexed source line of the offending token.
    pub line:    usize,
    /// 0-indexed column of the offending token.
    pub column:  usize,
    /// Human-readable description of the problem.
    pub message: String,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}): {}", self.line, self.column, self.message)
    }
}

impl From<ParseError> for Diagnostic {
    fn from(error: ParseError) -> Self {
        let (line, column) = error.position();
        Self { line,
               column,
               message: error.message() }
    }
}

impl From<RuntimeError> for Diagnostic {
    fn from(error: RuntimeError) -> Self {
        let (line, column) = error.position();
        Self { line,
               column,
               message: error.message() }
    }
}
