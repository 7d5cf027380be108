/// The evaluator module executes the program tree.
///
/// The evaluator walks the parsed command sequence with an environment stack
/// and a value stack, maintaining the sparse ordered variable store, the
/// output buffer, and the diagnostic list. It is the core execution engine of
/// the interpreter.
///
/// # Responsibilities
/// - Executes commands and evaluates expressions, strictly in source order.
/// - Manages environment frames, references, and tag calls.
/// - Reports runtime errors such as unknown tags or overlapping merges.
pub mod evaluator;
/// The lexer module tokenizes source code for further parsing.
///
/// The lexer reads the raw source text line by line and produces a
/// two-dimensional grid of tokens. Unlike most languages, whitespace is kept:
/// it separates commands and arguments, and one space versus two decides
/// whether a command has arguments at all, so the parser consumes it
/// explicitly.
///
/// # Responsibilities
/// - Converts each source line into column-tagged tokens.
/// - Classifies whitespace into leading, separating, and trailing roles.
/// - Reports lexical errors for unterminated strings and stray characters.
pub mod lexer;
/// The parser module builds the program tree from the token grid.
///
/// The parser processes the token lines produced by the lexer and constructs
/// a [`crate::ast::Program`]: a flat command sequence plus a tag table. It
/// owns the column-significant line protocol: tag lines at column zero, body
/// lines behind leading whitespace, and `.` markers tying indented lines to
/// the argumentless `do` that opens their block.
///
/// # Responsibilities
/// - Matches command and builtin names by case-insensitive prefix.
/// - Parses per-command argument grammars and flat left-to-right
///   expressions.
/// - Accumulates errors with source positions, recovering at the next line.
pub mod parser;
/// The value module defines the runtime data types for evaluation.
///
/// This module declares the scalar type (string/number), the sparse ordered
/// array trees, and the collation key that orders their subscripts. It also
/// provides the coercion methods that give the language its string/number
/// polymorphism.
///
/// # Responsibilities
/// - Defines `Scalar`, `MValue`, and `ArrayNode`.
/// - Implements collation-ordered child maps with neighbour queries.
/// - Provides scalar coercions between text, number, and truth value.
pub mod value;
