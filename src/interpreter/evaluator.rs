/// Core evaluation logic and context management.
///
/// Contains the interpreter state, control-flow results, the top-level run
/// loop, and expression evaluation.
pub mod core;

/// Command execution.
///
/// Implements the dispatch from parsed commands to their effects, including
/// the postconditional gate shared by every command.
pub mod command;

/// Binary operator evaluation.
///
/// Implements the scalar semantics of all binary operators: numeric
/// arithmetic, string equality and concatenation, and 1/0 logic.
pub mod binary;

/// Unary operator evaluation.
///
/// Implements logical not and the numeric coercions `+` and `-`.
pub mod unary;

/// Evaluation of `for` loops.
///
/// Runs the argumentless loop and the 1/2/3-expression value sweeps,
/// consuming the `Quit` that ends a loop.
pub mod for_loop;

/// Variable resolution and the reference type.
///
/// Implements the frame-stack scan, indirect-reference following,
/// auto-vivification on write, deletion, and `merge`.
pub mod variable;

/// Function evaluation.
///
/// Handles tag calls, host functions, and the builtin repertoire.
pub mod function;
