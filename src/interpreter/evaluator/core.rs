use std::collections::{BTreeMap, HashMap};

use rand::{SeedableRng, rngs::StdRng};

use crate::{
    ast::{Command, Expr, LiteralValue, Program, TEST_VARIABLE},
    error::{Diagnostic, RuntimeError},
    interpreter::{
        evaluator::{binary::eval_binary, unary::eval_unary},
        lexer::tokenize,
        parser::core::parse,
        value::core::{MValue, Scalar},
    },
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// One environment frame: an ordered mapping from name to slot.
pub type Env = BTreeMap<String, MValue>;

/// A host-provided native function.
///
/// Hosts receive the evaluated argument values (by-reference arguments are
/// dereferenced to their current value) and may return a scalar or nothing.
pub type HostFn = Box<dyn Fn(&[MValue]) -> Option<Scalar>>;

/// Tag calls nested deeper than this raise a runtime error instead of
/// overflowing the native stack.
const MAX_CALL_DEPTH: usize = 128;

/// What executing one command tells the enclosing construct to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Proceed with the next command.
    Continue,
    /// Unwind the innermost block: a `do` block, a `for` iteration, or a
    /// tag body.
    Quit,
    /// Unwind everything and end the program.
    Halt,
}

/// The result of evaluating a source text.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// Everything the program wrote, in order.
    pub output: String,
    /// Every problem found, lexical through runtime, in discovery order.
    pub errors: Vec<Diagnostic>,
}

/// Stores the runtime evaluation context.
///
/// This struct holds the interpreter state: the environment stack (frame 0
/// is the global frame and the home of `$TEST`), the value stack carrying
/// `quit` return values, the output buffer with its column counter, host
/// functions, and the `$RANDOM` generator.
///
/// ## Usage
///
/// A `Context` is created once and can evaluate several sources; host
/// registrations and the random generator survive across runs, while the
/// variable store and output are fresh for each
/// [`evaluate`](Context::evaluate) call.
pub struct Context {
    /// The environment stack; index 0 is the global frame.
    pub env_stack:     Vec<Env>,
    /// Return values left behind by `quit`, collected by tag calls.
    pub value_stack:   Vec<Scalar>,
    pub(crate) output: Vec<String>,
    pub(crate) output_column: usize,
    pub(crate) hosts:  HashMap<String, HostFn>,
    pub(crate) rng:    StdRng,
    pub(crate) halted: bool,
    pub(crate) call_depth: usize,
}

#[allow(clippy::new_without_default)]
impl Context {
    /// Creates a context with an operating-system-seeded random generator.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Creates a context whose `$RANDOM` sequence is reproducible. Tests
    /// use this to pin down programs that draw random numbers.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self { env_stack:     vec![Env::new()],
               value_stack:   Vec::new(),
               output:        Vec::new(),
               output_column: 0,
               hosts:         HashMap::new(),
               rng,
               halted:        false,
               call_depth:    0, }
    }

    /// Registers a native function callable as `$$name(...)` or
    /// `do name(...)`.
    ///
    /// A program tag with the same name shadows the host function.
    pub fn register_host(&mut self,
                         name: impl Into<String>,
                         host: impl Fn(&[MValue]) -> Option<Scalar> + 'static) {
        self.hosts.insert(name.into(), Box::new(host));
    }

    /// Evaluates a source text from scratch.
    ///
    /// The variable store, output, and control state are reset first; host
    /// functions and the random generator carry over. Lexical and parse
    /// errors are accumulated without stopping the pipeline, a runtime
    /// error ends execution, and whatever output was produced up to that
    /// point is returned either way. This function never panics.
    ///
    /// # Parameters
    /// - `source`: The program text.
    ///
    /// # Returns
    /// The [`Evaluation`] with the full output and all diagnostics.
    pub fn evaluate(&mut self, source: &str) -> Evaluation {
        self.reset();

        let (lines, lex_errors) = tokenize(source);
        let (program, parse_errors) = parse(&lines);

        let mut errors: Vec<Diagnostic> = lex_errors.into_iter().map(Into::into).collect();
        errors.extend(parse_errors.into_iter().map(Into::into));

        if let Err(error) = self.exec_from(&program, 0) {
            errors.push(error.into());
        }

        Evaluation { output: self.output.concat(),
                     errors }
    }

    fn reset(&mut self) {
        self.env_stack = vec![Env::new()];
        self.value_stack.clear();
        self.output.clear();
        self.output_column = 0;
        self.halted = false;
        self.call_depth = 0;
    }

    /// Executes the command sequence from `index` until it runs off the
    /// end or a command unwinds.
    pub(crate) fn exec_from(&mut self, program: &Program, index: usize) -> EvalResult<Flow> {
        for command in &program.children[index..] {
            match self.exec_command(program, command)? {
                Flow::Continue => {},
                flow => return Ok(flow),
            }
            if self.halted {
                return Ok(Flow::Halt);
            }
        }
        Ok(Flow::Continue)
    }

    /// Executes an in-line command sequence (an `if`/`else`/`for` body or a
    /// `do` block).
    pub(crate) fn exec_commands(&mut self,
                                program: &Program,
                                commands: &[Command])
                                -> EvalResult<Flow> {
        for command in commands {
            match self.exec_command(program, command)? {
                Flow::Continue => {},
                flow => return Ok(flow),
            }
            if self.halted {
                return Ok(Flow::Halt);
            }
        }
        Ok(Flow::Continue)
    }

    /// Executes a `do` block: a scope whose `new` frames die with it and
    /// whose `Quit` is consumed rather than propagated.
    pub(crate) fn exec_block(&mut self,
                             program: &Program,
                             body: &[Command])
                             -> EvalResult<Flow> {
        let depth = self.env_stack.len();
        let flow = self.exec_commands(program, body);
        self.env_stack.truncate(depth.max(1));

        match flow? {
            Flow::Quit => Ok(Flow::Continue),
            flow => Ok(flow),
        }
    }

    /// Evaluates an expression to a scalar.
    ///
    /// This is the main entry point for expression evaluation. Reads of
    /// missing variables yield the empty string; every operator works on
    /// scalars, coercing between string and number as it needs.
    pub(crate) fn eval_expr(&mut self, program: &Program, expr: &Expr) -> EvalResult<Scalar> {
        match expr {
            Expr::Literal { value, .. } => Ok(match value {
                                                 LiteralValue::Number(n) => Scalar::Number(*n),
                                                 LiteralValue::Text(t) => {
                                                     Scalar::Text(t.clone())
                                                 },
                                             }),
            Expr::Variable(variable) => {
                let reference = self.resolve(program, variable, false)?;
                Ok(self.read_reference(&reference))
            },
            Expr::Unary { op, expr, .. } => {
                let value = self.eval_expr(program, expr)?;
                Ok(eval_unary(*op, &value))
            },
            Expr::Binary { op,
                           left,
                           right,
                           negated,
                           line,
                           column, } => {
                let left = self.eval_expr(program, left)?;
                let right = self.eval_expr(program, right)?;
                let result = eval_binary(*op, &left, &right, *line, *column)?;
                Ok(if *negated {
                       Scalar::from_bool(!result.is_true())
                   } else {
                       result
                   })
            },
            Expr::Call { name,
                         arguments,
                         line,
                         column, } => {
                let value = self.call_tag(program, name, arguments, true, *line, *column)?;
                Ok(value.unwrap_or_default())
            },
            Expr::Builtin { call, line, column } => {
                self.eval_builtin(program, call, *line, *column)
            },
        }
    }

    /// Records the `$TEST` flag in the global frame. `new` never shadows
    /// it; `if` writes it and `else` reads it through this pair.
    pub(crate) fn set_test(&mut self, value: bool) {
        self.env_stack[0].insert(TEST_VARIABLE.to_owned(),
                                 MValue::Scalar(Scalar::from_bool(value)));
    }

    /// Reads the `$TEST` flag from the global frame.
    pub(crate) fn test_flag(&self) -> bool {
        self.env_stack[0]
            .get(TEST_VARIABLE)
            .is_some_and(|slot| slot.as_scalar().is_true())
    }

    /// Appends text to the output, advancing the column counter.
    pub(crate) fn emit(&mut self, text: String) {
        if text.is_empty() {
            return;
        }
        self.output_column = match text.rfind('\n') {
            Some(pos) => text[pos + 1..].chars().count(),
            None => self.output_column + text.chars().count(),
        };
        self.output.push(text);
    }

    /// Emits a newline and restarts the column counter (`write !`).
    pub(crate) fn emit_newline(&mut self) {
        self.output.push("\n".to_owned());
        self.output_column = 0;
    }

    /// Discards all output so far and restarts the column counter
    /// (`write #`).
    pub(crate) fn reset_output(&mut self) {
        self.output.clear();
        self.output_column = 0;
    }

    /// Pads the output with spaces up to the given column; never retracts
    /// (`write ?n`).
    pub(crate) fn pad_to_column(&mut self, target: usize) {
        if target > self.output_column {
            let pad = " ".repeat(target - self.output_column);
            self.emit(pad);
        }
    }

    /// Checks and counts one level of tag-call nesting.
    pub(crate) fn enter_call(&mut self, line: usize, column: usize) -> EvalResult<()> {
        if self.call_depth >= MAX_CALL_DEPTH {
            return Err(RuntimeError::CallDepthExceeded { line, column });
        }
        self.call_depth += 1;
        Ok(())
    }
}
