use crate::{
    ast::{Assignment, Command, CommandKind, Expr, Program, SetTarget, Variable, WriteArg},
    interpreter::{
        evaluator::core::{Context, Env, EvalResult, Flow},
        value::core::{MValue, Scalar},
    },
};

impl Context {
    /// Executes a single command.
    ///
    /// The postconditional is evaluated first; a false gate skips the
    /// command entirely. Each command maps to one arm here, and the
    /// returned [`Flow`] tells the enclosing construct whether to carry
    /// on, unwind one block, or end the program.
    ///
    /// # Parameters
    /// - `program`: The program tree, needed to resolve tag calls.
    /// - `command`: The command to execute.
    ///
    /// # Returns
    /// The control-flow result of the command.
    pub(crate) fn exec_command(&mut self,
                               program: &Program,
                               command: &Command)
                               -> EvalResult<Flow> {
        if let Some(cond) = &command.cond
           && !self.eval_expr(program, cond)?.is_true()
        {
            return Ok(Flow::Continue);
        }

        match &command.kind {
            CommandKind::Write { args } => self.exec_write(program, args),
            CommandKind::Quit { value } => {
                if let Some(value) = value {
                    let result = self.eval_expr(program, value)?;
                    self.value_stack.push(result);
                }
                Ok(Flow::Quit)
            },
            CommandKind::DoBlock { body } => self.exec_block(program, body),
            CommandKind::DoCall { name, arguments } => {
                self.call_tag(program, name, arguments, false, command.line, command.column)?;
                Ok(if self.halted { Flow::Halt } else { Flow::Continue })
            },
            CommandKind::If { conditions, body } => self.exec_if(program, conditions, body),
            CommandKind::Else { body } => {
                if self.test_flag() {
                    Ok(Flow::Continue)
                } else {
                    self.exec_commands(program, body)
                }
            },
            CommandKind::For { sweep, body } => self.exec_for(program, sweep.as_ref(), body),
            CommandKind::Set { assignments } => {
                for assignment in assignments {
                    self.exec_assignment(program, assignment)?;
                }
                Ok(Flow::Continue)
            },
            CommandKind::New { names } => {
                if !names.is_empty() {
                    let mut frame = Env::new();
                    for name in names {
                        frame.insert(name.clone(), MValue::Scalar(Scalar::empty()));
                    }
                    self.env_stack.push(frame);
                }
                Ok(Flow::Continue)
            },
            CommandKind::Kill { variables } => self.exec_kill(program, variables),
            CommandKind::Merge { target, source } => {
                self.exec_merge(program, target, source, command.line, command.column)?;
                Ok(Flow::Continue)
            },
            CommandKind::Halt => {
                self.halted = true;
                Ok(Flow::Halt)
            },
        }
    }

    /// Executes the arguments of a `write` in order, updating the output
    /// buffer and its column counter.
    fn exec_write(&mut self, program: &Program, args: &[WriteArg]) -> EvalResult<Flow> {
        for arg in args {
            if self.halted {
                break;
            }
            match arg {
                WriteArg::Value(expr) => {
                    let text = self.eval_expr(program, expr)?.as_text();
                    self.emit(text);
                },
                WriteArg::Newline => self.emit_newline(),
                WriteArg::Reset => self.reset_output(),
                WriteArg::Column(expr) => {
                    let target = self.eval_expr(program, expr)?.as_number();
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    let target = if target.is_finite() && target > 0.0 {
                        target.floor() as usize
                    } else {
                        0
                    };
                    self.pad_to_column(target);
                },
            }
        }
        Ok(Flow::Continue)
    }

    /// Executes an `if`: conditions short-circuit left to right, `$TEST`
    /// records the verdict, and the in-line body runs only on success.
    fn exec_if(&mut self,
               program: &Program,
               conditions: &[Expr],
               body: &[Command])
               -> EvalResult<Flow> {
        let mut all = true;
        for condition in conditions {
            if !self.eval_expr(program, condition)?.is_true() {
                all = false;
                break;
            }
        }
        self.set_test(all);

        if all {
            self.exec_commands(program, body)
        } else {
            Ok(Flow::Continue)
        }
    }

    /// Executes one `target=value` pair of a `set`.
    fn exec_assignment(&mut self, program: &Program, assignment: &Assignment) -> EvalResult<()> {
        match &assignment.target {
            SetTarget::Variable(variable) => {
                let value = self.eval_expr(program, &assignment.value)?;
                let reference = self.resolve(program, variable, true)?;
                self.write_reference(&reference, value);
            },
            SetTarget::Extract { variable, start, end } => {
                let value = self.eval_expr(program, &assignment.value)?.as_text();
                let start = match start {
                    Some(expr) => self.eval_expr(program, expr)?.as_number(),
                    None => 1.0,
                };
                let end = match end {
                    Some(expr) => self.eval_expr(program, expr)?.as_number(),
                    None => start,
                };
                let reference = self.resolve(program, variable, true)?;
                let current = self.read_reference(&reference).as_text();
                let spliced = splice(&current, start, end, &value);
                self.write_reference(&reference, Scalar::Text(spliced));
            },
        }
        Ok(())
    }

    /// Executes a `kill`: with no arguments the local store is wiped back
    /// to one fresh global frame, otherwise each addressed slot (and its
    /// subtree) is deleted.
    fn exec_kill(&mut self, program: &Program, variables: &[Variable]) -> EvalResult<Flow> {
        if variables.is_empty() {
            self.env_stack = vec![Env::new()];
            return Ok(Flow::Continue);
        }

        for variable in variables {
            let reference = self.resolve(program, variable, false)?;
            self.kill_reference(&reference);
        }
        Ok(Flow::Continue)
    }
}

/// Splices `replacement` over the 1-based inclusive range `[start, end]` of
/// `current`, with the same clamping as the `$EXTRACT` builtin. An empty
/// (inverted or out-of-range) range inserts at the clamped start position.
fn splice(current: &str, start: f64, end: f64, replacement: &str) -> String {
    let chars: Vec<char> = current.chars().collect();
    let len = chars.len();

    let from = range_floor(start).max(1).min(len as i64 + 1) - 1;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let from = from as usize;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let to = range_floor(end).min(len as i64).max(from as i64) as usize;

    let mut result: String = chars[..from].iter().collect();
    result.push_str(replacement);
    result.extend(&chars[to..]);
    result
}

/// Floors a range bound into `i64` space without overflow surprises.
#[allow(clippy::cast_possible_truncation)]
fn range_floor(value: f64) -> i64 {
    if value.is_nan() {
        return 0;
    }
    value.floor().clamp(-1e15, 1e15) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splice_replaces_an_inner_range() {
        assert_eq!(splice("Hello, world!", 3.0, 5.0, "110"), "He110, world!");
    }

    #[test]
    fn splice_clamps_to_the_string() {
        assert_eq!(splice("abc", 2.0, 99.0, "Z"), "aZ");
        assert_eq!(splice("abc", 0.0, 1.0, "Z"), "Zbc");
        assert_eq!(splice("abc", 99.0, 99.0, "Z"), "abcZ");
    }

    #[test]
    fn splice_with_inverted_range_inserts() {
        assert_eq!(splice("abc", 2.0, 1.0, "Z"), "aZbc");
    }
}
