use crate::{
    ast::{Command, ForArg, Program},
    interpreter::{
        evaluator::core::{Context, EvalResult, Flow},
        value::core::Scalar,
    },
};

impl Context {
    /// Executes a `for` command.
    ///
    /// With no sweep header the body repeats until it quits. With a
    /// header, the comma-listed sweeps run in order: a single expression
    /// assigns once and runs the body once, `start:step` counts without a
    /// bound, and `start:step:limit` checks the bound *before* each
    /// iteration, in the direction of the step. The three sweep
    /// expressions are evaluated once, when their sweep begins.
    ///
    /// A `Quit` from the body ends the whole loop, sweeps and all, and
    /// the loop itself reports `Continue` to the enclosing block. Frames
    /// pushed by `new` inside the body are released after every
    /// iteration.
    ///
    /// # Parameters
    /// - `program`: The program tree.
    /// - `sweep`: The parsed `var=...` header, if any.
    /// - `body`: The in-line loop body.
    ///
    /// # Returns
    /// The control-flow result for the enclosing block.
    pub(crate) fn exec_for(&mut self,
                           program: &Program,
                           sweep: Option<&ForArg>,
                           body: &[Command])
                           -> EvalResult<Flow> {
        let Some(sweep) = sweep else {
            loop {
                match self.run_iteration(program, body)? {
                    Flow::Continue => {},
                    Flow::Quit => return Ok(Flow::Continue),
                    Flow::Halt => return Ok(Flow::Halt),
                }
            }
        };

        for parameter in &sweep.parameters {
            let start = self.eval_expr(program, &parameter.start)?;

            let Some(step) = &parameter.step else {
                // Single expression: one assignment, one pass, and the
                // value keeps its string form.
                let reference = self.resolve(program, &sweep.variable, true)?;
                self.write_reference(&reference, start);
                match self.run_iteration(program, body)? {
                    Flow::Continue => continue,
                    Flow::Quit => return Ok(Flow::Continue),
                    Flow::Halt => return Ok(Flow::Halt),
                }
            };

            let step = self.eval_expr(program, step)?.as_number();
            let limit = match &parameter.limit {
                Some(expr) => Some(self.eval_expr(program, expr)?.as_number()),
                None => None,
            };

            let mut value = start.as_number();
            loop {
                if let Some(limit) = limit {
                    let past = if step >= 0.0 { value > limit } else { value < limit };
                    if past {
                        break;
                    }
                }

                let reference = self.resolve(program, &sweep.variable, true)?;
                self.write_reference(&reference, Scalar::Number(value));

                match self.run_iteration(program, body)? {
                    Flow::Continue => {},
                    Flow::Quit => return Ok(Flow::Continue),
                    Flow::Halt => return Ok(Flow::Halt),
                }

                value += step;
            }
        }

        Ok(Flow::Continue)
    }

    /// Runs the body once, releasing any frames it pushed.
    fn run_iteration(&mut self, program: &Program, body: &[Command]) -> EvalResult<Flow> {
        let depth = self.env_stack.len();
        let flow = self.exec_commands(program, body);
        self.env_stack.truncate(depth.max(1));
        flow
    }
}
