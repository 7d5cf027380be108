use crate::{
    ast::{CallArg, Program, TagDef},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, Env, EvalResult},
        value::core::{MValue, Scalar},
    },
};

impl Context {
    /// Calls a tag or host function.
    ///
    /// Arguments are evaluated in the caller's environment: plain
    /// arguments to scalars, `.name` arguments to indirect references
    /// into the caller's frames. Program tags are looked up first, then
    /// host functions; a name known to neither is a runtime error.
    ///
    /// # Parameters
    /// - `program`: The program tree.
    /// - `name`: The callee name.
    /// - `arguments`: The call arguments as parsed.
    /// - `want_return`: Whether the call site expects a value (`$$`
    ///   rather than `do`).
    /// - `line`: Line number for error reporting.
    /// - `column`: Column number for error reporting.
    ///
    /// # Returns
    /// The returned scalar, when the callee produced one and the site
    /// wanted one.
    pub(crate) fn call_tag(&mut self,
                           program: &Program,
                           name: &str,
                           arguments: &[CallArg],
                           want_return: bool,
                           line: usize,
                           column: usize)
                           -> EvalResult<Option<Scalar>> {
        let mut values = Vec::with_capacity(arguments.len());
        for argument in arguments {
            match argument {
                CallArg::Value(expr) => {
                    values.push(MValue::Scalar(self.eval_expr(program, expr)?));
                },
                CallArg::ByReference(target) => {
                    values.push(self.reference_argument(target, line, column)?);
                },
            }
        }

        if let Some(tag) = program.tags.get(name) {
            return self.run_tag(program, tag, values, want_return, line, column);
        }

        if let Some(host) = self.hosts.get(name) {
            let resolved: Vec<MValue> = values.iter().map(|value| self.deref_value(value)).collect();
            return Ok(host(&resolved));
        }

        Err(RuntimeError::UnknownTag { name: name.to_owned(),
                                       line,
                                       column })
    }

    /// Builds the indirect-reference value for a `.name` argument.
    ///
    /// The named variable must already exist in some frame. When the
    /// caller's slot is itself an indirect reference (a by-reference
    /// parameter being passed on), the new value points at the original
    /// slot rather than chaining through the intermediate frame.
    fn reference_argument(&self, name: &str, line: usize, column: usize) -> EvalResult<MValue> {
        for index in (0..self.env_stack.len()).rev() {
            match self.env_stack[index].get(name) {
                Some(MValue::Indirect { frame, name: target }) => {
                    return Ok(MValue::Indirect { frame: *frame,
                                                 name:  target.clone(), });
                },
                Some(_) => {
                    return Ok(MValue::Indirect { frame: index,
                                                 name:  name.to_owned(), });
                },
                None => {},
            }
        }

        Err(RuntimeError::MissingReference { name: name.to_owned(),
                                             line,
                                             column })
    }

    /// Follows an indirect value to what it currently holds, for handing
    /// to a host function.
    fn deref_value(&self, value: &MValue) -> MValue {
        match value {
            MValue::Indirect { frame, name } => self.env_stack
                                                    .get(*frame)
                                                    .and_then(|env| env.get(name))
                                                    .cloned()
                                                    .unwrap_or(MValue::Scalar(Scalar::empty())),
            other => other.clone(),
        }
    }

    /// Runs a program tag.
    ///
    /// A tag that declares a parameter list gets a fresh frame binding
    /// each parameter to its positional argument (missing ones to `""`,
    /// extras discarded); a tag without one runs in the caller's scope.
    /// Execution proceeds from the tag's index until it falls off the end
    /// of the program or a `quit` unwinds it, and any frames pushed while
    /// it ran are released on every exit path. The return value, if the
    /// body left one on the value stack, is collected only when the call
    /// site asked for it.
    fn run_tag(&mut self,
               program: &Program,
               tag: &TagDef,
               values: Vec<MValue>,
               want_return: bool,
               line: usize,
               column: usize)
               -> EvalResult<Option<Scalar>> {
        self.enter_call(line, column)?;
        let env_depth = self.env_stack.len();
        let stack_depth = self.value_stack.len();

        if let Some(params) = &tag.params {
            let mut frame = Env::new();
            let mut values = values.into_iter();
            for param in params {
                let value = values.next().unwrap_or(MValue::Scalar(Scalar::empty()));
                frame.insert(param.clone(), value);
            }
            self.env_stack.push(frame);
        }

        let flow = self.exec_from(program, tag.index);

        self.env_stack.truncate(env_depth.max(1));
        self.call_depth -= 1;

        flow?;
        let result = if want_return && self.value_stack.len() > stack_depth {
            self.value_stack.pop()
        } else {
            None
        };
        self.value_stack.truncate(stack_depth);

        Ok(result)
    }
}
