use crate::{
    ast::{Program, Variable},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::{ArrayNode, MValue, Scalar},
    },
};

/// Indirect-reference chains longer than this are treated as cycles.
const MAX_REFERENCE_HOPS: usize = 16;

/// A resolved l-value: a frame slot plus the subscript path below it.
///
/// References are short-lived handles. The subscript expressions are
/// evaluated once, at resolution time, but the slot itself is re-walked at
/// each use, so a reference is computed, used immediately, and discarded —
/// never stored across commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// The environment frame owning the base slot.
    pub frame: usize,
    /// The base name, with any indirection already followed.
    pub name:  String,
    /// The evaluated subscript keys, outermost first.
    pub path:  Vec<String>,
}

impl Context {
    /// Resolves a variable to a reference.
    ///
    /// The frame stack is scanned from the top; the first frame containing
    /// the name wins, and a slot holding an indirect reference redirects
    /// the resolution to the slot it names. A name found nowhere resolves
    /// to the global frame. Subscripts are evaluated left to right into
    /// string keys.
    ///
    /// # Parameters
    /// - `program`: The program tree, for calls inside subscripts.
    /// - `variable`: The variable as parsed.
    /// - `can_create`: Whether the reference is for writing. Empty
    ///   subscript keys are rejected on the write path; the store never
    ///   holds an empty key.
    ///
    /// # Returns
    /// The resolved [`Reference`].
    pub(crate) fn resolve(&mut self,
                          program: &Program,
                          variable: &Variable,
                          can_create: bool)
                          -> EvalResult<Reference> {
        let (frame, name) = self.locate(&variable.name, variable.line, variable.column)?;

        let mut path = Vec::with_capacity(variable.subscripts.len());
        for subscript in &variable.subscripts {
            let key = self.eval_expr(program, subscript)?.as_text();
            if can_create && key.is_empty() {
                return Err(RuntimeError::EmptySubscript { line:   variable.line,
                                                          column: variable.column });
            }
            path.push(key);
        }

        Ok(Reference { frame, name, path })
    }

    /// Finds the frame and final name for a base identifier, following
    /// indirection.
    fn locate(&self, name: &str, line: usize, column: usize) -> EvalResult<(usize, String)> {
        let Some(found) = (0..self.env_stack.len()).rev()
                                                   .find(|index| {
                                                       self.env_stack[*index].contains_key(name)
                                                   })
        else {
            return Ok((0, name.to_owned()));
        };

        let mut frame = found;
        let mut name = name.to_owned();
        let mut hops = 0;
        while let Some(MValue::Indirect { frame: target_frame,
                                          name: target_name, }) =
            self.env_stack.get(frame).and_then(|env| env.get(&name))
        {
            hops += 1;
            if hops > MAX_REFERENCE_HOPS {
                return Err(RuntimeError::ReferenceLoop { line, column });
            }
            frame = *target_frame;
            name = target_name.clone();
        }

        Ok((frame, name))
    }

    /// Reads through a reference. Missing slots, missing tree levels, and
    /// descents into plain scalars all yield the empty string; an array
    /// node yields its self-value.
    pub(crate) fn read_reference(&self, reference: &Reference) -> Scalar {
        let Some(slot) = self.env_stack
                             .get(reference.frame)
                             .and_then(|env| env.get(&reference.name))
        else {
            return Scalar::empty();
        };

        match slot {
            MValue::Scalar(scalar) => {
                if reference.path.is_empty() {
                    scalar.clone()
                } else {
                    Scalar::empty()
                }
            },
            MValue::Array(_) => self.read_node(reference)
                                    .and_then(|node| node.value.clone())
                                    .unwrap_or_default(),
            MValue::Indirect { .. } => Scalar::empty(),
        }
    }

    /// Walks a reference down to its array node, without creating
    /// anything.
    pub(crate) fn read_node(&self, reference: &Reference) -> Option<&ArrayNode> {
        let slot = self.env_stack
                       .get(reference.frame)
                       .and_then(|env| env.get(&reference.name))?;
        let MValue::Array(node) = slot else {
            return None;
        };
        let mut node = node;
        for key in &reference.path {
            node = node.child(key)?;
        }
        Some(node)
    }

    /// Writes a scalar through a reference, creating whatever the path
    /// needs.
    ///
    /// A subscripted write onto a slot currently holding a scalar promotes
    /// it to an array node that keeps the scalar as its self-value; absent
    /// intermediate levels spring into existence empty.
    pub(crate) fn write_reference(&mut self, reference: &Reference, value: Scalar) {
        let frame = if reference.frame < self.env_stack.len() {
            reference.frame
        } else {
            0
        };
        let env = &mut self.env_stack[frame];

        if reference.path.is_empty() {
            env.insert(reference.name.clone(), MValue::Scalar(value));
            return;
        }

        let slot = env.entry(reference.name.clone())
                      .or_insert_with(|| MValue::Array(ArrayNode::new()));
        let mut node = promote_slot(slot);
        for key in &reference.path {
            node = node.ensure_child(key);
        }
        node.value = Some(value);
    }

    /// Walks a reference to its node for writing, promoting and creating
    /// along the way. Used by `merge`, whose destination must be a node
    /// even before anything is copied into it.
    pub(crate) fn ensure_node(&mut self, reference: &Reference) -> &mut ArrayNode {
        let frame = if reference.frame < self.env_stack.len() {
            reference.frame
        } else {
            0
        };
        let env = &mut self.env_stack[frame];

        let slot = env.entry(reference.name.clone())
                      .or_insert_with(|| MValue::Array(ArrayNode::new()));
        let mut node = promote_slot(slot);
        for key in &reference.path {
            node = node.ensure_child(key);
        }
        node
    }

    /// Deletes the slot a reference addresses. An unsubscripted reference
    /// removes the name from its frame; a subscripted one removes the
    /// keyed child including its whole subtree.
    pub(crate) fn kill_reference(&mut self, reference: &Reference) {
        let Some(env) = self.env_stack.get_mut(reference.frame) else {
            return;
        };

        let Some((last, parents)) = reference.path.split_last() else {
            env.remove(&reference.name);
            return;
        };

        let Some(MValue::Array(node)) = env.get_mut(&reference.name) else {
            return;
        };
        let mut node = node;
        for key in parents {
            let Some(child) = node.child_mut(key) else {
                return;
            };
            node = child;
        }
        node.remove_child(last);
    }

    /// Executes `merge target=source`: a deep copy of every subtree under
    /// the source into the destination.
    ///
    /// The two sides may share a root name only if neither subscript path
    /// is a prefix of the other; merging a tree into itself is rejected.
    pub(crate) fn exec_merge(&mut self,
                             program: &Program,
                             target: &Variable,
                             source: &Variable,
                             line: usize,
                             column: usize)
                             -> EvalResult<()> {
        let target_ref = self.resolve(program, target, true)?;
        let source_ref = self.resolve(program, source, false)?;

        if target_ref.frame == source_ref.frame && target_ref.name == source_ref.name {
            let prefix = target_ref.path.len().min(source_ref.path.len());
            if target_ref.path[..prefix] == source_ref.path[..prefix] {
                return Err(RuntimeError::OverlappingMerge { line, column });
            }
        }

        let Some(source_node) = self.read_node(&source_ref).filter(|node| node.has_children())
        else {
            return Ok(());
        };
        let source_node = source_node.clone();

        self.ensure_node(&target_ref).merge_from(&source_node);
        Ok(())
    }
}

/// Turns a slot into an array node in place, keeping a scalar's value as the
/// node's self-value, and returns the node.
fn promote_slot(slot: &mut MValue) -> &mut ArrayNode {
    if !matches!(slot, MValue::Array(_)) {
        let promoted = match &*slot {
            MValue::Scalar(scalar) => ArrayNode::from_scalar(scalar.clone()),
            _ => ArrayNode::new(),
        };
        *slot = MValue::Array(promoted);
    }
    match slot {
        MValue::Array(node) => node,
        _ => unreachable!("slot was just promoted"),
    }
}
