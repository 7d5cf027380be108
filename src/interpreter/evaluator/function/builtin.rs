use rand::Rng;

use crate::{
    ast::{BuiltinCall, Program},
    error::RuntimeError,
    interpreter::{
        evaluator::{core::{Context, EvalResult}, variable::Reference},
        value::core::Scalar,
    },
};

impl Context {
    /// Evaluates one builtin invocation.
    ///
    /// The stateless string builtins live as free functions below; the
    /// arms here handle the ones that need the interpreter state: `$O`
    /// reads the variable store, `$S` evaluates its arms lazily, and `$R`
    /// draws from the context's generator.
    pub(crate) fn eval_builtin(&mut self,
                               program: &Program,
                               call: &BuiltinCall,
                               line: usize,
                               column: usize)
                               -> EvalResult<Scalar> {
        match call {
            BuiltinCall::Order { variable, direction } => {
                let reference = self.resolve(program, variable, false)?;
                let direction = match direction {
                    Some(expr) => self.eval_expr(program, expr)?.as_number(),
                    None => 1.0,
                };
                if direction != 1.0 && direction != -1.0 {
                    return Err(RuntimeError::InvalidDirection { line, column });
                }
                Ok(self.builtin_order(&reference, direction))
            },
            BuiltinCall::Length(expr) => {
                let value = self.eval_expr(program, expr)?;
                Ok(length(&value))
            },
            BuiltinCall::Extract { value, start, end } => {
                let value = self.eval_expr(program, value)?;
                let start = match start {
                    Some(expr) => Some(self.eval_expr(program, expr)?.as_number()),
                    None => None,
                };
                let end = match end {
                    Some(expr) => Some(self.eval_expr(program, expr)?.as_number()),
                    None => None,
                };
                Ok(extract(&value, start, end))
            },
            BuiltinCall::Select { arms } => {
                for arm in arms {
                    if self.eval_expr(program, &arm.condition)?.is_true() {
                        return self.eval_expr(program, &arm.value);
                    }
                }
                Err(RuntimeError::SelectFailed { line, column })
            },
            BuiltinCall::Find { haystack, needle, start } => {
                let haystack = self.eval_expr(program, haystack)?;
                let needle = self.eval_expr(program, needle)?;
                let start = match start {
                    Some(expr) => Some(self.eval_expr(program, expr)?.as_number()),
                    None => None,
                };
                Ok(find(&haystack, &needle, start))
            },
            BuiltinCall::Random(expr) => {
                let bound = self.eval_expr(program, expr)?.as_number();
                self.builtin_random(bound, line, column)
            },
            BuiltinCall::Ascii(expr) => {
                let value = self.eval_expr(program, expr)?;
                Ok(ascii(&value))
            },
            BuiltinCall::Char(expr) => {
                let value = self.eval_expr(program, expr)?;
                Ok(char_fn(&value))
            },
        }
    }

    /// `$O`: the neighbouring key in the parent of the addressed slot.
    ///
    /// The final subscript is the starting key (the empty string stands
    /// for "before the first" going forward and "after the last" going
    /// backward); the walk to the parent happens on the remaining path. A
    /// parent that is missing, not an array, or an unsubscripted variable
    /// yields the empty string.
    fn builtin_order(&self, reference: &Reference, direction: f64) -> Scalar {
        let Some((last, parents)) = reference.path.split_last() else {
            return Scalar::empty();
        };

        let parent = Reference { frame: reference.frame,
                                 name:  reference.name.clone(),
                                 path:  parents.to_vec(), };
        let Some(node) = self.read_node(&parent) else {
            return Scalar::empty();
        };

        let key = if direction == 1.0 {
            node.next_key(last)
        } else {
            node.prev_key(last)
        };
        Scalar::Text(key.unwrap_or_default().to_owned())
    }

    /// `$R(n)`: a uniformly distributed integer in `[0, n]`, inclusive on
    /// both ends. The generator is the context's, so seeding the context
    /// pins the sequence.
    fn builtin_random(&mut self, bound: f64, line: usize, column: usize) -> EvalResult<Scalar> {
        let bound = bound.floor();
        if !bound.is_finite() || bound < 0.0 {
            return Err(RuntimeError::RandomBound { line, column });
        }

        #[allow(clippy::cast_possible_truncation)]
        let bound = bound.min(9_007_199_254_740_991.0) as i64;
        #[allow(clippy::cast_precision_loss)]
        let drawn = self.rng.gen_range(0..=bound) as f64;
        Ok(Scalar::Number(drawn))
    }
}

/// `$L(s)`: the length of the scalar's string form, in characters.
pub(crate) fn length(value: &Scalar) -> Scalar {
    #[allow(clippy::cast_precision_loss)]
    Scalar::Number(value.as_text().chars().count() as f64)
}

/// `$E(s[, start[, end]])`: substring extraction.
///
/// Positions are 1-based and the `[start, end]` range is inclusive, clamped
/// to the string; a range that ends before it starts (or lies entirely
/// outside) yields the empty string. With no positions the first character
/// is taken, with one position just that character.
pub(crate) fn extract(value: &Scalar, start: Option<f64>, end: Option<f64>) -> Scalar {
    let chars: Vec<char> = value.as_text().chars().collect();

    let start = start.unwrap_or(1.0);
    let end = end.unwrap_or(start);
    let from = bound_to_i64(start).max(1);
    #[allow(clippy::cast_possible_wrap)]
    let to = bound_to_i64(end).min(chars.len() as i64);

    if from > to {
        return Scalar::empty();
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let text: String = chars[(from as usize - 1)..(to as usize)].iter().collect();
    Scalar::Text(text)
}

/// `$F(hay, needle[, start])`: the 1-based position just past the first
/// occurrence of `needle` at or after `start`, or `0` when there is none.
/// An empty needle is found immediately: the result is `1` regardless of
/// the haystack or the starting position.
pub(crate) fn find(haystack: &Scalar, needle: &Scalar, start: Option<f64>) -> Scalar {
    let needle: Vec<char> = needle.as_text().chars().collect();
    if needle.is_empty() {
        return Scalar::Number(1.0);
    }

    let haystack: Vec<char> = haystack.as_text().chars().collect();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let from = (start.map_or(1, bound_to_i64).max(1) as usize) - 1;

    if haystack.len() < needle.len() {
        return Scalar::Number(0.0);
    }
    for position in from..=(haystack.len() - needle.len()) {
        if haystack[position..position + needle.len()] == needle[..] {
            #[allow(clippy::cast_precision_loss)]
            return Scalar::Number((position + needle.len() + 1) as f64);
        }
    }
    Scalar::Number(0.0)
}

/// `$A(s)`: the code point of the first character, or `-1` for the empty
/// string.
pub(crate) fn ascii(value: &Scalar) -> Scalar {
    match value.as_text().chars().next() {
        Some(first) => Scalar::Number(f64::from(u32::from(first))),
        None => Scalar::Number(-1.0),
    }
}

/// `$C(n)`: the one-character string with code point `n`, or the empty
/// string when `n` is no valid code point.
pub(crate) fn char_fn(value: &Scalar) -> Scalar {
    let code = value.as_number();
    if !code.is_finite() || code < 0.0 || code.floor() != code || code > f64::from(u32::MAX) {
        return Scalar::empty();
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    match char::from_u32(code as u32) {
        Some(character) => Scalar::Text(character.to_string()),
        None => Scalar::empty(),
    }
}

/// Clamps a position argument into `i64` space.
#[allow(clippy::cast_possible_truncation)]
fn bound_to_i64(value: f64) -> i64 {
    if value.is_nan() {
        return 0;
    }
    value.floor().clamp(-1e15, 1e15) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_clamps_inclusive_ranges() {
        let value = Scalar::from("hello");
        assert_eq!(extract(&value, None, None), Scalar::from("h"));
        assert_eq!(extract(&value, Some(2.0), None), Scalar::from("e"));
        assert_eq!(extract(&value, Some(2.0), Some(4.0)), Scalar::from("ell"));
        assert_eq!(extract(&value, Some(0.0), Some(2.0)), Scalar::from("he"));
        assert_eq!(extract(&value, Some(4.0), Some(99.0)), Scalar::from("lo"));
        assert_eq!(extract(&value, Some(6.0), None), Scalar::empty());
        assert_eq!(extract(&value, Some(3.0), Some(2.0)), Scalar::empty());
    }

    #[test]
    fn find_reports_the_position_after_the_match() {
        let hay = Scalar::from("banana");
        assert_eq!(find(&hay, &Scalar::from("an"), None), Scalar::Number(4.0));
        assert_eq!(find(&hay, &Scalar::from("an"), Some(4.0)), Scalar::Number(6.0));
        assert_eq!(find(&hay, &Scalar::from("x"), None), Scalar::Number(0.0));
        assert_eq!(find(&hay, &Scalar::from(""), Some(5.0)), Scalar::Number(1.0));
    }

    #[test]
    fn character_codes_round_trip() {
        assert_eq!(ascii(&Scalar::from("A")), Scalar::Number(65.0));
        assert_eq!(ascii(&Scalar::from("")), Scalar::Number(-1.0));
        assert_eq!(char_fn(&Scalar::Number(65.0)), Scalar::from("A"));
        assert_eq!(char_fn(&Scalar::Number(-3.0)), Scalar::empty());
        assert_eq!(char_fn(&Scalar::Number(10.0)), Scalar::from("\n"));
    }
}
