use crate::{ast::UnaryOperator, interpreter::value::core::Scalar};

/// Evaluates a unary operation.
///
/// `'` inverts the operand's truth value, and `+`/`-` force it through the
/// numeric coercion, which is how a program spells "treat this string as a
/// number".
#[must_use]
pub(crate) fn eval_unary(op: UnaryOperator, value: &Scalar) -> Scalar {
    match op {
        UnaryOperator::Not => Scalar::from_bool(!value.is_true()),
        UnaryOperator::Plus => Scalar::Number(value.as_number()),
        UnaryOperator::Minus => Scalar::Number(-value.as_number()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_inverts_truthiness() {
        assert_eq!(eval_unary(UnaryOperator::Not, &Scalar::from("0")),
                   Scalar::Number(1.0));
        assert_eq!(eval_unary(UnaryOperator::Not, &Scalar::from("2abc")),
                   Scalar::Number(0.0));
    }

    #[test]
    fn signs_coerce() {
        assert_eq!(eval_unary(UnaryOperator::Plus, &Scalar::from("3x")),
                   Scalar::Number(3.0));
        assert_eq!(eval_unary(UnaryOperator::Minus, &Scalar::from("")),
                   Scalar::Number(0.0));
    }
}
