use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{evaluator::core::EvalResult, value::core::Scalar},
};

/// Evaluates a binary operation between two scalars.
///
/// Logic and comparison operators yield `1` or `0`. Equality compares the
/// canonical string forms after both sides are reduced to scalars, so `1`
/// equals `"1"` but not `"1.0"`; the ordering comparisons are numeric.
/// Arithmetic coerces both sides to numbers. The three dividing operators
/// reject a zero divisor: the language has no representation for the IEEE
/// specials that would otherwise leak out.
///
/// # Parameters
/// - `op`: The operator.
/// - `left`: Left operand.
/// - `right`: Right operand.
/// - `line`: Line number for error reporting.
/// - `column`: Column number for error reporting.
///
/// # Returns
/// An `EvalResult<Scalar>` containing the evaluated result.
pub(crate) fn eval_binary(op: BinaryOperator,
                          left: &Scalar,
                          right: &Scalar,
                          line: usize,
                          column: usize)
                          -> EvalResult<Scalar> {
    use BinaryOperator::{
        Add, And, Concat, Divide, Equal, Greater, IntegerDivide, Less, Modulo, Multiply, Or,
        Power, Subtract,
    };

    let result = match op {
        Or => Scalar::from_bool(left.is_true() || right.is_true()),
        And => Scalar::from_bool(left.is_true() && right.is_true()),
        Equal => Scalar::from_bool(left.as_text() == right.as_text()),
        Less => Scalar::from_bool(left.as_number() < right.as_number()),
        Greater => Scalar::from_bool(left.as_number() > right.as_number()),
        Add => Scalar::Number(left.as_number() + right.as_number()),
        Subtract => Scalar::Number(left.as_number() - right.as_number()),
        Multiply => Scalar::Number(left.as_number() * right.as_number()),
        Power => Scalar::Number(left.as_number().powf(right.as_number())),
        Divide => {
            let divisor = right.as_number();
            if divisor == 0.0 {
                return Err(RuntimeError::DivisionByZero { line, column });
            }
            Scalar::Number(left.as_number() / divisor)
        },
        IntegerDivide => {
            let divisor = right.as_number();
            if divisor == 0.0 {
                return Err(RuntimeError::DivisionByZero { line, column });
            }
            Scalar::Number((left.as_number() / divisor).floor())
        },
        Modulo => {
            let divisor = right.as_number();
            if divisor == 0.0 {
                return Err(RuntimeError::DivisionByZero { line, column });
            }
            // Remainder keeps the sign of the dividend: -5#2 is -1.
            Scalar::Number(left.as_number() % divisor)
        },
        Concat => {
            let mut text = left.as_text();
            text.push_str(&right.as_text());
            Scalar::Text(text)
        },
    };

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(value: f64) -> Scalar {
        Scalar::Number(value)
    }

    fn run(op: BinaryOperator, left: Scalar, right: Scalar) -> Scalar {
        eval_binary(op, &left, &right, 0, 0).unwrap()
    }

    #[test]
    fn division_family() {
        assert_eq!(run(BinaryOperator::Divide, num(5.0), num(2.0)), num(2.5));
        assert_eq!(run(BinaryOperator::IntegerDivide, num(5.0), num(2.0)), num(2.0));
        assert_eq!(run(BinaryOperator::IntegerDivide, num(-5.0), num(2.0)), num(-3.0));
        assert_eq!(run(BinaryOperator::Modulo, num(5.0), num(2.0)), num(1.0));
        assert_eq!(run(BinaryOperator::Modulo, num(-5.0), num(2.0)), num(-1.0));
    }

    #[test]
    fn zero_divisors_error() {
        for op in [BinaryOperator::Divide,
                   BinaryOperator::IntegerDivide,
                   BinaryOperator::Modulo]
        {
            let result = eval_binary(op, &num(1.0), &num(0.0), 3, 7);
            assert_eq!(result, Err(RuntimeError::DivisionByZero { line: 3, column: 7 }));
        }
    }

    #[test]
    fn equality_is_textual() {
        assert_eq!(run(BinaryOperator::Equal, num(1.0), Scalar::from("1")),
                   num(1.0));
        assert_eq!(run(BinaryOperator::Equal, num(1.0), Scalar::from("1.0")),
                   num(0.0));
    }

    #[test]
    fn ordering_is_numeric() {
        assert_eq!(run(BinaryOperator::Less, Scalar::from("2"), Scalar::from("10")),
                   num(1.0));
    }
}
