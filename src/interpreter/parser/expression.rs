use crate::{
    ast::{
        BinaryOperator, BuiltinCall, CallArg, Expr, LiteralValue, SelectArm, TEST_VARIABLE,
        UnaryOperator, Variable,
    },
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{core::ParseResult, utils::{LineCursor, match_prefix}},
    },
};

/// The builtin names in their canonical order. Matching works exactly like
/// the command table: first case-insensitive prefix match wins.
const BUILTIN_NAMES: &[&str] = &[
    "order", "length", "extract", "select", "find", "random", "ascii", "char",
];

/// Parses a full expression.
///
/// There is no precedence: binary operators fold strictly left to right,
/// and only parentheses group. An apostrophe directly before a binary
/// operator marks that operation as negated. The expression ends at the
/// first token that cannot continue it (whitespace, a comma, a colon, a
/// closing parenthesis), which is what lets the comma and colon lists of
/// the command grammars work without any lookahead.
///
/// # Parameters
/// - `cur`: Cursor positioned at the first token of the expression.
///
/// # Returns
/// The parsed expression tree, shaped `((a op b) op c) op d`.
pub(in crate::interpreter::parser) fn parse_expression(cur: &mut LineCursor)
                                                       -> ParseResult<Expr> {
    let mut left = parse_unary(cur)?;

    loop {
        let (op, negated, width) = match cur.peek() {
            Some(Token::Apostrophe) => {
                match cur.peek_at(1).and_then(token_to_binary_operator) {
                    Some(op) => (op, true, 2),
                    None => break,
                }
            },
            Some(token) => match token_to_binary_operator(token) {
                Some(op) => (op, false, 1),
                None => break,
            },
            None => break,
        };

        let line = cur.line();
        let column = cur.column();
        for _ in 0..width {
            cur.next();
        }

        let right = parse_unary(cur)?;
        left = Expr::Binary { op,
                              left: Box::new(left),
                              right: Box::new(right),
                              negated,
                              line,
                              column };
    }

    Ok(left)
}

/// Parses prefix operators: `'` (not), `+`, and `-`. They stack, binding
/// tighter than every binary operator.
fn parse_unary(cur: &mut LineCursor) -> ParseResult<Expr> {
    let line = cur.line();
    let column = cur.column();

    let op = match cur.peek() {
        Some(Token::Apostrophe) => Some(UnaryOperator::Not),
        Some(Token::Plus) => Some(UnaryOperator::Plus),
        Some(Token::Minus) => Some(UnaryOperator::Minus),
        _ => None,
    };

    if let Some(op) = op {
        cur.next();
        let expr = parse_unary(cur)?;
        return Ok(Expr::Unary { op,
                                expr: Box::new(expr),
                                line,
                                column });
    }

    parse_primary(cur)
}

/// Parses a primary form: a literal, a variable, a parenthesized
/// expression, a `$$name(...)` call, or a `$builtin(...)`.
fn parse_primary(cur: &mut LineCursor) -> ParseResult<Expr> {
    let line = cur.line();
    let column = cur.column();

    match cur.peek() {
        Some(Token::Number(value)) => {
            let value = *value;
            cur.next();
            Ok(Expr::Literal { value: LiteralValue::Number(value),
                               line,
                               column })
        },
        Some(Token::Text(text)) => {
            let text = text.clone();
            cur.next();
            Ok(Expr::Literal { value: LiteralValue::Text(text),
                               line,
                               column })
        },
        Some(Token::Identifier(_)) => Ok(Expr::Variable(parse_variable(cur)?)),
        Some(Token::LParen) => {
            cur.next();
            let expr = parse_expression(cur)?;
            if !matches!(cur.peek(), Some(Token::RParen)) {
                return Err(ParseError::ExpectedClosingParen { line:   cur.line(),
                                                              column: cur.column() });
            }
            cur.next();
            Ok(expr)
        },
        Some(Token::Dollar) => parse_dollar(cur),
        None | Some(Token::TrailingWhitespace | Token::Comment) => {
            Err(ParseError::UnexpectedEndOfLine { line, column })
        },
        Some(_) => Err(ParseError::UnexpectedToken { found: cur.describe(),
                                                     line,
                                                     column }),
    }
}

/// Parses a variable reference: an identifier with an optional subscript
/// list.
pub(in crate::interpreter::parser) fn parse_variable(cur: &mut LineCursor)
                                                     -> ParseResult<Variable> {
    let line = cur.line();
    let column = cur.column();

    let Some(Token::Identifier(name)) = cur.peek() else {
        return Err(ParseError::UnexpectedToken { found: cur.describe(),
                                                 line,
                                                 column });
    };
    let name = name.clone();
    cur.next();

    let mut subscripts = Vec::new();
    if matches!(cur.peek(), Some(Token::LParen)) {
        cur.next();
        loop {
            subscripts.push(parse_expression(cur)?);
            match cur.peek() {
                Some(Token::Comma) => {
                    cur.next();
                },
                Some(Token::RParen) => {
                    cur.next();
                    break;
                },
                _ => {
                    return Err(ParseError::ExpectedClosingParen { line:   cur.line(),
                                                                  column: cur.column() });
                },
            }
        }
    }

    Ok(Variable { name,
                  subscripts,
                  line,
                  column })
}

/// Parses a parenthesized call argument list. An argument opening with
/// `.name` passes the caller's variable by reference; everything else is an
/// expression passed by value.
pub(in crate::interpreter::parser) fn parse_call_arguments(cur: &mut LineCursor)
                                                           -> ParseResult<Vec<CallArg>> {
    cur.next(); // consume `(`
    let mut arguments = Vec::new();

    if matches!(cur.peek(), Some(Token::RParen)) {
        cur.next();
        return Ok(arguments);
    }

    loop {
        let by_reference = match (cur.peek(), cur.peek_at(1)) {
            (Some(Token::Dot), Some(Token::Identifier(name))) => Some(name.clone()),
            _ => None,
        };
        if let Some(name) = by_reference {
            cur.next();
            cur.next();
            arguments.push(CallArg::ByReference(name));
        } else {
            arguments.push(CallArg::Value(parse_expression(cur)?));
        }

        match cur.peek() {
            Some(Token::Comma) => {
                cur.next();
            },
            Some(Token::RParen) => {
                cur.next();
                return Ok(arguments);
            },
            _ => {
                return Err(ParseError::ExpectedClosingParen { line:   cur.line(),
                                                              column: cur.column() });
            },
        }
    }
}

/// Parses the `$` forms.
///
/// `$$name` is a tag (or host) call. A single `$` followed by an
/// identifier and a parenthesis is a builtin, matched by prefix; without a
/// parenthesis it can only be the special variable `$TEST`.
fn parse_dollar(cur: &mut LineCursor) -> ParseResult<Expr> {
    let line = cur.line();
    let column = cur.column();
    cur.next(); // consume `$`

    if matches!(cur.peek(), Some(Token::Dollar)) {
        cur.next();
        let Some(Token::Identifier(name)) = cur.peek() else {
            return Err(ParseError::UnexpectedToken { found:  cur.describe(),
                                                     line:   cur.line(),
                                                     column: cur.column() });
        };
        let name = name.clone();
        cur.next();
        let arguments = if matches!(cur.peek(), Some(Token::LParen)) {
            parse_call_arguments(cur)?
        } else {
            Vec::new()
        };
        return Ok(Expr::Call { name,
                               arguments,
                               line,
                               column });
    }

    let Some(Token::Identifier(word)) = cur.peek() else {
        return Err(ParseError::UnexpectedToken { found:  cur.describe(),
                                                 line:   cur.line(),
                                                 column: cur.column() });
    };
    let word = word.clone();
    cur.next();

    if matches!(cur.peek(), Some(Token::LParen)) {
        let Some(name) = match_prefix(&word, BUILTIN_NAMES) else {
            return Err(ParseError::UnknownBuiltin { name: word, line, column });
        };
        let call = parse_builtin(cur, name)?;
        return Ok(Expr::Builtin { call, line, column });
    }

    if match_prefix(&word, &["test"]).is_some() {
        return Ok(Expr::Variable(Variable { name:       TEST_VARIABLE.to_owned(),
                                            subscripts: Vec::new(),
                                            line,
                                            column }));
    }

    Err(ParseError::UnknownBuiltin { name: word, line, column })
}

/// Parses the argument list of one builtin, enforcing its arity.
fn parse_builtin(cur: &mut LineCursor, name: &'static str) -> ParseResult<BuiltinCall> {
    let line = cur.line();
    let column = cur.column();
    cur.next(); // consume `(`

    match name {
        "order" => {
            if !matches!(cur.peek(), Some(Token::Identifier(_))) {
                return Err(ParseError::OrderNeedsVariable { line:   cur.line(),
                                                            column: cur.column() });
            }
            let variable = parse_variable(cur)?;
            let direction = if matches!(cur.peek(), Some(Token::Comma)) {
                cur.next();
                Some(Box::new(parse_expression(cur)?))
            } else {
                None
            };
            expect_rparen(cur)?;
            Ok(BuiltinCall::Order { variable, direction })
        },
        "select" => {
            let mut arms = Vec::new();
            loop {
                let condition = parse_expression(cur)?;
                if !matches!(cur.peek(), Some(Token::Colon)) {
                    return Err(ParseError::UnexpectedToken { found:  cur.describe(),
                                                             line:   cur.line(),
                                                             column: cur.column() });
                }
                cur.next();
                let value = parse_expression(cur)?;
                arms.push(SelectArm { condition, value });

                match cur.peek() {
                    Some(Token::Comma) => {
                        cur.next();
                    },
                    Some(Token::RParen) => {
                        cur.next();
                        return Ok(BuiltinCall::Select { arms });
                    },
                    _ => {
                        return Err(ParseError::ExpectedClosingParen { line:   cur.line(),
                                                                      column: cur.column() });
                    },
                }
            }
        },
        _ => {
            let mut args = Vec::new();
            if matches!(cur.peek(), Some(Token::RParen)) {
                cur.next();
            } else {
                loop {
                    args.push(parse_expression(cur)?);
                    match cur.peek() {
                        Some(Token::Comma) => {
                            cur.next();
                        },
                        Some(Token::RParen) => {
                            cur.next();
                            break;
                        },
                        _ => {
                            return Err(ParseError::ExpectedClosingParen { line:   cur.line(),
                                                                          column:
                                                                              cur.column() });
                        },
                    }
                }
            }
            build_fixed_builtin(name, args, line, column)
        },
    }
}

/// Assembles a fixed-arity builtin from its parsed arguments, or reports
/// the arity violation.
fn build_fixed_builtin(name: &'static str,
                       args: Vec<Expr>,
                       line: usize,
                       column: usize)
                       -> ParseResult<BuiltinCall> {
    if args.len() > 3 {
        return Err(ParseError::WrongArity { name, line, column });
    }

    let mut args = args.into_iter();
    let first = args.next();
    let second = args.next();
    let third = args.next();

    match (name, first, second, third) {
        ("length", Some(value), None, None) => Ok(BuiltinCall::Length(Box::new(value))),
        ("random", Some(value), None, None) => Ok(BuiltinCall::Random(Box::new(value))),
        ("ascii", Some(value), None, None) => Ok(BuiltinCall::Ascii(Box::new(value))),
        ("char", Some(value), None, None) => Ok(BuiltinCall::Char(Box::new(value))),
        ("extract", Some(value), start, end) => {
            Ok(BuiltinCall::Extract { value: Box::new(value),
                                      start: start.map(Box::new),
                                      end:   end.map(Box::new) })
        },
        ("find", Some(haystack), Some(needle), start) => {
            Ok(BuiltinCall::Find { haystack: Box::new(haystack),
                                   needle:   Box::new(needle),
                                   start:    start.map(Box::new) })
        },
        _ => Err(ParseError::WrongArity { name, line, column }),
    }
}

fn expect_rparen(cur: &mut LineCursor) -> ParseResult<()> {
    if !matches!(cur.peek(), Some(Token::RParen)) {
        return Err(ParseError::ExpectedClosingParen { line:   cur.line(),
                                                      column: cur.column() });
    }
    cur.next();
    Ok(())
}

/// Maps a token to the binary operator it denotes, if any.
fn token_to_binary_operator(token: &Token) -> Option<BinaryOperator> {
    use BinaryOperator::{
        Add, And, Concat, Divide, Equal, Greater, IntegerDivide, Less, Modulo, Multiply, Or,
        Power, Subtract,
    };

    Some(match token {
        Token::Bang => Or,
        Token::Ampersand => And,
        Token::Equals => Equal,
        Token::Less => Less,
        Token::Greater => Greater,
        Token::Plus => Add,
        Token::Minus => Subtract,
        Token::Star => Multiply,
        Token::StarStar => Power,
        Token::Slash => Divide,
        Token::Backslash => IntegerDivide,
        Token::Hash => Modulo,
        Token::Underscore => Concat,
        _ => return None,
    })
}
