use crate::{
    ast::{Assignment, Command, CommandKind, ForArg, ForParameter, SetTarget, WriteArg},
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{
            core::{ParseResult, Parser},
            expression::{parse_call_arguments, parse_expression, parse_variable},
            utils::{LineCursor, match_prefix},
        },
    },
};

/// The command names in their canonical order.
///
/// Any non-empty case-insensitive prefix of a name selects it, and the
/// *first* match in this order wins, so `s` reliably means `set` and never
/// anything else that may start with `s`.
const COMMAND_NAMES: &[&str] = &[
    "write", "quit", "do", "if", "else", "for", "set", "new", "kill", "merge", "halt",
];

impl Parser<'_> {
    /// Parses one command: `NAME[:COND] <ws> ARGS`.
    ///
    /// The name is matched against the prefix table; the optional
    /// postconditional rides between the name and the separating space. The
    /// argument grammar is selected per command. `if`, `else`, and `for`
    /// consume the rest of the line as their in-line body, so for them this
    /// returns only after the line is exhausted.
    ///
    /// # Parameters
    /// - `cur`: Cursor positioned at the command name.
    /// - `level`: The current dot-indent depth, needed when an argumentless
    ///   `do` opens a nested block.
    ///
    /// # Returns
    /// The parsed [`Command`].
    ///
    /// # Errors
    /// Returns a `ParseError` if the name position holds no identifier, the
    /// identifier matches no command, or the command's argument grammar is
    /// violated.
    pub(in crate::interpreter::parser) fn parse_command(&mut self,
                                                       cur: &mut LineCursor,
                                                       level: usize)
                                                       -> ParseResult<Command> {
        let line = cur.line();
        let column = cur.column();

        let Some(Token::Identifier(word)) = cur.peek() else {
            return Err(ParseError::ExpectedCommandName { line, column });
        };
        let word = word.clone();
        let Some(name) = match_prefix(&word, COMMAND_NAMES) else {
            return Err(ParseError::UnknownCommand { name: word, line, column });
        };
        cur.next();

        let cond = if matches!(cur.peek(), Some(Token::Colon)) {
            cur.next();
            Some(parse_expression(cur)?)
        } else {
            None
        };

        cur.expect_separator()?;

        let kind = match name {
            "write" => parse_write(cur)?,
            "quit" => parse_quit(cur)?,
            "do" => self.parse_do(cur, level)?,
            "if" => self.parse_if(cur, level)?,
            "else" => CommandKind::Else { body: self.parse_commands(cur, level) },
            "for" => self.parse_for(cur, level)?,
            "set" => parse_set(cur)?,
            "new" => parse_new(cur)?,
            "kill" => parse_kill(cur)?,
            "merge" => parse_merge(cur)?,
            _ => CommandKind::Halt,
        };

        Ok(Command { kind, cond, line, column })
    }

    /// Parses the argument of `do`.
    ///
    /// `do` followed by another space (or the line ending) has no argument
    /// and opens an indented block: the lines that follow the current one,
    /// one dot deeper. Otherwise it names a tag to call.
    fn parse_do(&mut self, cur: &mut LineCursor, level: usize) -> ParseResult<CommandKind> {
        if cur.at_whitespace() {
            return Ok(CommandKind::DoBlock { body: self.parse_block(level + 1) });
        }

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
        Ok(CommandKind::DoCall { name, arguments })
    }

    /// Parses `if`: a comma list of conditions, then the guarded rest of
    /// the line.
    fn parse_if(&mut self, cur: &mut LineCursor, level: usize) -> ParseResult<CommandKind> {
        let mut conditions = vec![parse_expression(cur)?];
        while matches!(cur.peek(), Some(Token::Comma)) {
            cur.next();
            conditions.push(parse_expression(cur)?);
        }
        cur.expect_separator()?;
        Ok(CommandKind::If { conditions,
                             body: self.parse_commands(cur, level) })
    }

    /// Parses `for`: an optional `var=sweep,...` header, then the rest of
    /// the line as the loop body.
    fn parse_for(&mut self, cur: &mut LineCursor, level: usize) -> ParseResult<CommandKind> {
        let has_header = matches!(cur.peek(), Some(Token::Identifier(_)))
                         && matches!(cur.peek_at(1), Some(Token::Equals | Token::LParen));

        let sweep = if has_header {
            let variable = parse_variable(cur)?;
            if !matches!(cur.peek(), Some(Token::Equals)) {
                return Err(ParseError::UnexpectedToken { found:  cur.describe(),
                                                         line:   cur.line(),
                                                         column: cur.column() });
            }
            cur.next();

            let mut parameters = vec![parse_for_parameter(cur)?];
            while matches!(cur.peek(), Some(Token::Comma)) {
                cur.next();
                parameters.push(parse_for_parameter(cur)?);
            }
            cur.expect_separator()?;
            Some(ForArg { variable, parameters })
        } else {
            None
        };

        Ok(CommandKind::For { sweep,
                              body: self.parse_commands(cur, level) })
    }
}

/// Parses one `start[:step[:limit]]` sweep of a `for` header.
fn parse_for_parameter(cur: &mut LineCursor) -> ParseResult<ForParameter> {
    let start = parse_expression(cur)?;
    let mut step = None;
    let mut limit = None;

    if matches!(cur.peek(), Some(Token::Colon)) {
        cur.next();
        step = Some(parse_expression(cur)?);
        if matches!(cur.peek(), Some(Token::Colon)) {
            cur.next();
            limit = Some(parse_expression(cur)?);
        }
    }

    Ok(ForParameter { start, step, limit })
}

/// Parses the comma list of `write` arguments: expressions interleaved with
/// the `!`, `#`, and `?expr` formatting directives.
fn parse_write(cur: &mut LineCursor) -> ParseResult<CommandKind> {
    let mut args = Vec::new();

    loop {
        match cur.peek() {
            Some(Token::Bang) => {
                cur.next();
                args.push(WriteArg::Newline);
            },
            Some(Token::Hash) => {
                cur.next();
                args.push(WriteArg::Reset);
            },
            Some(Token::Question) => {
                cur.next();
                args.push(WriteArg::Column(parse_expression(cur)?));
            },
            _ => args.push(WriteArg::Value(parse_expression(cur)?)),
        }
        if matches!(cur.peek(), Some(Token::Comma)) {
            cur.next();
            continue;
        }
        break;
    }

    Ok(CommandKind::Write { args })
}

/// Parses `quit`, whose return expression is present exactly when the next
/// token is not whitespace.
fn parse_quit(cur: &mut LineCursor) -> ParseResult<CommandKind> {
    let value = if cur.at_whitespace() {
        None
    } else {
        Some(parse_expression(cur)?)
    };
    Ok(CommandKind::Quit { value })
}

/// Parses the comma list of `target=value` assignments of a `set`.
fn parse_set(cur: &mut LineCursor) -> ParseResult<CommandKind> {
    let mut assignments = Vec::new();

    loop {
        let target = parse_set_target(cur)?;
        if !matches!(cur.peek(), Some(Token::Equals)) {
            return Err(ParseError::UnexpectedToken { found:  cur.describe(),
                                                     line:   cur.line(),
                                                     column: cur.column() });
        }
        cur.next();
        let value = parse_expression(cur)?;
        assignments.push(Assignment { target, value });

        if matches!(cur.peek(), Some(Token::Comma)) {
            cur.next();
            continue;
        }
        break;
    }

    Ok(CommandKind::Set { assignments })
}

/// Parses a `set` target: a variable, or the `$E(var[, start[, end]])`
/// splice form.
fn parse_set_target(cur: &mut LineCursor) -> ParseResult<SetTarget> {
    if !matches!(cur.peek(), Some(Token::Dollar)) {
        return Ok(SetTarget::Variable(parse_variable(cur)?));
    }

    let line = cur.line();
    let column = cur.column();
    cur.next();

    let target_ok = matches!(cur.peek(),
                             Some(Token::Identifier(word)) if match_prefix(word, &["extract"]).is_some());
    if !target_ok {
        return Err(ParseError::InvalidSetTarget { line, column });
    }
    cur.next();

    if !matches!(cur.peek(), Some(Token::LParen)) {
        return Err(ParseError::InvalidSetTarget { line, column });
    }
    cur.next();

    if !matches!(cur.peek(), Some(Token::Identifier(_))) {
        return Err(ParseError::InvalidSetTarget { line:   cur.line(),
                                                  column: cur.column() });
    }
    let variable = parse_variable(cur)?;

    let mut start = None;
    let mut end = None;
    if matches!(cur.peek(), Some(Token::Comma)) {
        cur.next();
        start = Some(parse_expression(cur)?);
        if matches!(cur.peek(), Some(Token::Comma)) {
            cur.next();
            end = Some(parse_expression(cur)?);
        }
    }

    if !matches!(cur.peek(), Some(Token::RParen)) {
        return Err(ParseError::ExpectedClosingParen { line:   cur.line(),
                                                      column: cur.column() });
    }
    cur.next();

    Ok(SetTarget::Extract { variable, start, end })
}

/// Parses the identifier list of a `new`. An empty list is allowed and
/// makes the command a no-op.
fn parse_new(cur: &mut LineCursor) -> ParseResult<CommandKind> {
    let mut names = Vec::new();
    if cur.at_whitespace() {
        return Ok(CommandKind::New { names });
    }

    loop {
        let Some(Token::Identifier(name)) = cur.peek() else {
            return Err(ParseError::UnexpectedToken { found:  cur.describe(),
                                                     line:   cur.line(),
                                                     column: cur.column() });
        };
        names.push(name.clone());
        cur.next();

        if matches!(cur.peek(), Some(Token::Comma)) {
            cur.next();
            continue;
        }
        break;
    }

    Ok(CommandKind::New { names })
}

/// Parses the variable list of a `kill`. An empty list clears all locals.
fn parse_kill(cur: &mut LineCursor) -> ParseResult<CommandKind> {
    let mut variables = Vec::new();
    if cur.at_whitespace() {
        return Ok(CommandKind::Kill { variables });
    }

    loop {
        variables.push(parse_variable(cur)?);
        if matches!(cur.peek(), Some(Token::Comma)) {
            cur.next();
            continue;
        }
        break;
    }

    Ok(CommandKind::Kill { variables })
}

/// Parses `merge target=source`.
fn parse_merge(cur: &mut LineCursor) -> ParseResult<CommandKind> {
    let target = parse_variable(cur)?;
    if !matches!(cur.peek(), Some(Token::Equals)) {
        return Err(ParseError::UnexpectedToken { found:  cur.describe(),
                                                 line:   cur.line(),
                                                 column: cur.column() });
    }
    cur.next();
    let source = parse_variable(cur)?;
    Ok(CommandKind::Merge { target, source })
}
