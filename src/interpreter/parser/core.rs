use std::collections::HashMap;

use crate::{
    ast::{Command, Program, TagDef},
    error::ParseError,
    interpreter::{
        lexer::{Spanned, Token},
        parser::utils::LineCursor,
    },
};

pub type ParseResult<T> = Result<T, ParseError>;

/// Parses a token grid into a program.
///
/// Parsing is error-accumulating: a failure inside one command abandons the
/// rest of its line and resumes with the next, so a single mistake never
/// hides the rest of the file. The returned program contains everything
/// that parsed.
///
/// # Parameters
/// - `lines`: The token grid produced by the lexer.
///
/// # Returns
/// The parsed [`Program`] and every error encountered, in source order.
#[must_use]
pub fn parse(lines: &[Vec<Spanned>]) -> (Program, Vec<ParseError>) {
    let mut parser = Parser { lines,
                              next_line: 0,
                              errors: Vec::new() };
    let program = parser.parse_program();
    (program, parser.errors)
}

/// How a line opens, which decides who consumes it.
enum LineShape {
    /// Nothing but the line ending (possibly a comment).
    Blank,
    /// An identifier at column 0: a tag definition.
    Tag,
    /// Leading whitespace, then `dots` indent markers.
    Body {
        /// The dot-prefix depth.
        dots: usize,
    },
    /// Anything else at column 0.
    Foreign,
}

/// The line-level parser state.
///
/// `next_line` is the only cross-line cursor: command parsing works on a
/// [`LineCursor`] over one line, and an argumentless `do` advances
/// `next_line` past its indented block *while its own line is still being
/// read*, which is exactly the order the grammar wants.
pub(in crate::interpreter::parser) struct Parser<'a> {
    lines:     &'a [Vec<Spanned>],
    next_line: usize,
    errors:    Vec<ParseError>,
}

impl Parser<'_> {
    fn parse_program(&mut self) -> Program {
        let mut program = Program { children: Vec::new(),
                                    tags:     HashMap::new(), };

        while self.next_line < self.lines.len() {
            let index = self.next_line;
            self.next_line += 1;
            self.parse_top_line(index, &mut program);
        }

        program
    }

    /// Parses one line at the top level (indent depth zero).
    fn parse_top_line(&mut self, index: usize, program: &mut Program) {
        let tokens = &self.lines[index];
        let mut cur = LineCursor::new(tokens, index);

        match shape_of(tokens) {
            LineShape::Blank => {},
            LineShape::Tag => self.parse_tag_line(&mut cur, program),
            LineShape::Body { dots } => {
                cur.next();
                let level = self.consume_indent(&mut cur);
                if level > 0 || dots > 0 {
                    self.errors.push(ParseError::UnexpectedIndent { line:   index,
                                                                    column: cur.column() });
                    return;
                }
                let mut commands = self.parse_commands(&mut cur, 0);
                program.children.append(&mut commands);
            },
            LineShape::Foreign => {
                self.errors.push(ParseError::UnexpectedToken { found:  cur.describe(),
                                                               line:   index,
                                                               column: cur.column() });
            },
        }
    }

    /// Parses a tag-defining line: the tag name at column 0, an optional
    /// parameter list, and any commands on the rest of the line. The tag's
    /// entry index is the number of commands emitted so far.
    fn parse_tag_line(&mut self, cur: &mut LineCursor, program: &mut Program) {
        let Some(Token::Identifier(name)) = cur.peek() else {
            return;
        };
        let name = name.clone();
        cur.next();

        let params = if matches!(cur.peek(), Some(Token::LParen)) {
            match self.parse_tag_params(cur) {
                Ok(params) => Some(params),
                Err(error) => {
                    self.errors.push(error);
                    cur.skip_to_end();
                    return;
                },
            }
        } else {
            None
        };

        program.tags.insert(name,
                            TagDef { index: program.children.len(),
                                     params });

        if let Err(error) = cur.expect_separator() {
            self.errors.push(error);
            cur.skip_to_end();
            return;
        }
        let mut commands = self.parse_commands(cur, 0);
        program.children.append(&mut commands);
    }

    fn parse_tag_params(&mut self, cur: &mut LineCursor) -> ParseResult<Vec<String>> {
        cur.next(); // (
        let mut params = Vec::new();
        if matches!(cur.peek(), Some(Token::RParen)) {
            cur.next();
            return Ok(params);
        }
        loop {
            match cur.peek() {
                Some(Token::Identifier(param)) => {
                    params.push(param.clone());
                    cur.next();
                },
                _ => {
                    return Err(ParseError::UnexpectedToken { found:  cur.describe(),
                                                             line:   cur.line(),
                                                             column: cur.column() });
                },
            }
            match cur.peek() {
                Some(Token::Comma) => {
                    cur.next();
                },
                Some(Token::RParen) => {
                    cur.next();
                    return Ok(params);
                },
                _ => {
                    return Err(ParseError::ExpectedClosingParen { line:   cur.line(),
                                                                  column: cur.column() });
                },
            }
        }
    }

    /// Parses the lines of one indented block, at the given dot depth.
    ///
    /// The block ends at the first line whose dot prefix is shorter, at a
    /// tag line, or at the end of the file. Blank lines inside the block
    /// are skipped; deeper lines with no `do` to own them are errors.
    pub(in crate::interpreter::parser) fn parse_block(&mut self, level: usize) -> Vec<Command> {
        let mut body = Vec::new();

        while self.next_line < self.lines.len() {
            let tokens = &self.lines[self.next_line];
            match shape_of(tokens) {
                LineShape::Blank => {
                    self.next_line += 1;
                },
                LineShape::Tag | LineShape::Foreign => break,
                LineShape::Body { dots } if dots < level => break,
                LineShape::Body { dots } if dots > level => {
                    let mut cur = LineCursor::new(tokens, self.next_line);
                    cur.next();
                    self.errors.push(ParseError::UnexpectedIndent { line:   self.next_line,
                                                                    column: cur.column() });
                    self.next_line += 1;
                },
                LineShape::Body { .. } => {
                    let index = self.next_line;
                    self.next_line += 1;
                    let mut cur = LineCursor::new(&self.lines[index], index);
                    cur.next();
                    let _ = self.consume_indent(&mut cur);
                    let mut commands = self.parse_commands(&mut cur, level);
                    body.append(&mut commands);
                },
            }
        }

        body
    }

    /// Consumes the dot markers opening a body line and returns their
    /// count. Each marker must be followed by a space.
    fn consume_indent(&mut self, cur: &mut LineCursor) -> usize {
        let mut dots = 0;
        while matches!(cur.peek(), Some(Token::Dot)) {
            cur.next();
            dots += 1;
            if matches!(cur.peek(), Some(Token::Space)) {
                cur.next();
            } else if !cur.at_end() {
                self.errors.push(ParseError::MissingIndentSpace { line:   cur.line(),
                                                                  column: cur.column() });
                break;
            }
        }
        cur.skip_spaces();
        dots
    }

    /// Parses all commands remaining on the line.
    ///
    /// On an error the rest of the line is dropped and the error recorded;
    /// parsing resumes with the next line.
    pub(in crate::interpreter::parser) fn parse_commands(&mut self,
                                                         cur: &mut LineCursor,
                                                         level: usize)
                                                         -> Vec<Command> {
        let mut commands = Vec::new();

        loop {
            cur.skip_spaces();
            if cur.at_end() {
                break;
            }
            match self.parse_command(cur, level) {
                Ok(command) => commands.push(command),
                Err(error) => {
                    self.errors.push(error);
                    cur.skip_to_end();
                    break;
                },
            }
        }

        commands
    }
}

/// Classifies a line by its first token and, for body lines, counts the dot
/// markers without consuming anything.
fn shape_of(tokens: &[Spanned]) -> LineShape {
    match tokens.first().map(|spanned| &spanned.token) {
        None | Some(Token::TrailingWhitespace | Token::Comment) => LineShape::Blank,
        Some(Token::Identifier(_)) => LineShape::Tag,
        Some(Token::LeadingWhitespace) => {
            let mut dots = 0;
            let mut rest = tokens[1..].iter().map(|spanned| &spanned.token).peekable();
            while let Some(Token::Dot) = rest.peek() {
                rest.next();
                dots += 1;
                while let Some(Token::Space) = rest.peek() {
                    rest.next();
                }
            }
            LineShape::Body { dots }
        },
        Some(_) => LineShape::Foreign,
    }
}
