use crate::{
    error::ParseError,
    interpreter::{
        lexer::{Spanned, Token},
        parser::core::ParseResult,
    },
};

/// A cursor over the tokens of one source line.
///
/// All command and expression grammars operate within a single line, so this
/// cursor is the unit of parsing state they share. The line-level parser
/// owns line-to-line movement separately, which is what lets an
/// argumentless `do` in the middle of a line pull in the indented lines
/// that follow it before the cursor resumes.
pub(in crate::interpreter::parser) struct LineCursor<'a> {
    tokens: &'a [Spanned],
    pos:    usize,
    line:   usize,
}

impl<'a> LineCursor<'a> {
    pub fn new(tokens: &'a [Spanned], line: usize) -> Self {
        Self { tokens, pos: 0, line }
    }

    /// The 0-indexed line this cursor reads.
    pub const fn line(&self) -> usize {
        self.line
    }

    /// The column of the current token, or of the line ending once the
    /// cursor has passed everything.
    pub fn column(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map_or(0, |spanned| spanned.column)
    }

    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|spanned| &spanned.token)
    }

    pub fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset).map(|spanned| &spanned.token)
    }

    pub fn next(&mut self) -> Option<&Spanned> {
        let spanned = self.tokens.get(self.pos);
        if spanned.is_some() {
            self.pos += 1;
        }
        spanned
    }

    /// Whether the cursor sits at the end of the line's content. Comments
    /// run to the end of the line, so they count.
    pub fn at_end(&self) -> bool {
        matches!(self.peek(),
                 None | Some(Token::TrailingWhitespace | Token::Comment))
    }

    /// Whether the next token is whitespace or the end of the line. This is
    /// the test the argument grammars use for "no argument follows".
    pub fn at_whitespace(&self) -> bool {
        matches!(self.peek(), Some(Token::Space)) || self.at_end()
    }

    /// Consumes any run of separating spaces.
    pub fn skip_spaces(&mut self) {
        while matches!(self.peek(), Some(Token::Space)) {
            self.pos += 1;
        }
    }

    /// Consumes the single space that must separate a command name from its
    /// arguments (the end of the line also satisfies it).
    pub fn expect_separator(&mut self) -> ParseResult<()> {
        match self.peek() {
            Some(Token::Space) => {
                self.pos += 1;
                Ok(())
            },
            None | Some(Token::TrailingWhitespace | Token::Comment) => Ok(()),
            Some(_) => Err(ParseError::MissingSeparator { line:   self.line,
                                                          column: self.column() }),
        }
    }

    /// Abandons the rest of the line; error recovery resumes at the next
    /// one.
    pub fn skip_to_end(&mut self) {
        self.pos = self.tokens.len();
    }

    /// Describes the current token for an error message.
    pub fn describe(&self) -> String {
        match self.peek() {
            Some(Token::Identifier(name)) => format!("'{name}'"),
            Some(Token::Number(value)) => format!("'{value}'"),
            Some(Token::Text(_)) => "string literal".to_owned(),
            Some(Token::TrailingWhitespace) | None => "end of line".to_owned(),
            Some(token) => format!("{token:?}"),
        }
    }
}

/// Finds the first table entry the given word is a prefix of.
///
/// Matching is case-insensitive and any non-empty prefix counts, so the
/// order of the table is part of the language definition: the first match
/// wins, never the longest or the unique one.
///
/// # Parameters
/// - `word`: The identifier as written in source.
/// - `table`: Full names in their canonical order.
///
/// # Returns
/// The matched full name, or `None`.
pub(in crate::interpreter::parser) fn match_prefix<'t>(word: &str,
                                                       table: &[&'t str])
                                                       -> Option<&'t str> {
    let lower = word.to_ascii_lowercase();
    table.iter().copied().find(|name| name.starts_with(&lower))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_match_wins() {
        let table = &["write", "quit", "set", "select"];
        assert_eq!(match_prefix("s", table), Some("set"));
        assert_eq!(match_prefix("WRite", table), Some("write"));
        assert_eq!(match_prefix("sel", table), Some("select"));
        assert_eq!(match_prefix("x", table), None);
    }
}
