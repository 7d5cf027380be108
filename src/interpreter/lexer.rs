use logos::Logos;

use crate::error::ParseError;

/// Represents a lexical token in the source input.
///
/// Tokens are produced per source line; the grid of lines is the unit handed
/// to the parser. Whitespace is not discarded: a [`Token::Space`] covers
/// exactly one blank character, so the parser can tell a single separating
/// space from the two spaces that mark an argumentless command. The
/// [`Token::LeadingWhitespace`] and [`Token::TrailingWhitespace`] variants
/// are synthesized by [`tokenize`]; the lexer itself never emits them.
#[derive(Logos, Debug, PartialEq, Clone)]
pub enum Token {
    /// Numeric literal tokens, such as `42`, `3.14` or `2.1e-10`. Signs are
    /// not part of the literal; the unary operators own them.
    #[regex(r"[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?", parse_number)]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?", parse_number)]
    Number(f64),
    /// String literal tokens; `""` inside a literal encodes one quote.
    #[regex(r#""([^"]|"")*""#, parse_text)]
    Text(String),
    /// Identifier tokens: ASCII-letter runs such as `write` or `arr`.
    #[regex(r"[a-zA-Z]+", |lex| lex.slice().to_string())]
    Identifier(String),
    /// `; comments` running to the end of the line.
    #[regex(r";[^\n]*")]
    Comment,
    /// Exactly one space or tab.
    #[regex(r"[ \t]")]
    Space,
    /// The whitespace run opening a body line. Only ever the first token of
    /// a line. Lexing runs per line, so [`tokenize`] synthesizes this;
    /// the pattern exists for completeness and cannot fire on line input.
    #[regex(r"\n[ \t]+")]
    LeadingWhitespace,
    /// The end of a line, merged with any blanks before it. Always the last
    /// token of a line, synthesized by [`tokenize`].
    #[token("\n")]
    TrailingWhitespace,
    /// `.`
    #[token(".")]
    Dot,
    /// `,`
    #[token(",")]
    Comma,
    /// `:`
    #[token(":")]
    Colon,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `=`
    #[token("=")]
    Equals,
    /// `$`
    #[token("$")]
    Dollar,
    /// `'`
    #[token("'")]
    Apostrophe,
    /// `_`
    #[token("_")]
    Underscore,
    /// `#`
    #[token("#")]
    Hash,
    /// `!`
    #[token("!")]
    Bang,
    /// `?`
    #[token("?")]
    Question,
    /// `\`
    #[token("\\")]
    Backslash,
    /// `/`
    #[token("/")]
    Slash,
    /// `*`
    #[token("*")]
    Star,
    /// `**`
    #[token("**")]
    StarStar,
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `&`
    #[token("&")]
    Ampersand,
    /// `<`
    #[token("<")]
    Less,
    /// `>`
    #[token(">")]
    Greater,
}

/// A token tagged with its 0-indexed source position.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    /// The token itself.
    pub token:  Token,
    /// 0-indexed source line.
    pub line:   usize,
    /// 0-indexed source column, in characters.
    pub column: usize,
}

/// Parses a numeric literal from the current token slice.
fn parse_number(lex: &logos::Lexer<Token>) -> Option<f64> {
    lex.slice().parse().ok()
}

/// Decodes a string literal, resolving `""` escapes.
fn parse_text(lex: &logos::Lexer<Token>) -> String {
    let slice = lex.slice();
    slice[1..slice.len() - 1].replace("\"\"", "\"")
}

/// Tokenizes a whole source text into a grid of lines.
///
/// Every line ends with a synthesized [`Token::TrailingWhitespace`] (blank
/// lines consist of nothing else), and a line opening with blanks gets a
/// single [`Token::LeadingWhitespace`] covering the run. Lexical problems
/// are collected; lexing always continues with the rest of the line.
///
/// # Parameters
/// - `source`: The full source text.
///
/// # Returns
/// The token grid and any lexical errors, in source order.
pub fn tokenize(source: &str) -> (Vec<Vec<Spanned>>, Vec<ParseError>) {
    let mut lines = Vec::new();
    let mut errors = Vec::new();

    for (line, raw) in source.lines().enumerate() {
        let raw = raw.strip_suffix('\r').unwrap_or(raw);
        let mut tokens = Vec::new();
        let mut lexer = Token::lexer(raw);

        while let Some(result) = lexer.next() {
            let span = lexer.span();
            let column = raw[..span.start].chars().count();
            match result {
                Ok(token) => tokens.push(Spanned { token, line, column }),
                Err(()) => {
                    errors.push(if lexer.slice().starts_with('"') {
                                    ParseError::UnterminatedString { line, column }
                                } else {
                                    ParseError::UnrecognizedCharacter { found:
                                                                            lexer.slice()
                                                                                 .to_string(),
                                                                        line,
                                                                        column }
                                });
                },
            }
        }

        lines.push(classify_whitespace(tokens, line, raw.chars().count()));
    }

    (lines, errors)
}

/// Rewrites the raw [`Token::Space`] runs at the edges of a line into the
/// leading/trailing forms the parser keys on.
fn classify_whitespace(tokens: Vec<Spanned>, line: usize, width: usize) -> Vec<Spanned> {
    // A line of nothing but blanks is just its line ending.
    let blank = tokens.iter().all(|spanned| spanned.token == Token::Space);
    if blank {
        return vec![Spanned { token: Token::TrailingWhitespace,
                              line,
                              column: 0 }];
    }

    let leading = tokens.iter()
                        .take_while(|spanned| spanned.token == Token::Space)
                        .count();
    let trailing = tokens.iter()
                         .rev()
                         .take_while(|spanned| spanned.token == Token::Space)
                         .count();

    let mut classified = Vec::with_capacity(tokens.len() + 2 - leading - trailing);
    if leading > 0 {
        classified.push(Spanned { token: Token::LeadingWhitespace,
                                  line,
                                  column: 0 });
    }
    let end_column = tokens[tokens.len() - trailing..].first()
                                                      .map_or(width, |spanned| spanned.column);
    classified.extend_from_slice(&tokens[leading..tokens.len() - trailing]);
    classified.push(Spanned { token: Token::TrailingWhitespace,
                              line,
                              column: end_column });

    classified
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(line: &[Spanned]) -> Vec<Token> {
        line.iter().map(|spanned| spanned.token.clone()).collect()
    }

    #[test]
    fn whitespace_is_classified() {
        let (lines, errors) = tokenize(" w 1");
        assert!(errors.is_empty());
        assert_eq!(kinds(&lines[0]),
                   vec![Token::LeadingWhitespace,
                        Token::Identifier("w".to_owned()),
                        Token::Space,
                        Token::Number(1.0),
                        Token::TrailingWhitespace]);
    }

    #[test]
    fn interior_spaces_stay_separate() {
        let (lines, _) = tokenize(" q  h");
        let spaces = lines[0].iter()
                             .filter(|spanned| spanned.token == Token::Space)
                             .count();
        assert_eq!(spaces, 2);
    }

    #[test]
    fn blank_lines_are_only_a_line_ending() {
        let (lines, _) = tokenize("   \n");
        assert_eq!(kinds(&lines[0]), vec![Token::TrailingWhitespace]);
    }

    #[test]
    fn string_escapes_decode() {
        let (lines, _) = tokenize(r#" w "say ""hi""""#);
        assert!(lines[0].iter()
                        .any(|spanned| spanned.token == Token::Text("say \"hi\"".to_owned())));
    }

    #[test]
    fn unterminated_string_is_reported() {
        let (_, errors) = tokenize(" w \"abc");
        assert!(matches!(errors[0], ParseError::UnterminatedString { line: 0, .. }));
    }

    #[test]
    fn double_star_is_one_token() {
        let (lines, _) = tokenize(" w 2**3");
        assert!(lines[0].iter().any(|spanned| spanned.token == Token::StarStar));
    }
}
