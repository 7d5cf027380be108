#[derive(Debug, Clone, PartialEq, Eq)]
/// Represents all errors that can occur during tokenizing or parsing.
pub enum ParseError {
    /// A string literal was opened but never closed on its line.
    UnterminatedString {
        /// The source line where the error occurred.
        line:   usize,
        /// The source column where the error occurred.
        column: usize,
    },
    /// The tokenizer hit a character outside the language's alphabet.
    UnrecognizedCharacter {
        /// The offending text.
        found:  String,
        /// The source line where the error occurred.
        line:   usize,
        /// The source column where the error occurred.
        column: usize,
    },
    /// Found an unexpected token while parsing.
    UnexpectedToken {
        /// A description of what was found.
        found:  String,
        /// The source line where the error occurred.
        line:   usize,
        /// The source column where the error occurred.
        column: usize,
    },
    /// The line ended in the middle of a construct.
    UnexpectedEndOfLine {
        /// The source line where the error occurred.
        line:   usize,
        /// The source column where the error occurred.
        column: usize,
    },
    /// A command position held something other than a command name.
    ExpectedCommandName {
        /// The source line where the error occurred.
        line:   usize,
        /// The source column where the error occurred.
        column: usize,
    },
    /// An identifier did not prefix-match any command name.
    UnknownCommand {
        /// The identifier as written.
        name:   String,
        /// The source line where the error occurred.
        line:   usize,
        /// The source column where the error occurred.
        column: usize,
    },
    /// A `$name` did not prefix-match any builtin name.
    UnknownBuiltin {
        /// The identifier as written.
        name:   String,
        /// The source line where the error occurred.
        line:   usize,
        /// The source column where the error occurred.
        column: usize,
    },
    /// A closing parenthesis `)` was expected but not found.
    ExpectedClosingParen {
        /// The source line where the error occurred.
        line:   usize,
        /// The source column where the error occurred.
        column: usize,
    },
    /// A command and its arguments must be separated by a space.
    MissingSeparator {
        /// The source line where the error occurred.
        line:   usize,
        /// The source column where the error occurred.
        column: usize,
    },
    /// A fixed-arity builtin was called with the wrong number of arguments.
    WrongArity {
        /// The builtin's full name.
        name:   &'static str,
        /// The source line where the error occurred.
        line:   usize,
        /// The source column where the error occurred.
        column: usize,
    },
    /// An indent marker `.` was not followed by a space.
    MissingIndentSpace {
        /// The source line where the error occurred.
        line:   usize,
        /// The source column where the error occurred.
        column: usize,
    },
    /// A body line was indented deeper than any open block.
    UnexpectedIndent {
        /// The source line where the error occurred.
        line:   usize,
        /// The source column where the error occurred.
        column: usize,
    },
    /// The first argument of `$ORDER` must be a variable.
    OrderNeedsVariable {
        /// The source line where the error occurred.
        line:   usize,
        /// The source column where the error occurred.
        column: usize,
    },
    /// A `set` target was neither a variable nor an `$EXTRACT` form.
    InvalidSetTarget {
        /// The source line where the error occurred.
        line:   usize,
        /// The source column where the error occurred.
        column: usize,
    },
}

impl ParseError {
    /// Returns the 0-indexed `(line, column)` of the error.
    #[must_use]
    pub const fn position(&self) -> (usize, usize) {
        match self {
            Self::UnterminatedString { line, column }
            | Self::UnrecognizedCharacter { line, column, .. }
            | Self::UnexpectedToken { line, column, .. }
            | Self::UnexpectedEndOfLine { line, column }
            | Self::ExpectedCommandName { line, column }
            | Self::UnknownCommand { line, column, .. }
            | Self::UnknownBuiltin { line, column, .. }
            | Self::ExpectedClosingParen { line, column }
            | Self::MissingSeparator { line, column }
            | Self::WrongArity { line, column, .. }
            | Self::MissingIndentSpace { line, column }
            | Self::UnexpectedIndent { line, column }
            | Self::OrderNeedsVariable { line, column }
            | Self::InvalidSetTarget { line, column } => (*line, *column),
        }
    }

    /// Returns the message text without the position prefix.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::UnterminatedString { .. } => "Unterminated string literal".to_owned(),
            Self::UnrecognizedCharacter { found, .. } => {
                format!("Unrecognized character '{found}'")
            },
            Self::UnexpectedToken { found, .. } => format!("Unexpected token: {found}"),
            Self::UnexpectedEndOfLine { .. } => "Unexpected end of line".to_owned(),
            Self::ExpectedCommandName { .. } => "Expected command name".to_owned(),
            Self::UnknownCommand { name, .. } => format!("Unknown command '{name}'"),
            Self::UnknownBuiltin { name, .. } => format!("Unknown builtin '${name}'"),
            Self::ExpectedClosingParen { .. } => {
                "Expected closing parenthesis ')' but none found".to_owned()
            },
            Self::MissingSeparator { .. } => "Expected a space after the command".to_owned(),
            Self::WrongArity { name, .. } => {
                format!("Wrong number of arguments for ${name}")
            },
            Self::MissingIndentSpace { .. } => {
                "Expected a space after the '.' indent marker".to_owned()
            },
            Self::UnexpectedIndent { .. } => {
                "Line is indented deeper than any open block".to_owned()
            },
            Self::OrderNeedsVariable { .. } => {
                "The first argument of $ORDER must be a variable".to_owned()
            },
            Self::InvalidSetTarget { .. } => {
                "A set target must be a variable or an $EXTRACT form".to_owned()
            },
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (line, column) = self.position();
        write!(f, "Error at line {line}, column {column}: {}.", self.message())
    }
}

impl std::error::Error for ParseError {}
