#[derive(Debug, Clone, PartialEq, Eq)]
/// Represents all errors that can be raised during execution.
pub enum RuntimeError {
    /// Called a tag that neither the program nor the host provides.
    UnknownTag {
        /// The name as called.
        name:   String,
        /// The source line where the error occurred.
        line:   usize,
        /// The source column where the error occurred.
        column: usize,
    },
    /// Passed `.name` for a variable that does not exist in any frame.
    MissingReference {
        /// The name of the variable.
        name:   String,
        /// The source line where the error occurred.
        line:   usize,
        /// The source column where the error occurred.
        column: usize,
    },
    /// The second argument of `$ORDER` was neither `1` nor `-1`.
    InvalidDirection {
        /// The source line where the error occurred.
        line:   usize,
        /// The source column where the error occurred.
        column: usize,
    },
    /// Every condition of a `$SELECT` evaluated to zero.
    SelectFailed {
        /// The source line where the error occurred.
        line:   usize,
        /// The source column where the error occurred.
        column: usize,
    },
    /// The two sides of a `merge` address overlapping subtrees.
    OverlappingMerge {
        /// The source line where the error occurred.
        line:   usize,
        /// The source column where the error occurred.
        column: usize,
    },
    /// Attempted division (or integer division, or modulo) by zero.
    DivisionByZero {
        /// The source line where the error occurred.
        line:   usize,
        /// The source column where the error occurred.
        column: usize,
    },
    /// A subscript evaluated to the empty string on a write path.
    EmptySubscript {
        /// The source line where the error occurred.
        line:   usize,
        /// The source column where the error occurred.
        column: usize,
    },
    /// The bound of `$RANDOM` was negative or not finite.
    RandomBound {
        /// The source line where the error occurred.
        line:   usize,
        /// The source column where the error occurred.
        column: usize,
    },
    /// Tag calls nested beyond the recursion ceiling.
    CallDepthExceeded {
        /// The source line where the error occurred.
        line:   usize,
        /// The source column where the error occurred.
        column: usize,
    },
    /// An indirect-reference chain did not terminate.
    ReferenceLoop {
        /// The source line where the error occurred.
        line:   usize,
        /// The source column where the error occurred.
        column: usize,
    },
}

impl RuntimeError {
    /// Returns the 0-indexed `(line, column)` of the error.
    #[must_use]
    pub const fn position(&self) -> (usize, usize) {
        match self {
            Self::UnknownTag { line, column, .. }
            | Self::MissingReference { line, column, .. }
            | Self::InvalidDirection { line, column }
            | Self::SelectFailed { line, column }
            | Self::OverlappingMerge { line, column }
            | Self::DivisionByZero { line, column }
            | Self::EmptySubscript { line, column }
            | Self::RandomBound { line, column }
            | Self::CallDepthExceeded { line, column }
            | Self::ReferenceLoop { line, column } => (*line, *column),
        }
    }

    /// Returns the message text without the position prefix.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::UnknownTag { name, .. } => format!("Unknown tag '{name}'"),
            Self::MissingReference { name, .. } => {
                format!("Cannot pass a reference to undefined variable '{name}'")
            },
            Self::InvalidDirection { .. } => {
                "The direction of $ORDER must be 1 or -1".to_owned()
            },
            Self::SelectFailed { .. } => "All select conditions were false".to_owned(),
            Self::OverlappingMerge { .. } => "Cannot merge overlapping variables".to_owned(),
            Self::DivisionByZero { .. } => "Division by zero".to_owned(),
            Self::EmptySubscript { .. } => "Subscripts cannot be empty".to_owned(),
            Self::RandomBound { .. } => {
                "The bound of $RANDOM must be a non-negative number".to_owned()
            },
            Self::CallDepthExceeded { .. } => "Too many nested tag calls".to_owned(),
            Self::ReferenceLoop { .. } => "Reference chain does not terminate".to_owned(),
        }
    }
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (line, column) = self.position();
        write!(f, "Error at line {line}, column {column}: {}.", self.message())
    }
}

impl std::error::Error for RuntimeError {}
