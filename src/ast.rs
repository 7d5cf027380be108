use std::collections::HashMap;

/// The resolved name of the special variable written `$T`/`$TEST`. It lives
/// in the global frame only; `if` and `else` read and write it through this
/// name.
pub const TEST_VARIABLE: &str = "$TEST";

/// The parsed form of a whole source text.
///
/// All commands live in one flat, ordered sequence: tag bodies are not nested
/// under their tags, they simply begin at the tag's `index` and run until a
/// `quit` (or off the end of the sequence, which is how fall-through between
/// tags works). Indented `do` blocks are the one place nesting appears, as
/// the body of a [`CommandKind::DoBlock`].
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    /// Every command of the program, in execution order.
    pub children: Vec<Command>,
    /// Entry points by tag name.
    pub tags:     HashMap<String, TagDef>,
}

/// A named entry point.
#[derive(Debug, Clone, PartialEq)]
pub struct TagDef {
    /// Index into [`Program::children`] where the tag's code begins.
    pub index:  usize,
    /// Declared parameter names. `None` when the tag has no parameter list
    /// at all; calling such a tag does not push an environment frame.
    pub params: Option<Vec<String>>,
}

/// One imperative statement, with its postconditional.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    /// What the command does.
    pub kind:   CommandKind,
    /// The `:expr` gate evaluated before the command body; the command is
    /// skipped when it coerces to zero.
    pub cond:   Option<Expr>,
    /// Line number in the source code.
    pub line:   usize,
    /// Column number in the source code.
    pub column: usize,
}

/// The command repertoire.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandKind {
    /// `write`: emit values and formatting directives.
    Write {
        /// The write arguments, in order.
        args: Vec<WriteArg>,
    },
    /// `quit`: unwind the innermost block, optionally leaving a return
    /// value.
    Quit {
        /// The return expression, if one was written.
        value: Option<Expr>,
    },
    /// Argumentless `do`: run the indented block that follows this line.
    DoBlock {
        /// The block's commands.
        body: Vec<Command>,
    },
    /// `do name(...)`: call a tag (or host function) as a statement.
    DoCall {
        /// The callee.
        name:      String,
        /// The call arguments.
        arguments: Vec<CallArg>,
    },
    /// `if`: test conditions, record `$TEST`, and gate the rest of the
    /// line.
    If {
        /// The comma-listed conditions; all must be true.
        conditions: Vec<Expr>,
        /// The in-line commands guarded by the conditions.
        body:       Vec<Command>,
    },
    /// `else`: run the rest of the line iff `$TEST` is zero.
    Else {
        /// The in-line commands.
        body: Vec<Command>,
    },
    /// `for`: loop the rest of the line.
    For {
        /// The loop-variable sweep; `None` loops until the body quits.
        sweep: Option<ForArg>,
        /// The in-line body.
        body:  Vec<Command>,
    },
    /// `set`: one or more assignments.
    Set {
        /// The `target=value` pairs, in order.
        assignments: Vec<Assignment>,
    },
    /// `new`: open a scope for the listed names.
    New {
        /// The names to bind in the new frame.
        names: Vec<String>,
    },
    /// `kill`: delete variables, or all locals when the list is empty.
    Kill {
        /// The variables to delete.
        variables: Vec<Variable>,
    },
    /// `merge`: deep-copy one subtree into another.
    Merge {
        /// The destination variable.
        target: Variable,
        /// The source variable.
        source: Variable,
    },
    /// `halt`: end the program.
    Halt,
}

/// One argument of a `write` command.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteArg {
    /// An expression whose text is appended to the output.
    Value(Expr),
    /// `!`: a newline; the column restarts at zero.
    Newline,
    /// `#`: discard the output produced so far and restart the column.
    Reset,
    /// `?expr`: pad with spaces up to the given column; never retracts.
    Column(Expr),
}

/// One `target=value` pair of a `set` command.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    /// Where the value goes.
    pub target: SetTarget,
    /// The value expression.
    pub value:  Expr,
}

/// The left side of an assignment.
#[derive(Debug, Clone, PartialEq)]
pub enum SetTarget {
    /// An ordinary variable.
    Variable(Variable),
    /// `$E(var, ...)`: splice the value into a range of the variable's
    /// string form, with the same range rules as the `$EXTRACT` builtin.
    Extract {
        /// The variable whose text is spliced.
        variable: Variable,
        /// Start position (1-based); defaults to the first character.
        start:    Option<Expr>,
        /// End position (inclusive); defaults to `start`.
        end:      Option<Expr>,
    },
}

/// The `var=...` header of a parameterized `for`.
#[derive(Debug, Clone, PartialEq)]
pub struct ForArg {
    /// The loop variable.
    pub variable:   Variable,
    /// The comma-listed sweeps, processed in order.
    pub parameters: Vec<ForParameter>,
}

/// One sweep of a `for` loop: `start`, `start:step`, or
/// `start:step:limit`.
#[derive(Debug, Clone, PartialEq)]
pub struct ForParameter {
    /// The first value of the sweep.
    pub start: Expr,
    /// The increment; absent for a single-shot sweep.
    pub step:  Option<Expr>,
    /// The bound checked before each iteration; absent sweeps are open
    /// ended.
    pub limit: Option<Expr>,
}

/// A variable reference: a name plus any subscripts.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    /// The variable name.
    pub name:       String,
    /// The subscript expressions, outermost first.
    pub subscripts: Vec<Expr>,
    /// Line number in the source code.
    pub line:       usize,
    /// Column number in the source code.
    pub column:     usize,
}

/// One argument of a tag or host call.
#[derive(Debug, Clone, PartialEq)]
pub enum CallArg {
    /// An expression passed by value.
    Value(Expr),
    /// `.name`: the caller's slot passed by reference.
    ByReference(String),
}

/// A literal value as written in source.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    /// A numeric literal.
    Number(f64),
    /// A string literal, with `""` escapes already decoded.
    Text(String),
}

/// An expression tree node.
///
/// Binary operators carry no precedence; the parser folds them strictly left
/// to right, so the tree shape already encodes evaluation order.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal value.
    Literal {
        /// The constant value.
        value:  LiteralValue,
        /// Line number in the source code.
        line:   usize,
        /// Column number in the source code.
        column: usize,
    },
    /// A variable read.
    Variable(Variable),
    /// A prefix operator application.
    Unary {
        /// The operator.
        op:     UnaryOperator,
        /// The operand.
        expr:   Box<Expr>,
        /// Line number in the source code.
        line:   usize,
        /// Column number in the source code.
        column: usize,
    },
    /// A binary operator application.
    Binary {
        /// The operator.
        op:      BinaryOperator,
        /// Left operand.
        left:    Box<Expr>,
        /// Right operand.
        right:   Box<Expr>,
        /// Whether a leading `'` inverts the result.
        negated: bool,
        /// Line number in the source code.
        line:    usize,
        /// Column number in the source code.
        column:  usize,
    },
    /// `$$name(...)`: a tag or host call in value position.
    Call {
        /// The callee.
        name:      String,
        /// The call arguments.
        arguments: Vec<CallArg>,
        /// Line number in the source code.
        line:      usize,
        /// Column number in the source code.
        column:    usize,
    },
    /// A `$builtin(...)` invocation.
    Builtin {
        /// Which builtin, with its parsed arguments.
        call:   BuiltinCall,
        /// Line number in the source code.
        line:   usize,
        /// Column number in the source code.
        column: usize,
    },
}

impl Expr {
    /// Gets the source position of `self`.
    #[must_use]
    pub const fn position(&self) -> (usize, usize) {
        match self {
            Self::Literal { line, column, .. }
            | Self::Unary { line, column, .. }
            | Self::Binary { line, column, .. }
            | Self::Call { line, column, .. }
            | Self::Builtin { line, column, .. } => (*line, *column),
            Self::Variable(variable) => (variable.line, variable.column),
        }
    }
}

/// A builtin invocation with its arguments in parsed shape.
#[derive(Debug, Clone, PartialEq)]
pub enum BuiltinCall {
    /// `$O(var[, dir])`: the neighbouring key of the addressed slot.
    Order {
        /// The subscripted variable whose final key is the starting point.
        variable:  Variable,
        /// The direction, `1` (default) or `-1`.
        direction: Option<Box<Expr>>,
    },
    /// `$L(s)`: string length.
    Length(Box<Expr>),
    /// `$E(s[, start[, end]])`: substring extraction.
    Extract {
        /// The string to slice.
        value: Box<Expr>,
        /// Start position (1-based); defaults to the first character.
        start: Option<Box<Expr>>,
        /// End position (inclusive); defaults to `start`.
        end:   Option<Box<Expr>>,
    },
    /// `$S(c:v, ...)`: the value of the first true condition.
    Select {
        /// The `condition:value` arms, in order.
        arms: Vec<SelectArm>,
    },
    /// `$F(hay, needle[, start])`: position after the first occurrence.
    Find {
        /// The string searched.
        haystack: Box<Expr>,
        /// The string searched for.
        needle:   Box<Expr>,
        /// The 1-based position to search from.
        start:    Option<Box<Expr>>,
    },
    /// `$R(n)`: a uniform integer in `[0, n]`.
    Random(Box<Expr>),
    /// `$A(s)`: the code point of the first character, or `-1`.
    Ascii(Box<Expr>),
    /// `$C(n)`: the one-character string with code point `n`.
    Char(Box<Expr>),
}

/// One `condition:value` arm of a `$SELECT`.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectArm {
    /// The guard expression.
    pub condition: Expr,
    /// The value produced when the guard is the first true one.
    pub value:     Expr,
}

/// Represents a binary operator.
///
/// All binary operators share one precedence level and associate to the
/// left; only parentheses group.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinaryOperator {
    /// Logical or (`!`)
    Or,
    /// Logical and (`&`)
    And,
    /// String equality (`=`)
    Equal,
    /// Numeric less-than (`<`)
    Less,
    /// Numeric greater-than (`>`)
    Greater,
    /// Addition (`+`)
    Add,
    /// Subtraction (`-`)
    Subtract,
    /// Multiplication (`*`)
    Multiply,
    /// Exponentiation (`**`)
    Power,
    /// Division (`/`)
    Divide,
    /// Integer division, flooring (`\`)
    IntegerDivide,
    /// Remainder, signed like the dividend (`#`)
    Modulo,
    /// String concatenation (`_`)
    Concat,
}

/// Represents a unary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UnaryOperator {
    /// Logical NOT (`'x`).
    Not,
    /// Numeric coercion (`+x`).
    Plus,
    /// Arithmetic negation (`-x`).
    Minus,
}

impl std::fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use BinaryOperator::{
            Add, And, Concat, Divide, Equal, Greater, IntegerDivide, Less, Modulo, Multiply, Or,
            Power, Subtract,
        };
        let operator = match self {
            Or => "!",
            And => "&",
            Equal => "=",
            Less => "<",
            Greater => ">",
            Add => "+",
            Subtract => "-",
            Multiply => "*",
            Power => "**",
            Divide => "/",
            IntegerDivide => "\\",
            Modulo => "#",
            Concat => "_",
        };
        write!(f, "{operator}")
    }
}
