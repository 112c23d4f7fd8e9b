use std::fmt;

/// A 1-based (line, column) position in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLoc {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for SourceLoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Error type for the RPAL pipeline, separating failures by stage.
///
/// Keeping lex/parse/standardize/build/eval failures distinct lets callers
/// report accurate diagnostics without string matching, and lets `?`
/// propagate a single error type through `run_source`.
#[derive(Debug, Clone)]
pub enum RpalError {
    /// The lexer found a character it does not recognize, or an unterminated
    /// string literal.
    Lex { loc: SourceLoc, message: String },
    /// The token stream did not match the grammar.
    Parse { loc: SourceLoc, message: String },
    /// The raw AST had a shape the standardizer does not recognize (wrong
    /// arity for a known node label).
    Standardize { message: String },
    /// The standardized AST had a node label the control builder does not
    /// recognize.
    Build { message: String },
    /// The step loop could not make progress (e.g. popped an empty stack).
    Eval { message: String },
}

impl fmt::Display for RpalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lex { loc, message } => write!(f, "lex error at {loc}: {message}"),
            Self::Parse { loc, message } => write!(f, "syntax error at {loc}: {message}"),
            Self::Standardize { message } => write!(f, "standardization error: {message}"),
            Self::Build { message } => write!(f, "control-build error: {message}"),
            Self::Eval { message } => write!(f, "evaluation error: {message}"),
        }
    }
}

impl std::error::Error for RpalError {}
