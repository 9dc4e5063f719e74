use std::fmt::Display;

/// A range of unicode scalar offsets into the source being scanned.
///
/// Offsets count `char`s, not bytes, so multi-byte characters are addressed the
/// same way whatever their encoded width.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Span {
        Span { start, end }
    }
    pub fn at(pos: usize) -> Span {
        Span { start: pos, end: pos }
    }
    pub fn is_empty(self) -> bool {
        self.start >= self.end
    }
    pub fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }
}

impl Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Anything meaningful to a user looking at the result of a parse.
#[derive(Clone, Debug, thiserror::Error)]
pub enum LanguageError {
    /// Illegal scanning state, e.g. a range outside of the input. This would
    /// normally point at a defect in the engine or in a grammar.
    #[error("{message} from {} to {}", .span.start, .span.end)]
    Scanning { span: Span, message: String },

    /// A construct failed to parse.
    #[error("{message} from {} to {}", .span.start, .span.end)]
    Parsing { span: Span, message: String },

    /// A violation of the meaning of the grammar, either authored through an
    /// `@error` annotation or found while compiling a grammar.
    #[error("{message} from {} to {}", .span.start, .span.end)]
    Semantic { span: Span, referencing: Option<Span>, message: String },

    /// Can be ignored.
    #[error("{message} from {} to {}", .span.start, .span.end)]
    Warning { span: Span, message: String },
}

// Two errors are the same when they point at the same place and say the same thing.
impl PartialEq for LanguageError {
    fn eq(&self, other: &Self) -> bool {
        self.span() == other.span() && self.message() == other.message()
    }
}

impl Eq for LanguageError {}

impl LanguageError {
    pub fn scanning(span: Span, message: impl Into<String>) -> Self {
        LanguageError::Scanning { span, message: message.into() }
    }
    pub fn parsing(span: Span, message: impl Into<String>) -> Self {
        LanguageError::Parsing { span, message: message.into() }
    }
    pub fn semantic(span: Span, message: impl Into<String>) -> Self {
        LanguageError::Semantic { span, referencing: None, message: message.into() }
    }
    pub fn conflict(span: Span, referencing: Span, message: impl Into<String>) -> Self {
        LanguageError::Semantic { span, referencing: Some(referencing), message: message.into() }
    }
    pub fn warning(span: Span, message: impl Into<String>) -> Self {
        LanguageError::Warning { span, message: message.into() }
    }

    pub fn span(&self) -> Span {
        match self {
            LanguageError::Scanning { span, .. } |
            LanguageError::Parsing { span, .. } |
            LanguageError::Semantic { span, .. } |
            LanguageError::Warning { span, .. } => *span,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            LanguageError::Scanning { message, .. } |
            LanguageError::Parsing { message, .. } |
            LanguageError::Semantic { message, .. } |
            LanguageError::Warning { message, .. } => message,
        }
    }

    pub fn referencing(&self) -> Option<Span> {
        match self {
            LanguageError::Semantic { referencing, .. } => *referencing,
            _ => None,
        }
    }

    pub fn is_warning(&self) -> bool { matches!(self, LanguageError::Warning { .. }) }
    pub fn is_semantic(&self) -> bool { matches!(self, LanguageError::Semantic { .. }) }

    /// Whether `self` is more informative than `other`: it got further into the
    /// input, or it is a semantic error at the same place. Of two semantic
    /// errors at the same place the later one, raised by an enclosing rule,
    /// is the one reported.
    pub(crate) fn outranks(&self, other: &LanguageError) -> bool {
        let (mine, theirs) = (self.span().start, other.span().start);
        mine > theirs || (mine == theirs && self.is_semantic())
    }

    /// Renders the message with its line and column, followed by the offending
    /// source line and a caret under the error column.
    pub fn formatted(&self, source: &str) -> String {
        let chars: Vec<char> = source.chars().collect();
        // errors at the very end point at the last character
        let at = if chars.is_empty() { 0 } else { self.span().start.min(chars.len() - 1) };

        let line_start = chars[..at].iter().rposition(|&c| c == '\n').map_or(0, |i| i + 1);
        let line = chars[..at].iter().filter(|&&c| c == '\n').count() + 1;
        let line_end = chars[at..].iter().position(|&c| c == '\n').map_or(chars.len(), |i| at + i);
        let column = at - line_start;

        let excerpt: String = chars[line_start..line_end].iter().collect();
        let prefix = format!("{} at line {}, column {}: ", self.message(), line, column + 1);
        let pointer = " ".repeat(prefix.chars().count() + column);
        format!("{prefix}{excerpt}\n{pointer}^")
    }
}

/// Fatal errors in the construction of a grammar. These never depend on the
/// input being parsed; they mean the grammar itself is broken.
#[derive(Debug, thiserror::Error)]
pub enum GrammarError {
    #[error("failed to compile pattern /{pattern}/: {source}")]
    MalformedPattern { pattern: String, #[source] source: regex::Error },
    #[error("rule `{0}` was referenced but never defined")]
    Unbound(String),
    #[error("rule `{0}` was already defined")]
    Rebound(String),
    #[error("no rule named `{0}`")]
    UnknownRule(String),
    #[error("a grammar needs at least one rule")]
    Empty,
}

impl From<GrammarError> for LanguageError {
    fn from(err: GrammarError) -> LanguageError {
        LanguageError::semantic(Span::default(), err.to_string())
    }
}

/// Failures of the structural decoder.
#[derive(Clone, PartialEq, Eq, Debug, thiserror::Error)]
pub enum DecodingError {
    #[error("value not found: no `{field}` for {type_name}")]
    ValueNotFound { field: String, type_name: &'static str },
    #[error("expected {type_name} but found `{found}` at {span}")]
    TypeMismatch { type_name: &'static str, found: String, span: Span },
    #[error("tried to decode one of {} as {type_name} but found none of those", .attempted.join(", "))]
    NoAlternative { type_name: &'static str, attempted: Vec<String> },
}
