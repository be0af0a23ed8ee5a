use thiserror::Error;

/// Primary error type for ddlscan operations.
///
/// Lexer and parser failures are wrapped in [`DdlError::Context`] at every
/// grammar rule they pass through, so the root cause and the rule path that
/// led to it are both kept.
#[derive(Error, Debug)]
pub enum DdlError {
    // === Input exhaustion ===
    /// A lexer or cursor primitive needed more bytes or tokens than remained.
    #[error("unexpected end of input: {detail}")]
    UnexpectedEof { detail: String },

    // === Lexer ===
    /// No tokenizer rule matched at the current position.
    #[error("unhandled input at line {line} {preview:?} [..] after {tokens_read} tokens")]
    UnhandledInput {
        line: u32,
        preview: String,
        tokens_read: usize,
        /// Content of the last few tokens read before the failure.
        recent: Vec<String>,
    },

    /// A lexer pattern failed to compile.
    #[error("invalid lexer pattern: {0}")]
    InvalidPattern(String),

    // === Parser ===
    /// A grammar rule's required token was not present.
    #[error("expected {expected} at {location}")]
    UnexpectedToken { expected: String, location: String },

    /// A bounded scan did not find its terminator within the cap.
    #[error("no {terminator:?} within {limit} tokens at {location}")]
    LookaheadExceeded {
        terminator: String,
        limit: usize,
        location: String,
    },

    /// A numeric type parameter could not be represented.
    #[error("invalid number {text:?} at {location}")]
    InvalidNumber { text: String, location: String },

    // === I/O Errors ===
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Output ===
    /// The extracted schema or token stream could not be serialized.
    #[error("failed to serialize output: {0}")]
    Serialization(String),

    // === Chaining ===
    /// Grammar-rule context wrapped around an underlying failure.
    #[error("{context}")]
    Context {
        context: String,
        #[source]
        source: Box<DdlError>,
    },
}

impl DdlError {
    /// Create an unexpected-end-of-input error.
    pub fn eof(detail: impl Into<String>) -> Self {
        Self::UnexpectedEof {
            detail: detail.into(),
        }
    }

    /// Create an unexpected-token error.
    pub fn unexpected(expected: impl Into<String>, location: impl Into<String>) -> Self {
        Self::UnexpectedToken {
            expected: expected.into(),
            location: location.into(),
        }
    }

    /// Create a lookahead-bound-exceeded error.
    pub fn lookahead(
        terminator: impl Into<String>,
        limit: usize,
        location: impl Into<String>,
    ) -> Self {
        Self::LookaheadExceeded {
            terminator: terminator.into(),
            limit,
            location: location.into(),
        }
    }

    /// Wrap this error with the context of the rule that was running.
    #[must_use]
    pub fn context(self, context: impl Into<String>) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error of a context chain.
    pub fn root_cause(&self) -> &Self {
        let mut current = self;
        while let Self::Context { source, .. } = current {
            current = source;
        }
        current
    }

    /// The context messages from outermost to innermost.
    pub fn contexts(&self) -> Vec<&str> {
        let mut out = Vec::new();
        let mut current = self;
        while let Self::Context { context, source } = current {
            out.push(context.as_str());
            current = source;
        }
        out
    }

    pub fn is_unexpected_eof(&self) -> bool {
        matches!(self.root_cause(), Self::UnexpectedEof { .. })
    }

    pub fn is_unexpected_token(&self) -> bool {
        matches!(self.root_cause(), Self::UnexpectedToken { .. })
    }

    pub fn is_unhandled_input(&self) -> bool {
        matches!(self.root_cause(), Self::UnhandledInput { .. })
    }

    pub fn is_lookahead_exceeded(&self) -> bool {
        matches!(self.root_cause(), Self::LookaheadExceeded { .. })
    }

    /// Process exit code for this error (for CLI use).
    pub fn exit_code(&self) -> i32 {
        match self.root_cause() {
            Self::Io(_) => 74,
            Self::InvalidPattern(_) | Self::Serialization(_) => 70,
            _ => 65,
        }
    }
}

/// Result type alias using `DdlError`.
pub type Result<T> = std::result::Result<T, DdlError>;
