// Token model shared by the lexer engine and the token cursor.
//
// A token borrows its content from the source text. Delimiter-stripped
// tokens (quoted strings) borrow the inner slice, so `content` may be shorter
// than `end - start`.

use std::fmt;

use serde::Serialize;

/// Token discriminant. Each input span belongs to exactly one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Whitespace,
    Newline,
    /// `-- ...` up to (excluding) the end of line.
    Comment,
    /// Quoted text, either `"..."` or `'...'`, delimiters stripped.
    String,
    Float,
    Int,
    /// Single punctuation character.
    Symbol,
    /// `@file` script include directive.
    Include,
    Keyword,
}

impl TokenKind {
    /// Kinds with no grammatical meaning in statement parsing.
    #[must_use]
    pub const fn is_trivia(self) -> bool {
        matches!(self, Self::Whitespace | Self::Newline | Self::Comment)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Whitespace => "whitespace",
            Self::Newline => "newline",
            Self::Comment => "comment",
            Self::String => "string",
            Self::Float => "float",
            Self::Int => "int",
            Self::Symbol => "symbol",
            Self::Include => "include",
            Self::Keyword => "keyword",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified, positioned substring of the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token<'a> {
    pub content: &'a str,
    pub kind: TokenKind,
    /// Byte offset of the first byte of the span (delimiters included).
    pub start: usize,
    /// Byte offset one past the last byte of the span.
    pub end: usize,
    /// 1-based line the span starts on.
    pub line_start: u32,
    /// 1-based line the span ends on.
    pub line_end: u32,
}

impl<'a> Token<'a> {
    /// Build a token spanning `src[start..start + len]`. `line_end` is
    /// `line_start` plus the newlines inside the span.
    #[must_use]
    pub fn from_span(
        src: &'a str,
        start: usize,
        len: usize,
        kind: TokenKind,
        line_start: u32,
    ) -> Self {
        let end = start + len;
        let content = &src[start..end];
        let newlines = memchr::memchr_iter(b'\n', content.as_bytes()).count() as u32;
        Self {
            content,
            kind,
            start,
            end,
            line_start,
            line_end: line_start + newlines,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Kind and case-insensitive content match.
    #[must_use]
    pub fn is(&self, kind: TokenKind, text: &str) -> bool {
        self.kind == kind && self.content.eq_ignore_ascii_case(text)
    }

    #[must_use]
    pub fn is_symbol(&self, sym: &str) -> bool {
        self.kind == TokenKind::Symbol && self.content == sym
    }

    #[must_use]
    pub fn is_keyword(&self, kw: &str) -> bool {
        self.is(TokenKind::Keyword, kw)
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ {} {:?} }}", self.kind, self.content)
    }
}

/// Join token contents with `delim`.
#[must_use]
pub fn join_contents(tokens: &[Token<'_>], delim: &str) -> String {
    tokens
        .iter()
        .map(|t| t.content)
        .collect::<Vec<_>>()
        .join(delim)
}
