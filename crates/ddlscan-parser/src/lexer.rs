// Lexer engine: a cursor over raw source text with composable match
// primitives. Every successful match appends one token and advances.
//
// Primitives return `Ok(true)` on a match, `Ok(false)` when the rule does not
// apply here, and `Err` only for malformed input (an opened region that never
// closes). Charsets and delimiters are ASCII, so every cursor position stays
// on a UTF-8 character boundary.

use ddlscan_error::{DdlError, Result};
use memchr::memmem;
use regex::Regex;

use crate::token::{Token, TokenKind};

/// Bytes shown by [`Lexer::debug_location`].
const DEBUG_PREVIEW_BYTES: usize = 64;

/// Cursor over source text that accumulates tokens.
pub struct Lexer<'a> {
    src: &'a str,
    /// Current byte offset into src.
    pos: usize,
    /// Current line number (1-based).
    line: u32,
    tokens: Vec<Token<'a>>,
}

impl<'a> Lexer<'a> {
    #[must_use]
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
            tokens: Vec::new(),
        }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn tokens(&self) -> &[Token<'a>] {
        &self.tokens
    }

    pub fn into_tokens(self) -> Vec<Token<'a>> {
        self.tokens
    }

    /// Bytes left to read.
    pub fn available(&self) -> usize {
        self.src.len() - self.pos
    }

    pub fn at_end(&self) -> bool {
        self.available() == 0
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    /// Up to `n` upcoming bytes, shortened to a character boundary.
    pub fn peek_up_to(&self, n: usize) -> &'a str {
        let mut end = self.pos.saturating_add(n).min(self.src.len());
        while !self.src.is_char_boundary(end) {
            end -= 1;
        }
        &self.src[self.pos..end]
    }

    pub fn debug_location(&self) -> String {
        format!(
            "line {} {:?} [..]",
            self.line,
            self.peek_up_to(DEBUG_PREVIEW_BYTES)
        )
    }

    /// Emit a token over the next `len` bytes and advance past it.
    fn emit(&mut self, len: usize, kind: TokenKind) -> Token<'a> {
        let tok = Token::from_span(self.src, self.pos, len, kind, self.line);
        self.pos = tok.end;
        self.line = tok.line_end;
        self.tokens.push(tok);
        tok
    }

    fn starts_with(&self, text: &str, case_sensitive: bool) -> bool {
        match self.rest().as_bytes().get(..text.len()) {
            Some(head) if case_sensitive => head == text.as_bytes(),
            Some(head) => head.eq_ignore_ascii_case(text.as_bytes()),
            None => false,
        }
    }

    /// Match `text` exactly at the cursor. Not enough input left is a miss.
    pub fn match_literal(
        &mut self,
        text: &str,
        kind: TokenKind,
        case_sensitive: bool,
    ) -> Result<bool> {
        if text.is_empty() || !self.starts_with(text, case_sensitive) {
            return Ok(false);
        }
        self.emit(text.len(), kind);
        Ok(true)
    }

    /// Try `candidates` in the given order; the first match wins.
    pub fn match_any_literal<I, S>(
        &mut self,
        candidates: I,
        kind: TokenKind,
        case_sensitive: bool,
    ) -> Result<bool>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for candidate in candidates {
            if self.match_literal(candidate.as_ref(), kind, case_sensitive)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Match a single byte from `charset`.
    pub fn match_charset_once(&mut self, charset: &str, kind: TokenKind) -> Result<bool> {
        debug_assert!(charset.is_ascii());
        match self.rest().as_bytes().first() {
            Some(b) if charset.as_bytes().contains(b) => {
                self.emit(1, kind);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Match the longest run of bytes from `charset`.
    pub fn match_charset_run(&mut self, charset: &str, kind: TokenKind) -> Result<bool> {
        debug_assert!(charset.is_ascii());
        let set = charset.as_bytes();
        let run = self
            .rest()
            .as_bytes()
            .iter()
            .take_while(|b| set.contains(b))
            .count();
        if run == 0 {
            return Ok(false);
        }
        self.emit(run, kind);
        Ok(true)
    }

    fn find_any(&self, from: usize, terminators: &str) -> Option<usize> {
        let set = terminators.as_bytes();
        self.src.as_bytes()[from..]
            .iter()
            .position(|b| set.contains(b))
            .map(|i| from + i)
    }

    /// Match everything up to (excluding) the first byte in `terminators`.
    /// Hitting the end of input first is an error.
    pub fn match_until_charset(&mut self, terminators: &str, kind: TokenKind) -> Result<bool> {
        debug_assert!(terminators.is_ascii());
        let Some(stop) = self.find_any(self.pos, terminators) else {
            return Err(DdlError::eof(format!(
                "no terminator from {terminators:?} before end of input"
            )));
        };
        if stop == self.pos {
            return Ok(false);
        }
        self.emit(stop - self.pos, kind);
        Ok(true)
    }

    /// Like [`Self::match_until_charset`], but only applies when the input
    /// continues with `prefix`. The token spans the prefix too.
    pub fn match_prefixed_until_charset(
        &mut self,
        prefix: &str,
        terminators: &str,
        kind: TokenKind,
    ) -> Result<bool> {
        debug_assert!(terminators.is_ascii());
        if prefix.is_empty() || !self.starts_with(prefix, true) {
            return Ok(false);
        }
        let Some(stop) = self.find_any(self.pos + prefix.len(), terminators) else {
            return Err(DdlError::eof(format!(
                "{prefix:?} opened but no terminator from {terminators:?} before end of input"
            )));
        };
        self.emit(stop - self.pos, kind);
        Ok(true)
    }

    /// Match `delimiter ... delimiter` (no nesting, no escapes). The content
    /// excludes the delimiters unless `include_delimiters` is set; the span
    /// always covers them.
    pub fn match_delimited(
        &mut self,
        delimiter: &str,
        kind: TokenKind,
        include_delimiters: bool,
    ) -> Result<bool> {
        debug_assert!(delimiter.is_ascii());
        if delimiter.is_empty() || !self.starts_with(delimiter, true) {
            return Ok(false);
        }
        let width = delimiter.len();
        let body = &self.rest().as_bytes()[width..];
        let Some(close) = memmem::find(body, delimiter.as_bytes()) else {
            return Err(DdlError::eof(format!("unterminated {delimiter} region")));
        };
        let tok = self.emit(close + 2 * width, kind);
        if !include_delimiters {
            if let Some(last) = self.tokens.last_mut() {
                last.content = &self.src[tok.start + width..tok.end - width];
            }
        }
        Ok(true)
    }

    /// Match `pattern` at the cursor. An empty match is a miss.
    ///
    /// `pattern` must start with `^`: an unanchored pattern would search the
    /// whole remaining input at every position.
    pub fn match_regex(&mut self, pattern: &Regex, kind: TokenKind) -> Result<bool> {
        debug_assert!(pattern.as_str().starts_with('^'), "unanchored lexer pattern");
        match pattern.find(self.rest()) {
            Some(m) if m.start() == 0 && !m.is_empty() => {
                self.emit(m.end(), kind);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
