// Token cursor: a read-only, bounds-checked navigator over a token stream.
//
// Running past the end is reported as `UnexpectedEof`, never a panic.

use ddlscan_error::{DdlError, Result};

use crate::token::{Token, TokenKind, join_contents};

/// Tokens rendered by [`TokenCursor::debug_location`].
const DEBUG_TOKENS: usize = 8;

pub struct TokenCursor<'t, 'a> {
    tokens: &'t [Token<'a>],
    pos: usize,
}

impl<'t, 'a> TokenCursor<'t, 'a> {
    #[must_use]
    pub fn new(tokens: &'t [Token<'a>]) -> Self {
        Self { tokens, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Tokens left to read.
    pub fn available(&self) -> usize {
        self.tokens.len() - self.pos
    }

    pub fn is_at_end(&self) -> bool {
        self.available() == 0
    }

    fn require(&self, n: usize) -> Result<()> {
        if self.available() < n {
            return Err(DdlError::eof(format!(
                "needed {n} tokens at token {}, {} available",
                self.pos,
                self.available()
            )));
        }
        Ok(())
    }

    pub fn peek(&self) -> Result<&'t Token<'a>> {
        self.require(1)?;
        Ok(&self.tokens[self.pos])
    }

    pub fn peek_n(&self, n: usize) -> Result<&'t [Token<'a>]> {
        self.require(n)?;
        Ok(&self.tokens[self.pos..self.pos + n])
    }

    /// Up to `n` upcoming tokens; fewer near the end.
    pub fn peek_up_to(&self, n: usize) -> &'t [Token<'a>] {
        let end = self.pos.saturating_add(n).min(self.tokens.len());
        &self.tokens[self.pos..end]
    }

    pub fn expect_kind(&self, kind: TokenKind) -> Result<bool> {
        Ok(self.peek()?.kind == kind)
    }

    pub fn expect_kind_any(&self, kinds: &[TokenKind]) -> Result<bool> {
        let tok = self.peek()?;
        Ok(kinds.contains(&tok.kind))
    }

    pub fn expect_keyword(&self, kind: TokenKind, text: &str, ignore_case: bool) -> Result<bool> {
        let tok = self.peek()?;
        let same = if ignore_case {
            tok.content.eq_ignore_ascii_case(text)
        } else {
            tok.content == text
        };
        Ok(tok.kind == kind && same)
    }

    /// Like [`Self::expect_keyword`] but `false` at the end of input.
    pub fn at_keyword(&self, kind: TokenKind, text: &str) -> bool {
        self.expect_keyword(kind, text, true).unwrap_or(false)
    }

    pub fn advance(&mut self) -> Result<()> {
        self.advance_n(1)
    }

    pub fn advance_n(&mut self, n: usize) -> Result<()> {
        self.require(n)?;
        self.pos += n;
        Ok(())
    }

    /// Return the next token and move past it.
    pub fn next_token(&mut self) -> Result<&'t Token<'a>> {
        let tok = self.peek()?;
        self.pos += 1;
        Ok(tok)
    }

    /// Consume one token if it is of `kind`.
    pub fn ignore(&mut self, kind: TokenKind) -> bool {
        if self.expect_kind(kind).unwrap_or(false) {
            self.pos += 1;
            return true;
        }
        false
    }

    /// Consume one token if it matches `kind` and `text` (ignoring case).
    pub fn ignore_keyword(&mut self, kind: TokenKind, text: &str) -> bool {
        if self.at_keyword(kind, text) {
            self.pos += 1;
            return true;
        }
        false
    }

    /// Consume the maximal run of `kind` tokens; returns how many.
    pub fn ignore_repeated(&mut self, kind: TokenKind) -> usize {
        let mut count = 0;
        while self.ignore(kind) {
            count += 1;
        }
        count
    }

    /// Tokens from the cursor up to (excluding) the first one matching
    /// `kind` and `text`, searching at most `max_lookahead` tokens. Does not
    /// move the cursor.
    pub fn scan_until(
        &self,
        kind: TokenKind,
        text: &str,
        max_lookahead: usize,
    ) -> Result<&'t [Token<'a>]> {
        let window = self.peek_up_to(max_lookahead);
        match window.iter().position(|t| t.is(kind, text)) {
            Some(idx) => Ok(&window[..idx]),
            None => Err(DdlError::lookahead(text, max_lookahead, self.debug_location())),
        }
    }

    /// Current position as line number plus upcoming token text.
    pub fn debug_location(&self) -> String {
        let upcoming = self.peek_up_to(DEBUG_TOKENS);
        match upcoming.first() {
            Some(first) => format!(
                "tokens at {} aka line {} {:?} [..]",
                self.pos,
                first.line_start,
                join_contents(upcoming, " ")
            ),
            None => format!("tokens at {} aka end of input", self.pos),
        }
    }
}
