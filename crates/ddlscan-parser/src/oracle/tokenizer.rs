// Oracle script tokenizer: a fixed, priority-ordered list of lexer rules
// tried at each position until the input is exhausted.

use ddlscan_error::{DdlError, Result};
use regex::Regex;
use tracing::{debug, trace};

use crate::keywords::{KeywordTable, ORACLE_KEYWORDS};
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

pub const CHARSET_WHITESPACE: &str = "\t ";
pub const CHARSET_NEWLINE: &str = "\n\r";
pub const CHARSET_INT: &str = "0123456789";
pub const CHARSET_SYMBOL: &str = ".,();*";
pub const FLOAT_PATTERN: &str = r"^[0-9]+\.[0-9]+";

/// Tokens carried on an unhandled-input error.
const RECENT_TOKENS: usize = 8;

/// Tokenizer for Oracle DDL scripts. Owns its pre-sorted keyword table.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    keywords: KeywordTable,
    float: Regex,
}

impl Tokenizer {
    /// Tokenizer with the Oracle keyword table.
    pub fn new() -> Result<Self> {
        Self::with_keywords(KeywordTable::new(ORACLE_KEYWORDS))
    }

    pub fn with_keywords(keywords: KeywordTable) -> Result<Self> {
        let float = Regex::new(FLOAT_PATTERN).map_err(|e| DdlError::InvalidPattern(e.to_string()))?;
        Ok(Self { keywords, float })
    }

    pub fn keywords(&self) -> &KeywordTable {
        &self.keywords
    }

    /// Partition `src` into tokens, trivia included.
    pub fn tokenize<'a>(&self, src: &'a str) -> Result<Vec<Token<'a>>> {
        let mut lx = Lexer::new(src);
        while !lx.at_end() {
            if !self.match_next(&mut lx)? {
                let recent = lx
                    .tokens()
                    .iter()
                    .rev()
                    .take(RECENT_TOKENS)
                    .rev()
                    .map(|t| t.content.to_owned())
                    .collect();
                debug!(tokens = ?lx.tokens(), "tokens read before unhandled input");
                return Err(DdlError::UnhandledInput {
                    line: lx.line(),
                    preview: lx.peek_up_to(64).to_owned(),
                    tokens_read: lx.tokens().len(),
                    recent,
                });
            }
        }
        let tokens = lx.into_tokens();
        debug!(count = tokens.len(), bytes = src.len(), "tokenized source");
        Ok(tokens)
    }

    /// Try every rule in priority order at the current position.
    fn match_next(&self, lx: &mut Lexer<'_>) -> Result<bool> {
        let rules: [(&str, &dyn Fn(&mut Lexer<'_>) -> Result<bool>); 10] = [
            ("whitespace", &|lx| lx.match_charset_run(CHARSET_WHITESPACE, TokenKind::Whitespace)),
            ("newline", &|lx| lx.match_charset_run(CHARSET_NEWLINE, TokenKind::Newline)),
            ("comment", &|lx| {
                lx.match_prefixed_until_charset("--", CHARSET_NEWLINE, TokenKind::Comment)
            }),
            ("string", &|lx| lx.match_delimited("\"", TokenKind::String, false)),
            ("string", &|lx| lx.match_delimited("'", TokenKind::String, false)),
            ("float", &|lx| lx.match_regex(&self.float, TokenKind::Float)),
            ("int", &|lx| lx.match_charset_run(CHARSET_INT, TokenKind::Int)),
            ("symbol", &|lx| lx.match_charset_once(CHARSET_SYMBOL, TokenKind::Symbol)),
            ("include", &|lx| {
                lx.match_prefixed_until_charset("@", CHARSET_NEWLINE, TokenKind::Include)
            }),
            ("keyword", &|lx| {
                lx.match_any_literal(self.keywords.iter(), TokenKind::Keyword, false)
            }),
        ];

        for (what, rule) in rules {
            if rule(lx).map_err(|e| e.context(rule_context(what, lx)))? {
                trace!(rule = what, line = lx.line(), "matched");
                return Ok(true);
            }
        }
        Ok(false)
    }
}

fn rule_context(what: &str, lx: &Lexer<'_>) -> String {
    format!("error while reading {what} at {}", lx.debug_location())
}

/// Tokenize `src` with the Oracle keyword table.
pub fn tokenize(src: &str) -> Result<Vec<Token<'_>>> {
    Tokenizer::new()?.tokenize(src)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<(TokenKind, &str)> {
        tokenize(src)
            .unwrap()
            .into_iter()
            .map(|t| (t.kind, t.content))
            .collect()
    }

    #[test]
    fn classifies_every_rule() {
        let toks = kinds("CREATE \"T\"\n-- c\n'x' 1.5 42 ; @inc.sql\n");
        assert_eq!(
            toks,
            vec![
                (TokenKind::Keyword, "CREATE"),
                (TokenKind::Whitespace, " "),
                (TokenKind::String, "T"),
                (TokenKind::Newline, "\n"),
                (TokenKind::Comment, "-- c"),
                (TokenKind::Newline, "\n"),
                (TokenKind::String, "x"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Float, "1.5"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Int, "42"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Symbol, ";"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Include, "@inc.sql"),
                (TokenKind::Newline, "\n"),
            ]
        );
    }

    #[test]
    fn longest_keyword_wins() {
        let tk = Tokenizer::with_keywords(KeywordTable::new(&["T", "TABLE"])).unwrap();
        let toks = tk.tokenize("TABLE").unwrap();
        assert_eq!(toks.len(), 1);
        assert_eq!(toks[0].kind, TokenKind::Keyword);
        assert_eq!(toks[0].content, "TABLE");
    }

    #[test]
    fn keywords_keep_source_case() {
        let toks = kinds("integer int");
        assert_eq!(toks[0], (TokenKind::Keyword, "integer"));
        assert_eq!(toks[2], (TokenKind::Keyword, "int"));
    }

    #[test]
    fn float_before_int() {
        let toks = kinds("10.25,7");
        assert_eq!(
            toks,
            vec![
                (TokenKind::Float, "10.25"),
                (TokenKind::Symbol, ","),
                (TokenKind::Int, "7"),
            ]
        );
    }

    #[test]
    fn trailing_symbol_without_newline() {
        let toks = kinds("(1);");
        assert_eq!(toks.last(), Some(&(TokenKind::Symbol, ";")));
    }

    #[test]
    fn unterminated_string_is_eof() {
        let err = tokenize("CREATE TABLE \"T\" (\"A\" 'unterminated").unwrap_err();
        assert!(err.is_unexpected_eof());
        assert!(err.contexts()[0].starts_with("error while reading string at line 1"));
    }

    #[test]
    fn unterminated_comment_is_eof() {
        let err = tokenize("-- no newline").unwrap_err();
        assert!(err.is_unexpected_eof());
    }

    #[test]
    fn unhandled_input_reports_position() {
        let err = tokenize("CREATE\n  TABLE ?").unwrap_err();
        assert!(err.is_unhandled_input());
        match err {
            DdlError::UnhandledInput {
                line,
                preview,
                tokens_read,
                recent,
            } => {
                assert_eq!(line, 2);
                assert_eq!(preview, "?");
                assert_eq!(tokens_read, 5);
                assert_eq!(recent, vec!["CREATE", "\n", "  ", "TABLE", " "]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn crlf_is_one_newline_run() {
        let toks = tokenize("ON\r\n\r\nTO").unwrap();
        assert_eq!(toks.len(), 3);
        assert_eq!(toks[1].kind, TokenKind::Newline);
        assert_eq!(toks[2].line_start, 3);
    }

    #[test]
    fn same_input_same_tokens() {
        let src = "CREATE TABLE \"S\".\"T\" (\"A\" NUMBER(10,2) DEFAULT 0.5);\n";
        assert_eq!(tokenize(src).unwrap(), tokenize(src).unwrap());
    }
}
