// Hand-written lexer and recursive descent parser for Oracle DDL scripts.
//
// Produces the schema model from `ddlscan-schema`. The two entry points are
// `tokenize` (source text to tokens) and `parse` (tokens to schema).

pub mod cursor;
pub mod keywords;
pub mod lexer;
pub mod oracle;
pub mod token;

use ddlscan_error::Result;
use ddlscan_schema::{DbOrigin, TablesDef};

pub use cursor::TokenCursor;
pub use keywords::{KeywordTable, ORACLE_KEYWORDS};
pub use lexer::Lexer;
pub use oracle::{Parser, Tokenizer, parse, parse_with_origin, tokenize};
pub use token::{Token, TokenKind};

/// Tokenize and parse `src` in one step.
pub fn parse_source(src: &str, origin: DbOrigin) -> Result<TablesDef> {
    let tokens = tokenize(src).map_err(|e| e.context("failed to tokenize source"))?;
    parse_with_origin(&tokens, origin).map_err(|e| e.context("failed to parse source"))
}
