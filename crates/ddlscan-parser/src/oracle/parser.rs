// Oracle DDL statement parser.
//
// Hand-written recursive descent over a `TokenCursor`. Recognized statements
// are decomposed into the schema model; clauses the model has no place for
// are skipped up to the statement terminator with bounded scans.

use ddlscan_error::{DdlError, Result};
use ddlscan_schema::{ColumnDef, Comment, DbOrigin, Grant, TableDef, TablesDef};
use tracing::{debug, info, warn};

use crate::cursor::TokenCursor;
use crate::token::{Token, TokenKind};

/// Most tokens scanned for the closing `)` of a type's parameters.
pub const TYPE_PARAM_LOOKAHEAD: usize = 12;
/// Most tokens scanned for the end of a statement or clause.
pub const STATEMENT_LOOKAHEAD: usize = 256;

/// Types whose single parameter is a length rather than a precision.
const CHARACTER_TYPES: &[&str] = &[
    "CHAR", "CHARACTER", "NCHAR", "VARCHAR", "VARCHAR2", "NVARCHAR2", "RAW",
];

/// Two-keyword type names.
const TYPE_SUFFIXES: &[(&str, &str)] = &[("DOUBLE", "PRECISION"), ("LONG", "RAW")];

/// Keywords that open an out-of-line constraint inside a column list.
const TABLE_CONSTRAINT_KEYWORDS: &[&str] = &["CONSTRAINT", "PRIMARY", "UNIQUE", "CHECK", "FOREIGN"];

/// Inline constraint keywords that carry nothing for the model.
const SKIPPED_COLUMN_KEYWORDS: &[&str] = &["UNIQUE", "ENABLE", "DISABLE", "VALIDATE", "NOVALIDATE"];

/// Drop whitespace, newline and comment tokens.
pub fn significant_tokens<'a>(tokens: &[Token<'a>]) -> Vec<Token<'a>> {
    tokens.iter().filter(|t| !t.kind.is_trivia()).copied().collect()
}

/// Parse a token stream into a schema stamped with the Oracle origin.
pub fn parse(tokens: &[Token<'_>]) -> Result<TablesDef> {
    parse_with_origin(tokens, DbOrigin::oracle())
}

pub fn parse_with_origin(tokens: &[Token<'_>], origin: DbOrigin) -> Result<TablesDef> {
    let significant = significant_tokens(tokens);
    Parser::new(&significant, origin).parse()
}

pub struct Parser<'t, 'a> {
    cur: TokenCursor<'t, 'a>,
    defs: TablesDef,
}

impl<'t, 'a> Parser<'t, 'a> {
    /// `tokens` must already be free of trivia (see [`significant_tokens`]).
    #[must_use]
    pub fn new(tokens: &'t [Token<'a>], origin: DbOrigin) -> Self {
        Self {
            cur: TokenCursor::new(tokens),
            defs: TablesDef::new(origin),
        }
    }

    /// Run the statement loop until the tokens are exhausted.
    pub fn parse(mut self) -> Result<TablesDef> {
        while !self.cur.is_at_end() {
            let tok = *self.cur.peek()?;
            match tok.kind {
                TokenKind::Keyword if tok.is_keyword("CREATE") => {
                    self.rule("failed to parse CREATE statement", Self::parse_create)?;
                }
                TokenKind::Keyword if tok.is_keyword("GRANT") => {
                    self.rule("failed to parse GRANT statement", Self::parse_grant)?;
                }
                TokenKind::Keyword if tok.is_keyword("COMMENT") => {
                    self.rule("failed to parse COMMENT statement", Self::parse_comment)?;
                }
                TokenKind::Include => self.parse_include()?,
                _ => {
                    return Err(DdlError::unexpected(
                        "CREATE, GRANT or COMMENT",
                        self.cur.debug_location(),
                    ));
                }
            }
        }
        info!(
            tables = self.defs.tables.len(),
            grants = self.defs.grants.len(),
            comments = self.defs.comments.len(),
            "parsed script"
        );
        Ok(self.defs)
    }

    /// Run `f`, wrapping any failure with `what` and the cursor location.
    fn rule<T>(&mut self, what: &str, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        f(self).map_err(|e| e.context(format!("{what} at {}", self.cur.debug_location())))
    }

    fn unexpected(&self, expected: impl Into<String>) -> DdlError {
        DdlError::unexpected(expected, self.cur.debug_location())
    }

    /// Consume the next token if it is of `kind`.
    fn take(&mut self, kind: TokenKind, what: &str) -> Result<&'t Token<'a>> {
        if self.cur.expect_kind(kind)? {
            return self.cur.next_token();
        }
        Err(self.unexpected(what))
    }

    fn expect(&mut self, kind: TokenKind, text: &str) -> Result<()> {
        if self.cur.expect_keyword(kind, text, true)? {
            return self.cur.advance();
        }
        Err(self.unexpected(format!("{kind} {text:?}")))
    }

    fn expect_symbol(&mut self, sym: &str) -> Result<()> {
        self.expect(TokenKind::Symbol, sym)
    }

    fn expect_keyword(&mut self, kw: &str) -> Result<()> {
        self.expect(TokenKind::Keyword, kw)
    }

    /// Consume everything up to and including the next `;`.
    fn skip_to_terminator(&mut self) -> Result<&'t [Token<'a>]> {
        let body = self.cur.scan_until(TokenKind::Symbol, ";", STATEMENT_LOOKAHEAD)?;
        self.cur.advance_n(body.len() + 1)?;
        Ok(body)
    }

    // -----------------------------------------------------------------------
    // CREATE
    // -----------------------------------------------------------------------

    fn parse_create(&mut self) -> Result<()> {
        self.cur.advance()?; // CREATE
        if self.cur.expect_keyword(TokenKind::Keyword, "TABLE", true)? {
            return self.rule("failed to parse CREATE TABLE", Self::parse_table);
        }
        Err(self.unexpected("TABLE (unsupported CREATE substep)"))
    }

    fn parse_table(&mut self) -> Result<()> {
        self.cur.advance()?; // TABLE
        let name = self.rule("failed to parse table name", Self::parse_qualified_name)?;
        let mut table = TableDef::new(name);
        self.rule("failed to parse column list", |p| p.parse_column_list(&mut table))?;

        let tail = self.rule("failed to skip table options", Self::skip_to_terminator)?;
        debug!(
            table = %table.name,
            columns = table.columns.len(),
            skipped = tail.len(),
            "CREATE TABLE"
        );
        if let Some(prev) = self.defs.insert_table(table) {
            warn!(table = %prev.name, "table defined again; keeping the later definition");
        }
        Ok(())
    }

    /// `"name"` or `"parent"."child"`, recorded as read.
    fn parse_qualified_name(&mut self) -> Result<String> {
        let first = self.take(TokenKind::String, "table name string")?.content;
        if self.cur.ignore_keyword(TokenKind::Symbol, ".") {
            let second = self.take(TokenKind::String, "table name string after '.'")?.content;
            return Ok(format!("{first}.{second}"));
        }
        Ok(first.to_owned())
    }

    fn parse_column_list(&mut self, table: &mut TableDef) -> Result<()> {
        self.expect_symbol("(")?;
        loop {
            if self.at_table_constraint() {
                self.rule("failed to skip table constraint", Self::skip_table_constraint)?;
            } else {
                let column = self.rule("failed to parse column definition", Self::parse_column)?;
                table.push_column(column);
            }
            if !self.cur.ignore_keyword(TokenKind::Symbol, ",") {
                break;
            }
        }
        self.expect_symbol(")")
    }

    fn at_table_constraint(&self) -> bool {
        self.cur
            .peek()
            .is_ok_and(|t| TABLE_CONSTRAINT_KEYWORDS.iter().any(|kw| t.is_keyword(kw)))
    }

    /// Skip to the `,` or `)` that ends this column-list element.
    fn skip_table_constraint(&mut self) -> Result<()> {
        let window = self.cur.peek_up_to(STATEMENT_LOOKAHEAD);
        let mut depth = 0usize;
        for (i, tok) in window.iter().enumerate() {
            if tok.is_symbol("(") {
                depth += 1;
            } else if tok.is_symbol(")") {
                if depth == 0 {
                    return self.cur.advance_n(i);
                }
                depth -= 1;
            } else if tok.is_symbol(",") && depth == 0 {
                return self.cur.advance_n(i);
            }
        }
        Err(DdlError::lookahead(
            ", or )",
            STATEMENT_LOOKAHEAD,
            self.cur.debug_location(),
        ))
    }

    fn parse_column(&mut self) -> Result<ColumnDef> {
        let name = self.take(TokenKind::String, "column name string")?.content;
        let mut column = self.rule("failed to parse column type", |p| p.parse_column_type(name))?;

        if self.cur.ignore_keyword(TokenKind::Keyword, "DEFAULT") {
            let value = self.rule("failed to parse DEFAULT value", Self::parse_default)?;
            column.default = Some(value);
        }
        self.rule("failed to parse column constraints", |p| {
            p.parse_inline_constraints(&mut column)
        })?;
        Ok(column)
    }

    fn parse_column_type(&mut self, name: &str) -> Result<ColumnDef> {
        let tok = self.take(TokenKind::Keyword, "column type keyword")?;
        let mut column = ColumnDef::new(name, tok.content.to_ascii_uppercase());

        for (head, tail) in TYPE_SUFFIXES {
            if column.data_type == *head && self.cur.ignore_keyword(TokenKind::Keyword, tail) {
                column.data_type = format!("{head} {tail}");
            }
        }

        if self.cur.ignore_keyword(TokenKind::Symbol, "(") {
            let params = self
                .cur
                .scan_until(TokenKind::Symbol, ")", TYPE_PARAM_LOOKAHEAD)?;
            self.apply_type_params(&mut column, params)?;
            self.cur.advance_n(params.len())?;
            self.expect_symbol(")")?;
        }

        if column.data_type == "TIMESTAMP" && self.cur.ignore_keyword(TokenKind::Keyword, "WITH") {
            let local = self.cur.ignore_keyword(TokenKind::Keyword, "LOCAL");
            self.expect_keyword("TIME")?;
            self.expect_keyword("ZONE")?;
            column.data_type = if local {
                "TIMESTAMP WITH LOCAL TIME ZONE".to_owned()
            } else {
                "TIMESTAMP WITH TIME ZONE".to_owned()
            };
        }
        Ok(column)
    }

    /// `(n)`, `(n BYTE)`, `(p, s)` or `(*, s)`. Anything else is kept opaque.
    fn apply_type_params(&self, column: &mut ColumnDef, params: &[Token<'a>]) -> Result<()> {
        let Some(first) = params.first() else {
            return Ok(());
        };
        let lead = match first.kind {
            TokenKind::Int => Some(self.number(first)?),
            TokenKind::Symbol if first.is_symbol("*") => None,
            _ => return Ok(()),
        };

        if CHARACTER_TYPES.contains(&column.data_type.as_str()) {
            column.var_char_size = lead;
            return Ok(());
        }
        column.precision = lead;
        if let [_, comma, scale, ..] = params {
            if comma.is_symbol(",") && scale.kind == TokenKind::Int {
                column.scale = Some(self.number(scale)?);
            }
        }
        Ok(())
    }

    fn number(&self, tok: &Token<'_>) -> Result<u32> {
        tok.content.parse().map_err(|_| DdlError::InvalidNumber {
            text: tok.content.to_owned(),
            location: self.cur.debug_location(),
        })
    }

    /// A string literal, number or keyword token.
    fn parse_default(&mut self) -> Result<String> {
        if self.cur.expect_kind(TokenKind::String)? {
            let run = adjacent_string_run(self.cur.peek_up_to(STATEMENT_LOOKAHEAD));
            let text = string_literal(self.cur.peek_n(run)?)
                .ok_or_else(|| self.unexpected("string default value"))?;
            self.cur.advance_n(run)?;
            return Ok(text);
        }
        let kinds = [
            TokenKind::String,
            TokenKind::Int,
            TokenKind::Float,
            TokenKind::Keyword,
        ];
        if !self.cur.expect_kind_any(&kinds)? {
            return Err(self.unexpected("default value (string, int, float or keyword)"));
        }
        let tok = self.cur.next_token()?;
        Ok(match tok.kind {
            TokenKind::Keyword => tok.content.to_ascii_uppercase(),
            _ => tok.content.to_owned(),
        })
    }

    fn parse_inline_constraints(&mut self, column: &mut ColumnDef) -> Result<()> {
        loop {
            let Ok(tok) = self.cur.peek() else {
                return Ok(());
            };
            if tok.kind != TokenKind::Keyword {
                return Ok(());
            }
            if tok.is_keyword("NOT") {
                self.cur.advance()?;
                self.expect_keyword("NULL")?;
                column.nullable = false;
            } else if tok.is_keyword("NULL") {
                self.cur.advance()?;
                column.nullable = true;
            } else if tok.is_keyword("PRIMARY") {
                self.cur.advance()?;
                self.expect_keyword("KEY")?;
                column.primary_key = true;
                column.nullable = false;
            } else if tok.is_keyword("CONSTRAINT") {
                self.cur.advance()?;
                self.take(TokenKind::String, "constraint name string")?;
            } else if SKIPPED_COLUMN_KEYWORDS.iter().any(|kw| tok.is_keyword(kw)) {
                self.cur.advance()?;
            } else {
                return Ok(());
            }
        }
    }

    // -----------------------------------------------------------------------
    // GRANT / COMMENT / includes
    // -----------------------------------------------------------------------

    fn parse_grant(&mut self) -> Result<()> {
        self.cur.advance()?; // GRANT
        let body = self.skip_to_terminator()?;
        match grant_from_body(body) {
            Some(grant) => {
                debug!(privilege = %grant.privilege, object = %grant.object, "GRANT");
                self.defs.grants.push(grant);
            }
            None => debug!(tokens = body.len(), "GRANT without grantee consumed"),
        }
        Ok(())
    }

    fn parse_comment(&mut self) -> Result<()> {
        self.cur.advance()?; // COMMENT
        let body = self.skip_to_terminator()?;
        match comment_from_body(body) {
            Some(comment) => {
                debug!(kind = %comment.kind, target = %comment.target, "COMMENT");
                self.defs.comments.push(comment);
            }
            None => debug!(tokens = body.len(), "unrecognized COMMENT consumed"),
        }
        Ok(())
    }

    fn parse_include(&mut self) -> Result<()> {
        let tok = self.cur.next_token()?;
        let path = tok.content.trim_start_matches('@').trim();
        debug!(path, "include directive");
        self.defs.includes.push(path.to_owned());
        Ok(())
    }
}

/// `privileges [ON object] TO grantees [WITH ...]`
fn grant_from_body(body: &[Token<'_>]) -> Option<Grant> {
    let to = body.iter().position(|t| t.is_keyword("TO"))?;
    let head = &body[..to];
    let (privileges, object) = match head.iter().position(|t| t.is_keyword("ON")) {
        Some(on) => (&head[..on], &head[on + 1..]),
        None => (head, &[][..]),
    };
    let rest = &body[to + 1..];
    let end = rest
        .iter()
        .position(|t| t.is_keyword("WITH"))
        .unwrap_or(rest.len());
    Some(Grant {
        privilege: render(privileges),
        object: render(object),
        grantee: render(&rest[..end]),
    })
}

/// `ON kind... target IS 'text'`
fn comment_from_body(body: &[Token<'_>]) -> Option<Comment> {
    let (on, rest) = body.split_first()?;
    if !on.is_keyword("ON") {
        return None;
    }
    let kind_len = rest
        .iter()
        .take_while(|t| t.kind == TokenKind::Keyword && !t.is_keyword("IS"))
        .count();
    let (kind, rest) = rest.split_at(kind_len);
    let is = rest.iter().position(|t| t.is_keyword("IS"))?;
    let (target, text) = (&rest[..is], &rest[is + 1..]);
    if kind.is_empty() || target.is_empty() {
        return None;
    }
    Some(Comment {
        kind: render(kind),
        target: render(target),
        text: string_literal(text)?,
    })
}

/// Text of a quoted literal. `'it''s'` lexes as two adjacent strings and is
/// joined back with the doubled quote collapsed.
fn string_literal(tokens: &[Token<'_>]) -> Option<String> {
    let (first, rest) = tokens.split_first()?;
    if first.kind != TokenKind::String {
        return None;
    }
    let mut text = first.content.to_owned();
    let mut prev_end = first.end;
    for tok in rest {
        if tok.kind != TokenKind::String || tok.start != prev_end {
            return None;
        }
        text.push('\'');
        text.push_str(tok.content);
        prev_end = tok.end;
    }
    Some(text)
}

/// Number of leading string tokens that touch each other in the source.
fn adjacent_string_run(tokens: &[Token<'_>]) -> usize {
    let mut count = 0;
    let mut prev_end = None;
    for tok in tokens {
        if tok.kind != TokenKind::String || prev_end.is_some_and(|end| end != tok.start) {
            break;
        }
        prev_end = Some(tok.end);
        count += 1;
    }
    count
}

/// Render tokens as SQL-ish text: keywords uppercased, `.` glued to its
/// neighbours, `,` followed by a space.
fn render(tokens: &[Token<'_>]) -> String {
    let mut out = String::new();
    let mut glue = true;
    for tok in tokens {
        let dot = tok.is_symbol(".");
        if !glue && !dot && !tok.is_symbol(",") {
            out.push(' ');
        }
        if tok.kind == TokenKind::Keyword {
            out.push_str(&tok.content.to_ascii_uppercase());
        } else {
            out.push_str(tok.content);
        }
        glue = dot;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::tokenizer::tokenize;

    fn parse_sql(src: &str) -> Result<TablesDef> {
        parse(&tokenize(src).expect("tokenize"))
    }

    fn column<'d>(defs: &'d TablesDef, table: &str, col: &str) -> &'d ColumnDef {
        defs.table(table)
            .and_then(|t| t.column(col))
            .unwrap_or_else(|| panic!("missing {table}.{col}"))
    }

    #[test]
    fn create_table_registers_columns() {
        let defs = parse_sql("CREATE TABLE \"T\" (\"A\" INT, \"B\" VARCHAR(10));").unwrap();
        assert_eq!(defs.tables.len(), 1);
        let table = defs.table("T").unwrap();
        assert_eq!(table.columns.len(), 2);
        assert_eq!(column(&defs, "T", "A").data_type, "INT");
        let b = column(&defs, "T", "B");
        assert_eq!(b.data_type, "VARCHAR");
        assert_eq!(b.var_char_size, Some(10));
        assert_eq!(b.position, 1);
        assert_eq!(defs.origin, DbOrigin::oracle());
    }

    #[test]
    fn qualified_table_name() {
        let defs = parse_sql("CREATE TABLE \"S\".\"T\" (\"A\" INT);").unwrap();
        assert!(defs.table("S.T").is_some());
        assert_eq!(defs.table("S.T").unwrap().name, "S.T");
    }

    #[test]
    fn type_is_uppercased() {
        let defs = parse_sql("create table \"t\" (\"a\" varchar2(20 byte));").unwrap();
        let a = column(&defs, "t", "a");
        assert_eq!(a.data_type, "VARCHAR2");
        assert_eq!(a.var_char_size, Some(20));
    }

    #[test]
    fn number_precision_and_scale() {
        let defs = parse_sql(
            "CREATE TABLE \"T\" (\"P\" NUMBER(10,2), \"Q\" NUMBER(*,0), \"R\" NUMBER, \"S\" TIMESTAMP(6));",
        )
        .unwrap();
        let p = column(&defs, "T", "P");
        assert_eq!((p.precision, p.scale), (Some(10), Some(2)));
        let q = column(&defs, "T", "Q");
        assert_eq!((q.precision, q.scale), (None, Some(0)));
        let r = column(&defs, "T", "R");
        assert_eq!((r.precision, r.scale, r.var_char_size), (None, None, None));
        assert_eq!(column(&defs, "T", "S").precision, Some(6));
    }

    #[test]
    fn oversized_type_parameter_is_invalid_number() {
        let err = parse_sql("CREATE TABLE \"T\" (\"A\" NUMBER(99999999999));").unwrap_err();
        assert!(matches!(err.root_cause(), DdlError::InvalidNumber { .. }));
    }

    #[test]
    fn type_params_are_bounded() {
        let err = parse_sql("CREATE TABLE \"T\" (\"A\" NUMBER(1,2,3,4,5,6,7,8));").unwrap_err();
        assert!(err.is_lookahead_exceeded());
    }

    #[test]
    fn default_values_are_captured() {
        let defs = parse_sql(
            "CREATE TABLE \"T\" (\"A\" VARCHAR2(5) DEFAULT 'x', \"B\" NUMBER DEFAULT 0, \
             \"C\" FLOAT DEFAULT 1.5, \"D\" DATE DEFAULT sysdate);",
        )
        .unwrap();
        assert_eq!(column(&defs, "T", "A").default.as_deref(), Some("x"));
        assert_eq!(column(&defs, "T", "B").default.as_deref(), Some("0"));
        assert_eq!(column(&defs, "T", "C").default.as_deref(), Some("1.5"));
        assert_eq!(column(&defs, "T", "D").default.as_deref(), Some("SYSDATE"));
    }

    #[test]
    fn default_string_with_doubled_quote() {
        let defs = parse_sql(
            "CREATE TABLE \"T\" (\"A\" VARCHAR2(20) DEFAULT 'O''Brien', \"B\" INT);",
        )
        .unwrap();
        assert_eq!(column(&defs, "T", "A").default.as_deref(), Some("O'Brien"));
        assert_eq!(column(&defs, "T", "B").data_type, "INT");

        let toks = significant_tokens(&tokenize("'a''b' 'c'").unwrap());
        assert_eq!(adjacent_string_run(&toks), 2);
    }

    #[test]
    fn default_requires_a_value_token() {
        let err = parse_sql("CREATE TABLE \"T\" (\"A\" INT DEFAULT );").unwrap_err();
        assert!(err.is_unexpected_token());
        assert!(
            err.contexts()
                .iter()
                .any(|c| c.starts_with("failed to parse DEFAULT value"))
        );
    }

    #[test]
    fn inline_constraints() {
        let defs = parse_sql(
            "CREATE TABLE \"T\" (\"ID\" NUMBER CONSTRAINT \"PK\" PRIMARY KEY, \
             \"N\" VARCHAR2(3) DEFAULT 'a' NOT NULL ENABLE, \"M\" DATE NULL);",
        )
        .unwrap();
        let id = column(&defs, "T", "ID");
        assert!(id.primary_key);
        assert!(!id.nullable);
        let n = column(&defs, "T", "N");
        assert!(!n.nullable);
        assert_eq!(n.default.as_deref(), Some("a"));
        assert!(column(&defs, "T", "M").nullable);
    }

    #[test]
    fn out_of_line_constraints_are_skipped() {
        let defs = parse_sql(
            "CREATE TABLE \"T\" (\"A\" INT, CONSTRAINT \"PK\" PRIMARY KEY (\"A\", \"B\") ENABLE, \
             \"B\" INT, CHECK (\"A\" IN (1, 2)));",
        )
        .unwrap();
        let names: Vec<&str> = defs
            .table("T")
            .unwrap()
            .ordered_columns()
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn timestamp_with_time_zone() {
        let defs = parse_sql(
            "CREATE TABLE \"T\" (\"A\" TIMESTAMP(3) WITH TIME ZONE, \"B\" TIMESTAMP WITH LOCAL TIME ZONE, \
             \"C\" DOUBLE PRECISION, \"D\" LONG RAW);",
        )
        .unwrap();
        let a = column(&defs, "T", "A");
        assert_eq!(a.data_type, "TIMESTAMP WITH TIME ZONE");
        assert_eq!(a.precision, Some(3));
        assert_eq!(column(&defs, "T", "B").data_type, "TIMESTAMP WITH LOCAL TIME ZONE");
        assert_eq!(column(&defs, "T", "C").data_type, "DOUBLE PRECISION");
        assert_eq!(column(&defs, "T", "D").data_type, "LONG RAW");
    }

    #[test]
    fn table_options_are_skipped() {
        let defs = parse_sql(
            "CREATE TABLE \"T\" (\"A\" INT)\n  SEGMENT CREATION IMMEDIATE\n  PCTFREE 10 \
             STORAGE(INITIAL 65536 NEXT 1048576) TABLESPACE \"USERS\";\nCREATE TABLE \"U\" (\"B\" INT);",
        )
        .unwrap();
        assert_eq!(defs.tables.len(), 2);
    }

    #[test]
    fn missing_terminator_is_lookahead_error() {
        let err = parse_sql("CREATE TABLE \"T\" (\"A\" INT)").unwrap_err();
        assert!(err.is_lookahead_exceeded());
        assert!(
            err.contexts()
                .iter()
                .any(|c| c.starts_with("failed to skip table options"))
        );
    }

    #[test]
    fn redefinition_keeps_later_table() {
        let defs =
            parse_sql("CREATE TABLE \"T\" (\"A\" INT);\nCREATE TABLE \"T\" (\"B\" INT, \"C\" INT);")
                .unwrap();
        assert_eq!(defs.tables.len(), 1);
        let table = defs.table("T").unwrap();
        assert!(table.column("A").is_none());
        assert_eq!(table.columns.len(), 2);
    }

    #[test]
    fn unsupported_create_substep() {
        let err = parse_sql("CREATE INDEX \"I\" ON \"T\" (\"A\");").unwrap_err();
        assert!(err.is_unexpected_token());
        assert_eq!(
            err.contexts()[0].split(" at ").next(),
            Some("failed to parse CREATE statement")
        );
    }

    #[test]
    fn unknown_statement_is_unexpected_token() {
        let err = parse_sql("DROP TABLE \"T\";").unwrap_err();
        assert!(err.is_unexpected_token());
        assert!(err.to_string().contains("DROP"));
    }

    #[test]
    fn truncated_statement_is_eof() {
        let err = parse_sql("CREATE TABLE \"T\" (\"A\"").unwrap_err();
        assert!(err.is_unexpected_eof());
    }

    #[test]
    fn missing_column_name() {
        let err = parse_sql("CREATE TABLE \"T\" (INT);").unwrap_err();
        assert!(err.is_unexpected_token());
        assert!(matches!(
            err.root_cause(),
            DdlError::UnexpectedToken { expected, .. } if expected == "column name string"
        ));
    }

    #[test]
    fn grant_is_decomposed() {
        let defs = parse_sql(
            "GRANT SELECT, INSERT ON \"S\".\"T\" TO \"U\", \"V\" WITH GRANT OPTION;\n\
             GRANT CREATE SESSION TO \"U\";",
        )
        .unwrap();
        assert!(defs.tables.is_empty());
        assert_eq!(
            defs.grants,
            vec![
                Grant {
                    privilege: "SELECT, INSERT".to_owned(),
                    object: "S.T".to_owned(),
                    grantee: "U, V".to_owned(),
                },
                Grant {
                    privilege: "CREATE SESSION".to_owned(),
                    object: String::new(),
                    grantee: "U".to_owned(),
                },
            ]
        );
    }

    #[test]
    fn grant_without_grantee_is_consumed() {
        let defs = parse_sql("GRANT SELECT ON \"T\";\nCREATE TABLE \"X\" (\"A\" INT);").unwrap();
        assert!(defs.grants.is_empty());
        assert_eq!(defs.tables.len(), 1);
    }

    #[test]
    fn comments_are_decomposed() {
        let defs = parse_sql(
            "COMMENT ON TABLE \"S\".\"T\" IS 'Orders';\n\
             COMMENT ON COLUMN \"S\".\"T\".\"A\" IS 'it''s; fine';\n\
             COMMENT ON MATERIALIZED VIEW \"MV\" IS 'mv';",
        )
        .unwrap();
        assert_eq!(
            defs.comments,
            vec![
                Comment {
                    kind: "TABLE".to_owned(),
                    target: "S.T".to_owned(),
                    text: "Orders".to_owned(),
                },
                Comment {
                    kind: "COLUMN".to_owned(),
                    target: "S.T.A".to_owned(),
                    text: "it's; fine".to_owned(),
                },
                Comment {
                    kind: "MATERIALIZED VIEW".to_owned(),
                    target: "MV".to_owned(),
                    text: "mv".to_owned(),
                },
            ]
        );
    }

    #[test]
    fn malformed_comment_is_consumed() {
        let defs = parse_sql("COMMENT ON TABLE \"T\" IS 1;").unwrap();
        assert!(defs.comments.is_empty());
    }

    #[test]
    fn includes_are_recorded() {
        let defs = parse_sql("@setup.sql\n@@ nested.sql\nCREATE TABLE \"T\" (\"A\" INT);").unwrap();
        assert_eq!(defs.includes, vec!["setup.sql", "nested.sql"]);
    }

    #[test]
    fn render_glues_dots_and_commas() {
        let toks = significant_tokens(&tokenize("select , insert \"S\" . \"T\"").unwrap());
        assert_eq!(render(&toks), "SELECT, INSERT S.T");
    }

    #[test]
    fn empty_input_is_empty_schema() {
        let defs = parse_sql("-- only a comment\n\n").unwrap();
        assert!(defs.tables.is_empty());
        assert!(defs.grants.is_empty());
    }
}
