// Keyword table with longest-match-first ordering.
//
// Keywords are matched as plain prefixes, so a short keyword that is a
// prefix of a longer one ("INT" / "INTEGER") must be tried after it.

use std::cmp::Ordering;

/// An immutable keyword list sorted longest first, then lexicographically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordTable {
    words: Vec<&'static str>,
}

/// Longer keywords first; equal lengths in lexicographic order.
fn match_order(a: &&'static str, b: &&'static str) -> Ordering {
    b.len().cmp(&a.len()).then_with(|| a.cmp(b))
}

impl KeywordTable {
    /// Build a table from `words` in any order. Empty entries and duplicates
    /// are dropped.
    #[must_use]
    pub fn new(words: &[&'static str]) -> Self {
        let mut words: Vec<&'static str> =
            words.iter().copied().filter(|w| !w.is_empty()).collect();
        words.sort_unstable_by(match_order);
        words.dedup();
        Self { words }
    }

    /// Keywords in matching order.
    pub fn iter(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.words.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|w| w.eq_ignore_ascii_case(word))
    }

    /// Whether the table is in matching order.
    pub fn is_sorted(&self) -> bool {
        self.words
            .windows(2)
            .all(|pair| match_order(&pair[0], &pair[1]) == Ordering::Less)
    }
}

/// Oracle DDL keywords: statement verbs, data types, column and table
/// clauses, storage options and privileges.
pub const ORACLE_KEYWORDS: &[&str] = &[
    // statements
    "CREATE", "TABLE", "GRANT", "COMMENT", "ON", "TO", "IS", "COLUMN", "ALTER", "DROP",
    "VIEW", "INDEX", "SEQUENCE", "SYNONYM", "OR", "REPLACE", "GLOBAL", "TEMPORARY",
    "PUBLIC", "WITH", "OPTION", "ADMIN", "HIERARCHY", "MATERIALIZED",
    // privileges
    "SELECT", "INSERT", "UPDATE", "DELETE", "EXECUTE", "REFERENCES", "ALL",
    "PRIVILEGES", "SESSION", "READ", "WRITE", "DEBUG", "FLASHBACK", "ANY",
    // data types
    "VARCHAR2", "VARCHAR", "NVARCHAR2", "CHAR", "NCHAR", "CHARACTER", "NUMBER",
    "NUMERIC", "DECIMAL", "INTEGER", "INT", "SMALLINT", "FLOAT", "REAL", "DOUBLE",
    "PRECISION", "BINARY_FLOAT", "BINARY_DOUBLE", "DATE", "TIMESTAMP", "INTERVAL",
    "YEAR", "MONTH", "DAY", "SECOND", "TIME", "ZONE", "LOCAL", "CLOB", "NCLOB",
    "BLOB", "BFILE", "RAW", "LONG", "ROWID", "UROWID", "XMLTYPE", "BOOLEAN",
    "BYTE",
    // column clauses
    "DEFAULT", "NOT", "NULL", "CONSTRAINT", "PRIMARY", "KEY", "UNIQUE", "CHECK",
    "FOREIGN", "ENABLE", "DISABLE", "VALIDATE", "NOVALIDATE", "RELY", "NORELY",
    "DEFERRABLE", "INITIALLY", "IMMEDIATE", "DEFERRED", "CASCADE", "SET",
    "VISIBLE", "INVISIBLE", "GENERATED", "ALWAYS", "AS", "IDENTITY", "BY",
    "SYSDATE", "SYSTIMESTAMP", "CURRENT_TIMESTAMP", "USER", "SYS_GUID",
    "TRUE", "FALSE", "IN", "AND", "BETWEEN", "LIKE",
    // storage and table clauses
    "TABLESPACE", "PCTFREE", "PCTUSED", "INITRANS", "MAXTRANS", "STORAGE",
    "INITIAL", "NEXT", "MINEXTENTS", "MAXEXTENTS", "PCTINCREASE", "FREELISTS",
    "FREELIST", "GROUPS", "BUFFER_POOL", "FLASH_CACHE", "CELL_FLASH_CACHE",
    "LOGGING", "NOLOGGING", "COMPRESS", "NOCOMPRESS", "CACHE", "NOCACHE",
    "PARALLEL", "NOPARALLEL", "MONITORING", "NOMONITORING", "SEGMENT", "CREATION",
    "ORGANIZATION", "HEAP", "EXTERNAL", "USING", "COMPUTE", "STATISTICS", "LOB",
    "STORE", "SECUREFILE", "BASICFILE", "CHUNK", "RETENTION", "ROW", "MOVEMENT",
    "PARTITION", "RANGE", "HASH", "LIST", "VALUES", "LESS", "THAN", "MAXVALUE",
    "COMMIT", "PRESERVE", "ROWS", "KEEP", "RECYCLE", "NONE", "INMEMORY",
    "NO", "PURGE", "ONLINE", "DEFINITION",
];
