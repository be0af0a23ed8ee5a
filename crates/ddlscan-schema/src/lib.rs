//! Schema model extracted from DDL scripts.
//!
//! The parser creates an empty [`TablesDef`], fills it statement by statement
//! and hands it to the caller by value once the script is consumed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Root output of a parse: origin metadata plus every recognized object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TablesDef {
    pub origin: DbOrigin,
    /// Tables keyed by (possibly schema-qualified) name.
    pub tables: BTreeMap<String, TableDef>,
    #[serde(default)]
    pub grants: Vec<Grant>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    /// Script include directives (`@file.sql`), in order of appearance.
    #[serde(default)]
    pub includes: Vec<String>,
}

impl TablesDef {
    #[must_use]
    pub fn new(origin: DbOrigin) -> Self {
        Self {
            origin,
            ..Self::default()
        }
    }

    pub fn table(&self, name: &str) -> Option<&TableDef> {
        self.tables.get(name)
    }

    /// Register a table, replacing any earlier definition with the same name.
    /// Returns the replaced definition.
    pub fn insert_table(&mut self, table: TableDef) -> Option<TableDef> {
        self.tables.insert(table.name.clone(), table)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineVendorInfo {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineInfo {
    pub name: String,
    pub version: String,
}

/// Descriptive metadata about where a schema came from. Never affects parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbOrigin {
    pub vendor: EngineVendorInfo,
    pub engine: EngineInfo,
    pub engine_version: String,
    pub dialect: String,
    pub description: String,
}

impl DbOrigin {
    /// Origin stamped on schemas read from Oracle DDL.
    #[must_use]
    pub fn oracle() -> Self {
        Self {
            vendor: EngineVendorInfo {
                name: "Oracle".to_owned(),
            },
            engine: EngineInfo {
                name: "Oracle Database".to_owned(),
                version: String::new(),
            },
            engine_version: String::new(),
            dialect: "oracle".to_owned(),
            description: String::new(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// A table definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDef {
    /// Name as read from the script; `parent.child` when schema-qualified.
    pub name: String,
    pub columns: BTreeMap<String, ColumnDef>,
    /// Reserved for view-like definitions; the table grammar leaves it empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub select_statement: Option<String>,
}

impl TableDef {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.get(name)
    }

    /// Add a column, assigning it the next position. A column with the same
    /// name replaces the earlier one but keeps the new position.
    pub fn push_column(&mut self, mut column: ColumnDef) {
        column.position = self.columns.len();
        self.columns.insert(column.name.clone(), column);
    }

    /// Columns in declaration order.
    pub fn ordered_columns(&self) -> Vec<&ColumnDef> {
        let mut cols: Vec<&ColumnDef> = self.columns.values().collect();
        cols.sort_by_key(|c| c.position);
        cols
    }
}

/// A column definition. `data_type` is always set once the column exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    /// Uppercased primitive type keyword, e.g. `VARCHAR2`.
    #[serde(rename = "type")]
    pub data_type: String,
    #[serde(default)]
    pub default: Option<String>,
    #[serde(default)]
    pub precision: Option<u32>,
    #[serde(default)]
    pub scale: Option<u32>,
    #[serde(default)]
    pub var_char_size: Option<u32>,
    /// 0-based declaration order within the table.
    #[serde(default)]
    pub position: usize,
    #[serde(default = "default_nullable")]
    pub nullable: bool,
    #[serde(default)]
    pub primary_key: bool,
}

const fn default_nullable() -> bool {
    true
}

impl ColumnDef {
    #[must_use]
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            default: None,
            precision: None,
            scale: None,
            var_char_size: None,
            position: 0,
            nullable: true,
            primary_key: false,
        }
    }
}

/// A `GRANT` statement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
    /// Granted privileges, comma separated (`SELECT, INSERT`).
    #[serde(rename = "type")]
    pub privilege: String,
    /// Object the grant applies to; empty for system privileges.
    #[serde(rename = "where")]
    pub object: String,
    /// Grantees, comma separated.
    #[serde(rename = "who")]
    pub grantee: String,
}

/// A `COMMENT ON` statement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Object kind the comment is attached to (`TABLE`, `COLUMN`, ...).
    pub kind: String,
    #[serde(rename = "for")]
    pub target: String,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_column_assigns_positions() {
        let mut table = TableDef::new("T");
        table.push_column(ColumnDef::new("B", "INT"));
        table.push_column(ColumnDef::new("A", "VARCHAR2"));
        let names: Vec<&str> = table
            .ordered_columns()
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["B", "A"]);
        assert_eq!(table.column("A").map(|c| c.position), Some(1));
    }

    #[test]
    fn insert_table_overwrites() {
        let mut defs = TablesDef::new(DbOrigin::oracle());
        assert!(defs.insert_table(TableDef::new("T")).is_none());
        let mut second = TableDef::new("T");
        second.push_column(ColumnDef::new("A", "INT"));
        let replaced = defs.insert_table(second).expect("previous table");
        assert!(replaced.columns.is_empty());
        assert_eq!(defs.tables.len(), 1);
        assert_eq!(defs.table("T").map(|t| t.columns.len()), Some(1));
    }

    #[test]
    fn column_serializes_with_wire_names() {
        let mut col = ColumnDef::new("A", "NUMBER");
        col.precision = Some(10);
        col.scale = Some(2);
        let json = serde_json::to_value(&col).expect("serialize");
        assert_eq!(json["type"], "NUMBER");
        assert_eq!(json["precision"], 10);
        assert_eq!(json["scale"], 2);
        assert_eq!(json["nullable"], true);
        assert!(json["default"].is_null());
    }

    #[test]
    fn grant_and_comment_use_short_keys() {
        let grant = Grant {
            privilege: "SELECT".to_owned(),
            object: "T".to_owned(),
            grantee: "U".to_owned(),
        };
        let json = serde_json::to_value(&grant).expect("serialize");
        assert_eq!(json["type"], "SELECT");
        assert_eq!(json["where"], "T");
        assert_eq!(json["who"], "U");

        let comment = Comment {
            kind: "TABLE".to_owned(),
            target: "T".to_owned(),
            text: "hello".to_owned(),
        };
        let json = serde_json::to_value(&comment).expect("serialize");
        assert_eq!(json["for"], "T");
    }

    #[test]
    fn tables_def_deserializes_without_optional_lists() {
        let json = r#"{
            "origin": {
                "vendor": {"name": "Oracle"},
                "engine": {"name": "Oracle Database", "version": ""},
                "engine_version": "",
                "dialect": "oracle",
                "description": ""
            },
            "tables": {
                "T": {"name": "T", "columns": {"A": {"name": "A", "type": "INT"}}}
            }
        }"#;
        let defs: TablesDef = serde_json::from_str(json).expect("deserialize");
        assert_eq!(defs.origin, DbOrigin::oracle());
        let col = defs.table("T").and_then(|t| t.column("A")).expect("column");
        assert!(col.nullable);
        assert!(defs.grants.is_empty());
    }
}
