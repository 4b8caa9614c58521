use serde::Serialize;
use sqlx::FromRow;

/// A `*.sqlite` file in the data directory.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DatabaseEntry {
    pub position: usize,
    pub name: String,
}

/// A user table inside the selected database.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TableEntry {
    pub position: usize,
    pub name: String,
}

/// One line of `pragma_table_info`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, FromRow)]
pub struct ColumnInfo {
    pub cid: i64,
    pub name: String,
    #[sqlx(rename = "type")]
    pub decl_type: String,
    pub pk: i64,
}

impl ColumnInfo {
    pub fn is_primary_key(&self) -> bool {
        self.pk != 0
    }
}

/// Generic `(id, name)` row.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, FromRow)]
pub struct Row {
    pub id: i64,
    pub name: Option<String>,
}

/// A row of an arbitrary table, every value rendered as text.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Record {
    pub id: Option<i64>,
    pub values: Vec<Option<String>>,
}
