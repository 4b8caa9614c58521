//! Database module: everything that touches SQLite files.
//!
//! Layout:
//! - `catalog.rs`: the data directory of `*.sqlite` files
//! - `connection.rs`: request-scoped connection slot
//! - `ident.rs`: identifier allow-list and quoting
//! - `schema.rs`: table/column introspection and DDL
//! - `records.rs`: row DML (generic rows and data entry)
//! - `models.rs`: plain structs mirroring what the queries return

pub mod catalog;
pub mod connection;
pub mod ident;
pub mod models;
pub mod records;
pub mod schema;

pub use catalog::DatabaseCatalog;
pub use connection::ConnectionSlot;
pub use ident::Ident;
pub use models::{ColumnInfo, DatabaseEntry, Record, Row, TableEntry};
