//! Table and column introspection and DDL on one open database.

use crate::db::ident::{Ident, quote};
use crate::db::models::{ColumnInfo, TableEntry};
use crate::error::AdminError;
use sqlx::SqliteConnection;
use tracing::info;

const LIST_TABLES: &str = "SELECT name FROM sqlite_master \
     WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name";

const FIND_TABLE: &str = "SELECT name FROM sqlite_master \
     WHERE type = 'table' AND name NOT LIKE 'sqlite_%' AND name = ?1 COLLATE NOCASE";

const TABLE_INFO: &str =
    r#"SELECT cid, name, "type", pk FROM pragma_table_info(?1) ORDER BY cid"#;

pub async fn list_tables(conn: &mut SqliteConnection) -> Result<Vec<TableEntry>, AdminError> {
    let names: Vec<String> = sqlx::query_scalar(LIST_TABLES).fetch_all(&mut *conn).await?;
    Ok(names
        .into_iter()
        .enumerate()
        .map(|(position, name)| TableEntry { position, name })
        .collect())
}

/// The stored name of `table`, matched the way SQLite matches identifiers.
pub async fn find_table(
    conn: &mut SqliteConnection,
    table: &str,
) -> Result<Option<Ident>, AdminError> {
    let name: Option<String> = sqlx::query_scalar(FIND_TABLE)
        .bind(table)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(name.map(Ident::existing))
}

/// Resolve a table name from a URL or the selection to an existing table.
///
/// No allow-list here: tables created elsewhere may carry any name, and the
/// returned name is always quoted when used.
pub async fn require_table(conn: &mut SqliteConnection, table: &str) -> Result<Ident, AdminError> {
    find_table(conn, table)
        .await?
        .ok_or_else(|| AdminError::NotFound("Table not found".to_string()))
}

/// Create a table with the generic `(id, name)` shape; a no-op when present.
pub async fn create_table(conn: &mut SqliteConnection, table: &Ident) -> Result<(), AdminError> {
    let sql = format!(
        "CREATE TABLE IF NOT EXISTS {} (id INTEGER PRIMARY KEY, name TEXT)",
        table.quoted()
    );
    sqlx::query(&sql).execute(&mut *conn).await?;
    info!(table = %table, "created table");
    Ok(())
}

pub async fn rename_table(
    conn: &mut SqliteConnection,
    from: &Ident,
    to: &Ident,
) -> Result<(), AdminError> {
    let sql = format!("ALTER TABLE {} RENAME TO {}", from.quoted(), to.quoted());
    sqlx::query(&sql).execute(&mut *conn).await?;
    info!(from = %from, to = %to, "renamed table");
    Ok(())
}

pub async fn drop_table(conn: &mut SqliteConnection, table: &Ident) -> Result<(), AdminError> {
    let sql = format!("DROP TABLE IF EXISTS {}", table.quoted());
    sqlx::query(&sql).execute(&mut *conn).await?;
    info!(table = %table, "dropped table");
    Ok(())
}

/// Columns of `table` in cid order; empty when the table does not exist.
pub async fn list_columns(
    conn: &mut SqliteConnection,
    table: &str,
) -> Result<Vec<ColumnInfo>, AdminError> {
    let columns = sqlx::query_as::<_, ColumnInfo>(TABLE_INFO)
        .bind(table)
        .fetch_all(&mut *conn)
        .await?;
    Ok(columns)
}

pub async fn find_column(
    conn: &mut SqliteConnection,
    table: &Ident,
    cid: i64,
) -> Result<ColumnInfo, AdminError> {
    list_columns(conn, table.as_str())
        .await?
        .into_iter()
        .find(|c| c.cid == cid)
        .ok_or_else(|| AdminError::NotFound("Column not found".to_string()))
}

pub async fn add_column(
    conn: &mut SqliteConnection,
    table: &Ident,
    column: &Ident,
) -> Result<(), AdminError> {
    let sql = format!(
        "ALTER TABLE {} ADD COLUMN {} TEXT",
        table.quoted(),
        column.quoted()
    );
    sqlx::query(&sql).execute(&mut *conn).await?;
    info!(table = %table, column = %column, "added column");
    Ok(())
}

pub async fn rename_column(
    conn: &mut SqliteConnection,
    table: &Ident,
    cid: i64,
    to: &Ident,
) -> Result<(), AdminError> {
    let column = find_column(conn, table, cid).await?;
    let sql = format!(
        "ALTER TABLE {} RENAME COLUMN {} TO {}",
        table.quoted(),
        quote(&column.name),
        to.quoted()
    );
    sqlx::query(&sql).execute(&mut *conn).await?;
    info!(table = %table, cid, from = %column.name, to = %to, "renamed column");
    Ok(())
}

pub async fn drop_column(
    conn: &mut SqliteConnection,
    table: &Ident,
    cid: i64,
) -> Result<(), AdminError> {
    let column = find_column(conn, table, cid).await?;
    let sql = format!(
        "ALTER TABLE {} DROP COLUMN {}",
        table.quoted(),
        quote(&column.name)
    );
    sqlx::query(&sql).execute(&mut *conn).await?;
    info!(table = %table, cid, column = %column.name, "dropped column");
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::db::connection;
    use tempfile::TempDir;

    pub(crate) async fn scratch_db() -> (TempDir, SqliteConnection) {
        let dir = TempDir::new().unwrap();
        let conn = connection::open(&dir.path().join("scratch.sqlite"), true)
            .await
            .unwrap();
        (dir, conn)
    }

    fn ident(name: &str) -> Ident {
        Ident::parse(name).unwrap()
    }

    async fn table_exists(conn: &mut SqliteConnection, table: &str) -> bool {
        find_table(conn, table).await.unwrap().is_some()
    }

    #[tokio::test]
    async fn table_lifecycle() {
        let (_dir, mut conn) = scratch_db().await;
        create_table(&mut conn, &ident("items")).await.unwrap();
        create_table(&mut conn, &ident("items")).await.unwrap();
        create_table(&mut conn, &ident("orders")).await.unwrap();

        let names: Vec<_> = list_tables(&mut conn)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, ["items", "orders"]);

        rename_table(&mut conn, &ident("items"), &ident("products"))
            .await
            .unwrap();
        assert!(table_exists(&mut conn, "products").await);
        assert!(!table_exists(&mut conn, "items").await);

        drop_table(&mut conn, &ident("orders")).await.unwrap();
        assert_eq!(list_tables(&mut conn).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn duplicate_rename_surfaces_engine_error() {
        let (_dir, mut conn) = scratch_db().await;
        create_table(&mut conn, &ident("a")).await.unwrap();
        create_table(&mut conn, &ident("b")).await.unwrap();
        let err = rename_table(&mut conn, &ident("a"), &ident("b"))
            .await
            .unwrap_err();
        assert!(matches!(err, AdminError::Database(_)));
        assert!(err.to_string().starts_with("Error: "));
    }

    #[tokio::test]
    async fn require_table_returns_stored_name() {
        let (_dir, mut conn) = scratch_db().await;
        create_table(&mut conn, &ident("Items")).await.unwrap();
        assert_eq!(require_table(&mut conn, "ITEMS").await.unwrap().as_str(), "Items");
        assert!(matches!(
            require_table(&mut conn, "x; DROP TABLE y").await,
            Err(AdminError::NotFound(_))
        ));
        assert!(matches!(
            require_table(&mut conn, "ghost").await,
            Err(AdminError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn tables_outside_the_allow_list_stay_manageable() {
        let (_dir, mut conn) = scratch_db().await;
        sqlx::query(r#"CREATE TABLE "my table" (id INTEGER PRIMARY KEY, "odd-col" TEXT)"#)
            .execute(&mut conn)
            .await
            .unwrap();
        let t = require_table(&mut conn, "my table").await.unwrap();
        assert_eq!(t.quoted(), "\"my table\"");
        add_column(&mut conn, &t, &ident("price")).await.unwrap();
        rename_column(&mut conn, &t, 1, &ident("label")).await.unwrap();
        let names: Vec<_> = list_columns(&mut conn, "my table")
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, ["id", "label", "price"]);

        drop_table(&mut conn, &t).await.unwrap();
        assert!(!table_exists(&mut conn, "my table").await);
    }

    #[tokio::test]
    async fn column_rename_keeps_position() {
        let (_dir, mut conn) = scratch_db().await;
        let t = ident("items");
        create_table(&mut conn, &t).await.unwrap();
        add_column(&mut conn, &t, &ident("price")).await.unwrap();
        add_column(&mut conn, &t, &ident("qty")).await.unwrap();

        let before = list_columns(&mut conn, "items").await.unwrap();
        let price = before.iter().find(|c| c.name == "price").unwrap().cid;
        assert_eq!(price, 2);
        assert!(before[0].is_primary_key());

        rename_column(&mut conn, &t, price, &ident("cost")).await.unwrap();
        let after = list_columns(&mut conn, "items").await.unwrap();
        assert_eq!(after[price as usize].name, "cost");
        assert_eq!(after[price as usize].decl_type, "TEXT");
        assert_eq!(after.len(), before.len());
    }

    #[tokio::test]
    async fn drop_column_by_cid() {
        let (_dir, mut conn) = scratch_db().await;
        let t = ident("items");
        create_table(&mut conn, &t).await.unwrap();
        add_column(&mut conn, &t, &ident("price")).await.unwrap();

        drop_column(&mut conn, &t, 2).await.unwrap();
        let names: Vec<_> = list_columns(&mut conn, "items")
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, ["id", "name"]);
        assert!(matches!(
            drop_column(&mut conn, &t, 9).await,
            Err(AdminError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn columns_of_missing_table_are_empty() {
        let (_dir, mut conn) = scratch_db().await;
        assert!(list_columns(&mut conn, "nope").await.unwrap().is_empty());
    }
}
