//! Row-level DML: the generic `(id, name)` rows and free-form data entry.

use crate::db::ident::{Ident, quote};
use crate::db::models::{ColumnInfo, Record, Row};
use crate::db::schema;
use crate::error::AdminError;
use sqlx::{Row as _, SqliteConnection};
use tracing::info;

fn row_not_found() -> AdminError {
    AdminError::NotFound("Row not found".to_string())
}

fn has_column(columns: &[ColumnInfo], name: &str) -> bool {
    columns.iter().any(|c| c.name.eq_ignore_ascii_case(name))
}

/// Whether `table` has all of `required` columns.
async fn has_columns(
    conn: &mut SqliteConnection,
    table: &Ident,
    required: &[&str],
) -> Result<bool, AdminError> {
    let columns = schema::list_columns(conn, table.as_str()).await?;
    Ok(required.iter().all(|name| has_column(&columns, name)))
}

/// Rows of `table`, newest first. Empty unless the table has both `id` and
/// `name` columns.
pub async fn list_rows(conn: &mut SqliteConnection, table: &Ident) -> Result<Vec<Row>, AdminError> {
    if !has_columns(conn, table, &["id", "name"]).await? {
        return Ok(Vec::new());
    }
    let sql = format!(
        "SELECT id, CAST(name AS TEXT) AS name FROM {} ORDER BY id DESC",
        table.quoted()
    );
    let rows = sqlx::query_as::<_, Row>(&sql)
        .fetch_all(&mut *conn)
        .await?;
    Ok(rows)
}

pub async fn get_row(conn: &mut SqliteConnection, table: &Ident, id: i64) -> Result<Row, AdminError> {
    if !has_columns(conn, table, &["id", "name"]).await? {
        return Err(row_not_found());
    }
    let sql = format!(
        "SELECT id, CAST(name AS TEXT) AS name FROM {} WHERE id = ?1",
        table.quoted()
    );
    sqlx::query_as::<_, Row>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(row_not_found)
}

pub async fn insert_row(
    conn: &mut SqliteConnection,
    table: &Ident,
    name: &str,
) -> Result<i64, AdminError> {
    let sql = format!("INSERT INTO {} (name) VALUES (?1)", table.quoted());
    let id = sqlx::query(&sql)
        .bind(name)
        .execute(&mut *conn)
        .await?
        .last_insert_rowid();
    info!(table = %table, id, "inserted row");
    Ok(id)
}

pub async fn update_row(
    conn: &mut SqliteConnection,
    table: &Ident,
    id: i64,
    name: &str,
) -> Result<(), AdminError> {
    if !has_columns(conn, table, &["id", "name"]).await? {
        return Err(row_not_found());
    }
    let sql = format!("UPDATE {} SET name = ?1 WHERE id = ?2", table.quoted());
    let done = sqlx::query(&sql)
        .bind(name)
        .bind(id)
        .execute(&mut *conn)
        .await?;
    if done.rows_affected() == 0 {
        return Err(row_not_found());
    }
    info!(table = %table, id, "updated row");
    Ok(())
}

pub async fn delete_row(conn: &mut SqliteConnection, table: &Ident, id: i64) -> Result<(), AdminError> {
    if !has_columns(conn, table, &["id"]).await? {
        return Err(row_not_found());
    }
    let sql = format!("DELETE FROM {} WHERE id = ?1", table.quoted());
    let done = sqlx::query(&sql).bind(id).execute(&mut *conn).await?;
    if done.rows_affected() == 0 {
        return Err(row_not_found());
    }
    info!(table = %table, id, "deleted row");
    Ok(())
}

/// Columns a data-entry form offers: everything but `id`.
pub fn entry_columns(columns: &[ColumnInfo]) -> Vec<&ColumnInfo> {
    columns.iter().filter(|c| c.name != "id").collect()
}

/// Every record of `table` with values rendered as text.
pub async fn list_records(
    conn: &mut SqliteConnection,
    table: &Ident,
    columns: &[ColumnInfo],
) -> Result<Vec<Record>, AdminError> {
    let sql = format!(
        "SELECT {} FROM {}",
        record_projection(columns),
        table.quoted()
    );
    let rows = sqlx::query(&sql).fetch_all(&mut *conn).await?;
    rows.iter()
        .map(|row| decode_record(row, columns.len()))
        .collect()
}

pub async fn get_record(
    conn: &mut SqliteConnection,
    table: &Ident,
    columns: &[ColumnInfo],
    id: i64,
) -> Result<Record, AdminError> {
    let sql = format!(
        "SELECT {} FROM {} WHERE id = ?1",
        record_projection(columns),
        table.quoted()
    );
    let row = sqlx::query(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(row_not_found)?;
    decode_record(&row, columns.len())
}

/// Insert one record; `values` pairs each entry column with its submitted
/// value (absent fields become NULL).
pub async fn insert_record(
    conn: &mut SqliteConnection,
    table: &Ident,
    values: &[(&ColumnInfo, Option<String>)],
) -> Result<i64, AdminError> {
    let sql = if values.is_empty() {
        format!("INSERT INTO {} DEFAULT VALUES", table.quoted())
    } else {
        let names: Vec<String> = values.iter().map(|(c, _)| quote(&c.name)).collect();
        let placeholders: Vec<String> = (1..=values.len()).map(|i| format!("?{i}")).collect();
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table.quoted(),
            names.join(", "),
            placeholders.join(", ")
        )
    };
    let mut query = sqlx::query(&sql);
    for (_, value) in values {
        query = query.bind(value.clone());
    }
    let id = query.execute(&mut *conn).await?.last_insert_rowid();
    info!(table = %table, id, "inserted record");
    Ok(id)
}

/// Set only the given columns of record `id`; columns not listed keep their
/// values.
pub async fn update_record(
    conn: &mut SqliteConnection,
    table: &Ident,
    id: i64,
    values: &[(&ColumnInfo, Option<String>)],
) -> Result<(), AdminError> {
    if values.is_empty() {
        ensure_record_exists(conn, table, id).await?;
        return Ok(());
    }
    let assignments: Vec<String> = values
        .iter()
        .enumerate()
        .map(|(i, (c, _))| format!("{} = ?{}", quote(&c.name), i + 1))
        .collect();
    let sql = format!(
        "UPDATE {} SET {} WHERE id = ?{}",
        table.quoted(),
        assignments.join(", "),
        values.len() + 1
    );
    let mut query = sqlx::query(&sql);
    for (_, value) in values {
        query = query.bind(value.clone());
    }
    let done = query.bind(id).execute(&mut *conn).await?;
    if done.rows_affected() == 0 {
        return Err(row_not_found());
    }
    info!(table = %table, id, "updated record");
    Ok(())
}

async fn ensure_record_exists(
    conn: &mut SqliteConnection,
    table: &Ident,
    id: i64,
) -> Result<(), AdminError> {
    let sql = format!("SELECT COUNT(*) FROM {} WHERE id = ?1", table.quoted());
    let n: i64 = sqlx::query_scalar(&sql).bind(id).fetch_one(&mut *conn).await?;
    if n == 0 { Err(row_not_found()) } else { Ok(()) }
}

/// `id` (as integer, when the table has one) followed by every column as text.
fn record_projection(columns: &[ColumnInfo]) -> String {
    let id = if has_column(columns, "id") {
        "id"
    } else {
        "NULL"
    };
    let mut parts = vec![format!("{id} AS __record_id")];
    parts.extend(
        columns
            .iter()
            .map(|c| format!("CAST({} AS TEXT)", quote(&c.name))),
    );
    parts.join(", ")
}

fn decode_record(row: &sqlx::sqlite::SqliteRow, width: usize) -> Result<Record, AdminError> {
    let id: Option<i64> = row.try_get(0)?;
    let values = (1..=width)
        .map(|i| row.try_get::<Option<String>, _>(i))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Record { id, values })
}
