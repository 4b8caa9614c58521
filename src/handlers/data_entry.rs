//! Free-form records: one input per column, values stored as submitted text.

use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use std::collections::HashMap;
use sqlx::SqliteConnection;

use crate::db::{ColumnInfo, ConnectionSlot, Ident, records, schema};
use crate::error::AdminError;
use crate::handlers::connect_selected;
use crate::middleware::Selection;
use crate::router::AdminState;
use crate::views::{self, data_entry, layout};

type Submitted = HashMap<String, String>;

/// Resolve `name` to an existing table and its columns.
async fn existing_table(
    conn: &mut SqliteConnection,
    name: &str,
) -> Result<(Ident, Vec<ColumnInfo>), AdminError> {
    let Some(table) = schema::find_table(conn, name).await? else {
        return Err(AdminError::NotFound(format!(
            "Table '{name}' does not exist."
        )));
    };
    let columns = schema::list_columns(conn, table.as_str()).await?;
    Ok((table, columns))
}

/// Every entry column paired with its submitted value; absent fields are NULL.
fn submitted_values<'c>(
    columns: &'c [ColumnInfo],
    form: &Submitted,
) -> Vec<(&'c ColumnInfo, Option<String>)> {
    records::entry_columns(columns)
        .into_iter()
        .map(|col| (col, form.get(&col.name).cloned()))
        .collect()
}

/// Only the entry columns the form actually carried.
fn changed_values<'c>(
    columns: &'c [ColumnInfo],
    form: &Submitted,
) -> Vec<(&'c ColumnInfo, Option<String>)> {
    records::entry_columns(columns)
        .into_iter()
        .filter_map(|col| form.get(&col.name).map(|v| (col, Some(v.clone()))))
        .collect()
}

fn list_redirect(table: &Ident) -> Redirect {
    Redirect::to(&views::data_list_href(table.as_str()))
}

/// GET /data-entry/{table}
pub async fn entry_form(
    State(state): State<AdminState>,
    selection: Selection,
    Path(table): Path<String>,
) -> Result<Response, AdminError> {
    let mut slot = ConnectionSlot::new();
    let conn = connect_selected(&state, &selection, &mut slot).await?;
    let (table, columns) = existing_table(conn, &table).await?;
    slot.close().await?;

    let fields: Vec<(&str, Option<&str>)> = records::entry_columns(&columns)
        .into_iter()
        .map(|c| (c.name.as_str(), None))
        .collect();
    let body = data_entry::entry_form(
        table.as_str(),
        &views::data_entry_href(table.as_str()),
        &fields,
    );
    let title = format!("New record in {table}");
    Ok(views::html(layout::page(&title, &selection, body)).into_response())
}

/// POST /data-entry/{table}
pub async fn insert(
    State(state): State<AdminState>,
    selection: Selection,
    Path(table): Path<String>,
    Form(form): Form<Submitted>,
) -> Result<Response, AdminError> {
    let mut slot = ConnectionSlot::new();
    let conn = connect_selected(&state, &selection, &mut slot).await?;
    let (table, columns) = existing_table(conn, &table).await?;
    records::insert_record(conn, &table, &submitted_values(&columns, &form)).await?;
    slot.close().await?;
    Ok(list_redirect(&table).into_response())
}

/// GET /data-list/{table}
pub async fn list(
    State(state): State<AdminState>,
    selection: Selection,
    Path(table): Path<String>,
) -> Result<Response, AdminError> {
    let mut slot = ConnectionSlot::new();
    let conn = connect_selected(&state, &selection, &mut slot).await?;
    let (table, columns) = existing_table(conn, &table).await?;
    let rows = records::list_records(conn, &table, &columns).await?;
    slot.close().await?;

    let body = data_entry::record_table(table.as_str(), &columns, &rows);
    Ok(views::html(layout::page(table.as_str(), &selection, body)).into_response())
}

/// GET /data-edit/{table}/{id}
pub async fn edit_form(
    State(state): State<AdminState>,
    selection: Selection,
    Path((table, id)): Path<(String, i64)>,
) -> Result<Response, AdminError> {
    let mut slot = ConnectionSlot::new();
    let conn = connect_selected(&state, &selection, &mut slot).await?;
    let (table, columns) = existing_table(conn, &table).await?;
    let record = records::get_record(conn, &table, &columns, id).await?;
    slot.close().await?;

    let fields: Vec<(&str, Option<&str>)> = columns
        .iter()
        .zip(&record.values)
        .filter(|(c, _)| c.name != "id")
        .map(|(c, v)| (c.name.as_str(), v.as_deref()))
        .collect();
    let body = data_entry::entry_form(
        table.as_str(),
        &format!("/data-edit/{}/{id}", views::encode(table.as_str())),
        &fields,
    );
    let title = format!("Edit {table} #{id}");
    Ok(views::html(layout::page(&title, &selection, body)).into_response())
}

/// POST /data-edit/{table}/{id}
pub async fn update(
    State(state): State<AdminState>,
    selection: Selection,
    Path((table, id)): Path<(String, i64)>,
    Form(form): Form<Submitted>,
) -> Result<Response, AdminError> {
    let mut slot = ConnectionSlot::new();
    let conn = connect_selected(&state, &selection, &mut slot).await?;
    let (table, columns) = existing_table(conn, &table).await?;
    records::update_record(conn, &table, id, &changed_values(&columns, &form)).await?;
    slot.close().await?;
    Ok(list_redirect(&table).into_response())
}

/// POST /data-delete/{table}/{id}
pub async fn delete(
    State(state): State<AdminState>,
    selection: Selection,
    Path((table, id)): Path<(String, i64)>,
) -> Result<Response, AdminError> {
    let mut slot = ConnectionSlot::new();
    let conn = connect_selected(&state, &selection, &mut slot).await?;
    let (table, _) = existing_table(conn, &table).await?;
    records::delete_row(conn, &table, id).await?;
    slot.close().await?;
    Ok(list_redirect(&table).into_response())
}
