use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use sqlx::SqliteConnection;

use crate::db::{ConnectionSlot, Ident, schema};
use crate::error::AdminError;
use crate::handlers::{NameForm, connect_if_selected, connect_selected, is_current_table};
use crate::middleware::{Htmx, Selection};
use crate::router::AdminState;
use crate::views::{self, Item, Section};

#[derive(Debug, Default, Deserialize)]
pub struct TableQuery {
    pub current_table: Option<String>,
}

async fn table_items(conn: &mut SqliteConnection) -> Result<Vec<Item>, AdminError> {
    Ok(schema::list_tables(conn)
        .await?
        .iter()
        .map(Item::from)
        .collect())
}

/// GET /tables/, optionally switching tables via `?current_table=`.
pub async fn index(
    State(state): State<AdminState>,
    mut selection: Selection,
    htmx: Htmx,
    Query(query): Query<TableQuery>,
) -> Result<Response, AdminError> {
    let mut slot = ConnectionSlot::new();
    let items = match connect_if_selected(&state, &selection, &mut slot).await? {
        Some(conn) => {
            if let Some(wanted) = query.current_table.as_deref().filter(|t| !t.is_empty()) {
                let table = schema::require_table(conn, wanted).await?;
                selection.select_table(table.to_string());
            }
            table_items(conn).await?
        }
        None => Vec::new(),
    };
    slot.close().await?;
    let body = views::section_listing(htmx, Section::Tables, &selection, &items);
    Ok((selection.into_jar(), body).into_response())
}

/// POST /tables/add: create the table and make it current.
pub async fn add(
    State(state): State<AdminState>,
    mut selection: Selection,
    Form(form): Form<NameForm>,
) -> Result<Response, AdminError> {
    let table = Ident::parse(form.required("Table")?)?;
    let mut slot = ConnectionSlot::new();
    let conn = connect_selected(&state, &selection, &mut slot).await?;
    schema::create_table(conn, &table).await?;
    // An existing table matching case-insensitively is selected as stored.
    let table = schema::require_table(conn, table.as_str()).await?;
    let items = table_items(conn).await?;
    slot.close().await?;
    selection.select_table(table.to_string());
    Ok((
        selection.into_jar(),
        views::items_fragment(Section::Tables, &items),
    )
        .into_response())
}

/// GET /tables/select/{name}
pub async fn select(
    State(state): State<AdminState>,
    mut selection: Selection,
    Path(name): Path<String>,
) -> Result<Response, AdminError> {
    let mut slot = ConnectionSlot::new();
    let conn = connect_selected(&state, &selection, &mut slot).await?;
    let table = schema::require_table(conn, &name).await?;
    slot.close().await?;
    selection.select_table(table.to_string());
    Ok((selection.into_jar(), Redirect::to("/columns/")).into_response())
}

/// GET /tables/edit/{name}
pub async fn edit(
    State(state): State<AdminState>,
    selection: Selection,
    Path(name): Path<String>,
) -> Result<Response, AdminError> {
    let mut slot = ConnectionSlot::new();
    let conn = connect_selected(&state, &selection, &mut slot).await?;
    let table = schema::require_table(conn, &name).await?;
    slot.close().await?;
    let item = Item {
        key: table.to_string(),
        label: table.to_string(),
        detail: None,
    };
    Ok(views::edit_form(Section::Tables, &item).into_response())
}

/// PUT /tables/update/{name}
pub async fn update(
    State(state): State<AdminState>,
    mut selection: Selection,
    Path(name): Path<String>,
    Form(form): Form<NameForm>,
) -> Result<Response, AdminError> {
    let new_name = Ident::parse(form.required("Table")?)?;
    let mut slot = ConnectionSlot::new();
    let conn = connect_selected(&state, &selection, &mut slot).await?;
    let table = schema::require_table(conn, &name).await?;
    schema::rename_table(conn, &table, &new_name).await?;
    let items = table_items(conn).await?;
    slot.close().await?;
    if is_current_table(&selection, &table) {
        selection.select_table(new_name.to_string());
    }
    Ok((
        selection.into_jar(),
        views::items_fragment(Section::Tables, &items),
    )
        .into_response())
}

/// DELETE /tables/delete/{name}
pub async fn delete(
    State(state): State<AdminState>,
    mut selection: Selection,
    Path(name): Path<String>,
) -> Result<Response, AdminError> {
    let mut slot = ConnectionSlot::new();
    let conn = connect_selected(&state, &selection, &mut slot).await?;
    let table = schema::require_table(conn, &name).await?;
    schema::drop_table(conn, &table).await?;
    let items = table_items(conn).await?;
    slot.close().await?;
    if is_current_table(&selection, &table) {
        selection.clear_table();
    }
    Ok((
        selection.into_jar(),
        views::items_fragment(Section::Tables, &items),
    )
        .into_response())
}
