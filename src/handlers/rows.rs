use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use sqlx::SqliteConnection;

use crate::db::{ConnectionSlot, Ident, records};
use crate::error::AdminError;
use crate::handlers::{
    NameForm, connect_if_selected, connect_selected, current_table, selected_table,
};
use crate::middleware::{Htmx, Selection};
use crate::router::AdminState;
use crate::views::{self, Item, Section};

async fn row_items(conn: &mut SqliteConnection, table: &Ident) -> Result<Vec<Item>, AdminError> {
    Ok(records::list_rows(conn, table)
        .await?
        .iter()
        .map(Item::from)
        .collect())
}

/// GET / and GET /rows/: the current table's rows, newest first.
pub async fn index(
    State(state): State<AdminState>,
    selection: Selection,
    htmx: Htmx,
) -> Result<Response, AdminError> {
    let mut slot = ConnectionSlot::new();
    let items = match connect_if_selected(&state, &selection, &mut slot).await? {
        Some(conn) => match current_table(conn, &selection).await? {
            Some(table) => row_items(conn, &table).await?,
            None => Vec::new(),
        },
        None => Vec::new(),
    };
    slot.close().await?;
    Ok(views::section_listing(htmx, Section::Rows, &selection, &items).into_response())
}

/// POST /rows/add
pub async fn add(
    State(state): State<AdminState>,
    selection: Selection,
    Form(form): Form<NameForm>,
) -> Result<Response, AdminError> {
    let name = form.required("Row")?;
    let mut slot = ConnectionSlot::new();
    let conn = connect_selected(&state, &selection, &mut slot).await?;
    let table = selected_table(conn, &selection).await?;
    records::insert_row(conn, &table, name).await?;
    let items = row_items(conn, &table).await?;
    slot.close().await?;
    Ok(views::items_fragment(Section::Rows, &items).into_response())
}

/// GET /rows/edit/{id}
pub async fn edit(
    State(state): State<AdminState>,
    selection: Selection,
    Path(id): Path<i64>,
) -> Result<Response, AdminError> {
    let mut slot = ConnectionSlot::new();
    let conn = connect_selected(&state, &selection, &mut slot).await?;
    let table = selected_table(conn, &selection).await?;
    let row = records::get_row(conn, &table, id).await?;
    slot.close().await?;
    Ok(views::edit_form(Section::Rows, &Item::from(&row)).into_response())
}

/// PUT /rows/update/{id}
pub async fn update(
    State(state): State<AdminState>,
    selection: Selection,
    Path(id): Path<i64>,
    Form(form): Form<NameForm>,
) -> Result<Response, AdminError> {
    let name = form.required("Row")?;
    let mut slot = ConnectionSlot::new();
    let conn = connect_selected(&state, &selection, &mut slot).await?;
    let table = selected_table(conn, &selection).await?;
    records::update_row(conn, &table, id, name).await?;
    let items = row_items(conn, &table).await?;
    slot.close().await?;
    Ok(views::items_fragment(Section::Rows, &items).into_response())
}

/// DELETE /rows/delete/{id}
pub async fn delete(
    State(state): State<AdminState>,
    selection: Selection,
    Path(id): Path<i64>,
) -> Result<Response, AdminError> {
    let mut slot = ConnectionSlot::new();
    let conn = connect_selected(&state, &selection, &mut slot).await?;
    let table = selected_table(conn, &selection).await?;
    records::delete_row(conn, &table, id).await?;
    let items = row_items(conn, &table).await?;
    slot.close().await?;
    Ok(views::items_fragment(Section::Rows, &items).into_response())
}
