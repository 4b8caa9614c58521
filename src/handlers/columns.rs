use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use sqlx::SqliteConnection;

use crate::db::{ConnectionSlot, Ident, schema};
use crate::error::AdminError;
use crate::handlers::{
    NameForm, connect_if_selected, connect_selected, current_table, selected_table,
};
use crate::middleware::{Htmx, Selection};
use crate::router::AdminState;
use crate::views::{self, Item, Section};

async fn column_items(conn: &mut SqliteConnection, table: &Ident) -> Result<Vec<Item>, AdminError> {
    Ok(schema::list_columns(conn, table.as_str())
        .await?
        .iter()
        .map(Item::from)
        .collect())
}

/// GET /columns/
pub async fn index(
    State(state): State<AdminState>,
    selection: Selection,
    htmx: Htmx,
) -> Result<Response, AdminError> {
    let mut slot = ConnectionSlot::new();
    let items = match connect_if_selected(&state, &selection, &mut slot).await? {
        Some(conn) => match current_table(conn, &selection).await? {
            Some(table) => column_items(conn, &table).await?,
            None => Vec::new(),
        },
        None => Vec::new(),
    };
    slot.close().await?;
    Ok(views::section_listing(htmx, Section::Columns, &selection, &items).into_response())
}

/// POST /columns/add
pub async fn add(
    State(state): State<AdminState>,
    selection: Selection,
    Form(form): Form<NameForm>,
) -> Result<Response, AdminError> {
    let column = Ident::parse(form.required("Column")?)?;
    let mut slot = ConnectionSlot::new();
    let conn = connect_selected(&state, &selection, &mut slot).await?;
    let table = selected_table(conn, &selection).await?;
    schema::add_column(conn, &table, &column).await?;
    let items = column_items(conn, &table).await?;
    slot.close().await?;
    Ok(views::items_fragment(Section::Columns, &items).into_response())
}

/// GET /columns/edit/{cid}
pub async fn edit(
    State(state): State<AdminState>,
    selection: Selection,
    Path(cid): Path<i64>,
) -> Result<Response, AdminError> {
    let mut slot = ConnectionSlot::new();
    let conn = connect_selected(&state, &selection, &mut slot).await?;
    let table = selected_table(conn, &selection).await?;
    let column = schema::find_column(conn, &table, cid).await?;
    slot.close().await?;
    Ok(views::edit_form(Section::Columns, &Item::from(&column)).into_response())
}

/// PUT /columns/update/{cid}
pub async fn update(
    State(state): State<AdminState>,
    selection: Selection,
    Path(cid): Path<i64>,
    Form(form): Form<NameForm>,
) -> Result<Response, AdminError> {
    let new_name = Ident::parse(form.required("Column")?)?;
    let mut slot = ConnectionSlot::new();
    let conn = connect_selected(&state, &selection, &mut slot).await?;
    let table = selected_table(conn, &selection).await?;
    schema::rename_column(conn, &table, cid, &new_name).await?;
    let items = column_items(conn, &table).await?;
    slot.close().await?;
    Ok(views::items_fragment(Section::Columns, &items).into_response())
}

/// DELETE /columns/delete/{cid}
pub async fn delete(
    State(state): State<AdminState>,
    selection: Selection,
    Path(cid): Path<i64>,
) -> Result<Response, AdminError> {
    let mut slot = ConnectionSlot::new();
    let conn = connect_selected(&state, &selection, &mut slot).await?;
    let table = selected_table(conn, &selection).await?;
    schema::drop_column(conn, &table, cid).await?;
    let items = column_items(conn, &table).await?;
    slot.close().await?;
    Ok(views::items_fragment(Section::Columns, &items).into_response())
}
