use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};

use crate::db::ident::database_file_name;
use crate::error::AdminError;
use crate::handlers::NameForm;
use crate::middleware::{Htmx, Selection};
use crate::router::AdminState;
use crate::views::{self, Item, Section};

async fn database_items(state: &AdminState) -> Result<Vec<Item>, AdminError> {
    Ok(state.catalog().list().await?.iter().map(Item::from).collect())
}

fn is_selected(selection: &Selection, name: &str) -> bool {
    database_file_name(name).is_ok_and(|file| selection.database() == Some(file.as_str()))
}

/// GET /databases/
pub async fn index(
    State(state): State<AdminState>,
    selection: Selection,
    htmx: Htmx,
) -> Result<Response, AdminError> {
    let items = database_items(&state).await?;
    Ok(views::section_listing(htmx, Section::Databases, &selection, &items).into_response())
}

/// POST /databases/add
pub async fn add(
    State(state): State<AdminState>,
    Form(form): Form<NameForm>,
) -> Result<Response, AdminError> {
    let name = form.required("Database")?;
    state.catalog().create(name).await?;
    let items = database_items(&state).await?;
    Ok(views::items_fragment(Section::Databases, &items).into_response())
}

/// GET /databases/select/{name}
pub async fn select(
    State(state): State<AdminState>,
    mut selection: Selection,
    Path(name): Path<String>,
) -> Result<Response, AdminError> {
    state.catalog().existing_path(&name).await?;
    selection.select_database(database_file_name(&name)?);
    Ok((selection.into_jar(), Redirect::to("/tables/")).into_response())
}

/// GET /databases/edit/{name}
pub async fn edit(
    State(state): State<AdminState>,
    Path(name): Path<String>,
) -> Result<Response, AdminError> {
    if !state.catalog().contains(&name).await? {
        return Err(AdminError::NotFound("Database not found".to_string()));
    }
    let file_name = database_file_name(&name)?;
    let item = Item {
        key: file_name.clone(),
        label: file_name,
        detail: None,
    };
    Ok(views::edit_form(Section::Databases, &item).into_response())
}

/// PUT /databases/update/{name}
pub async fn update(
    State(state): State<AdminState>,
    mut selection: Selection,
    Path(name): Path<String>,
    Form(form): Form<NameForm>,
) -> Result<Response, AdminError> {
    let new_name = form.required("Database")?;
    let renamed = state.catalog().rename(&name, new_name).await?;
    if is_selected(&selection, &name) {
        selection.set_database(renamed);
    }
    let items = database_items(&state).await?;
    Ok((
        selection.into_jar(),
        views::items_fragment(Section::Databases, &items),
    )
        .into_response())
}

/// DELETE /databases/delete/{name}
pub async fn delete(
    State(state): State<AdminState>,
    mut selection: Selection,
    Path(name): Path<String>,
) -> Result<Response, AdminError> {
    state.catalog().delete(&name).await?;
    if is_selected(&selection, &name) {
        selection.clear_database();
    }
    let items = database_items(&state).await?;
    Ok((
        selection.into_jar(),
        views::items_fragment(Section::Databases, &items),
    )
        .into_response())
}
