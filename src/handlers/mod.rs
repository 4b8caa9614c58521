pub mod columns;
pub mod data_entry;
pub mod databases;
pub mod rows;
pub mod tables;

use serde::Deserialize;
use sqlx::SqliteConnection;

use crate::db::{ConnectionSlot, Ident, schema};
use crate::error::AdminError;
use crate::middleware::Selection;
use crate::router::AdminState;

/// The single-field form every registry posts.
#[derive(Debug, Default, Deserialize)]
pub struct NameForm {
    pub name: Option<String>,
}

impl NameForm {
    /// The trimmed name, or `MissingName(kind)` when absent or blank.
    pub fn required(&self, kind: &'static str) -> Result<&str, AdminError> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or(AdminError::MissingName(kind))
    }
}

/// Open the selected database, failing when none is selected or it vanished.
pub(crate) async fn connect_selected<'a>(
    state: &AdminState,
    selection: &Selection,
    slot: &'a mut ConnectionSlot,
) -> Result<&'a mut SqliteConnection, AdminError> {
    let name = selection.require_database()?;
    let path = state.catalog().existing_path(name).await?;
    slot.acquire(&path).await
}

/// Like [`connect_selected`], but `None` when there is nothing usable to read.
pub(crate) async fn connect_if_selected<'a>(
    state: &AdminState,
    selection: &Selection,
    slot: &'a mut ConnectionSlot,
) -> Result<Option<&'a mut SqliteConnection>, AdminError> {
    let Some(name) = selection.database() else {
        return Ok(None);
    };
    match state.catalog().existing_path(name).await {
        Ok(path) => slot.acquire(&path).await.map(Some),
        Err(AdminError::NotFound(_) | AdminError::InvalidName(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

/// The selected table when it still exists; read-only listings render empty
/// otherwise.
pub(crate) async fn current_table(
    conn: &mut SqliteConnection,
    selection: &Selection,
) -> Result<Option<Ident>, AdminError> {
    match selection.table() {
        Some(table) => schema::find_table(conn, table).await,
        None => Ok(None),
    }
}

/// Whether `table` is the selected one, compared the way SQLite compares
/// identifiers.
pub(crate) fn is_current_table(selection: &Selection, table: &Ident) -> bool {
    selection
        .table()
        .is_some_and(|t| t.eq_ignore_ascii_case(table.as_str()))
}

/// The selected table, which must exist in `conn`.
pub(crate) async fn selected_table(
    conn: &mut SqliteConnection,
    selection: &Selection,
) -> Result<Ident, AdminError> {
    let table = selection.require_table()?;
    schema::require_table(conn, table).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_names_are_missing() {
        let form = NameForm {
            name: Some("   ".into()),
        };
        assert!(matches!(
            form.required("Table"),
            Err(AdminError::MissingName("Table"))
        ));
        assert!(NameForm::default().required("Table").is_err());
        let form = NameForm {
            name: Some(" items ".into()),
        };
        assert_eq!(form.required("Table").unwrap(), "items");
    }
}
