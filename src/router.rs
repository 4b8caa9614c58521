use axum::{
    Router,
    extract::FromRef,
    routing::{delete, get, post, put},
};
use axum_extra::extract::cookie::Key;
use std::sync::Arc;
use time::Duration;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::config::Config;
use crate::db::DatabaseCatalog;
use crate::error::AdminError;
use crate::handlers::{columns, data_entry, databases, rows, tables};
use crate::middleware::SessionSettings;

#[derive(Clone)]
pub struct AdminState {
    catalog: Arc<DatabaseCatalog>,
    key: Key,
    session: SessionSettings,
}

impl AdminState {
    pub fn new(cfg: &Config) -> Result<Self, AdminError> {
        let key = match cfg.cookie_secret.as_deref() {
            Some(secret) => Key::try_from(secret.as_bytes()).map_err(|_| {
                AdminError::Config("cookie_secret must be at least 64 bytes".to_string())
            })?,
            None => {
                warn!("no cookie_secret configured; selections reset on restart");
                Key::generate()
            }
        };
        Ok(Self {
            catalog: Arc::new(DatabaseCatalog::new(cfg.data_dir.clone())),
            key,
            session: SessionSettings {
                secure: cfg.secure_cookie,
                max_age: Duration::hours(cfg.session_max_age_hours),
            },
        })
    }

    pub fn catalog(&self) -> &DatabaseCatalog {
        &self.catalog
    }
}

impl FromRef<AdminState> for Key {
    fn from_ref(state: &AdminState) -> Self {
        state.key.clone()
    }
}

impl FromRef<AdminState> for SessionSettings {
    fn from_ref(state: &AdminState) -> Self {
        state.session
    }
}

pub fn admin_router(state: AdminState) -> Router {
    Router::new()
        .route("/", get(rows::index))
        .route("/rows/", get(rows::index))
        .route("/rows/add", post(rows::add))
        .route("/rows/edit/{id}", get(rows::edit))
        .route("/rows/update/{id}", put(rows::update))
        .route("/rows/delete/{id}", delete(rows::delete))
        .route("/databases/", get(databases::index).post(databases::add))
        .route("/databases/add", post(databases::add))
        .route("/databases/select/{name}", get(databases::select))
        .route("/databases/edit/{name}", get(databases::edit))
        .route("/databases/update/{name}", put(databases::update))
        .route("/databases/delete/{name}", delete(databases::delete))
        .route("/tables/", get(tables::index).post(tables::add))
        .route("/tables/add", post(tables::add))
        .route("/tables/select/{name}", get(tables::select))
        .route("/tables/edit/{name}", get(tables::edit))
        .route("/tables/update/{name}", put(tables::update))
        .route("/tables/delete/{name}", delete(tables::delete))
        .route("/columns/", get(columns::index).post(columns::add))
        .route("/columns/add", post(columns::add))
        .route("/columns/edit/{cid}", get(columns::edit))
        .route("/columns/update/{cid}", put(columns::update))
        .route("/columns/delete/{cid}", delete(columns::delete))
        .route(
            "/data-entry/{table}",
            get(data_entry::entry_form).post(data_entry::insert),
        )
        .route("/data-list/{table}", get(data_entry::list))
        .route(
            "/data-edit/{table}/{id}",
            get(data_entry::edit_form).post(data_entry::update),
        )
        .route("/data-delete/{table}/{id}", post(data_entry::delete))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
