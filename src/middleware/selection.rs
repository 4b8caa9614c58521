use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Cookie, Key, PrivateCookieJar, SameSite};
use std::convert::Infallible;
use time::Duration;

use crate::error::AdminError;

pub const DATABASE_COOKIE: &str = "current_database";
pub const TABLE_COOKIE: &str = "current_table";

/// Attributes applied to the selection cookies.
#[derive(Debug, Clone, Copy)]
pub struct SessionSettings {
    pub secure: bool,
    pub max_age: Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            secure: false,
            max_age: Duration::hours(12),
        }
    }
}

/// The operator's current database and table, carried in an encrypted cookie
/// jar. Handlers that change it return [`Selection::into_jar`] with their
/// response.
pub struct Selection {
    database: Option<String>,
    table: Option<String>,
    // Only `None` transiently while a cookie is being added or removed.
    jar: Option<PrivateCookieJar>,
    settings: SessionSettings,
}

impl Selection {
    pub fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }

    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    pub fn require_database(&self) -> Result<&str, AdminError> {
        self.database().ok_or(AdminError::NoDatabaseSelected)
    }

    pub fn require_table(&self) -> Result<&str, AdminError> {
        self.table().ok_or(AdminError::NoTableSelected)
    }

    /// Switch databases; the table selection belongs to the old one.
    pub fn select_database(&mut self, name: impl Into<String>) {
        self.set_database(name);
        self.clear_table();
    }

    /// Point the selection at a renamed database, keeping the table.
    pub fn set_database(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.store(DATABASE_COOKIE, name.clone());
        self.database = Some(name);
    }

    pub fn select_table(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.store(TABLE_COOKIE, name.clone());
        self.table = Some(name);
    }

    pub fn clear_database(&mut self) {
        self.forget(DATABASE_COOKIE);
        self.database = None;
        self.clear_table();
    }

    pub fn clear_table(&mut self) {
        self.forget(TABLE_COOKIE);
        self.table = None;
    }

    pub fn into_jar(self) -> Option<PrivateCookieJar> {
        self.jar
    }

    fn store(&mut self, name: &'static str, value: String) {
        let cookie = build_cookie(name, value, &self.settings);
        self.jar = self.jar.take().map(|jar| jar.add(cookie));
    }

    fn forget(&mut self, name: &'static str) {
        self.jar = self.jar.take().map(|jar| jar.remove(clear_cookie(name)));
    }
}

impl<S> FromRequestParts<S> for Selection
where
    S: Send + Sync,
    Key: FromRef<S>,
    SessionSettings: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = PrivateCookieJar::<Key>::from_request_parts(parts, state).await?;
        let read = |name: &str| {
            jar.get(name)
                .map(|c| c.value().to_owned())
                .filter(|v| !v.is_empty())
        };
        let database = read(DATABASE_COOKIE);
        let table = read(TABLE_COOKIE);
        Ok(Self {
            database,
            table,
            jar: Some(jar),
            settings: SessionSettings::from_ref(state),
        })
    }
}

fn build_cookie(name: &'static str, value: String, settings: &SessionSettings) -> Cookie<'static> {
    Cookie::build(Cookie::new(name, value))
        .path("/")
        .http_only(true)
        .secure(settings.secure)
        .same_site(SameSite::Lax)
        .max_age(settings.max_age)
        .build()
}

fn clear_cookie(name: &'static str) -> Cookie<'static> {
    Cookie::build(Cookie::new(name, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}
