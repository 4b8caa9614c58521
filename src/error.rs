use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tracing::error;

#[derive(Debug, ThisError)]
pub enum AdminError {
    #[error("{0} name is required.")]
    MissingName(&'static str),

    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("No database selected.")]
    NoDatabaseSelected,

    #[error("No table selected.")]
    NoTableSelected,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    AlreadyExists(String),

    #[error("Error: {}", engine_message(.0))]
    Database(#[from] SqlxError),

    #[error("Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Config(String),
}

impl AdminError {
    pub fn status(&self) -> StatusCode {
        match self {
            AdminError::MissingName(_)
            | AdminError::InvalidName(_)
            | AdminError::NoDatabaseSelected
            | AdminError::NoTableSelected
            | AdminError::AlreadyExists(_)
            | AdminError::Database(_) => StatusCode::BAD_REQUEST,
            AdminError::NotFound(_) => StatusCode::NOT_FOUND,
            AdminError::Io(_) | AdminError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// The message SQLite itself produced, without sqlx's wrapping.
fn engine_message(err: &SqlxError) -> String {
    match err {
        SqlxError::Database(db_err) => db_err.message().to_string(),
        other => other.to_string(),
    }
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        (status, self.to_string()).into_response()
    }
}
