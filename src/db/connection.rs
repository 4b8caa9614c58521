use crate::error::AdminError;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{ConnectOptions, Connection, SqliteConnection};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Request-scoped SQLite connection, opened on first use.
///
/// Reused while the requested path stays the same; asking for another path
/// closes the current connection first. Dropping the slot drops the
/// connection, which closes the underlying handle.
#[derive(Default)]
pub struct ConnectionSlot {
    current: Option<(PathBuf, SqliteConnection)>,
}

impl ConnectionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&mut self, path: &Path) -> Result<&mut SqliteConnection, AdminError> {
        if let Some((open_path, conn)) = self.current.take() {
            if open_path.as_path() == path {
                return Ok(&mut self.current.insert((open_path, conn)).1);
            }
            debug!(path = %open_path.display(), "closing connection for path switch");
            conn.close().await?;
        }
        let conn = open(path, false).await?;
        Ok(&mut self.current.insert((path.to_path_buf(), conn)).1)
    }

    #[cfg(test)]
    fn path(&self) -> Option<&Path> {
        self.current.as_ref().map(|(p, _)| p.as_path())
    }

    pub async fn close(mut self) -> Result<(), AdminError> {
        if let Some((_, conn)) = self.current.take() {
            conn.close().await?;
        }
        Ok(())
    }
}

/// Open a single connection to `path`.
pub async fn open(path: &Path, create_if_missing: bool) -> Result<SqliteConnection, AdminError> {
    let conn = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(create_if_missing)
        .connect()
        .await?;
    Ok(conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn reuses_connection_for_same_path() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.sqlite");
        open(&a, true).await.unwrap().close().await.unwrap();

        let mut slot = ConnectionSlot::new();
        sqlx::query("CREATE TEMP TABLE marker (x INTEGER)")
            .execute(slot.acquire(&a).await.unwrap())
            .await
            .unwrap();
        // A temp table only survives on the very same connection.
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM temp.marker")
            .fetch_one(slot.acquire(&a).await.unwrap())
            .await
            .unwrap();
        assert_eq!(n, 0);
        slot.close().await.unwrap();
    }

    #[tokio::test]
    async fn switches_path_and_refuses_missing_files() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.sqlite");
        let b = dir.path().join("b.sqlite");
        open(&a, true).await.unwrap().close().await.unwrap();
        open(&b, true).await.unwrap().close().await.unwrap();

        let mut slot = ConnectionSlot::new();
        slot.acquire(&a).await.unwrap();
        slot.acquire(&b).await.unwrap();
        assert_eq!(slot.path(), Some(b.as_path()));

        let missing = dir.path().join("missing.sqlite");
        assert!(slot.acquire(&missing).await.is_err());
        assert!(!missing.exists());
    }
}
