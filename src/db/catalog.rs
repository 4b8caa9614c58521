use crate::db::connection;
use crate::db::ident::{DATABASE_SUFFIX, database_file_name};
use crate::db::models::DatabaseEntry;
use crate::error::AdminError;
use sqlx::Connection;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

/// The directory of `*.sqlite` files the operator manages.
#[derive(Debug, Clone)]
pub struct DatabaseCatalog {
    dir: PathBuf,
}

impl DatabaseCatalog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn ensure_dir(&self) -> Result<(), AdminError> {
        fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// All database files, sorted by name.
    pub async fn list(&self) -> Result<Vec<DatabaseEntry>, AdminError> {
        let mut names = Vec::new();
        let mut entries = fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str()
                && name.ends_with(DATABASE_SUFFIX)
            {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names
            .into_iter()
            .enumerate()
            .map(|(position, name)| DatabaseEntry { position, name })
            .collect())
    }

    /// Path of an existing database, or `NotFound`.
    pub async fn existing_path(&self, name: &str) -> Result<PathBuf, AdminError> {
        let file_name = database_file_name(name)?;
        let path = self.dir.join(&file_name);
        let is_file = match fs::metadata(&path).await {
            Ok(meta) => meta.is_file(),
            Err(e) if e.kind() == ErrorKind::NotFound => false,
            Err(e) => return Err(e.into()),
        };
        if is_file {
            Ok(path)
        } else {
            Err(AdminError::NotFound(format!(
                "Database {file_name} does not exist."
            )))
        }
    }

    pub async fn contains(&self, name: &str) -> Result<bool, AdminError> {
        match self.existing_path(name).await {
            Ok(_) => Ok(true),
            Err(AdminError::NotFound(_) | AdminError::InvalidName(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Create an empty database file; a no-op when it already exists.
    pub async fn create(&self, name: &str) -> Result<String, AdminError> {
        let file_name = database_file_name(name)?;
        let conn = connection::open(&self.dir.join(&file_name), true).await?;
        conn.close().await?;
        info!(database = %file_name, "created database");
        Ok(file_name)
    }

    pub async fn rename(&self, from: &str, to: &str) -> Result<String, AdminError> {
        let old_path = self.existing_path(from).await?;
        let new_name = database_file_name(to)?;
        let new_path = self.dir.join(&new_name);
        if fs::try_exists(&new_path).await? {
            return Err(AdminError::AlreadyExists(format!(
                "Database {new_name} already exists."
            )));
        }
        fs::rename(&old_path, &new_path).await?;
        info!(from = %old_path.display(), to = %new_name, "renamed database");
        Ok(new_name)
    }

    pub async fn delete(&self, name: &str) -> Result<(), AdminError> {
        let path = self.existing_path(name).await?;
        fs::remove_file(&path).await?;
        info!(database = %path.display(), "deleted database");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn names(entries: &[DatabaseEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[tokio::test]
    async fn lists_only_sqlite_files_in_name_order() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"").unwrap();
        std::fs::create_dir(dir.path().join("nested.sqlite")).unwrap();
        let catalog = DatabaseCatalog::new(dir.path());
        catalog.create("zeta").await.unwrap();
        catalog.create("alpha").await.unwrap();

        let listed = catalog.list().await.unwrap();
        assert_eq!(names(&listed), ["alpha.sqlite", "zeta.sqlite"]);
        assert_eq!(listed[1].position, 1);
    }

    #[tokio::test]
    async fn create_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let catalog = DatabaseCatalog::new(dir.path());
        assert_eq!(catalog.create("shop").await.unwrap(), "shop.sqlite");
        catalog.create("shop.sqlite").await.unwrap();
        assert_eq!(names(&catalog.list().await.unwrap()), ["shop.sqlite"]);
    }

    #[tokio::test]
    async fn rename_checks_source_and_target() {
        let dir = TempDir::new().unwrap();
        let catalog = DatabaseCatalog::new(dir.path());
        catalog.create("a").await.unwrap();
        catalog.create("b").await.unwrap();

        assert!(matches!(
            catalog.rename("missing", "c").await,
            Err(AdminError::NotFound(_))
        ));
        assert!(matches!(
            catalog.rename("a.sqlite", "b").await,
            Err(AdminError::AlreadyExists(_))
        ));
        assert_eq!(catalog.rename("a.sqlite", "c").await.unwrap(), "c.sqlite");
        assert_eq!(
            names(&catalog.list().await.unwrap()),
            ["b.sqlite", "c.sqlite"]
        );
    }

    #[tokio::test]
    async fn delete_removes_only_the_named_file() {
        let dir = TempDir::new().unwrap();
        let catalog = DatabaseCatalog::new(dir.path());
        for name in ["one", "two", "three"] {
            catalog.create(name).await.unwrap();
        }
        catalog.delete("two.sqlite").await.unwrap();
        assert_eq!(
            names(&catalog.list().await.unwrap()),
            ["one.sqlite", "three.sqlite"]
        );
        assert!(matches!(
            catalog.delete("two.sqlite").await,
            Err(AdminError::NotFound(_))
        ));
        assert!(!catalog.contains("two").await.unwrap());
        assert!(catalog.contains("one.sqlite").await.unwrap());
    }

    #[tokio::test]
    async fn directories_are_not_databases() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("x.sqlite")).unwrap();
        let catalog = DatabaseCatalog::new(dir.path());
        assert!(!catalog.contains("x").await.unwrap());
        assert!(matches!(
            catalog.delete("x.sqlite").await,
            Err(AdminError::NotFound(_))
        ));
        assert!(dir.path().join("x.sqlite").is_dir());
    }
}
