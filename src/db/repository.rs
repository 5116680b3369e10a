//! Data access for the desktop shell.
//!
//! Handlers only see the traits below and receive plain records; the SQLite
//! implementation is the one wired in production and in tests.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::error::{AppError, Result};
use crate::models::{FileRecord, NewFile, NewUser, SettingsUpdate, User, UserSettings};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Insert a user together with its default settings row
    async fn create_user(&self, new_user: &NewUser) -> Result<User>;
}

#[async_trait]
pub trait FileRepository: Send + Sync {
    /// All files owned by `user_id`, in insertion order
    async fn files_for_user(&self, user_id: i64) -> Result<Vec<FileRecord>>;

    async fn create_file(&self, new_file: &NewFile) -> Result<FileRecord>;
}

#[async_trait]
pub trait SettingsRepository: Send + Sync {
    async fn settings_for_user(&self, user_id: i64) -> Result<Option<UserSettings>>;

    /// Merge `update` into the user's settings, creating the row if missing
    async fn save_settings(&self, user_id: i64, update: &SettingsUpdate) -> Result<UserSettings>;
}

#[async_trait]
pub trait Repository: UserRepository + FileRepository + SettingsRepository {
    /// Cheap connectivity probe for health checks
    async fn ping(&self) -> Result<()>;
}

/// SQLite-backed repository
#[derive(Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn map_unique_violation(err: sqlx::Error) -> AppError {
    match err {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            AppError::UserAlreadyExists
        }
        other => AppError::Database(other),
    }
}

#[async_trait]
impl UserRepository for SqliteRepository {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash, google_id FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create_user(&self, new_user: &NewUser) -> Result<User> {
        new_user.validate().map_err(AppError::InvalidInput)?;

        let mut tx = self.pool.begin().await?;

        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (username, email, password_hash, google_id) \
             VALUES (?, ?, ?, ?) \
             RETURNING id, username, email, password_hash, google_id",
        )
        .bind(new_user.username.trim())
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(&new_user.google_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_unique_violation)?;

        sqlx::query("INSERT INTO user_settings (dark_mode, wallpaper, user_id) VALUES (0, NULL, ?)")
            .bind(user.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!("Created user {} (id {})", user.username, user.id);
        Ok(user)
    }
}

#[async_trait]
impl FileRepository for SqliteRepository {
    async fn files_for_user(&self, user_id: i64) -> Result<Vec<FileRecord>> {
        let files = sqlx::query_as::<_, FileRecord>(
            "SELECT id, filename, path, size, type, created_at, user_id \
             FROM files WHERE user_id = ? ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(files)
    }

    async fn create_file(&self, new_file: &NewFile) -> Result<FileRecord> {
        let file = sqlx::query_as::<_, FileRecord>(
            "INSERT INTO files (filename, path, size, type, created_at, user_id) \
             VALUES (?, ?, ?, ?, ?, ?) \
             RETURNING id, filename, path, size, type, created_at, user_id",
        )
        .bind(&new_file.filename)
        .bind(&new_file.path)
        .bind(new_file.size)
        .bind(&new_file.file_type)
        .bind(Utc::now())
        .bind(new_file.user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(file)
    }
}

#[async_trait]
impl SettingsRepository for SqliteRepository {
    async fn settings_for_user(&self, user_id: i64) -> Result<Option<UserSettings>> {
        let settings = sqlx::query_as::<_, UserSettings>(
            "SELECT id, dark_mode, wallpaper, user_id FROM user_settings WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(settings)
    }

    async fn save_settings(&self, user_id: i64, update: &SettingsUpdate) -> Result<UserSettings> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, UserSettings>(
            "SELECT id, dark_mode, wallpaper, user_id FROM user_settings WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let merged = current
            .map(crate::models::SettingsResponse::from)
            .unwrap_or_default()
            .merged(update);

        let saved = sqlx::query_as::<_, UserSettings>(
            "INSERT INTO user_settings (dark_mode, wallpaper, user_id) VALUES (?, ?, ?) \
             ON CONFLICT(user_id) DO UPDATE SET \
                dark_mode = excluded.dark_mode, \
                wallpaper = excluded.wallpaper \
             RETURNING id, dark_mode, wallpaper, user_id",
        )
        .bind(merged.dark_mode)
        .bind(&merged.wallpaper)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(saved)
    }
}

#[async_trait]
impl Repository for SqliteRepository {
    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_memory_pool, run_migrations};

    async fn repository() -> SqliteRepository {
        let pool = create_memory_pool().await.unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteRepository::new(pool)
    }

    fn new_user(username: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password_hash: Some("$argon2id$stub".to_string()),
            google_id: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_find_user() {
        let repo = repository().await;
        let created = repo.create_user(&new_user("alice")).await.unwrap();

        let found = repo.find_user_by_username("alice").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.email, "alice@example.com");

        assert!(repo.find_user_by_username("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_user_creates_default_settings() {
        let repo = repository().await;
        let user = repo.create_user(&new_user("alice")).await.unwrap();

        let settings = repo.settings_for_user(user.id).await.unwrap().unwrap();
        assert!(!settings.dark_mode);
        assert!(settings.wallpaper.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let repo = repository().await;
        repo.create_user(&new_user("alice")).await.unwrap();

        let duplicate = NewUser {
            email: "other@example.com".to_string(),
            ..new_user("alice")
        };
        assert!(matches!(
            repo.create_user(&duplicate).await,
            Err(AppError::UserAlreadyExists)
        ));
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let repo = repository().await;
        repo.create_user(&new_user("alice")).await.unwrap();

        let duplicate = NewUser {
            email: "alice@example.com".to_string(),
            ..new_user("alicia")
        };
        assert!(matches!(
            repo.create_user(&duplicate).await,
            Err(AppError::UserAlreadyExists)
        ));
    }

    #[tokio::test]
    async fn test_files_for_user_filters_by_owner() {
        let repo = repository().await;
        let alice = repo.create_user(&new_user("alice")).await.unwrap();
        let bob = repo.create_user(&new_user("bob")).await.unwrap();

        for (name, owner) in [("a1.txt", alice.id), ("b1.txt", bob.id), ("a2.txt", alice.id)] {
            repo.create_file(&NewFile {
                filename: name.to_string(),
                path: format!("/files/{}", name),
                size: Some(10),
                file_type: Some("text/plain".to_string()),
                user_id: owner,
            })
            .await
            .unwrap();
        }

        let files = repo.files_for_user(alice.id).await.unwrap();
        let names: Vec<_> = files.iter().map(|f| f.filename.as_str()).collect();
        assert_eq!(names, vec!["a1.txt", "a2.txt"]);
        assert!(files.iter().all(|f| f.user_id == alice.id));
    }

    #[tokio::test]
    async fn test_create_file_requires_existing_owner() {
        let repo = repository().await;
        let result = repo
            .create_file(&NewFile {
                filename: "orphan.txt".to_string(),
                path: "/files/orphan.txt".to_string(),
                size: None,
                file_type: None,
                user_id: 999,
            })
            .await;
        assert!(matches!(result, Err(AppError::Database(_))));
    }

    #[tokio::test]
    async fn test_save_settings_partial_update() {
        let repo = repository().await;
        let user = repo.create_user(&new_user("alice")).await.unwrap();

        let saved = repo
            .save_settings(
                user.id,
                &SettingsUpdate {
                    dark_mode: Some(true),
                    wallpaper: Some("dunes.jpg".to_string()),
                },
            )
            .await
            .unwrap();
        assert!(saved.dark_mode);

        let saved = repo
            .save_settings(
                user.id,
                &SettingsUpdate {
                    dark_mode: Some(false),
                    wallpaper: None,
                },
            )
            .await
            .unwrap();
        assert!(!saved.dark_mode);
        assert_eq!(saved.wallpaper.as_deref(), Some("dunes.jpg"));
    }

    #[tokio::test]
    async fn test_ping() {
        let repo = repository().await;
        assert!(repo.ping().await.is_ok());
    }
}
