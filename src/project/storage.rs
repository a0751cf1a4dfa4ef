/// SQLite persistence layer for projects
///
/// Every operation is one statement with all inputs bound as parameters.
/// No multi-statement transactions are used.

use crate::project::types::{Project, ProjectId};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqlitePool;

/// Column list shared across queries
const COLUMNS: &str = "id, title, description, image_url, created_at";

/// Project Repository contract
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// All projects, newest first
    async fn list_all(&self) -> Result<Vec<Project>, sqlx::Error>;

    async fn insert(
        &self,
        title: &str,
        description: &str,
        image_url: &str,
    ) -> Result<Project, sqlx::Error>;

    /// Returns `None` when no row has the given id
    async fn update_by_id(
        &self,
        id: ProjectId,
        title: &str,
        description: &str,
        image_url: Option<&str>,
    ) -> Result<Option<Project>, sqlx::Error>;

    /// Stored image URL of a row; a NULL column reads as an empty string.
    /// Returns `None` when no row has the given id.
    async fn get_image_url_by_id(&self, id: ProjectId) -> Result<Option<String>, sqlx::Error>;

    /// Whether a row was removed
    async fn delete_by_id(&self, id: ProjectId) -> Result<bool, sqlx::Error>;
}

/// SQLite-backed project repository
#[derive(Debug, Clone)]
pub struct ProjectStorage {
    pool: SqlitePool,
}

impl ProjectStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProjectRepository for ProjectStorage {
    async fn list_all(&self) -> Result<Vec<Project>, sqlx::Error> {
        // id breaks ties between rows created within the same instant
        let query = format!("SELECT {COLUMNS} FROM projects ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, Project>(&query)
            .fetch_all(&self.pool)
            .await
    }

    async fn insert(
        &self,
        title: &str,
        description: &str,
        image_url: &str,
    ) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (title, description, image_url, created_at)
             VALUES (?, ?, ?, ?)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(title)
            .bind(description)
            .bind(image_url)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await
    }

    async fn update_by_id(
        &self,
        id: ProjectId,
        title: &str,
        description: &str,
        image_url: Option<&str>,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects
             SET title = ?, description = ?, image_url = ?
             WHERE id = ?
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(title)
            .bind(description)
            .bind(image_url)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_image_url_by_id(&self, id: ProjectId) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>("SELECT COALESCE(image_url, '') FROM projects WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn delete_by_id(&self, id: ProjectId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
