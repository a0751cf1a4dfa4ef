/// Project type definitions
///
/// The persisted row, the JSON views the HTTP surface returns, and the
/// validated inputs the service accepts.

use chrono::{DateTime, Utc};
use serde::Serialize;

pub type ProjectId = i64;

/// A row of the `projects` table
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    /// Set once at insert; sole ordering key for listings (newest first)
    pub created_at: DateTime<Utc>,
}

/// Public listing entry: `{id, title, description, image_url}`
#[derive(Debug, Clone, Serialize)]
pub struct ProjectCard {
    pub id: ProjectId,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
}

/// Admin response summary: `{id, title, image_url}`
#[derive(Debug, Clone, Serialize)]
pub struct ProjectSummary {
    pub id: ProjectId,
    pub title: String,
    pub image_url: Option<String>,
}

impl From<Project> for ProjectCard {
    fn from(p: Project) -> Self {
        Self {
            id: p.id,
            title: p.title,
            description: p.description,
            image_url: p.image_url,
        }
    }
}

impl From<Project> for ProjectSummary {
    fn from(p: Project) -> Self {
        Self {
            id: p.id,
            title: p.title,
            image_url: p.image_url,
        }
    }
}

/// Image bytes received with a request, held in memory only
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("len", &self.bytes.len())
            .field("mime_type", &self.mime_type)
            .finish()
    }
}

/// Validated input for creating a project
#[derive(Debug, Clone)]
pub struct NewProject {
    pub title: String,
    pub description: String,
    pub image: Option<ImageUpload>,
}

/// Validated input for updating a project
///
/// `existing_image_url` is the URL the caller currently holds for the row.
/// The service never reads before writing, so without a new image it is the
/// value written back.
#[derive(Debug, Clone)]
pub struct ProjectUpdate {
    pub title: String,
    pub description: String,
    pub image: Option<ImageUpload>,
    pub existing_image_url: Option<String>,
}
