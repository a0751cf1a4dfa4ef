/// Project service: create/update/delete across the media host and the store
///
/// The two systems share no transaction. Ordering rules:
/// - media is uploaded before a row references it
/// - a row is deleted before its media
/// - cleanup of an old asset is best-effort and never fails the operation
///
/// A store write that fails after a successful upload leaves the uploaded
/// asset orphaned. That window is accepted and logged, not compensated.

use crate::error::{ProjectError, ProjectResult};
use crate::media::{AssetIdPattern, MediaStore, UploadedAsset};
use crate::project::storage::ProjectRepository;
use crate::project::types::{ImageUpload, NewProject, Project, ProjectId, ProjectUpdate};
use std::sync::Arc;

pub struct ProjectService {
    repository: Arc<dyn ProjectRepository>,
    media: Arc<dyn MediaStore>,
    /// Media folder for uploads
    folder: String,
    /// Recovers asset ids from URLs stored under `folder`
    asset_ids: AssetIdPattern,
}

impl ProjectService {
    pub fn new(
        repository: Arc<dyn ProjectRepository>,
        media: Arc<dyn MediaStore>,
        folder: impl Into<String>,
    ) -> Self {
        let folder = folder.into();
        Self {
            repository,
            media,
            asset_ids: AssetIdPattern::new(&folder),
            folder,
        }
    }

    /// All projects, newest first
    pub async fn list(&self) -> ProjectResult<Vec<Project>> {
        Ok(self.repository.list_all().await?)
    }

    pub async fn create(&self, input: NewProject) -> ProjectResult<Project> {
        let (title, description) = require_text(&input.title, &input.description)
            .ok_or_else(|| ProjectError::validation("Title, description, and image are required."))?;
        let image = input
            .image
            .filter(|img| !img.bytes.is_empty())
            .ok_or_else(|| ProjectError::validation("Title, description, and image are required."))?;

        let asset = self.upload(image).await?;

        let project = self
            .repository
            .insert(title, description, &asset.url)
            .await
            .map_err(|e| {
                tracing::error!(
                    asset_id = %asset.asset_id,
                    "⚠️ Insert failed after upload, asset is orphaned: {}",
                    e
                );
                ProjectError::Store(e)
            })?;

        tracing::info!(id = project.id, "✅ Created project '{}'", project.title);
        Ok(project)
    }

    pub async fn update(&self, id: ProjectId, input: ProjectUpdate) -> ProjectResult<Project> {
        let (title, description) = require_text(&input.title, &input.description)
            .ok_or_else(|| ProjectError::validation("Title and description are required."))?;

        let existing_image_url = input
            .existing_image_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty());
        let new_image = input.image.filter(|img| !img.bytes.is_empty());

        let (image_url, uploaded) = match new_image {
            Some(image) => {
                if let Some(old_url) = existing_image_url {
                    self.remove_asset_best_effort(old_url, id).await;
                }
                (self.upload(image).await?.url, true)
            }
            // Nothing else tells us the current URL; writing nothing would
            // null out the stored image.
            None => {
                let kept = existing_image_url.ok_or_else(|| {
                    ProjectError::validation("existing_image_url is required when no new image is sent.")
                })?;
                (kept.to_string(), false)
            }
        };

        let updated = self
            .repository
            .update_by_id(id, title, description, Some(&image_url))
            .await?;

        match updated {
            Some(project) => {
                tracing::info!(id, "✅ Updated project '{}'", project.title);
                Ok(project)
            }
            None => {
                if uploaded {
                    tracing::warn!(id, image_url = %image_url, "⚠️ No row to update, uploaded asset is orphaned");
                }
                Err(ProjectError::NotFound { id })
            }
        }
    }

    pub async fn delete(&self, id: ProjectId) -> ProjectResult<()> {
        let image_url = self
            .repository
            .get_image_url_by_id(id)
            .await?
            .ok_or(ProjectError::NotFound { id })?;

        // Row goes first; media stays consistent with it if this fails
        if !self.repository.delete_by_id(id).await? {
            // Removed concurrently; whoever removed it owns the media cleanup
            return Err(ProjectError::NotFound { id });
        }

        if !image_url.is_empty() {
            self.remove_asset_best_effort(&image_url, id).await;
        }

        tracing::info!(id, "🗑️ Deleted project");
        Ok(())
    }

    async fn upload(&self, image: ImageUpload) -> ProjectResult<UploadedAsset> {
        self.media
            .upload(image.bytes, &image.mime_type, &self.folder)
            .await
            .map_err(|e| ProjectError::MediaUpload(e.to_string()))
    }

    /// Delete the asset behind `url`, logging instead of failing
    async fn remove_asset_best_effort(&self, url: &str, id: ProjectId) {
        let Some(asset_id) = self.asset_ids.extract(url) else {
            tracing::debug!(id, url, "No media asset id in URL, skipping cleanup");
            return;
        };

        if let Err(e) = self.media.delete(&asset_id, &self.folder).await {
            let error = ProjectError::MediaDelete(e.to_string());
            tracing::warn!(id, asset_id = %asset_id, "⚠️ Media cleanup failed: {}", error);
        }
    }
}

/// Trimmed title and description, or `None` if either is blank
fn require_text<'a>(title: &'a str, description: &'a str) -> Option<(&'a str, &'a str)> {
    let title = title.trim();
    let description = description.trim();
    if title.is_empty() || description.is_empty() {
        None
    } else {
        Some((title, description))
    }
}
