/// Multipart form decoding for the admin routes
///
/// Turns `title`, `description`, `image` and `existing_image_url` parts into
/// the validated inputs the service takes. Unknown parts are rejected here so
/// the service never sees them.

use crate::error::ProjectError;
use crate::project::types::{ImageUpload, NewProject, ProjectId, ProjectUpdate};
use axum::extract::multipart::{Multipart, MultipartError, MultipartRejection};
use axum::http::StatusCode;

/// Raw fields collected from a multipart body
#[derive(Debug, Default)]
pub struct ProjectForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<ImageUpload>,
    pub existing_image_url: Option<String>,
}

impl ProjectForm {
    /// Read every part of the body
    ///
    /// A request that is not multipart at all reads as an empty form, so the
    /// caller reports the missing fields rather than a content-type error.
    pub async fn read(multipart: Result<Multipart, MultipartRejection>) -> Result<Self, ProjectError> {
        let mut form = Self::default();
        let Ok(mut multipart) = multipart else {
            return Ok(form);
        };

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(multipart_error)?
        {
            let name = field.name().unwrap_or("").to_string();
            match name.as_str() {
                "title" | "description" | "existing_image_url" => {
                    let text = field.text().await.map_err(multipart_error)?;
                    let value = Some(text.trim().to_string()).filter(|v| !v.is_empty());
                    match name.as_str() {
                        "title" => form.title = value,
                        "description" => form.description = value,
                        _ => form.existing_image_url = value,
                    }
                }
                // Any file is passed through; the media host decides what it accepts
                "image" => {
                    let mime_type = field
                        .content_type()
                        .unwrap_or("application/octet-stream")
                        .to_string();
                    let bytes = field.bytes().await.map_err(multipart_error)?;
                    form.image = Some(ImageUpload { bytes: bytes.to_vec(), mime_type })
                        .filter(|img| !img.bytes.is_empty());
                }
                other => {
                    return Err(ProjectError::validation(format!("Unexpected field '{}'.", other)));
                }
            }
        }

        Ok(form)
    }

    pub fn into_new_project(self) -> Result<NewProject, ProjectError> {
        match (self.title, self.description, self.image) {
            (Some(title), Some(description), Some(image)) => Ok(NewProject {
                title,
                description,
                image: Some(image),
            }),
            _ => Err(ProjectError::validation("Title, description, and image are required.")),
        }
    }

    pub fn into_update(self) -> Result<ProjectUpdate, ProjectError> {
        let (Some(title), Some(description)) = (self.title, self.description) else {
            return Err(ProjectError::validation("Title and description are required."));
        };
        if self.image.is_none() && self.existing_image_url.is_none() {
            return Err(ProjectError::validation(
                "existing_image_url is required when no new image is sent.",
            ));
        }

        Ok(ProjectUpdate {
            title,
            description,
            image: self.image,
            existing_image_url: self.existing_image_url,
        })
    }
}

/// Body-limit failures keep their 413; anything else is a malformed request
fn multipart_error(e: MultipartError) -> ProjectError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ProjectError::PayloadTooLarge(e.body_text())
    } else {
        ProjectError::validation(format!("Malformed multipart body: {}", e.body_text()))
    }
}

/// Parse the `:id` path segment
pub fn parse_id(raw: &str) -> Result<ProjectId, ProjectError> {
    raw.trim()
        .parse::<ProjectId>()
        .map_err(|_| ProjectError::validation(format!("Invalid project id '{}'.", raw)))
}
