/// Media Store Adapter
///
/// Wraps the external image host behind the [`MediaStore`] trait so the
/// project service can be driven against Cloudinary in production and an
/// in-memory store in tests.

// Cloudinary REST client
pub mod cloudinary;

// In-memory store for tests and local runs
pub mod mock;

use async_trait::async_trait;
use regex::Regex;

pub use cloudinary::CloudinaryStore;
pub use mock::MockMediaStore;

/// An asset stored by the media host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedAsset {
    /// Public, fully-qualified URL of the asset
    pub url: String,
    /// Identifier inside the upload folder (e.g. "xyz123"), the same value
    /// [`asset_id_from_url`] recovers from `url`
    pub asset_id: String,
}

/// Failures reported by a media host
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("media host request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("media host rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("unexpected media host response: {0}")]
    InvalidResponse(String),
}

/// External media host contract
///
/// `upload` either returns a usable URL or an error, never a half-created
/// asset. `delete` treats an asset that is already gone as deleted.
#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn upload(
        &self,
        bytes: Vec<u8>,
        mime_type: &str,
        folder: &str,
    ) -> Result<UploadedAsset, MediaError>;

    /// Delete the asset named by `asset_id` inside `folder`
    ///
    /// `asset_id` is the bare identifier returned by [`asset_id_from_url`].
    async fn delete(&self, asset_id: &str, folder: &str) -> Result<(), MediaError>;
}

/// Recover the asset identifier from a stored image URL
///
/// Takes what follows `<folder>/` up to the first `.` (the extension), so
/// `https://host/.../nan_pic/xyz123.jpg` yields `xyz123`. URLs without the
/// folder marker yield `None`.
pub fn asset_id_from_url(url: &str, folder: &str) -> Option<String> {
    AssetIdPattern::new(folder).extract(url)
}

/// [`asset_id_from_url`] with the folder pattern compiled once
#[derive(Debug, Clone)]
pub struct AssetIdPattern {
    pattern: Option<Regex>,
}

impl AssetIdPattern {
    pub fn new(folder: &str) -> Self {
        let pattern = if folder.is_empty() {
            None
        } else {
            Regex::new(&format!("{}/([^.]+)", regex::escape(folder))).ok()
        };
        Self { pattern }
    }

    pub fn extract(&self, url: &str) -> Option<String> {
        self.pattern
            .as_ref()?
            .captures(url)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .filter(|id| !id.is_empty())
    }
}
