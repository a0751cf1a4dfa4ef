/// In-memory media store
///
/// Keeps uploaded assets in a map and records every call so tests can assert
/// on what the service asked the media host to do.

use crate::media::{MediaError, MediaStore, UploadedAsset};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct MockMediaStore {
    /// asset id -> (folder, mime type, size)
    assets: Mutex<HashMap<String, (String, String, usize)>>,
    uploads: Mutex<Vec<String>>,
    deletes: Mutex<Vec<String>>,
    next_id: AtomicUsize,
    fail_uploads: AtomicBool,
    fail_deletes: AtomicBool,
}

impl MockMediaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following upload fail
    pub fn fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    /// Make every following delete fail
    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    /// Asset ids handed out by `upload`, in call order
    pub fn uploads(&self) -> Vec<String> {
        self.uploads.lock().unwrap().clone()
    }

    /// Asset ids passed to `delete`, in call order (including failed calls)
    pub fn deletes(&self) -> Vec<String> {
        self.deletes.lock().unwrap().clone()
    }

    pub fn contains(&self, asset_id: &str) -> bool {
        self.assets.lock().unwrap().contains_key(asset_id)
    }

    pub fn asset_count(&self) -> usize {
        self.assets.lock().unwrap().len()
    }
}

fn extension_for(mime_type: &str) -> &str {
    match mime_type {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        _ => "bin",
    }
}

#[async_trait]
impl MediaStore for MockMediaStore {
    async fn upload(
        &self,
        bytes: Vec<u8>,
        mime_type: &str,
        folder: &str,
    ) -> Result<UploadedAsset, MediaError> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(MediaError::Rejected {
                status: 500,
                message: "mock upload failure".to_string(),
            });
        }

        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let asset_id = format!("asset{}", n);
        let url = format!(
            "https://media.test/image/upload/{}/{}.{}",
            folder,
            asset_id,
            extension_for(mime_type)
        );

        self.assets.lock().unwrap().insert(
            asset_id.clone(),
            (folder.to_string(), mime_type.to_string(), bytes.len()),
        );
        self.uploads.lock().unwrap().push(asset_id.clone());

        Ok(UploadedAsset { url, asset_id })
    }

    async fn delete(&self, asset_id: &str, _folder: &str) -> Result<(), MediaError> {
        self.deletes.lock().unwrap().push(asset_id.to_string());

        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(MediaError::Rejected {
                status: 500,
                message: "mock delete failure".to_string(),
            });
        }

        // Unknown ids count as already deleted
        self.assets.lock().unwrap().remove(asset_id);
        Ok(())
    }
}
