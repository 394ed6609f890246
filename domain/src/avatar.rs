use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use in_memory_adapter::InMemoryRepo;
use tracing::debug;
use uuid::Uuid;

/// Route prefix under which previews are served
pub const PREVIEW_ROUTE_PREFIX: &str = "/avatars";

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// A file handed over by the browser's file picker
#[derive(Clone, PartialEq, Eq)]
pub struct AvatarFile {
    pub name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
    size: u64,
}

impl AvatarFile {
    pub fn new(name: impl Into<String>, content_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type,
            size: bytes.len() as u64,
            bytes,
        }
    }

    /// A file whose contents were not kept, only its length. It always
    /// fails the size check.
    pub fn oversized(name: impl Into<String>, content_type: Option<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            content_type,
            bytes: Vec::new(),
            size,
        }
    }

    pub fn size(&self) -> u64 {
        self.size
    }
}

impl std::fmt::Debug for AvatarFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AvatarFile")
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .field("size", &self.size())
            .finish()
    }
}

pub type PreviewId = Uuid;

#[derive(Clone)]
pub struct PreviewBlob {
    pub content_type: String,
    pub bytes: Arc<[u8]>,
}

impl std::fmt::Debug for PreviewBlob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewBlob")
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Shared home of every live avatar preview
#[derive(Debug, Clone, Default)]
pub struct PreviewStore {
    blobs: Arc<Mutex<InMemoryRepo<PreviewBlob, PreviewId>>>,
}

impl PreviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a preview for `file`; it lives as long as the returned handle
    pub fn create(&self, file: &AvatarFile) -> AvatarPreview {
        let id = Uuid::new_v4();
        let blob = PreviewBlob {
            content_type: file
                .content_type
                .clone()
                .unwrap_or_else(|| FALLBACK_CONTENT_TYPE.to_string()),
            bytes: Arc::from(file.bytes.as_slice()),
        };
        self.blobs().insert(id, blob);
        debug!("Created avatar preview {id} for {}", file.name);

        AvatarPreview {
            id,
            store: self.clone(),
        }
    }

    pub fn get(&self, id: &PreviewId) -> Option<PreviewBlob> {
        self.blobs().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.blobs().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs().is_empty()
    }

    fn release(&self, id: &PreviewId) {
        if self.blobs().remove(id).is_some() {
            debug!("Released avatar preview {id}");
        }
    }

    // Map operations cannot panic midway; a poisoned map is still consistent.
    fn blobs(&self) -> MutexGuard<'_, InMemoryRepo<PreviewBlob, PreviewId>> {
        self.blobs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Handle to a displayable preview. Dropping it releases the preview.
#[derive(Debug)]
pub struct AvatarPreview {
    id: PreviewId,
    store: PreviewStore,
}

impl AvatarPreview {
    pub fn id(&self) -> PreviewId {
        self.id
    }

    pub fn url(&self) -> String {
        format!("{PREVIEW_ROUTE_PREFIX}/{}", self.id)
    }
}

impl Drop for AvatarPreview {
    fn drop(&mut self) {
        self.store.release(&self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(size: usize) -> AvatarFile {
        AvatarFile::new("face.png", Some("image/png".to_string()), vec![1; size])
    }

    #[test]
    fn preview_is_served_until_the_handle_drops() {
        let store = PreviewStore::new();
        let preview = store.create(&png(32));
        let id = preview.id();

        let blob = store.get(&id).unwrap();
        assert_eq!(blob.content_type, "image/png");
        assert_eq!(blob.bytes.len(), 32);
        assert_eq!(preview.url(), format!("/avatars/{id}"));

        drop(preview);
        assert!(store.get(&id).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn replacing_a_preview_releases_the_old_one() {
        let store = PreviewStore::new();
        let mut current = Some(store.create(&png(4)));
        let first = current.as_ref().unwrap().id();

        current = Some(store.create(&png(8)));

        assert!(store.get(&first).is_none());
        assert_eq!(store.len(), 1);
        drop(current);
        assert!(store.is_empty());
    }

    #[test]
    fn oversized_file_reports_its_length_without_contents() {
        let file = AvatarFile::oversized("big.png", None, 9 * 1024 * 1024);
        assert_eq!(file.size(), 9 * 1024 * 1024);
        assert!(file.bytes.is_empty());
        assert_eq!(png(12).size(), 12);
    }

    #[test]
    fn unknown_content_type_falls_back_to_octet_stream() {
        let store = PreviewStore::new();
        let preview = store.create(&AvatarFile::new("blob", None, vec![0]));
        assert_eq!(
            store.get(&preview.id()).unwrap().content_type,
            "application/octet-stream"
        );
    }
}
