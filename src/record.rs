// ============================================================================
// STICKER RECORDS — the external items whose thumbnails the editor produces
// ============================================================================

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// What kind of media a record carries. Only still images are editable;
/// the session shows a placeholder for the rest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Animated,
}

impl MediaKind {
    pub fn is_editable(self) -> bool {
        matches!(self, MediaKind::Image)
    }
}

/// Where a record's image lives. Freshly imported records point at a file
/// on disk; once edited, the store holds encoded bytes directly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StickerRecord {
    pub id: String,
    #[serde(skip)]
    pub image_source: Option<ImageSource>,
    pub media_kind: MediaKind,
    pub emoji: Option<String>,
}

impl StickerRecord {
    pub fn image(id: impl Into<String>, source: ImageSource) -> Self {
        Self {
            id: id.into(),
            image_source: Some(source),
            media_kind: MediaKind::Image,
            emoji: None,
        }
    }
}

/// In-memory record store. Saving an edit replaces the record's image with
/// the encoded PNG; the record id never changes.
#[derive(Default)]
pub struct StickerStore {
    records: HashMap<String, StickerRecord>,
}

impl StickerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&StickerRecord> {
        self.records.get(id)
    }

    /// Add an image record with a fresh id and return the id.
    pub fn insert_image(&mut self, source: ImageSource) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        self.records
            .insert(id.clone(), StickerRecord::image(id.clone(), source));
        id
    }

    pub fn insert(&mut self, record: StickerRecord) {
        self.records.insert(record.id.clone(), record);
    }

    /// Replace a record's thumbnail with freshly encoded PNG bytes.
    /// Returns false when no record with that id exists.
    pub fn apply_edit(&mut self, id: &str, png: Vec<u8>) -> bool {
        match self.records.get_mut(id) {
            Some(record) => {
                record.image_source = Some(ImageSource::Bytes(png));
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_image_assigns_unique_ids() {
        let mut store = StickerStore::new();
        let a = store.insert_image(ImageSource::Bytes(vec![1]));
        let b = store.insert_image(ImageSource::Bytes(vec![2]));
        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn apply_edit_replaces_the_image_in_place() {
        let mut store = StickerStore::new();
        let id = store.insert_image(ImageSource::Path("cat.png".into()));
        assert!(store.apply_edit(&id, vec![0x89, 0x50]));

        let record = store.get(&id).unwrap();
        assert_eq!(record.id, id);
        assert_eq!(
            record.image_source,
            Some(ImageSource::Bytes(vec![0x89, 0x50]))
        );
    }

    #[test]
    fn apply_edit_on_unknown_id_is_rejected() {
        let mut store = StickerStore::new();
        assert!(!store.apply_edit("missing", vec![]));
    }

    #[test]
    fn only_images_are_editable() {
        assert!(MediaKind::Image.is_editable());
        assert!(!MediaKind::Video.is_editable());
        assert!(!MediaKind::Animated.is_editable());
    }
}
