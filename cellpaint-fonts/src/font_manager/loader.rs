//! Font loading from the system database or from font files.

use std::path::Path;
use std::sync::Arc;

use fontdb::{Database, Family, Query};
use swash::{CacheKey, FontRef};

use crate::error::FontError;

/// Owned font bytes plus the offset/key swash needs to rebuild a `FontRef`.
#[derive(Clone)]
pub struct FontData {
    data: Arc<Vec<u8>>,
    offset: u32,
    key: CacheKey,
}

impl std::fmt::Debug for FontData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontData")
            .field("data_len", &self.data.len())
            .field("offset", &self.offset)
            .finish()
    }
}

impl FontData {
    /// Parse face 0 of TTF/OTF bytes.
    pub fn new(data: Vec<u8>) -> Option<Self> {
        Self::new_with_index(data, 0)
    }

    /// Parse a specific face; TrueType collections (.ttc) hold several.
    pub fn new_with_index(data: Vec<u8>, face_index: usize) -> Option<Self> {
        let font = FontRef::from_index(&data, face_index)?;
        let (offset, key) = (font.offset, font.key);
        Some(Self {
            data: Arc::new(data),
            offset,
            key,
        })
    }

    /// Borrowed swash view of this face.
    pub fn font_ref(&self) -> FontRef<'_> {
        FontRef {
            data: self.data.as_slice(),
            offset: self.offset,
            key: self.key,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Read a font file from disk.
pub fn load_font_file(path: &Path) -> Result<FontData, FontError> {
    let bytes = std::fs::read(path).map_err(|source| FontError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    FontData::new(bytes).ok_or_else(|| FontError::InvalidData(path.display().to_string()))
}

/// Find the best matching face for a family, weight and style.
pub fn query_face(
    db: &Database,
    family: Family<'_>,
    weight: u16,
    style: fontdb::Style,
) -> Option<fontdb::ID> {
    let query = Query {
        families: &[family],
        weight: fontdb::Weight(weight),
        style,
        ..Query::default()
    };
    db.query(&query)
}

/// Copy a face's bytes out of the database.
pub fn load_face(db: &Database, id: fontdb::ID) -> Option<FontData> {
    db.with_face_data(id, |data, face_index| {
        FontData::new_with_index(data.to_vec(), face_index as usize)
    })
    .flatten()
}

/// Load a regular-weight face of a named family.
pub fn load_font_from_db(db: &Database, family_name: &str) -> Option<FontData> {
    let id = query_face(
        db,
        Family::Name(family_name),
        fontdb::Weight::NORMAL.0,
        fontdb::Style::Normal,
    )?;
    load_face(db, id)
}
