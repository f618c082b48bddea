//! The unsaved form representation of a memory.

use memory_timeline_types::{MemoryPayload, MemoryRecord};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// A local image picked in the form, not uploaded yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingUpload {
    pub path: PathBuf,
    pub file_name: String,
}

impl PendingUpload {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        Self { path, file_name }
    }
}

/// Where the draft's photo lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoRef {
    /// Already stored remotely (possibly empty)
    Remote(String),
    Pending(PendingUpload),
}

impl Default for PhotoRef {
    fn default() -> Self {
        PhotoRef::Remote(String::new())
    }
}

/// Editable form fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Date,
    Title,
    Note,
    Photo,
}

impl FromStr for DraftField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().trim() {
            "date" | "year" => Ok(DraftField::Date),
            "title" => Ok(DraftField::Title),
            "note" | "memory" | "text" => Ok(DraftField::Note),
            "photo" | "image" => Ok(DraftField::Photo),
            _ => Err(format!("Unknown field '{}' (date, title, note, photo)", s.trim())),
        }
    }
}

impl DraftField {
    pub fn as_str(&self) -> &'static str {
        match self {
            DraftField::Date => "date",
            DraftField::Title => "title",
            DraftField::Note => "note",
            DraftField::Photo => "photo",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftMemory {
    pub date: String,
    pub title: String,
    pub photo: PhotoRef,
    pub note: String,
    /// Id of the record being edited; `None` when creating
    pub editing: Option<String>,
}

impl DraftMemory {
    /// Pre-fill the form from an existing record (edit mode).
    pub fn from_record(record: &MemoryRecord) -> Self {
        Self {
            date: record.date.clone(),
            title: record.title.clone(),
            photo: PhotoRef::Remote(record.photo.clone()),
            note: record.note.clone(),
            editing: Some(record.id.clone()),
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// Setting `Photo` replaces any pending file with a remote reference.
    pub fn set_field(&mut self, field: DraftField, value: String) {
        match field {
            DraftField::Date => self.date = value,
            DraftField::Title => self.title = value,
            DraftField::Note => self.note = value,
            DraftField::Photo => self.photo = PhotoRef::Remote(value),
        }
    }

    pub fn select_file(&mut self, path: &Path) {
        self.photo = PhotoRef::Pending(PendingUpload::new(path));
    }

    /// Required inputs left blank, in form order.
    pub fn missing_required(&self) -> Vec<DraftField> {
        [
            (DraftField::Date, &self.date),
            (DraftField::Title, &self.title),
            (DraftField::Note, &self.note),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }

    /// Request body once the photo has been resolved to a remote URL.
    pub fn to_payload(&self, photo_url: String) -> MemoryPayload {
        MemoryPayload {
            date: self.date.clone(),
            title: self.title.clone(),
            photo: photo_url,
            note: self.note.clone(),
        }
    }
}
