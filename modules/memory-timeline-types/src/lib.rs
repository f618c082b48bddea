//! Shared wire types for the memory timeline backend and its clients.
//!
//! Field names follow the backend's JSON exactly (`_id`, `year`, `memory`,
//! `createdAt`), so the Rust names are mapped with `serde(rename)`.

use serde::{Deserialize, Serialize};

// =====================================================
// Domain Types
// =====================================================

/// One persisted timeline entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryRecord {
    #[serde(rename = "_id")]
    pub id: String,
    /// Full calendar date, stored under the backend's `year` key
    #[serde(rename = "year")]
    pub date: String,
    pub title: String,
    #[serde(default)]
    pub photo: String,
    #[serde(rename = "memory")]
    pub note: String,
    #[serde(
        rename = "createdAt",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<String>,
}

impl MemoryRecord {
    /// Request body carrying this record's editable fields.
    pub fn to_payload(&self) -> MemoryPayload {
        MemoryPayload {
            date: self.date.clone(),
            title: self.title.clone(),
            photo: self.photo.clone(),
            note: self.note.clone(),
        }
    }
}

// =====================================================
// RPC Request Types
// =====================================================

/// Body of create and update requests: a record minus `_id` and `createdAt`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryPayload {
    #[serde(rename = "year")]
    pub date: String,
    pub title: String,
    pub photo: String,
    #[serde(rename = "memory")]
    pub note: String,
}

// =====================================================
// RPC Response Types
// =====================================================

/// Response of `POST /api/upload`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(rename = "imageUrl")]
    pub image_url: String,
}

/// Multipart field name the upload endpoint reads the file from
pub const UPLOAD_FIELD: &str = "image";
