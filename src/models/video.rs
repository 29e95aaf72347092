// marley-service/src/models/video.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoSourceType {
    Upload,
    Youtube,
    Vimeo,
    External,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Video {
    pub id: String,
    pub project_id: String,
    pub title: String,
    pub description: Option<String>,
    pub source_type: VideoSourceType,
    // Set for uploads
    pub storage_path: Option<String>,
    pub storage_url: Option<String>,
    // Set for linked sources
    pub external_url: Option<String>,
    pub external_id: Option<String>,
    pub duration_seconds: Option<f64>,
    pub thumbnail_url: Option<String>,
    pub file_size_bytes: Option<u64>,
    pub mime_type: Option<String>,
    pub created_by: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteKind {
    Comment,
    Timestamp,
}

/// A comment or time-coded annotation attached to a video.
/// timestamp_seconds and screenshot_url are only meaningful for
/// kind = timestamp.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct VideoNote {
    pub id: String,
    pub video_id: String,
    pub kind: NoteKind,
    pub content: String,
    pub timestamp_seconds: Option<f64>,
    pub screenshot_url: Option<String>,
    pub created_by: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub updated_at: DateTime<Utc>,
}

impl VideoNote {
    pub fn new(
        video_id: String,
        content: String,
        kind: NoteKind,
        timestamp_seconds: Option<f64>,
        screenshot_url: Option<String>,
        created_by: String,
    ) -> Self {
        let now = Utc::now();
        let is_timestamp = kind == NoteKind::Timestamp;
        Self {
            id: Uuid::new_v4().to_string(),
            video_id,
            kind,
            content,
            timestamp_seconds: if is_timestamp { timestamp_seconds } else { None },
            screenshot_url: if is_timestamp { screenshot_url } else { None },
            created_by,
            created_at: now,
            updated_at: now,
        }
    }
}

// Request bodies

#[derive(Serialize, Deserialize, Debug)]
pub struct CreateUploadVideoRequest {
    pub title: String,
    pub storage_path: String,
    pub description: Option<String>,
    pub duration_seconds: Option<f64>,
    pub file_size_bytes: Option<u64>,
    pub mime_type: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct CreateLinkedVideoRequest {
    pub title: String,
    pub url: String,
    pub description: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct UpdateVideoRequest {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct UploadUrlRequest {
    pub file_name: String,
    pub content_type: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct VideoNoteData {
    pub content: String,
    pub kind: NoteKind,
    pub timestamp_seconds: Option<f64>,
    pub screenshot_url: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct UpdateVideoNoteRequest {
    pub content: String,
}
