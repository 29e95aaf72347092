// marley-service/src/models/project.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Project {
    pub id: String,
    pub team_id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_by: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn new(team_id: String, name: String, description: Option<String>, created_by: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            team_id,
            name,
            description,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Free-form note attached to a project. Pinned notes sort first.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ProjectNote {
    pub id: String,
    pub project_id: String,
    pub title: Option<String>,
    pub content: String,
    pub is_pinned: bool,
    pub created_by: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub updated_at: DateTime<Utc>,
}

impl ProjectNote {
    pub fn new(project_id: String, content: String, title: Option<String>, created_by: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            project_id,
            title,
            content,
            is_pinned: false,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }
}

// Request bodies

#[derive(Serialize, Deserialize, Debug)]
pub struct ProjectData {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ProjectNoteData {
    pub content: String,
    pub title: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct UpdateProjectNoteRequest {
    pub content: Option<String>,
    pub title: Option<String>,
    pub is_pinned: Option<bool>,
}
