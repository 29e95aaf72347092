// marley-service/src/utils/note_storage.rs
use crate::models::{NoteKind, ProjectNote, ServiceError, VideoNote};
use crate::utils::fs_utils;

const VIDEO_NOTES_TABLE: &str = "video_notes";
const PROJECT_NOTES_TABLE: &str = "project_notes";

// Video notes

pub fn save_video_note(note: &VideoNote) -> Result<(), ServiceError> {
    fs_utils::write_row(VIDEO_NOTES_TABLE, &note.id, note)
}

pub fn find_video_note_by_id(note_id: &str) -> Result<Option<VideoNote>, ServiceError> {
    fs_utils::read_row(VIDEO_NOTES_TABLE, note_id)
}

pub fn delete_video_note(note_id: &str) -> Result<bool, ServiceError> {
    fs_utils::delete_row(VIDEO_NOTES_TABLE, note_id)
}

// Timestamp notes order by time offset, comments by recency
pub fn get_video_notes(video_id: &str, kind: Option<NoteKind>) -> Result<Vec<VideoNote>, ServiceError> {
    let mut notes: Vec<VideoNote> = fs_utils::scan_rows(VIDEO_NOTES_TABLE)?
        .into_iter()
        .filter(|note: &VideoNote| {
            note.video_id == video_id && kind.map_or(true, |k| note.kind == k)
        })
        .collect();

    if kind == Some(NoteKind::Timestamp) {
        notes.sort_by(|a, b| {
            let ta = a.timestamp_seconds.unwrap_or(0.0);
            let tb = b.timestamp_seconds.unwrap_or(0.0);
            ta.partial_cmp(&tb).unwrap_or(std::cmp::Ordering::Equal)
        });
    } else {
        notes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    }

    Ok(notes)
}

pub fn delete_notes_for_video(video_id: &str) -> Result<usize, ServiceError> {
    let notes = get_video_notes(video_id, None)?;
    let mut deleted = 0;
    for note in notes {
        if delete_video_note(&note.id)? {
            deleted += 1;
        }
    }
    Ok(deleted)
}

// Project notes

pub fn save_project_note(note: &ProjectNote) -> Result<(), ServiceError> {
    fs_utils::write_row(PROJECT_NOTES_TABLE, &note.id, note)
}

pub fn find_project_note_by_id(note_id: &str) -> Result<Option<ProjectNote>, ServiceError> {
    fs_utils::read_row(PROJECT_NOTES_TABLE, note_id)
}

pub fn delete_project_note(note_id: &str) -> Result<bool, ServiceError> {
    fs_utils::delete_row(PROJECT_NOTES_TABLE, note_id)
}

// Pinned notes first, then newest first
pub fn get_project_notes(project_id: &str) -> Result<Vec<ProjectNote>, ServiceError> {
    let mut notes: Vec<ProjectNote> = fs_utils::scan_rows(PROJECT_NOTES_TABLE)?
        .into_iter()
        .filter(|note: &ProjectNote| note.project_id == project_id)
        .collect();
    notes.sort_by(|a, b| {
        b.is_pinned
            .cmp(&a.is_pinned)
            .then(b.created_at.cmp(&a.created_at))
    });
    Ok(notes)
}

pub fn delete_notes_for_project(project_id: &str) -> Result<usize, ServiceError> {
    let notes = get_project_notes(project_id)?;
    let mut deleted = 0;
    for note in notes {
        if delete_project_note(&note.id)? {
            deleted += 1;
        }
    }
    Ok(deleted)
}
