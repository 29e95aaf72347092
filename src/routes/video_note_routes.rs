// marley-service/src/routes/video_note_routes.rs
//
// Comments are open to every team member; timestamp notes require edit.
// Mutation is allowed for the note's author or any edit-capable member,
// whichever holds first.
use crate::models::{NoteKind, ServiceError, UpdateVideoNoteRequest, VideoNote, VideoNoteData};
use crate::utils::permissions::{self, Capability};
use crate::utils::{get_user_id_from_request, note_storage};
use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse};
use chrono::Utc;
use log::{error, info};
use serde::Deserialize;
use serde_json::json;

#[derive(Deserialize)]
struct NoteListQuery {
    kind: Option<NoteKind>,
}

// List a video's notes, optionally filtered by kind
#[get("/videos/{video_id}/notes")]
async fn get_video_notes(
    req: HttpRequest,
    path: web::Path<String>,
    query: web::Query<NoteListQuery>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let video_id = path.into_inner();

    if !permissions::check_video(&video_id, &user_id, Capability::View)? {
        return Err(ServiceError::Forbidden("Access denied".to_string()));
    }

    let notes = note_storage::get_video_notes(&video_id, query.kind)?;

    Ok(HttpResponse::Ok().json(notes))
}

// Get a single note
#[get("/video-notes/{note_id}")]
async fn get_video_note(req: HttpRequest, path: web::Path<String>) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let note_id = path.into_inner();

    let note = match note_storage::find_video_note_by_id(&note_id)? {
        Some(note) => note,
        None => return Err(ServiceError::NotFound("Note not found".to_string())),
    };

    if !permissions::check_video(&note.video_id, &user_id, Capability::View)? {
        return Err(ServiceError::Forbidden("Access denied".to_string()));
    }

    Ok(HttpResponse::Ok().json(note))
}

// Create a note on a video
#[post("/videos/{video_id}/notes")]
async fn create_video_note(
    req: HttpRequest,
    path: web::Path<String>,
    data: web::Json<VideoNoteData>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let video_id = path.into_inner();

    info!("📝 Creating {:?} note on video: {}", data.kind, video_id);

    if data.content.trim().is_empty() {
        return Err(ServiceError::BadRequest("Note content cannot be empty".to_string()));
    }

    if data.kind == NoteKind::Timestamp && data.timestamp_seconds.is_none() {
        return Err(ServiceError::BadRequest(
            "Timestamp notes require a timestamp".to_string(),
        ));
    }

    let required = match data.kind {
        NoteKind::Timestamp => Capability::Edit,
        NoteKind::Comment => Capability::View,
    };

    if !permissions::check_video(&video_id, &user_id, required)? {
        let message = match data.kind {
            NoteKind::Timestamp => "Only owners and directors can add timestamp notes",
            NoteKind::Comment => "Access denied",
        };
        error!("❌ User: {} denied creating note on video: {}", user_id, video_id);
        return Err(ServiceError::Forbidden(message.to_string()));
    }

    let note = VideoNote::new(
        video_id,
        data.content.trim().to_string(),
        data.kind,
        data.timestamp_seconds,
        data.screenshot_url.clone(),
        user_id,
    );

    note_storage::save_video_note(&note)?;

    info!("✅ Note created: {}", note.id);

    Ok(HttpResponse::Ok().json(note))
}

// Resolve whether the caller may mutate a note: author first, then the
// team-level edit capability
fn can_mutate_note(note: &VideoNote, user_id: &str) -> Result<bool, ServiceError> {
    if note.created_by == user_id {
        return Ok(true);
    }
    permissions::check_video(&note.video_id, user_id, Capability::Edit)
}

// Update a note's content
#[put("/video-notes/{note_id}")]
async fn update_video_note(
    req: HttpRequest,
    path: web::Path<String>,
    data: web::Json<UpdateVideoNoteRequest>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let note_id = path.into_inner();

    if data.content.trim().is_empty() {
        return Err(ServiceError::BadRequest("Note content cannot be empty".to_string()));
    }

    let mut note = match note_storage::find_video_note_by_id(&note_id)? {
        Some(note) => note,
        None => return Err(ServiceError::NotFound("Note not found".to_string())),
    };

    if !can_mutate_note(&note, &user_id)? {
        error!("❌ User: {} cannot edit note: {}", user_id, note_id);
        return Err(ServiceError::Forbidden(
            "You can only edit your own notes".to_string(),
        ));
    }

    note.content = data.content.trim().to_string();
    note.updated_at = Utc::now();
    note_storage::save_video_note(&note)?;

    Ok(HttpResponse::Ok().json(note))
}

// Delete a note
#[delete("/video-notes/{note_id}")]
async fn delete_video_note(req: HttpRequest, path: web::Path<String>) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let note_id = path.into_inner();

    let note = match note_storage::find_video_note_by_id(&note_id)? {
        Some(note) => note,
        None => return Err(ServiceError::NotFound("Note not found".to_string())),
    };

    if !can_mutate_note(&note, &user_id)? {
        error!("❌ User: {} cannot delete note: {}", user_id, note_id);
        return Err(ServiceError::Forbidden(
            "You can only delete your own notes".to_string(),
        ));
    }

    note_storage::delete_video_note(&note_id)?;

    info!("✅ Note deleted: {}", note_id);

    Ok(HttpResponse::Ok().json(json!({
        "message": "Note deleted successfully",
        "note_id": note_id
    })))
}

// Register all video note routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(get_video_notes)
        .service(get_video_note)
        .service(create_video_note)
        .service(update_video_note)
        .service(delete_video_note);
}
