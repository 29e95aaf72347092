// marley-service/src/routes/project_note_routes.rs
use crate::models::{ProjectNote, ProjectNoteData, ServiceError, UpdateProjectNoteRequest};
use crate::utils::permissions::{self, Capability};
use crate::utils::{get_user_id_from_request, note_storage};
use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse};
use chrono::Utc;
use log::{error, info};
use serde_json::json;

// List a project's notes, pinned first
#[get("/projects/{project_id}/notes")]
async fn get_project_notes(req: HttpRequest, path: web::Path<String>) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let project_id = path.into_inner();

    if !permissions::check_project(&project_id, &user_id, Capability::View)? {
        return Err(ServiceError::Forbidden("Access denied".to_string()));
    }

    let notes = note_storage::get_project_notes(&project_id)?;

    Ok(HttpResponse::Ok().json(notes))
}

// Get a single project note
#[get("/project-notes/{note_id}")]
async fn get_project_note(req: HttpRequest, path: web::Path<String>) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let note_id = path.into_inner();

    let note = match note_storage::find_project_note_by_id(&note_id)? {
        Some(note) => note,
        None => return Err(ServiceError::NotFound("Note not found".to_string())),
    };

    if !permissions::check_project(&note.project_id, &user_id, Capability::View)? {
        return Err(ServiceError::Forbidden("Access denied".to_string()));
    }

    Ok(HttpResponse::Ok().json(note))
}

// Create a project note
#[post("/projects/{project_id}/notes")]
async fn create_project_note(
    req: HttpRequest,
    path: web::Path<String>,
    data: web::Json<ProjectNoteData>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let project_id = path.into_inner();

    info!("📝 Creating note on project: {}", project_id);

    if data.content.trim().is_empty() {
        return Err(ServiceError::BadRequest("Note content cannot be empty".to_string()));
    }

    if !permissions::check_project(&project_id, &user_id, Capability::Edit)? {
        error!("❌ User: {} cannot create notes on project: {}", user_id, project_id);
        return Err(ServiceError::Forbidden(
            "Only owners and directors can create project notes".to_string(),
        ));
    }

    let note = ProjectNote::new(
        project_id,
        data.content.trim().to_string(),
        data.title.clone(),
        user_id,
    );
    note_storage::save_project_note(&note)?;

    info!("✅ Project note created: {}", note.id);

    Ok(HttpResponse::Ok().json(note))
}

// Update content, title or pinned flag
#[put("/project-notes/{note_id}")]
async fn update_project_note(
    req: HttpRequest,
    path: web::Path<String>,
    data: web::Json<UpdateProjectNoteRequest>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let note_id = path.into_inner();

    let mut note = match note_storage::find_project_note_by_id(&note_id)? {
        Some(note) => note,
        None => return Err(ServiceError::NotFound("Note not found".to_string())),
    };

    if !permissions::check_project(&note.project_id, &user_id, Capability::Edit)? {
        error!("❌ User: {} cannot edit project note: {}", user_id, note_id);
        return Err(ServiceError::Forbidden(
            "Only owners and directors can edit project notes".to_string(),
        ));
    }

    if let Some(content) = &data.content {
        if content.trim().is_empty() {
            return Err(ServiceError::BadRequest("Note content cannot be empty".to_string()));
        }
        note.content = content.trim().to_string();
    }
    if let Some(title) = &data.title {
        note.title = Some(title.clone());
    }
    if let Some(is_pinned) = data.is_pinned {
        note.is_pinned = is_pinned;
    }
    note.updated_at = Utc::now();

    note_storage::save_project_note(&note)?;

    Ok(HttpResponse::Ok().json(note))
}

// Delete a project note
#[delete("/project-notes/{note_id}")]
async fn delete_project_note(req: HttpRequest, path: web::Path<String>) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let note_id = path.into_inner();

    let note = match note_storage::find_project_note_by_id(&note_id)? {
        Some(note) => note,
        None => return Err(ServiceError::NotFound("Note not found".to_string())),
    };

    if !permissions::check_project(&note.project_id, &user_id, Capability::Edit)? {
        error!("❌ User: {} cannot delete project note: {}", user_id, note_id);
        return Err(ServiceError::Forbidden(
            "Only owners and directors can delete project notes".to_string(),
        ));
    }

    note_storage::delete_project_note(&note_id)?;

    info!("✅ Project note deleted: {}", note_id);

    Ok(HttpResponse::Ok().json(json!({
        "message": "Note deleted successfully",
        "note_id": note_id
    })))
}

// Register all project note routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(get_project_notes)
        .service(get_project_note)
        .service(create_project_note)
        .service(update_project_note)
        .service(delete_project_note);
}
