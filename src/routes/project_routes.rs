// marley-service/src/routes/project_routes.rs
use crate::models::{Project, ProjectData, ServiceError, UpdateProjectRequest};
use crate::utils::permissions::{self, Capability};
use crate::utils::{get_user_id_from_request, note_storage, project_storage, video_storage};
use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse};
use chrono::Utc;
use log::{error, info};
use serde_json::json;

// Create a project under a team
#[post("/teams/{team_id}/projects")]
async fn create_project(
    req: HttpRequest,
    path: web::Path<String>,
    data: web::Json<ProjectData>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let team_id = path.into_inner();

    if data.name.trim().is_empty() {
        return Err(ServiceError::BadRequest("Project name cannot be empty".to_string()));
    }

    info!("📝 Creating project: {} in team: {}", data.name, team_id);

    if !permissions::check_team(&team_id, &user_id, Capability::Edit)? {
        error!("❌ User: {} cannot create projects in team: {}", user_id, team_id);
        return Err(ServiceError::Forbidden(
            "Only owners and directors can create projects".to_string(),
        ));
    }

    let project = Project::new(
        team_id,
        data.name.trim().to_string(),
        data.description.clone(),
        user_id,
    );
    project_storage::save_project(&project)?;

    info!("✅ Project created: {}", project.id);

    Ok(HttpResponse::Ok().json(project))
}

// List a team's projects, most recently updated first
#[get("/teams/{team_id}/projects")]
async fn get_projects(req: HttpRequest, path: web::Path<String>) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let team_id = path.into_inner();

    info!("📋 Fetching projects for team: {}", team_id);

    if !permissions::check_team(&team_id, &user_id, Capability::View)? {
        error!("❌ User: {} doesn't have access to team: {}", user_id, team_id);
        return Err(ServiceError::Forbidden("Access denied".to_string()));
    }

    let projects = project_storage::get_projects_for_team(&team_id)?;

    info!("✅ Found {} projects", projects.len());

    Ok(HttpResponse::Ok().json(projects))
}

// Get a single project
#[get("/projects/{project_id}")]
async fn get_project(req: HttpRequest, path: web::Path<String>) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let project_id = path.into_inner();

    if !permissions::check_project(&project_id, &user_id, Capability::View)? {
        return Err(ServiceError::Forbidden("Access denied".to_string()));
    }

    let project = match project_storage::find_project_by_id(&project_id)? {
        Some(project) => project,
        None => return Err(ServiceError::NotFound("Project not found".to_string())),
    };

    Ok(HttpResponse::Ok().json(project))
}

// Update a project's name or description
#[put("/projects/{project_id}")]
async fn update_project(
    req: HttpRequest,
    path: web::Path<String>,
    data: web::Json<UpdateProjectRequest>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let project_id = path.into_inner();

    info!("🔄 Updating project: {}", project_id);

    if !permissions::check_project(&project_id, &user_id, Capability::Edit)? {
        error!("❌ User: {} cannot update project: {}", user_id, project_id);
        return Err(ServiceError::Forbidden(
            "Only owners and directors can edit projects".to_string(),
        ));
    }

    let mut project = match project_storage::find_project_by_id(&project_id)? {
        Some(project) => project,
        None => return Err(ServiceError::NotFound("Project not found".to_string())),
    };

    if let Some(name) = &data.name {
        if name.trim().is_empty() {
            return Err(ServiceError::BadRequest("Project name cannot be empty".to_string()));
        }
        project.name = name.trim().to_string();
    }
    if let Some(description) = &data.description {
        project.description = Some(description.clone());
    }
    project.updated_at = Utc::now();

    project_storage::save_project(&project)?;

    Ok(HttpResponse::Ok().json(project))
}

// Delete a project, cascading to its videos (and stored files) and notes
#[delete("/projects/{project_id}")]
async fn delete_project(req: HttpRequest, path: web::Path<String>) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let project_id = path.into_inner();

    info!("🗑️ Deleting project: {}", project_id);

    if !permissions::check_project(&project_id, &user_id, Capability::OwnerOnly)? {
        error!("❌ User: {} cannot delete project: {}", user_id, project_id);
        return Err(ServiceError::Forbidden(
            "Only owners can delete projects".to_string(),
        ));
    }

    if project_storage::find_project_by_id(&project_id)?.is_none() {
        return Err(ServiceError::NotFound("Project not found".to_string()));
    }

    for video in video_storage::get_videos_for_project(&project_id)? {
        note_storage::delete_notes_for_video(&video.id)?;
        video_storage::delete_video(&video)?;
    }
    note_storage::delete_notes_for_project(&project_id)?;
    project_storage::delete_project(&project_id)?;

    info!("✅ Project deleted: {}", project_id);

    Ok(HttpResponse::Ok().json(json!({
        "message": "Project deleted successfully",
        "project_id": project_id
    })))
}

// Register all project routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(create_project)
        .service(get_projects)
        .service(get_project)
        .service(update_project)
        .service(delete_project);
}
