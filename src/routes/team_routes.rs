// marley-service/src/routes/team_routes.rs
use crate::models::{Role, ServiceError, Team, TeamData, TeamMember};
use crate::utils::permissions::{self, Capability};
use crate::utils::{get_user_id_from_request, note_storage, project_storage, team_storage, user_storage, video_storage};
use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse};
use chrono::Utc;
use log::{error, info};
use serde_json::json;

// Create a new team; the creator becomes its sole owner
#[post("/teams")]
async fn create_team(req: HttpRequest, team_data: web::Json<TeamData>) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;

    if team_data.name.trim().is_empty() {
        return Err(ServiceError::BadRequest("Team name cannot be empty".to_string()));
    }

    info!("📝 Creating new team: {} for user: {}", team_data.name, user_id);

    let team = Team::new(team_data.name.trim().to_string(), user_id.clone());
    team_storage::save_team(&team)?;

    let email = user_storage::find_user_by_id(&user_id)?.map(|user| user.email);
    let owner = TeamMember::active(team.id.clone(), user_id.clone(), email, Role::Owner, user_id);
    team_storage::save_member(&owner)?;

    info!("✅ Team created successfully: {}", team.id);

    Ok(HttpResponse::Ok().json(team))
}

// Get all teams for the current user
#[get("/teams")]
async fn get_user_teams(req: HttpRequest) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;

    info!("📋 Fetching teams for user: {}", user_id);

    let teams = team_storage::get_teams_for_user(&user_id)?;

    info!("✅ Found {} teams for user: {}", teams.len(), user_id);

    Ok(HttpResponse::Ok().json(teams))
}

// Get a specific team by ID
#[get("/teams/{team_id}")]
async fn get_team(req: HttpRequest, path: web::Path<String>) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let team_id = path.into_inner();

    info!("🔍 Fetching team: {} for user: {}", team_id, user_id);

    if !permissions::check_team(&team_id, &user_id, Capability::View)? {
        error!("❌ User: {} doesn't have access to team: {}", user_id, team_id);
        return Err(ServiceError::Forbidden("Access denied".to_string()));
    }

    let team = match team_storage::find_team_by_id(&team_id)? {
        Some(team) => team,
        None => return Err(ServiceError::NotFound("Team not found".to_string())),
    };

    Ok(HttpResponse::Ok().json(team))
}

// Rename a team
#[put("/teams/{team_id}")]
async fn update_team(
    req: HttpRequest,
    path: web::Path<String>,
    team_data: web::Json<TeamData>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let team_id = path.into_inner();

    if team_data.name.trim().is_empty() {
        return Err(ServiceError::BadRequest("Team name cannot be empty".to_string()));
    }

    info!("🔄 Updating team: {}", team_id);

    if !permissions::check_team(&team_id, &user_id, Capability::OwnerOnly)? {
        error!("❌ User: {} cannot update team: {}", user_id, team_id);
        return Err(ServiceError::Forbidden("Only owners can update a team".to_string()));
    }

    let mut team = match team_storage::find_team_by_id(&team_id)? {
        Some(team) => team,
        None => return Err(ServiceError::NotFound("Team not found".to_string())),
    };

    team.name = team_data.name.trim().to_string();
    team.updated_at = Utc::now();
    team_storage::save_team(&team)?;

    Ok(HttpResponse::Ok().json(team))
}

// Delete a team, cascading to memberships, projects, videos and notes
#[delete("/teams/{team_id}")]
async fn delete_team(req: HttpRequest, path: web::Path<String>) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let team_id = path.into_inner();

    info!("🗑️ Deleting team: {}", team_id);

    if !permissions::check_team(&team_id, &user_id, Capability::OwnerOnly)? {
        error!("❌ User: {} cannot delete team: {}", user_id, team_id);
        return Err(ServiceError::Forbidden("Only owners can delete a team".to_string()));
    }

    if team_storage::find_team_by_id(&team_id)?.is_none() {
        return Err(ServiceError::NotFound("Team not found".to_string()));
    }

    // Cascade: every project under the team, then each project's videos
    // (with stored files) and notes
    for project in project_storage::get_projects_for_team(&team_id)? {
        for video in video_storage::get_videos_for_project(&project.id)? {
            note_storage::delete_notes_for_video(&video.id)?;
            video_storage::delete_video(&video)?;
        }
        note_storage::delete_notes_for_project(&project.id)?;
        project_storage::delete_project(&project.id)?;
    }

    team_storage::delete_team_members(&team_id)?;
    team_storage::delete_team(&team_id)?;

    info!("✅ Team deleted: {}", team_id);

    Ok(HttpResponse::Ok().json(json!({
        "message": "Team deleted successfully",
        "team_id": team_id
    })))
}

// Register all team routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(create_team)
        .service(get_user_teams)
        .service(get_team)
        .service(update_team)
        .service(delete_team);
}
