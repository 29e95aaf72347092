// marley-service/src/routes/member_routes.rs
//
// Team roster operations. The base capability check comes from the
// permissions module; the owner-protection and director-assignment rules
// are layered here, after the base table already granted edit or higher.
use crate::models::{MemberView, Role, ServiceError, TeamMember, UserInfo};
use crate::models::{InviteByEmailRequest, InviteByUserRequest, UpdateRoleRequest};
use crate::utils::permissions::{self, Capability};
use crate::utils::{get_user_id_from_request, team_storage, user_storage};
use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse};
use log::{error, info};
use serde::Deserialize;
use serde_json::json;

// Get team members, with the permission set computed from each role
#[get("/teams/{team_id}/members")]
async fn get_team_members(req: HttpRequest, path: web::Path<String>) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let team_id = path.into_inner();

    info!("📋 Fetching members for team: {}", team_id);

    if !permissions::check_team(&team_id, &user_id, Capability::View)? {
        error!("❌ User: {} doesn't have access to team: {}", user_id, team_id);
        return Err(ServiceError::Forbidden("Access denied".to_string()));
    }

    let members = team_storage::get_team_members(&team_id)?;

    let mut views = Vec::with_capacity(members.len());
    for member in members {
        let user = match member.user_id() {
            Some(uid) => user_storage::find_user_by_id(uid)?.map(|user| UserInfo::from(&user)),
            None => None,
        };
        views.push(MemberView::new(member, user));
    }

    info!("✅ Found {} team members", views.len());

    Ok(HttpResponse::Ok().json(views))
}

// Current user's role in a team
#[get("/teams/{team_id}/members/me")]
async fn get_current_user_role(req: HttpRequest, path: web::Path<String>) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let team_id = path.into_inner();

    let role = permissions::resolve_role(&team_id, &user_id)?;

    Ok(HttpResponse::Ok().json(json!({ "role": role })))
}

// Shared guard for both invite variants: inviter must hold edit, and only
// an owner may hand out the director role
fn check_invite_allowed(team_id: &str, inviter_id: &str, role: Role) -> Result<(), ServiceError> {
    if role == Role::Owner {
        return Err(ServiceError::BadRequest("Cannot assign the owner role".to_string()));
    }

    let inviter_role = permissions::resolve_role(team_id, inviter_id)?;
    let can_invite = inviter_role.map_or(false, |r| permissions::role_allows(r, Capability::Edit));

    if !can_invite {
        return Err(ServiceError::Forbidden(
            "Only owners and directors can invite members".to_string(),
        ));
    }

    if role == Role::Director && inviter_role != Some(Role::Owner) {
        return Err(ServiceError::Forbidden(
            "Only owners can assign the director role".to_string(),
        ));
    }

    Ok(())
}

// Invite by email: a registered address joins immediately, an unknown one
// gets a pending seat claimed at registration
#[post("/teams/{team_id}/members/invite-email")]
async fn invite_member_by_email(
    req: HttpRequest,
    path: web::Path<String>,
    data: web::Json<InviteByEmailRequest>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let team_id = path.into_inner();

    info!("📧 Inviting {} to team: {}", data.email, team_id);

    check_invite_allowed(&team_id, &user_id, data.role)?;

    let existing_user = user_storage::find_user_by_email(&data.email)?;

    if let Some(user) = &existing_user {
        if team_storage::find_active_member(&team_id, &user.id)?.is_some() {
            return Err(ServiceError::Conflict(
                "User is already a member of this team".to_string(),
            ));
        }
    }

    if team_storage::find_pending_invite(&team_id, &data.email)?.is_some() {
        return Err(ServiceError::Conflict(
            "An invite has already been sent to this email".to_string(),
        ));
    }

    let member = match existing_user {
        Some(user) => TeamMember::active(
            team_id.clone(),
            user.id,
            Some(data.email.clone()),
            data.role,
            user_id,
        ),
        None => TeamMember::pending(team_id.clone(), data.email.clone(), data.role, user_id),
    };

    team_storage::save_member(&member)?;

    info!("✅ Member added to team: {} with role: {:?}", team_id, member.role);

    let view = MemberView::new(member, None);
    Ok(HttpResponse::Ok().json(view))
}

// Invite an already-registered user directly
#[post("/teams/{team_id}/members/invite-user")]
async fn invite_member_by_user(
    req: HttpRequest,
    path: web::Path<String>,
    data: web::Json<InviteByUserRequest>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let team_id = path.into_inner();

    info!("👥 Inviting user: {} to team: {}", data.user_id, team_id);

    check_invite_allowed(&team_id, &user_id, data.role)?;

    let target = match user_storage::find_user_by_id(&data.user_id)? {
        Some(user) => user,
        None => return Err(ServiceError::NotFound("User not found".to_string())),
    };

    if team_storage::find_active_member(&team_id, &target.id)?.is_some() {
        return Err(ServiceError::Conflict(
            "User is already a member of this team".to_string(),
        ));
    }

    let member = TeamMember::active(
        team_id.clone(),
        target.id,
        Some(target.email),
        data.role,
        user_id,
    );
    team_storage::save_member(&member)?;

    info!("✅ Member added to team: {} with role: {:?}", team_id, member.role);

    let view = MemberView::new(member, None);
    Ok(HttpResponse::Ok().json(view))
}

// Change a member's role. Owner targets are immutable, which is what
// keeps every team with at least one owner.
#[put("/teams/{team_id}/members/{member_id}")]
async fn update_member_role(
    req: HttpRequest,
    path: web::Path<(String, String)>,
    data: web::Json<UpdateRoleRequest>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let (team_id, member_id) = path.into_inner();

    info!("🔄 Updating role for member: {} in team: {}", member_id, team_id);

    if !permissions::check_team(&team_id, &user_id, Capability::OwnerOnly)? {
        error!("❌ Only team owners can update member roles");
        return Err(ServiceError::Forbidden(
            "Only owners can change member roles".to_string(),
        ));
    }

    if data.role == Role::Owner {
        return Err(ServiceError::BadRequest("Cannot assign the owner role".to_string()));
    }

    let mut member = match team_storage::find_member_by_id(&member_id)? {
        Some(member) if member.team_id == team_id => member,
        _ => return Err(ServiceError::NotFound("Member not found".to_string())),
    };

    if member.role == Role::Owner {
        return Err(ServiceError::Forbidden(
            "Cannot change the role of an owner".to_string(),
        ));
    }

    member.role = data.role;
    team_storage::save_member(&member)?;

    info!("✅ Member role updated to: {:?}", member.role);

    let view = MemberView::new(member, None);
    Ok(HttpResponse::Ok().json(view))
}

// Remove a member. Owners may remove anyone but an owner; directors may
// only remove dancers.
#[delete("/teams/{team_id}/members/{member_id}")]
async fn remove_member(
    req: HttpRequest,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let (team_id, member_id) = path.into_inner();

    info!("🗑️ Removing member: {} from team: {}", member_id, team_id);

    let caller_role = permissions::resolve_role(&team_id, &user_id)?;
    let can_remove = caller_role.map_or(false, |r| permissions::role_allows(r, Capability::Edit));

    if !can_remove {
        error!("❌ User: {} cannot remove members from team: {}", user_id, team_id);
        return Err(ServiceError::Forbidden(
            "Only owners and directors can remove members".to_string(),
        ));
    }

    let member = match team_storage::find_member_by_id(&member_id)? {
        Some(member) if member.team_id == team_id => member,
        _ => return Err(ServiceError::NotFound("Member not found".to_string())),
    };

    if member.role == Role::Owner {
        return Err(ServiceError::Forbidden(
            "Cannot remove an owner from the team".to_string(),
        ));
    }

    if caller_role == Some(Role::Director) && member.role == Role::Director {
        return Err(ServiceError::Forbidden(
            "Only owners can remove directors".to_string(),
        ));
    }

    team_storage::delete_member(&member_id)?;

    info!("✅ Member removed from team: {}", team_id);

    Ok(HttpResponse::Ok().json(json!({
        "message": "Member removed from team successfully",
        "member_id": member_id,
        "team_id": team_id
    })))
}

#[derive(Deserialize)]
struct SearchQuery {
    q: String,
}

// Search registered users by email fragment, for the invite dialog
#[get("/users/search")]
async fn search_users(req: HttpRequest, query: web::Query<SearchQuery>) -> Result<HttpResponse, ServiceError> {
    let _user_id = get_user_id_from_request(&req)?;

    if query.q.len() < 2 {
        return Ok(HttpResponse::Ok().json(Vec::<UserInfo>::new()));
    }

    let users = user_storage::search_users(&query.q, 10)?;
    let results: Vec<UserInfo> = users.iter().map(UserInfo::from).collect();

    Ok(HttpResponse::Ok().json(results))
}

// Register all member routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(get_team_members)
        .service(get_current_user_role)
        .service(invite_member_by_email)
        .service(invite_member_by_user)
        .service(update_member_role)
        .service(remove_member)
        .service(search_users);
}
