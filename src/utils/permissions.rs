// marley-service/src/utils/permissions.rs
//
// Central authorization module. Every resource route funnels through the
// single role x capability table below; the checks resolve a resource's
// owning team through its parent chain first, then apply the table.
// Stateless by construction: membership is read fresh on every call, so a
// revoked role takes effect on the next request.
use crate::models::{Role, ServiceError};
use crate::utils::{project_storage, team_storage, video_storage};
use log::debug;

/// Capability level a caller must satisfy for an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    View,
    Edit,
    OwnerOnly,
}

/// The fixed decision table. This is the only place the matrix exists.
pub fn role_allows(role: Role, capability: Capability) -> bool {
    match capability {
        Capability::View => true,
        Capability::Edit => matches!(role, Role::Owner | Role::Director),
        Capability::OwnerOnly => matches!(role, Role::Owner),
    }
}

/// Resolve the caller's role in a team. `None` iff no active membership
/// row exists for (team, user).
pub fn resolve_role(team_id: &str, user_id: &str) -> Result<Option<Role>, ServiceError> {
    Ok(team_storage::find_active_member(team_id, user_id)?.map(|member| member.role))
}

/// Base check against a team. No membership denies every capability.
pub fn check_team(team_id: &str, user_id: &str, capability: Capability) -> Result<bool, ServiceError> {
    match resolve_role(team_id, user_id)? {
        Some(role) => Ok(role_allows(role, capability)),
        None => Ok(false),
    }
}

/// Check against a project by resolving its owning team first. A missing
/// parent is a denial, not a distinct error, at the API boundary.
pub fn check_project(
    project_id: &str,
    user_id: &str,
    capability: Capability,
) -> Result<bool, ServiceError> {
    let project = match project_storage::find_project_by_id(project_id)? {
        Some(project) => project,
        None => {
            debug!("Permission check against missing project: {}", project_id);
            return Ok(false);
        }
    };

    check_team(&project.team_id, user_id, capability)
}

/// Check against a video via its project's team.
pub fn check_video(video_id: &str, user_id: &str, capability: Capability) -> Result<bool, ServiceError> {
    let video = match video_storage::find_video_by_id(video_id)? {
        Some(video) => video,
        None => {
            debug!("Permission check against missing video: {}", video_id);
            return Ok(false);
        }
    };

    check_project(&video.project_id, user_id, capability)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_passes_every_capability() {
        assert!(role_allows(Role::Owner, Capability::View));
        assert!(role_allows(Role::Owner, Capability::Edit));
        assert!(role_allows(Role::Owner, Capability::OwnerOnly));
    }

    #[test]
    fn director_passes_view_and_edit_only() {
        assert!(role_allows(Role::Director, Capability::View));
        assert!(role_allows(Role::Director, Capability::Edit));
        assert!(!role_allows(Role::Director, Capability::OwnerOnly));
    }

    #[test]
    fn dancer_passes_only_view() {
        assert!(role_allows(Role::Dancer, Capability::View));
        assert!(!role_allows(Role::Dancer, Capability::Edit));
        assert!(!role_allows(Role::Dancer, Capability::OwnerOnly));
    }

    #[test]
    fn roles_order_by_privilege() {
        assert!(Role::Owner > Role::Director);
        assert!(Role::Director > Role::Dancer);
    }

    #[test]
    fn missing_parent_is_a_denial() {
        let allowed = check_project("no-such-project", "someone", Capability::View).unwrap();
        assert!(!allowed);

        let allowed = check_video("no-such-video", "someone", Capability::View).unwrap();
        assert!(!allowed);
    }

    #[test]
    fn unknown_team_resolves_to_no_role() {
        let role = resolve_role("no-such-team", "someone").unwrap();
        assert!(role.is_none());
    }
}
