// marley-service/src/utils/team_storage.rs
use crate::models::{MemberStatus, ServiceError, Team, TeamMember};
use crate::utils::fs_utils;
use log::info;

const TEAMS_TABLE: &str = "teams";
const MEMBERS_TABLE: &str = "members";

// Teams

pub fn save_team(team: &Team) -> Result<(), ServiceError> {
    fs_utils::write_row(TEAMS_TABLE, &team.id, team)
}

pub fn find_team_by_id(team_id: &str) -> Result<Option<Team>, ServiceError> {
    fs_utils::read_row(TEAMS_TABLE, team_id)
}

pub fn delete_team(team_id: &str) -> Result<bool, ServiceError> {
    fs_utils::delete_row(TEAMS_TABLE, team_id)
}

pub fn get_teams_for_user(user_id: &str) -> Result<Vec<Team>, ServiceError> {
    let memberships = memberships_for_user(user_id)?;

    let mut teams = Vec::new();
    for membership in memberships {
        if let Some(team) = find_team_by_id(&membership.team_id)? {
            teams.push(team);
        }
    }
    Ok(teams)
}

// Memberships

pub fn save_member(member: &TeamMember) -> Result<(), ServiceError> {
    fs_utils::write_row(MEMBERS_TABLE, &member.id, member)
}

pub fn find_member_by_id(member_id: &str) -> Result<Option<TeamMember>, ServiceError> {
    fs_utils::read_row(MEMBERS_TABLE, member_id)
}

pub fn delete_member(member_id: &str) -> Result<bool, ServiceError> {
    fs_utils::delete_row(MEMBERS_TABLE, member_id)
}

pub fn get_team_members(team_id: &str) -> Result<Vec<TeamMember>, ServiceError> {
    let members: Vec<TeamMember> = fs_utils::scan_rows(MEMBERS_TABLE)?;
    Ok(members
        .into_iter()
        .filter(|member| member.team_id == team_id)
        .collect())
}

// Resolve the active membership row for (team, user), if any
pub fn find_active_member(team_id: &str, user_id: &str) -> Result<Option<TeamMember>, ServiceError> {
    let members: Vec<TeamMember> = fs_utils::scan_rows(MEMBERS_TABLE)?;
    Ok(members
        .into_iter()
        .find(|member| member.team_id == team_id && member.user_id() == Some(user_id)))
}

pub fn find_pending_invite(team_id: &str, email: &str) -> Result<Option<TeamMember>, ServiceError> {
    let members: Vec<TeamMember> = fs_utils::scan_rows(MEMBERS_TABLE)?;
    Ok(members.into_iter().find(|member| {
        member.team_id == team_id
            && matches!(&member.status,
                MemberStatus::PendingInvite { email: pending } if pending.eq_ignore_ascii_case(email))
    }))
}

pub fn memberships_for_user(user_id: &str) -> Result<Vec<TeamMember>, ServiceError> {
    let members: Vec<TeamMember> = fs_utils::scan_rows(MEMBERS_TABLE)?;
    Ok(members
        .into_iter()
        .filter(|member| member.user_id() == Some(user_id))
        .collect())
}

pub fn delete_team_members(team_id: &str) -> Result<usize, ServiceError> {
    let members = get_team_members(team_id)?;
    let mut deleted = 0;
    for member in members {
        if delete_member(&member.id)? {
            deleted += 1;
        }
    }
    info!("Deleted {} memberships for team: {}", deleted, team_id);
    Ok(deleted)
}

// Turn pending email invites into active memberships once the invited
// address registers
pub fn claim_pending_invites(email: &str, user_id: &str) -> Result<usize, ServiceError> {
    let members: Vec<TeamMember> = fs_utils::scan_rows(MEMBERS_TABLE)?;
    let mut claimed = 0;

    for mut member in members {
        let is_match = matches!(&member.status,
            MemberStatus::PendingInvite { email: pending } if pending.eq_ignore_ascii_case(email));
        if is_match {
            member.status = MemberStatus::Active {
                user_id: user_id.to_string(),
            };
            member.joined_at = chrono::Utc::now();
            save_member(&member)?;
            claimed += 1;
        }
    }

    if claimed > 0 {
        info!("Claimed {} pending invites for {}", claimed, email);
    }
    Ok(claimed)
}
