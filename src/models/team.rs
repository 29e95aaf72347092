// marley-service/src/models/team.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Team {
    pub id: String,
    pub name: String,
    pub created_by: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub updated_at: DateTime<Utc>,
}

impl Team {
    pub fn new(name: String, created_by: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Roles ordered by privilege, owner highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Dancer,
    Director,
    Owner,
}

/// Derived permission set. Never persisted: always computed from the
/// role on read, so the two cannot fall out of sync.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Permissions {
    pub can_edit: bool,
    pub can_delete: bool,
    pub can_upload: bool,
}

impl Permissions {
    pub fn for_role(role: Role) -> Self {
        let privileged = matches!(role, Role::Owner | Role::Director);
        Permissions {
            can_edit: privileged,
            can_delete: privileged,
            can_upload: true,
        }
    }
}

/// A membership either binds a registered user to the team, or holds a
/// seat for an email address that has not signed up yet.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MemberStatus {
    Active {
        user_id: String,
    },
    PendingInvite {
        // Named apart from TeamMember::email, which this variant is
        // flattened next to
        #[serde(rename = "invited_email")]
        email: String,
    },
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TeamMember {
    pub id: String,
    pub team_id: String,
    #[serde(flatten)]
    pub status: MemberStatus,
    pub email: Option<String>,
    pub role: Role,
    pub invited_by: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub joined_at: DateTime<Utc>,
}

impl TeamMember {
    pub fn active(team_id: String, user_id: String, email: Option<String>, role: Role, invited_by: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            team_id,
            status: MemberStatus::Active { user_id },
            email,
            role,
            invited_by,
            joined_at: Utc::now(),
        }
    }

    pub fn pending(team_id: String, email: String, role: Role, invited_by: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            team_id,
            status: MemberStatus::PendingInvite { email: email.clone() },
            email: Some(email),
            role,
            invited_by,
            joined_at: Utc::now(),
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        match &self.status {
            MemberStatus::Active { user_id } => Some(user_id),
            MemberStatus::PendingInvite { .. } => None,
        }
    }

    pub fn permissions(&self) -> Permissions {
        Permissions::for_role(self.role)
    }
}

/// Member as returned by the API, with the computed permission set attached.
#[derive(Serialize, Debug)]
pub struct MemberView {
    #[serde(flatten)]
    pub member: TeamMember,
    pub permissions: Permissions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<crate::models::UserInfo>,
}

impl MemberView {
    pub fn new(member: TeamMember, user: Option<crate::models::UserInfo>) -> Self {
        let permissions = member.permissions();
        MemberView {
            member,
            permissions,
            user,
        }
    }
}

// Request bodies

#[derive(Serialize, Deserialize, Debug)]
pub struct TeamData {
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct InviteByEmailRequest {
    pub email: String,
    #[serde(default = "default_invite_role")]
    pub role: Role,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct InviteByUserRequest {
    pub user_id: String,
    #[serde(default = "default_invite_role")]
    pub role: Role,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct UpdateRoleRequest {
    pub role: Role,
}

fn default_invite_role() -> Role {
    Role::Dancer
}
