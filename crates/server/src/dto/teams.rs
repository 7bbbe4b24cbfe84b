//! # Team Data Transfer Objects
//!
//! Request and response types for team endpoints.

use entity::{sea_orm_active_enums::TeamStatus, team_members, teams};
use error::{AppError, PaginationMeta, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::timestamp;
use crate::teams::lifecycle::TeamFlags;

/// Request to create a new team
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct CreateTeamRequest {
    /// Team name
    #[validate(length(
        min = 1,
        max = 100,
        message = "Team name must be between 1 and 100 characters"
    ))]
    pub name:          String,
    /// Team description
    #[validate(length(max = 2000, message = "Description must not exceed 2000 characters"))]
    pub description:   Option<String>,
    /// Technology stack the team builds with
    pub tech_stack_id: Uuid,
}

/// Request to update an existing team
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Validate)]
pub struct UpdateTeamRequest {
    /// Updated team name
    #[validate(length(
        min = 1,
        max = 100,
        message = "Team name must be between 1 and 100 characters"
    ))]
    pub name:          Option<String>,
    /// Updated description
    #[validate(length(max = 2000, message = "Description must not exceed 2000 characters"))]
    pub description:   Option<String>,
    /// Updated technology stack
    pub tech_stack_id: Option<Uuid>,
}

/// Request to join a team by its code
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct JoinByCodeRequest {
    #[validate(length(min = 1, message = "Team code is required"))]
    pub code: String,
}

/// Confirmation body for destructive member actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct ConfirmRequest {
    #[serde(default)]
    pub confirm: bool,
}

impl ConfirmRequest {
    /// Fails unless the caller explicitly confirmed.
    pub fn require(&self) -> Result<()> {
        if !self.confirm {
            return Err(AppError::validation("Please confirm this action."));
        }
        Ok(())
    }
}

/// Response for a single team row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamResponse {
    pub id:             Uuid,
    pub name:           String,
    pub description:    Option<String>,
    pub status:         TeamStatus,
    /// Only disclosed to members and admins
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub join_code:      Option<String>,
    pub leader_id:      Uuid,
    pub mentor_id:      Option<Uuid>,
    pub tech_stack_id:  Uuid,
    pub max_members:    i32,
    pub repository_url: Option<String>,
    pub created_at:     String,
    pub updated_at:     String,
}

impl TeamResponse {
    /// Build from a model, disclosing the join code only when `show_code` is set.
    pub fn from_model(team: &teams::Model, show_code: bool) -> Self {
        Self {
            id:             team.id,
            name:           team.name.clone(),
            description:    team.description.clone(),
            status:         team.status,
            join_code:      show_code.then(|| team.join_code.clone()),
            leader_id:      team.leader_id,
            mentor_id:      team.mentor_id,
            tech_stack_id:  team.tech_stack_id,
            max_members:    team.max_members,
            repository_url: team.repository_url.clone(),
            created_at:     timestamp(&team.created_at),
            updated_at:     timestamp(&team.updated_at),
        }
    }
}

/// Response for a team member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMemberResponse {
    pub id:        Uuid,
    pub user_id:   Uuid,
    pub is_leader: bool,
    pub is_ready:  bool,
    pub joined_at: String,
}

impl TeamMemberResponse {
    pub fn from_model(member: &team_members::Model, leader_id: Uuid) -> Self {
        Self {
            id:        member.id,
            user_id:   member.user_id,
            is_leader: member.user_id == leader_id,
            is_ready:  member.is_ready,
            joined_at: timestamp(&member.joined_at),
        }
    }
}

/// A team, its roster and what the current user may do with it
#[derive(Debug, Clone, Serialize)]
pub struct TeamView {
    pub team:          TeamResponse,
    pub members:       Vec<TeamMemberResponse>,
    pub my_membership: Option<TeamMemberResponse>,
    #[serde(flatten)]
    pub flags:         TeamFlags,
}

/// Envelope for a single team view
#[derive(Debug, Clone, Serialize)]
pub struct TeamViewResponse {
    pub success: bool,
    pub team:    TeamView,
}

/// A team row with its member count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSummary {
    #[serde(flatten)]
    pub team:         TeamResponse,
    pub member_count: u64,
}

/// Response for a list of teams
#[derive(Debug, Clone, Serialize)]
pub struct TeamListResponse {
    pub success: bool,
    pub teams:   Vec<TeamSummary>,
}

/// Response for the admin team listing
#[derive(Debug, Clone, Serialize)]
pub struct AdminTeamListResponse {
    pub success:    bool,
    pub teams:      Vec<TeamSummary>,
    pub pagination: PaginationMeta,
}

/// Query parameters for the admin team list
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TeamListQuery {
    /// Page number (1-based, default: 1)
    pub page:     Option<u64>,
    /// Items per page (default: 20, max: 100)
    pub per_page: Option<u64>,
    /// Search term for name or join code
    pub search:   Option<String>,
    /// Exact status filter
    pub status:   Option<String>,
}

impl TeamListQuery {
    /// Get page number (1-based, default: 1)
    pub fn page(&self) -> u64 { self.page.unwrap_or(1).max(1) }

    /// Get items per page (default: 20, max: 100)
    pub fn per_page(&self) -> u64 { self.per_page.unwrap_or(20).clamp(1, 100) }

    /// The status filter, if one was given.
    pub fn status(&self) -> Result<Option<TeamStatus>> {
        match self.status.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => {
                TeamStatus::parse(raw)
                    .map(Some)
                    .ok_or_else(|| AppError::bad_request(format!("Unknown team status: {}", raw)))
            },
        }
    }
}

/// Admin request to set a team's status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SetTeamStatusRequest {
    pub status: TeamStatus,
}

/// Admin request to set or clear a mentor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct AssignMentorRequest {
    pub mentor_id: Option<Uuid>,
}

/// Response for admin team updates
#[derive(Debug, Clone, Serialize)]
pub struct AdminTeamResponse {
    pub success: bool,
    pub team:    TeamSummary,
}

/// Response for repository creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryResponse {
    pub success:        bool,
    pub repository_url: Option<String>,
}

/// Response for admin team deletion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminDeleteTeamResponse {
    pub success:            bool,
    pub message:            String,
    /// `None` when the team had no repository
    pub repository_deleted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub warning:            Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_defaults() {
        let query = TeamListQuery::default();
        assert_eq!(query.page(), 1);
        assert_eq!(query.per_page(), 20);
        assert_eq!(query.status().unwrap(), None);
    }

    #[test]
    fn test_list_query_clamps() {
        let query = TeamListQuery {
            page: Some(0),
            per_page: Some(1000),
            ..Default::default()
        };
        assert_eq!(query.page(), 1);
        assert_eq!(query.per_page(), 100);

        let query = TeamListQuery {
            per_page: Some(0),
            ..Default::default()
        };
        assert_eq!(query.per_page(), 1);
    }

    #[test]
    fn test_list_query_status() {
        let query = TeamListQuery {
            status: Some("Pending_Mentor".to_string()),
            ..Default::default()
        };
        assert_eq!(query.status().unwrap(), Some(TeamStatus::PendingMentor));

        let query = TeamListQuery {
            status: Some("archived".to_string()),
            ..Default::default()
        };
        assert!(query.status().is_err());
    }

    #[test]
    fn test_confirm_defaults_to_false() {
        let req: ConfirmRequest = serde_json::from_str("{}").unwrap();
        assert!(req.require().is_err());
        let req: ConfirmRequest = serde_json::from_str(r#"{"confirm": true}"#).unwrap();
        assert!(req.require().is_ok());
    }

    #[test]
    fn test_create_request_validation() {
        let req = CreateTeamRequest {
            name:          String::new(),
            description:   None,
            tech_stack_id: Uuid::new_v4(),
        };
        assert!(req.validate().is_err());

        let req = CreateTeamRequest {
            name:          "x".repeat(101),
            description:   None,
            tech_stack_id: Uuid::new_v4(),
        };
        assert!(req.validate().is_err());

        let req = CreateTeamRequest {
            name:          "Team Alpha".to_string(),
            description:   Some("We build things".to_string()),
            tech_stack_id: Uuid::new_v4(),
        };
        assert!(req.validate().is_ok());
    }
}
