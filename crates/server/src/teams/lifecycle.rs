//! # Team Lifecycle
//!
//! Pure decision logic for the team state machine. Nothing here touches the
//! database: handlers load a team and its roster, ask this module whether an
//! action is allowed for the current user, then perform the write.
//!
//! ```text
//! draft <-> open --lock--> locked --admin--> active --admin--> pending_mentor
//! ```

use entity::{sea_orm_active_enums::TeamStatus, team_members, teams};
use error::{AppError, Result};
use serde::Serialize;
use uuid::Uuid;

/// Shown when a join hits the `(team_id, user_id)` unique index or the roster
/// already contains the user.
pub const ALREADY_MEMBER: &str = "You are already a member of this team.";

/// Minimum number of non-leader members before a team may lock.
pub const MIN_MEMBERS_TO_LOCK: usize = 2;

/// A member-facing action on an existing team.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamAction {
    /// Join the roster (by code or by browsing)
    Join,
    /// Mark own membership ready
    MarkReady,
    /// Remove own membership
    Leave,
    /// Remove another member
    Kick(Uuid),
    /// Flip between draft and open
    ToggleStatus,
    /// Freeze the roster
    Lock,
    /// Edit name, description or stack
    Edit,
    /// Delete the team and its memberships
    Delete,
}

/// Derived per-user flags for a team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TeamFlags {
    pub member_count:      usize,
    pub is_full:           bool,
    pub is_leader:         bool,
    pub is_member:         bool,
    pub can_join:          bool,
    pub can_lock:          bool,
    pub can_toggle_status: bool,
    pub can_leave:         bool,
    pub can_kick:          bool,
    pub can_mark_ready:    bool,
    pub can_edit:          bool,
    pub can_delete:        bool,
}

/// Membership row of `user_id`, if any.
pub fn membership_of(members: &[team_members::Model], user_id: Uuid) -> Option<&team_members::Model> {
    members.iter().find(|m| m.user_id == user_id)
}

/// Whether the roster has reached `max_members`.
pub fn is_full(team: &teams::Model, member_count: usize) -> bool {
    i64::try_from(member_count).unwrap_or(i64::MAX) >= i64::from(team.max_members)
}

/// Whether a team shows up when browsing for a team to join.
pub fn is_browsable(team: &teams::Model, member_count: usize) -> bool {
    !team.is_locked() && !is_full(team, member_count)
}

/// At least two members besides the leader, every one of them ready.
pub fn roster_ready(team: &teams::Model, members: &[team_members::Model]) -> bool {
    let others: Vec<_> = members.iter().filter(|m| m.user_id != team.leader_id).collect();
    others.len() >= MIN_MEMBERS_TO_LOCK && others.iter().all(|m| m.is_ready)
}

/// The status a leader toggle moves to, or `None` if the team cannot toggle.
pub fn toggled_status(status: TeamStatus) -> Option<TeamStatus> {
    match status {
        TeamStatus::Draft => Some(TeamStatus::Open),
        TeamStatus::Open => Some(TeamStatus::Draft),
        _ => None,
    }
}

fn ensure_unlocked(team: &teams::Model) -> Result<()> {
    if team.is_locked() {
        return Err(AppError::conflict("This team is locked."));
    }
    Ok(())
}

fn ensure_leader(team: &teams::Model, user_id: Uuid, what: &str) -> Result<()> {
    if !team.is_led_by(user_id) {
        return Err(AppError::forbidden(format!("Only the team leader can {}.", what)));
    }
    Ok(())
}

fn ensure_member<'a>(members: &'a [team_members::Model], user_id: Uuid) -> Result<&'a team_members::Model> {
    membership_of(members, user_id).ok_or_else(|| AppError::forbidden("You are not a member of this team."))
}

/// Decide whether `user_id` may perform `action` on `team`.
///
/// # Errors
///
/// - `Forbidden` when the user lacks the required relationship to the team
/// - `Conflict` when the team's state rules the action out
/// - `BadRequest` for actions that can never apply to the user
/// - `NotFound` when a kick target is not on the roster
pub fn authorize(team: &teams::Model, members: &[team_members::Model], user_id: Uuid, action: TeamAction) -> Result<()> {
    match action {
        TeamAction::Join => {
            ensure_unlocked(team)?;
            if membership_of(members, user_id).is_some() {
                return Err(AppError::conflict(ALREADY_MEMBER));
            }
            if is_full(team, members.len()) {
                return Err(AppError::conflict("This team is full."));
            }
            Ok(())
        },
        TeamAction::MarkReady => {
            ensure_member(members, user_id)?;
            if team.is_led_by(user_id) {
                return Err(AppError::bad_request("The team leader is always ready."));
            }
            ensure_unlocked(team)
        },
        TeamAction::Leave => {
            ensure_member(members, user_id)?;
            if team.is_led_by(user_id) {
                return Err(AppError::bad_request(
                    "The team leader cannot leave the team. Delete the team instead.",
                ));
            }
            ensure_unlocked(team)
        },
        TeamAction::Kick(target) => {
            ensure_leader(team, user_id, "remove members")?;
            ensure_unlocked(team)?;
            if target == team.leader_id {
                return Err(AppError::bad_request("The team leader cannot be removed."));
            }
            if membership_of(members, target).is_none() {
                return Err(AppError::not_found("Member not found in this team."));
            }
            Ok(())
        },
        TeamAction::ToggleStatus => {
            ensure_leader(team, user_id, "change the team status")?;
            ensure_unlocked(team)?;
            if toggled_status(team.status).is_none() {
                return Err(AppError::conflict(format!(
                    "A team in status '{}' cannot be toggled.",
                    team.status
                )));
            }
            Ok(())
        },
        TeamAction::Lock => {
            ensure_leader(team, user_id, "lock the team")?;
            if !matches!(team.status, TeamStatus::Draft | TeamStatus::Open) {
                return Err(AppError::conflict(format!(
                    "A team in status '{}' cannot be locked.",
                    team.status
                )));
            }
            if !roster_ready(team, members) {
                return Err(AppError::conflict(
                    "All members must be ready and the team needs at least 2 members besides the leader to lock.",
                ));
            }
            Ok(())
        },
        TeamAction::Edit => {
            ensure_leader(team, user_id, "edit the team")?;
            ensure_unlocked(team)
        },
        TeamAction::Delete => {
            ensure_leader(team, user_id, "delete the team")?;
            ensure_unlocked(team)
        },
    }
}

/// Compute the derived flags of `team` for `user_id`.
pub fn flags(team: &teams::Model, members: &[team_members::Model], user_id: Uuid) -> TeamFlags {
    let allowed = |action| authorize(team, members, user_id, action).is_ok();
    let is_leader = team.is_led_by(user_id);
    let has_kickable = members.iter().any(|m| m.user_id != team.leader_id);

    TeamFlags {
        member_count: members.len(),
        is_full: is_full(team, members.len()),
        is_leader,
        is_member: membership_of(members, user_id).is_some(),
        can_join: allowed(TeamAction::Join),
        can_lock: allowed(TeamAction::Lock),
        can_toggle_status: allowed(TeamAction::ToggleStatus),
        can_leave: allowed(TeamAction::Leave),
        can_kick: is_leader && !team.is_locked() && has_kickable,
        can_mark_ready: allowed(TeamAction::MarkReady) &&
            membership_of(members, user_id).is_some_and(|m| !m.is_ready),
        can_edit: allowed(TeamAction::Edit),
        can_delete: allowed(TeamAction::Delete),
    }
}
