//! # Teams
//!
//! Team lifecycle: member-facing handlers, admin back office, and the pure
//! state-machine rules they share.

pub mod admin;
pub mod handlers;
pub mod join_code;
pub mod lifecycle;

use std::collections::HashMap;

use entity::{team_members, teams, TeamMembers, Teams};
use error::{AppError, Result};
use sea_orm::{
    ColumnTrait,
    ConnectionTrait,
    EntityTrait,
    ModelTrait,
    QueryFilter,
    QueryOrder,
    TransactionTrait,
};
use uuid::Uuid;

use crate::{
    dto::teams::{TeamMemberResponse, TeamResponse, TeamSummary, TeamView},
    middleware::auth::CurrentUser,
};

/// Load a team or fail with `NotFound`.
pub(crate) async fn find_team<C: ConnectionTrait>(db: &C, team_id: Uuid) -> Result<teams::Model> {
    Teams::find_by_id(team_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found("Team not found"))
}

/// Members of a team, oldest first.
pub(crate) async fn load_roster<C: ConnectionTrait>(db: &C, team: &teams::Model) -> Result<Vec<team_members::Model>> {
    Ok(team
        .find_related(TeamMembers)
        .order_by_asc(team_members::Column::JoinedAt)
        .all(db)
        .await?)
}

/// Members of several teams, grouped by team id.
pub(crate) async fn load_rosters<C: ConnectionTrait>(
    db: &C,
    team_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<team_members::Model>>> {
    if team_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let members = TeamMembers::find()
        .filter(team_members::Column::TeamId.is_in(team_ids.iter().copied()))
        .order_by_asc(team_members::Column::JoinedAt)
        .all(db)
        .await?;

    let mut grouped: HashMap<Uuid, Vec<team_members::Model>> = HashMap::new();
    for member in members {
        grouped.entry(member.team_id).or_default().push(member);
    }
    Ok(grouped)
}

/// Delete a team's memberships and then the team, in one transaction.
pub(crate) async fn delete_team_cascade<C: TransactionTrait>(db: &C, team_id: Uuid) -> Result<()> {
    let txn = db.begin().await?;
    TeamMembers::delete_many()
        .filter(team_members::Column::TeamId.eq(team_id))
        .exec(&txn)
        .await?;
    let deleted = Teams::delete_by_id(team_id).exec(&txn).await?;
    if deleted.rows_affected == 0 {
        return Err(AppError::not_found("Team not found"));
    }
    txn.commit().await?;
    Ok(())
}

/// Build the full view of a team for `user`.
///
/// The join code is disclosed to members and admins only.
pub(crate) fn team_view(team: &teams::Model, members: &[team_members::Model], user: &CurrentUser) -> TeamView {
    let flags = lifecycle::flags(team, members, user.id);
    let show_code = flags.is_member || user.is_admin();

    TeamView {
        team: TeamResponse::from_model(team, show_code),
        members: members
            .iter()
            .map(|m| TeamMemberResponse::from_model(m, team.leader_id))
            .collect(),
        my_membership: lifecycle::membership_of(members, user.id)
            .map(|m| TeamMemberResponse::from_model(m, team.leader_id)),
        flags,
    }
}

/// A team row with its member count.
pub(crate) fn team_summary(team: &teams::Model, member_count: usize, show_code: bool) -> TeamSummary {
    TeamSummary {
        team:         TeamResponse::from_model(team, show_code),
        member_count: u64::try_from(member_count).unwrap_or(u64::MAX),
    }
}
