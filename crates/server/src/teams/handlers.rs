//! # Team Handlers
//!
//! Member-facing team operations. Each handler loads the team and its roster,
//! asks [`lifecycle::authorize`] whether the current user may act, and then
//! performs a single write or a single transaction.

use auth::Role;
use axum::Json;
use chrono::Utc;
use entity::{
    sea_orm_active_enums::TeamStatus,
    team_members,
    teams,
    TeamMembers,
    Teams,
};
use error::{is_unique_violation, AppError, Result};
use logging::log_team_event;
use sea_orm::{
    ActiveModelTrait,
    ColumnTrait,
    DbConn,
    DbErr,
    EntityTrait,
    PaginatorTrait,
    QueryFilter,
    QueryOrder,
    Set,
    TransactionTrait,
};
use tracing::warn;
use uuid::Uuid;
use validator::Validate;

use super::{
    delete_team_cascade,
    find_team,
    join_code::{self, INVALID_CODE},
    lifecycle::{self, TeamAction, ALREADY_MEMBER},
    load_roster,
    load_rosters,
    team_summary,
    team_view,
};
use crate::{
    dto::{
        teams::{
            ConfirmRequest,
            CreateTeamRequest,
            JoinByCodeRequest,
            TeamListResponse,
            TeamViewResponse,
            UpdateTeamRequest,
        },
        SuccessResponse,
    },
    middleware::auth::CurrentUser,
    settings,
    tech_stacks::find_active_stack,
    AppState,
};

/// How many fresh join codes to try before giving up on team creation.
pub const JOIN_CODE_ATTEMPTS: usize = 5;

async fn view_response(state: &AppState, team: &teams::Model, user: &CurrentUser) -> Result<Json<TeamViewResponse>> {
    let members = load_roster(&state.db, team).await?;
    Ok(Json(TeamViewResponse {
        success: true,
        team:    team_view(team, &members, user),
    }))
}

async fn insert_team_with_leader(
    state: &AppState,
    user: &CurrentUser,
    req: &CreateTeamRequest,
    name: &str,
    max_members: i32,
    code: String,
) -> std::result::Result<teams::Model, DbErr> {
    let now = Utc::now();
    let txn = state.db.begin().await?;

    let team = teams::ActiveModel {
        id:             Set(Uuid::new_v4()),
        name:           Set(name.to_string()),
        description:    Set(req.description.clone()),
        status:         Set(TeamStatus::Draft),
        join_code:      Set(code),
        leader_id:      Set(user.id),
        mentor_id:      Set(None),
        tech_stack_id:  Set(req.tech_stack_id),
        max_members:    Set(max_members),
        repository_url: Set(None),
        created_at:     Set(now),
        updated_at:     Set(now),
    }
    .insert(&txn)
    .await?;

    team_members::ActiveModel {
        id:        Set(Uuid::new_v4()),
        team_id:   Set(team.id),
        user_id:   Set(user.id),
        is_ready:  Set(true),
        joined_at: Set(now),
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;
    Ok(team)
}

/// Create a new team
///
/// The creator becomes the leader and is inserted as a ready member in the
/// same transaction as the team. A join-code collision is retried with a fresh
/// code.
pub async fn create_team_handler(
    state: &AppState,
    user: CurrentUser,
    req: CreateTeamRequest,
) -> Result<Json<TeamViewResponse>> {
    create_team_with_codes(state, user, req, join_code::generate).await
}

/// [`create_team_handler`] drawing join codes from `next_code`.
///
/// # Errors
///
/// `Conflict` once `JOIN_CODE_ATTEMPTS` codes in a row collide with existing
/// teams.
pub async fn create_team_with_codes(
    state: &AppState,
    user: CurrentUser,
    req: CreateTeamRequest,
    mut next_code: impl FnMut() -> String,
) -> Result<Json<TeamViewResponse>> {
    user.require_role(Role::Participant)?;
    req.validate()?;

    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Team name must be between 1 and 100 characters"));
    }

    let settings = settings::ensure_creation_open(&state.db).await?;
    find_active_stack(&state.db, req.tech_stack_id).await?;

    for attempt in 1 ..= JOIN_CODE_ATTEMPTS {
        match insert_team_with_leader(state, &user, &req, name, settings.default_max_members, next_code()).await {
            Ok(team) => {
                log_team_event!("team_created", team.id, user.id, join_code = %team.join_code);
                return view_response(state, &team, &user).await;
            },
            Err(e) if is_unique_violation(&e) => {
                warn!(attempt, user_id = %user.id, "Join code collision, retrying");
            },
            Err(e) => return Err(e.into()),
        }
    }

    Err(AppError::conflict(
        "Could not allocate a unique team code. Please try again.",
    ))
}

/// Get a team with its roster and the caller's derived flags
pub async fn get_team_handler(state: &AppState, user: CurrentUser, team_id: Uuid) -> Result<Json<TeamViewResponse>> {
    let team = find_team(&state.db, team_id).await?;
    view_response(state, &team, &user).await
}

/// Teams the caller is a member of
pub async fn my_teams_handler(state: &AppState, user: CurrentUser) -> Result<Json<TeamListResponse>> {
    let team_ids: Vec<Uuid> = TeamMembers::find()
        .filter(team_members::Column::UserId.eq(user.id))
        .all(&state.db)
        .await?
        .into_iter()
        .map(|m| m.team_id)
        .collect();

    if team_ids.is_empty() {
        return Ok(Json(TeamListResponse {
            success: true,
            teams:   Vec::new(),
        }));
    }

    let teams = Teams::find()
        .filter(teams::Column::Id.is_in(team_ids.iter().copied()))
        .order_by_asc(teams::Column::CreatedAt)
        .all(&state.db)
        .await?;
    let rosters = load_rosters(&state.db, &team_ids).await?;

    let teams = teams
        .iter()
        .map(|t| team_summary(t, rosters.get(&t.id).map_or(0, Vec::len), true))
        .collect();

    Ok(Json(TeamListResponse {
        success: true,
        teams,
    }))
}

/// Teams open for joining: not locked and below their size limit
pub async fn list_open_teams_handler(state: &AppState, user: CurrentUser) -> Result<Json<TeamListResponse>> {
    let candidates = Teams::find()
        .filter(teams::Column::Status.ne(TeamStatus::Locked))
        .order_by_desc(teams::Column::CreatedAt)
        .all(&state.db)
        .await?;
    let ids: Vec<Uuid> = candidates.iter().map(|t| t.id).collect();
    let rosters = load_rosters(&state.db, &ids).await?;

    let teams = candidates
        .iter()
        .filter_map(|t| {
            let members = rosters.get(&t.id).map(Vec::as_slice).unwrap_or_default();
            lifecycle::is_browsable(t, members.len()).then(|| {
                let is_member = lifecycle::membership_of(members, user.id).is_some();
                team_summary(t, members.len(), is_member || user.is_admin())
            })
        })
        .collect();

    Ok(Json(TeamListResponse {
        success: true,
        teams,
    }))
}

/// Authorize a join for `user`, then insert the membership.
async fn add_member(state: &AppState, team: &teams::Model, user: &CurrentUser) -> Result<()> {
    let members = load_roster(&state.db, team).await?;
    lifecycle::authorize(team, &members, user.id, TeamAction::Join)?;
    insert_membership(&state.db, team, user.id).await?;
    log_team_event!("member_joined", team.id, user.id);
    Ok(())
}

/// Insert a not-ready membership, rechecking capacity inside the transaction.
///
/// Callers authorize the join first; this is the write that arbitrates two
/// joins racing for the last slot.
///
/// # Errors
///
/// - `Conflict` with [`ALREADY_MEMBER`] when the `(team_id, user_id)` index
///   rejects the row
/// - `Conflict` when the roster exceeds `max_members` after the insert, in
///   which case nothing is written
pub async fn insert_membership(db: &DbConn, team: &teams::Model, user_id: Uuid) -> Result<()> {
    let txn = db.begin().await?;
    let inserted = team_members::ActiveModel {
        id:        Set(Uuid::new_v4()),
        team_id:   Set(team.id),
        user_id:   Set(user_id),
        is_ready:  Set(false),
        joined_at: Set(Utc::now()),
    }
    .insert(&txn)
    .await;

    if let Err(e) = inserted {
        if is_unique_violation(&e) {
            return Err(AppError::conflict(ALREADY_MEMBER));
        }
        return Err(e.into());
    }

    let count = TeamMembers::find()
        .filter(team_members::Column::TeamId.eq(team.id))
        .count(&txn)
        .await?;
    if i64::try_from(count).unwrap_or(i64::MAX) > i64::from(team.max_members) {
        txn.rollback().await?;
        return Err(AppError::conflict("This team is full."));
    }

    txn.commit().await?;
    Ok(())
}

/// Join a team by its join code
pub async fn join_by_code_handler(
    state: &AppState,
    user: CurrentUser,
    req: JoinByCodeRequest,
) -> Result<Json<TeamViewResponse>> {
    user.require_role(Role::Participant)?;
    req.validate()?;
    let code = join_code::normalize(&req.code)?;
    settings::ensure_joining_open(&state.db).await?;

    let team = Teams::find()
        .filter(teams::Column::JoinCode.eq(code))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found(INVALID_CODE))?;

    add_member(state, &team, &user).await?;
    view_response(state, &team, &user).await
}

/// Join a team picked from the open-teams list
pub async fn join_team_handler(state: &AppState, user: CurrentUser, team_id: Uuid) -> Result<Json<TeamViewResponse>> {
    user.require_role(Role::Participant)?;
    settings::ensure_joining_open(&state.db).await?;

    let team = find_team(&state.db, team_id).await?;
    add_member(state, &team, &user).await?;
    view_response(state, &team, &user).await
}

/// Mark the caller's membership as ready
///
/// Idempotent; there is no way back to not-ready.
pub async fn mark_ready_handler(state: &AppState, user: CurrentUser, team_id: Uuid) -> Result<Json<TeamViewResponse>> {
    let team = find_team(&state.db, team_id).await?;
    let members = load_roster(&state.db, &team).await?;
    lifecycle::authorize(&team, &members, user.id, TeamAction::MarkReady)?;

    let membership = lifecycle::membership_of(&members, user.id)
        .cloned()
        .ok_or_else(|| AppError::forbidden("You are not a member of this team."))?;

    if !membership.is_ready {
        let mut model: team_members::ActiveModel = membership.into();
        model.is_ready = Set(true);
        model.update(&state.db).await?;
        log_team_event!("member_ready", team.id, user.id);
    }

    view_response(state, &team, &user).await
}

/// Leave a team
pub async fn leave_team_handler(
    state: &AppState,
    user: CurrentUser,
    team_id: Uuid,
    req: ConfirmRequest,
) -> Result<Json<SuccessResponse>> {
    req.require()?;
    let team = find_team(&state.db, team_id).await?;
    let members = load_roster(&state.db, &team).await?;
    lifecycle::authorize(&team, &members, user.id, TeamAction::Leave)?;

    TeamMembers::delete_many()
        .filter(team_members::Column::TeamId.eq(team.id))
        .filter(team_members::Column::UserId.eq(user.id))
        .exec(&state.db)
        .await?;

    log_team_event!("member_left", team.id, user.id);

    Ok(Json(SuccessResponse::new("You have left the team.")))
}

/// Remove another member from the team (leader only)
pub async fn kick_member_handler(
    state: &AppState,
    user: CurrentUser,
    team_id: Uuid,
    member_user_id: Uuid,
    req: ConfirmRequest,
) -> Result<Json<TeamViewResponse>> {
    req.require()?;
    let team = find_team(&state.db, team_id).await?;
    let members = load_roster(&state.db, &team).await?;
    lifecycle::authorize(&team, &members, user.id, TeamAction::Kick(member_user_id))?;

    TeamMembers::delete_many()
        .filter(team_members::Column::TeamId.eq(team.id))
        .filter(team_members::Column::UserId.eq(member_user_id))
        .exec(&state.db)
        .await?;

    log_team_event!("member_kicked", team.id, user.id, member_id = %member_user_id);

    view_response(state, &team, &user).await
}

/// Flip a team between draft and open (leader only)
pub async fn toggle_status_handler(
    state: &AppState,
    user: CurrentUser,
    team_id: Uuid,
) -> Result<Json<TeamViewResponse>> {
    let team = find_team(&state.db, team_id).await?;
    let members = load_roster(&state.db, &team).await?;
    lifecycle::authorize(&team, &members, user.id, TeamAction::ToggleStatus)?;

    let next = lifecycle::toggled_status(team.status)
        .ok_or_else(|| AppError::conflict("This team's status cannot be toggled."))?;
    let team = set_status(state, team, next).await?;

    log_team_event!("status_toggled", team.id, user.id, status = %team.status);

    view_response(state, &team, &user).await
}

/// Lock the roster (leader only)
///
/// Requires at least two members with every non-leader ready. No membership
/// rows change.
pub async fn lock_team_handler(state: &AppState, user: CurrentUser, team_id: Uuid) -> Result<Json<TeamViewResponse>> {
    let team = find_team(&state.db, team_id).await?;
    let members = load_roster(&state.db, &team).await?;
    lifecycle::authorize(&team, &members, user.id, TeamAction::Lock)?;

    let team = set_status(state, team, TeamStatus::Locked).await?;

    log_team_event!("team_locked", team.id, user.id, member_count = members.len());

    view_response(state, &team, &user).await
}

async fn set_status(state: &AppState, team: teams::Model, status: TeamStatus) -> Result<teams::Model> {
    let mut model: teams::ActiveModel = team.into();
    model.status = Set(status);
    model.updated_at = Set(Utc::now());
    Ok(model.update(&state.db).await?)
}

/// Edit team details (leader only)
pub async fn update_team_handler(
    state: &AppState,
    user: CurrentUser,
    team_id: Uuid,
    req: UpdateTeamRequest,
) -> Result<Json<TeamViewResponse>> {
    req.validate()?;
    let team = find_team(&state.db, team_id).await?;
    let members = load_roster(&state.db, &team).await?;
    lifecycle::authorize(&team, &members, user.id, TeamAction::Edit)?;

    let mut model: teams::ActiveModel = team.into();
    if let Some(name) = req.name {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::validation("Team name must be between 1 and 100 characters"));
        }
        model.name = Set(name);
    }
    if let Some(description) = req.description {
        let description = description.trim().to_string();
        model.description = Set((!description.is_empty()).then_some(description));
    }
    if let Some(stack_id) = req.tech_stack_id {
        find_active_stack(&state.db, stack_id).await?;
        model.tech_stack_id = Set(stack_id);
    }
    model.updated_at = Set(Utc::now());

    let updated = model.update(&state.db).await?;
    log_team_event!("team_updated", team_id, user.id);

    view_response(state, &updated, &user).await
}

/// Delete a team and its memberships (leader only)
pub async fn delete_team_handler(state: &AppState, user: CurrentUser, team_id: Uuid) -> Result<Json<SuccessResponse>> {
    let team = find_team(&state.db, team_id).await?;
    let members = load_roster(&state.db, &team).await?;
    lifecycle::authorize(&team, &members, user.id, TeamAction::Delete)?;

    delete_team_cascade(&state.db, team.id).await?;
    log_team_event!("team_deleted", team.id, user.id, member_count = members.len());

    Ok(Json(SuccessResponse::new("Team deleted successfully")))
}
