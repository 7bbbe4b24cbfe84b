//! # Admin Team Handlers
//!
//! Back-office team management. Every handler requires the `admin` role and
//! ignores the member-facing lock rules.

use auth::Role;
use axum::Json;
use chrono::Utc;
use entity::{teams, Teams};
use error::{AppError, PaginationMeta, Result};
use logging::log_team_event;
use sea_orm::{
    sea_query::{Expr, Func, LikeExpr},
    ActiveModelTrait,
    ColumnTrait,
    Condition,
    EntityTrait,
    PaginatorTrait,
    QueryFilter,
    QueryOrder,
    Set,
};
use tracing::{error, warn};
use uuid::Uuid;

use super::{delete_team_cascade, find_team, load_rosters, team_summary};
use crate::{
    dto::teams::{
        AdminDeleteTeamResponse,
        AdminTeamListResponse,
        AdminTeamResponse,
        AssignMentorRequest,
        RepositoryResponse,
        SetTeamStatusRequest,
        TeamListQuery,
        TeamListResponse,
    },
    middleware::auth::CurrentUser,
    repository::RepositoryRequest,
    utils::escape_like_wildcards,
    AppState,
};

async fn summary_response(state: &AppState, team: &teams::Model) -> Result<Json<AdminTeamResponse>> {
    let rosters = load_rosters(&state.db, &[team.id]).await?;
    Ok(Json(AdminTeamResponse {
        success: true,
        team:    team_summary(team, rosters.get(&team.id).map_or(0, Vec::len), true),
    }))
}

/// List teams with pagination, search and status filter
pub async fn admin_list_teams_handler(
    state: &AppState,
    user: CurrentUser,
    query: TeamListQuery,
) -> Result<Json<AdminTeamListResponse>> {
    user.require_role(Role::Admin)?;

    let page = query.page();
    let per_page = query.per_page();

    let mut select = Teams::find();

    if let Some(status) = query.status()? {
        select = select.filter(teams::Column::Status.eq(status));
    }

    if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        // Case-insensitive on every backend
        let pattern = format!("%{}%", escape_like_wildcards(&search.to_lowercase()));
        select = select.filter(
            Condition::any()
                .add(
                    Expr::expr(Func::lower(Expr::col((Teams, teams::Column::Name))))
                        .like(LikeExpr::new(pattern.clone()).escape('\\')),
                )
                .add(teams::Column::JoinCode.like(LikeExpr::new(pattern.to_uppercase()).escape('\\'))),
        );
    }

    let total = select.clone().count(&state.db).await?;

    let page_rows = select
        .order_by_desc(teams::Column::CreatedAt)
        .paginate(&state.db, per_page)
        .fetch_page(page.saturating_sub(1))
        .await?;

    let ids: Vec<Uuid> = page_rows.iter().map(|t| t.id).collect();
    let rosters = load_rosters(&state.db, &ids).await?;

    Ok(Json(AdminTeamListResponse {
        success:    true,
        teams:      page_rows
            .iter()
            .map(|t| team_summary(t, rosters.get(&t.id).map_or(0, Vec::len), true))
            .collect(),
        pagination: PaginationMeta::new(page, per_page, total),
    }))
}

/// Set any status, including the admin-only `active` and `pending_mentor`
pub async fn admin_set_status_handler(
    state: &AppState,
    user: CurrentUser,
    team_id: Uuid,
    req: SetTeamStatusRequest,
) -> Result<Json<AdminTeamResponse>> {
    user.require_role(Role::Admin)?;
    let team = find_team(&state.db, team_id).await?;
    let previous = team.status;

    let mut model: teams::ActiveModel = team.into();
    model.status = Set(req.status);
    model.updated_at = Set(Utc::now());
    let updated = model.update(&state.db).await?;

    log_team_event!("admin_status_set", updated.id, user.id, from = %previous, to = %updated.status);

    summary_response(state, &updated).await
}

/// Set or clear a team's mentor
pub async fn admin_assign_mentor_handler(
    state: &AppState,
    user: CurrentUser,
    team_id: Uuid,
    req: AssignMentorRequest,
) -> Result<Json<AdminTeamResponse>> {
    user.require_role(Role::Admin)?;
    let team = find_team(&state.db, team_id).await?;

    let mut model: teams::ActiveModel = team.into();
    model.mentor_id = Set(req.mentor_id);
    model.updated_at = Set(Utc::now());
    let updated = model.update(&state.db).await?;

    match req.mentor_id {
        Some(mentor_id) => log_team_event!("mentor_assigned", updated.id, user.id, mentor_id = %mentor_id),
        None => log_team_event!("mentor_cleared", updated.id, user.id),
    }

    summary_response(state, &updated).await
}

/// Provision a repository for a team and store its URL
pub async fn admin_create_repository_handler(
    state: &AppState,
    user: CurrentUser,
    team_id: Uuid,
) -> Result<Json<RepositoryResponse>> {
    user.require_role(Role::Admin)?;
    let team = find_team(&state.db, team_id).await?;
    if team.repository_url.is_some() {
        return Err(AppError::conflict("This team already has a repository."));
    }

    let url = state
        .repositories
        .create_repository(&RepositoryRequest {
            team_id:   team.id,
            team_name: team.name.clone(),
            join_code: team.join_code.clone(),
        })
        .await?;

    let mut model: teams::ActiveModel = team.into();
    model.repository_url = Set(Some(url.clone()));
    model.updated_at = Set(Utc::now());
    let updated = model.update(&state.db).await?;

    log_team_event!("repository_created", updated.id, user.id, repository_url = %url);

    Ok(Json(RepositoryResponse {
        success:        true,
        repository_url: updated.repository_url,
    }))
}

/// Delete a team's repository and clear its URL
pub async fn admin_delete_repository_handler(
    state: &AppState,
    user: CurrentUser,
    team_id: Uuid,
) -> Result<Json<RepositoryResponse>> {
    user.require_role(Role::Admin)?;
    let team = find_team(&state.db, team_id).await?;
    let url = team
        .repository_url
        .clone()
        .ok_or_else(|| AppError::not_found("This team has no repository."))?;

    if !state.repositories.delete_repository(&url).await? {
        return Err(AppError::external("The repository service did not delete the repository."));
    }

    let mut model: teams::ActiveModel = team.into();
    model.repository_url = Set(None);
    model.updated_at = Set(Utc::now());
    let updated = model.update(&state.db).await?;

    log_team_event!("repository_deleted", updated.id, user.id, repository_url = %url);

    Ok(Json(RepositoryResponse {
        success:        true,
        repository_url: None,
    }))
}

/// Delete a team regardless of its lock state
///
/// Runs the cascading delete first, then makes a best-effort attempt to delete
/// the team's repository. A repository failure is reported in the response and
/// never undoes the deletion.
pub async fn admin_delete_team_handler(
    state: &AppState,
    user: CurrentUser,
    team_id: Uuid,
) -> Result<Json<AdminDeleteTeamResponse>> {
    user.require_role(Role::Admin)?;
    let team = find_team(&state.db, team_id).await?;

    delete_team_cascade(&state.db, team.id).await?;
    log_team_event!("team_deleted_by_admin", team.id, user.id, status = %team.status);

    let (repository_deleted, warning) = match team.repository_url.as_deref() {
        None => (None, None),
        Some(url) => {
            match state.repositories.delete_repository(url).await {
                Ok(true) => (Some(true), None),
                Ok(false) => {
                    warn!(team_id = %team.id, repository_url = %url, "Repository service declined deletion");
                    (
                        Some(false),
                        Some(format!("Team deleted, but the repository at {} was not deleted.", url)),
                    )
                },
                Err(e) => {
                    error!(team_id = %team.id, repository_url = %url, error = %e, "Repository deletion failed");
                    (
                        Some(false),
                        Some(format!(
                            "Team deleted, but deleting the repository at {} failed.",
                            url
                        )),
                    )
                },
            }
        },
    };

    Ok(Json(AdminDeleteTeamResponse {
        success: true,
        message: "Team deleted successfully".to_string(),
        repository_deleted,
        warning,
    }))
}

/// Teams mentored by the caller (mentors and admins)
pub async fn mentor_teams_handler(state: &AppState, user: CurrentUser) -> Result<Json<TeamListResponse>> {
    user.require_any(&[Role::Mentor, Role::Admin])?;

    let teams = Teams::find()
        .filter(teams::Column::MentorId.eq(user.id))
        .order_by_asc(teams::Column::Name)
        .all(&state.db)
        .await?;
    let ids: Vec<Uuid> = teams.iter().map(|t| t.id).collect();
    let rosters = load_rosters(&state.db, &ids).await?;

    Ok(Json(TeamListResponse {
        success: true,
        teams:   teams
            .iter()
            .map(|t| team_summary(t, rosters.get(&t.id).map_or(0, Vec::len), true))
            .collect(),
    }))
}
