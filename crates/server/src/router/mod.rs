//! # API Router Configuration
//!
//! Thin wrappers that pull state, the current user, path parameters and
//! bodies out of the request and hand them to the handlers. Extractor
//! rejections go through [`AppError`] so every failure shares one envelope.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Extension,
        Path,
        Query,
        State,
    },
    middleware,
    routing::{delete, get, patch, post, put},
    Json,
    Router,
};
use error::{AppError, Result};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    dto::{
        settings::{SettingsResponse, UpdateSettingsRequest},
        teams::{
            AdminDeleteTeamResponse,
            AdminTeamListResponse,
            AdminTeamResponse,
            AssignMentorRequest,
            ConfirmRequest,
            CreateTeamRequest,
            JoinByCodeRequest,
            RepositoryResponse,
            SetTeamStatusRequest,
            TeamListQuery,
            TeamListResponse,
            TeamViewResponse,
            UpdateTeamRequest,
        },
        tech_stacks::{
            CreateStackRequest,
            SetStackStatusRequest,
            StackDetailResponse,
            StackListQuery,
            StackListResponse,
        },
        SuccessResponse,
    },
    middleware::{
        auth::{auth_middleware, CurrentUser},
        request_id::request_id_middleware,
        security_headers::security_headers_middleware,
    },
    settings,
    tech_stacks,
    teams::{admin, handlers},
    AppState,
};

type JsonBody<T> = std::result::Result<Json<T>, JsonRejection>;
type PathParam<T> = std::result::Result<Path<T>, PathRejection>;
type QueryParams<T> = std::result::Result<Query<T>, QueryRejection>;

fn body<T>(payload: JsonBody<T>) -> Result<T> { Ok(payload.map_err(AppError::from)?.0) }

fn path<T>(param: PathParam<T>) -> Result<T> { Ok(param.map_err(AppError::from)?.0) }

fn query<T>(params: QueryParams<T>) -> Result<T> { Ok(params.map_err(AppError::from)?.0) }

/// Creates the authenticated API routes
pub fn create_router(state: AppState) -> Router<AppState> {
    Router::new()
        // Member-facing team lifecycle
        .route("/api/v1/teams", post(create_team))
        .route("/api/v1/teams/mine", get(my_teams))
        .route("/api/v1/teams/open", get(open_teams))
        .route("/api/v1/teams/join", post(join_by_code))
        .route(
            "/api/v1/teams/{id}",
            get(get_team).patch(update_team).delete(delete_team),
        )
        .route("/api/v1/teams/{id}/join", post(join_team))
        .route("/api/v1/teams/{id}/ready", post(mark_ready))
        .route("/api/v1/teams/{id}/leave", post(leave_team))
        .route("/api/v1/teams/{id}/status/toggle", post(toggle_status))
        .route("/api/v1/teams/{id}/lock", post(lock_team))
        .route("/api/v1/teams/{id}/members/{user_id}/kick", post(kick_member))
        .route("/api/v1/mentor/teams", get(mentor_teams))
        .route("/api/v1/tech-stacks", get(list_stacks))
        // Admin back office
        .route("/api/v1/admin/teams", get(admin_list_teams))
        .route("/api/v1/admin/teams/{id}", delete(admin_delete_team))
        .route("/api/v1/admin/teams/{id}/status", put(admin_set_status))
        .route("/api/v1/admin/teams/{id}/mentor", put(admin_assign_mentor))
        .route(
            "/api/v1/admin/teams/{id}/repository",
            post(admin_create_repository).delete(admin_delete_repository),
        )
        .route("/api/v1/admin/tech-stacks", post(create_stack))
        .route("/api/v1/admin/tech-stacks/{id}/status", patch(set_stack_status))
        .route("/api/v1/admin/settings", get(get_settings).put(update_settings))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

async fn create_team(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    payload: JsonBody<CreateTeamRequest>,
) -> Result<Json<TeamViewResponse>> {
    handlers::create_team_handler(&state, user, body(payload)?).await
}

async fn my_teams(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<TeamListResponse>> {
    handlers::my_teams_handler(&state, user).await
}

async fn open_teams(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<TeamListResponse>> {
    handlers::list_open_teams_handler(&state, user).await
}

async fn join_by_code(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    payload: JsonBody<JoinByCodeRequest>,
) -> Result<Json<TeamViewResponse>> {
    handlers::join_by_code_handler(&state, user, body(payload)?).await
}

async fn get_team(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    id: PathParam<Uuid>,
) -> Result<Json<TeamViewResponse>> {
    handlers::get_team_handler(&state, user, path(id)?).await
}

async fn update_team(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    id: PathParam<Uuid>,
    payload: JsonBody<UpdateTeamRequest>,
) -> Result<Json<TeamViewResponse>> {
    handlers::update_team_handler(&state, user, path(id)?, body(payload)?).await
}

async fn delete_team(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    id: PathParam<Uuid>,
) -> Result<Json<SuccessResponse>> {
    handlers::delete_team_handler(&state, user, path(id)?).await
}

async fn join_team(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    id: PathParam<Uuid>,
) -> Result<Json<TeamViewResponse>> {
    handlers::join_team_handler(&state, user, path(id)?).await
}

async fn mark_ready(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    id: PathParam<Uuid>,
) -> Result<Json<TeamViewResponse>> {
    handlers::mark_ready_handler(&state, user, path(id)?).await
}

async fn leave_team(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    id: PathParam<Uuid>,
    payload: JsonBody<ConfirmRequest>,
) -> Result<Json<SuccessResponse>> {
    handlers::leave_team_handler(&state, user, path(id)?, body(payload)?).await
}

async fn toggle_status(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    id: PathParam<Uuid>,
) -> Result<Json<TeamViewResponse>> {
    handlers::toggle_status_handler(&state, user, path(id)?).await
}

async fn lock_team(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    id: PathParam<Uuid>,
) -> Result<Json<TeamViewResponse>> {
    handlers::lock_team_handler(&state, user, path(id)?).await
}

async fn kick_member(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ids: PathParam<(Uuid, Uuid)>,
    payload: JsonBody<ConfirmRequest>,
) -> Result<Json<TeamViewResponse>> {
    let (team_id, member_user_id) = path(ids)?;
    handlers::kick_member_handler(&state, user, team_id, member_user_id, body(payload)?).await
}

async fn mentor_teams(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<TeamListResponse>> {
    admin::mentor_teams_handler(&state, user).await
}

async fn list_stacks(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    params: QueryParams<StackListQuery>,
) -> Result<Json<StackListResponse>> {
    tech_stacks::list_stacks_handler(&state, user, query(params)?).await
}

async fn admin_list_teams(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    params: QueryParams<TeamListQuery>,
) -> Result<Json<AdminTeamListResponse>> {
    admin::admin_list_teams_handler(&state, user, query(params)?).await
}

async fn admin_delete_team(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    id: PathParam<Uuid>,
) -> Result<Json<AdminDeleteTeamResponse>> {
    admin::admin_delete_team_handler(&state, user, path(id)?).await
}

async fn admin_set_status(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    id: PathParam<Uuid>,
    payload: JsonBody<SetTeamStatusRequest>,
) -> Result<Json<AdminTeamResponse>> {
    admin::admin_set_status_handler(&state, user, path(id)?, body(payload)?).await
}

async fn admin_assign_mentor(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    id: PathParam<Uuid>,
    payload: JsonBody<AssignMentorRequest>,
) -> Result<Json<AdminTeamResponse>> {
    admin::admin_assign_mentor_handler(&state, user, path(id)?, body(payload)?).await
}

async fn admin_create_repository(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    id: PathParam<Uuid>,
) -> Result<Json<RepositoryResponse>> {
    admin::admin_create_repository_handler(&state, user, path(id)?).await
}

async fn admin_delete_repository(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    id: PathParam<Uuid>,
) -> Result<Json<RepositoryResponse>> {
    admin::admin_delete_repository_handler(&state, user, path(id)?).await
}

async fn create_stack(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    payload: JsonBody<CreateStackRequest>,
) -> Result<Json<StackDetailResponse>> {
    tech_stacks::create_stack_handler(&state, user, body(payload)?).await
}

async fn set_stack_status(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    id: PathParam<Uuid>,
    payload: JsonBody<SetStackStatusRequest>,
) -> Result<Json<StackDetailResponse>> {
    tech_stacks::set_stack_status_handler(&state, user, path(id)?, body(payload)?).await
}

async fn get_settings(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<SettingsResponse>> {
    settings::get_settings_handler(&state, user).await
}

async fn update_settings(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    payload: JsonBody<UpdateSettingsRequest>,
) -> Result<Json<SettingsResponse>> {
    settings::update_settings_handler(&state, user, body(payload)?).await
}

/// Liveness probe with uptime
async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "uptime_seconds": state.start_time.elapsed().as_secs(),
    }))
}

/// Creates the health check router
pub fn create_health_router() -> Router<AppState> { Router::new().route("/health", get(health)) }

/// Creates the main application router
///
/// Every response carries an `x-request-id` and the security headers.
pub fn create_app_router(state: AppState) -> Router {
    Router::new()
        .merge(create_health_router())
        .merge(create_router(state.clone()))
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}
