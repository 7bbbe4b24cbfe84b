//! # Common Test Utilities
//!
//! In-memory SQLite application state, user fixtures and team helpers shared
//! by the integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Once};

use auth::{generate_secret, JwtConfig, Role};
use entity::{sea_orm_active_enums::StackStatus, technology_stacks, TechnologyStacks};
use migration::{seeds::run_all_seeds, Migrator, MigratorTrait};
use sea_orm::{ColumnTrait, ConnectOptions, Database, DbConn, EntityTrait, QueryFilter};
use server::{
    dto::teams::{CreateTeamRequest, TeamView},
    middleware::auth::CurrentUser,
    repository::{DisabledRepositoryProvisioner, RepositoryProvisioner},
    teams::handlers,
    AppState,
};
use uuid::Uuid;

/// Initialize test logging (run once per test session)
static INIT: Once = Once::new();

/// Initialize test environment including structured logging
pub fn init_test_env() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

/// A migrated and seeded in-memory database.
///
/// A single pooled connection keeps every query on the same in-memory
/// database.
pub async fn test_db() -> DbConn {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).min_connections(1).sqlx_logging(false);

    let db = Database::connect(opts).await.expect("connect to sqlite");
    Migrator::up(&db, None).await.expect("run migrations");
    run_all_seeds(&db, false).await.expect("run seeds");
    db
}

pub fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret:             generate_secret(),
        expiration_seconds: 3600,
        issuer:             "hackforge-test".to_string(),
        audience:           "hackforge-test-api".to_string(),
    }
}

/// State with repository provisioning disabled.
pub async fn test_state() -> AppState { test_state_with(Arc::new(DisabledRepositoryProvisioner)).await }

/// State with a specific repository provisioner.
pub async fn test_state_with(repositories: Arc<dyn RepositoryProvisioner>) -> AppState {
    init_test_env();
    AppState::new(test_db().await, jwt_config(), repositories)
}

/// Test fixture for an authenticated user
pub struct UserFixture {
    pub id:    Uuid,
    pub email: String,
    pub roles: Vec<Role>,
}

impl Default for UserFixture {
    fn default() -> Self {
        let id = Uuid::new_v4();
        Self {
            id,
            email: format!("{}@example.com", id.simple()),
            roles: vec![Role::Participant],
        }
    }
}

impl UserFixture {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Replace the roles
    #[must_use]
    pub fn with_roles(mut self, roles: &[Role]) -> Self {
        self.roles = roles.to_vec();
        self
    }

    pub fn build(self) -> CurrentUser {
        CurrentUser {
            id:    self.id,
            email: self.email,
            roles: self.roles,
        }
    }
}

pub fn participant() -> CurrentUser { UserFixture::new().build() }

pub fn admin() -> CurrentUser { UserFixture::new().with_roles(&[Role::Admin]).build() }

pub fn mentor() -> CurrentUser { UserFixture::new().with_roles(&[Role::Mentor]).build() }

/// Bearer header value for `user`.
pub fn bearer(state: &AppState, user: &CurrentUser) -> String {
    let token = auth::create_access_token(&state.jwt_config, user.id, &user.email, &user.roles).expect("issue token");
    format!("Bearer {}", token)
}

/// Id of a seeded active stack.
pub async fn active_stack(state: &AppState) -> Uuid {
    TechnologyStacks::find()
        .filter(technology_stacks::Column::Status.eq(StackStatus::Active))
        .one(&state.db)
        .await
        .expect("query stacks")
        .expect("seeded stack")
        .id
}

/// Create a team led by `leader`.
pub async fn create_team(state: &AppState, leader: &CurrentUser, name: &str) -> TeamView {
    let req = CreateTeamRequest {
        name:          name.to_string(),
        description:   None,
        tech_stack_id: active_stack(state).await,
    };
    handlers::create_team_handler(state, leader.clone(), req)
        .await
        .expect("create team")
        .0
        .team
}

/// Join `team` as `user` via its join code.
pub async fn join(state: &AppState, team: &TeamView, user: &CurrentUser) -> TeamView {
    let code = team.team.join_code.clone().expect("leader sees join code");
    handlers::join_by_code_handler(
        state,
        user.clone(),
        server::dto::teams::JoinByCodeRequest {
            code,
        },
    )
    .await
    .expect("join team")
    .0
    .team
}

/// Mark `user` ready on `team`.
pub async fn ready(state: &AppState, team: &TeamView, user: &CurrentUser) -> TeamView {
    handlers::mark_ready_handler(state, user.clone(), team.team.id)
        .await
        .expect("mark ready")
        .0
        .team
}

/// A team led by `leader` with two ready members, the smallest roster that
/// may lock.
pub async fn ready_team(state: &AppState, leader: &CurrentUser, name: &str) -> (TeamView, Vec<CurrentUser>) {
    let team = create_team(state, leader, name).await;
    let members = vec![participant(), participant()];
    for member in &members {
        join(state, &team, member).await;
        ready(state, &team, member).await;
    }
    (team, members)
}
