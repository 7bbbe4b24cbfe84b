//! Member-facing team lifecycle against an in-memory database.

mod common;

use common::*;
use entity::{sea_orm_active_enums::TeamStatus, team_members, TeamMembers, Teams};
use error::AppError;
use http::StatusCode;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use server::{
    dto::{
        settings::UpdateSettingsRequest,
        teams::{ConfirmRequest, CreateTeamRequest, JoinByCodeRequest, UpdateTeamRequest},
    },
    settings,
    teams::{
        handlers,
        lifecycle::{self, TeamAction, ALREADY_MEMBER},
    },
    AppState,
};
use uuid::Uuid;

const CONFIRMED: ConfirmRequest = ConfirmRequest {
    confirm: true,
};

async fn member_count(state: &AppState, team_id: Uuid) -> u64 {
    TeamMembers::find()
        .filter(team_members::Column::TeamId.eq(team_id))
        .count(&state.db)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_create_team_inserts_ready_leader() {
    let state = test_state().await;
    let leader = participant();

    let view = create_team(&state, &leader, "Team Alpha").await;

    assert_eq!(view.team.name, "Team Alpha");
    assert_eq!(view.team.status, TeamStatus::Draft);
    assert_eq!(view.team.leader_id, leader.id);
    assert_eq!(view.team.max_members, 3);
    assert_eq!(view.flags.member_count, 1);
    assert!(view.flags.is_leader);
    assert!(!view.flags.is_full);

    let code = view.team.join_code.clone().unwrap();
    assert_eq!(code.len(), 6);
    assert!(code.bytes().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()));

    assert_eq!(view.members.len(), 1);
    assert!(view.members[0].is_leader);
    assert!(view.members[0].is_ready);
    assert_eq!(view.my_membership.as_ref().unwrap().user_id, leader.id);
}

#[tokio::test]
async fn test_create_team_validation() {
    let state = test_state().await;
    let stack = active_stack(&state).await;

    let err = handlers::create_team_handler(
        &state,
        participant(),
        CreateTeamRequest {
            name:          "   ".to_string(),
            description:   None,
            tech_stack_id: stack,
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let err = handlers::create_team_handler(
        &state,
        participant(),
        CreateTeamRequest {
            name:          "Team Beta".to_string(),
            description:   None,
            tech_stack_id: Uuid::new_v4(),
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.status(), StatusCode::NOT_FOUND);

    assert_eq!(Teams::find().count(&state.db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_create_team_requires_participant_role() {
    let state = test_state().await;
    let req = CreateTeamRequest {
        name:          "Mentors Only".to_string(),
        description:   None,
        tech_stack_id: active_stack(&state).await,
    };
    let err = handlers::create_team_handler(&state, mentor(), req).await.unwrap_err();
    assert_eq!(err.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_create_team_respects_settings() {
    let state = test_state().await;
    settings::update_settings_handler(
        &state,
        admin(),
        UpdateSettingsRequest {
            default_max_members: Some(5),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let view = create_team(&state, &participant(), "Big Team").await;
    assert_eq!(view.team.max_members, 5);

    settings::update_settings_handler(
        &state,
        admin(),
        UpdateSettingsRequest {
            team_creation_open: Some(false),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let err = handlers::create_team_handler(
        &state,
        participant(),
        CreateTeamRequest {
            name:          "Too Late".to_string(),
            description:   None,
            tech_stack_id: active_stack(&state).await,
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_join_by_code_normalizes_input() {
    let state = test_state().await;
    let leader = participant();
    let team = create_team(&state, &leader, "Team Alpha").await;
    let code = team.team.join_code.clone().unwrap();

    let joiner = participant();
    let view = handlers::join_by_code_handler(
        &state,
        joiner.clone(),
        JoinByCodeRequest {
            code: format!("  {}  ", code.to_lowercase()),
        },
    )
    .await
    .unwrap()
    .0
    .team;

    assert_eq!(view.flags.member_count, 2);
    assert!(view.flags.is_member);
    assert!(!view.flags.is_leader);
    assert!(!view.my_membership.unwrap().is_ready);
    assert!(view.flags.can_mark_ready);
}

#[tokio::test]
async fn test_join_with_unknown_code() {
    let state = test_state().await;
    create_team(&state, &participant(), "Team Alpha").await;

    let err = handlers::join_by_code_handler(
        &state,
        participant(),
        JoinByCodeRequest {
            code: "ZZZZZZ".to_string(),
        },
    )
    .await
    .unwrap_err();

    assert_eq!(err.status(), StatusCode::NOT_FOUND);
    assert_eq!(err.message(), "Invalid team code.");
}

#[tokio::test]
async fn test_join_with_malformed_code() {
    let state = test_state().await;
    let err = handlers::join_by_code_handler(
        &state,
        participant(),
        JoinByCodeRequest {
            code: "AB1".to_string(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation { .. }));
}

#[tokio::test]
async fn test_second_join_is_rejected_without_duplicate() {
    let state = test_state().await;
    let team = create_team(&state, &participant(), "Team Alpha").await;
    let joiner = participant();
    join(&state, &team, &joiner).await;

    let err = handlers::join_team_handler(&state, joiner.clone(), team.team.id)
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::CONFLICT);
    assert_eq!(err.message(), ALREADY_MEMBER);

    let rows = TeamMembers::find()
        .filter(team_members::Column::TeamId.eq(team.team.id))
        .filter(team_members::Column::UserId.eq(joiner.id))
        .count(&state.db)
        .await
        .unwrap();
    assert_eq!(rows, 1);
}

#[tokio::test]
async fn test_full_team_rejects_joins() {
    let state = test_state().await;
    let team = create_team(&state, &participant(), "Team Alpha").await;
    join(&state, &team, &participant()).await;
    let view = join(&state, &team, &participant()).await;
    assert!(view.flags.is_full);

    let err = handlers::join_team_handler(&state, participant(), team.team.id)
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::CONFLICT);
    assert_eq!(member_count(&state, team.team.id).await, 3);
}

#[tokio::test]
async fn test_joining_closed() {
    let state = test_state().await;
    let team = create_team(&state, &participant(), "Team Alpha").await;
    settings::update_settings_handler(
        &state,
        admin(),
        UpdateSettingsRequest {
            joining_open: Some(false),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let err = handlers::join_team_handler(&state, participant(), team.team.id)
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_lock_requires_ready_members() {
    let state = test_state().await;
    let leader = participant();
    let team = create_team(&state, &leader, "Team Alpha").await;

    // Leader alone
    let err = handlers::lock_team_handler(&state, leader.clone(), team.team.id)
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::CONFLICT);

    // Leader plus one unready member
    let first = participant();
    join(&state, &team, &first).await;
    let view = handlers::get_team_handler(&state, leader.clone(), team.team.id)
        .await
        .unwrap()
        .0
        .team;
    assert!(!view.flags.can_lock);
    assert!(handlers::lock_team_handler(&state, leader.clone(), team.team.id)
        .await
        .is_err());

    // Leader plus one ready member
    ready(&state, &team, &first).await;
    let view = handlers::get_team_handler(&state, leader.clone(), team.team.id)
        .await
        .unwrap()
        .0
        .team;
    assert!(!view.flags.can_lock);
    let err = handlers::lock_team_handler(&state, leader.clone(), team.team.id)
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::CONFLICT);

    // Leader plus two ready members
    let second = participant();
    join(&state, &team, &second).await;
    let view = handlers::get_team_handler(&state, leader.clone(), team.team.id)
        .await
        .unwrap()
        .0
        .team;
    assert!(!view.flags.can_lock);
    ready(&state, &team, &second).await;
    let view = handlers::get_team_handler(&state, leader.clone(), team.team.id)
        .await
        .unwrap()
        .0
        .team;
    assert!(view.flags.can_lock);

    let locked = handlers::lock_team_handler(&state, leader.clone(), team.team.id)
        .await
        .unwrap()
        .0
        .team;
    assert_eq!(locked.team.status, TeamStatus::Locked);
    assert_eq!(locked.flags.member_count, 3);
    assert!(!locked.flags.can_lock);
}

#[tokio::test]
async fn test_locked_team_rejects_member_actions() {
    let state = test_state().await;
    let leader = participant();
    let (team, members) = ready_team(&state, &leader, "Team Alpha").await;
    let member = members[0].clone();
    handlers::lock_team_handler(&state, leader.clone(), team.team.id)
        .await
        .unwrap();

    let id = team.team.id;
    assert!(handlers::leave_team_handler(&state, member.clone(), id, CONFIRMED)
        .await
        .is_err());
    assert!(handlers::kick_member_handler(&state, leader.clone(), id, member.id, CONFIRMED)
        .await
        .is_err());
    assert!(handlers::mark_ready_handler(&state, member.clone(), id).await.is_err());
    assert!(handlers::toggle_status_handler(&state, leader.clone(), id).await.is_err());
    assert!(handlers::delete_team_handler(&state, leader.clone(), id).await.is_err());
    assert!(handlers::join_team_handler(&state, participant(), id).await.is_err());

    let member_view = handlers::get_team_handler(&state, member.clone(), id).await.unwrap().0.team;
    assert!(!member_view.flags.can_leave);
    assert!(!member_view.flags.can_mark_ready);
    let leader_view = handlers::get_team_handler(&state, leader.clone(), id).await.unwrap().0.team;
    assert!(!leader_view.flags.can_kick);
    assert!(!leader_view.flags.can_toggle_status);
    assert!(!leader_view.flags.can_edit);

    assert_eq!(member_count(&state, id).await, 3);
}

#[tokio::test]
async fn test_mark_ready_is_idempotent() {
    let state = test_state().await;
    let leader = participant();
    let member = participant();
    let team = create_team(&state, &leader, "Team Alpha").await;
    join(&state, &team, &member).await;

    let first = ready(&state, &team, &member).await;
    let second = ready(&state, &team, &member).await;
    assert!(first.my_membership.unwrap().is_ready);
    assert!(second.my_membership.unwrap().is_ready);

    let err = handlers::mark_ready_handler(&state, leader.clone(), team.team.id)
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_leave_requires_confirmation() {
    let state = test_state().await;
    let member = participant();
    let team = create_team(&state, &participant(), "Team Alpha").await;
    join(&state, &team, &member).await;

    let err = handlers::leave_team_handler(&state, member.clone(), team.team.id, ConfirmRequest::default())
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(member_count(&state, team.team.id).await, 2);

    handlers::leave_team_handler(&state, member.clone(), team.team.id, CONFIRMED)
        .await
        .unwrap();
    assert_eq!(member_count(&state, team.team.id).await, 1);
}

#[tokio::test]
async fn test_leader_cannot_leave() {
    let state = test_state().await;
    let leader = participant();
    let team = create_team(&state, &leader, "Team Alpha").await;

    let err = handlers::leave_team_handler(&state, leader, team.team.id, CONFIRMED)
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_kick_member() {
    let state = test_state().await;
    let leader = participant();
    let member = participant();
    let other = participant();
    let team = create_team(&state, &leader, "Team Alpha").await;
    join(&state, &team, &member).await;
    join(&state, &team, &other).await;

    // Only the leader may kick
    let err = handlers::kick_member_handler(&state, member.clone(), team.team.id, other.id, CONFIRMED)
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::FORBIDDEN);

    // The leader cannot be kicked
    assert!(handlers::kick_member_handler(&state, leader.clone(), team.team.id, leader.id, CONFIRMED)
        .await
        .is_err());

    // Confirmation is required
    assert!(handlers::kick_member_handler(
        &state,
        leader.clone(),
        team.team.id,
        member.id,
        ConfirmRequest::default()
    )
    .await
    .is_err());

    let view = handlers::kick_member_handler(&state, leader.clone(), team.team.id, member.id, CONFIRMED)
        .await
        .unwrap()
        .0
        .team;
    assert_eq!(view.flags.member_count, 2);
    assert!(view.members.iter().all(|m| m.user_id != member.id));

    let err = handlers::kick_member_handler(&state, leader.clone(), team.team.id, member.id, CONFIRMED)
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_toggle_status() {
    let state = test_state().await;
    let leader = participant();
    let team = create_team(&state, &leader, "Team Alpha").await;

    let opened = handlers::toggle_status_handler(&state, leader.clone(), team.team.id)
        .await
        .unwrap()
        .0
        .team;
    assert_eq!(opened.team.status, TeamStatus::Open);

    let drafted = handlers::toggle_status_handler(&state, leader.clone(), team.team.id)
        .await
        .unwrap()
        .0
        .team;
    assert_eq!(drafted.team.status, TeamStatus::Draft);

    let err = handlers::toggle_status_handler(&state, participant(), team.team.id)
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_open_teams_excludes_locked_and_full() {
    let state = test_state().await;
    let browser = participant();

    let open = create_team(&state, &participant(), "Open Team").await;

    let full = create_team(&state, &participant(), "Full Team").await;
    join(&state, &full, &participant()).await;
    join(&state, &full, &participant()).await;

    let locked_leader = participant();
    let (locked, _) = ready_team(&state, &locked_leader, "Locked Team").await;
    handlers::lock_team_handler(&state, locked_leader, locked.team.id)
        .await
        .unwrap();

    let listed = handlers::list_open_teams_handler(&state, browser).await.unwrap().0.teams;
    let ids: Vec<Uuid> = listed.iter().map(|t| t.team.id).collect();
    assert_eq!(ids, vec![open.team.id]);
    assert_eq!(listed[0].member_count, 1);
    // Outsiders do not see join codes
    assert!(listed[0].team.join_code.is_none());
}

#[tokio::test]
async fn test_my_teams() {
    let state = test_state().await;
    let user = participant();
    let led = create_team(&state, &user, "Led Team").await;
    let other = create_team(&state, &participant(), "Joined Team").await;
    join(&state, &other, &user).await;
    create_team(&state, &participant(), "Unrelated Team").await;

    let mine = handlers::my_teams_handler(&state, user).await.unwrap().0.teams;
    let mut ids: Vec<Uuid> = mine.iter().map(|t| t.team.id).collect();
    ids.sort();
    let mut expected = vec![led.team.id, other.team.id];
    expected.sort();
    assert_eq!(ids, expected);
    assert!(mine.iter().all(|t| t.team.join_code.is_some()));
}

#[tokio::test]
async fn test_update_team() {
    let state = test_state().await;
    let leader = participant();
    let team = create_team(&state, &leader, "Team Alpha").await;

    let updated = handlers::update_team_handler(
        &state,
        leader.clone(),
        team.team.id,
        UpdateTeamRequest {
            name: Some("Team Omega".to_string()),
            description: Some("Shipping fast".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .0
    .team;
    assert_eq!(updated.team.name, "Team Omega");
    assert_eq!(updated.team.description.as_deref(), Some("Shipping fast"));

    let err = handlers::update_team_handler(&state, participant(), team.team.id, UpdateTeamRequest::default())
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_delete_team_cascades() {
    let state = test_state().await;
    let leader = participant();
    let member = participant();
    let team = create_team(&state, &leader, "Team Alpha").await;
    join(&state, &team, &member).await;

    let err = handlers::delete_team_handler(&state, member.clone(), team.team.id)
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::FORBIDDEN);

    handlers::delete_team_handler(&state, leader.clone(), team.team.id)
        .await
        .unwrap();

    assert!(Teams::find_by_id(team.team.id).one(&state.db).await.unwrap().is_none());
    assert_eq!(member_count(&state, team.team.id).await, 0);

    let err = handlers::get_team_handler(&state, leader, team.team.id).await.unwrap_err();
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
}

async fn create_request(state: &AppState, name: &str) -> CreateTeamRequest {
    CreateTeamRequest {
        name:          name.to_string(),
        description:   None,
        tech_stack_id: active_stack(state).await,
    }
}

#[tokio::test]
async fn test_join_code_collision_is_retried() {
    let state = test_state().await;
    let req = create_request(&state, "First Team").await;
    handlers::create_team_with_codes(&state, participant(), req, || "TAKEN1".to_string())
        .await
        .unwrap();

    let mut codes = vec!["FRESH1".to_string(), "TAKEN1".to_string()];
    let leader = participant();
    let req = create_request(&state, "Second Team").await;
    let view = handlers::create_team_with_codes(&state, leader.clone(), req, move || codes.pop().unwrap_or_default())
        .await
        .unwrap()
        .0
        .team;

    assert_eq!(view.team.join_code.as_deref(), Some("FRESH1"));
    assert_eq!(view.members.len(), 1);
    assert_eq!(view.members[0].user_id, leader.id);
}

#[tokio::test]
async fn test_join_code_collisions_give_up_after_attempts() {
    let state = test_state().await;
    let req = create_request(&state, "First Team").await;
    handlers::create_team_with_codes(&state, participant(), req, || "TAKEN1".to_string())
        .await
        .unwrap();

    let mut attempts = 0;
    let leader = participant();
    let req = create_request(&state, "Second Team").await;
    let err = handlers::create_team_with_codes(&state, leader.clone(), req, || {
        attempts += 1;
        "TAKEN1".to_string()
    })
    .await
    .unwrap_err();

    assert_eq!(err.status(), StatusCode::CONFLICT);
    assert_eq!(attempts, handlers::JOIN_CODE_ATTEMPTS);
    assert_eq!(Teams::find().count(&state.db).await.unwrap(), 1);
    let orphaned = TeamMembers::find()
        .filter(team_members::Column::UserId.eq(leader.id))
        .count(&state.db)
        .await
        .unwrap();
    assert_eq!(orphaned, 0);
}

#[tokio::test]
async fn test_membership_insert_rechecks_capacity() {
    let state = test_state().await;
    let team = create_team(&state, &participant(), "Team Alpha").await;
    let id = team.team.id;
    let model = Teams::find_by_id(id).one(&state.db).await.unwrap().unwrap();
    join(&state, &team, &participant()).await;

    // Authorized while one slot was still free
    let late = participant();
    let roster = TeamMembers::find()
        .filter(team_members::Column::TeamId.eq(id))
        .all(&state.db)
        .await
        .unwrap();
    assert!(lifecycle::authorize(&model, &roster, late.id, TeamAction::Join).is_ok());

    // Someone else takes the last slot first
    join(&state, &team, &participant()).await;

    let err = handlers::insert_membership(&state.db, &model, late.id).await.unwrap_err();
    assert_eq!(err.status(), StatusCode::CONFLICT);
    assert_eq!(err.message(), "This team is full.");
    assert_eq!(member_count(&state, id).await, 3);

    let late_rows = TeamMembers::find()
        .filter(team_members::Column::UserId.eq(late.id))
        .count(&state.db)
        .await
        .unwrap();
    assert_eq!(late_rows, 0);
}

#[tokio::test]
async fn test_membership_insert_maps_unique_index_to_already_member() {
    let state = test_state().await;
    let leader = participant();
    let team = create_team(&state, &leader, "Team Alpha").await;
    let model = Teams::find_by_id(team.team.id).one(&state.db).await.unwrap().unwrap();

    let err = handlers::insert_membership(&state.db, &model, leader.id).await.unwrap_err();
    assert_eq!(err.status(), StatusCode::CONFLICT);
    assert_eq!(err.message(), ALREADY_MEMBER);
    assert_eq!(member_count(&state, team.team.id).await, 1);
}
