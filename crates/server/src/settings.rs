//! # Team Settings
//!
//! The single settings row that gates team creation and joining and supplies
//! the default team size. A missing row behaves like the seeded defaults.

use auth::Role;
use axum::Json;
use chrono::Utc;
use entity::{
    team_settings::{self, SETTINGS_ROW_ID},
    TeamSettings,
};
use error::{AppError, Result};
use migration::seeds::DEFAULT_MAX_MEMBERS;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, Set};
use tracing::info;
use validator::Validate;

use crate::{
    dto::settings::{SettingsResponse, UpdateSettingsRequest},
    middleware::auth::CurrentUser,
    AppState,
};

fn defaults() -> team_settings::Model {
    team_settings::Model {
        id:                  SETTINGS_ROW_ID,
        default_max_members: DEFAULT_MAX_MEMBERS,
        team_creation_open:  true,
        joining_open:        true,
        updated_at:          Utc::now(),
    }
}

/// Current settings, falling back to defaults when the row was never seeded.
pub async fn load_settings<C: ConnectionTrait>(db: &C) -> Result<team_settings::Model> {
    Ok(TeamSettings::find_by_id(SETTINGS_ROW_ID)
        .one(db)
        .await?
        .unwrap_or_else(defaults))
}

/// Fails with `Forbidden` when team creation is closed.
pub async fn ensure_creation_open<C: ConnectionTrait>(db: &C) -> Result<team_settings::Model> {
    let settings = load_settings(db).await?;
    if !settings.team_creation_open {
        return Err(AppError::forbidden("Team creation is currently closed."));
    }
    Ok(settings)
}

/// Fails with `Forbidden` when joining teams is closed.
pub async fn ensure_joining_open<C: ConnectionTrait>(db: &C) -> Result<()> {
    if !load_settings(db).await?.joining_open {
        return Err(AppError::forbidden("Joining teams is currently closed."));
    }
    Ok(())
}

/// Get team settings (admin only)
pub async fn get_settings_handler(state: &AppState, user: CurrentUser) -> Result<Json<SettingsResponse>> {
    user.require_role(Role::Admin)?;
    Ok(Json(load_settings(&state.db).await?.into()))
}

/// Update team settings (admin only)
///
/// Only the fields present in the request change.
pub async fn update_settings_handler(
    state: &AppState,
    user: CurrentUser,
    req: UpdateSettingsRequest,
) -> Result<Json<SettingsResponse>> {
    user.require_role(Role::Admin)?;
    req.validate()?;

    let existing = TeamSettings::find_by_id(SETTINGS_ROW_ID)
        .one(&state.db)
        .await?;
    let is_new = existing.is_none();
    let current = existing.unwrap_or_else(defaults);

    let mut model: team_settings::ActiveModel = current.into();
    if let Some(size) = req.default_max_members {
        model.default_max_members = Set(size);
    }
    if let Some(open) = req.team_creation_open {
        model.team_creation_open = Set(open);
    }
    if let Some(open) = req.joining_open {
        model.joining_open = Set(open);
    }
    model.updated_at = Set(Utc::now());

    let saved = if is_new {
        model.reset_all().insert(&state.db).await?
    }
    else {
        model.update(&state.db).await?
    };

    info!(
        user_id = %user.id,
        default_max_members = saved.default_max_members,
        team_creation_open = saved.team_creation_open,
        joining_open = saved.joining_open,
        "Team settings updated"
    );

    Ok(Json(saved.into()))
}
