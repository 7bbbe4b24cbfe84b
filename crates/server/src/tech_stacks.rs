//! # Technology Stack Handlers
//!
//! Listing is open to any authenticated user; creating stacks and changing
//! their availability is for admins.

use auth::Role;
use axum::Json;
use chrono::Utc;
use entity::{sea_orm_active_enums::StackStatus, technology_stacks, TechnologyStacks};
use error::{is_unique_violation, AppError, Result};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::tech_stacks::{
        CreateStackRequest,
        SetStackStatusRequest,
        StackDetailResponse,
        StackListQuery,
        StackListResponse,
    },
    middleware::auth::CurrentUser,
    AppState,
};

/// List technology stacks
///
/// Inactive stacks are included only when an admin asks for them.
pub async fn list_stacks_handler(
    state: &AppState,
    user: CurrentUser,
    query: StackListQuery,
) -> Result<Json<StackListResponse>> {
    let mut select = TechnologyStacks::find().order_by_asc(technology_stacks::Column::Name);
    if !(query.include_inactive && user.is_admin()) {
        select = select.filter(technology_stacks::Column::Status.eq(StackStatus::Active));
    }

    let stacks = select.all(&state.db).await?;

    Ok(Json(StackListResponse {
        success: true,
        stacks:  stacks.into_iter().map(Into::into).collect(),
    }))
}

/// Create a technology stack (admin only)
pub async fn create_stack_handler(
    state: &AppState,
    user: CurrentUser,
    req: CreateStackRequest,
) -> Result<Json<StackDetailResponse>> {
    user.require_role(Role::Admin)?;
    req.validate()?;

    let name = req.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::validation("Stack name must be between 1 and 100 characters"));
    }

    let stack = technology_stacks::ActiveModel {
        id:         Set(Uuid::new_v4()),
        name:       Set(name),
        icon_url:   Set(req.icon_url),
        status:     Set(StackStatus::Active),
        created_at: Set(Utc::now()),
    }
    .insert(&state.db)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::conflict("A technology stack with this name already exists.")
        }
        else {
            e.into()
        }
    })?;

    info!(stack_id = %stack.id, user_id = %user.id, name = %stack.name, "Technology stack created");

    Ok(Json(StackDetailResponse {
        success: true,
        stack:   stack.into(),
    }))
}

/// Activate or deactivate a technology stack (admin only)
///
/// Teams already using an inactive stack keep it.
pub async fn set_stack_status_handler(
    state: &AppState,
    user: CurrentUser,
    stack_id: Uuid,
    req: SetStackStatusRequest,
) -> Result<Json<StackDetailResponse>> {
    user.require_role(Role::Admin)?;

    let stack = TechnologyStacks::find_by_id(stack_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Technology stack not found"))?;

    let mut model: technology_stacks::ActiveModel = stack.into();
    model.status = Set(req.status);
    let updated = model.update(&state.db).await?;

    info!(stack_id = %stack_id, user_id = %user.id, status = %updated.status, "Technology stack status changed");

    Ok(Json(StackDetailResponse {
        success: true,
        stack:   updated.into(),
    }))
}

/// Resolve a stack a team may be created with or moved to.
pub(crate) async fn find_active_stack<C: sea_orm::ConnectionTrait>(db: &C, stack_id: Uuid) -> Result<technology_stacks::Model> {
    let stack = TechnologyStacks::find_by_id(stack_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found("Technology stack not found"))?;
    if stack.status != StackStatus::Active {
        return Err(AppError::bad_request("This technology stack is not available."));
    }
    Ok(stack)
}
