//! # Technology Stack DTOs

use entity::{sea_orm_active_enums::StackStatus, technology_stacks};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Query for listing stacks
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct StackListQuery {
    /// Include inactive stacks (admins only)
    #[serde(default)]
    pub include_inactive: bool,
}

/// Request to create a stack
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct CreateStackRequest {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Stack name must be between 1 and 100 characters"
    ))]
    pub name:     String,
    #[validate(url(message = "Icon URL must be a valid URL"))]
    pub icon_url: Option<String>,
}

/// Request to change a stack's availability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SetStackStatusRequest {
    pub status: StackStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackResponse {
    pub id:       Uuid,
    pub name:     String,
    pub icon_url: Option<String>,
    pub status:   StackStatus,
}

impl From<technology_stacks::Model> for StackResponse {
    fn from(stack: technology_stacks::Model) -> Self {
        Self {
            id:       stack.id,
            name:     stack.name,
            icon_url: stack.icon_url,
            status:   stack.status,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StackListResponse {
    pub success: bool,
    pub stacks:  Vec<StackResponse>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StackDetailResponse {
    pub success: bool,
    pub stack:   StackResponse,
}
