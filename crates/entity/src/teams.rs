//! Teams Entity
//!
//! A hackathon team. The leader is always a member; `join_code` is the unique
//! key used for code-based joining.
//!
//! CUSTOMIZATION REGION START: teams_entity_custom_types
//! This region is preserved during entity regeneration. Add custom types and implementations here.
//! CUSTOMIZATION REGION END

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub use super::sea_orm_active_enums::TeamStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "teams")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id:             Uuid,
    pub name:           String,
    pub description:    Option<String>,
    pub status:         TeamStatus,
    #[sea_orm(unique)]
    pub join_code:      String,
    pub leader_id:      Uuid,
    pub mentor_id:      Option<Uuid>,
    pub tech_stack_id:  Uuid,
    pub max_members:    i32,
    pub repository_url: Option<String>,
    pub created_at:     ChronoDateTimeUtc,
    pub updated_at:     ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::team_members::Entity")]
    TeamMembers,
    #[sea_orm(
        belongs_to = "super::technology_stacks::Entity",
        from = "Column::TechStackId",
        to = "super::technology_stacks::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    TechnologyStack,
}

impl Related<super::team_members::Entity> for Entity {
    fn to() -> RelationDef { Relation::TeamMembers.def() }
}

impl Related<super::technology_stacks::Entity> for Entity {
    fn to() -> RelationDef { Relation::TechnologyStack.def() }
}

impl ActiveModelBehavior for ActiveModel {}

// CUSTOMIZATION REGION START: teams_entity_methods
impl Model {
    /// Whether the roster is frozen for member-facing actions.
    pub fn is_locked(&self) -> bool { self.status == TeamStatus::Locked }

    /// Whether `user_id` is this team's leader.
    pub fn is_led_by(&self, user_id: Uuid) -> bool { self.leader_id == user_id }
}
// CUSTOMIZATION REGION END
