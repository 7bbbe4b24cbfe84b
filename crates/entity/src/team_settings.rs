//! Team Settings Entity
//!
//! Single-row platform switches for team formation.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Primary key of the only settings row.
pub const SETTINGS_ROW_ID: i32 = 1;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "team_settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id:                  i32,
    pub default_max_members: i32,
    pub team_creation_open:  bool,
    pub joining_open:        bool,
    pub updated_at:          ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
