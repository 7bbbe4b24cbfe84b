//! String-backed enums shared by the entities.
//!
//! Stored as plain strings rather than database enum types so the schema runs
//! unchanged on PostgreSQL and SQLite.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Team lifecycle status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum TeamStatus {
    /// Initial status. Still joinable, but the leader has not marked it open
    #[sea_orm(string_value = "draft")]
    Draft,
    /// Advertised as looking for members
    #[sea_orm(string_value = "open")]
    Open,
    /// Roster frozen by the leader
    #[sea_orm(string_value = "locked")]
    Locked,
    /// Accepted into the event by an admin
    #[sea_orm(string_value = "active")]
    Active,
    /// Waiting for a mentor assignment
    #[sea_orm(string_value = "pending_mentor")]
    PendingMentor,
}

impl TeamStatus {
    /// The stored string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            TeamStatus::Draft => "draft",
            TeamStatus::Open => "open",
            TeamStatus::Locked => "locked",
            TeamStatus::Active => "active",
            TeamStatus::PendingMentor => "pending_mentor",
        }
    }

    /// Parse a status name, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "draft" => Some(TeamStatus::Draft),
            "open" => Some(TeamStatus::Open),
            "locked" => Some(TeamStatus::Locked),
            "active" => Some(TeamStatus::Active),
            "pending_mentor" => Some(TeamStatus::PendingMentor),
            _ => None,
        }
    }
}

impl std::fmt::Display for TeamStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(self.as_str()) }
}

/// Availability of a technology stack
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum StackStatus {
    /// Selectable when creating a team
    #[sea_orm(string_value = "active")]
    Active,
    /// Kept for existing teams, hidden from new ones
    #[sea_orm(string_value = "inactive")]
    Inactive,
}

impl std::fmt::Display for StackStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StackStatus::Active => write!(f, "active"),
            StackStatus::Inactive => write!(f, "inactive"),
        }
    }
}
