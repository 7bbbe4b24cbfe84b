//! Entity definitions for Hackforge
//!
//! This crate contains Sea-ORM entity definitions for the team lifecycle tables.

pub mod sea_orm_active_enums;
pub mod team_members;
pub use team_members::Entity as TeamMembers;
pub mod team_settings;
pub use team_settings::Entity as TeamSettings;
pub mod teams;
pub use teams::Entity as Teams;
pub mod technology_stacks;
pub use technology_stacks::Entity as TechnologyStacks;
