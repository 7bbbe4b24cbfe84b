//! # Hackforge Database Migrations
//!
//! Schema migrations and reference-data seeds. Every migration is written so
//! that it runs unchanged against PostgreSQL and SQLite.

pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_technology_stacks_table;
mod m20260301_000002_create_teams_table;
mod m20260301_000003_create_team_members_table;
mod m20260301_000004_create_team_settings_table;
pub mod migrator;
pub mod seeds;

pub use migrator::Migrator;

/// Connection type shared by migrations and seeds.
pub type SeaDb = sea_orm::DatabaseConnection;

/// Database connection helper for CLI usage
pub async fn connect_to_database(database_url: &str) -> Result<SeaDb, DbErr> {
    sea_orm::Database::connect(database_url).await
}
