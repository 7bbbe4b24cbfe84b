//! # Database Migrator
//!
//! Implements the Sea-ORM migrator trait. Migrations execute in list order and
//! their history is tracked in `seaql_migrations`.

use sea_orm_migration::prelude::*;

use crate::{
    m20260301_000001_create_technology_stacks_table,
    m20260301_000002_create_teams_table,
    m20260301_000003_create_team_members_table,
    m20260301_000004_create_team_settings_table,
};

/// The main migrator that coordinates all migration operations
///
/// # Example
///
/// ```rust,ignore
/// use migration::{Migrator, MigratorTrait};
///
/// Migrator::up(&db, None).await?;
/// ```
#[derive(Debug)]
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    /// Add new migrations to the end of this list.
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_technology_stacks_table::Migration),
            Box::new(m20260301_000002_create_teams_table::Migration),
            Box::new(m20260301_000003_create_team_members_table::Migration),
            Box::new(m20260301_000004_create_team_settings_table::Migration),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_count() {
        assert_eq!(Migrator::migrations().len(), 4);
    }

    #[test]
    fn test_migration_names_are_ordered() {
        let names: Vec<String> = Migrator::migrations()
            .iter()
            .map(|m| m.name().to_string())
            .collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }
}
