//! # CLI Migration Command
//!
//! Applies, previews or rolls back schema migrations. Applying also runs the
//! idempotent seeds.

use error::{AppError, Result};
use migration::{seeds::run_all_seeds, Migrator, MigratorTrait as _};
use tracing::{info, warn};

use crate::{commands::MigrateArgs, config::DatabaseConfig};

/// Runs database migrations
pub async fn migrate(config: &DatabaseConfig, args: MigrateArgs) -> Result<()> {
    info!(
        target: "migrate",
        dry_run = %args.dry_run,
        rollback = %args.rollback,
        "Running database migrations..."
    );

    let db = migration::connect_to_database(&config.database_url())
        .await
        .map_err(|e| AppError::database(format!("Failed to connect to database: {}", e)))?;

    if args.dry_run {
        let pending = Migrator::get_pending_migrations(&db)
            .await
            .map_err(|e| AppError::migration(format!("Failed to get pending migrations: {}", e)))?;

        info!(target: "migrate", pending_count = %pending.len(), "Pending migrations found");
        for m in &pending {
            info!(target: "migrate", migration = %m.name(), "Would apply");
        }
        return Ok(());
    }

    if args.rollback {
        info!(target: "migrate", "Rolling back the last migration...");
        Migrator::down(&db, Some(1))
            .await
            .map_err(|e| AppError::migration(format!("Failed to rollback migration: {}", e)))?;
        info!(target: "migrate", "Rollback completed successfully");
        return Ok(());
    }

    Migrator::up(&db, None)
        .await
        .map_err(|e| AppError::migration(format!("Failed to run migrations: {}", e)))?;
    info!(target: "migrate", "Migrations completed successfully");

    let results = run_all_seeds(&db, true).await?;
    for result in results.iter().filter(|r| !r.errors.is_empty()) {
        warn!(target: "migrate", seed = %result.seed_name, errors = ?result.errors, "Seed reported errors");
    }
    Ok(())
}
