//! # Seed Data Management
//!
//! Reference data the service expects to exist: the single team settings row
//! and a starter set of technology stacks. Seeds are idempotent and only insert
//! rows that are missing.

use std::time::Instant;

use ::error::{AppError, SeedResult};
use entity::{
    sea_orm_active_enums::StackStatus,
    team_settings::{self, SETTINGS_ROW_ID},
    technology_stacks,
    TeamSettings,
    TechnologyStacks,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};

use crate::SeaDb;

/// Default team size applied when no setting has been changed.
pub const DEFAULT_MAX_MEMBERS: i32 = 3;

/// Stacks available on a fresh install.
pub const STARTER_STACKS: &[&str] = &["MERN", "Python / Django", "Rust", "Java / Spring", "Mobile (Flutter)"];

/// Trait for seed data providers
#[async_trait::async_trait]
pub trait SeedProvider {
    /// The name of this seed
    fn name(&self) -> &str;

    /// Runs the seed operation
    ///
    /// # Errors
    ///
    /// Returns an error if the seed operation fails.
    async fn run(&self, db: &SeaDb) -> Result<SeedResult, AppError>;
}

/// Inserts the team settings row with defaults.
#[derive(Debug, Default)]
pub struct TeamSettingsSeed;

#[async_trait::async_trait]
impl SeedProvider for TeamSettingsSeed {
    fn name(&self) -> &str { "team_settings" }

    async fn run(&self, db: &SeaDb) -> Result<SeedResult, AppError> {
        let started = Instant::now();
        if TeamSettings::find_by_id(SETTINGS_ROW_ID).one(db).await?.is_some() {
            return Ok(SeedResult::success(self.name(), 0, elapsed_ms(started)));
        }

        team_settings::ActiveModel {
            id:                  Set(SETTINGS_ROW_ID),
            default_max_members: Set(DEFAULT_MAX_MEMBERS),
            team_creation_open:  Set(true),
            joining_open:        Set(true),
            updated_at:          Set(chrono::Utc::now()),
        }
        .insert(db)
        .await?;

        Ok(SeedResult::success(self.name(), 1, elapsed_ms(started)))
    }
}

/// Inserts any missing starter technology stacks.
#[derive(Debug, Default)]
pub struct TechnologyStackSeed;

#[async_trait::async_trait]
impl SeedProvider for TechnologyStackSeed {
    fn name(&self) -> &str { "technology_stacks" }

    async fn run(&self, db: &SeaDb) -> Result<SeedResult, AppError> {
        let started = Instant::now();
        let mut inserted = 0;

        for name in STARTER_STACKS {
            let existing = TechnologyStacks::find()
                .filter(technology_stacks::Column::Name.eq(*name))
                .one(db)
                .await?;
            if existing.is_some() {
                continue;
            }

            technology_stacks::ActiveModel {
                id:         Set(uuid::Uuid::new_v4()),
                name:       Set((*name).to_string()),
                icon_url:   Set(None),
                status:     Set(StackStatus::Active),
                created_at: Set(chrono::Utc::now()),
            }
            .insert(db)
            .await?;
            inserted += 1;
        }

        Ok(SeedResult::success(self.name(), inserted, elapsed_ms(started)))
    }
}

fn elapsed_ms(started: Instant) -> u64 { u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX) }

/// Runs all registered seed providers
///
/// A failing seed is recorded in its [`SeedResult`] and the remaining seeds
/// still run.
///
/// # Errors
///
/// Currently infallible at the aggregate level; per-seed failures are reported
/// in the returned results.
pub async fn run_all_seeds(db: &SeaDb, verbose: bool) -> Result<Vec<SeedResult>, AppError> {
    let providers: Vec<Box<dyn SeedProvider + Send + Sync>> =
        vec![Box::new(TeamSettingsSeed), Box::new(TechnologyStackSeed)];

    let mut results = Vec::with_capacity(providers.len());
    for provider in providers {
        let result = match provider.run(db).await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(seed = provider.name(), error = %e, "Seed failed");
                SeedResult::with_error(provider.name(), &e.to_string())
            },
        };
        if verbose {
            tracing::info!(
                seed = %result.seed_name,
                inserted = result.inserted_count,
                duration_ms = result.duration_ms,
                "Seed finished"
            );
        }
        results.push(result);
    }

    Ok(results)
}
