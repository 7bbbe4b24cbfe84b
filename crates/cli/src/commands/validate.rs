//! # CLI Validate Command
//!
//! Checks that the environment holds a usable configuration and reports every
//! problem at once.

use error::{AppError, Result};
use tracing::info;

use crate::config::{jwt_config_from_env, repository_config_from_env, DatabaseConfig};

/// A database is configured either by URL or by the discrete variables.
const DATABASE_VARS: [&str; 4] = [
    "HACKFORGE_DATABASE_HOST",
    "HACKFORGE_DATABASE_NAME",
    "HACKFORGE_DATABASE_USER",
    "HACKFORGE_DATABASE_PASSWORD",
];

fn is_set(name: &str) -> bool { std::env::var(name).is_ok_and(|v| !v.trim().is_empty()) }

/// Collect every configuration problem.
pub fn problems() -> Vec<String> {
    let mut problems = Vec::new();

    if !is_set("HACKFORGE_DATABASE_URL") {
        let missing: Vec<&str> = DATABASE_VARS.into_iter().filter(|v| !is_set(v)).collect();
        if !missing.is_empty() {
            problems.push(format!(
                "Set HACKFORGE_DATABASE_URL or the missing variables: {}",
                missing.join(", ")
            ));
        }
    }
    if let Err(e) = DatabaseConfig::from_env() {
        problems.push(e.to_string());
    }

    match jwt_config_from_env() {
        Ok(config) => {
            if let Err(e) = config.validate() {
                problems.push(e.message());
            }
        },
        Err(e) => problems.push(e.to_string()),
    }

    if let Err(e) = repository_config_from_env() {
        problems.push(e.to_string());
    }

    problems
}

/// Validates the CLI configuration
pub fn validate() -> Result<()> {
    let problems = problems();
    if !problems.is_empty() {
        return Err(AppError::validation(format!(
            "Invalid configuration: {}",
            problems.join("; ")
        )));
    }

    info!(target: "validate", "Configuration is valid");
    Ok(())
}
