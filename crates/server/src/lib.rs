//! # Hackforge API Server
//!
//! Axum-based HTTP API for hackathon team formation.
//!
//! ## Modules
//!
//! - [`teams`]: team lifecycle rules, member-facing and admin handlers
//! - [`tech_stacks`]: technology stack reference data
//! - [`settings`]: platform switches for team formation
//! - [`repository`]: client for the repository provisioning function
//! - [`middleware`]: authentication, request ids, security headers
//! - [`router`]: API route configuration

use std::sync::Arc;

use ::auth::JwtConfig;

pub mod dto;
pub mod middleware;
pub mod repository;
pub mod router;
pub mod settings;
pub mod teams;
pub mod tech_stacks;
pub mod utils;

pub use repository::{RepositoryConfig, RepositoryProvisioner};
pub use router::create_app_router;

/// Application state shared across request handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection pool
    pub db:           sea_orm::DbConn,
    /// JWT configuration
    pub jwt_config:   JwtConfig,
    /// Repository provisioning backend
    pub repositories: Arc<dyn RepositoryProvisioner>,
    /// Server start time for uptime calculation
    pub start_time:   std::time::Instant,
}

impl AppState {
    pub fn new(db: sea_orm::DbConn, jwt_config: JwtConfig, repositories: Arc<dyn RepositoryProvisioner>) -> Self {
        Self {
            db,
            jwt_config,
            repositories,
            start_time: std::time::Instant::now(),
        }
    }
}
