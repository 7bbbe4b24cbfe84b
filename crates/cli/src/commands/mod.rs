//! # CLI Commands
//!
//! Implementation of CLI commands for the Hackforge service.

pub mod completions;
pub mod migrate;
pub mod token;
pub mod validate;

use clap::{Args, Subcommand};
use uuid::Uuid;

/// Available commands for the Hackforge CLI
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the API server
    Serve(ServeArgs),

    /// Run database migrations
    Migrate(MigrateArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),

    /// Verify configuration
    Validate,

    /// Issue an access token for local testing
    Token(TokenArgs),
}

/// Arguments for the serve command
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Server host to bind to
    #[arg(long, env = "HACKFORGE_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Server port to bind to
    #[arg(short, long, env = "HACKFORGE_PORT", default_value = "3000")]
    pub port: u16,
}

/// Arguments for the migrate command
#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// List pending migrations without applying them
    #[arg(long, conflicts_with = "rollback")]
    pub dry_run: bool,

    /// Rollback the last migration
    #[arg(long)]
    pub rollback: bool,
}

/// Arguments for the completions command
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

/// Arguments for the token command
#[derive(Args, Debug)]
pub struct TokenArgs {
    /// Subject user id; a random one when omitted
    #[arg(long)]
    pub user_id: Option<Uuid>,

    /// Email claim
    #[arg(long)]
    pub email: String,

    /// Roles to grant (participant, mentor, admin)
    #[arg(long, value_delimiter = ',', default_value = "participant")]
    pub roles: Vec<String>,
}
