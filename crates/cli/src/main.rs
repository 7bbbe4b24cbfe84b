//! # Hackforge CLI
//!
//! Command-line interface for the Hackforge team service.
//!
//! ## Usage
//!
//! ```bash
//! hackforge serve     # Start the API server (runs migrations automatically)
//! hackforge migrate   # Run database migrations
//! hackforge token --email lead@example.com --roles participant
//! hackforge --help    # Show help
//! ```

mod commands;
mod config;
mod server;

use clap::{CommandFactory as _, Parser};
use commands::Commands;
use error::{AppError, Result};

/// Hackforge - hackathon team formation service
#[derive(Parser, Debug)]
#[command(name = "hackforge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (debug, info, warn, error)
    #[arg(short = 'L', long, default_value = "info")]
    log_level: String,

    /// Output format (json, pretty, compact)
    #[arg(short, long, env = "HACKFORGE_LOG_FORMAT", default_value = "pretty")]
    log_format: String,

    /// Write logs to this file as well
    #[arg(long, env = "HACKFORGE_LOG_FILE")]
    log_file: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Completions go to stdout untouched by log output
    if let Commands::Completions(args) = &cli.command {
        return commands::completions::completions(args.shell, &mut Cli::command());
    }

    let _guard = logging::init(&cli.log_level, &cli.log_format, cli.log_file.as_deref())
        .map_err(|e| AppError::config(format!("Failed to initialize logging: {}", e)))?;

    tracing::info!(target: "app", command = ?cli.command, "Hackforge CLI starting...");

    match cli.command {
        Commands::Serve(args) => {
            let config = config::DatabaseConfig::from_env()?;
            server::serve(&config, &args).await?;
        },
        Commands::Migrate(args) => {
            let config = config::DatabaseConfig::from_env()?;
            commands::migrate::migrate(&config, args).await?;
        },
        Commands::Validate => commands::validate::validate()?,
        Commands::Token(args) => {
            let jwt = config::jwt_config_from_env()?;
            let (user_id, token) = commands::token::issue(&jwt, &args)?;
            println!("user_id: {}", user_id);
            println!("{}", token);
        },
        Commands::Completions(_) => {},
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_serve() {
        let cli = Cli::parse_from(["hackforge", "serve", "--host", "127.0.0.1", "--port", "8080"]);
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.host, "127.0.0.1");
                assert_eq!(args.port, 8080);
            },
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["hackforge", "validate"]);
        assert_eq!(cli.log_level, "info");
        assert!(matches!(cli.command, Commands::Validate));
    }

    #[test]
    fn test_migrate_flags() {
        let cli = Cli::parse_from(["hackforge", "migrate", "--rollback"]);
        match cli.command {
            Commands::Migrate(args) => {
                assert!(args.rollback);
                assert!(!args.dry_run);
            },
            _ => panic!("Expected Migrate command"),
        }

        assert!(Cli::try_parse_from(["hackforge", "migrate", "--rollback", "--dry-run"]).is_err());
    }

    #[test]
    fn test_token_roles_are_comma_separated() {
        let cli = Cli::parse_from([
            "hackforge",
            "token",
            "--email",
            "mentor@example.com",
            "--roles",
            "mentor,admin",
        ]);
        match cli.command {
            Commands::Token(args) => {
                assert_eq!(args.roles, vec!["mentor", "admin"]);
                assert!(args.user_id.is_none());
            },
            _ => panic!("Expected Token command"),
        }
    }

    #[test]
    fn test_token_default_role() {
        let cli = Cli::parse_from(["hackforge", "token", "--email", "p@example.com"]);
        match cli.command {
            Commands::Token(args) => assert_eq!(args.roles, vec!["participant"]),
            _ => panic!("Expected Token command"),
        }
    }

    #[test]
    fn test_cli_command_factory() {
        Cli::command().debug_assert();
        assert_eq!(Cli::command().get_name(), "hackforge");
    }
}
