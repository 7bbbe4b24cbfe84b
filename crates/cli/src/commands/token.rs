//! # CLI Token Command
//!
//! Issues a signed access token with the configured JWT settings so the API
//! can be exercised without an identity provider.

use auth::{create_access_token, JwtConfig, Role};
use error::{AppError, Result};
use tracing::info;
use uuid::Uuid;

use crate::commands::TokenArgs;

/// Issue a token for `args`, returning the subject id and the token.
pub fn issue(config: &JwtConfig, args: &TokenArgs) -> Result<(Uuid, String)> {
    config.validate()?;

    let roles = args
        .roles
        .iter()
        .map(|r| r.trim().parse::<Role>())
        .collect::<Result<Vec<Role>>>()?;
    if roles.is_empty() {
        return Err(AppError::validation("At least one role is required"));
    }

    let user_id = args.user_id.unwrap_or_else(Uuid::new_v4);
    let token = create_access_token(config, user_id, &args.email, &roles)?;

    info!(target: "token", %user_id, roles = ?roles, "Issued access token");
    Ok((user_id, token))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JwtConfig {
        JwtConfig {
            secret:             auth::generate_secret(),
            expiration_seconds: 600,
            issuer:             "hackforge".to_string(),
            audience:           "hackforge-api".to_string(),
        }
    }

    #[test]
    fn test_issued_token_validates() {
        let config = config();
        let user_id = Uuid::new_v4();
        let args = TokenArgs {
            user_id: Some(user_id),
            email:   "lead@example.com".to_string(),
            roles:   vec!["participant".to_string(), " admin".to_string()],
        };

        let (subject, token) = issue(&config, &args).unwrap();
        assert_eq!(subject, user_id);

        let claims = auth::validate_token(&config, &token).unwrap();
        assert_eq!(claims.user_id().unwrap(), user_id);
        assert_eq!(claims.roles(), vec![Role::Participant, Role::Admin]);
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let args = TokenArgs {
            user_id: None,
            email:   "x@example.com".to_string(),
            roles:   vec!["judge".to_string()],
        };
        assert!(issue(&config(), &args).is_err());
    }
}
