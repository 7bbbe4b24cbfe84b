//! # Authentication Middleware
//!
//! JWT authentication middleware for protecting API endpoints.

use auth::{extract_bearer_token, validate_token, Claims, Role};
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use error::{AppError, Result};
use uuid::Uuid;

use crate::AppState;

/// The caller, as established from a validated access token.
///
/// Inserted into request extensions by [`auth_middleware`] and passed to every
/// handler explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    /// User ID
    pub id:    Uuid,
    /// User email
    pub email: String,
    /// User roles
    pub roles: Vec<Role>,
}

impl CurrentUser {
    /// Build from validated claims.
    ///
    /// # Errors
    ///
    /// Returns `JwtInvalidToken` if the subject is not a UUID.
    pub fn from_claims(claims: &Claims) -> Result<Self> {
        Ok(Self {
            id:    claims.user_id()?,
            email: claims.email.clone(),
            roles: claims.roles(),
        })
    }

    pub fn has_role(&self, role: Role) -> bool { self.roles.contains(&role) }

    pub fn is_admin(&self) -> bool { self.has_role(Role::Admin) }

    /// Fails with `Forbidden` unless the user holds `role`.
    pub fn require_role(&self, role: Role) -> Result<()> { self.require_any(&[role]) }

    /// Fails with `Forbidden` unless the user holds one of `roles`.
    pub fn require_any(&self, roles: &[Role]) -> Result<()> {
        if roles.iter().any(|r| self.has_role(*r)) {
            return Ok(());
        }
        let names: Vec<&str> = roles.iter().map(Role::as_str).collect();
        Err(AppError::forbidden(format!(
            "This action requires the {} role.",
            names.join(" or ")
        )))
    }
}

/// Authentication middleware
///
/// Validates the Bearer token and adds a [`CurrentUser`] to the request
/// extensions. Requests with a missing or invalid token are rejected with 401.
pub async fn auth_middleware(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let user = match authenticate(&state, &request) {
        Ok(user) => user,
        Err(e) => return e.into_response(),
    };

    request.extensions_mut().insert(user);
    next.run(request).await
}

fn authenticate(state: &AppState, request: &Request) -> Result<CurrentUser> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| AppError::unauthorized("Missing authorization header"))?
        .to_str()
        .map_err(|_| AppError::unauthorized("Invalid authorization header encoding"))?;

    let token = extract_bearer_token(auth_header)
        .ok_or_else(|| AppError::unauthorized("Invalid authorization header format"))?;

    let claims = validate_token(&state.jwt_config, &token)?;
    CurrentUser::from_claims(&claims)
}
