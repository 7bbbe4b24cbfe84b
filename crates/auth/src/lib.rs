//! # Authentication
//!
//! Bearer-token handling for the Hackforge API:
//! - HS256 JWT issuance and validation
//! - Platform roles carried in the token

pub mod jwt;
pub mod roles;

pub use error::Result;
pub use jwt::{create_access_token, extract_bearer_token, generate_secret, validate_token, Claims, JwtConfig};
pub use roles::Role;
