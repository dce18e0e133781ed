//! Authentication and authorization
//!
//! Bearer JWTs (HS256) identify the caller; the `admin` role unlocks
//! administrative routes and lets the caller manage any booking.

pub mod jwt;
pub mod middleware;

pub use jwt::{create_token, verify_token, Claims, JwtConfig};
pub use middleware::{admin_middleware, auth_middleware, AuthState, AuthenticatedUser};
