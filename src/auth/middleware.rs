//! Authentication middleware for Axum

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use super::jwt::{verify_token, AuthError, Claims, JwtConfig};
use crate::domain::Actor;

/// Authentication state
#[derive(Clone)]
pub struct AuthState {
    pub jwt_config: JwtConfig,
}

/// Authenticated caller, inserted into request extensions
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub username: String,
    pub role: String,
    pub actor: Actor,
}

impl AuthenticatedUser {
    pub fn from_claims(claims: Claims) -> Self {
        let actor = claims.actor();
        Self {
            user_id: claims.sub,
            username: claims.username,
            role: claims.role,
            actor,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.actor.is_admin
    }
}

fn extract_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

/// JWT authentication middleware - requires a valid bearer token
pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let Some(auth_header) = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    else {
        return auth_error_response(AuthError::MissingToken);
    };

    let Some(token) = extract_token(auth_header) else {
        return auth_error_response(AuthError::InvalidToken);
    };

    match verify_token(token, &auth_state.jwt_config) {
        Ok(claims) => {
            if claims.is_expired() {
                return auth_error_response(AuthError::ExpiredToken);
            }
            let user = AuthenticatedUser::from_claims(claims);
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(_) => auth_error_response(AuthError::InvalidToken),
    }
}

/// Admin-only middleware - must be layered inside auth_middleware
pub async fn admin_middleware(request: Request<Body>, next: Next) -> Response {
    match request.extensions().get::<AuthenticatedUser>() {
        Some(user) if user.is_admin() => next.run(request).await,
        Some(_) => auth_error_response(AuthError::InsufficientPermissions),
        None => auth_error_response(AuthError::MissingToken),
    }
}

fn auth_error_response(error: AuthError) -> Response {
    let (status, code) = match error {
        AuthError::MissingToken => (StatusCode::UNAUTHORIZED, "MISSING_TOKEN"),
        AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "INVALID_TOKEN"),
        AuthError::ExpiredToken => (StatusCode::UNAUTHORIZED, "EXPIRED_TOKEN"),
        AuthError::InsufficientPermissions => (StatusCode::FORBIDDEN, "ACCESS_DENIED"),
    };

    let body = Json(json!({
        "success": false,
        "error": error.to_string(),
        "code": code,
    }));

    (status, body).into_response()
}
