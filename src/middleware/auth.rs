use axum::{
    extract::{FromRequestParts, Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{Validation, decode};
use uuid::Uuid;

use crate::{
    dto::auth::Claims,
    error::AppError,
    models::{ROLE_ADMIN, ROLE_USER},
    state::JwtKeys,
};

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub role: String,
}

impl AuthUser {
    pub fn has_role(&self, roles: &[&str]) -> bool {
        roles.contains(&self.role.as_str())
    }
}

/// Roles a router accepts. Used as the state of [`require_roles`].
#[derive(Debug, Clone, Copy)]
pub struct AllowedRoles(pub &'static [&'static str]);

pub const ADMIN_ONLY: AllowedRoles = AllowedRoles(&[ROLE_ADMIN]);
pub const USERS_ONLY: AllowedRoles = AllowedRoles(&[ROLE_USER]);

/// Rejects the request before the handler runs unless the caller's token carries an allowed role.
pub async fn require_roles(
    State(allowed): State<AllowedRoles>,
    user: AuthUser,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !user.has_role(allowed.0) {
        tracing::debug!(user_id = %user.user_id, role = %user.role, "role not allowed");
        return Err(AppError::forbidden());
    }
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;
    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".into()))?;

        let auth_str = auth_header
            .to_str()
            .map_err(|_| AppError::Unauthorized("Invalid Authorization header".into()))?;

        let token = auth_str
            .strip_prefix("Bearer ")
            .map(str::trim)
            .ok_or_else(|| AppError::Unauthorized("Invalid Authorization scheme".into()))?;

        let keys = parts
            .extensions
            .get::<JwtKeys>()
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("JWT keys are not configured")))?;

        let decoded = decode::<Claims>(token, &keys.decoding, &Validation::default())
            .map_err(|_| AppError::Unauthorized("Invalid or expired token".into()))?;

        let user_id = Uuid::parse_str(&decoded.claims.sub)
            .map_err(|_| AppError::Unauthorized("Invalid user id in token".into()))?;

        Ok(AuthUser {
            user_id,
            role: decoded.claims.role,
        })
    }
}
