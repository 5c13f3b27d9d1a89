//! Accounts: password hashing, API tokens, and the bearer-token extractor
//! protected routes use to resolve the calling user.

use crate::db_storage::UserStorage;
use crate::errors::AppError;
use crate::handlers::AppState;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use uuid::Uuid;

/// Salted SHA-256 digest of a password, hex encoded.
pub fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

pub fn verify_password(password: &str, salt: &str, expected_hash: &str) -> bool {
    hash_password(password, salt) == expected_hash
}

/// Fresh random salt for a new account.
pub fn generate_salt() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Opaque API token: SHA-256 over two fresh UUIDs, hex encoded.
pub fn generate_token() -> String {
    let mut hasher = Sha256::new();
    hasher.update(Uuid::new_v4().as_bytes());
    hasher.update(Uuid::new_v4().as_bytes());
    hex::encode(hasher.finalize())
}

/// The authenticated caller, resolved from the `Authorization: Bearer`
/// header. Token lookups are cached; a miss falls through to the database.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
}

#[axum::async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                AppError::Unauthorized("Access denied. No token provided.".to_string())
            })?;

        let token = header.strip_prefix("Bearer ").unwrap_or(header).trim();
        if token.is_empty() {
            return Err(AppError::Unauthorized(
                "Access denied. No token provided.".to_string(),
            ));
        }

        // Negative results are cached too, so a bad token does not hammer
        // the users table.
        if let Some(cached) = state.token_cache.get(token).await {
            return match cached {
                Some((id, email)) => Ok(AuthUser { id, email }),
                None => Err(AppError::Unauthorized(
                    "Invalid or expired token".to_string(),
                )),
            };
        }

        let user = UserStorage::new(state.db.clone())
            .find_by_token(token)
            .await?;

        let entry = user.as_ref().map(|u| (u.id, u.email.clone()));
        state.token_cache.insert(token.to_string(), entry).await;

        match user {
            Some(user) => Ok(AuthUser {
                id: user.id,
                email: user.email,
            }),
            None => Err(AppError::Unauthorized(
                "Invalid or expired token".to_string(),
            )),
        }
    }
}
