use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;

use crate::error::AppError;

const BEARER_SCHEME: &str = "Bearer";

/// Bearer credential of the current request; identifies the sync group
#[derive(Clone)]
pub struct BearerToken(pub String);

impl BearerToken {
    /// Stable non-reversible tag for logs
    pub fn fingerprint(&self) -> u64 {
        token_fingerprint(&self.0)
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_tuple("BearerToken")
            .field(&self.fingerprint())
            .finish()
    }
}

/// Token carried by an `Authorization: Bearer <token>` header.
///
/// The scheme is matched case-insensitively and surrounding whitespace
/// around the token is ignored.
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let Some(raw) = headers.get(AUTHORIZATION) else {
        return Err(AppError::unauthorized("Missing Authorization header"));
    };
    let value = raw
        .to_str()
        .map_err(|_| AppError::unauthorized("Authorization header contains non-ASCII bytes"))?
        .trim_start();

    let scheme_len = BEARER_SCHEME.len();
    let has_scheme = value
        .get(..scheme_len)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case(BEARER_SCHEME));
    let rest = value.get(scheme_len..).unwrap_or_default();
    if !has_scheme || !rest.starts_with(char::is_whitespace) {
        return Err(AppError::unauthorized("Expected `Authorization: Bearer <token>`"));
    }

    match rest.trim() {
        "" => Err(AppError::unauthorized("Bearer token is blank")),
        token => Ok(token),
    }
}

fn token_fingerprint(token: &str) -> u64 {
    let mut state = DefaultHasher::new();
    token.hash(&mut state);
    state.finish()
}
