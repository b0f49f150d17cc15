//! services/api/src/web/identity.rs
//!
//! Resolves who is calling: an authenticated user id when a bearer token
//! verifies, otherwise the caller's IP address. Likes are deduplicated on
//! this identity.

use crate::web::state::AppState;
use axum::http::{header, HeaderMap};
use tracing::warn;
use wander_persona_core::domain::ActorKey;

/// Extracts the client IP from proxy headers, mirroring the deployment's
/// reverse-proxy setup. Falls back to "unknown".
pub fn client_ip(headers: &HeaderMap) -> String {
    for name in ["x-forwarded-for", "x-real-ip"] {
        if let Some(value) = headers.get(name).and_then(|v| v.to_str().ok()) {
            // x-forwarded-for may carry a chain; the first hop is the client.
            if let Some(first) = value.split(',').next() {
                let first = first.trim();
                if !first.is_empty() {
                    return first.to_string();
                }
            }
        }
    }
    "unknown".to_string()
}

/// The raw bearer token from the Authorization header, if present.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
}

/// Verifies an optional bearer token into a user id. Verification failures
/// degrade to anonymous rather than rejecting the request.
pub async fn resolve_user_id(state: &AppState, headers: &HeaderMap) -> Option<String> {
    let token = bearer_token(headers)?;
    match state.auth_adapter.verify(token).await {
        Ok(user_id) => Some(user_id),
        Err(error) => {
            warn!(%error, "bearer token verification failed, treating caller as anonymous");
            None
        }
    }
}

/// The like-toggle actor key: user id when authenticated, else client IP.
pub async fn resolve_actor(state: &AppState, headers: &HeaderMap) -> ActorKey {
    match resolve_user_id(state, headers).await {
        Some(user_id) => ActorKey::User(user_id),
        None => ActorKey::Ip(client_ip(headers)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn forwarded_for_chain_yields_the_first_hop() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.9, 10.0.0.1"),
        );
        assert_eq!(client_ip(&headers), "203.0.113.9");
    }

    #[test]
    fn real_ip_is_used_when_forwarded_for_is_absent() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.7"));
        assert_eq!(client_ip(&headers), "198.51.100.7");
    }

    #[test]
    fn missing_proxy_headers_fall_back_to_unknown() {
        assert_eq!(client_ip(&HeaderMap::new()), "unknown");
    }

    #[test]
    fn bearer_tokens_are_stripped_of_their_prefix() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc123"),
        );
        assert_eq!(bearer_token(&headers), Some("abc123"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic xyz"));
        assert_eq!(bearer_token(&headers), None);
    }
}
