//! services/api/src/adapters/auth.rs
//!
//! This module contains the opaque bearer-token verifier, implementing the
//! `AuthTokenVerifier` port against the auth service's user-info endpoint.
//! The service only ever learns the resolved user id.

use async_trait::async_trait;
use serde::Deserialize;
use wander_persona_core::ports::{AuthTokenVerifier, PortError, PortResult};

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: String,
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the `AuthTokenVerifier` port.
#[derive(Clone)]
pub struct BearerAuthAdapter {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl BearerAuthAdapter {
    /// Creates a new `BearerAuthAdapter`.
    pub fn new(client: reqwest::Client, base_url: String, api_key: String) -> Self {
        Self {
            client,
            base_url,
            api_key,
        }
    }
}

//=========================================================================================
// `AuthTokenVerifier` Trait Implementation
//=========================================================================================

#[async_trait]
impl AuthTokenVerifier for BearerAuthAdapter {
    async fn verify(&self, bearer_token: &str) -> PortResult<String> {
        let url = format!("{}/auth/v1/user", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .get(url)
            .header("apikey", &self.api_key)
            .bearer_auth(bearer_token)
            .send()
            .await
            .map_err(|e| PortError::Unexpected(format!("auth lookup failed: {e}")))?;

        if !response.status().is_success() {
            return Err(PortError::Unauthorized);
        }

        let user: AuthUser = response
            .json()
            .await
            .map_err(|_| PortError::Unauthorized)?;
        Ok(user.id)
    }
}
