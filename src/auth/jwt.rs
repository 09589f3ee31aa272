//! HS256 JSON Web Token verifier.

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;

use super::{AuthError, Principal, TokenVerifier};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Claims {
    id: i64,
    iat: u64,
    exp: u64,
}

/// Shared-secret token verifier. Also issues tokens for the same secret.
pub struct JwtVerifier {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_secs: u64,
}

impl JwtVerifier {
    /// Builds a verifier from the signing secret, token lifetime and leeway.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = config.leeway_secs;
        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            ttl_secs: config.token_ttl_secs,
        }
    }

    /// Issues a token for `principal` valid from now.
    pub fn issue(&self, principal: Principal) -> jsonwebtoken::errors::Result<String> {
        self.issue_at(principal, now_secs())
    }

    /// Issues a token as if it had been minted at `issued_at` (unix seconds).
    pub fn issue_at(
        &self,
        principal: Principal,
        issued_at: u64,
    ) -> jsonwebtoken::errors::Result<String> {
        let claims = Claims {
            id: principal.id,
            iat: issued_at,
            exp: issued_at.saturating_add(self.ttl_secs),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
    }
}

impl TokenVerifier for JwtVerifier {
    fn verify(&self, token: &str) -> Result<Principal, AuthError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| Principal { id: data.claims.id })
            .map_err(|err| AuthError::Unauthorized(err.to_string()))
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
