//! Bearer-credential gate for mutating operations.

pub mod jwt;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Verified caller identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal {
    /// Subject id carried by the credential.
    pub id: i64,
}

/// Why a credential was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No header, or no token after the scheme.
    #[error("no credential presented")]
    Forbidden,
    /// Token present but bad signature, malformed, or expired.
    #[error("credential rejected: {0}")]
    Unauthorized(String),
}

/// Checks a raw token and yields the principal it was issued to.
pub trait TokenVerifier: Send + Sync {
    /// Verifies signature and expiry.
    fn verify(&self, token: &str) -> Result<Principal, AuthError>;
}

/// Stateless guard applied to protected operations.
#[derive(Clone)]
pub struct AccessGate {
    verifier: Arc<dyn TokenVerifier>,
}

impl AccessGate {
    /// Wraps a verifier.
    pub fn new(verifier: impl TokenVerifier + 'static) -> Self {
        Self {
            verifier: Arc::new(verifier),
        }
    }

    /// Accepts or rejects an `Authorization` header value.
    ///
    /// `NoToken → Forbidden`, `Token + bad/expired → Unauthorized`,
    /// `Token + valid → Principal`.
    pub fn authorize(&self, header: Option<&str>) -> Result<Principal, AuthError> {
        let token = bearer_token(header).ok_or(AuthError::Forbidden)?;
        self.verifier.verify(token).inspect_err(|err| {
            log::warn!("rejected credential: {err}");
        })
    }
}

impl std::fmt::Debug for AccessGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessGate").finish_non_exhaustive()
    }
}

/// Extracts the token from `<scheme> <token>`, normally `Bearer <token>`.
///
/// The scheme word is not checked: whatever follows it goes to the
/// verifier, so a token under a foreign scheme fails verification instead
/// of counting as absent.
fn bearer_token(header: Option<&str>) -> Option<&str> {
    let (_scheme, token) = header?.trim().split_once(char::is_whitespace)?;
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
