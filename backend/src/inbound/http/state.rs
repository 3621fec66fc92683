//! Shared HTTP adapter state.
//!
//! Handlers accept this bundle via `actix_web::web::Data` so they depend
//! only on domain services and ports and stay testable without a database
//! or SMTP relay.

use std::sync::Arc;

use sha2::{Digest, Sha256};

use crate::domain::ports::EmailRepository;
use crate::domain::{ConversionService, SignupService, UsageGate};

/// Shared secret guarding the admin export endpoints.
///
/// Only a SHA-256 digest of the configured token is kept; candidates are
/// digested before comparison so the check works on fixed-length values
/// rather than short-circuiting on the first differing byte of the secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminToken {
    digest: [u8; 32],
}

impl AdminToken {
    #[must_use]
    pub fn new(secret: &str) -> Self {
        Self {
            digest: Sha256::digest(secret.as_bytes()).into(),
        }
    }

    /// Whether `candidate` matches the configured secret.
    #[must_use]
    pub fn verify(&self, candidate: &str) -> bool {
        let candidate: [u8; 32] = Sha256::digest(candidate.as_bytes()).into();
        candidate == self.digest
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub gate: Arc<UsageGate>,
    pub converter: Arc<ConversionService>,
    pub signup: Arc<SignupService>,
    pub emails: Arc<dyn EmailRepository>,
    pub admin_token: AdminToken,
}
