//! Keyed verifier seam for token secrets.

use async_trait::async_trait;
use mockall::automock;

use crate::auth::OpenBaoError;

/// Computes and checks opaque HMAC verifiers for token material.
#[automock]
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Produce the verifier string to persist for `input`.
    async fn sign(&self, input: &[u8]) -> Result<String, OpenBaoError>;

    /// Whether `verifier` was produced from `input`.
    async fn verify(&self, input: &[u8], verifier: &str) -> Result<bool, OpenBaoError>;
}
