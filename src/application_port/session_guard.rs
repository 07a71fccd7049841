use crate::domain_model::*;
use tokio_util::sync::CancellationToken;

/// Why a guard invocation ended in a redirect. Every variant is handled
/// the same way (clear storage, redirect); the distinction is for logs.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GuardError {
    #[error("no stored credentials")]
    AbsentCredentials,
    #[error("access token could not be decoded")]
    MalformedToken,
    #[error("identity check rejected the session")]
    UnauthorizedIdentity,
    #[error("refresh exchange failed")]
    RefreshFailed,
    #[error("identity check failed after refresh")]
    PostRefreshValidationFailed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GuardOutcome {
    /// Session confirmed by the server; protected content may render.
    Authorized(User),
    /// Storage was cleared and the login redirect issued.
    Redirected(GuardError),
    /// Another invocation is already in flight; nothing was done.
    Superseded,
    /// The caller's lifetime ended mid-check; no further side effects.
    Cancelled,
}

#[async_trait::async_trait]
pub trait SessionGuard: Send + Sync {
    /// Runs once per protected mount. `lifetime` is cancelled when the
    /// protected view goes away.
    async fn check(&self, lifetime: &CancellationToken) -> GuardOutcome;

    /// Session state as seen from storage alone, without network calls.
    async fn local_state(&self) -> SessionState;
}
