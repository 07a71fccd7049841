use crate::domain_model::*;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("server responded with {status}: {message}")]
    Status { status: u16, message: String },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

/// Body of a refresh exchange. Both fields are optional on the wire; a
/// response without `accessToken` is a failed exchange.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    #[serde(default)]
    pub access_token: Option<AccessToken>,
    #[serde(default)]
    pub refresh_token: Option<RefreshToken>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: AccessToken,
    pub refresh_token: RefreshToken,
    #[serde(default)]
    pub user: Option<User>,
}

#[async_trait::async_trait]
pub trait IdentityApi: Send + Sync {
    /// Current user for the given access token. A 401 maps to
    /// `ApiError::Unauthorized`.
    async fn me(&self, access_token: &AccessToken) -> Result<User, ApiError>;
    async fn refresh(&self, refresh_token: &RefreshToken) -> Result<RefreshResponse, ApiError>;
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError>;
}
