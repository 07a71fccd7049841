use crate::domain_model::*;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(String),
    #[error("corrupt session data: {0}")]
    Corrupt(String),
}

/// Key-value session storage over the three session keys.
#[async_trait::async_trait]
pub trait SessionRepo: Send + Sync {
    async fn access_token(&self) -> Result<Option<AccessToken>, StoreError>;
    async fn refresh_token(&self) -> Result<Option<RefreshToken>, StoreError>;
    async fn user(&self) -> Result<Option<User>, StoreError>;

    async fn set_access_token(&self, token: &AccessToken) -> Result<(), StoreError>;
    async fn set_refresh_token(&self, token: &RefreshToken) -> Result<(), StoreError>;
    async fn set_user(&self, user: &User) -> Result<(), StoreError>;

    /// Removes `accessToken`, `refreshToken` and `user`.
    async fn clear(&self) -> Result<(), StoreError>;
}
