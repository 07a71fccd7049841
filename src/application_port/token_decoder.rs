use crate::domain_model::*;

#[derive(Debug, thiserror::Error)]
#[error("malformed token: {0}")]
pub struct TokenDecodeError(pub String);

pub trait TokenDecoder: Send + Sync {
    fn decode(&self, token: &AccessToken) -> Result<TokenClaims, TokenDecodeError>;
}
