use crate::domain_model::*;
use crate::domain_port::*;
use dashmap::DashMap;

/// Process-local session storage. Values are kept as strings, the user as
/// JSON, mirroring browser local storage.
#[derive(Default)]
pub struct MemorySessionRepo {
    entries: DashMap<&'static str, String>,
}

impl MemorySessionRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(access_token: &str, refresh_token: &str) -> Self {
        let repo = Self::new();
        repo.entries
            .insert(ACCESS_TOKEN_KEY, access_token.to_string());
        repo.entries
            .insert(REFRESH_TOKEN_KEY, refresh_token.to_string());
        repo
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|v| v.value().clone())
    }

    pub fn insert_raw(&self, key: &'static str, value: impl Into<String>) {
        self.entries.insert(key, value.into());
    }

    pub fn is_empty(&self) -> bool {
        SESSION_KEYS.iter().all(|k| !self.entries.contains_key(k))
    }
}

#[async_trait::async_trait]
impl SessionRepo for MemorySessionRepo {
    async fn access_token(&self) -> Result<Option<AccessToken>, StoreError> {
        Ok(self.raw(ACCESS_TOKEN_KEY).map(AccessToken))
    }

    async fn refresh_token(&self) -> Result<Option<RefreshToken>, StoreError> {
        Ok(self.raw(REFRESH_TOKEN_KEY).map(RefreshToken))
    }

    async fn user(&self) -> Result<Option<User>, StoreError> {
        self.raw(USER_KEY)
            .map(|json| serde_json::from_str(&json).map_err(|e| StoreError::Corrupt(e.to_string())))
            .transpose()
    }

    async fn set_access_token(&self, token: &AccessToken) -> Result<(), StoreError> {
        self.entries.insert(ACCESS_TOKEN_KEY, token.0.clone());
        Ok(())
    }

    async fn set_refresh_token(&self, token: &RefreshToken) -> Result<(), StoreError> {
        self.entries.insert(REFRESH_TOKEN_KEY, token.0.clone());
        Ok(())
    }

    async fn set_user(&self, user: &User) -> Result<(), StoreError> {
        let json = serde_json::to_string(user).map_err(|e| StoreError::Corrupt(e.to_string()))?;
        self.entries.insert(USER_KEY, json);
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        for key in SESSION_KEYS {
            self.entries.remove(key);
        }
        Ok(())
    }
}
