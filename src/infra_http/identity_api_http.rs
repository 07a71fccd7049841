use crate::application_port::*;
use crate::domain_model::*;
use crate::infra_http::{ApiClient, with_bearer};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct IdentityPaths {
    pub identity: String,
    pub refresh: String,
    pub login: String,
}

impl Default for IdentityPaths {
    fn default() -> Self {
        Self {
            identity: "users/mee".to_string(),
            refresh: "refresh".to_string(),
            login: "users/login".to_string(),
        }
    }
}

pub struct HttpIdentityApi {
    client: Arc<ApiClient>,
    paths: IdentityPaths,
}

impl HttpIdentityApi {
    pub fn new(client: Arc<ApiClient>, paths: IdentityPaths) -> Self {
        HttpIdentityApi { client, paths }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

#[async_trait::async_trait]
impl IdentityApi for HttpIdentityApi {
    async fn me(&self, access_token: &AccessToken) -> Result<User, ApiError> {
        let request = with_bearer(self.client.get(&self.paths.identity), access_token);
        ApiClient::send_json(request).await
    }

    async fn refresh(&self, refresh_token: &RefreshToken) -> Result<RefreshResponse, ApiError> {
        let request = self.client.post(&self.paths.refresh).json(&RefreshRequest {
            refresh_token: refresh_token.as_str(),
        });
        ApiClient::send_json(request).await
    }

    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        let request = self.client.post(&self.paths.login).json(credentials);
        ApiClient::send_json(request).await
    }
}
