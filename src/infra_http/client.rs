use crate::application_port::ApiError;
use crate::domain_model::AccessToken;
use crate::domain_port::SessionRepo;
use crate::logger::*;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

/// Shared REST plumbing: base URL joining, bearer header from session
/// storage, and status/body mapping into `ApiError`.
pub struct ApiClient {
    http: Client,
    base_url: String,
    session_repo: Arc<dyn SessionRepo>,
}

// Some endpoints wrap payloads in `{"data": ...}`, others return them bare.
#[derive(Deserialize)]
#[serde(untagged)]
enum Body<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Body<T> {
    fn into_inner(self) -> T {
        match self {
            Body::Wrapped { data } => data,
            Body::Bare(value) => value,
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<serde_json::Value>,
    error: Option<String>,
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        timeout: Duration,
        session_repo: Arc<dyn SessionRepo>,
    ) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(ApiClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            session_repo,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.http.get(self.url(path))
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        self.http.post(self.url(path))
    }

    pub fn put(&self, path: &str) -> RequestBuilder {
        self.http.put(self.url(path))
    }

    pub fn patch(&self, path: &str) -> RequestBuilder {
        self.http.patch(self.url(path))
    }

    pub fn delete(&self, path: &str) -> RequestBuilder {
        self.http.delete(self.url(path))
    }

    /// Attaches the stored access token, if any. Missing tokens are left
    /// for the server to reject.
    pub async fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        let token = self
            .session_repo
            .access_token()
            .await
            .map_err(|e| ApiError::Transport(format!("session storage: {}", e)))?;
        Ok(match token {
            Some(token) => with_bearer(request, &token),
            None => request,
        })
    }

    pub async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiError> {
        let response = Self::send(request).await?;
        let body: Body<T> = response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(body.into_inner())
    }

    pub async fn send_empty(request: RequestBuilder) -> Result<(), ApiError> {
        Self::send(request).await?;
        Ok(())
    }

    async fn send(request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status();
        trace!(%status, url = %response.url(), "api response");

        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }
        Ok(response)
    }
}

pub fn with_bearer(request: RequestBuilder, token: &AccessToken) -> RequestBuilder {
    request.bearer_auth(token.as_str())
}

fn error_message(text: &str) -> String {
    match serde_json::from_str::<ErrorBody>(text) {
        Ok(ErrorBody {
            message: Some(serde_json::Value::String(message)),
            ..
        }) => message,
        Ok(ErrorBody {
            message: Some(other),
            ..
        }) => other.to_string(),
        Ok(ErrorBody {
            error: Some(error), ..
        }) => error,
        _ => text.trim().to_string(),
    }
}
