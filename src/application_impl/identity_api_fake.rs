use crate::application_port::*;
use crate::domain_model::*;
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityCall {
    Me(String),
    Refresh(String),
    Login(String),
}

/// Scripted identity backend. Each call pops the next queued response for
/// its endpoint; an empty queue answers with a transport error.
#[derive(Default)]
pub struct FakeIdentityApi {
    me: Mutex<VecDeque<Result<User, ApiError>>>,
    refresh: Mutex<VecDeque<Result<RefreshResponse, ApiError>>>,
    login: Mutex<VecDeque<Result<LoginResponse, ApiError>>>,
    calls: Mutex<Vec<IdentityCall>>,
}

impl FakeIdentityApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_me(&self, response: Result<User, ApiError>) -> &Self {
        lock(&self.me).push_back(response);
        self
    }

    pub fn push_refresh(&self, response: Result<RefreshResponse, ApiError>) -> &Self {
        lock(&self.refresh).push_back(response);
        self
    }

    pub fn push_login(&self, response: Result<LoginResponse, ApiError>) -> &Self {
        lock(&self.login).push_back(response);
        self
    }

    pub fn calls(&self) -> Vec<IdentityCall> {
        lock(&self.calls).clone()
    }

    pub fn refresh_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, IdentityCall::Refresh(_)))
            .count()
    }

    fn record(&self, call: IdentityCall) {
        lock(&self.calls).push(call);
    }
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

fn unscripted(endpoint: &str) -> ApiError {
    ApiError::Transport(format!("no scripted response for {}", endpoint))
}

#[async_trait::async_trait]
impl IdentityApi for FakeIdentityApi {
    async fn me(&self, access_token: &AccessToken) -> Result<User, ApiError> {
        self.record(IdentityCall::Me(access_token.as_str().to_string()));
        lock(&self.me).pop_front().unwrap_or_else(|| Err(unscripted("me")))
    }

    async fn refresh(&self, refresh_token: &RefreshToken) -> Result<RefreshResponse, ApiError> {
        self.record(IdentityCall::Refresh(refresh_token.as_str().to_string()));
        lock(&self.refresh)
            .pop_front()
            .unwrap_or_else(|| Err(unscripted("refresh")))
    }

    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        self.record(IdentityCall::Login(credentials.email.clone()));
        lock(&self.login)
            .pop_front()
            .unwrap_or_else(|| Err(unscripted("login")))
    }
}
