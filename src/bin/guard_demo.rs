//! Walks the session guard through its main paths against in-memory
//! storage and a scripted identity backend.
//! $ cargo run --bin guard_demo

use jsonwebtoken::{EncodingKey, Header, encode};
use std::sync::Arc;
use storefront_admin::application_impl::*;
use storefront_admin::application_port::*;
use storefront_admin::domain_model::*;
use storefront_admin::infra_console::RecordingNavigator;
use storefront_admin::infra_store::MemorySessionRepo;
use storefront_admin::logger::*;
use tokio_util::sync::CancellationToken;

fn token(exp_offset_secs: i64) -> anyhow::Result<String> {
    let exp = chrono::Utc::now().timestamp() + exp_offset_secs;
    Ok(encode(
        &Header::default(),
        &serde_json::json!({ "exp": exp, "user_id": 1 }),
        &EncodingKey::from_secret(b"demo"),
    )?)
}

fn demo_user() -> User {
    User {
        id: UserId(1),
        first_name: "Demo".to_string(),
        second_name: "Admin".to_string(),
        email: "demo@example.com".to_string(),
        role: Role::Admin,
        photo: None,
        created_at: None,
        updated_at: None,
    }
}

async fn scenario(name: &str, repo: MemorySessionRepo, api: FakeIdentityApi) {
    let repo = Arc::new(repo);
    let api = Arc::new(api);
    let guard = RealSessionGuard::new(
        repo.clone(),
        api.clone(),
        Arc::new(JwtClaimsDecoder::new()),
        Arc::new(RecordingNavigator::new()),
        "/login",
    );
    let outcome = guard.check(&CancellationToken::new()).await;
    info!(scenario = name, ?outcome, calls = ?api.calls(), empty = repo.is_empty());
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _logger = Logger::new_bootstrap();

    scenario("no session", MemorySessionRepo::new(), FakeIdentityApi::new()).await;

    let api = FakeIdentityApi::new();
    api.push_me(Ok(demo_user()));
    scenario("valid", MemorySessionRepo::with_tokens(&token(3600)?, "r1"), api).await;

    let api = FakeIdentityApi::new();
    api.push_refresh(Ok(RefreshResponse {
        access_token: Some(AccessToken("new".to_string())),
        refresh_token: None,
    }))
    .push_me(Ok(demo_user()));
    scenario("expired, refreshed", MemorySessionRepo::with_tokens(&token(-1)?, "r1"), api).await;

    let api = FakeIdentityApi::new();
    api.push_refresh(Err(ApiError::Unauthorized));
    scenario("expired, refresh rejected", MemorySessionRepo::with_tokens(&token(-1)?, "r1"), api)
        .await;

    Ok(())
}
