use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use crate::logger::*;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio_util::sync::CancellationToken;

pub struct RealSessionGuard {
    session_repo: Arc<dyn SessionRepo>,
    identity_api: Arc<dyn IdentityApi>,
    token_decoder: Arc<dyn TokenDecoder>,
    navigator: Arc<dyn Navigator>,
    login_path: String,
    clock: fn() -> DateTime<Utc>,
    in_flight: AtomicBool,
}

// Releases the in-flight flag even if the check future is dropped.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl RealSessionGuard {
    pub fn new(
        session_repo: Arc<dyn SessionRepo>,
        identity_api: Arc<dyn IdentityApi>,
        token_decoder: Arc<dyn TokenDecoder>,
        navigator: Arc<dyn Navigator>,
        login_path: impl Into<String>,
    ) -> Self {
        Self {
            session_repo,
            identity_api,
            token_decoder,
            navigator,
            login_path: login_path.into(),
            clock: Utc::now,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    async fn read_credentials(&self) -> Result<Option<(AccessToken, RefreshToken)>, StoreError> {
        let access = self.session_repo.access_token().await?;
        let refresh = self.session_repo.refresh_token().await?;
        Ok(match (access, refresh) {
            (Some(a), Some(r)) if !a.0.is_empty() && !r.0.is_empty() => Some((a, r)),
            _ => None,
        })
    }

    async fn run(&self, lifetime: &CancellationToken) -> GuardOutcome {
        let (access, refresh) = match self.read_credentials().await {
            Ok(Some(pair)) => pair,
            Ok(None) => return self.fail(GuardError::AbsentCredentials, lifetime).await,
            Err(e) => {
                warn!(error = %e, "session storage unreadable");
                return self.fail(GuardError::AbsentCredentials, lifetime).await;
            }
        };

        let claims = match self.token_decoder.decode(&access) {
            Ok(claims) => claims,
            Err(e) => {
                debug!(error = %e, "stored access token does not decode");
                return self.fail(GuardError::MalformedToken, lifetime).await;
            }
        };

        if claims.is_expired_at((self.clock)()) {
            debug!(exp = ?claims.exp, "access token expired, refreshing");
        } else {
            let result = self.identity_api.me(&access).await;
            if lifetime.is_cancelled() {
                return GuardOutcome::Cancelled;
            }
            match result {
                Ok(user) => return GuardOutcome::Authorized(user),
                Err(ApiError::Unauthorized) => {
                    debug!("identity check rejected access token, refreshing");
                }
                Err(e) => {
                    warn!(error = %e, "identity check failed");
                    return self.fail(GuardError::UnauthorizedIdentity, lifetime).await;
                }
            }
        }

        self.refresh_and_confirm(&refresh, lifetime).await
    }

    // Exactly one exchange per invocation; there is no retry.
    async fn refresh_and_confirm(
        &self,
        refresh: &RefreshToken,
        lifetime: &CancellationToken,
    ) -> GuardOutcome {
        let result = self.identity_api.refresh(refresh).await;
        if lifetime.is_cancelled() {
            return GuardOutcome::Cancelled;
        }

        let (access, rotated) = match result {
            Ok(RefreshResponse {
                access_token: Some(access),
                refresh_token,
            }) if !access.0.is_empty() => (access, refresh_token),
            Ok(_) => {
                warn!("refresh response carried no access token");
                return self.fail(GuardError::RefreshFailed, lifetime).await;
            }
            Err(e) => {
                warn!(error = %e, "token refresh failed");
                return self.fail(GuardError::RefreshFailed, lifetime).await;
            }
        };

        if let Err(e) = self.persist(&access, rotated.as_ref()).await {
            warn!(error = %e, "could not persist refreshed token");
            return self.fail(GuardError::RefreshFailed, lifetime).await;
        }

        let result = self.identity_api.me(&access).await;
        if lifetime.is_cancelled() {
            return GuardOutcome::Cancelled;
        }
        match result {
            Ok(user) => {
                info!(user_id = %user.id, "session refreshed");
                GuardOutcome::Authorized(user)
            }
            Err(e) => {
                warn!(error = %e, "identity check failed after refresh");
                self.fail(GuardError::PostRefreshValidationFailed, lifetime)
                    .await
            }
        }
    }

    async fn persist(
        &self,
        access: &AccessToken,
        rotated: Option<&RefreshToken>,
    ) -> Result<(), StoreError> {
        self.session_repo.set_access_token(access).await?;
        if let Some(refresh) = rotated.filter(|r| !r.0.is_empty()) {
            self.session_repo.set_refresh_token(refresh).await?;
        }
        Ok(())
    }

    async fn fail(&self, reason: GuardError, lifetime: &CancellationToken) -> GuardOutcome {
        if lifetime.is_cancelled() {
            return GuardOutcome::Cancelled;
        }
        debug!(%reason, "session rejected, redirecting to login");
        if let Err(e) = self.session_repo.clear().await {
            warn!(error = %e, "could not clear session storage");
        }
        self.navigator.redirect(&self.login_path);
        GuardOutcome::Redirected(reason)
    }
}

#[async_trait::async_trait]
impl SessionGuard for RealSessionGuard {
    async fn check(&self, lifetime: &CancellationToken) -> GuardOutcome {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("session check already in flight");
            return GuardOutcome::Superseded;
        }
        let _in_flight = InFlight(&self.in_flight);

        self.run(lifetime).await
    }

    async fn local_state(&self) -> SessionState {
        let (access, _) = match self.read_credentials().await {
            Ok(Some(pair)) => pair,
            Ok(None) => return SessionState::Absent,
            Err(_) => return SessionState::Unknown,
        };
        match self.token_decoder.decode(&access) {
            Ok(claims) if claims.is_expired_at((self.clock)()) => SessionState::Expired,
            Ok(_) => SessionState::Valid,
            Err(_) => SessionState::Invalid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application_impl::{FakeIdentityApi, IdentityCall, JwtClaimsDecoder};
    use crate::infra_console::RecordingNavigator;
    use crate::infra_store::MemorySessionRepo;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde_json::json;
    use std::sync::Mutex;

    fn sign(claims: serde_json::Value) -> String {
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"backend"),
        )
        .unwrap()
    }

    fn token(exp: i64) -> String {
        sign(json!({"exp": exp, "jti": "j1", "token_type": "access", "user_id": 1}))
    }

    fn fresh_token() -> String {
        token(Utc::now().timestamp() + 3600)
    }

    fn expired_token() -> String {
        token(Utc::now().timestamp() - 1)
    }

    fn admin() -> User {
        User {
            id: UserId(1),
            first_name: "Admin".to_string(),
            second_name: "User".to_string(),
            email: "admin@example.com".to_string(),
            role: Role::Admin,
            photo: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn refreshed(access: &str) -> RefreshResponse {
        RefreshResponse {
            access_token: Some(AccessToken(access.to_string())),
            refresh_token: None,
        }
    }

    struct Harness {
        repo: Arc<MemorySessionRepo>,
        api: Arc<FakeIdentityApi>,
        navigator: Arc<RecordingNavigator>,
        guard: RealSessionGuard,
    }

    fn harness(repo: MemorySessionRepo) -> Harness {
        let repo = Arc::new(repo);
        let api = Arc::new(FakeIdentityApi::new());
        let navigator = Arc::new(RecordingNavigator::new());
        let guard = RealSessionGuard::new(
            repo.clone(),
            api.clone(),
            Arc::new(JwtClaimsDecoder::new()),
            navigator.clone(),
            "/login",
        );
        Harness {
            repo,
            api,
            navigator,
            guard,
        }
    }

    fn assert_cleared_and_redirected_once(h: &Harness) {
        assert!(h.repo.is_empty());
        assert_eq!(h.navigator.redirects(), vec!["/login".to_string()]);
    }

    #[tokio::test]
    async fn empty_storage_redirects_without_network() {
        let h = harness(MemorySessionRepo::new());

        let outcome = h.guard.check(&CancellationToken::new()).await;

        assert_eq!(outcome, GuardOutcome::Redirected(GuardError::AbsentCredentials));
        assert!(h.api.calls().is_empty());
        assert_cleared_and_redirected_once(&h);
    }

    #[tokio::test]
    async fn a_single_missing_token_clears_the_other() {
        let only_access = MemorySessionRepo::new();
        only_access.insert_raw(ACCESS_TOKEN_KEY, fresh_token());
        only_access.insert_raw(USER_KEY, "{}");

        let only_refresh = MemorySessionRepo::new();
        only_refresh.insert_raw(REFRESH_TOKEN_KEY, "r1");

        for repo in [only_access, only_refresh] {
            let h = harness(repo);
            let outcome = h.guard.check(&CancellationToken::new()).await;
            assert_eq!(outcome, GuardOutcome::Redirected(GuardError::AbsentCredentials));
            assert!(h.api.calls().is_empty());
            assert_cleared_and_redirected_once(&h);
        }
    }

    #[tokio::test]
    async fn malformed_access_token_fails_closed() {
        let h = harness(MemorySessionRepo::with_tokens("definitely.not.jwt", "r1"));

        let outcome = h.guard.check(&CancellationToken::new()).await;

        assert_eq!(outcome, GuardOutcome::Redirected(GuardError::MalformedToken));
        assert!(h.api.calls().is_empty());
        assert_cleared_and_redirected_once(&h);
    }

    #[tokio::test]
    async fn valid_token_is_confirmed_without_refresh() {
        let access = fresh_token();
        let h = harness(MemorySessionRepo::with_tokens(&access, "r1"));
        h.api.push_me(Ok(admin()));

        let outcome = h.guard.check(&CancellationToken::new()).await;

        assert_eq!(outcome, GuardOutcome::Authorized(admin()));
        assert_eq!(h.api.calls(), vec![IdentityCall::Me(access.clone())]);
        assert_eq!(h.api.refresh_calls(), 0);
        assert!(h.navigator.redirects().is_empty());
        assert_eq!(h.repo.raw(ACCESS_TOKEN_KEY), Some(access));
    }

    #[tokio::test]
    async fn fractional_or_missing_expiry_goes_to_the_server() {
        let fractional = Utc::now().timestamp() as f64 + 3600.5;
        for access in [
            sign(json!({"exp": fractional, "user_id": 1})),
            sign(json!({"user_id": 1})),
        ] {
            let h = harness(MemorySessionRepo::with_tokens(&access, "r1"));
            h.api.push_me(Ok(admin()));

            let outcome = h.guard.check(&CancellationToken::new()).await;

            assert_eq!(outcome, GuardOutcome::Authorized(admin()));
            assert_eq!(h.api.calls(), vec![IdentityCall::Me(access.clone())]);
            assert!(h.navigator.redirects().is_empty());
            assert_eq!(h.repo.raw(ACCESS_TOKEN_KEY), Some(access));
        }
    }

    #[tokio::test]
    async fn expired_token_refreshes_then_confirms() {
        let h = harness(MemorySessionRepo::with_tokens(&expired_token(), "r1"));
        h.api.push_refresh(Ok(refreshed("new")));
        h.api.push_me(Ok(admin()));

        let outcome = h.guard.check(&CancellationToken::new()).await;

        assert_eq!(outcome, GuardOutcome::Authorized(admin()));
        assert_eq!(
            h.api.calls(),
            vec![
                IdentityCall::Refresh("r1".to_string()),
                IdentityCall::Me("new".to_string()),
            ]
        );
        assert_eq!(h.repo.raw(ACCESS_TOKEN_KEY).as_deref(), Some("new"));
        assert_eq!(h.repo.raw(REFRESH_TOKEN_KEY).as_deref(), Some("r1"));
        assert!(h.navigator.redirects().is_empty());
    }

    #[tokio::test]
    async fn server_rejection_of_unexpired_token_triggers_one_refresh() {
        let h = harness(MemorySessionRepo::with_tokens(&fresh_token(), "r1"));
        h.api.push_me(Err(ApiError::Unauthorized));
        h.api.push_refresh(Ok(refreshed("new")));
        h.api.push_me(Ok(admin()));

        let outcome = h.guard.check(&CancellationToken::new()).await;

        assert_eq!(outcome, GuardOutcome::Authorized(admin()));
        assert_eq!(h.api.refresh_calls(), 1);
        assert_eq!(h.repo.raw(ACCESS_TOKEN_KEY).as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn non_auth_identity_failure_fails_closed() {
        let h = harness(MemorySessionRepo::with_tokens(&fresh_token(), "r1"));
        h.api.push_me(Err(ApiError::Status {
            status: 503,
            message: "unavailable".to_string(),
        }));

        let outcome = h.guard.check(&CancellationToken::new()).await;

        assert_eq!(
            outcome,
            GuardOutcome::Redirected(GuardError::UnauthorizedIdentity)
        );
        assert_eq!(h.api.refresh_calls(), 0);
        assert_cleared_and_redirected_once(&h);
    }

    #[tokio::test]
    async fn rejected_refresh_clears_everything() {
        let h = harness(MemorySessionRepo::with_tokens(&expired_token(), "r1"));
        h.repo.insert_raw(USER_KEY, r#"{"id":1}"#);
        h.api.push_refresh(Err(ApiError::Unauthorized));

        let outcome = h.guard.check(&CancellationToken::new()).await;

        assert_eq!(outcome, GuardOutcome::Redirected(GuardError::RefreshFailed));
        assert_eq!(h.api.refresh_calls(), 1);
        assert_cleared_and_redirected_once(&h);
    }

    #[tokio::test]
    async fn refresh_without_access_token_clears_everything() {
        for response in [
            RefreshResponse::default(),
            refreshed(""),
            RefreshResponse {
                access_token: None,
                refresh_token: Some(RefreshToken("r2".to_string())),
            },
        ] {
            let h = harness(MemorySessionRepo::with_tokens(&expired_token(), "r1"));
            h.api.push_refresh(Ok(response));

            let outcome = h.guard.check(&CancellationToken::new()).await;

            assert_eq!(outcome, GuardOutcome::Redirected(GuardError::RefreshFailed));
            assert_cleared_and_redirected_once(&h);
        }
    }

    #[tokio::test]
    async fn failed_post_refresh_check_clears_everything() {
        let h = harness(MemorySessionRepo::with_tokens(&expired_token(), "r1"));
        h.api.push_refresh(Ok(refreshed("new")));
        h.api.push_me(Err(ApiError::Unauthorized));

        let outcome = h.guard.check(&CancellationToken::new()).await;

        assert_eq!(
            outcome,
            GuardOutcome::Redirected(GuardError::PostRefreshValidationFailed)
        );
        assert_eq!(h.api.refresh_calls(), 1);
        assert_cleared_and_redirected_once(&h);
    }

    #[tokio::test]
    async fn rotated_refresh_token_is_persisted() {
        let h = harness(MemorySessionRepo::with_tokens(&expired_token(), "r1"));
        h.api.push_refresh(Ok(RefreshResponse {
            access_token: Some(AccessToken("new".to_string())),
            refresh_token: Some(RefreshToken("r2".to_string())),
        }));
        h.api.push_me(Ok(admin()));

        h.guard.check(&CancellationToken::new()).await;

        assert_eq!(h.repo.raw(REFRESH_TOKEN_KEY).as_deref(), Some("r2"));
    }

    // Identity backend that records what storage held when `me` was called.
    struct ObservingIdentityApi {
        inner: FakeIdentityApi,
        repo: Arc<MemorySessionRepo>,
        seen: Mutex<Vec<Option<String>>>,
    }

    #[async_trait::async_trait]
    impl IdentityApi for ObservingIdentityApi {
        async fn me(&self, access_token: &AccessToken) -> Result<User, ApiError> {
            self.seen
                .lock()
                .unwrap()
                .push(self.repo.raw(ACCESS_TOKEN_KEY));
            self.inner.me(access_token).await
        }

        async fn refresh(&self, refresh_token: &RefreshToken) -> Result<RefreshResponse, ApiError> {
            self.inner.refresh(refresh_token).await
        }

        async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
            self.inner.login(credentials).await
        }
    }

    #[tokio::test]
    async fn new_token_is_stored_before_the_follow_up_check() {
        let repo = Arc::new(MemorySessionRepo::with_tokens(&expired_token(), "r1"));
        let api = Arc::new(ObservingIdentityApi {
            inner: FakeIdentityApi::new(),
            repo: repo.clone(),
            seen: Mutex::new(Vec::new()),
        });
        api.inner.push_refresh(Ok(refreshed("new")));
        api.inner.push_me(Ok(admin()));
        let guard = RealSessionGuard::new(
            repo.clone(),
            api.clone(),
            Arc::new(JwtClaimsDecoder::new()),
            Arc::new(RecordingNavigator::new()),
            "/login",
        );

        guard.check(&CancellationToken::new()).await;

        assert_eq!(*api.seen.lock().unwrap(), vec![Some("new".to_string())]);
    }

    // Identity backend whose refresh never completes until released.
    struct StalledIdentityApi {
        release: tokio::sync::Notify,
        inner: FakeIdentityApi,
    }

    #[async_trait::async_trait]
    impl IdentityApi for StalledIdentityApi {
        async fn me(&self, access_token: &AccessToken) -> Result<User, ApiError> {
            self.inner.me(access_token).await
        }

        async fn refresh(&self, refresh_token: &RefreshToken) -> Result<RefreshResponse, ApiError> {
            self.release.notified().await;
            self.inner.refresh(refresh_token).await
        }

        async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
            self.inner.login(credentials).await
        }
    }

    fn stalled_guard(
        repo: Arc<MemorySessionRepo>,
        navigator: Arc<RecordingNavigator>,
    ) -> (Arc<RealSessionGuard>, Arc<StalledIdentityApi>) {
        let api = Arc::new(StalledIdentityApi {
            release: tokio::sync::Notify::new(),
            inner: FakeIdentityApi::new(),
        });
        let guard = Arc::new(RealSessionGuard::new(
            repo,
            api.clone(),
            Arc::new(JwtClaimsDecoder::new()),
            navigator,
            "/login",
        ));
        (guard, api)
    }

    #[tokio::test]
    async fn overlapping_invocation_is_superseded() {
        let repo = Arc::new(MemorySessionRepo::with_tokens(&expired_token(), "r1"));
        let (guard, api) = stalled_guard(repo.clone(), Arc::new(RecordingNavigator::new()));
        api.inner.push_refresh(Ok(refreshed("new")));
        api.inner.push_me(Ok(admin()));

        let first = tokio::spawn({
            let guard = guard.clone();
            async move { guard.check(&CancellationToken::new()).await }
        });
        while !guard.in_flight.load(Ordering::Acquire) {
            tokio::task::yield_now().await;
        }

        let second = guard.check(&CancellationToken::new()).await;
        assert_eq!(second, GuardOutcome::Superseded);

        api.release.notify_one();
        assert_eq!(first.await.unwrap(), GuardOutcome::Authorized(admin()));
        assert_eq!(api.inner.refresh_calls(), 1);

        // The flag is released once the first check completes.
        api.inner.push_me(Ok(admin()));
        repo.insert_raw(ACCESS_TOKEN_KEY, fresh_token());
        assert_eq!(
            guard.check(&CancellationToken::new()).await,
            GuardOutcome::Authorized(admin())
        );
    }

    #[tokio::test]
    async fn cancellation_mid_refresh_suppresses_side_effects() {
        let expired = expired_token();
        let repo = Arc::new(MemorySessionRepo::with_tokens(&expired, "r1"));
        let navigator = Arc::new(RecordingNavigator::new());
        let (guard, api) = stalled_guard(repo.clone(), navigator.clone());
        api.inner.push_refresh(Err(ApiError::Unauthorized));

        let lifetime = CancellationToken::new();
        let task = tokio::spawn({
            let guard = guard.clone();
            let lifetime = lifetime.clone();
            async move { guard.check(&lifetime).await }
        });
        while !guard.in_flight.load(Ordering::Acquire) {
            tokio::task::yield_now().await;
        }

        lifetime.cancel();
        api.release.notify_one();

        assert_eq!(task.await.unwrap(), GuardOutcome::Cancelled);
        assert!(navigator.redirects().is_empty());
        assert_eq!(repo.raw(ACCESS_TOKEN_KEY), Some(expired));
        assert_eq!(repo.raw(REFRESH_TOKEN_KEY).as_deref(), Some("r1"));
    }

    #[tokio::test]
    async fn local_state_reflects_storage() {
        let h = harness(MemorySessionRepo::new());
        assert_eq!(h.guard.local_state().await, SessionState::Absent);

        let h = harness(MemorySessionRepo::with_tokens("garbage", "r1"));
        assert_eq!(h.guard.local_state().await, SessionState::Invalid);

        let h = harness(MemorySessionRepo::with_tokens(&expired_token(), "r1"));
        assert_eq!(h.guard.local_state().await, SessionState::Expired);

        let h = harness(MemorySessionRepo::with_tokens(&fresh_token(), "r1"));
        assert_eq!(h.guard.local_state().await, SessionState::Valid);
        assert!(h.api.calls().is_empty());
    }

    #[tokio::test]
    async fn clock_decides_expiry() {
        fn far_future() -> DateTime<Utc> {
            Utc::now() + chrono::Duration::days(365)
        }
        let h = harness(MemorySessionRepo::with_tokens(&fresh_token(), "r1"));
        let guard = h.guard.with_clock(far_future);
        assert_eq!(guard.local_state().await, SessionState::Expired);
    }
}
