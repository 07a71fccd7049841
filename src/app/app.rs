use crate::application_impl::*;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use crate::infra_console::*;
use crate::infra_http::*;
use crate::infra_store::*;
use crate::logger::*;
use crate::settings::Settings;
use anyhow::{Context, anyhow};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub struct App {
    pub session_guard: Arc<dyn SessionGuard>,
    pub admin_service: Arc<dyn AdminService>,
    pub sales_panel: Arc<dyn SalesPanel>,
    identity_api: Arc<dyn IdentityApi>,
    session_repo: Arc<dyn SessionRepo>,
    navigator: Arc<RecordingNavigator>,
    lifetime: CancellationToken,
}

impl App {
    pub fn try_new(settings: &Settings) -> anyhow::Result<Self> {
        let session_repo: Arc<dyn SessionRepo> = match settings.session.backend.as_str() {
            "memory" => Arc::new(MemorySessionRepo::new()),
            "file" => Arc::new(FileSessionRepo::new(&settings.session.path)),
            other => return Err(anyhow!("Unknown session backend: {}", other)),
        };

        let client = Arc::new(
            ApiClient::new(
                &settings.api.base_url,
                Duration::from_secs(settings.api.timeout_secs),
                session_repo.clone(),
            )
            .context("building http client")?,
        );
        let identity_api: Arc<dyn IdentityApi> = Arc::new(HttpIdentityApi::new(
            client.clone(),
            IdentityPaths {
                identity: settings.api.identity_path.clone(),
                refresh: settings.api.refresh_path.clone(),
                login: settings.api.login_path.clone(),
            },
        ));

        let admin_service: Arc<dyn AdminService> = Arc::new(RealAdminService::new(
            Arc::new(HttpCategoryApi::new(client.clone())),
            Arc::new(HttpProductApi::new(client.clone())),
            Arc::new(HttpUserApi::new(client)),
        ));

        debug!(base_url = %settings.api.base_url, "api client ready");

        Ok(Self::from_parts(
            session_repo,
            identity_api,
            admin_service,
            &settings.session.login_redirect,
        ))
    }

    pub fn from_parts(
        session_repo: Arc<dyn SessionRepo>,
        identity_api: Arc<dyn IdentityApi>,
        admin_service: Arc<dyn AdminService>,
        login_redirect: &str,
    ) -> Self {
        let navigator = Arc::new(RecordingNavigator::new());
        let session_guard: Arc<dyn SessionGuard> = Arc::new(RealSessionGuard::new(
            session_repo.clone(),
            identity_api.clone(),
            Arc::new(JwtClaimsDecoder::new()),
            navigator.clone(),
            login_redirect,
        ));

        Self {
            session_guard,
            admin_service,
            sales_panel: Arc::new(StaticSalesPanel::new()),
            identity_api,
            session_repo,
            navigator,
            lifetime: CancellationToken::new(),
        }
    }

    /// Cancelled on shutdown; in-flight session checks stop touching
    /// storage once this fires.
    pub fn lifetime(&self) -> CancellationToken {
        self.lifetime.clone()
    }

    pub fn navigator(&self) -> &RecordingNavigator {
        &self.navigator
    }

    /// Protected mount: runs the session guard and yields the confirmed user.
    pub async fn mount(&self) -> anyhow::Result<User> {
        match self.session_guard.check(&self.lifetime).await {
            GuardOutcome::Authorized(user) => Ok(user),
            GuardOutcome::Redirected(reason) => {
                let target = self.navigator.last_redirect().unwrap_or_default();
                Err(anyhow!(
                    "{}; please log in again (redirected to {})",
                    reason,
                    target
                ))
            }
            GuardOutcome::Superseded => Err(anyhow!("a session check is already running")),
            GuardOutcome::Cancelled => Err(anyhow!("session check cancelled")),
        }
    }

    pub async fn login(&self, credentials: Credentials) -> anyhow::Result<User> {
        let response = self
            .identity_api
            .login(&credentials)
            .await
            .context("login failed")?;

        self.session_repo.clear().await?;
        self.session_repo
            .set_access_token(&response.access_token)
            .await?;
        self.session_repo
            .set_refresh_token(&response.refresh_token)
            .await?;

        let user = match response.user {
            Some(user) => user,
            None => self
                .identity_api
                .me(&response.access_token)
                .await
                .context("fetching profile after login")?,
        };
        self.session_repo.set_user(&user).await?;

        info!(user_id = %user.id, "logged in");
        Ok(user)
    }

    pub async fn logout(&self) -> anyhow::Result<()> {
        self.session_repo.clear().await?;
        info!("logged out");
        Ok(())
    }

    pub async fn stored_user(&self) -> anyhow::Result<Option<User>> {
        Ok(self.session_repo.user().await?)
    }
}
