//! Composition root.
//!
//! One `Portal` owns the configuration, durable storage, session, HTTP client,
//! query cache and toast queue. Views receive it by reference instead of
//! reaching for global state.

use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::api::{endpoints, query_params, ApiClient, Endpoint, RequestContext};
use crate::cache::{Mutation, QueryCache, QueryKey, Resource};
use crate::config::Config;
use crate::errors::{PortalError, PortalResult};
use crate::export::ExportTrigger;
use crate::guard::{self, GuardDecision, GuardPolicy, UnauthenticatedPolicy};
use crate::hooks::{
    ComplaintsHook, EmployeesHook, FeedbackHook, NotificationsHook, OrganizationHook, RatingsHook,
    StatisticsHook,
};
use crate::models::{Language, LoginRequest, LoginResponse};
use crate::session::SessionStore;
use crate::storage::{KeyValueStore, SqliteStore};
use crate::toast::ToastQueue;

pub struct Portal {
    config: Arc<Config>,
    session: SessionStore,
    client: ApiClient,
    cache: QueryCache,
    toasts: ToastQueue,
    language: RwLock<Language>,
    guard_policy: GuardPolicy,
}

impl Portal {
    pub fn new(config: Config, storage: Arc<dyn KeyValueStore>) -> PortalResult<Self> {
        let client = ApiClient::new(&config)?;
        let guard_policy = GuardPolicy {
            unauthenticated: if config.redirect_unauthenticated {
                UnauthenticatedPolicy::RedirectToLogin
            } else {
                UnauthenticatedPolicy::PassThrough
            },
        };

        Ok(Self {
            session: SessionStore::new(storage),
            client,
            cache: QueryCache::new(config.stale_time),
            toasts: ToastQueue::default(),
            language: RwLock::new(config.language),
            guard_policy,
            config: Arc::new(config),
        })
    }

    /// Build a portal persisting its session to the configured SQLite file.
    pub async fn open(config: Config) -> PortalResult<Self> {
        let storage = SqliteStore::open(&config.storage_path).await?;
        Self::new(config, Arc::new(storage))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn toasts(&self) -> &ToastQueue {
        &self.toasts
    }

    pub fn language(&self) -> Language {
        *self.language.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Switch the UI language. Cached queries are keyed by language, so the
    /// next reads fetch localized data without explicit invalidation.
    pub fn set_language(&self, language: Language) {
        *self.language.write().unwrap_or_else(PoisonError::into_inner) = language;
    }

    /// Rehydrate the session at startup.
    pub async fn initialize(&self) -> bool {
        self.session.initialize().await
    }

    /// Guard decision for navigating to `path` with the current session.
    pub fn authorize(&self, path: &str) -> GuardDecision {
        guard::authorize(&self.session.snapshot(), path, &self.guard_policy)
    }

    /// Sign in and return the route the login form should navigate to.
    pub async fn login(&self, email: &str, password: &str) -> PortalResult<&'static str> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(PortalError::Validation(
                "Email and password are required".to_string(),
            ));
        }

        self.session.set_loading(true);
        self.session.clear_error();

        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let ctx = RequestContext {
            token: None,
            language: self.language(),
        };

        match self
            .client
            .post::<LoginResponse, _>(endpoints::LOGIN, &ctx, &request)
            .await
        {
            Ok(response) => {
                let target = guard::login_redirect(&response.admin);
                self.cache.clear();
                if let Err(e) = self.session.login(response.token, response.admin).await {
                    self.session.set_error(e.message());
                    return Err(e);
                }
                Ok(target)
            }
            Err(e) => {
                tracing::warn!("Login failed for {}: {}", request.email, e);
                self.session.set_error(e.message());
                Err(e)
            }
        }
    }

    /// Sign out and forget every cached query.
    pub async fn logout(&self) -> PortalResult<()> {
        self.session.logout().await?;
        self.cache.clear();
        Ok(())
    }

    pub fn complaints(&self) -> ComplaintsHook<'_> {
        ComplaintsHook::new(self)
    }

    pub fn employees(&self) -> EmployeesHook<'_> {
        EmployeesHook::new(self)
    }

    pub fn feedback(&self) -> FeedbackHook<'_> {
        FeedbackHook::new(self)
    }

    pub fn ratings(&self) -> RatingsHook<'_> {
        RatingsHook::new(self)
    }

    pub fn organization(&self) -> OrganizationHook<'_> {
        OrganizationHook::new(self)
    }

    pub fn statistics(&self) -> StatisticsHook<'_> {
        StatisticsHook::new(self)
    }

    pub fn notifications(&self) -> NotificationsHook<'_> {
        NotificationsHook::new(self)
    }

    pub fn exporter(&self) -> ExportTrigger<'_> {
        ExportTrigger::new(self)
    }

    pub(crate) fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Context carrying the token when a session is active.
    pub(crate) fn request_context(&self) -> RequestContext {
        RequestContext {
            token: self.session.token(),
            language: self.language(),
        }
    }

    /// Context for operations that need a session.
    pub(crate) fn authorized_context(&self, operation: &str) -> PortalResult<RequestContext> {
        let ctx = self.request_context();
        if ctx.is_authenticated() {
            Ok(ctx)
        } else {
            Err(PortalError::auth_required(operation))
        }
    }

    /// Context for staff writes; viewer accounts are read-only.
    pub(crate) fn editor_context(&self, mutation: Mutation) -> PortalResult<RequestContext> {
        let ctx = self.authorized_context(mutation.label())?;
        match self.session.current_user() {
            Some(user) if !user.role.can_edit() => Err(PortalError::Unauthorized(format!(
                "{} accounts cannot {}",
                user.role.as_str(),
                mutation.label()
            ))),
            _ => Ok(ctx),
        }
    }

    /// Cached list read; the filters key the cache and become query parameters.
    pub(crate) async fn read_list<T, F>(
        &self,
        ctx: RequestContext,
        resource: Resource,
        endpoint: &Endpoint,
        filters: &F,
    ) -> PortalResult<T>
    where
        T: DeserializeOwned + Clone + Send + Sync + 'static,
        F: Serialize,
    {
        let params = query_params(filters)?;
        self.read(ctx, resource, endpoint, filters, params).await
    }

    /// Cached single-record read keyed by `id`.
    pub(crate) async fn read_item<T>(
        &self,
        ctx: RequestContext,
        resource: Resource,
        endpoint: &Endpoint,
        id: &str,
    ) -> PortalResult<T>
    where
        T: DeserializeOwned + Clone + Send + Sync + 'static,
    {
        self.read(ctx, resource, endpoint, &serde_json::json!({ "id": id }), Vec::new())
            .await
    }

    async fn read<T, F>(
        &self,
        ctx: RequestContext,
        resource: Resource,
        endpoint: &Endpoint,
        key_filters: &F,
        params: Vec<(String, String)>,
    ) -> PortalResult<T>
    where
        T: DeserializeOwned + Clone + Send + Sync + 'static,
        F: Serialize,
    {
        let authenticated = ctx.is_authenticated();
        let path = endpoint.select(authenticated, resource.as_str())?;
        let key = QueryKey::new(resource, key_filters, ctx.language, authenticated)?;

        self.cache
            .fetch(key, || self.client.get::<T>(path, &ctx, &params))
            .await
    }

    /// Await a write and apply its invalidations on success.
    pub(crate) async fn run_mutation<T, Fut>(&self, mutation: Mutation, request: Fut) -> PortalResult<T>
    where
        Fut: Future<Output = PortalResult<T>>,
    {
        match request.await {
            Ok(value) => {
                self.cache.invalidate_after(mutation);
                tracing::info!("{} succeeded", mutation.label());
                Ok(value)
            }
            Err(e) => {
                tracing::warn!("{} failed: {}", mutation.label(), e);
                Err(e)
            }
        }
    }
}
