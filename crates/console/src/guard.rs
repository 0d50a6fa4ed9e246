//! Route guard: decides, before a page transition, whether the viewer may
//! enter the requested route.
//!
//! Not being signed in sends the viewer to login; being signed in but not
//! authorized sends them to the default page without surfacing an error.

use std::sync::Arc;

use midplat_auth::{Permission, PermissionContext, UserRole};

use crate::backend::AuthBackend;
use crate::config::ConsoleConfig;
use crate::error::ApiError;
use crate::token::TokenStore;

/// Requirements attached to a route.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteMeta {
    /// Reachable without a token (login, password reset, ...).
    pub public: bool,
    /// The user must hold at least one of these roles.
    pub roles: Vec<UserRole>,
    pub permission: Option<Permission>,
}

impl RouteMeta {
    /// Needs a token, nothing else.
    pub fn protected() -> Self {
        Self::default()
    }

    pub fn public() -> Self {
        Self {
            public: true,
            ..Self::default()
        }
    }

    pub fn require_role(mut self, role: UserRole) -> Self {
        self.roles.push(role);
        self
    }

    pub fn require_permission(mut self, permission: impl Into<Permission>) -> Self {
        self.permission = Some(permission.into());
        self
    }

    pub fn has_requirements(&self) -> bool {
        !self.roles.is_empty() || self.permission.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    Proceed,
    RedirectToLogin,
    RedirectToDefault,
}

#[derive(Clone)]
pub struct RouteGuard {
    backend: Arc<dyn AuthBackend>,
    tokens: Arc<dyn TokenStore>,
    login_path: String,
    default_path: String,
}

impl RouteGuard {
    pub fn new(backend: Arc<dyn AuthBackend>, tokens: Arc<dyn TokenStore>, config: &ConsoleConfig) -> Self {
        Self {
            backend,
            tokens,
            login_path: config.login_path.clone(),
            default_path: config.default_path.clone(),
        }
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    pub fn default_path(&self) -> &str {
        &self.default_path
    }

    /// Decide whether navigation to `path` may proceed.
    ///
    /// The user record is fetched first; the permission list only when the
    /// route names a permission and the user is not `platform_admin`. Any
    /// failure on the way clears the stored token.
    pub async fn check(&self, path: &str, meta: &RouteMeta) -> GuardOutcome {
        // `/login?redirect=/campaigns` is still the login route.
        let route = path.split(['?', '#']).next().unwrap_or(path);
        if meta.public || route == self.login_path {
            return GuardOutcome::Proceed;
        }

        let Some(token) = self.tokens.get() else {
            tracing::info!(%path, "no token; redirecting to login");
            return GuardOutcome::RedirectToLogin;
        };

        if !meta.has_requirements() {
            return GuardOutcome::Proceed;
        }

        match self.is_authorized(&token, meta).await {
            Ok(true) => GuardOutcome::Proceed,
            Ok(false) => {
                tracing::info!(%path, "not authorized; redirecting to default page");
                GuardOutcome::RedirectToDefault
            }
            Err(err) => {
                tracing::warn!(%path, error = %err, "authorization check failed; clearing token");
                self.tokens.clear();
                GuardOutcome::RedirectToLogin
            }
        }
    }

    /// Where navigation to `path` ends up.
    pub async fn next_destination(&self, path: &str, meta: &RouteMeta) -> String {
        match self.check(path, meta).await {
            GuardOutcome::Proceed => path.to_string(),
            GuardOutcome::RedirectToLogin => self.login_path.clone(),
            GuardOutcome::RedirectToDefault => self.default_path.clone(),
        }
    }

    async fn is_authorized(&self, token: &str, meta: &RouteMeta) -> Result<bool, ApiError> {
        let user = self.backend.current_user(token).await?;
        let user_id = user.id;
        let ctx = PermissionContext::new(Some(user));

        if !meta.roles.is_empty() && !ctx.has_any_role(&meta.roles) {
            tracing::debug!(%user_id, required = ?meta.roles, "role requirement not met");
            return Ok(false);
        }

        let Some(required) = &meta.permission else {
            return Ok(true);
        };
        if ctx.has_role(UserRole::PlatformAdmin) {
            return Ok(true);
        }

        let granted = self.backend.user_permissions(token, user_id).await?;
        let allowed = granted
            .iter()
            .any(|p| p.is_wildcard() || p.as_str() == required.as_str());
        if !allowed {
            tracing::debug!(%user_id, %required, "permission not in user's list");
        }
        Ok(allowed)
    }
}
