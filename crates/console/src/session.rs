//! The signed-in session: token, current user and the menu built for them.

use std::sync::Arc;

use midplat_auth::menu::{self, MenuTree};
use midplat_auth::{CurrentUser, Permission, PermissionContext, Platform, authorize::AuthorizationExplanation};

use crate::backend::AuthBackend;
use crate::config::ConsoleConfig;
use crate::error::ApiError;
use crate::guard::RouteGuard;
use crate::token::TokenStore;

pub struct Session {
    backend: Arc<dyn AuthBackend>,
    tokens: Arc<dyn TokenStore>,
    user: Option<CurrentUser>,
    menu: MenuTree,
}

impl Session {
    pub fn new(backend: Arc<dyn AuthBackend>, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            backend,
            tokens,
            user: None,
            menu: MenuTree::default(),
        }
    }

    pub fn user(&self) -> Option<&CurrentUser> {
        self.user.as_ref()
    }

    pub fn menu(&self) -> &MenuTree {
        &self.menu
    }

    /// Permission context for the current user (deny-all when signed out).
    pub fn permissions(&self) -> PermissionContext {
        PermissionContext::new(self.user.clone())
    }

    pub fn explain(&self, permission: &Permission) -> AuthorizationExplanation {
        midplat_auth::explain_authorization(&self.permissions(), permission)
    }

    /// A guard sharing this session's backend and token store.
    pub fn guard(&self, config: &ConsoleConfig) -> RouteGuard {
        RouteGuard::new(Arc::clone(&self.backend), Arc::clone(&self.tokens), config)
    }

    /// Store `token` and load the user it belongs to, replacing any previous
    /// user wholesale.
    pub async fn login(&mut self, token: String) -> Result<&CurrentUser, ApiError> {
        self.logout();
        self.tokens.set(token);
        self.load_user().await
    }

    /// Reload the user for an already stored token, if any.
    pub async fn restore(&mut self) -> Result<Option<&CurrentUser>, ApiError> {
        if self.tokens.get().is_none() {
            return Ok(None);
        }
        self.load_user().await.map(Some)
    }

    pub fn logout(&mut self) {
        self.tokens.clear();
        self.user = None;
        self.menu = MenuTree::default();
    }

    /// Fetch the menus of `platform` and rebuild the tree for the current user.
    pub async fn refresh_menu(&mut self, platform: Platform) -> Result<&MenuTree, ApiError> {
        let token = self.tokens.get().ok_or(ApiError::Unauthenticated)?;
        let fetched = self.backend.user_menus(&token, platform).await;
        let items = match fetched {
            Ok(items) => items,
            Err(err) => return Err(self.fail(err)),
        };

        let items = menu::without_disabled(menu::for_platform(&items, platform));
        self.menu = menu::build_menu_tree(&items, &self.permissions());
        tracing::debug!(%platform, nodes = self.menu.len(), "menu rebuilt");
        Ok(&self.menu)
    }

    async fn load_user(&mut self) -> Result<&CurrentUser, ApiError> {
        let token = self.tokens.get().ok_or(ApiError::Unauthenticated)?;
        let fetched = self.backend.current_user(&token).await;
        match fetched {
            Ok(user) => {
                tracing::info!(user_id = %user.id, roles = ?user.roles, "session user loaded");
                // The menu was built for whoever was signed in before.
                self.menu = MenuTree::default();
                let user: &CurrentUser = self.user.insert(user);
                Ok(user)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// A 401 ends the session; other failures leave it intact.
    fn fail(&mut self, err: ApiError) -> ApiError {
        if err.is_unauthenticated() {
            tracing::warn!("backend rejected the token; signing out");
            self.logout();
        }
        err
    }
}
