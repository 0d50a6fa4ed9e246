//! Permission context: the current user plus the role policy, queried through
//! boolean predicates.
//!
//! A context is made available to a call tree with [`PermissionContext::provide`]
//! and read back with [`PermissionContext::current`]. Reading it with no
//! provider in scope is a programming error that must not take the page down,
//! so it degrades to a deny-all context and logs a warning.

use std::cell::RefCell;
use std::sync::Arc;

use midplat_core::BrandId;

use crate::{CurrentUser, RolePolicy, UserRole};

thread_local! {
    static PROVIDED: RefCell<Vec<PermissionContext>> = const { RefCell::new(Vec::new()) };
}

#[derive(Debug, Clone)]
pub struct PermissionContext {
    user: Option<CurrentUser>,
    policy: Arc<RolePolicy>,
}

impl PermissionContext {
    /// Context for `user` (or nobody) under the shared standard policy.
    pub fn new(user: Option<CurrentUser>) -> Self {
        Self::with_policy(user, RolePolicy::shared())
    }

    pub fn with_policy(user: Option<CurrentUser>, policy: Arc<RolePolicy>) -> Self {
        Self { user, policy }
    }

    /// Context with no user: every predicate is false.
    pub fn deny_all() -> Self {
        Self::new(None)
    }

    pub fn user(&self) -> Option<&CurrentUser> {
        self.user.as_ref()
    }

    pub fn policy(&self) -> &RolePolicy {
        &self.policy
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Whether the current user may exercise `code`.
    ///
    /// `platform_admin` short-circuits to true; otherwise any of the user's
    /// roles must grant the code or the wildcard.
    pub fn has_permission(&self, code: impl AsRef<str>) -> bool {
        let Some(user) = &self.user else {
            return false;
        };
        if user.is_platform_admin() {
            return true;
        }
        let code = code.as_ref();
        user.roles
            .iter()
            .any(|role| self.policy.role_grants(*role, code))
    }

    pub fn has_role(&self, role: UserRole) -> bool {
        self.user.as_ref().is_some_and(|u| u.has_role(role))
    }

    pub fn has_any_role(&self, roles: &[UserRole]) -> bool {
        roles.iter().any(|role| self.has_role(*role))
    }

    /// Brand-scoped access.
    ///
    /// Only `platform_admin` is granted; brand admins are denied even for their
    /// own brand until the scoping rule is settled with product.
    pub fn can_access_brand(&self, brand_id: BrandId) -> bool {
        let granted = self.has_role(UserRole::PlatformAdmin);
        if !granted && self.has_role(UserRole::BrandAdmin) {
            tracing::debug!(%brand_id, "brand-scoped access is not implemented for brand admins");
        }
        granted
    }

    /// Run `f` with this context as the innermost provided context on the
    /// current thread.
    pub fn provide<R>(self, f: impl FnOnce() -> R) -> R {
        struct Pop;
        impl Drop for Pop {
            fn drop(&mut self) {
                PROVIDED.with(|stack| {
                    stack.borrow_mut().pop();
                });
            }
        }

        PROVIDED.with(|stack| stack.borrow_mut().push(self));
        let _pop = Pop;
        f()
    }

    /// The innermost provided context, or a deny-all context (with a warning)
    /// when called outside any [`PermissionContext::provide`].
    pub fn current() -> PermissionContext {
        let provided = PROVIDED.with(|stack| stack.borrow().last().cloned());
        match provided {
            Some(ctx) => ctx,
            None => {
                tracing::warn!("permission context used outside of a provider; denying all");
                PermissionContext::deny_all()
            }
        }
    }
}
