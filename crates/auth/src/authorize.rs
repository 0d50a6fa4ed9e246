use std::collections::BTreeSet;

use serde::Serialize;
use thiserror::Error;

use midplat_core::UserId;

use crate::{Permission, PermissionContext, UserRole};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("not authenticated, please re-login")]
    NotAuthenticated,

    #[error("forbidden: missing permission '{0}'")]
    Forbidden(String),
}

/// Authorize the context's user for `required`.
///
/// Same decision as [`PermissionContext::has_permission`], with the reason for
/// a denial carried in the error.
pub fn authorize(ctx: &PermissionContext, required: &Permission) -> Result<(), AuthzError> {
    if !ctx.is_authenticated() {
        return Err(AuthzError::NotAuthenticated);
    }
    if ctx.has_permission(required) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden(required.as_str().to_string()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Authorization Explanation (Audit Trail)
// ─────────────────────────────────────────────────────────────────────────────

/// Detailed explanation of an authorization decision.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizationExplanation {
    /// The permission that was being checked.
    pub required_permission: String,

    /// Whether the authorization was granted.
    pub granted: bool,

    /// Human-readable reason for the decision.
    pub reason: String,

    /// The user's state; absent when nobody is signed in.
    pub principal: Option<PrincipalState>,

    /// If denied, this explains what was missing.
    pub denial_reason: Option<DenialReason>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PrincipalState {
    pub user_id: UserId,
    pub username: String,
    pub roles: Vec<UserRole>,
    pub effective_permissions: Vec<String>,
    pub has_wildcard: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DenialReason {
    pub kind: DenialKind,
    pub message: String,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    NotAuthenticated,
    MissingPermission,
}

/// Explain why [`authorize`] would allow or deny `required` for the context's
/// user. Used by the route guard's debug logging and by the role admin pages.
pub fn explain_authorization(ctx: &PermissionContext, required: &Permission) -> AuthorizationExplanation {
    let required_str = required.as_str();

    let Some(user) = ctx.user() else {
        return AuthorizationExplanation {
            required_permission: required_str.to_string(),
            granted: false,
            reason: "No user is signed in".to_string(),
            principal: None,
            denial_reason: Some(DenialReason {
                kind: DenialKind::NotAuthenticated,
                message: "The session has no current user".to_string(),
                suggestions: vec!["Sign in again to obtain a fresh token".to_string()],
            }),
        };
    };

    let policy = ctx.policy();
    let effective: BTreeSet<String> = user
        .roles
        .iter()
        .flat_map(|role| policy.permissions_for(*role))
        .map(|p| p.as_str().to_string())
        .collect();
    let has_wildcard = user.is_platform_admin() || effective.contains("*");
    let granted = ctx.has_permission(required);

    let principal = PrincipalState {
        user_id: user.id,
        username: user.username.clone(),
        roles: user.roles.clone(),
        effective_permissions: effective.iter().cloned().collect(),
        has_wildcard,
    };

    if granted {
        let reason = if user.is_platform_admin() {
            "User holds platform_admin, which grants every permission".to_string()
        } else if has_wildcard {
            "User has wildcard permission '*'".to_string()
        } else {
            format!("User has permission '{}' through its roles", required_str)
        };
        return AuthorizationExplanation {
            required_permission: required_str.to_string(),
            granted: true,
            reason,
            principal: Some(principal),
            denial_reason: None,
        };
    }

    // Roles that would have granted it, to point the operator at a fix.
    let granting_roles: Vec<&str> = UserRole::KNOWN
        .into_iter()
        .filter(|role| *role != UserRole::PlatformAdmin && policy.role_grants(*role, required_str))
        .map(|role| role.as_str())
        .collect();

    let mut suggestions = vec![format!(
        "Assign a role that grants the '{}' permission",
        required_str
    )];
    if !granting_roles.is_empty() {
        suggestions.insert(
            0,
            format!("These roles grant it: {}", granting_roles.join(", ")),
        );
    }

    AuthorizationExplanation {
        required_permission: required_str.to_string(),
        granted: false,
        reason: format!(
            "User does not have permission '{}'. Current permissions: {:?}",
            required_str, principal.effective_permissions
        ),
        principal: Some(principal),
        denial_reason: Some(DenialReason {
            kind: DenialKind::MissingPermission,
            message: format!("Missing required permission: '{}'", required_str),
            suggestions,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CurrentUser;

    fn ctx(roles: Vec<UserRole>) -> PermissionContext {
        PermissionContext::new(Some(CurrentUser::new(UserId::new(5), "eve", roles)))
    }

    #[test]
    fn authorize_maps_to_errors() {
        let read = Permission::from_static("campaign:read");
        let approve = Permission::from_static("withdrawal:approve");

        assert_eq!(authorize(&ctx(vec![UserRole::Participant]), &read), Ok(()));
        assert_eq!(
            authorize(&ctx(vec![UserRole::Participant]), &approve),
            Err(AuthzError::Forbidden("withdrawal:approve".to_string()))
        );
        assert_eq!(
            authorize(&PermissionContext::deny_all(), &read),
            Err(AuthzError::NotAuthenticated)
        );
    }

    #[test]
    fn explanation_for_denial_names_granting_roles() {
        let exp = explain_authorization(
            &ctx(vec![UserRole::Participant]),
            &Permission::from_static("withdrawal:approve"),
        );
        assert!(!exp.granted);
        let denial = exp.denial_reason.unwrap();
        assert_eq!(denial.kind, DenialKind::MissingPermission);
        assert_eq!(denial.suggestions[0], "These roles grant it: brand_admin");
        let principal = exp.principal.unwrap();
        assert!(principal.effective_permissions.contains(&"campaign:read".to_string()));
        assert!(!principal.has_wildcard);
    }

    #[test]
    fn explanation_for_admin() {
        let exp = explain_authorization(
            &ctx(vec![UserRole::PlatformAdmin]),
            &Permission::from_static("anything:at_all"),
        );
        assert!(exp.granted);
        assert!(exp.reason.contains("platform_admin"));
        assert!(exp.principal.unwrap().has_wildcard);
    }

    #[test]
    fn explanation_without_user() {
        let exp = explain_authorization(&PermissionContext::deny_all(), &Permission::from_static("x:y"));
        assert!(!exp.granted);
        assert!(exp.principal.is_none());
        assert_eq!(exp.denial_reason.unwrap().kind, DenialKind::NotAuthenticated);
    }
}
