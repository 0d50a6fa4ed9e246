//! The static role → permission table.
//!
//! Every surface (admin console, H5 client, route guard) resolves permissions
//! through this one table. Bump [`RolePolicy::VERSION`] whenever a grant changes
//! so clients can tell which mapping they were built against.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, LazyLock};

use serde::Serialize;

use crate::{Permission, UserRole};

const BRAND_ADMIN: &[&str] = &[
    "brand:read",
    "brand:update",
    "campaign:read",
    "campaign:create",
    "campaign:update",
    "campaign:delete",
    "member:read",
    "member:update",
    "distributor:read",
    "distributor:update",
    "withdrawal:read",
    "withdrawal:approve",
];

const DISTRIBUTOR: &[&str] = &[
    "campaign:read",
    "distributor:read",
    "withdrawal:read",
    "withdrawal:create",
];

const PARTICIPANT: &[&str] = &["campaign:read", "campaign:join", "member:read"];

static STANDARD: LazyLock<Arc<RolePolicy>> = LazyLock::new(|| Arc::new(RolePolicy::standard()));

/// Mapping from role to the permission codes it grants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolePolicy {
    grants: HashMap<UserRole, BTreeSet<Permission>>,
}

impl RolePolicy {
    pub const VERSION: u32 = 3;

    /// The built-in table.
    pub fn standard() -> Self {
        let mut policy = Self::empty();
        policy.grant(UserRole::PlatformAdmin, [Permission::WILDCARD]);
        policy.grant(UserRole::BrandAdmin, BRAND_ADMIN.iter().copied().map(Permission::from_static));
        policy.grant(UserRole::Distributor, DISTRIBUTOR.iter().copied().map(Permission::from_static));
        policy.grant(UserRole::Participant, PARTICIPANT.iter().copied().map(Permission::from_static));
        policy
    }

    /// Process-wide shared instance of [`RolePolicy::standard`].
    pub fn shared() -> Arc<RolePolicy> {
        Arc::clone(&STANDARD)
    }

    pub fn empty() -> Self {
        Self {
            grants: HashMap::new(),
        }
    }

    pub fn grant(&mut self, role: UserRole, permissions: impl IntoIterator<Item = Permission>) {
        self.grants.entry(role).or_default().extend(permissions);
    }

    /// Permissions granted to `role`, sorted. Empty for roles without grants.
    pub fn permissions_for(&self, role: UserRole) -> impl Iterator<Item = &Permission> {
        self.grants.get(&role).into_iter().flatten()
    }

    /// Whether `role` grants `code`, directly or through the wildcard.
    pub fn role_grants(&self, role: UserRole, code: &str) -> bool {
        let Some(set) = self.grants.get(&role) else {
            return false;
        };
        set.iter().any(|p| p.is_wildcard() || p.as_str() == code)
    }

    /// Role definitions for display/audit, in descending privilege.
    pub fn describe(&self) -> Vec<RoleDefinition> {
        UserRole::KNOWN
            .into_iter()
            .map(|role| RoleDefinition {
                role,
                permissions: self.permissions_for(role).map(|p| p.as_str().to_string()).collect(),
                description: role_description(role),
            })
            .collect()
    }

    /// Distinct permission codes granted by any role, grouped by resource.
    pub fn catalog(&self) -> Vec<PermissionDefinition> {
        let codes: BTreeSet<&Permission> = self.grants.values().flatten().collect();
        codes
            .into_iter()
            .map(|p| PermissionDefinition {
                name: p.as_str().to_string(),
                category: if p.is_wildcard() {
                    "system".to_string()
                } else {
                    p.resource().to_string()
                },
                description: permission_description(p),
            })
            .collect()
    }
}

impl Default for RolePolicy {
    fn default() -> Self {
        Self::standard()
    }
}

/// Role definition with its granted permissions (for audit/display).
#[derive(Debug, Clone, Serialize)]
pub struct RoleDefinition {
    pub role: UserRole,
    pub permissions: Vec<String>,
    pub description: &'static str,
}

/// Permission definition (for audit/display).
#[derive(Debug, Clone, Serialize)]
pub struct PermissionDefinition {
    pub name: String,
    pub category: String,
    pub description: String,
}

fn role_description(role: UserRole) -> &'static str {
    match role {
        UserRole::PlatformAdmin => "Platform operator with every permission",
        UserRole::BrandAdmin => "Manages one brand's campaigns, members and distributors",
        UserRole::Distributor => "Promotes campaigns and withdraws commission",
        UserRole::Participant => "Takes part in campaigns",
        UserRole::Anonymous => "Not signed in; no permissions",
        UserRole::Unknown => "Unrecognised role; no permissions",
    }
}

fn permission_description(permission: &Permission) -> String {
    if permission.is_wildcard() {
        return "Wildcard permission - grants all permissions".to_string();
    }

    let action = match permission.action() {
        Some("read") => "View/list",
        Some("create") => "Create new",
        Some("update") => "Edit",
        Some("delete") => "Delete",
        Some("approve") => "Approve",
        Some(other) => other,
        None => "Access",
    };
    format!("{} {} resources", action, permission.resource())
}
