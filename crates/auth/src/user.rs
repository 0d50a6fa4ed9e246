use serde::{Deserialize, Serialize};

use midplat_core::{BrandId, UserId};

use crate::UserRole;

/// The signed-in user as reported by the backend's user-info endpoint.
///
/// Owned by the session: replaced wholesale on login, dropped on logout or on
/// any 401.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub roles: Vec<UserRole>,
    #[serde(default)]
    pub brand_id: Option<BrandId>,
}

impl CurrentUser {
    pub fn new(id: UserId, username: impl Into<String>, roles: Vec<UserRole>) -> Self {
        Self {
            id,
            username: username.into(),
            nickname: None,
            roles,
            brand_id: None,
        }
    }

    /// Role membership. [`UserRole::Unknown`] never matches.
    pub fn has_role(&self, role: UserRole) -> bool {
        role.is_known() && self.roles.contains(&role)
    }

    pub fn is_platform_admin(&self) -> bool {
        self.has_role(UserRole::PlatformAdmin)
    }

    pub fn display_name(&self) -> &str {
        self.nickname.as_deref().unwrap_or(&self.username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_backend_payload() {
        let user: CurrentUser = serde_json::from_str(
            r#"{"id":12,"username":"ops","roles":["brand_admin","marketing_intern"],"brandId":3,"email":"x@y"}"#,
        )
        .unwrap();
        assert_eq!(user.id, UserId::new(12));
        assert_eq!(user.roles, vec![UserRole::BrandAdmin, UserRole::Unknown]);
        assert_eq!(user.brand_id, Some(BrandId::new(3)));
        assert_eq!(user.display_name(), "ops");
    }

    #[test]
    fn unknown_role_never_matches() {
        let user = CurrentUser::new(UserId::new(1), "u", vec![UserRole::Unknown]);
        assert!(!user.has_role(UserRole::Unknown));
        assert!(!user.is_platform_admin());
    }
}
