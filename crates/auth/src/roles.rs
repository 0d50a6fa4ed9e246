use core::str::FromStr;

use serde::{Deserialize, Serialize};

use midplat_core::DomainError;

/// Role a console user can hold.
///
/// The set differs slightly between the admin console and the H5 client; any
/// role string the backend sends that is not listed here deserializes to
/// [`UserRole::Unknown`], which grants nothing and never satisfies a role check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    PlatformAdmin,
    BrandAdmin,
    Distributor,
    Participant,
    Anonymous,
    #[serde(other)]
    Unknown,
}

impl UserRole {
    /// Every role with a defined meaning, in descending privilege.
    pub const KNOWN: [UserRole; 5] = [
        UserRole::PlatformAdmin,
        UserRole::BrandAdmin,
        UserRole::Distributor,
        UserRole::Participant,
        UserRole::Anonymous,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::PlatformAdmin => "platform_admin",
            UserRole::BrandAdmin => "brand_admin",
            UserRole::Distributor => "distributor",
            UserRole::Participant => "participant",
            UserRole::Anonymous => "anonymous",
            UserRole::Unknown => "unknown",
        }
    }

    pub fn is_known(&self) -> bool {
        *self != UserRole::Unknown
    }
}

impl core::fmt::Display for UserRole {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UserRole::KNOWN
            .into_iter()
            .find(|role| role.as_str() == s.trim())
            .ok_or_else(|| DomainError::validation(format!("unknown role '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_snake_case() {
        for role in UserRole::KNOWN {
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{}\"", role.as_str()));
            assert_eq!(role.as_str().parse::<UserRole>().unwrap(), role);
        }
    }

    #[test]
    fn unrecognised_backend_role_is_unknown() {
        let role: UserRole = serde_json::from_str("\"super_operator\"").unwrap();
        assert_eq!(role, UserRole::Unknown);
        assert!(!role.is_known());
        assert!("super_operator".parse::<UserRole>().is_err());
    }
}
