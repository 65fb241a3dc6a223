//! User role tier.
//!
//! Roles are derived client-side from token claims or profile data and are
//! used for screen routing only. The backend remains authoritative for every
//! actual permission check.

use serde::{Deserialize, Serialize};

/// Permission tier of the signed-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Role {
    /// Platform administrator (back-office).
    Admin,
    /// Store manager (per-tenant back-office).
    Manager,
    /// Regular customer. The least-privileged tier and the fallback when no
    /// role source is available.
    #[default]
    Customer,
}

impl Role {
    /// Normalize an arbitrary backend-supplied role string.
    ///
    /// The backend is inconsistent about role spelling ("Admin",
    /// "administrator", "StoreManager", "tenant_owner", ...), so matching is
    /// case-insensitive and substring-based. Unrecognized values map to
    /// [`Role::Customer`].
    #[must_use]
    pub fn normalize(raw: &str) -> Self {
        let lower = raw.to_lowercase();
        if lower.contains("admin") {
            Self::Admin
        } else if lower.contains("manager") || lower.contains("store") || lower.contains("tenant") {
            Self::Manager
        } else {
            Self::Customer
        }
    }

    /// Canonical wire spelling.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Manager => "Manager",
            Self::Customer => "Customer",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::normalize(s))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_admin_variants() {
        assert_eq!(Role::normalize("Admin"), Role::Admin);
        assert_eq!(Role::normalize("ADMINISTRATOR"), Role::Admin);
        assert_eq!(Role::normalize("admin"), Role::Admin);
    }

    #[test]
    fn test_normalize_manager_variants() {
        assert_eq!(Role::normalize("Manager"), Role::Manager);
        assert_eq!(Role::normalize("StoreManager"), Role::Manager);
        assert_eq!(Role::normalize("tenant_owner"), Role::Manager);
    }

    #[test]
    fn test_normalize_falls_back_to_customer() {
        assert_eq!(Role::normalize("Customer"), Role::Customer);
        assert_eq!(Role::normalize("member"), Role::Customer);
        assert_eq!(Role::normalize(""), Role::Customer);
    }

    #[test]
    fn test_default_is_least_privileged() {
        assert_eq!(Role::default(), Role::Customer);
    }

    #[test]
    fn test_serde_pascal_case() {
        assert_eq!(serde_json::to_string(&Role::Manager).unwrap(), "\"Manager\"");
        let role: Role = serde_json::from_str("\"Admin\"").unwrap();
        assert_eq!(role, Role::Admin);
    }
}
