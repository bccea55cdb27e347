use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Per-organization membership role.
///
/// Variants are declared in ascending order of privilege so the derived
/// `Ord` matches the hierarchy: owner > admin > member > guest. Authorization
/// uses a strict `>` comparison, so equal rank always passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OrganizationRole {
    Guest,
    Member,
    Admin,
    Owner,
}

impl OrganizationRole {
    /// Ordinal rank of this role within the hierarchy.
    pub fn rank(&self) -> u8 {
        match self {
            OrganizationRole::Guest => 1,
            OrganizationRole::Member => 2,
            OrganizationRole::Admin => 3,
            OrganizationRole::Owner => 4,
        }
    }
}

/// Platform-wide role on the user record. Orthogonal to the organization
/// hierarchy: a global admin holds no implicit rank in any organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GlobalRole {
    Member,
    Admin,
}

/// Privilege level a route demands from the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredRole {
    /// Caller's user record must carry the global admin role.
    GlobalAdmin,
    /// Caller's membership in the target organization must rank at least
    /// as high as the given role.
    Org(OrganizationRole),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn hierarchy_is_totally_ordered() {
        assert!(OrganizationRole::Owner > OrganizationRole::Admin);
        assert!(OrganizationRole::Admin > OrganizationRole::Member);
        assert!(OrganizationRole::Member > OrganizationRole::Guest);
        assert!(OrganizationRole::Owner > OrganizationRole::Guest);
    }

    #[test]
    fn ord_agrees_with_rank() {
        let roles = [
            OrganizationRole::Guest,
            OrganizationRole::Member,
            OrganizationRole::Admin,
            OrganizationRole::Owner,
        ];
        for a in roles {
            for b in roles {
                assert_eq!(a.cmp(&b), a.rank().cmp(&b.rank()));
            }
        }
    }

    #[test]
    fn equal_rank_is_not_greater() {
        // The authorization check denies only on strict >, so this is the
        // tie-break boundary.
        assert!(!(OrganizationRole::Admin > OrganizationRole::Admin));
    }

    #[test]
    fn roles_round_trip_as_lowercase_strings() {
        assert_eq!(OrganizationRole::Owner.to_string(), "owner");
        assert_eq!(OrganizationRole::from_str("guest").unwrap(), OrganizationRole::Guest);
        assert!(OrganizationRole::from_str("superuser").is_err());
        assert_eq!(GlobalRole::Admin.to_string(), "admin");
        assert_eq!(GlobalRole::from_str("member").unwrap(), GlobalRole::Member);
    }
}
