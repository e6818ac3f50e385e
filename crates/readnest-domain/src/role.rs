//! Account role model.

use serde::{Deserialize, Serialize};

/// Account role.
///
/// Closed set on purpose: role checks compare enum values, not strings, so a
/// typo cannot silently grant or deny access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    User,
    Admin,
}

const ALL_ROLES: [Role; 2] = [Role::User, Role::Admin];

impl Role {
    /// Parse from the canonical uppercase name. Returns `None` for unknown names.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "USER" => Some(Self::User),
            "ADMIN" => Some(Self::Admin),
            _ => None,
        }
    }

    /// Canonical uppercase name, as carried in session-token claims.
    pub fn as_name(self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Admin => "ADMIN",
        }
    }

    fn bit(self) -> u32 {
        match self {
            Self::User => 1 << 0,
            Self::Admin => 1 << 1,
        }
    }
}

/// Set of roles held by one account.
///
/// Storage format: integer bitmask (bit 0 = USER, bit 1 = ADMIN). Bits that
/// do not map to a known role are dropped on load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoleSet(u32);

impl RoleSet {
    pub fn empty() -> Self {
        Self(0)
    }

    /// The set every new registration starts with: USER only.
    pub fn base() -> Self {
        Self(Role::User.bit())
    }

    pub fn with(self, role: Role) -> Self {
        Self(self.0 | role.bit())
    }

    pub fn insert(&mut self, role: Role) {
        self.0 |= role.bit();
    }

    pub fn contains(self, role: Role) -> bool {
        self.0 & role.bit() != 0
    }

    pub fn iter(self) -> impl Iterator<Item = Role> {
        ALL_ROLES.into_iter().filter(move |role| self.contains(*role))
    }

    /// Canonical names of the contained roles, lowest bit first.
    pub fn names(self) -> Vec<String> {
        self.iter().map(|role| role.as_name().to_owned()).collect()
    }

    pub fn as_bits(self) -> i32 {
        self.0 as i32
    }

    /// Load from a storage bitmask.
    pub fn from_bits(bits: i32) -> Self {
        let known = ALL_ROLES.iter().fold(0, |acc, role| acc | role.bit());
        Self(bits as u32 & known)
    }
}
