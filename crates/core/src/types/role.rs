//! User roles.
//!
//! A role has two spellings: the form name shown to operators
//! (`administrator`, `salesperson`, `veterinarian`) and the wire name the
//! API stores (`admin`, `salesperson`, `veterinarian`). Only the
//! administrator spelling differs.

use serde::{Deserialize, Serialize};

/// Role of a system user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Full access, including user management.
    Administrator,
    /// Sales staff. Also the role assumed when the API sends none.
    #[default]
    Salesperson,
    /// Veterinary staff.
    Veterinarian,
}

impl UserRole {
    /// All roles in the order they are offered in forms.
    pub const ALL: [Self; 3] = [Self::Administrator, Self::Salesperson, Self::Veterinarian];

    /// Name used in forms and on the command line.
    #[must_use]
    pub const fn form_name(self) -> &'static str {
        match self {
            Self::Administrator => "administrator",
            Self::Salesperson => "salesperson",
            Self::Veterinarian => "veterinarian",
        }
    }

    /// Name transmitted to the API.
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::Administrator => "admin",
            Self::Salesperson => "salesperson",
            Self::Veterinarian => "veterinarian",
        }
    }

    /// Map an API role back to a form role.
    ///
    /// Absent or unrecognised values read as [`UserRole::Salesperson`].
    #[must_use]
    pub fn from_wire(value: Option<&str>) -> Self {
        match value {
            Some("admin") => Self::Administrator,
            Some("veterinarian") => Self::Veterinarian,
            _ => Self::Salesperson,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.form_name())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.form_name() == s)
            .ok_or_else(|| format!("invalid user role: {s}"))
    }
}
