//! Identity atoms.
//!
//! VehicleId: stable catalog entity identifier
//! UserEmail: authenticated admin identity for audit records

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::{CoreError, InvalidId};

/// Vehicle identifier - non-empty string, immutable after creation.
///
/// Ids come from the remote store for existing rows; `generate` mints one for
/// a new upload. No two vehicles share an id.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VehicleId(String);

impl VehicleId {
    pub fn new(s: impl Into<String>) -> Result<Self, CoreError> {
        let s = s.into();
        if s.trim().is_empty() {
            Err(InvalidId::Vehicle {
                raw: s,
                reason: "empty".into(),
            }
            .into())
        } else {
            Ok(Self(s))
        }
    }

    /// Mint a fresh id for a locally-created vehicle.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VehicleId({:?})", self.0)
    }
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Admin identity attached to audit records.
///
/// Only shape-checked: non-empty and contains `@`. The remote auth layer is
/// the authority on what constitutes a valid account.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserEmail(String);

impl UserEmail {
    pub fn new(s: impl Into<String>) -> Result<Self, CoreError> {
        let s = s.into();
        if s.trim().is_empty() {
            return Err(InvalidId::UserEmail {
                raw: s,
                reason: "empty".into(),
            }
            .into());
        }
        if !s.contains('@') {
            return Err(InvalidId::UserEmail {
                raw: s,
                reason: "missing '@'".into(),
            }
            .into());
        }
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for UserEmail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserEmail({:?})", self.0)
    }
}

impl fmt::Display for UserEmail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vehicle_id_rejects_empty() {
        assert!(VehicleId::new("").is_err());
        assert!(VehicleId::new("   ").is_err());
        assert!(VehicleId::new("abc-123").is_ok());
    }

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(VehicleId::generate(), VehicleId::generate());
    }

    #[test]
    fn user_email_requires_at_sign() {
        assert!(UserEmail::new("admin").is_err());
        assert!(UserEmail::new("admin@example.com").is_ok());
    }
}
