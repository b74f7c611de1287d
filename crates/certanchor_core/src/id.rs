//! Unique identifiers for certanchor entities.
//!
//! All IDs are UUIDs and are serialized in canonical format.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

macro_rules! entity_id {
    ($(#[$doc:meta])* $name:ident, $prefix:literal) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new random id
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Create from UUID bytes
            #[must_use]
            pub const fn from_bytes(bytes: [u8; 16]) -> Self {
                Self(Uuid::from_bytes(bytes))
            }

            /// Get as UUID
            #[must_use]
            pub const fn as_uuid(&self) -> Uuid {
                self.0
            }

            /// Get as bytes
            #[must_use]
            pub const fn as_bytes(&self) -> &[u8; 16] {
                self.0.as_bytes()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let raw = s.strip_prefix($prefix).unwrap_or(s);
                Ok(Self(Uuid::parse_str(raw)?))
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }
    };
}

entity_id!(
    /// Certificate record identifier
    CertificateId,
    "cert_"
);

entity_id!(
    /// Issuing-organization identifier
    OrgId,
    "org_"
);

entity_id!(
    /// Authenticated-actor identifier, supplied by the external auth boundary
    ActorId,
    "act_"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_unique() {
        assert_ne!(CertificateId::new(), CertificateId::new());
        assert_ne!(OrgId::new(), OrgId::new());
    }

    #[test]
    fn test_display_prefix() {
        let id = CertificateId::new();
        assert!(id.to_string().starts_with("cert_"));
        assert!(OrgId::new().to_string().starts_with("org_"));
        assert!(ActorId::new().to_string().starts_with("act_"));
    }

    #[test]
    fn test_parse_round_trip() {
        let id = ActorId::new();
        let parsed: ActorId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_parse_without_prefix() {
        let id = OrgId::new();
        let parsed: OrgId = id.as_uuid().to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("not-a-uuid".parse::<CertificateId>().is_err());
    }

    #[test]
    fn test_from_bytes() {
        let id = CertificateId::from_bytes([1u8; 16]);
        assert_eq!(id.as_bytes(), &[1u8; 16]);
    }
}
