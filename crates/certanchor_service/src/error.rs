//! The service-level error taxonomy.
//!
//! Component crates carry their own error enums; this type is the single
//! vocabulary the HTTP boundary maps to status codes. Registry constraint
//! violations are folded into the taxonomy here so handlers never see
//! storage-engine detail.

use certanchor_core::CoreError;
use certanchor_ledger::LedgerError;
use certanchor_registry::RegistryError;
use certanchor_render::RenderError;
use certanchor_store::StoreError;

/// Service result type
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced by issuance, revocation, and verification flows
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// A request field failed validation
    #[error(transparent)]
    Validation(#[from] CoreError),

    /// The actor may not perform this operation
    #[error("not authorized: {reason}")]
    Authorization {
        /// Why the operation was refused
        reason: String,
    },

    /// A referenced entity does not exist
    #[error("not found: {what}")]
    NotFound {
        /// What was missing
        what: String,
    },

    /// A uniqueness constraint was violated; the existing row is untouched
    #[error("conflict: {what} already exists")]
    Conflict {
        /// The conflicting entity
        what: String,
    },

    /// The certificate was already revoked; revocation is monotonic
    #[error("certificate already revoked: {id}")]
    AlreadyRevoked {
        /// Certificate id
        id: String,
    },

    /// Artifact rendering failed; fatal to the issuance attempt
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Off-site storage was required but the artifact could not land there
    #[error("off-site storage required but unavailable: {reason}")]
    OffsiteStorage {
        /// Upload failure detail
        reason: String,
    },

    /// Local artifact storage failed; fatal, there is no further fallback
    #[error(transparent)]
    Storage(StoreError),

    /// A ledger submission or query failed
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// The record store failed outside of its constraint guards
    #[error(transparent)]
    Registry(RegistryError),
}

impl From<RegistryError> for ServiceError {
    fn from(e: RegistryError) -> Self {
        match e {
            RegistryError::AlreadyExists { kind, id } => Self::Conflict {
                what: format!("{kind} {id}"),
            },
            RegistryError::NotFound { kind, id } => Self::NotFound {
                what: format!("{kind} {id}"),
            },
            RegistryError::AlreadyRevoked { id } => Self::AlreadyRevoked { id },
            other => Self::Registry(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_constraints_fold_into_taxonomy() {
        let conflict: ServiceError = RegistryError::AlreadyExists {
            kind: "certificate",
            id: "abc".to_string(),
        }
        .into();
        assert!(matches!(conflict, ServiceError::Conflict { .. }));

        let missing: ServiceError = RegistryError::NotFound {
            kind: "organization",
            id: "xyz".to_string(),
        }
        .into();
        assert!(matches!(missing, ServiceError::NotFound { .. }));

        let revoked: ServiceError = RegistryError::AlreadyRevoked {
            id: "cert_1".to_string(),
        }
        .into();
        assert!(matches!(revoked, ServiceError::AlreadyRevoked { .. }));
    }

    #[test]
    fn test_validation_display_is_transparent() {
        let err: ServiceError = CoreError::validation("owner_name", "must not be empty").into();
        assert_eq!(
            err.to_string(),
            "validation failed for owner_name: must not be empty"
        );
    }
}
