//! redb-backed registry.

use crate::record::{CertificateRecord, OrgRecord};
use certanchor_core::{ActorId, CertificateId, Fingerprint, OrgId};
use redb::{Database, ReadableTable, TableDefinition};
use std::path::Path;
use tracing::debug;

const CERTS: TableDefinition<&str, &[u8]> = TableDefinition::new("certificates");
const CERT_BY_ID: TableDefinition<&str, &str> = TableDefinition::new("certificates_by_id");
const CERT_BY_CONTENT: TableDefinition<&str, &str> =
    TableDefinition::new("certificates_by_content");
const ORGS: TableDefinition<&str, &[u8]> = TableDefinition::new("organizations");
const ORG_BY_NAME: TableDefinition<&str, &str> = TableDefinition::new("organizations_by_name");
const ACTORS: TableDefinition<&str, &str> = TableDefinition::new("actor_directory");

/// Registry errors
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Unique constraint violation
    #[error("{kind} already exists: {id}")]
    AlreadyExists {
        /// Entity kind
        kind: &'static str,
        /// Conflicting key
        id: String,
    },
    /// Row not found
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Entity kind
        kind: &'static str,
        /// Missing key
        id: String,
    },
    /// Revoked flag is monotonic; the record was already revoked
    #[error("certificate already revoked: {id}")]
    AlreadyRevoked {
        /// Certificate id
        id: String,
    },
    /// Row encoding failure
    #[error("row encoding failure: {0}")]
    Encoding(#[from] postcard::Error),
    /// Storage engine failure
    #[error("registry backend failure: {0}")]
    Backend(#[from] redb::Error),
}

macro_rules! backend_from {
    ($($err:ty),+) => {
        $(
            impl From<$err> for RegistryError {
                fn from(e: $err) -> Self {
                    Self::Backend(e.into())
                }
            }
        )+
    };
}

backend_from!(
    redb::DatabaseError,
    redb::TransactionError,
    redb::TableError,
    redb::StorageError,
    redb::CommitError
);

/// Durable record store for certificates, organizations, and the actor
/// directory. Concurrency control is delegated to redb's transactions.
pub struct Registry {
    db: Database,
}

impl Registry {
    /// Open (or create) the registry at the given path.
    ///
    /// # Errors
    ///
    /// Returns error if the database cannot be opened or initialized
    pub fn open(path: &Path) -> Result<Self, RegistryError> {
        let db = Database::create(path)?;
        // Materialize all tables so reads never hit a missing table.
        let txn = db.begin_write()?;
        {
            txn.open_table(CERTS)?;
            txn.open_table(CERT_BY_ID)?;
            txn.open_table(CERT_BY_CONTENT)?;
            txn.open_table(ORGS)?;
            txn.open_table(ORG_BY_NAME)?;
            txn.open_table(ACTORS)?;
        }
        txn.commit()?;
        Ok(Self { db })
    }

    // ------------------------------------------------------------------
    // Organizations
    // ------------------------------------------------------------------

    /// Create an organization; names are unique.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` on a name collision
    pub fn create_organization(
        &self,
        name: &str,
        wallet_address: Option<String>,
        domain: Option<String>,
    ) -> Result<OrgRecord, RegistryError> {
        let org = OrgRecord::new(name.to_string(), wallet_address, domain);
        let org_key = org.id.as_uuid().to_string();
        let bytes = postcard::to_allocvec(&org)?;

        let txn = self.db.begin_write()?;
        {
            let mut by_name = txn.open_table(ORG_BY_NAME)?;
            if by_name.get(name)?.is_some() {
                return Err(RegistryError::AlreadyExists {
                    kind: "organization",
                    id: name.to_string(),
                });
            }
            by_name.insert(name, org_key.as_str())?;
            let mut orgs = txn.open_table(ORGS)?;
            orgs.insert(org_key.as_str(), bytes.as_slice())?;
        }
        txn.commit()?;
        debug!(org = %org.id, name, "created organization");
        Ok(org)
    }

    /// Fetch an organization by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if absent
    pub fn organization(&self, org: OrgId) -> Result<OrgRecord, RegistryError> {
        let txn = self.db.begin_read()?;
        let orgs = txn.open_table(ORGS)?;
        let key = org.as_uuid().to_string();
        let guard = orgs.get(key.as_str())?.ok_or(RegistryError::NotFound {
            kind: "organization",
            id: org.to_string(),
        })?;
        Ok(postcard::from_bytes(guard.value())?)
    }

    /// Look up an organization by its unique name
    ///
    /// # Errors
    ///
    /// Returns error on backend failure
    pub fn organization_by_name(&self, name: &str) -> Result<Option<OrgRecord>, RegistryError> {
        let txn = self.db.begin_read()?;
        let by_name = txn.open_table(ORG_BY_NAME)?;
        let Some(id_guard) = by_name.get(name)? else {
            return Ok(None);
        };
        let key = id_guard.value().to_string();
        drop(id_guard);
        let orgs = txn.open_table(ORGS)?;
        let Some(guard) = orgs.get(key.as_str())? else {
            return Ok(None);
        };
        Ok(Some(postcard::from_bytes(guard.value())?))
    }

    // ------------------------------------------------------------------
    // Actor directory (auth boundary)
    // ------------------------------------------------------------------

    /// Associate an authenticated actor with an organization.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the organization does not exist
    pub fn link_actor(&self, actor: ActorId, org: OrgId) -> Result<(), RegistryError> {
        // Referential check before the directory write.
        self.organization(org)?;
        let txn = self.db.begin_write()?;
        {
            let mut actors = txn.open_table(ACTORS)?;
            actors.insert(
                actor.as_uuid().to_string().as_str(),
                org.as_uuid().to_string().as_str(),
            )?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Resolve an actor to its organization, if any
    ///
    /// # Errors
    ///
    /// Returns error on backend failure
    pub fn resolve_actor_org(&self, actor: ActorId) -> Result<Option<OrgId>, RegistryError> {
        let txn = self.db.begin_read()?;
        let actors = txn.open_table(ACTORS)?;
        let key = actor.as_uuid().to_string();
        let Some(guard) = actors.get(key.as_str())? else {
            return Ok(None);
        };
        let org: OrgId = guard
            .value()
            .parse()
            .map_err(|_| RegistryError::NotFound {
                kind: "organization",
                id: guard.value().to_string(),
            })?;
        Ok(Some(org))
    }

    // ------------------------------------------------------------------
    // Certificates
    // ------------------------------------------------------------------

    /// Persist a new certificate record atomically.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` on a fingerprint collision; the existing
    /// row is never overwritten
    pub fn insert_certificate(&self, record: &CertificateRecord) -> Result<(), RegistryError> {
        let fp_key = record.fingerprint.to_hex();
        let id_key = record.id.as_uuid().to_string();
        let bytes = postcard::to_allocvec(record)?;

        let txn = self.db.begin_write()?;
        {
            let mut certs = txn.open_table(CERTS)?;
            if certs.get(fp_key.as_str())?.is_some() {
                return Err(RegistryError::AlreadyExists {
                    kind: "certificate",
                    id: fp_key,
                });
            }
            certs.insert(fp_key.as_str(), bytes.as_slice())?;

            let mut by_id = txn.open_table(CERT_BY_ID)?;
            by_id.insert(id_key.as_str(), fp_key.as_str())?;

            if let Some(content_hash) = &record.content_hash {
                let mut by_content = txn.open_table(CERT_BY_CONTENT)?;
                by_content.insert(content_hash.to_hex().as_str(), fp_key.as_str())?;
            }
        }
        txn.commit()?;
        debug!(certificate = %record.id, fingerprint = %record.fingerprint, "persisted certificate record");
        Ok(())
    }

    /// Fetch a certificate by its canonical fingerprint
    ///
    /// # Errors
    ///
    /// Returns error on backend failure
    pub fn certificate_by_fingerprint(
        &self,
        fingerprint: &Fingerprint,
    ) -> Result<Option<CertificateRecord>, RegistryError> {
        let txn = self.db.begin_read()?;
        let certs = txn.open_table(CERTS)?;
        let key = fingerprint.to_hex();
        let Some(guard) = certs.get(key.as_str())? else {
            return Ok(None);
        };
        Ok(Some(postcard::from_bytes(guard.value())?))
    }

    /// Fetch a certificate by id
    ///
    /// # Errors
    ///
    /// Returns error on backend failure
    pub fn certificate_by_id(
        &self,
        id: CertificateId,
    ) -> Result<Option<CertificateRecord>, RegistryError> {
        let txn = self.db.begin_read()?;
        let by_id = txn.open_table(CERT_BY_ID)?;
        let key = id.as_uuid().to_string();
        let Some(fp_guard) = by_id.get(key.as_str())? else {
            return Ok(None);
        };
        let fp_key = fp_guard.value().to_string();
        drop(fp_guard);
        let certs = txn.open_table(CERTS)?;
        let Some(guard) = certs.get(fp_key.as_str())? else {
            return Ok(None);
        };
        Ok(Some(postcard::from_bytes(guard.value())?))
    }

    /// Fetch a certificate through the artifact content-hash index
    ///
    /// # Errors
    ///
    /// Returns error on backend failure
    pub fn certificate_by_content_hash(
        &self,
        content_hash: &Fingerprint,
    ) -> Result<Option<CertificateRecord>, RegistryError> {
        let txn = self.db.begin_read()?;
        let by_content = txn.open_table(CERT_BY_CONTENT)?;
        let key = content_hash.to_hex();
        let Some(fp_guard) = by_content.get(key.as_str())? else {
            return Ok(None);
        };
        let fp_key = fp_guard.value().to_string();
        drop(fp_guard);
        let certs = txn.open_table(CERTS)?;
        let Some(guard) = certs.get(fp_key.as_str())? else {
            return Ok(None);
        };
        Ok(Some(postcard::from_bytes(guard.value())?))
    }

    /// Flip the revoked flag and record the revocation transaction.
    ///
    /// # Errors
    ///
    /// `NotFound` for unknown ids, `AlreadyRevoked` if the flag is set
    pub fn mark_revoked(
        &self,
        id: CertificateId,
        revocation_tx_ref: &str,
    ) -> Result<CertificateRecord, RegistryError> {
        let id_key = id.as_uuid().to_string();
        let txn = self.db.begin_write()?;
        let updated = {
            let by_id = txn.open_table(CERT_BY_ID)?;
            let fp_key = by_id
                .get(id_key.as_str())?
                .ok_or(RegistryError::NotFound {
                    kind: "certificate",
                    id: id.to_string(),
                })?
                .value()
                .to_string();
            drop(by_id);

            let mut certs = txn.open_table(CERTS)?;
            let mut record: CertificateRecord = {
                let guard = certs.get(fp_key.as_str())?.ok_or(RegistryError::NotFound {
                    kind: "certificate",
                    id: fp_key.clone(),
                })?;
                postcard::from_bytes(guard.value())?
            };
            if record.revoked {
                return Err(RegistryError::AlreadyRevoked { id: id.to_string() });
            }
            record.revoked = true;
            record.revocation_tx_ref = Some(revocation_tx_ref.to_string());
            let bytes = postcard::to_allocvec(&record)?;
            certs.insert(fp_key.as_str(), bytes.as_slice())?;
            record
        };
        txn.commit()?;
        debug!(certificate = %id, "certificate marked revoked");
        Ok(updated)
    }

    /// Administrative delete: removes the row and its index entries only.
    /// The on-chain state and any stored artifact are untouched.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown ids
    pub fn delete_certificate(
        &self,
        id: CertificateId,
    ) -> Result<CertificateRecord, RegistryError> {
        let id_key = id.as_uuid().to_string();
        let txn = self.db.begin_write()?;
        let removed = {
            let mut by_id = txn.open_table(CERT_BY_ID)?;
            let fp_key = by_id
                .remove(id_key.as_str())?
                .ok_or(RegistryError::NotFound {
                    kind: "certificate",
                    id: id.to_string(),
                })?
                .value()
                .to_string();

            let mut certs = txn.open_table(CERTS)?;
            let record: CertificateRecord = {
                let guard = certs.remove(fp_key.as_str())?.ok_or(RegistryError::NotFound {
                    kind: "certificate",
                    id: fp_key.clone(),
                })?;
                postcard::from_bytes(guard.value())?
            };

            if let Some(content_hash) = &record.content_hash {
                let mut by_content = txn.open_table(CERT_BY_CONTENT)?;
                by_content.remove(content_hash.to_hex().as_str())?;
            }
            record
        };
        txn.commit()?;
        debug!(certificate = %id, "certificate record deleted");
        Ok(removed)
    }

    /// All certificates issued by an organization. An organization with no
    /// issuances gets an explicit empty collection.
    ///
    /// # Errors
    ///
    /// Returns error on backend failure
    pub fn certificates_for_org(
        &self,
        org: OrgId,
    ) -> Result<Vec<CertificateRecord>, RegistryError> {
        let txn = self.db.begin_read()?;
        let certs = txn.open_table(CERTS)?;
        let mut out = Vec::new();
        for row in certs.iter()? {
            let (_, value) = row?;
            let record: CertificateRecord = postcard::from_bytes(value.value())?;
            if record.issued_by == org {
                out.push(record);
            }
        }
        Ok(out)
    }
}
