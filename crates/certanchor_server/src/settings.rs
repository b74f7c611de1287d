//! Server settings.
//!
//! Every flag doubles as an environment variable so container deployments
//! can configure the binary without a wrapper script. Absent object-store
//! or ledger settings select the corresponding degraded mode at startup.

use certanchor_ledger::LedgerConfig;
use certanchor_service::ServiceConfig;
use certanchor_store::{LocalConfig, RemoteConfig};
use clap::Parser;
use secrecy::SecretString;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Certanchor server settings
#[derive(Debug, Parser)]
#[command(name = "certanchor-server")]
#[command(about = "Blockchain-anchored certificate issuance and verification", long_about = None)]
pub struct Settings {
    /// Bind address
    #[arg(long, env = "CERTANCHOR_BIND", default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,

    /// Registry database path
    #[arg(long, env = "CERTANCHOR_DB", default_value = "certanchor.redb")]
    pub db_path: PathBuf,

    /// Staging directory for rendered artifacts
    #[arg(long, env = "CERTANCHOR_STAGING", default_value = "staging")]
    pub staging_dir: PathBuf,

    /// Root directory for local-fallback artifact copies
    #[arg(long, env = "CERTANCHOR_STORAGE_ROOT", default_value = "storage")]
    pub storage_root: PathBuf,

    /// Bucket namespace for artifacts, local and remote
    #[arg(long, env = "CERTANCHOR_BUCKET", default_value = "certificates")]
    pub bucket: String,

    /// Base URL this server is reachable at (static artifact links)
    #[arg(long, env = "CERTANCHOR_PUBLIC_BASE", default_value = "http://localhost:8080")]
    pub public_base: String,

    /// Base URL of the human-facing verification frontend
    #[arg(long, env = "CERTANCHOR_FRONTEND_BASE", default_value = "http://localhost:3000")]
    pub frontend_base: String,

    /// Refuse issuance rather than fall back to a local artifact copy
    #[arg(long, env = "CERTANCHOR_REQUIRE_OFFSITE")]
    pub require_offsite: bool,

    /// Object store endpoint; unset selects local-only storage
    #[arg(long, env = "CERTANCHOR_OBJECT_STORE_ENDPOINT")]
    pub object_store_endpoint: Option<String>,

    /// Object store access key
    #[arg(long, env = "CERTANCHOR_OBJECT_STORE_ACCESS_KEY")]
    pub object_store_access_key: Option<String>,

    /// Object store secret key
    #[arg(long, env = "CERTANCHOR_OBJECT_STORE_SECRET_KEY", hide_env_values = true)]
    pub object_store_secret_key: Option<String>,

    /// Signed artifact URL lifetime, seconds
    #[arg(long, env = "CERTANCHOR_URL_TTL_SECS", default_value_t = 3600)]
    pub url_ttl_secs: u64,

    /// Object store request timeout, seconds
    #[arg(long, env = "CERTANCHOR_STORE_TIMEOUT_SECS", default_value_t = 10)]
    pub store_timeout_secs: u64,

    /// Ledger gateway endpoint; unset selects the mock ledger
    #[arg(long, env = "CERTANCHOR_LEDGER_ENDPOINT")]
    pub ledger_endpoint: Option<String>,

    /// Ledger signing credential
    #[arg(long, env = "CERTANCHOR_LEDGER_CREDENTIAL", hide_env_values = true)]
    pub ledger_credential: Option<String>,

    /// Certificate contract address on the ledger
    #[arg(long, env = "CERTANCHOR_LEDGER_CONTRACT", default_value = "")]
    pub ledger_contract: String,

    /// This service's signing identity as known to the gateway
    #[arg(long, env = "CERTANCHOR_LEDGER_IDENTITY", default_value = "certanchor")]
    pub ledger_identity: String,

    /// Bound on ledger submit-and-confirm waits, seconds
    #[arg(long, env = "CERTANCHOR_CONFIRM_TIMEOUT_SECS", default_value_t = 120)]
    pub confirm_timeout_secs: u64,

    /// Bound on read-only ledger queries, seconds
    #[arg(long, env = "CERTANCHOR_QUERY_TIMEOUT_SECS", default_value_t = 5)]
    pub query_timeout_secs: u64,
}

impl Settings {
    /// Local artifact storage configuration
    #[must_use]
    pub fn local_config(&self) -> LocalConfig {
        LocalConfig {
            root: self.storage_root.clone(),
            bucket: self.bucket.clone(),
            public_base: self.public_base.clone(),
        }
    }

    /// Remote object-store configuration; `None` unless endpoint and both
    /// keys are set
    #[must_use]
    pub fn remote_config(&self) -> Option<RemoteConfig> {
        match (
            &self.object_store_endpoint,
            &self.object_store_access_key,
            &self.object_store_secret_key,
        ) {
            (Some(endpoint), Some(access_key), Some(secret_key)) => Some(RemoteConfig {
                endpoint: endpoint.clone(),
                bucket: self.bucket.clone(),
                access_key: access_key.clone(),
                secret_key: SecretString::from(secret_key.clone()),
                url_ttl: Duration::from_secs(self.url_ttl_secs),
                request_timeout: Duration::from_secs(self.store_timeout_secs),
            }),
            _ => None,
        }
    }

    /// Ledger adapter configuration
    #[must_use]
    pub fn ledger_config(&self) -> LedgerConfig {
        LedgerConfig {
            endpoint: self.ledger_endpoint.clone(),
            credential: self
                .ledger_credential
                .clone()
                .map(SecretString::from),
            contract: self.ledger_contract.clone(),
            identity: self.ledger_identity.clone(),
            confirm_timeout: Duration::from_secs(self.confirm_timeout_secs),
            query_timeout: Duration::from_secs(self.query_timeout_secs),
        }
    }

    /// Orchestrator configuration
    #[must_use]
    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            frontend_base: self.frontend_base.clone(),
            require_offsite: self.require_offsite,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_parse() {
        let settings = Settings::parse_from(["certanchor-server"]);
        assert_eq!(settings.bucket, "certificates");
        assert!(settings.remote_config().is_none());
        assert!(settings.ledger_config().endpoint.is_none());
        assert!(!settings.require_offsite);
    }

    #[test]
    fn test_remote_config_needs_all_three() {
        let settings = Settings::parse_from([
            "certanchor-server",
            "--object-store-endpoint",
            "http://minio:9000",
            "--object-store-access-key",
            "AK",
        ]);
        assert!(settings.remote_config().is_none());

        let settings = Settings::parse_from([
            "certanchor-server",
            "--object-store-endpoint",
            "http://minio:9000",
            "--object-store-access-key",
            "AK",
            "--object-store-secret-key",
            "SK",
        ]);
        let remote = settings.remote_config().unwrap();
        assert_eq!(remote.endpoint, "http://minio:9000");
        assert_eq!(remote.url_ttl, Duration::from_secs(3600));
    }

    #[test]
    fn test_ledger_config_wiring() {
        let settings = Settings::parse_from([
            "certanchor-server",
            "--ledger-endpoint",
            "http://gateway:8545",
            "--ledger-credential",
            "key",
            "--confirm-timeout-secs",
            "30",
        ]);
        let config = settings.ledger_config();
        assert_eq!(config.endpoint.as_deref(), Some("http://gateway:8545"));
        assert!(config.credential.is_some());
        assert_eq!(config.confirm_timeout, Duration::from_secs(30));
    }
}
