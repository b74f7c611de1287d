//! Certificate fingerprints.
//!
//! A fingerprint is a SHA-256 digest rendered as 64 lowercase hex chars.
//! Two modes exist: field-based (the canonical fingerprint stored on the
//! record, computed from declared fields before any rendering happens) and
//! content-based (a digest of the rendered artifact bytes, kept as a
//! secondary lookup aid).

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::io::Read;
use std::path::Path;

/// Chunk size for file-content hashing
const CHUNK_SIZE: usize = 4096;

/// A SHA-256 certificate fingerprint (256 bits / 32 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// The number of bytes in a fingerprint
    pub const LEN: usize = 32;

    /// Compute the field-based fingerprint from declared certificate fields.
    ///
    /// The preimage is the ordered tuple (owner, course, organization,
    /// `YYYY-MM-DD`), each field framed as `u64-le(len) || bytes` so no
    /// field value can alias the boundary between fields. The date is
    /// truncated to day granularity, so repeated previews within the same
    /// day reproduce the same digest.
    #[must_use]
    pub fn from_fields(owner: &str, course: &str, organization: &str, day: NaiveDate) -> Self {
        let date = day.format("%Y-%m-%d").to_string();
        let mut hasher = Sha256::new();
        for field in [owner, course, organization, date.as_str()] {
            hasher.update((field.len() as u64).to_le_bytes());
            hasher.update(field.as_bytes());
        }
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&hasher.finalize());
        Self(bytes)
    }

    /// Compute SHA-256 of a byte slice
    #[must_use]
    pub fn compute(data: &[u8]) -> Self {
        let digest = Sha256::digest(data);
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&digest);
        Self(bytes)
    }

    /// Compute the content fingerprint of a reader in fixed-size chunks.
    ///
    /// # Errors
    ///
    /// Returns error if the reader fails mid-stream
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, FingerprintError> {
        let mut hasher = Sha256::new();
        let mut buf = [0u8; CHUNK_SIZE];
        loop {
            let n = reader.read(&mut buf).map_err(FingerprintError::Io)?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
        }
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&hasher.finalize());
        Ok(Self(bytes))
    }

    /// Compute the content fingerprint of a file on disk.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be opened or read
    pub fn from_file(path: &Path) -> Result<Self, FingerprintError> {
        let file = std::fs::File::open(path).map_err(FingerprintError::Io)?;
        Self::from_reader(file)
    }

    /// Create from raw bytes
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get as bytes
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to lowercase hex string
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string
    ///
    /// # Errors
    ///
    /// Returns error if hex is invalid or not 32 bytes
    pub fn from_hex(hex: &str) -> Result<Self, FingerprintError> {
        let bytes = hex::decode(hex).map_err(|_| FingerprintError::InvalidHex)?;
        if bytes.len() != 32 {
            return Err(FingerprintError::InvalidLength(bytes.len()));
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// Check if fingerprint matches data
    #[must_use]
    pub fn verify(&self, data: &[u8]) -> bool {
        Self::compute(data) == *self
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl AsRef<[u8]> for Fingerprint {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for Fingerprint {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

// Hex string in JSON, raw bytes in binary row encoding.
impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_hex())
        } else {
            serializer.serialize_bytes(&self.0)
        }
    }
}

impl<'de> Deserialize<'de> for Fingerprint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error;
        if deserializer.is_human_readable() {
            let hex = String::deserialize(deserializer)?;
            Self::from_hex(&hex).map_err(D::Error::custom)
        } else {
            let bytes: Vec<u8> = serde_bytes_deserialize(deserializer)?;
            if bytes.len() != 32 {
                return Err(D::Error::custom(FingerprintError::InvalidLength(
                    bytes.len(),
                )));
            }
            let mut arr = [0u8; 32];
            arr.copy_from_slice(&bytes);
            Ok(Self(arr))
        }
    }
}

fn serde_bytes_deserialize<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<u8>, D::Error> {
    struct BytesVisitor;

    impl<'de> serde::de::Visitor<'de> for BytesVisitor {
        type Value = Vec<u8>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("fingerprint bytes")
        }

        fn visit_bytes<E: serde::de::Error>(self, v: &[u8]) -> Result<Self::Value, E> {
            Ok(v.to_vec())
        }

        fn visit_byte_buf<E: serde::de::Error>(self, v: Vec<u8>) -> Result<Self::Value, E> {
            Ok(v)
        }

        fn visit_seq<A: serde::de::SeqAccess<'de>>(
            self,
            mut seq: A,
        ) -> Result<Self::Value, A::Error> {
            let mut out = Vec::with_capacity(seq.size_hint().unwrap_or(32));
            while let Some(b) = seq.next_element::<u8>()? {
                out.push(b);
            }
            Ok(out)
        }
    }

    deserializer.deserialize_bytes(BytesVisitor)
}

/// Fingerprint-related errors
#[derive(Debug, thiserror::Error)]
pub enum FingerprintError {
    /// Invalid hex encoding
    #[error("invalid hex encoding")]
    InvalidHex,
    /// Invalid length (not 32 bytes)
    #[error("invalid fingerprint length: {0} (expected 32)")]
    InvalidLength(usize),
    /// I/O failure while hashing file content
    #[error("failed to read artifact content: {0}")]
    Io(#[source] std::io::Error),
}
