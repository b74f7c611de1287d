//! Artifact locators.
//!
//! A locator is the opaque string a certificate record stores to say where
//! its artifact lives. The prefix distinguishes remote uploads from
//! local-fallback copies.

use std::fmt;
use std::str::FromStr;

/// Where an artifact was stored
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    /// Object uploaded to the remote store under this object name
    Remote(String),
    /// Object copied into the local fallback namespace under this name
    Local(String),
}

impl Locator {
    /// The object name regardless of storage path
    #[must_use]
    pub fn object_name(&self) -> &str {
        match self {
            Self::Remote(name) | Self::Local(name) => name,
        }
    }

    /// True for local-fallback locators
    #[must_use]
    pub const fn is_local(&self) -> bool {
        matches!(self, Self::Local(_))
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote(name) => write!(f, "remote:{name}"),
            Self::Local(name) => write!(f, "local:{name}"),
        }
    }
}

impl FromStr for Locator {
    type Err = LocatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(name) = s.strip_prefix("remote:") {
            return Ok(Self::Remote(name.to_string()));
        }
        if let Some(name) = s.strip_prefix("local:") {
            return Ok(Self::Local(name.to_string()));
        }
        Err(LocatorError::UnknownScheme { raw: s.to_string() })
    }
}

/// Locator parse errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocatorError {
    /// Locator string had no recognized prefix
    #[error("unknown locator scheme: {raw}")]
    UnknownScheme {
        /// The unparseable input
        raw: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_round_trip() {
        let remote = Locator::Remote("certificates/abc.pdf".to_string());
        let local = Locator::Local("certificates/abc.pdf".to_string());
        assert_eq!(remote.to_string().parse::<Locator>().unwrap(), remote);
        assert_eq!(local.to_string().parse::<Locator>().unwrap(), local);
    }

    #[test]
    fn test_prefixes_distinguishable() {
        assert_ne!(
            Locator::Remote("a".to_string()).to_string(),
            Locator::Local("a".to_string()).to_string()
        );
    }

    #[test]
    fn test_object_name() {
        let l = Locator::Local("certificates/x.pdf".to_string());
        assert_eq!(l.object_name(), "certificates/x.pdf");
        assert!(l.is_local());
    }

    #[test]
    fn test_parse_rejects_unknown_scheme() {
        assert!(matches!(
            "s3://bucket/key".parse::<Locator>(),
            Err(LocatorError::UnknownScheme { .. })
        ));
    }
}
