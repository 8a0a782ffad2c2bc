//! Registry reference parsing.
//!
//! Supports:
//! - `docker.io/busybox:latest` → host `docker.io`, repository `busybox`, tag `latest`
//! - `localhost:5000/team/app` → host with port, nested repository, no tag
//! - `quay.io` → bare host

use std::fmt;
use std::str::FromStr;

use crate::error::{AuthError, AuthResult};

/// A parsed registry reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryReference {
    /// Registry host, including the port if one was given.
    pub host: String,

    /// Repository path below the host (may be empty for a bare host).
    pub repository: String,

    /// Tag, if present.
    pub tag: Option<String>,
}

impl RegistryReference {
    /// Parse a registry reference string.
    ///
    /// # Examples
    ///
    /// ```
    /// use ocicert_auth::RegistryReference;
    ///
    /// let r = RegistryReference::parse("docker.io/busybox:latest").unwrap();
    /// assert_eq!(r.host, "docker.io");
    /// assert_eq!(r.repository, "busybox");
    /// assert_eq!(r.tag.as_deref(), Some("latest"));
    ///
    /// let bare = RegistryReference::parse("localhost:5000").unwrap();
    /// assert_eq!(bare.host, "localhost:5000");
    /// assert!(bare.repository.is_empty());
    /// ```
    pub fn parse(reference: &str) -> AuthResult<Self> {
        let reference = reference.trim();

        if reference.is_empty() {
            return Err(AuthError::InvalidReference {
                reference: reference.to_string(),
                reason: "empty reference".to_string(),
            });
        }

        if reference.contains("://") {
            return Err(AuthError::InvalidReference {
                reference: reference.to_string(),
                reason: "expected host/repository, not a URL".to_string(),
            });
        }

        let (host, path) = match reference.split_once('/') {
            Some((host, path)) => (host, path),
            None => (reference, ""),
        };

        if host.is_empty() {
            return Err(AuthError::InvalidReference {
                reference: reference.to_string(),
                reason: "missing registry host".to_string(),
            });
        }

        // A tag colon can only appear after the last path separator.
        let last_segment_start = path.rfind('/').map(|i| i + 1).unwrap_or(0);
        let (repository, tag) = match path[last_segment_start..].rfind(':') {
            Some(i) => {
                let split = last_segment_start + i;
                (&path[..split], Some(path[split + 1..].to_string()))
            }
            None => (path, None),
        };

        if tag.as_deref() == Some("") {
            return Err(AuthError::InvalidReference {
                reference: reference.to_string(),
                reason: "empty tag".to_string(),
            });
        }

        Ok(Self {
            host: host.to_string(),
            repository: repository.to_string(),
            tag,
        })
    }
}

impl FromStr for RegistryReference {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RegistryReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.host)?;
        if !self.repository.is_empty() {
            write!(f, "/{}", self.repository)?;
        }
        if let Some(tag) = &self.tag {
            write!(f, ":{}", tag)?;
        }
        Ok(())
    }
}
