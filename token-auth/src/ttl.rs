//! Per-container token time-to-live policy.

use std::collections::HashMap;

use crate::error::{config_error, Error};

/// Default TTL applied when a container has no specific policy: one hour.
pub const DEFAULT_TOKEN_TTL_SECS: u32 = 3600;

/// Immutable TTL configuration snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TtlPolicy {
    default_ttl_secs: u32,
    container_ttls: HashMap<String, u32>,
}

impl TtlPolicy {
    pub fn new(default_ttl_secs: u32) -> Self {
        Self {
            default_ttl_secs,
            container_ttls: HashMap::new(),
        }
    }

    /// Set the TTL for a single container.
    pub fn with_container(mut self, container: impl Into<String>, ttl_secs: u32) -> Self {
        self.container_ttls.insert(container.into(), ttl_secs);
        self
    }

    /// Build a policy from `container=seconds` entries.
    pub fn from_entries<I, S>(default_ttl_secs: u32, entries: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut policy = Self::new(default_ttl_secs);
        for entry in entries {
            let entry = entry.as_ref();
            let (container, secs) = entry
                .split_once('=')
                .ok_or_else(|| config_error("TTL entries must be formatted as container=seconds"))?;
            let container = container.trim();
            if container.is_empty() {
                return Err(config_error("TTL entry has an empty container name"));
            }
            let secs: u32 = secs.trim().parse().map_err(|_| {
                config_error(&format!("Invalid TTL for container {container}: {secs}"))
            })?;
            policy.container_ttls.insert(container.to_string(), secs);
        }
        Ok(policy)
    }

    /// Global fallback TTL in seconds.
    pub fn default_ttl_seconds(&self) -> u32 {
        self.default_ttl_secs
    }

    /// TTL in seconds for `container`, falling back to the default for unknown containers.
    /// Zero means tokens expire immediately.
    pub fn ttl_seconds(&self, container: &str) -> u32 {
        self.container_ttls
            .get(container)
            .copied()
            .unwrap_or(self.default_ttl_secs)
    }
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_TTL_SECS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_unknown_container_uses_default() {
        let policy = TtlPolicy::new(1800).with_container("acme", 3600);
        assert_eq!(policy.ttl_seconds("unknown-container"), 1800);
        assert_eq!(
            policy.ttl_seconds("unknown-container"),
            policy.default_ttl_seconds()
        );
    }

    #[test]
    fn test_known_container_overrides_default() {
        let policy = TtlPolicy::new(1800).with_container("acme", 3600);
        assert_eq!(policy.ttl_seconds("acme"), 3600);
    }

    #[test]
    fn test_zero_ttl_is_allowed() {
        let policy = TtlPolicy::new(1800).with_container("test", 0);
        assert_eq!(policy.ttl_seconds("test"), 0);
    }

    #[test]
    fn test_default_policy_is_one_hour() {
        assert_eq!(TtlPolicy::default().default_ttl_seconds(), 3600);
    }

    #[test]
    fn test_from_entries() {
        let policy = TtlPolicy::from_entries(600, ["acme=3600", " globex = 60 "]).unwrap();
        assert_eq!(policy.ttl_seconds("acme"), 3600);
        assert_eq!(policy.ttl_seconds("globex"), 60);
        assert_eq!(policy.ttl_seconds("other"), 600);
    }

    #[test]
    fn test_from_entries_rejects_negative() {
        let result = TtlPolicy::from_entries(600, ["acme=-5"]);
        assert!(matches!(
            result,
            Err(Error {
                error_kind: ErrorKind::Config,
                ..
            })
        ));
    }

    #[test]
    fn test_from_entries_rejects_missing_separator() {
        assert!(TtlPolicy::from_entries(600, ["acme"]).is_err());
        assert!(TtlPolicy::from_entries(600, ["=60"]).is_err());
    }
}
