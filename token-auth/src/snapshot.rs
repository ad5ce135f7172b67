//! Key material and TTL policy published together as one immutable snapshot.
//!
//! A decode or encode loads the snapshot once and uses it for every lookup, so a reload that
//! lands mid-call never pairs old keys with a new TTL policy or the reverse.

use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::error::Error;
use crate::keys::{parse_key_entries, KeyMaterial, KeyProvider};
use crate::ttl::TtlPolicy;

/// One consistent view of the codec's configuration.
pub struct ConfigSnapshot {
    keys: Arc<dyn KeyProvider>,
    ttls: TtlPolicy,
}

impl ConfigSnapshot {
    pub fn new(keys: impl KeyProvider + 'static, ttls: TtlPolicy) -> Self {
        Self {
            keys: Arc::new(keys),
            ttls,
        }
    }

    /// Build a snapshot from `container=<hex key>` and `container=seconds` entries.
    pub fn from_entries<K, T, S>(
        default_ttl_secs: u32,
        key_entries: K,
        ttl_entries: T,
    ) -> Result<Self, Error>
    where
        K: IntoIterator<Item = S>,
        T: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keys: HashMap<String, KeyMaterial> = parse_key_entries(key_entries)?;
        let ttls = TtlPolicy::from_entries(default_ttl_secs, ttl_entries)?;
        Ok(Self::new(keys, ttls))
    }

    pub fn keys(&self) -> &dyn KeyProvider {
        &*self.keys
    }

    pub fn ttls(&self) -> &TtlPolicy {
        &self.ttls
    }
}

/// Holder of the current [`ConfigSnapshot`]. Reloading swaps a single reference.
pub struct SnapshotSource {
    current: ArcSwap<ConfigSnapshot>,
}

impl SnapshotSource {
    pub fn new(snapshot: ConfigSnapshot) -> Self {
        Self {
            current: ArcSwap::from_pointee(snapshot),
        }
    }

    /// The configuration in effect right now.
    pub fn snapshot(&self) -> Arc<ConfigSnapshot> {
        self.current.load_full()
    }

    /// Publish a new snapshot atomically.
    pub fn replace(&self, snapshot: ConfigSnapshot) {
        self.current.store(Arc::new(snapshot));
    }
}
