//! Node ID resolution.
//!
//! Every generator stamps a 10-bit node ID into its IDs. Two generators with
//! distinct node IDs can never mint the same ID, so this is the only piece of
//! cross-process coordination the scheme needs.
//!
//! Resolution order, first match wins:
//!
//! 1. An explicitly configured integer in `[0, 1023]`.
//! 2. A stable hash of a caller-supplied host identifier.
//! 3. A stable hash of [`host_identifier`].
//!
//! Hashed node IDs are deterministic per host but not globally unique. With
//! more than a handful of hosts, configure node IDs explicitly.

use crate::SnowflakeId;
use core::fmt;
use sha2::{Digest, Sha256};

/// Error returned when a configured node ID does not fit the 10-bit field.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("node id {value} out of range (max = {max})")]
pub struct NodeIdError {
    pub value: u64,
    pub max: u64,
}

/// Where a resolved [`NodeId`] came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeIdSource {
    Configured,
    HostHash,
}

/// A validated node ID in `[0, 1023]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u16);

impl NodeId {
    pub const MAX: u64 = SnowflakeId::max_node_id();

    /// Validates an explicit node ID.
    ///
    /// # Errors
    ///
    /// Returns [`NodeIdError`] if `value` is greater than [`NodeId::MAX`].
    pub const fn new(value: u64) -> Result<Self, NodeIdError> {
        if value > Self::MAX {
            return Err(NodeIdError {
                value,
                max: Self::MAX,
            });
        }
        Ok(Self(value as u16))
    }

    /// Derives a node ID from a host identifier.
    ///
    /// Takes the first 8 bytes of the SHA-256 digest of `host` as a
    /// big-endian integer and reduces it modulo 1024. The result is the same
    /// on every run, platform and build.
    ///
    /// ```
    /// use snowlink::NodeId;
    ///
    /// assert_eq!(NodeId::from_host("web-01"), NodeId::from_host("web-01"));
    /// assert!(NodeId::from_host("web-01").get() <= NodeId::MAX);
    /// ```
    pub fn from_host(host: &str) -> Self {
        let digest = Sha256::digest(host.as_bytes());
        let mut prefix = [0_u8; 8];
        prefix.copy_from_slice(&digest[..8]);
        let hash = u64::from_be_bytes(prefix);
        Self((hash % (Self::MAX + 1)) as u16)
    }

    /// Resolves the node ID for this process.
    ///
    /// # Errors
    ///
    /// Returns [`NodeIdError`] if `explicit` is set but out of range. A bad
    /// explicit value is never silently replaced by the hashed fallback.
    pub fn resolve(explicit: Option<u64>, host: Option<&str>) -> Result<Self, NodeIdError> {
        let (node_id, _source) = Self::resolve_with_source(explicit, host)?;
        #[cfg(feature = "tracing")]
        tracing::debug!(node_id = node_id.get(), source = ?_source, "resolved node id");
        Ok(node_id)
    }

    /// Like [`NodeId::resolve`], also reporting which source won.
    ///
    /// # Errors
    ///
    /// Returns [`NodeIdError`] if `explicit` is set but out of range.
    pub fn resolve_with_source(
        explicit: Option<u64>,
        host: Option<&str>,
    ) -> Result<(Self, NodeIdSource), NodeIdError> {
        if let Some(value) = explicit {
            return Ok((Self::new(value)?, NodeIdSource::Configured));
        }
        let node_id = match host {
            Some(host) => Self::from_host(host),
            None => Self::from_host(&host_identifier()),
        };
        Ok((node_id, NodeIdSource::HostHash))
    }

    pub const fn get(&self) -> u64 {
        self.0 as u64
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u64> for NodeId {
    type Error = NodeIdError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NodeId> for u64 {
    fn from(node_id: NodeId) -> Self {
        node_id.get()
    }
}

/// Best-effort host identifier: `HOSTNAME`, then `/etc/hostname`, then
/// `"localhost"`.
pub fn host_identifier() -> String {
    if let Ok(name) = std::env::var("HOSTNAME") {
        let name = name.trim();
        if !name.is_empty() {
            return name.to_owned();
        }
    }
    if let Ok(name) = std::fs::read_to_string("/etc/hostname") {
        let name = name.trim();
        if !name.is_empty() {
            return name.to_owned();
        }
    }
    String::from("localhost")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_accepts_full_range() {
        assert_eq!(NodeId::new(0).unwrap().get(), 0);
        assert_eq!(NodeId::new(1023).unwrap().get(), 1023);
    }

    #[test]
    fn new_rejects_out_of_range() {
        assert_eq!(
            NodeId::new(1024).unwrap_err(),
            NodeIdError {
                value: 1024,
                max: 1023
            }
        );
        assert!(NodeId::try_from(u64::MAX).is_err());
    }

    #[test]
    fn host_hash_is_stable_and_in_range() {
        for host in ["", "localhost", "web-01", "db-primary.internal"] {
            let a = NodeId::from_host(host);
            let b = NodeId::from_host(host);
            assert_eq!(a, b);
            assert!(a.get() <= NodeId::MAX);
        }
    }

    #[test]
    fn host_hash_spreads_across_hosts() {
        let distinct: std::collections::HashSet<_> = (0..64)
            .map(|i| NodeId::from_host(&format!("host-{i}")))
            .collect();
        assert!(distinct.len() > 32);
    }

    #[test]
    fn explicit_value_wins() {
        let (node_id, source) = NodeId::resolve_with_source(Some(7), Some("web-01")).unwrap();
        assert_eq!(node_id.get(), 7);
        assert_eq!(source, NodeIdSource::Configured);
    }

    #[test]
    fn invalid_explicit_value_is_not_replaced_by_hash() {
        assert!(NodeId::resolve(Some(5000), Some("web-01")).is_err());
    }

    #[test]
    fn host_fallback_hashes_given_host() {
        let (node_id, source) = NodeId::resolve_with_source(None, Some("web-01")).unwrap();
        assert_eq!(node_id, NodeId::from_host("web-01"));
        assert_eq!(source, NodeIdSource::HostHash);
    }

    #[test]
    fn host_identifier_is_never_empty() {
        assert!(!host_identifier().is_empty());
    }
}
