//! TTL serialization/deserialization helpers.
//!
//! Custom Serde support for record TTLs:
//! - Serialization: `Duration` -> whole seconds (`u64`)
//! - Deserialization: whole seconds (`u64`) -> `Duration`
//!
//! DNS TTLs have second granularity on the wire, so sub-second precision is
//! dropped at the serialization boundary.

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serializer};

/// Serializes a `Duration` as its whole-second count.
pub fn serialize<S>(ttl: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u64(ttl.as_secs())
}

/// Deserializes a second count into a `Duration`.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let secs = u64::deserialize(deserializer)?;
    Ok(Duration::from_secs(secs))
}
