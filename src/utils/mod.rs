//! Utility modules.

/// Log sanitization utilities to prevent oversized record data in logs.
pub mod log_sanitizer;

/// TTL serialization helpers shared by record types.
pub mod ttl;
