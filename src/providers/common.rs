//! Shared utilities for provider adapters.

use std::collections::HashMap;
use std::sync::Arc;

use reqwest::Client;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard};

// ============ HTTP Client ============

/// Default connect timeout (seconds).
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// Default request timeout (seconds).
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Creates an HTTP client with the shared timeout configuration.
///
/// # Panics
///
/// Panics if the TLS backend fails to initialize, which indicates a broken
/// build rather than a runtime condition.
#[must_use]
#[allow(clippy::expect_used)]
pub fn create_http_client() -> Client {
    Client::builder()
        .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
        .build()
        .expect("Failed to create HTTP client")
}

// ============ Per-zone serialization ============

/// A registry of per-zone async locks.
///
/// `set_records` is read-modify-write against remote state, so adapters
/// serialize it per zone: concurrent calls for different zones proceed in
/// parallel, calls for the same zone queue up. Locks are created lazily on
/// first use and kept for the life of the adapter.
#[derive(Debug, Default)]
pub struct ZoneLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl ZoneLocks {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the lock for `zone`, waiting if another task holds it.
    ///
    /// The guard is owned so it can cross await points inside the critical
    /// section.
    pub async fn lock(&self, zone: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            Arc::clone(
                locks
                    .entry(zone.to_string())
                    .or_insert_with(|| Arc::new(Mutex::new(()))),
            )
        };
        lock.lock_owned().await
    }
}
