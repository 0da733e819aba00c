//! In-memory provider backed by a `HashMap`, for tests and local tooling.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{ProviderError, Result};
use crate::reconcile::{delete_selection, plan_set};
use crate::record::{Record, ToRr, RR};
use crate::traits::{Zone, ZoneLister, ZoneProvider};

/// A stored record with its synthetic ID.
#[derive(Debug, Clone)]
struct StoredRecord {
    #[allow(dead_code)]
    id: String,
    rr: RR,
}

impl StoredRecord {
    fn new(rr: RR) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            rr,
        }
    }
}

/// An in-memory [`ZoneProvider`].
///
/// Holds zones in a `tokio` `RwLock`ed map, so it is safe to share across
/// tasks. Operations on a zone that was never added fail with
/// [`ProviderError::ZoneNotFound`], like a remote backend would.
///
/// Mutating operations take the write lock for their whole duration, so each
/// call is atomic; there are no partially-applied batches here.
#[derive(Debug, Default)]
pub struct MemoryProvider {
    zones: RwLock<HashMap<String, Vec<StoredRecord>>>,
}

impl MemoryProvider {
    /// Creates an empty provider with no zones.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a provider pre-populated with the given empty zones.
    pub async fn with_zones<I, S>(zones: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let provider = Self::new();
        for zone in zones {
            provider.add_zone(zone).await;
        }
        provider
    }

    /// Adds an empty zone. Adding a zone that already exists is a no-op.
    pub async fn add_zone(&self, zone: impl Into<String>) {
        self.zones
            .write()
            .await
            .entry(zone_key(&zone.into()))
            .or_default();
    }

    fn zone_not_found(&self, zone: &str) -> ProviderError {
        // Zone names in errors use the trailing-dot form regardless of what
        // the caller passed.
        ProviderError::ZoneNotFound {
            provider: self.id().to_string(),
            zone: zone_key(zone),
            raw_message: None,
        }
    }
}

// Zones are keyed FQDN-style with a trailing dot, whatever form the caller
// used.
fn zone_key(zone: &str) -> String {
    format!("{}.", zone.trim_end_matches('.'))
}

fn to_typed(rr: &RR) -> Record {
    // Stored data is caller-supplied, so a recognized type tag with data the
    // typed parsers reject degrades to the generic form instead of failing
    // the whole read.
    match rr.parse() {
        Ok(record) => record,
        Err(_) => Record::Rr(rr.clone()),
    }
}

#[async_trait]
impl ZoneProvider for MemoryProvider {
    fn id(&self) -> &'static str {
        "memory"
    }

    async fn get_records(&self, zone: &str) -> Result<Vec<Record>> {
        let zones = self.zones.read().await;
        let records = zones
            .get(&zone_key(zone))
            .ok_or_else(|| self.zone_not_found(zone))?;
        Ok(records.iter().map(|stored| to_typed(&stored.rr)).collect())
    }

    async fn append_records(&self, zone: &str, records: Vec<Record>) -> Result<Vec<Record>> {
        let mut zones = self.zones.write().await;
        let stored = zones
            .get_mut(&zone_key(zone))
            .ok_or_else(|| self.zone_not_found(zone))?;
        for record in &records {
            stored.push(StoredRecord::new(record.to_rr()));
        }
        Ok(records)
    }

    async fn set_records(&self, zone: &str, records: Vec<Record>) -> Result<Vec<Record>> {
        let mut zones = self.zones.write().await;
        let stored = zones
            .get_mut(&zone_key(zone))
            .ok_or_else(|| self.zone_not_found(zone))?;

        let desired: Vec<RR> = records.iter().map(ToRr::to_rr).collect();
        let existing: Vec<RR> = stored.iter().map(|s| s.rr.clone()).collect();
        let mut plan = plan_set(&existing, &desired);

        // The plan holds one deletion per surplus copy; each claims exactly
        // one stored entry, so duplicates the batch still wants survive.
        stored.retain(|s| {
            match plan.delete.iter().position(|rr| *rr == s.rr) {
                Some(pos) => {
                    plan.delete.swap_remove(pos);
                    false
                }
                None => true,
            }
        });
        for rr in plan.create {
            stored.push(StoredRecord::new(rr));
        }
        Ok(records)
    }

    async fn delete_records(&self, zone: &str, records: Vec<Record>) -> Result<Vec<Record>> {
        let mut zones = self.zones.write().await;
        let stored = zones
            .get_mut(&zone_key(zone))
            .ok_or_else(|| self.zone_not_found(zone))?;

        let selectors: Vec<RR> = records.iter().map(ToRr::to_rr).collect();
        let existing: Vec<RR> = stored.iter().map(|s| s.rr.clone()).collect();
        let doomed = delete_selection(&existing, &selectors);

        let deleted: Vec<Record> = doomed.iter().map(|&idx| to_typed(&existing[idx])).collect();
        let mut index = 0;
        stored.retain(|_| {
            let keep = !doomed.contains(&index);
            index += 1;
            keep
        });
        Ok(deleted)
    }

    fn zone_lister(&self) -> Option<&dyn ZoneLister> {
        Some(self)
    }
}

#[async_trait]
impl ZoneLister for MemoryProvider {
    async fn list_zones(&self) -> Result<Vec<Zone>> {
        let zones = self.zones.read().await;
        let mut names: Vec<String> = zones.keys().cloned().collect();
        names.sort();
        Ok(names.into_iter().map(|name| Zone { name }).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zone_key_normalizes_trailing_dot() {
        assert_eq!(zone_key("example.com"), "example.com.");
        assert_eq!(zone_key("example.com."), "example.com.");
    }

    #[tokio::test]
    async fn unknown_zone_is_an_error() {
        let provider = MemoryProvider::new();
        let result = provider.get_records("nope.example.").await;
        assert!(
            matches!(&result, Err(ProviderError::ZoneNotFound { zone, .. }) if zone == "nope.example."),
            "unexpected result: {result:?}"
        );
    }

    #[tokio::test]
    async fn zone_name_forms_are_interchangeable() {
        let provider = MemoryProvider::with_zones(["example.com"]).await;
        assert!(provider.get_records("example.com.").await.is_ok());
        assert!(provider.get_records("example.com").await.is_ok());
    }
}
