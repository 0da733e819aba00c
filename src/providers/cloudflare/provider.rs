//! Cloudflare `ZoneProvider` implementation.

use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use serde::Serialize;

use crate::error::{ProviderError, Result};
use crate::name::{absolute_name, relative_name};
use crate::reconcile::{delete_selection, plan_set};
use crate::record::{Record, ToRr, RR};
use crate::traits::{ErrorContext, ProviderErrorMapper, Zone, ZoneLister, ZoneProvider};

use super::types::{CloudflareCaaData, CloudflareSrvData};
use super::{
    CloudflareDnsRecord, CloudflareProvider, CloudflareZone, MAX_PAGE_SIZE_RECORDS,
    MAX_PAGE_SIZE_ZONES,
};

/// Request body for record creation.
#[derive(Debug, Serialize)]
struct CreateRecordBody {
    #[serde(rename = "type")]
    record_type: String,
    name: String,
    ttl: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    priority: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<serde_json::Value>,
}

fn zone_fqdn(zone: &str) -> String {
    format!("{}.", zone.trim_end_matches('.'))
}

impl CloudflareProvider {
    fn zone_context(&self, zone: &str) -> ErrorContext {
        ErrorContext {
            zone: Some(zone_fqdn(zone)),
            ..ErrorContext::default()
        }
    }

    /// Resolves a zone name to its Cloudflare zone ID, memoized per adapter.
    async fn zone_id(&self, zone: &str) -> Result<String> {
        let key = zone_fqdn(zone);
        {
            let cache = self.zone_ids.lock().await;
            if let Some(id) = cache.get(&key) {
                return Ok(id.clone());
            }
        }

        let bare = key.trim_end_matches('.');
        let path = format!(
            "/zones?name={}&per_page={MAX_PAGE_SIZE_ZONES}",
            urlencoding::encode(bare)
        );
        let (zones, _): (Vec<CloudflareZone>, u32) =
            self.get_page(&path, self.zone_context(zone)).await?;

        let id = zones
            .into_iter()
            .find(|z| z.name == bare)
            .map(|z| z.id)
            .ok_or_else(|| ProviderError::ZoneNotFound {
                provider: self.provider_name().to_string(),
                zone: key.clone(),
                raw_message: None,
            })?;

        self.zone_ids.lock().await.insert(key, id.clone());
        Ok(id)
    }

    /// Fetches every record of a zone, following pagination.
    async fn fetch_zone_records(
        &self,
        zone_id: &str,
        zone: &str,
    ) -> Result<Vec<CloudflareDnsRecord>> {
        let mut all = Vec::new();
        let mut page = 1u32;
        loop {
            let path = format!(
                "/zones/{zone_id}/dns_records?page={page}&per_page={MAX_PAGE_SIZE_RECORDS}"
            );
            let (records, total_count): (Vec<CloudflareDnsRecord>, u32) =
                self.get_page(&path, self.zone_context(zone)).await?;
            if records.is_empty() {
                break;
            }
            all.extend(records);
            if all.len() >= total_count as usize {
                break;
            }
            page += 1;
        }
        Ok(all)
    }

    /// Converts a Cloudflare record into the generic representation.
    ///
    /// Cloudflare splits composite types across fields (MX priority is
    /// separate from content, SRV and CAA live in a structured `data`
    /// object); this reassembles the single presentation-format data string.
    fn wire_to_rr(&self, cf: &CloudflareDnsRecord, zone: &str) -> Result<RR> {
        let data = match cf.record_type.as_str() {
            "MX" => format!("{} {}", cf.priority.unwrap_or(0), cf.content),
            "SRV" => match &cf.data {
                Some(value) => {
                    let srv: CloudflareSrvData = serde_json::from_value(value.clone())
                        .map_err(|e| self.parse_error(format!("SRV data object: {e}")))?;
                    format!("{} {} {} {}", srv.priority, srv.weight, srv.port, srv.target)
                }
                None => cf.content.clone(),
            },
            "CAA" => match &cf.data {
                Some(value) => {
                    let caa: CloudflareCaaData = serde_json::from_value(value.clone())
                        .map_err(|e| self.parse_error(format!("CAA data object: {e}")))?;
                    format!("{} {} \"{}\"", caa.flags, caa.tag, caa.value)
                }
                None => cf.content.clone(),
            },
            _ => cf.content.clone(),
        };

        Ok(RR {
            name: relative_name(&cf.name, zone),
            ttl: Duration::from_secs(cf.ttl),
            record_type: cf.record_type.to_ascii_uppercase(),
            data,
        })
    }

    /// Builds the creation body for a generic record.
    fn rr_to_body(&self, rr: &RR, zone: &str) -> Result<CreateRecordBody> {
        let record = rr.parse().map_err(|e| ProviderError::InvalidRecord {
            provider: self.provider_name().to_string(),
            detail: e.to_string(),
        })?;

        let mut body = CreateRecordBody {
            record_type: rr.record_type.to_ascii_uppercase(),
            // The API wants FQDNs without the trailing dot.
            name: absolute_name(&rr.name, zone)
                .trim_end_matches('.')
                .to_string(),
            // Cloudflare rejects ttl 0; 1 means "automatic".
            ttl: rr.ttl.as_secs().max(1),
            content: None,
            priority: None,
            data: None,
        };

        match record {
            Record::Mx(mx) => {
                body.priority = Some(mx.preference);
                body.content = Some(mx.target);
            }
            Record::Srv(srv) => {
                body.data = Some(
                    serde_json::to_value(CloudflareSrvData {
                        priority: srv.priority,
                        weight: srv.weight,
                        port: srv.port,
                        target: srv.target,
                    })
                    .map_err(|e| self.serialization_error(e))?,
                );
            }
            Record::Caa(caa) => {
                body.data = Some(
                    serde_json::to_value(CloudflareCaaData {
                        flags: caa.flags,
                        tag: caa.tag,
                        value: caa.value,
                    })
                    .map_err(|e| self.serialization_error(e))?,
                );
            }
            Record::ServiceBinding(sb) => {
                body.data = Some(serde_json::json!({
                    "priority": sb.priority,
                    "target": sb.target,
                    "value": sb.params.to_string(),
                }));
            }
            _ => {
                body.content = Some(rr.data.clone());
            }
        }
        Ok(body)
    }

    fn serialization_error(&self, e: serde_json::Error) -> ProviderError {
        ProviderError::SerializationError {
            provider: self.provider_name().to_string(),
            detail: e.to_string(),
        }
    }

    async fn create_record(&self, zone_id: &str, zone: &str, rr: &RR) -> Result<()> {
        let body = self.rr_to_body(rr, zone)?;
        let context = ErrorContext {
            record_name: Some(rr.name.clone()),
            zone: Some(zone_fqdn(zone)),
            ..ErrorContext::default()
        };
        let _: CloudflareDnsRecord = self
            .post(&format!("/zones/{zone_id}/dns_records"), &body, context)
            .await?;
        Ok(())
    }

    async fn delete_record(&self, zone_id: &str, zone: &str, record_id: &str) -> Result<()> {
        let context = ErrorContext {
            record_id: Some(record_id.to_string()),
            zone: Some(zone_fqdn(zone)),
            ..ErrorContext::default()
        };
        self.delete(
            &format!("/zones/{zone_id}/dns_records/{record_id}"),
            context,
        )
        .await
    }
}

#[async_trait]
impl ZoneProvider for CloudflareProvider {
    fn id(&self) -> &'static str {
        "cloudflare"
    }

    async fn get_records(&self, zone: &str) -> Result<Vec<Record>> {
        let zone_id = self.zone_id(zone).await?;
        let wire = self.fetch_zone_records(&zone_id, zone).await?;
        let mut records = Vec::with_capacity(wire.len());
        for cf in &wire {
            let rr = self.wire_to_rr(cf, zone)?;
            // Data Cloudflare accepted but the typed parsers reject stays in
            // generic form.
            records.push(match rr.parse() {
                Ok(record) => record,
                Err(_) => Record::Rr(rr),
            });
        }
        Ok(records)
    }

    async fn append_records(&self, zone: &str, records: Vec<Record>) -> Result<Vec<Record>> {
        let zone_id = self.zone_id(zone).await?;
        let rrs: Vec<RR> = records.iter().map(ToRr::to_rr).collect();

        let results = join_all(
            rrs.iter()
                .map(|rr| self.create_record(&zone_id, zone, rr)),
        )
        .await;
        results.into_iter().collect::<Result<Vec<()>>>()?;
        Ok(records)
    }

    async fn set_records(&self, zone: &str, records: Vec<Record>) -> Result<Vec<Record>> {
        // Read-modify-write against remote state; serialize per zone so
        // concurrent calls do not plan against stale reads of each other.
        let _guard = self.locks.lock(zone_fqdn(zone).as_str()).await;

        let zone_id = self.zone_id(zone).await?;
        let wire = self.fetch_zone_records(&zone_id, zone).await?;

        let mut pool: Vec<(String, RR)> = Vec::with_capacity(wire.len());
        for cf in &wire {
            pool.push((cf.id.clone(), self.wire_to_rr(cf, zone)?));
        }
        let existing: Vec<RR> = pool.iter().map(|(_, rr)| rr.clone()).collect();
        let desired: Vec<RR> = records.iter().map(ToRr::to_rr).collect();
        let plan = plan_set(&existing, &desired);

        // Claim one stored ID per planned deletion; duplicates each claim
        // their own.
        let mut doomed_ids = Vec::with_capacity(plan.delete.len());
        for rr in &plan.delete {
            if let Some(pos) = pool.iter().position(|(_, have)| have == rr) {
                doomed_ids.push(pool.swap_remove(pos).0);
            }
        }

        let deletes = join_all(
            doomed_ids
                .iter()
                .map(|id| self.delete_record(&zone_id, zone, id)),
        )
        .await;
        deletes.into_iter().collect::<Result<Vec<()>>>()?;

        let creates = join_all(
            plan.create
                .iter()
                .map(|rr| self.create_record(&zone_id, zone, rr)),
        )
        .await;
        creates.into_iter().collect::<Result<Vec<()>>>()?;

        Ok(records)
    }

    async fn delete_records(&self, zone: &str, records: Vec<Record>) -> Result<Vec<Record>> {
        let zone_id = self.zone_id(zone).await?;
        let wire = self.fetch_zone_records(&zone_id, zone).await?;

        let mut existing = Vec::with_capacity(wire.len());
        for cf in &wire {
            existing.push(self.wire_to_rr(cf, zone)?);
        }
        let selectors: Vec<RR> = records.iter().map(ToRr::to_rr).collect();
        let doomed = delete_selection(&existing, &selectors);

        let results = join_all(
            doomed
                .iter()
                .map(|&idx| self.delete_record(&zone_id, zone, &wire[idx].id)),
        )
        .await;
        for result in results {
            match result {
                Ok(()) => {}
                // Someone else deleted it first; the goal state is reached
                // either way.
                Err(ProviderError::RecordNotFound { .. }) => {}
                Err(e) => return Err(e),
            }
        }

        let deleted = doomed
            .into_iter()
            .map(|idx| {
                let rr = existing[idx].clone();
                match rr.parse() {
                    Ok(record) => record,
                    Err(_) => Record::Rr(rr),
                }
            })
            .collect();
        Ok(deleted)
    }

    fn zone_lister(&self) -> Option<&dyn ZoneLister> {
        Some(self)
    }
}

#[async_trait]
impl ZoneLister for CloudflareProvider {
    async fn list_zones(&self) -> Result<Vec<Zone>> {
        let mut zones = Vec::new();
        let mut page = 1u32;
        loop {
            let path = format!("/zones?page={page}&per_page={MAX_PAGE_SIZE_ZONES}");
            let (batch, total_count): (Vec<CloudflareZone>, u32) =
                self.get_page(&path, ErrorContext::default()).await?;
            if batch.is_empty() {
                break;
            }
            zones.extend(batch.into_iter().map(|z| Zone {
                name: zone_fqdn(&z.name),
            }));
            if zones.len() >= total_count as usize {
                break;
            }
            page += 1;
        }
        Ok(zones)
    }
}
