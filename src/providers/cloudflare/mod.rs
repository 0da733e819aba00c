//! Cloudflare provider adapter.

mod error;
mod http;
mod provider;
mod types;

use std::collections::HashMap;

use reqwest::Client;
use tokio::sync::Mutex;

use crate::providers::common::{create_http_client, ZoneLocks};

pub(crate) use types::{CloudflareDnsRecord, CloudflareResponse, CloudflareZone};

pub(crate) const CF_API_BASE: &str = "https://api.cloudflare.com/client/v4";
/// Max page size of the Cloudflare zones API.
pub(crate) const MAX_PAGE_SIZE_ZONES: u32 = 50;
/// Max page size of the Cloudflare DNS records API.
pub(crate) const MAX_PAGE_SIZE_RECORDS: u32 = 100;
/// Retries for transient request failures.
pub(crate) const MAX_RETRIES: u32 = 3;

/// [`ZoneProvider`](crate::ZoneProvider) adapter for the Cloudflare API.
///
/// Authenticates with a scoped API token (`Zone.Zone:Read` and
/// `Zone.DNS:Edit`). Zone name to zone ID lookups are memoized for the life
/// of the adapter; `set_records` calls are serialized per zone.
pub struct CloudflareProvider {
    pub(crate) client: Client,
    pub(crate) api_token: String,
    /// Zone name (trailing dot) -> Cloudflare zone ID.
    pub(crate) zone_ids: Mutex<HashMap<String, String>>,
    pub(crate) locks: ZoneLocks,
}

impl CloudflareProvider {
    /// Creates an adapter using the given API token.
    #[must_use]
    pub fn new(api_token: String) -> Self {
        Self {
            client: create_http_client(),
            api_token,
            zone_ids: Mutex::new(HashMap::new()),
            locks: ZoneLocks::new(),
        }
    }
}
