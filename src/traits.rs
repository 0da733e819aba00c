use async_trait::async_trait;

use serde::{Deserialize, Serialize};

use crate::error::{ProviderError, Result};
use crate::record::Record;

/// Raw API error (internal).
///
/// Carries the backend's code and message verbatim before mapping into a
/// [`ProviderError`] variant.
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    /// Error code (format varies per provider).
    pub code: Option<String>,
    /// Original error message.
    pub message: String,
}

impl RawApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }
}

/// Extra context for error mapping (internal).
///
/// Filled in by the call site so that mapped variants like `RecordNotFound`
/// can name the resource that triggered them.
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorContext {
    /// Record name (for `RecordConflict` and friends).
    pub record_name: Option<String>,
    /// Record ID (for `RecordNotFound` and friends).
    pub record_id: Option<String>,
    /// Zone name (for `ZoneNotFound` and friends).
    pub zone: Option<String>,
}

/// Provider error mapping trait (internal).
///
/// Each adapter implements this to translate raw backend errors into the
/// unified error type.
pub(crate) trait ProviderErrorMapper {
    /// The provider identifier used in mapped errors.
    fn provider_name(&self) -> &'static str;

    /// Maps a raw API error to the unified error type.
    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError;

    /// Shortcut: response parse error.
    fn parse_error(&self, detail: impl ToString) -> ProviderError {
        ProviderError::ParseError {
            provider: self.provider_name().to_string(),
            detail: detail.to_string(),
        }
    }

    /// Shortcut: unknown error (fallback).
    fn unknown_error(&self, raw: RawApiError) -> ProviderError {
        ProviderError::Unknown {
            provider: self.provider_name().to_string(),
            raw_code: raw.code,
            raw_message: raw.message,
        }
    }
}

/// A DNS zone as reported by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    /// Fully-qualified zone name with trailing dot (e.g. `"example.com."`).
    pub name: String,
}

/// Optional zone enumeration capability.
///
/// Providers whose backend can list the zones visible to the configured
/// credentials expose it through [`ZoneProvider::zone_lister`].
#[async_trait]
pub trait ZoneLister: Send + Sync {
    /// Lists the zones the provider can manage.
    async fn list_zones(&self) -> Result<Vec<Zone>>;
}

/// The record management surface every provider adapter implements.
///
/// Zones are identified by fully-qualified name with trailing dot
/// (`"example.com."`). Record names inside a zone are zone-relative
/// (`"www"`, `"@"` for the apex); see [`crate::name`] for the conversion
/// helpers.
///
/// # Cancellation
///
/// All methods are plain futures; dropping one cancels the in-flight work at
/// the next await point. Batch operations are not atomic: a dropped or failed
/// call may leave some records of the batch applied and others not.
#[async_trait]
pub trait ZoneProvider: Send + Sync {
    /// Provider identifier (e.g. `"cloudflare"`, `"memory"`).
    fn id(&self) -> &'static str;

    /// Fetches all records of `zone`.
    ///
    /// Typed records the provider recognizes come back as their typed
    /// variants; anything else comes back as [`Record::Rr`].
    ///
    /// # Errors
    ///
    /// [`ProviderError::ZoneNotFound`] if the zone does not exist.
    async fn get_records(&self, zone: &str) -> Result<Vec<Record>>;

    /// Creates `records` in `zone` without touching any existing records.
    ///
    /// Returns the created records as the provider now reports them.
    ///
    /// # Errors
    ///
    /// [`ProviderError::ZoneNotFound`] if the zone does not exist;
    /// [`ProviderError::RecordConflict`] if the backend rejects a record that
    /// collides with existing data. Partial failures leave earlier creates in
    /// place.
    async fn append_records(&self, zone: &str, records: Vec<Record>) -> Result<Vec<Record>>;

    /// Reconciles `zone` so that, for every (name, type) pair present in
    /// `records`, the zone contains exactly the given records for that pair.
    ///
    /// RRsets not named by the batch are left untouched. Records already
    /// present with identical (name, type, ttl, data) are kept rather than
    /// recreated. Calling twice with the same batch is a no-op the second
    /// time.
    ///
    /// Returns the input batch's records as applied.
    ///
    /// # Errors
    ///
    /// [`ProviderError::ZoneNotFound`] if the zone does not exist. A failure
    /// partway through may leave the zone between the old and new state;
    /// retrying the same call converges.
    async fn set_records(&self, zone: &str, records: Vec<Record>) -> Result<Vec<Record>>;

    /// Deletes the records of `zone` matched by `records`.
    ///
    /// Each input acts as a selector: matching is exact on name, type, ttl
    /// and data, except that an empty type, zero ttl or empty data field
    /// matches anything. The name never wildcards. Selectors matching nothing
    /// are silently ignored.
    ///
    /// Returns the records that were actually deleted, which may be fewer or
    /// more than the selectors.
    ///
    /// # Errors
    ///
    /// [`ProviderError::ZoneNotFound`] if the zone does not exist.
    async fn delete_records(&self, zone: &str, records: Vec<Record>) -> Result<Vec<Record>>;

    /// The zone listing capability, if this provider has one.
    fn zone_lister(&self) -> Option<&dyn ZoneLister> {
        None
    }
}
