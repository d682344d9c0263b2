// # DNS Provider Trait
//
// Defines the interface the reconciler uses to read and write provider
// state: look up a zone by domain, list the zone's records, update a
// single record's content.
//
// ## Implementations
//
// - Cloudflare: `zoneup-provider-cloudflare` crate
//
// Providers are transport adapters only. They perform single-shot API
// calls and report errors; deciding *whether* a record needs an update
// is owned by `reconcile`, and retry-on-next-tick is owned by the
// scheduler. Providers must not cache records or second-guess the
// reconciler.

use crate::config::RecordType;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Opaque provider-side zone identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ZoneId(String);

impl ZoneId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ZoneId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for ZoneId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for ZoneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A DNS record as it currently exists at the provider
///
/// Owned by the provider; read-only to this system except through
/// [`DnsProvider::update_record`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LiveRecord {
    /// Provider-assigned record identifier
    pub id: String,
    /// Fully-qualified record name
    pub name: String,
    /// Record type as the provider reports it ("A", "AAAA", ...)
    #[serde(rename = "type")]
    pub record_type: String,
    /// Current record content (target IP for address records)
    pub content: String,
}

/// Payload for a record update call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordUpdate {
    /// Record type
    #[serde(rename = "type")]
    pub record_type: RecordType,
    /// Fully-qualified record name
    pub name: String,
    /// New record content (the target IP)
    pub content: String,
    /// Whether the record is proxied at the provider
    pub proxied: bool,
}

/// Trait for DNS provider implementations
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
///
/// # Error Handling
///
/// All three operations are single network calls. Errors are returned
/// to the reconciler, which logs them and moves on; implementations
/// must not retry internally.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Look up the zone for a registered domain
    ///
    /// # Returns
    ///
    /// - `Ok(Some(zone))`: The zone exists
    /// - `Ok(None)`: The provider has no zone for this domain
    /// - `Err(Error)`: The lookup itself failed
    async fn lookup_zone(&self, domain: &str) -> Result<Option<ZoneId>, crate::Error>;

    /// List all records in a zone
    ///
    /// Called once per domain per pass; the reconciler matches every
    /// configured spec against this single listing.
    async fn list_records(&self, zone: &ZoneId) -> Result<Vec<LiveRecord>, crate::Error>;

    /// Update one record's content
    ///
    /// # Parameters
    ///
    /// - `zone`: The zone containing the record
    /// - `record_id`: Provider identifier of the record to update
    /// - `update`: The full desired record (type, name, content, proxied)
    async fn update_record(
        &self,
        zone: &ZoneId,
        record_id: &str,
        update: &RecordUpdate,
    ) -> Result<(), crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
