//! Configuration types for the zoneup system
//!
//! The configuration document is a JSON file of the shape
//!
//! ```json
//! {
//!   "domains": [
//!     {
//!       "name": "example.com",
//!       "records": [
//!         { "name": "@", "type": "A" },
//!         { "name": "*.app", "type": "A", "proxied": false }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! The file is re-read before every reconciliation pass, so edits take
//! effect on the next cycle without a restart. Validation is limited to
//! field presence; a malformed document aborts the current pass.

use crate::names;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration document: the set of managed domains
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainsConfig {
    /// Domains to reconcile, in order
    pub domains: Vec<DomainConfig>,
}

impl DomainsConfig {
    /// Load the configuration from a JSON file
    ///
    /// Called once per reconciliation pass; the result is never cached.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, crate::Error> {
        let raw = tokio::fs::read_to_string(path.as_ref()).await?;
        let config: Self = serde_json::from_str(&raw)?;
        Ok(config)
    }
}

/// One managed domain and its desired records
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainConfig {
    /// Domain name, e.g. "example.com" (also the zone lookup key)
    pub name: String,

    /// Record specs for this domain, in order
    pub records: Vec<RecordSpec>,
}

/// A configured record, possibly in relative or wildcard form
///
/// `name` may be `"@"` (the apex), a relative label (`"www"`), a
/// wildcard (`"*.app"`), or already fully qualified. Specs are
/// normalized to FQDN form per pass via [`RecordSpec::normalized`];
/// the configuration itself is never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSpec {
    /// Record name as written in the configuration
    pub name: String,

    /// Record type
    #[serde(rename = "type")]
    pub record_type: RecordType,

    /// Whether the record is proxied at the provider (defaults to true)
    #[serde(default = "default_proxied")]
    pub proxied: bool,
}

impl RecordSpec {
    /// Return a per-pass copy with `name` resolved to an FQDN under `domain`
    pub fn normalized(&self, domain: &str) -> Self {
        Self {
            name: names::resolve_record_name(&self.name, domain),
            ..self.clone()
        }
    }
}

/// DNS record type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    /// A record (IPv4)
    A,
    /// AAAA record (IPv6)
    Aaaa,
    /// CNAME record
    Cname,
}

impl RecordType {
    /// Wire form of the type, as providers report it
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Cname => "CNAME",
        }
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_proxied() -> bool {
    true
}
