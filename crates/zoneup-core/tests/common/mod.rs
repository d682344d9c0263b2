//! Test doubles and common utilities for the reconciliation tests
//!
//! The fakes share their state through `Arc` clones so a test can hand
//! one clone to the engine and keep another for assertions.

#![allow(dead_code)]

use std::collections::HashSet;
use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use zoneup_core::error::Result;
use zoneup_core::traits::{DnsProvider, IpSource, LiveRecord, RecordUpdate, ZoneId};
use zoneup_core::{DomainsConfig, Error};

struct MockZone {
    domain: String,
    id: ZoneId,
    records: Vec<LiveRecord>,
}

#[derive(Default)]
struct MockProviderInner {
    zones: Mutex<Vec<MockZone>>,
    failing_zone_lookups: Mutex<HashSet<String>>,
    failing_record_ids: Mutex<HashSet<String>>,
    zone_lookup_calls: AtomicUsize,
    list_calls: AtomicUsize,
    update_calls: AtomicUsize,
}

/// In-memory DnsProvider with injectable failures and call counters
#[derive(Clone, Default)]
pub struct MockProvider {
    inner: Arc<MockProviderInner>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a zone for a domain
    pub fn add_zone(&self, domain: &str, zone_id: &str) {
        self.inner.zones.lock().unwrap().push(MockZone {
            domain: domain.to_string(),
            id: ZoneId::from(zone_id),
            records: Vec::new(),
        });
    }

    /// Add a live record to a registered zone
    pub fn add_record(&self, domain: &str, id: &str, name: &str, record_type: &str, content: &str) {
        let mut zones = self.inner.zones.lock().unwrap();
        let zone = zones
            .iter_mut()
            .find(|z| z.domain == domain)
            .expect("zone must be registered first");
        zone.records.push(LiveRecord {
            id: id.to_string(),
            name: name.to_string(),
            record_type: record_type.to_string(),
            content: content.to_string(),
        });
    }

    /// Make zone lookups for `domain` fail with a provider error
    pub fn fail_zone_lookup(&self, domain: &str) {
        self.inner
            .failing_zone_lookups
            .lock()
            .unwrap()
            .insert(domain.to_string());
    }

    /// Make updates of the record with this id fail
    pub fn fail_update(&self, record_id: &str) {
        self.inner
            .failing_record_ids
            .lock()
            .unwrap()
            .insert(record_id.to_string());
    }

    pub fn zone_lookup_calls(&self) -> usize {
        self.inner.zone_lookup_calls.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.inner.list_calls.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.inner.update_calls.load(Ordering::SeqCst)
    }

    /// Current content of a record, by provider id
    pub fn record_content(&self, record_id: &str) -> Option<String> {
        let zones = self.inner.zones.lock().unwrap();
        zones
            .iter()
            .flat_map(|z| z.records.iter())
            .find(|r| r.id == record_id)
            .map(|r| r.content.clone())
    }
}

#[async_trait]
impl DnsProvider for MockProvider {
    async fn lookup_zone(&self, domain: &str) -> Result<Option<ZoneId>> {
        self.inner.zone_lookup_calls.fetch_add(1, Ordering::SeqCst);

        if self
            .inner
            .failing_zone_lookups
            .lock()
            .unwrap()
            .contains(domain)
        {
            return Err(Error::provider("mock", "zone lookup failed"));
        }

        let zones = self.inner.zones.lock().unwrap();
        Ok(zones
            .iter()
            .find(|z| z.domain == domain)
            .map(|z| z.id.clone()))
    }

    async fn list_records(&self, zone: &ZoneId) -> Result<Vec<LiveRecord>> {
        self.inner.list_calls.fetch_add(1, Ordering::SeqCst);

        let zones = self.inner.zones.lock().unwrap();
        zones
            .iter()
            .find(|z| &z.id == zone)
            .map(|z| z.records.clone())
            .ok_or_else(|| Error::not_found(format!("zone {}", zone)))
    }

    async fn update_record(
        &self,
        zone: &ZoneId,
        record_id: &str,
        update: &RecordUpdate,
    ) -> Result<()> {
        self.inner.update_calls.fetch_add(1, Ordering::SeqCst);

        if self
            .inner
            .failing_record_ids
            .lock()
            .unwrap()
            .contains(record_id)
        {
            return Err(Error::provider("mock", "update failed"));
        }

        let mut zones = self.inner.zones.lock().unwrap();
        let record = zones
            .iter_mut()
            .find(|z| &z.id == zone)
            .and_then(|z| z.records.iter_mut().find(|r| r.id == record_id))
            .ok_or_else(|| Error::not_found(format!("record {}", record_id)))?;

        record.content = update.content.clone();
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

#[derive(Default)]
struct MockIpSourceInner {
    ip: Mutex<Option<IpAddr>>,
    calls: AtomicUsize,
}

/// IP source fake: returns a settable address, or fails while unset
#[derive(Clone, Default)]
pub struct MockIpSource {
    inner: Arc<MockIpSourceInner>,
}

impl MockIpSource {
    /// Source that answers with `ip`
    pub fn with_ip(ip: IpAddr) -> Self {
        let source = Self::default();
        source.set_ip(Some(ip));
        source
    }

    /// Source whose lookups fail until an IP is set
    pub fn failing() -> Self {
        Self::default()
    }

    /// Change (or unset) the answer for subsequent lookups
    pub fn set_ip(&self, ip: Option<IpAddr>) {
        *self.inner.ip.lock().unwrap() = ip;
    }

    pub fn call_count(&self) -> usize {
        self.inner.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IpSource for MockIpSource {
    async fn current(&self) -> Result<IpAddr> {
        self.inner.calls.fetch_add(1, Ordering::SeqCst);
        self.inner
            .ip
            .lock()
            .unwrap()
            .ok_or_else(|| Error::ip_source("lookup service unreachable"))
    }
}

/// Parse an inline JSON value into a DomainsConfig
pub fn parse_config(value: serde_json::Value) -> DomainsConfig {
    serde_json::from_value(value).expect("test config must parse")
}

/// Write a config document into a temp dir, returning its path
pub fn write_config(dir: &tempfile::TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("config.json");
    std::fs::write(&path, contents).expect("write test config");
    path
}
