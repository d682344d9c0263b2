//! Capability traits consumed by the reconciler and engine
//!
//! The core never talks to the network directly; it sees a
//! [`DnsProvider`] and an [`IpSource`]. Real implementations live in
//! adapter crates (`zoneup-provider-cloudflare`, `zoneup-ip-http`);
//! tests use in-memory fakes.

pub mod dns_provider;
pub mod ip_source;

pub use dns_provider::{DnsProvider, LiveRecord, RecordUpdate, ZoneId};
pub use ip_source::IpSource;
