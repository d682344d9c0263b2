// # zoneup-core
//
// Core library for the zoneup dynamic DNS updater.
//
// ## Architecture Overview
//
// This library provides the decision logic for keeping DNS records
// pointed at the host's public IP:
// - **IpSource**: Trait for fetching the current public IP address
// - **DnsProvider**: Trait for zone lookup, record listing and record updates
// - **names**: Relative-name resolution and record/spec matching
// - **reconcile**: Computes and applies the updates a domain needs
// - **SyncEngine**: Change detection plus the fixed-interval driver loop
//
// ## Design Principles
//
// 1. **Separation of Concerns**: reconciliation logic never touches HTTP;
//    transports live in adapter crates behind the capability traits
// 2. **Poll-Driven**: a fixed-interval timer (plus one run at startup) is
//    the only trigger; passes never overlap
// 3. **Idempotency**: a record whose content already equals the target IP
//    is never written to
// 4. **Partial-Failure Isolation**: one bad zone or record never aborts
//    the rest of a pass

pub mod config;
pub mod engine;
pub mod error;
pub mod names;
pub mod reconcile;
pub mod traits;

// Re-export core types for convenience
pub use config::{DomainConfig, DomainsConfig, RecordSpec, RecordType};
pub use engine::{IpState, SyncEngine};
pub use error::{Error, Result};
pub use reconcile::{PassSummary, run_pass};
pub use traits::{DnsProvider, IpSource, LiveRecord, RecordUpdate, ZoneId};
