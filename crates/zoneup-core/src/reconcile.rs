//! Record reconciliation
//!
//! One pass compares desired state (configuration + current IP) with
//! live provider state and applies the updates needed to close the gap.
//!
//! ## Pass Flow
//!
//! ```text
//! for each configured domain:
//!     lookup_zone ──(none/error)──► skip domain, continue
//!     list_records (once per domain)
//!     for each spec (normalized):
//!         match live records
//!         content differs ──► update_record (immediately)
//! ```
//!
//! Guarantees:
//! - a record whose content already equals the target IP is never
//!   written to (idempotence)
//! - a failed zone lookup, listing, or record update is logged and
//!   never aborts the rest of the pass

use crate::config::{DomainsConfig, RecordSpec};
use crate::names;
use crate::traits::{DnsProvider, LiveRecord, RecordUpdate, ZoneId};
use std::net::IpAddr;
use tracing::{debug, info, warn};

/// One pending update: a matched live record and the content it should have
///
/// Created transiently during a pass and consumed immediately; never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateAction<'a> {
    /// The live record to rewrite
    pub record: &'a LiveRecord,
    /// The (normalized) spec that matched it
    pub spec: &'a RecordSpec,
    /// The new record content
    pub new_content: String,
}

/// Counters for one completed reconciliation pass
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PassSummary {
    /// Domains skipped because their zone could not be resolved or listed
    pub domains_skipped: usize,
    /// Record updates applied successfully
    pub updates_applied: usize,
    /// Record updates attempted and failed
    pub updates_failed: usize,
    /// Matched records that already had the target content
    pub records_in_sync: usize,
}

/// Compute the updates a zone needs, without touching the provider.
///
/// Pure: for every spec, every matching live record whose content
/// differs from `target` yields exactly one action. Specs must already
/// be normalized.
pub fn plan_updates<'a>(
    live: &'a [LiveRecord],
    specs: &'a [RecordSpec],
    target: &str,
) -> Vec<UpdateAction<'a>> {
    let mut actions = Vec::new();
    for spec in specs {
        for record in live
            .iter()
            .filter(|record| names::spec_matches_record(record, spec))
        {
            if record.content != target {
                actions.push(UpdateAction {
                    record,
                    spec,
                    new_content: target.to_string(),
                });
            }
        }
    }
    actions
}

/// Run one full reconciliation pass over the configuration.
///
/// Domains are processed sequentially in configured order. Every
/// failure below the pass level is contained: the pass always runs to
/// completion and reports what happened in the returned summary.
pub async fn run_pass(
    provider: &dyn DnsProvider,
    config: &DomainsConfig,
    current_ip: IpAddr,
) -> PassSummary {
    let target = current_ip.to_string();
    let mut summary = PassSummary::default();

    for domain in &config.domains {
        let zone = match provider.lookup_zone(&domain.name).await {
            Ok(Some(zone)) => zone,
            Ok(None) => {
                warn!("no zone found for {}, skipping domain", domain.name);
                summary.domains_skipped += 1;
                continue;
            }
            Err(e) => {
                warn!("zone lookup failed for {}: {}, skipping domain", domain.name, e);
                summary.domains_skipped += 1;
                continue;
            }
        };

        let live = match provider.list_records(&zone).await {
            Ok(records) => records,
            Err(e) => {
                warn!("failed to list records for {}: {}, skipping domain", domain.name, e);
                summary.domains_skipped += 1;
                continue;
            }
        };
        debug!("{}: {} live record(s) in zone {}", domain.name, live.len(), zone);

        // Per-pass working copies; the loaded configuration stays untouched.
        let specs: Vec<RecordSpec> = domain
            .records
            .iter()
            .map(|spec| spec.normalized(&domain.name))
            .collect();

        let matched: usize = specs
            .iter()
            .map(|spec| {
                live.iter()
                    .filter(|record| names::spec_matches_record(record, spec))
                    .count()
            })
            .sum();

        let actions = plan_updates(&live, &specs, &target);
        summary.records_in_sync += matched - actions.len();

        for action in actions {
            apply_action(provider, &zone, &action, &mut summary).await;
        }
    }

    summary
}

/// Execute a single update action, folding the outcome into the summary.
async fn apply_action(
    provider: &dyn DnsProvider,
    zone: &ZoneId,
    action: &UpdateAction<'_>,
    summary: &mut PassSummary,
) {
    let update = RecordUpdate {
        record_type: action.spec.record_type,
        name: action.spec.name.clone(),
        content: action.new_content.clone(),
        proxied: action.spec.proxied,
    };

    match provider.update_record(zone, &action.record.id, &update).await {
        Ok(()) => {
            info!(
                "updated {} ({} -> {})",
                action.record.name, action.record.content, action.new_content
            );
            summary.updates_applied += 1;
        }
        Err(e) => {
            // Left diverged until the next IP change re-triggers a pass.
            warn!("failed to update {}: {}", action.record.name, e);
            summary.updates_failed += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RecordType;

    fn live(id: &str, name: &str, content: &str) -> LiveRecord {
        LiveRecord {
            id: id.to_string(),
            name: name.to_string(),
            record_type: "A".to_string(),
            content: content.to_string(),
        }
    }

    fn spec(name: &str) -> RecordSpec {
        RecordSpec {
            name: name.to_string(),
            record_type: RecordType::A,
            proxied: true,
        }
    }

    #[test]
    fn plan_skips_records_already_at_target() {
        let live = vec![live("r1", "www.example.com", "192.0.2.1")];
        let specs = vec![spec("www.example.com")];

        let actions = plan_updates(&live, &specs, "192.0.2.1");
        assert!(actions.is_empty());
    }

    #[test]
    fn plan_emits_one_action_per_drifted_match() {
        let records = vec![
            live("r1", "www.example.com", "198.51.100.7"),
            live("r2", "api.example.com", "198.51.100.7"),
        ];
        let specs = vec![spec("www.example.com"), spec("api.example.com")];

        let actions = plan_updates(&records, &specs, "192.0.2.1");
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0].record.id, "r1");
        assert_eq!(actions[0].new_content, "192.0.2.1");
        assert_eq!(actions[1].record.id, "r2");
    }

    #[test]
    fn plan_expands_wildcards_to_every_match() {
        let records = vec![
            live("r1", "a.app.example.com", "198.51.100.7"),
            live("r2", "b.app.example.com", "198.51.100.7"),
            live("r3", "other.example.com", "198.51.100.7"),
        ];
        let specs = vec![spec("*.app.example.com")];

        let actions = plan_updates(&records, &specs, "192.0.2.1");
        let ids: Vec<&str> = actions.iter().map(|a| a.record.id.as_str()).collect();
        assert_eq!(ids, vec!["r1", "r2"]);
    }
}
