//! Record name resolution and matching
//!
//! Two small, pure pieces of the reconciliation pipeline:
//! [`resolve_record_name`] turns the short names allowed in
//! configuration into FQDNs, and [`spec_matches_record`] decides
//! whether a live provider record corresponds to a configured spec.

use crate::config::RecordSpec;
use crate::traits::LiveRecord;

/// Resolve a configured record name to its fully-qualified form.
///
/// Rules, applied in order:
/// 1. `"@"` resolves to the domain itself.
/// 2. A name that already ends with the domain is left unchanged.
/// 3. A `"*."` wildcard becomes `"*.<label>.<domain>"`.
/// 4. Anything else is treated as a relative label: `"<name>.<domain>"`.
///
/// The suffix check runs before the wildcard branch, so a wildcard that
/// already ends with the domain (e.g. `"*.sub.example.com"` under
/// `"example.com"`) passes through rule 2 untouched. That ordering is
/// load-bearing for compatibility and must not be swapped.
pub fn resolve_record_name(name: &str, domain: &str) -> String {
    if name == "@" {
        return domain.to_string();
    }
    if name.ends_with(domain) {
        return name.to_string();
    }
    if let Some(label) = name.strip_prefix("*.") {
        return format!("*.{}.{}", label, domain);
    }
    format!("{}.{}", name, domain)
}

/// Decide whether a live record is the logical record a spec describes.
///
/// The spec must already be normalized (see [`RecordSpec::normalized`]).
/// A wildcard spec matches any live record of the same type whose name
/// ends with the part after `"*."` (plain suffix match, including the
/// apex suffix itself); a plain spec requires an exact name match.
pub fn spec_matches_record(record: &LiveRecord, spec: &RecordSpec) -> bool {
    if let Some(suffix) = spec.name.strip_prefix("*.") {
        record.record_type == spec.record_type.as_str() && record.name.ends_with(suffix)
    } else {
        record.record_type == spec.record_type.as_str() && record.name == spec.name
    }
}
