// # Cloudflare DNS Provider
//
// Implements the zoneup `DnsProvider` trait over the Cloudflare v4 API.
//
// The three trait operations map directly onto API calls:
//
// - `lookup_zone`:   GET `/zones?name=<domain>`
// - `list_records`:  GET `/zones/:zone_id/dns_records`
// - `update_record`: PUT `/zones/:zone_id/dns_records/:record_id`
//
// Each operation is a single-shot call; failures propagate to the
// reconciler, which logs them and relies on the next scheduled tick as
// the retry mechanism.
//
// ## Dry-Run Mode
//
// With `dry_run` set, GET requests run normally but PUT updates are
// logged and skipped, so a configuration can be exercised safely
// against live zones.
//
// ## Security
//
// The API token never appears in logs; the `Debug` impl redacts it.
//
// API Reference: https://developers.cloudflare.com/api/

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use zoneup_core::traits::{DnsProvider, LiveRecord, RecordUpdate, ZoneId};
use zoneup_core::{Error, Result};

/// Cloudflare API base URL
const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Default HTTP timeout for API requests
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Cloudflare DNS provider
pub struct CloudflareProvider {
    /// Cloudflare API token; never logged
    api_token: String,

    /// HTTP client for API requests
    client: reqwest::Client,

    /// If true, perform GET requests but skip PUT updates
    dry_run: bool,
}

// Redacts the API token.
impl std::fmt::Debug for CloudflareProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareProvider")
            .field("api_token", &"<REDACTED>")
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl CloudflareProvider {
    /// Create a new Cloudflare provider with the default HTTP timeout
    ///
    /// # Parameters
    ///
    /// - `api_token`: token with Zone:Read and DNS:Edit permissions
    /// - `dry_run`: if true, log intended updates instead of applying them
    pub fn new(api_token: impl Into<String>, dry_run: bool) -> Result<Self> {
        Self::with_timeout(api_token, dry_run, DEFAULT_HTTP_TIMEOUT)
    }

    /// Create a provider with an explicit HTTP timeout
    pub fn with_timeout(
        api_token: impl Into<String>,
        dry_run: bool,
        timeout: Duration,
    ) -> Result<Self> {
        let api_token = api_token.into();
        if api_token.is_empty() {
            return Err(Error::config("Cloudflare API token cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::http(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_token,
            client,
            dry_run,
        })
    }

    /// Perform an authenticated GET and parse the JSON body
    async fn get_json(&self, url: &str, what: &str) -> Result<Value> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.api_token)
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(|e| Error::provider("cloudflare", format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error response".to_string());
            return Err(api_error(status.as_u16(), &body, what));
        }

        response
            .json()
            .await
            .map_err(|e| Error::provider("cloudflare", format!("failed to parse response: {}", e)))
    }
}

/// Map a non-success HTTP status to a specific error
fn api_error(status: u16, body: &str, what: &str) -> Error {
    match status {
        401 | 403 => Error::provider(
            "cloudflare",
            format!(
                "authentication failed during {}: invalid API token or insufficient permissions (status {})",
                what, status
            ),
        ),
        404 => Error::not_found(format!("{} (status 404)", what)),
        429 => Error::provider(
            "cloudflare",
            format!("rate limit exceeded during {}, retry later", what),
        ),
        500..=599 => Error::provider(
            "cloudflare",
            format!("server error (transient) during {}: {} - {}", what, status, body),
        ),
        _ => Error::provider(
            "cloudflare",
            format!("{} failed: {} - {}", what, status, body),
        ),
    }
}

#[async_trait]
impl DnsProvider for CloudflareProvider {
    async fn lookup_zone(&self, domain: &str) -> Result<Option<ZoneId>> {
        tracing::debug!("looking up zone for {}", domain);

        let url = format!("{}/zones?name={}", CLOUDFLARE_API_BASE, domain);
        let json = self.get_json(&url, "zone lookup").await?;

        let zones = json["result"].as_array().ok_or_else(|| {
            Error::provider("cloudflare", "invalid response: result is not an array")
        })?;

        match zones.first() {
            Some(zone) => {
                let id = zone["id"].as_str().ok_or_else(|| {
                    Error::provider("cloudflare", "invalid response: zone.id is not a string")
                })?;
                tracing::debug!("found zone {} for {}", id, domain);
                Ok(Some(ZoneId::from(id)))
            }
            None => Ok(None),
        }
    }

    async fn list_records(&self, zone: &ZoneId) -> Result<Vec<LiveRecord>> {
        let url = format!(
            "{}/zones/{}/dns_records?per_page=100",
            CLOUDFLARE_API_BASE, zone
        );
        let json = self.get_json(&url, "record listing").await?;

        let records: Vec<LiveRecord> = serde_json::from_value(json["result"].clone())
            .map_err(|e| Error::provider("cloudflare", format!("invalid record listing: {}", e)))?;

        tracing::debug!("zone {}: {} record(s)", zone, records.len());
        Ok(records)
    }

    async fn update_record(
        &self,
        zone: &ZoneId,
        record_id: &str,
        update: &RecordUpdate,
    ) -> Result<()> {
        let url = format!(
            "{}/zones/{}/dns_records/{}",
            CLOUDFLARE_API_BASE, zone, record_id
        );

        if self.dry_run {
            tracing::info!(
                "[dry-run] would PUT {} with payload: {}",
                url,
                serde_json::json!(update)
            );
            return Ok(());
        }

        let response = self
            .client
            .put(&url)
            .bearer_auth(&self.api_token)
            .header("Content-Type", "application/json")
            .json(update)
            .send()
            .await
            .map_err(|e| Error::provider("cloudflare", format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error response".to_string());
            return Err(api_error(status.as_u16(), &body, "record update"));
        }

        // The API reports logical failure in the body even on HTTP 200.
        let json: Value = response
            .json()
            .await
            .map_err(|e| Error::provider("cloudflare", format!("failed to parse response: {}", e)))?;

        if json["success"].as_bool() != Some(true) {
            return Err(Error::provider(
                "cloudflare",
                format!("update rejected: {}", json["errors"]),
            ));
        }

        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "cloudflare"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_token_is_rejected() {
        let provider = CloudflareProvider::new("", false);
        assert!(provider.is_err());
    }

    #[test]
    fn api_token_not_exposed_in_debug() {
        let provider = CloudflareProvider::new("secret_token_12345", false).unwrap();

        let debug_str = format!("{:?}", provider);
        assert!(!debug_str.contains("secret_token_12345"));
        assert!(debug_str.contains("CloudflareProvider"));
        assert!(debug_str.contains("<REDACTED>"));
    }

    #[test]
    fn dry_run_flag_is_kept() {
        let dry = CloudflareProvider::new("token-token-token-xx", true).unwrap();
        let live = CloudflareProvider::new("token-token-token-xx", false).unwrap();
        assert!(dry.dry_run);
        assert!(!live.dry_run);
    }

    #[test]
    fn provider_name_is_cloudflare() {
        let provider = CloudflareProvider::new("token-token-token-xx", false).unwrap();
        assert_eq!(provider.provider_name(), "cloudflare");
    }

    #[test]
    fn status_codes_map_to_specific_errors() {
        assert!(matches!(api_error(404, "", "zone lookup"), Error::NotFound(_)));
        assert!(matches!(
            api_error(403, "", "zone lookup"),
            Error::Provider { .. }
        ));
        assert!(matches!(
            api_error(503, "oops", "record update"),
            Error::Provider { .. }
        ));
    }

    #[tokio::test]
    async fn dry_run_update_skips_the_network() {
        use zoneup_core::config::RecordType;

        // No HTTP server behind this call; dry-run must succeed anyway.
        let provider = CloudflareProvider::new("token-token-token-xx", true).unwrap();
        let update = RecordUpdate {
            record_type: RecordType::A,
            name: "www.example.com".to_string(),
            content: "192.0.2.1".to_string(),
            proxied: true,
        };

        let result = provider
            .update_record(&ZoneId::from("z1"), "r1", &update)
            .await;
        assert!(result.is_ok());
    }
}
