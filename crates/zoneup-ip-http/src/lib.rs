// # HTTP IP Source
//
// Implements the zoneup `IpSource` trait against an external "what is
// my IP" service. One GET per engine tick; the body is expected to be
// the address in plain text (e.g. api.ipify.org, icanhazip.com).
//
// There is no caching and no background polling here: the engine's
// scheduler decides when to ask, and a failed lookup is simply retried
// on the next tick.

use async_trait::async_trait;
use std::net::IpAddr;
use std::time::Duration;
use zoneup_core::traits::IpSource;
use zoneup_core::{Error, Result};

/// Default IP lookup service
pub const DEFAULT_IP_URL: &str = "https://api.ipify.org";

/// Default HTTP timeout for lookups
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Alternative plain-text IP services, for operators who prefer them
#[allow(dead_code)]
const KNOWN_IP_SERVICES: &[&str] = &[
    "https://api.ipify.org",
    "https://ifconfig.me/ip",
    "https://icanhazip.com",
];

/// HTTP-based public IP source
#[derive(Debug, Clone)]
pub struct HttpIpSource {
    /// URL to fetch the address from
    url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpSource {
    /// Create a source for the given service URL
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(url, DEFAULT_HTTP_TIMEOUT)
    }

    /// Create a source with an explicit HTTP timeout
    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::http(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }
}

/// Parse a plain-text service response into an address
fn parse_ip_response(body: &str) -> Result<IpAddr> {
    let trimmed = body.trim();
    trimmed
        .parse()
        .map_err(|_| Error::ip_source(format!("invalid IP address in response: {:?}", trimmed)))
}

#[async_trait]
impl IpSource for HttpIpSource {
    async fn current(&self) -> Result<IpAddr> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::ip_source(format!("request to {} failed: {}", self.url, e)))?;

        if !response.status().is_success() {
            return Err(Error::ip_source(format!(
                "{} returned HTTP {}",
                self.url,
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::ip_source(format!("failed to read response: {}", e)))?;

        let ip = parse_ip_response(&body)?;
        tracing::debug!("public IP lookup via {}: {}", self.url, ip);
        Ok(ip)
    }
}
