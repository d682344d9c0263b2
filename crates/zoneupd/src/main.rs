// # zoneupd - dynamic DNS daemon
//
// Thin integration layer: reads configuration from environment
// variables, initializes tracing and the tokio runtime, wires the
// Cloudflare provider and the HTTP IP source into the sync engine, and
// runs it. All reconciliation logic lives in zoneup-core.
//
// ## Configuration
//
// - `ZONEUP_API_TOKEN`: Cloudflare API token (required)
// - `ZONEUP_CONFIG`: path to the domains JSON file (default: config/config.json)
// - `ZONEUP_INTERVAL_SECS`: seconds between IP checks (default: 300)
// - `ZONEUP_IP_URL`: public IP lookup service (default: https://api.ipify.org)
// - `ZONEUP_DRY_RUN`: "1"/"true" to log updates instead of applying them
// - `ZONEUP_LOG_LEVEL`: trace, debug, info, warn, error (default: info)
//
// ## Example
//
// ```bash
// export ZONEUP_API_TOKEN=your_token
// export ZONEUP_CONFIG=/etc/zoneup/config.json
// export ZONEUP_INTERVAL_SECS=300
//
// zoneupd
// ```

use anyhow::Result;
use std::env;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;
use zoneup_core::SyncEngine;
use zoneup_ip_http::HttpIpSource;
use zoneup_provider_cloudflare::CloudflareProvider;

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum ZoneupExitCode {
    CleanShutdown = 0,
    ConfigError = 1,
    RuntimeError = 2,
}

impl From<ZoneupExitCode> for ExitCode {
    fn from(code: ZoneupExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Daemon configuration
struct Config {
    api_token: String,
    config_path: String,
    interval_secs: u64,
    ip_url: String,
    dry_run: bool,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Ok(Self {
            api_token: env::var("ZONEUP_API_TOKEN").map_err(|_| {
                anyhow::anyhow!(
                    "ZONEUP_API_TOKEN is required. \
                    Set it via: export ZONEUP_API_TOKEN=your_token"
                )
            })?,
            config_path: env::var("ZONEUP_CONFIG")
                .unwrap_or_else(|_| "config/config.json".to_string()),
            interval_secs: env::var("ZONEUP_INTERVAL_SECS")
                .ok()
                .map(|s| s.parse().unwrap_or(300))
                .unwrap_or(300),
            ip_url: env::var("ZONEUP_IP_URL")
                .unwrap_or_else(|_| zoneup_ip_http::DEFAULT_IP_URL.to_string()),
            dry_run: matches!(
                env::var("ZONEUP_DRY_RUN").unwrap_or_default().as_str(),
                "1" | "true" | "yes"
            ),
            log_level: env::var("ZONEUP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        if self.api_token.is_empty() {
            anyhow::bail!("ZONEUP_API_TOKEN cannot be empty");
        }

        // Cloudflare tokens are typically 40 characters; catch obvious
        // truncation or placeholders early.
        if self.api_token.len() < 20 {
            anyhow::bail!(
                "ZONEUP_API_TOKEN appears too short ({} chars). \
                Cloudflare tokens are typically 40 characters. \
                Verify your token is correct.",
                self.api_token.len()
            );
        }

        let token_lower = self.api_token.to_lowercase();
        if token_lower.contains("your_token")
            || token_lower.contains("replace_me")
            || token_lower.contains("example")
            || token_lower == "token"
        {
            anyhow::bail!(
                "ZONEUP_API_TOKEN appears to be a placeholder. \
                Use an actual API token from Cloudflare."
            );
        }

        if !(10..=86400).contains(&self.interval_secs) {
            anyhow::bail!(
                "ZONEUP_INTERVAL_SECS must be between 10 and 86400 seconds. Got: {}",
                self.interval_secs
            );
        }

        if !self.ip_url.starts_with("https://") && !self.ip_url.starts_with("http://") {
            anyhow::bail!(
                "ZONEUP_IP_URL must use HTTP or HTTPS scheme. Got: {}",
                self.ip_url
            );
        }

        if !std::path::Path::new(&self.config_path).exists() {
            anyhow::bail!(
                "configuration file not found: {}. \
                Set ZONEUP_CONFIG to the path of your domains file.",
                self.config_path
            );
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "ZONEUP_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        Ok(())
    }
}

fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ZoneupExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return ZoneupExitCode::ConfigError.into();
    }

    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return ZoneupExitCode::ConfigError.into();
    }

    info!("starting zoneupd");

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("failed to create tokio runtime: {}", e);
            return ZoneupExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        match run_daemon(config).await {
            Ok(()) => ZoneupExitCode::CleanShutdown,
            Err(e) => {
                error!("daemon error: {}", e);
                ZoneupExitCode::RuntimeError
            }
        }
    });

    result.into()
}

/// Wire up the adapters and run the engine until shutdown
async fn run_daemon(config: Config) -> Result<()> {
    if config.dry_run {
        info!("dry-run mode enabled: no DNS records will be modified");
    }

    let provider = CloudflareProvider::new(config.api_token, config.dry_run)?;
    let ip_source = HttpIpSource::new(config.ip_url.clone())?;

    info!(
        "managing domains from {} (IP source: {}, interval: {}s)",
        config.config_path, config.ip_url, config.interval_secs
    );

    let mut engine = SyncEngine::new(
        Box::new(ip_source),
        Box::new(provider),
        config.config_path,
        Duration::from_secs(config.interval_secs),
    );

    engine.run().await?;
    Ok(())
}
