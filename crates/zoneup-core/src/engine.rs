//! Change detection and the fixed-interval driver loop
//!
//! The SyncEngine owns the last-applied public IP and decides, once per
//! tick, whether a reconciliation pass is needed.
//!
//! ## Cycle Flow
//!
//! 1. Query the IP source
//! 2. Lookup failed → log, state untouched, retry on next tick
//! 3. IP unchanged → no reconciliation
//! 4. IP changed (or first success) → load config fresh, run a full
//!    pass, then advance the state to the new IP
//!
//! The state advances after the pass *completes*, not after every
//! record succeeds: a record whose update failed stays diverged until
//! the next IP change. A config load failure aborts the pass before it
//! starts and leaves the state untouched.

use crate::config::DomainsConfig;
use crate::error::Result;
use crate::reconcile;
use crate::traits::{DnsProvider, IpSource};
use chrono::{DateTime, Utc};
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

/// Default interval between IP checks (5 minutes)
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(300);

/// The last-applied public IP, owned by the engine
///
/// Invariant: `current` equals the IP used in the most recently
/// completed reconciliation pass, or `None` if no pass has completed
/// since startup. Nothing is persisted across restarts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IpState {
    /// IP of the last completed pass
    pub current: Option<IpAddr>,
    /// When the state last advanced
    pub changed_at: Option<DateTime<Utc>>,
}

impl IpState {
    fn advance(&mut self, ip: IpAddr) {
        self.current = Some(ip);
        self.changed_at = Some(Utc::now());
    }
}

/// Poll-driven sync engine
///
/// Single logical task: one cycle runs to completion before the next
/// tick is considered, so passes never overlap. If a pass overruns the
/// interval the next tick is delayed, not run concurrently.
///
/// ## Lifecycle
///
/// 1. Create with [`SyncEngine::new()`]
/// 2. Start with [`SyncEngine::run()`] — runs one cycle immediately,
///    then on every tick
/// 3. Terminates on SIGINT/SIGTERM (or a test shutdown signal)
pub struct SyncEngine {
    /// Public IP source
    ip_source: Box<dyn IpSource>,

    /// DNS provider for zone lookups, listings and updates
    provider: Box<dyn DnsProvider>,

    /// Path of the JSON configuration document, re-read every pass
    config_path: PathBuf,

    /// Interval between IP checks
    interval: Duration,

    /// Last-applied IP
    state: IpState,
}

impl SyncEngine {
    /// Create a new engine
    ///
    /// # Parameters
    ///
    /// - `ip_source`: Public IP source implementation
    /// - `provider`: DNS provider implementation
    /// - `config_path`: Path to the domains configuration file
    /// - `interval`: Time between IP checks
    pub fn new(
        ip_source: Box<dyn IpSource>,
        provider: Box<dyn DnsProvider>,
        config_path: impl Into<PathBuf>,
        interval: Duration,
    ) -> Self {
        Self {
            ip_source,
            provider,
            config_path: config_path.into(),
            interval,
            state: IpState::default(),
        }
    }

    /// The engine's current state (for inspection and tests)
    pub fn state(&self) -> &IpState {
        &self.state
    }

    /// IP of the last completed pass, if any
    pub fn current_ip(&self) -> Option<IpAddr> {
        self.state.current
    }

    /// Run the engine until a shutdown signal arrives
    ///
    /// The first cycle runs immediately at startup; subsequent cycles
    /// run at the configured interval.
    pub async fn run(&mut self) -> Result<()> {
        self.run_internal(None).await
    }

    /// Test-only entry point with a controlled shutdown signal
    ///
    /// Production code should use [`run()`](Self::run), which shuts
    /// down on OS signals.
    pub async fn run_with_shutdown(
        &mut self,
        shutdown_rx: Option<tokio::sync::oneshot::Receiver<()>>,
    ) -> Result<()> {
        self.run_internal(shutdown_rx).await
    }

    async fn run_internal(
        &mut self,
        shutdown_rx: Option<tokio::sync::oneshot::Receiver<()>>,
    ) -> Result<()> {
        info!(
            "sync engine started (provider: {}, interval: {:?})",
            self.provider.provider_name(),
            self.interval
        );

        // The first tick completes immediately, giving the startup run.
        // Delay on overrun keeps passes single-flight.
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        if let Some(mut rx) = shutdown_rx {
            loop {
                tokio::select! {
                    _ = ticker.tick() => self.run_once().await,
                    _ = &mut rx => {
                        info!("shutdown signal received");
                        break;
                    }
                }
            }
        } else {
            loop {
                tokio::select! {
                    _ = ticker.tick() => self.run_once().await,
                    _ = tokio::signal::ctrl_c() => {
                        info!("shutdown signal received");
                        break;
                    }
                }
            }
        }

        info!("sync engine stopped");
        Ok(())
    }

    /// Run one check-and-reconcile cycle
    ///
    /// Never fails: every error category is logged and deferred to the
    /// next scheduled tick.
    pub async fn run_once(&mut self) {
        debug!("starting IP check");

        let current = match self.ip_source.current().await {
            Ok(ip) => ip,
            Err(e) => {
                warn!("could not determine public IP ({}), will retry next tick", e);
                return;
            }
        };

        if self.state.current == Some(current) {
            debug!("no IP change detected ({})", current);
            return;
        }

        info!(
            "IP change detected: {} -> {}",
            self.state
                .current
                .map(|ip| ip.to_string())
                .unwrap_or_else(|| "unset".to_string()),
            current
        );

        // Loaded fresh every pass so config edits apply without restart.
        let config = match DomainsConfig::load(&self.config_path).await {
            Ok(config) => config,
            Err(e) => {
                error!("failed to load configuration, aborting pass: {}", e);
                return;
            }
        };

        let summary = reconcile::run_pass(self.provider.as_ref(), &config, current).await;
        info!(
            "pass complete: {} updated, {} failed, {} in sync, {} domain(s) skipped",
            summary.updates_applied,
            summary.updates_failed,
            summary.records_in_sync,
            summary.domains_skipped
        );

        // The baseline moves forward even if individual records failed;
        // those stay diverged until the IP changes again.
        self.state.advance(current);
    }
}
