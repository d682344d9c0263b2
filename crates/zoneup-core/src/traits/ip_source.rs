// # IP Source Trait
//
// Defines the interface for discovering the host's current public IP
// address.
//
// ## Implementations
//
// - HTTP "what is my IP" services: `zoneup-ip-http` crate
//
// The source is queried once per scheduler tick by the engine; there is
// no change stream. A failed lookup is transient by design: the engine
// leaves its state untouched and retries on the next tick.

use async_trait::async_trait;
use std::net::IpAddr;

/// Trait for public IP source implementations
///
/// Implementations must be thread-safe and usable across async tasks.
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Fetch the current public IP address
    ///
    /// # Returns
    ///
    /// - `Ok(IpAddr)`: The current public address
    /// - `Err(Error)`: If the address could not be determined this tick
    async fn current(&self) -> Result<IpAddr, crate::Error>;
}
