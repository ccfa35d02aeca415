#[cfg(unix)]
mod unix;

use crate::error::Result;
use std::net::Ipv4Addr;

#[cfg(unix)]
pub use unix::*;

/// Platform specific operations.
#[cfg_attr(test, mockall::automock)]
pub trait Platform {
    /// Discover a local address which can route to the target address.
    ///
    /// The port may be used by implementations to determine the routing
    /// address. No packets are transmitted during discovery.
    ///
    /// # Errors
    ///
    /// Returns an error if no local address can route to the target.
    fn discover_local_addr(target_addr: Ipv4Addr, port: u16) -> Result<Ipv4Addr>;
}
