use crate::error::Result;
use crate::probe::{Probe, Response};
use std::time::Duration;

/// Probe dispatch and response channel.
pub mod channel;

/// Error mappers.
mod common;

/// Platform specific network code.
mod platform;

/// Socket abstraction.
pub mod socket;

/// Source address discovery.
mod source;

pub use platform::PlatformImpl;
pub use source::SourceAddr;

#[cfg(unix)]
pub use platform::SocketImpl;

/// The network abstraction.
#[cfg_attr(test, mockall::automock)]
pub trait Network {
    /// Send a `Probe`.
    fn send_probe(&mut self, probe: Probe) -> Result<()>;

    /// Receive the next `ICMP` message and return a probe `Response`.
    ///
    /// Waits up to `timeout` for a message to arrive. Returns `None` if the
    /// wait times out or the message read is not one of the types expected.
    fn recv_probe(&mut self, timeout: Duration) -> Result<Option<Response>>;
}
