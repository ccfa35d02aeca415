use crate::error::IoResult as Result;
use std::net::SocketAddr;
use std::time::Duration;

#[cfg_attr(test, mockall::automock)]
pub trait Socket
where
    Self: Sized,
{
    /// Create a non-blocking `IPv4`/`UDP` socket for sending probes.
    fn new_udp_send_socket() -> Result<Self>;
    /// Create a non-blocking raw `IPv4` socket for receiving `ICMP` messages.
    fn new_icmp_recv_socket() -> Result<Self>;
    /// Create a (non-raw, blocking) `IPv4`/`UDP` socket for local address discovery.
    fn new_udp_dgram_socket() -> Result<Self>;
    fn bind(&mut self, address: SocketAddr) -> Result<()>;
    fn set_ttl(&mut self, ttl: u32) -> Result<()>;
    fn connect(&mut self, address: SocketAddr) -> Result<()>;
    fn send_to(&mut self, buf: &[u8], addr: SocketAddr) -> Result<()>;
    /// Returns true if the socket becomes readable before the timeout, false otherwise.
    fn is_readable(&mut self, timeout: Duration) -> Result<bool>;
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;
}
