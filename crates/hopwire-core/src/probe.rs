use crate::types::{Port, ProbeAttempt, TimeToLive};
use std::net::Ipv4Addr;
use std::time::SystemTime;

/// Represents a single probe datagram.
///
/// A `Probe` is a `UDP` datagram sent with a fixed time-to-live to solicit
/// an `ICMP` response from the router at that distance. The destination
/// port is unique to the ttl and is used to correlate responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Probe {
    /// The ttl of the probe.
    pub ttl: TimeToLive,
    /// The attempt number of the probe within its ttl.
    pub attempt: ProbeAttempt,
    /// The destination port of the probe.
    pub dest_port: Port,
    /// Timestamp when the probe was sent.
    pub sent: SystemTime,
}

impl Probe {
    #[must_use]
    pub const fn new(
        ttl: TimeToLive,
        attempt: ProbeAttempt,
        dest_port: Port,
        sent: SystemTime,
    ) -> Self {
        Self {
            ttl,
            attempt,
            dest_port,
            sent,
        }
    }
}

/// The response to a probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    /// An `ICMP` `TimeExceeded` response from an intermediate router.
    TimeExceeded(ResponseData),
    /// An `ICMP` `DestinationUnreachable` (port unreachable) response from
    /// the destination host.
    DestinationUnreachable(ResponseData),
}

impl Response {
    /// The data common to all responses.
    #[must_use]
    pub const fn data(&self) -> &ResponseData {
        match self {
            Self::TimeExceeded(data) | Self::DestinationUnreachable(data) => data,
        }
    }
}

/// The data in the response to a probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseData {
    /// Timestamp of the probe response.
    pub recv: SystemTime,
    /// The address of the router or host which responded to the probe.
    pub addr: Ipv4Addr,
    /// The destination port of the `UDP` header quoted in the response.
    pub port: Port,
}

impl ResponseData {
    #[must_use]
    pub const fn new(recv: SystemTime, addr: Ipv4Addr, port: Port) -> Self {
        Self { recv, addr, port }
    }
}
