use crate::types::{PacketSize, Port, TimeToLive};
use std::net::Ipv4Addr;
use std::time::Duration;

/// Default values for configuration.
pub mod defaults {
    use std::time::Duration;

    /// The default value for `first-hop`.
    pub const DEFAULT_FIRST_HOP: u8 = 1;

    /// The default value for `max-hops`.
    pub const DEFAULT_MAX_HOPS: u8 = 64;

    /// The default value for `retries`.
    pub const DEFAULT_RETRIES: u8 = 0;

    /// The default value for `timeout`.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

    /// The default value for `packet-size`.
    pub const DEFAULT_PACKET_SIZE: u16 = 52;

    /// The default value for `port-base`.
    pub const DEFAULT_PORT_BASE: u16 = 33434;

    /// The default capacity of the hop record channel.
    pub const DEFAULT_CHANNEL_CAPACITY: usize = 16;
}

/// Probe channel configuration.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ChannelConfig {
    pub source_addr: Ipv4Addr,
    pub dest_addr: Ipv4Addr,
    pub packet_size: PacketSize,
}

impl ChannelConfig {
    #[must_use]
    pub const fn new(source_addr: Ipv4Addr, dest_addr: Ipv4Addr, packet_size: PacketSize) -> Self {
        Self {
            source_addr,
            dest_addr,
            packet_size,
        }
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            source_addr: Ipv4Addr::UNSPECIFIED,
            dest_addr: Ipv4Addr::UNSPECIFIED,
            packet_size: PacketSize(defaults::DEFAULT_PACKET_SIZE),
        }
    }
}

/// Hop driver configuration.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct DriverConfig {
    pub first_hop: TimeToLive,
    pub max_hops: TimeToLive,
    pub retries: u8,
    pub timeout: Duration,
    pub port_base: Port,
}

impl DriverConfig {
    #[must_use]
    pub const fn new(
        first_hop: TimeToLive,
        max_hops: TimeToLive,
        retries: u8,
        timeout: Duration,
        port_base: Port,
    ) -> Self {
        Self {
            first_hop,
            max_hops,
            retries,
            timeout,
            port_base,
        }
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            first_hop: TimeToLive(defaults::DEFAULT_FIRST_HOP),
            max_hops: TimeToLive(defaults::DEFAULT_MAX_HOPS),
            retries: defaults::DEFAULT_RETRIES,
            timeout: defaults::DEFAULT_TIMEOUT,
            port_base: Port(defaults::DEFAULT_PORT_BASE),
        }
    }
}
