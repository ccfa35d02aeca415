use crate::config::ChannelConfig;
use crate::constants::{MAX_PACKET_SIZE, MIN_PACKET_SIZE};
use crate::error::{Error, ErrorKind, Result};
use crate::net::common::ErrorMapper;
use crate::net::socket::Socket;
use crate::net::Network;
use crate::probe::{Probe, Response, ResponseData};
use crate::types::{PacketSize, Port};
use hopwire_packet::icmpv4::destination_unreachable::DestinationUnreachablePacket;
use hopwire_packet::icmpv4::time_exceeded::TimeExceededPacket;
use hopwire_packet::icmpv4::{
    IcmpDestinationUnreachableCode, IcmpPacket, IcmpTimeExceededCode, IcmpType,
};
use hopwire_packet::ipv4::Ipv4Packet;
use hopwire_packet::udp::UdpPacket;
use hopwire_packet::IpProtocol;
use std::fmt::{self, Debug, Formatter};
use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::{Duration, SystemTime};
use tracing::instrument;

/// A channel for sending `UDP` probes and receiving `ICMP` responses.
pub struct Channel<S: Socket> {
    recv_socket: S,
    src_addr: Ipv4Addr,
    dest_addr: Ipv4Addr,
    packet_size: PacketSize,
}

impl<S: Socket> Channel<S> {
    /// Create a probe `Channel`.
    ///
    /// This operation requires the `CAP_NET_RAW` capability on Linux.
    #[instrument(skip_all)]
    pub fn connect(config: &ChannelConfig) -> Result<Self> {
        let recv_socket = S::new_icmp_recv_socket()
            .map_err(|err| ErrorMapper::privilege(Error::IoError(err)))?;
        Ok(Self {
            recv_socket,
            src_addr: config.source_addr,
            dest_addr: config.dest_addr,
            packet_size: config.packet_size,
        })
    }

    /// Dispatch a `UDP` probe with a zero filled payload.
    ///
    /// A fresh socket is created for every probe so that the time-to-live
    /// can be set without disturbing probes already in flight. The socket
    /// is bound to an OS chosen source port.
    fn dispatch_udp_probe(&self, probe: Probe) -> Result<()> {
        let packet_size = usize::from(self.packet_size.0);
        if !(MIN_PACKET_SIZE..=MAX_PACKET_SIZE).contains(&packet_size) {
            return Err(Error::InvalidOption(format!(
                "packet_size {packet_size} not in {MIN_PACKET_SIZE}..={MAX_PACKET_SIZE}"
            )));
        }
        let payload = &[0_u8; MAX_PACKET_SIZE][..packet_size - UdpPacket::minimum_packet_size()];
        let local_addr = SocketAddr::new(IpAddr::V4(self.src_addr), 0);
        let remote_addr = SocketAddr::new(IpAddr::V4(self.dest_addr), probe.dest_port.0);
        let mut socket = S::new_udp_send_socket()?;
        socket
            .bind(local_addr)
            .map_err(Error::IoError)
            .or_else(ErrorMapper::in_progress)
            .map_err(|err| ErrorMapper::addr_in_use(err, local_addr))?;
        socket.set_ttl(u32::from(probe.ttl.0))?;
        socket.send_to(payload, remote_addr)?;
        Ok(())
    }

    /// Read the next `ICMP` message, if any arrives within the timeout.
    fn recv_icmp_probe(&mut self, timeout: Duration) -> Result<Option<Response>> {
        if !self.recv_socket.is_readable(timeout)? {
            return Ok(None);
        }
        let mut buf = [0_u8; MAX_PACKET_SIZE];
        match self.recv_socket.read(&mut buf) {
            Ok(bytes_read) => {
                let ipv4 = Ipv4Packet::new_view(&buf[..bytes_read])?;
                Ok(extract_probe_response(&ipv4))
            }
            Err(err) => match err.kind() {
                ErrorKind::Std(io::ErrorKind::WouldBlock) => Ok(None),
                _ => Err(Error::IoError(err)),
            },
        }
    }
}

// The socket type is not required to be `Debug`.
impl<S: Socket> Debug for Channel<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("src_addr", &self.src_addr)
            .field("dest_addr", &self.dest_addr)
            .field("packet_size", &self.packet_size)
            .finish_non_exhaustive()
    }
}

impl<S: Socket> Network for Channel<S> {
    #[instrument(skip(self), level = "trace")]
    fn send_probe(&mut self, probe: Probe) -> Result<()> {
        self.dispatch_udp_probe(probe)
    }

    #[instrument(skip(self), level = "trace")]
    fn recv_probe(&mut self, timeout: Duration) -> Result<Option<Response>> {
        self.recv_icmp_probe(timeout)
    }
}

/// Extract a probe `Response` from an `ICMP` message.
///
/// Only `TimeExceeded` (ttl expired in transit) and `DestinationUnreachable`
/// (port unreachable) messages which quote a decodable `UDP` datagram are
/// candidates, anything else is ignored.
fn extract_probe_response(ipv4: &Ipv4Packet<'_>) -> Option<Response> {
    let recv = SystemTime::now();
    let addr = ipv4.get_source();
    let icmp_v4 = IcmpPacket::new_view(ipv4.payload()).ok()?;
    match icmp_v4.get_icmp_type() {
        IcmpType::TimeExceeded => match IcmpTimeExceededCode::from(icmp_v4.get_icmp_code()) {
            IcmpTimeExceededCode::TtlExpired => {
                let packet = TimeExceededPacket::new_view(icmp_v4.packet()).ok()?;
                let port = extract_dest_port(packet.payload())?;
                Some(Response::TimeExceeded(ResponseData::new(recv, addr, port)))
            }
            _ => None,
        },
        IcmpType::DestinationUnreachable => {
            match IcmpDestinationUnreachableCode::from(icmp_v4.get_icmp_code()) {
                IcmpDestinationUnreachableCode::PortUnreachable => {
                    let packet = DestinationUnreachablePacket::new_view(icmp_v4.packet()).ok()?;
                    let port = extract_dest_port(packet.payload())?;
                    Some(Response::DestinationUnreachable(ResponseData::new(
                        recv, addr, port,
                    )))
                }
                _ => None,
            }
        }
        _ => None,
    }
}

/// Extract the destination port from the `UDP` header of a quoted datagram.
///
/// Routers are only required to quote the original `IP` header and the first
/// 8 octets of its payload, which is exactly the `UDP` header.
fn extract_dest_port(payload: &[u8]) -> Option<Port> {
    let nested_ipv4 = Ipv4Packet::new_view(payload).ok()?;
    if nested_ipv4.get_protocol() != IpProtocol::Udp {
        return None;
    }
    let udp = UdpPacket::new_view(nested_ipv4.payload()).ok()?;
    Some(Port(udp.get_destination()))
}
