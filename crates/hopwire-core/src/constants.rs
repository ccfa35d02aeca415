/// The maximum time-to-live value allowed.
pub const MAX_TTL: u8 = 255;

/// The minimum size of a probe datagram, a bare `UDP` header.
pub const MIN_PACKET_SIZE: usize = 8;

/// The maximum size of a probe datagram, `UDP` header included.
///
/// This is also the size of the buffer used for reading inbound `ICMP`
/// messages. Responders quote only the leading bytes of the offending
/// datagram and so inbound messages which exceed this size are truncated
/// on read and decoded from the quoted prefix.
pub const MAX_PACKET_SIZE: usize = 1024;
