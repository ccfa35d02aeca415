use crate::buffer::Buffer;
use crate::error::{Error, Result};
use std::fmt::{Debug, Formatter};

/// The type of `ICMPv4` packet.
#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq)]
pub enum IcmpType {
    EchoRequest,
    EchoReply,
    DestinationUnreachable,
    TimeExceeded,
    Other(u8),
}

impl IcmpType {
    #[must_use]
    pub const fn id(&self) -> u8 {
        match self {
            Self::EchoRequest => 8,
            Self::EchoReply => 0,
            Self::DestinationUnreachable => 3,
            Self::TimeExceeded => 11,
            Self::Other(id) => *id,
        }
    }
}

impl From<u8> for IcmpType {
    fn from(val: u8) -> Self {
        match val {
            8 => Self::EchoRequest,
            0 => Self::EchoReply,
            3 => Self::DestinationUnreachable,
            11 => Self::TimeExceeded,
            id => Self::Other(id),
        }
    }
}

/// The `ICMPv4` code.
#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq)]
pub struct IcmpCode(pub u8);

impl From<u8> for IcmpCode {
    fn from(val: u8) -> Self {
        Self(val)
    }
}

/// The code for the `DestinationUnreachable` `ICMPv4` packet type.
#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq)]
pub enum IcmpDestinationUnreachableCode {
    /// The destination network was unreachable.
    NetUnreachable,
    /// The destination host was unreachable.
    HostUnreachable,
    /// The destination protocol was unreachable.
    ProtocolUnreachable,
    /// The destination port was unreachable.
    PortUnreachable,
    /// An unknown code.
    Unknown(u8),
}

impl From<IcmpCode> for IcmpDestinationUnreachableCode {
    fn from(val: IcmpCode) -> Self {
        match val {
            IcmpCode(0) => Self::NetUnreachable,
            IcmpCode(1) => Self::HostUnreachable,
            IcmpCode(2) => Self::ProtocolUnreachable,
            IcmpCode(3) => Self::PortUnreachable,
            IcmpCode(id) => Self::Unknown(id),
        }
    }
}

/// The code for the `TimeExceeded` `ICMPv4` packet type.
#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq)]
pub enum IcmpTimeExceededCode {
    /// The time to live was exceeded in transit.
    TtlExpired,
    /// The fragment reassembly time was exceeded.
    FragmentReassembly,
    /// An unknown code.
    Unknown(u8),
}

impl From<IcmpCode> for IcmpTimeExceededCode {
    fn from(val: IcmpCode) -> Self {
        match val {
            IcmpCode(0) => Self::TtlExpired,
            IcmpCode(1) => Self::FragmentReassembly,
            IcmpCode(id) => Self::Unknown(id),
        }
    }
}

const TYPE_OFFSET: usize = 0;
const CODE_OFFSET: usize = 1;
const CHECKSUM_OFFSET: usize = 2;

/// Represents an ICMP packet.
///
/// The internal representation is held in network byte order (big-endian) and all accessor methods
/// take and return data in host byte order, converting as necessary for the given architecture.
pub struct IcmpPacket<'a> {
    buf: Buffer<'a>,
}

impl<'a> IcmpPacket<'a> {
    pub fn new(packet: &'a mut [u8]) -> Result<Self> {
        if packet.len() >= Self::minimum_packet_size() {
            Ok(Self {
                buf: Buffer::Mutable(packet),
            })
        } else {
            Err(Error::InsufficientPacketBuffer(
                String::from("IcmpPacket"),
                Self::minimum_packet_size(),
                packet.len(),
            ))
        }
    }

    pub fn new_view(packet: &'a [u8]) -> Result<Self> {
        if packet.len() >= Self::minimum_packet_size() {
            Ok(Self {
                buf: Buffer::Immutable(packet),
            })
        } else {
            Err(Error::InsufficientPacketBuffer(
                String::from("IcmpPacket"),
                Self::minimum_packet_size(),
                packet.len(),
            ))
        }
    }

    #[must_use]
    pub const fn minimum_packet_size() -> usize {
        8
    }

    #[must_use]
    pub fn get_icmp_type(&self) -> IcmpType {
        IcmpType::from(self.buf.read(TYPE_OFFSET))
    }

    #[must_use]
    pub fn get_icmp_code(&self) -> IcmpCode {
        IcmpCode::from(self.buf.read(CODE_OFFSET))
    }

    #[must_use]
    pub fn get_checksum(&self) -> u16 {
        u16::from_be_bytes(self.buf.get_bytes(CHECKSUM_OFFSET))
    }

    pub fn set_icmp_type(&mut self, val: IcmpType) {
        *self.buf.write(TYPE_OFFSET) = val.id();
    }

    pub fn set_icmp_code(&mut self, val: IcmpCode) {
        *self.buf.write(CODE_OFFSET) = val.0;
    }

    pub fn set_checksum(&mut self, val: u16) {
        self.buf.set_bytes(CHECKSUM_OFFSET, val.to_be_bytes());
    }

    #[must_use]
    pub fn packet(&self) -> &[u8] {
        self.buf.as_slice()
    }
}

impl Debug for IcmpPacket<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IcmpPacket")
            .field("icmp_type", &self.get_icmp_type())
            .field("icmp_code", &self.get_icmp_code())
            .field("checksum", &self.get_checksum())
            .finish()
    }
}


pub mod echo_request {
    use crate::buffer::Buffer;
    use crate::error::{Error, Result};
    use crate::fmt_payload;
    use crate::icmpv4::{IcmpCode, IcmpType};
    use std::fmt::{Debug, Formatter};

    const TYPE_OFFSET: usize = 0;
    const CODE_OFFSET: usize = 1;
    const CHECKSUM_OFFSET: usize = 2;
    const IDENTIFIER_OFFSET: usize = 4;
    const SEQUENCE_OFFSET: usize = 6;

    /// Represents an `ICMPv4` `EchoRequest` packet.
    ///
    /// The internal representation is held in network byte order (big-endian) and all accessor
    /// methods take and return data in host byte order, converting as necessary for the given
    /// architecture.
    pub struct EchoRequestPacket<'a> {
        buf: Buffer<'a>,
    }

    impl<'a> EchoRequestPacket<'a> {
        pub fn new(packet: &'a mut [u8]) -> Result<Self> {
            if packet.len() >= Self::minimum_packet_size() {
                Ok(Self {
                    buf: Buffer::Mutable(packet),
                })
            } else {
                Err(Error::InsufficientPacketBuffer(
                    String::from("EchoRequestPacket"),
                    Self::minimum_packet_size(),
                    packet.len(),
                ))
            }
        }

        pub fn new_view(packet: &'a [u8]) -> Result<Self> {
            if packet.len() >= Self::minimum_packet_size() {
                Ok(Self {
                    buf: Buffer::Immutable(packet),
                })
            } else {
                Err(Error::InsufficientPacketBuffer(
                    String::from("EchoRequestPacket"),
                    Self::minimum_packet_size(),
                    packet.len(),
                ))
            }
        }

        #[must_use]
        pub const fn minimum_packet_size() -> usize {
            8
        }

        #[must_use]
        pub fn get_icmp_type(&self) -> IcmpType {
            IcmpType::from(self.buf.read(TYPE_OFFSET))
        }

        #[must_use]
        pub fn get_icmp_code(&self) -> IcmpCode {
            IcmpCode::from(self.buf.read(CODE_OFFSET))
        }

        #[must_use]
        pub fn get_checksum(&self) -> u16 {
            u16::from_be_bytes(self.buf.get_bytes(CHECKSUM_OFFSET))
        }

        #[must_use]
        pub fn get_identifier(&self) -> u16 {
            u16::from_be_bytes(self.buf.get_bytes(IDENTIFIER_OFFSET))
        }

        #[must_use]
        pub fn get_sequence(&self) -> u16 {
            u16::from_be_bytes(self.buf.get_bytes(SEQUENCE_OFFSET))
        }

        pub fn set_icmp_type(&mut self, val: IcmpType) {
            *self.buf.write(TYPE_OFFSET) = val.id();
        }

        pub fn set_icmp_code(&mut self, val: IcmpCode) {
            *self.buf.write(CODE_OFFSET) = val.0;
        }

        pub fn set_checksum(&mut self, val: u16) {
            self.buf.set_bytes(CHECKSUM_OFFSET, val.to_be_bytes());
        }

        pub fn set_identifier(&mut self, val: u16) {
            self.buf.set_bytes(IDENTIFIER_OFFSET, val.to_be_bytes());
        }

        pub fn set_sequence(&mut self, val: u16) {
            self.buf.set_bytes(SEQUENCE_OFFSET, val.to_be_bytes());
        }

        pub fn set_payload(&mut self, vals: &[u8]) {
            let current_offset = Self::minimum_packet_size();
            self.buf.as_slice_mut()[current_offset..current_offset + vals.len()]
                .copy_from_slice(vals);
        }

        #[must_use]
        pub fn packet(&self) -> &[u8] {
            self.buf.as_slice()
        }

        #[must_use]
        pub fn payload(&self) -> &[u8] {
            &self.buf.as_slice()[Self::minimum_packet_size()..]
        }
    }

    impl Debug for EchoRequestPacket<'_> {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("EchoRequestPacket")
                .field("icmp_type", &self.get_icmp_type())
                .field("icmp_code", &self.get_icmp_code())
                .field("checksum", &self.get_checksum())
                .field("identifier", &self.get_identifier())
                .field("sequence", &self.get_sequence())
                .field("payload", &fmt_payload(self.payload()))
                .finish()
        }
    }

}

pub mod time_exceeded {
    use crate::buffer::Buffer;
    use crate::error::{Error, Result};
    use crate::fmt_payload;
    use crate::icmpv4::{IcmpCode, IcmpType};
    use std::fmt::{Debug, Formatter};

    const TYPE_OFFSET: usize = 0;
    const CODE_OFFSET: usize = 1;
    const CHECKSUM_OFFSET: usize = 2;

    /// Represents an ICMP `TimeExceeded` packet.
    ///
    /// The internal representation is held in network byte order (big-endian) and all accessor
    /// methods take and return data in host byte order, converting as necessary for the given
    /// architecture.
    pub struct TimeExceededPacket<'a> {
        buf: Buffer<'a>,
    }

    impl<'a> TimeExceededPacket<'a> {
        pub fn new(packet: &'a mut [u8]) -> Result<Self> {
            if packet.len() >= Self::minimum_packet_size() {
                Ok(Self {
                    buf: Buffer::Mutable(packet),
                })
            } else {
                Err(Error::InsufficientPacketBuffer(
                    String::from("TimeExceededPacket"),
                    Self::minimum_packet_size(),
                    packet.len(),
                ))
            }
        }

        pub fn new_view(packet: &'a [u8]) -> Result<Self> {
            if packet.len() >= Self::minimum_packet_size() {
                Ok(Self {
                    buf: Buffer::Immutable(packet),
                })
            } else {
                Err(Error::InsufficientPacketBuffer(
                    String::from("TimeExceededPacket"),
                    Self::minimum_packet_size(),
                    packet.len(),
                ))
            }
        }

        #[must_use]
        pub const fn minimum_packet_size() -> usize {
            8
        }

        #[must_use]
        pub fn get_icmp_type(&self) -> IcmpType {
            IcmpType::from(self.buf.read(TYPE_OFFSET))
        }

        #[must_use]
        pub fn get_icmp_code(&self) -> IcmpCode {
            IcmpCode::from(self.buf.read(CODE_OFFSET))
        }

        #[must_use]
        pub fn get_checksum(&self) -> u16 {
            u16::from_be_bytes(self.buf.get_bytes(CHECKSUM_OFFSET))
        }

        pub fn set_icmp_type(&mut self, val: IcmpType) {
            *self.buf.write(TYPE_OFFSET) = val.id();
        }

        pub fn set_icmp_code(&mut self, val: IcmpCode) {
            *self.buf.write(CODE_OFFSET) = val.0;
        }

        pub fn set_checksum(&mut self, val: u16) {
            self.buf.set_bytes(CHECKSUM_OFFSET, val.to_be_bytes());
        }

        pub fn set_payload(&mut self, vals: &[u8]) {
            let current_offset = Self::minimum_packet_size();
            self.buf.as_slice_mut()[current_offset..current_offset + vals.len()]
                .copy_from_slice(vals);
        }

        #[must_use]
        pub fn packet(&self) -> &[u8] {
            self.buf.as_slice()
        }

        /// The quoted datagram which exceeded its time to live.
        #[must_use]
        pub fn payload(&self) -> &[u8] {
            &self.buf.as_slice()[Self::minimum_packet_size()..]
        }
    }

    impl Debug for TimeExceededPacket<'_> {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("TimeExceededPacket")
                .field("icmp_type", &self.get_icmp_type())
                .field("icmp_code", &self.get_icmp_code())
                .field("checksum", &self.get_checksum())
                .field("payload", &fmt_payload(self.payload()))
                .finish()
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_icmp_type() {
            let mut buf = [0_u8; TimeExceededPacket::minimum_packet_size()];
            let mut packet = TimeExceededPacket::new(&mut buf).unwrap();
            packet.set_icmp_type(IcmpType::TimeExceeded);
            assert_eq!(IcmpType::TimeExceeded, packet.get_icmp_type());
            assert_eq!([0x0B], packet.packet()[0..1]);
            packet.set_icmp_type(IcmpType::Other(255));
            assert_eq!(IcmpType::Other(255), packet.get_icmp_type());
            assert_eq!([0xFF], packet.packet()[0..1]);
        }

        #[test]
        fn test_view() {
            let buf = [0x0b, 0x00, 0xf4, 0xee, 0x00, 0x00, 0x00, 0x00];
            let packet = TimeExceededPacket::new_view(&buf).unwrap();
            assert_eq!(IcmpType::TimeExceeded, packet.get_icmp_type());
            assert_eq!(IcmpCode(0), packet.get_icmp_code());
            assert_eq!(62702, packet.get_checksum());
            assert!(packet.payload().is_empty());
        }

        #[test]
        fn test_view_with_quoted_datagram() {
            let mut buf = [0x0_u8; 36];
            buf[..8].copy_from_slice(&[0x0b, 0x00, 0xf4, 0xee, 0x00, 0x00, 0x00, 0x00]);
            let packet = TimeExceededPacket::new_view(&buf).unwrap();
            assert_eq!(IcmpType::TimeExceeded, packet.get_icmp_type());
            assert_eq!(IcmpCode(0), packet.get_icmp_code());
            assert_eq!(&[0x0_u8; 28], packet.payload());
        }

        #[test]
        fn test_new_view_insufficient_buffer() {
            const SIZE: usize = TimeExceededPacket::minimum_packet_size();
            let buf = [0_u8; SIZE - 1];
            let err = TimeExceededPacket::new_view(&buf).unwrap_err();
            assert_eq!(
                Error::InsufficientPacketBuffer(String::from("TimeExceededPacket"), SIZE, SIZE - 1),
                err
            );
        }
    }
}

pub mod destination_unreachable {
    use crate::buffer::Buffer;
    use crate::error::{Error, Result};
    use crate::fmt_payload;
    use crate::icmpv4::{IcmpCode, IcmpType};
    use std::fmt::{Debug, Formatter};

    const TYPE_OFFSET: usize = 0;
    const CODE_OFFSET: usize = 1;
    const CHECKSUM_OFFSET: usize = 2;
    const NEXT_HOP_MTU_OFFSET: usize = 6;

    /// Represents an ICMP `DestinationUnreachable` packet.
    ///
    /// The internal representation is held in network byte order (big-endian) and all accessor
    /// methods take and return data in host byte order, converting as necessary for the given
    /// architecture.
    pub struct DestinationUnreachablePacket<'a> {
        buf: Buffer<'a>,
    }

    impl<'a> DestinationUnreachablePacket<'a> {
        pub fn new(packet: &'a mut [u8]) -> Result<Self> {
            if packet.len() >= Self::minimum_packet_size() {
                Ok(Self {
                    buf: Buffer::Mutable(packet),
                })
            } else {
                Err(Error::InsufficientPacketBuffer(
                    String::from("DestinationUnreachablePacket"),
                    Self::minimum_packet_size(),
                    packet.len(),
                ))
            }
        }

        pub fn new_view(packet: &'a [u8]) -> Result<Self> {
            if packet.len() >= Self::minimum_packet_size() {
                Ok(Self {
                    buf: Buffer::Immutable(packet),
                })
            } else {
                Err(Error::InsufficientPacketBuffer(
                    String::from("DestinationUnreachablePacket"),
                    Self::minimum_packet_size(),
                    packet.len(),
                ))
            }
        }

        #[must_use]
        pub const fn minimum_packet_size() -> usize {
            8
        }

        #[must_use]
        pub fn get_icmp_type(&self) -> IcmpType {
            IcmpType::from(self.buf.read(TYPE_OFFSET))
        }

        #[must_use]
        pub fn get_icmp_code(&self) -> IcmpCode {
            IcmpCode::from(self.buf.read(CODE_OFFSET))
        }

        #[must_use]
        pub fn get_checksum(&self) -> u16 {
            u16::from_be_bytes(self.buf.get_bytes(CHECKSUM_OFFSET))
        }

        #[must_use]
        pub fn get_next_hop_mtu(&self) -> u16 {
            u16::from_be_bytes(self.buf.get_bytes(NEXT_HOP_MTU_OFFSET))
        }

        pub fn set_icmp_type(&mut self, val: IcmpType) {
            *self.buf.write(TYPE_OFFSET) = val.id();
        }

        pub fn set_icmp_code(&mut self, val: IcmpCode) {
            *self.buf.write(CODE_OFFSET) = val.0;
        }

        pub fn set_checksum(&mut self, val: u16) {
            self.buf.set_bytes(CHECKSUM_OFFSET, val.to_be_bytes());
        }

        pub fn set_next_hop_mtu(&mut self, val: u16) {
            self.buf.set_bytes(NEXT_HOP_MTU_OFFSET, val.to_be_bytes());
        }

        pub fn set_payload(&mut self, vals: &[u8]) {
            let current_offset = Self::minimum_packet_size();
            self.buf.as_slice_mut()[current_offset..current_offset + vals.len()]
                .copy_from_slice(vals);
        }

        #[must_use]
        pub fn packet(&self) -> &[u8] {
            self.buf.as_slice()
        }

        /// The quoted datagram which could not be delivered.
        #[must_use]
        pub fn payload(&self) -> &[u8] {
            &self.buf.as_slice()[Self::minimum_packet_size()..]
        }
    }

    impl Debug for DestinationUnreachablePacket<'_> {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("DestinationUnreachablePacket")
                .field("icmp_type", &self.get_icmp_type())
                .field("icmp_code", &self.get_icmp_code())
                .field("checksum", &self.get_checksum())
                .field("next_hop_mtu", &self.get_next_hop_mtu())
                .field("payload", &fmt_payload(self.payload()))
                .finish()
        }
    }

}
