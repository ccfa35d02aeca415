use derive_more::{Add, AddAssign, Sub};

/// `TimeToLive` (ttl) newtype.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Add, Sub, AddAssign,
)]
pub struct TimeToLive(pub u8);

/// Probe attempt newtype.
///
/// The zero based attempt number of a probe within a single ttl.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Add, Sub, AddAssign,
)]
pub struct ProbeAttempt(pub u8);

/// Port newtype.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Port(pub u16);

/// Packet size newtype.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PacketSize(pub u16);
