use crate::types::TimeToLive;
use std::fmt::{Display, Formatter};
use std::net::Ipv4Addr;
use std::time::Duration;

/// The outcome of probing a single hop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// An intermediate router reported the probe ttl expired.
    ReachedIntermediate,
    /// The destination host reported the probe port unreachable.
    ReachedDestination,
    /// No correlated response arrived within the timeout budget.
    Timeout,
    /// Probing the hop failed.
    Error,
}

/// A record of a single probed hop.
///
/// Exactly one record is emitted per ttl. The responder address is absent
/// for `Timeout` and `Error` outcomes and the elapsed time is only present
/// when a correlated response was received.
///
/// The `Display` representation is a single line. A hop which responded is
/// formatted as the ttl left padded to a width of three, the hostname (or
/// the address when no hostname is known), the address in parentheses and
/// the round trip time:
///
/// ```text
///   3 ae-1-3514.ear7.london2.level3.net (4.69.166.21)  23.51ms
/// ```
///
/// A hop which timed out or failed is formatted as `<ttl> - end`. The
/// address inside the parentheses can be recovered with [`extract_addr`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HopRecord {
    /// The ttl of the hop.
    pub ttl: TimeToLive,
    /// The address of the responder, if any.
    pub addr: Option<Ipv4Addr>,
    /// The reverse DNS hostname of the responder, if known.
    pub hostname: Option<String>,
    /// The geographic annotation of the responder, if known.
    pub geo: Option<GeoInfo>,
    /// The round trip time of the probe, if a response was received.
    pub elapsed: Option<Duration>,
    /// The outcome of probing the hop.
    pub outcome: Outcome,
}

impl HopRecord {
    /// Create a record for a hop which did not respond in time.
    #[must_use]
    pub const fn timeout(ttl: TimeToLive) -> Self {
        Self {
            ttl,
            addr: None,
            hostname: None,
            geo: None,
            elapsed: None,
            outcome: Outcome::Timeout,
        }
    }

    /// Create a record for a hop which could not be probed.
    #[must_use]
    pub const fn error(ttl: TimeToLive) -> Self {
        Self {
            ttl,
            addr: None,
            hostname: None,
            geo: None,
            elapsed: None,
            outcome: Outcome::Error,
        }
    }

    /// Whether the destination host was reached.
    #[must_use]
    pub fn is_destination(&self) -> bool {
        self.outcome == Outcome::ReachedDestination
    }
}

impl Display for HopRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match (self.addr, self.elapsed) {
            (Some(addr), Some(elapsed)) => match &self.hostname {
                Some(hostname) => {
                    write!(f, "{:>3} {hostname} ({addr})  {elapsed:?}", self.ttl.0)
                }
                None => write!(f, "{:>3} {addr} ({addr})  {elapsed:?}", self.ttl.0),
            },
            _ => write!(f, "{:>3} - end", self.ttl.0),
        }
    }
}

/// Extract the responder address from a formatted hop line.
///
/// Returns the dotted-quad address inside the first pair of parentheses or
/// `None` if the line does not contain one.
#[must_use]
pub fn extract_addr(line: &str) -> Option<Ipv4Addr> {
    let start = line.find('(')? + 1;
    let end = start + line[start..].find(')')?;
    line[start..end].parse().ok()
}

/// The geographic annotation of a responder address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeoInfo {
    /// The city of the responder.
    pub city: String,
    /// The region of the responder.
    pub region: String,
    /// The country of the responder.
    pub country: String,
    /// The internet service provider of the responder.
    pub isp: String,
    /// The organisation of the responder.
    pub org: String,
    /// The autonomous system of the responder.
    pub as_name: String,
}

/// Annotate responder addresses with geographic information.
///
/// Implementations are expected to be internally time bounded as a slow
/// lookup delays the probing of subsequent hops. A failed lookup leaves
/// the record unannotated and never fails the trace.
pub trait Annotator {
    /// Annotate a responder address.
    fn annotate(&self, addr: Ipv4Addr) -> Option<GeoInfo>;
}
