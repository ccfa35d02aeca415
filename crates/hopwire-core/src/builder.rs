use crate::config::{defaults, DriverConfig};
use crate::constants::{MAX_PACKET_SIZE, MAX_TTL, MIN_PACKET_SIZE};
use crate::error::{Error, Result};
use crate::hop::Annotator;
use crate::tracer::Tracer;
use crate::types::{PacketSize, Port, TimeToLive};
use std::sync::Arc;
use std::time::Duration;

/// Build a tracer.
///
/// # Examples
///
/// ```no_run
/// # fn main() -> anyhow::Result<()> {
/// use hopwire_core::Builder;
/// use std::time::Duration;
///
/// let tracer = Builder::new("example.com")
///     .max_hops(30)
///     .timeout(Duration::from_secs(1))
///     .build()?;
/// # Ok(())
/// # }
/// ```
///
/// # See Also
///
/// - [`Tracer`] - a hop by hop `UDP` traceroute.
pub struct Builder {
    hostname: String,
    first_hop: u16,
    max_hops: u16,
    retries: u8,
    timeout: Duration,
    packet_size: u16,
    port_base: u16,
    annotator: Option<Arc<dyn Annotator + Send + Sync>>,
}

impl Builder {
    /// Create a `Builder` for a trace to the given target.
    ///
    /// The target may be a hostname or a dotted-quad `IPv4` address, it is
    /// not resolved until the trace is spawned.
    #[must_use]
    pub fn new<S: Into<String>>(hostname: S) -> Self {
        Self {
            hostname: hostname.into(),
            first_hop: u16::from(defaults::DEFAULT_FIRST_HOP),
            max_hops: u16::from(defaults::DEFAULT_MAX_HOPS),
            retries: defaults::DEFAULT_RETRIES,
            timeout: defaults::DEFAULT_TIMEOUT,
            packet_size: defaults::DEFAULT_PACKET_SIZE,
            port_base: defaults::DEFAULT_PORT_BASE,
            annotator: None,
        }
    }

    /// Set the ttl of the first hop to probe.
    ///
    /// If not set then hops will be probed from a ttl of 1.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # fn main() -> anyhow::Result<()> {
    /// use hopwire_core::Builder;
    ///
    /// let tracer = Builder::new("example.com").first_hop(5).build()?;
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn first_hop(self, first_hop: u16) -> Self {
        Self { first_hop, ..self }
    }

    /// Set the maximum ttl to probe.
    ///
    /// The trace gives up after emitting the record for this ttl if the
    /// destination has not been reached.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # fn main() -> anyhow::Result<()> {
    /// use hopwire_core::Builder;
    ///
    /// let tracer = Builder::new("example.com").max_hops(30).build()?;
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn max_hops(self, max_hops: u16) -> Self {
        Self { max_hops, ..self }
    }

    /// Set the number of times a silent hop is re-probed.
    ///
    /// If not set then silent hops are not re-probed.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # fn main() -> anyhow::Result<()> {
    /// use hopwire_core::Builder;
    ///
    /// let tracer = Builder::new("example.com").retries(2).build()?;
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn retries(self, retries: u8) -> Self {
        Self { retries, ..self }
    }

    /// Set the total number of probes sent per hop.
    ///
    /// A convenience alias, `probes(n)` is equivalent to `retries(n - 1)`.
    /// A value of zero is treated as a single probe.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # fn main() -> anyhow::Result<()> {
    /// use hopwire_core::Builder;
    ///
    /// let tracer = Builder::new("example.com").probes(3).build()?;
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn probes(self, probes: u8) -> Self {
        Self {
            retries: probes.max(1) - 1,
            ..self
        }
    }

    /// Set the timeout for each probe.
    ///
    /// If not set then each probe waits 3 seconds for its response.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # fn main() -> anyhow::Result<()> {
    /// use hopwire_core::Builder;
    /// use std::time::Duration;
    ///
    /// let tracer = Builder::new("example.com")
    ///     .timeout(Duration::from_secs(1))
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn timeout(self, timeout: Duration) -> Self {
        Self { timeout, ..self }
    }

    /// Set the probe datagram size, `UDP` header included.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # fn main() -> anyhow::Result<()> {
    /// use hopwire_core::Builder;
    ///
    /// let tracer = Builder::new("example.com").packet_size(128).build()?;
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn packet_size(self, packet_size: u16) -> Self {
        Self {
            packet_size,
            ..self
        }
    }

    /// Set the destination port of the first hop probe.
    ///
    /// Each subsequent hop probes the next port. If not set the
    /// conventional traceroute base port of 33434 is used.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # fn main() -> anyhow::Result<()> {
    /// use hopwire_core::Builder;
    ///
    /// let tracer = Builder::new("example.com").port_base(34000).build()?;
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn port_base(self, port_base: u16) -> Self {
        Self { port_base, ..self }
    }

    /// Set the geo annotator.
    ///
    /// If set then every responding hop is annotated with geographic
    /// information before its record is emitted.
    #[must_use]
    pub fn annotator(self, annotator: Option<Arc<dyn Annotator + Send + Sync>>) -> Self {
        Self { annotator, ..self }
    }

    /// Build a validated `Tracer`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOption`] if any option is out of range or
    /// the options are inconsistent with one another.
    pub fn build(self) -> Result<Tracer> {
        if !(1..=u16::from(MAX_TTL)).contains(&self.first_hop) {
            return Err(Error::InvalidOption(format!(
                "first_hop {} not in 1..={MAX_TTL}",
                self.first_hop
            )));
        }
        if !(self.first_hop..=u16::from(MAX_TTL)).contains(&self.max_hops) {
            return Err(Error::InvalidOption(format!(
                "max_hops {} not in {}..={MAX_TTL}",
                self.max_hops, self.first_hop
            )));
        }
        if self.timeout.is_zero() {
            return Err(Error::InvalidOption(String::from(
                "timeout must be non-zero",
            )));
        }
        if !(MIN_PACKET_SIZE..=MAX_PACKET_SIZE).contains(&usize::from(self.packet_size)) {
            return Err(Error::InvalidOption(format!(
                "packet_size {} not in {MIN_PACKET_SIZE}..={MAX_PACKET_SIZE}",
                self.packet_size
            )));
        }
        let span = self.max_hops - self.first_hop;
        if u32::from(self.port_base) + u32::from(span) > u32::from(u16::MAX) {
            return Err(Error::InvalidOption(format!(
                "port_base {} + {span} exceeds {}",
                self.port_base,
                u16::MAX
            )));
        }
        Ok(Tracer::new(
            self.hostname,
            DriverConfig::new(
                TimeToLive(self.first_hop as u8),
                TimeToLive(self.max_hops as u8),
                self.retries,
                self.timeout,
                Port(self.port_base),
            ),
            PacketSize(self.packet_size),
            self.annotator,
        ))
    }
}
