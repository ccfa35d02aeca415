use crate::cancel::CancelToken;
use crate::config::{defaults, DriverConfig};
use crate::error::{Error, Result};
use crate::hop::{Annotator, HopRecord};
use crate::output::{hop_channel, HopReceiver};
use crate::types::{PacketSize, Port, TimeToLive};
use std::fmt::{self, Debug, Formatter};
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

/// A hop by hop `UDP` traceroute.
///
/// See the [`crate`] documentation for more information.
///
/// Note that this type is cheaply cloneable.
#[derive(Clone)]
pub struct Tracer {
    inner: Arc<inner::TracerInner>,
}

impl Tracer {
    /// Create a `Tracer`.
    ///
    /// Use the [`crate::Builder`] type to create a `Tracer`.
    #[must_use]
    pub(crate) fn new(
        hostname: String,
        config: DriverConfig,
        packet_size: PacketSize,
        annotator: Option<Arc<dyn Annotator + Send + Sync>>,
    ) -> Self {
        Self {
            inner: Arc::new(inner::TracerInner::new(
                hostname,
                config,
                packet_size,
                annotator,
            )),
        }
    }

    /// Spawn the trace on a new thread.
    ///
    /// The target hostname is resolved before the thread is spawned and so a
    /// resolution failure is reported here rather than via the handle. Hop
    /// records are delivered on the returned [`HopReceiver`] in ascending ttl
    /// order until the trace ends and the channel is then closed, on success
    /// and on failure alike.
    ///
    /// # Example
    ///
    /// The following spawns a trace, prints each hop record as it arrives
    /// and then waits for the trace to end:
    ///
    /// ```no_run
    /// # fn main() -> anyhow::Result<()> {
    /// use hopwire_core::Builder;
    ///
    /// let (handle, records) = Builder::new("example.com").build()?.spawn()?;
    /// for record in records {
    ///     println!("{record}");
    /// }
    /// handle.wait()?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::ResolutionFailed`] if the hostname cannot be resolved
    /// to an `IPv4` address. Errors which occur during the trace itself, such
    /// as [`Error::PrivilegeRequired`], are returned by [`TraceHandle::wait`].
    ///
    /// # See Also
    ///
    /// - [`Tracer::run_with`] - run the trace on the current thread.
    pub fn spawn(&self) -> Result<(TraceHandle, HopReceiver)> {
        let dest_addr = self.inner.resolve()?;
        let cancel = CancelToken::new();
        let (tx, rx) = hop_channel(defaults::DEFAULT_CHANNEL_CAPACITY, cancel.clone());
        let inner = Arc::clone(&self.inner);
        let token = cancel.clone();
        let handle = thread::Builder::new()
            .name(format!("hopwire-{}", self.inner.hostname()))
            .spawn(move || inner.run_trace(dest_addr, tx, token))
            .map_err(|err| Error::Other(err.to_string()))?;
        Ok((TraceHandle::new(dest_addr, cancel, handle), rx))
    }

    /// Run the trace on the current thread.
    ///
    /// The given function is called with each hop record as it arrives. This
    /// method blocks until the trace ends.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # fn main() -> anyhow::Result<()> {
    /// use hopwire_core::Builder;
    ///
    /// Builder::new("example.com")
    ///     .build()?
    ///     .run_with(|record| println!("{record}"))?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns the first error encountered by the trace, see
    /// [`Tracer::spawn`].
    pub fn run_with<F: FnMut(&HopRecord)>(&self, mut func: F) -> Result<()> {
        let (handle, rx) = self.spawn()?;
        for record in rx {
            func(&record);
        }
        handle.wait()
    }

    /// The target hostname.
    #[must_use]
    pub fn hostname(&self) -> &str {
        self.inner.hostname()
    }

    /// The ttl of the first hop to probe.
    #[must_use]
    pub fn first_hop(&self) -> TimeToLive {
        self.inner.config().first_hop
    }

    /// The maximum ttl to probe.
    #[must_use]
    pub fn max_hops(&self) -> TimeToLive {
        self.inner.config().max_hops
    }

    /// The number of times a silent hop is re-probed.
    #[must_use]
    pub fn retries(&self) -> u8 {
        self.inner.config().retries
    }

    /// The timeout for each probe.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.inner.config().timeout
    }

    /// The probe datagram size, `UDP` header included.
    #[must_use]
    pub fn packet_size(&self) -> PacketSize {
        self.inner.packet_size()
    }

    /// The destination port of the first hop probe.
    #[must_use]
    pub fn port_base(&self) -> Port {
        self.inner.config().port_base
    }
}

// The annotator is a trait object without a `Debug` bound.
impl Debug for Tracer {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracer")
            .field("hostname", &self.inner.hostname())
            .field("config", &self.inner.config())
            .field("packet_size", &self.inner.packet_size())
            .finish_non_exhaustive()
    }
}

/// A handle to a spawned trace.
///
/// Dropping the handle does not stop the trace, use [`TraceHandle::cancel`]
/// to stop it early.
pub struct TraceHandle {
    dest_addr: Ipv4Addr,
    cancel: CancelToken,
    handle: JoinHandle<Result<()>>,
}

impl TraceHandle {
    const fn new(dest_addr: Ipv4Addr, cancel: CancelToken, handle: JoinHandle<Result<()>>) -> Self {
        Self {
            dest_addr,
            cancel,
            handle,
        }
    }

    /// The resolved address of the destination.
    #[must_use]
    pub const fn dest_addr(&self) -> Ipv4Addr {
        self.dest_addr
    }

    /// A token which may be used to cancel the trace from another thread.
    #[must_use]
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Request the trace be cancelled.
    ///
    /// The trace stops at the next blocking point, no further hop records
    /// are emitted and the record channel is closed.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Wait for the trace to end.
    ///
    /// Returns `Ok(())` on clean completion, that is the destination was
    /// reached or the maximum ttl was probed without a fatal error. Returns
    /// [`Error::Cancelled`] if the trace was cancelled.
    pub fn wait(self) -> Result<()> {
        self.handle
            .join()
            .map_err(|_| Error::Other(String::from("trace thread panicked")))?
    }
}

mod inner {
    use crate::cancel::CancelToken;
    use crate::config::{ChannelConfig, DriverConfig};
    use crate::driver::Driver;
    use crate::error::{Error, Result};
    use crate::hop::Annotator;
    use crate::net::channel::Channel;
    use crate::net::{PlatformImpl, SocketImpl, SourceAddr};
    use crate::output::HopSender;
    use crate::types::PacketSize;
    use hopwire_dns::{Config as DnsConfig, DnsResolver, Resolver};
    use std::net::Ipv4Addr;
    use std::sync::Arc;
    use tracing::instrument;

    pub(super) struct TracerInner {
        hostname: String,
        config: DriverConfig,
        packet_size: PacketSize,
        annotator: Option<Arc<dyn Annotator + Send + Sync>>,
        resolver: DnsResolver,
    }

    impl TracerInner {
        pub(super) fn new(
            hostname: String,
            config: DriverConfig,
            packet_size: PacketSize,
            annotator: Option<Arc<dyn Annotator + Send + Sync>>,
        ) -> Self {
            Self {
                hostname,
                config,
                packet_size,
                annotator,
                resolver: DnsResolver::new(DnsConfig::default()),
            }
        }

        pub(super) fn hostname(&self) -> &str {
            &self.hostname
        }

        pub(super) const fn config(&self) -> DriverConfig {
            self.config
        }

        pub(super) const fn packet_size(&self) -> PacketSize {
            self.packet_size
        }

        /// Resolve the target hostname to a single `IPv4` address.
        #[instrument(skip_all, level = "trace")]
        pub(super) fn resolve(&self) -> Result<Ipv4Addr> {
            self.resolver.lookup(&self.hostname).map_err(|err| {
                tracing::debug!(%err);
                Error::ResolutionFailed(self.hostname.clone())
            })
        }

        /// Run the trace to the resolved destination.
        ///
        /// The probe sockets live for the duration of this call and are
        /// released on every exit path. Dropping the sender closes the hop
        /// record channel.
        #[instrument(skip_all, fields(hostname = %self.hostname, %dest_addr))]
        pub(super) fn run_trace(
            &self,
            dest_addr: Ipv4Addr,
            sender: HopSender,
            cancel: CancelToken,
        ) -> Result<()> {
            if cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }
            let source_addr =
                SourceAddr::discover::<PlatformImpl>(dest_addr, self.config.port_base)?;
            let channel = Channel::<SocketImpl>::connect(&ChannelConfig::new(
                source_addr,
                dest_addr,
                self.packet_size,
            ))?;
            let annotator = self
                .annotator
                .as_deref()
                .map(|annotator| annotator as &dyn Annotator);
            Driver::new(self.config, Some(&self.resolver), annotator, cancel)
                .run(channel, sender)
        }
    }
}
