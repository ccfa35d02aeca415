//! Hopwire - a network path tracing library.
//!
//! The tracer discovers the sequence of `IPv4` routers between this host and
//! a destination. Probes are `UDP` datagrams sent with increasing
//! time-to-live values to destination ports unlikely to host a service: an
//! intermediate router replies with `ICMP` `TimeExceeded` when the ttl
//! expires in transit and the destination host replies with `ICMP`
//! `DestinationUnreachable` (port unreachable) when the probe arrives. Each
//! response is correlated with its probe by the destination port of the
//! `UDP` header quoted in the `ICMP` payload.
//!
//! Hops are probed serially in ascending ttl order and each probed hop
//! yields exactly one [`HopRecord`], streamed to the caller as it is
//! produced. The trace ends when the destination is reached or the maximum
//! ttl has been probed.
//!
//! Receiving `ICMP` messages requires a raw socket and so elevated
//! privileges are needed on most platforms, see the `hopwire-privilege`
//! crate.
//!
//! # Example
//!
//! The following example builds and runs a tracer with default configuration
//! and prints each hop record as it arrives:
//!
//! ```no_run
//! # fn main() -> anyhow::Result<()> {
//! use hopwire_core::Builder;
//! use std::time::Duration;
//!
//! Builder::new("example.com")
//!     .max_hops(30)
//!     .timeout(Duration::from_secs(1))
//!     .build()?
//!     .run_with(|record| println!("{record}"))?;
//! # Ok(())
//! # }
//! ```
//!
//! # See Also
//!
//! - [`Builder`] - build a [`Tracer`].
//! - [`Tracer::run_with`] - run the trace on the current thread.
//! - [`Tracer::spawn`] - run the trace on a new thread and stream the records.
//! - [`TraceHandle`] - cancel or wait for a spawned trace.
#![forbid(unsafe_code)]

mod builder;
mod cancel;
mod config;
mod constants;
mod driver;
mod error;
mod hop;
mod net;
mod output;
mod probe;
mod tracer;
mod types;

pub use builder::Builder;
pub use cancel::CancelToken;
pub use config::defaults;
pub use constants::MAX_TTL;
pub use error::{Error, Result};
pub use hop::{extract_addr, Annotator, GeoInfo, HopRecord, Outcome};
pub use output::HopReceiver;
pub use tracer::{TraceHandle, Tracer};
pub use types::{PacketSize, Port, ProbeAttempt, TimeToLive};
