use crate::cancel::CancelToken;
use crate::config::DriverConfig;
use crate::error::{Error, Result};
use crate::hop::{Annotator, HopRecord, Outcome};
use crate::net::Network;
use crate::output::HopSender;
use crate::probe::{Probe, Response};
use crate::types::{Port, ProbeAttempt, TimeToLive};
use hopwire_dns::Resolver;
use std::time::{Duration, SystemTime};
use tracing::instrument;

/// How often the response wait re-checks for cancellation.
const RECV_POLL: Duration = Duration::from_millis(100);

/// A serial hop probe driver.
///
/// Hops are probed one at a time in ascending ttl order starting from the
/// configured first hop. Each hop yields exactly one record which is
/// delivered before the next hop is probed.
pub struct Driver<'a> {
    config: DriverConfig,
    resolver: Option<&'a dyn Resolver>,
    annotator: Option<&'a dyn Annotator>,
    cancel: CancelToken,
}

impl<'a> Driver<'a> {
    /// Create a `Driver`.
    ///
    /// The config is assumed to have been validated, see `Builder`.
    #[instrument(skip_all, level = "trace")]
    pub fn new(
        config: DriverConfig,
        resolver: Option<&'a dyn Resolver>,
        annotator: Option<&'a dyn Annotator>,
        cancel: CancelToken,
    ) -> Self {
        tracing::debug!(?config);
        Self {
            config,
            resolver,
            annotator,
            cancel,
        }
    }

    /// Run the trace to completion and close the record channel.
    ///
    /// The trace ends after the record for the hop which reached the
    /// destination, or after `max_hops`, whichever comes first. The channel
    /// is closed when this method returns, on success and on failure alike.
    ///
    /// # Errors
    ///
    /// Socket errors are fatal. An `Error` outcome record for the hop
    /// being probed is emitted before the error is returned. Cancellation
    /// ends the trace with [`Error::Cancelled`] without a record for the
    /// hop in flight.
    #[instrument(skip_all)]
    pub fn run<N: Network>(self, mut network: N, sender: HopSender) -> Result<()> {
        self.run_trace(&mut network, &sender)
    }

    fn run_trace<N: Network>(&self, network: &mut N, sender: &HopSender) -> Result<()> {
        let mut ttl = self.config.first_hop;
        loop {
            if self.cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }
            let record = match self.probe_hop(network, ttl) {
                Ok(record) => record,
                Err(Error::Cancelled) => return Err(Error::Cancelled),
                Err(err) => {
                    // the probe error wins over any send failure
                    let _ = sender.send(HopRecord::error(ttl));
                    return Err(err);
                }
            };
            let done = record.is_destination() || ttl == self.config.max_hops;
            sender.send(record)?;
            if done {
                return Ok(());
            }
            ttl += TimeToLive(1);
        }
    }

    /// Probe a single hop, retrying until a response arrives or the
    /// configured attempts are exhausted.
    fn probe_hop<N: Network>(&self, network: &mut N, ttl: TimeToLive) -> Result<HopRecord> {
        let mut attempt = ProbeAttempt(0);
        loop {
            let probe = self.send_probe(network, ttl, attempt)?;
            match self.await_response(network, probe)? {
                Some(response) => {
                    return Ok(self.annotate(make_record(probe, &response)));
                }
                None if attempt.0 < self.config.retries => attempt += ProbeAttempt(1),
                None => return Ok(HopRecord::timeout(ttl)),
            }
        }
    }

    /// Send a probe for the given ttl and attempt.
    ///
    /// The destination port is unique to the ttl within a trace, a quoted
    /// `UDP` header carrying it correlates a response with the hop no
    /// matter which attempt solicited it.
    fn send_probe<N: Network>(
        &self,
        network: &mut N,
        ttl: TimeToLive,
        attempt: ProbeAttempt,
    ) -> Result<Probe> {
        let dest_port =
            Port(self.config.port_base.0 + u16::from(ttl.0 - self.config.first_hop.0));
        let probe = Probe::new(ttl, attempt, dest_port, SystemTime::now());
        network.send_probe(probe)?;
        Ok(probe)
    }

    /// Await the response correlated with the probe.
    ///
    /// Returns `None` when the probe timeout expires without one. The wait
    /// is performed in short intervals so that cancellation is observed
    /// promptly. Responses quoting a foreign port are discarded and the
    /// wait continues within the remaining budget.
    fn await_response<N: Network>(
        &self,
        network: &mut N,
        probe: Probe,
    ) -> Result<Option<Response>> {
        let deadline = probe.sent + self.config.timeout;
        loop {
            if self.cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }
            let remaining = deadline
                .duration_since(SystemTime::now())
                .unwrap_or_default();
            if remaining.is_zero() {
                return Ok(None);
            }
            if let Some(response) = network.recv_probe(remaining.min(RECV_POLL))? {
                if response.data().port == probe.dest_port {
                    return Ok(Some(response));
                }
            }
        }
    }

    /// Annotate a record with the responder hostname and geo information.
    ///
    /// Annotation happens after the round trip time has been taken so that
    /// lookups do not inflate it.
    fn annotate(&self, record: HopRecord) -> HopRecord {
        let mut record = record;
        if let Some(addr) = record.addr {
            record.hostname = self
                .resolver
                .and_then(|resolver| resolver.reverse_lookup(addr));
            record.geo = self.annotator.and_then(|annotator| annotator.annotate(addr));
        }
        record
    }
}

/// Build the record for a correlated response.
fn make_record(probe: Probe, response: &Response) -> HopRecord {
    let data = response.data();
    let elapsed = data.recv.duration_since(probe.sent).unwrap_or_default();
    let outcome = match response {
        Response::TimeExceeded(_) => Outcome::ReachedIntermediate,
        Response::DestinationUnreachable(_) => Outcome::ReachedDestination,
    };
    HopRecord {
        ttl: probe.ttl,
        addr: Some(data.addr),
        hostname: None,
        geo: None,
        elapsed: Some(elapsed),
        outcome,
    }
}
