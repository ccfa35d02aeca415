use crate::resolver::{Resolver, Result};
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

/// The default maximum time to wait for a reverse DNS lookup.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// Configuration for the DNS resolver.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Config {
    /// The maximum time to wait for a reverse DNS lookup.
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl Config {
    #[must_use]
    pub const fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

/// A DNS resolver backed by the system resolver.
///
/// Forward lookups are delegated to the system resolver directly.  Reverse
/// lookups run on a short-lived thread so the caller can give up once the
/// configured timeout has elapsed. No lookups are cached.
#[derive(Clone)]
pub struct DnsResolver {
    inner: Arc<inner::DnsResolver>,
}

impl DnsResolver {
    /// Create a `DnsResolver` for the given `Config`.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            inner: Arc::new(inner::DnsResolver::new(config)),
        }
    }
}

impl Resolver for DnsResolver {
    fn lookup(&self, hostname: &str) -> Result<Ipv4Addr> {
        self.inner.lookup(hostname)
    }

    fn reverse_lookup(&self, addr: Ipv4Addr) -> Option<String> {
        self.inner.reverse_lookup(addr)
    }
}

mod inner {
    use super::Config;
    use crate::resolver::{Error, Result};
    use crossbeam::channel::{bounded, RecvTimeoutError};
    use std::net::{IpAddr, Ipv4Addr};
    use std::thread;

    pub struct DnsResolver {
        config: Config,
    }

    impl DnsResolver {
        pub fn new(config: Config) -> Self {
            Self { config }
        }

        pub fn lookup(&self, hostname: &str) -> Result<Ipv4Addr> {
            if let Ok(addr) = hostname.parse::<Ipv4Addr>() {
                return Ok(addr);
            }
            dns_lookup::lookup_host(hostname)
                .map_err(|err| Error::LookupFailed(Box::new(err)))?
                .into_iter()
                .find_map(|addr| match addr {
                    IpAddr::V4(addr) => Some(addr),
                    IpAddr::V6(_) => None,
                })
                .ok_or_else(|| Error::AddrNotFound(String::from(hostname)))
        }

        pub fn reverse_lookup(&self, addr: Ipv4Addr) -> Option<String> {
            self.reverse_lookup_with_timeout(addr)
        }

        /// Reverse lookup an address, giving up after the configured timeout.
        ///
        /// The lookup runs on a separate thread and the result is passed back
        /// over a channel.  If the timeout elapses first the thread is left to
        /// exit on its own once the lookup completes.
        fn reverse_lookup_with_timeout(&self, addr: Ipv4Addr) -> Option<String> {
            let (tx, rx) = bounded(1);
            let spawned = thread::Builder::new()
                .name(format!("ptr-{addr}"))
                .spawn(move || {
                    // getnameinfo yields the dotted quad itself when no PTR
                    // record exists.
                    let hostname = dns_lookup::lookup_addr(&IpAddr::V4(addr))
                        .ok()
                        .filter(|hostname| *hostname != addr.to_string());
                    let _ = tx.send(hostname);
                });
            if spawned.is_err() {
                return None;
            }
            match rx.recv_timeout(self.config.timeout) {
                Ok(hostname) => hostname,
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
            }
        }
    }
}
