use std::net::Ipv4Addr;

/// A DNS resolution result.
pub type Result<T> = std::result::Result<T, Error>;

/// A DNS resolution error.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("DNS lookup failed: {0}")]
    LookupFailed(Box<dyn std::error::Error + Send + Sync + 'static>),
    #[error("no IPv4 address found for {0}")]
    AddrNotFound(String),
}

/// Resolve hostnames to `IPv4` addresses and addresses to hostnames.
pub trait Resolver {
    /// Resolve a hostname to a single `IPv4` address.
    ///
    /// A hostname which is already a dotted-quad `IPv4` address is returned
    /// verbatim without consulting the resolver.
    fn lookup(&self, hostname: &str) -> Result<Ipv4Addr>;

    /// Perform a best-effort reverse DNS lookup of an `IPv4` address.
    ///
    /// Returns `None` if the address has no `PTR` record or the lookup did not
    /// complete within the configured timeout.
    fn reverse_lookup(&self, addr: Ipv4Addr) -> Option<String>;
}
