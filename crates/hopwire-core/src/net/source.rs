use crate::error::Result;
use crate::net::platform::Platform;
use crate::types::Port;
use std::net::Ipv4Addr;
use tracing::instrument;

/// The source address for a trace.
pub struct SourceAddr;

impl SourceAddr {
    /// Discover the source address which can route to the target.
    ///
    /// The probe destination port for the first hop is offered to the
    /// platform as a routing hint.
    #[instrument(ret, level = "trace")]
    pub fn discover<P: Platform>(target_addr: Ipv4Addr, port: Port) -> Result<Ipv4Addr> {
        P::discover_local_addr(target_addr, port.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::net::platform::MockPlatform;
    use mockall::predicate;
    use std::str::FromStr;
    use std::sync::Mutex;

    static MTX: Mutex<()> = Mutex::new(());

    #[test]
    fn test_discover() {
        let _m = MTX.lock();
        let target_addr = Ipv4Addr::from_str("1.2.3.4").unwrap();
        let expected = Ipv4Addr::from_str("10.0.0.2").unwrap();
        let ctx = MockPlatform::discover_local_addr_context();
        ctx.expect()
            .with(predicate::eq(target_addr), predicate::eq(33434))
            .times(1)
            .returning(move |_, _| Ok(expected));
        let source_addr = SourceAddr::discover::<MockPlatform>(target_addr, Port(33434)).unwrap();
        assert_eq!(expected, source_addr);
    }

    #[test]
    fn test_discover_failure() {
        let _m = MTX.lock();
        let target_addr = Ipv4Addr::from_str("1.2.3.4").unwrap();
        let ctx = MockPlatform::discover_local_addr_context();
        ctx.expect()
            .with(predicate::eq(target_addr), predicate::eq(33434))
            .times(1)
            .returning(move |_, _| Err(Error::MissingAddr));
        let err = SourceAddr::discover::<MockPlatform>(target_addr, Port(33434)).unwrap_err();
        assert!(matches!(err, Error::MissingAddr));
    }
}
