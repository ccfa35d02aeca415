use crate::error::Result;
use crate::net::platform::Platform;
use std::net::Ipv4Addr;

pub struct PlatformImpl;

impl Platform for PlatformImpl {
    fn discover_local_addr(target_addr: Ipv4Addr, port: u16) -> Result<Ipv4Addr> {
        address::discover_local_addr(target_addr, port)
    }
}

mod address {
    use crate::error::{Error, Result};
    use crate::net::socket::Socket;
    use crate::net::SocketImpl;
    use std::net::{IpAddr, Ipv4Addr, SocketAddr};
    use tracing::instrument;

    // Note that no packets are transmitted by this method.
    #[instrument(ret, level = "trace")]
    pub fn discover_local_addr(target_addr: Ipv4Addr, port: u16) -> Result<Ipv4Addr> {
        let mut socket = SocketImpl::new_udp_dgram_socket()?;
        socket.connect(SocketAddr::new(IpAddr::V4(target_addr), port))?;
        match socket.local_addr()?.ok_or(Error::MissingAddr)?.ip() {
            IpAddr::V4(addr) => Ok(addr),
            IpAddr::V6(_) => Err(Error::MissingAddr),
        }
    }
}

mod socket {
    use crate::error::{ErrorKind, IoError, IoOperation, IoResult};
    use crate::net::socket::Socket;
    use itertools::Itertools;
    use nix::{
        sys::select::FdSet,
        sys::time::{TimeVal, TimeValLike},
        Error,
    };
    use socket2::{Domain, Protocol, SockAddr, Type};
    use std::io;
    use std::io::Read;
    use std::net::SocketAddr;
    use std::os::fd::AsFd;
    use std::time::Duration;
    use tracing::instrument;

    /// A network socket.
    pub struct SocketImpl {
        inner: socket2::Socket,
    }

    impl SocketImpl {
        fn new_raw(protocol: Protocol) -> IoResult<Self> {
            Ok(Self {
                inner: socket2::Socket::new(Domain::IPV4, Type::RAW, Some(protocol))
                    .map_err(|err| IoError::Other(err, IoOperation::NewSocket))?,
            })
        }

        fn new_dgram(protocol: Protocol) -> IoResult<Self> {
            Ok(Self {
                inner: socket2::Socket::new(Domain::IPV4, Type::DGRAM, Some(protocol))
                    .map_err(|err| IoError::Other(err, IoOperation::NewSocket))?,
            })
        }

        fn set_nonblocking(&self, nonblocking: bool) -> IoResult<()> {
            self.inner
                .set_nonblocking(nonblocking)
                .map_err(|err| IoError::Other(err, IoOperation::SetNonBlocking))
        }

        pub(super) fn local_addr(&self) -> IoResult<Option<SocketAddr>> {
            Ok(self
                .inner
                .local_addr()
                .map_err(|err| IoError::Other(err, IoOperation::LocalAddr))?
                .as_socket())
        }
    }

    impl Socket for SocketImpl {
        #[instrument(level = "trace")]
        fn new_udp_send_socket() -> IoResult<Self> {
            let socket = Self::new_dgram(Protocol::UDP)?;
            socket.set_nonblocking(true)?;
            Ok(socket)
        }
        #[instrument(level = "trace")]
        fn new_icmp_recv_socket() -> IoResult<Self> {
            let socket = Self::new_raw(Protocol::ICMPV4)?;
            socket.set_nonblocking(true)?;
            Ok(socket)
        }
        #[instrument(level = "trace")]
        fn new_udp_dgram_socket() -> IoResult<Self> {
            Self::new_dgram(Protocol::UDP)
        }
        #[instrument(skip(self), level = "trace")]
        fn bind(&mut self, address: SocketAddr) -> IoResult<()> {
            self.inner
                .bind(&SockAddr::from(address))
                .map_err(|err| IoError::Bind(err, address))
        }
        #[instrument(skip(self), level = "trace")]
        fn set_ttl(&mut self, ttl: u32) -> IoResult<()> {
            self.inner
                .set_ttl_v4(ttl)
                .map_err(|err| IoError::Other(err, IoOperation::SetTtl))
        }
        #[instrument(skip(self), level = "trace")]
        fn connect(&mut self, address: SocketAddr) -> IoResult<()> {
            tracing::trace!(?address);
            self.inner
                .connect(&SockAddr::from(address))
                .map_err(|err| IoError::Connect(err, address))
        }
        #[instrument(skip(self, buf), level = "trace")]
        fn send_to(&mut self, buf: &[u8], addr: SocketAddr) -> IoResult<()> {
            tracing::trace!(buf = format!("{:02x?}", buf.iter().format(" ")), ?addr);
            self.inner
                .send_to(buf, &SockAddr::from(addr))
                .map_err(|err| IoError::SendTo(err, addr))?;
            Ok(())
        }
        #[instrument(skip(self), level = "trace")]
        fn is_readable(&mut self, timeout: Duration) -> IoResult<bool> {
            let mut read = FdSet::new();
            read.insert(self.inner.as_fd());
            let readable = nix::sys::select::select(
                None,
                Some(&mut read),
                None,
                None,
                Some(&mut TimeVal::milliseconds(timeout.as_millis() as i64)),
            );
            match readable {
                Ok(readable) => Ok(readable == 1),
                Err(Error::EINTR) => Ok(false),
                Err(err) => Err(IoError::Other(
                    std::io::Error::from(err),
                    IoOperation::Select,
                )),
            }
        }
        #[instrument(skip(self, buf), level = "trace")]
        fn read(&mut self, buf: &mut [u8]) -> IoResult<usize> {
            let bytes_read = self
                .inner
                .read(buf)
                .map_err(|err| IoError::Other(err, IoOperation::Read))?;
            tracing::trace!(
                buf = format!("{:02x?}", buf[..bytes_read].iter().format(" ")),
                bytes_read
            );
            Ok(bytes_read)
        }
    }

    impl From<&io::Error> for ErrorKind {
        fn from(value: &io::Error) -> Self {
            if value.raw_os_error() == io::Error::from(Error::EINPROGRESS).raw_os_error() {
                Self::InProgress
            } else {
                Self::Std(value.kind())
            }
        }
    }

    // only used for unit tests
    impl From<ErrorKind> for io::Error {
        fn from(value: ErrorKind) -> Self {
            match value {
                ErrorKind::InProgress => Self::from(Error::EINPROGRESS),
                ErrorKind::Std(kind) => Self::from(kind),
            }
        }
    }

    impl Read for SocketImpl {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.inner.read(buf)
        }
    }
}

pub use socket::SocketImpl;
