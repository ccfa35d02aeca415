use std::fmt::{Display, Formatter};
use std::io;
use std::net::SocketAddr;
use thiserror::Error;

/// A tracer error result.
pub type Result<T> = std::result::Result<T, Error>;

/// A tracer error.
#[derive(Error, Debug)]
pub enum Error {
    #[error("privileges are required to open raw sockets")]
    PrivilegeRequired,
    #[error("failed to resolve {0}")]
    ResolutionFailed(String),
    #[error("invalid option: {0}")]
    InvalidOption(String),
    #[error("trace cancelled")]
    Cancelled,
    #[error("invalid packet: {0}")]
    PacketError(#[from] hopwire_packet::error::Error),
    #[error("IO error: {0}")]
    IoError(#[from] IoError),
    #[error("address {0} in use")]
    AddressInUse(SocketAddr),
    #[error("missing address from socket call")]
    MissingAddr,
    #[error("privilege error: {0}")]
    PrivilegeError(#[from] hopwire_privilege::Error),
    #[error("tracer error: {0}")]
    Other(String),
}

/// Custom IO error result.
pub type IoResult<T> = std::result::Result<T, IoError>;

/// Custom IO error.
#[derive(Error, Debug)]
pub enum IoError {
    #[error("Bind error for {1}: {0}")]
    Bind(io::Error, SocketAddr),
    #[error("Connect error for {1}: {0}")]
    Connect(io::Error, SocketAddr),
    #[error("Sendto error for {1}: {0}")]
    SendTo(io::Error, SocketAddr),
    #[error("failed to {1}: {0}")]
    Other(io::Error, IoOperation),
}

impl IoError {
    /// Get the custom error kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Bind(e, _) | Self::Connect(e, _) | Self::SendTo(e, _) | Self::Other(e, _) => {
                ErrorKind::from(e)
            }
        }
    }
}

/// Custom error kind.
///
/// This includes additional error kinds that are not part of the standard [`io::ErrorKind`].
#[derive(Debug, Eq, PartialEq)]
pub enum ErrorKind {
    InProgress,
    Std(io::ErrorKind),
}

/// Io operation.
#[derive(Debug)]
pub enum IoOperation {
    NewSocket,
    SetNonBlocking,
    SetTtl,
    Select,
    Read,
    LocalAddr,
}

impl Display for IoOperation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NewSocket => write!(f, "create new socket"),
            Self::SetNonBlocking => write!(f, "set non-blocking"),
            Self::SetTtl => write!(f, "set TTL"),
            Self::Select => write!(f, "select"),
            Self::Read => write!(f, "read"),
            Self::LocalAddr => write!(f, "local addr"),
        }
    }
}
