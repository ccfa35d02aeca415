//! Discover platform privileges.
//!
//! Raw `ICMP` sockets are needed to observe the `Time Exceeded` and
//! `Destination Unreachable` messages which routers send in response to probe
//! datagrams and all supported platforms restrict raw sockets to privileged
//! processes.
//!
//! [`Privilege::acquire_privileges`]:
//!
//! - On Linux we check if `CAP_NET_RAW` is in the permitted set and if so raise it to the effective
//!   set
//! - On other Unix platforms this is a no-op
//!
//! [`Privilege::has_privileges`] (obtained via [`Privilege::discover`]):
//!
//! - On Linux we check if `CAP_NET_RAW` is in the effective set
//! - On other Unix platforms we check that the effective user is root
//!
//! [`Privilege::drop_privileges`]:
//!
//! - On Linux we clear the effective set
//! - On other Unix platforms this is a no-op
//!
//! # Examples
//!
//! Acquire the required privileges if we can:
//!
//! ```rust
//! # fn main() -> anyhow::Result<()> {
//! # use hopwire_privilege::Privilege;
//! let privilege = Privilege::acquire_privileges()?;
//! if privilege.has_privileges() {
//!     println!("You have the required privileges for raw sockets");
//! } else {
//!     println!("You do not have the required privileges for raw sockets");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Drop all privileges once the raw socket is open:
//!
//! ```rust
//! # fn main() -> anyhow::Result<()> {
//! # use hopwire_privilege::Privilege;
//! Privilege::drop_privileges()?;
//! # Ok(())
//! # }
//! ```
#![forbid(unsafe_code)]

/// A privilege error result.
pub type Result<T> = std::result::Result<T, Error>;

/// A privilege error.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[cfg(target_os = "linux")]
    #[error("caps error: {0}")]
    CapsError(#[from] caps::errors::CapsError),
}

/// Run-time platform privilege information.
#[derive(Debug)]
pub struct Privilege {
    has_privileges: bool,
}

impl Privilege {
    /// Discover information about the platform privileges.
    pub fn discover() -> Result<Self> {
        let has_privileges = Self::check_has_privileges()?;
        Ok(Self { has_privileges })
    }

    /// Create a new Privilege instance.
    #[must_use]
    pub const fn new(has_privileges: bool) -> Self {
        Self { has_privileges }
    }

    /// Are we running with the privileges required for raw sockets?
    #[must_use]
    pub const fn has_privileges(&self) -> bool {
        self.has_privileges
    }

    // Linux

    #[cfg(target_os = "linux")]
    /// Acquire privileges, if possible.
    ///
    /// Check if `CAP_NET_RAW` is in the permitted set and if so raise it to the effective set.
    pub fn acquire_privileges() -> Result<Self> {
        if caps::has_cap(None, caps::CapSet::Permitted, caps::Capability::CAP_NET_RAW)? {
            caps::raise(None, caps::CapSet::Effective, caps::Capability::CAP_NET_RAW)?;
        }
        Self::discover()
    }

    #[cfg(target_os = "linux")]
    /// Do we have the required privileges?
    ///
    /// Check if `CAP_NET_RAW` is in the effective set.
    fn check_has_privileges() -> Result<bool> {
        Ok(caps::has_cap(
            None,
            caps::CapSet::Effective,
            caps::Capability::CAP_NET_RAW,
        )?)
    }

    #[cfg(target_os = "linux")]
    /// Drop all privileges.
    ///
    /// Clears the effective set.
    pub fn drop_privileges() -> Result<()> {
        caps::clear(None, caps::CapSet::Effective)?;
        Ok(())
    }

    // Unix (excl. Linux)

    #[cfg(all(unix, not(target_os = "linux")))]
    /// Acquire privileges, if possible.
    ///
    /// This is a no-op on non-Linux unix systems.
    pub fn acquire_privileges() -> Result<Self> {
        Self::discover()
    }

    #[cfg(all(unix, not(target_os = "linux")))]
    #[allow(clippy::unnecessary_wraps)]
    /// Do we have the required privileges?
    ///
    /// Checks if the effective user is root.
    fn check_has_privileges() -> Result<bool> {
        Ok(nix::unistd::Uid::effective().is_root())
    }

    #[cfg(all(unix, not(target_os = "linux")))]
    /// Drop all privileges.
    ///
    /// This is a no-op on non-Linux unix systems.
    pub const fn drop_privileges() -> Result<()> {
        Ok(())
    }
}
