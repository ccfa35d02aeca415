//! Forward and reverse DNS resolution.
//!
//! Hostnames are resolved to a single `IPv4` address via the system resolver
//! and addresses are reverse resolved to hostnames on a best-effort basis,
//! bounded by a configurable timeout.
#![forbid(unsafe_code)]

mod lookup;
mod resolver;

pub use lookup::{Config, DnsResolver};
pub use resolver::{Error, Resolver, Result};
