//! This crate provides a cheaply cloneable, blocking, caching, forward and
//! reverse DNS resolver.
//!
//! Forward lookups return IPv4 addresses only. The result of a reverse lookup
//! is cached and reused until it is older than the configured time-to-live
//! (TTL), a lookup which timed out is always retried.
//!
//! # Example
//!
//! The following example resolves a hostname and then performs a reverse DNS
//! lookup of the address it resolved to. The lookups use the Cloudflare
//! 1.1.1.1 public DNS service.
//!
//! ```no_run
//! # fn main() -> anyhow::Result<()> {
//! # use std::time::Duration;
//! use pingtrace_dns::{Config, DnsEntry, DnsResolver, ResolveMethod, Resolver};
//!
//! let config = Config::new(
//!     ResolveMethod::Cloudflare,
//!     Duration::from_secs(5),
//!     Duration::from_secs(300),
//! );
//! let resolver = DnsResolver::start(config)?;
//! let addr = resolver.lookup_ipv4("one.one.one.one")?;
//! match resolver.reverse_lookup(addr) {
//!     DnsEntry::Resolved(ip, hosts) => println!("{ip} resolved to {hosts:?}"),
//!     DnsEntry::NotFound(ip) => println!("{ip} did not match any records"),
//!     DnsEntry::Timeout(ip) => println!("lookup of {ip} timed out"),
//!     DnsEntry::Failed(ip) => println!("lookup of {ip} failed"),
//! }
//! # Ok(())
//! # }
//! ```
#![forbid(unsafe_code)]

mod config;
mod dns_resolver;
mod resolver;

pub use config::{Builder, Config};
pub use dns_resolver::{DnsResolver, ResolveMethod};
pub use resolver::{DnsEntry, Error, ResolvedHostnames, ResolvedIpAddrs, Resolver, Result};
