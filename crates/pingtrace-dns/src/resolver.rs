use itertools::Itertools;
use std::fmt::{Display, Formatter};
use std::net::{IpAddr, Ipv4Addr};
use thiserror::Error;

/// A DNS resolver.
pub trait Resolver {
    /// Perform a blocking DNS hostname lookup and return the resolved IPv4 addresses.
    fn lookup(&self, hostname: impl AsRef<str>) -> Result<ResolvedIpAddrs>;

    /// Perform a blocking DNS hostname lookup and return the first IPv4 address.
    fn lookup_ipv4(&self, hostname: impl AsRef<str>) -> Result<Ipv4Addr> {
        let hostname = hostname.as_ref();
        self.lookup(hostname)?
            .first_ipv4()
            .ok_or_else(|| Error::NoIpv4Address(hostname.to_string()))
    }

    /// Perform a blocking reverse DNS lookup of `IpAddr` and return a `DnsEntry`.
    #[must_use]
    fn reverse_lookup(&self, addr: impl Into<IpAddr>) -> DnsEntry;
}

/// A DNS resolver error result.
pub type Result<T> = std::result::Result<T, Error>;

/// A DNS resolver error.
#[derive(Error, Debug)]
pub enum Error {
    #[error("DNS lookup failed: {0}")]
    LookupFailed(Box<dyn std::error::Error + Send + Sync + 'static>),
    #[error("no IPv4 address found for {0}")]
    NoIpv4Address(String),
}

/// The output of a successful DNS lookup.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ResolvedIpAddrs(pub(super) Vec<IpAddr>);

impl ResolvedIpAddrs {
    pub fn iter(&self) -> impl Iterator<Item = &'_ IpAddr> {
        self.0.iter()
    }

    /// The first IPv4 address, in the order the resolver returned them.
    #[must_use]
    pub fn first_ipv4(&self) -> Option<Ipv4Addr> {
        self.0.iter().find_map(|addr| match addr {
            IpAddr::V4(ipv4) => Some(*ipv4),
            IpAddr::V6(_) => None,
        })
    }

    /// Keep the IPv4 addresses only.
    pub(super) fn ipv4_only(all: Vec<IpAddr>) -> Self {
        Self(all.into_iter().filter(IpAddr::is_ipv4).collect())
    }
}

impl FromIterator<IpAddr> for ResolvedIpAddrs {
    fn from_iter<T: IntoIterator<Item = IpAddr>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for ResolvedIpAddrs {
    type Item = IpAddr;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// The state of reverse DNS resolution.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum DnsEntry {
    /// The `IpAddr` resolved to one or more hostnames.
    Resolved(IpAddr, Vec<String>),
    /// The `IpAddr` could not be resolved.
    NotFound(IpAddr),
    /// The reverse DNS resolution of `IpAddr` failed.
    Failed(IpAddr),
    /// The reverse DNS resolution of `IpAddr` timed out.
    Timeout(IpAddr),
}

/// The resolved hostnames of a `DnsEntry`.
#[derive(Debug, Clone)]
pub struct ResolvedHostnames<'a>(pub(super) std::slice::Iter<'a, String>);

impl<'a> Iterator for ResolvedHostnames<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(String::as_str)
    }
}

impl DnsEntry {
    /// The resolved hostnames.
    #[must_use]
    pub fn hostnames(&self) -> ResolvedHostnames<'_> {
        match self {
            Self::Resolved(_, hosts) => ResolvedHostnames(hosts.iter()),
            Self::NotFound(_) | Self::Failed(_) | Self::Timeout(_) => {
                #[allow(clippy::iter_on_empty_collections)]
                ResolvedHostnames([].iter())
            }
        }
    }

    /// The address this entry is for.
    #[must_use]
    pub const fn addr(&self) -> IpAddr {
        match self {
            Self::Resolved(addr, _)
            | Self::NotFound(addr)
            | Self::Failed(addr)
            | Self::Timeout(addr) => *addr,
        }
    }

    /// Should this entry be looked up again rather than served from a cache?
    pub(super) const fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

impl Display for DnsEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Resolved(_, hosts) => write!(f, "{}", hosts.iter().join(" ")),
            Self::NotFound(ip) => write!(f, "{ip}"),
            Self::Timeout(ip) => write!(f, "Timeout: {ip}"),
            Self::Failed(ip) => write!(f, "Failed: {ip}"),
        }
    }
}
