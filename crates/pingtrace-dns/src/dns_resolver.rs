use crate::config::Config;
use crate::resolver::{DnsEntry, ResolvedIpAddrs, Resolver, Result};
use std::fmt::{Display, Formatter};
use std::net::IpAddr;
use std::sync::Arc;

/// How DNS queries will be resolved.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ResolveMethod {
    /// Resolve using the OS resolver.
    System,
    /// Resolve using the `/etc/resolv.conf` DNS configuration.
    Resolv,
    /// Resolve using the Google `8.8.8.8` DNS service.
    Google,
    /// Resolve using the Cloudflare `1.1.1.1` DNS service.
    Cloudflare,
}

impl Display for ResolveMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::System => write!(f, "system"),
            Self::Resolv => write!(f, "resolv"),
            Self::Google => write!(f, "google"),
            Self::Cloudflare => write!(f, "cloudflare"),
        }
    }
}

/// A cheaply cloneable, thread safe, blocking, caching, forward and reverse DNS resolver.
///
/// Forward lookups are never cached. A reverse lookup is served from the
/// cache unless the cached entry is older than the configured time-to-live or
/// the previous attempt timed out.
#[derive(Clone)]
pub struct DnsResolver {
    inner: Arc<inner::DnsResolver>,
}

impl DnsResolver {
    /// Create a new `DnsResolver`.
    pub fn start(config: Config) -> std::io::Result<Self> {
        Ok(Self {
            inner: Arc::new(inner::DnsResolver::start(config)?),
        })
    }
}

impl Resolver for DnsResolver {
    fn lookup(&self, hostname: impl AsRef<str>) -> Result<ResolvedIpAddrs> {
        self.inner.lookup(hostname.as_ref())
    }
    fn reverse_lookup(&self, addr: impl Into<IpAddr>) -> DnsEntry {
        self.inner.reverse_lookup(addr.into())
    }
}

/// Private impl of resolver.
mod inner {
    use super::{Config, ResolveMethod};
    use crate::resolver::{DnsEntry, Error, ResolvedIpAddrs, Result};
    use hickory_resolver::config::{LookupIpStrategy, ResolverConfig, ResolverOpts};
    use hickory_resolver::error::ResolveErrorKind;
    use hickory_resolver::system_conf::read_system_conf;
    use hickory_resolver::Resolver;
    use parking_lot::RwLock;
    use std::collections::HashMap;
    use std::net::IpAddr;
    use std::time::{Duration, SystemTime};

    /// A cache entry for a reverse DNS lookup.
    #[derive(Debug, Clone)]
    struct CacheEntry {
        /// The DNS entry to cache.
        entry: DnsEntry,
        /// The timestamp of the entry.
        timestamp: SystemTime,
    }

    /// A cache of reverse DNS lookup entries.
    #[derive(Debug, Default)]
    struct Cache {
        entries: RwLock<HashMap<IpAddr, CacheEntry>>,
    }

    impl Cache {
        /// The cached entry for `addr`, if it is still usable at `now`.
        fn get(&self, addr: IpAddr, now: SystemTime, ttl: Duration) -> Option<DnsEntry> {
            self.entries
                .read()
                .get(&addr)
                .filter(|cached| !cached.entry.is_transient())
                .filter(|cached| now.duration_since(cached.timestamp).unwrap_or_default() <= ttl)
                .map(|cached| cached.entry.clone())
        }

        fn insert(&self, entry: DnsEntry, timestamp: SystemTime) {
            self.entries
                .write()
                .insert(entry.addr(), CacheEntry { entry, timestamp });
        }
    }

    enum DnsProvider {
        TrustDns(Resolver),
        DnsLookup,
    }

    /// Resolver implementation.
    pub(super) struct DnsResolver {
        config: Config,
        provider: DnsProvider,
        addr_cache: Cache,
    }

    impl DnsResolver {
        pub(super) fn start(config: Config) -> std::io::Result<Self> {
            let provider = if matches!(config.resolve_method, ResolveMethod::System) {
                DnsProvider::DnsLookup
            } else {
                let mut options = ResolverOpts::default();
                options.timeout = config.timeout;
                options.ip_strategy = LookupIpStrategy::Ipv4Only;
                let res = match config.resolve_method {
                    ResolveMethod::Resolv => {
                        let (resolver_cfg, mut options) = read_system_conf()?;
                        options.timeout = config.timeout;
                        options.ip_strategy = LookupIpStrategy::Ipv4Only;
                        Resolver::new(resolver_cfg, options)
                    }
                    ResolveMethod::Google => Resolver::new(ResolverConfig::google(), options),
                    ResolveMethod::Cloudflare | ResolveMethod::System => {
                        Resolver::new(ResolverConfig::cloudflare(), options)
                    }
                }?;
                DnsProvider::TrustDns(res)
            };
            Ok(Self {
                config,
                provider,
                addr_cache: Cache::default(),
            })
        }

        pub(super) fn lookup(&self, hostname: &str) -> Result<ResolvedIpAddrs> {
            let all = match &self.provider {
                DnsProvider::TrustDns(resolver) => resolver
                    .lookup_ip(hostname)
                    .map_err(|err| Error::LookupFailed(Box::new(err)))?
                    .iter()
                    .collect::<Vec<_>>(),
                DnsProvider::DnsLookup => dns_lookup::lookup_host(hostname)
                    .map_err(|err| Error::LookupFailed(Box::new(err)))?,
            };
            Ok(ResolvedIpAddrs::ipv4_only(all))
        }

        pub(super) fn reverse_lookup(&self, addr: IpAddr) -> DnsEntry {
            let now = SystemTime::now();
            if let Some(entry) = self.addr_cache.get(addr, now, self.config.ttl) {
                return entry;
            }
            let entry = reverse_lookup(&self.provider, addr);
            self.addr_cache.insert(entry.clone(), now);
            entry
        }
    }

    fn reverse_lookup(provider: &DnsProvider, addr: IpAddr) -> DnsEntry {
        match provider {
            DnsProvider::DnsLookup => {
                // we can't distinguish between a failed lookup or a genuine error, and so we just
                // assume all failures are `DnsEntry::NotFound`.
                match dns_lookup::lookup_addr(&addr) {
                    Ok(dns) => DnsEntry::Resolved(addr, vec![dns]),
                    Err(_) => DnsEntry::NotFound(addr),
                }
            }
            DnsProvider::TrustDns(resolver) => match resolver.reverse_lookup(addr) {
                Ok(name) => {
                    let hostnames = name
                        .into_iter()
                        .map(|mut s| {
                            s.0.set_fqdn(false);
                            s
                        })
                        .map(|s| s.to_string())
                        .collect();
                    DnsEntry::Resolved(addr, hostnames)
                }
                Err(err) => match err.kind() {
                    ResolveErrorKind::NoRecordsFound { .. } => DnsEntry::NotFound(addr),
                    ResolveErrorKind::Timeout => DnsEntry::Timeout(addr),
                    _ => DnsEntry::Failed(addr),
                },
            },
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolver_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DnsResolver>();
    }
}
