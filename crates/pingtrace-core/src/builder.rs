use crate::config::{AddressMode, PingConfig, TraceConfig};
use crate::constants::{MAX_PAYLOAD_SIZE, MAX_TTL};
use crate::error::{Error, Result};
use crate::ping::Ping;
use crate::trace::Trace;
use crate::types::{PayloadSize, Sequence, TimeToLive, TraceId};
use std::net::Ipv4Addr;
use std::time::Duration;

/// Build a [`Ping`].
///
/// # Examples
///
/// ```no_run
/// # fn main() -> anyhow::Result<()> {
/// use pingtrace_core::{PingBuilder, TraceId};
/// use std::net::Ipv4Addr;
/// use std::time::Duration;
///
/// let ping = PingBuilder::new(Ipv4Addr::new(1, 1, 1, 1))
///     .identifier(TraceId(1234))
///     .count(10)
///     .interval(Duration::from_millis(200))
///     .build()?;
/// let stats = ping.run(|report| println!("{report:?}"))?;
/// println!("{:.1}% loss", stats.loss_percent());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct PingBuilder {
    config: PingConfig,
}

impl PingBuilder {
    /// Build a ping builder for a given target.
    #[must_use]
    pub fn new(target_addr: Ipv4Addr) -> Self {
        Self {
            config: PingConfig {
                target_addr,
                ..PingConfig::default()
            },
        }
    }

    /// Set the echo identifier shared by every probe.
    #[must_use]
    pub const fn identifier(mut self, identifier: TraceId) -> Self {
        self.config.identifier = identifier;
        self
    }

    /// Set the number of probes to send.
    #[must_use]
    pub const fn count(mut self, count: usize) -> Self {
        self.config.count = count;
        self
    }

    /// Set the minimum time between the start of consecutive probes.
    #[must_use]
    pub const fn interval(mut self, interval: Duration) -> Self {
        self.config.interval = interval;
        self
    }

    /// Set the number of payload bytes in each echo request.
    #[must_use]
    pub const fn payload_size(mut self, payload_size: PayloadSize) -> Self {
        self.config.payload_size = payload_size;
        self
    }

    /// Set how long to wait for each reply.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the outgoing TTL, `None` keeps the OS default.
    #[must_use]
    pub const fn ttl(mut self, ttl: Option<TimeToLive>) -> Self {
        self.config.ttl = ttl;
        self
    }

    /// Set the sequence number of the first probe.
    #[must_use]
    pub const fn initial_sequence(mut self, initial_sequence: Sequence) -> Self {
        self.config.initial_sequence = initial_sequence;
        self
    }

    /// Validate the configuration and build the [`Ping`].
    pub fn build(self) -> Result<Ping> {
        if self.config.count == 0 {
            return Err(Error::BadConfig(String::from("count must be at least 1")));
        }
        validate_payload_size(self.config.payload_size)?;
        validate_timeout(self.config.timeout)?;
        if self.config.ttl == Some(TimeToLive(0)) {
            return Err(Error::BadConfig(String::from("ttl must be at least 1")));
        }
        Ok(Ping::new(self.config))
    }
}

/// Build a [`Trace`].
///
/// # Examples
///
/// ```no_run
/// # fn main() -> anyhow::Result<()> {
/// use pingtrace_core::{AddressMode, TraceBuilder};
/// use std::net::Ipv4Addr;
///
/// let trace = TraceBuilder::new(Ipv4Addr::new(1, 1, 1, 1))
///     .address_mode(AddressMode::Numeric)
///     .probes_per_hop(3)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct TraceBuilder {
    config: TraceConfig,
}

impl TraceBuilder {
    /// Build a traceroute builder for a given target.
    #[must_use]
    pub fn new(target_addr: Ipv4Addr) -> Self {
        Self {
            config: TraceConfig {
                target_addr,
                ..TraceConfig::default()
            },
        }
    }

    /// Set the echo identifier shared by every probe.
    #[must_use]
    pub const fn identifier(mut self, identifier: TraceId) -> Self {
        self.config.identifier = identifier;
        self
    }

    /// Set the TTL of the first hop to probe.
    #[must_use]
    pub const fn first_ttl(mut self, first_ttl: TimeToLive) -> Self {
        self.config.first_ttl = first_ttl;
        self
    }

    /// Set the TTL of the last hop to probe.
    ///
    /// Values above [`MAX_TTL`] are clamped to it.
    #[must_use]
    pub fn max_ttl(mut self, max_ttl: TimeToLive) -> Self {
        self.config.max_ttl = max_ttl.min(TimeToLive(MAX_TTL));
        self
    }

    /// Set the number of probes sent at each TTL.
    #[must_use]
    pub const fn probes_per_hop(mut self, probes_per_hop: usize) -> Self {
        self.config.probes_per_hop = probes_per_hop;
        self
    }

    /// Set the number of payload bytes in each echo request.
    #[must_use]
    pub const fn payload_size(mut self, payload_size: PayloadSize) -> Self {
        self.config.payload_size = payload_size;
        self
    }

    /// Set how long to wait for each response.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set how hop addresses are displayed.
    #[must_use]
    pub const fn address_mode(mut self, address_mode: AddressMode) -> Self {
        self.config.address_mode = address_mode;
        self
    }

    /// Set the sequence number of the first probe.
    #[must_use]
    pub const fn initial_sequence(mut self, initial_sequence: Sequence) -> Self {
        self.config.initial_sequence = initial_sequence;
        self
    }

    /// Validate the configuration and build the [`Trace`].
    pub fn build(self) -> Result<Trace> {
        if self.config.first_ttl.0 == 0 {
            return Err(Error::BadConfig(String::from("first_ttl must be at least 1")));
        }
        if self.config.first_ttl > self.config.max_ttl {
            return Err(Error::BadConfig(format!(
                "first_ttl {} > max_ttl {}",
                self.config.first_ttl, self.config.max_ttl
            )));
        }
        if self.config.probes_per_hop == 0 {
            return Err(Error::BadConfig(String::from(
                "probes_per_hop must be at least 1",
            )));
        }
        validate_payload_size(self.config.payload_size)?;
        validate_timeout(self.config.timeout)?;
        Ok(Trace::new(self.config))
    }
}

fn validate_payload_size(payload_size: PayloadSize) -> Result<()> {
    if payload_size.0 > MAX_PAYLOAD_SIZE {
        Err(Error::InvalidPayloadSize(usize::from(payload_size.0)))
    } else {
        Ok(())
    }
}

fn validate_timeout(timeout: Duration) -> Result<()> {
    if timeout.is_zero() {
        Err(Error::BadConfig(String::from("timeout must be non-zero")))
    } else {
        Ok(())
    }
}
