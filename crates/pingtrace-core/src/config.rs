use crate::types::{PayloadSize, Sequence, TimeToLive, TraceId};
use std::fmt::{Display, Formatter};
use std::net::Ipv4Addr;
use std::time::Duration;

/// Default values for configuration.
pub mod defaults {
    use crate::config::AddressMode;
    use std::time::Duration;

    /// The default value for ping `count`.
    pub const DEFAULT_PING_COUNT: usize = 4;

    /// The default value for ping `interval`.
    pub const DEFAULT_PING_INTERVAL: Duration = Duration::from_secs(1);

    /// The default value for ping `payload-size`.
    pub const DEFAULT_PING_PAYLOAD_SIZE: u16 = 56;

    /// The default value for ping `timeout`.
    pub const DEFAULT_PING_TIMEOUT: Duration = Duration::from_secs(1);

    /// The default value for traceroute `first-ttl`.
    pub const DEFAULT_TRACE_FIRST_TTL: u8 = 1;

    /// The default value for traceroute `max-ttl`.
    pub const DEFAULT_TRACE_MAX_TTL: u8 = crate::constants::MAX_TTL;

    /// The default value for traceroute `probes-per-hop`.
    pub const DEFAULT_TRACE_PROBES_PER_HOP: usize = 1;

    /// The default value for traceroute `payload-size`.
    pub const DEFAULT_TRACE_PAYLOAD_SIZE: u16 = 32;

    /// The default value for traceroute `timeout`.
    pub const DEFAULT_TRACE_TIMEOUT: Duration = Duration::from_secs(1);

    /// The default value for traceroute `address-mode`.
    pub const DEFAULT_TRACE_ADDRESS_MODE: AddressMode = AddressMode::Symbolic;

    /// The default value for `initial-sequence`.
    pub const DEFAULT_INITIAL_SEQUENCE: u16 = 0;

    /// The default value for `trace-identifier`.
    pub const DEFAULT_TRACE_IDENTIFIER: u16 = 0;
}

/// How hop addresses are displayed.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AddressMode {
    /// Attempt a reverse DNS lookup of each hop address.
    Symbolic,
    /// Show the numeric address only.
    Numeric,
}

impl Display for AddressMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Symbolic => write!(f, "symbolic"),
            Self::Numeric => write!(f, "numeric"),
        }
    }
}

/// Ping configuration.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct PingConfig {
    pub target_addr: Ipv4Addr,
    pub identifier: TraceId,
    pub count: usize,
    pub interval: Duration,
    pub payload_size: PayloadSize,
    pub timeout: Duration,
    /// The outgoing TTL, or `None` to leave the OS default in place.
    pub ttl: Option<TimeToLive>,
    pub initial_sequence: Sequence,
}

impl Default for PingConfig {
    fn default() -> Self {
        Self {
            target_addr: Ipv4Addr::UNSPECIFIED,
            identifier: TraceId(defaults::DEFAULT_TRACE_IDENTIFIER),
            count: defaults::DEFAULT_PING_COUNT,
            interval: defaults::DEFAULT_PING_INTERVAL,
            payload_size: PayloadSize(defaults::DEFAULT_PING_PAYLOAD_SIZE),
            timeout: defaults::DEFAULT_PING_TIMEOUT,
            ttl: None,
            initial_sequence: Sequence(defaults::DEFAULT_INITIAL_SEQUENCE),
        }
    }
}

/// Traceroute configuration.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TraceConfig {
    pub target_addr: Ipv4Addr,
    pub identifier: TraceId,
    pub first_ttl: TimeToLive,
    pub max_ttl: TimeToLive,
    pub probes_per_hop: usize,
    pub payload_size: PayloadSize,
    pub timeout: Duration,
    pub address_mode: AddressMode,
    pub initial_sequence: Sequence,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            target_addr: Ipv4Addr::UNSPECIFIED,
            identifier: TraceId(defaults::DEFAULT_TRACE_IDENTIFIER),
            first_ttl: TimeToLive(defaults::DEFAULT_TRACE_FIRST_TTL),
            max_ttl: TimeToLive(defaults::DEFAULT_TRACE_MAX_TTL),
            probes_per_hop: defaults::DEFAULT_TRACE_PROBES_PER_HOP,
            payload_size: PayloadSize(defaults::DEFAULT_TRACE_PAYLOAD_SIZE),
            timeout: defaults::DEFAULT_TRACE_TIMEOUT,
            address_mode: defaults::DEFAULT_TRACE_ADDRESS_MODE,
            initial_sequence: Sequence(defaults::DEFAULT_INITIAL_SEQUENCE),
        }
    }
}
