use crate::types::{PayloadSize, Sequence, TimeToLive, TraceId};
use pingtrace_packet::icmpv4::IcmpDestinationUnreachableCode;
use std::fmt::{Display, Formatter};
use std::net::Ipv4Addr;
use std::time::Duration;

/// A single echo request to send and wait for.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ProbeRequest {
    pub identifier: TraceId,
    pub sequence: Sequence,
    /// The outgoing TTL, or `None` to leave the socket TTL unchanged.
    pub ttl: Option<TimeToLive>,
    pub payload_size: PayloadSize,
    pub timeout: Duration,
}

impl ProbeRequest {
    /// The echo payload: an incrementing byte pattern of `payload_size` bytes.
    #[must_use]
    pub fn payload(&self) -> Vec<u8> {
        (0..self.payload_size.0).map(|i| (i % 256) as u8).collect()
    }
}

/// The outcome of a single probe.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ProbeOutcome {
    /// The target answered with an `EchoReply`.
    Replied {
        rtt: Duration,
        addr: Ipv4Addr,
        /// The TTL of the reply datagram as received.
        ttl: u8,
        /// The number of echoed payload bytes.
        bytes: usize,
    },
    /// No correlated reply arrived before the deadline.
    TimedOut,
    /// A router discarded the probe because its TTL expired.
    TtlExceeded { addr: Ipv4Addr, rtt: Duration },
    /// The probe could not be delivered.
    Unreachable {
        addr: Ipv4Addr,
        rtt: Duration,
        reason: UnreachableReason,
    },
    /// No correlated reply arrived before the deadline and at least one
    /// datagram read while waiting failed checksum verification.
    ///
    /// This is a behavioural change from reporting [`ProbeOutcome::TimedOut`]
    /// whenever the deadline passes: corrupt datagrams are still discarded,
    /// but their arrival is reported. Callers count it as unanswered.
    ChecksumInvalid,
}

impl ProbeOutcome {
    /// The address of the host which answered, if any.
    #[must_use]
    pub const fn addr(&self) -> Option<Ipv4Addr> {
        match self {
            Self::Replied { addr, .. }
            | Self::TtlExceeded { addr, .. }
            | Self::Unreachable { addr, .. } => Some(*addr),
            Self::TimedOut | Self::ChecksumInvalid => None,
        }
    }

    /// The round trip time, if any host answered.
    #[must_use]
    pub const fn rtt(&self) -> Option<Duration> {
        match self {
            Self::Replied { rtt, .. }
            | Self::TtlExceeded { rtt, .. }
            | Self::Unreachable { rtt, .. } => Some(*rtt),
            Self::TimedOut | Self::ChecksumInvalid => None,
        }
    }

    /// Did any host answer this probe?
    #[must_use]
    pub const fn is_answered(&self) -> bool {
        self.addr().is_some()
    }
}

/// Why a probe could not be delivered.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum UnreachableReason {
    Network,
    Host,
    Protocol,
    Port,
    FragmentationNeeded,
    SourceRouteFailed,
    AdministrativelyProhibited,
    Other(u8),
}

impl From<IcmpDestinationUnreachableCode> for UnreachableReason {
    fn from(code: IcmpDestinationUnreachableCode) -> Self {
        match code {
            IcmpDestinationUnreachableCode::Network
            | IcmpDestinationUnreachableCode::NetworkUnknown => Self::Network,
            IcmpDestinationUnreachableCode::Host | IcmpDestinationUnreachableCode::HostUnknown => {
                Self::Host
            }
            IcmpDestinationUnreachableCode::Protocol => Self::Protocol,
            IcmpDestinationUnreachableCode::Port => Self::Port,
            IcmpDestinationUnreachableCode::FragmentationNeeded => Self::FragmentationNeeded,
            IcmpDestinationUnreachableCode::SourceRouteFailed => Self::SourceRouteFailed,
            IcmpDestinationUnreachableCode::AdministrativelyProhibited => {
                Self::AdministrativelyProhibited
            }
            IcmpDestinationUnreachableCode::Unknown(code) => Self::Other(code),
        }
    }
}

/// The annotations used by the classic traceroute.
impl Display for UnreachableReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Network => write!(f, "!N"),
            Self::Host => write!(f, "!H"),
            Self::Protocol => write!(f, "!P"),
            Self::Port => write!(f, "!p"),
            Self::FragmentationNeeded => write!(f, "!F"),
            Self::SourceRouteFailed => write!(f, "!S"),
            Self::AdministrativelyProhibited => write!(f, "!X"),
            Self::Other(code) => write!(f, "!<{code}>"),
        }
    }
}
