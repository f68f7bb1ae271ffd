use derive_more::{Add, AddAssign};
use std::fmt::{Display, Formatter};

/// `TimeToLive` (ttl) newtype.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Ord, PartialOrd, Hash, Add, AddAssign)]
pub struct TimeToLive(pub u8);

impl Display for TimeToLive {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// `Sequence` number newtype.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Ord, PartialOrd, Hash, Add, AddAssign)]
pub struct Sequence(pub u16);

impl Sequence {
    /// The sequence number `n` probes after this one, wrapping at `u16::MAX`.
    #[must_use]
    pub const fn offset(self, n: usize) -> Self {
        Self(self.0.wrapping_add(n as u16))
    }
}

impl Display for Sequence {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// `TraceId` newtype.
///
/// The ICMP echo identifier shared by every probe of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct TraceId(pub u16);

/// `PayloadSize` newtype.
///
/// The number of data bytes following the 8 byte ICMP echo header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Ord, PartialOrd)]
pub struct PayloadSize(pub u16);

impl PayloadSize {
    /// The size of the ICMP message carrying this payload.
    #[must_use]
    pub const fn icmp_size(self) -> usize {
        self.0 as usize + 8
    }
}
