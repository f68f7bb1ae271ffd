use crate::icmpv4::IcmpType;
use thiserror::Error;

/// A packet error result.
pub type Result<T> = std::result::Result<T, Error>;

/// A packet error.
#[derive(Error, Debug, Eq, PartialEq)]
pub enum Error {
    /// Attempting to create a packet with an insufficient buffer size.
    #[error("insufficient buffer for {0} packet, minimum={1}, provided={2}")]
    InsufficientPacketBuffer(String, usize, usize),
}

/// The result of decoding a received message.
pub type DecodeResult<T> = std::result::Result<T, DecodeError>;

/// The reasons a received ICMP message cannot be used to correlate a probe.
#[derive(Error, Debug, Eq, PartialEq)]
pub enum DecodeError {
    /// The one's-complement sum over the received message was not zero.
    #[error("ICMP checksum invalid")]
    ChecksumInvalid,
    /// An error message which does not quote an ICMP Echo Request.
    #[error("ICMP {0:?} message does not quote an echo request")]
    NotEchoRelated(IcmpType),
    /// An ICMP message type which carries no probe correlation data.
    #[error("unsupported ICMP message type {0}")]
    Unsupported(u8),
    /// The received IP datagram did not carry ICMP.
    #[error("IPv4 datagram carries protocol {0}, not ICMP")]
    NotIcmp(u8),
    /// The message or the datagram it quotes was truncated.
    #[error("malformed message: {0}")]
    Packet(#[from] Error),
}
