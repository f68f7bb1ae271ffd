//! `ICMPv4` wire format parsing and building.
//!
//! The following packet are supported:
//! - `ICMPv4` (`EchoRequest`, `EchoReply`, `TimeExceeded`, `DestinationUnreachable`)
//! - `IPv4`
//!
//! The [`codec`] module builds on these to encode echo requests and to decode
//! the messages sent in response to them.
//!
//! # Endianness
//!
//! The internal representation is held in network byte order (big-endian) and
//! all accessor methods take and return data in host byte order, converting as
//! necessary for the given architecture.
//!
//! # Example
//!
//! The following example builds an `ICMPv4` echo request packet:
//!
//! ```rust
//! # fn main() -> anyhow::Result<()> {
//! use pingtrace_packet::checksum::icmp_ipv4_checksum;
//! use pingtrace_packet::icmpv4::echo_request::EchoRequestPacket;
//! use pingtrace_packet::icmpv4::{IcmpCode, IcmpPacket, IcmpType};
//!
//! let mut buf = [0; IcmpPacket::minimum_packet_size()];
//! let mut icmp = EchoRequestPacket::new(&mut buf)?;
//! icmp.set_icmp_type(IcmpType::EchoRequest);
//! icmp.set_icmp_code(IcmpCode(0));
//! icmp.set_identifier(1234);
//! icmp.set_sequence(10);
//! icmp.set_checksum(icmp_ipv4_checksum(icmp.packet()));
//! assert_eq!(icmp.packet(), &hex_literal::hex!("08 00 f3 23 04 d2 00 0a"));
//! # Ok(())
//! # }
//! ```
//!
//! The following example encodes an echo request and decodes it again:
//!
//! ```rust
//! # fn main() -> anyhow::Result<()> {
//! use pingtrace_packet::codec::{decode, encode_echo_request};
//! use pingtrace_packet::icmpv4::IcmpType;
//!
//! let bytes = encode_echo_request(1234, 10, b"payload")?;
//! let message = decode(&bytes)?;
//! assert_eq!(IcmpType::EchoRequest, message.icmp_type);
//! assert!(message.correlates(1234, 10));
//! assert_eq!(b"payload", message.payload.as_slice());
//! # Ok(())
//! # }
//! ```
#![forbid(unsafe_code)]

mod buffer;

/// Packet errors.
pub mod error;

/// Functions for calculating network checksums.
pub mod checksum;

/// `ICMPv4` packets.
pub mod icmpv4;

/// `IPv4` packets.
pub mod ipv4;

/// Echo request encoding and response decoding.
pub mod codec;

/// The IP packet next layer protocol.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum IpProtocol {
    Icmp,
    Udp,
    Tcp,
    Other(u8),
}

impl IpProtocol {
    #[must_use]
    pub const fn id(self) -> u8 {
        match self {
            Self::Icmp => 1,
            Self::Udp => 17,
            Self::Tcp => 6,
            Self::Other(id) => id,
        }
    }
}

impl From<u8> for IpProtocol {
    fn from(id: u8) -> Self {
        match id {
            1 => Self::Icmp,
            17 => Self::Udp,
            6 => Self::Tcp,
            p => Self::Other(p),
        }
    }
}

/// Format a payload as a hexadecimal string.
#[must_use]
pub fn fmt_payload(bytes: &[u8]) -> String {
    use itertools::Itertools as _;
    format!("{:02x}", bytes.iter().format(" "))
}
