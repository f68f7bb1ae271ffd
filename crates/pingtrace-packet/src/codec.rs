//! Encoding of `ICMPv4` echo requests and decoding of the messages sent in response.
//!
//! Every message which can answer an echo request carries the identifier and
//! sequence number of that request: an `EchoReply` echoes them directly while
//! `TimeExceeded` and `DestinationUnreachable` quote the IPv4 header and first
//! 8 bytes of the request which triggered them.

use crate::checksum::{icmp_ipv4_checksum, verify_icmp_ipv4_checksum};
use crate::error::{DecodeError, DecodeResult, Result};
use crate::icmpv4::destination_unreachable::DestinationUnreachablePacket;
use crate::icmpv4::echo_reply::EchoReplyPacket;
use crate::icmpv4::echo_request::EchoRequestPacket;
use crate::icmpv4::time_exceeded::TimeExceededPacket;
use crate::icmpv4::{IcmpCode, IcmpPacket, IcmpType};
use crate::ipv4::Ipv4Packet;
use crate::IpProtocol;
use std::net::Ipv4Addr;

/// A decoded `ICMPv4` message.
///
/// For `EchoRequest` and `EchoReply` the `identifier`, `sequence` and
/// `payload` are those of the message itself. For `TimeExceeded` and
/// `DestinationUnreachable` the `identifier` and `sequence` are recovered
/// from the quoted echo request and `payload` holds the quoted datagram.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct IcmpMessage {
    pub icmp_type: IcmpType,
    pub icmp_code: IcmpCode,
    pub checksum: u16,
    pub identifier: u16,
    pub sequence: u16,
    pub payload: Vec<u8>,
}

impl IcmpMessage {
    /// Does this message correlate with the echo request `identifier` and `sequence`?
    #[must_use]
    pub const fn correlates(&self, identifier: u16, sequence: u16) -> bool {
        self.identifier == identifier && self.sequence == sequence
    }
}

/// An `ICMPv4` message received inside an IPv4 datagram.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Datagram {
    /// The address of the host which sent the datagram.
    pub source: Ipv4Addr,
    /// The remaining TTL of the datagram as received.
    pub ttl: u8,
    pub message: IcmpMessage,
}

/// Build an `ICMPv4` `EchoRequest` message with a valid checksum.
pub fn encode_echo_request(identifier: u16, sequence: u16, payload: &[u8]) -> Result<Vec<u8>> {
    let mut buf = vec![0_u8; EchoRequestPacket::minimum_packet_size() + payload.len()];
    let mut packet = EchoRequestPacket::new(&mut buf)?;
    packet.set_icmp_type(IcmpType::EchoRequest);
    packet.set_icmp_code(IcmpCode(0));
    packet.set_identifier(identifier);
    packet.set_sequence(sequence);
    packet.set_payload(payload);
    packet.set_checksum(icmp_ipv4_checksum(packet.packet()));
    Ok(buf)
}

/// Decode an `ICMPv4` message.
///
/// The checksum is verified before anything beyond the fixed header is
/// inspected; a message which fails verification is reported as
/// [`DecodeError::ChecksumInvalid`].
pub fn decode(bytes: &[u8]) -> DecodeResult<IcmpMessage> {
    let header = IcmpPacket::new_view(bytes)?;
    if !verify_icmp_ipv4_checksum(bytes) {
        return Err(DecodeError::ChecksumInvalid);
    }
    let icmp_type = header.get_icmp_type();
    let icmp_code = header.get_icmp_code();
    let checksum = header.get_checksum();
    match icmp_type {
        IcmpType::EchoReply => {
            let packet = EchoReplyPacket::new_view(bytes)?;
            Ok(IcmpMessage {
                icmp_type,
                icmp_code,
                checksum,
                identifier: packet.get_identifier(),
                sequence: packet.get_sequence(),
                payload: packet.payload().to_vec(),
            })
        }
        IcmpType::EchoRequest => {
            let packet = EchoRequestPacket::new_view(bytes)?;
            Ok(IcmpMessage {
                icmp_type,
                icmp_code,
                checksum,
                identifier: packet.get_identifier(),
                sequence: packet.get_sequence(),
                payload: packet.payload().to_vec(),
            })
        }
        IcmpType::TimeExceeded => {
            let packet = TimeExceededPacket::new_view(bytes)?;
            quoted_message(icmp_type, icmp_code, checksum, packet.payload())
        }
        IcmpType::DestinationUnreachable => {
            let packet = DestinationUnreachablePacket::new_view(bytes)?;
            quoted_message(icmp_type, icmp_code, checksum, packet.payload())
        }
        IcmpType::Other(id) => Err(DecodeError::Unsupported(id)),
    }
}

/// Decode an `ICMPv4` message from a complete IPv4 datagram as read from a raw socket.
pub fn decode_ipv4(datagram: &[u8]) -> DecodeResult<Datagram> {
    let ipv4 = Ipv4Packet::new_view(datagram)?;
    match ipv4.get_protocol() {
        IpProtocol::Icmp => Ok(Datagram {
            source: ipv4.get_source(),
            ttl: ipv4.get_ttl(),
            message: decode(ipv4.payload())?,
        }),
        other => Err(DecodeError::NotIcmp(other.id())),
    }
}

fn quoted_message(
    icmp_type: IcmpType,
    icmp_code: IcmpCode,
    checksum: u16,
    quoted: &[u8],
) -> DecodeResult<IcmpMessage> {
    let ipv4 = Ipv4Packet::new_view(quoted)?;
    if ipv4.get_protocol() != IpProtocol::Icmp {
        return Err(DecodeError::NotEchoRelated(icmp_type));
    }
    let echo_request = EchoRequestPacket::new_view(ipv4.payload())?;
    if echo_request.get_icmp_type() != IcmpType::EchoRequest {
        return Err(DecodeError::NotEchoRelated(icmp_type));
    }
    Ok(IcmpMessage {
        icmp_type,
        icmp_code,
        checksum,
        identifier: echo_request.get_identifier(),
        sequence: echo_request.get_sequence(),
        payload: quoted.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use hex_literal::hex;
    use test_case::test_case;

    const ECHO_REPLY_IPV4: [u8; 28] = hex!(
        "45 20 00 54 00 00 00 00 3b 01 50 02 8e fb de ce
         c0 a8 01 15 00 00 09 0f 75 d7 81 19"
    );

    const TIME_EXCEEDED_IPV4: [u8; 56] = hex!(
        "45 20 00 70 07 d7 00 00 3b 01 e9 5d 8e fa 3d 81
         c0 a8 01 15 0b 00 f4 ff 00 00 00 00 45 60 00 54
         65 b0 40 00 01 01 e4 11 c0 a8 01 15 8e fb de ce
         08 00 01 11 75 d7 81 17"
    );

    const DEST_UNREACHABLE_IPV4: [u8; 56] = hex!(
        "45 20 00 38 00 00 40 00 70 01 33 ea 14 00 00 fe
         c0 a8 01 15 03 01 fc fe 00 00 00 00 45 00 00 54
         00 00 40 00 80 01 23 ee c0 a8 01 15 14 00 00 fe
         08 00 fb d9 7b 01 81 24"
    );

    fn with_zero_padding<const N: usize>(prefix: &[u8]) -> [u8; N] {
        let mut buf = [0_u8; N];
        buf[..prefix.len()].copy_from_slice(prefix);
        buf
    }

    #[test]
    fn test_encode_echo_request() -> anyhow::Result<()> {
        assert_eq!(
            &hex!("08 00 f3 23 04 d2 00 0a"),
            encode_echo_request(1234, 10, &[])?.as_slice()
        );
        assert_eq!(
            &hex!("08 00 70 93 04 d2 82 9a"),
            encode_echo_request(1234, 33434, &[])?.as_slice()
        );
        Ok(())
    }

    #[test]
    fn test_encode_with_payload() -> anyhow::Result<()> {
        let bytes = encode_echo_request(1, 2, &[0xDE, 0xAD, 0xBE])?;
        assert_eq!(11, bytes.len());
        assert_eq!(&[0xDE, 0xAD, 0xBE], &bytes[8..]);
        assert!(verify_icmp_ipv4_checksum(&bytes));
        Ok(())
    }

    #[test_case(&[]; "empty payload")]
    #[test_case(&[0x01]; "single byte")]
    #[test_case(&[0xFF; 57]; "odd length")]
    #[test_case(&(0..=255).collect::<Vec<u8>>(); "incrementing")]
    fn test_decode_encoded(payload: &[u8]) -> anyhow::Result<()> {
        let message = decode(&encode_echo_request(0xBEEF, 65535, payload)?)?;
        assert_eq!(IcmpType::EchoRequest, message.icmp_type);
        assert_eq!(IcmpCode(0), message.icmp_code);
        assert_eq!(0xBEEF, message.identifier);
        assert_eq!(65535, message.sequence);
        assert_eq!(payload, message.payload.as_slice());
        Ok(())
    }

    #[test]
    fn test_single_bit_flip_is_checksum_invalid() -> anyhow::Result<()> {
        let bytes = encode_echo_request(0x1234, 7, b"pingtrace")?;
        for byte in (0..bytes.len()).filter(|i| !(2..4).contains(i)) {
            for bit in 0..8 {
                let mut corrupted = bytes.clone();
                corrupted[byte] ^= 1 << bit;
                assert_eq!(
                    Err(DecodeError::ChecksumInvalid),
                    decode(&corrupted),
                    "byte {byte} bit {bit}"
                );
            }
        }
        Ok(())
    }

    #[test]
    fn test_decode_echo_reply() -> anyhow::Result<()> {
        let buf = with_zero_padding::<84>(&ECHO_REPLY_IPV4);
        let datagram = decode_ipv4(&buf)?;
        assert_eq!(Ipv4Addr::new(142, 251, 222, 206), datagram.source);
        assert_eq!(59, datagram.ttl);
        let message = datagram.message;
        assert_eq!(IcmpType::EchoReply, message.icmp_type);
        assert_eq!(0x090f, message.checksum);
        assert_eq!(30167, message.identifier);
        assert_eq!(33049, message.sequence);
        assert_eq!(vec![0_u8; 56], message.payload);
        assert!(message.correlates(30167, 33049));
        assert!(!message.correlates(30167, 33050));
        Ok(())
    }

    #[test]
    fn test_decode_time_exceeded() -> anyhow::Result<()> {
        let buf = with_zero_padding::<112>(&TIME_EXCEEDED_IPV4);
        let datagram = decode_ipv4(&buf)?;
        assert_eq!(Ipv4Addr::new(142, 250, 61, 129), datagram.source);
        let message = datagram.message;
        assert_eq!(IcmpType::TimeExceeded, message.icmp_type);
        assert_eq!(IcmpCode(0), message.icmp_code);
        assert_eq!(30167, message.identifier);
        assert_eq!(33047, message.sequence);
        assert_eq!(84, message.payload.len());
        Ok(())
    }

    #[test]
    fn test_decode_destination_unreachable() -> anyhow::Result<()> {
        let datagram = decode_ipv4(&DEST_UNREACHABLE_IPV4)?;
        assert_eq!(Ipv4Addr::new(20, 0, 0, 254), datagram.source);
        let message = datagram.message;
        assert_eq!(IcmpType::DestinationUnreachable, message.icmp_type);
        assert_eq!(IcmpCode(1), message.icmp_code);
        assert_eq!(31489, message.identifier);
        assert_eq!(33060, message.sequence);
        Ok(())
    }

    #[test]
    fn test_decode_corrupted_echo_reply_is_checksum_invalid() {
        let mut buf = with_zero_padding::<84>(&ECHO_REPLY_IPV4);
        buf[60] = 0xFF;
        assert_eq!(Err(DecodeError::ChecksumInvalid), decode_ipv4(&buf));
    }

    #[test]
    fn test_decode_short_message() {
        assert_eq!(
            Err(DecodeError::Packet(Error::InsufficientPacketBuffer(
                String::from("IcmpPacket"),
                8,
                4
            ))),
            decode(&hex!("00 00 ff ff"))
        );
    }

    #[test]
    fn test_decode_unsupported_type() -> anyhow::Result<()> {
        let mut bytes = [0_u8; 8];
        let mut packet = IcmpPacket::new(&mut bytes)?;
        packet.set_icmp_type(IcmpType::Other(13));
        packet.set_checksum(icmp_ipv4_checksum(packet.packet()));
        assert_eq!(Err(DecodeError::Unsupported(13)), decode(&bytes));
        Ok(())
    }

    #[test]
    fn test_decode_time_exceeded_quoting_udp() -> anyhow::Result<()> {
        let mut bytes = [0_u8; 36];
        let mut packet = TimeExceededPacket::new(&mut bytes)?;
        packet.set_icmp_type(IcmpType::TimeExceeded);
        let mut quoted = [0_u8; 28];
        let mut ipv4 = Ipv4Packet::new(&mut quoted)?;
        ipv4.set_version(4);
        ipv4.set_header_length(5);
        ipv4.set_protocol(IpProtocol::Udp);
        packet.set_payload(&quoted);
        packet.set_checksum(icmp_ipv4_checksum(packet.packet()));
        assert_eq!(
            Err(DecodeError::NotEchoRelated(IcmpType::TimeExceeded)),
            decode(&bytes)
        );
        Ok(())
    }

    #[test]
    fn test_decode_ipv4_not_icmp() {
        let mut buf = with_zero_padding::<84>(&ECHO_REPLY_IPV4);
        buf[9] = IpProtocol::Udp.id();
        assert_eq!(Err(DecodeError::NotIcmp(17)), decode_ipv4(&buf));
    }
}
