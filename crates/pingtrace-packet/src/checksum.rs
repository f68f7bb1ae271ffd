//! The Internet checksum (RFC 1071) as used by `IPv4` headers and `ICMPv4` messages.
//!
//! The checksum is the one's complement of the one's-complement sum of all
//! big-endian 16-bit words. A trailing odd byte is treated as the high byte of
//! a final word padded with zero.

/// The index of the checksum word within an `IPv4` header.
const IPV4_HEADER_CHECKSUM_WORD: usize = 5;

/// The index of the checksum word within an `ICMPv4` message.
const ICMP_CHECKSUM_WORD: usize = 1;

/// Calculate the checksum for an `Ipv4` header.
///
/// The checksum word itself is skipped, which is equivalent to computing the
/// checksum with that field zeroed.
#[must_use]
pub fn ipv4_header_checksum(data: &[u8]) -> u16 {
    checksum(data, Some(IPV4_HEADER_CHECKSUM_WORD))
}

/// Calculate the checksum for an `Ipv4` `ICMP` message.
///
/// The checksum word itself is skipped, which is equivalent to computing the
/// checksum with that field zeroed.
#[must_use]
pub fn icmp_ipv4_checksum(data: &[u8]) -> u16 {
    checksum(data, Some(ICMP_CHECKSUM_WORD))
}

/// Verify the checksum of a received `Ipv4` `ICMP` message.
///
/// All words are summed, including the transmitted checksum, and the message
/// is valid iff the complement of that sum is zero.
#[must_use]
pub fn verify_icmp_ipv4_checksum(data: &[u8]) -> bool {
    checksum(data, None) == 0
}

fn checksum(data: &[u8], ignore_word: Option<usize>) -> u16 {
    if data.is_empty() {
        return 0;
    }
    finalize_checksum(sum_be_words(data, ignore_word))
}

fn sum_be_words(data: &[u8], ignore_word: Option<usize>) -> u32 {
    let words = data.chunks_exact(2);
    let trailing = words.remainder().first().copied();
    let sum = words
        .enumerate()
        .filter(|(i, _)| Some(*i) != ignore_word)
        .map(|(_, word)| u32::from(u16::from_be_bytes([word[0], word[1]])))
        .fold(0_u32, u32::wrapping_add);
    match trailing {
        Some(byte) if Some(data.len() / 2) != ignore_word => {
            sum.wrapping_add(u32::from(byte) << 8)
        }
        _ => sum,
    }
}

const fn finalize_checksum(mut sum: u32) -> u16 {
    while sum >> 16 != 0 {
        sum = (sum >> 16) + (sum & 0xFFFF);
    }
    !sum as u16
}
