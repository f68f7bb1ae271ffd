/// The hard ceiling on the time-to-live of a traceroute probe.
pub const MAX_TTL: u8 = 30;

/// The largest echo payload which fits in a single IPv4 datagram.
///
/// 65535 less a 20 byte IPv4 header and an 8 byte ICMP header.
pub const MAX_PAYLOAD_SIZE: u16 = 65507;

/// The size of the buffer used to read datagrams from the socket.
pub const MAX_DATAGRAM_SIZE: usize = 65535;
