use crate::constants::MAX_DATAGRAM_SIZE;
use crate::error::{Error, ErrorKind, IoError, Result};
use crate::net::socket::Socket;
use crate::net::Network;
use crate::probe::{ProbeOutcome, ProbeRequest, UnreachableReason};
use crate::types::TimeToLive;
use pingtrace_packet::codec::{decode_ipv4, encode_echo_request, Datagram};
use pingtrace_packet::error::DecodeError;
use pingtrace_packet::icmpv4::{IcmpDestinationUnreachableCode, IcmpType};
use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::{Duration, Instant};
use tracing::instrument;

/// Sends echo requests to a single destination over one owned socket.
///
/// The socket is opened when the session is created and closed when it is
/// dropped. Only one probe is ever in flight: [`ProbeSession::send_and_wait`]
/// does not return until the probe it sent is answered or its deadline passes.
pub struct ProbeSession<S: Socket> {
    socket: S,
    destination: Ipv4Addr,
    ttl: Option<TimeToLive>,
    buf: Vec<u8>,
}

impl<S: Socket> ProbeSession<S> {
    /// Open a raw ICMP socket for probing `destination`.
    ///
    /// Fails with [`Error::InsufficientPrivileges`] if the OS refuses to create
    /// a raw socket.
    #[instrument(level = "trace")]
    pub fn open(destination: Ipv4Addr) -> Result<Self> {
        match S::new_icmp_socket_ipv4() {
            Ok(socket) => Ok(Self::new(socket, destination)),
            Err(err) if err.kind() == ErrorKind::Std(io::ErrorKind::PermissionDenied) => {
                Err(Error::InsufficientPrivileges)
            }
            Err(err) => Err(Error::IoError(err)),
        }
    }

    /// Create a session over an already open socket.
    pub fn new(socket: S, destination: Ipv4Addr) -> Self {
        Self {
            socket,
            destination,
            ttl: None,
            buf: vec![0_u8; MAX_DATAGRAM_SIZE],
        }
    }

    /// Send an echo request and wait for the response which correlates with it.
    ///
    /// Datagrams which fail checksum verification, cannot be decoded or carry a
    /// different identifier or sequence number are discarded and the wait
    /// continues against the original deadline of `request.timeout` after the
    /// send.
    #[instrument(skip(self), level = "debug")]
    pub fn send_and_wait(&mut self, request: &ProbeRequest) -> Result<ProbeOutcome> {
        if let Some(ttl) = request.ttl {
            if self.ttl != Some(ttl) {
                self.socket.set_ttl(u32::from(ttl.0))?;
                self.ttl = Some(ttl);
            }
        }
        let echo_request = encode_echo_request(
            request.identifier.0,
            request.sequence.0,
            &request.payload(),
        )?;
        let addr = SocketAddr::new(IpAddr::V4(self.destination), 0);
        let sent = Instant::now();
        let deadline = sent.checked_add(request.timeout).ok_or_else(|| {
            Error::BadConfig(format!("timeout {:?} is too large", request.timeout))
        })?;
        match self.socket.send_to(&echo_request, addr) {
            Ok(()) => {}
            Err(err) if is_unreachable(&err) => {
                tracing::warn!(%err, "probe could not be sent");
                return Ok(ProbeOutcome::TimedOut);
            }
            Err(err) => return Err(Error::IoError(err)),
        }
        let mut invalid_checksums = 0_usize;
        while let Some(remaining) = remaining_until(deadline) {
            if !self.socket.is_readable(remaining)? {
                continue;
            }
            let bytes_read = match self.socket.recv_from(&mut self.buf) {
                Ok((bytes_read, _)) => bytes_read,
                Err(err) if is_transient(&err) => continue,
                Err(err) => return Err(Error::IoError(err)),
            };
            let received = Instant::now();
            match decode_ipv4(&self.buf[..bytes_read]) {
                Ok(datagram) => {
                    if let Some(outcome) = correlate(request, datagram, received - sent) {
                        tracing::debug!(?outcome);
                        return Ok(outcome);
                    }
                }
                Err(DecodeError::ChecksumInvalid) => {
                    tracing::warn!(bytes_read, "discarding datagram with invalid checksum");
                    invalid_checksums += 1;
                }
                Err(err) => tracing::trace!(%err, "discarding datagram"),
            }
        }
        if invalid_checksums > 0 {
            Ok(ProbeOutcome::ChecksumInvalid)
        } else {
            Ok(ProbeOutcome::TimedOut)
        }
    }
}

impl<S: Socket> Network for ProbeSession<S> {
    fn probe(&mut self, request: ProbeRequest) -> Result<ProbeOutcome> {
        self.send_and_wait(&request)
    }
}

/// The time left before `deadline`, or `None` if it has passed.
fn remaining_until(deadline: Instant) -> Option<Duration> {
    deadline
        .checked_duration_since(Instant::now())
        .filter(|remaining| !remaining.is_zero())
}

fn is_transient(err: &IoError) -> bool {
    matches!(
        err.kind(),
        ErrorKind::Std(io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted)
    )
}

/// The local host has no route to the destination.
fn is_unreachable(err: &IoError) -> bool {
    matches!(
        err.kind(),
        ErrorKind::HostUnreachable | ErrorKind::NetUnreachable
    )
}

/// Match a received datagram against the request, returning `None` for strays.
fn correlate(request: &ProbeRequest, datagram: Datagram, rtt: Duration) -> Option<ProbeOutcome> {
    let message = datagram.message;
    if !message.correlates(request.identifier.0, request.sequence.0) {
        tracing::trace!(
            identifier = message.identifier,
            sequence = message.sequence,
            "discarding stray response"
        );
        return None;
    }
    let addr = datagram.source;
    match message.icmp_type {
        IcmpType::EchoReply => Some(ProbeOutcome::Replied {
            rtt,
            addr,
            ttl: datagram.ttl,
            bytes: message.payload.len(),
        }),
        IcmpType::TimeExceeded => Some(ProbeOutcome::TtlExceeded { addr, rtt }),
        IcmpType::DestinationUnreachable => Some(ProbeOutcome::Unreachable {
            addr,
            rtt,
            reason: UnreachableReason::from(IcmpDestinationUnreachableCode::from(
                message.icmp_code,
            )),
        }),
        // our own request looped back, seen when probing a local address
        IcmpType::EchoRequest | IcmpType::Other(_) => None,
    }
}
