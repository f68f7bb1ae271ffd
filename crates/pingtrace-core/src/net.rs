use crate::error::Result;
use crate::probe::{ProbeOutcome, ProbeRequest};

/// Platform specific network code.
mod platform;

/// A network socket.
mod socket;

/// Send a probe and wait for its response.
mod session;

pub use session::ProbeSession;
pub use socket::Socket;

/// The platform specific socket type.
pub use platform::SocketImpl;

/// An abstraction over the network for sending probes.
///
/// Each call sends exactly one echo request and blocks until an outcome is
/// known, which is never later than `request.timeout` after sending.
#[cfg_attr(test, mockall::automock)]
pub trait Network {
    /// Send a probe and wait for the outcome.
    fn probe(&mut self, request: ProbeRequest) -> Result<ProbeOutcome>;
}
