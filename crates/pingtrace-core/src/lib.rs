//! Pingtrace - ICMP echo probing for ping and traceroute.
//!
//! This crate sends `ICMPv4` echo requests over a raw socket and classifies
//! the responses. It provides the probing facility used by the standalone
//! `pingtrace` application.
//!
//! Both controllers send one probe at a time and wait for its outcome before
//! sending the next, a probe is never retried.
//!
//! # Example
//!
//! The following example pings a target five times and prints each outcome:
//!
//! ```no_run
//! # fn main() -> anyhow::Result<()> {
//! # use std::net::Ipv4Addr;
//! # use std::str::FromStr;
//! use pingtrace_core::PingBuilder;
//!
//! let addr = Ipv4Addr::from_str("1.1.1.1")?;
//! let stats = PingBuilder::new(addr)
//!     .count(5)
//!     .build()?
//!     .run(|report| println!("{:?}", report.outcome))?;
//! println!("{} of {} received", stats.received, stats.sent);
//! # Ok(())
//! # }
//! ```
//!
//! The following example traces the path to a target without resolving hop
//! names:
//!
//! ```no_run
//! # fn main() -> anyhow::Result<()> {
//! # use std::net::Ipv4Addr;
//! # use std::str::FromStr;
//! use pingtrace_core::{AddressMode, HopNamer, TraceBuilder};
//!
//! struct Numeric;
//!
//! impl HopNamer for Numeric {
//!     fn name(&self, _addr: Ipv4Addr) -> Option<String> {
//!         None
//!     }
//! }
//!
//! let addr = Ipv4Addr::from_str("1.1.1.1")?;
//! TraceBuilder::new(addr)
//!     .address_mode(AddressMode::Numeric)
//!     .build()?
//!     .run(&Numeric, |hop| println!("{} {:?}", hop.ttl, hop.addr))?;
//! # Ok(())
//! # }
//! ```
//!
//! # See Also
//!
//! - [`PingBuilder`] - Build a [`Ping`].
//! - [`TraceBuilder`] - Build a [`Trace`].
//! - [`ProbeSession`] - Send a single probe and wait for its outcome.
#![warn(clippy::all, clippy::pedantic, clippy::nursery, rust_2018_idioms)]
#![allow(
    clippy::module_name_repetitions,
    clippy::option_if_let_else,
    clippy::missing_const_for_fn,
    clippy::cast_possible_truncation,
    clippy::missing_errors_doc,
    clippy::cast_precision_loss
)]
#![deny(unsafe_code)]

mod builder;
mod config;
mod constants;
mod error;
mod net;
mod ping;
mod probe;
mod trace;
mod types;

pub use builder::{PingBuilder, TraceBuilder};
pub use config::{defaults, AddressMode, PingConfig, TraceConfig};
pub use constants::{MAX_PAYLOAD_SIZE, MAX_TTL};
pub use error::{Error, ErrorKind, IoError, IoOperation, IoResult, Result};
pub use net::{Network, ProbeSession, Socket, SocketImpl};
pub use ping::{Ping, PingReport, PingStatistics};
pub use probe::{ProbeOutcome, ProbeRequest, UnreachableReason};
pub use trace::{CompletionReason, HopNamer, HopResult, Trace, TraceSummary};
pub use types::{PayloadSize, Sequence, TimeToLive, TraceId};
