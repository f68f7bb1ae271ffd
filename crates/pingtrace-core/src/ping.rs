use crate::config::PingConfig;
use crate::error::Result;
use crate::net::{Network, ProbeSession, SocketImpl};
use crate::probe::{ProbeOutcome, ProbeRequest};
use crate::types::Sequence;
use std::thread;
use std::time::{Duration, Instant};
use tracing::instrument;

/// Sends a fixed number of echo requests to a target, one at a time.
#[derive(Debug, Clone)]
pub struct Ping {
    config: PingConfig,
}

/// The result of a single ping probe, reported as soon as it completes.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PingReport {
    /// Zero based position of the probe in the run.
    pub index: usize,
    pub sequence: Sequence,
    pub outcome: ProbeOutcome,
}

impl Ping {
    pub(crate) const fn new(config: PingConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &PingConfig {
        &self.config
    }

    /// Open a raw socket to the target and run.
    pub fn run<F: FnMut(&PingReport)>(&self, handler: F) -> Result<PingStatistics> {
        let mut session = ProbeSession::<SocketImpl>::open(self.config.target_addr)?;
        self.run_with(&mut session, handler)
    }

    /// Run over the given [`Network`], calling `handler` after every probe.
    ///
    /// Consecutive probes start at least `interval` apart. No pause follows
    /// the final probe.
    #[instrument(skip_all, level = "debug", fields(target = %self.config.target_addr))]
    pub fn run_with<N: Network, F: FnMut(&PingReport)>(
        &self,
        network: &mut N,
        mut handler: F,
    ) -> Result<PingStatistics> {
        let mut stats = PingStatistics::default();
        for index in 0..self.config.count {
            let started = Instant::now();
            let request = ProbeRequest {
                identifier: self.config.identifier,
                sequence: self.config.initial_sequence.offset(index),
                ttl: self.config.ttl,
                payload_size: self.config.payload_size,
                timeout: self.config.timeout,
            };
            let outcome = network.probe(request)?;
            stats.update(&outcome);
            handler(&PingReport {
                index,
                sequence: request.sequence,
                outcome,
            });
            if index + 1 < self.config.count {
                if let Some(pause) = self.config.interval.checked_sub(started.elapsed()) {
                    thread::sleep(pause);
                }
            }
        }
        tracing::debug!(?stats);
        Ok(stats)
    }
}

/// Aggregate statistics of a ping run.
///
/// Only [`ProbeOutcome::Replied`] counts as received, a router reporting an
/// expired TTL or an unreachable target is a lost probe.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct PingStatistics {
    pub sent: usize,
    pub received: usize,
    pub min: Option<Duration>,
    pub max: Option<Duration>,
    total: Duration,
}

impl PingStatistics {
    fn update(&mut self, outcome: &ProbeOutcome) {
        self.sent += 1;
        if let ProbeOutcome::Replied { rtt, .. } = outcome {
            self.received += 1;
            self.total += *rtt;
            self.min = Some(self.min.map_or(*rtt, |min| min.min(*rtt)));
            self.max = Some(self.max.map_or(*rtt, |max| max.max(*rtt)));
        }
    }

    /// The mean round trip time of received replies.
    #[must_use]
    pub fn avg(&self) -> Option<Duration> {
        u32::try_from(self.received)
            .ok()
            .filter(|received| *received > 0)
            .map(|received| self.total / received)
    }

    /// The number of probes which received no reply.
    #[must_use]
    pub const fn lost(&self) -> usize {
        self.sent - self.received
    }

    /// The percentage of probes which received no reply.
    #[must_use]
    pub fn loss_percent(&self) -> f64 {
        if self.sent == 0 {
            0_f64
        } else {
            self.lost() as f64 * 100_f64 / self.sent as f64
        }
    }
}
