use crate::config::{AddressMode, TraceConfig};
use crate::error::Result;
use crate::net::{Network, ProbeSession, SocketImpl};
use crate::probe::{ProbeOutcome, ProbeRequest};
use crate::types::TimeToLive;
use std::net::Ipv4Addr;
use tracing::instrument;

/// Resolve a hop address to a display name.
#[cfg_attr(test, mockall::automock)]
pub trait HopNamer {
    /// The name of `addr`, or `None` if it cannot be resolved.
    fn name(&self, addr: Ipv4Addr) -> Option<String>;
}

/// Traces the path to a target by sending probes with increasing TTL.
#[derive(Debug, Clone)]
pub struct Trace {
    config: TraceConfig,
}

/// The probes sent at a single TTL.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct HopResult {
    pub ttl: TimeToLive,
    /// One outcome per probe, in the order they were sent.
    pub outcomes: Vec<ProbeOutcome>,
    /// The first address which answered at this TTL.
    pub addr: Option<Ipv4Addr>,
    /// The resolved name of `addr`, only in [`AddressMode::Symbolic`].
    pub hostname: Option<String>,
}

impl HopResult {
    /// Did every probe at this TTL go unanswered?
    #[must_use]
    pub fn is_unresponsive(&self) -> bool {
        !self.outcomes.iter().any(ProbeOutcome::is_answered)
    }

    /// The number of probes at this TTL which went unanswered.
    #[must_use]
    pub fn unanswered_probes(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_answered()).count()
    }

    fn completion(&self) -> Option<CompletionReason> {
        if self
            .outcomes
            .iter()
            .any(|o| matches!(o, ProbeOutcome::Replied { .. }))
        {
            Some(CompletionReason::DestinationReached)
        } else if self
            .outcomes
            .iter()
            .any(|o| matches!(o, ProbeOutcome::Unreachable { .. }))
        {
            Some(CompletionReason::Unreachable)
        } else {
            None
        }
    }
}

/// Why a trace stopped.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CompletionReason {
    /// The target answered an echo request.
    DestinationReached,
    /// Every TTL up to the maximum was probed without reaching the target.
    MaxTtlExceeded,
    /// A host reported the target unreachable.
    Unreachable,
}

/// The hops of a completed trace.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TraceSummary {
    pub hops: Vec<HopResult>,
    pub completion: CompletionReason,
}

impl TraceSummary {
    /// The number of hops at which no probe was answered.
    #[must_use]
    pub fn unresponsive_hops(&self) -> usize {
        self.hops.iter().filter(|hop| hop.is_unresponsive()).count()
    }

    /// The number of unanswered probes at each hop, in TTL order.
    #[must_use]
    pub fn unanswered_probes(&self) -> Vec<(TimeToLive, usize)> {
        self.hops
            .iter()
            .map(|hop| (hop.ttl, hop.unanswered_probes()))
            .collect()
    }
}

impl Trace {
    pub(crate) const fn new(config: TraceConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &TraceConfig {
        &self.config
    }

    /// Open a raw socket to the target and run.
    pub fn run<R: HopNamer, F: FnMut(&HopResult)>(
        &self,
        namer: &R,
        handler: F,
    ) -> Result<TraceSummary> {
        let mut session = ProbeSession::<SocketImpl>::open(self.config.target_addr)?;
        self.run_with(&mut session, namer, handler)
    }

    /// Run over the given [`Network`], calling `handler` as each hop completes.
    #[instrument(skip_all, level = "debug", fields(target = %self.config.target_addr))]
    pub fn run_with<N: Network, R: HopNamer, F: FnMut(&HopResult)>(
        &self,
        network: &mut N,
        namer: &R,
        mut handler: F,
    ) -> Result<TraceSummary> {
        let mut hops = vec![];
        let mut sequence = self.config.initial_sequence;
        let mut ttl = self.config.first_ttl;
        loop {
            let mut outcomes = Vec::with_capacity(self.config.probes_per_hop);
            for _ in 0..self.config.probes_per_hop {
                let request = ProbeRequest {
                    identifier: self.config.identifier,
                    sequence,
                    ttl: Some(ttl),
                    payload_size: self.config.payload_size,
                    timeout: self.config.timeout,
                };
                outcomes.push(network.probe(request)?);
                sequence = sequence.offset(1);
            }
            let hop = self.hop_result(ttl, outcomes, namer);
            tracing::debug!(?hop);
            handler(&hop);
            let completion = hop.completion();
            hops.push(hop);
            if let Some(completion) = completion {
                return Ok(TraceSummary { hops, completion });
            }
            if ttl >= self.config.max_ttl {
                return Ok(TraceSummary {
                    hops,
                    completion: CompletionReason::MaxTtlExceeded,
                });
            }
            ttl += TimeToLive(1);
        }
    }

    fn hop_result<R: HopNamer>(
        &self,
        ttl: TimeToLive,
        outcomes: Vec<ProbeOutcome>,
        namer: &R,
    ) -> HopResult {
        let addr = outcomes.iter().find_map(ProbeOutcome::addr);
        let hostname = match (self.config.address_mode, addr) {
            (AddressMode::Symbolic, Some(addr)) => namer.name(addr),
            _ => None,
        };
        HopResult {
            ttl,
            outcomes,
            addr,
            hostname,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TraceBuilder;
    use crate::net::MockNetwork;
    use crate::probe::UnreachableReason;
    use crate::types::Sequence;
    use mockall::predicate;
    use std::time::Duration;

    const TARGET: Ipv4Addr = Ipv4Addr::new(93, 184, 216, 34);

    fn router(ttl: u8) -> Ipv4Addr {
        Ipv4Addr::new(10, 0, 0, ttl)
    }

    fn no_names() -> MockHopNamer {
        let mut namer = MockHopNamer::new();
        namer.expect_name().never();
        namer
    }

    #[test]
    fn test_destination_reached() -> anyhow::Result<()> {
        let trace = TraceBuilder::new(TARGET)
            .address_mode(AddressMode::Numeric)
            .build()?;
        let mut network = MockNetwork::new();
        network.expect_probe().times(4).returning(|req| {
            let ttl = req.ttl.map_or(0, |ttl| ttl.0);
            assert!(ttl <= 4, "probed past the destination at ttl {ttl}");
            let rtt = Duration::from_millis(u64::from(ttl));
            if ttl < 4 {
                Ok(ProbeOutcome::TtlExceeded {
                    addr: router(ttl),
                    rtt,
                })
            } else {
                Ok(ProbeOutcome::Replied {
                    rtt,
                    addr: TARGET,
                    ttl: 60,
                    bytes: 32,
                })
            }
        });
        let mut seen = vec![];
        let summary = trace.run_with(&mut network, &no_names(), |hop| seen.push(hop.ttl))?;
        assert_eq!(CompletionReason::DestinationReached, summary.completion);
        assert_eq!(4, summary.hops.len());
        assert_eq!(
            vec![TimeToLive(1), TimeToLive(2), TimeToLive(3), TimeToLive(4)],
            seen
        );
        assert_eq!(Some(router(2)), summary.hops[1].addr);
        assert_eq!(Some(TARGET), summary.hops[3].addr);
        assert_eq!(0, summary.unresponsive_hops());
        Ok(())
    }

    #[test]
    fn test_max_ttl_exceeded() -> anyhow::Result<()> {
        let trace = TraceBuilder::new(TARGET).build()?;
        let mut network = MockNetwork::new();
        network
            .expect_probe()
            .times(30)
            .returning(|_| Ok(ProbeOutcome::TimedOut));
        let summary = trace.run_with(&mut network, &no_names(), |_| {})?;
        assert_eq!(CompletionReason::MaxTtlExceeded, summary.completion);
        assert_eq!(30, summary.hops.len());
        assert_eq!(30, summary.unresponsive_hops());
        assert!(summary.hops.iter().all(|hop| hop.addr.is_none()));
        assert_eq!(Some(&(TimeToLive(30), 1)), summary.unanswered_probes().last());
        Ok(())
    }

    #[test]
    fn test_unreachable_is_terminal() -> anyhow::Result<()> {
        let trace = TraceBuilder::new(TARGET)
            .address_mode(AddressMode::Numeric)
            .build()?;
        let mut network = MockNetwork::new();
        network.expect_probe().times(2).returning(|req| match req.ttl {
            Some(TimeToLive(1)) => Ok(ProbeOutcome::TtlExceeded {
                addr: router(1),
                rtt: Duration::from_millis(1),
            }),
            _ => Ok(ProbeOutcome::Unreachable {
                addr: router(2),
                rtt: Duration::from_millis(2),
                reason: UnreachableReason::Network,
            }),
        });
        let summary = trace.run_with(&mut network, &no_names(), |_| {})?;
        assert_eq!(CompletionReason::Unreachable, summary.completion);
        assert_eq!(2, summary.hops.len());
        Ok(())
    }

    #[test]
    fn test_probes_per_hop() -> anyhow::Result<()> {
        let trace = TraceBuilder::new(TARGET)
            .probes_per_hop(3)
            .max_ttl(TimeToLive(2))
            .initial_sequence(Sequence(100))
            .address_mode(AddressMode::Numeric)
            .build()?;
        let mut network = MockNetwork::new();
        network.expect_probe().times(6).returning(|req| {
            if req.sequence.0 % 3 == 1 {
                Ok(ProbeOutcome::TtlExceeded {
                    addr: router(req.ttl.map_or(0, |ttl| ttl.0)),
                    rtt: Duration::from_millis(5),
                })
            } else {
                Ok(ProbeOutcome::TimedOut)
            }
        });
        let summary = trace.run_with(&mut network, &no_names(), |_| {})?;
        assert_eq!(CompletionReason::MaxTtlExceeded, summary.completion);
        assert_eq!(2, summary.hops.len());
        assert!(summary.hops.iter().all(|hop| hop.outcomes.len() == 3));
        // sequences 100..=105, so 100 and 103 are answered
        assert_eq!(Some(router(1)), summary.hops[0].addr);
        assert_eq!(Some(router(2)), summary.hops[1].addr);
        assert_eq!(
            vec![(TimeToLive(1), 2), (TimeToLive(2), 2)],
            summary.unanswered_probes()
        );
        assert_eq!(0, summary.unresponsive_hops());
        Ok(())
    }

    #[test]
    fn test_first_ttl() -> anyhow::Result<()> {
        let trace = TraceBuilder::new(TARGET)
            .first_ttl(TimeToLive(5))
            .max_ttl(TimeToLive(6))
            .build()?;
        let mut network = MockNetwork::new();
        network
            .expect_probe()
            .withf(|req| req.ttl == Some(TimeToLive(5)))
            .times(1)
            .returning(|_| Ok(ProbeOutcome::TimedOut));
        network
            .expect_probe()
            .withf(|req| req.ttl == Some(TimeToLive(6)))
            .times(1)
            .returning(|_| Ok(ProbeOutcome::TimedOut));
        let summary = trace.run_with(&mut network, &no_names(), |_| {})?;
        assert_eq!(2, summary.hops.len());
        assert_eq!(TimeToLive(5), summary.hops[0].ttl);
        Ok(())
    }

    #[test]
    fn test_symbolic_names_answered_hops() -> anyhow::Result<()> {
        let trace = TraceBuilder::new(TARGET).max_ttl(TimeToLive(2)).build()?;
        let mut network = MockNetwork::new();
        network.expect_probe().times(2).returning(|req| match req.ttl {
            Some(TimeToLive(1)) => Ok(ProbeOutcome::TtlExceeded {
                addr: router(1),
                rtt: Duration::from_millis(1),
            }),
            _ => Ok(ProbeOutcome::TimedOut),
        });
        let mut namer = MockHopNamer::new();
        namer
            .expect_name()
            .with(predicate::eq(router(1)))
            .times(1)
            .returning(|_| Some(String::from("gateway.lan")));
        let summary = trace.run_with(&mut network, &namer, |_| {})?;
        assert_eq!(Some("gateway.lan"), summary.hops[0].hostname.as_deref());
        assert_eq!(None, summary.hops[1].hostname);
        Ok(())
    }

    #[test]
    fn test_symbolic_name_failure_falls_back() -> anyhow::Result<()> {
        let trace = TraceBuilder::new(TARGET).build()?;
        let mut network = MockNetwork::new();
        network.expect_probe().times(1).returning(|_| {
            Ok(ProbeOutcome::Replied {
                rtt: Duration::from_millis(1),
                addr: TARGET,
                ttl: 60,
                bytes: 32,
            })
        });
        let mut namer = MockHopNamer::new();
        namer.expect_name().times(1).returning(|_| None);
        let summary = trace.run_with(&mut network, &namer, |_| {})?;
        assert_eq!(Some(TARGET), summary.hops[0].addr);
        assert_eq!(None, summary.hops[0].hostname);
        Ok(())
    }
}
