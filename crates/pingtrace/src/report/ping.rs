use crate::report::{describe_unreachable, millis};
use pingtrace_core::{Ping, PingReport, PingStatistics, ProbeOutcome};
use std::net::Ipv4Addr;
use tracing::instrument;

/// Run a ping, printing each outcome as it arrives followed by the statistics.
#[instrument(skip_all, level = "trace")]
pub fn report(ping: &Ping, host: &str) -> anyhow::Result<PingStatistics> {
    let config = ping.config();
    println!(
        "{}",
        banner(host, config.target_addr, usize::from(config.payload_size.0))
    );
    let stats = ping.run(|report| println!("{}", probe_line(report)))?;
    println!("{}", summary(host, &stats));
    Ok(stats)
}

fn banner(host: &str, addr: Ipv4Addr, data_bytes: usize) -> String {
    format!("PING {host} ({addr}): {data_bytes} data bytes")
}

fn probe_line(report: &PingReport) -> String {
    let seq = report.sequence;
    match &report.outcome {
        ProbeOutcome::Replied {
            rtt,
            addr,
            ttl,
            bytes,
        } => format!(
            "{bytes} bytes from {addr}: icmp_seq={seq} ttl={ttl} time={} ms",
            millis(*rtt)
        ),
        ProbeOutcome::TimedOut => format!("Request timeout for icmp_seq {seq}"),
        ProbeOutcome::TtlExceeded { addr, .. } => {
            format!("From {addr} icmp_seq={seq} Time to live exceeded")
        }
        ProbeOutcome::Unreachable { addr, reason, .. } => format!(
            "From {addr} icmp_seq={seq} {}",
            describe_unreachable(*reason)
        ),
        ProbeOutcome::ChecksumInvalid => {
            format!("Request timeout for icmp_seq {seq} (bad checksum received)")
        }
    }
}

fn summary(host: &str, stats: &PingStatistics) -> String {
    let mut lines = vec![
        format!("--- {host} ping statistics ---"),
        format!(
            "{} packets transmitted, {} packets received, {:.1}% packet loss",
            stats.sent,
            stats.received,
            stats.loss_percent()
        ),
    ];
    if let (Some(min), Some(avg), Some(max)) = (stats.min, stats.avg(), stats.max) {
        lines.push(format!(
            "round-trip min/avg/max = {}/{}/{} ms",
            millis(min),
            millis(avg),
            millis(max)
        ));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pingtrace_core::{Network, PingBuilder, ProbeRequest, Sequence, UnreachableReason};
    use std::time::Duration;
    use test_case::test_case;

    const ROUTER: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 1);
    const TARGET: Ipv4Addr = Ipv4Addr::new(93, 184, 216, 34);

    fn ping_report(sequence: u16, outcome: ProbeOutcome) -> PingReport {
        PingReport {
            index: usize::from(sequence),
            sequence: Sequence(sequence),
            outcome,
        }
    }

    #[test]
    fn test_banner() {
        assert_eq!(
            "PING example.com (93.184.216.34): 56 data bytes",
            banner("example.com", TARGET, 56)
        );
    }

    #[test_case(
        ProbeOutcome::Replied { rtt: Duration::from_micros(12_345), addr: TARGET, ttl: 57, bytes: 56 },
        "56 bytes from 93.184.216.34: icmp_seq=3 ttl=57 time=12.345 ms"; "replied")]
    #[test_case(ProbeOutcome::TimedOut, "Request timeout for icmp_seq 3"; "timed out")]
    #[test_case(
        ProbeOutcome::TtlExceeded { addr: ROUTER, rtt: Duration::from_millis(1) },
        "From 10.0.0.1 icmp_seq=3 Time to live exceeded"; "ttl exceeded")]
    #[test_case(
        ProbeOutcome::Unreachable { addr: ROUTER, rtt: Duration::from_millis(1), reason: UnreachableReason::Host },
        "From 10.0.0.1 icmp_seq=3 Destination Host Unreachable"; "unreachable")]
    #[test_case(
        ProbeOutcome::ChecksumInvalid,
        "Request timeout for icmp_seq 3 (bad checksum received)"; "checksum invalid")]
    fn test_probe_line(outcome: ProbeOutcome, expected: &str) {
        assert_eq!(expected, probe_line(&ping_report(3, outcome)));
    }

    #[test]
    fn test_summary_with_replies() -> anyhow::Result<()> {
        let stats = run(vec![
            replied(10),
            ProbeOutcome::TimedOut,
            replied(30),
            ProbeOutcome::TimedOut,
            replied(20),
        ])?;
        let expected = "--- example.com ping statistics ---\n\
                        5 packets transmitted, 3 packets received, 40.0% packet loss\n\
                        round-trip min/avg/max = 10.000/20.000/30.000 ms";
        pretty_assertions::assert_eq!(expected, summary("example.com", &stats));
        Ok(())
    }

    #[test]
    fn test_summary_without_replies() -> anyhow::Result<()> {
        let stats = run(vec![ProbeOutcome::TimedOut; 4])?;
        let expected = "--- example.com ping statistics ---\n\
                        4 packets transmitted, 0 packets received, 100.0% packet loss";
        pretty_assertions::assert_eq!(expected, summary("example.com", &stats));
        Ok(())
    }

    struct Scripted(std::vec::IntoIter<ProbeOutcome>);

    impl Network for Scripted {
        fn probe(&mut self, _request: ProbeRequest) -> pingtrace_core::Result<ProbeOutcome> {
            Ok(self.0.next().unwrap_or(ProbeOutcome::TimedOut))
        }
    }

    fn replied(ms: u64) -> ProbeOutcome {
        ProbeOutcome::Replied {
            rtt: Duration::from_millis(ms),
            addr: TARGET,
            ttl: 57,
            bytes: 56,
        }
    }

    fn run(outcomes: Vec<ProbeOutcome>) -> anyhow::Result<PingStatistics> {
        let ping = PingBuilder::new(TARGET)
            .count(outcomes.len())
            .interval(Duration::ZERO)
            .build()?;
        Ok(ping.run_with(&mut Scripted(outcomes.into_iter()), |_| {})?)
    }
}
