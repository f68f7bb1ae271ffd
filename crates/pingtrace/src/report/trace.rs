use crate::report::millis;
use itertools::Itertools;
use pingtrace_core::{
    CompletionReason, HopNamer, HopResult, PayloadSize, ProbeOutcome, TimeToLive, Trace,
    TraceSummary,
};
use std::net::Ipv4Addr;
use tracing::instrument;

/// The size of an IPv4 header without options.
const IPV4_HEADER_SIZE: usize = 20;

/// Run a trace, printing each hop as it completes.
///
/// The summary of unresponsive hops is printed when `summarize` is set.
#[instrument(skip_all, level = "trace")]
pub fn report<R: HopNamer>(
    trace: &Trace,
    host: &str,
    namer: &R,
    summarize: bool,
) -> anyhow::Result<TraceSummary> {
    let config = trace.config();
    println!(
        "{}",
        banner(host, config.target_addr, config.max_ttl, config.payload_size)
    );
    let summary = trace.run(namer, |hop| println!("{}", hop_line(hop)))?;
    if summarize {
        println!("{}", summary_lines(&summary, config.probes_per_hop));
    }
    Ok(summary)
}

fn banner(host: &str, addr: Ipv4Addr, max_ttl: TimeToLive, payload_size: PayloadSize) -> String {
    format!(
        "traceroute to {host} ({addr}), {max_ttl} hops max, {} byte packets",
        IPV4_HEADER_SIZE + payload_size.icmp_size()
    )
}

/// A hop in the classic traceroute layout, `*` marks an unanswered probe.
fn hop_line(hop: &HopResult) -> String {
    let samples = hop.outcomes.iter().map(sample).join("  ");
    match hop.addr {
        Some(addr) => {
            let address = hop
                .hostname
                .as_ref()
                .map_or_else(|| addr.to_string(), |name| format!("{name} ({addr})"));
            format!("{:>2}  {address}  {samples}", hop.ttl.0)
        }
        None => format!("{:>2}  {}", hop.ttl.0, hop.outcomes.iter().map(|_| "*").join(" ")),
    }
}

fn sample(outcome: &ProbeOutcome) -> String {
    match outcome {
        ProbeOutcome::Replied { rtt, .. } | ProbeOutcome::TtlExceeded { rtt, .. } => {
            format!("{} ms", millis(*rtt))
        }
        ProbeOutcome::Unreachable { rtt, reason, .. } => format!("{} ms {reason}", millis(*rtt)),
        ProbeOutcome::TimedOut | ProbeOutcome::ChecksumInvalid => String::from("*"),
    }
}

fn summary_lines(summary: &TraceSummary, probes_per_hop: usize) -> String {
    let completion = match summary.completion {
        CompletionReason::DestinationReached => "destination reached",
        CompletionReason::MaxTtlExceeded => "destination not reached, maximum hops exceeded",
        CompletionReason::Unreachable => "destination unreachable",
    };
    let mut lines = vec![
        format!("--- trace complete: {completion} ---"),
        format!("hops with no response: {}", summary.unresponsive_hops()),
    ];
    if probes_per_hop > 1 {
        lines.extend(
            summary
                .unanswered_probes()
                .into_iter()
                .filter(|(_, unanswered)| *unanswered > 0)
                .map(|(ttl, unanswered)| {
                    format!("hop {ttl}: {unanswered} of {probes_per_hop} probes unanswered")
                }),
        );
    }
    lines.join("\n")
}
