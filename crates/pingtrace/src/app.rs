use crate::config::{Args, Command, LogFormat, LogSpanEvents, PingArgs, TracerouteArgs};
use crate::report;
use anyhow::anyhow;
use pingtrace_core::{
    AddressMode, HopNamer, PayloadSize, PingBuilder, TimeToLive, TraceBuilder, TraceId,
};
use pingtrace_dns::{DnsResolver, Resolver};
use pingtrace_privilege::Privilege;
use std::net::Ipv4Addr;
use std::process::ExitCode;
use std::str::FromStr;
use tracing_subscriber::fmt::format::FmtSpan;

/// Run the requested tool.
pub fn run_pingtrace(args: &Args, trace_identifier: u16) -> anyhow::Result<ExitCode> {
    configure_logging(args);
    let resolver = start_dns_resolver(args)?;
    match &args.command {
        Command::Ping(ping) => run_ping(ping, &resolver, trace_identifier),
        Command::Traceroute(trace) => run_traceroute(trace, &resolver, trace_identifier),
    }
}

/// Ping a host, failing if no echo reply is received.
fn run_ping(
    args: &PingArgs,
    resolver: &DnsResolver,
    trace_identifier: u16,
) -> anyhow::Result<ExitCode> {
    let addr = resolve_target(&args.host, resolver)?;
    let ping = PingBuilder::new(addr)
        .identifier(TraceId(trace_identifier))
        .count(args.count)
        .interval(args.interval)
        .payload_size(PayloadSize(args.size))
        .timeout(args.timeout)
        .ttl(args.ttl.map(TimeToLive))
        .build()?;
    ensure_privileges()?;
    let stats = report::ping::report(&ping, &args.host)?;
    if stats.received > 0 {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Trace the route to a host.
fn run_traceroute(
    args: &TracerouteArgs,
    resolver: &DnsResolver,
    trace_identifier: u16,
) -> anyhow::Result<ExitCode> {
    let addr = resolve_target(&args.host, resolver)?;
    let address_mode = if args.numeric {
        AddressMode::Numeric
    } else {
        AddressMode::Symbolic
    };
    let trace = TraceBuilder::new(addr)
        .identifier(TraceId(trace_identifier))
        .first_ttl(TimeToLive(args.first_ttl))
        .max_ttl(TimeToLive(args.max_ttl))
        .probes_per_hop(args.queries)
        .timeout(args.timeout)
        .address_mode(address_mode)
        .build()?;
    ensure_privileges()?;
    report::trace::report(&trace, &args.host, &ReverseDns(resolver), args.summarize)?;
    Ok(ExitCode::SUCCESS)
}

/// Resolve a host given either as an IPv4 literal or a hostname.
fn resolve_target<R: Resolver>(host: &str, resolver: &R) -> anyhow::Result<Ipv4Addr> {
    if let Ok(addr) = Ipv4Addr::from_str(host) {
        return Ok(addr);
    }
    resolver
        .lookup_ipv4(host)
        .map_err(|err| anyhow!("failed to resolve host: {} ({})", host, err))
}

/// Fail early, with guidance, if raw sockets cannot be opened.
fn ensure_privileges() -> anyhow::Result<()> {
    let privilege = Privilege::acquire_privileges()?;
    if privilege.has_privileges() {
        Ok(())
    } else {
        Err(anyhow!(
            "insufficient privileges to open a raw ICMP socket: {}",
            Privilege::guidance()
        ))
    }
}

/// Start the DNS resolver.
fn start_dns_resolver(args: &Args) -> anyhow::Result<DnsResolver> {
    Ok(DnsResolver::start(
        pingtrace_dns::Builder::new()
            .resolve_method(args.dns_resolve_method.into())
            .timeout(args.dns_timeout)
            .build(),
    )?)
}

fn configure_logging(args: &Args) {
    if args.verbose {
        let fmt_span = match args.log_span_events {
            LogSpanEvents::Off => FmtSpan::NONE,
            LogSpanEvents::Active => FmtSpan::ACTIVE,
            LogSpanEvents::Full => FmtSpan::FULL,
        };
        match args.log_format {
            LogFormat::Compact => {
                tracing_subscriber::fmt()
                    .with_span_events(fmt_span)
                    .with_env_filter(&args.log_filter)
                    .with_writer(std::io::stderr)
                    .compact()
                    .init();
            }
            LogFormat::Pretty => {
                tracing_subscriber::fmt()
                    .with_span_events(fmt_span)
                    .with_env_filter(&args.log_filter)
                    .with_writer(std::io::stderr)
                    .pretty()
                    .init();
            }
            LogFormat::Json => {
                tracing_subscriber::fmt()
                    .with_span_events(fmt_span)
                    .with_env_filter(&args.log_filter)
                    .with_writer(std::io::stderr)
                    .json()
                    .init();
            }
        }
    }
}

/// Names hops using reverse DNS.
struct ReverseDns<'a, R>(&'a R);

impl<R: Resolver> HopNamer for ReverseDns<'_, R> {
    fn name(&self, addr: Ipv4Addr) -> Option<String> {
        let entry = self.0.reverse_lookup(addr);
        let name = entry.hostnames().next()?;
        // some resolvers answer a failed lookup with the numeric address
        if name == addr.to_string() {
            None
        } else {
            Some(name.to_string())
        }
    }
}
